//! Span types and candidate span enumeration.
//!
//! A [`Span`] is a half-open `[start, end)` token interval. Spans compare
//! and order by their boundaries only: ascending start, then ascending end,
//! which is the canonical left-to-right, shortest-first order used
//! throughout the crate.

use std::collections::HashMap;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::{Error, Result};

/// A contiguous token span identified by its boundary pair.
///
/// The boundary convention (inclusive or exclusive `end`) is the caller's;
/// resolution and labeling only ever compare boundary pairs for equality.
/// Candidate enumeration in this crate produces exclusive ends.
///
/// Serializes as a two-element `[start, end]` array, matching the cluster
/// corpus format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    /// Start token index.
    pub start: u32,
    /// End token index.
    pub end: u32,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Get span width (number of tokens under the exclusive-end convention).
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Check if this span overlaps another (exclusive-end convention).
    #[must_use]
    pub const fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl From<(u32, u32)> for Span {
    fn from((start, end): (u32, u32)) -> Self {
        Self { start, end }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.start, self.end)
    }
}

impl Serialize for Span {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (self.start, self.end).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Span {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (start, end) = <(u32, u32)>::deserialize(deserializer)?;
        Ok(Self { start, end })
    }
}

/// Pair two parallel boundary slices into spans.
///
/// Errors with [`Error::InvalidInput`] if the slices differ in length.
pub fn zip_boundaries(starts: &[u32], ends: &[u32]) -> Result<Vec<Span>> {
    if starts.len() != ends.len() {
        return Err(Error::invalid_input(format!(
            "boundary slices differ in length: {} starts vs {} ends",
            starts.len(),
            ends.len()
        )));
    }
    Ok(starts
        .iter()
        .zip(ends)
        .map(|(&start, &end)| Span::new(start, end))
        .collect())
}

/// Enumerate all candidate spans up to `max_width` tokens.
///
/// Token indices are global: sentence 0 occupies `0..sentence_lengths[0]`,
/// sentence 1 the next block, and so on. Candidates never cross a sentence
/// boundary, mirroring how a mention detector enumerates its search space.
/// Spans are produced in start-major order with exclusive ends.
#[must_use]
pub fn enumerate_candidates(sentence_lengths: &[u32], max_width: u32) -> Vec<Span> {
    let mut candidates = Vec::new();
    let mut offset = 0u32;

    for &len in sentence_lengths {
        for start in 0..len {
            let max_end = (start + max_width).min(len);
            for end in (start + 1)..=max_end {
                candidates.push(Span::new(offset + start, offset + end));
            }
        }
        offset += len;
    }

    candidates
}

/// Project labels from a labeled span list onto a candidate list.
///
/// Returns one label per candidate: the label of the labeled span with
/// identical boundaries, or 0 where no labeled span matches. Callers use
/// nonzero labels (e.g. 1-based cluster ids) so that 0 can mean "not a
/// labeled span". If a boundary pair repeats in `labeled`, the first
/// occurrence wins.
///
/// Errors with [`Error::InvalidInput`] if `labeled` and `labels` differ in
/// length.
pub fn label_candidates(candidates: &[Span], labeled: &[Span], labels: &[u32]) -> Result<Vec<u32>> {
    if labeled.len() != labels.len() {
        return Err(Error::invalid_input(format!(
            "{} labeled spans but {} labels",
            labeled.len(),
            labels.len()
        )));
    }

    let mut index: HashMap<Span, u32> = HashMap::with_capacity(labeled.len());
    for (&span, &label) in labeled.iter().zip(labels) {
        index.entry(span).or_insert(label);
    }

    Ok(candidates
        .iter()
        .map(|c| index.get(c).copied().unwrap_or(0))
        .collect())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn candidates_respect_width_limit(
            lengths in proptest::collection::vec(1u32..20, 1..5),
            max_width in 1u32..10,
        ) {
            let candidates = enumerate_candidates(&lengths, max_width);
            prop_assert!(candidates.iter().all(|s| s.width() >= 1 && s.width() <= max_width));
        }

        #[test]
        fn candidate_count_matches_closed_form(len in 1u32..30, max_width in 1u32..10) {
            let candidates = enumerate_candidates(&[len], max_width);
            // Each start i contributes min(max_width, len - i) spans.
            let expected: u32 = (0..len).map(|i| max_width.min(len - i)).sum();
            prop_assert_eq!(candidates.len() as u32, expected);
        }

        #[test]
        fn overlap_is_symmetric(
            s1 in 0u32..50, w1 in 1u32..10,
            s2 in 0u32..50, w2 in 1u32..10,
        ) {
            let a = Span::new(s1, s1 + w1);
            let b = Span::new(s2, s2 + w2);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }
    }
}
