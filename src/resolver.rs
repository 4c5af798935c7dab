//! Span index resolution: locate gold spans in a candidate list.
//!
//! A mention detector enumerates many candidate spans; downstream stages
//! need to know which candidate positions carry the ground-truth spans.
//! [`SpanResolver`] maps each gold span to the index of the candidate with
//! identical boundaries, either in gold order or re-expressed in canonical
//! span order.
//!
//! # Example
//!
//! ```rust
//! use goldspan::{Span, SpanResolver};
//!
//! let candidates = [Span::new(0, 2), Span::new(1, 1), Span::new(3, 5)];
//! let gold = [Span::new(1, 1), Span::new(3, 5)];
//!
//! let indices = SpanResolver::new().resolve(&candidates, &gold)?;
//! assert_eq!(indices, vec![1, 2]);
//! # Ok::<(), goldspan::Error>(())
//! ```

use std::collections::HashMap;

use crate::error::{Error, Result, SpanOrigin};
use crate::span::{zip_boundaries, Span};

/// Resolves gold spans to their positions in a candidate span list.
///
/// Pure configuration: each [`resolve`](SpanResolver::resolve) call is an
/// independent, deterministic function of its inputs with no retained
/// state, so a resolver can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanResolver {
    sort_spans: bool,
    check_duplicates: bool,
}

impl SpanResolver {
    /// Create a resolver with default behavior: gold-order output, no
    /// duplicate checking.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return resolved indices in canonical span order instead of gold
    /// order: ascending candidate start, then ascending candidate end,
    /// then raw candidate index as the deterministic tie-break.
    #[must_use]
    pub fn sorted(mut self, sort_spans: bool) -> Self {
        self.sort_spans = sort_spans;
        self
    }

    /// Reject inputs where a boundary pair repeats within the candidate
    /// list or within the gold list.
    ///
    /// Costs an extra O(N log N) sorting pass per list. When off (the
    /// default), duplicate candidates resolve first-occurrence-wins and
    /// duplicate gold spans each map to that same first candidate.
    #[must_use]
    pub fn check_duplicates(mut self, check_duplicates: bool) -> Self {
        self.check_duplicates = check_duplicates;
        self
    }

    /// Map each gold span to the index of the matching candidate span.
    ///
    /// Every gold span must occur among the candidates; otherwise the call
    /// fails with [`Error::UnmatchedGold`] reporting how many gold spans
    /// went unmatched, and no partial mapping is returned. Matching is by
    /// boundary equality only, first occurrence wins.
    pub fn resolve(&self, candidates: &[Span], gold: &[Span]) -> Result<Vec<usize>> {
        if self.check_duplicates {
            if let Some(span) = first_duplicate(candidates) {
                return Err(Error::DuplicateSpan {
                    origin: SpanOrigin::Candidate,
                    span,
                });
            }
            if let Some(span) = first_duplicate(gold) {
                return Err(Error::DuplicateSpan {
                    origin: SpanOrigin::Gold,
                    span,
                });
            }
        }

        // First-occurrence index over the candidates. Equivalent to the
        // naive scan-per-gold-span but O(N + M).
        let mut index: HashMap<Span, usize> = HashMap::with_capacity(candidates.len());
        for (i, &span) in candidates.iter().enumerate() {
            index.entry(span).or_insert(i);
        }

        let mut resolved = Vec::with_capacity(gold.len());
        let mut unmatched = 0usize;
        for span in gold {
            match index.get(span) {
                Some(&i) => resolved.push(i),
                None => unmatched += 1,
            }
        }

        if unmatched > 0 {
            return Err(Error::UnmatchedGold {
                unmatched,
                gold_total: gold.len(),
            });
        }

        if self.sort_spans {
            // Keys are the candidate's own boundaries, not gold order.
            resolved.sort_unstable_by_key(|&i| (candidates[i], i));
        }

        Ok(resolved)
    }

    /// [`resolve`](SpanResolver::resolve) over four parallel boundary
    /// slices, the form span-scoring pipelines usually carry.
    ///
    /// `candidate_starts`/`candidate_ends` and `gold_starts`/`gold_ends`
    /// must be equal-length pairs; a mismatch is [`Error::InvalidInput`].
    pub fn resolve_indices(
        &self,
        candidate_starts: &[u32],
        candidate_ends: &[u32],
        gold_starts: &[u32],
        gold_ends: &[u32],
    ) -> Result<Vec<usize>> {
        let candidates = zip_boundaries(candidate_starts, candidate_ends)?;
        let gold = zip_boundaries(gold_starts, gold_ends)?;
        self.resolve(&candidates, &gold)
    }
}

/// Find a repeated boundary pair, if any, by sorting a copy.
fn first_duplicate(spans: &[Span]) -> Option<Span> {
    let mut sorted = spans.to_vec();
    sorted.sort_unstable();
    sorted.windows(2).find(|w| w[0] == w[1]).map(|w| w[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(pairs: &[(u32, u32)]) -> Vec<Span> {
        pairs.iter().map(|&(s, e)| Span::new(s, e)).collect()
    }

    #[test]
    fn test_exact_recovery_gold_order() {
        let candidates = spans(&[(0, 2), (1, 1), (3, 5)]);
        let gold = spans(&[(1, 1), (3, 5)]);

        let indices = SpanResolver::new().resolve(&candidates, &gold).unwrap();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn test_sorted_mode_unchanged_when_already_ordered() {
        let candidates = spans(&[(0, 2), (1, 1), (3, 5)]);
        let gold = spans(&[(1, 1), (3, 5)]);

        let indices = SpanResolver::new()
            .sorted(true)
            .resolve(&candidates, &gold)
            .unwrap();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn test_sorted_mode_reorders_by_candidate_start() {
        let candidates = spans(&[(5, 6), (0, 1)]);
        let gold = spans(&[(5, 6), (0, 1)]);

        let unsorted = SpanResolver::new().resolve(&candidates, &gold).unwrap();
        assert_eq!(unsorted, vec![0, 1]);

        let sorted = SpanResolver::new()
            .sorted(true)
            .resolve(&candidates, &gold)
            .unwrap();
        assert_eq!(sorted, vec![1, 0]);
    }

    #[test]
    fn test_sorted_mode_end_breaks_start_ties() {
        let candidates = spans(&[(2, 9), (2, 4), (0, 1)]);
        let gold = spans(&[(2, 9), (0, 1), (2, 4)]);

        let sorted = SpanResolver::new()
            .sorted(true)
            .resolve(&candidates, &gold)
            .unwrap();
        // (0,1) < (2,4) < (2,9)
        assert_eq!(sorted, vec![2, 1, 0]);
    }

    #[test]
    fn test_missing_gold_span_fails_whole_call() {
        let candidates = spans(&[(0, 1)]);
        let gold = spans(&[(0, 2)]);

        let err = SpanResolver::new().resolve(&candidates, &gold).unwrap_err();
        match err {
            Error::UnmatchedGold {
                unmatched,
                gold_total,
            } => {
                assert_eq!(unmatched, 1);
                assert_eq!(gold_total, 1);
            }
            other => panic!("expected UnmatchedGold, got {other:?}"),
        }
    }

    #[test]
    fn test_unmatched_count_in_diagnostic() {
        let candidates = spans(&[(0, 1), (4, 6)]);
        let gold = spans(&[(0, 1), (9, 9), (8, 8)]);

        let err = SpanResolver::new().resolve(&candidates, &gold).unwrap_err();
        assert_eq!(
            err.to_string(),
            "2 of 3 gold spans have no matching candidate"
        );
    }

    #[test]
    fn test_empty_gold_resolves_to_empty() {
        let candidates = spans(&[(0, 1), (1, 2)]);
        let indices = SpanResolver::new().resolve(&candidates, &[]).unwrap();
        assert!(indices.is_empty());
    }

    #[test]
    fn test_duplicate_candidates_first_occurrence_wins() {
        let candidates = spans(&[(0, 1), (3, 4), (0, 1)]);
        let gold = spans(&[(0, 1)]);

        let indices = SpanResolver::new().resolve(&candidates, &gold).unwrap();
        assert_eq!(indices, vec![0]);
    }

    #[test]
    fn test_duplicate_checking_is_opt_in() {
        let candidates = spans(&[(0, 1), (3, 4), (0, 1)]);
        let gold = spans(&[(3, 4)]);

        // Default: tolerated.
        assert!(SpanResolver::new().resolve(&candidates, &gold).is_ok());

        // Opted in: rejected with the offending span.
        let err = SpanResolver::new()
            .check_duplicates(true)
            .resolve(&candidates, &gold)
            .unwrap_err();
        match err {
            Error::DuplicateSpan { origin, span } => {
                assert_eq!(origin, SpanOrigin::Candidate);
                assert_eq!(span, Span::new(0, 1));
            }
            other => panic!("expected DuplicateSpan, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_gold_detected() {
        let candidates = spans(&[(0, 1), (3, 4)]);
        let gold = spans(&[(3, 4), (3, 4)]);

        let err = SpanResolver::new()
            .check_duplicates(true)
            .resolve(&candidates, &gold)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateSpan {
                origin: SpanOrigin::Gold,
                ..
            }
        ));
    }

    #[test]
    fn test_resolve_indices_parallel_slices() {
        let indices = SpanResolver::new()
            .resolve_indices(&[0, 1, 3], &[2, 1, 5], &[1, 3], &[1, 5])
            .unwrap();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn test_resolve_indices_length_mismatch() {
        let err = SpanResolver::new()
            .resolve_indices(&[0, 1], &[2], &[], &[])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    /// A candidate list with a valid gold embedding: unique candidate
    /// spans, a subset of them (in arbitrary order) as gold.
    fn valid_embedding() -> impl Strategy<Value = (Vec<Span>, Vec<Span>)> {
        proptest::collection::hash_set((0u32..40, 1u32..8), 1..30)
            .prop_flat_map(|set| {
                let candidates: Vec<Span> = set
                    .into_iter()
                    .map(|(s, w)| Span::new(s, s + w))
                    .collect();
                let n = candidates.len();
                (Just(candidates), proptest::sample::subsequence((0..n).collect::<Vec<_>>(), 0..=n))
            })
            .prop_flat_map(|(candidates, picked)| {
                let gold: Vec<Span> = picked.iter().map(|&i| candidates[i]).collect();
                (Just(candidates), Just(gold).prop_shuffle())
            })
    }

    proptest! {
        #[test]
        fn exact_recovery((candidates, gold) in valid_embedding()) {
            let indices = SpanResolver::new().resolve(&candidates, &gold).unwrap();
            prop_assert_eq!(indices.len(), gold.len());
            for (k, &i) in indices.iter().enumerate() {
                prop_assert_eq!(candidates[i], gold[k]);
            }
        }

        #[test]
        fn permutation_invariance((candidates, gold) in valid_embedding()) {
            let unsorted = SpanResolver::new().resolve(&candidates, &gold).unwrap();
            let sorted = SpanResolver::new().sorted(true).resolve(&candidates, &gold).unwrap();

            let a: HashSet<usize> = unsorted.iter().copied().collect();
            let b: HashSet<usize> = sorted.iter().copied().collect();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn sorted_output_is_canonically_ordered((candidates, gold) in valid_embedding()) {
            let sorted = SpanResolver::new().sorted(true).resolve(&candidates, &gold).unwrap();
            for w in sorted.windows(2) {
                let (a, b) = (candidates[w[0]], candidates[w[1]]);
                prop_assert!((a, w[0]) < (b, w[1]));
            }
        }

        #[test]
        fn determinism((candidates, gold) in valid_embedding()) {
            let resolver = SpanResolver::new().sorted(true);
            let first = resolver.resolve(&candidates, &gold).unwrap();
            let second = resolver.resolve(&candidates, &gold).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
