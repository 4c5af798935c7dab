//! Coreference evaluation metrics.
//!
//! # Metric Summary
//!
//! | Metric | Focus | Key property |
//! |--------|-------|--------------|
//! | **MUC** | Links | Minimum links to partition mentions into clusters |
//! | **B³** | Mentions | Per-mention precision/recall |
//! | **CEAF-e** | Entities | One-to-one cluster alignment under φ4 |
//! | **LEA** | Links + entities | Link-based but importance-weighted |
//!
//! Each metric produces precision counts by reading the predicted clusters
//! against the gold mention map, and recall counts by reading the gold
//! clusters against the predicted mention map. Counts accumulate across
//! documents in a [`MetricEvaluator`], so corpus-level scores weight every
//! document by its mention mass rather than averaging per-document F1s.
//!
//! Singleton clusters participate in every metric.
//!
//! # References
//!
//! - MUC: Vilain et al., 1995
//! - B³: Bagga & Baldwin, 1998
//! - CEAF: Luo, 2005
//! - LEA: Moosavi & Strube, 2016

use std::collections::{HashMap, HashSet};

use crate::cluster::{mention_to_cluster, Cluster};
use crate::span::Span;

// =============================================================================
// Result Types
// =============================================================================

/// Precision, recall, and their harmonic mean.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PrfScores {
    /// Precision
    pub precision: f64,
    /// Recall
    pub recall: f64,
    /// F1 score
    pub f1: f64,
}

impl PrfScores {
    /// Create scores from precision and recall; F1 is derived.
    #[must_use]
    pub fn new(precision: f64, recall: f64) -> Self {
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            f1,
        }
    }
}

impl std::fmt::Display for PrfScores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "P={:.1}%  R={:.1}%  F1={:.1}%",
            self.precision * 100.0,
            self.recall * 100.0,
            self.f1 * 100.0
        )
    }
}

/// Raw numerator/denominator counts for one metric.
///
/// Kept separate from [`PrfScores`] so documents can be accumulated before
/// any division happens.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricCounts {
    /// Precision numerator.
    pub p_num: f64,
    /// Precision denominator.
    pub p_den: f64,
    /// Recall numerator.
    pub r_num: f64,
    /// Recall denominator.
    pub r_den: f64,
}

impl MetricCounts {
    fn add(&mut self, other: MetricCounts) {
        self.p_num += other.p_num;
        self.p_den += other.p_den;
        self.r_num += other.r_num;
        self.r_den += other.r_den;
    }

    /// Reduce accumulated counts to precision/recall/F1.
    #[must_use]
    pub fn scores(&self) -> PrfScores {
        let precision = if self.p_den > 0.0 {
            self.p_num / self.p_den
        } else {
            0.0
        };
        let recall = if self.r_den > 0.0 {
            self.r_num / self.r_den
        } else {
            0.0
        };
        PrfScores::new(precision, recall)
    }
}

// =============================================================================
// Metric Kinds
// =============================================================================

/// The coreference metrics this crate computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Link-based (Vilain et al., 1995).
    Muc,
    /// Mention-based (Bagga & Baldwin, 1998).
    BCubed,
    /// Entity-based CEAF with the φ4 similarity (Luo, 2005).
    CeafE,
    /// Link-based entity-aware (Moosavi & Strube, 2016).
    Lea,
}

impl MetricKind {
    /// Short display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::Muc => "MUC",
            MetricKind::BCubed => "B³",
            MetricKind::CeafE => "CEAF-e",
            MetricKind::Lea => "LEA",
        }
    }

    /// Compute this metric's counts for a single document.
    #[must_use]
    pub fn counts(&self, predicted: &[Cluster], gold: &[Cluster]) -> MetricCounts {
        if *self == MetricKind::CeafE {
            return ceaf_e_counts(predicted, gold);
        }

        let gold_index = mention_to_cluster(gold);
        let pred_index = mention_to_cluster(predicted);
        let (p_num, p_den) = match self {
            MetricKind::Muc => muc_one_side(predicted, &gold_index),
            MetricKind::BCubed => b_cubed_one_side(predicted, &gold_index),
            MetricKind::Lea => lea_one_side(predicted, gold, &gold_index),
            MetricKind::CeafE => unreachable!(),
        };
        let (r_num, r_den) = match self {
            MetricKind::Muc => muc_one_side(gold, &pred_index),
            MetricKind::BCubed => b_cubed_one_side(gold, &pred_index),
            MetricKind::Lea => lea_one_side(gold, predicted, &pred_index),
            MetricKind::CeafE => unreachable!(),
        };

        MetricCounts {
            p_num,
            p_den,
            r_num,
            r_den,
        }
    }

    /// Score a single document pair directly.
    #[must_use]
    pub fn score(&self, predicted: &[Cluster], gold: &[Cluster]) -> PrfScores {
        self.counts(predicted, gold).scores()
    }
}

/// Accumulates one metric's counts across documents.
#[derive(Debug, Clone, Copy)]
pub struct MetricEvaluator {
    kind: MetricKind,
    counts: MetricCounts,
}

impl MetricEvaluator {
    /// Create an evaluator for one metric.
    #[must_use]
    pub fn new(kind: MetricKind) -> Self {
        Self {
            kind,
            counts: MetricCounts::default(),
        }
    }

    /// Which metric this evaluator accumulates.
    #[must_use]
    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    /// Fold one document's clusters into the running counts.
    pub fn update(&mut self, predicted: &[Cluster], gold: &[Cluster]) {
        self.counts.add(self.kind.counts(predicted, gold));
    }

    /// Corpus-level scores over everything seen so far.
    #[must_use]
    pub fn scores(&self) -> PrfScores {
        self.counts.scores()
    }
}

// =============================================================================
// MUC (Vilain et al., 1995)
// =============================================================================

/// One direction of MUC: for each cluster, the links recovered by the other
/// side's partition, over the links needed to build the cluster.
///
/// A mention absent from the other side breaks its link; the remaining
/// mentions cost one partition each.
fn muc_one_side(clusters: &[Cluster], other_index: &HashMap<Span, usize>) -> (f64, f64) {
    let mut num = 0.0;
    let mut den = 0.0;

    for cluster in clusters {
        if cluster.is_empty() {
            continue;
        }
        den += (cluster.len() - 1) as f64;

        let mut correct = cluster.len() as f64;
        let mut partitions: HashSet<usize> = HashSet::new();
        for mention in &cluster.mentions {
            match other_index.get(mention) {
                Some(&idx) => {
                    partitions.insert(idx);
                }
                None => correct -= 1.0,
            }
        }
        num += correct - partitions.len() as f64;
    }

    (num, den)
}

// =============================================================================
// B³ (Bagga & Baldwin, 1998)
// =============================================================================

/// One direction of B³: for each cluster, sum over other-side clusters of
/// (shared mention count)², normalized by cluster size.
fn b_cubed_one_side(clusters: &[Cluster], other_index: &HashMap<Span, usize>) -> (f64, f64) {
    let mut num = 0.0;
    let mut den = 0.0;

    for cluster in clusters {
        if cluster.is_empty() {
            continue;
        }

        let mut shared: HashMap<usize, usize> = HashMap::new();
        for mention in &cluster.mentions {
            if let Some(&idx) = other_index.get(mention) {
                *shared.entry(idx).or_insert(0) += 1;
            }
        }

        let correct: f64 = shared.values().map(|&c| (c * c) as f64).sum();
        num += correct / cluster.len() as f64;
        den += cluster.len() as f64;
    }

    (num, den)
}

// =============================================================================
// CEAF-e (Luo, 2005)
// =============================================================================

/// φ4 entity similarity: `2|c ∩ g| / (|c| + |g|)`.
fn phi4(a: &Cluster, b: &Cluster) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let b_set: HashSet<Span> = b.mentions.iter().copied().collect();
    let overlap = a.mentions.iter().filter(|m| b_set.contains(m)).count();
    2.0 * overlap as f64 / (a.len() + b.len()) as f64
}

/// Best-first one-to-one cluster alignment, maximizing total φ4.
///
/// Greedy rather than exact Hungarian: when clusters on each side are
/// disjoint (a partition of their mention sets, which is what corpus
/// loading produces), every candidate pairing with positive similarity is
/// independent enough that best-first matching attains the optimum.
fn greedy_alignment(predicted: &[Cluster], gold: &[Cluster]) -> f64 {
    let mut similarities: Vec<(usize, usize, f64)> = Vec::new();
    for (i, p) in predicted.iter().enumerate() {
        for (j, g) in gold.iter().enumerate() {
            let sim = phi4(p, g);
            if sim > 0.0 {
                similarities.push((i, j, sim));
            }
        }
    }

    // Highest similarity first; index pairs as a deterministic tie-break.
    similarities.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| (a.0, a.1).cmp(&(b.0, b.1)))
    });

    let mut used_pred: HashSet<usize> = HashSet::new();
    let mut used_gold: HashSet<usize> = HashSet::new();
    let mut total = 0.0;
    for (i, j, sim) in similarities {
        if !used_pred.contains(&i) && !used_gold.contains(&j) {
            used_pred.insert(i);
            used_gold.insert(j);
            total += sim;
        }
    }
    total
}

/// CEAF-e counts: aligned similarity over the cluster count on each side.
fn ceaf_e_counts(predicted: &[Cluster], gold: &[Cluster]) -> MetricCounts {
    let similarity = greedy_alignment(predicted, gold);
    MetricCounts {
        p_num: similarity,
        p_den: predicted.len() as f64,
        r_num: similarity,
        r_den: gold.len() as f64,
    }
}

// =============================================================================
// LEA (Moosavi & Strube, 2016)
// =============================================================================

/// One direction of LEA: per cluster, the fraction of its links preserved
/// by the other side's partition, weighted by cluster size.
///
/// A singleton has no links; it resolves correctly when the other side
/// also keeps its mention alone.
fn lea_one_side(
    clusters: &[Cluster],
    other_clusters: &[Cluster],
    other_index: &HashMap<Span, usize>,
) -> (f64, f64) {
    let mut num = 0.0;
    let mut den = 0.0;

    for cluster in clusters {
        if cluster.is_empty() {
            continue;
        }
        let importance = cluster.len() as f64;
        den += importance;

        if cluster.is_singleton() {
            if let Some(&idx) = other_index.get(&cluster.mentions[0]) {
                if other_clusters[idx].is_singleton() {
                    num += importance;
                }
            }
            continue;
        }

        let total_links = (cluster.len() * (cluster.len() - 1) / 2) as f64;
        let mut preserved = 0usize;
        for (i, a) in cluster.mentions.iter().enumerate() {
            for b in &cluster.mentions[i + 1..] {
                if let (Some(ia), Some(ib)) = (other_index.get(a), other_index.get(b)) {
                    if ia == ib {
                        preserved += 1;
                    }
                }
            }
        }
        num += importance * preserved as f64 / total_links;
    }

    (num, den)
}

// =============================================================================
// Mention Detection
// =============================================================================

/// All mention spans across a cluster list.
fn all_mentions(clusters: &[Cluster]) -> HashSet<Span> {
    clusters
        .iter()
        .flat_map(|c| c.mentions.iter().copied())
        .collect()
}

/// Micro-accumulating mention-detection counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct MentionCounts {
    /// Mentions present on both sides.
    pub matched: usize,
    /// Gold mentions the system never produced.
    pub missed: usize,
    /// Predicted mentions absent from gold.
    pub spurious: usize,
}

impl MentionCounts {
    /// Fold one document's mention sets into the counts.
    pub fn update(&mut self, predicted: &[Cluster], gold: &[Cluster]) {
        let predicted = all_mentions(predicted);
        let gold = all_mentions(gold);
        let matched = predicted.intersection(&gold).count();
        self.matched += matched;
        self.missed += gold.len() - matched;
        self.spurious += predicted.len() - matched;
    }

    /// Mention-detection precision/recall/F1.
    #[must_use]
    pub fn scores(&self) -> PrfScores {
        let precision = if self.matched + self.spurious > 0 {
            self.matched as f64 / (self.matched + self.spurious) as f64
        } else {
            0.0
        };
        let recall = if self.matched + self.missed > 0 {
            self.matched as f64 / (self.matched + self.missed) as f64
        } else {
            0.0
        };
        PrfScores::new(precision, recall)
    }
}

/// Mention-detection P/R/F1 for a single document pair.
#[must_use]
pub fn mention_prf(predicted: &[Cluster], gold: &[Cluster]) -> PrfScores {
    let mut counts = MentionCounts::default();
    counts.update(predicted, gold);
    counts.scores()
}

// =============================================================================
// Tests
// =============================================================================
