//! Coreference evaluation.
//!
//! Scores predicted coreference clusters against gold clusters with the
//! standard metric suite (MUC, B³, CEAF-e, LEA) plus mention-detection
//! P/R/F1, accumulating counts over a whole corpus before dividing.
//!
//! # Example
//!
//! ```rust
//! use goldspan::eval::CorefEvaluator;
//! use goldspan::{Cluster, Span};
//!
//! let gold = vec![Cluster::new(vec![Span::new(0, 4), Span::new(20, 22)])];
//! let predicted = gold.clone();
//!
//! let mut evaluator = CorefEvaluator::new();
//! evaluator.update(&predicted, &gold);
//! assert!((evaluator.conll_f1() - 1.0).abs() < 1e-9);
//! ```

pub mod metrics;

pub use metrics::{
    mention_prf, MentionCounts, MetricCounts, MetricEvaluator, MetricKind, PrfScores,
};

use crate::cluster::{Cluster, DocumentPair};

/// The CoNLL evaluator trio: MUC, B³, and CEAF-e accumulated together.
///
/// `conll_f1` is the plain average of the three F1s, the usual headline
/// number for coreference systems.
#[derive(Debug, Clone)]
pub struct CorefEvaluator {
    evaluators: [MetricEvaluator; 3],
}

impl CorefEvaluator {
    /// Create an evaluator with zeroed counts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            evaluators: [
                MetricEvaluator::new(MetricKind::Muc),
                MetricEvaluator::new(MetricKind::BCubed),
                MetricEvaluator::new(MetricKind::CeafE),
            ],
        }
    }

    /// Fold one document's clusters into all three metrics.
    pub fn update(&mut self, predicted: &[Cluster], gold: &[Cluster]) {
        for evaluator in &mut self.evaluators {
            evaluator.update(predicted, gold);
        }
    }

    /// Scores for one of the three metrics.
    ///
    /// Returns `None` for a metric outside the trio (e.g. LEA).
    #[must_use]
    pub fn scores(&self, kind: MetricKind) -> Option<PrfScores> {
        self.evaluators
            .iter()
            .find(|e| e.kind() == kind)
            .map(MetricEvaluator::scores)
    }

    /// Average F1 of MUC, B³, and CEAF-e.
    #[must_use]
    pub fn conll_f1(&self) -> f64 {
        let sum: f64 = self.evaluators.iter().map(|e| e.scores().f1).sum();
        sum / self.evaluators.len() as f64
    }

    /// Average precision across the trio.
    #[must_use]
    pub fn precision(&self) -> f64 {
        let sum: f64 = self.evaluators.iter().map(|e| e.scores().precision).sum();
        sum / self.evaluators.len() as f64
    }

    /// Average recall across the trio.
    #[must_use]
    pub fn recall(&self) -> f64 {
        let sum: f64 = self.evaluators.iter().map(|e| e.scores().recall).sum();
        sum / self.evaluators.len() as f64
    }
}

impl Default for CorefEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Corpus-level evaluation results.
#[derive(Debug, Clone)]
pub struct EvalReport {
    /// MUC scores.
    pub muc: PrfScores,
    /// B³ scores.
    pub b_cubed: PrfScores,
    /// CEAF-e scores.
    pub ceaf_e: PrfScores,
    /// LEA scores.
    pub lea: PrfScores,
    /// Average F1 of MUC, B³, CEAF-e.
    pub conll_f1: f64,
    /// Mention-detection scores.
    pub mentions: PrfScores,
    /// Number of documents scored.
    pub documents: usize,
}

impl std::fmt::Display for EvalReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Coreference evaluation over {} documents:", self.documents)?;
        writeln!(f, "  MUC:      {}", self.muc)?;
        writeln!(f, "  B³:       {}", self.b_cubed)?;
        writeln!(f, "  CEAF-e:   {}", self.ceaf_e)?;
        writeln!(f, "  LEA:      {}", self.lea)?;
        writeln!(f, "  CoNLL:    F1={:.1}%", self.conll_f1 * 100.0)?;
        writeln!(f, "  Mentions: {}", self.mentions)?;
        Ok(())
    }
}

/// Score a paired corpus: every gold document against its predictions.
#[must_use]
pub fn evaluate_corpus(pairs: &[DocumentPair]) -> EvalReport {
    let mut conll = CorefEvaluator::new();
    let mut lea = MetricEvaluator::new(MetricKind::Lea);
    let mut mentions = MentionCounts::default();

    for pair in pairs {
        conll.update(&pair.predicted, &pair.gold);
        lea.update(&pair.predicted, &pair.gold);
        mentions.update(&pair.predicted, &pair.gold);
    }

    EvalReport {
        muc: conll.scores(MetricKind::Muc).unwrap_or_default(),
        b_cubed: conll.scores(MetricKind::BCubed).unwrap_or_default(),
        ceaf_e: conll.scores(MetricKind::CeafE).unwrap_or_default(),
        lea: lea.scores(),
        conll_f1: conll.conll_f1(),
        mentions: mentions.scores(),
        documents: pairs.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    fn cluster(pairs: &[(u32, u32)]) -> Cluster {
        pairs.iter().map(|&(s, e)| Span::new(s, e)).collect()
    }

    #[test]
    fn test_perfect_corpus_conll_is_one() {
        let gold = vec![cluster(&[(0, 4), (20, 22)]), cluster(&[(5, 9), (30, 33)])];
        let mut evaluator = CorefEvaluator::new();
        evaluator.update(&gold.clone(), &gold);

        assert!((evaluator.conll_f1() - 1.0).abs() < 1e-9);
        assert!((evaluator.precision() - 1.0).abs() < 1e-9);
        assert!((evaluator.recall() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_conll_is_mean_of_trio() {
        let gold = vec![cluster(&[(0, 1), (2, 3), (4, 5)])];
        let predicted = vec![cluster(&[(0, 1), (2, 3)]), cluster(&[(4, 5)])];

        let mut evaluator = CorefEvaluator::new();
        evaluator.update(&predicted, &gold);

        let expected = (evaluator.scores(MetricKind::Muc).unwrap().f1
            + evaluator.scores(MetricKind::BCubed).unwrap().f1
            + evaluator.scores(MetricKind::CeafE).unwrap().f1)
            / 3.0;
        assert!((evaluator.conll_f1() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_lea_outside_trio() {
        let evaluator = CorefEvaluator::new();
        assert!(evaluator.scores(MetricKind::Lea).is_none());
    }

    #[test]
    fn test_evaluate_corpus_report() {
        let gold = vec![cluster(&[(0, 4), (20, 22)])];
        let pairs = vec![
            DocumentPair {
                doc_key: "d0".into(),
                gold: gold.clone(),
                predicted: gold.clone(),
            },
            DocumentPair {
                doc_key: "d1".into(),
                gold: gold.clone(),
                predicted: Vec::new(),
            },
        ];

        let report = evaluate_corpus(&pairs);
        assert_eq!(report.documents, 2);
        // Half the corpus is unpredicted: recall suffers, precision holds.
        assert!((report.mentions.precision - 1.0).abs() < 1e-9);
        assert!((report.mentions.recall - 0.5).abs() < 1e-9);
        assert!(report.conll_f1 > 0.0 && report.conll_f1 < 1.0);

        let rendered = report.to_string();
        assert!(rendered.contains("MUC"));
        assert!(rendered.contains("CoNLL"));
    }
}
