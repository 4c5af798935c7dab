//! # goldspan
//!
//! Span resolution and coreference evaluation for span-based sequence
//! labeling.
//!
//! A span-based model (mention detection, coreference) enumerates many
//! candidate `(start, end)` spans per document and scores them. The
//! bookkeeping around that — locating the ground-truth spans inside the
//! candidate list, projecting cluster labels onto candidates, and scoring
//! predicted clusters against gold — is what this crate provides:
//!
//! - **Resolution**: [`SpanResolver`] maps each gold span to its candidate
//!   index, in gold order or canonical span order.
//! - **Enumeration**: [`enumerate_candidates`] builds the sentence-bounded
//!   candidate search space a mention detector scores.
//! - **Labeling**: [`label_candidates`] projects gold cluster labels onto
//!   a candidate list.
//! - **Evaluation**: [`eval`] scores predicted clusters with MUC, B³,
//!   CEAF-e, LEA, CoNLL F1, and mention-detection P/R/F1.
//!
//! ## Quick Start
//!
//! ```rust
//! use goldspan::{Span, SpanResolver};
//!
//! let candidates = [Span::new(0, 2), Span::new(1, 1), Span::new(3, 5)];
//! let gold = [Span::new(1, 1), Span::new(3, 5)];
//!
//! // Which candidate positions hold the gold spans?
//! let indices = SpanResolver::new().resolve(&candidates, &gold)?;
//! assert_eq!(indices, vec![1, 2]);
//! # Ok::<(), goldspan::Error>(())
//! ```
//!
//! ## Failure semantics
//!
//! Every gold span is supposed to occur among the candidates. When one
//! does not, that is corrupted upstream data, and the resolver returns
//! [`Error::UnmatchedGold`] instead of a truncated mapping — an error the
//! caller can catch, log, and attribute, rather than a dead process in the
//! middle of a training run.
//!
//! ## Corpus evaluation
//!
//! ```rust,no_run
//! use goldspan::cluster::{load_jsonl, pair_documents};
//! use goldspan::eval::evaluate_corpus;
//!
//! let gold = load_jsonl("dev.jsonl")?;
//! let predicted = load_jsonl("dev.predictions.jsonl")?;
//! let report = evaluate_corpus(&pair_documents(&gold, &predicted));
//! println!("{report}");
//! # Ok::<(), goldspan::Error>(())
//! ```

#![warn(missing_docs)]

pub mod cluster;
mod error;
pub mod eval;
mod resolver;
mod span;

pub use cluster::{Cluster, Document, DocumentPair};
pub use error::{Error, Result, SpanOrigin};
pub use resolver::SpanResolver;
pub use span::{enumerate_candidates, label_candidates, zip_boundaries, Span};

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use goldspan::prelude::*;
    //!
    //! let resolver = SpanResolver::new().sorted(true);
    //! let indices = resolver.resolve(&[Span::new(0, 1)], &[Span::new(0, 1)]).unwrap();
    //! assert_eq!(indices, vec![0]);
    //! ```
    pub use crate::cluster::{load_jsonl, pair_documents, Cluster, Document, DocumentPair};
    pub use crate::error::{Error, Result};
    pub use crate::eval::{evaluate_corpus, CorefEvaluator, MetricKind, PrfScores};
    pub use crate::span::{enumerate_candidates, label_candidates, Span};
    pub use crate::SpanResolver;
}
