//! Coreference clusters, documents, and corpus loading.
//!
//! A cluster is the set of mention spans referring to one entity. Corpora
//! are JSON Lines files, one document per line:
//!
//! ```json
//! {"doc_key": "bn/abc/00/abc_0010", "clusters": [[[5, 6], [11, 12]], [[2, 2]]]}
//! ```
//!
//! Predicted corpora carry their system output either in
//! `predicted_clusters` or, when produced by a pipeline that overwrites in
//! place, directly in `clusters`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::span::Span;

/// A set of mention spans referring to the same entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cluster {
    /// The mention spans in this cluster.
    pub mentions: Vec<Span>,
}

impl Cluster {
    /// Create a cluster from mention spans.
    #[must_use]
    pub fn new(mentions: Vec<Span>) -> Self {
        Self { mentions }
    }

    /// Number of mentions in this cluster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    /// Check if the cluster has no mentions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    /// Check if this is a singleton (single mention).
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.mentions.len() == 1
    }

    /// Check if the cluster contains a mention with these boundaries.
    #[must_use]
    pub fn contains(&self, span: Span) -> bool {
        self.mentions.contains(&span)
    }
}

impl FromIterator<Span> for Cluster {
    fn from_iter<I: IntoIterator<Item = Span>>(iter: I) -> Self {
        Self {
            mentions: iter.into_iter().collect(),
        }
    }
}

/// A document with coreference annotations.
///
/// Unknown fields in the source JSON (sentences, speakers, subtoken maps)
/// are ignored on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier, unique within a corpus.
    pub doc_key: String,
    /// Gold coreference clusters.
    #[serde(default)]
    pub clusters: Vec<Cluster>,
    /// System output clusters, present on the predicted side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_clusters: Option<Vec<Cluster>>,
}

impl Document {
    /// Create a gold document.
    #[must_use]
    pub fn new(doc_key: impl Into<String>, clusters: Vec<Cluster>) -> Self {
        Self {
            doc_key: doc_key.into(),
            clusters,
            predicted_clusters: None,
        }
    }

    /// The clusters to read as this document's system output:
    /// `predicted_clusters` when present, otherwise `clusters`.
    #[must_use]
    pub fn predicted(&self) -> &[Cluster] {
        self.predicted_clusters.as_deref().unwrap_or(&self.clusters)
    }

    /// Total number of mentions across all clusters.
    #[must_use]
    pub fn mention_count(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }
}

/// A gold document paired with the clusters some system predicted for it.
#[derive(Debug, Clone)]
pub struct DocumentPair {
    /// Document identifier.
    pub doc_key: String,
    /// Gold clusters.
    pub gold: Vec<Cluster>,
    /// Predicted clusters; empty when the system skipped the document.
    pub predicted: Vec<Cluster>,
}

/// Load a JSON Lines corpus. Blank lines are skipped; a malformed line is
/// a [`Error::Parse`] naming its line number.
pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Vec<Document>> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);

    let mut documents = Vec::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let document: Document = serde_json::from_str(&line)
            .map_err(|e| Error::parse(format!("line {}: {}", line_idx + 1, e)))?;
        documents.push(document);
    }
    Ok(documents)
}

/// Pair gold documents with predictions by `doc_key`.
///
/// Every gold document yields a pair; one with no prediction gets empty
/// predicted clusters (and a warning), so a system is penalized for
/// documents it skipped rather than silently excused. Predicted documents
/// without a gold counterpart are dropped.
#[must_use]
pub fn pair_documents(gold: &[Document], predicted: &[Document]) -> Vec<DocumentPair> {
    let by_key: HashMap<&str, &Document> = predicted
        .iter()
        .map(|d| (d.doc_key.as_str(), d))
        .collect();

    gold.iter()
        .map(|doc| {
            let predicted = match by_key.get(doc.doc_key.as_str()) {
                Some(p) => p.predicted().to_vec(),
                None => {
                    log::warn!("no prediction for document {}", doc.doc_key);
                    Vec::new()
                }
            };
            DocumentPair {
                doc_key: doc.doc_key.clone(),
                gold: doc.clusters.clone(),
                predicted,
            }
        })
        .collect()
}

/// Build a mention span → cluster index lookup.
///
/// Every metric resolves "which cluster holds this mention" through this
/// index. If a span somehow appears in two clusters, the first cluster
/// wins.
#[must_use]
pub fn mention_to_cluster(clusters: &[Cluster]) -> HashMap<Span, usize> {
    let mut index = HashMap::new();
    for (cluster_idx, cluster) in clusters.iter().enumerate() {
        for &mention in &cluster.mentions {
            index.entry(mention).or_insert(cluster_idx);
        }
    }
    index
}
