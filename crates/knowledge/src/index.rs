//! TF-IDF lexical index over outline chunks.
//!
//! The index is rebuilt wholesale whenever the chunk collection changes;
//! entries are never updated in place.

use crate::tokenizer::tokenize;
use crate::types::Chunk;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Sparse term vector: token to weight. Absent tokens weigh 0.
///
/// Kept in token order so sums over a vector always add in the same order
/// and equal vectors always score identically.
pub type SparseVector = BTreeMap<String, f64>;

/// One indexed chunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexEntry {
    /// TF-IDF weights of the chunk's tokens
    pub vector: SparseVector,

    /// The chunk the vector was computed from
    pub chunk: Chunk,
}

/// Collection of indexed chunks, in the order they were supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LexicalIndex {
    entries: Vec<IndexEntry>,
}

impl LexicalIndex {
    /// Build an index over `chunks`.
    ///
    /// Weight of token `t` in a chunk of `L` tokens where `t` occurs `c` times:
    /// `(c / L) * (ln((N + 1) / (df(t) + 1)) + 1)`, with `N` the chunk count
    /// (taken as 1 for an empty collection) and `df(t)` the number of chunks
    /// containing `t`. A chunk without tokens gets an empty vector.
    pub fn build(chunks: &[Chunk]) -> Self {
        let docs: Vec<Vec<String>> = chunks
            .iter()
            .map(|chunk| tokenize(&chunk.text).collect())
            .collect();

        let mut df: HashMap<&str, usize> = HashMap::new();
        for doc in &docs {
            let unique: HashSet<&str> = doc.iter().map(String::as_str).collect();
            for token in unique {
                *df.entry(token).or_insert(0) += 1;
            }
        }

        let n = docs.len().max(1) as f64;

        let entries = docs
            .iter()
            .zip(chunks)
            .map(|(doc, chunk)| {
                let mut counts: HashMap<&str, usize> = HashMap::new();
                for token in doc {
                    *counts.entry(token.as_str()).or_insert(0) += 1;
                }

                let len = doc.len() as f64;
                let vector = counts
                    .into_iter()
                    .map(|(token, count)| {
                        let doc_freq = df.get(token).copied().unwrap_or(0) as f64;
                        let idf = ((n + 1.0) / (doc_freq + 1.0)).ln() + 1.0;
                        (token.to_string(), (count as f64 / len) * idf)
                    })
                    .collect();

                IndexEntry {
                    vector,
                    chunk: chunk.clone(),
                }
            })
            .collect();

        let index = Self { entries };
        tracing::debug!(
            "Built lexical index: {} entries, {} distinct tokens",
            index.len(),
            df.len()
        );
        index
    }

    /// Indexed entries in insertion order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cosine similarity of two sparse vectors: `dot / (|a| * |b| + epsilon)`.
///
/// Returns 0 when either vector is empty. Terms are accumulated in token
/// order, so the result does not depend on argument order.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector, epsilon: f64) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(token, weight)| b.get(token).map(|other| weight * other))
        .sum();

    let norm_a = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.values().map(|v| v * v).sum::<f64>().sqrt();

    dot / (norm_a * norm_b + epsilon)
}
