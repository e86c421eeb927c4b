//! Cosine-similarity search over the lexical index.
//!
//! Queries are weighted by raw term counts while indexed chunks carry TF-IDF
//! weights. The asymmetry is intended: common terms are down-weighted on the
//! document side only.

use crate::index::{cosine_similarity, LexicalIndex, SparseVector};
use crate::tokenizer::tokenize;
use crate::types::{Chunk, NodeKind};
use serde::Serialize;

/// Default guard added to the cosine denominator.
pub const DEFAULT_SIMILARITY_EPSILON: f64 = 1e-9;

/// A ranked chunk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchHit<'a> {
    pub score: f64,
    pub chunk: &'a Chunk,
}

/// Term-count vector of a query.
pub fn query_vector(query: &str) -> SparseVector {
    let mut counts = SparseVector::new();
    for token in tokenize(query) {
        *counts.entry(token).or_insert(0.0) += 1.0;
    }
    counts
}

/// Rank every entry of `index` against `query` and keep the best `k`.
///
/// Results are sorted by descending score; equal scores keep index order.
pub fn search<'a>(index: &'a LexicalIndex, query: &str, k: usize) -> Vec<SearchHit<'a>> {
    search_with_epsilon(index, query, k, DEFAULT_SIMILARITY_EPSILON)
}

/// Same as [`search`] with an explicit cosine epsilon.
pub fn search_with_epsilon<'a>(
    index: &'a LexicalIndex,
    query: &str,
    k: usize,
    epsilon: f64,
) -> Vec<SearchHit<'a>> {
    let query = query_vector(query);

    let mut hits: Vec<SearchHit<'a>> = index
        .entries()
        .iter()
        .map(|entry| SearchHit {
            score: cosine_similarity(&entry.vector, &query, epsilon),
            chunk: &entry.chunk,
        })
        .collect();

    // `sort_by` is stable, so ties stay in index order.
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(k);
    hits
}

/// Post-filters applied to ranked hits.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    /// Keep only chunks of these node kinds
    pub kinds: Option<Vec<NodeKind>>,

    /// Keep only hits scoring strictly above this value
    pub min_score: Option<f64>,

    /// Maximum number of results
    pub max_results: Option<usize>,
}

impl SearchFilters {
    /// Create a new empty filter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by node kind
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kinds.get_or_insert_with(Vec::new).push(kind);
        self
    }

    /// Drop hits scoring at or below `min_score`
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Set maximum results
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Apply filters to ranked hits, preserving their order.
    pub fn apply<'a>(&self, hits: Vec<SearchHit<'a>>) -> Vec<SearchHit<'a>> {
        let mut filtered = hits;

        if let Some(min_score) = self.min_score {
            filtered.retain(|hit| hit.score > min_score);
        }

        if let Some(kinds) = &self.kinds {
            filtered.retain(|hit| kinds.contains(&hit.chunk.kind));
        }

        if let Some(max_results) = self.max_results {
            filtered.truncate(max_results);
        }

        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeId;

    fn chunk(id: u32, kind: NodeKind, text: &str) -> Chunk {
        Chunk {
            id: NodeId(id),
            text: text.to_string(),
            path: format!("Path {}", id),
            kind,
        }
    }

    fn sample_index() -> LexicalIndex {
        LexicalIndex::build(&[
            chunk(1, NodeKind::Section, "[SECTION] Billing"),
            chunk(2, NodeKind::Procedure, "[PROCEDURE] Billing › Refunds\nIssue refunds within 14 days"),
            chunk(3, NodeKind::Section, "[SECTION] Onboarding"),
            chunk(4, NodeKind::Procedure, "[PROCEDURE] Onboarding › Accounts\nCreate the user account"),
        ])
    }

    #[test]
    fn test_query_vector_counts() {
        let q = query_vector("refund the refund");
        assert_eq!(q["refund"], 2.0);
        assert_eq!(q["the"], 1.0);
    }

    #[test]
    fn test_most_relevant_first() {
        let index = sample_index();
        let hits = search(&index, "refunds", 4);

        assert_eq!(hits.len(), 4);
        assert_eq!(hits[0].chunk.id, NodeId(2));
        assert!(hits[0].score > 0.0);
    }

    #[test]
    fn test_scores_are_ordered_descending() {
        let index = sample_index();
        let hits = search(&index, "billing refunds account", 10);

        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_top_k_limit_respected() {
        let index = sample_index();
        assert_eq!(search(&index, "billing", 2).len(), 2);
        assert_eq!(search(&index, "billing", 0).len(), 0);
    }

    #[test]
    fn test_ties_keep_index_order() {
        let index = sample_index();
        let hits = search(&index, "nothing matches here", 4);

        let ids: Vec<NodeId> = hits.iter().map(|h| h.chunk.id).collect();
        assert_eq!(ids, vec![NodeId(1), NodeId(2), NodeId(3), NodeId(4)]);
        assert!(hits.iter().all(|h| h.score == 0.0));
    }

    #[test]
    fn test_empty_index_returns_no_results() {
        let index = LexicalIndex::build(&[]);
        assert!(search(&index, "billing", 5).is_empty());
    }

    #[test]
    fn test_empty_query_scores_zero() {
        let index = sample_index();
        let hits = search(&index, "", 4);
        assert!(hits.iter().all(|h| h.score == 0.0));
    }

    #[test]
    fn test_filters() {
        let index = sample_index();
        let hits = search(&index, "billing", 4);

        let sections = SearchFilters::new()
            .with_kind(NodeKind::Section)
            .with_min_score(0.0)
            .apply(hits.clone());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].chunk.id, NodeId(1));

        let capped = SearchFilters::new().with_max_results(1).apply(hits);
        assert_eq!(capped.len(), 1);
    }
}
