//! Tests for lexical ranking correctness.

use crate::index::LexicalIndex;
use crate::search::search;
use crate::types::{Chunk, NodeId, NodeKind};
use std::collections::HashMap;

/// Helper to create a test chunk.
fn create_test_chunk(id: u32, text: &str) -> Chunk {
    Chunk {
        id: NodeId(id),
        text: text.to_string(),
        path: format!("Doc {}", id),
        kind: NodeKind::Procedure,
    }
}

fn corpus() -> Vec<Chunk> {
    vec![
        create_test_chunk(1, "[PROCEDURE] Billing › Refunds\nIssue refunds within 14 days of purchase"),
        create_test_chunk(2, "[PROCEDURE] Billing › Invoices\nSend invoices on the first business day"),
        create_test_chunk(3, "[PROCEDURE] Support › Escalation\nPage the on-call engineer for outages"),
        create_test_chunk(4, "[PROCEDURE] Support › Triage\nLabel tickets by severity and product area"),
        create_test_chunk(5, "[PROCEDURE] Security › Access reviews\nReview admin access every quarter"),
    ]
}

#[test]
fn test_own_text_ranks_itself_first() {
    let chunks = corpus();
    let index = LexicalIndex::build(&chunks);

    for chunk in &chunks {
        let hits = search(&index, &chunk.text, chunks.len());
        assert_eq!(
            hits[0].chunk.id, chunk.id,
            "chunk {} should rank first for its own text",
            chunk.id
        );
        assert!(hits[0].score > 0.5, "self score too low: {}", hits[0].score);
    }
}

#[test]
fn test_relevant_query_beats_unrelated() {
    let index = LexicalIndex::build(&corpus());
    let hits = search(&index, "outages engineer", 5);

    assert_eq!(hits[0].chunk.id, NodeId(3));
    assert!(hits[0].score > hits[1].score);
    assert_eq!(hits[1].score, 0.0);
}

#[test]
fn test_common_terms_are_down_weighted() {
    let index = LexicalIndex::build(&corpus());
    let entry = |id: u32| {
        index
            .entries()
            .iter()
            .find(|e| e.chunk.id == NodeId(id))
            .unwrap()
    };

    // "procedure" occurs in every chunk, "refunds" in one.
    let refunds = &entry(1).vector;
    assert!(refunds["refunds"] > refunds["procedure"]);
}

#[test]
fn test_permuted_build_same_vectors() {
    let chunks = corpus();
    let mut permuted = chunks.clone();
    permuted.rotate_left(2);

    let by_id = |index: &LexicalIndex| -> HashMap<NodeId, Vec<(String, f64)>> {
        index
            .entries()
            .iter()
            .map(|e| {
                let mut weights: Vec<(String, f64)> =
                    e.vector.iter().map(|(t, w)| (t.clone(), *w)).collect();
                weights.sort_by(|a, b| a.0.cmp(&b.0));
                (e.chunk.id, weights)
            })
            .collect()
    };

    let original = LexicalIndex::build(&chunks);
    let rotated = LexicalIndex::build(&permuted);

    assert_eq!(by_id(&original), by_id(&rotated));
    assert_eq!(rotated.entries()[0].chunk.id, NodeId(3));
}

#[test]
fn test_empty_chunk_scores_zero() {
    let chunks = vec![create_test_chunk(1, ""), create_test_chunk(2, "refunds policy")];
    let index = LexicalIndex::build(&chunks);
    let hits = search(&index, "refunds", 2);

    assert_eq!(hits[0].chunk.id, NodeId(2));
    assert_eq!(hits[1].score, 0.0);
    assert!(hits.iter().all(|h| !h.score.is_nan()));
}

#[test]
fn test_top_k_limit_respected() {
    let index = LexicalIndex::build(&corpus());
    assert_eq!(search(&index, "billing", 3).len(), 3);
    assert_eq!(search(&index, "billing", 50).len(), 5);
}

#[test]
fn test_identical_chunks_tie_in_index_order() {
    let text = "[SECTION] Billing Billing Refunds Policy Ledger Ledger Ledger Audit";
    let chunks = vec![
        create_test_chunk(1, text),
        create_test_chunk(2, text),
        create_test_chunk(3, "[SECTION] Support\nPage the on-call engineer"),
    ];

    // Every rebuild must score the duplicates identically.
    for _ in 0..200 {
        let index = LexicalIndex::build(&chunks);
        let hits = search(&index, "billing refunds policy ledger audit section", 3);

        assert_eq!(hits[0].score.to_bits(), hits[1].score.to_bits());
        assert_eq!(hits[0].chunk.id, NodeId(1));
        assert_eq!(hits[1].chunk.id, NodeId(2));
        assert!(hits[1].score > hits[2].score);
    }
}
