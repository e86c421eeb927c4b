//! Knowledge base store.
//!
//! Owns the outline nodes, the chunks derived from them and the lexical
//! index. Applications hold a `KnowledgeBase` value and pass it to the
//! parser and intent actions; there is no process-wide instance.

use crate::config::KnowledgeConfig;
use crate::index::LexicalIndex;
use crate::ingest::IngestBatch;
use crate::outline::OutlineParser;
use crate::search::{search_with_epsilon, SearchHit};
use crate::types::{Chunk, Node, NodeId, NodeKind};
use serde::Serialize;
use std::collections::BTreeSet;

/// A section and the titles of its procedures, for browsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionOutline {
    pub id: NodeId,
    pub title: String,
    pub source: String,
    pub procedures: Vec<String>,
}

/// Counts describing the current store contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KbStats {
    pub sources: usize,
    pub sections: usize,
    pub procedures: usize,
    pub subs: usize,
    pub chunks: usize,
    pub indexed: bool,
}

/// Nodes, chunks and index of one ingestion batch.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    config: KnowledgeConfig,
    nodes: Vec<Node>,
    chunks: Vec<Chunk>,
    index: Option<LexicalIndex>,
}

impl KnowledgeBase {
    pub fn new(config: KnowledgeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &KnowledgeConfig {
        &self.config
    }

    /// Drop all nodes, chunks and the index. The id sequence restarts at 1.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.chunks.clear();
        self.index = None;
    }

    /// Start an ingestion batch.
    ///
    /// The store is reset immediately and stays mutably borrowed until the
    /// batch is finished, so no query can observe a partial rebuild.
    pub fn begin_batch<'a>(&'a mut self, parser: &'a OutlineParser) -> IngestBatch<'a> {
        self.reset();
        IngestBatch::new(self, parser)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// The index, once a batch has finished.
    pub fn index(&self) -> Option<&LexicalIndex> {
        self.index.as_ref()
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        // Ids are assigned as position + 1.
        let position = id.0.checked_sub(1)? as usize;
        self.nodes.get(position).filter(|n| n.id == id)
    }

    /// Direct children of `parent` with the given kind, in creation order.
    pub fn children(&self, parent: NodeId, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(move |n| n.kind == kind && n.parent == Some(parent))
    }

    /// Titles from the root section down to `id`, joined by the configured
    /// separator. Empty for an unknown id.
    pub fn title_path(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut current = self.node(id);

        while let Some(node) = current {
            parts.push(node.title.as_str());
            if parts.len() > self.nodes.len() {
                break;
            }
            current = node.parent.and_then(|p| self.node(p));
        }

        parts.reverse();
        parts.join(&self.config.path_separator)
    }

    /// Rank chunks against `query`. Empty until the index is built.
    pub fn search(&self, query: &str, k: usize) -> Vec<SearchHit<'_>> {
        match &self.index {
            Some(index) => search_with_epsilon(index, query, k, self.config.similarity_epsilon),
            None => Vec::new(),
        }
    }

    /// Sections in creation order with their procedure titles.
    pub fn outline(&self) -> Vec<SectionOutline> {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Section)
            .map(|section| SectionOutline {
                id: section.id,
                title: section.title.clone(),
                source: section.source.clone(),
                procedures: self
                    .children(section.id, NodeKind::Procedure)
                    .map(|p| p.title.clone())
                    .collect(),
            })
            .collect()
    }

    pub fn stats(&self) -> KbStats {
        let count = |kind: NodeKind| self.nodes.iter().filter(|n| n.kind == kind).count();
        let sources: BTreeSet<&str> = self.nodes.iter().map(|n| n.source.as_str()).collect();

        KbStats {
            sources: sources.len(),
            sections: count(NodeKind::Section),
            procedures: count(NodeKind::Procedure),
            subs: count(NodeKind::Sub),
            chunks: self.chunks.len(),
            indexed: self.index.is_some(),
        }
    }

    pub(crate) fn add_node(
        &mut self,
        kind: NodeKind,
        title: &str,
        source: &str,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32 + 1);
        self.nodes.push(Node {
            id,
            kind,
            title: title.to_string(),
            text: String::new(),
            source: source.to_string(),
            parent,
        });
        id
    }

    pub(crate) fn append_text(&mut self, id: NodeId, line: &str) {
        let Some(position) = id.0.checked_sub(1) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(position as usize) {
            node.text.push_str(line);
            node.text.push('\n');
        }
    }

    /// Re-derive one chunk per node and invalidate the index.
    pub(crate) fn rebuild_chunks(&mut self) {
        let chunks = self
            .nodes
            .iter()
            .map(|node| {
                let path = self.title_path(node.id);
                let body: String = node.text.chars().take(self.config.chunk_body_chars).collect();
                Chunk {
                    id: node.id,
                    text: format!("[{}] {}\n{}", node.kind.tag(), path, body),
                    path,
                    kind: node.kind,
                }
            })
            .collect();

        self.chunks = chunks;
        self.index = None;
    }

    pub(crate) fn build_index(&mut self) {
        self.index = Some(LexicalIndex::build(&self.chunks));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KnowledgeBase {
        let mut kb = KnowledgeBase::default();
        OutlineParser::default().parse(
            "Section: Billing\nProcedure: Refunds\nIssue within 14 days\nSub-procedure: Approve\nProcedure: Disputes\nSection: Onboarding",
            "billing.txt",
            &mut kb,
        );
        kb
    }

    #[test]
    fn test_node_lookup() {
        let kb = sample();
        assert_eq!(kb.node(NodeId(2)).unwrap().title, "Refunds");
        assert!(kb.node(NodeId(0)).is_none());
        assert!(kb.node(NodeId(99)).is_none());
    }

    #[test]
    fn test_title_path() {
        let kb = sample();
        assert_eq!(kb.title_path(NodeId(1)), "Billing");
        assert_eq!(kb.title_path(NodeId(3)), "Billing › Refunds › Approve");
        assert_eq!(kb.title_path(NodeId(42)), "");
    }

    #[test]
    fn test_custom_separator() {
        let mut kb = KnowledgeBase::new(KnowledgeConfig {
            path_separator: " / ".to_string(),
            ..Default::default()
        });
        OutlineParser::default().parse("# Billing\n## Refunds", "a.md", &mut kb);
        assert_eq!(kb.chunks()[1].path, "Billing / Refunds");
    }

    #[test]
    fn test_chunk_text() {
        let kb = sample();
        let refunds = &kb.chunks()[1];

        assert_eq!(refunds.id, NodeId(2));
        assert_eq!(refunds.kind, NodeKind::Procedure);
        assert_eq!(refunds.path, "Billing › Refunds");
        assert_eq!(refunds.text, "[PROCEDURE] Billing › Refunds\nIssue within 14 days\n");
    }

    #[test]
    fn test_chunk_body_is_truncated() {
        let mut kb = KnowledgeBase::new(KnowledgeConfig {
            chunk_body_chars: 5,
            ..Default::default()
        });
        OutlineParser::default().parse("# Billing\nÉtape numéro un", "a.md", &mut kb);
        assert_eq!(kb.chunks()[0].text, "[SECTION] Billing\nÉtape");
    }

    #[test]
    fn test_children_in_order() {
        let kb = sample();
        let titles: Vec<&str> = kb
            .children(NodeId(1), NodeKind::Procedure)
            .map(|n| n.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Refunds", "Disputes"]);
    }

    #[test]
    fn test_outline_and_stats() {
        let mut kb = sample();
        let outline = kb.outline();
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].procedures, vec!["Refunds", "Disputes"]);
        assert!(outline[1].procedures.is_empty());

        let stats = kb.stats();
        assert_eq!(stats.sources, 1);
        assert_eq!(stats.sections, 2);
        assert_eq!(stats.procedures, 2);
        assert_eq!(stats.subs, 1);
        assert_eq!(stats.chunks, 5);
        assert!(!stats.indexed);

        kb.build_index();
        assert!(kb.stats().indexed);
    }

    #[test]
    fn test_search_requires_index() {
        let mut kb = sample();
        assert!(kb.search("issue within days", 3).is_empty());

        kb.build_index();
        let hits = kb.search("issue within days", 3);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].chunk.id, NodeId(2));
    }

    #[test]
    fn test_reset() {
        let mut kb = sample();
        kb.build_index();
        kb.reset();

        assert!(kb.nodes().is_empty());
        assert!(kb.chunks().is_empty());
        assert!(kb.index().is_none());
    }
}
