//! Intent actions over the knowledge base.
//!
//! Every action tries an exact title match first and falls back to a fuzzy
//! lookup. None of them fail: a miss is reported as `None` plus empty lists.

use crate::search::SearchFilters;
use crate::store::KnowledgeBase;
use crate::types::{Node, NodeKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static IMAGE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https?://\S+\.(png|jpg|jpeg|gif|svg)").expect("image url pattern is valid")
});

static RASCI_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https?://\S+rasci\S+\.(png|jpg|jpeg|gif|svg|pdf)")
        .expect("rasci url pattern is valid")
});

/// Result of looking up a section by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionLookup<'a> {
    /// The section whose title matched exactly
    pub exact: Option<&'a Node>,

    /// Titles of the matched section's procedures
    #[serde(rename = "list")]
    pub procedures: Vec<String>,

    /// Similar section titles when there was no exact match
    pub near: Vec<String>,
}

/// Result of looking up a procedure by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcedureLookup<'a> {
    pub exact: Option<&'a Node>,

    /// Titles of the matched procedure's sub-procedures
    pub subs: Vec<String>,

    pub near: Vec<String>,
}

/// Flowchart images linked from an SOP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SopSummary<'a> {
    pub target: Option<&'a Node>,
    pub images: Vec<String>,
}

/// Responsibility (RASCI) charts linked from an SOP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Responsibilities<'a> {
    pub target: Option<&'a Node>,
    pub rasci: Vec<String>,
}

/// Find a section by title and list its procedures.
///
/// On a miss, suggests up to `section_suggestions` sections among the top
/// `fallback_search_k` search hits.
pub fn find_section<'a>(kb: &'a KnowledgeBase, name: &str) -> SectionLookup<'a> {
    if let Some(section) = find_exact(kb, NodeKind::Section, name) {
        return SectionLookup {
            exact: Some(section),
            procedures: child_titles(kb, section, NodeKind::Procedure),
            near: Vec::new(),
        };
    }

    let config = kb.config();
    let near = SearchFilters::new()
        .with_kind(NodeKind::Section)
        .with_min_score(0.0)
        .with_max_results(config.section_suggestions)
        .apply(kb.search(name, config.fallback_search_k))
        .into_iter()
        .filter_map(|hit| kb.node(hit.chunk.id))
        .map(|node| node.title.clone())
        .collect();

    tracing::debug!("No section titled {:?}; near matches: {:?}", name, near);
    SectionLookup {
        exact: None,
        procedures: Vec::new(),
        near,
    }
}

/// Find a procedure by title and list its sub-procedures.
///
/// On a miss, ranks procedure titles with [`title_similarity`] instead of the
/// lexical index.
pub fn find_procedure<'a>(kb: &'a KnowledgeBase, name: &str) -> ProcedureLookup<'a> {
    if let Some(procedure) = find_exact(kb, NodeKind::Procedure, name) {
        return ProcedureLookup {
            exact: Some(procedure),
            subs: child_titles(kb, procedure, NodeKind::Sub),
            near: Vec::new(),
        };
    }

    let near = nearest_titles(kb, NodeKind::Procedure, name, kb.config().procedure_suggestions);
    tracing::debug!("No procedure titled {:?}; near matches: {:?}", name, near);
    ProcedureLookup {
        exact: None,
        subs: Vec::new(),
        near,
    }
}

/// Resolve an SOP and collect the image links in its body.
pub fn summarize_sop<'a>(kb: &'a KnowledgeBase, name: &str) -> SopSummary<'a> {
    let target = find_by_any(kb, name);
    SopSummary {
        target,
        images: target.map(|n| image_urls(&n.text)).unwrap_or_default(),
    }
}

/// Resolve an SOP and collect its RASCI chart links.
pub fn who_does_what<'a>(kb: &'a KnowledgeBase, name: &str) -> Responsibilities<'a> {
    let target = find_by_any(kb, name);
    Responsibilities {
        target,
        rasci: target.map(|n| rasci_urls(&n.text)).unwrap_or_default(),
    }
}

/// Exact title match across all kinds, else the best positive search hit.
pub fn find_by_any<'a>(kb: &'a KnowledgeBase, name: &str) -> Option<&'a Node> {
    if let Some(node) = kb.nodes().iter().find(|n| n.title_matches(name)) {
        return Some(node);
    }

    SearchFilters::new()
        .with_min_score(0.0)
        .apply(kb.search(name, kb.config().fallback_search_k))
        .first()
        .and_then(|hit| kb.node(hit.chunk.id))
}

/// Image URLs (png, jpg, jpeg, gif, svg) in `text`, in order of appearance.
pub fn image_urls(text: &str) -> Vec<String> {
    IMAGE_URL
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// URLs containing "rasci" that point at an image or a PDF.
pub fn rasci_urls(text: &str) -> Vec<String> {
    RASCI_URL
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Crude positional similarity of two titles.
///
/// Counts the character positions at which both lower-cased strings hold the
/// same character and divides by the longer length. This rewards shared
/// prefixes and is not an edit distance: an inserted character shifts every
/// later position. Two empty strings score 0.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let longest = a.len().max(b.len());
    if longest == 0 {
        return 0.0;
    }

    let same = a.iter().zip(&b).filter(|(x, y)| x == y).count();
    same as f64 / longest as f64
}

/// Titles of `kind` nodes most similar to `name`, best first, zero scores dropped.
fn nearest_titles(kb: &KnowledgeBase, kind: NodeKind, name: &str, k: usize) -> Vec<String> {
    let mut scored: Vec<(f64, &str)> = kb
        .nodes()
        .iter()
        .filter(|n| n.kind == kind)
        .map(|n| (title_similarity(&n.title, name), n.title.as_str()))
        .filter(|(score, _)| *score > 0.0)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
        .into_iter()
        .take(k)
        .map(|(_, title)| title.to_string())
        .collect()
}

fn find_exact<'a>(kb: &'a KnowledgeBase, kind: NodeKind, name: &str) -> Option<&'a Node> {
    kb.nodes()
        .iter()
        .find(|n| n.kind == kind && n.title_matches(name))
}

fn child_titles(kb: &KnowledgeBase, parent: &Node, kind: NodeKind) -> Vec<String> {
    kb.children(parent.id, kind)
        .map(|n| n.title.clone())
        .collect()
}
