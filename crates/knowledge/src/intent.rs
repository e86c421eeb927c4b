//! Question routing.
//!
//! Maps a free-form question to one of the fixed intents by keyword, then
//! answers it from the knowledge base. Anything that matches no intent is
//! answered with ranked passages.

use crate::actions::{
    find_procedure, find_section, summarize_sop, who_does_what, ProcedureLookup, Responsibilities,
    SectionLookup, SopSummary,
};
use crate::search::SearchFilters;
use crate::store::KnowledgeBase;
use serde::Serialize;

/// A routed question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", content = "name", rename_all = "snake_case")]
pub enum Intent {
    FindSection(String),
    FindProcedure(String),
    SummarizeSop(String),
    WhoDoesWhat(String),
    Generic(String),
}

impl Intent {
    /// Route a question by its leading words or keywords.
    ///
    /// The name is whatever follows the first `:`, trimmed; it is empty when
    /// the question has no colon. Returns `None` for a blank question.
    pub fn route(question: &str) -> Option<Self> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        let lower = question.to_lowercase();
        let name = || {
            question
                .split_once(':')
                .map(|(_, rest)| rest.trim().to_string())
                .unwrap_or_default()
        };

        let intent = if lower.starts_with("find a section") {
            Self::FindSection(name())
        } else if lower.starts_with("find a procedure") {
            Self::FindProcedure(name())
        } else if lower.starts_with("summarize") || lower.contains("flowchart") {
            Self::SummarizeSop(name())
        } else if lower.contains("who does what") || lower.contains("rasci") {
            Self::WhoDoesWhat(name())
        } else {
            Self::Generic(question.to_string())
        };

        tracing::debug!("Routed {:?} to {:?}", question, intent);
        Some(intent)
    }
}

/// A ranked excerpt for a free-text question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Passage {
    pub path: String,
    pub snippet: String,
    pub score: f64,
}

/// Structured answer to a routed question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Answer<'a> {
    FindSection(SectionLookup<'a>),
    FindProcedure(ProcedureLookup<'a>),
    SummarizeSop(SopSummary<'a>),
    WhoDoesWhat(Responsibilities<'a>),
    Generic { passages: Vec<Passage> },
}

/// Answer a routed question.
pub fn answer<'a>(kb: &'a KnowledgeBase, intent: &Intent) -> Answer<'a> {
    match intent {
        Intent::FindSection(name) => Answer::FindSection(find_section(kb, name)),
        Intent::FindProcedure(name) => Answer::FindProcedure(find_procedure(kb, name)),
        Intent::SummarizeSop(name) => Answer::SummarizeSop(summarize_sop(kb, name)),
        Intent::WhoDoesWhat(name) => Answer::WhoDoesWhat(who_does_what(kb, name)),
        Intent::Generic(query) => Answer::Generic {
            passages: passages(kb, query),
        },
    }
}

/// Route and answer in one step. `None` for a blank question.
pub fn ask<'a>(kb: &'a KnowledgeBase, question: &str) -> Option<Answer<'a>> {
    Intent::route(question).map(|intent| answer(kb, &intent))
}

fn passages(kb: &KnowledgeBase, query: &str) -> Vec<Passage> {
    let config = kb.config();
    SearchFilters::new()
        .with_min_score(0.0)
        .apply(kb.search(query, config.answer_top_k))
        .into_iter()
        .map(|hit| Passage {
            path: hit.chunk.path.clone(),
            snippet: hit.chunk.text.chars().take(config.snippet_chars).collect(),
            score: hit.score,
        })
        .collect()
}
