//! Document knowledge base.
//!
//! Parses plain-text documents into a section / procedure / sub-procedure
//! outline, indexes the outline with TF-IDF, and answers a fixed set of
//! intents over it.

pub mod actions;
pub mod config;
pub mod extract;
pub mod index;
pub mod ingest;
pub mod intent;
pub mod outline;
pub mod search;
pub mod store;
pub mod tokenizer;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use actions::{
    find_procedure, find_section, summarize_sop, who_does_what, ProcedureLookup, Responsibilities,
    SectionLookup, SopSummary,
};
pub use config::KnowledgeConfig;
pub use extract::{DocumentFormat, Extractor, PlainTextExtractor};
pub use index::LexicalIndex;
pub use ingest::{BatchStats, IngestBatch, IngestReport};
pub use intent::{answer, ask, Answer, Intent, Passage};
pub use outline::{HeadingRule, HeadingRules, OutlineParser};
pub use search::{search, SearchHit};
pub use store::{KbStats, KnowledgeBase, SectionOutline};
pub use types::{Chunk, Node, NodeId, NodeKind};

use opsbot_core::AppResult;
use std::path::PathBuf;

/// Build a knowledge base from files on disk.
///
/// Compiles the configured heading rules, then runs one ingestion batch over
/// `paths` with the plain-text extractor.
pub async fn learn(
    config: KnowledgeConfig,
    paths: &[PathBuf],
) -> AppResult<(KnowledgeBase, IngestReport)> {
    let parser = OutlineParser::from_config(&config)?;
    let mut kb = KnowledgeBase::new(config);

    let report = ingest::ingest_paths(&mut kb, &parser, &PlainTextExtractor, paths).await;

    tracing::info!(
        "Ready: {} of {} file(s) indexed, {} nodes, {} chunks",
        report.files_indexed,
        report.files_seen,
        report.batch.nodes,
        report.batch.chunks
    );

    Ok((kb, report))
}
