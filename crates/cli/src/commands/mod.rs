//! Command handlers for the Opsbot CLI.
//!
//! Every command ingests its `--path` arguments as one batch, then queries
//! the resulting knowledge base.

pub mod ask;
pub mod outline;
pub mod search;
pub mod stats;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use outline::OutlineCommand;
pub use search::SearchCommand;
pub use stats::StatsCommand;

use clap::Args;
use opsbot_core::{config::AppConfig, AppResult};
use opsbot_knowledge::{config::load_config, IngestReport, KnowledgeBase};
use std::path::PathBuf;

/// Documents to build the knowledge base from
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Files or directories to ingest
    #[arg(short, long = "path", required = true)]
    pub paths: Vec<PathBuf>,
}

impl SourceArgs {
    /// Load the `knowledge:` config section and ingest every path.
    pub async fn learn(&self, config: &AppConfig) -> AppResult<(KnowledgeBase, IngestReport)> {
        let knowledge = load_config(&config.config_path())?;
        tracing::debug!("Knowledge config: {:?}", knowledge);

        let (kb, report) = opsbot_knowledge::learn(knowledge, &self.paths).await?;

        for skipped in &report.skipped {
            tracing::warn!("Skipped {}: {}", skipped.path.display(), skipped.reason);
        }

        Ok((kb, report))
    }
}
