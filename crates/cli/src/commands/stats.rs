//! Stats command handler.
//!
//! Handles batch and knowledge base statistics display.

use super::SourceArgs;
use clap::Args;
use opsbot_core::{config::AppConfig, AppResult};

/// Show ingestion and knowledge base statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let (kb, report) = self.source.learn(config).await?;
        let stats = kb.stats();

        if self.json {
            let output = serde_json::json!({
                "filesSeen": report.files_seen,
                "filesIndexed": report.files_indexed,
                "filesSkipped": report.skipped.len(),
                "sources": stats.sources,
                "sections": stats.sections,
                "procedures": stats.procedures,
                "subProcedures": stats.subs,
                "chunks": stats.chunks,
                "indexed": stats.indexed,
                "durationSecs": report.batch.duration_secs,
                "finishedAt": report.batch.finished_at,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!(
                "Indexed {} of {} file(s) in {:.2}s",
                report.files_indexed, report.files_seen, report.batch.duration_secs
            );
            println!("  Sources: {}", stats.sources);
            println!("  Sections: {}", stats.sections);
            println!("  Procedures: {}", stats.procedures);
            println!("  Sub-procedures: {}", stats.subs);
            println!("  Chunks: {}", stats.chunks);
            for skipped in &report.skipped {
                println!("  Skipped: {} ({})", skipped.path.display(), skipped.reason);
            }
        }

        Ok(())
    }
}
