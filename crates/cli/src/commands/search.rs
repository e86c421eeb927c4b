//! Search command handler.
//!
//! Prints raw ranked chunks without intent routing.

use super::SourceArgs;
use clap::Args;
use opsbot_core::{config::AppConfig, AppResult};

/// Rank chunks against a free-text query
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Query text
    pub query: String,

    /// Number of chunks to return (default from config)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command for '{}'", self.query);

        let (kb, _) = self.source.learn(config).await?;
        let k = self.top_k.unwrap_or(kb.config().search_top_k);
        let hits = kb.search(&self.query, k);

        tracing::debug!(
            "Search returned {} hit(s), max_score={:.3}",
            hits.len(),
            hits.first().map(|h| h.score).unwrap_or(0.0)
        );

        if self.json {
            println!("{}", serde_json::to_string_pretty(&hits)?);
        } else {
            for (rank, hit) in hits.iter().enumerate() {
                println!(
                    "{}. [{:.3}] {} ({})",
                    rank + 1,
                    hit.score,
                    hit.chunk.path,
                    hit.chunk.kind.as_str()
                );
            }
        }

        Ok(())
    }
}
