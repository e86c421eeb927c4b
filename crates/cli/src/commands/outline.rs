//! Outline command handler.

use super::SourceArgs;
use clap::Args;
use opsbot_core::{config::AppConfig, AppResult};

/// Show sections and their procedures
#[derive(Args, Debug)]
pub struct OutlineCommand {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl OutlineCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing outline command");

        let (kb, _) = self.source.learn(config).await?;
        let outline = kb.outline();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outline)?);
            return Ok(());
        }

        if outline.is_empty() {
            println!("No sections found");
        }
        for section in &outline {
            println!("{} ({})", section.title, section.source);
            for procedure in &section.procedures {
                println!("  - {}", procedure);
            }
        }

        Ok(())
    }
}
