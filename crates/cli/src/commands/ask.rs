//! Ask command handler.
//!
//! Routes each question to an intent and prints the structured answer.

use super::SourceArgs;
use clap::Args;
use opsbot_core::{config::AppConfig, AppError, AppResult};
use opsbot_knowledge::{answer, Answer, Intent, KnowledgeBase, Node};

/// Ask questions about the ingested documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// Questions, e.g. "find a section: Billing"
    #[arg(required = true)]
    pub questions: Vec<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command with {} question(s)", self.questions.len());

        let (kb, _) = self.source.learn(config).await?;

        let mut outputs = Vec::new();
        for question in &self.questions {
            let intent = Intent::route(question)
                .ok_or_else(|| AppError::Other("Question is empty".to_string()))?;
            let result = answer(&kb, &intent);

            if self.json {
                outputs.push(serde_json::json!({
                    "question": question,
                    "answer": result,
                }));
            } else {
                println!("Q: {}", question);
                print_answer(&kb, &result);
                println!();
            }
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outputs)?);
        }

        Ok(())
    }
}

fn print_answer(kb: &KnowledgeBase, result: &Answer<'_>) {
    match result {
        Answer::FindSection(lookup) => {
            print_target(kb, lookup.exact, "Section");
            print_list("Procedures", &lookup.procedures);
            print_near(&lookup.near);
        }
        Answer::FindProcedure(lookup) => {
            print_target(kb, lookup.exact, "Procedure");
            print_list("Sub-procedures", &lookup.subs);
            print_near(&lookup.near);
        }
        Answer::SummarizeSop(summary) => {
            print_target(kb, summary.target, "SOP");
            if let Some(node) = summary.target {
                if !node.text.is_empty() {
                    println!("{}", node.text.trim_end());
                }
            }
            print_list("Flowcharts", &summary.images);
        }
        Answer::WhoDoesWhat(responsibilities) => {
            print_target(kb, responsibilities.target, "SOP");
            print_list("RASCI charts", &responsibilities.rasci);
        }
        Answer::Generic { passages } => {
            if passages.is_empty() {
                println!("No matching passages");
            }
            for passage in passages {
                println!("[{:.3}] {}", passage.score, passage.path);
                println!("{}", passage.snippet.trim_end());
            }
        }
    }
}

fn print_target(kb: &KnowledgeBase, target: Option<&Node>, label: &str) {
    match target {
        Some(node) => println!("{}: {}", label, kb.title_path(node.id)),
        None => println!("{}: not found", label),
    }
}

fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{}:", label);
    for item in items {
        println!("- {}", item);
    }
}

fn print_near(near: &[String]) {
    print_list("Did you mean", near);
}
