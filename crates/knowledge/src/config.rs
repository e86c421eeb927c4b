//! Knowledge base configuration management.
//!
//! Every constant the parser, index and intent actions rely on is a field
//! here with a serde default, so a `knowledge:` section in the workspace
//! config file can override any of them.

use crate::types::NodeKind;
use opsbot_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Retrieval and parsing tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Maximum number of body characters copied into a chunk
    #[serde(default = "default_chunk_body_chars")]
    pub chunk_body_chars: usize,

    /// Separator placed between titles in a title path
    #[serde(default = "default_path_separator")]
    pub path_separator: String,

    /// Default number of hits for free-text search
    #[serde(default = "default_search_top_k")]
    pub search_top_k: usize,

    /// Hits considered when an exact title lookup falls back to search
    #[serde(default = "default_fallback_search_k")]
    pub fallback_search_k: usize,

    /// Maximum near-match suggestions for a missing section
    #[serde(default = "default_section_suggestions")]
    pub section_suggestions: usize,

    /// Maximum near-match suggestions for a missing procedure
    #[serde(default = "default_procedure_suggestions")]
    pub procedure_suggestions: usize,

    /// Passages returned for a free-text question
    #[serde(default = "default_answer_top_k")]
    pub answer_top_k: usize,

    /// Characters of chunk text shown per passage
    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,

    /// Added to the cosine denominator so empty vectors score 0
    #[serde(default = "default_similarity_epsilon")]
    pub similarity_epsilon: f64,

    /// Extra heading rules, tried after the built-in ones
    #[serde(default)]
    pub headings: Vec<HeadingPattern>,
}

/// A user-supplied heading convention.
///
/// The title is taken from the `title` named group if present, otherwise
/// from the first capture group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingPattern {
    pub kind: NodeKind,
    pub pattern: String,
}

fn default_chunk_body_chars() -> usize {
    2000
}

fn default_path_separator() -> String {
    " › ".to_string()
}

fn default_search_top_k() -> usize {
    8
}

fn default_fallback_search_k() -> usize {
    5
}

fn default_section_suggestions() -> usize {
    3
}

fn default_procedure_suggestions() -> usize {
    5
}

fn default_answer_top_k() -> usize {
    5
}

fn default_snippet_chars() -> usize {
    300
}

fn default_similarity_epsilon() -> f64 {
    1e-9
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            chunk_body_chars: default_chunk_body_chars(),
            path_separator: default_path_separator(),
            search_top_k: default_search_top_k(),
            fallback_search_k: default_fallback_search_k(),
            section_suggestions: default_section_suggestions(),
            procedure_suggestions: default_procedure_suggestions(),
            answer_top_k: default_answer_top_k(),
            snippet_chars: default_snippet_chars(),
            similarity_epsilon: default_similarity_epsilon(),
            headings: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    knowledge: Option<KnowledgeConfig>,
}

/// Load knowledge configuration from the `knowledge:` section of a YAML file.
///
/// A missing file or a file without that section yields the defaults.
pub fn load_config(path: &Path) -> AppResult<KnowledgeConfig> {
    if !path.exists() {
        tracing::debug!("No config file at {:?}, using knowledge defaults", path);
        return Ok(KnowledgeConfig::default());
    }

    let content = fs::read_to_string(path)?;

    if content.trim().is_empty() {
        return Ok(KnowledgeConfig::default());
    }

    let file: ConfigFile = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("Failed to parse config at {:?}: {}", path, e)))?;

    let config = file.knowledge.unwrap_or_default();
    tracing::debug!(
        "Loaded knowledge config from {:?} ({} extra heading rules)",
        path,
        config.headings.len()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(&temp.path().join("config.yaml")).unwrap();

        assert_eq!(config, KnowledgeConfig::default());
        assert_eq!(config.chunk_body_chars, 2000);
        assert_eq!(config.path_separator, " › ");
    }

    #[test]
    fn test_partial_override() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(
            &path,
            "logging:\n  level: info\nknowledge:\n  chunk_body_chars: 500\n  headings:\n    - kind: procedure\n      pattern: '^Step\\s*\\d+\\s*[:.]\\s*(.+)$'\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.chunk_body_chars, 500);
        assert_eq!(config.search_top_k, 8);
        assert_eq!(config.headings.len(), 1);
        assert_eq!(config.headings[0].kind, NodeKind::Procedure);
    }

    #[test]
    fn test_file_without_knowledge_section() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "logging:\n  color: false\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config, KnowledgeConfig::default());
    }

    #[test]
    fn test_invalid_kind_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(
            &path,
            "knowledge:\n  headings:\n    - kind: chapter\n      pattern: '^Chapter (.+)$'\n",
        )
        .unwrap();

        assert!(matches!(load_config(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn test_unreadable_path_is_io_error() {
        // A directory exists but cannot be read as a file.
        let temp = TempDir::new().unwrap();
        assert!(matches!(load_config(temp.path()), Err(AppError::Io(_))));
    }
}
