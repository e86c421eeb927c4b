//! Heading recognition rules.
//!
//! A rule pairs a node kind with a regex whose capture group holds the
//! heading title. Rules are evaluated in order and the first match wins, so
//! adding a convention never touches the parser's control flow.

use crate::config::KnowledgeConfig;
use crate::types::NodeKind;
use once_cell::sync::Lazy;
use opsbot_core::{AppError, AppResult};
use regex::Regex;

/// Built-in rules: explicit labels and markdown-style levels 1 to 3.
static BUILTIN_RULES: Lazy<Vec<HeadingRule>> = Lazy::new(|| {
    [
        ("section-label", NodeKind::Section, r"(?i)^section\s*[:\-]\s*(.+)$"),
        ("heading-1", NodeKind::Section, r"^#\s+(.+)$"),
        ("procedure-label", NodeKind::Procedure, r"(?i)^procedure\s*[:\-]\s*(.+)$"),
        ("heading-2", NodeKind::Procedure, r"^##\s+(.+)$"),
        ("sub-procedure-label", NodeKind::Sub, r"(?i)^sub-?procedure\s*[:\-]\s*(.+)$"),
        ("heading-3", NodeKind::Sub, r"^###\s+(.+)$"),
    ]
    .into_iter()
    .map(|(name, kind, pattern)| HeadingRule {
        name: name.to_string(),
        kind,
        pattern: Regex::new(pattern).expect("built-in heading pattern is valid"),
    })
    .collect()
});

/// A recognised heading line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heading<'t> {
    pub kind: NodeKind,
    pub title: &'t str,
}

/// One heading convention.
#[derive(Debug, Clone)]
pub struct HeadingRule {
    name: String,
    kind: NodeKind,
    pattern: Regex,
}

impl HeadingRule {
    /// Compile a rule. The pattern needs at least one capture group.
    pub fn new(name: impl Into<String>, kind: NodeKind, pattern: &str) -> AppResult<Self> {
        let name = name.into();
        let pattern = Regex::new(pattern).map_err(|e| {
            AppError::Config(format!("Invalid heading pattern for rule '{}': {}", name, e))
        })?;

        if pattern.captures_len() < 2 {
            return Err(AppError::Config(format!(
                "Heading pattern for rule '{}' has no capture group for the title",
                name
            )));
        }

        Ok(Self {
            name,
            kind,
            pattern,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Extract the trimmed title if `line` is a heading of this rule.
    pub fn title<'t>(&self, line: &'t str) -> Option<&'t str> {
        let caps = self.pattern.captures(line)?;
        let title = caps.name("title").or_else(|| caps.get(1))?.as_str().trim();
        (!title.is_empty()).then_some(title)
    }
}

/// Ordered heading rule table.
#[derive(Debug, Clone)]
pub struct HeadingRules {
    rules: Vec<HeadingRule>,
}

impl Default for HeadingRules {
    fn default() -> Self {
        Self::builtin()
    }
}

impl HeadingRules {
    /// The built-in label and markup rules.
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES.to_vec(),
        }
    }

    /// An empty table; every line is body text.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Built-in rules followed by the configured extra headings.
    pub fn from_config(config: &KnowledgeConfig) -> AppResult<Self> {
        let mut rules = Self::builtin();
        for (i, heading) in config.headings.iter().enumerate() {
            rules.push(HeadingRule::new(
                format!("custom-{}", i + 1),
                heading.kind,
                &heading.pattern,
            )?);
        }
        Ok(rules)
    }

    /// Append a rule with the lowest priority.
    pub fn push(&mut self, rule: HeadingRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[HeadingRule] {
        &self.rules
    }

    /// Classify a trimmed line; `None` means body text.
    pub fn classify<'t>(&self, line: &'t str) -> Option<Heading<'t>> {
        self.rules.iter().find_map(|rule| {
            rule.title(line).map(|title| Heading {
                kind: rule.kind,
                title,
            })
        })
    }
}
