//! Knowledge system type definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an outline node.
///
/// Assigned sequentially from 1 in creation order and stable for the lifetime
/// of one ingestion batch. Chunks reuse the id of the node they derive from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of an outline node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Section,
    Procedure,
    Sub,
}

impl NodeKind {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Section => "section",
            Self::Procedure => "procedure",
            Self::Sub => "sub",
        }
    }

    /// Tag embedded at the start of chunk text, e.g. `[PROCEDURE]`.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Section => "SECTION",
            Self::Procedure => "PROCEDURE",
            Self::Sub => "SUB",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of the document outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Sequential identifier
    pub id: NodeId,

    /// Section, procedure or sub-procedure
    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Display name, used for title lookups
    pub title: String,

    /// Body lines collected under this node, each terminated by `\n`
    pub text: String,

    /// Originating file name
    pub source: String,

    /// Enclosing node; `None` only for sections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
}

impl Node {
    /// Case-insensitive, whitespace-trimmed title equality.
    pub fn title_matches(&self, name: &str) -> bool {
        titles_equal(&self.title, name)
    }
}

/// Compare two titles the way lookups do: trimmed and case-folded.
pub fn titles_equal(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// A retrieval unit derived 1:1 from a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Id of the originating node
    pub id: NodeId,

    /// `[TYPE] path\nbody`, the text that gets indexed
    pub text: String,

    /// Title path from the root section to the node
    pub path: String,

    /// Kind of the originating node
    #[serde(rename = "type")]
    pub kind: NodeKind,
}
