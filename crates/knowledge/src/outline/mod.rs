//! Heuristic outline parsing.
//!
//! Turns the plain text of one document into section, procedure and
//! sub-procedure nodes inside a [`KnowledgeBase`](crate::store::KnowledgeBase).

pub mod parser;
pub mod rules;

pub use parser::{OutlineParser, ParseSummary, UNSORTED_SECTION};
pub use rules::{Heading, HeadingRule, HeadingRules};
