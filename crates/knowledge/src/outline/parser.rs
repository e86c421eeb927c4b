//! Line-oriented outline parser.

use super::rules::{Heading, HeadingRules};
use crate::config::KnowledgeConfig;
use crate::store::KnowledgeBase;
use crate::types::{NodeId, NodeKind};
use opsbot_core::AppResult;

/// Title of the section created when a procedure or sub-procedure appears
/// before any section heading.
pub const UNSORTED_SECTION: &str = "Unsorted";

/// What parsing one document added to the knowledge base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseSummary {
    /// Nodes created, implicit "Unsorted" sections included
    pub nodes_added: usize,

    /// Body lines attached to a node
    pub body_lines: usize,

    /// Body lines seen before any heading, which have no node to attach to
    pub orphan_lines: usize,
}

/// Nodes currently open while walking one document.
///
/// Body text goes to the innermost open node. A sub-procedure stays open
/// until the next heading of any kind.
#[derive(Debug, Default)]
struct Cursor {
    section: Option<NodeId>,
    procedure: Option<NodeId>,
    sub: Option<NodeId>,
}

impl Cursor {
    fn innermost(&self) -> Option<NodeId> {
        self.sub.or(self.procedure).or(self.section)
    }
}

/// Parses plain text into outline nodes using a heading rule table.
#[derive(Debug, Clone, Default)]
pub struct OutlineParser {
    rules: HeadingRules,
}

impl OutlineParser {
    pub fn new(rules: HeadingRules) -> Self {
        Self { rules }
    }

    /// Parser with the built-in rules plus any configured headings.
    pub fn from_config(config: &KnowledgeConfig) -> AppResult<Self> {
        Ok(Self::new(HeadingRules::from_config(config)?))
    }

    pub fn rules(&self) -> &HeadingRules {
        &self.rules
    }

    /// Parse one document and append its nodes to `kb`.
    ///
    /// Cursors start empty for every document while node ids keep counting
    /// from the nodes already in `kb`. Afterwards every chunk is re-derived
    /// from the full node list and any previously built index is dropped.
    pub fn parse(&self, text: &str, source: &str, kb: &mut KnowledgeBase) -> ParseSummary {
        let mut cursor = Cursor::default();
        let mut summary = ParseSummary::default();
        let nodes_before = kb.nodes().len();

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match self.rules.classify(line) {
                Some(Heading {
                    kind: NodeKind::Section,
                    title,
                }) => {
                    cursor.section = Some(kb.add_node(NodeKind::Section, title, source, None));
                    cursor.procedure = None;
                    cursor.sub = None;
                }
                Some(Heading {
                    kind: NodeKind::Procedure,
                    title,
                }) => {
                    let parent = open_section(&mut cursor, kb, source);
                    cursor.procedure =
                        Some(kb.add_node(NodeKind::Procedure, title, source, Some(parent)));
                    cursor.sub = None;
                }
                Some(Heading {
                    kind: NodeKind::Sub,
                    title,
                }) => {
                    let parent = match cursor.procedure.or(cursor.section) {
                        Some(id) => id,
                        None => open_section(&mut cursor, kb, source),
                    };
                    cursor.sub = Some(kb.add_node(NodeKind::Sub, title, source, Some(parent)));
                }
                None => match cursor.innermost() {
                    Some(id) => {
                        kb.append_text(id, line);
                        summary.body_lines += 1;
                    }
                    None => summary.orphan_lines += 1,
                },
            }
        }

        summary.nodes_added = kb.nodes().len() - nodes_before;
        kb.rebuild_chunks();

        if summary.nodes_added == 0 {
            tracing::debug!("No outline nodes found in {}", source);
        }
        if summary.orphan_lines > 0 {
            tracing::debug!(
                "{}: {} line(s) before the first heading were not attached",
                source,
                summary.orphan_lines
            );
        }
        tracing::debug!(
            "Parsed {}: {} nodes, {} body lines",
            source,
            summary.nodes_added,
            summary.body_lines
        );

        summary
    }
}

/// The open section, creating an "Unsorted" one first if none is open.
fn open_section(cursor: &mut Cursor, kb: &mut KnowledgeBase, source: &str) -> NodeId {
    match cursor.section {
        Some(id) => id,
        None => {
            let id = kb.add_node(NodeKind::Section, UNSORTED_SECTION, source, None);
            cursor.section = Some(id);
            id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Node;

    fn parse(text: &str) -> KnowledgeBase {
        let mut kb = KnowledgeBase::default();
        OutlineParser::default().parse(text, "sop.txt", &mut kb);
        kb
    }

    fn find<'a>(kb: &'a KnowledgeBase, title: &str) -> &'a Node {
        kb.nodes().iter().find(|n| n.title == title).unwrap()
    }

    #[test]
    fn test_labelled_outline() {
        let kb = parse("Section: Billing\nProcedure: Refunds\nSub-procedure: Approve\nCall the manager");

        assert_eq!(kb.nodes().len(), 3);
        let billing = find(&kb, "Billing");
        let refunds = find(&kb, "Refunds");
        let approve = find(&kb, "Approve");

        assert_eq!(billing.kind, NodeKind::Section);
        assert_eq!(billing.parent, None);
        assert_eq!(refunds.parent, Some(billing.id));
        assert_eq!(approve.parent, Some(refunds.id));

        assert_eq!(refunds.text, "");
        assert_eq!(approve.text, "Call the manager\n");
    }

    #[test]
    fn test_body_text_attachment() {
        let kb = parse(
            "# Billing\nBilling overview\n## Refunds\nCheck the receipt\n### Approve\nSign the form\n## Disputes\nOpen a case",
        );

        assert_eq!(find(&kb, "Billing").text, "Billing overview\n");
        assert_eq!(find(&kb, "Refunds").text, "Check the receipt\n");
        assert_eq!(find(&kb, "Approve").text, "Sign the form\n");
        assert_eq!(find(&kb, "Disputes").text, "Open a case\n");
    }

    #[test]
    fn test_ids_are_sequential() {
        let kb = parse("# A\n## B\n### C\n# D");
        let ids: Vec<u32> = kb.nodes().iter().map(|n| n.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_procedure_without_section_gets_unsorted_parent() {
        let kb = parse("Procedure: Refunds\nProcedure: Disputes");

        assert_eq!(kb.nodes().len(), 3);
        let unsorted = &kb.nodes()[0];
        assert_eq!(unsorted.title, UNSORTED_SECTION);
        assert_eq!(unsorted.kind, NodeKind::Section);
        assert_eq!(find(&kb, "Refunds").parent, Some(unsorted.id));
        assert_eq!(find(&kb, "Disputes").parent, Some(unsorted.id));
    }

    #[test]
    fn test_sub_without_procedure_attaches_to_section() {
        let kb = parse("Section: Billing\nSub-procedure: Approve");
        assert_eq!(find(&kb, "Approve").parent, Some(find(&kb, "Billing").id));

        let kb = parse("### Approve\n### Escalate");
        assert_eq!(kb.nodes().len(), 3);
        let unsorted = find(&kb, UNSORTED_SECTION).id;
        assert_eq!(find(&kb, "Approve").parent, Some(unsorted));
        assert_eq!(find(&kb, "Escalate").parent, Some(unsorted));
    }

    #[test]
    fn test_section_closes_procedure() {
        let kb = parse("# Billing\n## Refunds\n# Onboarding\n### Accounts\nCreate the account");

        let onboarding = find(&kb, "Onboarding");
        let accounts = find(&kb, "Accounts");
        assert_eq!(accounts.parent, Some(onboarding.id));
        assert_eq!(accounts.text, "Create the account\n");
        assert_eq!(find(&kb, "Refunds").text, "");
    }

    #[test]
    fn test_empty_input() {
        let mut kb = KnowledgeBase::default();
        let summary = OutlineParser::default().parse("\n   \r\n\t\n", "empty.txt", &mut kb);

        assert_eq!(summary, ParseSummary::default());
        assert!(kb.nodes().is_empty());
        assert!(kb.chunks().is_empty());
    }

    #[test]
    fn test_orphan_lines_are_counted() {
        let mut kb = KnowledgeBase::default();
        let summary = OutlineParser::default().parse(
            "Preamble line\r\nSection: Billing\r\nBody",
            "crlf.txt",
            &mut kb,
        );

        assert_eq!(summary.orphan_lines, 1);
        assert_eq!(summary.body_lines, 1);
        assert_eq!(summary.nodes_added, 1);
        assert_eq!(kb.nodes()[0].text, "Body\n");
    }

    #[test]
    fn test_cursors_reset_per_document() {
        let mut kb = KnowledgeBase::default();
        let parser = OutlineParser::default();
        parser.parse("Section: Billing", "a.txt", &mut kb);
        parser.parse("Procedure: Refunds", "b.txt", &mut kb);

        let ids: Vec<u32> = kb.nodes().iter().map(|n| n.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let unsorted = &kb.nodes()[1];
        assert_eq!(unsorted.title, UNSORTED_SECTION);
        assert_eq!(unsorted.source, "b.txt");
        assert_eq!(kb.nodes()[2].parent, Some(unsorted.id));
    }

    #[test]
    fn test_chunks_follow_nodes() {
        let mut kb = KnowledgeBase::default();
        let parser = OutlineParser::default();
        parser.parse("Section: Billing\nProcedure: Refunds", "a.txt", &mut kb);
        parser.parse("Section: Onboarding", "b.txt", &mut kb);

        assert_eq!(kb.chunks().len(), kb.nodes().len());
        let chunk_ids: Vec<NodeId> = kb.chunks().iter().map(|c| c.id).collect();
        let node_ids: Vec<NodeId> = kb.nodes().iter().map(|n| n.id).collect();
        assert_eq!(chunk_ids, node_ids);
    }
}
