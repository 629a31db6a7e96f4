//! Conversion between `tdoc` documents and the editing tree.
//!
//! Inline styling does not survive the trip: every span becomes a plain text
//! leaf. Checklist state is kept in the `checked` attribute of list items.

use std::io::Cursor;

use anyhow::{Context, Result, anyhow};
use tdoc::{ChecklistItem, Paragraph, Span, writer::Writer};

use crate::document::{Document, Element, Node};

pub const PARAGRAPH: &str = "paragraph";
pub const HEADING_ONE: &str = "heading-one";
pub const HEADING_TWO: &str = "heading-two";
pub const HEADING_THREE: &str = "heading-three";
pub const CODE_BLOCK: &str = "code-block";
pub const BLOCKQUOTE: &str = "blockquote";
pub const LIST: &str = "list";
pub const NUMBERED_LIST: &str = "numbered-list";
pub const CHECKLIST: &str = "checklist";
pub const LIST_ITEM: &str = "list-item";
pub const CHECKED: &str = "checked";

pub fn parse_ftml(source: &str) -> Result<Document> {
    let document = tdoc::parse(Cursor::new(source.to_string()))
        .map_err(|err| anyhow!("failed to parse FTML: {err}"))?;
    Ok(from_tdoc(&document))
}

pub fn write_ftml(document: &Document) -> Result<String> {
    Writer::new()
        .write_to_string(&to_tdoc(document))
        .context("failed to render FTML")
}

// ============================================================================
// tdoc -> tree
// ============================================================================

pub fn from_tdoc(document: &tdoc::Document) -> Document {
    Document::new().with_children(document.paragraphs.iter().map(paragraph_to_node).collect())
}

fn paragraph_to_node(paragraph: &Paragraph) -> Node {
    match paragraph {
        Paragraph::Text { content } => leaf_block(PARAGRAPH, content),
        Paragraph::Header1 { content } => leaf_block(HEADING_ONE, content),
        Paragraph::Header2 { content } => leaf_block(HEADING_TWO, content),
        Paragraph::Header3 { content } => leaf_block(HEADING_THREE, content),
        Paragraph::CodeBlock { content } => leaf_block(CODE_BLOCK, content),
        Paragraph::Quote { children } => {
            container(BLOCKQUOTE, children.iter().map(paragraph_to_node).collect())
        }
        Paragraph::UnorderedList { entries } => list_node(LIST, entries),
        Paragraph::OrderedList { entries } => list_node(NUMBERED_LIST, entries),
        Paragraph::Checklist { items } => {
            container(CHECKLIST, items.iter().map(checklist_item_to_node).collect())
        }
    }
}

fn leaf_block(kind: &str, content: &[Span]) -> Node {
    let mut leaves = Vec::new();
    for span in content {
        flatten_span(span, &mut leaves);
    }
    if leaves.is_empty() {
        leaves.push(Node::text(""));
    }
    Node::element(kind, leaves)
}

fn flatten_span(span: &Span, out: &mut Vec<Node>) {
    if !span.text.is_empty() {
        out.push(Node::text(span.text.as_str()));
    }
    for child in &span.children {
        flatten_span(child, out);
    }
}

// Keeps elements non-empty: an empty container gets an empty paragraph.
fn container(kind: &str, mut children: Vec<Node>) -> Node {
    if children.is_empty() {
        children.push(leaf_block(PARAGRAPH, &[]));
    }
    Node::element(kind, children)
}

fn list_node(kind: &str, entries: &[Vec<Paragraph>]) -> Node {
    let items = entries
        .iter()
        .map(|entry| container(LIST_ITEM, entry.iter().map(paragraph_to_node).collect()))
        .collect();
    container(kind, items)
}

fn checklist_item_to_node(item: &ChecklistItem) -> Node {
    let mut children = vec![leaf_block(PARAGRAPH, &item.content)];
    if !item.children.is_empty() {
        children.push(Node::element(
            CHECKLIST,
            item.children.iter().map(checklist_item_to_node).collect(),
        ));
    }
    Node::Element(
        Element::new(LIST_ITEM)
            .with_attribute(CHECKED, item.checked.to_string())
            .with_children(children),
    )
}

// ============================================================================
// tree -> tdoc
// ============================================================================

pub fn to_tdoc(document: &Document) -> tdoc::Document {
    tdoc::Document::new().with_paragraphs(nodes_to_paragraphs(&document.children))
}

fn nodes_to_paragraphs(nodes: &[Node]) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();
    let mut loose = Vec::new();
    for node in nodes {
        match node {
            Node::Text(text) => loose.push(Span::new_text(text.text.as_str())),
            Node::Element(element) => {
                if !loose.is_empty() {
                    paragraphs.push(Paragraph::Text {
                        content: std::mem::take(&mut loose),
                    });
                }
                paragraphs.extend(element_to_paragraphs(element));
            }
        }
    }
    if !loose.is_empty() {
        paragraphs.push(Paragraph::Text { content: loose });
    }
    paragraphs
}

fn element_to_paragraphs(element: &Element) -> Vec<Paragraph> {
    let paragraph = match element.kind.as_str() {
        PARAGRAPH => Paragraph::Text {
            content: spans(element),
        },
        HEADING_ONE => Paragraph::Header1 {
            content: spans(element),
        },
        HEADING_TWO => Paragraph::Header2 {
            content: spans(element),
        },
        HEADING_THREE => Paragraph::Header3 {
            content: spans(element),
        },
        CODE_BLOCK => Paragraph::CodeBlock {
            content: spans(element),
        },
        BLOCKQUOTE => Paragraph::Quote {
            children: nodes_to_paragraphs(&element.children),
        },
        LIST => Paragraph::UnorderedList {
            entries: entries(element),
        },
        NUMBERED_LIST => Paragraph::OrderedList {
            entries: entries(element),
        },
        CHECKLIST => Paragraph::Checklist {
            items: checklist_items(element),
        },
        // Unknown containers dissolve into their children.
        _ if element.children.iter().any(|c| c.as_element().is_some()) => {
            return nodes_to_paragraphs(&element.children);
        }
        _ => Paragraph::Text {
            content: spans(element),
        },
    };
    vec![paragraph]
}

fn spans(element: &Element) -> Vec<Span> {
    let text = Node::Element(element.clone()).string();
    vec![Span::new_text(text.as_str())]
}

fn entries(list: &Element) -> Vec<Vec<Paragraph>> {
    list.children
        .iter()
        .map(|item| nodes_to_paragraphs(item.children()))
        .collect()
}

fn checklist_items(list: &Element) -> Vec<ChecklistItem> {
    list.children
        .iter()
        .filter_map(Node::as_element)
        .map(|item| {
            let checked = item.attributes.get(CHECKED).is_some_and(|v| v == "true");
            let mut content = Vec::new();
            let mut children = Vec::new();
            for child in &item.children {
                match child {
                    Node::Element(nested) if nested.kind == CHECKLIST => {
                        children.extend(checklist_items(nested));
                    }
                    other => content.push(Span::new_text(other.string().as_str())),
                }
            }
            if content.is_empty() {
                content.push(Span::new_text(""));
            }
            let mut converted = ChecklistItem::new(checked).with_content(content);
            converted.children = children;
            converted
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tdoc::ftml;

    #[test]
    fn lists_become_list_items_holding_paragraphs() {
        let doc = from_tdoc(&ftml! {
            ul {
                li { p { "Item 1" } }
                li {
                    p { "Item 2" }
                    ol { li { p { "Sub" } } }
                }
            }
        });
        assert_eq!(
            doc,
            Document::new().with_children(vec![Node::element(
                LIST,
                vec![
                    Node::element(LIST_ITEM, vec![Node::element(PARAGRAPH, vec![Node::text("Item 1")])]),
                    Node::element(
                        LIST_ITEM,
                        vec![
                            Node::element(PARAGRAPH, vec![Node::text("Item 2")]),
                            Node::element(
                                NUMBERED_LIST,
                                vec![Node::element(
                                    LIST_ITEM,
                                    vec![Node::element(PARAGRAPH, vec![Node::text("Sub")])],
                                )],
                            ),
                        ],
                    ),
                ],
            )])
        );
    }

    #[test]
    fn empty_paragraph_gets_an_empty_leaf() {
        let doc = from_tdoc(&ftml! { p {} });
        assert_eq!(
            doc.children,
            vec![Node::element(PARAGRAPH, vec![Node::text("")])]
        );
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn tree_converts_back_to_equivalent_tdoc() {
        let original = ftml! {
            quote { p { "Quoted" } }
            ul {
                li { p { "A" } }
                li { p { "B" } }
            }
        };
        let tree = from_tdoc(&original);
        assert_eq!(from_tdoc(&to_tdoc(&tree)), tree);
    }

    #[test]
    fn checklist_state_is_kept_as_attribute() {
        let list = Paragraph::Checklist {
            items: vec![ChecklistItem::new(true).with_content(vec![Span::new_text("Done")])],
        };
        let tree = from_tdoc(&tdoc::Document::new().with_paragraphs(vec![list]));
        let item = tree.node(&crate::editor::Path::new(vec![0, 0])).and_then(Node::as_element);
        assert_eq!(item.and_then(|i| i.attributes.get(CHECKED)).map(String::as_str), Some("true"));

        let back = to_tdoc(&tree);
        let Paragraph::Checklist { items } = &back.paragraphs[0] else {
            panic!("expected a checklist");
        };
        assert!(items[0].checked);
        assert_eq!(items[0].content[0].text, "Done");
    }
}
