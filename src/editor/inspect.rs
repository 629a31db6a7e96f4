use crate::config::BreakConfig;
use crate::document::{Document, Element, Node};

use super::content::{char_len, is_rendered_empty};
use super::{Path, Point};

pub fn first_leaf_path(children: &[Node], base: &Path) -> Option<Path> {
    for (idx, child) in children.iter().enumerate() {
        let path = base.child(idx);
        match child {
            Node::Text(_) => return Some(path),
            Node::Element(element) => {
                if let Some(found) = first_leaf_path(&element.children, &path) {
                    return Some(found);
                }
            }
        }
    }
    None
}

pub fn last_leaf_path(children: &[Node], base: &Path) -> Option<Path> {
    for (idx, child) in children.iter().enumerate().rev() {
        let path = base.child(idx);
        match child {
            Node::Text(_) => return Some(path),
            Node::Element(element) => {
                if let Some(found) = last_leaf_path(&element.children, &path) {
                    return Some(found);
                }
            }
        }
    }
    None
}

/// Every text leaf of the document, in document order.
pub fn leaf_paths(document: &Document) -> Vec<Path> {
    let mut out = Vec::new();
    collect_leaf_paths(&document.children, &Path::root(), None, &mut out);
    out
}

fn collect_leaf_paths(
    children: &[Node],
    base: &Path,
    skip_lists: Option<&BreakConfig>,
    out: &mut Vec<Path>,
) {
    for (idx, child) in children.iter().enumerate() {
        let path = base.child(idx);
        match child {
            Node::Text(_) => out.push(path),
            Node::Element(element) => {
                if skip_lists.is_some_and(|config| config.is_list(&element.kind)) {
                    continue;
                }
                collect_leaf_paths(&element.children, &path, skip_lists, out);
            }
        }
    }
}

pub(crate) fn text_at<'a>(document: &'a Document, path: &Path) -> Option<&'a str> {
    document
        .node(path)?
        .as_text()
        .map(|text| text.text.as_str())
}

pub(crate) fn element_at<'a>(document: &'a Document, path: &Path) -> Option<&'a Element> {
    document.node(path)?.as_element()
}

/// Nearest ancestor of `path` that is a list item.
pub fn find_list_item_path(document: &Document, path: &Path, config: &BreakConfig) -> Option<Path> {
    path.ancestors().find(|ancestor| {
        element_at(document, ancestor).is_some_and(|element| config.is_list_item(&element.kind))
    })
}

/// Outermost list in the unbroken chain of list / list item ancestors above
/// `item_path`.
pub fn topmost_list_path(
    document: &Document,
    item_path: &Path,
    config: &BreakConfig,
) -> Option<Path> {
    let mut topmost = None;
    for ancestor in item_path.ancestors() {
        let Some(element) = element_at(document, &ancestor) else {
            break;
        };
        if config.is_list(&element.kind) {
            topmost = Some(ancestor);
        } else if !config.is_list_item(&element.kind) {
            break;
        }
    }
    topmost
}

/// Lowest ancestor of a leaf that is a block rather than an inline element.
pub fn lowest_block_path(document: &Document, path: &Path, config: &BreakConfig) -> Option<Path> {
    path.ancestors().find(|ancestor| {
        element_at(document, ancestor).is_some_and(|element| !config.is_inline(&element.kind))
    })
}

/// Leaves holding an item's own content, nested lists excluded.
pub(crate) fn item_content_leaves(item: &Element, item_path: &Path, config: &BreakConfig) -> Vec<Path> {
    let mut out = Vec::new();
    collect_leaf_paths(&item.children, item_path, Some(config), &mut out);
    out
}

pub fn item_content_text(item: &Element, config: &BreakConfig) -> String {
    item.children
        .iter()
        .filter(|child| {
            child
                .as_element()
                .is_none_or(|element| !config.is_list(&element.kind))
        })
        .map(|child| content_string(child, config))
        .collect()
}

fn content_string(node: &Node, config: &BreakConfig) -> String {
    match node {
        Node::Text(text) => text.text.clone(),
        Node::Element(element) if config.is_list(&element.kind) => String::new(),
        Node::Element(element) => element
            .children
            .iter()
            .map(|child| content_string(child, config))
            .collect(),
    }
}

pub fn list_item_is_empty(item: &Element, config: &BreakConfig) -> bool {
    is_rendered_empty(&item_content_text(item, config))
}

/// True when no content char of the item follows `point`.
pub fn point_at_item_end(
    document: &Document,
    item_path: &Path,
    point: &Point,
    config: &BreakConfig,
) -> bool {
    let Some(item) = element_at(document, item_path) else {
        return false;
    };
    item_content_leaves(item, item_path, config)
        .iter()
        .filter(|leaf| **leaf >= point.path)
        .all(|leaf| {
            let len = text_at(document, leaf).map(char_len).unwrap_or(0);
            if *leaf == point.path {
                point.offset >= len
            } else {
                len == 0
            }
        })
}
