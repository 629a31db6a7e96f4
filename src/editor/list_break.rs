//! List-aware handling of the break (Enter) command.
//!
//! The decision is re-derived from the tree and the selection on every call:
//!
//! 1. an expanded selection is handed to the fallback break command;
//! 2. a cursor outside any list item is handed to the fallback as well;
//! 3. a cursor inside a non-empty item splits the item in two;
//! 4. a cursor inside an empty item leaves the whole list nesting and
//!    continues in a new paragraph after it;
//! 5. with a soft break requested at the end of an item, a line break leaf is
//!    added to the item instead of splitting it.

use tracing::{debug, trace};

use crate::config::BreakConfig;
use crate::document::{Document, Element, Node};

use super::default_break::InsertBreak;
use super::inspect::{
    element_at, find_list_item_path, item_content_text, list_item_is_empty, point_at_item_end,
    topmost_list_path,
};
use super::selection::{collapse_to_start_of, ensure_well_formed, normalize_selection};
use super::structure::{insert_node, prune_childless, remove_node, split_nodes};
use super::{EditorError, Path, Point, Selection};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelegateReason {
    ExpandedSelection,
    OutsideListItem,
    SoftBreakFallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreakAction {
    Delegated(DelegateReason),
    SplitItem,
    ExitList,
    SoftBreak,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreakOutcome {
    pub handled: bool,
    pub document: Document,
    pub selection: Selection,
    pub action: BreakAction,
}

/// Applies the break command to `document` at `selection`.
///
/// The input tree is never modified. On error no partial result is returned.
pub fn attempt_list_break<B: InsertBreak + ?Sized>(
    document: &Document,
    selection: &Selection,
    soft_break: bool,
    config: &BreakConfig,
    fallback: &B,
) -> Result<BreakOutcome, EditorError> {
    let normalized = normalize_selection(document, selection)?;

    if !normalized.is_collapsed() {
        return delegate(document, selection, config, fallback, DelegateReason::ExpandedSelection);
    }

    let point = normalized.focus;
    let Some(item_path) = find_list_item_path(document, &point.path, config) else {
        return delegate(document, selection, config, fallback, DelegateReason::OutsideListItem);
    };
    let item = element_at(document, &item_path)
        .ok_or_else(|| EditorError::invalid(item_path.clone(), "list item does not resolve"))?;

    if list_item_is_empty(item, config) {
        return exit_list(document, &item_path, config);
    }

    if soft_break {
        if point_at_item_end(document, &item_path, &point, config) {
            return insert_line_break(document, &item_path, &point, config);
        }
        return delegate(document, selection, config, fallback, DelegateReason::SoftBreakFallback);
    }

    split_list_item(document, &item_path, &point, config)
}

fn delegate<B: InsertBreak + ?Sized>(
    document: &Document,
    selection: &Selection,
    config: &BreakConfig,
    fallback: &B,
    reason: DelegateReason,
) -> Result<BreakOutcome, EditorError> {
    debug!(?reason, "delegating break to fallback command");
    let (document, selection) = fallback.insert_break(document, selection, config)?;
    Ok(BreakOutcome {
        handled: true,
        document,
        selection,
        action: BreakAction::Delegated(reason),
    })
}

fn split_list_item(
    document: &Document,
    item_path: &Path,
    point: &Point,
    config: &BreakConfig,
) -> Result<BreakOutcome, EditorError> {
    debug!(item = %item_path, offset = point.offset, "splitting list item");
    let relative = point
        .path
        .relative_to(item_path)
        .ok_or_else(|| EditorError::invalid(point.path.clone(), "point is outside the list item"))?;

    let mut next = document.clone();
    let item = next
        .node_mut(item_path)
        .and_then(Node::as_element_mut)
        .ok_or_else(|| EditorError::invalid(item_path.clone(), "list item does not resolve"))?;
    let original_text = item_content_text(item, config);

    let tail = split_nodes(&mut item.children, relative, point.offset)
        .ok_or_else(|| EditorError::invalid(point.path.clone(), "point does not resolve to a text leaf"))?;

    // Nested lists stay attached to the original item.
    let (sub_lists, content): (Vec<Node>, Vec<Node>) = tail
        .into_iter()
        .partition(|node| node.as_element().is_some_and(|e| config.is_list(&e.kind)));
    item.children.extend(sub_lists);

    if content.is_empty() {
        return Err(EditorError::structural(
            item_path.clone(),
            "split left the new list item without content",
        ));
    }
    let new_item = item.shallow_clone().with_children(content);

    let joined = item_content_text(item, config) + &item_content_text(&new_item, config);
    if joined != original_text {
        return Err(EditorError::structural(
            item_path.clone(),
            "split did not preserve the item's content",
        ));
    }

    let new_path = item_path
        .next_sibling()
        .ok_or_else(|| EditorError::structural(item_path.clone(), "list item has no parent"))?;
    insert_node(&mut next, &new_path, new_item.into())?;

    let selection = collapse_to_start_of(&next, &new_path)?;
    finish(next, selection, BreakAction::SplitItem)
}

fn exit_list(document: &Document, item_path: &Path, config: &BreakConfig) -> Result<BreakOutcome, EditorError> {
    let top = topmost_list_path(document, item_path, config)
        .ok_or_else(|| EditorError::structural(item_path.clone(), "list item is not inside a list"))?;
    debug!(item = %item_path, list = %top, "leaving list from empty item");

    let mut next = document.clone();
    let Node::Element(removed) = remove_node(&mut next, item_path)? else {
        return Err(EditorError::structural(item_path.clone(), "list item is a text leaf"));
    };

    let parent = item_path
        .parent()
        .ok_or_else(|| EditorError::structural(item_path.clone(), "list item has no parent"))?;
    let index = item_path.last().unwrap_or_default();
    let orphans = nested_list_items(removed, config);
    if !orphans.is_empty() {
        trace!(count = orphans.len(), "keeping nested items of the removed item");
        let siblings = next
            .children_at_mut(&parent)
            .ok_or_else(|| EditorError::structural(parent.clone(), "parent list does not resolve"))?;
        siblings.splice(index..index, orphans);
    }

    let removed_top = prune_childless(&mut next, &parent, Some(&top));
    let paragraph_path = match removed_top {
        Some(removed) if removed == top => top.clone(),
        _ => top
            .next_sibling()
            .ok_or_else(|| EditorError::structural(top.clone(), "list has no parent"))?,
    };
    let paragraph = Node::element(config.paragraph.clone(), vec![Node::text("")]);
    insert_node(&mut next, &paragraph_path, paragraph)?;

    let selection = collapse_to_start_of(&next, &paragraph_path)?;
    finish(next, selection, BreakAction::ExitList)
}

// Items of lists nested in an emptied item, so removing the item loses no text.
fn nested_list_items(item: Element, config: &BreakConfig) -> Vec<Node> {
    item.children
        .into_iter()
        .filter_map(|child| match child {
            Node::Element(list) if config.is_list(&list.kind) => Some(list.children),
            _ => None,
        })
        .flatten()
        .collect()
}

fn insert_line_break(
    document: &Document,
    item_path: &Path,
    point: &Point,
    config: &BreakConfig,
) -> Result<BreakOutcome, EditorError> {
    // The break goes after the outermost inline element holding the cursor.
    let anchor = point
        .path
        .ancestors()
        .take_while(|ancestor| {
            item_path.is_ancestor_of(ancestor)
                && element_at(document, ancestor).is_some_and(|e| config.is_inline(&e.kind))
        })
        .last()
        .unwrap_or_else(|| point.path.clone());
    debug!(leaf = %point.path, after = %anchor, "inserting soft line break");

    let mut next = document.clone();
    let break_path = anchor
        .next_sibling()
        .ok_or_else(|| EditorError::invalid(anchor.clone(), "text leaf has no parent"))?;
    insert_node(&mut next, &break_path, Node::text("\n"))?;
    let selection = Selection::collapsed(Point::new(break_path, 1));
    finish(next, selection, BreakAction::SoftBreak)
}

fn finish(document: Document, selection: Selection, action: BreakAction) -> Result<BreakOutcome, EditorError> {
    document.validate()?;
    ensure_well_formed(&document, &selection)?;
    Ok(BreakOutcome {
        handled: true,
        document,
        selection,
        action,
    })
}
