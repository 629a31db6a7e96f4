use tracing::trace;

use crate::config::BreakConfig;
use crate::document::{Document, Node};

use super::content::remove_char_range;
use super::inspect::{leaf_paths, lowest_block_path};
use super::selection::{collapse_to_start_of, edges, normalize_selection};
use super::structure::{
    insert_node, prune_all_childless, prune_childless, remove_node, split_nodes, text_mut,
};
use super::{EditorError, Path, Point, Selection};

/// The host's plain "insert a break at the cursor" command.
pub trait InsertBreak {
    fn insert_break(
        &self,
        document: &Document,
        selection: &Selection,
        config: &BreakConfig,
    ) -> Result<(Document, Selection), EditorError>;
}

impl<F> InsertBreak for F
where
    F: Fn(&Document, &Selection, &BreakConfig) -> Result<(Document, Selection), EditorError>,
{
    fn insert_break(
        &self,
        document: &Document,
        selection: &Selection,
        config: &BreakConfig,
    ) -> Result<(Document, Selection), EditorError> {
        self(document, selection, config)
    }
}

/// Deletes an expanded selection, then splits the enclosing block in two.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultInsertBreak;

impl InsertBreak for DefaultInsertBreak {
    fn insert_break(
        &self,
        document: &Document,
        selection: &Selection,
        config: &BreakConfig,
    ) -> Result<(Document, Selection), EditorError> {
        let selection = normalize_selection(document, selection)?;
        let mut document = document.clone();
        let point = if selection.is_collapsed() {
            selection.focus
        } else {
            delete_range(&mut document, &selection, config)?
        };
        let selection = split_block_at(&mut document, &point, config)?;
        Ok((document, selection))
    }
}

/// Removes the content covered by a leaf-normalized selection and returns the
/// collapsed point where it started.
pub(crate) fn delete_range(
    document: &mut Document,
    selection: &Selection,
    config: &BreakConfig,
) -> Result<Point, EditorError> {
    let (start, end) = edges(selection);
    if start.path == end.path {
        remove_char_range(&mut text_mut(document, &start.path)?.text, start.offset, end.offset);
        return Ok(start);
    }

    remove_char_range(&mut text_mut(document, &start.path)?.text, start.offset, usize::MAX);
    remove_char_range(&mut text_mut(document, &end.path)?.text, 0, end.offset);

    let between: Vec<_> = leaf_paths(document)
        .into_iter()
        .filter(|path| *path > start.path && *path < end.path)
        .collect();
    for path in between.iter().rev() {
        remove_node(document, path)?;
    }
    prune_all_childless(document);
    trace!(removed = between.len(), "deleted leaves inside range");

    // Nothing is left between the two edges, so the end leaf now directly
    // follows the start leaf.
    let leaves = leaf_paths(document);
    let end_leaf = leaves
        .iter()
        .position(|path| *path == start.path)
        .and_then(|idx| leaves.get(idx + 1))
        .cloned();

    if let Some(end_leaf) = end_leaf {
        let start_block = lowest_block_path(document, &start.path, config);
        let end_block = lowest_block_path(document, &end_leaf, config);
        if let (Some(start_block), Some(end_block)) = (start_block, end_block) {
            let disjoint = start_block != end_block
                && !start_block.is_ancestor_of(&end_block)
                && !end_block.is_ancestor_of(&start_block);
            if disjoint {
                merge_blocks(document, &start_block, &end_block)?;
            }
        }
    }

    Ok(start)
}

fn merge_blocks(
    document: &mut Document,
    target: &Path,
    source: &Path,
) -> Result<(), EditorError> {
    let Node::Element(removed) = remove_node(document, source)? else {
        return Err(EditorError::structural(source.clone(), "merged block is a text leaf"));
    };
    let target_children = document
        .children_at_mut(target)
        .ok_or_else(|| EditorError::structural(target.clone(), "merge target does not resolve"))?;
    target_children.extend(removed.children);
    if let Some(parent) = source.parent() {
        prune_childless(document, &parent, None);
    }
    trace!(%target, %source, "merged blocks");
    Ok(())
}

/// Splits the lowest block around `point` and places the cursor at the start
/// of the new block.
pub(crate) fn split_block_at(
    document: &mut Document,
    point: &Point,
    config: &BreakConfig,
) -> Result<Selection, EditorError> {
    let block_path = lowest_block_path(document, &point.path, config)
        .ok_or_else(|| EditorError::invalid(point.path.clone(), "point is not inside a block"))?;
    let relative = point
        .path
        .relative_to(&block_path)
        .map(<[usize]>::to_vec)
        .unwrap_or_default();

    let block = document
        .node_mut(&block_path)
        .and_then(Node::as_element_mut)
        .ok_or_else(|| EditorError::invalid(block_path.clone(), "block does not resolve"))?;
    let tail = split_nodes(&mut block.children, &relative, point.offset)
        .ok_or_else(|| EditorError::structural(point.path.clone(), "split point does not resolve"))?;
    let new_block = block.shallow_clone().with_children(tail);

    let new_path = block_path
        .next_sibling()
        .ok_or_else(|| EditorError::structural(block_path.clone(), "block has no parent"))?;
    insert_node(document, &new_path, new_block.into())?;
    trace!(block = %block_path, "split block");
    collapse_to_start_of(document, &new_path)
}
