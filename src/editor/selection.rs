use crate::document::{Document, Node};

use super::content::char_len;
use super::inspect::{first_leaf_path, last_leaf_path, text_at};
use super::{EditorError, Path, Point, Selection};

/// Resolves `point` to an equivalent point inside a text leaf.
///
/// Element points use the offset as a child index: `i < len` lands at the
/// start of child `i`, `i == len` lands at the end of the last child.
pub fn normalize_point(document: &Document, point: &Point) -> Result<Point, EditorError> {
    let children = if point.path.is_root() {
        &document.children
    } else {
        match document.node(&point.path) {
            Some(Node::Text(text)) => {
                let len = text.char_len();
                if point.offset > len {
                    return Err(EditorError::invalid(
                        point.path.clone(),
                        format!("offset {} beyond text length {len}", point.offset),
                    ));
                }
                return Ok(point.clone());
            }
            Some(Node::Element(element)) => &element.children,
            None => {
                return Err(EditorError::invalid(
                    point.path.clone(),
                    "path does not resolve to a node",
                ));
            }
        }
    };

    if point.offset > children.len() {
        return Err(EditorError::invalid(
            point.path.clone(),
            format!("child index {} beyond {} children", point.offset, children.len()),
        ));
    }

    let resolved = if point.offset < children.len() {
        let range = &children[point.offset..=point.offset];
        first_leaf_path(range, &Path::root()).map(|leaf| {
            let mut indices = point.path.indices().to_vec();
            indices.push(point.offset);
            indices.extend_from_slice(&leaf.indices()[1..]);
            Point::new(Path::new(indices), 0)
        })
    } else {
        last_leaf_path(children, &point.path).map(|leaf| {
            let len = text_at(document, &leaf).map(char_len).unwrap_or(0);
            Point::new(leaf, len)
        })
    };

    resolved.ok_or_else(|| EditorError::invalid(point.path.clone(), "no text leaf below point"))
}

pub fn normalize_selection(document: &Document, selection: &Selection) -> Result<Selection, EditorError> {
    Ok(Selection::new(
        normalize_point(document, &selection.anchor)?,
        normalize_point(document, &selection.focus)?,
    ))
}

/// Start and end of a leaf-normalized selection in document order.
pub(crate) fn edges(selection: &Selection) -> (Point, Point) {
    if selection.anchor <= selection.focus {
        (selection.anchor.clone(), selection.focus.clone())
    } else {
        (selection.focus.clone(), selection.anchor.clone())
    }
}

/// Collapsed selection at the start of the first leaf below `path`.
pub(crate) fn collapse_to_start_of(document: &Document, path: &Path) -> Result<Selection, EditorError> {
    let node = document
        .node(path)
        .ok_or_else(|| EditorError::structural(path.clone(), "new node does not resolve"))?;
    let leaf = match node {
        Node::Text(_) => Some(path.clone()),
        Node::Element(element) => first_leaf_path(&element.children, path),
    };
    leaf.map(|leaf| Selection::collapsed(Point::new(leaf, 0)))
        .ok_or_else(|| EditorError::structural(path.clone(), "new node holds no text leaf"))
}

/// Checks a selection produced by a structural edit.
pub(crate) fn ensure_well_formed(document: &Document, selection: &Selection) -> Result<(), EditorError> {
    let focus = &selection.focus;
    if !selection.is_collapsed() {
        return Err(EditorError::structural(
            focus.path.clone(),
            "resulting selection is not collapsed",
        ));
    }
    match text_at(document, &focus.path) {
        Some(text) if focus.offset <= char_len(text) => Ok(()),
        _ => Err(EditorError::structural(
            focus.path.clone(),
            "resulting selection does not resolve",
        )),
    }
}
