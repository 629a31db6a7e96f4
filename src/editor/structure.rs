use tracing::trace;

use crate::document::{Document, Node, Text};

use super::content::split_text;
use super::{EditorError, Path};

// ============================================================================
// Node access
// ============================================================================

pub(crate) fn text_mut<'a>(document: &'a mut Document, path: &Path) -> Result<&'a mut Text, EditorError> {
    document
        .node_mut(path)
        .and_then(Node::as_text_mut)
        .ok_or_else(|| EditorError::invalid(path.clone(), "path does not resolve to a text leaf"))
}

pub(crate) fn insert_node(document: &mut Document, path: &Path, node: Node) -> Result<(), EditorError> {
    let (parent, idx) = split_parent(path)?;
    let siblings = document
        .children_at_mut(&parent)
        .ok_or_else(|| EditorError::structural(path.clone(), "insertion parent does not resolve"))?;
    if idx > siblings.len() {
        return Err(EditorError::structural(
            path.clone(),
            format!("insertion index {idx} beyond {} children", siblings.len()),
        ));
    }
    trace!(%path, "insert node");
    siblings.insert(idx, node);
    Ok(())
}

pub(crate) fn remove_node(document: &mut Document, path: &Path) -> Result<Node, EditorError> {
    let (parent, idx) = split_parent(path)?;
    let siblings = document
        .children_at_mut(&parent)
        .filter(|siblings| idx < siblings.len())
        .ok_or_else(|| EditorError::structural(path.clone(), "removed node does not resolve"))?;
    trace!(%path, "remove node");
    Ok(siblings.remove(idx))
}

fn split_parent(path: &Path) -> Result<(Path, usize), EditorError> {
    match (path.parent(), path.last()) {
        (Some(parent), Some(idx)) => Ok((parent, idx)),
        _ => Err(EditorError::structural(path.clone(), "the root has no parent")),
    }
}

// ============================================================================
// Splitting
// ============================================================================

/// Splits `children` at the char `offset` of the leaf addressed by `path`
/// (relative to `children`) and returns everything after the split point.
///
/// Elements cut by the split keep their left part in place; a shallow copy
/// holding the right part leads the returned nodes. The split leaf always
/// leaves a (possibly empty) text node on both sides, so neither half ends up
/// without children.
pub(crate) fn split_nodes(children: &mut Vec<Node>, path: &[usize], offset: usize) -> Option<Vec<Node>> {
    let (&idx, rest) = path.split_first()?;
    if idx >= children.len() {
        return None;
    }

    let mut trailing = children.split_off(idx + 1);

    let head = match &mut children[idx] {
        Node::Text(text) if rest.is_empty() => {
            let (left, right) = split_text(&text.text, offset);
            text.text = left;
            Node::text(right)
        }
        Node::Element(element) if !rest.is_empty() => {
            let tail = split_nodes(&mut element.children, rest, offset)?;
            Node::Element(element.shallow_clone().with_children(tail))
        }
        _ => return None,
    };

    trailing.insert(0, head);
    Some(trailing)
}

// ============================================================================
// Pruning
// ============================================================================

/// Removes the element at `from` if it has no children, then keeps walking up
/// while ancestors are left empty. Never goes above `stop_at` when given.
/// Returns the highest removed path.
pub(crate) fn prune_childless(document: &mut Document, from: &Path, stop_at: Option<&Path>) -> Option<Path> {
    let mut current = from.clone();
    let mut removed = None;
    while !current.is_root() {
        let childless = document
            .node(&current)
            .and_then(Node::as_element)
            .is_some_and(|element| element.children.is_empty());
        if !childless || remove_node(document, &current).is_err() {
            break;
        }
        removed = Some(current.clone());
        if stop_at == Some(&current) {
            break;
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    removed
}

pub(crate) fn prune_all_childless(document: &mut Document) {
    fn prune(children: &mut Vec<Node>) {
        for child in children.iter_mut() {
            if let Node::Element(element) = child {
                prune(&mut element.children);
            }
        }
        children.retain(|child| {
            child
                .as_element()
                .is_none_or(|element| !element.children.is_empty())
        });
    }
    prune(&mut document.children);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn split_nodes_cuts_through_nested_elements() {
        let mut children = vec![
            Node::text("ab"),
            Node::element("link", vec![Node::text("cd"), Node::text("ef")]),
            Node::text("gh"),
        ];
        let tail = split_nodes(&mut children, &[1, 0], 1).unwrap();
        assert_eq!(
            children,
            vec![
                Node::text("ab"),
                Node::element("link", vec![Node::text("c")]),
            ]
        );
        assert_eq!(
            tail,
            vec![
                Node::element("link", vec![Node::text("d"), Node::text("ef")]),
                Node::text("gh"),
            ]
        );
    }

    #[test]
    fn split_nodes_rejects_paths_ending_on_elements() {
        let mut children = vec![Node::element("paragraph", vec![Node::text("x")])];
        assert!(split_nodes(&mut children, &[0], 0).is_none());
        assert!(split_nodes(&mut children, &[3, 0], 0).is_none());
    }

    #[test]
    fn prune_childless_climbs_until_stop() {
        let mut doc = Document::new().with_children(vec![
            Node::element("paragraph", vec![Node::text("keep")]),
            Node::element(
                "list",
                vec![Node::element("list-item", vec![Node::element("list", vec![])])],
            ),
        ]);
        let removed = prune_childless(&mut doc, &Path::new(vec![1, 0, 0]), Some(&Path::new(vec![1])));
        assert_eq!(removed, Some(Path::new(vec![1])));
        assert_eq!(doc.children.len(), 1);
    }

    #[test]
    fn prune_all_childless_keeps_populated_elements() {
        let mut doc = Document::new().with_children(vec![
            Node::element("list", vec![Node::element("list-item", vec![])]),
            Node::element("paragraph", vec![Node::text("")]),
        ]);
        prune_all_childless(&mut doc);
        assert_eq!(
            doc.children,
            vec![Node::element("paragraph", vec![Node::text("")])]
        );
    }

    #[test]
    fn insert_node_checks_bounds() {
        let mut doc = Document::new().with_children(vec![Node::element(
            "paragraph",
            vec![Node::text("a")],
        )]);
        assert!(insert_node(&mut doc, &Path::new(vec![0, 1]), Node::text("b")).is_ok());
        assert!(insert_node(&mut doc, &Path::new(vec![0, 5]), Node::text("c")).is_err());
        assert_eq!(doc.string(), "ab");
    }
}
