use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::config::BreakConfig;
use crate::document::{Document, Node};

mod content;
mod default_break;
mod inspect;
mod list_break;
mod selection;
mod structure;

pub use default_break::{DefaultInsertBreak, InsertBreak};
pub use list_break::{BreakAction, BreakOutcome, DelegateReason, attempt_list_break};
pub use selection::{normalize_point, normalize_selection};

use inspect::first_leaf_path;

/// Address of a node as child indices from the document root.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path {
    indices: Vec<usize>,
}

impl Path {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_root(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn push(&mut self, idx: usize) {
        self.indices.push(idx);
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.indices.pop()
    }

    pub fn last(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    pub fn child(&self, idx: usize) -> Self {
        let mut indices = self.indices.clone();
        indices.push(idx);
        Self { indices }
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, head) = self.indices.split_last()?;
        Some(Self::new(head.to_vec()))
    }

    pub fn next_sibling(&self) -> Option<Self> {
        let (last, head) = self.indices.split_last()?;
        let mut indices = head.to_vec();
        indices.push(last + 1);
        Some(Self { indices })
    }

    /// True when `self` is a strict prefix of `other`.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.indices.len() < other.indices.len() && other.indices.starts_with(&self.indices)
    }

    /// Strict ancestors, nearest first, excluding the root.
    pub fn ancestors(&self) -> impl Iterator<Item = Path> + '_ {
        (1..self.indices.len())
            .rev()
            .map(|len| Path::new(self.indices[..len].to_vec()))
    }

    /// Remainder of `self` below `ancestor`.
    pub fn relative_to(&self, ancestor: &Path) -> Option<&[usize]> {
        self.indices.strip_prefix(ancestor.indices.as_slice())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.indices)
    }
}

/// A location in the tree: a char offset into a text leaf, or a child index
/// into an element.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: Path, offset: usize) -> Self {
        Self { path, offset }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("invalid selection at {path}: {reason}")]
    InvalidSelection { path: Path, reason: String },
    #[error("structural invariant violated at {path}: {reason}")]
    StructuralInvariantViolation { path: Path, reason: String },
}

impl EditorError {
    pub(crate) fn invalid(path: Path, reason: impl Into<String>) -> Self {
        Self::InvalidSelection {
            path,
            reason: reason.into(),
        }
    }

    pub(crate) fn structural(path: Path, reason: impl Into<String>) -> Self {
        Self::StructuralInvariantViolation {
            path,
            reason: reason.into(),
        }
    }
}

/// Owns a document and its selection the way a hosting editor does, and
/// commits the result of every break back into itself.
pub struct DocumentEditor {
    document: Document,
    selection: Selection,
    config: BreakConfig,
}

impl DocumentEditor {
    pub fn new(document: Document) -> Self {
        Self::with_config(document, BreakConfig::default())
    }

    pub fn with_config(mut document: Document, config: BreakConfig) -> Self {
        ensure_document_initialized(&mut document, &config);
        let selection = Selection::collapsed(Point::new(
            first_leaf_path(&document.children, &Path::root()).unwrap_or_default(),
            0,
        ));
        Self {
            document,
            selection,
            config,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &BreakConfig {
        &self.config
    }

    pub fn set_selection(&mut self, selection: Selection) -> Result<(), EditorError> {
        self.selection = normalize_selection(&self.document, &selection)?;
        Ok(())
    }

    pub fn move_to(&mut self, point: Point) -> Result<(), EditorError> {
        self.set_selection(Selection::collapsed(point))
    }

    pub fn insert_paragraph_break(&mut self) -> Result<bool, EditorError> {
        self.insert_break(false).map(|_| true)
    }

    pub fn insert_soft_break(&mut self) -> Result<bool, EditorError> {
        self.insert_break(true).map(|_| true)
    }

    pub fn insert_break(&mut self, soft_break: bool) -> Result<BreakAction, EditorError> {
        self.insert_break_with(soft_break, &DefaultInsertBreak)
    }

    /// Runs the list-aware break with a host supplied fallback command.
    pub fn insert_break_with<B: InsertBreak + ?Sized>(
        &mut self,
        soft_break: bool,
        fallback: &B,
    ) -> Result<BreakAction, EditorError> {
        let outcome = attempt_list_break(
            &self.document,
            &self.selection,
            soft_break,
            &self.config,
            fallback,
        )?;
        debug!(action = ?outcome.action, handled = outcome.handled, "break committed");
        self.document = outcome.document;
        self.selection = outcome.selection;
        Ok(outcome.action)
    }
}

fn ensure_document_initialized(document: &mut Document, config: &BreakConfig) {
    if document.children.is_empty() {
        document
            .children
            .push(Node::element(config.paragraph.clone(), vec![Node::text("")]));
    }
}

#[cfg(test)]
#[path = "editor_tests.rs"]
mod editor_tests;
