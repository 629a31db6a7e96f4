//! List-aware paragraph breaking for structured rich-text documents.
//!
//! [`attempt_list_break`] decides what the break (Enter) key does when the
//! cursor sits inside a list: split the item, leave the list from an empty
//! item, add a soft line break, or hand over to the host's plain break
//! command. [`DocumentEditor`] wraps it the way a hosting editor would.

pub mod config;
pub mod document;
pub mod editor;
pub mod interop;

pub use config::BreakConfig;
pub use document::{Document, Element, Node, Text};
pub use editor::{
    BreakAction, BreakOutcome, DefaultInsertBreak, DelegateReason, DocumentEditor, EditorError,
    InsertBreak, Path, Point, Selection, attempt_list_break,
};
