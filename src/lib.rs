//! `richtext_core` - Rich-text editor core
//!
//! A headless WYSIWYG editing engine: a block/span document model with a
//! canonical markup serialization, an explicit command dispatcher, a
//! selection-driven format-state tracker, and snapshot-based undo/redo.
//! Hosts render the document and feed back selections and key events; the
//! engine owns every mutation.

// Crate-level lint configuration
#![allow(dead_code)] // Public API functions not yet used internally
#![allow(clippy::module_name_repetitions)] // Allow BlockKind, KeyEvent etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::cast_possible_truncation)] // Href ids are bounded to 24 bits

pub mod command;
pub mod document;
pub mod editor;
pub mod error;
pub mod format;
pub mod history;
pub mod input;
pub mod link;
pub mod markup;
pub mod selection;

// Re-export core types at crate root
pub use command::{BlockTag, Command, LinkPrompt, MutationResult};
pub use document::{
    Block, BlockKind, DEFAULT_LINK_LABEL, DocumentSnapshot, DocumentSurface, ListKind, Span,
};
pub use editor::{Editor, EditorOptions};
pub use error::{Error, Result};
pub use format::{InlineFormat, active_formats};
pub use history::{DEFAULT_HISTORY_DEPTH, History};
pub use link::HrefPool;
pub use selection::{Position, Selection};

// Re-export input types
pub use input::{KeyCode, KeyEvent, KeyModifiers};
