//! The document surface: the live, mutable structure backing the editor.
//!
//! The model is a flat list of [`Block`]s, each holding a run-list of
//! styled [`Span`]s. [`DocumentSurface`] owns the blocks together with the
//! hyperlink pool and performs every edit as an explicit structural
//! mutation at character-offset precision.

pub mod block;
pub mod span;
pub mod surface;

pub use block::{Block, BlockKind, ListKind};
pub use span::Span;
pub use surface::{DEFAULT_LINK_LABEL, DocumentSnapshot, DocumentSurface};
