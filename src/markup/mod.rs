//! Markup serialization: the persisted string form of the document.
//!
//! The supported subset is paragraphs with inline bold/italic/underline
//! spans, level-2 headings, ordered and unordered lists, blockquotes,
//! preformatted code blocks, and hyperlinks. [`parse`] is best-effort and
//! never fails; [`write`] emits a canonical form that [`parse`] maps back
//! to an equivalent document.

pub mod parser;
pub mod writer;

pub use parser::parse;
pub use writer::write;
