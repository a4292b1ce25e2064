//! Block-level document structure.
//!
//! The document is a flat list of blocks. List items are individual blocks;
//! the markup writer groups consecutive items of the same kind under one
//! list element. Unsupported markup survives as [`BlockKind::Raw`] blocks
//! whose text is written back verbatim, so a round-trip never strips
//! content the editor does not understand.

use crate::document::span::Span;
use crate::format::InlineFormat;

/// Ordering of a list block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    /// Bulleted list.
    Unordered,
    /// Numbered list.
    Ordered,
}

/// The kind of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    /// Plain paragraph.
    Paragraph,
    /// Level-2 heading.
    Heading,
    /// Block quotation.
    Quote,
    /// Preformatted code block.
    Code,
    /// One item of a list.
    ListItem(ListKind),
    /// Unsupported markup preserved verbatim.
    Raw,
}

/// A block of content: a kind plus a styled run-list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// Block-level type.
    pub kind: BlockKind,
    /// Inline content as styled runs. Empty for an empty block.
    pub spans: Vec<Span>,
}

impl Block {
    /// Create an empty block of a kind.
    #[must_use]
    pub const fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            spans: Vec::new(),
        }
    }

    /// Create an empty paragraph.
    #[must_use]
    pub const fn paragraph() -> Self {
        Self::new(BlockKind::Paragraph)
    }

    /// Create a block with unformatted text.
    #[must_use]
    pub fn with_text(kind: BlockKind, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind,
            spans: if text.is_empty() {
                Vec::new()
            } else {
                vec![Span::plain(text)]
            },
        }
    }

    /// Create a raw passthrough block holding a verbatim markup fragment.
    #[must_use]
    pub fn raw(markup: impl Into<String>) -> Self {
        Self::with_text(BlockKind::Raw, markup)
    }

    /// Length of the block's text in characters.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.spans.iter().map(Span::len_chars).sum()
    }

    /// Check whether the block holds no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(Span::is_empty)
    }

    /// The block's text with formatting stripped.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            out.push_str(&span.text);
        }
        out
    }

    /// Format of the character at a character offset, if in bounds.
    #[must_use]
    pub fn format_at(&self, char_offset: usize) -> Option<InlineFormat> {
        let mut remaining = char_offset;
        for span in &self.spans {
            let len = span.len_chars();
            if remaining < len {
                return Some(span.format);
            }
            remaining -= len;
        }
        None
    }
}
