//! The owned, mutable document surface and its explicit edit operations.
//!
//! There is no opaque command interpreter underneath: every command is an
//! explicit structural edit against the block list, so selection queries
//! and undo granularity are fully reproducible.
//!
//! # Examples
//!
//! ```
//! use richtext_core::{DocumentSurface, InlineFormat, Position};
//!
//! let mut surface = DocumentSurface::new();
//! surface.initialize("<p>Hello</p>");
//!
//! let start = Position::new(0, 0);
//! let end = Position::new(0, 5);
//! surface.toggle_inline(start, end, InlineFormat::BOLD);
//! assert_eq!(surface.serialize(), "<p><strong>Hello</strong></p>");
//! ```

use tracing::{debug, trace};
use unicode_segmentation::UnicodeSegmentation;

use crate::document::block::{Block, BlockKind, ListKind};
use crate::document::span::{self, Span};
use crate::format::InlineFormat;
use crate::link::HrefPool;
use crate::markup;
use crate::selection::{Position, Selection};

/// Label used when a link is inserted at a caret with no selected text.
pub const DEFAULT_LINK_LABEL: &str = "Link";

/// A restorable snapshot of the surface, used as a history entry.
#[derive(Clone, Debug)]
pub struct DocumentSnapshot {
    blocks: Vec<Block>,
    hrefs: HrefPool,
    selection: Selection,
}

impl DocumentSnapshot {
    /// The selection captured with this snapshot.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub(crate) fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }
}

/// The live document: a block list plus the hyperlink pool.
///
/// Owned exclusively by one editor instance. Seeded at most once via
/// [`initialize`](Self::initialize); every later mutation goes through the
/// explicit edit operations below. The surface always holds at least one
/// block (an empty paragraph when there is no content).
#[derive(Debug)]
pub struct DocumentSurface {
    blocks: Vec<Block>,
    hrefs: HrefPool,
    initialized: bool,
}

impl Default for DocumentSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSurface {
    /// Create an empty surface: one empty paragraph, not yet initialized.
    #[must_use]
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::paragraph()],
            hrefs: HrefPool::new(),
            initialized: false,
        }
    }

    /// Seed the surface from a markup string, exactly once.
    ///
    /// Returns `true` if the surface was seeded. Repeat calls are no-ops
    /// returning `false`: a live surface never clobbers in-progress edits
    /// with a stale host value.
    pub fn initialize(&mut self, markup: &str) -> bool {
        if self.initialized {
            debug!("initialize called on a live surface; ignoring");
            return false;
        }
        self.initialized = true;
        let (blocks, hrefs) = markup::parse(markup);
        self.blocks = if blocks.is_empty() {
            vec![Block::paragraph()]
        } else {
            blocks
        };
        self.hrefs = hrefs;
        debug!(blocks = self.blocks.len(), "surface seeded");
        true
    }

    /// Serialize the current content to its markup string.
    ///
    /// Feeding the result back through [`initialize`](Self::initialize)
    /// reproduces an equivalent structure.
    #[must_use]
    pub fn serialize(&self) -> String {
        markup::write(&self.blocks, &self.hrefs)
    }

    /// The block list.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The hyperlink pool.
    #[must_use]
    pub fn hrefs(&self) -> &HrefPool {
        &self.hrefs
    }

    /// Check whether the document holds any content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.len() == 1
            && self.blocks[0].kind == BlockKind::Paragraph
            && self.blocks[0].is_empty()
    }

    /// The document's text with all formatting stripped, blocks joined by
    /// newlines.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&block.text());
        }
        out
    }

    /// Clamp a position to document bounds.
    #[must_use]
    pub fn clamp_position(&self, pos: Position) -> Position {
        let block = pos.block.min(self.blocks.len() - 1);
        let offset = pos.offset.min(self.blocks[block].len_chars());
        Position::new(block, offset)
    }

    /// Clamp both ends of a selection to document bounds.
    #[must_use]
    pub fn clamp_selection(&self, sel: Selection) -> Selection {
        Selection::new(
            self.clamp_position(sel.anchor),
            self.clamp_position(sel.focus),
        )
    }

    /// The format pending input at a caret would adopt: the format of the
    /// preceding character, or the following one at a block start.
    #[must_use]
    pub fn typing_format(&self, pos: Position) -> InlineFormat {
        let pos = self.clamp_position(pos);
        let block = &self.blocks[pos.block];
        if block.kind == BlockKind::Raw {
            return InlineFormat::empty();
        }
        let probe = if pos.offset > 0 { pos.offset - 1 } else { 0 };
        block.format_at(probe).unwrap_or_default()
    }

    /// Style flags that hold uniformly across every character of a range.
    ///
    /// An empty range (or one spanning no characters) reports no flags.
    /// Raw blocks are not editable and are excluded, matching
    /// [`toggle_inline`](Self::toggle_inline).
    #[must_use]
    pub fn uniform_flags(&self, start: Position, end: Position) -> InlineFormat {
        let start = self.clamp_position(start);
        let end = self.clamp_position(end);
        if start >= end {
            return InlineFormat::empty();
        }
        let mut acc = InlineFormat::all();
        let mut any = false;
        for b in start.block..=end.block {
            let block = &self.blocks[b];
            if block.kind == BlockKind::Raw {
                continue;
            }
            let (s, e) = self.local_range(b, start, end);
            if s >= e {
                continue;
            }
            let mut cum = 0;
            for sp in &block.spans {
                let span_start = cum;
                cum += sp.len_chars();
                if cum <= s {
                    continue;
                }
                if span_start >= e {
                    break;
                }
                any = true;
                acc &= sp.format.flags_only();
            }
        }
        if any { acc } else { InlineFormat::empty() }
    }

    /// Number of characters covered by a range.
    #[must_use]
    pub fn range_char_count(&self, start: Position, end: Position) -> usize {
        let start = self.clamp_position(start);
        let end = self.clamp_position(end);
        if start >= end {
            return 0;
        }
        (start.block..=end.block)
            .map(|b| {
                let (s, e) = self.local_range(b, start, end);
                e.saturating_sub(s)
            })
            .sum()
    }

    /// Insert text at a position with the given format.
    ///
    /// Returns the caret position after the inserted text. Text inserted
    /// into a raw block is kept unformatted.
    pub fn insert_text(&mut self, pos: Position, text: &str, format: InlineFormat) -> Position {
        if text.is_empty() {
            return self.clamp_position(pos);
        }
        let pos = self.clamp_position(pos);
        let format = if self.blocks[pos.block].kind == BlockKind::Raw {
            InlineFormat::empty()
        } else {
            format
        };
        let i = self.split_point(pos.block, pos.offset);
        if let Some(id) = format.href_id() {
            self.hrefs.retain(id);
        }
        self.blocks[pos.block].spans.insert(i, Span::new(text, format));
        span::normalize(&mut self.blocks[pos.block].spans, &mut self.hrefs);
        trace!(block = pos.block, chars = text.chars().count(), "insert");
        Position::new(pos.block, pos.offset + text.chars().count())
    }

    /// Delete a range of content. Blocks joined by the deletion merge into
    /// the range's first block. Returns whether anything changed.
    pub fn delete_range(&mut self, start: Position, end: Position) -> bool {
        let start = self.clamp_position(start);
        let end = self.clamp_position(end);
        if start >= end {
            return false;
        }
        if start.block == end.block {
            let i = self.split_point(start.block, start.offset);
            let j = self.split_point(start.block, end.offset);
            let removed: Vec<Span> = self.blocks[start.block].spans.drain(i..j).collect();
            span::release_all(&removed, &mut self.hrefs);
        } else {
            let i = self.split_point(start.block, start.offset);
            let removed: Vec<Span> = self.blocks[start.block].spans.drain(i..).collect();
            span::release_all(&removed, &mut self.hrefs);

            let j = self.split_point(end.block, end.offset);
            let head: Vec<Span> = self.blocks[end.block].spans.drain(..j).collect();
            span::release_all(&head, &mut self.hrefs);

            let tail: Vec<Span> = self.blocks[end.block].spans.drain(..).collect();
            self.blocks[start.block].spans.extend(tail);

            let removed_blocks: Vec<Block> = self
                .blocks
                .drain(start.block + 1..=end.block)
                .collect();
            for blk in &removed_blocks {
                span::release_all(&blk.spans, &mut self.hrefs);
            }
        }
        span::normalize(&mut self.blocks[start.block].spans, &mut self.hrefs);
        trace!(?start, ?end, "delete range");
        true
    }

    /// Delete one grapheme cluster before the caret, merging with the
    /// previous block at a block start. Returns the new caret, or `None`
    /// at the document start.
    pub fn delete_backward(&mut self, caret: Position) -> Option<Position> {
        let caret = self.clamp_position(caret);
        if caret.offset > 0 {
            let text = self.blocks[caret.block].text();
            let target = Position::new(caret.block, prev_grapheme_start(&text, caret.offset));
            self.delete_range(target, caret);
            Some(target)
        } else if caret.block > 0 {
            let target = Position::new(caret.block - 1, self.blocks[caret.block - 1].len_chars());
            self.delete_range(target, caret);
            Some(target)
        } else {
            None
        }
    }

    /// Delete one grapheme cluster after the caret, merging with the next
    /// block at a block end. Returns the caret, or `None` at the document
    /// end.
    pub fn delete_forward(&mut self, caret: Position) -> Option<Position> {
        let caret = self.clamp_position(caret);
        if caret.offset < self.blocks[caret.block].len_chars() {
            let text = self.blocks[caret.block].text();
            let end = Position::new(caret.block, next_grapheme_end(&text, caret.offset));
            self.delete_range(caret, end);
            Some(caret)
        } else if caret.block + 1 < self.blocks.len() {
            self.delete_range(caret, Position::new(caret.block + 1, 0));
            Some(caret)
        } else {
            None
        }
    }

    /// Split a block at a position, returning the caret at the start of the
    /// new block.
    ///
    /// List items continue as list items; splitting a heading yields a
    /// paragraph for the second half. A break on an empty list item exits
    /// the list instead of adding another item.
    pub fn split_block(&mut self, pos: Position) -> Position {
        let pos = self.clamp_position(pos);
        let kind = self.blocks[pos.block].kind;
        if matches!(kind, BlockKind::ListItem(_)) && self.blocks[pos.block].is_empty() {
            self.blocks[pos.block].kind = BlockKind::Paragraph;
            return Position::new(pos.block, 0);
        }
        let i = self.split_point(pos.block, pos.offset);
        let tail = self.blocks[pos.block].spans.split_off(i);
        let new_kind = match kind {
            BlockKind::Heading | BlockKind::Raw => BlockKind::Paragraph,
            other => other,
        };
        self.blocks.insert(
            pos.block + 1,
            Block {
                kind: new_kind,
                spans: tail,
            },
        );
        Position::new(pos.block + 1, 0)
    }

    /// Toggle a style flag across a range.
    ///
    /// If the flag already holds uniformly over the range it is removed,
    /// otherwise it is applied everywhere, so a double toggle restores the
    /// original state. Raw blocks are skipped. Returns whether anything
    /// changed.
    pub fn toggle_inline(&mut self, start: Position, end: Position, flag: InlineFormat) -> bool {
        let start = self.clamp_position(start);
        let end = self.clamp_position(end);
        if start >= end {
            return false;
        }
        let enable = !self.uniform_flags(start, end).contains(flag);
        let mut changed = false;
        for b in start.block..=end.block {
            if self.blocks[b].kind == BlockKind::Raw {
                continue;
            }
            let (s, e) = self.local_range(b, start, end);
            if s >= e {
                continue;
            }
            let i = self.split_point(b, s);
            let j = self.split_point(b, e);
            for sp in &mut self.blocks[b].spans[i..j] {
                if enable != sp.format.contains(flag) {
                    sp.format.set(flag, enable);
                    changed = true;
                }
            }
            span::normalize(&mut self.blocks[b].spans, &mut self.hrefs);
        }
        changed
    }

    /// Set the kind of every block a range touches. Converting a raw block
    /// keeps its stored markup as literal text. Returns whether any kind
    /// changed.
    pub fn set_block_kind(&mut self, start: Position, end: Position, kind: BlockKind) -> bool {
        let start = self.clamp_position(start);
        let end = self.clamp_position(end);
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let mut changed = false;
        for b in start.block..=end.block {
            if self.blocks[b].kind != kind {
                self.blocks[b].kind = kind;
                changed = true;
            }
        }
        changed
    }

    /// Toggle list membership for every block a range touches: if all of
    /// them are already items of this kind they revert to paragraphs,
    /// otherwise they all become items. Returns whether anything changed.
    pub fn toggle_list(&mut self, start: Position, end: Position, kind: ListKind) -> bool {
        let start = self.clamp_position(start);
        let end = self.clamp_position(end);
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let all_items = (start.block..=end.block)
            .all(|b| self.blocks[b].kind == BlockKind::ListItem(kind));
        let target = if all_items {
            BlockKind::Paragraph
        } else {
            BlockKind::ListItem(kind)
        };
        self.set_block_kind(start, end, target)
    }

    /// Turn the selected text into a hyperlink, or insert a labelled anchor
    /// at a caret. Returns the resulting selection, or `None` if nothing
    /// changed (empty URL, or a range covering no linkable text).
    pub fn insert_link(&mut self, start: Position, end: Position, url: &str) -> Option<Selection> {
        if url.is_empty() {
            return None;
        }
        let start = self.clamp_position(start);
        let end = self.clamp_position(end);
        let (start, end) = if start <= end { (start, end) } else { (end, start) };

        if self.range_char_count(start, end) == 0 {
            if self.blocks[start.block].kind == BlockKind::Raw {
                return None;
            }
            let id = self.hrefs.insert(url);
            let after = self.insert_text(
                start,
                DEFAULT_LINK_LABEL,
                InlineFormat::empty().with_href_id(id),
            );
            return Some(Selection::new(start, after));
        }

        let id = self.hrefs.insert(url);
        let mut assigned = 0usize;
        for b in start.block..=end.block {
            if self.blocks[b].kind == BlockKind::Raw {
                continue;
            }
            let (s, e) = self.local_range(b, start, end);
            if s >= e {
                continue;
            }
            let i = self.split_point(b, s);
            let j = self.split_point(b, e);
            for sp in &mut self.blocks[b].spans[i..j] {
                if let Some(old) = sp.format.href_id() {
                    self.hrefs.release(old);
                }
                sp.format = sp.format.with_href_id(id);
                self.hrefs.retain(id);
                assigned += 1;
            }
            span::normalize(&mut self.blocks[b].spans, &mut self.hrefs);
        }
        if assigned == 0 {
            // No span adopted the id, give the slot back
            self.hrefs.release(id);
            None
        } else {
            Some(Selection::new(start, end))
        }
    }

    /// Capture a restorable snapshot of the surface plus a selection.
    #[must_use]
    pub fn snapshot(&self, selection: Selection) -> DocumentSnapshot {
        DocumentSnapshot {
            blocks: self.blocks.clone(),
            hrefs: self.hrefs.clone(),
            selection,
        }
    }

    /// Restore the surface from a snapshot, returning its selection.
    pub fn restore(&mut self, snapshot: &DocumentSnapshot) -> Selection {
        self.blocks = snapshot.blocks.clone();
        self.hrefs = snapshot.hrefs.clone();
        self.clamp_selection(snapshot.selection)
    }

    /// The portion of a document range local to one block, in character
    /// offsets within that block.
    fn local_range(&self, b: usize, start: Position, end: Position) -> (usize, usize) {
        let s = if b == start.block { start.offset } else { 0 };
        let e = if b == end.block {
            end.offset
        } else {
            self.blocks[b].len_chars()
        };
        (s, e)
    }

    /// Ensure a span boundary exists at a character offset, splitting a run
    /// if necessary, and return the index of the span starting there.
    fn split_point(&mut self, block_idx: usize, offset: usize) -> usize {
        let mut cum = 0;
        let mut i = 0;
        while i < self.blocks[block_idx].spans.len() {
            if offset == cum {
                return i;
            }
            let len = self.blocks[block_idx].spans[i].len_chars();
            if offset < cum + len {
                let tail = self.blocks[block_idx].spans[i].split_off_chars(offset - cum);
                if let Some(id) = tail.format.href_id() {
                    self.hrefs.retain(id);
                }
                self.blocks[block_idx].spans.insert(i + 1, tail);
                return i + 1;
            }
            cum += len;
            i += 1;
        }
        self.blocks[block_idx].spans.len()
    }
}

/// Start (in chars) of the grapheme cluster ending at `offset`.
fn prev_grapheme_start(text: &str, offset: usize) -> usize {
    let mut cum = 0;
    for g in text.graphemes(true) {
        let len = g.chars().count();
        if offset <= cum + len {
            return cum;
        }
        cum += len;
    }
    cum
}

/// End (in chars) of the grapheme cluster containing `offset`.
fn next_grapheme_end(text: &str, offset: usize) -> usize {
    let mut cum = 0;
    for g in text.graphemes(true) {
        let len = g.chars().count();
        if offset < cum + len {
            return cum + len;
        }
        cum += len;
    }
    cum
}
