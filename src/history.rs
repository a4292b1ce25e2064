//! Linear undo/redo history over document snapshots.
//!
//! The history is a list of snapshots with a cursor pointing at the current
//! state. Entry zero is the state the editor mounted with, so undo can
//! always walk back to it. Recording a new state truncates everything after
//! the cursor, which is what discards the redo branch after a fresh edit.

use tracing::trace;

use crate::document::DocumentSnapshot;
use crate::selection::Selection;

/// Default cap on retained history entries.
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// Bounded linear history of [`DocumentSnapshot`]s.
#[derive(Debug)]
pub struct History {
    entries: Vec<DocumentSnapshot>,
    cursor: usize,
    max_depth: usize,
}

impl History {
    /// Start a history whose first entry is the initial document state.
    #[must_use]
    pub fn new(initial: DocumentSnapshot) -> Self {
        Self::with_max_depth(initial, DEFAULT_HISTORY_DEPTH)
    }

    /// Start a history with a custom retention cap (minimum 2, so there is
    /// always room for a current state and one undo step).
    #[must_use]
    pub fn with_max_depth(initial: DocumentSnapshot, max_depth: usize) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            max_depth: max_depth.max(2),
        }
    }

    /// Replace the selection stored with the current entry.
    ///
    /// Called right before recording a new edit: undoing that edit then
    /// restores the selection it was made from, not the selection that was
    /// live when this entry was first captured.
    pub fn set_current_selection(&mut self, selection: Selection) {
        self.entries[self.cursor].set_selection(selection);
    }

    /// Record a new current state, discarding any redo branch.
    pub fn record(&mut self, snapshot: DocumentSnapshot) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        self.cursor += 1;
        if self.entries.len() > self.max_depth {
            self.entries.remove(0);
            self.cursor -= 1;
        }
        trace!(depth = self.entries.len(), cursor = self.cursor, "record");
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Step back, returning the snapshot to restore. `None` at the oldest
    /// retained state.
    pub fn undo(&mut self) -> Option<&DocumentSnapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    /// Step forward, returning the snapshot to restore. `None` when no edit
    /// has been undone.
    pub fn redo(&mut self) -> Option<&DocumentSnapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A history always holds at least its initial entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}
