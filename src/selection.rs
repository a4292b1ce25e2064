//! Selection and caret positions within the document surface.
//!
//! Positions address a character offset inside a block; a selection is an
//! anchor/focus pair that collapses to a caret when both ends coincide.
//! Selections are transient: the host reports them on every interaction and
//! the editor clamps them to document bounds, but they are never persisted.

/// A position within the document: block index plus character offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// Index of the block.
    pub block: usize,
    /// Character offset within the block's text.
    pub offset: usize,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }

    /// The start of the document.
    #[must_use]
    pub const fn start() -> Self {
        Self::new(0, 0)
    }
}

/// A selection range with an anchor (where it began) and a focus (where it
/// currently ends). Anchor and focus may be in either document order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// The fixed end of the selection.
    pub anchor: Position,
    /// The moving end of the selection.
    pub focus: Position,
}

impl Selection {
    /// Create a selection from anchor to focus.
    #[must_use]
    pub const fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    /// Create a collapsed selection (caret) at a position.
    #[must_use]
    pub const fn caret(at: Position) -> Self {
        Self {
            anchor: at,
            focus: at,
        }
    }

    /// Check whether the selection is collapsed to a caret.
    #[must_use]
    pub fn is_caret(&self) -> bool {
        self.anchor == self.focus
    }

    /// The selection ends in document order.
    #[must_use]
    pub fn normalized(&self) -> (Position, Position) {
        if self.anchor <= self.focus {
            (self.anchor, self.focus)
        } else {
            (self.focus, self.anchor)
        }
    }

    /// The earlier end in document order.
    #[must_use]
    pub fn start(&self) -> Position {
        self.normalized().0
    }

    /// The later end in document order.
    #[must_use]
    pub fn end(&self) -> Position {
        self.normalized().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(0, 5) < Position::new(1, 0));
        assert!(Position::new(1, 2) < Position::new(1, 3));
        assert_eq!(Position::new(2, 4), Position::new(2, 4));
    }

    #[test]
    fn test_caret_is_collapsed() {
        let caret = Selection::caret(Position::new(0, 3));
        assert!(caret.is_caret());
        assert_eq!(caret.start(), caret.end());
    }

    #[test]
    fn test_normalized_orders_backwards_selection() {
        let sel = Selection::new(Position::new(1, 4), Position::new(0, 2));
        let (start, end) = sel.normalized();
        assert_eq!(start, Position::new(0, 2));
        assert_eq!(end, Position::new(1, 4));
        assert!(!sel.is_caret());
    }
}
