//! Keyboard events and the editing chords the editor consumes.
//!
//! The "primary" modifier is Ctrl or the platform command key; chords are
//! recognized with either so the same wiring works on every platform.

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
        const SUPER = 0b0000_1000;
    }
}

/// A physical key, normalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    Esc,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

/// A key press with its modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    /// A key press with no modifiers.
    #[must_use]
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::empty(),
        }
    }

    /// A key press with modifiers.
    #[must_use]
    pub fn with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// A character key with the primary modifier held.
    #[must_use]
    pub fn primary_chord(ch: char) -> Self {
        Self::with_modifiers(KeyCode::Char(ch), KeyModifiers::CTRL)
    }

    /// Whether the primary chord modifier (Ctrl or the command key) is held.
    #[must_use]
    pub fn primary(&self) -> bool {
        self.modifiers
            .intersects(KeyModifiers::CTRL | KeyModifiers::SUPER)
    }

    fn primary_char(&self, ch: char) -> bool {
        self.primary()
            && !self.modifiers.contains(KeyModifiers::ALT)
            && matches!(self.code, KeyCode::Char(c) if c.eq_ignore_ascii_case(&ch))
    }

    /// Primary+B.
    #[must_use]
    pub fn is_bold_chord(&self) -> bool {
        self.primary_char('b') && !self.modifiers.contains(KeyModifiers::SHIFT)
    }

    /// Primary+I.
    #[must_use]
    pub fn is_italic_chord(&self) -> bool {
        self.primary_char('i') && !self.modifiers.contains(KeyModifiers::SHIFT)
    }

    /// Primary+U.
    #[must_use]
    pub fn is_underline_chord(&self) -> bool {
        self.primary_char('u') && !self.modifiers.contains(KeyModifiers::SHIFT)
    }

    /// Primary+Z without Shift.
    #[must_use]
    pub fn is_undo_chord(&self) -> bool {
        self.primary_char('z') && !self.modifiers.contains(KeyModifiers::SHIFT)
    }

    /// Primary+Shift+Z or Primary+Y.
    #[must_use]
    pub fn is_redo_chord(&self) -> bool {
        (self.primary_char('z') && self.modifiers.contains(KeyModifiers::SHIFT))
            || (self.primary_char('y') && !self.modifiers.contains(KeyModifiers::SHIFT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_accepts_ctrl_or_super() {
        let ctrl = KeyEvent::with_modifiers(KeyCode::Char('b'), KeyModifiers::CTRL);
        let cmd = KeyEvent::with_modifiers(KeyCode::Char('b'), KeyModifiers::SUPER);
        assert!(ctrl.is_bold_chord());
        assert!(cmd.is_bold_chord());
        assert!(!KeyEvent::new(KeyCode::Char('b')).is_bold_chord());
    }

    #[test]
    fn test_chords_ignore_letter_case() {
        let upper = KeyEvent::with_modifiers(KeyCode::Char('I'), KeyModifiers::CTRL);
        assert!(upper.is_italic_chord());
    }

    #[test]
    fn test_undo_redo_chords() {
        let undo = KeyEvent::primary_chord('z');
        let redo_shift = KeyEvent::with_modifiers(
            KeyCode::Char('Z'),
            KeyModifiers::CTRL | KeyModifiers::SHIFT,
        );
        let redo_y = KeyEvent::primary_chord('y');
        assert!(undo.is_undo_chord());
        assert!(!undo.is_redo_chord());
        assert!(redo_shift.is_redo_chord());
        assert!(!redo_shift.is_undo_chord());
        assert!(redo_y.is_redo_chord());
    }

    #[test]
    fn test_alt_disables_chords() {
        let ev = KeyEvent::with_modifiers(
            KeyCode::Char('b'),
            KeyModifiers::CTRL | KeyModifiers::ALT,
        );
        assert!(!ev.is_bold_chord());
    }
}
