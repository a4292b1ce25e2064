//! Keyboard input types and editing-shortcut recognition.

pub mod keyboard;

pub use keyboard::{KeyCode, KeyEvent, KeyModifiers};
