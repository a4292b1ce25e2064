//! The editor: one document surface, one selection, one history.
//!
//! [`Editor`] is the host-facing type. It owns the [`DocumentSurface`],
//! tracks the live [`Selection`], records one history entry per accepted
//! mutation, and reports each content change through an optional callback.
//! Commands that change nothing (a toggle at a caret, backspace at the
//! document start) neither record history nor fire the callback.

use tracing::debug;

use crate::command::{BlockTag, Command, LinkPrompt, MutationResult};
use crate::document::DocumentSurface;
use crate::error::Result;
use crate::format::{self, InlineFormat};
use crate::history::History;
use crate::input::{KeyCode, KeyEvent, KeyModifiers};
use crate::selection::{Position, Selection};

/// Placeholder text seeded into an empty block converted to a quote.
const QUOTE_SEED: &str = "Enter quote...";
/// Placeholder text seeded into an empty block converted to code.
const CODE_SEED: &str = "// Code here...";

/// Construction options for [`Editor`].
#[derive(Clone, Debug, Default)]
pub struct EditorOptions {
    /// Markup the document mounts with.
    pub initial_markup: String,
    /// Hint text the host shows while the document is empty.
    pub placeholder: Option<String>,
}

/// A rich-text editor instance.
pub struct Editor {
    surface: DocumentSurface,
    selection: Selection,
    history: History,
    placeholder: Option<String>,
    on_change: Option<Box<dyn FnMut(&str)>>,
}

impl Editor {
    /// Create an editor seeded from the given options.
    #[must_use]
    pub fn new(options: EditorOptions) -> Self {
        let mut surface = DocumentSurface::new();
        surface.initialize(&options.initial_markup);
        let selection = Selection::caret(Position::new(0, 0));
        let history = History::new(surface.snapshot(selection));
        Self {
            surface,
            selection,
            history,
            placeholder: options.placeholder,
            on_change: None,
        }
    }

    /// Register the change callback, invoked once with the serialized
    /// markup after every accepted mutation.
    pub fn set_on_change(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// The document surface.
    #[must_use]
    pub fn surface(&self) -> &DocumentSurface {
        &self.surface
    }

    /// The current selection.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Move the selection. Never records history or fires the change
    /// callback.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = self.surface.clamp_selection(selection);
    }

    /// Style flags active at the selection, for toolbar button state.
    #[must_use]
    pub fn active_formats(&self) -> InlineFormat {
        format::active_formats(&self.surface, &self.selection)
    }

    /// Serialize the document to markup.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.surface.serialize()
    }

    /// The document text with formatting stripped.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        self.surface.to_plain_text()
    }

    /// Whether the document holds no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surface.is_empty()
    }

    /// The placeholder to show, present only while the document is empty.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        if self.is_empty() {
            self.placeholder.as_deref()
        } else {
            None
        }
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Parse a toolbar action name and dispatch it.
    pub fn dispatch_named(&mut self, name: &str, arg: Option<&str>) -> Result<MutationResult> {
        let command = Command::from_name(name, arg)?;
        Ok(self.dispatch(command))
    }

    /// Execute a command against the current selection.
    ///
    /// Every command that changes content records exactly one history entry
    /// (undo and redo restore instead of recording) and fires the change
    /// callback once.
    pub fn dispatch(&mut self, command: Command) -> MutationResult {
        debug!(?command, "dispatch");
        let before = self.selection;
        let (changed, restored) = self.apply(command);
        if changed {
            if !restored {
                // Undoing this edit must put the selection back where the
                // edit was made, not where it sat when the previous entry
                // was recorded.
                self.history.set_current_selection(before);
                self.history.record(self.surface.snapshot(self.selection));
            }
            if let Some(callback) = self.on_change.as_mut() {
                let markup = self.surface.serialize();
                callback(&markup);
            }
        }
        MutationResult {
            changed,
            selection: self.selection,
        }
    }

    /// Run the link command, asking the host for the URL. A dismissed
    /// prompt changes nothing.
    pub fn insert_link_via(&mut self, prompt: &mut dyn LinkPrompt) -> MutationResult {
        match prompt.request_url() {
            Some(url) => self.dispatch(Command::InsertLink { url }),
            None => MutationResult {
                changed: false,
                selection: self.selection,
            },
        }
    }

    /// Translate a key event into a command and dispatch it.
    ///
    /// Returns `true` when the event was consumed, even if the resulting
    /// command changed nothing.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        if event.is_bold_chord() {
            self.dispatch(Command::ToggleBold);
            return true;
        }
        if event.is_italic_chord() {
            self.dispatch(Command::ToggleItalic);
            return true;
        }
        if event.is_underline_chord() {
            self.dispatch(Command::ToggleUnderline);
            return true;
        }
        if event.is_redo_chord() {
            self.dispatch(Command::Redo);
            return true;
        }
        if event.is_undo_chord() {
            self.dispatch(Command::Undo);
            return true;
        }
        match event.code {
            KeyCode::Enter => {
                self.dispatch(Command::InsertParagraphBreak);
                true
            }
            KeyCode::Backspace => {
                self.dispatch(Command::DeleteBackward);
                true
            }
            KeyCode::Delete => {
                self.dispatch(Command::DeleteForward);
                true
            }
            KeyCode::Char(ch)
                if !event
                    .modifiers
                    .intersects(KeyModifiers::CTRL | KeyModifiers::SUPER | KeyModifiers::ALT) =>
            {
                self.dispatch(Command::InsertText(ch.to_string()));
                true
            }
            _ => false,
        }
    }

    /// Apply a command, returning (content changed, state was restored from
    /// history).
    fn apply(&mut self, command: Command) -> (bool, bool) {
        let (start, end) = self.selection.normalized();
        match command {
            Command::ToggleBold => (self.toggle(start, end, InlineFormat::BOLD), false),
            Command::ToggleItalic => (self.toggle(start, end, InlineFormat::ITALIC), false),
            Command::ToggleUnderline => (self.toggle(start, end, InlineFormat::UNDERLINE), false),
            Command::SetBlock(tag) => (self.set_block(start, end, tag), false),
            Command::ToggleList(kind) => (self.surface.toggle_list(start, end, kind), false),
            Command::InsertLink { url } => match self.surface.insert_link(start, end, &url) {
                Some(selection) => {
                    self.selection = selection;
                    (true, false)
                }
                None => (false, false),
            },
            Command::InsertText(text) => {
                if text.is_empty() {
                    return (false, false);
                }
                if start < end {
                    self.surface.delete_range(start, end);
                }
                let format = self.surface.typing_format(start);
                let caret = self.surface.insert_text(start, &text, format);
                self.selection = Selection::caret(caret);
                (true, false)
            }
            Command::InsertParagraphBreak => {
                if start < end {
                    self.surface.delete_range(start, end);
                }
                let caret = self.surface.split_block(start);
                self.selection = Selection::caret(caret);
                (true, false)
            }
            Command::DeleteBackward => {
                if start < end {
                    self.surface.delete_range(start, end);
                    self.selection = Selection::caret(start);
                    return (true, false);
                }
                match self.surface.delete_backward(start) {
                    Some(caret) => {
                        self.selection = Selection::caret(caret);
                        (true, false)
                    }
                    None => (false, false),
                }
            }
            Command::DeleteForward => {
                if start < end {
                    self.surface.delete_range(start, end);
                    self.selection = Selection::caret(start);
                    return (true, false);
                }
                match self.surface.delete_forward(start) {
                    Some(caret) => {
                        self.selection = Selection::caret(caret);
                        (true, false)
                    }
                    None => (false, false),
                }
            }
            Command::Undo => match self.history.undo() {
                Some(snapshot) => {
                    self.selection = self.surface.restore(snapshot);
                    (true, true)
                }
                None => (false, false),
            },
            Command::Redo => match self.history.redo() {
                Some(snapshot) => {
                    self.selection = self.surface.restore(snapshot);
                    (true, true)
                }
                None => (false, false),
            },
        }
    }

    /// Inline toggles require a selected range; at a caret they change
    /// nothing.
    fn toggle(&mut self, start: Position, end: Position, flag: InlineFormat) -> bool {
        if start == end {
            return false;
        }
        let changed = self.surface.toggle_inline(start, end, flag);
        if changed {
            self.selection = Selection::new(start, end);
        }
        changed
    }

    fn set_block(&mut self, start: Position, end: Position, tag: BlockTag) -> bool {
        let mut changed = self.surface.set_block_kind(start, end, tag.kind());

        // Converting an empty block to a quote or code block seeds it with
        // placeholder text, selected so the next keystroke replaces it.
        if start == end && self.surface.blocks()[start.block].is_empty() {
            let seed = match tag {
                BlockTag::Quote => Some(QUOTE_SEED),
                BlockTag::Code => Some(CODE_SEED),
                BlockTag::Paragraph | BlockTag::Heading => None,
            };
            if let Some(seed) = seed {
                let from = Position::new(start.block, 0);
                let to = self.surface.insert_text(from, seed, InlineFormat::empty());
                self.selection = Selection::new(from, to);
                changed = true;
            }
        }
        changed
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("surface", &self.surface)
            .field("selection", &self.selection)
            .field("history", &self.history)
            .field("placeholder", &self.placeholder)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}
