//! Fuzz target for editor command dispatch.
//!
//! Drives an editor with arbitrary selections and commands, checking that
//! dispatch never panics and the document always reserializes.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use richtext_core::{
    Command, Editor, EditorOptions, ListKind, Position, Selection,
};

#[derive(Arbitrary, Debug)]
enum FuzzCommand {
    Bold,
    Italic,
    Underline,
    UnorderedList,
    OrderedList,
    ParagraphBreak,
    DeleteBackward,
    DeleteForward,
    Undo,
    Redo,
    InsertText(String),
    InsertLink(String),
}

#[derive(Arbitrary, Debug)]
struct Step {
    anchor: (u8, u8),
    focus: (u8, u8),
    command: FuzzCommand,
}

#[derive(Arbitrary, Debug)]
struct Plan {
    initial: String,
    steps: Vec<Step>,
}

fuzz_target!(|plan: Plan| {
    let mut ed = Editor::new(EditorOptions {
        initial_markup: plan.initial,
        placeholder: None,
    });

    for step in plan.steps.into_iter().take(64) {
        ed.set_selection(Selection::new(
            Position::new(step.anchor.0 as usize, step.anchor.1 as usize),
            Position::new(step.focus.0 as usize, step.focus.1 as usize),
        ));
        let command = match step.command {
            FuzzCommand::Bold => Command::ToggleBold,
            FuzzCommand::Italic => Command::ToggleItalic,
            FuzzCommand::Underline => Command::ToggleUnderline,
            FuzzCommand::UnorderedList => Command::ToggleList(ListKind::Unordered),
            FuzzCommand::OrderedList => Command::ToggleList(ListKind::Ordered),
            FuzzCommand::ParagraphBreak => Command::InsertParagraphBreak,
            FuzzCommand::DeleteBackward => Command::DeleteBackward,
            FuzzCommand::DeleteForward => Command::DeleteForward,
            FuzzCommand::Undo => Command::Undo,
            FuzzCommand::Redo => Command::Redo,
            FuzzCommand::InsertText(text) => Command::InsertText(text),
            FuzzCommand::InsertLink(url) => Command::InsertLink { url },
        };
        ed.dispatch(command);
        let _ = ed.serialize();
    }
});
