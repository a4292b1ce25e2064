//! End-to-end editing workflows through the public editor API.
//!
//! Each test drives the editor the way a host would: set a selection,
//! dispatch commands or key events, and assert on the serialized markup,
//! the active-format report, and undo/redo availability.

use std::cell::RefCell;
use std::rc::Rc;

use richtext_core::{
    BlockKind, BlockTag, Command, Editor, EditorOptions, InlineFormat, KeyCode, KeyEvent,
    KeyModifiers, ListKind, Position, Selection,
};

fn editor(markup: &str) -> Editor {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
    Editor::new(EditorOptions {
        initial_markup: markup.to_string(),
        placeholder: None,
    })
}

fn select(ed: &mut Editor, a: (usize, usize), f: (usize, usize)) {
    ed.set_selection(Selection::new(
        Position::new(a.0, a.1),
        Position::new(f.0, f.1),
    ));
}

// ============================================================================
// Formatting Workflows
// ============================================================================

/// Select a word, bold it, then extend selection and verify the mixed state.
#[test]
fn test_workflow_bold_word_then_mixed_report() {
    let mut ed = editor("<p>Hello world</p>");
    select(&mut ed, (0, 0), (0, 5));
    ed.dispatch(Command::ToggleBold);
    assert_eq!(ed.serialize(), "<p><strong>Hello</strong> world</p>");
    assert_eq!(ed.active_formats(), InlineFormat::BOLD);

    // Extend across the unbolded tail: no longer uniform
    select(&mut ed, (0, 0), (0, 11));
    assert_eq!(ed.active_formats(), InlineFormat::empty());

    // Toggling now bolds the whole range
    ed.dispatch(Command::ToggleBold);
    assert_eq!(ed.serialize(), "<p><strong>Hello world</strong></p>");
}

#[test]
fn test_workflow_stacked_formats_unwind_independently() {
    let mut ed = editor("<p>text</p>");
    select(&mut ed, (0, 0), (0, 4));
    ed.dispatch(Command::ToggleBold);
    ed.dispatch(Command::ToggleItalic);
    ed.dispatch(Command::ToggleUnderline);
    assert_eq!(
        ed.active_formats(),
        InlineFormat::BOLD | InlineFormat::ITALIC | InlineFormat::UNDERLINE
    );
    assert_eq!(
        ed.serialize(),
        "<p><strong><em><u>text</u></em></strong></p>"
    );

    ed.dispatch(Command::ToggleItalic);
    assert_eq!(
        ed.active_formats(),
        InlineFormat::BOLD | InlineFormat::UNDERLINE
    );
    assert_eq!(ed.serialize(), "<p><strong><u>text</u></strong></p>");
}

#[test]
fn test_workflow_caret_format_state_tracks_typing_position() {
    let mut ed = editor("<p><strong>ab</strong>cd</p>");
    ed.set_selection(Selection::caret(Position::new(0, 2)));
    assert_eq!(ed.active_formats(), InlineFormat::BOLD);
    ed.set_selection(Selection::caret(Position::new(0, 4)));
    assert_eq!(ed.active_formats(), InlineFormat::empty());

    // Typing at the bold caret extends the bold run
    ed.set_selection(Selection::caret(Position::new(0, 2)));
    ed.dispatch(Command::InsertText("X".to_string()));
    assert_eq!(ed.serialize(), "<p><strong>abX</strong>cd</p>");
}

// ============================================================================
// Block and List Workflows
// ============================================================================

#[test]
fn test_workflow_heading_then_back_to_paragraph() {
    let mut ed = editor("<p>Title</p>");
    ed.set_selection(Selection::caret(Position::new(0, 3)));
    ed.dispatch(Command::SetBlock(BlockTag::Heading));
    assert_eq!(ed.serialize(), "<h2>Title</h2>");
    ed.dispatch(Command::SetBlock(BlockTag::Paragraph));
    assert_eq!(ed.serialize(), "<p>Title</p>");
}

#[test]
fn test_workflow_build_list_then_exit_with_empty_item() {
    let mut ed = editor("<p>first</p>");
    select(&mut ed, (0, 0), (0, 5));
    ed.dispatch(Command::ToggleList(ListKind::Unordered));
    assert_eq!(ed.serialize(), "<ul><li>first</li></ul>");

    // Enter at end continues the list
    ed.set_selection(Selection::caret(Position::new(0, 5)));
    ed.dispatch(Command::InsertParagraphBreak);
    ed.dispatch(Command::InsertText("second".to_string()));
    assert_eq!(ed.serialize(), "<ul><li>first</li><li>second</li></ul>");

    // Enter on an empty item exits the list
    ed.dispatch(Command::InsertParagraphBreak);
    ed.dispatch(Command::InsertParagraphBreak);
    assert_eq!(
        ed.serialize(),
        "<ul><li>first</li><li>second</li></ul><p></p>"
    );
}

#[test]
fn test_workflow_ordered_and_unordered_are_distinct() {
    let mut ed = editor("<p>a</p>");
    select(&mut ed, (0, 0), (0, 1));
    ed.dispatch(Command::ToggleList(ListKind::Ordered));
    assert_eq!(ed.serialize(), "<ol><li>a</li></ol>");

    // Switching kinds converts rather than reverts
    ed.dispatch(Command::ToggleList(ListKind::Unordered));
    assert_eq!(ed.serialize(), "<ul><li>a</li></ul>");
    ed.dispatch(Command::ToggleList(ListKind::Unordered));
    assert_eq!(ed.serialize(), "<p>a</p>");
}

#[test]
fn test_workflow_quote_placeholder_is_replaced_by_typing() {
    let mut ed = editor("");
    ed.dispatch(Command::SetBlock(BlockTag::Quote));
    assert_eq!(ed.serialize(), "<blockquote>Enter quote...</blockquote>");
    ed.dispatch(Command::InsertText("Real words".to_string()));
    assert_eq!(ed.serialize(), "<blockquote>Real words</blockquote>");
}

// ============================================================================
// Link Workflows
// ============================================================================

#[test]
fn test_workflow_link_selection_then_delete_reclaims_url() {
    let mut ed = editor("<p>read the docs now</p>");
    select(&mut ed, (0, 9), (0, 13));
    ed.dispatch(Command::InsertLink {
        url: "https://docs.example.com".to_string(),
    });
    assert_eq!(
        ed.serialize(),
        "<p>read the <a href=\"https://docs.example.com\">docs</a> now</p>"
    );

    // Deleting the linked text drops the URL from the pool
    select(&mut ed, (0, 9), (0, 13));
    ed.dispatch(Command::DeleteBackward);
    assert_eq!(ed.serialize(), "<p>read the  now</p>");
    assert_eq!(ed.surface().hrefs().get(1), None);
}

#[test]
fn test_workflow_link_at_caret_inserts_default_label() {
    let mut ed = editor("<p>see </p>");
    ed.set_selection(Selection::caret(Position::new(0, 4)));
    ed.dispatch(Command::InsertLink {
        url: "https://example.com".to_string(),
    });
    assert_eq!(
        ed.serialize(),
        "<p>see <a href=\"https://example.com\">Link</a></p>"
    );
    // The inserted label is selected for immediate replacement
    assert_eq!(
        ed.selection().normalized(),
        (Position::new(0, 4), Position::new(0, 8))
    );
}

#[test]
fn test_workflow_relink_replaces_url() {
    let mut ed = editor("<p><a href=\"https://old.example\">x</a></p>");
    select(&mut ed, (0, 0), (0, 1));
    ed.dispatch(Command::InsertLink {
        url: "https://new.example".to_string(),
    });
    assert_eq!(ed.serialize(), "<p><a href=\"https://new.example\">x</a></p>");
}

// ============================================================================
// Undo/Redo Workflows
// ============================================================================

#[test]
fn test_workflow_undo_redo_full_cycle() {
    let mut ed = editor("<p></p>");
    ed.dispatch(Command::InsertText("a".to_string()));
    ed.dispatch(Command::InsertText("b".to_string()));
    select(&mut ed, (0, 0), (0, 2));
    ed.dispatch(Command::ToggleBold);
    assert_eq!(ed.serialize(), "<p><strong>ab</strong></p>");

    ed.dispatch(Command::Undo);
    assert_eq!(ed.serialize(), "<p>ab</p>");
    ed.dispatch(Command::Undo);
    assert_eq!(ed.serialize(), "<p>a</p>");
    ed.dispatch(Command::Undo);
    assert_eq!(ed.serialize(), "<p></p>");
    assert!(!ed.can_undo());

    ed.dispatch(Command::Redo);
    ed.dispatch(Command::Redo);
    ed.dispatch(Command::Redo);
    assert_eq!(ed.serialize(), "<p><strong>ab</strong></p>");
    assert!(!ed.can_redo());
}

#[test]
fn test_workflow_edit_after_undo_discards_redo() {
    let mut ed = editor("<p></p>");
    ed.dispatch(Command::InsertText("a".to_string()));
    ed.dispatch(Command::InsertText("b".to_string()));
    ed.dispatch(Command::Undo);
    ed.dispatch(Command::InsertText("c".to_string()));
    assert_eq!(ed.to_plain_text(), "ac");
    assert!(!ed.can_redo());
    assert!(!ed.dispatch(Command::Redo).changed);
    assert_eq!(ed.to_plain_text(), "ac");
}

#[test]
fn test_workflow_undo_restores_selection() {
    let mut ed = editor("<p>word</p>");
    select(&mut ed, (0, 0), (0, 4));
    ed.dispatch(Command::ToggleBold);
    ed.set_selection(Selection::caret(Position::new(0, 0)));
    ed.dispatch(Command::Undo);
    // Undo brings back the selection the edit was made from
    assert_eq!(
        ed.selection(),
        Selection::new(Position::new(0, 0), Position::new(0, 4))
    );
    assert_eq!(ed.serialize(), "<p>word</p>");
}

#[test]
fn test_workflow_bold_toggle_spanning_raw_markup() {
    let markup = "<p>ab</p><table><tr><td>x</td></tr></table><p>cd</p>";
    let mut ed = editor(markup);
    select(&mut ed, (0, 0), (2, 2));

    assert!(ed.dispatch(Command::ToggleBold).changed);
    assert_eq!(ed.active_formats(), InlineFormat::BOLD);

    assert!(ed.dispatch(Command::ToggleBold).changed);
    assert_eq!(ed.active_formats(), InlineFormat::empty());
    assert_eq!(ed.serialize(), markup);
}

#[test]
fn test_workflow_noop_commands_do_not_pollute_history() {
    let mut ed = editor("<p>a</p>");
    ed.set_selection(Selection::caret(Position::new(0, 0)));
    ed.dispatch(Command::ToggleBold); // caret toggle
    ed.dispatch(Command::DeleteBackward); // document start
    ed.dispatch(Command::Undo); // nothing to undo
    assert!(!ed.can_undo());
    assert!(!ed.can_redo());
    assert_eq!(ed.serialize(), "<p>a</p>");
}

// ============================================================================
// Keyboard Workflows
// ============================================================================

#[test]
fn test_workflow_typing_session_via_key_events() {
    let mut ed = editor("");
    for ch in "Hi there".chars() {
        assert!(ed.handle_key(KeyEvent::new(KeyCode::Char(ch))));
    }
    assert_eq!(ed.to_plain_text(), "Hi there");

    // Primary+Z undoes the last keystroke
    assert!(ed.handle_key(KeyEvent::primary_chord('z')));
    assert_eq!(ed.to_plain_text(), "Hi ther");

    // Primary+Shift+Z brings it back
    let redo = KeyEvent::with_modifiers(
        KeyCode::Char('z'),
        KeyModifiers::CTRL | KeyModifiers::SHIFT,
    );
    assert!(ed.handle_key(redo));
    assert_eq!(ed.to_plain_text(), "Hi there");
}

#[test]
fn test_workflow_format_chords_match_commands() {
    let mut ed = editor("<p>chord</p>");
    select(&mut ed, (0, 0), (0, 5));
    ed.handle_key(KeyEvent::primary_chord('i'));
    ed.handle_key(KeyEvent::primary_chord('u'));
    assert_eq!(ed.serialize(), "<p><em><u>chord</u></em></p>");
    // Unrecognized keys are not consumed
    assert!(!ed.handle_key(KeyEvent::new(KeyCode::Home)));
}

// ============================================================================
// Change Notification and Robustness
// ============================================================================

#[test]
fn test_workflow_on_change_reports_each_accepted_mutation() {
    let mut ed = editor("<p>x</p>");
    let count = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&count);
    ed.set_on_change(move |_| *sink.borrow_mut() += 1);

    ed.set_selection(Selection::caret(Position::new(0, 1)));
    ed.dispatch(Command::InsertText("y".to_string())); // fires
    ed.set_selection(Selection::caret(Position::new(0, 0))); // no fire
    ed.dispatch(Command::ToggleBold); // caret no-op, no fire
    ed.dispatch(Command::Undo); // fires
    ed.dispatch(Command::Undo); // boundary no-op, no fire
    assert_eq!(*count.borrow(), 2);
}

#[test]
fn test_workflow_malformed_markup_still_mounts() {
    for markup in [
        "<p>unclosed",
        "</p>stray close",
        "<ul><li>half",
        "<p><strong>deep<em>nest</p>",
        "not markup at all < 3",
        "",
    ] {
        let ed = editor(markup);
        // Mounting never fails and the editor stays usable
        let mut ed = ed;
        ed.dispatch(Command::InsertText("!".to_string()));
        assert!(!ed.serialize().is_empty());
    }
}

#[test]
fn test_workflow_unknown_markup_survives_editing_around_it() {
    let mut ed = editor("<p>before</p><table><tr><td>x</td></tr></table><p>after</p>");
    assert_eq!(ed.surface().blocks()[1].kind, BlockKind::Raw);

    ed.set_selection(Selection::caret(Position::new(2, 5)));
    ed.dispatch(Command::InsertText("!".to_string()));
    assert_eq!(
        ed.serialize(),
        "<p>before</p><table><tr><td>x</td></tr></table><p>after!</p>"
    );
}
