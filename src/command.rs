//! Editing commands and the toolbar command vocabulary.
//!
//! Hosts drive the editor through [`Command`] values. The string vocabulary
//! accepted by [`Command::from_name`] mirrors the classic toolbar action
//! names (`bold`, `formatBlock` with a tag argument, `createLink`, and so
//! on) so existing toolbar wiring maps onto it directly.

use crate::document::block::{BlockKind, ListKind};
use crate::error::{Error, Result};
use crate::selection::Selection;

/// Block-level targets for the `formatBlock` command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockTag {
    Paragraph,
    Heading,
    Quote,
    Code,
}

impl BlockTag {
    /// The document block kind this tag maps to.
    #[must_use]
    pub fn kind(self) -> BlockKind {
        match self {
            Self::Paragraph => BlockKind::Paragraph,
            Self::Heading => BlockKind::Heading,
            Self::Quote => BlockKind::Quote,
            Self::Code => BlockKind::Code,
        }
    }
}

/// An editing command dispatched against the editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    /// Set the kind of every block the selection touches.
    SetBlock(BlockTag),
    /// Toggle list membership for the selected blocks.
    ToggleList(ListKind),
    /// Wrap the selection in a hyperlink, or insert a labelled anchor at a
    /// caret.
    InsertLink { url: String },
    /// Insert text at the selection, replacing any selected range.
    InsertText(String),
    /// Split the current block at the caret.
    InsertParagraphBreak,
    DeleteBackward,
    DeleteForward,
    Undo,
    Redo,
}

impl Command {
    /// Map a toolbar action name (plus optional argument) to a command.
    ///
    /// `formatBlock` takes the target tag (`<p>`, `<h2>`, `<blockquote>`,
    /// `<pre>`, with or without angle brackets); `createLink` takes the URL;
    /// `insertText` takes the text.
    pub fn from_name(name: &str, arg: Option<&str>) -> Result<Self> {
        match name {
            "bold" => Ok(Self::ToggleBold),
            "italic" => Ok(Self::ToggleItalic),
            "underline" => Ok(Self::ToggleUnderline),
            "insertUnorderedList" => Ok(Self::ToggleList(ListKind::Unordered)),
            "insertOrderedList" => Ok(Self::ToggleList(ListKind::Ordered)),
            "insertParagraph" => Ok(Self::InsertParagraphBreak),
            "delete" => Ok(Self::DeleteBackward),
            "forwardDelete" => Ok(Self::DeleteForward),
            "undo" => Ok(Self::Undo),
            "redo" => Ok(Self::Redo),
            "createLink" => {
                let url = arg.ok_or(Error::MissingArgument {
                    command: "createLink",
                })?;
                Ok(Self::InsertLink {
                    url: url.to_string(),
                })
            }
            "insertText" => {
                let text = arg.ok_or(Error::MissingArgument {
                    command: "insertText",
                })?;
                Ok(Self::InsertText(text.to_string()))
            }
            "formatBlock" => {
                let tag = arg.ok_or(Error::MissingArgument {
                    command: "formatBlock",
                })?;
                let bare = tag
                    .trim()
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .to_ascii_lowercase();
                match bare.as_str() {
                    "p" => Ok(Self::SetBlock(BlockTag::Paragraph)),
                    "h2" => Ok(Self::SetBlock(BlockTag::Heading)),
                    "blockquote" => Ok(Self::SetBlock(BlockTag::Quote)),
                    "pre" => Ok(Self::SetBlock(BlockTag::Code)),
                    _ => Err(Error::UnknownBlockTag(tag.to_string())),
                }
            }
            other => Err(Error::UnknownCommand(other.to_string())),
        }
    }
}

/// Outcome of a dispatched command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MutationResult {
    /// Whether the document content changed.
    pub changed: bool,
    /// The selection after the command.
    pub selection: Selection,
}

/// Host hook for obtaining a link URL interactively.
///
/// Returning `None` cancels the link command without touching the document
/// or the history.
pub trait LinkPrompt {
    fn request_url(&mut self) -> Option<String>;
}

impl<F> LinkPrompt for F
where
    F: FnMut() -> Option<String>,
{
    fn request_url(&mut self) -> Option<String> {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_simple_commands() {
        assert_eq!(Command::from_name("bold", None).unwrap(), Command::ToggleBold);
        assert_eq!(
            Command::from_name("insertOrderedList", None).unwrap(),
            Command::ToggleList(ListKind::Ordered)
        );
        assert_eq!(Command::from_name("undo", None).unwrap(), Command::Undo);
    }

    #[test]
    fn test_format_block_accepts_wrapped_and_bare_tags() {
        assert_eq!(
            Command::from_name("formatBlock", Some("<h2>")).unwrap(),
            Command::SetBlock(BlockTag::Heading)
        );
        assert_eq!(
            Command::from_name("formatBlock", Some("blockquote")).unwrap(),
            Command::SetBlock(BlockTag::Quote)
        );
        assert_eq!(
            Command::from_name("formatBlock", Some("PRE")).unwrap(),
            Command::SetBlock(BlockTag::Code)
        );
    }

    #[test]
    fn test_unknown_names_are_errors() {
        assert!(matches!(
            Command::from_name("strikeThrough", None),
            Err(Error::UnknownCommand(_))
        ));
        assert!(matches!(
            Command::from_name("formatBlock", Some("<h1>")),
            Err(Error::UnknownBlockTag(_))
        ));
        assert!(matches!(
            Command::from_name("createLink", None),
            Err(Error::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_closure_is_a_link_prompt() {
        let mut prompt = || Some(String::from("https://example.com"));
        assert_eq!(
            LinkPrompt::request_url(&mut prompt).as_deref(),
            Some("https://example.com")
        );
    }
}
