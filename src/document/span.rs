//! Styled text runs.
//!
//! A block's content is a flat run-list: consecutive [`Span`]s, each a piece
//! of text with one [`InlineFormat`]. Edits split runs at arbitrary character
//! offsets; [`normalize`] restores the canonical form afterwards by dropping
//! empty runs and merging adjacent runs with identical formatting.

use crate::format::InlineFormat;
use crate::link::HrefPool;

/// A run of text with uniform inline formatting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    /// The text content of the run.
    pub text: String,
    /// Formatting applied to every character of the run.
    pub format: InlineFormat,
}

impl Span {
    /// Create a span.
    #[must_use]
    pub fn new(text: impl Into<String>, format: InlineFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }

    /// Create an unformatted span.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, InlineFormat::empty())
    }

    /// Length of the run in characters.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    /// Check whether the run holds no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte index for a character offset into this run.
    ///
    /// Offsets past the end map to the end of the text.
    #[must_use]
    pub fn byte_at_char(&self, char_offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_offset)
            .map_or(self.text.len(), |(idx, _)| idx)
    }

    /// Split the run at a character offset, returning the tail.
    ///
    /// The tail shares this run's format; the caller is responsible for
    /// retaining a carried href id for the new run.
    #[must_use]
    pub fn split_off_chars(&mut self, char_offset: usize) -> Self {
        let byte = self.byte_at_char(char_offset);
        Self {
            text: self.text.split_off(byte),
            format: self.format,
        }
    }
}

/// Restore a run-list to canonical form.
///
/// Drops empty runs and merges adjacent runs with identical formats,
/// releasing the href id of every run that disappears.
pub fn normalize(spans: &mut Vec<Span>, hrefs: &mut HrefPool) {
    spans.retain(|span| {
        if span.is_empty() {
            if let Some(id) = span.format.href_id() {
                hrefs.release(id);
            }
            false
        } else {
            true
        }
    });

    let mut i = 1;
    while i < spans.len() {
        if spans[i].format == spans[i - 1].format {
            let merged = spans.remove(i);
            if let Some(id) = merged.format.href_id() {
                hrefs.release(id);
            }
            spans[i - 1].text.push_str(&merged.text);
        } else {
            i += 1;
        }
    }
}

/// Release the href ids carried by a list of destroyed runs.
pub fn release_all(spans: &[Span], hrefs: &mut HrefPool) {
    for span in spans {
        if let Some(id) = span.format.href_id() {
            hrefs.release(id);
        }
    }
}
