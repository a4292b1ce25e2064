//! Inline formatting flags and active-format derivation.
//!
//! This module provides:
//!
//! - [`InlineFormat`]: Bitflags for bold, italic, and underline, with a
//!   24-bit hyperlink id packed into the upper bits
//! - [`active_formats`]: a pure function of (document, selection) that
//!   reports which formats hold uniformly across the current selection
//!
//! # Examples
//!
//! ```
//! use richtext_core::InlineFormat;
//!
//! let fmt = InlineFormat::BOLD | InlineFormat::ITALIC;
//! assert!(fmt.contains(InlineFormat::BOLD));
//!
//! // Hyperlink ids share the same word as the style flags
//! let linked = fmt.with_href_id(7);
//! assert_eq!(linked.href_id(), Some(7));
//! assert_eq!(linked.flags_only(), fmt);
//! ```

use bitflags::bitflags;

use crate::document::DocumentSurface;
use crate::selection::Selection;

bitflags! {
    /// Inline formatting applied to a run of text.
    ///
    /// Style flags live in the low 8 bits. A hyperlink id referencing a URL
    /// in an [`HrefPool`](crate::HrefPool) is packed into the upper 24 bits
    /// (0 means no link), so a span's complete inline state fits one word.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct InlineFormat: u32 {
        /// Bold text.
        const BOLD      = 0x01;
        /// Italic text.
        const ITALIC    = 0x02;
        /// Underlined text.
        const UNDERLINE = 0x04;
    }
}

impl InlineFormat {
    /// Mask for the lower 8 bits containing style flags.
    pub const FLAGS_MASK: u32 = 0x0000_00FF;
    /// Mask for the upper 24 bits containing the hyperlink id.
    pub const HREF_ID_MASK: u32 = 0xFFFF_FF00;
    /// Bit shift for hyperlink id storage.
    pub const HREF_ID_SHIFT: u32 = 8;
    /// Maximum hyperlink id that fits in 24 bits.
    pub const MAX_HREF_ID: u32 = 0x00FF_FFFF;

    /// Extract the hyperlink id (if any).
    #[must_use]
    pub const fn href_id(self) -> Option<u32> {
        let id = (self.bits() & Self::HREF_ID_MASK) >> Self::HREF_ID_SHIFT;
        if id == 0 { None } else { Some(id) }
    }

    /// Return the format with a hyperlink id set (masked to 24 bits).
    #[must_use]
    pub const fn with_href_id(self, href_id: u32) -> Self {
        let id = href_id & Self::MAX_HREF_ID;
        let bits = (self.bits() & Self::FLAGS_MASK) | (id << Self::HREF_ID_SHIFT);
        Self::from_bits_retain(bits)
    }

    /// Clear the hyperlink id, preserving style flags.
    #[must_use]
    pub const fn clear_href_id(self) -> Self {
        Self::from_bits_retain(self.bits() & Self::FLAGS_MASK)
    }

    /// Return only the style flags (hyperlink id cleared).
    #[must_use]
    pub const fn flags_only(self) -> Self {
        Self::from_bits_retain(self.bits() & Self::FLAGS_MASK)
    }

    /// Check whether the format carries a hyperlink.
    #[must_use]
    pub const fn is_linked(self) -> bool {
        self.href_id().is_some()
    }
}

/// Compute the set of formats active at the current selection.
///
/// A pure function with no memory beyond the current call. A format is
/// reported iff it holds uniformly across the
/// entire selection; a selection straddling mixed formatting reports the
/// format absent. For a caret the result is the typing state at that point
/// (the format of the preceding character, or the following one at a block
/// start).
///
/// Hyperlink ids are stripped from the result; the active set covers style
/// flags only.
#[must_use]
pub fn active_formats(surface: &DocumentSurface, selection: &Selection) -> InlineFormat {
    if selection.is_caret() {
        return surface.typing_format(selection.focus).flags_only();
    }
    let (start, end) = selection.normalized();
    surface.uniform_flags(start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_and_href_share_one_word() {
        let fmt = InlineFormat::BOLD.with_href_id(0x12_3456);
        assert!(fmt.contains(InlineFormat::BOLD));
        assert_eq!(fmt.href_id(), Some(0x12_3456));
        assert_eq!(fmt.flags_only(), InlineFormat::BOLD);
    }

    #[test]
    fn test_href_id_masking() {
        let fmt = InlineFormat::empty().with_href_id(0x1FF_FFFF);
        assert_eq!(fmt.href_id(), Some(InlineFormat::MAX_HREF_ID));
    }

    #[test]
    fn test_clear_href_id() {
        let fmt = InlineFormat::UNDERLINE.with_href_id(3).clear_href_id();
        assert_eq!(fmt.href_id(), None);
        assert!(fmt.contains(InlineFormat::UNDERLINE));
    }

    #[test]
    fn test_zero_href_id_means_unlinked() {
        let fmt = InlineFormat::ITALIC.with_href_id(0);
        assert!(!fmt.is_linked());
        assert_eq!(fmt, InlineFormat::ITALIC);
    }
}
