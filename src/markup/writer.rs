//! Canonical markup writer.
//!
//! Every block maps to one element; consecutive list items of the same kind
//! are grouped under a single list element. Inline tags are emitted per run
//! in a fixed nesting order (anchor outermost, then strong, em, u), so the
//! output is canonical: parsing it back and re-serializing reproduces the
//! same string. Raw blocks are written back verbatim.

use crate::document::block::{Block, BlockKind, ListKind};
use crate::document::span::Span;
use crate::link::HrefPool;

/// Serialize blocks to their markup string.
#[must_use]
pub fn write(blocks: &[Block], hrefs: &HrefPool) -> String {
    let mut out = String::new();
    let mut i = 0;
    while i < blocks.len() {
        match blocks[i].kind {
            BlockKind::ListItem(kind) => {
                let mut j = i;
                while j < blocks.len() && blocks[j].kind == BlockKind::ListItem(kind) {
                    j += 1;
                }
                let tag = match kind {
                    ListKind::Unordered => "ul",
                    ListKind::Ordered => "ol",
                };
                out.push('<');
                out.push_str(tag);
                out.push('>');
                for block in &blocks[i..j] {
                    out.push_str("<li>");
                    write_spans(&mut out, &block.spans, hrefs);
                    out.push_str("</li>");
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
                i = j;
            }
            BlockKind::Raw => {
                for span in &blocks[i].spans {
                    out.push_str(&span.text);
                }
                i += 1;
            }
            BlockKind::Code => {
                out.push_str("<pre><code>");
                write_spans(&mut out, &blocks[i].spans, hrefs);
                out.push_str("</code></pre>");
                i += 1;
            }
            kind => {
                let tag = match kind {
                    BlockKind::Heading => "h2",
                    BlockKind::Quote => "blockquote",
                    _ => "p",
                };
                out.push('<');
                out.push_str(tag);
                out.push('>');
                write_spans(&mut out, &blocks[i].spans, hrefs);
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
                i += 1;
            }
        }
    }
    out
}

fn write_spans(out: &mut String, spans: &[Span], hrefs: &HrefPool) {
    use crate::format::InlineFormat;

    for span in spans {
        let href = span.format.href_id().and_then(|id| hrefs.get(id));
        if let Some(url) = href {
            out.push_str("<a href=\"");
            escape_attr_into(out, url);
            out.push_str("\">");
        }
        let f = span.format;
        if f.contains(InlineFormat::BOLD) {
            out.push_str("<strong>");
        }
        if f.contains(InlineFormat::ITALIC) {
            out.push_str("<em>");
        }
        if f.contains(InlineFormat::UNDERLINE) {
            out.push_str("<u>");
        }
        escape_text_into(out, &span.text);
        if f.contains(InlineFormat::UNDERLINE) {
            out.push_str("</u>");
        }
        if f.contains(InlineFormat::ITALIC) {
            out.push_str("</em>");
        }
        if f.contains(InlineFormat::BOLD) {
            out.push_str("</strong>");
        }
        if href.is_some() {
            out.push_str("</a>");
        }
    }
}

fn escape_text_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("<br>"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr_into(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
