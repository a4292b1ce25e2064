//! Best-effort markup parser.
//!
//! Parsing never fails: the editor must mount on whatever seed content the
//! host supplies. Recognized elements become typed blocks and styled runs;
//! anything else degrades gracefully instead of being stripped:
//!
//! - an unrecognized element becomes a verbatim [`BlockKind::Raw`] block
//! - a recognized block whose inline content contains unsupported tags is
//!   preserved whole as a raw block
//! - a stray `<` that does not open a tag is literal text
//! - bare text outside any block is wrapped in a paragraph
//!
//! Raw blocks are written back byte-for-byte, so unsupported markup
//! survives round-trips untouched.

use tracing::debug;

use crate::document::block::{Block, BlockKind, ListKind};
use crate::document::span::{self, Span};
use crate::format::InlineFormat;
use crate::link::HrefPool;

/// Parse a markup string into blocks and the hyperlink pool they reference.
#[must_use]
pub fn parse(markup: &str) -> (Vec<Block>, HrefPool) {
    let mut parser = Parser {
        src: markup,
        pos: 0,
        blocks: Vec::new(),
        hrefs: HrefPool::new(),
    };
    parser.run();
    (parser.blocks, parser.hrefs)
}

/// Elements whose content is parsed as inline runs.
fn is_inline_tag(name: &str) -> bool {
    matches!(name, "strong" | "b" | "em" | "i" | "u" | "a" | "br")
}

/// Void elements that never have a closing tag.
fn is_void_tag(name: &str) -> bool {
    matches!(
        name,
        "img" | "hr" | "input" | "meta" | "link" | "source" | "embed" | "area" | "base" | "col"
            | "track" | "wbr"
    )
}

/// A scanned tag: `[start..end)` in the source, name lowercased.
struct ScannedTag<'a> {
    name: String,
    attrs: &'a str,
    closing: bool,
    self_closing: bool,
    end: usize,
}

/// Scan the tag starting at byte `at` (which must be `<`). Returns `None`
/// when the `<` does not open a well-formed tag, in which case it is
/// treated as literal text.
fn scan_tag(src: &str, at: usize) -> Option<ScannedTag<'_>> {
    let bytes = src.as_bytes();
    let mut p = at + 1;
    let closing = bytes.get(p) == Some(&b'/');
    if closing {
        p += 1;
    }
    let name_start = p;
    while p < bytes.len() && bytes[p].is_ascii_alphanumeric() {
        p += 1;
    }
    if p == name_start {
        return None;
    }
    let name = src[name_start..p].to_ascii_lowercase();
    let attrs_start = p;
    let mut in_quote: Option<u8> = None;
    while p < bytes.len() {
        let b = bytes[p];
        match in_quote {
            Some(q) => {
                if b == q {
                    in_quote = None;
                }
            }
            None => {
                if b == b'"' || b == b'\'' {
                    in_quote = Some(b);
                } else if b == b'>' {
                    let self_closing = p > attrs_start && bytes[p - 1] == b'/';
                    let attrs_end = if self_closing { p - 1 } else { p };
                    return Some(ScannedTag {
                        name,
                        attrs: &src[attrs_start..attrs_end],
                        closing,
                        self_closing,
                        end: p + 1,
                    });
                }
            }
        }
        p += 1;
    }
    None
}

/// Find the matching close tag for an element opened just before `from`,
/// honoring same-name nesting. Returns (content end, byte after the close
/// tag).
fn find_matching_close(src: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let bytes = src.as_bytes();
    let mut depth = 1usize;
    let mut p = from;
    while p < bytes.len() {
        if bytes[p] == b'<' {
            if let Some(tag) = scan_tag(src, p) {
                if tag.name == name {
                    if tag.closing {
                        depth -= 1;
                        if depth == 0 {
                            return Some((p, tag.end));
                        }
                    } else if !tag.self_closing {
                        depth += 1;
                    }
                }
                p = tag.end;
                continue;
            }
        }
        p += utf8_len(bytes[p]);
    }
    None
}

fn utf8_len(first_byte: u8) -> usize {
    match first_byte {
        b if b < 0x80 => 1,
        b if b >= 0xF0 => 4,
        b if b >= 0xE0 => 3,
        b if b >= 0xC0 => 2,
        _ => 1,
    }
}

/// Extract a named attribute value, decoding entities.
fn find_attr(attrs: &str, name: &str) -> Option<String> {
    let lower = attrs.to_ascii_lowercase();
    let mut search = 0;
    while let Some(found) = lower[search..].find(name) {
        let abs = search + found;
        search = abs + 1;
        let boundary_ok =
            abs == 0 || !lower.as_bytes()[abs - 1].is_ascii_alphanumeric();
        if !boundary_ok {
            continue;
        }
        let rest = attrs[abs + name.len()..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        let raw = if let Some(tail) = rest.strip_prefix('"') {
            tail.split('"').next().unwrap_or("")
        } else if let Some(tail) = rest.strip_prefix('\'') {
            tail.split('\'').next().unwrap_or("")
        } else {
            rest.split_whitespace().next().unwrap_or("")
        };
        return Some(decode_entities(raw));
    }
    None
}

/// Decode the entity starting at `&`; unknown entities stay literal.
fn decode_entity(s: &str) -> (char, usize) {
    let Some(semi) = s.find(';').filter(|&i| i <= 11) else {
        return ('&', 1);
    };
    let body = &s[1..semi];
    let decoded = match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => body.strip_prefix('#').and_then(|num| {
            let value = num
                .strip_prefix(['x', 'X'])
                .map_or_else(|| num.parse::<u32>().ok(), |hex| u32::from_str_radix(hex, 16).ok());
            value.and_then(char::from_u32)
        }),
    };
    match decoded {
        Some(ch) => (ch, semi + 1),
        None => ('&', 1),
    }
}

fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut p = 0;
    while p < s.len() {
        if s.as_bytes()[p] == b'&' {
            let (ch, consumed) = decode_entity(&s[p..]);
            out.push(ch);
            p += consumed;
        } else {
            let ch = s[p..].chars().next().unwrap_or('\u{FFFD}');
            out.push(ch);
            p += ch.len_utf8();
        }
    }
    out
}

/// Inline nesting context while parsing run content.
enum InlineTag {
    Bold,
    Italic,
    Underline,
    /// Anchor with its allocated href id (0 when the tag had no href) and
    /// whether any run has adopted the id. An id nothing adopted gets
    /// released when the anchor leaves scope.
    Anchor { id: u32, adopted: bool },
}

impl InlineTag {
    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Bold => matches!(name, "strong" | "b"),
            Self::Italic => matches!(name, "em" | "i"),
            Self::Underline => name == "u",
            Self::Anchor { .. } => name == "a",
        }
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    blocks: Vec<Block>,
    hrefs: HrefPool,
}

impl Parser<'_> {
    fn run(&mut self) {
        while self.pos < self.src.len() {
            let Some(lt) = self.src[self.pos..].find('<').map(|i| self.pos + i) else {
                // trailing bare text
                if !self.src[self.pos..].trim().is_empty() {
                    self.inline_run();
                } else {
                    self.pos = self.src.len();
                }
                continue;
            };
            if !self.src[self.pos..lt].trim().is_empty() {
                // bare text before the next tag starts an inline run
                self.inline_run();
                continue;
            }
            let Some(tag) = scan_tag(self.src, lt) else {
                // literal '<' in bare text
                self.pos = lt;
                self.inline_run();
                continue;
            };
            if tag.closing {
                // stray close tag at the top level
                debug!(tag = %tag.name, "skipping stray close tag");
                self.pos = tag.end;
                continue;
            }
            if is_inline_tag(&tag.name) {
                self.pos = lt;
                self.inline_run();
                continue;
            }
            self.pos = tag.end;
            self.block_element(&tag, lt);
        }
    }

    /// Consume text plus inline tags up to the next block boundary and wrap
    /// them in a paragraph.
    fn inline_run(&mut self) {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        let mut p = self.pos;
        while p < bytes.len() {
            if bytes[p] == b'<' {
                match scan_tag(self.src, p) {
                    Some(tag) if is_inline_tag(&tag.name) => {
                        p = tag.end;
                        continue;
                    }
                    Some(_) => break,
                    None => {}
                }
            }
            p += utf8_len(bytes[p]);
        }
        let run = &self.src[start..p];
        self.pos = p;
        match self.parse_inline(run) {
            Some(spans) => self.blocks.push(Block {
                kind: BlockKind::Paragraph,
                spans,
            }),
            None => self.blocks.push(Block::raw(run)),
        }
    }

    fn block_element(&mut self, tag: &ScannedTag<'_>, tag_start: usize) {
        match tag.name.as_str() {
            "p" => self.simple_block(tag, tag_start, BlockKind::Paragraph),
            "h2" => self.simple_block(tag, tag_start, BlockKind::Heading),
            "blockquote" => self.simple_block(tag, tag_start, BlockKind::Quote),
            // an orphaned list item reads as a paragraph
            "li" => self.simple_block(tag, tag_start, BlockKind::Paragraph),
            "pre" => self.pre_block(tag, tag_start),
            "ul" => self.list_block(tag, tag_start, ListKind::Unordered),
            "ol" => self.list_block(tag, tag_start, ListKind::Ordered),
            _ => self.unknown_block(tag, tag_start),
        }
    }

    fn simple_block(&mut self, tag: &ScannedTag<'_>, tag_start: usize, kind: BlockKind) {
        if tag.self_closing {
            self.blocks.push(Block::new(kind));
            return;
        }
        let content_start = tag.end;
        let (content_end, after) = find_matching_close(self.src, content_start, &tag.name)
            .unwrap_or((self.src.len(), self.src.len()));
        self.pos = after;
        let inner = &self.src[content_start..content_end];
        match self.parse_inline(inner) {
            Some(spans) => self.blocks.push(Block { kind, spans }),
            None => {
                debug!(tag = %tag.name, "unsupported inline content; keeping block verbatim");
                self.blocks.push(Block::raw(&self.src[tag_start..after]));
            }
        }
    }

    fn pre_block(&mut self, tag: &ScannedTag<'_>, tag_start: usize) {
        let content_start = tag.end;
        let (content_end, after) = find_matching_close(self.src, content_start, "pre")
            .unwrap_or((self.src.len(), self.src.len()));
        self.pos = after;
        let mut inner = &self.src[content_start..content_end];

        // Strip one wrapping <code> element if present.
        let trimmed = inner.trim_start();
        let lead = inner.len() - trimmed.len();
        if trimmed.starts_with('<') {
            if let Some(code) = scan_tag(inner, lead) {
                if code.name == "code" && !code.closing && !code.self_closing {
                    if let Some((code_end, code_after)) =
                        find_matching_close(inner, code.end, "code")
                    {
                        if inner[code_after..].trim().is_empty() {
                            inner = &inner[code.end..code_end];
                        }
                    }
                }
            }
        }

        match self.parse_inline(inner) {
            Some(spans) => self.blocks.push(Block {
                kind: BlockKind::Code,
                spans,
            }),
            None => self.blocks.push(Block::raw(&self.src[tag_start..after])),
        }
    }

    fn list_block(&mut self, tag: &ScannedTag<'_>, tag_start: usize, kind: ListKind) {
        let content_start = tag.end;
        let Some((content_end, after)) = find_matching_close(self.src, content_start, &tag.name)
        else {
            self.blocks.push(Block::raw(&self.src[tag_start..]));
            self.pos = self.src.len();
            return;
        };
        self.pos = after;

        let mut items: Vec<Block> = Vec::new();
        let mut p = content_start;
        let mut supported = true;
        while p < content_end {
            if self.src.as_bytes()[p].is_ascii_whitespace() {
                p += 1;
                continue;
            }
            let item = scan_tag(self.src, p).filter(|t| t.name == "li" && !t.closing);
            let Some(item) = item else {
                supported = false;
                break;
            };
            let (item_end, item_after) = find_matching_close(self.src, item.end, "li")
                .filter(|&(_, item_after)| item_after <= content_end)
                .unwrap_or((content_end, content_end));
            match self.parse_inline(&self.src[item.end..item_end]) {
                Some(spans) => items.push(Block {
                    kind: BlockKind::ListItem(kind),
                    spans,
                }),
                None => {
                    supported = false;
                    break;
                }
            }
            p = item_after;
        }

        if supported {
            self.blocks.extend(items);
        } else {
            debug!(tag = %tag.name, "unsupported list content; keeping list verbatim");
            for item in &items {
                span::release_all(&item.spans, &mut self.hrefs);
            }
            self.blocks.push(Block::raw(&self.src[tag_start..after]));
        }
    }

    fn unknown_block(&mut self, tag: &ScannedTag<'_>, tag_start: usize) {
        if tag.self_closing || is_void_tag(&tag.name) {
            self.blocks.push(Block::raw(&self.src[tag_start..tag.end]));
            self.pos = tag.end;
            return;
        }
        match find_matching_close(self.src, tag.end, &tag.name) {
            Some((_, after)) => {
                self.blocks.push(Block::raw(&self.src[tag_start..after]));
                self.pos = after;
            }
            None => {
                self.blocks.push(Block::raw(&self.src[tag_start..]));
                self.pos = self.src.len();
            }
        }
    }

    /// Parse inline content into styled runs. Returns `None` when an
    /// unsupported tag appears, signalling the caller to preserve the whole
    /// fragment verbatim.
    fn parse_inline(&mut self, inner: &str) -> Option<Vec<Span>> {
        let mut spans: Vec<Span> = Vec::new();
        let mut text = String::new();
        let mut stack: Vec<InlineTag> = Vec::new();
        let bytes = inner.as_bytes();
        let mut p = 0;

        while p < bytes.len() {
            let b = bytes[p];
            if b == b'<' {
                if let Some(tag) = scan_tag(inner, p) {
                    if tag.name == "br" {
                        text.push('\n');
                        p = tag.end;
                        continue;
                    }
                    if !is_inline_tag(&tag.name) {
                        span::release_all(&spans, &mut self.hrefs);
                        self.release_unadopted(&stack);
                        return None;
                    }
                    self.flush(&mut spans, &mut text, &mut stack);
                    if tag.closing {
                        if let Some(idx) = stack.iter().rposition(|t| t.matches(&tag.name)) {
                            if let InlineTag::Anchor { id, adopted: false } = &stack[idx] {
                                self.hrefs.release(*id);
                            }
                            stack.remove(idx);
                        }
                    } else if !tag.self_closing {
                        stack.push(match tag.name.as_str() {
                            "strong" | "b" => InlineTag::Bold,
                            "em" | "i" => InlineTag::Italic,
                            "u" => InlineTag::Underline,
                            _ => {
                                let id = find_attr(tag.attrs, "href")
                                    .map_or(0, |url| self.hrefs.insert(&url));
                                InlineTag::Anchor { id, adopted: false }
                            }
                        });
                    }
                    p = tag.end;
                    continue;
                }
                text.push('<');
                p += 1;
                continue;
            }
            if b == b'&' {
                let (ch, consumed) = decode_entity(&inner[p..]);
                text.push(ch);
                p += consumed;
                continue;
            }
            let ch = inner[p..].chars().next().unwrap_or('\u{FFFD}');
            text.push(ch);
            p += ch.len_utf8();
        }
        self.flush(&mut spans, &mut text, &mut stack);
        self.release_unadopted(&stack);
        Some(spans)
    }

    /// Release anchor ids still on the stack that no run ever adopted.
    fn release_unadopted(&mut self, stack: &[InlineTag]) {
        for tag in stack {
            if let InlineTag::Anchor { id, adopted: false } = tag {
                self.hrefs.release(*id);
            }
        }
    }

    fn flush(&mut self, spans: &mut Vec<Span>, text: &mut String, stack: &mut [InlineTag]) {
        if text.is_empty() {
            return;
        }
        let mut format = InlineFormat::empty();
        let mut link: Option<usize> = None;
        for (i, tag) in stack.iter().enumerate() {
            match tag {
                InlineTag::Bold => format |= InlineFormat::BOLD,
                InlineTag::Italic => format |= InlineFormat::ITALIC,
                InlineTag::Underline => format |= InlineFormat::UNDERLINE,
                InlineTag::Anchor { id, .. } if *id != 0 => link = Some(i),
                InlineTag::Anchor { .. } => {}
            }
        }
        // Innermost anchor with an href wins
        if let Some(i) = link {
            if let InlineTag::Anchor { id, adopted } = &mut stack[i] {
                format = format.with_href_id(*id);
                self.hrefs.retain(*id);
                *adopted = true;
            }
        }
        spans.push(Span::new(std::mem::take(text), format));
    }
}
