//! Minimal tag-token scanner.
//!
//! Not a markup parser: it finds `<name ...>`, `<name ... />` and `</name>`
//! shapes left to right and reports their name, attribute span and kind.
//! Attribute spans end at the first `>`, quoted or not.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Open,
    SelfClosing,
    Close,
}

/// A tag found in scanned text. Offsets are byte offsets into that text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    pub name: &'a str,
    /// Everything between the name and `>` (or `/>` for self-closing tags).
    pub attrs: &'a str,
    /// The full tag text, `<` through `>`.
    pub raw: &'a str,
    pub start: usize,
    pub end: usize,
    pub kind: TagKind,
}

impl<'a> Tag<'a> {
    /// Exact name comparison. `WidgetX` is not `Widget`.
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name
    }

    /// Opening or self-closing tag whose name is followed by whitespace.
    pub fn has_separated_attrs(&self) -> bool {
        self.kind != TagKind::Close && self.attrs.starts_with(char::is_whitespace)
    }

    pub fn spans_lines(&self) -> bool {
        self.attrs.contains('\n')
    }

    /// Closing tag written exactly as `</name>`.
    pub fn is_bare_close(&self, name: &str) -> bool {
        self.kind == TagKind::Close && self.is_named(name) && self.attrs.is_empty()
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Scan `text` for tags, left to right, without overlap.
pub fn scan(text: &str) -> Scanner<'_> {
    Scanner {
        text,
        pos: 0,
        next_gt: Lookahead::default(),
        next_nested: Lookahead::default(),
    }
}

pub struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    next_gt: Lookahead,
    next_nested: Lookahead,
}

/// Memoized "first match at or after `from`" for a forward-only search.
///
/// Valid for any later query `at` with `from <= at <= found`, so a scan whose
/// query offsets never decrease searches each byte at most once.
#[derive(Debug, Clone, Copy)]
struct Lookahead {
    from: usize,
    found: Option<usize>,
}

impl Default for Lookahead {
    fn default() -> Self {
        Self {
            from: usize::MAX,
            found: None,
        }
    }
}

impl Lookahead {
    fn find(&mut self, at: usize, search: impl FnOnce(usize) -> Option<usize>) -> Option<usize> {
        let reusable = at >= self.from && self.found.map_or(true, |found| found >= at);
        if !reusable {
            self.from = at;
            self.found = search(at);
        }
        self.found
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Tag<'a>> {
        while let Some(offset) = self.text[self.pos..].find('<') {
            let start = self.pos + offset;
            match self.read_tag(start) {
                Some(tag) => {
                    self.pos = tag.end;
                    return Some(tag);
                }
                None => self.pos = start + 1,
            }
        }
        self.pos = self.text.len();
        None
    }
}

impl<'a> Scanner<'a> {
    fn read_tag(&mut self, start: usize) -> Option<Tag<'a>> {
        let text = self.text;
        let bytes = text.as_bytes();
        let mut cursor = start + 1;

        let closing = bytes.get(cursor) == Some(&b'/');
        if closing {
            cursor += 1;
        }

        let name_start = cursor;
        while cursor < bytes.len() && is_name_byte(bytes[cursor]) {
            cursor += 1;
        }
        if cursor == name_start {
            return None;
        }
        let name_end = cursor;

        let gt = self
            .next_gt
            .find(name_end, |at| text[at..].find('>').map(|i| at + i))?;

        // A nested tag starts before this one ends: this `<` was not a tag.
        let nested = self.next_nested.find(name_end, |at| find_nested_opener(bytes, at));
        if nested.is_some_and(|i| i < gt) {
            return None;
        }

        let (kind, attrs_end) = if closing {
            (TagKind::Close, gt)
        } else if gt > name_end && bytes[gt - 1] == b'/' {
            (TagKind::SelfClosing, gt - 1)
        } else {
            (TagKind::Open, gt)
        };

        Some(Tag {
            name: &text[name_start..name_end],
            attrs: &text[name_end..attrs_end],
            raw: &text[start..gt + 1],
            start,
            end: gt + 1,
            kind,
        })
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b':' | b'$')
}

/// Bytes after which a `<` starts markup rather than a comparison or text:
/// `={<b/>}`, `(<b/>)`, `cond && <b/>`, `a ? <b/> : <c/>`, `[<b/>, <c/>]`.
fn precedes_nested_tag(b: u8) -> bool {
    b.is_ascii_whitespace()
        || matches!(b, b'{' | b'(' | b'=' | b'?' | b':' | b'&' | b'|' | b',' | b';' | b'[' | b'!')
}

/// First `<` at or after `from` that opens a nested tag. A `<` right after
/// an operand (`count<limit`, `"a</b"`) is not one.
fn find_nested_opener(bytes: &[u8], from: usize) -> Option<usize> {
    (from.max(1)..bytes.len().saturating_sub(1)).find(|&i| {
        bytes[i] == b'<'
            && (is_name_byte(bytes[i + 1]) || bytes[i + 1] == b'/')
            && precedes_nested_tag(bytes[i - 1])
    })
}
