//! Tolerant tokenizer and tree builder for served page fragments.
//!
//! This is not a conforming HTML parser. It covers what fragments use:
//! doctype and comments (skipped), void elements, raw-text elements, quoted
//! and unquoted attributes, `/>` on any element, and character references. Unknown elements such as `<world>` and `<camera>` are ordinary
//! elements. Mismatched end tags close back to the nearest matching open
//! element or are dropped.

use crate::document::{Element, Node};

pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub(crate) const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Elements whose raw content still has character references decoded.
pub(crate) const ESCAPABLE_RAW_TEXT_ELEMENTS: &[&str] = &["textarea", "title"];

/// Name of the synthetic element that holds a document's top-level nodes.
pub const DOCUMENT_ROOT: &str = "#document";

/// Recoverable problems found while parsing. Byte offsets index the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    UnterminatedComment { offset: usize },
    UnterminatedTag { offset: usize },
    UnterminatedRawText { tag: String },
    StrayEndTag { tag: String, offset: usize },
    UnclosedElement { tag: String },
}

impl std::fmt::Display for MarkupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkupError::UnterminatedComment { offset } => {
                write!(f, "comment at byte {offset} is never closed")
            }
            MarkupError::UnterminatedTag { offset } => {
                write!(f, "tag at byte {offset} is never closed")
            }
            MarkupError::UnterminatedRawText { tag } => {
                write!(f, "<{tag}> content runs to end of input")
            }
            MarkupError::StrayEndTag { tag, offset } => {
                write!(f, "end tag </{tag}> at byte {offset} has no open element")
            }
            MarkupError::UnclosedElement { tag } => write!(f, "<{tag}> is never closed"),
        }
    }
}

impl std::error::Error for MarkupError {}

struct TreeBuilder {
    stack: Vec<Element>,
    errors: Vec<MarkupError>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Element::new(DOCUMENT_ROOT)],
            errors: Vec::new(),
        }
    }

    fn append(&mut self, node: Node) {
        if let Some(top) = self.stack.last_mut() {
            top.push_child(node);
        }
    }

    fn text(&mut self, text: String) {
        if !text.is_empty()
            && let Some(top) = self.stack.last_mut()
        {
            top.push_text(&text);
        }
    }

    fn open(&mut self, el: Element) {
        self.stack.push(el);
    }

    /// Pops the innermost open element (never the document root).
    fn pop(&mut self) {
        if self.stack.len() > 1
            && let Some(el) = self.stack.pop()
        {
            self.append(Node::Element(el));
        }
    }

    fn close(&mut self, tag: &str, offset: usize) {
        let Some(depth) = self
            .stack
            .iter()
            .skip(1)
            .rposition(|e| e.is(tag))
            .map(|i| i + 1)
        else {
            self.errors.push(MarkupError::StrayEndTag {
                tag: tag.to_string(),
                offset,
            });
            return;
        };
        while self.stack.len() > depth {
            self.pop();
        }
    }

    fn finish(mut self) -> (Element, Vec<MarkupError>) {
        while self.stack.len() > 1 {
            if let Some(top) = self.stack.last() {
                self.errors.push(MarkupError::UnclosedElement {
                    tag: top.name().to_string(),
                });
            }
            self.pop();
        }
        let root = self
            .stack
            .pop()
            .unwrap_or_else(|| Element::new(DOCUMENT_ROOT));
        (root, self.errors)
    }
}

struct StartTag {
    element: Element,
    self_closing: bool,
}

pub(crate) fn parse(src: &str) -> (Element, Vec<MarkupError>) {
    let mut builder = TreeBuilder::new();
    let bytes = src.as_bytes();
    // ASCII lowercasing keeps byte offsets aligned with `src`.
    let lower = src.to_ascii_lowercase();
    let mut pos = 0;

    while pos < src.len() {
        let rest = &src[pos..];

        if rest.starts_with("<!--") {
            match rest[4..].find("-->") {
                Some(end) => pos += 4 + end + 3,
                None => {
                    builder
                        .errors
                        .push(MarkupError::UnterminatedComment { offset: pos });
                    pos = src.len();
                }
            }
            continue;
        }

        if rest.starts_with("<!") || rest.starts_with("<?") {
            pos = match rest.find('>') {
                Some(end) => pos + end + 1,
                None => src.len(),
            };
            continue;
        }

        if rest.starts_with("</") && bytes.get(pos + 2).is_some_and(u8::is_ascii_alphabetic) {
            let name_end = rest[2..]
                .find(|c: char| c.is_ascii_whitespace() || c == '>')
                .map_or(rest.len(), |i| i + 2);
            let tag = rest[2..name_end].to_ascii_lowercase();
            match rest[name_end..].find('>') {
                Some(gt) => {
                    builder.close(&tag, pos);
                    pos += name_end + gt + 1;
                }
                None => {
                    builder
                        .errors
                        .push(MarkupError::UnterminatedTag { offset: pos });
                    pos = src.len();
                }
            }
            continue;
        }

        if rest.starts_with('<') && bytes.get(pos + 1).is_some_and(u8::is_ascii_alphabetic) {
            let Some((tag, after)) = parse_start_tag(src, pos) else {
                builder
                    .errors
                    .push(MarkupError::UnterminatedTag { offset: pos });
                pos = src.len();
                continue;
            };
            pos = after;
            let name = tag.element.name().to_string();

            if VOID_ELEMENTS.contains(&name.as_str()) || tag.self_closing {
                builder.append(Node::Element(tag.element));
                continue;
            }

            if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                let (raw, after_raw) = take_raw_text(src, &lower, pos, &name);
                let mut el = tag.element;
                let text = if ESCAPABLE_RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                    decode_entities(raw)
                } else {
                    raw.to_string()
                };
                if !text.is_empty() {
                    el.push_child(Node::Text(text));
                }
                if after_raw.is_none() {
                    builder
                        .errors
                        .push(MarkupError::UnterminatedRawText { tag: name });
                }
                builder.append(Node::Element(el));
                pos = after_raw.unwrap_or(src.len());
                continue;
            }

            builder.open(tag.element);
            continue;
        }

        // Text runs up to the next '<' after the current character.
        let first = rest.chars().next().map_or(1, char::len_utf8);
        let next = rest[first..].find('<').map_or(src.len(), |i| pos + first + i);
        builder.text(decode_entities(&src[pos..next]));
        pos = next;
    }

    builder.finish()
}

/// Parses a start tag beginning at `start` (which holds `<`). Returns the tag
/// and the offset just past its closing `>`, or `None` if input ends first.
fn parse_start_tag(src: &str, start: usize) -> Option<(StartTag, usize)> {
    let bytes = src.as_bytes();
    let mut i = start + 1;
    while i < bytes.len() && !is_tag_delimiter(bytes[i]) {
        i += 1;
    }
    let mut element = Element::new(&src[start + 1..i]);

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i)? {
            b'>' => {
                return Some((
                    StartTag {
                        element,
                        self_closing: false,
                    },
                    i + 1,
                ));
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                return Some((
                    StartTag {
                        element,
                        self_closing: true,
                    },
                    i + 2,
                ));
            }
            b'/' => {
                i += 1;
                continue;
            }
            _ => {}
        }

        let name_start = i;
        while i < bytes.len() && !is_tag_delimiter(bytes[i]) && bytes[i] != b'=' {
            i += 1;
        }
        let name = src[name_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let mut value = String::new();
        if bytes.get(i) == Some(&b'=') {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i)? {
                quote @ (b'"' | b'\'') => {
                    let close = src[i + 1..].find(*quote as char)? + i + 1;
                    value = decode_entities(&src[i + 1..close]);
                    i = close + 1;
                }
                _ => {
                    let value_start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    value = decode_entities(&src[value_start..i]);
                }
            }
        }
        if !name.is_empty() {
            element.push_attr_if_absent(name, value);
        }
    }
}

fn is_tag_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'>' || b == b'/'
}

/// Returns the raw content up to `</tag` (case-insensitive) and the offset
/// after that end tag's `>`, or the rest of the input and `None`. `lower` is
/// `src` lowercased.
fn take_raw_text<'a>(
    src: &'a str,
    lower: &str,
    from: usize,
    tag: &str,
) -> (&'a str, Option<usize>) {
    let needle = format!("</{tag}");
    let hay = &lower[from..];
    let mut search = 0;
    while let Some(found) = hay[search..].find(&needle) {
        let at = search + found;
        let after_name = at + needle.len();
        let boundary = hay.as_bytes().get(after_name).copied();
        let terminated = match boundary {
            None | Some(b'>' | b'/') => true,
            Some(b) => b.is_ascii_whitespace(),
        };
        if terminated {
            let end = hay[after_name..]
                .find('>')
                .map(|gt| from + after_name + gt + 1);
            return (&src[from..from + at], end);
        }
        search = after_name;
    }
    (&src[from..], None)
}

/// Decodes named and numeric character references. Anything unrecognised is
/// left untouched.
pub fn decode_entities(s: &str) -> String {
    html_escape::decode_html_entities(s).into_owned()
}
