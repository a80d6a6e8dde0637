use foundation::math::{Placement, Vec2};

use crate::attributes::{AttributeError, parse_pair, parse_placement};
use crate::markup::{
    self, ESCAPABLE_RAW_TEXT_ELEMENTS, MarkupError, RAW_TEXT_ELEMENTS, VOID_ELEMENTS,
};

/// A node in a parsed fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An owned element. Tag and attribute names are stored lowercase; attribute
/// order follows the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Sets an attribute, replacing an existing value of the same name.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name.to_ascii_lowercase(), value)),
        }
    }

    /// Appends an attribute unless one of the same name exists (first wins).
    pub(crate) fn push_attr_if_absent(&mut self, name: String, value: String) {
        if self.attr(&name).is_none() {
            self.attributes.push((name, value));
        }
    }

    pub(crate) fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Appends text, merging with a trailing text node.
    pub(crate) fn push_text(&mut self, text: &str) {
        match self.children.last_mut() {
            Some(Node::Text(last)) => last.push_str(text),
            _ => self.children.push(Node::Text(text.to_string())),
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Direct element children in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// All element descendants (not including `self`) in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    pub fn descendants_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> {
        self.descendants().filter(move |e| e.is(tag))
    }

    /// Outermost descendants named `tag` that have no `fence` ancestor below
    /// `self`. Matches are not searched for nested matches.
    pub fn descendants_outside<'a>(&'a self, tag: &str, fence: &str) -> Vec<&'a Element> {
        let mut out = Vec::new();
        collect_outside(self, tag, fence, &mut out);
        out
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Local placement from the `xy`/`angle` attributes.
    pub fn placement(&self) -> Result<Placement, AttributeError> {
        parse_placement(self.attr("xy"), self.attr("angle"))
    }

    /// The `size` attribute, if present.
    pub fn size(&self) -> Result<Option<Vec2>, AttributeError> {
        self.attr("size").map(|v| parse_pair("size", v)).transpose()
    }

    /// Serialises back to HTML, suitable for `innerHTML`.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

fn collect_outside<'a>(el: &'a Element, tag: &str, fence: &str, out: &mut Vec<&'a Element>) {
    for child in el.child_elements() {
        if child.is(tag) {
            out.push(child);
        } else if !child.is(fence) {
            collect_outside(child, tag, fence, out);
        }
    }
}

fn collect_text(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(e, out),
        }
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for (k, v) in &el.attributes {
        out.push(' ');
        out.push_str(k);
        out.push_str("=\"");
        html_escape::encode_double_quoted_attribute_to_string(v, out);
        out.push('"');
    }
    out.push('>');
    if VOID_ELEMENTS.contains(&el.name.as_str()) {
        return;
    }
    // Escapable raw text (textarea, title) is re-encoded like normal text.
    let raw = RAW_TEXT_ELEMENTS.contains(&el.name.as_str())
        && !ESCAPABLE_RAW_TEXT_ELEMENTS.contains(&el.name.as_str());
    for child in &el.children {
        match child {
            Node::Element(e) => write_element(e, out),
            Node::Text(t) if raw => out.push_str(t),
            Node::Text(t) => {
                html_escape::encode_text_to_string(t, out);
            }
        }
    }
    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}

/// Pre-order iterator over element descendants.
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some(Node::Element(e)) => {
                    self.stack.push(e.children.iter());
                    return Some(e);
                }
                Some(Node::Text(_)) => continue,
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

/// A parsed markup fragment.
///
/// Parsing never fails; recoverable problems are kept in [`Document::errors`].
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Element,
    errors: Vec<MarkupError>,
}

impl Document {
    pub fn parse(src: &str) -> Self {
        let (root, errors) = markup::parse(src);
        Self { root, errors }
    }

    /// Synthetic container holding the top-level nodes.
    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn errors(&self) -> &[MarkupError] {
        &self.errors
    }

    pub fn find_first(&self, tag: &str) -> Option<&Element> {
        self.root.descendants().find(|e| e.is(tag))
    }

    /// The first `<world>` element, which roots this fragment.
    pub fn world(&self) -> Option<&Element> {
        self.find_first("world")
    }

    /// Trimmed text of the first `<title>`, if non-empty.
    pub fn title(&self) -> Option<String> {
        let title = self.find_first("title")?.text();
        let title = title.trim();
        (!title.is_empty()).then(|| title.to_string())
    }

    /// Outermost elements named `tag` that are not inside any `<world>`.
    pub fn outside_worlds(&self, tag: &str) -> Vec<&Element> {
        self.root.descendants_outside(tag, "world")
    }
}
