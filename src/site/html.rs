//! Structured HTML construction.
//!
//! Pages are assembled from [`Element`] trees instead of string templates.
//! Text and attribute values are always escaped; author markup goes through
//! [`sanitize_rich_text`], which keeps a small set of inline tags.

use scraper::{ElementRef, Html};

use crate::models::{Icon, RichText};

/// Inline tags kept when sanitizing rich text. Attributes are always dropped.
const RICH_TEXT_TAGS: &[&str] = &["b", "strong", "i", "em", "u", "sup", "sub"];

/// Elements whose content is discarded entirely.
const DROPPED_TAGS: &[&str] = &["script", "style", "iframe", "object", "template"];

const VOID_TAGS: &[&str] = &["br", "img", "input", "link", "meta", "hr"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Markup already passed through [`sanitize_rich_text`].
    Sanitized(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn rich(mut self, text: &RichText) -> Self {
        self.children
            .push(Node::Sanitized(sanitize_rich_text(text.raw())));
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    /// Replace all children (used when a slot is populated).
    pub fn set_children(&mut self, children: Vec<Node>) {
        self.children = children;
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        out.push('>');
        if VOID_TAGS.contains(&self.tag) {
            return;
        }
        for child in &self.children {
            write_node(child, out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Element(element) => element.write_to(out),
        Node::Text(text) => out.push_str(&escape_text(text)),
        Node::Sanitized(html) => out.push_str(html),
    }
}

/// Render a sequence of sibling nodes.
pub fn render_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;").replace('\'', "&#39;")
}

/// Reduce author-supplied markup to text plus a few inline emphasis tags.
pub fn sanitize_rich_text(raw: &str) -> String {
    let fragment = Html::parse_fragment(raw);
    let mut out = String::new();
    write_sanitized(fragment.root_element(), &mut out);
    out
}

fn write_sanitized(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(&escape_text(text));
        } else if let Some(el) = ElementRef::wrap(child) {
            let name = el.value().name();
            if name == "br" {
                out.push_str("<br>");
                continue;
            }
            if DROPPED_TAGS.contains(&name) {
                continue;
            }
            let keep = RICH_TEXT_TAGS.contains(&name);
            if keep {
                out.push('<');
                out.push_str(name);
                out.push('>');
            }
            write_sanitized(el, out);
            if keep {
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }
}

/// Element for a link icon.
pub fn icon(icon: Icon) -> Node {
    match icon {
        Icon::Solid(name) => Element::new("i").class(format!("fas fa-{name}")).into(),
        Icon::Brand(name) => Element::new("i").class(format!("fab fa-{name}")).into(),
        Icon::Glyph(glyph) => Node::Text(glyph.to_string()),
    }
}
