//! Inline mention markers
//!
//! A [`Marker`] is the element wrapping one labeled span. Its content is a
//! node list of its own, so markers nested inside it are markers too. An
//! untouched start tag renders as written; changing an attribute switches
//! the start and end tags to the normalized form.

use crate::markup::attributes::{self, render_attributes, Attributes};
use crate::markup::escape::unescape;
use crate::markup::tokenizer::tag_name;
use crate::markup::Node;
use crate::mention::MentionId;
use once_cell::sync::Lazy;
use regex::Regex;

/// Transient delete button the editor injects into every marker
static AFFORDANCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<button\b[^>]*\bclass\s*=\s*["']?[^"'>]*\bdelete-btn\b[^>]*>.*?</button\s*>"#).unwrap()
});

/// Start tag of the delete button
static AFFORDANCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)^<button\b[^>]*\bclass\s*=\s*["']?[^"'>]*\bdelete-btn\b"#).unwrap());

static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->|<[^>]*>").unwrap());

/// Start and end tag exactly as read
#[derive(Debug, Clone, PartialEq, Eq)]
struct SourceTags {
    open: String,
    close: String,
}

/// Marker element inside a [`Document`](crate::Document)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    id: MentionId,
    tag: String,
    attributes: Attributes,
    children: Vec<Node>,
    source: Option<SourceTags>,
}

impl Marker {
    /// Marker read from source text; `close` is empty for a self-closing tag
    pub(crate) fn from_source(
        tag: String,
        attributes: Attributes,
        open: String,
        children: Vec<Node>,
        close: String,
    ) -> Self {
        Self {
            id: MentionId::new(),
            tag,
            attributes,
            children,
            source: Some(SourceTags { open, close }),
        }
    }

    /// Freshly encoded marker around raw (escaped) text
    pub(crate) fn new(tag: impl Into<String>, attributes: Attributes, inner: impl Into<String>) -> Self {
        let inner = inner.into();
        let children = if inner.is_empty() { Vec::new() } else { vec![Node::Text(inner)] };
        Self {
            id: MentionId::new(),
            tag: tag.into(),
            attributes,
            children,
            source: None,
        }
    }

    /// Session-local identity
    #[inline]
    #[must_use]
    pub fn id(&self) -> MentionId {
        self.id
    }

    /// Element name as written
    #[inline]
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// All attributes in document order
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Attribute value, matching the name case-insensitively
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        attributes::find(&self.attributes, name).map(|(_, value)| value)
    }

    /// Set an attribute, keeping the position and spelling of an existing one
    pub(crate) fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        let key = attributes::find(&self.attributes, name).map_or_else(|| name.to_string(), |(k, _)| k.to_string());
        if self.attributes.get(&key) == Some(&value) {
            return;
        }
        self.attributes.insert(key, value);
        self.source = None;
    }

    /// Content nodes, nested markers included
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Raw inner markup
    #[must_use]
    pub fn inner(&self) -> String {
        let mut out = String::new();
        self.render_children(&mut out);
        out
    }

    fn render_children(&self, out: &mut String) {
        for child in &self.children {
            child.render(out);
        }
    }

    /// Captured text: inner markup without tags, comments or the delete affordance
    ///
    /// Text of nested markers is part of it.
    #[must_use]
    pub fn text(&self) -> String {
        let inner = self.inner();
        let without_affordance = AFFORDANCE.replace_all(&inner, "");
        let plain = MARKUP.replace_all(&without_affordance, "");
        unescape(&plain).into_owned()
    }

    /// Drop the delete affordance from this marker's own content
    ///
    /// Nested markers keep theirs. Returns true if anything was removed.
    pub(crate) fn strip_affordance(&mut self) -> bool {
        let mut changed = false;
        while let Some(range) = affordance_range(&self.children) {
            self.children.drain(range);
            changed = true;
        }
        changed
    }

    /// True while the start tag still renders as written
    #[inline]
    #[must_use]
    pub fn is_pristine(&self) -> bool {
        self.source.is_some()
    }

    /// Take the content out, leaving the marker empty
    pub(crate) fn take_children(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.children)
    }

    pub(crate) fn render(&self, out: &mut String) {
        match &self.source {
            Some(SourceTags { open, close }) => {
                out.push_str(open);
                self.render_children(out);
                out.push_str(close);
            }
            None => {
                out.push('<');
                out.push_str(&self.tag);
                render_attributes(&self.attributes, out);
                out.push('>');
                self.render_children(out);
                out.push_str("</");
                out.push_str(&self.tag);
                out.push('>');
            }
        }
    }
}

/// Node range of the first delete button, start tag through end tag
fn affordance_range(children: &[Node]) -> Option<std::ops::Range<usize>> {
    let start = children
        .iter()
        .position(|node| matches!(node, Node::Markup(tag) if AFFORDANCE_OPEN.is_match(tag)))?;
    let end = children[start..].iter().position(|node| match node {
        Node::Markup(tag) => {
            let (name, closing) = tag_name(tag);
            closing && name.eq_ignore_ascii_case("button")
        }
        _ => false,
    })?;
    Some(start..start + end + 1)
}
