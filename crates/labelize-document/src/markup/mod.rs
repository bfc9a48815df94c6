//! Document model
//!
//! A [`Document`] is a lossless sequence of [`Node`]s. The codecs only need
//! to locate markers, comments and text spans, so nothing here builds an
//! element tree; the one level of nesting is marker content, which holds
//! nodes of its own.

pub mod attributes;
pub mod escape;
pub(crate) mod tokenizer;

use crate::config::MarkupConfig;
use crate::error::{CodecError, CodecResult};
use crate::marker::Marker;
use crate::mention::MentionId;
use crate::selection::Selection;
use escape::escape_text;
use std::fmt::{self, Display, Formatter};

/// Elements whose content is never page text
const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];

/// One piece of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Any tag, doctype or processing instruction, kept verbatim
    Markup(String),
    /// Character data, still escaped
    Text(String),
    /// Comment body (between `<!--` and `-->`)
    Comment(String),
    /// Mention marker element
    Marker(Marker),
}

impl Node {
    pub(crate) fn render(&self, out: &mut String) {
        match self {
            Self::Markup(raw) | Self::Text(raw) => out.push_str(raw),
            Self::Comment(body) => {
                out.push_str("<!--");
                out.push_str(body);
                out.push_str("-->");
            }
            Self::Marker(marker) => marker.render(out),
        }
    }
}

/// Parsed annotation document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
    marker_tag: String,
}

impl Document {
    /// Parse `source` using the marker tag from `config`
    #[must_use]
    pub fn parse(source: &str, config: &MarkupConfig) -> Self {
        let nodes = tokenizer::tokenize(source, &config.marker_tag);
        tracing::trace!(nodes = nodes.len(), bytes = source.len(), "document parsed");
        Self {
            nodes,
            marker_tag: config.marker_tag.clone(),
        }
    }

    /// Marker element name
    #[inline]
    #[must_use]
    pub fn marker_tag(&self) -> &str {
        &self.marker_tag
    }

    /// All nodes in document order
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Serialize the document
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.render(&mut out);
        }
        out
    }

    /// Markers in document order, each followed by the markers nested in it
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        Markers {
            stack: vec![self.nodes.iter()],
        }
    }

    /// Call `f` on every marker, nested ones included
    pub(crate) fn for_each_marker_mut(&mut self, mut f: impl FnMut(&mut Marker)) {
        visit_markers_mut(&mut self.nodes, &mut f);
    }

    /// Number of markers
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers().count()
    }

    /// Marker by identity
    #[must_use]
    pub fn marker(&self, id: MentionId) -> Option<&Marker> {
        self.markers().find(|m| m.id() == id)
    }

    pub(crate) fn marker_mut(&mut self, id: MentionId) -> CodecResult<&mut Marker> {
        find_marker_mut(&mut self.nodes, id).ok_or(CodecError::UnknownMention(id))
    }

    /// Comments as `(node index, body)` in document order
    pub fn comments(&self) -> impl Iterator<Item = (usize, &str)> {
        self.nodes.iter().enumerate().filter_map(|(i, node)| match node {
            Node::Comment(body) => Some((i, body.as_str())),
            _ => None,
        })
    }

    /// First occurrence of `needle` inside a single text node
    #[must_use]
    pub fn find_text(&self, needle: &str) -> Option<Selection> {
        self.find_nth_text(needle, 0)
    }

    /// The `nth` (zero-based) non-overlapping occurrence of `needle`
    ///
    /// `needle` is plain text; it is matched against the escaped node text.
    /// Only page text is searched: text after `<body>` (or after `</head>`
    /// when there is no body tag), outside script, style, title and
    /// textarea elements, and outside existing markers. Occurrences spanning
    /// tags are not found.
    #[must_use]
    pub fn find_nth_text(&self, needle: &str, nth: usize) -> Option<Selection> {
        if needle.is_empty() {
            return None;
        }
        let escaped = escape_text(needle);
        self.page_text()
            .flat_map(|(i, text)| {
                text.match_indices(&*escaped)
                    .map(move |(start, m)| Selection::new(i, start..start + m.len()))
            })
            .nth(nth)
    }

    /// Top-level text nodes a reader sees on the page, with their indices
    fn page_text(&self) -> impl Iterator<Item = (usize, &str)> {
        let mut raw_text: Option<&str> = None;
        self.nodes
            .iter()
            .enumerate()
            .skip(self.body_start())
            .filter_map(move |(i, node)| match node {
                Node::Markup(tag) => {
                    let (name, closing) = tokenizer::tag_name(tag);
                    let open_element = raw_text;
                    match open_element {
                        Some(open) if closing && open.eq_ignore_ascii_case(name) => raw_text = None,
                        None if !closing && RAW_TEXT_ELEMENTS.iter().any(|e| e.eq_ignore_ascii_case(name)) => {
                            raw_text = Some(name);
                        }
                        _ => {}
                    }
                    None
                }
                Node::Text(text) if raw_text.is_none() => Some((i, text.as_str())),
                _ => None,
            })
    }

    /// Index of the first node after `<body>`, else after `</head>`, else 0
    fn body_start(&self) -> usize {
        let after = |wanted: &str, end_tag: bool| {
            self.nodes
                .iter()
                .position(|node| match node {
                    Node::Markup(tag) => {
                        let (name, closing) = tokenizer::tag_name(tag);
                        closing == end_tag && name.eq_ignore_ascii_case(wanted)
                    }
                    _ => false,
                })
                .map(|i| i + 1)
        };
        after("body", false).or_else(|| after("head", true)).unwrap_or(0)
    }

    /// Raw text covered by `selection`
    ///
    /// # Errors
    /// `InvalidSelection` unless the selection lies on character boundaries
    /// of a text node
    pub fn selected_raw(&self, selection: &Selection) -> CodecResult<&str> {
        let Some(Node::Text(text)) = self.nodes.get(selection.node()) else {
            return Err(CodecError::InvalidSelection(format!(
                "node {} is not a text node",
                selection.node()
            )));
        };
        text.get(selection.range()).ok_or_else(|| {
            CodecError::InvalidSelection(format!(
                "range {:?} outside text node {}",
                selection.range(),
                selection.node()
            ))
        })
    }

    /// Replace the selected span with the marker `build` makes from it
    ///
    /// # Errors
    /// `InvalidSelection` as for [`selected_raw`](Self::selected_raw)
    pub(crate) fn wrap(
        &mut self,
        selection: &Selection,
        build: impl FnOnce(&str) -> Marker,
    ) -> CodecResult<MentionId> {
        let index = selection.node();
        let range = selection.range();
        let selected = self.selected_raw(selection)?;
        let marker = build(selected);
        let id = marker.id();

        let Some(Node::Text(text)) = self.nodes.get(index) else {
            return Err(CodecError::InvalidSelection(format!("node {index} is not a text node")));
        };
        let before = text[..range.start].to_string();
        let after = text[range.end..].to_string();

        let mut replacement = Vec::with_capacity(3);
        if !before.is_empty() {
            replacement.push(Node::Text(before));
        }
        replacement.push(Node::Marker(marker));
        if !after.is_empty() {
            replacement.push(Node::Text(after));
        }
        self.nodes.splice(index..=index, replacement);
        Ok(id)
    }

    /// Replace a marker with its content, minus the delete affordance
    ///
    /// Markers nested in it stay. Returns the captured text.
    pub(crate) fn unwrap_marker(&mut self, id: MentionId) -> CodecResult<String> {
        let mut parents = Vec::new();
        let index = marker_position(&self.nodes, id, &mut parents).ok_or(CodecError::UnknownMention(id))?;
        let siblings = self.siblings_mut(&parents).ok_or(CodecError::UnknownMention(id))?;
        let Some(Node::Marker(marker)) = siblings.get_mut(index) else {
            return Err(CodecError::UnknownMention(id));
        };
        marker.strip_affordance();
        let text = marker.text();
        let children = marker.take_children();
        siblings.splice(index..=index, children);
        merge_adjacent_text(siblings);
        Ok(text)
    }

    /// Node list holding the node at `parents` + index
    fn siblings_mut(&mut self, parents: &[usize]) -> Option<&mut Vec<Node>> {
        let mut nodes = &mut self.nodes;
        for &index in parents {
            nodes = match nodes.get_mut(index) {
                Some(Node::Marker(marker)) => marker.children_mut(),
                _ => return None,
            };
        }
        Some(nodes)
    }

    /// Remove transient delete affordances from every marker
    ///
    /// Returns the number of markers changed.
    pub fn strip_affordances(&mut self) -> usize {
        let mut changed = 0;
        self.for_each_marker_mut(|marker| {
            if marker.strip_affordance() {
                changed += 1;
            }
        });
        changed
    }

    pub(crate) fn set_comment(&mut self, index: usize, body: String) {
        self.nodes[index] = Node::Comment(body);
    }

    pub(crate) fn remove_node(&mut self, index: usize) -> Node {
        self.nodes.remove(index)
    }

    pub(crate) fn insert_node(&mut self, index: usize, node: Node) {
        self.nodes.insert(index, node);
    }
}

/// Pre-order walk over markers at any depth
struct Markers<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Markers<'a> {
    type Item = &'a Marker;

    fn next(&mut self) -> Option<&'a Marker> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(Node::Marker(marker)) => {
                    self.stack.push(marker.children().iter());
                    return Some(marker);
                }
                Some(_) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

fn visit_markers_mut(nodes: &mut [Node], f: &mut impl FnMut(&mut Marker)) {
    for node in nodes {
        if let Node::Marker(marker) = node {
            f(marker);
            visit_markers_mut(marker.children_mut(), f);
        }
    }
}

fn find_marker_mut(nodes: &mut [Node], id: MentionId) -> Option<&mut Marker> {
    nodes.iter_mut().find_map(|node| match node {
        Node::Marker(marker) => {
            if marker.id() == id {
                Some(marker)
            } else {
                find_marker_mut(marker.children_mut(), id)
            }
        }
        _ => None,
    })
}

/// Index of marker `id` among its siblings; `parents` receives the path there
fn marker_position(nodes: &[Node], id: MentionId, parents: &mut Vec<usize>) -> Option<usize> {
    for (index, node) in nodes.iter().enumerate() {
        let Node::Marker(marker) = node else {
            continue;
        };
        if marker.id() == id {
            return Some(index);
        }
        parents.push(index);
        if let Some(found) = marker_position(marker.children(), id, parents) {
            return Some(found);
        }
        parents.pop();
    }
    None
}

fn merge_adjacent_text(nodes: &mut Vec<Node>) {
    let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in std::mem::take(nodes) {
        if let (Node::Text(text), Some(Node::Text(previous))) = (&node, merged.last_mut()) {
            previous.push_str(text);
            continue;
        }
        merged.push(node);
    }
    *nodes = merged;
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
