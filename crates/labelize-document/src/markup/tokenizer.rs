//! Lossless markup tokenizer
//!
//! Splits source text into [`Node`]s. Concatenating the rendered nodes of an
//! untouched document reproduces the input exactly: anything that does not
//! parse as a comment, a tag or a complete marker element stays text. Marker
//! content is tokenized the same way, so nested markers become child nodes.

use super::attributes::parse_tag_attributes;
use super::Node;
use crate::marker::Marker;

/// Tokenize `source`, recognizing `marker_tag` elements as markers
pub(crate) fn tokenize(source: &str, marker_tag: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while let Some(offset) = source[pos..].find('<') {
        let start = pos + offset;
        let rest = &source[start..];

        if let Some(body) = rest.strip_prefix("<!--") {
            let Some(close) = body.find("-->") else {
                break;
            };
            flush_text(source, text_start, start, &mut nodes);
            nodes.push(Node::Comment(body[..close].to_string()));
            pos = start + 4 + close + 3;
            text_start = pos;
            continue;
        }

        if !starts_tag(rest) {
            pos = start + 1;
            continue;
        }
        let Some(tag_len) = tag_length(rest) else {
            break;
        };
        let tag = &rest[..tag_len];

        if is_open_tag_named(tag, marker_tag) {
            if let Some(node) = marker_at(source, start, tag_len, marker_tag) {
                let consumed = node.1;
                flush_text(source, text_start, start, &mut nodes);
                nodes.push(Node::Marker(node.0));
                pos = start + consumed;
                text_start = pos;
                continue;
            }
        }

        flush_text(source, text_start, start, &mut nodes);
        nodes.push(Node::Markup(tag.to_string()));
        pos = start + tag_len;
        text_start = pos;
    }

    flush_text(source, text_start, source.len(), &mut nodes);
    nodes
}

fn flush_text(source: &str, from: usize, to: usize, nodes: &mut Vec<Node>) {
    if from < to {
        nodes.push(Node::Text(source[from..to].to_string()));
    }
}

/// `<` followed by a tag name, an end tag, a declaration or a processing instruction
fn starts_tag(rest: &str) -> bool {
    rest[1..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

/// Byte length of the tag starting at `rest[0]`, honoring quoted attribute values
pub(crate) fn tag_length(rest: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in rest.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(i + 1),
            (None, _) => {}
        }
    }
    None
}

/// Tag name and whether it is an end tag
pub(crate) fn tag_name(tag: &str) -> (&str, bool) {
    let body = tag.trim_start_matches('<');
    let (body, closing) = match body.strip_prefix('/') {
        Some(body) => (body, true),
        None => (body, false),
    };
    let end = body
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(body.len());
    (&body[..end], closing)
}

pub(crate) fn is_open_tag_named(tag: &str, name: &str) -> bool {
    let (tag_name, closing) = tag_name(tag);
    !closing && tag_name.eq_ignore_ascii_case(name)
}

/// Parse a complete marker element starting at `source[start]`
///
/// Returns the marker and the number of bytes it spans, or `None` when the
/// element is never closed.
fn marker_at(source: &str, start: usize, open_len: usize, marker_tag: &str) -> Option<(Marker, usize)> {
    let open = &source[start..start + open_len];
    let attributes = parse_tag_attributes(open);
    let tag = tag_name(open).0.to_string();

    if open.trim_end_matches('>').ends_with('/') {
        let marker = Marker::from_source(tag, attributes, open.to_string(), Vec::new(), String::new());
        return Some((marker, open_len));
    }

    let inner_start = start + open_len;
    let mut depth = 1usize;
    let mut pos = inner_start;
    while let Some(offset) = source[pos..].find('<') {
        let at = pos + offset;
        let rest = &source[at..];
        if let Some(body) = rest.strip_prefix("<!--") {
            pos = at + 4 + body.find("-->")? + 3;
            continue;
        }
        let Some(len) = tag_length(rest).filter(|_| starts_tag(rest)) else {
            pos = at + 1;
            continue;
        };
        let (name, closing) = tag_name(&rest[..len]);
        if name.eq_ignore_ascii_case(marker_tag) {
            if closing {
                depth -= 1;
                if depth == 0 {
                    let children = tokenize(&source[inner_start..at], marker_tag);
                    let close = rest[..len].to_string();
                    let marker = Marker::from_source(tag, attributes, open.to_string(), children, close);
                    return Some((marker, at + len - start));
                }
            } else if !rest[..len].trim_end_matches('>').ends_with('/') {
                depth += 1;
            }
        }
        pos = at + len;
    }
    None
}
