//! Entity escaping for text and attribute values

use quick_xml::escape::{escape, partial_escape, resolve_html5_entity, unescape_with};
use std::borrow::Cow;

/// Decode character references (`&amp;`, `&#233;`, `&nbsp;`, ...)
///
/// Input that is not well-formed (a bare `&`) is returned unchanged.
#[must_use]
pub fn unescape(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }
    unescape_with(raw, |entity| resolve_html5_entity(entity)).unwrap_or(Cow::Borrowed(raw))
}

/// Escape an attribute value for a double-quoted attribute
#[inline]
#[must_use]
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    escape(value)
}

/// Escape character data
#[inline]
#[must_use]
pub fn escape_text(value: &str) -> Cow<'_, str> {
    partial_escape(value)
}
