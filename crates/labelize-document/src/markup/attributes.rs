//! Tag attribute parsing and rendering
//!
//! Attribute names keep their source case; lookups through [`find`] ignore
//! case the way markup attribute names do.

use super::escape::{escape_attribute, unescape};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered attribute map (name → unescaped value)
pub type Attributes = IndexMap<String, String>;

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#).unwrap()
});

static BACKGROUND_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)background-color\s*:\s*([^;]+);?").unwrap());

/// Parse the attributes of an opening tag (`<name a="1" b>`)
///
/// Repeated attributes keep their first value.
#[must_use]
pub fn parse_tag_attributes(tag: &str) -> Attributes {
    let body = tag
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim_end_matches('/');
    let after_name = body
        .find(|c: char| c.is_whitespace())
        .map_or("", |i| &body[i..]);

    let mut attributes = Attributes::new();
    for caps in ATTRIBUTE.captures_iter(after_name) {
        let name = caps[1].to_string();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or(String::new(), |m| unescape(m.as_str()).into_owned());
        attributes.entry(name).or_insert(value);
    }
    attributes
}

/// Render attributes as ` name="value"` pairs
pub fn render_attributes(attributes: &Attributes, out: &mut String) {
    for (name, value) in attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(value));
        out.push('"');
    }
}

/// Case-insensitive lookup, preferring an exact match
#[must_use]
pub fn find<'a>(attributes: &'a Attributes, name: &str) -> Option<(&'a str, &'a str)> {
    attributes
        .get_key_value(name)
        .or_else(|| attributes.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)))
        .map(|(k, v)| (k.as_str(), v.as_str()))
}

/// `background-color` declared in an inline style
#[must_use]
pub fn style_background(style: &str) -> Option<&str> {
    BACKGROUND_COLOR
        .captures(style)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|color| !color.is_empty())
}

/// Replace (or add) the `background-color` declaration of an inline style
#[must_use]
pub fn with_background(style: &str, color: &str) -> String {
    let declaration = format!("background-color: {color};");
    if BACKGROUND_COLOR.is_match(style) {
        BACKGROUND_COLOR
            .replace(style, regex::NoExpand(&declaration))
            .into_owned()
    } else if style.trim().is_empty() {
        declaration
    } else {
        let style = style.trim_end();
        let separator = if style.ends_with(';') { " " } else { "; " };
        format!("{style}{separator}{declaration}")
    }
}
