//! Codecs between documents and the taxonomy model
//!
//! - [`MentionCodec`]: markers ⇄ [`Mention`](crate::Mention)s
//! - [`SchemaCodec`]: descriptor comment ⇄ [`LabelTaxonomy`](labelize_taxonomy::LabelTaxonomy)
//! - [`infer_taxonomy`]: label definitions recovered from markers alone

mod infer;
mod mention;
mod schema;

pub use infer::infer_taxonomy;
pub use mention::MentionCodec;
pub use schema::SchemaCodec;

use crate::marker::Marker;
use crate::markup::attributes::style_background;
use labelize_taxonomy::{css_color_to_hex, LabelPath};

pub(crate) const LABEL_NAME: &str = "labelName";
pub(crate) const PARENT: &str = "parent";
pub(crate) const LABEL_PATH: &str = "labelPath";
pub(crate) const STYLE: &str = "style";
pub(crate) const COLOR: &str = "color";

/// Label path a marker points at
///
/// A `labelPath` array wins when it ends in the marker's `labelName`;
/// otherwise the path is `[parent, labelName]`, or `[labelName]` for an
/// empty parent. `None` when `labelName` is missing or blank.
pub(crate) fn marker_path(marker: &Marker) -> Option<LabelPath> {
    let name = marker.attribute(LABEL_NAME).map(str::trim).filter(|n| !n.is_empty())?;

    let full = marker
        .attribute(LABEL_PATH)
        .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
        .filter(|segments| {
            segments.last().map(String::as_str) == Some(name) && segments.iter().all(|s| !s.trim().is_empty())
        });
    if let Some(segments) = full {
        return Some(LabelPath::new(segments));
    }

    let path = match marker.attribute(PARENT).map(str::trim).filter(|p| !p.is_empty()) {
        Some(parent) => LabelPath::new(vec![parent.to_string(), name.to_string()]),
        None => LabelPath::single(name),
    };
    Some(path)
}

/// Colors a marker declares: explicit `color` first, then its inline background
pub(crate) fn color_candidates(marker: &Marker) -> impl Iterator<Item = &str> {
    let explicit = marker.attribute(COLOR).map(str::trim);
    let background = marker.attribute(STYLE).and_then(style_background);
    explicit.into_iter().chain(background).filter(|c| !c.is_empty())
}

/// First declared color that reads as a CSS color, normalized to hex
pub(crate) fn declared_color(marker: &Marker) -> Option<String> {
    color_candidates(marker).find_map(css_color_to_hex)
}

/// Declared color for display: normalized when readable, else as written
pub(crate) fn marker_color(marker: &Marker) -> Option<String> {
    declared_color(marker).or_else(|| color_candidates(marker).next().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarkupConfig;
    use crate::markup::Document;

    fn first_marker(src: &str) -> Marker {
        let doc = Document::parse(src, &MarkupConfig::default());
        let marker = doc.markers().next().cloned().unwrap();
        marker
    }

    #[test]
    fn path_from_name_and_parent() {
        let m = first_marker(r#"<manual_label labelName="Author" parent="Person">x</manual_label>"#);
        assert_eq!(marker_path(&m), Some(LabelPath::from(["Person", "Author"])));
        let m = first_marker(r#"<manual_label labelName=" Person " parent="">x</manual_label>"#);
        assert_eq!(marker_path(&m), Some(LabelPath::single("Person")));
    }

    #[test]
    fn label_path_must_agree_with_name() {
        let m = first_marker(
            r#"<manual_label labelName="Poet" parent="Author" labelPath='["Person","Author","Poet"]'>x</manual_label>"#,
        );
        assert_eq!(marker_path(&m), Some(LabelPath::from(["Person", "Author", "Poet"])));

        let m = first_marker(
            r#"<manual_label labelName="Poet" parent="Author" labelPath='["Person","Other"]'>x</manual_label>"#,
        );
        assert_eq!(marker_path(&m), Some(LabelPath::from(["Author", "Poet"])));
    }

    #[test]
    fn missing_name_has_no_path() {
        let m = first_marker(r#"<manual_label labelName="  ">x</manual_label>"#);
        assert_eq!(marker_path(&m), None);
    }

    #[test]
    fn color_prefers_explicit_attribute() {
        let m = first_marker(r##"<manual_label color="#111111" style="background-color: #222222">x</manual_label>"##);
        assert_eq!(marker_color(&m).as_deref(), Some("#111111"));
        let m = first_marker(r##"<manual_label style="background-color: #222222">x</manual_label>"##);
        assert_eq!(marker_color(&m).as_deref(), Some("#222222"));
    }

    #[test]
    fn browser_colors_are_normalized() {
        let m = first_marker(r#"<manual_label style="background-color: rgb(106, 163, 255); color: black;">x</manual_label>"#);
        assert_eq!(declared_color(&m).as_deref(), Some("#6aa3ff"));
        let m = first_marker(r#"<manual_label color="bogus" style="background-color: tomato">x</manual_label>"#);
        assert_eq!(declared_color(&m).as_deref(), Some("#ff6347"));
        assert_eq!(marker_color(&m).as_deref(), Some("#ff6347"));
        let m = first_marker(r#"<manual_label color="bogus">x</manual_label>"#);
        assert_eq!(declared_color(&m), None);
        assert_eq!(marker_color(&m).as_deref(), Some("bogus"));
    }
}
