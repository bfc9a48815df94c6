//! Testing utilities for Labelize workspace
//!
//! Shared fixtures: pages and ready-made sessions.

#![allow(missing_docs)]

use labelize_core::{LabelizeConfig, Session};
use labelize_taxonomy::{LabelPath, ParameterSpec};

pub const PERSON_COLOR: &str = "#6aa3ff";

pub const SAMPLE_PAGE: &str = "<!DOCTYPE html>\n<html><head><title>Notes</title></head>\
<body><p>Marie Curie was born in Warsaw.</p><p>Pierre Curie met Marie Curie in Paris.</p></body></html>";

/// Markers without a descriptor, as a browser serialized them: lowercased
/// attribute names and `rgb()` backgrounds
pub const LEGACY_PAGE: &str = "<html><head></head><body><p>\
<manual_label labelname=\"Person\" parent=\"\" role=\"subject\" style=\"background-color: rgb(255, 107, 107); color: black;\">Marie Curie</manual_label> \
lived in <manual_label labelname=\"City\" parent=\"Place\" color=\"#20c997\">Paris</manual_label>.\
</p></body></html>";

/// Config with a fixed color seed
pub fn test_config() -> LabelizeConfig {
    LabelizeConfig::default().with_color_seed(42)
}

/// Session with [`SAMPLE_PAGE`] loaded and the Person label defined
pub fn person_session() -> Session {
    let mut session = Session::new(test_config());
    session.load_document(SAMPLE_PAGE);
    session
        .add_label(&LabelPath::root(), "Person", Some(PERSON_COLOR))
        .unwrap();
    session
        .add_parameter(
            &LabelPath::single("Person"),
            "role",
            ParameterSpec::dropdown(["author", "subject"]),
        )
        .unwrap();
    session
}

/// [`person_session`] plus a Place/City/District chain; City has a `capital` checkbox
pub fn nested_session() -> Session {
    let mut session = person_session();
    let place = LabelPath::single("Place");
    let city = place.child("City");
    session.add_label(&LabelPath::root(), "Place", Some("#20c997")).unwrap();
    session.add_label(&place, "City", Some("#ffa94d")).unwrap();
    session.add_label(&city, "District", Some("#b197fc")).unwrap();
    session
        .add_parameter(&city, "capital", ParameterSpec::checkbox(false))
        .unwrap();
    session
}

/// Label the `nth` occurrence of `needle` in `session`
pub fn label_text(session: &mut Session, needle: &str, nth: usize, path: &LabelPath) -> labelize_document::Mention {
    let selection = session.select_text(needle, nth).unwrap();
    session.apply_label(&selection, path).unwrap()
}
