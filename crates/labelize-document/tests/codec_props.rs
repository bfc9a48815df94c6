use labelize_document::{Document, MarkupConfig, MentionCodec, SchemaCodec};
use labelize_taxonomy::{LabelPath, LabelTaxonomy, ParameterSpec};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,6}"
}

fn spec_strategy() -> impl Strategy<Value = ParameterSpec> {
    prop_oneof![
        "[a-z -]{0,8}".prop_map(ParameterSpec::string),
        any::<bool>().prop_map(ParameterSpec::checkbox),
        proptest::collection::vec("[a-z]{1,4}", 0..4).prop_map(ParameterSpec::dropdown),
    ]
}

/// Random taxonomy: (parent index, name, color index, parameters) per label
fn taxonomy_strategy() -> impl Strategy<Value = LabelTaxonomy> {
    let label = (
        0..12usize,
        name_strategy(),
        0..7usize,
        proptest::collection::vec((name_strategy(), spec_strategy()), 0..3),
    );
    proptest::collection::vec(label, 1..12).prop_map(|labels| {
        let mut taxonomy = LabelTaxonomy::new();
        let mut paths = vec![LabelPath::root()];
        for (parent_idx, name, color_idx, params) in labels {
            let parent = paths[parent_idx % paths.len()].clone();
            let color = labelize_taxonomy::DEFAULT_PALETTE[color_idx];
            if taxonomy.add_label(&parent, &name, color).is_err() {
                continue;
            }
            let path = parent.child(name);
            for (param, spec) in params {
                let _ = taxonomy.add_parameter(&path, &param, spec);
            }
            paths.push(path);
        }
        taxonomy
    })
}

const PAGE: &str = "<!DOCTYPE html><html><head><title>t</title></head><body><p>alpha beta gamma</p></body></html>";

proptest! {
    #[test]
    fn prop_descriptor_round_trip(taxonomy in taxonomy_strategy()) {
        let codec = SchemaCodec::default();
        let mut doc = Document::parse(PAGE, &MarkupConfig::default());
        codec.embed(&mut doc, &taxonomy).unwrap();

        let reloaded = Document::parse(&doc.render(), &MarkupConfig::default());
        let rebuilt = codec.build(&codec.extract(&reloaded).unwrap()).unwrap();

        let expected: Vec<_> = taxonomy.enumerate().collect();
        let actual: Vec<_> = rebuilt.enumerate().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_encode_then_decode_recovers_defaults(taxonomy in taxonomy_strategy(), pick in 0..12usize) {
        let paths = taxonomy.label_paths();
        let path = paths[pick % paths.len()].clone();
        let label = taxonomy.resolve(&path).unwrap();

        let mut doc = Document::parse(PAGE, &MarkupConfig::default());
        let selection = doc.find_text("beta").unwrap();
        MentionCodec.encode(&mut doc, &selection, &path, &taxonomy).unwrap();

        let reloaded = Document::parse(&doc.render(), &MarkupConfig::default());
        let mentions = MentionCodec.decode_all(&reloaded, &taxonomy);
        prop_assert_eq!(mentions.len(), 1);
        prop_assert_eq!(&mentions[0].label_path, &path);
        prop_assert_eq!(mentions[0].text.as_str(), "beta");
        for (name, spec) in label.parameters() {
            let default = spec.default_value();
            prop_assert_eq!(mentions[0].value(name), Some(default.as_str()));
        }
    }
}

#[test]
fn test_set_value_survives_reload_for_that_mention_only() {
    let mut taxonomy = LabelTaxonomy::new();
    let item = LabelPath::single("Item");
    taxonomy.add_label(&LabelPath::root(), "Item", "#ffc107").unwrap();
    taxonomy.add_parameter(&item, "size", ParameterSpec::string("1")).unwrap();

    let mut doc = Document::parse(PAGE, &MarkupConfig::default());
    let alpha = doc.find_text("alpha").unwrap();
    let first = MentionCodec.encode(&mut doc, &alpha, &item, &taxonomy).unwrap();
    let gamma = doc.find_text("gamma").unwrap();
    MentionCodec.encode(&mut doc, &gamma, &item, &taxonomy).unwrap();
    MentionCodec
        .set_parameter_value(&mut doc, first.id, "size", "42", &taxonomy)
        .unwrap();

    let reloaded = Document::parse(&doc.render(), &MarkupConfig::default());
    let values: Vec<_> = MentionCodec
        .decode_all(&reloaded, &taxonomy)
        .into_iter()
        .map(|m| m.value("size").map(str::to_string))
        .collect();
    assert_eq!(values, vec![Some("42".to_string()), Some("1".to_string())]);
    assert_eq!(
        taxonomy.resolve(&item).unwrap().parameter("size").unwrap().default_value(),
        "1"
    );
}

#[test]
fn test_custom_marker_tag_and_sentinel() {
    let config = MarkupConfig::default()
        .with_marker_tag("mark")
        .with_schema_sentinel("my-schema");
    let mut taxonomy = LabelTaxonomy::new();
    taxonomy.add_label(&LabelPath::root(), "Word", "#e83e8c").unwrap();

    let mut doc = Document::parse(PAGE, &config);
    let sel = doc.find_text("alpha").unwrap();
    MentionCodec
        .encode(&mut doc, &sel, &LabelPath::single("Word"), &taxonomy)
        .unwrap();
    let schema = SchemaCodec::new(&config.schema_sentinel);
    schema.embed(&mut doc, &taxonomy).unwrap();

    let out = doc.render();
    assert!(out.contains("<mark labelName=\"Word\""));
    assert!(out.contains("<!-- my-schema\n"));

    let reloaded = Document::parse(&out, &config);
    assert_eq!(reloaded.marker_count(), 1);
    assert_eq!(schema.build(&schema.extract(&reloaded).unwrap()).unwrap(), taxonomy);
}
