use labelize_taxonomy::{LabelPath, LabelTaxonomy, TaxonomyError};
use proptest::prelude::*;

fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 _-]{0,8}".prop_map(|s| s.trim().to_string())
}

/// Build a taxonomy from (parent index, name) pairs, returning every path that
/// was actually added.
fn build(ops: &[(usize, String)]) -> (LabelTaxonomy, Vec<LabelPath>) {
    let mut taxonomy = LabelTaxonomy::new();
    let mut paths = vec![LabelPath::root()];
    for (parent_idx, name) in ops {
        let parent = paths[parent_idx % paths.len()].clone();
        if taxonomy.add_label(&parent, name, "#6aa3ff").is_ok() {
            paths.push(parent.child(name.clone()));
        }
    }
    paths.remove(0);
    (taxonomy, paths)
}

proptest! {
    #[test]
    fn prop_add_then_resolve(ops in proptest::collection::vec((0..16usize, name_strategy()), 1..24)) {
        let (taxonomy, paths) = build(&ops);
        for path in &paths {
            let label = taxonomy.resolve(path).expect("added path resolves");
            prop_assert_eq!(label.name(), path.last().unwrap());
            prop_assert_eq!(label.color(), "#6aa3ff");
        }
        prop_assert_eq!(taxonomy.label_count(), paths.len());
    }

    #[test]
    fn prop_duplicate_rejected_without_mutation(ops in proptest::collection::vec((0..16usize, name_strategy()), 1..24)) {
        let (mut taxonomy, paths) = build(&ops);
        let target = paths[0].clone();
        let parent = target.parent().unwrap();
        let before = taxonomy.clone();

        let result = taxonomy.add_label(&parent, target.last().unwrap(), "#000000");
        let duplicate = matches!(result, Err(TaxonomyError::DuplicateName { .. }));
        prop_assert!(duplicate);
        prop_assert_eq!(taxonomy, before);
    }

    #[test]
    fn prop_remove_drops_prefixed_paths(
        ops in proptest::collection::vec((0..16usize, name_strategy()), 1..24),
        pick in 0..24usize,
    ) {
        let (mut taxonomy, paths) = build(&ops);
        let target = paths[pick % paths.len()].clone();
        taxonomy.remove_label(&target).unwrap();

        for (path, _) in taxonomy.enumerate() {
            prop_assert!(!path.segments().starts_with(target.segments()));
        }
        let survivors = paths
            .iter()
            .filter(|p| !p.segments().starts_with(target.segments()))
            .count();
        prop_assert_eq!(taxonomy.enumerate().count(), survivors);
    }

    #[test]
    fn prop_enumerate_parent_before_child(ops in proptest::collection::vec((0..16usize, name_strategy()), 1..24)) {
        let (taxonomy, _) = build(&ops);
        let order: Vec<LabelPath> = taxonomy.label_paths();
        for (i, path) in order.iter().enumerate() {
            if let Some(parent) = path.parent().filter(|p| !p.is_empty()) {
                let parent_pos = order.iter().position(|p| *p == parent).unwrap();
                prop_assert!(parent_pos < i);
            }
        }
    }
}

#[test]
fn test_siblings_keep_insertion_order() {
    let mut taxonomy = LabelTaxonomy::new();
    for name in ["zeta", "alpha", "mu"] {
        taxonomy.add_label(&LabelPath::root(), name, "#fff").unwrap();
    }
    let names: Vec<&str> = taxonomy.roots().keys().map(String::as_str).collect();
    assert_eq!(names, ["zeta", "alpha", "mu"]);
}
