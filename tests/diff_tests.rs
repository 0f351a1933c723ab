use mapforge::diff::diff_models;
use mapforge::model::{Mapping, MappingModel};

fn main_model(mappings: Vec<Mapping>) -> MappingModel {
    let mut model = MappingModel::new();
    model.main_mut().unwrap().replace_mappings(mappings);
    model
}

#[test]
fn test_modified_added_removed_classification() {
    let original = main_model(vec![Mapping::direct("x", "a")]);
    let current = main_model(vec![Mapping::direct("x", "b"), Mapping::direct("y", "c")]);

    let report = diff_models(Some(&original), &current);
    assert!(report.has_baseline);
    assert_eq!(report.modified.len(), 1);
    assert_eq!(report.modified[0].current.key, "field:x");
    assert_eq!(report.modified[0].original.source.as_deref(), Some("a"));
    assert_eq!(report.modified[0].current.source.as_deref(), Some("b"));
    assert_eq!(report.added.len(), 1);
    assert_eq!(report.added[0].key, "field:y");
    assert!(report.removed.is_empty());
    assert!(report.unchanged.is_empty());
}

#[test]
fn test_removed_mappings_are_reported() {
    let original = main_model(vec![Mapping::direct("x", "a"), Mapping::direct("y", "b")]);
    let current = main_model(vec![Mapping::direct("x", "a")]);

    let report = diff_models(Some(&original), &current);
    assert_eq!(report.removed.len(), 1);
    assert_eq!(report.removed[0].key, "field:y");
    assert_eq!(report.unchanged.len(), 1);
    assert!(report.modified.is_empty());
}

#[test]
fn test_field_and_call_keyspaces_do_not_collide() {
    // A field targeting "x" and a call to a module named "x" are different
    // mappings and must never pair up.
    let original = main_model(vec![Mapping::direct("x", "a")]);
    let current = main_model(vec![Mapping::module_call("x")]);

    let report = diff_models(Some(&original), &current);
    assert_eq!(report.added.len(), 1);
    assert_eq!(report.added[0].key, "call:x");
    assert_eq!(report.removed.len(), 1);
    assert_eq!(report.removed[0].key, "field:x");
    assert!(report.modified.is_empty());
}

#[test]
fn test_same_target_in_different_modules_is_distinct() {
    let mut original = MappingModel::new();
    original
        .main_mut()
        .unwrap()
        .push_mapping(Mapping::direct("x", "a"));
    let mut current = MappingModel::new();
    current
        .add_module("helper")
        .unwrap()
        .push_mapping(Mapping::direct("x", "a"));

    let report = diff_models(Some(&original), &current);
    assert_eq!(report.added.len(), 1);
    assert_eq!(report.removed.len(), 1);
}

#[test]
fn test_duplicate_targets_collapse_to_last_write() {
    let original = main_model(vec![Mapping::direct("x", "a"), Mapping::direct("x", "b")]);
    let current = main_model(vec![Mapping::direct("x", "b")]);

    let report = diff_models(Some(&original), &current);
    assert!(report.is_unchanged(), "{report:?}");
    assert_eq!(report.unchanged.len(), 1);
}

#[test]
fn test_callee_rename_is_added_plus_removed() {
    // Same key only when the callee matches, so a rename shows up as
    // removed + added rather than modified.
    let original = main_model(vec![Mapping::module_call("billing")]);
    let current = main_model(vec![Mapping::module_call("invoicing")]);

    let report = diff_models(Some(&original), &current);
    assert_eq!(report.added.len(), 1);
    assert_eq!(report.removed.len(), 1);
    assert!(report.modified.is_empty());
}

#[test]
fn test_no_baseline_reports_empty_sets() {
    let current = main_model(vec![Mapping::direct("x", "a")]);
    let report = diff_models(None, &current);
    assert!(!report.has_baseline);
    assert!(report.added.is_empty());
    assert!(report.removed.is_empty());
    assert!(report.modified.is_empty());
    assert!(report.unchanged.is_empty());
    assert_eq!(report.total_changes(), 0);
}

#[test]
fn test_transform_change_is_modified() {
    use mapforge::model::{ScalarTransform, Transformation};
    let original = main_model(vec![Mapping::direct("name", "customer.name")]);
    let current = main_model(vec![Mapping::field(
        "name",
        Transformation::Direct {
            source: "customer.name".to_string(),
            transform: Some(ScalarTransform::Upper),
        },
    )]);

    let report = diff_models(Some(&original), &current);
    assert_eq!(report.modified.len(), 1);
    assert_eq!(report.modified[0].current.transform.as_deref(), Some("upper"));
}
