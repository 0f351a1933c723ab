use mapforge::automap::{apply_auto_map, auto_map};
use mapforge::model::{Mapping, MappingModel, Transformation, MAIN_MODULE};
use mapforge::schema::flatten_schema;
use serde_json::json;

fn direct_parts(mapping: &Mapping) -> (&str, &str) {
    match mapping {
        Mapping::Field(f) => match &f.transform {
            Transformation::Direct { source, .. } => (f.target.as_str(), source.as_str()),
            other => panic!("expected direct transformation, got {other:?}"),
        },
        other => panic!("expected field mapping, got {other:?}"),
    }
}

#[test]
fn test_case_and_underscore_insensitive_match() {
    let input_fields = flatten_schema(&json!({
        "customer": { "firstName": "Ada" }
    }));
    let output_fields = flatten_schema(&json!({
        "CUSTOMER": { "FIRST_NAME": "" }
    }));

    let mappings = auto_map(&input_fields, &output_fields);
    assert_eq!(mappings.len(), 1);
    let (target, source) = direct_parts(&mappings[0]);
    assert_eq!(target, "CUSTOMER.FIRST_NAME");
    assert_eq!(source, "customer.firstName");
}

#[test]
fn test_unmatched_fields_stay_unmapped() {
    let input_fields = flatten_schema(&json!({ "order_id": 1 }));
    let output_fields = flatten_schema(&json!({ "ORDERID": "", "TOTAL": "" }));

    let mappings = auto_map(&input_fields, &output_fields);
    assert_eq!(mappings.len(), 1);
    let (target, _) = direct_parts(&mappings[0]);
    assert_eq!(target, "ORDERID");
}

#[test]
fn test_apply_replaces_module_mappings_destructively() {
    let mut model = MappingModel::new();
    model
        .main_mut()
        .unwrap()
        .push_mapping(Mapping::direct("stale", "old.source"));

    let input_fields = flatten_schema(&json!({ "name": "x" }));
    let output_fields = flatten_schema(&json!({ "NAME": "" }));

    let count = apply_auto_map(&mut model, MAIN_MODULE, &input_fields, &output_fields);
    assert_eq!(count, Some(1));
    let main = model.main().unwrap();
    assert_eq!(main.mappings.len(), 1);
    let (target, source) = direct_parts(&main.mappings[0]);
    assert_eq!(target, "NAME");
    assert_eq!(source, "name");
}

#[test]
fn test_apply_to_unknown_module_is_a_no_op() {
    let mut model = MappingModel::new();
    let count = apply_auto_map(&mut model, "missing", &[], &[]);
    assert_eq!(count, None);
}
