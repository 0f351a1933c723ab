//! # Auto-Map Heuristic
//!
//! Proposes direct field mappings by name similarity: an OUTPUT field whose
//! path, lowercased with underscores removed, exactly equals some INPUT
//! field's normalized path gets a direct mapping. First INPUT match wins;
//! everything else is left unmapped. Applying the result replaces the
//! target module's mapping list wholesale.

use std::collections::HashMap;

use tracing::info;

use crate::model::{Mapping, MappingModel};
use crate::schema::SchemaField;

/// Case- and underscore-insensitive comparison form of a field path.
pub fn normalize_path(path: &str) -> String {
    path.to_lowercase().replace('_', "")
}

/// Build direct mappings for every OUTPUT leaf field with a
/// normalized-equal INPUT counterpart. Container entries are skipped; their
/// children are mapped individually.
pub fn auto_map(input_fields: &[SchemaField], output_fields: &[SchemaField]) -> Vec<Mapping> {
    let mut by_norm: HashMap<String, &SchemaField> = HashMap::new();
    for field in input_fields {
        // First occurrence wins for colliding normalized names.
        by_norm.entry(normalize_path(&field.path)).or_insert(field);
    }

    output_fields
        .iter()
        .filter(|out| out.field_type != "object")
        .filter_map(|out| {
            by_norm
                .get(&normalize_path(&out.path))
                .map(|source| Mapping::direct(out.path.clone(), source.path.clone()))
        })
        .collect()
}

/// Replace `module_name`'s mapping list with auto-mapped entries.
/// Destructive: existing mappings in that module are dropped, not merged.
/// Returns the number of mappings installed, or `None` when the module
/// does not exist.
pub fn apply_auto_map(
    model: &mut MappingModel,
    module_name: &str,
    input_fields: &[SchemaField],
    output_fields: &[SchemaField],
) -> Option<usize> {
    let mappings = auto_map(input_fields, output_fields);
    let module = model.module_mut(module_name)?;
    let count = mappings.len();
    module.replace_mappings(mappings);
    info!(module = module_name, count, "auto-map replaced module mappings");
    Some(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(path: &str) -> SchemaField {
        SchemaField {
            path: path.to_string(),
            field_type: "string".to_string(),
            depth: path.matches('.').count(),
        }
    }

    #[test]
    fn normalization_strips_case_and_underscores() {
        assert_eq!(
            normalize_path("CUSTOMER.FIRST_NAME"),
            normalize_path("customer.firstName")
        );
        assert_eq!(normalize_path("A_B_C"), "abc");
    }

    #[test]
    fn first_input_match_wins() {
        let inputs = vec![field("user_id"), field("userId")];
        let outputs = vec![field("USERID")];
        let mappings = auto_map(&inputs, &outputs);
        assert_eq!(mappings.len(), 1);
        match &mappings[0] {
            Mapping::Field(f) => {
                assert!(matches!(
                    &f.transform,
                    crate::model::Transformation::Direct { source, .. } if source == "user_id"
                ));
            }
            _ => panic!("expected field mapping"),
        }
    }
}
