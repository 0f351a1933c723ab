//! # Change Diff Engine
//!
//! Compares two model snapshots (the "original" recovered from a loaded
//! template vs. the live model) into added / removed / modified / unchanged
//! sets for change reporting.
//!
//! Each model is flattened to a map keyed by `(module name, discriminating
//! key)` where the key is `field:<target>` for field mappings and
//! `call:<callee>` for module calls; the prefixes keep the two keyspaces
//! from colliding. Duplicate targets within a module collapse to the later
//! entry, mirroring the generator's last-write-wins semantics. Comparison
//! inspects a fixed attribute subset: kind name, source, transform name and
//! callee name.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::{Mapping, MappingModel};

/// One flattened mapping, annotated with its owning module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffEntry {
    pub module: String,
    pub key: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callee: Option<String>,
}

impl DiffEntry {
    fn from_mapping(module: &str, mapping: &Mapping) -> Self {
        match mapping {
            Mapping::Field(field) => DiffEntry {
                module: module.to_string(),
                key: format!("field:{}", field.target),
                kind: field.transform.kind_name().to_string(),
                source: field.transform.source_attr().map(str::to_string),
                transform: field.transform.transform_name().map(str::to_string),
                callee: None,
            },
            Mapping::ModuleCall(call) => DiffEntry {
                module: module.to_string(),
                key: format!("call:{}", call.module_name),
                kind: "module_call".to_string(),
                source: None,
                transform: None,
                callee: Some(call.module_name.clone()),
            },
        }
    }

    /// The compared attribute subset; module and key equality is implied by
    /// how entries are paired up.
    fn same_as(&self, other: &DiffEntry) -> bool {
        self.kind == other.kind
            && self.source == other.source
            && self.transform == other.transform
            && self.callee == other.callee
    }
}

/// A mapping present in both snapshots whose compared attributes differ.
#[derive(Debug, Clone, Serialize)]
pub struct ModifiedEntry {
    pub original: DiffEntry,
    pub current: DiffEntry,
}

/// Classification of every mapping across two snapshots.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelDiff {
    /// False when no original snapshot exists (nothing was ever loaded);
    /// all sets are empty then and callers should present a "new
    /// configuration" state.
    pub has_baseline: bool,
    pub added: Vec<DiffEntry>,
    pub removed: Vec<DiffEntry>,
    pub modified: Vec<ModifiedEntry>,
    pub unchanged: Vec<DiffEntry>,
}

impl ModelDiff {
    /// True when the snapshots agree on every mapping.
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    pub fn total_changes(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}

type FlatKey = (String, String);

/// Flatten in model order; the ordered key list drives deterministic
/// reporting, the map drives pairing.
fn flatten(model: &MappingModel) -> (Vec<FlatKey>, HashMap<FlatKey, DiffEntry>) {
    let mut order = Vec::new();
    let mut entries = HashMap::new();
    for module in &model.modules {
        for mapping in &module.mappings {
            let entry = DiffEntry::from_mapping(&module.name, mapping);
            let key = (entry.module.clone(), entry.key.clone());
            if entries.insert(key.clone(), entry).is_none() {
                order.push(key);
            }
        }
    }
    (order, entries)
}

/// Compare two snapshots. `original == None` means no template was ever
/// loaded; the report is empty and flagged as having no baseline.
pub fn diff_models(original: Option<&MappingModel>, current: &MappingModel) -> ModelDiff {
    let Some(original) = original else {
        return ModelDiff::default();
    };

    let (orig_order, orig_entries) = flatten(original);
    let (curr_order, mut curr_entries) = flatten(current);

    let mut diff = ModelDiff {
        has_baseline: true,
        ..ModelDiff::default()
    };

    for key in &curr_order {
        let entry = curr_entries
            .remove(key)
            .expect("flatten inserts every ordered key");
        match orig_entries.get(key) {
            Some(orig) if orig.same_as(&entry) => diff.unchanged.push(entry),
            Some(orig) => diff.modified.push(ModifiedEntry {
                original: orig.clone(),
                current: entry,
            }),
            None => diff.added.push(entry),
        }
    }

    for key in &orig_order {
        if !curr_order.contains(key) {
            if let Some(entry) = orig_entries.get(key) {
                diff.removed.push(entry.clone());
            }
        }
    }

    diff
}
