use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{Mapping, Module, MAIN_MODULE};

/// In-memory representation of all modules and their ordered mappings.
///
/// The model is process-local mutable state with no concurrent writers.
/// Its only durable form is the generated script text; the JSON form used
/// by the CLI is an interchange convenience on top of the serde derives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingModel {
    pub modules: Vec<Module>,
}

impl Default for MappingModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingModel {
    /// Fresh model holding only the empty entry-point module.
    pub fn new() -> Self {
        Self {
            modules: vec![Module::new(MAIN_MODULE)],
        }
    }

    /// Build a model from parsed modules, installing an empty entry-point
    /// module when none was recovered.
    pub fn from_modules(modules: Vec<Module>) -> Self {
        let mut model = Self { modules };
        if model.main().is_none() {
            model.modules.push(Module::new(MAIN_MODULE));
        }
        model
    }

    pub fn main(&self) -> Option<&Module> {
        self.modules.iter().find(|m| m.is_main())
    }

    pub fn main_mut(&mut self) -> Option<&mut Module> {
        self.modules.iter_mut().find(|m| m.is_main())
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn module_mut(&mut self, name: &str) -> Option<&mut Module> {
        self.modules.iter_mut().find(|m| m.name == name)
    }

    /// Add an empty module. The entry-point name is reserved and module
    /// names must stay unique.
    pub fn add_module(&mut self, name: &str) -> Result<&mut Module, ModelError> {
        if name == MAIN_MODULE {
            return Err(ModelError::ReservedName {
                name: name.to_string(),
            });
        }
        if name.is_empty() {
            return Err(ModelError::EmptyName);
        }
        if self.module(name).is_some() {
            return Err(ModelError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.modules.push(Module::new(name));
        Ok(self
            .modules
            .last_mut()
            .expect("module was just pushed"))
    }

    /// Rename a non-entry-point module, keeping names unique. Call sites
    /// referring to the old name are left untouched; the caller decides
    /// whether to rewrite them.
    pub fn rename_module(&mut self, old: &str, new: &str) -> Result<(), ModelError> {
        if old == MAIN_MODULE {
            return Err(ModelError::MainImmutable);
        }
        if new == MAIN_MODULE {
            return Err(ModelError::ReservedName {
                name: new.to_string(),
            });
        }
        if new.is_empty() {
            return Err(ModelError::EmptyName);
        }
        if old != new && self.module(new).is_some() {
            return Err(ModelError::DuplicateName {
                name: new.to_string(),
            });
        }
        match self.module_mut(old) {
            Some(module) => {
                module.name = new.to_string();
                Ok(())
            }
            None => Err(ModelError::UnknownModule {
                name: old.to_string(),
            }),
        }
    }

    /// Remove a non-entry-point module and return it.
    pub fn remove_module(&mut self, name: &str) -> Result<Module, ModelError> {
        if name == MAIN_MODULE {
            return Err(ModelError::MainImmutable);
        }
        match self.modules.iter().position(|m| m.name == name) {
            Some(idx) => Ok(self.modules.remove(idx)),
            None => Err(ModelError::UnknownModule {
                name: name.to_string(),
            }),
        }
    }

    pub fn total_mappings(&self) -> usize {
        self.modules.iter().map(|m| m.mappings.len()).sum()
    }

    /// Wholesale replacement, e.g. after a successful template load.
    pub fn replace(&mut self, other: MappingModel) {
        *self = other;
    }
}

/// Structural guard violated while mutating the module list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The entry-point name is reserved for the entry point itself.
    ReservedName { name: String },
    /// Module names are unique across the model.
    DuplicateName { name: String },
    /// The entry-point module is never deleted or renamed.
    MainImmutable,
    /// No module with that name exists.
    UnknownModule { name: String },
    /// Modules need a non-empty name to be callable.
    EmptyName,
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::ReservedName { name } => {
                write!(f, "module name '{}' is reserved for the entry point", name)
            }
            ModelError::DuplicateName { name } => {
                write!(f, "a module named '{}' already exists", name)
            }
            ModelError::MainImmutable => {
                write!(f, "the '{}' module cannot be renamed or removed", MAIN_MODULE)
            }
            ModelError::UnknownModule { name } => {
                write!(f, "no module named '{}'", name)
            }
            ModelError::EmptyName => write!(f, "module names must not be empty"),
        }
    }
}

impl std::error::Error for ModelError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mapping;

    #[test]
    fn new_model_holds_only_main() {
        let model = MappingModel::new();
        assert_eq!(model.modules.len(), 1);
        assert!(model.main().is_some());
    }

    #[test]
    fn main_name_is_reserved() {
        let mut model = MappingModel::new();
        assert!(matches!(
            model.add_module(MAIN_MODULE),
            Err(ModelError::ReservedName { .. })
        ));
    }

    #[test]
    fn duplicate_module_names_rejected() {
        let mut model = MappingModel::new();
        model.add_module("address").unwrap();
        assert!(matches!(
            model.add_module("address"),
            Err(ModelError::DuplicateName { .. })
        ));
    }

    #[test]
    fn main_cannot_be_removed_or_renamed() {
        let mut model = MappingModel::new();
        assert!(matches!(
            model.remove_module(MAIN_MODULE),
            Err(ModelError::MainImmutable)
        ));
        assert_eq!(
            model.rename_module(MAIN_MODULE, "other"),
            Err(ModelError::MainImmutable)
        );
    }

    #[test]
    fn replace_mapping_by_index() {
        let mut model = MappingModel::new();
        let main = model.main_mut().unwrap();
        main.push_mapping(Mapping::direct("x", "a"));
        assert!(main.replace_mapping(0, Mapping::direct("x", "b")));
        assert!(!main.replace_mapping(5, Mapping::direct("y", "c")));
        assert_eq!(main.mappings.len(), 1);
    }

    #[test]
    fn from_modules_installs_missing_main() {
        let model = MappingModel::from_modules(vec![Module::new("helper")]);
        assert!(model.main().is_some());
        assert_eq!(model.modules.len(), 2);
    }
}
