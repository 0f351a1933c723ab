//! # Mapping Model
//!
//! In-memory representation of the mapping configuration: modules, their
//! ordered mapping entries and the transformation variants each field
//! mapping carries.
//!
//! The model is the hub of the crate. The [`crate::generator`] serializes
//! it into one transformation script, the [`crate::parser`] reconstructs it
//! from previously generated text, and the [`crate::diff`] engine compares
//! two snapshots of it for change reporting.

#[allow(clippy::module_inception)]
mod model;
mod types;

pub use model::{MappingModel, ModelError};
pub use types::{
    CompareOp, DatetimeUnit, DecimalOp, FieldMapping, IfBranch, Mapping, Module, ModuleCall,
    RegexOp, ScalarTransform, Transformation, MAIN_MODULE,
};
