//! # Code Generator
//!
//! Serializes a [`crate::model::MappingModel`] into one transformation
//! script. Output is deterministic for a given model: fixed header, import
//! lines derived from the kinds in use, each non-entry module as a named
//! sub-routine in model order, and the entry point last.
//!
//! Mappings that cannot be rendered (empty target on an expression kind,
//! empty callee, unknown kind name) are skipped per mapping rather than
//! failing the whole generation.

mod emit;

pub use emit::{
    generate_script, script_imports, BANNER, CALL_PREFIX, SHEBANG, VERSION_MARKER,
};
