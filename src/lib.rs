//! # MapForge
//!
//! **MapForge** is the engine behind a visual field-mapping tool: a user
//! describes how fields of one structured record (INPUT) map onto fields of
//! another structured record (OUTPUT), and MapForge turns that description
//! into a runnable transformation script — then turns such a script back
//! into the in-memory model when it is re-uploaded.
//!
//! ## Overview
//!
//! The crate is a bidirectional model↔script transducer with three moving
//! parts that carry all of the real invariants:
//!
//! - a deterministic **code generator** (model → text),
//! - a pattern-driven **template parser** recovering a model from text the
//!   generator previously produced (a closed grammar subset — not a
//!   general-purpose language parser),
//! - a **change diff engine** comparing two model snapshots into
//!   added/removed/modified/unchanged sets.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`model`]** - modules, ordered mapping entries and transformation variants
//! - **[`registry`]** - fixed catalog of transformation kinds with render
//!   functions and capability flags
//! - **[`generator`]** - deterministic model-to-script emission
//! - **[`parser`]** - line-oriented template recognition
//! - **[`diff`]** - snapshot comparison for change reporting
//! - **[`schema`]** - flattening of nested records into browsable field lists
//! - **[`automap`]** - name-similarity mapping proposals
//! - **[`ids`]** - ULID-backed module/mapping identifiers
//! - **[`cli`]** - the `mapforge-cli` collaborator layer (file I/O, reports)
//!
//! ### Transducer Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant Model as model::MappingModel
//!     participant Gen as generator::generate_script
//!     participant Parser as parser::parse_template
//!     participant Diff as diff::diff_models
//!
//!     User->>Model: edit modules / mappings
//!     User->>Gen: render on demand
//!     Gen-->>User: transformation script (text)
//!
//!     User->>Parser: upload previously generated script
//!     Parser->>Parser: classify lines (closed grammar)
//!     alt zero mappings recovered
//!         Parser-->>User: NoMappings (state untouched)
//!     else
//!         Parser-->>Model: reconstructed model ("original" snapshot)
//!     end
//!
//!     User->>Diff: original vs. live model
//!     Diff-->>User: added / removed / modified / unchanged
//! ```
//!
//! ## Round-Trip Guarantees
//!
//! For models built only from direct, conditional and module-call mappings
//! with non-empty targets, `parse(generate(m))` reproduces a model the diff
//! engine classifies as entirely unchanged, and
//! `generate(parse(generate(m)))` is byte-identical to `generate(m)`.
//! Later transformation kinds (loops, if blocks, datetime, decimal, regex)
//! are generate-only: parsing a script containing them silently drops those
//! lines. The [`registry`] exposes this asymmetry as a `round_trippable`
//! capability flag per kind.
//!
//! ## Quick Start
//!
//! ```
//! use mapforge::model::{Mapping, MappingModel};
//! use mapforge::generator::generate_script;
//! use mapforge::parser::{parse_template, ParseOutcome};
//!
//! let mut model = MappingModel::new();
//! let main = model.main_mut().expect("fresh models have an entry point");
//! main.push_mapping(Mapping::direct("CUSTOMER.NAME", "customer.name"));
//!
//! let script = generate_script(&model);
//! assert!(script.contains("OUTPUT[\"CUSTOMER\"][\"NAME\"] = INPUT.customer.name"));
//!
//! match parse_template(&script) {
//!     ParseOutcome::Parsed(parsed) => assert_eq!(parsed.total_mappings, 1),
//!     ParseOutcome::NoMappings => unreachable!("the script was just generated"),
//! }
//! ```
//!
//! ## Error Posture
//!
//! Every core function is total over its documented input domain: render
//! functions substitute placeholder tokens for unset parameters, the
//! generator skips unrenderable mappings per mapping, and the parser
//! reports a sentinel instead of failing when nothing is recognized. File
//! I/O errors exist only in the [`cli`] collaborator layer.

pub mod automap;
pub mod cli;
pub mod diff;
pub mod generator;
pub mod ids;
pub mod model;
pub mod parser;
pub mod registry;
pub mod schema;

pub use diff::{diff_models, DiffEntry, ModelDiff, ModifiedEntry};
pub use generator::{generate_script, script_imports};
pub use model::{
    CompareOp, FieldMapping, Mapping, MappingModel, ModelError, Module, ModuleCall,
    ScalarTransform, Transformation, MAIN_MODULE,
};
pub use parser::{parse_template, ParseOutcome, ParsedTemplate};
pub use registry::{registry, ImportNeeds, KindDescriptor, TransformRegistry};
pub use schema::{flatten_schema, SchemaField};
