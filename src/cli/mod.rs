//! Command-line interface for MapForge.
//!
//! The CLI is the collaborator layer around the core: it reads model and
//! schema files, writes generated scripts, and prints parse/diff summaries.
//! All file I/O errors surface here; the core stays total.

mod commands;

pub use commands::{run_cli, Cli, Commands};
