//! Line classifiers for the template grammar.
//!
//! Each pattern recognizes exactly one textual shape the generator emits.
//! Priority order lives in [`super::classify_line`]; the patterns here are
//! fully anchored so an earlier classifier can never swallow a line that
//! belongs to a later one (a nested bracket chain does not match the
//! single-level assignment rule, a ternary matches neither).

use once_cell::sync::Lazy;
use regex::Regex;

/// `def transform(INPUT):` opens the entry-point module.
pub(crate) static MAIN_DEF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^def transform\(INPUT\):\s*$").expect("failed to compile main def pattern")
});

/// `def process_<name>(INPUT, OUTPUT):` opens a sub-routine module.
pub(crate) static SUB_DEF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^def process_([A-Za-z_][A-Za-z0-9_]*)\(INPUT, OUTPUT\):\s*$")
        .expect("failed to compile sub def pattern")
});

/// Any other function definition closes the current module so unrelated
/// bodies are not attributed to it.
pub(crate) static OTHER_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^def ").expect("failed to compile def pattern"));

/// `process_<name>(INPUT, OUTPUT)` invocation inside a module body.
pub(crate) static MODULE_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*process_([A-Za-z_][A-Za-z0-9_]*)\(INPUT, OUTPUT\)\s*$")
        .expect("failed to compile module call pattern")
});

/// Comment line; the generator emits one ahead of a labeled module call.
pub(crate) static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*# (.*\S)\s*$").expect("failed to compile comment pattern"));

/// `OUTPUT["k"] = INPUT.src` with an optional built-in string transform.
pub(crate) static SINGLE_ASSIGN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*OUTPUT\["([^"]+)"\] = INPUT\.([A-Za-z_][A-Za-z0-9_.]*?)(?:\.(upper|lower|capitalize)\(\))?\s*$"#,
    )
    .expect("failed to compile single assignment pattern")
});

/// `OUTPUT["k1"]["k2"]... = INPUT.src` for nested targets.
pub(crate) static CHAIN_ASSIGN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*OUTPUT((?:\["[^"]+"\]){2,}) = INPUT\.([A-Za-z_][A-Za-z0-9_.]*?)(?:\.(upper|lower|capitalize)\(\))?\s*$"#,
    )
    .expect("failed to compile bracket chain pattern")
});

/// Ternary conditional assignment.
pub(crate) static TERNARY_ASSIGN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*OUTPUT((?:\["[^"]+"\])+) = (.+?) if INPUT\.([A-Za-z_][A-Za-z0-9_.]*) (==|!=|>|<) "([^"]*)" else (.+?)\s*$"#,
    )
    .expect("failed to compile ternary pattern")
});

/// `OUTPUT[...] = name(INPUT.src)` — direct mapping with a named transform.
pub(crate) static CALL_ASSIGN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*OUTPUT((?:\["[^"]+"\])+) = ([A-Za-z_][A-Za-z0-9_]*)\(INPUT\.([A-Za-z_][A-Za-z0-9_.]*)\)\s*$"#,
    )
    .expect("failed to compile call assignment pattern")
});

/// Bracketed key extractor used to rebuild dotted targets.
pub(crate) static BRACKET_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\["([^"]+)"\]"#).expect("failed to compile bracket key pattern"));

/// Rebuild a dotted target from a `["a"]["b"]` chain.
pub(crate) fn dotted_target(chain: &str) -> String {
    BRACKET_KEY
        .captures_iter(chain)
        .map(|c| c[1].to_string())
        .collect::<Vec<_>>()
        .join(".")
}
