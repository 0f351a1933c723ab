//! # Template Parser
//!
//! Recognizes text previously emitted by the [`crate::generator`] and
//! reconstructs a [`MappingModel`] from it. This is a line-oriented pattern
//! recognizer over a closed grammar subset, not a general-purpose language
//! parser: only the shapes the generator's earliest grammar produced
//! (direct assignments, ternary conditionals, module calls) are recovered.
//! Statement lines of generate-only kinds parse to nothing and are silently
//! dropped; that asymmetry is intentional scope-limiting and is surfaced by
//! the registry's `round_trippable` flag.
//!
//! Failure mode: a file in which zero mappings are recognized yields the
//! [`ParseOutcome::NoMappings`] sentinel; callers must leave any existing
//! model untouched in that case.

mod patterns;

use tracing::{debug, warn};

use crate::model::{
    CompareOp, Mapping, MappingModel, Module, ScalarTransform, Transformation, MAIN_MODULE,
};
use patterns::{
    dotted_target, CALL_ASSIGN, CHAIN_ASSIGN, COMMENT, MAIN_DEF, MODULE_CALL, OTHER_DEF,
    SINGLE_ASSIGN, SUB_DEF, TERNARY_ASSIGN,
};

/// Result of a template parse.
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    /// At least one mapping was recovered.
    Parsed(ParsedTemplate),
    /// Nothing in the text matched the template grammar.
    NoMappings,
}

/// A reconstructed model plus the recovered-mapping count for user feedback.
#[derive(Debug, Clone)]
pub struct ParsedTemplate {
    pub model: MappingModel,
    pub total_mappings: usize,
}

/// Single forward pass over `text` maintaining a current-module pointer.
///
/// Lines matching no classifier are ignored; that is how headers, imports,
/// docstrings and generate-only statement kinds fall away.
pub fn parse_template(text: &str) -> ParseOutcome {
    let mut modules: Vec<Module> = Vec::new();
    let mut current: Option<usize> = None;
    // Comment emitted ahead of a labeled module call; consumed by the next
    // recognized mapping line, dropped otherwise.
    let mut pending_comment: Option<String> = None;

    for line in text.lines() {
        if MAIN_DEF.is_match(line) {
            current = Some(open_module(&mut modules, MAIN_MODULE));
            pending_comment = None;
            continue;
        }
        if let Some(caps) = SUB_DEF.captures(line) {
            current = Some(open_module(&mut modules, &caps[1]));
            pending_comment = None;
            continue;
        }
        if OTHER_DEF.is_match(line) {
            // An unrelated function body must not be attributed to the
            // module above it.
            current = None;
            pending_comment = None;
            continue;
        }
        let Some(idx) = current else { continue };

        if let Some(caps) = COMMENT.captures(line) {
            pending_comment = Some(caps[1].to_string());
            continue;
        }
        match classify_line(line, pending_comment.take()) {
            Some(mapping) => modules[idx].push_mapping(mapping),
            None => debug!(line, "line matched no template pattern"),
        }
    }

    let total: usize = modules.iter().map(|m| m.mappings.len()).sum();
    if total == 0 {
        warn!("no mappings recognized in template text");
        return ParseOutcome::NoMappings;
    }
    ParseOutcome::Parsed(ParsedTemplate {
        model: MappingModel::from_modules(modules),
        total_mappings: total,
    })
}

/// Find or create the module named `name` and return its index.
fn open_module(modules: &mut Vec<Module>, name: &str) -> usize {
    if let Some(idx) = modules.iter().position(|m| m.name == name) {
        return idx;
    }
    modules.push(Module::new(name));
    modules.len() - 1
}

/// Ordered line classifiers. Priority must stay fixed: a module call first,
/// then the single-level assignment, the nested bracket chain, the ternary
/// conditional, and last the named-call assignment.
fn classify_line(line: &str, pending_comment: Option<String>) -> Option<Mapping> {
    if let Some(caps) = MODULE_CALL.captures(line) {
        let mapping = match pending_comment {
            Some(label) => Mapping::module_call_labeled(&caps[1], label),
            None => Mapping::module_call(&caps[1]),
        };
        return Some(mapping);
    }
    if let Some(caps) = SINGLE_ASSIGN.captures(line) {
        return Some(direct_mapping(&caps[1], &caps[2], caps.get(3).map(|m| m.as_str())));
    }
    if let Some(caps) = CHAIN_ASSIGN.captures(line) {
        let target = dotted_target(&caps[1]);
        return Some(direct_mapping(&target, &caps[2], caps.get(3).map(|m| m.as_str())));
    }
    if let Some(caps) = TERNARY_ASSIGN.captures(line) {
        let target = dotted_target(&caps[1]);
        let operator = CompareOp::from_symbol(&caps[4])?;
        return Some(Mapping::field(
            target,
            Transformation::Conditional {
                field: caps[3].to_string(),
                operator,
                value: caps[5].to_string(),
                then_value: branch_value(&caps[2]),
                else_value: branch_value(&caps[6]),
            },
        ));
    }
    if let Some(caps) = CALL_ASSIGN.captures(line) {
        let target = dotted_target(&caps[1]);
        return Some(Mapping::field(
            target,
            Transformation::Direct {
                source: caps[3].to_string(),
                transform: Some(ScalarTransform::Custom(caps[2].to_string())),
            },
        ));
    }
    None
}

fn direct_mapping(target: &str, source: &str, transform: Option<&str>) -> Mapping {
    Mapping::field(
        target,
        Transformation::Direct {
            source: source.to_string(),
            transform: transform.map(ScalarTransform::from_name),
        },
    )
}

/// Undo the generator's branch rendering: `INPUT.` references become dotted
/// paths again, quoted literals lose their quotes.
fn branch_value(expr: &str) -> String {
    let expr = expr.trim();
    if let Some(path) = expr.strip_prefix("INPUT.") {
        return path.to_string();
    }
    let unquoted = expr
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(expr);
    unquoted.to_string()
}
