use tracing::{debug, warn};

use crate::model::{Mapping, MappingModel, Module};
use crate::registry::{registry, ImportNeeds};

/// Interpreter marker, first line of every generated script.
pub const SHEBANG: &str = "#!/usr/bin/env python3";

/// Fixed template version marker; the parser's reload support keys off the
/// surrounding grammar, the marker identifies the emitting format.
pub const VERSION_MARKER: &str = "# mapforge:template-v1";

/// Banner docstring following the marker lines.
pub const BANNER: &str = "\"\"\"Transformation script generated by MapForge.\"\"\"";

/// Prefix of every generated sub-routine name.
pub const CALL_PREFIX: &str = "process_";

const INDENT: &str = "    ";

/// Aggregate import needs across every mapping in the model.
pub fn script_imports(model: &MappingModel) -> ImportNeeds {
    let reg = registry();
    let mut needs = ImportNeeds::NONE;
    for module in &model.modules {
        for mapping in &module.mappings {
            if let Mapping::Field(field) = mapping {
                if let Some(desc) = reg.lookup(field.transform.kind_name()) {
                    needs = needs.merge(desc.imports);
                }
            }
        }
    }
    needs
}

/// Render the whole model as one script. Deterministic: repeated calls with
/// an unchanged model yield byte-identical text.
pub fn generate_script(model: &MappingModel) -> String {
    let mut out = String::new();
    out.push_str(SHEBANG);
    out.push('\n');
    out.push_str(VERSION_MARKER);
    out.push('\n');
    out.push_str(BANNER);
    out.push('\n');
    out.push('\n');

    let needs = script_imports(model);
    if needs.any() {
        if needs.re {
            out.push_str("import re\n");
        }
        if needs.datetime {
            out.push_str("from datetime import datetime, timedelta\n");
        }
        if needs.decimal {
            out.push_str("from decimal import Decimal\n");
        }
        out.push('\n');
    }

    for module in &model.modules {
        if module.is_main() || module.mappings.is_empty() {
            continue;
        }
        emit_submodule(&mut out, module);
    }

    match model.main() {
        Some(main) => emit_main(&mut out, main),
        None => {
            // A model built through the public constructors always has an
            // entry point; a hand-edited JSON file may not.
            warn!("model has no entry-point module, emitting an empty one");
            let placeholder = Module::new(crate::model::MAIN_MODULE);
            emit_main(&mut out, &placeholder);
        }
    }

    out
}

fn emit_submodule(out: &mut String, module: &Module) {
    out.push_str(&format!("def {CALL_PREFIX}{}(INPUT, OUTPUT):\n", module.name));
    out.push_str(&format!(
        "{INDENT}\"\"\"Mapping module: {}.\"\"\"\n",
        module.name
    ));
    for mapping in &module.mappings {
        emit_mapping(out, mapping);
    }
    out.push('\n');
}

fn emit_main(out: &mut String, module: &Module) {
    out.push_str("def transform(INPUT):\n");
    out.push_str(&format!(
        "{INDENT}\"\"\"Entry point: build OUTPUT from INPUT.\"\"\"\n"
    ));
    out.push_str(&format!("{INDENT}OUTPUT = {{}}\n"));
    for mapping in &module.mappings {
        emit_mapping(out, mapping);
    }
    out.push_str(&format!("{INDENT}return OUTPUT\n"));
}

fn emit_mapping(out: &mut String, mapping: &Mapping) {
    match mapping {
        Mapping::ModuleCall(call) => {
            if call.module_name.is_empty() {
                debug!(mapping = %call.id, "skipping module call with empty callee");
                return;
            }
            if let Some(label) = call.label.as_deref().filter(|l| !l.is_empty()) {
                out.push_str(&format!("{INDENT}# {label}\n"));
            }
            out.push_str(&format!(
                "{INDENT}{CALL_PREFIX}{}(INPUT, OUTPUT)\n",
                call.module_name
            ));
        }
        Mapping::Field(field) => {
            let Some(desc) = registry().lookup(field.transform.kind_name()) else {
                warn!(
                    kind = field.transform.kind_name(),
                    "skipping mapping with unknown transformation kind"
                );
                return;
            };
            if desc.emits_statement {
                out.push_str(&format!("{INDENT}{}\n", desc.generate(field)));
                return;
            }
            if field.target.is_empty() {
                debug!(mapping = %field.id, "skipping field mapping without a target");
                return;
            }
            let lhs: String = field
                .target
                .split('.')
                .map(|key| format!("[\"{key}\"]"))
                .collect();
            out.push_str(&format!("{INDENT}OUTPUT{lhs} = {}\n", desc.generate(field)));
        }
    }
}
