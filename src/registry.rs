//! # Transformation Registry
//!
//! Fixed catalog of mapping kinds. Each kind exposes a pure, total render
//! function plus capability flags the generator and parser consult:
//!
//! - `round_trippable` — the template parser can recover the kind from
//!   generated text. Only the earliest grammar (direct, conditional, plus
//!   the module-call shape owned by the generator) qualifies; every later
//!   kind is generate-only.
//! - `emits_statement` — the kind renders a complete statement line instead
//!   of the right-hand side of an `OUTPUT[...] = ...` assignment.
//!
//! Render functions never fail: unset parameters fall back to placeholder
//! tokens such as `field`, `value`, `1` or `pattern`.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::model::{DecimalOp, FieldMapping, IfBranch, RegexOp, Transformation};

/// Import lines a kind pulls into the generated script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportNeeds {
    pub re: bool,
    pub datetime: bool,
    pub decimal: bool,
}

impl ImportNeeds {
    pub const NONE: Self = Self {
        re: false,
        datetime: false,
        decimal: false,
    };
    pub const RE: Self = Self {
        re: true,
        datetime: false,
        decimal: false,
    };
    pub const DATETIME: Self = Self {
        re: false,
        datetime: true,
        decimal: false,
    };
    pub const DECIMAL: Self = Self {
        re: false,
        datetime: false,
        decimal: true,
    };

    pub fn merge(self, other: Self) -> Self {
        Self {
            re: self.re || other.re,
            datetime: self.datetime || other.datetime,
            decimal: self.decimal || other.decimal,
        }
    }

    pub fn any(&self) -> bool {
        self.re || self.datetime || self.decimal
    }
}

/// Descriptor of one transformation kind.
pub struct KindDescriptor {
    pub name: &'static str,
    pub round_trippable: bool,
    pub emits_statement: bool,
    pub imports: ImportNeeds,
    render: fn(&FieldMapping) -> String,
}

impl KindDescriptor {
    /// Render the mapping's expression (or statement). Pure and total.
    pub fn generate(&self, mapping: &FieldMapping) -> String {
        (self.render)(mapping)
    }
}

/// Catalog of kind descriptors, looked up by kind name.
pub struct TransformRegistry {
    kinds: HashMap<&'static str, KindDescriptor>,
}

impl TransformRegistry {
    /// The built-in catalog. The set is fixed; there is no dynamic
    /// registration at runtime.
    pub fn builtin() -> Self {
        let mut kinds = HashMap::new();
        let mut add = |d: KindDescriptor| {
            kinds.insert(d.name, d);
        };
        add(KindDescriptor {
            name: "direct",
            round_trippable: true,
            emits_statement: false,
            imports: ImportNeeds::NONE,
            render: render_direct,
        });
        add(KindDescriptor {
            name: "conditional",
            round_trippable: true,
            emits_statement: false,
            imports: ImportNeeds::NONE,
            render: render_conditional,
        });
        add(KindDescriptor {
            name: "for_loop",
            round_trippable: false,
            emits_statement: true,
            imports: ImportNeeds::NONE,
            render: render_for_loop,
        });
        add(KindDescriptor {
            name: "if_block",
            round_trippable: false,
            emits_statement: true,
            imports: ImportNeeds::NONE,
            render: render_if_block,
        });
        add(KindDescriptor {
            name: "break",
            round_trippable: false,
            emits_statement: true,
            imports: ImportNeeds::NONE,
            render: |_| "break".to_string(),
        });
        add(KindDescriptor {
            name: "continue",
            round_trippable: false,
            emits_statement: true,
            imports: ImportNeeds::NONE,
            render: |_| "continue".to_string(),
        });
        add(KindDescriptor {
            name: "datetime_parse",
            round_trippable: false,
            emits_statement: true,
            imports: ImportNeeds::DATETIME,
            render: render_datetime_parse,
        });
        add(KindDescriptor {
            name: "datetime_format",
            round_trippable: false,
            emits_statement: true,
            imports: ImportNeeds::DATETIME,
            render: render_datetime_format,
        });
        add(KindDescriptor {
            name: "datetime_add",
            round_trippable: false,
            emits_statement: true,
            imports: ImportNeeds::DATETIME,
            render: render_datetime_add,
        });
        add(KindDescriptor {
            name: "decimal",
            round_trippable: false,
            emits_statement: true,
            imports: ImportNeeds::DECIMAL,
            render: render_decimal,
        });
        add(KindDescriptor {
            name: "regex",
            round_trippable: false,
            emits_statement: true,
            imports: ImportNeeds::RE,
            render: render_regex,
        });
        Self { kinds }
    }

    pub fn lookup(&self, name: &str) -> Option<&KindDescriptor> {
        self.kinds.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.kinds.keys().copied()
    }
}

/// Shared catalog instance.
pub fn registry() -> &'static TransformRegistry {
    static REGISTRY: Lazy<TransformRegistry> = Lazy::new(TransformRegistry::builtin);
    &REGISTRY
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

/// Dotted values are INPUT references; anything else is used verbatim
/// (a variable name or a literal produced by an earlier statement).
fn value_expr(value: &str) -> String {
    if value.contains('.') {
        format!("INPUT.{value}")
    } else {
        value.to_string()
    }
}

/// Conditional branch values: dotted paths are INPUT references, everything
/// else is a quoted literal.
fn branch_expr(value: &str) -> String {
    if value.contains('.') {
        format!("INPUT.{value}")
    } else {
        format!("\"{value}\"")
    }
}

/// Quantize target for decimal rounding, e.g. places `2` -> `0.01`.
fn round_quantum(places: &str) -> String {
    let places: u32 = places.trim().parse().unwrap_or(2);
    if places == 0 {
        "1".to_string()
    } else {
        let zeros = "0".repeat((places - 1) as usize);
        format!("0.{zeros}1")
    }
}

fn render_direct(mapping: &FieldMapping) -> String {
    let Transformation::Direct { source, transform } = &mapping.transform else {
        return String::new();
    };
    let source = or_placeholder(source, "field");
    match transform {
        None => format!("INPUT.{source}"),
        Some(t) if t.is_builtin() => format!("INPUT.{source}.{}()", t.name()),
        Some(t) => format!("{}(INPUT.{source})", t.name()),
    }
}

fn render_conditional(mapping: &FieldMapping) -> String {
    let Transformation::Conditional {
        field,
        operator,
        value,
        then_value,
        else_value,
    } = &mapping.transform
    else {
        return String::new();
    };
    let field = or_placeholder(field, "field");
    let value = or_placeholder(value, "value");
    let then_expr = branch_expr(or_placeholder(then_value, "value"));
    let else_expr = branch_expr(or_placeholder(else_value, "value"));
    format!(
        "{then_expr} if INPUT.{field} {} \"{value}\" else {else_expr}",
        operator.as_str()
    )
}

fn render_for_loop(mapping: &FieldMapping) -> String {
    let Transformation::ForLoop { variable, iterable } = &mapping.transform else {
        return String::new();
    };
    let variable = or_placeholder(variable, "item");
    let iterable = value_expr(or_placeholder(iterable, "items"));
    format!("for {variable} in {iterable}:")
}

fn render_if_block(mapping: &FieldMapping) -> String {
    let Transformation::IfBlock { branch, condition } = &mapping.transform else {
        return String::new();
    };
    let condition = or_placeholder(condition, "True");
    match branch {
        IfBranch::If => format!("if {condition}:"),
        IfBranch::Elif => format!("elif {condition}:"),
        IfBranch::Else => "else:".to_string(),
    }
}

fn render_datetime_parse(mapping: &FieldMapping) -> String {
    let Transformation::DatetimeParse {
        variable,
        source,
        format,
    } = &mapping.transform
    else {
        return String::new();
    };
    let variable = or_placeholder(variable, "value");
    let source = value_expr(or_placeholder(source, "field"));
    let format = or_placeholder(format, "%Y-%m-%d");
    format!("{variable} = datetime.strptime({source}, \"{format}\")")
}

fn render_datetime_format(mapping: &FieldMapping) -> String {
    let Transformation::DatetimeFormat {
        variable,
        source,
        format,
    } = &mapping.transform
    else {
        return String::new();
    };
    let variable = or_placeholder(variable, "value");
    let source = value_expr(or_placeholder(source, "value"));
    let format = or_placeholder(format, "%Y-%m-%d");
    format!("{variable} = {source}.strftime(\"{format}\")")
}

fn render_datetime_add(mapping: &FieldMapping) -> String {
    let Transformation::DatetimeAdd {
        variable,
        source,
        amount,
        unit,
    } = &mapping.transform
    else {
        return String::new();
    };
    let variable = or_placeholder(variable, "value");
    let source = value_expr(or_placeholder(source, "value"));
    let amount = or_placeholder(amount, "1");
    format!(
        "{variable} = {source} + timedelta({}={amount})",
        unit.as_str()
    )
}

fn render_decimal(mapping: &FieldMapping) -> String {
    let Transformation::Decimal {
        operation,
        variable,
        operand,
        places,
    } = &mapping.transform
    else {
        return String::new();
    };
    let variable = or_placeholder(variable, "value");
    let operand = value_expr(or_placeholder(operand, "1"));
    match operation {
        DecimalOp::Create => format!("{variable} = Decimal(str({operand}))"),
        DecimalOp::Round => {
            let quantum = round_quantum(places);
            format!("{variable} = {variable}.quantize(Decimal(\"{quantum}\"))")
        }
        op => {
            let symbol = op.symbol().unwrap_or("+");
            format!("{variable} = {variable} {symbol} Decimal(str({operand}))")
        }
    }
}

fn render_regex(mapping: &FieldMapping) -> String {
    let Transformation::Regex {
        operation,
        variable,
        pattern,
        source,
        replacement,
    } = &mapping.transform
    else {
        return String::new();
    };
    let variable = or_placeholder(variable, "value");
    let pattern = or_placeholder(pattern, "pattern");
    let source = value_expr(or_placeholder(source, "value"));
    match operation {
        RegexOp::Replace => {
            format!("{variable} = re.sub(r\"{pattern}\", \"{replacement}\", {source})")
        }
        op => format!("{variable} = re.{}(r\"{pattern}\", {source})", op.func()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Mapping, ScalarTransform};

    fn field(transform: Transformation) -> FieldMapping {
        match Mapping::field("t", transform) {
            Mapping::Field(f) => f,
            _ => unreachable!(),
        }
    }

    #[test]
    fn direct_renders_input_reference() {
        let f = field(Transformation::Direct {
            source: "customer.name".to_string(),
            transform: None,
        });
        assert_eq!(render_direct(&f), "INPUT.customer.name");
    }

    #[test]
    fn direct_builtin_and_custom_transforms() {
        let upper = field(Transformation::Direct {
            source: "name".to_string(),
            transform: Some(ScalarTransform::Upper),
        });
        assert_eq!(render_direct(&upper), "INPUT.name.upper()");

        let ssn = field(Transformation::Direct {
            source: "ssn".to_string(),
            transform: Some(ScalarTransform::Custom("format_ssn".to_string())),
        });
        assert_eq!(render_direct(&ssn), "format_ssn(INPUT.ssn)");
    }

    #[test]
    fn unset_parameters_render_placeholders() {
        let f = field(Transformation::Direct {
            source: String::new(),
            transform: None,
        });
        assert_eq!(render_direct(&f), "INPUT.field");

        let r = field(Transformation::Regex {
            operation: RegexOp::Findall,
            variable: String::new(),
            pattern: String::new(),
            source: String::new(),
            replacement: String::new(),
        });
        assert_eq!(render_regex(&r), "value = re.findall(r\"pattern\", value)");
    }

    #[test]
    fn decimal_round_builds_quantum_from_places() {
        let f = field(Transformation::Decimal {
            operation: DecimalOp::Round,
            variable: "total".to_string(),
            operand: String::new(),
            places: "2".to_string(),
        });
        assert_eq!(render_decimal(&f), "total = total.quantize(Decimal(\"0.01\"))");
    }

    #[test]
    fn every_kind_has_a_descriptor() {
        let reg = registry();
        for name in [
            "direct",
            "conditional",
            "for_loop",
            "if_block",
            "break",
            "continue",
            "datetime_parse",
            "datetime_format",
            "datetime_add",
            "decimal",
            "regex",
        ] {
            assert!(reg.lookup(name).is_some(), "missing kind {name}");
        }
        assert!(reg.lookup("direct").unwrap().round_trippable);
        assert!(!reg.lookup("regex").unwrap().round_trippable);
    }
}
