use serde::{Deserialize, Serialize};

use crate::ids::{MappingId, ModuleId};

/// Name of the entry-point module. It always exists, is never deleted and
/// never renamed; every other module compiles to a callable sub-routine.
pub const MAIN_MODULE: &str = "main";

/// A named, ordered group of mappings.
///
/// Compiles to one sub-routine in the generated script, except [`MAIN_MODULE`]
/// which becomes the `transform(INPUT)` entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub name: String,
    pub mappings: Vec<Mapping>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ModuleId::new(),
            name: name.into(),
            mappings: Vec::new(),
        }
    }

    pub fn is_main(&self) -> bool {
        self.name == MAIN_MODULE
    }

    /// Append a mapping at the end of the emission order.
    pub fn push_mapping(&mut self, mapping: Mapping) {
        self.mappings.push(mapping);
    }

    /// Replace the mapping at `index` in place. Returns `false` when the
    /// index is out of bounds.
    pub fn replace_mapping(&mut self, index: usize, mapping: Mapping) -> bool {
        match self.mappings.get_mut(index) {
            Some(slot) => {
                *slot = mapping;
                true
            }
            None => false,
        }
    }

    /// Remove and return the mapping at `index`, if any.
    pub fn remove_mapping(&mut self, index: usize) -> Option<Mapping> {
        if index < self.mappings.len() {
            Some(self.mappings.remove(index))
        } else {
            None
        }
    }

    /// Drop the whole mapping list and install `mappings` instead.
    pub fn replace_mappings(&mut self, mappings: Vec<Mapping>) {
        self.mappings = mappings;
    }
}

/// One unit of transformation logic: either a field assignment or a call
/// into another module. Position within the owning module defines emission
/// order; duplicate targets are kept as-is (last write wins at runtime).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mapping {
    Field(FieldMapping),
    ModuleCall(ModuleCall),
}

impl Mapping {
    pub fn id(&self) -> MappingId {
        match self {
            Mapping::Field(f) => f.id,
            Mapping::ModuleCall(c) => c.id,
        }
    }

    /// Direct field mapping without a scalar transform.
    pub fn direct(target: impl Into<String>, source: impl Into<String>) -> Self {
        Mapping::Field(FieldMapping {
            id: MappingId::new(),
            target: target.into(),
            transform: Transformation::Direct {
                source: source.into(),
                transform: None,
            },
        })
    }

    /// Field mapping carrying an arbitrary transformation.
    pub fn field(target: impl Into<String>, transform: Transformation) -> Self {
        Mapping::Field(FieldMapping {
            id: MappingId::new(),
            target: target.into(),
            transform,
        })
    }

    /// Call into another module's logic against the same INPUT/OUTPUT pair.
    pub fn module_call(module_name: impl Into<String>) -> Self {
        Mapping::ModuleCall(ModuleCall {
            id: MappingId::new(),
            module_name: module_name.into(),
            label: None,
        })
    }

    /// Module call preceded by a comment naming the logical target it serves.
    pub fn module_call_labeled(
        module_name: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Mapping::ModuleCall(ModuleCall {
            id: MappingId::new(),
            module_name: module_name.into(),
            label: Some(label.into()),
        })
    }
}

/// Assignment of a value expression to a dotted path in OUTPUT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMapping {
    pub id: MappingId,
    /// Dotted path into OUTPUT. An empty target makes expression-kind
    /// mappings a defined no-op at generation time.
    pub target: String,
    #[serde(flatten)]
    pub transform: Transformation,
}

/// Invocation of another module's side-effecting logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleCall {
    pub id: MappingId,
    pub module_name: String,
    /// Logical target the call serves; emitted as a comment line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// The tagged variant determining how a field mapping's value expression
/// (or statement) is rendered. The discriminant decides which fields are
/// meaningful; unset parameters fall back to placeholder tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transformation {
    Direct {
        source: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transform: Option<ScalarTransform>,
    },
    Conditional {
        field: String,
        operator: CompareOp,
        value: String,
        then_value: String,
        else_value: String,
    },
    ForLoop {
        variable: String,
        iterable: String,
    },
    IfBlock {
        branch: IfBranch,
        condition: String,
    },
    Break,
    Continue,
    DatetimeParse {
        variable: String,
        source: String,
        format: String,
    },
    DatetimeFormat {
        variable: String,
        source: String,
        format: String,
    },
    DatetimeAdd {
        variable: String,
        source: String,
        amount: String,
        unit: DatetimeUnit,
    },
    Decimal {
        operation: DecimalOp,
        variable: String,
        operand: String,
        places: String,
    },
    Regex {
        operation: RegexOp,
        variable: String,
        pattern: String,
        source: String,
        replacement: String,
    },
}

impl Transformation {
    /// Serde tag of the variant; the registry is keyed by this name.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Transformation::Direct { .. } => "direct",
            Transformation::Conditional { .. } => "conditional",
            Transformation::ForLoop { .. } => "for_loop",
            Transformation::IfBlock { .. } => "if_block",
            Transformation::Break => "break",
            Transformation::Continue => "continue",
            Transformation::DatetimeParse { .. } => "datetime_parse",
            Transformation::DatetimeFormat { .. } => "datetime_format",
            Transformation::DatetimeAdd { .. } => "datetime_add",
            Transformation::Decimal { .. } => "decimal",
            Transformation::Regex { .. } => "regex",
        }
    }

    /// The source-ish attribute the diff engine compares, if the kind has one.
    pub fn source_attr(&self) -> Option<&str> {
        match self {
            Transformation::Direct { source, .. }
            | Transformation::DatetimeParse { source, .. }
            | Transformation::DatetimeFormat { source, .. }
            | Transformation::DatetimeAdd { source, .. }
            | Transformation::Regex { source, .. } => Some(source),
            Transformation::Decimal { operand, .. } => Some(operand),
            _ => None,
        }
    }

    /// Name of the scalar transform for direct mappings, if set.
    pub fn transform_name(&self) -> Option<&str> {
        match self {
            Transformation::Direct {
                transform: Some(t), ..
            } => Some(t.name()),
            _ => None,
        }
    }
}

/// Scalar transform applied to a direct mapping's source value.
///
/// The three built-in string transforms render as method calls
/// (`.upper()`, `.lower()`, `.capitalize()`); anything else renders as a
/// free-form function call around the INPUT reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarTransform {
    Upper,
    Lower,
    Capitalize,
    #[serde(untagged)]
    Custom(String),
}

impl ScalarTransform {
    pub fn name(&self) -> &str {
        match self {
            ScalarTransform::Upper => "upper",
            ScalarTransform::Lower => "lower",
            ScalarTransform::Capitalize => "capitalize",
            ScalarTransform::Custom(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "upper" => ScalarTransform::Upper,
            "lower" => ScalarTransform::Lower,
            "capitalize" => ScalarTransform::Capitalize,
            other => ScalarTransform::Custom(other.to_string()),
        }
    }

    /// Whether this transform renders as a `.method()` call.
    pub fn is_builtin(&self) -> bool {
        !matches!(self, ScalarTransform::Custom(_))
    }
}

/// Comparison operator of a conditional mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            ">" => Some(CompareOp::Gt),
            "<" => Some(CompareOp::Lt),
            _ => None,
        }
    }
}

/// Which branch keyword an if-block mapping emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IfBranch {
    If,
    Elif,
    Else,
}

/// Unit for datetime arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatetimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl DatetimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatetimeUnit::Days => "days",
            DatetimeUnit::Hours => "hours",
            DatetimeUnit::Minutes => "minutes",
            DatetimeUnit::Seconds => "seconds",
        }
    }
}

/// Exact-precision decimal operation over named variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecimalOp {
    Create,
    Add,
    Subtract,
    Multiply,
    Divide,
    Round,
}

impl DecimalOp {
    /// Arithmetic symbol for the binary operations.
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            DecimalOp::Add => Some("+"),
            DecimalOp::Subtract => Some("-"),
            DecimalOp::Multiply => Some("*"),
            DecimalOp::Divide => Some("/"),
            _ => None,
        }
    }
}

/// Pattern-matching operation of a regex mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegexOp {
    Match,
    Search,
    Findall,
    Replace,
    Split,
}

impl RegexOp {
    /// Library function name the operation renders to.
    pub fn func(&self) -> &'static str {
        match self {
            RegexOp::Match => "match",
            RegexOp::Search => "search",
            RegexOp::Findall => "findall",
            RegexOp::Replace => "sub",
            RegexOp::Split => "split",
        }
    }
}
