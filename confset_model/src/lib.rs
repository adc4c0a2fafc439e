//! Structured configuration model for Junos set-line transcoding.
//!
//! This crate provides:
//! - a tri-state scalar model (`Scalar`, `Value`)
//! - a generic configuration tree (`ConfigNode`)
//! - attribute paths and diagnostics (`AttrPath`, `Diagnostic`, `Diagnostics`)
//! - declarative resource schemas (`ResourceSchema`, `BlockSchema`, `Rule`)
//! - one-layer quoting helpers (`quote`, `dequote`)
//!
//! The schema tables are plain data consumed by the builder, parser, and
//! validator in `confset_engine`; a resource is described once and all three
//! directions derive from the same description.
//!
//! # Example
//!
//! ```rust
//! use confset_model::{AttrPath, ConfigNode, Scalar, Value};
//!
//! let node = ConfigNode::new().with_field("ignore", Value::Known(Scalar::Bool(true)));
//! assert!(node.field("ignore").is_known());
//!
//! let path = AttrPath::root().block("then").field("ignore");
//! assert_eq!(path.to_string(), "then.ignore");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Concrete scalar payload of a known field value.
///
/// `Strs` is the multi-valued string leaf used pervasively by Junos
/// resources; each element renders as its own configuration line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Str(String),
    Strs(Vec<String>),
}

impl Scalar {
    /// Convenience constructor for `Scalar::Str`.
    pub fn str(value: impl Into<String>) -> Self {
        Scalar::Str(value.into())
    }

    /// Convenience constructor for `Scalar::Strs`.
    pub fn strs<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Scalar::Strs(values.into_iter().map(Into::into).collect())
    }

    /// Whether this scalar produces at least one configuration line.
    ///
    /// `Bool(false)` and an empty `Strs` render nothing in the set-line
    /// dialect, so they carry no effective content.
    pub fn has_content(&self) -> bool {
        match self {
            Scalar::Bool(flag) => *flag,
            Scalar::Int(_) | Scalar::Str(_) => true,
            Scalar::Strs(items) => !items.is_empty(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(flag) => write!(f, "{flag}"),
            Scalar::Int(value) => write!(f, "{value}"),
            Scalar::Str(value) => f.write_str(value),
            Scalar::Strs(items) => f.write_str(&items.join(",")),
        }
    }
}

/// Tri-state field value.
///
/// `Unknown` is a plan-time placeholder: validation must neither treat it as
/// present nor as absent, and the builder never accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Value {
    Known(Scalar),
    #[default]
    Null,
    Unknown,
}

impl Value {
    /// Known string value.
    pub fn str(value: impl Into<String>) -> Self {
        Value::Known(Scalar::Str(value.into()))
    }

    /// Known integer value.
    pub fn int(value: i64) -> Self {
        Value::Known(Scalar::Int(value))
    }

    /// Known boolean value.
    pub fn flag(value: bool) -> Self {
        Value::Known(Scalar::Bool(value))
    }

    /// Known multi-valued string value.
    pub fn strs<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Known(Scalar::strs(values))
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Value::Known(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    /// Borrow the scalar payload of a known value.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Known(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Whether this is a known `true` boolean.
    pub fn is_true(&self) -> bool {
        matches!(self, Value::Known(Scalar::Bool(true)))
    }

    /// Whether this value is known and renders at least one line.
    pub fn has_content(&self) -> bool {
        self.as_scalar().is_some_and(Scalar::has_content)
    }
}

static NULL_VALUE: Value = Value::Null;

/// Generic unit of structured configuration.
///
/// Absent `fields` keys are equivalent to [`Value::Null`]. `blocks` holds the
/// optional single sub-blocks that are present; `entries` holds repeated
/// sub-block collections in discovery/insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigNode {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub blocks: BTreeMap<String, ConfigNode>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub entries: BTreeMap<String, Vec<ConfigNode>>,
}

impl ConfigNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Builder-style single sub-block setter.
    pub fn with_block(mut self, name: impl Into<String>, block: ConfigNode) -> Self {
        self.blocks.insert(name.into(), block);
        self
    }

    /// Builder-style repeated entry append.
    pub fn with_entry(mut self, name: impl Into<String>, entry: ConfigNode) -> Self {
        self.entries.entry(name.into()).or_default().push(entry);
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Tri-state lookup; absent keys read as `Null`.
    pub fn field(&self, name: &str) -> &Value {
        self.fields.get(name).unwrap_or(&NULL_VALUE)
    }

    /// Append one element to a multi-valued string field, creating it on
    /// first sight.
    pub fn push_str_item(&mut self, name: &str, item: String) {
        match self.fields.get_mut(name) {
            Some(Value::Known(Scalar::Strs(items))) => items.push(item),
            _ => {
                self.fields
                    .insert(name.to_string(), Value::Known(Scalar::Strs(vec![item])));
            }
        }
    }

    pub fn block(&self, name: &str) -> Option<&ConfigNode> {
        self.blocks.get(name)
    }

    /// Borrow a single sub-block mutably, materializing it on first sight.
    pub fn block_mut(&mut self, name: &str) -> &mut ConfigNode {
        self.blocks.entry(name.to_string()).or_default()
    }

    pub fn entries(&self, name: &str) -> &[ConfigNode] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn entries_mut(&mut self, name: &str) -> &mut Vec<ConfigNode> {
        self.entries.entry(name.to_string()).or_default()
    }

    /// Whether the node carries no data at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.blocks.is_empty() && self.entries.is_empty()
    }

    /// Whether the node carries no effective content under `schema`.
    ///
    /// Unknown field values count as content: a plan-time placeholder must
    /// not fire the empty-block error before it resolves.
    pub fn is_effectively_empty(&self, schema: &BlockSchema) -> bool {
        for field in &schema.fields {
            match self.field(field.name) {
                Value::Known(scalar) => {
                    if scalar.has_content() {
                        return false;
                    }
                }
                Value::Unknown => return false,
                Value::Null => {}
            }
        }
        for single in &schema.singles {
            if let Some(child) = self.block(single.name)
                && !child.is_effectively_empty(&single.schema)
            {
                return false;
            }
        }
        for repeated in &schema.repeated {
            if !self.entries(repeated.name).is_empty() {
                return false;
            }
        }
        true
    }
}

/// One step in an attribute path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStep {
    Field(String),
    Block(String),
    Entry(String, usize),
}

/// Hierarchical location of a field or block, used by diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttrPath(pub Vec<PathStep>);

impl AttrPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn field(&self, name: impl Into<String>) -> Self {
        self.child(PathStep::Field(name.into()))
    }

    pub fn block(&self, name: impl Into<String>) -> Self {
        self.child(PathStep::Block(name.into()))
    }

    pub fn entry(&self, name: impl Into<String>, index: usize) -> Self {
        self.child(PathStep::Entry(name.into(), index))
    }

    fn child(&self, step: PathStep) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        AttrPath(steps)
    }
}

impl fmt::Display for AttrPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (idx, step) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            match step {
                PathStep::Field(name) | PathStep::Block(name) => f.write_str(name)?,
                PathStep::Entry(name, index) => write!(f, "{name}[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Severity level for a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Diagnostic taxonomy shared by validation, build, and lifecycle checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    Duplicate,
    Missing,
    Conflict,
    EmptyBlock,
    VariantGate,
    Invalid,
    PreCheck,
    PostCheck,
    NotFound,
    Parse,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::Duplicate => "duplicate",
            DiagnosticKind::Missing => "missing",
            DiagnosticKind::Conflict => "conflict",
            DiagnosticKind::EmptyBlock => "empty-block",
            DiagnosticKind::VariantGate => "variant-gate",
            DiagnosticKind::Invalid => "invalid",
            DiagnosticKind::PreCheck => "pre-check",
            DiagnosticKind::PostCheck => "post-check",
            DiagnosticKind::NotFound => "not-found",
            DiagnosticKind::Parse => "parse",
        };
        f.write_str(label)
    }
}

/// One structured error or warning with a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub path: AttrPath,
    pub message: String,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, path: AttrPath, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            path,
            message: message.into(),
        }
    }

    pub fn warning(kind: DiagnosticKind, path: AttrPath, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{level}[{}] {}: {}", self.kind, self.path, self.message)
    }
}

/// Accumulating diagnostics sink.
///
/// Validation reports every violation it can find in one pass; nothing in
/// this type short-circuits.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(diagnostics);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn has_errors(&self) -> bool {
        self.items
            .iter()
            .any(|diagnostic| diagnostic.severity == Severity::Error)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Scalar kind and rendering style of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str { quoted: bool },
    Bool,
    Int,
    Strs { quoted: bool },
}

/// One scalar field: model name, CLI keyword, kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: &'static str,
    pub keyword: &'static str,
    pub kind: FieldKind,
}

/// Zero-or-one nested sub-block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleBlockSchema {
    pub name: &'static str,
    pub keyword: &'static str,
    pub schema: BlockSchema,
}

/// Repeated sub-block collection keyed by 1-2 identity fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatedBlockSchema {
    pub name: &'static str,
    pub keyword: &'static str,
    pub identity: Vec<&'static str>,
    pub schema: BlockSchema,
}

/// Cross-field consistency rule, evaluated by both validator and builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// `field` set-and-known demands `companion` set too.
    Requires {
        field: &'static str,
        companion: &'static str,
    },
    /// `field` and `other` must not be set together.
    Conflicts {
        field: &'static str,
        other: &'static str,
    },
    /// `field` is legal only while `discriminator` equals `equals`.
    AllowedWhen {
        field: &'static str,
        discriminator: &'static str,
        equals: Scalar,
    },
}

/// Declarative description of one configuration block.
///
/// Declaration order is emission order for the builder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockSchema {
    pub fields: Vec<FieldSchema>,
    pub singles: Vec<SingleBlockSchema>,
    pub repeated: Vec<RepeatedBlockSchema>,
    pub rules: Vec<Rule>,
}

impl BlockSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Top-level resource description: the keyword path after `set`, naming
/// style, and the root block schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub keyword_path: &'static str,
    pub name_quoted: bool,
    pub block: BlockSchema,
}

impl ResourceSchema {
    /// Render the resource name according to the naming style.
    pub fn rendered_name(&self, name: &str) -> String {
        if self.name_quoted {
            quote(name)
        } else {
            name.to_string()
        }
    }

    /// Line prefix threaded through the builder, trailing space included.
    pub fn prefix(&self, name: &str) -> String {
        format!("set {} {} ", self.keyword_path, self.rendered_name(name))
    }

    /// Single line removing the whole resource.
    pub fn delete_line(&self, name: &str) -> String {
        format!("delete {} {}", self.keyword_path, self.rendered_name(name))
    }

    /// Read-only query returning the resource as relative set lines.
    pub fn show_command(&self, name: &str) -> String {
        format!(
            "show configuration {} {} | display set relative",
            self.keyword_path,
            self.rendered_name(name)
        )
    }

    /// Check structural wiring of the schema tables.
    ///
    /// Identity keys and rule operands must name declared fields; repeated
    /// blocks carry one or two identity keys.
    pub fn verify(&self) -> Result<(), SchemaError> {
        verify_block(self.type_name.to_string(), &self.block)
    }
}

/// Structural defect in a schema table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("repeated block `{block}` declares {count} identity keys; expected 1 or 2")]
    IdentityArity { block: String, count: usize },
    #[error("`{block}` references unknown field `{field}`")]
    UnknownField { block: String, field: String },
}

fn verify_block(label: String, block: &BlockSchema) -> Result<(), SchemaError> {
    let known_field = |name: &str| block.fields.iter().any(|field| field.name == name);

    for rule in &block.rules {
        let operands: [&str; 2] = match rule {
            Rule::Requires { field, companion } => [field, companion],
            Rule::Conflicts { field, other } => [field, other],
            Rule::AllowedWhen {
                field,
                discriminator,
                ..
            } => [field, discriminator],
        };
        for operand in operands {
            if !known_field(operand) {
                return Err(SchemaError::UnknownField {
                    block: label.clone(),
                    field: operand.to_string(),
                });
            }
        }
    }

    for single in &block.singles {
        verify_block(format!("{label}.{}", single.name), &single.schema)?;
    }

    for repeated in &block.repeated {
        let count = repeated.identity.len();
        if count == 0 || count > 2 {
            return Err(SchemaError::IdentityArity {
                block: format!("{label}.{}", repeated.name),
                count,
            });
        }
        for key in &repeated.identity {
            if !repeated.schema.fields.iter().any(|field| field.name == *key) {
                return Err(SchemaError::UnknownField {
                    block: format!("{label}.{}", repeated.name),
                    field: key.to_string(),
                });
            }
        }
        verify_block(format!("{label}.{}", repeated.name), &repeated.schema)?;
    }

    Ok(())
}

/// Wrap a value in exactly one layer of double quotes.
///
/// Interior quotes and backslashes are escaped; nested quoting is never
/// interpreted.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// Strip exactly one layer of surrounding double quotes, if present.
pub fn dequote(token: &str) -> String {
    let inner = token
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'));
    let Some(inner) = inner else {
        return token.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut escape = false;
    for ch in inner.chars() {
        if escape {
            out.push(ch);
            escape = false;
            continue;
        }
        if ch == '\\' {
            escape = true;
            continue;
        }
        out.push(ch);
    }
    out
}
