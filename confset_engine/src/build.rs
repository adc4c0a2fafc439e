use std::collections::HashSet;

use confset_model::{
    AttrPath, BlockSchema, ConfigNode, FieldKind, FieldSchema, RepeatedBlockSchema, ResourceSchema,
    Rule, Scalar, Value, quote,
};

use crate::error::BuildError;

/// Build the ordered set-line sequence for one resource.
///
/// The node must be fully resolved; any `Unknown` value is an error. Lines
/// come out in field-declaration order, then single sub-blocks, then
/// repeated entries, so an unchanged node always produces a byte-identical
/// sequence. On error the caller discards all lines (all-or-nothing).
pub fn build(
    schema: &ResourceSchema,
    name: &str,
    node: &ConfigNode,
) -> Result<Vec<String>, BuildError> {
    let prefix = schema.prefix(name);
    let mut lines = Vec::new();
    build_block(&schema.block, node, &prefix, &AttrPath::root(), &[], &mut lines)?;
    if lines.is_empty() {
        // A resource with no attributes still materializes on the device.
        lines.push(prefix.trim_end().to_string());
    }
    Ok(lines)
}

fn build_block(
    schema: &BlockSchema,
    node: &ConfigNode,
    prefix: &str,
    path: &AttrPath,
    skip_fields: &[&'static str],
    out: &mut Vec<String>,
) -> Result<(), BuildError> {
    check_rules(schema, node, path)?;

    for field in &schema.fields {
        if skip_fields.contains(&field.name) {
            continue;
        }
        let field_path = path.field(field.name);
        match node.field(field.name) {
            Value::Null => {}
            Value::Unknown => return Err(BuildError::Unresolved { path: field_path }),
            Value::Known(scalar) => emit_field(field, scalar, prefix, &field_path, out)?,
        }
    }

    for single in &schema.singles {
        if let Some(child) = node.block(single.name) {
            let block_path = path.block(single.name);
            if child.is_effectively_empty(&single.schema) {
                return Err(BuildError::EmptyBlock { path: block_path });
            }
            let child_prefix = format!("{prefix}{} ", single.keyword);
            build_block(&single.schema, child, &child_prefix, &block_path, &[], out)?;
        }
    }

    for repeated in &schema.repeated {
        let mut seen: HashSet<Vec<String>> = HashSet::new();
        for (index, entry) in node.entries(repeated.name).iter().enumerate() {
            let entry_path = path.entry(repeated.name, index);
            let tokens = render_identity(repeated, entry, &entry_path)?;
            if !seen.insert(tokens.clone()) {
                return Err(BuildError::Duplicate {
                    path: entry_path.field(repeated.identity[0]),
                    tuple: tokens.join(" "),
                });
            }

            let entry_prefix = format!("{prefix}{} {} ", repeated.keyword, tokens.join(" "));
            let before = out.len();
            build_block(
                &repeated.schema,
                entry,
                &entry_prefix,
                &entry_path,
                &repeated.identity,
                out,
            )?;
            if out.len() == before {
                // Identity-only entry: the bare prefix line is the entry.
                out.push(entry_prefix.trim_end().to_string());
            }
        }
    }

    Ok(())
}

fn emit_field(
    field: &FieldSchema,
    scalar: &Scalar,
    prefix: &str,
    path: &AttrPath,
    out: &mut Vec<String>,
) -> Result<(), BuildError> {
    match (field.kind, scalar) {
        (FieldKind::Bool, Scalar::Bool(true)) => out.push(format!("{prefix}{}", field.keyword)),
        (FieldKind::Bool, Scalar::Bool(false)) => {}
        (FieldKind::Int, Scalar::Int(value)) => {
            out.push(format!("{prefix}{} {value}", field.keyword));
        }
        (FieldKind::Str { quoted }, Scalar::Str(value)) => {
            out.push(format!(
                "{prefix}{} {}",
                field.keyword,
                render_str(value, quoted)
            ));
        }
        (FieldKind::Strs { quoted }, Scalar::Strs(items)) => {
            for item in items {
                out.push(format!(
                    "{prefix}{} {}",
                    field.keyword,
                    render_str(item, quoted)
                ));
            }
        }
        (FieldKind::Bool, _) => {
            return Err(BuildError::TypeMismatch {
                path: path.clone(),
                expected: "boolean",
            });
        }
        (FieldKind::Int, _) => {
            return Err(BuildError::TypeMismatch {
                path: path.clone(),
                expected: "integer",
            });
        }
        (FieldKind::Str { .. }, _) => {
            return Err(BuildError::TypeMismatch {
                path: path.clone(),
                expected: "string",
            });
        }
        (FieldKind::Strs { .. }, _) => {
            return Err(BuildError::TypeMismatch {
                path: path.clone(),
                expected: "string list",
            });
        }
    }
    Ok(())
}

fn render_str(value: &str, quoted: bool) -> String {
    if quoted {
        quote(value)
    } else {
        value.to_string()
    }
}

/// Binary-aware re-check of the cross-field rules on resolved state.
///
/// The validator already checked these tri-state; a hit here is a defect
/// signal but is still surfaced as a located error.
fn check_rules(schema: &BlockSchema, node: &ConfigNode, path: &AttrPath) -> Result<(), BuildError> {
    for rule in &schema.rules {
        match rule {
            Rule::Requires { field, companion } => {
                if node.field(field).has_content() && !node.field(companion).has_content() {
                    return Err(BuildError::MissingCompanion {
                        path: path.field(*field),
                        companion: (*companion).to_string(),
                    });
                }
            }
            Rule::Conflicts { field, other } => {
                if node.field(field).has_content() && node.field(other).has_content() {
                    return Err(BuildError::Conflict {
                        path: path.field(*field),
                        other: (*other).to_string(),
                    });
                }
            }
            Rule::AllowedWhen {
                field,
                discriminator,
                equals,
            } => {
                if node.field(field).has_content()
                    && let Value::Known(actual) = node.field(discriminator)
                    && actual != equals
                {
                    return Err(BuildError::VariantGate {
                        path: path.field(*field),
                        discriminator: (*discriminator).to_string(),
                        expected: equals.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Render the identity-key tuple of a repeated entry as line tokens.
pub(crate) fn render_identity(
    repeated: &RepeatedBlockSchema,
    entry: &ConfigNode,
    entry_path: &AttrPath,
) -> Result<Vec<String>, BuildError> {
    let mut tokens = Vec::with_capacity(repeated.identity.len());
    for key in &repeated.identity {
        let key_path = entry_path.field(*key);
        match entry.field(key) {
            Value::Known(scalar) => {
                match identity_token(repeated.schema.field(key).map(|field| field.kind), scalar) {
                    Some(token) => tokens.push(token),
                    None => {
                        return Err(BuildError::TypeMismatch {
                            path: key_path,
                            expected: "string or integer identity",
                        });
                    }
                }
            }
            Value::Unknown => return Err(BuildError::Unresolved { path: key_path }),
            Value::Null => return Err(BuildError::MissingIdentity { path: key_path }),
        }
    }
    Ok(tokens)
}

/// Line token for one identity scalar, or `None` when the scalar cannot key
/// an entry.
pub(crate) fn identity_token(kind: Option<FieldKind>, scalar: &Scalar) -> Option<String> {
    match (kind, scalar) {
        (Some(FieldKind::Str { quoted: true }), Scalar::Str(value)) => Some(quote(value)),
        (Some(FieldKind::Str { quoted: false }), Scalar::Str(value)) => Some(value.clone()),
        (Some(FieldKind::Int), Scalar::Int(value)) => Some(value.to_string()),
        _ => None,
    }
}
