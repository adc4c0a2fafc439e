use std::collections::HashSet;

use confset_model::{
    AttrPath, BlockSchema, ConfigNode, Diagnostic, DiagnosticKind, Diagnostics, RepeatedBlockSchema,
    ResourceSchema, Rule, Value,
};

use crate::build::identity_token;

/// Config-time validation over tri-state values.
///
/// Every violation found is accumulated into `diags`; nothing
/// short-circuits, so the user sees all configuration errors at once.
/// `Unknown` values are plan-time placeholders: rules touching one are
/// skipped rather than treated as absent.
pub fn validate(schema: &ResourceSchema, node: &ConfigNode, diags: &mut Diagnostics) {
    validate_block(&schema.block, node, &AttrPath::root(), diags);
}

fn validate_block(
    schema: &BlockSchema,
    node: &ConfigNode,
    path: &AttrPath,
    diags: &mut Diagnostics,
) {
    check_rules(schema, node, path, diags);

    for single in &schema.singles {
        if let Some(child) = node.block(single.name) {
            let block_path = path.block(single.name);
            if child.is_effectively_empty(&single.schema) {
                diags.push(Diagnostic::error(
                    DiagnosticKind::EmptyBlock,
                    block_path.clone(),
                    format!("block `{}` is empty", single.name),
                ));
            }
            validate_block(&single.schema, child, &block_path, diags);
        }
    }

    for repeated in &schema.repeated {
        let mut seen: HashSet<Vec<String>> = HashSet::new();
        for (index, entry) in node.entries(repeated.name).iter().enumerate() {
            let entry_path = path.entry(repeated.name, index);
            if let Some(tokens) = known_identity(repeated, entry)
                && !seen.insert(tokens.clone())
            {
                diags.push(Diagnostic::error(
                    DiagnosticKind::Duplicate,
                    entry_path.field(repeated.identity[0]),
                    format!("entry `{}` appears more than once", tokens.join(" ")),
                ));
            }
            validate_block(&repeated.schema, entry, &entry_path, diags);
        }
    }
}

fn check_rules(schema: &BlockSchema, node: &ConfigNode, path: &AttrPath, diags: &mut Diagnostics) {
    for rule in &schema.rules {
        match rule {
            Rule::Requires { field, companion } => {
                if node.field(field).has_content()
                    && node.field(companion).is_null()
                {
                    diags.push(Diagnostic::error(
                        DiagnosticKind::Missing,
                        path.field(*field),
                        format!("requires `{companion}` to be set"),
                    ));
                }
            }
            Rule::Conflicts { field, other } => {
                if node.field(field).has_content() && node.field(other).has_content() {
                    diags.push(Diagnostic::error(
                        DiagnosticKind::Conflict,
                        path.field(*field),
                        format!("cannot be combined with `{other}`"),
                    ));
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
                    diags.push(Diagnostic::error(
                        DiagnosticKind::VariantGate,
                        path.field(*field),
                        format!("only valid while `{discriminator}` is `{equals}`"),
                    ));
                }
            }
        }
    }
}

/// Identity tuple rendered as line tokens, or `None` while any component is
/// not yet a known keyable scalar.
fn known_identity(repeated: &RepeatedBlockSchema, entry: &ConfigNode) -> Option<Vec<String>> {
    let mut tokens = Vec::with_capacity(repeated.identity.len());
    for key in &repeated.identity {
        let scalar = entry.field(key).as_scalar()?;
        let kind = repeated.schema.field(key).map(|field| field.kind);
        tokens.push(identity_token(kind, scalar)?);
    }
    Some(tokens)
}
