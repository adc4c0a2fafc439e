use confset_model::{
    BlockSchema, ConfigNode, FieldKind, FieldSchema, ResourceSchema, Scalar, Value, dequote,
};
use serde::{Deserialize, Serialize};

use crate::dispatch::{Target, dispatch, split_token};
use crate::error::ReadError;
use crate::upsert::upsert_entry;

/// Start/end markers and per-line prefix of a configuration dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub start: String,
    pub end: String,
    pub line_prefix: String,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            start: "<configuration-set>".to_string(),
            end: "</configuration-set>".to_string(),
            line_prefix: "set ".to_string(),
        }
    }
}

impl Envelope {
    /// Envelope for `| display set relative` output (`set <keyword> ...`).
    pub fn relative() -> Self {
        Self::default()
    }

    /// Envelope for absolute set lines as produced by [`crate::build`]; the
    /// whole resource prefix is stripped before dispatch.
    pub fn absolute(schema: &ResourceSchema, name: &str) -> Self {
        Self {
            line_prefix: schema.prefix(name),
            ..Self::default()
        }
    }
}

/// Parse a relative set-line dump into `node` using the default envelope.
pub fn read(schema: &ResourceSchema, raw: &str, node: &mut ConfigNode) -> Result<(), ReadError> {
    read_with_envelope(schema, raw, &Envelope::default(), node)
}

/// Parse a dump bounded by `envelope` into `node`.
///
/// The start marker is optional: when absent the whole text is interior.
/// Interior lines without the line prefix are ignored, as are lines whose
/// keyword matches nothing in the schema (forward compatibility with device
/// output this transcoder does not model). Malformed numeric tokens and
/// truncated repeated-entry lines abort the whole read.
pub fn read_with_envelope(
    schema: &ResourceSchema,
    raw: &str,
    envelope: &Envelope,
    node: &mut ConfigNode,
) -> Result<(), ReadError> {
    let mut started = !raw
        .lines()
        .any(|line| line.trim() == envelope.start.as_str());

    for line in raw.lines() {
        let line = line.trim_end_matches('\r');
        if !started {
            if line.trim() == envelope.start.as_str() {
                started = true;
            }
            continue;
        }
        if line.trim() == envelope.end.as_str() {
            break;
        }
        let Some(content) = line.strip_prefix(envelope.line_prefix.as_str()) else {
            tracing::debug!(target: "confset::read", line, "ignoring line outside the set dialect");
            continue;
        };
        read_line(&schema.block, content, node)?;
    }

    Ok(())
}

fn read_line(schema: &BlockSchema, line: &str, node: &mut ConfigNode) -> Result<(), ReadError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(());
    }

    let Some((target, rest)) = dispatch(schema, line) else {
        tracing::debug!(target: "confset::read", line, "ignoring unrecognized keyword");
        return Ok(());
    };

    match target {
        Target::Field(field) => read_field(field, rest, node),
        Target::Single(single) => {
            // Lazily materialize the block on first sight; an empty
            // remainder just declares it.
            let child = node.block_mut(single.name);
            if rest.is_empty() {
                Ok(())
            } else {
                read_line(&single.schema, rest, child)
            }
        }
        Target::Repeated(repeated) => {
            let mut identity: Vec<(&'static str, Scalar)> =
                Vec::with_capacity(repeated.identity.len());
            let mut rest = rest;
            for key in &repeated.identity {
                let Some((token, after)) = split_token(rest) else {
                    return Err(ReadError::TruncatedEntry {
                        keyword: repeated.keyword.to_string(),
                    });
                };
                let scalar = match repeated.schema.field(key).map(|field| field.kind) {
                    Some(FieldKind::Int) => Scalar::Int(parse_int(key, token)?),
                    _ => Scalar::Str(dequote(token)),
                };
                identity.push((*key, scalar));
                rest = after;
            }

            let entry = upsert_entry(node.entries_mut(repeated.name), &identity);
            if rest.is_empty() {
                Ok(())
            } else {
                read_line(&repeated.schema, rest, entry)
            }
        }
    }
}

fn read_field(field: &FieldSchema, rest: &str, node: &mut ConfigNode) -> Result<(), ReadError> {
    match field.kind {
        FieldKind::Bool => {
            if !rest.is_empty() {
                tracing::debug!(
                    target: "confset::read",
                    keyword = field.keyword,
                    rest,
                    "ignoring trailing tokens after flag keyword"
                );
            }
            node.set_field(field.name, Value::flag(true));
            Ok(())
        }
        FieldKind::Int => {
            let (token, _) = split_token(rest).ok_or_else(|| ReadError::MissingValue {
                keyword: field.keyword.to_string(),
            })?;
            node.set_field(field.name, Value::int(parse_int(field.keyword, token)?));
            Ok(())
        }
        FieldKind::Str { .. } => {
            let (token, _) = split_token(rest).ok_or_else(|| ReadError::MissingValue {
                keyword: field.keyword.to_string(),
            })?;
            node.set_field(field.name, Value::str(dequote(token)));
            Ok(())
        }
        FieldKind::Strs { .. } => {
            let (token, _) = split_token(rest).ok_or_else(|| ReadError::MissingValue {
                keyword: field.keyword.to_string(),
            })?;
            node.push_str_item(field.name, dequote(token));
            Ok(())
        }
    }
}

fn parse_int(keyword: &str, token: &str) -> Result<i64, ReadError> {
    token.parse::<i64>().map_err(|source| ReadError::InvalidNumber {
        keyword: keyword.to_string(),
        token: token.to_string(),
        source,
    })
}
