use confset_model::{ConfigNode, Scalar, Value};

/// Locate-or-create the repeated entry matching an identity tuple.
///
/// Lines belonging to one logical entry are not guaranteed contiguous in a
/// dump, so the entry found keeps every previously populated field and is
/// mutated in place; a fresh entry is appended with its identity fields
/// pre-populated. Identity never changes after creation, and first-seen
/// order is preserved.
pub fn upsert_entry<'a>(
    entries: &'a mut Vec<ConfigNode>,
    identity: &[(&'static str, Scalar)],
) -> &'a mut ConfigNode {
    let found = entries.iter().position(|entry| {
        identity
            .iter()
            .all(|(name, scalar)| entry.field(name).as_scalar() == Some(scalar))
    });

    let index = match found {
        Some(index) => index,
        None => {
            let mut fresh = ConfigNode::new();
            for (name, scalar) in identity {
                fresh.set_field(*name, Value::Known(scalar.clone()));
            }
            entries.push(fresh);
            entries.len() - 1
        }
    };

    &mut entries[index]
}
