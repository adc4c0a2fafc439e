//! Ready-made Junos resource profiles for the confset engine.
//!
//! Each profile is a declarative [`ResourceSchema`] table: field keywords,
//! block nesting, identity keys, and cross-field rules. The builder, parser,
//! and validator in `confset_engine` all consume the same table, so a
//! resource is described here exactly once.
//!
//! # Example
//!
//! ```rust
//! use confset_resources::event_options_policy;
//!
//! let schema = event_options_policy();
//! assert_eq!(schema.prefix("R1"), "set event-options policy \"R1\" ");
//! ```

use confset_model::{
    BlockSchema, FieldKind, FieldSchema, RepeatedBlockSchema, ResourceSchema, Rule, Scalar,
    SingleBlockSchema,
};

fn field(name: &'static str, keyword: &'static str, kind: FieldKind) -> FieldSchema {
    FieldSchema {
        name,
        keyword,
        kind,
    }
}

/// Profile for `set event-options policy "<name>" ...`.
///
/// Covers the trigger windows (`within`, keyed by interval), the `then`
/// action block with its `event-script` invocations, script arguments
/// (two-key identity: name and value), and the script output destination
/// with its retry knobs.
pub fn event_options_policy() -> ResourceSchema {
    let destination = SingleBlockSchema {
        name: "destination",
        keyword: "destination",
        schema: BlockSchema {
            fields: vec![
                field("transfer_delay", "transfer-delay", FieldKind::Int),
                field("retry_count", "retry-count", FieldKind::Int),
                field("retry_interval", "retry-interval", FieldKind::Int),
            ],
            // retry-interval without a retry count is rejected on commit.
            rules: vec![Rule::Requires {
                field: "retry_interval",
                companion: "retry_count",
            }],
            ..BlockSchema::default()
        },
    };

    let arguments = RepeatedBlockSchema {
        name: "arguments",
        keyword: "arguments",
        identity: vec!["name", "value"],
        schema: BlockSchema {
            fields: vec![
                field("name", "name", FieldKind::Str { quoted: true }),
                field("value", "value", FieldKind::Str { quoted: true }),
            ],
            ..BlockSchema::default()
        },
    };

    let event_script = RepeatedBlockSchema {
        name: "event_script",
        keyword: "event-script",
        identity: vec!["filename"],
        schema: BlockSchema {
            fields: vec![field("filename", "filename", FieldKind::Str { quoted: true })],
            singles: vec![destination],
            repeated: vec![arguments],
            ..BlockSchema::default()
        },
    };

    let execute_commands = SingleBlockSchema {
        name: "execute_commands",
        keyword: "execute-commands",
        schema: BlockSchema {
            fields: vec![field("commands", "commands", FieldKind::Strs { quoted: true })],
            ..BlockSchema::default()
        },
    };

    let then = SingleBlockSchema {
        name: "then",
        keyword: "then",
        schema: BlockSchema {
            fields: vec![
                field("ignore", "ignore", FieldKind::Bool),
                field("raise_trap", "raise-trap", FieldKind::Bool),
                field(
                    "priority_override_facility",
                    "priority-override facility",
                    FieldKind::Str { quoted: false },
                ),
            ],
            singles: vec![execute_commands],
            repeated: vec![event_script],
            // `ignore` suppresses the event and cannot coexist with any
            // other action.
            rules: vec![Rule::Conflicts {
                field: "ignore",
                other: "raise_trap",
            }],
        },
    };

    let within = RepeatedBlockSchema {
        name: "within",
        keyword: "within",
        identity: vec!["time_interval"],
        schema: BlockSchema {
            fields: vec![
                field("time_interval", "time-interval", FieldKind::Int),
                field("events", "events", FieldKind::Strs { quoted: true }),
                field(
                    "trigger_when",
                    "trigger when",
                    FieldKind::Str { quoted: false },
                ),
                field("trigger_count", "trigger count", FieldKind::Int),
            ],
            rules: vec![Rule::Requires {
                field: "trigger_count",
                companion: "trigger_when",
            }],
            ..BlockSchema::default()
        },
    };

    ResourceSchema {
        type_name: "event_options_policy",
        keyword_path: "event-options policy",
        name_quoted: true,
        block: BlockSchema {
            fields: vec![field("events", "events", FieldKind::Strs { quoted: true })],
            singles: vec![then],
            repeated: vec![within],
            ..BlockSchema::default()
        },
    }
}

/// Profile for `set protocols bgp group "<name>" ...`.
///
/// The group type discriminates which peering knobs are legal: `peer-as`
/// and `multihop` only make sense for external groups.
pub fn bgp_group() -> ResourceSchema {
    let neighbor = RepeatedBlockSchema {
        name: "neighbor",
        keyword: "neighbor",
        identity: vec!["address"],
        schema: BlockSchema {
            fields: vec![
                field("address", "address", FieldKind::Str { quoted: false }),
                field("description", "description", FieldKind::Str { quoted: true }),
                field("peer_as", "peer-as", FieldKind::Str { quoted: false }),
            ],
            ..BlockSchema::default()
        },
    };

    ResourceSchema {
        type_name: "bgp_group",
        keyword_path: "protocols bgp group",
        name_quoted: true,
        block: BlockSchema {
            fields: vec![
                field("group_type", "type", FieldKind::Str { quoted: false }),
                field("description", "description", FieldKind::Str { quoted: true }),
                field(
                    "local_address",
                    "local-address",
                    FieldKind::Str { quoted: false },
                ),
                field("peer_as", "peer-as", FieldKind::Str { quoted: false }),
                field("multihop", "multihop", FieldKind::Bool),
            ],
            repeated: vec![neighbor],
            rules: vec![
                Rule::AllowedWhen {
                    field: "peer_as",
                    discriminator: "group_type",
                    equals: Scalar::str("external"),
                },
                Rule::AllowedWhen {
                    field: "multihop",
                    discriminator: "group_type",
                    equals: Scalar::str("external"),
                },
            ],
            ..BlockSchema::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_options_policy_tables_are_well_formed() {
        assert_eq!(event_options_policy().verify(), Ok(()));
    }

    #[test]
    fn bgp_group_tables_are_well_formed() {
        assert_eq!(bgp_group().verify(), Ok(()));
    }

    #[test]
    fn event_options_policy_quotes_its_name() {
        let schema = event_options_policy();
        assert_eq!(schema.prefix("R1"), "set event-options policy \"R1\" ");
        assert_eq!(
            schema.delete_line("R1"),
            "delete event-options policy \"R1\""
        );
    }

    #[test]
    fn bgp_group_show_command_targets_the_group() {
        assert_eq!(
            bgp_group().show_command("CORE"),
            "show configuration protocols bgp group \"CORE\" | display set relative"
        );
    }

    #[test]
    fn within_identity_is_the_time_interval() {
        let schema = event_options_policy();
        let within = schema
            .block
            .repeated
            .iter()
            .find(|repeated| repeated.name == "within")
            .expect("within block");
        assert_eq!(within.identity, ["time_interval"]);
    }
}
