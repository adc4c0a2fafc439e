use confset_engine::{Envelope, build, read_with_envelope};
use confset_model::{ConfigNode, Value};
use confset_resources::{bgp_group, event_options_policy};

#[test]
fn event_options_policy_round_trips_through_set_lines() {
    let node = ConfigNode::new()
        .with_field("events", Value::strs(["LINK_DOWN"]))
        .with_block(
            "then",
            ConfigNode::new()
                .with_field("raise_trap", Value::flag(true))
                .with_block(
                    "execute_commands",
                    ConfigNode::new()
                        .with_field("commands", Value::strs(["show system uptime"])),
                ),
        )
        .with_entry(
            "within",
            ConfigNode::new()
                .with_field("time_interval", Value::int(30))
                .with_field("trigger_when", Value::str("until"))
                .with_field("trigger_count", Value::int(3)),
        );

    let schema = event_options_policy();
    let lines = build(&schema, "R1", &node).expect("build");
    let raw = lines.join("\n");

    let mut back = ConfigNode::new();
    read_with_envelope(&schema, &raw, &Envelope::absolute(&schema, "R1"), &mut back)
        .expect("read");
    assert_eq!(back, node);
}

#[test]
fn bgp_group_round_trips_through_set_lines() {
    let node = ConfigNode::new()
        .with_field("group_type", Value::str("external"))
        .with_field("peer_as", Value::str("65001"))
        .with_field("multihop", Value::flag(true))
        .with_entry(
            "neighbor",
            ConfigNode::new()
                .with_field("address", Value::str("10.0.0.1"))
                .with_field("description", Value::str("edge peer")),
        );

    let schema = bgp_group();
    let lines = build(&schema, "CORE", &node).expect("build");
    let raw = lines.join("\n");

    let mut back = ConfigNode::new();
    read_with_envelope(&schema, &raw, &Envelope::absolute(&schema, "CORE"), &mut back)
        .expect("read");
    assert_eq!(back, node);
}

#[test]
fn build_emits_the_documented_golden_sequence() {
    let node = ConfigNode::new()
        .with_field("events", Value::strs(["ev1"]))
        .with_block(
            "then",
            ConfigNode::new().with_field("ignore", Value::flag(true)),
        );

    let lines = build(&event_options_policy(), "R1", &node).expect("build");
    assert_eq!(
        lines,
        [
            "set event-options policy \"R1\" events \"ev1\"",
            "set event-options policy \"R1\" then ignore",
        ]
    );
}

#[test]
fn empty_resource_builds_its_bare_declaration_line() {
    let lines = build(&bgp_group(), "CORE", &ConfigNode::new()).expect("build");
    assert_eq!(lines, ["set protocols bgp group \"CORE\""]);

    let schema = bgp_group();
    let mut back = ConfigNode::new();
    read_with_envelope(
        &schema,
        &lines.join("\n"),
        &Envelope::absolute(&schema, "CORE"),
        &mut back,
    )
    .expect("read");
    assert!(back.is_empty());
}
