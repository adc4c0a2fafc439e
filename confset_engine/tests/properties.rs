use confset_engine::{Envelope, build, read_with_envelope};
use confset_model::{ConfigNode, Value};
use confset_resources::event_options_policy;
use proptest::prelude::*;

fn event_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][A-Z_]{0,11}").expect("valid regex")
}

/// Trees valid under the event-options-policy profile: distinct `within`
/// identities, no conflicting `then` actions.
fn policy_tree() -> impl Strategy<Value = ConfigNode> {
    let events = prop::collection::vec(event_name(), 0..3);
    let intervals = prop::collection::btree_set(1i64..600, 0..4);
    (events, intervals, any::<bool>()).prop_map(|(events, intervals, raise)| {
        let mut node = ConfigNode::new();
        if !events.is_empty() {
            node.set_field("events", Value::strs(events));
        }
        if raise {
            node = node.with_block(
                "then",
                ConfigNode::new().with_field("raise_trap", Value::flag(true)),
            );
        }
        for interval in intervals {
            node = node.with_entry(
                "within",
                ConfigNode::new().with_field("time_interval", Value::int(interval)),
            );
        }
        node
    })
}

proptest! {
    #[test]
    fn build_is_deterministic(node in policy_tree()) {
        let schema = event_options_policy();

        let one = build(&schema, "R1", &node).expect("first build");
        let two = build(&schema, "R1", &node).expect("second build");

        prop_assert_eq!(one, two);
    }

    #[test]
    fn build_then_read_reconstructs_the_tree(node in policy_tree()) {
        let schema = event_options_policy();

        let lines = build(&schema, "R1", &node).expect("build");
        let raw = lines.join("\n");

        let mut back = ConfigNode::new();
        read_with_envelope(&schema, &raw, &Envelope::absolute(&schema, "R1"), &mut back)
            .expect("read");

        prop_assert_eq!(back, node);
    }
}
