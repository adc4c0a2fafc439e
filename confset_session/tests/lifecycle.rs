use confset_model::{ConfigNode, Diagnostic, DiagnosticKind, Value};
use confset_resources::{bgp_group, event_options_policy};
use confset_session::{ApplyError, MemorySession, ResourceClient, Session, SessionError};

fn policy_node() -> ConfigNode {
    ConfigNode::new()
        .with_field("events", Value::strs(["LINK_DOWN"]))
        .with_block(
            "then",
            ConfigNode::new().with_field("raise_trap", Value::flag(true)),
        )
        .with_entry(
            "within",
            ConfigNode::new().with_field("time_interval", Value::int(30)),
        )
}

#[test]
fn create_then_read_round_trips() {
    let schema = event_options_policy();
    let mut session = MemorySession::new();
    let mut client = ResourceClient::new(&mut session, &schema);

    let node = policy_node();
    client.create("R1", &node).expect("create");
    assert_eq!(client.read("R1").expect("read"), node);
}

#[test]
fn create_pre_check_rejects_an_existing_resource() {
    let schema = event_options_policy();
    let mut session = MemorySession::new();
    let mut client = ResourceClient::new(&mut session, &schema);

    client.create("R1", &policy_node()).expect("first create");
    let err = client
        .create("R1", &policy_node())
        .expect_err("second create");

    match err {
        ApplyError::Check(diagnostic) => {
            assert_eq!(diagnostic.kind, DiagnosticKind::PreCheck);
            assert!(diagnostic.message.contains("already exists"));
        }
        other => panic!("expected pre-check failure, got {other:?}"),
    }
}

#[test]
fn create_rejects_invalid_configuration_before_touching_the_device() {
    let schema = event_options_policy();
    let mut session = MemorySession::new();
    let mut client = ResourceClient::new(&mut session, &schema);

    // Empty `then` block: validation error, nothing applied.
    let node = ConfigNode::new().with_block("then", ConfigNode::new());
    let err = client.create("R1", &node).expect_err("invalid");

    match err {
        ApplyError::Invalid { diagnostics } => {
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].kind, DiagnosticKind::EmptyBlock);
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert!(session.lines().is_empty());
}

#[test]
fn read_missing_resource_is_not_found() {
    let schema = bgp_group();
    let mut session = MemorySession::new();
    let mut client = ResourceClient::new(&mut session, &schema);

    let err = client.read("CORE").expect_err("missing");
    assert!(matches!(
        err,
        ApplyError::NotFound(Diagnostic {
            kind: DiagnosticKind::NotFound,
            ..
        })
    ));
}

#[test]
fn update_replaces_previous_content() {
    let schema = bgp_group();
    let mut session = MemorySession::new();
    let mut client = ResourceClient::new(&mut session, &schema);

    let first = ConfigNode::new()
        .with_field("group_type", Value::str("internal"))
        .with_field("description", Value::str("old"));
    client.create("CORE", &first).expect("create");

    let second = ConfigNode::new().with_field("group_type", Value::str("internal"));
    client.update("CORE", &second).expect("update");

    assert_eq!(client.read("CORE").expect("read"), second);
}

#[test]
fn delete_removes_the_resource_and_post_checks_absence() {
    let schema = bgp_group();
    let mut session = MemorySession::new();
    let mut client = ResourceClient::new(&mut session, &schema);

    let node = ConfigNode::new().with_field("group_type", Value::str("internal"));
    client.create("CORE", &node).expect("create");
    client.delete("CORE").expect("delete");

    assert!(!client.exists("CORE").expect("exists"));
    assert!(session.lines().is_empty());
}

#[test]
fn independent_resources_do_not_interfere() {
    let schema = bgp_group();
    let mut session = MemorySession::new();

    let core = ConfigNode::new().with_field("group_type", Value::str("internal"));
    let edge = ConfigNode::new()
        .with_field("group_type", Value::str("external"))
        .with_field("peer_as", Value::str("65001"));

    ResourceClient::new(&mut session, &schema)
        .create("CORE", &core)
        .expect("create core");
    ResourceClient::new(&mut session, &schema)
        .create("EDGE", &edge)
        .expect("create edge");

    let mut client = ResourceClient::new(&mut session, &schema);
    assert_eq!(client.read("CORE").expect("read core"), core);
    assert_eq!(client.read("EDGE").expect("read edge"), edge);
}

/// Transport that acknowledges commits but never persists anything.
struct BlackholeSession;

impl Session for BlackholeSession {
    fn command(&mut self, _query: &str) -> Result<String, SessionError> {
        Ok("<configuration-set>\n</configuration-set>\n".to_string())
    }

    fn config_set(&mut self, _lines: &[String]) -> Result<(), SessionError> {
        Ok(())
    }
}

#[test]
fn create_post_check_detects_a_silently_dropped_commit() {
    let schema = bgp_group();
    let mut session = BlackholeSession;
    let mut client = ResourceClient::new(&mut session, &schema);

    let node = ConfigNode::new().with_field("group_type", Value::str("internal"));
    let err = client.create("CORE", &node).expect_err("dropped commit");

    match err {
        ApplyError::Check(diagnostic) => {
            assert_eq!(diagnostic.kind, DiagnosticKind::PostCheck);
            assert!(diagnostic.message.contains("not found"));
        }
        other => panic!("expected post-check failure, got {other:?}"),
    }
}

/// Transport whose commit always fails.
struct RefusingSession;

impl Session for RefusingSession {
    fn command(&mut self, _query: &str) -> Result<String, SessionError> {
        Ok("<configuration-set>\n</configuration-set>\n".to_string())
    }

    fn config_set(&mut self, _lines: &[String]) -> Result<(), SessionError> {
        Err(SessionError::CommitFailed("configuration locked".to_string()))
    }
}

#[test]
fn transport_errors_propagate_unchanged() {
    let schema = bgp_group();
    let mut session = RefusingSession;
    let mut client = ResourceClient::new(&mut session, &schema);

    let node = ConfigNode::new().with_field("group_type", Value::str("internal"));
    let err = client.create("CORE", &node).expect_err("locked");

    assert_eq!(
        err,
        ApplyError::Session(SessionError::CommitFailed(
            "configuration locked".to_string()
        ))
    );
}
