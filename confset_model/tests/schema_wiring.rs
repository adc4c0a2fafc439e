use confset_model::{
    BlockSchema, FieldKind, FieldSchema, RepeatedBlockSchema, ResourceSchema, Rule, SchemaError,
};

fn field(name: &'static str, keyword: &'static str, kind: FieldKind) -> FieldSchema {
    FieldSchema {
        name,
        keyword,
        kind,
    }
}

fn resource(block: BlockSchema) -> ResourceSchema {
    ResourceSchema {
        type_name: "test_resource",
        keyword_path: "test resource",
        name_quoted: true,
        block,
    }
}

#[test]
fn verify_accepts_well_formed_tables() {
    let schema = resource(BlockSchema {
        fields: vec![
            field("mode", "mode", FieldKind::Str { quoted: false }),
            field("limit", "limit", FieldKind::Int),
        ],
        rules: vec![Rule::Requires {
            field: "limit",
            companion: "mode",
        }],
        ..BlockSchema::default()
    });

    assert_eq!(schema.verify(), Ok(()));
}

#[test]
fn verify_rejects_rule_naming_unknown_field() {
    let schema = resource(BlockSchema {
        fields: vec![field("mode", "mode", FieldKind::Str { quoted: false })],
        rules: vec![Rule::Conflicts {
            field: "mode",
            other: "missing",
        }],
        ..BlockSchema::default()
    });

    assert_eq!(
        schema.verify(),
        Err(SchemaError::UnknownField {
            block: "test_resource".to_string(),
            field: "missing".to_string(),
        })
    );
}

#[test]
fn verify_rejects_identity_arity_outside_one_or_two() {
    let schema = resource(BlockSchema {
        repeated: vec![RepeatedBlockSchema {
            name: "peer",
            keyword: "peer",
            identity: Vec::new(),
            schema: BlockSchema {
                fields: vec![field("address", "address", FieldKind::Str { quoted: false })],
                ..BlockSchema::default()
            },
        }],
        ..BlockSchema::default()
    });

    assert_eq!(
        schema.verify(),
        Err(SchemaError::IdentityArity {
            block: "test_resource.peer".to_string(),
            count: 0,
        })
    );
}

#[test]
fn verify_rejects_identity_key_not_declared_as_field() {
    let schema = resource(BlockSchema {
        repeated: vec![RepeatedBlockSchema {
            name: "peer",
            keyword: "peer",
            identity: vec!["address"],
            schema: BlockSchema::default(),
        }],
        ..BlockSchema::default()
    });

    assert_eq!(
        schema.verify(),
        Err(SchemaError::UnknownField {
            block: "test_resource.peer".to_string(),
            field: "address".to_string(),
        })
    );
}

#[test]
fn prefix_and_delete_share_the_rendered_name() {
    let schema = resource(BlockSchema::default());
    assert_eq!(schema.prefix("R1"), "set test resource \"R1\" ");
    assert_eq!(schema.delete_line("R1"), "delete test resource \"R1\"");
    assert_eq!(
        schema.show_command("R1"),
        "show configuration test resource \"R1\" | display set relative"
    );
}
