use schemagen_core::model::{Column, ColumnType, FkAction, Model, QualifiedName, Table};

#[test]
fn serializes_model_deterministically() {
    let table = QualifiedName {
        catalog: Some("db".to_string()),
        schema: Some("public".to_string()),
        name: "users".to_string(),
    };
    let model = Model {
        tables: vec![Table {
            name: table.clone(),
            columns: vec![Column {
                table,
                ordinal_position: 1,
                name: "id".to_string(),
                column_type: ColumnType {
                    data_type: "bigint".to_string(),
                    udt_name: "int8".to_string(),
                    character_max_length: None,
                    numeric_precision: None,
                    numeric_scale: None,
                },
                is_nullable: false,
                default: None,
            }],
            primary_key: None,
            foreign_keys: Vec::new(),
            indices: Vec::new(),
        }],
    };

    let json = serde_json::to_string_pretty(&model).expect("serialize model");
    let expected = r#"{
  "tables": [
    {
      "name": {
        "catalog": "db",
        "schema": "public",
        "name": "users"
      },
      "columns": [
        {
          "table": {
            "catalog": "db",
            "schema": "public",
            "name": "users"
          },
          "ordinal_position": 1,
          "name": "id",
          "column_type": {
            "data_type": "bigint",
            "udt_name": "int8",
            "character_max_length": null,
            "numeric_precision": null,
            "numeric_scale": null
          },
          "is_nullable": false,
          "default": null
        }
      ],
      "primary_key": null,
      "foreign_keys": [],
      "indices": []
    }
  ]
}"#;
    assert_eq!(json, expected);
}

#[test]
fn fk_actions_use_snake_case_on_the_wire() {
    let json = serde_json::to_string(&FkAction::SetNull).expect("serialize action");
    assert_eq!(json, "\"set_null\"");

    let parsed: FkAction = serde_json::from_str("\"cascade\"").expect("parse action");
    assert_eq!(parsed, FkAction::Cascade);
}
