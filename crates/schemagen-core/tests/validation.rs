use schemagen_core::model::{
    Column, ColumnType, FkAction, ForeignKey, Model, PrimaryKey, QualifiedName, Table,
};
use schemagen_core::validation::validate_model;
use schemagen_core::{Error, fix_model};

fn qname(name: &str) -> QualifiedName {
    QualifiedName {
        catalog: Some("db".to_string()),
        schema: Some("public".to_string()),
        name: name.to_string(),
    }
}

fn column(table: &QualifiedName, position: i16, name: &str) -> Column {
    Column {
        table: table.clone(),
        ordinal_position: position,
        name: name.to_string(),
        column_type: ColumnType {
            data_type: "bigint".to_string(),
            udt_name: "int8".to_string(),
            character_max_length: None,
            numeric_precision: None,
            numeric_scale: None,
        },
        is_nullable: false,
        default: None,
    }
}

fn consistent_model() -> Model {
    let users = qname("users");
    let orders = qname("orders");
    let user_id = column(&users, 1, "id");
    Model {
        tables: vec![
            Table {
                columns: vec![user_id.clone(), column(&users, 2, "email")],
                primary_key: Some(PrimaryKey {
                    table: users.clone(),
                    name: Some("users_pkey".to_string()),
                    columns: vec![user_id.clone()],
                }),
                foreign_keys: Vec::new(),
                indices: Vec::new(),
                name: users.clone(),
            },
            Table {
                columns: vec![column(&orders, 1, "id"), column(&orders, 2, "user_id")],
                primary_key: None,
                foreign_keys: vec![ForeignKey {
                    name: Some("orders_user_fkey".to_string()),
                    referencing_table: orders.clone(),
                    referencing_columns: vec![column(&orders, 2, "user_id")],
                    referenced_table: users,
                    referenced_columns: vec![user_id],
                    on_update: FkAction::NoAction,
                    on_delete: FkAction::NoAction,
                }],
                indices: Vec::new(),
                name: orders,
            },
        ],
    }
}

#[test]
fn accepts_a_consistent_model() {
    validate_model(&consistent_model()).expect("model validates");
}

#[test]
fn a_corrected_model_still_validates() {
    validate_model(&fix_model(&consistent_model())).expect("corrected model validates");
}

#[test]
fn rejects_duplicate_tables() {
    let mut model = consistent_model();
    let duplicate = model.tables[0].clone();
    model.tables.push(duplicate);

    let err = validate_model(&model).expect_err("duplicate must be rejected");
    assert!(matches!(err, Error::InvalidModel(message) if message.contains("duplicate table")));
}

#[test]
fn accepts_tables_whose_namespaces_differ_only_in_absence() {
    // Both names render as "x.t"; only structural identity may decide
    // whether they collide.
    let catalog_only = QualifiedName {
        catalog: Some("x".to_string()),
        schema: None,
        name: "t".to_string(),
    };
    let schema_only = QualifiedName {
        catalog: None,
        schema: Some("x".to_string()),
        name: "t".to_string(),
    };
    let model = Model {
        tables: [catalog_only, schema_only]
            .map(|name| Table {
                columns: vec![column(&name, 1, "id")],
                primary_key: None,
                foreign_keys: Vec::new(),
                indices: Vec::new(),
                name,
            })
            .into(),
    };

    validate_model(&model).expect("distinct names validate");
}

#[test]
fn rejects_duplicate_columns() {
    let mut model = consistent_model();
    let duplicate = model.tables[0].columns[0].clone();
    model.tables[0].columns.push(duplicate);

    let err = validate_model(&model).expect_err("duplicate must be rejected");
    assert!(matches!(err, Error::InvalidModel(message) if message.contains("duplicate column")));
}

#[test]
fn rejects_columns_bound_to_another_table() {
    let mut model = consistent_model();
    model.tables[0].columns[1].table = qname("orders");

    let err = validate_model(&model).expect_err("misbound column must be rejected");
    assert!(matches!(err, Error::InvalidModel(message) if message.contains("bound to table")));
}

#[test]
fn rejects_unpaired_foreign_key_columns() {
    let mut model = consistent_model();
    model.tables[1].foreign_keys[0].referenced_columns.clear();

    let err = validate_model(&model).expect_err("unpaired columns must be rejected");
    assert!(matches!(err, Error::InvalidModel(message) if message.contains("pairs")));
}

#[test]
fn rejects_primary_key_over_unknown_column() {
    let mut model = consistent_model();
    if let Some(pk) = &mut model.tables[0].primary_key {
        pk.columns[0].name = "missing".to_string();
    }

    let err = validate_model(&model).expect_err("unknown pk column must be rejected");
    assert!(
        matches!(err, Error::InvalidModel(message) if message.contains("primary key column not found"))
    );
}
