//! Live extraction round against a real Postgres database.
//!
//! Ignored by default. Point TEST_DATABASE_URL (or DATABASE_URL) at a
//! disposable database and run with `cargo test -- --ignored`.

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};

use schemagen_core::FkAction;
use schemagen_introspect::{ConnectOptions, Driver, ExtractOptions, PostgresDriver};

const FIXTURE: &[&str] = &[
    "drop schema if exists sg_fixture cascade",
    "create schema sg_fixture",
    "create table sg_fixture.users (
        id bigint generated always as identity primary key,
        email text not null,
        manager_id bigint references sg_fixture.users (id)
    )",
    "create index users_email_idx on sg_fixture.users (email)",
    "create table sg_fixture.orders (
        id bigint primary key,
        user_id bigint not null references sg_fixture.users (id) on delete cascade
    )",
];

fn database_url() -> Result<String> {
    env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .context("set TEST_DATABASE_URL or DATABASE_URL to run live tests")
}

async fn apply_fixture(url: &str) -> Result<()> {
    let opts = PgConnectOptions::from_str(url)?;
    let mut conn = PgConnection::connect_with(&opts).await?;
    for statement in FIXTURE {
        sqlx::query(statement).execute(&mut conn).await?;
    }
    conn.close().await?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs a live Postgres database"]
async fn extracts_fixture_schema() -> Result<()> {
    let url = database_url()?;
    apply_fixture(&url).await?;

    let driver = PostgresDriver::new();
    let mut session = driver
        .connect(&ConnectOptions {
            url,
            user: None,
            password: None,
        })
        .await?;
    let opts = ExtractOptions {
        schemas: Some(vec!["sg_fixture".to_string()]),
        timeout: None,
    };
    let model = session.extract_model(&opts).await?;
    session.close().await?;
    // Closing again must be a harmless no-op.
    session.close().await?;

    assert_eq!(model.tables.len(), 2);

    let users = model
        .tables
        .iter()
        .find(|table| table.name.name == "users")
        .context("users table extracted")?;
    assert_eq!(users.name.schema.as_deref(), Some("sg_fixture"));
    assert!(users.name.catalog.is_some());

    let pk = users.primary_key.as_ref().context("users primary key")?;
    let pk_columns: Vec<&str> = pk.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(pk_columns, vec!["id"]);

    let self_ref = users
        .foreign_keys
        .iter()
        .find(|fk| fk.referencing_columns[0].name == "manager_id")
        .context("self-referencing foreign key")?;
    assert_eq!(self_ref.referencing_table, users.name);
    assert_eq!(self_ref.referenced_table, users.name);
    assert_eq!(self_ref.referenced_columns[0].name, "id");

    assert!(
        users
            .indices
            .iter()
            .any(|index| index.name == "users_email_idx" && !index.is_unique)
    );

    let orders = model
        .tables
        .iter()
        .find(|table| table.name.name == "orders")
        .context("orders table extracted")?;
    let fk = orders.foreign_keys.first().context("orders foreign key")?;
    assert_eq!(fk.referenced_table, users.name);
    assert_eq!(fk.on_delete, FkAction::Cascade);
    assert_eq!(fk.on_update, FkAction::NoAction);

    let email = users
        .columns
        .iter()
        .find(|column| column.name == "email")
        .context("email column")?;
    assert!(!email.is_nullable);
    assert_eq!(email.column_type.udt_name, "text");

    Ok(())
}
