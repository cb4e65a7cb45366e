//! Postgres driver.
//!
//! A session pins one [`PgConnection`] and runs every catalog query over
//! it, so the whole extraction sees a single connection's snapshot
//! semantics. Closing the session consumes the connection at most once.

use std::collections::BTreeMap;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use tracing::{debug, info};

use schemagen_core::{Column, Error, Model, QualifiedName, Result, Table};

use crate::adapter::{Driver, Session};
use crate::options::{ConnectOptions, ExtractOptions};

pub mod mapper;
pub mod queries;

/// Driver for PostgreSQL databases.
#[derive(Debug, Default)]
pub struct PostgresDriver;

impl PostgresDriver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Driver for PostgresDriver {
    fn id(&self) -> &'static str {
        "postgres"
    }

    async fn connect(&self, opts: &ConnectOptions) -> Result<Box<dyn Session>> {
        let mut connect = PgConnectOptions::from_str(&opts.url)
            .map_err(|err| Error::Connection(err.to_string()))?;
        if let Some(user) = &opts.user {
            connect = connect.username(user);
        }
        if let Some(password) = &opts.password {
            connect = connect.password(password);
        }
        let conn = PgConnection::connect_with(&connect)
            .await
            .map_err(|err| Error::Connection(err.to_string()))?;
        Ok(Box::new(PostgresSession { conn: Some(conn) }))
    }
}

/// One extraction session over a pinned connection.
pub struct PostgresSession {
    conn: Option<PgConnection>,
}

#[async_trait]
impl Session for PostgresSession {
    async fn extract_model(&mut self, opts: &ExtractOptions) -> Result<Model> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| Error::Connection("session already closed".to_string()))?;
        extract(conn, opts).await
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .await
                .map_err(|err| Error::Connection(err.to_string()))?;
        }
        Ok(())
    }
}

async fn extract(conn: &mut PgConnection, opts: &ExtractOptions) -> Result<Model> {
    let catalog = queries::fetch_database_name(conn).await?;
    let schema_names = mapper::filter_schemas(queries::list_schemas(conn).await?, opts);
    info!(catalog = %catalog, schemas = schema_names.len(), "extraction started");

    // Referenced tables can live in schemas visited later (or filtered
    // out entirely); their columns are fetched on demand and reused.
    let mut column_cache: BTreeMap<(String, String), Vec<Column>> = BTreeMap::new();
    let mut tables = Vec::new();

    for schema_name in &schema_names {
        for table_name in queries::list_tables(conn, schema_name).await? {
            let name = QualifiedName {
                catalog: Some(catalog.clone()),
                schema: Some(schema_name.clone()),
                name: table_name.clone(),
            };
            let columns =
                cached_columns(conn, &mut column_cache, &catalog, schema_name, &table_name)
                    .await?;

            let primary_key = mapper::map_primary_key(
                queries::get_primary_key(conn, schema_name, &table_name).await?,
                &name,
                &columns,
            )?;

            let mut foreign_keys = Vec::new();
            for raw in queries::list_foreign_keys(conn, schema_name, &table_name).await? {
                let referenced_table = QualifiedName {
                    catalog: Some(catalog.clone()),
                    schema: Some(raw.referenced_schema.clone()),
                    name: raw.referenced_table.clone(),
                };
                let referenced_columns = cached_columns(
                    conn,
                    &mut column_cache,
                    &catalog,
                    &raw.referenced_schema,
                    &raw.referenced_table,
                )
                .await?;
                foreign_keys.push(mapper::map_foreign_key(
                    raw,
                    &name,
                    &columns,
                    &referenced_table,
                    &referenced_columns,
                )?);
            }

            let mut indices = Vec::new();
            for raw in queries::list_indexes(conn, schema_name, &table_name).await? {
                indices.push(mapper::map_index(raw, &name, &columns)?);
            }

            debug!(
                table = %name,
                columns = columns.len(),
                foreign_keys = foreign_keys.len(),
                indices = indices.len(),
                "table extracted"
            );
            tables.push(Table {
                name,
                columns,
                primary_key,
                foreign_keys,
                indices,
            });
        }
    }

    info!(tables = tables.len(), "extraction finished");
    Ok(Model { tables })
}

async fn cached_columns(
    conn: &mut PgConnection,
    cache: &mut BTreeMap<(String, String), Vec<Column>>,
    catalog: &str,
    schema: &str,
    table: &str,
) -> Result<Vec<Column>> {
    let key = (schema.to_string(), table.to_string());
    if let Some(columns) = cache.get(&key) {
        return Ok(columns.clone());
    }
    let name = QualifiedName {
        catalog: Some(catalog.to_string()),
        schema: Some(schema.to_string()),
        name: table.to_string(),
    };
    let columns = mapper::map_columns(queries::list_columns(conn, schema, table).await?, &name);
    cache.insert(key, columns.clone());
    Ok(columns)
}
