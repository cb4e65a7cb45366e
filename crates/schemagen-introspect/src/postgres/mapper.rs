//! Row-to-model mapping for the Postgres driver.

use schemagen_core::{
    Column, ColumnType, Error, FkAction, ForeignKey, Index, PrimaryKey, QualifiedName, Result,
};

use crate::options::ExtractOptions;
use crate::postgres::queries::{RawColumn, RawForeignKey, RawIndex, RawPrimaryKey};

fn is_system_schema(name: &str) -> bool {
    name.starts_with("pg_") || name == "information_schema"
}

/// Apply the schema filter. With an explicit list, membership decides and
/// system schemas can be opted in; without one, system schemas are skipped.
pub fn filter_schemas(raw: Vec<String>, opts: &ExtractOptions) -> Vec<String> {
    match &opts.schemas {
        Some(wanted) => raw
            .into_iter()
            .filter(|name| wanted.iter().any(|candidate| candidate == name))
            .collect(),
        None => raw
            .into_iter()
            .filter(|name| !is_system_schema(name))
            .collect(),
    }
}

/// Convert a referential action code from `pg_constraint` to the model enum.
pub fn fk_action_from_code(code: i8) -> FkAction {
    match code as u8 as char {
        'a' => FkAction::NoAction,
        'r' => FkAction::Restrict,
        'c' => FkAction::Cascade,
        'n' => FkAction::SetNull,
        'd' => FkAction::SetDefault,
        _ => FkAction::Unknown,
    }
}

pub fn map_columns(raw: Vec<RawColumn>, table: &QualifiedName) -> Vec<Column> {
    raw.into_iter()
        .map(|row| Column {
            table: table.clone(),
            ordinal_position: row.ordinal_position,
            name: row.name,
            column_type: ColumnType {
                data_type: row.data_type,
                udt_name: row.udt_name,
                character_max_length: row.character_max_length,
                numeric_precision: row.numeric_precision,
                numeric_scale: row.numeric_scale,
            },
            is_nullable: row.is_nullable,
            default: row.default,
        })
        .collect()
}

pub fn map_primary_key(
    raw: Option<RawPrimaryKey>,
    table: &QualifiedName,
    columns: &[Column],
) -> Result<Option<PrimaryKey>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    Ok(Some(PrimaryKey {
        table: table.clone(),
        name: Some(raw.name),
        columns: resolve_columns(&raw.columns, table, columns)?,
    }))
}

pub fn map_index(raw: RawIndex, table: &QualifiedName, columns: &[Column]) -> Result<Index> {
    Ok(Index {
        table: table.clone(),
        name: raw.name,
        columns: resolve_columns(&raw.columns, table, columns)?,
        is_unique: raw.is_unique,
    })
}

pub fn map_foreign_key(
    raw: RawForeignKey,
    table: &QualifiedName,
    columns: &[Column],
    referenced_table: &QualifiedName,
    referenced_columns: &[Column],
) -> Result<ForeignKey> {
    Ok(ForeignKey {
        referencing_columns: resolve_columns(&raw.columns, table, columns)?,
        referenced_columns: resolve_columns(
            &raw.referenced_columns,
            referenced_table,
            referenced_columns,
        )?,
        name: Some(raw.name),
        referencing_table: table.clone(),
        referenced_table: referenced_table.clone(),
        on_update: fk_action_from_code(raw.on_update_code),
        on_delete: fk_action_from_code(raw.on_delete_code),
    })
}

/// Resolve constraint column names against a table's column snapshot.
///
/// The catalog guarantees the names exist; a miss means the snapshot and
/// the constraint were read against different states of the table.
fn resolve_columns(
    names: &[String],
    table: &QualifiedName,
    columns: &[Column],
) -> Result<Vec<Column>> {
    names
        .iter()
        .map(|name| {
            columns
                .iter()
                .find(|column| &column.name == name)
                .cloned()
                .ok_or_else(|| {
                    Error::Extraction(format!("constraint names unknown column {table}.{name}"))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schemas(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn skips_system_schemas_by_default() {
        let raw = schemas(&["information_schema", "pg_catalog", "pg_toast", "public", "sales"]);
        let filtered = filter_schemas(raw, &ExtractOptions::default());
        assert_eq!(filtered, schemas(&["public", "sales"]));
    }

    #[test]
    fn explicit_list_decides_membership() {
        let raw = schemas(&["information_schema", "public", "sales"]);
        let opts = ExtractOptions {
            schemas: Some(schemas(&["sales", "information_schema"])),
            timeout: None,
        };
        let filtered = filter_schemas(raw, &opts);
        assert_eq!(filtered, schemas(&["information_schema", "sales"]));
    }

    #[test]
    fn maps_referential_action_codes() {
        assert_eq!(fk_action_from_code(b'a' as i8), FkAction::NoAction);
        assert_eq!(fk_action_from_code(b'r' as i8), FkAction::Restrict);
        assert_eq!(fk_action_from_code(b'c' as i8), FkAction::Cascade);
        assert_eq!(fk_action_from_code(b'n' as i8), FkAction::SetNull);
        assert_eq!(fk_action_from_code(b'd' as i8), FkAction::SetDefault);
        assert_eq!(fk_action_from_code(b'?' as i8), FkAction::Unknown);
    }
}
