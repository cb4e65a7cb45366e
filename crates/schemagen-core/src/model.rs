use std::fmt;

use serde::{Deserialize, Serialize};

/// Fully qualified identifier of a schema object.
///
/// Drivers report both namespace levels when they know them; either one
/// can be absent. Comparisons are exact, `None` never matches a named
/// namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Top-level namespace, usually the database name.
    pub catalog: Option<String>,
    /// Namespace grouping tables inside a catalog.
    pub schema: Option<String>,
    /// Object name inside the schema.
    pub name: String,
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(catalog) = &self.catalog {
            write!(f, "{catalog}.")?;
        }
        if let Some(schema) = &self.schema {
            write!(f, "{schema}.")?;
        }
        f.write_str(&self.name)
    }
}

/// Type metadata for a column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnType {
    /// User-friendly formatted type (e.g. `character varying(255)`).
    pub data_type: String,
    /// Name of the underlying type (e.g. `varchar`).
    pub udt_name: String,
    pub character_max_length: Option<i32>,
    pub numeric_precision: Option<i32>,
    pub numeric_scale: Option<i32>,
}

/// One column of a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Qualified name of the owning table. Kept on the column so that
    /// constraint entries can be read standalone.
    pub table: QualifiedName,
    /// 1-based position within the table.
    pub ordinal_position: i16,
    pub name: String,
    pub column_type: ColumnType,
    pub is_nullable: bool,
    /// Default expression as reported by the backend.
    pub default: Option<String>,
}

/// Primary key constraint of a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub table: QualifiedName,
    /// Constraint name; anonymous on backends that do not name keys.
    pub name: Option<String>,
    /// Key columns in constraint order.
    pub columns: Vec<Column>,
}

/// Referential action on update or delete of the referenced row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FkAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
    Unknown,
}

/// Foreign key constraint between two tables, possibly the same one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKey {
    pub name: Option<String>,
    pub referencing_table: QualifiedName,
    /// Columns on the referencing side, paired positionally with
    /// `referenced_columns`.
    pub referencing_columns: Vec<Column>,
    pub referenced_table: QualifiedName,
    pub referenced_columns: Vec<Column>,
    pub on_update: FkAction,
    pub on_delete: FkAction,
}

/// Secondary index of a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    pub table: QualifiedName,
    pub name: String,
    /// Key columns in index order.
    pub columns: Vec<Column>,
    pub is_unique: bool,
}

/// One table and everything attached to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub name: QualifiedName,
    pub columns: Vec<Column>,
    pub primary_key: Option<PrimaryKey>,
    pub foreign_keys: Vec<ForeignKey>,
    pub indices: Vec<Index>,
}

/// The full extracted model, tables in extraction order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub tables: Vec<Table>,
}
