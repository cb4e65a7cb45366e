//! Namespace correction for extracted models.
//!
//! Some driver stacks report every qualified name with the catalog and
//! schema fields inverted. The functions here rebuild a model with the two
//! fields swapped on every name, restoring the cross-references between
//! tables, columns and constraints so the result is consistent again.
//! Every function returns a new value and leaves its input untouched.

use crate::model::{Column, ForeignKey, Index, Model, PrimaryKey, QualifiedName, Table};

/// Swap the catalog and schema of a qualified name.
///
/// The object name itself is never changed, and an absent field moves
/// like any other value. Applying the swap twice returns the original.
pub fn fix_qualified_name(name: &QualifiedName) -> QualifiedName {
    QualifiedName {
        catalog: name.schema.clone(),
        schema: name.catalog.clone(),
        name: name.name.clone(),
    }
}

/// Rebind a column to its table's corrected name.
///
/// The caller passes the corrected name rather than deriving it here, so
/// every column under one table ends up with the identical value.
pub fn fix_column(column: &Column, corrected_table: &QualifiedName) -> Column {
    Column {
        table: corrected_table.clone(),
        ordinal_position: column.ordinal_position,
        name: column.name.clone(),
        column_type: column.column_type.clone(),
        is_nullable: column.is_nullable,
        default: column.default.clone(),
    }
}

/// Rebind a primary key and its columns to the corrected table name.
pub fn fix_primary_key(pk: &PrimaryKey, corrected_table: &QualifiedName) -> PrimaryKey {
    PrimaryKey {
        table: corrected_table.clone(),
        name: pk.name.clone(),
        columns: pk
            .columns
            .iter()
            .map(|column| fix_column(column, corrected_table))
            .collect(),
    }
}

/// Rebind an index and its columns to the corrected table name.
pub fn fix_index(index: &Index, corrected_table: &QualifiedName) -> Index {
    Index {
        table: corrected_table.clone(),
        name: index.name.clone(),
        columns: index
            .columns
            .iter()
            .map(|column| fix_column(column, corrected_table))
            .collect(),
        is_unique: index.is_unique,
    }
}

/// Correct both sides of a foreign key.
///
/// Each side is swapped independently by the same rule, so a key whose
/// two sides name the same table comes out with both sides still equal.
pub fn fix_foreign_key(fk: &ForeignKey) -> ForeignKey {
    let referencing_table = fix_qualified_name(&fk.referencing_table);
    let referenced_table = fix_qualified_name(&fk.referenced_table);
    ForeignKey {
        name: fk.name.clone(),
        referencing_columns: fk
            .referencing_columns
            .iter()
            .map(|column| fix_column(column, &referencing_table))
            .collect(),
        referenced_columns: fk
            .referenced_columns
            .iter()
            .map(|column| fix_column(column, &referenced_table))
            .collect(),
        referencing_table,
        referenced_table,
        on_update: fk.on_update.clone(),
        on_delete: fk.on_delete.clone(),
    }
}

/// Correct a table and everything nested under it.
///
/// The table's own name is corrected first; columns, the primary key and
/// indices are rebound to that one value. Foreign keys correct their
/// table references themselves because they can point at other tables.
pub fn fix_table(table: &Table) -> Table {
    let name = fix_qualified_name(&table.name);
    Table {
        columns: table
            .columns
            .iter()
            .map(|column| fix_column(column, &name))
            .collect(),
        primary_key: table
            .primary_key
            .as_ref()
            .map(|pk| fix_primary_key(pk, &name)),
        foreign_keys: table.foreign_keys.iter().map(fix_foreign_key).collect(),
        indices: table
            .indices
            .iter()
            .map(|index| fix_index(index, &name))
            .collect(),
        name,
    }
}

/// Correct every table of a model, preserving their order.
///
/// No cross-table checks happen here; whether a foreign key target exists
/// in the model is the extraction side's concern.
pub fn fix_model(model: &Model) -> Model {
    Model {
        tables: model.tables.iter().map(fix_table).collect(),
    }
}
