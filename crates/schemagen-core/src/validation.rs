//! Consistency checks for extracted models.
//!
//! Run against the raw model before any correction. The checks cover
//! what drivers occasionally get wrong: duplicated objects, nested
//! entities bound to the wrong table, and constraints naming columns the
//! table does not have.

use std::collections::{BTreeSet, HashMap};

use crate::error::{Error, Result};
use crate::model::{Model, QualifiedName, Table};

/// Validate the internal consistency of a model.
///
/// Returns the first problem found as [`Error::InvalidModel`].
pub fn validate_model(model: &Model) -> Result<()> {
    // Keyed by the structural name, not its rendering: two tables whose
    // namespaces differ only in which part is absent are distinct.
    let mut catalog: HashMap<&QualifiedName, BTreeSet<&str>> = HashMap::new();

    for table in &model.tables {
        if catalog.contains_key(&table.name) {
            return Err(Error::InvalidModel(format!(
                "duplicate table: {}",
                table.name
            )));
        }
        let mut columns = BTreeSet::new();
        for column in &table.columns {
            if !columns.insert(column.name.as_str()) {
                return Err(Error::InvalidModel(format!(
                    "duplicate column: {}.{}",
                    table.name, column.name
                )));
            }
        }
        catalog.insert(&table.name, columns);
    }

    for table in &model.tables {
        validate_table(&catalog, table)?;
    }
    Ok(())
}

fn validate_table(catalog: &HashMap<&QualifiedName, BTreeSet<&str>>, table: &Table) -> Result<()> {
    let name = &table.name;
    let Some(own_columns) = catalog.get(name) else {
        return Err(Error::InvalidModel(format!("unknown table: {name}")));
    };

    for column in &table.columns {
        if column.table != table.name {
            return Err(Error::InvalidModel(format!(
                "column {name}.{} is bound to table {}",
                column.name, column.table
            )));
        }
    }

    if let Some(pk) = &table.primary_key {
        if pk.table != table.name {
            return Err(Error::InvalidModel(format!(
                "primary key of {name} is bound to table {}",
                pk.table
            )));
        }
        for column in &pk.columns {
            if !own_columns.contains(column.name.as_str()) {
                return Err(Error::InvalidModel(format!(
                    "primary key column not found: {name}.{}",
                    column.name
                )));
            }
        }
    }

    for index in &table.indices {
        if index.table != table.name {
            return Err(Error::InvalidModel(format!(
                "index {} of {name} is bound to table {}",
                index.name, index.table
            )));
        }
        for column in &index.columns {
            if !own_columns.contains(column.name.as_str()) {
                return Err(Error::InvalidModel(format!(
                    "index column not found: {name}.{} ({})",
                    column.name, index.name
                )));
            }
        }
    }

    for fk in &table.foreign_keys {
        let fk_name = fk.name.as_deref().unwrap_or("<unnamed>");
        if fk.referencing_table != table.name {
            return Err(Error::InvalidModel(format!(
                "foreign key {fk_name} of {name} references from table {}",
                fk.referencing_table
            )));
        }
        if fk.referencing_columns.len() != fk.referenced_columns.len() {
            return Err(Error::InvalidModel(format!(
                "foreign key {fk_name} pairs {} referencing with {} referenced columns",
                fk.referencing_columns.len(),
                fk.referenced_columns.len()
            )));
        }
        for column in &fk.referencing_columns {
            if !own_columns.contains(column.name.as_str()) {
                return Err(Error::InvalidModel(format!(
                    "foreign key column not found: {name}.{} ({fk_name})",
                    column.name
                )));
            }
        }
        // A referenced table can legitimately fall outside the extracted
        // set when a schema filter is active; only resolved targets are
        // checked.
        if let Some(referenced) = catalog.get(&fk.referenced_table) {
            for column in &fk.referenced_columns {
                if !referenced.contains(column.name.as_str()) {
                    return Err(Error::InvalidModel(format!(
                        "referenced column not found: {}.{} ({fk_name})",
                        fk.referenced_table, column.name
                    )));
                }
            }
        }
    }

    Ok(())
}
