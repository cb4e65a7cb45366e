//! Core schema model for schemagen.
//!
//! This crate defines the introspected database model, the namespace
//! correction applied to it before code generation, consistency checks,
//! and the shared error type. Everything here is backend-agnostic; the
//! drivers that populate the model live in `schemagen-introspect`.

pub mod error;
pub mod fix;
pub mod model;
pub mod redaction;
pub mod validation;

pub use error::{Error, Result};
pub use fix::{fix_foreign_key, fix_model, fix_qualified_name, fix_table};
pub use model::{
    Column, ColumnType, FkAction, ForeignKey, Index, Model, PrimaryKey, QualifiedName, Table,
};
pub use redaction::{RedactedConnection, redact_connection_string};
pub use validation::validate_model;
