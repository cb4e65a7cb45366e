//! Column type to Rust type mapping.

use schemagen_core::ColumnType;

/// Map a column type to the Rust type written into generated structs.
///
/// Temporal, uuid and json types are referenced by full path so the
/// generated files compile with only `chrono`, `uuid` and `serde_json`
/// added to the consumer. Arbitrary-precision numerics are kept as text
/// to avoid forcing a decimal crate on consumers.
pub fn rust_type(column_type: &ColumnType, is_nullable: bool) -> String {
    let base = base_type(&column_type.udt_name);
    if is_nullable {
        format!("Option<{base}>")
    } else {
        base
    }
}

fn base_type(udt_name: &str) -> String {
    // Array types arrive with a leading underscore on the element name.
    if let Some(element) = udt_name.strip_prefix('_') {
        return format!("Vec<{}>", base_type(element));
    }
    match udt_name {
        "int2" => "i16",
        "int4" => "i32",
        "int8" => "i64",
        "float4" => "f32",
        "float8" => "f64",
        "numeric" => "String",
        "bool" => "bool",
        "bytea" => "Vec<u8>",
        "uuid" => "uuid::Uuid",
        "date" => "chrono::NaiveDate",
        "time" | "timetz" => "chrono::NaiveTime",
        "timestamp" => "chrono::NaiveDateTime",
        "timestamptz" => "chrono::DateTime<chrono::Utc>",
        "json" | "jsonb" => "serde_json::Value",
        _ => "String",
    }
    .to_string()
}
