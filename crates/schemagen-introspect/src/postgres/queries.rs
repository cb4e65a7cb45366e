//! Catalog queries behind the Postgres driver.
//!
//! Everything reads `pg_catalog` directly instead of the information
//! schema views, except for the character and numeric limits which only
//! the views expose in a digested form. All identifier columns are cast
//! to `text` so rows decode into plain strings.

use sqlx::PgConnection;

use schemagen_core::{Error, Result};

fn extraction_error(err: sqlx::Error) -> Error {
    Error::Extraction(err.to_string())
}

/// Name of the connected database, used as the catalog of every object.
pub async fn fetch_database_name(conn: &mut PgConnection) -> Result<String> {
    sqlx::query_scalar::<_, String>("select current_database()")
        .fetch_one(&mut *conn)
        .await
        .map_err(extraction_error)
}

/// Every namespace in the database, system ones included; filtering
/// happens in the mapper.
pub async fn list_schemas(conn: &mut PgConnection) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>("select nspname::text from pg_namespace order by nspname")
        .fetch_all(&mut *conn)
        .await
        .map_err(extraction_error)
}

/// Ordinary and partitioned tables of one schema, sorted by name.
pub async fn list_tables(conn: &mut PgConnection, schema: &str) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        r#"
        select c.relname::text
        from pg_class c
        join pg_namespace n on n.oid = c.relnamespace
        where n.nspname = $1
          and c.relkind in ('r', 'p')
        order by c.relname
        "#,
    )
    .bind(schema)
    .fetch_all(&mut *conn)
    .await
    .map_err(extraction_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawColumn {
    pub ordinal_position: i16,
    pub name: String,
    pub data_type: String,
    pub udt_name: String,
    pub character_max_length: Option<i32>,
    pub numeric_precision: Option<i32>,
    pub numeric_scale: Option<i32>,
    pub is_nullable: bool,
    pub default: Option<String>,
}

/// Live columns of one table in attribute order.
pub async fn list_columns(
    conn: &mut PgConnection,
    schema: &str,
    table: &str,
) -> Result<Vec<RawColumn>> {
    sqlx::query_as::<_, RawColumn>(
        r#"
        select
            a.attnum as ordinal_position,
            a.attname::text as name,
            pg_catalog.format_type(a.atttypid, a.atttypmod) as data_type,
            t.typname::text as udt_name,
            ic.character_maximum_length::int4 as character_max_length,
            ic.numeric_precision::int4 as numeric_precision,
            ic.numeric_scale::int4 as numeric_scale,
            (not a.attnotnull) as is_nullable,
            pg_get_expr(ad.adbin, ad.adrelid) as "default"
        from pg_attribute a
        join pg_class c on c.oid = a.attrelid
        join pg_namespace n on n.oid = c.relnamespace
        join pg_type t on t.oid = a.atttypid
        left join pg_attrdef ad on ad.adrelid = a.attrelid and ad.adnum = a.attnum
        left join information_schema.columns ic
            on ic.table_schema = n.nspname
           and ic.table_name = c.relname
           and ic.column_name = a.attname
        where n.nspname = $1
          and c.relname = $2
          and a.attnum > 0
          and not a.attisdropped
        order by a.attnum
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(&mut *conn)
    .await
    .map_err(extraction_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawPrimaryKey {
    pub name: String,
    pub columns: Vec<String>,
}

/// Primary key constraint of one table, if any, with columns in key order.
pub async fn get_primary_key(
    conn: &mut PgConnection,
    schema: &str,
    table: &str,
) -> Result<Option<RawPrimaryKey>> {
    sqlx::query_as::<_, RawPrimaryKey>(
        r#"
        select
            con.conname::text as name,
            array_agg(att.attname::text order by k.ordinality) as columns
        from pg_constraint con
        join pg_class rel on rel.oid = con.conrelid
        join pg_namespace nsp on nsp.oid = rel.relnamespace
        join unnest(con.conkey) with ordinality as k(attnum, ordinality) on true
        join pg_attribute att on att.attrelid = rel.oid and att.attnum = k.attnum
        where nsp.nspname = $1
          and rel.relname = $2
          and con.contype = 'p'
        group by con.conname
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_optional(&mut *conn)
    .await
    .map_err(extraction_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawForeignKey {
    pub name: String,
    pub columns: Vec<String>,
    pub referenced_schema: String,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
    pub on_update_code: i8,
    pub on_delete_code: i8,
}

/// Foreign keys declared on one table.
///
/// The two-array `unnest` pairs referencing and referenced attribute
/// numbers positionally, which keeps composite keys aligned.
pub async fn list_foreign_keys(
    conn: &mut PgConnection,
    schema: &str,
    table: &str,
) -> Result<Vec<RawForeignKey>> {
    sqlx::query_as::<_, RawForeignKey>(
        r#"
        select
            con.conname::text as name,
            array_agg(src_att.attname::text order by k.ordinality) as columns,
            ref_nsp.nspname::text as referenced_schema,
            ref_rel.relname::text as referenced_table,
            array_agg(ref_att.attname::text order by k.ordinality) as referenced_columns,
            con.confupdtype as on_update_code,
            con.confdeltype as on_delete_code
        from pg_constraint con
        join pg_class src_rel on src_rel.oid = con.conrelid
        join pg_namespace src_nsp on src_nsp.oid = src_rel.relnamespace
        join pg_class ref_rel on ref_rel.oid = con.confrelid
        join pg_namespace ref_nsp on ref_nsp.oid = ref_rel.relnamespace
        join unnest(con.conkey, con.confkey) with ordinality
            as k(src_attnum, ref_attnum, ordinality) on true
        join pg_attribute src_att
            on src_att.attrelid = src_rel.oid and src_att.attnum = k.src_attnum
        join pg_attribute ref_att
            on ref_att.attrelid = ref_rel.oid and ref_att.attnum = k.ref_attnum
        where src_nsp.nspname = $1
          and src_rel.relname = $2
          and con.contype = 'f'
        group by con.conname, ref_nsp.nspname, ref_rel.relname,
                 con.confupdtype, con.confdeltype
        order by con.conname
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(&mut *conn)
    .await
    .map_err(extraction_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawIndex {
    pub name: String,
    pub is_unique: bool,
    pub columns: Vec<String>,
}

/// Secondary indexes of one table with columns in key order.
///
/// The primary key index is skipped since the key is modeled separately,
/// and expression indexes are skipped because they have no stable column
/// list.
pub async fn list_indexes(
    conn: &mut PgConnection,
    schema: &str,
    table: &str,
) -> Result<Vec<RawIndex>> {
    sqlx::query_as::<_, RawIndex>(
        r#"
        select
            idx.relname::text as name,
            i.indisunique as is_unique,
            array_agg(att.attname::text order by k.ordinality) as columns
        from pg_index i
        join pg_class tbl on tbl.oid = i.indrelid
        join pg_namespace nsp on nsp.oid = tbl.relnamespace
        join pg_class idx on idx.oid = i.indexrelid
        join unnest(i.indkey::smallint[]) with ordinality as k(attnum, ordinality) on true
        join pg_attribute att on att.attrelid = tbl.oid and att.attnum = k.attnum
        where nsp.nspname = $1
          and tbl.relname = $2
          and not i.indisprimary
          and i.indexprs is null
        group by idx.relname, i.indisunique
        order by idx.relname
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(&mut *conn)
    .await
    .map_err(extraction_error)
}
