//! Schema introspection against PostgreSQL `information_schema`.

use crate::error::AppError;
use crate::schema::types::{ColumnInfo, ColumnKind, TableInfo};
use crate::sql::quoted;
use sqlx::PgPool;

/// Base tables of `schema`, sorted by name. Views are not listed.
pub async fn table_names(pool: &PgPool, schema: &str) -> Result<Vec<String>, AppError> {
    let sql = "SELECT table_name::text FROM information_schema.tables \
               WHERE table_schema = $1 AND table_type = 'BASE TABLE' \
               ORDER BY table_name";
    tracing::debug!(sql = %sql, schema = %schema, "introspect");
    let names = sqlx::query_scalar::<_, String>(sql)
        .bind(schema)
        .fetch_all(pool)
        .await?;
    Ok(names)
}

/// Columns of one base table in ordinal order. None when `table` is not a base table of `schema`.
pub async fn describe_table(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Option<TableInfo>, AppError> {
    let exists_sql = "SELECT EXISTS (SELECT 1 FROM information_schema.tables \
                      WHERE table_schema = $1 AND table_name = $2 AND table_type = 'BASE TABLE')";
    tracing::debug!(sql = %exists_sql, schema = %schema, table = %table, "introspect");
    let exists = sqlx::query_scalar::<_, bool>(exists_sql)
        .bind(schema)
        .bind(table)
        .fetch_one(pool)
        .await?;
    if !exists {
        return Ok(None);
    }

    // A base table may have no columns at all (`CREATE TABLE t ()`).
    let columns_sql = "SELECT column_name::text, data_type::text, udt_schema::text, udt_name::text, \
                       (is_nullable = 'YES') AS nullable, \
                       (column_default IS NOT NULL OR is_identity = 'YES') AS has_default \
                       FROM information_schema.columns \
                       WHERE table_schema = $1 AND table_name = $2 \
                       ORDER BY ordinal_position";
    tracing::debug!(sql = %columns_sql, schema = %schema, table = %table, "introspect");
    let rows = sqlx::query_as::<_, (String, String, String, String, bool, bool)>(columns_sql)
        .bind(schema)
        .bind(table)
        .fetch_all(pool)
        .await?;

    let pk_columns = primary_key_columns(pool, schema, table).await?;
    let primary_key = match pk_columns.as_slice() {
        [single] => Some(single.clone()),
        _ => None,
    };

    let columns = rows
        .into_iter()
        .map(|(name, data_type, udt_schema, udt_name, nullable, has_default)| ColumnInfo {
            kind: ColumnKind::from_data_type(&data_type),
            sql_type: format!("{}.{}", quoted(&udt_schema), quoted(&udt_name)),
            name,
            data_type,
            nullable,
            has_default,
        })
        .collect();

    Ok(Some(TableInfo {
        name: table.to_string(),
        columns,
        primary_key,
    }))
}

async fn primary_key_columns(pool: &PgPool, schema: &str, table: &str) -> Result<Vec<String>, AppError> {
    let sql = "SELECT kcu.column_name::text \
               FROM information_schema.table_constraints tc \
               JOIN information_schema.key_column_usage kcu \
                 ON kcu.constraint_schema = tc.constraint_schema \
                AND kcu.constraint_name = tc.constraint_name \
                AND kcu.table_name = tc.table_name \
               WHERE tc.constraint_type = 'PRIMARY KEY' AND tc.table_schema = $1 AND tc.table_name = $2 \
               ORDER BY kcu.ordinal_position";
    let cols = sqlx::query_scalar::<_, String>(sql)
        .bind(schema)
        .bind(table)
        .fetch_all(pool)
        .await?;
    Ok(cols)
}
