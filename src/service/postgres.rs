//! PostgreSQL backend: introspected tables, generic row decoding.

use crate::error::AppError;
use crate::schema::{introspect, TableInfo};
use crate::service::backend::{Backend, Record};
use crate::sql::{self, PgBindValue, QueryBuf};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgBackend {
    pool: PgPool,
    schema: String,
}

impl PgBackend {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        PgBackend {
            pool,
            schema: schema.into(),
        }
    }

    async fn query_many(&self, q: &QueryBuf) -> Result<Vec<Record>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn query_optional(&self, q: &QueryBuf) -> Result<Option<Record>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let row = query.fetch_optional(&self.pool).await?;
        Ok(row.map(|r| row_to_json(&r)))
    }

    async fn execute(&self, q: &QueryBuf) -> Result<u64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let done = query.execute(&self.pool).await?;
        Ok(done.rows_affected())
    }
}

#[async_trait]
impl Backend for PgBackend {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn table_names(&self) -> Result<Vec<String>, AppError> {
        introspect::table_names(&self.pool, &self.schema).await
    }

    async fn describe_table(&self, name: &str) -> Result<Option<TableInfo>, AppError> {
        introspect::describe_table(&self.pool, &self.schema, name).await
    }

    async fn list_rows(&self, table: &TableInfo, limit: u32, offset: u32) -> Result<Vec<Record>, AppError> {
        let q = sql::select_list(&self.schema, table, limit, offset);
        self.query_many(&q).await
    }

    async fn fetch_row(&self, table: &TableInfo, id: &Value) -> Result<Option<Record>, AppError> {
        let Some(pk) = table.primary_column() else {
            return Ok(None);
        };
        let q = sql::select_by_id(&self.schema, table, pk, id.clone());
        self.query_optional(&q).await
    }

    async fn insert_row(&self, table: &TableInfo, fields: &Record) -> Result<Value, AppError> {
        let q = sql::insert(&self.schema, table, fields);
        match table.primary_key.as_deref() {
            Some(pk) => {
                let row = self
                    .query_optional(&q)
                    .await?
                    .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
                Ok(row.get(pk).cloned().unwrap_or(Value::Null))
            }
            None => {
                self.execute(&q).await?;
                Ok(Value::Null)
            }
        }
    }

    async fn update_row(&self, table: &TableInfo, id: &Value, fields: &Record) -> Result<u64, AppError> {
        let Some(pk) = table.primary_column() else {
            return Ok(0);
        };
        match sql::update(&self.schema, table, pk, id.clone(), fields) {
            Some(q) => self.execute(&q).await,
            None => Ok(0),
        }
    }

    async fn delete_row(&self, table: &TableInfo, id: &Value) -> Result<u64, AppError> {
        let Some(pk) = table.primary_column() else {
            return Ok(0);
        };
        let q = sql::delete(&self.schema, table, pk, id.clone());
        self.execute(&q).await
    }
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Record {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = Record::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, col.ordinal()));
    }
    map
}

/// Decode one cell by trying the natively supported Rust types in turn.
fn cell_to_value(row: &sqlx::postgres::PgRow, idx: usize) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(idx) {
        return float_value(n as f64);
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(idx) {
        return float_value(n);
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(idx) {
        return Value::Bool(b);
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(idx) {
        return Value::String(s);
    }
    if let Ok(Some(bytes)) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return Value::String(String::from_utf8_lossy(&bytes).into_owned());
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(idx) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(idx) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(idx) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(idx) {
        return j;
    }
    Value::Null
}

fn float_value(n: f64) -> Value {
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
