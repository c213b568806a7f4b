//! The database seam: every operation the HTTP layer needs from a relational store.

use crate::error::AppError;
use crate::schema::TableInfo;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// One row as a JSON object, column name to decoded value, keys in column order.
pub type Record = Map<String, Value>;

/// Rows are addressed by the table's single-column primary key. Implementations
/// return `Ok(None)` / `Ok(0)` for tables without one.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), AppError>;

    async fn table_names(&self) -> Result<Vec<String>, AppError>;

    /// None when no such table exists.
    async fn describe_table(&self, name: &str) -> Result<Option<TableInfo>, AppError>;

    async fn list_rows(&self, table: &TableInfo, limit: u32, offset: u32) -> Result<Vec<Record>, AppError>;

    async fn fetch_row(&self, table: &TableInfo, id: &Value) -> Result<Option<Record>, AppError>;

    /// Insert validated fields; returns the new primary key value (or null).
    async fn insert_row(&self, table: &TableInfo, fields: &Record) -> Result<Value, AppError>;

    /// Returns the number of rows changed.
    async fn update_row(&self, table: &TableInfo, id: &Value, fields: &Record) -> Result<u64, AppError>;

    /// Returns the number of rows removed.
    async fn delete_row(&self, table: &TableInfo, id: &Value) -> Result<u64, AppError>;
}
