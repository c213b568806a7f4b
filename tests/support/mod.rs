//! In-memory backend for driving the router without a database.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use db_explorer::{app, AppError, AppState, Backend, ColumnInfo, ColumnKind, Pagination, Record, TableInfo};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

struct Table {
    info: TableInfo,
    rows: Vec<Record>,
    next_id: i64,
}

/// Tables are kept sorted by name; rows in insertion (and key) order.
pub struct MemoryBackend {
    tables: Mutex<BTreeMap<String, Table>>,
    healthy: bool,
}

pub fn column(name: &str, data_type: &str, nullable: bool) -> ColumnInfo {
    ColumnInfo {
        name: name.to_string(),
        data_type: data_type.to_string(),
        sql_type: String::new(),
        kind: ColumnKind::from_data_type(data_type),
        nullable,
        has_default: false,
    }
}

fn serial_key(name: &str) -> ColumnInfo {
    ColumnInfo {
        has_default: true,
        ..column(name, "integer", false)
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend {
            tables: Mutex::new(BTreeMap::new()),
            healthy: true,
        }
    }

    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    pub fn with_table(self, info: TableInfo, rows: Vec<Value>) -> Self {
        let rows: Vec<Record> = rows
            .into_iter()
            .map(|v| match v {
                Value::Object(m) => m,
                other => panic!("fixture row must be an object: {}", other),
            })
            .collect();
        let next_id = rows.len() as i64 + 1;
        self.tables
            .lock()
            .unwrap()
            .insert(info.name.clone(), Table { info, rows, next_id });
        self
    }

    /// `items` and `users` tables with a few rows each.
    pub fn with_fixtures() -> Self {
        let items = TableInfo {
            name: "items".into(),
            columns: vec![
                serial_key("id"),
                column("title", "character varying", false),
                column("description", "text", false),
                column("updated", "character varying", true),
            ],
            primary_key: Some("id".into()),
        };
        let users = TableInfo {
            name: "users".into(),
            columns: vec![
                serial_key("user_id"),
                column("login", "character varying", false),
                column("password", "character varying", false),
                column("email", "character varying", false),
                column("info", "text", false),
                column("updated", "character varying", true),
            ],
            primary_key: Some("user_id".into()),
        };
        Self::new()
            .with_table(
                items,
                vec![
                    json!({"id": 1, "title": "database/sql", "description": "talk about databases", "updated": "rvasily"}),
                    json!({"id": 2, "title": "memcache", "description": "talk about memcache with an example", "updated": null}),
                ],
            )
            .with_table(
                users,
                vec![json!({"user_id": 1, "login": "rvasily", "password": "love", "email": "rvasily@example.com", "info": "none", "updated": null})],
            )
    }
}

fn key_of<'a>(info: &'a TableInfo) -> Option<&'a str> {
    info.primary_key.as_deref()
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn ping(&self) -> Result<(), AppError> {
        if self.healthy {
            Ok(())
        } else {
            Err(AppError::Db(sqlx::Error::PoolTimedOut))
        }
    }

    async fn table_names(&self) -> Result<Vec<String>, AppError> {
        Ok(self.tables.lock().unwrap().keys().cloned().collect())
    }

    async fn describe_table(&self, name: &str) -> Result<Option<TableInfo>, AppError> {
        Ok(self.tables.lock().unwrap().get(name).map(|t| t.info.clone()))
    }

    async fn list_rows(&self, table: &TableInfo, limit: u32, offset: u32) -> Result<Vec<Record>, AppError> {
        let tables = self.tables.lock().unwrap();
        let rows = tables
            .get(&table.name)
            .map(|t| {
                t.rows
                    .iter()
                    .skip(offset as usize)
                    .take(limit as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(rows)
    }

    async fn fetch_row(&self, table: &TableInfo, id: &Value) -> Result<Option<Record>, AppError> {
        let Some(pk) = key_of(table) else { return Ok(None) };
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .get(&table.name)
            .and_then(|t| t.rows.iter().find(|r| r.get(pk) == Some(id)).cloned()))
    }

    async fn insert_row(&self, table: &TableInfo, fields: &Record) -> Result<Value, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let t = tables
            .get_mut(&table.name)
            .ok_or_else(|| AppError::UnknownTable(table.name.clone()))?;
        let mut row = Record::new();
        for c in &t.info.columns {
            row.insert(c.name.clone(), fields.get(&c.name).cloned().unwrap_or(Value::Null));
        }
        let id = match key_of(&t.info) {
            Some(pk) => {
                let id = match fields.get(pk) {
                    Some(v) => v.clone(),
                    None => json!(t.next_id),
                };
                row.insert(pk.to_string(), id.clone());
                id
            }
            None => Value::Null,
        };
        t.next_id += 1;
        t.rows.push(row);
        Ok(id)
    }

    async fn update_row(&self, table: &TableInfo, id: &Value, fields: &Record) -> Result<u64, AppError> {
        let Some(pk) = key_of(table) else { return Ok(0) };
        let mut tables = self.tables.lock().unwrap();
        let Some(t) = tables.get_mut(&table.name) else { return Ok(0) };
        let mut changed = 0;
        for row in t.rows.iter_mut().filter(|r| r.get(pk) == Some(id)) {
            for (k, v) in fields {
                row.insert(k.clone(), v.clone());
            }
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete_row(&self, table: &TableInfo, id: &Value) -> Result<u64, AppError> {
        let Some(pk) = key_of(table) else { return Ok(0) };
        let mut tables = self.tables.lock().unwrap();
        let Some(t) = tables.get_mut(&table.name) else { return Ok(0) };
        let before = t.rows.len();
        t.rows.retain(|r| r.get(pk) != Some(id));
        Ok((before - t.rows.len()) as u64)
    }
}

pub fn router(backend: MemoryBackend) -> Router {
    app(AppState::new(Arc::new(backend), Pagination::default()), 1024 * 1024)
}

/// Send one request and decode the JSON body (null when empty).
pub async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
    };
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn call_raw(app: &Router, method: &str, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
