//! Explorer handlers: list tables, list rows, read, create, update, delete.

use crate::config::Pagination;
use crate::error::AppError;
use crate::response::{success, Created, Deleted, OneRecord, Records, Tables, Updated};
use crate::schema::{ColumnKind, TableInfo};
use crate::service::{Record, RecordValidator};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde_json::Value;
use std::collections::HashMap;

async fn resolve_table(state: &AppState, name: &str) -> Result<TableInfo, AppError> {
    state
        .backend
        .describe_table(name)
        .await?
        .ok_or_else(|| AppError::UnknownTable(name.to_string()))
}

/// Row id from the path, typed after the primary key column.
fn parse_id(table: &TableInfo, id_str: &str) -> Result<Value, AppError> {
    let pk = table.primary_column().ok_or(AppError::RecordNotFound)?;
    Ok(match pk.kind {
        ColumnKind::Integer => {
            let n: i64 = id_str
                .parse()
                .map_err(|_| AppError::Parse(format!("invalid id '{}'", id_str)))?;
            Value::Number(n.into())
        }
        _ => Value::String(id_str.to_string()),
    })
}

/// `limit` and `offset` from the query string; limit is clamped to the configured maximum.
pub fn parse_page(params: &HashMap<String, String>, pagination: Pagination) -> Result<(u32, u32), AppError> {
    let parse = |key: &str, default: u32| -> Result<u32, AppError> {
        match params.get(key).map(|s| s.trim()).filter(|s| !s.is_empty()) {
            None => Ok(default),
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::Parse(format!("invalid {} '{}'", key, raw))),
        }
    };
    let limit = parse("limit", pagination.default_limit)?.min(pagination.max_limit);
    let offset = parse("offset", 0)?;
    Ok((limit, offset))
}

fn body_to_record(body: &[u8]) -> Result<Record, AppError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| AppError::Parse(format!("body: {}", e)))?;
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::Parse("body must be a JSON object".into())),
    }
}

pub async fn list_tables(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let tables = state.backend.table_names().await?;
    Ok(success(Tables { tables }))
}

pub async fn list_rows(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let table = resolve_table(&state, &table_name).await?;
    let (limit, offset) = parse_page(&params, state.pagination)?;
    let records = state.backend.list_rows(&table, limit, offset).await?;
    Ok(success(Records { records }))
}

pub async fn read_row(
    State(state): State<AppState>,
    Path((table_name, id_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let table = resolve_table(&state, &table_name).await?;
    let id = parse_id(&table, &id_str)?;
    let record = state
        .backend
        .fetch_row(&table, &id)
        .await?
        .ok_or(AppError::RecordNotFound)?;
    Ok(success(OneRecord { record }))
}

pub async fn create_row(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let table = resolve_table(&state, &table_name).await?;
    let body = body_to_record(&body)?;
    let fields = RecordValidator::for_create(&table, body)?;
    let id = state.backend.insert_row(&table, &fields).await?;
    tracing::debug!(table = %table.name, id = %id, "row created");
    Ok(success(Created { id }))
}

pub async fn update_row(
    State(state): State<AppState>,
    Path((table_name, id_str)): Path<(String, String)>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let table = resolve_table(&state, &table_name).await?;
    let id = parse_id(&table, &id_str)?;
    let body = body_to_record(&body)?;
    let fields = RecordValidator::for_update(&table, body)?;
    let updated = state.backend.update_row(&table, &id, &fields).await?;
    Ok(success(Updated { updated }))
}

pub async fn delete_row(
    State(state): State<AppState>,
    Path((table_name, id_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let table = resolve_table(&state, &table_name).await?;
    let id = parse_id(&table, &id_str)?;
    let deleted = state.backend.delete_row(&table, &id).await?;
    Ok(success(Deleted { deleted }))
}

pub async fn unknown_route() -> impl IntoResponse {
    (
        axum::http::StatusCode::NOT_FOUND,
        axum::Json(crate::error::ErrorBody {
            error: "unknown route".into(),
        }),
    )
}
