//! Response envelope: every success body is `{"response": {...}}`.

use crate::service::Record;
use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct Envelope<T> {
    pub response: T,
}

#[derive(Serialize)]
pub struct Tables {
    pub tables: Vec<String>,
}

#[derive(Serialize)]
pub struct Records {
    pub records: Vec<Record>,
}

#[derive(Serialize)]
pub struct OneRecord {
    pub record: Record,
}

#[derive(Serialize)]
pub struct Created {
    pub id: Value,
}

#[derive(Serialize)]
pub struct Updated {
    pub updated: u64,
}

#[derive(Serialize)]
pub struct Deleted {
    pub deleted: u64,
}

pub fn success<T: Serialize>(response: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::OK, Json(Envelope { response }))
}
