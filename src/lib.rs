//! db-explorer: a REST interface over any PostgreSQL schema, driven by
//! introspection instead of per-table code.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;

pub use config::{Pagination, Settings};
pub use error::{AppError, ConfigError};
pub use routes::{app, common_routes, explorer_routes};
pub use schema::{ColumnInfo, ColumnKind, TableInfo};
pub use service::{Backend, PgBackend, Record, RecordValidator};
pub use state::AppState;
