//! Database backends and request validation.

mod backend;
mod postgres;
mod validation;
pub use backend::{Backend, Record};
pub use postgres::PgBackend;
pub use validation::RecordValidator;
