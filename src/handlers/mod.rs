//! HTTP handlers for table and row operations.

pub mod explorer;
pub use explorer::*;
