//! Table and column model discovered from the live database.

pub mod introspect;
pub mod types;

pub use types::*;
