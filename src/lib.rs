//! Sparkify ETL Library
//!
//! Loads song catalog files and user activity logs into a SQLite star schema.

pub mod config;
pub mod error;
pub mod extract;
pub mod load;
pub mod resolve;
pub mod sqlite_persistence;
pub mod warehouse;

// Re-export commonly used types for convenience
pub use error::{EtlError, StoreError};
pub use load::{LoadCoordinator, RunReport};
pub use warehouse::{SqliteWarehouse, Warehouse};
