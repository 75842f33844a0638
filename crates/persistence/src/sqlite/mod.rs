//! SQLite persistence module
//!
//! Repository pattern cho SQLite database access.

pub mod repos;
pub mod schema;

pub use repos::{
    create_pool, create_schema, init_database, init_memory_database, seed_data, AuditLogRepo,
    CostProfileRepo, CustomerRepo, TrailVerification,
};
pub use schema::{AuditLogRow, CostProfileRow, CustomerRow};
