//! # Txcost Persistence
//!
//! Persistence layer cho Txcost - SQLite lookups + append-only audit log.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Database                               │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────────┐ │
//! │  │   Lookups   │    │  Audit log  │    │     Repos       │ │
//! │  │ (read-only) │    │  (append)   │    │   (queries)     │ │
//! │  └─────────────┘    └─────────────┘    └─────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use txcost_persistence::{AuditLogRepo, Database};
//!
//! let db = Database::init("sqlite:txcost.db").await?;
//! let lookups = db.lookup_store();
//! let audit = db.audit_store();
//!
//! let trail = AuditLogRepo::get_records(db.pool(), "TXN123456").await?;
//! ```

pub mod adapters;
pub mod error;
pub mod sqlite;

pub use adapters::{SqliteAuditStore, SqliteLookupStore};
pub use error::{PersistenceError, PersistenceResult};
pub use sqlite::schema::{AuditLogRow, CostProfileRow, CustomerRow};
pub use sqlite::{
    init_database, AuditLogRepo, CostProfileRepo, CustomerRepo, TrailVerification,
};

use sqlx::SqlitePool;

/// Database facade - unified access to lookups and the audit log
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open an existing database
    ///
    /// # Arguments
    /// * `db_url` - SQLite database URL (e.g., "sqlite:txcost.db")
    pub async fn connect(db_url: &str) -> PersistenceResult<Self> {
        let pool = sqlite::create_pool(db_url).await?;
        Ok(Self { pool })
    }

    /// Create the database file if needed and apply the schema
    pub async fn init(db_url: &str) -> PersistenceResult<Self> {
        let pool = init_database(db_url).await?;
        Ok(Self { pool })
    }

    /// Schema-only in-memory database
    pub async fn in_memory() -> PersistenceResult<Self> {
        let pool = sqlite::init_memory_database().await?;
        Ok(Self { pool })
    }

    /// Load demo customers and cost profiles
    pub async fn seed(&self) -> PersistenceResult<()> {
        sqlite::seed_data(&self.pool).await
    }

    /// Get SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Customer directory + cost profile store
    pub fn lookup_store(&self) -> SqliteLookupStore {
        SqliteLookupStore::new(self.pool.clone())
    }

    /// Audit store for the sink
    pub fn audit_store(&self) -> SqliteAuditStore {
        SqliteAuditStore::new(self.pool.clone())
    }
}
