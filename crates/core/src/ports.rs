//! Collaborator ports
//!
//! Narrow interfaces to the external lookups and the audit store.
//! Implementations live in the persistence layer; tests use in-memory fakes.

use crate::audit::AuditRecord;
use crate::error::StoreResult;
use crate::model::{CostProfile, Customer};
use async_trait::async_trait;

/// Customer master lookup
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// At most one customer for the given document
    async fn find_customer_by_document(
        &self,
        document_type: &str,
        document_number: &str,
    ) -> StoreResult<Option<Customer>>;
}

/// Cost profile lookup
#[async_trait]
pub trait CostProfileStore: Send + Sync {
    /// At most one profile for the customer and internal transaction code
    async fn find_cost_profile(
        &self,
        customer_id: &str,
        transaction_code: &str,
    ) -> StoreResult<Option<CostProfile>>;
}

/// Durable audit storage.
///
/// Each call must run in its own transaction, independent of any lookup.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn persist_audit_record(&self, record: &AuditRecord) -> StoreResult<()>;
}
