//! SQLite implementations of the core ports.
//!
//! Each call acquires its own connection from the pool; nothing is cached
//! between calls. Audit writes run in their own transaction so they never
//! share fate with lookup reads.

use crate::error::PersistenceError;
use crate::sqlite::{AuditLogRepo, CostProfileRepo, CustomerRepo};
use async_trait::async_trait;
use sqlx::SqlitePool;
use txcost_core::{
    AuditRecord, AuditStore, CostProfile, CostProfileStore, Customer, CustomerDirectory,
    StoreResult,
};

/// Customer and cost profile lookups backed by SQLite.
#[derive(Debug, Clone)]
pub struct SqliteLookupStore {
    pool: SqlitePool,
}

impl SqliteLookupStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerDirectory for SqliteLookupStore {
    async fn find_customer_by_document(
        &self,
        document_type: &str,
        document_number: &str,
    ) -> StoreResult<Option<Customer>> {
        let row = CustomerRepo::find_by_document(&self.pool, document_type, document_number).await?;
        Ok(row.map(Customer::from))
    }
}

#[async_trait]
impl CostProfileStore for SqliteLookupStore {
    async fn find_cost_profile(
        &self,
        customer_id: &str,
        transaction_code: &str,
    ) -> StoreResult<Option<CostProfile>> {
        let row = CostProfileRepo::find(&self.pool, customer_id, transaction_code).await?;
        Ok(row.map(CostProfile::from))
    }
}

/// Append-only audit writer backed by SQLite.
#[derive(Debug, Clone)]
pub struct SqliteAuditStore {
    pool: SqlitePool,
}

impl SqliteAuditStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn write(&self, record: &AuditRecord) -> Result<i64, PersistenceError> {
        let mut tx = self.pool.begin().await?;
        let id = AuditLogRepo::insert(&mut tx, record).await?;
        tx.commit().await?;
        Ok(id)
    }
}

#[async_trait]
impl AuditStore for SqliteAuditStore {
    async fn persist_audit_record(&self, record: &AuditRecord) -> StoreResult<()> {
        let id = self.write(record).await?;
        tracing::debug!(
            id,
            transaction_id = %record.transaction_id,
            checkpoint = %record.checkpoint_kind,
            "Audit record persisted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::{init_memory_database, seed_data};
    use chrono::Utc;
    use txcost_core::{CheckpointKind, StoreError};

    #[tokio::test]
    async fn test_lookup_store_ports() {
        let pool = init_memory_database().await.unwrap();
        seed_data(&pool).await.unwrap();
        let store = SqliteLookupStore::new(pool);

        let customer = store
            .find_customer_by_document("CED", "8-111-111")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(customer.customer_id, "12345");

        let profile = store
            .find_cost_profile(&customer.customer_id, "01PAR153")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.cost, 250);

        assert!(store.find_cost_profile("12345", "99XXX999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_audit_store_persists() {
        let pool = init_memory_database().await.unwrap();
        let store = SqliteAuditStore::new(pool.clone());

        let record = AuditRecord {
            transaction_id: "TXN1".to_string(),
            checkpoint_kind: CheckpointKind::Error,
            sequence: 2,
            customer_ref: Some("12345".to_string()),
            channel: "151".to_string(),
            actor: "SYSTEM".to_string(),
            timestamp: Utc::now(),
            payload: "{}".to_string(),
            payload_hash: None,
            status: CheckpointKind::Error.status(),
            error_detail: Some("boom".to_string()),
            origin: "TXCOST".to_string(),
            service: "TXCOST".to_string(),
            created_by: "TXCOST-SERVICE".to_string(),
        };
        store.persist_audit_record(&record).await.unwrap();

        let trail = AuditLogRepo::get_records(&pool, "TXN1").await.unwrap();
        assert_eq!(trail.len(), 1);
        assert!(trail[0].is_error());
        assert!(trail[0].hash_matches());
        assert_eq!(trail[0].customer_ref.as_deref(), Some("12345"));
        assert_eq!(trail[0].sequence, 2);
    }

    #[tokio::test]
    async fn test_closed_pool_is_unavailable() {
        let pool = init_memory_database().await.unwrap();
        pool.close().await;
        let store = SqliteLookupStore::new(pool);

        let err = store
            .find_customer_by_document("CED", "8-111-111")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
