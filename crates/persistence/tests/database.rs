//! File-backed database integration tests

use chrono::Utc;
use tempfile::TempDir;
use txcost_core::{AuditRecord, AuditStore, CheckpointKind, CustomerDirectory};
use txcost_persistence::{AuditLogRepo, Database};

fn db_url(dir: &TempDir) -> String {
    format!("sqlite:{}", dir.path().join("txcost.db").display())
}

fn exit_record(tx_id: &str) -> AuditRecord {
    AuditRecord {
        transaction_id: tx_id.to_string(),
        checkpoint_kind: CheckpointKind::Exit,
        sequence: 6,
        customer_ref: Some("12345".to_string()),
        channel: "81".to_string(),
        actor: "SYSTEM".to_string(),
        timestamp: Utc::now(),
        payload: r#"{"movementTimestamp":"2026-01-01T00:00:00-06:00","currencyCode":"USD","cost":500}"#
            .to_string(),
        payload_hash: None,
        status: CheckpointKind::Exit.status(),
        error_detail: None,
        origin: "TXCOST".to_string(),
        service: "TXCOST".to_string(),
        created_by: "TXCOST-SERVICE".to_string(),
    }
}

#[tokio::test]
async fn test_init_is_idempotent_and_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let url = db_url(&dir);

    let db = Database::init(&url).await.unwrap();
    db.seed().await.unwrap();
    db.audit_store()
        .persist_audit_record(&exit_record("TXN1"))
        .await
        .unwrap();
    db.pool().close().await;

    // Second init keeps existing rows
    let db = Database::init(&url).await.unwrap();
    db.seed().await.unwrap();
    assert_eq!(AuditLogRepo::count(db.pool()).await.unwrap(), 1);
    db.pool().close().await;

    let db = Database::connect(&url).await.unwrap();
    let customer = db
        .lookup_store()
        .find_customer_by_document("CED", "8-111-111")
        .await
        .unwrap();
    assert!(customer.is_some());

    let report = AuditLogRepo::verify_trail(db.pool(), "TXN1").await.unwrap();
    assert!(report.is_intact());
}

#[tokio::test]
async fn test_connect_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    assert!(Database::connect(&db_url(&dir)).await.is_err());
}
