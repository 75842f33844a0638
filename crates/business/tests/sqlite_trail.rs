//! Lookup against the SQLite collaborators, trail read back from audit_logs

use std::sync::Arc;
use txcost_business::{CostLookupService, ServiceConfig};
use txcost_core::{CheckpointKind, CostLookupRequest, HomologationCatalog, LookupHeaders};
use txcost_persistence::{AuditLogRepo, Database};

fn service(db: &Database) -> CostLookupService {
    let lookups = Arc::new(db.lookup_store());
    CostLookupService::new(
        Arc::new(HomologationCatalog::standard()),
        lookups.clone(),
        lookups,
        Arc::new(db.audit_store()),
        ServiceConfig::default(),
    )
}

#[tokio::test]
async fn test_sqlite_success_trail() {
    let db = Database::in_memory().await.unwrap();
    db.seed().await.unwrap();
    let service = service(&db);

    let headers = LookupHeaders::new("TXN-SQL-1", 81, "testuser");
    let request = CostLookupRequest::new("CED", "8-111-111", "PA", "COBPER");
    let response = service.lookup_transaction_cost(&headers, &request).await.unwrap();
    assert_eq!(response.cost, 500);
    assert_eq!(response.currency_code, "USD");

    service.audit_sink().drain().await;

    let trail = AuditLogRepo::get_records(db.pool(), "TXN-SQL-1").await.unwrap();
    assert_eq!(trail.len(), 6);
    assert_eq!(trail[0].checkpoint_kind, CheckpointKind::Entry);
    assert_eq!(trail[5].checkpoint_kind, CheckpointKind::Exit);
    assert!(trail.iter().map(|r| r.sequence).eq(1..=6));
    assert!(trail.iter().all(|r| r.origin == "TXCOST" && r.actor == "SYSTEM"));

    let report = AuditLogRepo::verify_trail(db.pool(), "TXN-SQL-1").await.unwrap();
    assert!(report.is_intact());
    assert_eq!(report.total, 6);
}

#[tokio::test]
async fn test_sqlite_unknown_customer_trail() {
    let db = Database::in_memory().await.unwrap();
    db.seed().await.unwrap();
    let service = service(&db);

    let headers = LookupHeaders::new("TXN-SQL-2", 151, "testuser");
    let request = CostLookupRequest::new("CED", "0-000-000", "CR", "TRCPRO");
    let err = service.lookup_transaction_cost(&headers, &request).await.unwrap_err();
    assert!(err.is_not_found());

    service.audit_sink().drain().await;
    assert_eq!(
        AuditLogRepo::count_by_transaction(db.pool(), "TXN-SQL-2").await.unwrap(),
        3
    );
}
