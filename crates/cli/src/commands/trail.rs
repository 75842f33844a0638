//! Audit trail inspection

use anyhow::Result;
use std::path::Path;
use txcost_persistence::AuditLogRepo;

use crate::db;

/// First 16 characters of a stored hash
fn short_hash(hash: &str) -> &str {
    match hash.char_indices().nth(16) {
        Some((end, _)) => &hash[..end],
        None => hash,
    }
}

/// Print the audit trail of one transaction
pub async fn show(db_path: &Path, transaction_id: &str, verify: bool, json: bool) -> Result<()> {
    let db = db::connect(db_path).await?;
    let records = AuditLogRepo::get_records(db.pool(), transaction_id).await?;

    if records.is_empty() {
        println!("No audit records for transaction {}", transaction_id);
        db.pool().close().await;
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        println!("🧾 Audit trail: {}", transaction_id);
        println!(
            "{:<4} {:<15} {:<6} {:<10} {:<25} {}",
            "#", "CHECKPOINT", "STATUS", "CUSTOMER", "TIMESTAMP", "HASH"
        );
        for record in &records {
            let hash = record.payload_hash.as_deref().unwrap_or("-");
            println!(
                "{:<4} {:<15} {:<6} {:<10} {:<25} {}",
                record.sequence,
                record.checkpoint_kind.as_str(),
                record.status.as_str(),
                record.customer_ref.as_deref().unwrap_or("-"),
                record.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
                short_hash(hash)
            );
            if let Some(detail) = &record.error_detail {
                println!("     └─ {}", detail);
            }
        }
    }

    if verify {
        let report = AuditLogRepo::verify_trail(db.pool(), transaction_id).await?;
        if report.is_intact() {
            println!("🔒 {} records verified, all hashes match", report.total);
        } else {
            println!(
                "⚠️  {} of {} records have mismatched hashes: {:?}",
                report.mismatched.len(),
                report.total,
                report.mismatched
            );
        }
    }

    db.pool().close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_short_hash() {
        let hex = txcost_core::payload_hash("{}");
        assert_eq!(short_hash(&hex), &hex[..16]);
        assert_eq!(short_hash("abc"), "abc");
        assert_eq!(short_hash(&"ñ".repeat(20)), "ñ".repeat(16));
    }

    #[tokio::test]
    async fn test_show_non_ascii_hash() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("txcost.db");
        db::init_database(&path, false).await.unwrap();

        let db = db::connect(&path).await.unwrap();
        sqlx::query(
            r#"
            INSERT INTO audit_logs (
                transaction_id, checkpoint_kind, sequence, channel, actor, ts,
                payload, payload_hash, status, origin, service, created_by
            ) VALUES ('TXN1', 'ENTRY', 1, '81', 'SYSTEM', '2026-10-19T12:00:00Z',
                      '{}', ?, 'OK', 'TXCOST', 'TXCOST', 'TXCOST-SERVICE')
            "#,
        )
        .bind("ñ".repeat(20))
        .execute(db.pool())
        .await
        .unwrap();
        db.pool().close().await;

        show(&path, "TXN1", true, false).await.unwrap();
        show(&path, "TXN1", false, true).await.unwrap();
    }
}
