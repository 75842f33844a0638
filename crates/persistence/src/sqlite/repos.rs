//! Repository implementations cho SQLite
//!
//! Read access cho customers/cost_profiles, append-only access cho audit_logs.

use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::schema::*;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use txcost_core::{payload_hash, verify_payload_hash, AuditRecord};

// ============================================================================
// Customer Repository
// ============================================================================

/// Repository cho customers table
pub struct CustomerRepo;

impl CustomerRepo {
    /// Lấy customer theo loại và số giấy tờ
    pub async fn find_by_document(
        pool: &SqlitePool,
        document_type: &str,
        document_number: &str,
    ) -> PersistenceResult<Option<CustomerRow>> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT * FROM customers WHERE identification_type = ? AND identification_number = ?",
        )
        .bind(document_type)
        .bind(document_number)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }
}

// ============================================================================
// Cost Profile Repository
// ============================================================================

/// Repository cho cost_profiles table
pub struct CostProfileRepo;

impl CostProfileRepo {
    /// Lấy cost profile theo customer và transaction code nội bộ
    pub async fn find(
        pool: &SqlitePool,
        customer_id: &str,
        transaction_code: &str,
    ) -> PersistenceResult<Option<CostProfileRow>> {
        let row = sqlx::query_as::<_, CostProfileRow>(
            "SELECT * FROM cost_profiles WHERE customer_id = ? AND transaction_code = ?",
        )
        .bind(customer_id)
        .bind(transaction_code)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }
}

// ============================================================================
// Audit Log Repository
// ============================================================================

/// Kết quả kiểm tra hash của một audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrailVerification {
    pub transaction_id: String,
    pub total: usize,
    /// Row ids có payload_hash không khớp payload
    pub mismatched: Vec<i64>,
}

impl TrailVerification {
    pub fn is_intact(&self) -> bool {
        self.mismatched.is_empty()
    }
}

/// Repository cho audit_logs table (append-only)
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Ghi audit record trong transaction được truyền vào
    ///
    /// Hash được tính ở đây nếu producer chưa tính.
    pub async fn insert(
        tx: &mut Transaction<'_, Sqlite>,
        record: &AuditRecord,
    ) -> PersistenceResult<i64> {
        let hash = record
            .payload_hash
            .clone()
            .unwrap_or_else(|| payload_hash(&record.payload));

        let result = sqlx::query(
            r#"
            INSERT INTO audit_logs (
                transaction_id, checkpoint_kind, sequence, customer_ref, channel, actor, ts,
                payload, payload_hash, status, error_detail, origin, service, created_by
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.transaction_id)
        .bind(record.checkpoint_kind.as_str())
        .bind(i64::from(record.sequence))
        .bind(&record.customer_ref)
        .bind(&record.channel)
        .bind(&record.actor)
        .bind(record.timestamp)
        .bind(&record.payload)
        .bind(&hash)
        .bind(record.status.as_str())
        .bind(&record.error_detail)
        .bind(&record.origin)
        .bind(&record.service)
        .bind(&record.created_by)
        .execute(&mut **tx)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Lấy audit trail của một transaction, theo sequence của producer
    ///
    /// Thứ tự ghi và timestamp không phản ánh thứ tự phát sinh.
    pub async fn get_by_transaction(
        pool: &SqlitePool,
        transaction_id: &str,
    ) -> PersistenceResult<Vec<AuditLogRow>> {
        let rows = sqlx::query_as::<_, AuditLogRow>(
            r#"
            SELECT id, transaction_id, checkpoint_kind, sequence, customer_ref, channel, actor, ts,
                   payload, payload_hash, status, error_detail, origin, service, created_by
            FROM audit_logs
            WHERE transaction_id = ?
            ORDER BY sequence ASC, id ASC
            "#,
        )
        .bind(transaction_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Lấy audit trail dưới dạng domain records
    pub async fn get_records(
        pool: &SqlitePool,
        transaction_id: &str,
    ) -> PersistenceResult<Vec<AuditRecord>> {
        Self::get_by_transaction(pool, transaction_id)
            .await?
            .into_iter()
            .map(AuditRecord::try_from)
            .collect()
    }

    /// Đếm số audit records của transaction
    pub async fn count_by_transaction(
        pool: &SqlitePool,
        transaction_id: &str,
    ) -> PersistenceResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM audit_logs WHERE transaction_id = ?")
                .bind(transaction_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Đếm tất cả audit records
    pub async fn count(pool: &SqlitePool) -> PersistenceResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM audit_logs")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Tính lại hash của từng record và so với hash đã lưu
    pub async fn verify_trail(
        pool: &SqlitePool,
        transaction_id: &str,
    ) -> PersistenceResult<TrailVerification> {
        let rows = Self::get_by_transaction(pool, transaction_id).await?;
        if rows.is_empty() {
            return Err(PersistenceError::not_found("AuditTrail", transaction_id));
        }

        let mismatched = rows
            .iter()
            .filter(|row| !verify_payload_hash(&row.payload, &row.payload_hash))
            .map(|row| row.id)
            .collect();

        Ok(TrailVerification {
            transaction_id: transaction_id.to_string(),
            total: rows.len(),
            mismatched,
        })
    }
}

// ============================================================================
// Database Initialization
// ============================================================================

/// Tạo connection pool
pub async fn create_pool(database_url: &str) -> PersistenceResult<SqlitePool> {
    let pool = SqlitePool::connect(database_url).await?;
    Ok(pool)
}

/// Tạo bảng nếu chưa có
pub async fn create_schema(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::query(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}

/// Nạp dữ liệu demo (idempotent)
pub async fn seed_data(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::query(SEED_SQL).execute(pool).await?;
    Ok(())
}

/// Tạo database mới với schema
pub async fn init_database(database_url: &str) -> PersistenceResult<SqlitePool> {
    // Tạo file nếu chưa có
    let pool = SqlitePool::connect_with(
        database_url
            .parse::<SqliteConnectOptions>()?
            .create_if_missing(true),
    )
    .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// In-memory database với schema, dùng một connection duy nhất
pub async fn init_memory_database() -> PersistenceResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}
