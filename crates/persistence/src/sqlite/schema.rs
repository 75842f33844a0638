//! Database schema definitions
//!
//! Row types cho sqlx mapping từ SQLite tables, cùng DDL và seed data.

use crate::error::{PersistenceError, PersistenceResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use txcost_core::{AuditRecord, AuditStatus, CheckpointKind, CostProfile, Customer};

/// DDL cho tất cả tables
pub const SCHEMA_SQL: &str = r#"
-- Customer master
CREATE TABLE IF NOT EXISTS customers (
    customer_id TEXT PRIMARY KEY,
    identification_type TEXT NOT NULL,
    identification_number TEXT NOT NULL,
    UNIQUE(identification_type, identification_number)
);

-- Cost profile per customer and internal transaction code
CREATE TABLE IF NOT EXISTS cost_profiles (
    transaction_code TEXT NOT NULL,
    customer_id TEXT NOT NULL,
    cost INTEGER NOT NULL,
    currency_code TEXT NOT NULL,
    PRIMARY KEY (customer_id, transaction_code),
    FOREIGN KEY (customer_id) REFERENCES customers(customer_id)
);

-- Append-only audit trail
CREATE TABLE IF NOT EXISTS audit_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    transaction_id TEXT NOT NULL,
    checkpoint_kind TEXT NOT NULL,
    sequence INTEGER NOT NULL,
    customer_ref TEXT,
    channel TEXT NOT NULL,
    actor TEXT NOT NULL,
    ts DATETIME NOT NULL,
    payload TEXT NOT NULL,
    payload_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    error_detail TEXT,
    origin TEXT NOT NULL,
    service TEXT NOT NULL,
    created_by TEXT NOT NULL,
    inserted_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_audit_logs_transaction ON audit_logs(transaction_id, sequence);
"#;

/// Demo data: customer 12345 (CED/8-111-111) với hai cost profiles
pub const SEED_SQL: &str = r#"
INSERT OR IGNORE INTO customers VALUES
    ('12345', 'CED', '8-111-111'),
    ('67890', 'PAS', 'PA-0042');

INSERT OR IGNORE INTO cost_profiles VALUES
    ('01PAR157', '12345', 500, 'USD'),
    ('01PAR153', '12345', 250, 'USD'),
    ('01PAR154', '67890', 1050, 'EUR');
"#;

/// Row type cho bảng `customers`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CustomerRow {
    pub customer_id: String,
    pub identification_type: String,
    pub identification_number: String,
}

/// Row type cho bảng `cost_profiles`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CostProfileRow {
    pub transaction_code: String,
    pub customer_id: String,
    pub cost: i64,
    pub currency_code: String,
}

/// Row type cho bảng `audit_logs`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AuditLogRow {
    pub id: i64,
    pub transaction_id: String,
    pub checkpoint_kind: String,
    pub sequence: i64,
    pub customer_ref: Option<String>,
    pub channel: String,
    pub actor: String,
    pub ts: DateTime<Utc>,
    pub payload: String,
    pub payload_hash: String,
    pub status: String,
    pub error_detail: Option<String>,
    pub origin: String,
    pub service: String,
    pub created_by: String,
}

// === Conversion implementations ===

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            customer_id: row.customer_id,
            identification_type: row.identification_type,
            identification_number: row.identification_number,
        }
    }
}

impl From<CostProfileRow> for CostProfile {
    fn from(row: CostProfileRow) -> Self {
        Self {
            transaction_code: row.transaction_code,
            customer_id: row.customer_id,
            cost: row.cost,
            currency_code: row.currency_code,
        }
    }
}

impl TryFrom<AuditLogRow> for AuditRecord {
    type Error = PersistenceError;

    fn try_from(row: AuditLogRow) -> PersistenceResult<Self> {
        let checkpoint_kind = row
            .checkpoint_kind
            .parse::<CheckpointKind>()
            .map_err(|_| PersistenceError::invalid_value("checkpoint_kind", &row.checkpoint_kind))?;
        let status = row
            .status
            .parse::<AuditStatus>()
            .map_err(|_| PersistenceError::invalid_value("status", &row.status))?;
        let sequence = u32::try_from(row.sequence)
            .map_err(|_| PersistenceError::invalid_value("sequence", &row.sequence.to_string()))?;

        Ok(Self {
            transaction_id: row.transaction_id,
            checkpoint_kind,
            sequence,
            customer_ref: row.customer_ref,
            channel: row.channel,
            actor: row.actor,
            timestamp: row.ts,
            payload: row.payload,
            payload_hash: Some(row.payload_hash),
            status,
            error_detail: row.error_detail,
            origin: row.origin,
            service: row.service,
            created_by: row.created_by,
        })
    }
}
