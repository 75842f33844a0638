//! # Audit Module
//!
//! Audit records emitted at each checkpoint of a cost lookup.
//! Records are write-once: created by the emitter, persisted by the sink,
//! never updated.

use crate::hash::{payload_hash, verify_payload_hash};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Checkpoint at which a record was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckpointKind {
    /// Request received (headers + body)
    Entry,
    /// Query about to be sent to a lookup collaborator
    OutboundQuery,
    /// Result returned by a lookup collaborator
    InboundResult,
    /// Response returned to the caller
    Exit,
    /// Failure, emitted once before the error is returned
    Error,
}

impl CheckpointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckpointKind::Entry => "ENTRY",
            CheckpointKind::OutboundQuery => "OUTBOUND_QUERY",
            CheckpointKind::InboundResult => "INBOUND_RESULT",
            CheckpointKind::Exit => "EXIT",
            CheckpointKind::Error => "ERROR",
        }
    }

    /// Status implied by the checkpoint
    pub fn status(&self) -> AuditStatus {
        match self {
            CheckpointKind::Error => AuditStatus::Error,
            _ => AuditStatus::Ok,
        }
    }
}

impl fmt::Display for CheckpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CheckpointKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ENTRY" => Ok(CheckpointKind::Entry),
            "OUTBOUND_QUERY" => Ok(CheckpointKind::OutboundQuery),
            "INBOUND_RESULT" => Ok(CheckpointKind::InboundResult),
            "EXIT" => Ok(CheckpointKind::Exit),
            "ERROR" => Ok(CheckpointKind::Error),
            other => Err(format!("unknown checkpoint kind: {}", other)),
        }
    }
}

/// Outcome recorded on an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Ok,
    Error,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Ok => "OK",
            AuditStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(AuditStatus::Ok),
            "ERROR" => Ok(AuditStatus::Error),
            other => Err(format!("unknown audit status: {}", other)),
        }
    }
}

/// One audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Correlates all records of one request
    pub transaction_id: String,
    pub checkpoint_kind: CheckpointKind,
    /// Position within the trail, starting at 1
    pub sequence: u32,
    /// Resolved customer; None until the customer lookup succeeds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_ref: Option<String>,
    pub channel: String,
    pub actor: String,
    pub timestamp: DateTime<Utc>,
    /// Serialized subject (JSON)
    pub payload: String,
    /// SHA-256 of `payload`; None only when the producer skipped it
    pub payload_hash: Option<String>,
    pub status: AuditStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,

    // === Provenance ===
    pub origin: String,
    pub service: String,
    pub created_by: String,
}

impl AuditRecord {
    /// Fill in `payload_hash` if the producer did not compute it.
    ///
    /// Returns true when a hash was computed.
    pub fn ensure_payload_hash(&mut self) -> bool {
        if self.payload_hash.is_some() {
            return false;
        }
        self.payload_hash = Some(payload_hash(&self.payload));
        true
    }

    /// True if the stored hash matches the stored payload
    pub fn hash_matches(&self) -> bool {
        self.payload_hash
            .as_deref()
            .is_some_and(|h| verify_payload_hash(&self.payload, h))
    }

    pub fn is_error(&self) -> bool {
        self.status == AuditStatus::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(payload: &str, hash: Option<String>) -> AuditRecord {
        AuditRecord {
            transaction_id: "TXN1".to_string(),
            checkpoint_kind: CheckpointKind::Entry,
            sequence: 1,
            customer_ref: None,
            channel: "81".to_string(),
            actor: "SYSTEM".to_string(),
            timestamp: Utc::now(),
            payload: payload.to_string(),
            payload_hash: hash,
            status: AuditStatus::Ok,
            error_detail: None,
            origin: "TXCOST".to_string(),
            service: "TXCOST".to_string(),
            created_by: "TXCOST-SERVICE".to_string(),
        }
    }

    #[test]
    fn test_checkpoint_status() {
        assert_eq!(CheckpointKind::Error.status(), AuditStatus::Error);
        assert_eq!(CheckpointKind::Exit.status(), AuditStatus::Ok);
        assert_eq!(CheckpointKind::OutboundQuery.status(), AuditStatus::Ok);
    }

    #[test]
    fn test_checkpoint_round_trip_str() {
        for kind in [
            CheckpointKind::Entry,
            CheckpointKind::OutboundQuery,
            CheckpointKind::InboundResult,
            CheckpointKind::Exit,
            CheckpointKind::Error,
        ] {
            assert_eq!(kind.as_str().parse::<CheckpointKind>().unwrap(), kind);
        }
        assert!("TRAMA_IN".parse::<CheckpointKind>().is_err());
    }

    #[test]
    fn test_checkpoint_serde_name() {
        let json = serde_json::to_string(&CheckpointKind::InboundResult).unwrap();
        assert_eq!(json, "\"INBOUND_RESULT\"");
    }

    #[test]
    fn test_ensure_payload_hash() {
        let mut rec = record("{}", None);
        assert!(rec.ensure_payload_hash());
        assert_eq!(rec.payload_hash.as_deref(), Some(payload_hash("{}").as_str()));

        // Precomputed hash is left untouched
        let mut rec = record("{}", Some("precomputed".to_string()));
        assert!(!rec.ensure_payload_hash());
        assert_eq!(rec.payload_hash.as_deref(), Some("precomputed"));
    }

    #[test]
    fn test_hash_matches() {
        let rec = record("{\"a\":1}", Some(payload_hash("{\"a\":1}")));
        assert!(rec.hash_matches());

        let tampered = AuditRecord {
            payload: "{\"a\":2}".to_string(),
            ..rec
        };
        assert!(!tampered.hash_matches());
        assert!(!record("{}", None).hash_matches());
    }
}
