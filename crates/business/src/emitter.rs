//! # Audit Emitter
//!
//! Turns a checkpoint subject into an [`AuditRecord`] and hands it to the
//! [`AuditSink`]. Serialization never fails from the caller's point of
//! view: an unserializable subject is replaced by a payload describing
//! the failure.

use crate::config::ServiceConfig;
use crate::sink::{AuditSink, DeliveryOutcome};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use txcost_core::{payload_hash, AuditRecord, CheckpointKind, LookupError, LookupHeaders};

/// Value recorded in the `context` field of ERROR payloads
pub const ERROR_CONTEXT: &str = "lookupTransactionCost";

/// Per-request values copied onto every record of one trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailContext {
    pub transaction_id: String,
    pub channel: String,
    pub actor: String,
    customer_ref: Option<String>,
    emitted: u32,
}

impl TrailContext {
    pub fn new(headers: &LookupHeaders, actor: &str) -> Self {
        Self {
            transaction_id: headers.transaction_id.clone(),
            channel: headers.channel.to_string(),
            actor: actor.to_string(),
            customer_ref: None,
            emitted: 0,
        }
    }

    /// Sequence number of the next record.
    fn next_sequence(&mut self) -> u32 {
        self.emitted += 1;
        self.emitted
    }

    /// Number of records built so far
    pub fn emitted(&self) -> u32 {
        self.emitted
    }

    /// Attach the resolved customer to all later checkpoints.
    pub fn resolve_customer(&mut self, customer_id: &str) {
        self.customer_ref = Some(customer_id.to_string());
    }

    pub fn customer_ref(&self) -> Option<&str> {
        self.customer_ref.as_deref()
    }
}

#[derive(Serialize)]
struct ErrorPayload<'a> {
    context: &'static str,
    category: &'static str,
    kind: &'static str,
    message: &'a str,
}

/// Serialize a checkpoint subject. `null` becomes `{}`.
pub fn serialize_payload<S: Serialize + ?Sized>(subject: &S) -> String {
    match serde_json::to_string(subject) {
        Ok(json) if json == "null" => "{}".to_string(),
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(error = %e, "Audit payload serialization failed");
            serde_json::json!({ "error": format!("Failed to serialize: {}", e) }).to_string()
        }
    }
}

/// Builds audit records and submits them to the sink.
#[derive(Debug, Clone)]
pub struct AuditEmitter {
    config: Arc<ServiceConfig>,
    sink: AuditSink,
}

impl AuditEmitter {
    pub fn new(config: Arc<ServiceConfig>, sink: AuditSink) -> Self {
        Self { config, sink }
    }

    pub fn sink(&self) -> &AuditSink {
        &self.sink
    }

    /// Build the next record of `trail` without submitting it.
    pub fn build<S: Serialize + ?Sized>(
        &self,
        trail: &mut TrailContext,
        kind: CheckpointKind,
        subject: &S,
        error_detail: Option<String>,
    ) -> AuditRecord {
        let payload = serialize_payload(subject);
        let hash = payload_hash(&payload);

        AuditRecord {
            transaction_id: trail.transaction_id.clone(),
            checkpoint_kind: kind,
            sequence: trail.next_sequence(),
            customer_ref: trail.customer_ref.clone(),
            channel: trail.channel.clone(),
            actor: trail.actor.clone(),
            timestamp: Utc::now(),
            payload,
            payload_hash: Some(hash),
            status: kind.status(),
            error_detail,
            origin: self.config.service_name.clone(),
            service: self.config.service_name.clone(),
            created_by: self.config.created_by.clone(),
        }
    }

    /// Emit a non-error checkpoint.
    pub fn emit<S: Serialize + ?Sized>(
        &self,
        trail: &mut TrailContext,
        kind: CheckpointKind,
        subject: &S,
    ) -> JoinHandle<DeliveryOutcome> {
        let record = self.build(trail, kind, subject, None);
        tracing::debug!(
            transaction_id = %record.transaction_id,
            checkpoint = %kind,
            sequence = record.sequence,
            "Audit checkpoint emitted"
        );
        self.sink.submit(record)
    }

    /// Emit the ERROR checkpoint for `error`.
    pub fn emit_error(&self, trail: &mut TrailContext, error: &LookupError) -> JoinHandle<DeliveryOutcome> {
        let message = error.to_string();
        let subject = ErrorPayload {
            context: ERROR_CONTEXT,
            category: error.category().as_str(),
            kind: error.kind(),
            message: &message,
        };
        let record = self.build(trail, CheckpointKind::Error, &subject, Some(message.clone()));
        tracing::debug!(
            transaction_id = %record.transaction_id,
            category = %error.category(),
            "Audit error checkpoint emitted"
        );
        self.sink.submit(record)
    }
}
