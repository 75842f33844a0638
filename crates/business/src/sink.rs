//! # Audit Sink
//!
//! Fire-and-forget delivery of audit records.
//!
//! Each submitted record gets its own detached tokio task. The task makes
//! up to `max_attempts` persist calls, sleeping `base_delay_ms * attempt`
//! after each failure, then logs and discards the record. Nothing a task
//! does is observable by the submitter unless it awaits the returned
//! handle.

use crate::config::AuditSinkConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use txcost_core::{AuditRecord, AuditStore, StoreError};

/// Final state of one audit record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Stored on attempt `attempts`
    Persisted { attempts: u32 },
    /// Every attempt failed; `error` is the last failure
    Dropped { attempts: u32, error: StoreError },
}

impl DeliveryOutcome {
    pub fn is_persisted(&self) -> bool {
        matches!(self, DeliveryOutcome::Persisted { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            DeliveryOutcome::Persisted { attempts } | DeliveryOutcome::Dropped { attempts, .. } => {
                *attempts
            }
        }
    }
}

#[derive(Debug, Default)]
struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

/// Decrements the in-flight count when the task ends, even on panic.
struct InFlightGuard(Arc<InFlight>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.0.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

/// Asynchronous, retrying writer in front of an [`AuditStore`].
#[derive(Clone)]
pub struct AuditSink {
    store: Arc<dyn AuditStore>,
    config: AuditSinkConfig,
    in_flight: Arc<InFlight>,
}

impl AuditSink {
    pub fn new(store: Arc<dyn AuditStore>, config: AuditSinkConfig) -> Self {
        Self {
            store,
            config,
            in_flight: Arc::new(InFlight::default()),
        }
    }

    pub fn config(&self) -> &AuditSinkConfig {
        &self.config
    }

    /// Hand a record over for delivery and return immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, record: AuditRecord) -> JoinHandle<DeliveryOutcome> {
        self.in_flight.count.fetch_add(1, Ordering::AcqRel);
        let guard = InFlightGuard(Arc::clone(&self.in_flight));
        let store = Arc::clone(&self.store);
        let config = self.config;

        tokio::spawn(async move {
            let _guard = guard;
            deliver(store.as_ref(), config, record).await
        })
    }

    /// Number of records not yet persisted or dropped
    pub fn pending(&self) -> usize {
        self.in_flight.count.load(Ordering::Acquire)
    }

    /// Wait until every submitted record has been persisted or dropped.
    pub async fn drain(&self) {
        loop {
            // Registered before the check so a concurrent notify is not lost
            let idle = self.in_flight.idle.notified();
            if self.pending() == 0 {
                return;
            }
            idle.await;
        }
    }
}

impl std::fmt::Debug for AuditSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditSink")
            .field("config", &self.config)
            .field("pending", &self.pending())
            .finish()
    }
}

async fn deliver(
    store: &dyn AuditStore,
    config: AuditSinkConfig,
    mut record: AuditRecord,
) -> DeliveryOutcome {
    if record.ensure_payload_hash() {
        tracing::debug!(
            transaction_id = %record.transaction_id,
            checkpoint = %record.checkpoint_kind,
            "Payload hash computed by sink"
        );
    }

    let max_attempts = config.attempts();
    let mut attempt = 1;
    loop {
        match store.persist_audit_record(&record).await {
            Ok(()) => return DeliveryOutcome::Persisted { attempts: attempt },
            Err(error) if attempt < max_attempts => {
                let delay = config.delay_after(attempt);
                tracing::warn!(
                    transaction_id = %record.transaction_id,
                    checkpoint = %record.checkpoint_kind,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Audit persist failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => {
                tracing::error!(
                    transaction_id = %record.transaction_id,
                    checkpoint = %record.checkpoint_kind,
                    sequence = record.sequence,
                    attempts = attempt,
                    error = %error,
                    "Audit record dropped after exhausting retries"
                );
                return DeliveryOutcome::Dropped {
                    attempts: attempt,
                    error,
                };
            }
        }
    }
}
