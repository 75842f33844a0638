//! # Txcost Business
//!
//! Business logic layer - cost lookup orchestration and the audit trail.
//!
//! - [`lookup`]: the `lookupTransactionCost` state machine
//! - [`emitter`]: builds audit records from checkpoint subjects
//! - [`sink`]: detached, retrying audit delivery
//! - [`config`]: service and retry configuration

pub mod config;
pub mod emitter;
pub mod lookup;
pub mod sink;

pub use config::{AuditSinkConfig, ServiceConfig};
pub use emitter::{AuditEmitter, TrailContext};
pub use lookup::{CostLookupService, LookupStage};
pub use sink::{AuditSink, DeliveryOutcome};
