//! # Lookup Orchestrator
//!
//! `lookupTransactionCost`: validate, resolve the customer, resolve the
//! cost profile, respond. Every step is audited.
//!
//! ```text
//! START ──► VALIDATED ──► CUSTOMER_RESOLVED ──► COST_RESOLVED ──► DONE
//!   │           │                 │                   │
//!   └───────────┴─────────────────┴───────────────────┴──► ERROR
//! ```
//!
//! | Outcome                 | Checkpoints                                  |
//! |-------------------------|----------------------------------------------|
//! | validation failure      | ENTRY, ERROR                                 |
//! | customer not found      | ENTRY, OUTBOUND, ERROR                       |
//! | cost not found          | ENTRY, OUTBOUND, INBOUND, OUTBOUND, ERROR    |
//! | success                 | ENTRY, OUTBOUND, INBOUND, OUTBOUND, INBOUND, EXIT |

use crate::config::ServiceConfig;
use crate::emitter::{AuditEmitter, TrailContext};
use crate::sink::AuditSink;
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use txcost_core::{
    AuditStore, CheckpointKind, CostLookupRequest, CostLookupResponse, CostProfileStore,
    CustomerDirectory, HomologationCatalog, LookupError, LookupHeaders, LookupResult,
    ValidationPipeline,
};

/// Query name of the customer lookup
pub const CUSTOMER_QUERY_NAME: &str = "findCustomerByDocument";
/// Query name of the cost profile lookup
pub const COST_QUERY_NAME: &str = "findCostProfile";

const CUSTOMER_QUERY: &str =
    "customers WHERE identification_type = :documentType AND identification_number = :documentNumber";
const COST_QUERY: &str =
    "cost_profiles WHERE customer_id = :customerId AND transaction_code = :transactionCode";

/// Format of `movementTimestamp`
pub const MOVEMENT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// State of one lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStage {
    Start,
    Validated,
    CustomerResolved,
    CostResolved,
    Done,
    Error,
}

impl LookupStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupStage::Start => "START",
            LookupStage::Validated => "VALIDATED",
            LookupStage::CustomerResolved => "CUSTOMER_RESOLVED",
            LookupStage::CostResolved => "COST_RESOLVED",
            LookupStage::Done => "DONE",
            LookupStage::Error => "ERROR",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LookupStage::Done | LookupStage::Error)
    }
}

impl fmt::Display for LookupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// === Checkpoint subjects ===

#[derive(Serialize)]
struct EntryPayload<'a> {
    headers: &'a LookupHeaders,
    body: &'a CostLookupRequest,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutboundQuery<'a> {
    query_name: &'static str,
    query: &'static str,
    params: [&'a str; 2],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InboundResult<'a, T: Serialize> {
    query_name: &'static str,
    result: &'a T,
}

/// Cost lookup use case.
pub struct CostLookupService {
    pipeline: ValidationPipeline,
    customers: Arc<dyn CustomerDirectory>,
    costs: Arc<dyn CostProfileStore>,
    emitter: AuditEmitter,
    config: Arc<ServiceConfig>,
}

impl CostLookupService {
    pub fn new(
        catalog: Arc<HomologationCatalog>,
        customers: Arc<dyn CustomerDirectory>,
        costs: Arc<dyn CostProfileStore>,
        audit_store: Arc<dyn AuditStore>,
        config: ServiceConfig,
    ) -> Self {
        let config = Arc::new(config);
        let sink = AuditSink::new(audit_store, config.audit);
        Self {
            pipeline: ValidationPipeline::new(catalog),
            customers,
            costs,
            emitter: AuditEmitter::new(Arc::clone(&config), sink),
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The sink behind this service's audit trail
    pub fn audit_sink(&self) -> &AuditSink {
        self.emitter.sink()
    }

    /// Resolve the cost of a transaction for a customer.
    ///
    /// Returns as soon as the lookups finish; audit records are delivered in
    /// the background.
    pub async fn lookup_transaction_cost(
        &self,
        headers: &LookupHeaders,
        request: &CostLookupRequest,
    ) -> LookupResult<CostLookupResponse> {
        let mut trail = TrailContext::new(headers, &self.config.system_actor);
        let mut stage = LookupStage::Start;

        self.emitter.emit(
            &mut trail,
            CheckpointKind::Entry,
            &EntryPayload {
                headers,
                body: request,
            },
        );

        match self.advance(&mut trail, &mut stage, headers, request).await {
            Ok(response) => {
                tracing::info!(
                    transaction_id = %headers.transaction_id,
                    channel = headers.channel,
                    cost = response.cost,
                    currency = %response.currency_code,
                    "Transaction cost resolved"
                );
                Ok(response)
            }
            Err(error) => {
                tracing::warn!(
                    transaction_id = %headers.transaction_id,
                    from = %stage,
                    to = %LookupStage::Error,
                    category = %error.category(),
                    error = %error,
                    "Transaction cost lookup failed"
                );
                self.emitter.emit_error(&mut trail, &error);
                Err(error)
            }
        }
    }

    async fn advance(
        &self,
        trail: &mut TrailContext,
        stage: &mut LookupStage,
        headers: &LookupHeaders,
        request: &CostLookupRequest,
    ) -> LookupResult<CostLookupResponse> {
        // START -> VALIDATED
        let transaction_code = self.pipeline.run(headers, request)?;
        *stage = LookupStage::Validated;

        // VALIDATED -> CUSTOMER_RESOLVED
        let (document_type, document_number) = (request.document_type(), request.document_number());
        self.emitter.emit(
            trail,
            CheckpointKind::OutboundQuery,
            &OutboundQuery {
                query_name: CUSTOMER_QUERY_NAME,
                query: CUSTOMER_QUERY,
                params: [document_type, document_number],
            },
        );
        let customer = self
            .customers
            .find_customer_by_document(document_type, document_number)
            .await?
            .ok_or_else(|| LookupError::customer_not_found(document_type, document_number))?;
        trail.resolve_customer(&customer.customer_id);
        self.emitter.emit(
            trail,
            CheckpointKind::InboundResult,
            &InboundResult {
                query_name: CUSTOMER_QUERY_NAME,
                result: &customer,
            },
        );
        *stage = LookupStage::CustomerResolved;

        // CUSTOMER_RESOLVED -> COST_RESOLVED
        self.emitter.emit(
            trail,
            CheckpointKind::OutboundQuery,
            &OutboundQuery {
                query_name: COST_QUERY_NAME,
                query: COST_QUERY,
                params: [customer.customer_id.as_str(), transaction_code.as_str()],
            },
        );
        let profile = self
            .costs
            .find_cost_profile(&customer.customer_id, &transaction_code)
            .await?
            .ok_or_else(|| LookupError::cost_not_found(&customer.customer_id, &transaction_code))?;
        self.emitter.emit(
            trail,
            CheckpointKind::InboundResult,
            &InboundResult {
                query_name: COST_QUERY_NAME,
                result: &profile,
            },
        );
        *stage = LookupStage::CostResolved;

        // COST_RESOLVED -> DONE
        let response = CostLookupResponse {
            movement_timestamp: self.movement_timestamp(),
            currency_code: profile.currency_code,
            cost: profile.cost,
        };
        self.emitter.emit(trail, CheckpointKind::Exit, &response);
        *stage = LookupStage::Done;

        Ok(response)
    }

    fn movement_timestamp(&self) -> String {
        Utc::now()
            .with_timezone(&self.config.response_offset())
            .format(MOVEMENT_TIMESTAMP_FORMAT)
            .to_string()
    }
}
