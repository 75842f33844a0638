//! Lookup command

use anyhow::Result;
use clap::Args;
use std::path::Path;
use std::sync::Arc;
use txcost_business::{CostLookupService, ServiceConfig};
use txcost_core::{CostLookupRequest, HomologationCatalog, LookupHeaders};

use crate::db;

/// Arguments of `txcost lookup`
#[derive(Args)]
pub struct LookupArgs {
    /// Transaction ID (generated when omitted)
    #[arg(long)]
    pub transaction_id: Option<String>,
    /// Origin channel
    #[arg(long)]
    pub channel: u16,
    /// Caller identity
    #[arg(long, default_value = "cli")]
    pub user: String,
    /// Document type (e.g., CED)
    #[arg(long)]
    pub document_type: Option<String>,
    /// Document number
    #[arg(long)]
    pub document_number: Option<String>,
    /// Country code (e.g., PA)
    #[arg(long)]
    pub country: Option<String>,
    /// Transaction concept (e.g., COBPER)
    #[arg(long)]
    pub concept: Option<String>,
    /// Print the response as JSON
    #[arg(long)]
    pub json: bool,
}

impl LookupArgs {
    fn headers(&self) -> LookupHeaders {
        let transaction_id = self
            .transaction_id
            .clone()
            .unwrap_or_else(|| format!("TXN-{}", uuid::Uuid::new_v4()));
        LookupHeaders::new(&transaction_id, self.channel, &self.user)
            .with_operation("lookupTransactionCost")
            .with_version(env!("CARGO_PKG_VERSION"))
    }

    fn request(&self) -> CostLookupRequest {
        CostLookupRequest {
            document_type: self.document_type.clone(),
            document_number: self.document_number.clone(),
            country_code: self.country.clone(),
            concept_code: self.concept.clone(),
        }
    }
}

/// Run one lookup and wait for its audit trail to be written
pub async fn run(db_path: &Path, config: ServiceConfig, args: LookupArgs) -> Result<()> {
    let db = db::connect(db_path).await?;
    let lookups = Arc::new(db.lookup_store());
    let service = CostLookupService::new(
        Arc::new(HomologationCatalog::standard()),
        lookups.clone(),
        lookups,
        Arc::new(db.audit_store()),
        config,
    );

    let headers = args.headers();
    let result = service
        .lookup_transaction_cost(&headers, &args.request())
        .await;

    // The trail is written in the background; wait before the runtime exits
    service.audit_sink().drain().await;
    db.pool().close().await;

    match result {
        Ok(response) if args.json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Ok(response) => {
            println!("✅ Transaction cost");
            println!("   Transaction: {}", headers.transaction_id);
            println!("   Cost:        {} (minor units)", response.cost);
            println!("   Currency:    {}", response.currency_code);
            println!("   Timestamp:   {}", response.movement_timestamp);
            Ok(())
        }
        Err(err) => {
            println!("❌ Lookup failed [{}]", err.category());
            println!("   Transaction: {}", headers.transaction_id);
            anyhow::bail!(err)
        }
    }
}
