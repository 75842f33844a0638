//! # Txcost Core
//!
//! Domain types for the transaction cost lookup service.
//!
//! - [`catalog`]: homologation tables and channel/concept rules
//! - [`validation`]: ordered, fail-fast request validation
//! - [`audit`]: audit records and checkpoint kinds
//! - [`hash`]: payload hashing
//! - [`ports`]: collaborator interfaces

pub mod audit;
pub mod catalog;
pub mod error;
pub mod hash;
pub mod model;
pub mod ports;
pub mod validation;

pub use audit::{AuditRecord, AuditStatus, CheckpointKind};
pub use catalog::{CatalogTables, ChannelRule, HomologationCatalog};
pub use error::{ErrorCategory, LookupError, LookupResult, StoreError, StoreResult};
pub use hash::{payload_hash, verify_payload_hash, PAYLOAD_HASH_LEN};
pub use model::{CostLookupRequest, CostLookupResponse, CostProfile, Customer, LookupHeaders};
pub use ports::{AuditStore, CostProfileStore, CustomerDirectory};
pub use validation::{ValidationPipeline, ValidationRule};
