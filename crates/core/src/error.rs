//! # Error Module
//!
//! Domain errors for the cost lookup use case, built on thiserror.
//!
//! Every failure carries enough information to recover its category
//! ([`ErrorCategory`]) without inspecting the message text.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Broad failure category, used by the outer layer to choose a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Caller input rejected before any external lookup
    Validation,
    /// Business data absent (customer or cost profile)
    NotFound,
    /// Collaborator failure (database unreachable, ...)
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure reported by an external collaborator (lookup or audit store).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store rejected operation: {0}")]
    Rejected(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}

/// Result type alias for collaborator calls
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures of the cost lookup use case.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    // === Validation errors ===
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("Invalid channel {channel}: only 81 or 151 are allowed")]
    InvalidChannel { channel: u16 },

    #[error("Country code not allowed: {code}")]
    InvalidCountry { code: String },

    #[error("Unknown transaction concept: {code}")]
    UnknownConcept { code: String },

    #[error("Channel {channel} does not allow concept {concept}")]
    IncompatibleChannelConcept { channel: u16, concept: String },

    // === Not found errors ===
    #[error("Customer does not exist: {document_type}/{document_number}")]
    CustomerNotFound {
        document_type: String,
        document_number: String,
    },

    #[error("No cost profile for customer {customer_id} and transaction {transaction_code}")]
    CostNotFound {
        customer_id: String,
        transaction_code: String,
    },

    // === Collaborator errors ===
    #[error("Lookup store failure: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for lookup operations
pub type LookupResult<T> = Result<T, LookupError>;

impl LookupError {
    /// Category of this failure
    pub fn category(&self) -> ErrorCategory {
        match self {
            LookupError::MissingField { .. }
            | LookupError::InvalidChannel { .. }
            | LookupError::InvalidCountry { .. }
            | LookupError::UnknownConcept { .. }
            | LookupError::IncompatibleChannelConcept { .. } => ErrorCategory::Validation,
            LookupError::CustomerNotFound { .. } | LookupError::CostNotFound { .. } => {
                ErrorCategory::NotFound
            }
            LookupError::Store(_) => ErrorCategory::Internal,
        }
    }

    /// Stable identifier of the variant, written into ERROR audit payloads
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::MissingField { .. } => "MissingField",
            LookupError::InvalidChannel { .. } => "InvalidChannel",
            LookupError::InvalidCountry { .. } => "InvalidCountry",
            LookupError::UnknownConcept { .. } => "UnknownConcept",
            LookupError::IncompatibleChannelConcept { .. } => "IncompatibleChannelConcept",
            LookupError::CustomerNotFound { .. } => "CustomerNotFound",
            LookupError::CostNotFound { .. } => "CostNotFound",
            LookupError::Store(_) => "Store",
        }
    }

    pub fn is_validation(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }

    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub fn customer_not_found(document_type: &str, document_number: &str) -> Self {
        Self::CustomerNotFound {
            document_type: document_type.to_string(),
            document_number: document_number.to_string(),
        }
    }

    pub fn cost_not_found(customer_id: &str, transaction_code: &str) -> Self {
        Self::CostNotFound {
            customer_id: customer_id.to_string(),
            transaction_code: transaction_code.to_string(),
        }
    }
}
