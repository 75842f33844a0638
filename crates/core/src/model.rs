//! # Model Module
//!
//! Inbound request, caller headers, lookup rows and the response of the
//! cost lookup use case.

use serde::{Deserialize, Serialize};

/// Caller context extracted from transport headers by the outer layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupHeaders {
    /// Correlates every audit record of one request (caller supplied)
    pub transaction_id: String,
    /// Origin channel (81, 151, ...)
    pub channel: u16,
    /// Caller identity as sent by the bus
    pub user: String,
    /// Operation name header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    /// Service version header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_version: Option<String>,
}

impl LookupHeaders {
    pub fn new(transaction_id: &str, channel: u16, user: &str) -> Self {
        Self {
            transaction_id: transaction_id.to_string(),
            channel,
            user: user.to_string(),
            operation_name: None,
            service_version: None,
        }
    }

    pub fn with_operation(mut self, operation_name: &str) -> Self {
        self.operation_name = Some(operation_name.to_string());
        self
    }

    pub fn with_version(mut self, service_version: &str) -> Self {
        self.service_version = Some(service_version.to_string());
        self
    }
}

/// Body of a cost lookup request.
///
/// Fields are optional because presence is a validation rule, not a
/// deserialization concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostLookupRequest {
    pub document_type: Option<String>,
    pub document_number: Option<String>,
    pub country_code: Option<String>,
    pub concept_code: Option<String>,
}

impl CostLookupRequest {
    pub fn new(document_type: &str, document_number: &str, country_code: &str, concept_code: &str) -> Self {
        Self {
            document_type: Some(document_type.to_string()),
            document_number: Some(document_number.to_string()),
            country_code: Some(country_code.to_string()),
            concept_code: Some(concept_code.to_string()),
        }
    }

    /// Field value, or "" when absent
    pub fn document_type(&self) -> &str {
        self.document_type.as_deref().unwrap_or_default()
    }

    pub fn document_number(&self) -> &str {
        self.document_number.as_deref().unwrap_or_default()
    }

    pub fn country_code(&self) -> &str {
        self.country_code.as_deref().unwrap_or_default()
    }

    pub fn concept_code(&self) -> &str {
        self.concept_code.as_deref().unwrap_or_default()
    }
}

/// Customer master record (read-only here).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: String,
    pub identification_type: String,
    pub identification_number: String,
}

/// Cost profile of one customer for one internal transaction code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostProfile {
    pub transaction_code: String,
    pub customer_id: String,
    /// Amount in minor units (cents)
    pub cost: i64,
    pub currency_code: String,
}

/// Successful lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostLookupResponse {
    /// `yyyy-MM-ddTHH:mm:ss±hh:mm` in the configured offset
    pub movement_timestamp: String,
    pub currency_code: String,
    /// Amount in minor units, copied verbatim from the cost profile
    pub cost: i64,
}
