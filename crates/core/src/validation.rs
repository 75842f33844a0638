//! # Validation Pipeline
//!
//! Ordered, fail-fast business rules run before any external lookup.
//!
//! Order:
//! 1. required fields (`documentType`, `documentNumber`, `conceptCode`, `countryCode`)
//! 2. channel membership
//! 3. country code
//! 4. concept catalog membership
//! 5. channel/concept compatibility
//! 6. homologation to the internal transaction code
//!
//! The first failing rule ends the run. The number of audit checkpoints a
//! rejected request produces depends on this order, so it must not change.

use crate::catalog::HomologationCatalog;
use crate::error::{LookupError, LookupResult};
use crate::model::{CostLookupRequest, LookupHeaders};
use std::sync::Arc;

/// Signature of a rule check
pub type RuleCheck =
    fn(&HomologationCatalog, &LookupHeaders, &CostLookupRequest) -> LookupResult<()>;

/// A named, side-effect-free predicate over the request.
#[derive(Clone, Copy)]
pub struct ValidationRule {
    name: &'static str,
    check: RuleCheck,
}

impl ValidationRule {
    pub const fn new(name: &'static str, check: RuleCheck) -> Self {
        Self { name, check }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn evaluate(
        &self,
        catalog: &HomologationCatalog,
        headers: &LookupHeaders,
        request: &CostLookupRequest,
    ) -> LookupResult<()> {
        (self.check)(catalog, headers, request)
    }
}

impl std::fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationRule")
            .field("name", &self.name)
            .finish()
    }
}

fn require(value: &Option<String>, field: &'static str) -> LookupResult<()> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(LookupError::missing(field)),
    }
}

fn required_fields(
    _: &HomologationCatalog,
    _: &LookupHeaders,
    request: &CostLookupRequest,
) -> LookupResult<()> {
    require(&request.document_type, "documentType")?;
    require(&request.document_number, "documentNumber")?;
    require(&request.concept_code, "conceptCode")?;
    require(&request.country_code, "countryCode")
}

fn permitted_channel(
    catalog: &HomologationCatalog,
    headers: &LookupHeaders,
    _: &CostLookupRequest,
) -> LookupResult<()> {
    if catalog.is_permitted_channel(headers.channel) {
        Ok(())
    } else {
        Err(LookupError::InvalidChannel {
            channel: headers.channel,
        })
    }
}

fn valid_country(
    catalog: &HomologationCatalog,
    _: &LookupHeaders,
    request: &CostLookupRequest,
) -> LookupResult<()> {
    if catalog.is_valid_country(request.country_code()) {
        Ok(())
    } else {
        Err(LookupError::InvalidCountry {
            code: request.country_code().to_string(),
        })
    }
}

fn valid_concept(
    catalog: &HomologationCatalog,
    _: &LookupHeaders,
    request: &CostLookupRequest,
) -> LookupResult<()> {
    if catalog.is_valid_concept(request.concept_code()) {
        Ok(())
    } else {
        Err(LookupError::UnknownConcept {
            code: request.concept_code().to_string(),
        })
    }
}

fn channel_concept(
    catalog: &HomologationCatalog,
    headers: &LookupHeaders,
    request: &CostLookupRequest,
) -> LookupResult<()> {
    catalog.check_channel_concept_compatibility(headers.channel, request.concept_code())
}

/// Rules 1-5, in order. Homologation runs last as the pipeline output.
pub const STANDARD_RULES: [ValidationRule; 5] = [
    ValidationRule::new("required_fields", required_fields),
    ValidationRule::new("permitted_channel", permitted_channel),
    ValidationRule::new("valid_country", valid_country),
    ValidationRule::new("valid_concept", valid_concept),
    ValidationRule::new("channel_concept", channel_concept),
];

/// Runs the rules and homologates the concept.
#[derive(Debug, Clone)]
pub struct ValidationPipeline {
    catalog: Arc<HomologationCatalog>,
    rules: Vec<ValidationRule>,
}

impl ValidationPipeline {
    pub fn new(catalog: Arc<HomologationCatalog>) -> Self {
        Self {
            catalog,
            rules: STANDARD_RULES.to_vec(),
        }
    }

    pub fn catalog(&self) -> &HomologationCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    /// Validate the request and return the internal transaction code.
    pub fn run(&self, headers: &LookupHeaders, request: &CostLookupRequest) -> LookupResult<String> {
        for rule in &self.rules {
            rule.evaluate(&self.catalog, headers, request)?;
        }

        self.catalog
            .homologate(request.concept_code())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> ValidationPipeline {
        ValidationPipeline::new(Arc::new(HomologationCatalog::standard()))
    }

    fn valid_request() -> CostLookupRequest {
        CostLookupRequest::new("CED", "8-111-111", "PA", "COBPER")
    }

    #[test]
    fn test_valid_request_homologates() {
        let headers = LookupHeaders::new("TXN1", 81, "user");
        assert_eq!(pipeline().run(&headers, &valid_request()).unwrap(), "01PAR157");

        let headers = LookupHeaders::new("TXN1", 151, "user");
        let mut req = valid_request();
        req.concept_code = Some("TRCTER".to_string());
        assert_eq!(pipeline().run(&headers, &req).unwrap(), "01PAR154");
    }

    #[test]
    fn test_missing_and_blank_fields() {
        let headers = LookupHeaders::new("TXN1", 81, "user");

        let mut req = valid_request();
        req.document_type = None;
        assert_eq!(
            pipeline().run(&headers, &req).unwrap_err(),
            LookupError::missing("documentType")
        );

        let mut req = valid_request();
        req.document_number = Some("   ".to_string());
        assert_eq!(
            pipeline().run(&headers, &req).unwrap_err(),
            LookupError::missing("documentNumber")
        );

        let mut req = valid_request();
        req.country_code = Some(String::new());
        assert_eq!(
            pipeline().run(&headers, &req).unwrap_err(),
            LookupError::missing("countryCode")
        );
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        let headers = LookupHeaders::new("TXN1", 81, "user");
        let mut req = CostLookupRequest::default();
        req.document_type = Some("CED".to_string());
        req.document_number = Some("1".to_string());
        // conceptCode is checked before countryCode
        assert_eq!(
            pipeline().run(&headers, &req).unwrap_err(),
            LookupError::missing("conceptCode")
        );
    }

    #[test]
    fn test_channel_checked_before_country() {
        let headers = LookupHeaders::new("TXN1", 200, "user");
        let mut req = valid_request();
        req.country_code = Some("XX".to_string());
        assert_eq!(
            pipeline().run(&headers, &req).unwrap_err(),
            LookupError::InvalidChannel { channel: 200 }
        );
    }

    #[test]
    fn test_country_checked_before_concept() {
        let headers = LookupHeaders::new("TXN1", 81, "user");
        let mut req = valid_request();
        req.country_code = Some("XX".to_string());
        req.concept_code = Some("XYZ".to_string());
        assert!(matches!(
            pipeline().run(&headers, &req).unwrap_err(),
            LookupError::InvalidCountry { .. }
        ));
    }

    #[test]
    fn test_concept_checked_before_compatibility() {
        let headers = LookupHeaders::new("TXN1", 81, "user");
        let mut req = valid_request();
        req.concept_code = Some("XYZ".to_string());
        assert!(matches!(
            pipeline().run(&headers, &req).unwrap_err(),
            LookupError::UnknownConcept { .. }
        ));
    }

    #[test]
    fn test_incompatible_channel_concept() {
        let headers = LookupHeaders::new("TXN1", 81, "user");
        let mut req = valid_request();
        req.concept_code = Some("TRCPRO".to_string());
        assert!(matches!(
            pipeline().run(&headers, &req).unwrap_err(),
            LookupError::IncompatibleChannelConcept { channel: 81, .. }
        ));
    }

    #[test]
    fn test_valid_concept_without_homologation() {
        let headers = LookupHeaders::new("TXN1", 151, "user");
        let mut req = valid_request();
        req.concept_code = Some("TININD".to_string());
        assert_eq!(
            pipeline().run(&headers, &req).unwrap_err(),
            LookupError::UnknownConcept {
                code: "TININD".to_string()
            }
        );
    }

    #[test]
    fn test_rule_names_in_order() {
        let names: Vec<_> = pipeline().rules().iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec![
                "required_fields",
                "permitted_channel",
                "valid_country",
                "valid_concept",
                "channel_concept"
            ]
        );
    }
}
