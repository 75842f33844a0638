//! # Homologation Catalog
//!
//! Lookup tables mapping raw concept codes to internal transaction codes,
//! plus the country, concept and channel rules used by validation.
//!
//! Tables are immutable once the catalog is built.

use crate::error::{LookupError, LookupResult};
use std::collections::{HashMap, HashSet};

/// Channel restricted to a single concept
pub const CHANNEL_EXCLUSIVE: u16 = 81;
/// Channel that rejects the exclusive concept
pub const CHANNEL_GENERAL: u16 = 151;
/// Concept bound to [`CHANNEL_EXCLUSIVE`]
pub const EXCLUSIVE_CONCEPT: &str = "COBPER";

/// A hard channel/concept rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRule {
    /// The channel accepts only this concept
    Only { channel: u16, concept: String },
    /// The channel rejects this concept
    Forbids { channel: u16, concept: String },
}

/// Raw data backing a [`HomologationCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTables {
    pub permitted_channels: Vec<u16>,
    pub countries: Vec<String>,
    pub concepts: Vec<String>,
    pub homologations: Vec<(String, String)>,
    pub channel_rules: Vec<ChannelRule>,
}

impl CatalogTables {
    /// Production tables
    pub fn standard() -> Self {
        Self {
            permitted_channels: vec![CHANNEL_EXCLUSIVE, CHANNEL_GENERAL],
            countries: ["CR", "CO", "SV", "HN", "PA", "US"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            concepts: [
                "COBPER", "TRCPRO", "TRCTER", "TRA11R", "TR1VR", "TININD", "TINARC", "PPRREG",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            homologations: vec![
                ("COBPER".to_string(), "01PAR157".to_string()),
                ("TRCPRO".to_string(), "01PAR153".to_string()),
                ("TRCTER".to_string(), "01PAR154".to_string()),
            ],
            channel_rules: vec![
                ChannelRule::Only {
                    channel: CHANNEL_EXCLUSIVE,
                    concept: EXCLUSIVE_CONCEPT.to_string(),
                },
                ChannelRule::Forbids {
                    channel: CHANNEL_GENERAL,
                    concept: EXCLUSIVE_CONCEPT.to_string(),
                },
            ],
        }
    }
}

impl Default for CatalogTables {
    fn default() -> Self {
        Self::standard()
    }
}

/// O(1) lookups over [`CatalogTables`].
#[derive(Debug, Clone)]
pub struct HomologationCatalog {
    permitted_channels: HashSet<u16>,
    countries: HashSet<String>,
    concepts: HashSet<String>,
    homologations: HashMap<String, String>,
    channel_rules: Vec<ChannelRule>,
}

impl HomologationCatalog {
    pub fn new(tables: CatalogTables) -> Self {
        Self {
            permitted_channels: tables.permitted_channels.into_iter().collect(),
            countries: tables.countries.into_iter().collect(),
            concepts: tables.concepts.into_iter().collect(),
            homologations: tables
                .homologations
                .into_iter()
                .filter(|(_, internal)| !internal.trim().is_empty())
                .collect(),
            channel_rules: tables.channel_rules,
        }
    }

    /// Catalog built from [`CatalogTables::standard`]
    pub fn standard() -> Self {
        Self::new(CatalogTables::standard())
    }

    /// Map a concept code to its internal transaction code
    pub fn homologate(&self, concept_code: &str) -> LookupResult<&str> {
        self.homologations
            .get(concept_code)
            .map(String::as_str)
            .ok_or_else(|| LookupError::UnknownConcept {
                code: concept_code.to_string(),
            })
    }

    pub fn is_permitted_channel(&self, channel: u16) -> bool {
        self.permitted_channels.contains(&channel)
    }

    pub fn is_valid_country(&self, code: &str) -> bool {
        self.countries.contains(code)
    }

    pub fn is_valid_concept(&self, code: &str) -> bool {
        self.concepts.contains(code)
    }

    /// Enforce the hard channel/concept rules.
    ///
    /// Channels without a rule are unconstrained.
    pub fn check_channel_concept_compatibility(
        &self,
        channel: u16,
        concept: &str,
    ) -> LookupResult<()> {
        for rule in &self.channel_rules {
            let violated = match rule {
                ChannelRule::Only {
                    channel: ch,
                    concept: allowed,
                } => *ch == channel && allowed != concept,
                ChannelRule::Forbids {
                    channel: ch,
                    concept: forbidden,
                } => *ch == channel && forbidden == concept,
            };

            if violated {
                return Err(LookupError::IncompatibleChannelConcept {
                    channel,
                    concept: concept.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for HomologationCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_homologate_known_concepts() {
        let catalog = HomologationCatalog::standard();
        assert_eq!(catalog.homologate("COBPER").unwrap(), "01PAR157");
        assert_eq!(catalog.homologate("TRCPRO").unwrap(), "01PAR153");
        assert_eq!(catalog.homologate("TRCTER").unwrap(), "01PAR154");
    }

    #[test]
    fn test_homologate_unknown_concept() {
        let catalog = HomologationCatalog::standard();
        // Valid PER concept without an internal code
        let err = catalog.homologate("TRA11R").unwrap_err();
        assert!(matches!(err, LookupError::UnknownConcept { ref code } if code == "TRA11R"));
        assert!(catalog.homologate("XYZ").is_err());
    }

    #[test]
    fn test_countries_and_concepts() {
        let catalog = HomologationCatalog::standard();
        assert!(catalog.is_valid_country("PA"));
        assert!(catalog.is_valid_country("CR"));
        assert!(!catalog.is_valid_country("MX"));
        assert!(!catalog.is_valid_country("pa"));

        assert!(catalog.is_valid_concept("PPRREG"));
        assert!(!catalog.is_valid_concept("INVALID"));
    }

    #[test]
    fn test_channel_concept_rules() {
        let catalog = HomologationCatalog::standard();
        assert!(catalog.check_channel_concept_compatibility(81, "COBPER").is_ok());
        assert!(catalog.check_channel_concept_compatibility(81, "TRCPRO").is_err());
        assert!(catalog.check_channel_concept_compatibility(151, "TRCPRO").is_ok());
        assert!(catalog.check_channel_concept_compatibility(151, "COBPER").is_err());
        // Unconstrained channel
        assert!(catalog.check_channel_concept_compatibility(42, "COBPER").is_ok());
    }

    #[test]
    fn test_blank_homologation_is_ignored() {
        let mut tables = CatalogTables::standard();
        tables
            .homologations
            .push(("TININD".to_string(), "  ".to_string()));
        let catalog = HomologationCatalog::new(tables);
        assert!(catalog.homologate("TININD").is_err());
    }
}
