//! The immutable, validated scenario catalog.

use std::path::Path;

use breach_core::error::DomainError;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::info;

use super::scenario::{LearningObjective, Scenario};
use super::validation::validate;

/// Authored scenarios shipped with the game.
const BUILTIN_SCENARIOS: &str = include_str!("../../content/scenarios.yaml");

/// Top-level shape of an authored catalog document.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    scenarios: Vec<Scenario>,
}

/// Ordered, validated sequence of scenarios. Shared read-only by every
/// session once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
    version_hash: String,
}

impl ScenarioCatalog {
    /// Parses and validates a YAML catalog document.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the document does not parse or
    /// any cross-reference is dangling.
    pub fn from_yaml(source: &str) -> Result<Self, DomainError> {
        let document: CatalogDocument = serde_yaml::from_str(source)
            .map_err(|e| DomainError::Validation(format!("catalog parse failed: {e}")))?;
        validate(&document.scenarios)?;

        Ok(Self {
            scenarios: document.scenarios,
            version_hash: hash_hex(source.as_bytes()),
        })
    }

    /// Validates scenarios built in code. The version hash covers their JSON
    /// serialization.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if any cross-reference is dangling.
    pub fn from_scenarios(scenarios: Vec<Scenario>) -> Result<Self, DomainError> {
        validate(&scenarios)?;
        let canonical = serde_json::to_vec(&scenarios)
            .map_err(|e| DomainError::Infrastructure(format!("catalog hashing failed: {e}")))?;

        Ok(Self {
            version_hash: hash_hex(&canonical),
            scenarios,
        })
    }

    /// Returns the scenarios shipped with the game.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the embedded content is malformed.
    pub fn builtin() -> Result<Self, DomainError> {
        Self::from_yaml(BUILTIN_SCENARIOS)
    }

    /// Number of scenarios.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether the catalog is empty. Always `false` for a validated catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Scenario at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    /// Scenario with the given id, if any.
    #[must_use]
    pub fn find(&self, scenario_id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == scenario_id)
    }

    /// All scenarios in order.
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Every learning objective, in catalog order.
    pub fn objectives(&self) -> impl Iterator<Item = &LearningObjective> {
        self.scenarios.iter().flat_map(|s| s.objectives.iter())
    }

    /// Hex-encoded SHA-256 of the catalog source.
    #[must_use]
    pub fn version_hash(&self) -> &str {
        &self.version_hash
    }
}

/// Loads the catalog from `path`, or the built-in catalog when no path is
/// configured.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the file cannot be read and
/// `DomainError::Validation` if its content is malformed.
pub fn load_catalog(path: Option<&Path>) -> Result<ScenarioCatalog, DomainError> {
    let catalog = match path {
        Some(path) => {
            let source = std::fs::read_to_string(path).map_err(|e| {
                DomainError::Infrastructure(format!(
                    "failed to read catalog {}: {e}",
                    path.display()
                ))
            })?;
            ScenarioCatalog::from_yaml(&source)?
        }
        None => ScenarioCatalog::builtin()?,
    };

    info!(
        scenarios = catalog.len(),
        version_hash = %catalog.version_hash(),
        "scenario catalog loaded"
    );
    Ok(catalog)
}

fn hash_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
