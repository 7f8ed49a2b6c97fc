//! Network configuration.
//!
//! Everything that describes the network rather than its timetable lives in
//! one JSON document: line classification rules, interchanges and fares.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::interchange::{InterchangeEntry, InterchangePolicy};
use crate::oracle::{DistanceFareTable, FareConfig};
use crate::timetable::{ClassifierConfig, LineClassifier};

/// Errors loading network configuration.
#[derive(Debug, thiserror::Error)]
pub enum NetworkConfigError {
    /// Reading the file failed
    #[error("failed to read network config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid network config
    #[error("failed to parse network config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The whole network description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub interchanges: Vec<InterchangeEntry>,

    #[serde(default)]
    pub fares: FareConfig,
}

impl NetworkConfig {
    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NetworkConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| NetworkConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: NetworkConfig =
            serde_json::from_str(&contents).map_err(|source| NetworkConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            path = %path.display(),
            rules = config.classifier.rules.len(),
            interchanges = config.interchanges.len(),
            fare_regions = config.fares.regions.len(),
            "network config loaded"
        );
        Ok(config)
    }

    /// Build the trip classifier.
    pub fn classifier(&self) -> LineClassifier {
        LineClassifier::new(self.classifier.clone())
    }

    /// Build the interchange policy.
    pub fn interchange_policy(&self) -> InterchangePolicy {
        InterchangePolicy::from_entries(self.interchanges.iter().cloned())
    }

    /// Build the fare table.
    pub fn fare_table(&self) -> DistanceFareTable {
        DistanceFareTable::new(self.fares.clone())
    }
}
