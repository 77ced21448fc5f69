use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::graph::TraversalOptions;

/// Location of the analysis config relative to the project root.
pub const CONFIG_PATH: &str = ".callgraph/config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub traversal: TraversalConfig,
    #[serde(default)]
    pub subgraph: SubgraphConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_hotspot_limit")]
    pub hotspot_limit: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            hotspot_limit: default_hotspot_limit(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalConfig {
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl TraversalConfig {
    #[must_use]
    pub const fn options(&self) -> TraversalOptions {
        TraversalOptions {
            max_depth: self.max_depth,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgraphConfig {
    #[serde(default = "default_subgraph_depth")]
    pub max_depth: usize,
}

impl Default for SubgraphConfig {
    fn default() -> Self {
        Self {
            max_depth: default_subgraph_depth(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a TOML document. Missing sections and keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not valid TOML for this schema.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content).context("Failed to parse analysis config")
    }
}

/// Load `.callgraph/config.toml` under `project_root`, or defaults if the
/// file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(project_root: &Path) -> Result<AnalysisConfig> {
    let path = project_root.join(CONFIG_PATH);
    if !path.exists() {
        return Ok(AnalysisConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<AnalysisConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_hotspot_limit() -> usize {
    10
}

const fn default_subgraph_depth() -> usize {
    5
}
