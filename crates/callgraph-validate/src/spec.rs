//! Declarative structure specifications.
//!
//! A specification states what a call graph must and must not contain.
//! Documents use camelCase keys and may be YAML, JSON, or TOML:
//!
//! ```yaml
//! entryPoint: main
//! requiredEdges:
//!   - { from: main, to: "process*", type: sync }
//! forbiddenEdges:
//!   - { from: "*Repository", to: "*Controller" }
//! requiredNodes: ["validate*"]
//! forbiddenNodes: ["legacy*"]
//! maxDepth: 8
//! maxComplexity: 40
//! ```

use anyhow::{Context, Result};
use callgraph_core::{CallKind, Pattern};
use serde::{Deserialize, Serialize};

/// A call that must exist between some node matching `from` and some node
/// matching `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRule {
    pub from: Pattern,
    pub to: Pattern,
    #[serde(rename = "type")]
    pub kind: CallKind,
}

/// A call that must not exist. An omitted kind forbids every kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForbiddenEdgeRule {
    pub from: Pattern,
    pub to: Pattern,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CallKind>,
}

impl ForbiddenEdgeRule {
    #[must_use]
    pub fn forbids(&self, kind: CallKind) -> bool {
        self.kind.is_none_or(|forbidden| forbidden == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specification {
    pub entry_point: Pattern,
    #[serde(default)]
    pub required_edges: Vec<EdgeRule>,
    #[serde(default)]
    pub forbidden_edges: Vec<ForbiddenEdgeRule>,
    #[serde(default)]
    pub required_nodes: Vec<Pattern>,
    #[serde(default)]
    pub forbidden_nodes: Vec<Pattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_complexity: Option<usize>,
}

impl Specification {
    /// A specification that only names the entry point.
    #[must_use]
    pub fn new(entry_point: impl Into<Pattern>) -> Self {
        Self {
            entry_point: entry_point.into(),
            required_edges: Vec::new(),
            forbidden_edges: Vec::new(),
            required_nodes: Vec::new(),
            forbidden_nodes: Vec::new(),
            max_depth: None,
            max_complexity: None,
        }
    }

    /// # Errors
    ///
    /// Returns an error if `content` is not a valid YAML specification.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse YAML specification")
    }

    /// # Errors
    ///
    /// Returns an error if `content` is not a valid JSON specification.
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse JSON specification")
    }

    /// # Errors
    ///
    /// Returns an error if `content` is not a valid TOML specification.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML specification")
    }
}
