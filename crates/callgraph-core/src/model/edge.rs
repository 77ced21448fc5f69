use serde::{Deserialize, Serialize};
use std::fmt;

use super::node::{NodeId, SourceLocation};

/// How a call site invokes its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    #[default]
    Sync,
    Async,
    Callback,
    Constructor,
}

impl CallKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Async => "async",
            Self::Callback => "callback",
            Self::Constructor => "constructor",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed call site from `source` to `target`.
///
/// Several edges may connect the same ordered pair; each is a distinct call
/// site with its own id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(rename = "type")]
    pub kind: CallKind,
    pub location: SourceLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument_types: Option<Vec<String>>,
    /// `Some(true)` when the call site sits inside a branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<bool>,
}

impl Edge {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        kind: CallKind,
        location: SourceLocation,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind,
            location,
            argument_types: None,
            conditional: None,
        }
    }

    #[must_use]
    pub fn with_argument_types(mut self, argument_types: Vec<String>) -> Self {
        self.argument_types = Some(argument_types);
        self
    }

    #[must_use]
    pub fn conditional(mut self) -> Self {
        self.conditional = Some(true);
        self
    }

    #[must_use]
    pub fn is_conditional(&self) -> bool {
        self.conditional.unwrap_or(false)
    }

    #[must_use]
    pub fn is_self_call(&self) -> bool {
        self.source == self.target
    }
}
