use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Name given to auto-created nodes for call targets that were never declared.
pub const PLACEHOLDER_NAME: &str = "placeholder";

/// File recorded on auto-created placeholder nodes.
pub const UNKNOWN_FILE: &str = "unknown";

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// Globally unique identifier of a call-graph node.
///
/// Borrows as `&str`, so maps keyed by `NodeId` can be queried with plain
/// string slices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// SourceLocation
// ---------------------------------------------------------------------------

/// Where a definition or call site lives in the analyzed sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl SourceLocation {
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column: None,
        }
    }

    #[must_use]
    pub fn with_column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self
    }

    /// Location recorded on placeholder nodes.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_FILE, 0)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(f, "{}:{}:{column}", self.file, self.line),
            None => write!(f, "{}:{}", self.file, self.line),
        }
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What sort of definition a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Function,
    Method,
    Arrow,
    Constructor,
    Accessor,
}

impl NodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Arrow => "arrow",
            Self::Constructor => "constructor",
            Self::Accessor => "accessor",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
}

/// Whether a node was declared by the extractor or synthesized by the
/// builder to stand in for an unresolved call target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeOrigin {
    #[default]
    Declared,
    Unresolved,
}

// ---------------------------------------------------------------------------
// Parameter / Node
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_text: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Parameter {
    #[must_use]
    pub fn new(name: impl Into<String>, type_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_text: type_text.into(),
            optional: false,
            default_value: None,
        }
    }
}

/// A call-graph vertex: one function, method, constructor, or accessor
/// definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub location: SourceLocation,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub return_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default)]
    pub origin: NodeOrigin,
}

impl Node {
    /// A declared, synchronous, public node with no parameters.
    #[must_use]
    pub fn new(
        id: impl Into<NodeId>,
        name: impl Into<String>,
        location: SourceLocation,
        kind: NodeKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            kind,
            is_async: false,
            is_static: false,
            visibility: Visibility::Public,
            parameters: Vec::new(),
            return_type: String::new(),
            class_name: None,
            origin: NodeOrigin::Declared,
        }
    }

    /// Stand-in for a call target whose definition was never added.
    #[must_use]
    pub fn placeholder(id: impl Into<NodeId>) -> Self {
        Self {
            origin: NodeOrigin::Unresolved,
            ..Self::new(
                id,
                PLACEHOLDER_NAME,
                SourceLocation::unknown(),
                NodeKind::Function,
            )
        }
    }

    #[must_use]
    pub fn with_async(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }

    #[must_use]
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    #[must_use]
    pub fn with_signature(mut self, parameters: Vec<Parameter>, return_type: impl Into<String>) -> Self {
        self.parameters = parameters;
        self.return_type = return_type.into();
        self
    }

    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self.origin, NodeOrigin::Unresolved)
    }
}
