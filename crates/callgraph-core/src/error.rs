use std::fmt;

/// Machine-readable error codes for graph construction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidNode,
    InvalidEdge,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidNode => "E1001",
            Self::InvalidEdge => "E1002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidNode => "Malformed node record",
            Self::InvalidEdge => "Malformed edge record",
        }
    }

    /// Optional remediation hint for whoever produced the record.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidNode => {
                Some("Nodes need a non-empty id, name, and file path from the extractor.")
            }
            Self::InvalidEdge => Some("Edges need a non-empty id, source id, and target id."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Caller-misuse errors raised while inserting records into a
/// [`GraphBuilder`](crate::graph::GraphBuilder).
///
/// A failed insert leaves the builder exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("invalid node '{id}': missing {field}")]
    InvalidNode { id: String, field: &'static str },

    #[error("invalid edge '{id}': missing {field}")]
    InvalidEdge { id: String, field: &'static str },
}

impl GraphError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidNode { .. } => ErrorCode::InvalidNode,
            Self::InvalidEdge { .. } => ErrorCode::InvalidEdge,
        }
    }
}
