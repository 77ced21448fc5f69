#![forbid(unsafe_code)]
//! callgraph-validate library.
//!
//! Checks a built [`CallGraph`](callgraph_core::CallGraph) against a
//! declarative [`Specification`] and renders the outcome as text.
//!
//! # Conventions
//!
//! - **Errors**: Findings are values in [`ValidationResult`]; only the
//!   document parsers return `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod report;
pub mod result;
pub mod spec;
pub mod validator;

pub use callgraph_core::Pattern;
pub use report::{generate_diff_report, generate_report};
pub use result::{
    ErrorKind, ValidationError, ValidationResult, ValidationSummary, ValidationWarning,
    WarningKind,
};
pub use spec::{EdgeRule, ForbiddenEdgeRule, Specification};
pub use validator::validate;
