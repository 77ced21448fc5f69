//! Plain-text renderings of validation outcomes.
//!
//! Both reports are deterministic: the same inputs always produce the same
//! bytes, so they can be snapshotted in tests and diffed in CI logs.

use std::fmt::Write as FmtWrite;

use callgraph_core::{CallGraph, CallKind};

use crate::result::ValidationResult;
use crate::spec::Specification;
use crate::validator::matching_ids;

/// Summarize a [`ValidationResult`].
///
/// ```text
/// Validation FAILED
///   errors:              1
///   warnings:            0
///   required edges:      1/2 found
///   forbidden edges:     0 found
///
/// Errors:
///   [missing_edge] Missing required async call from 'processData' to 'validateInput'
/// ```
#[must_use]
pub fn generate_report(result: &ValidationResult) -> String {
    let mut out = String::new();
    let status = if result.is_valid { "PASSED" } else { "FAILED" };
    let summary = &result.summary;

    let _ = writeln!(out, "Validation {status}");
    let _ = writeln!(out, "  errors:              {}", result.errors.len());
    let _ = writeln!(out, "  warnings:            {}", result.warnings.len());
    let _ = writeln!(
        out,
        "  required edges:      {}/{} found",
        summary.required_edges_found, summary.required_edges_total
    );
    let _ = writeln!(
        out,
        "  forbidden edges:     {} found",
        summary.forbidden_edges_found
    );
    if !summary.missing_nodes.is_empty() {
        let _ = writeln!(out, "  missing nodes:       {}", summary.missing_nodes.join(", "));
    }
    if !summary.unexpected_nodes.is_empty() {
        let _ = writeln!(
            out,
            "  unexpected nodes:    {}",
            summary.unexpected_nodes.join(", ")
        );
    }

    if !result.errors.is_empty() {
        let _ = writeln!(out, "\nErrors:");
        for error in &result.errors {
            match &error.location {
                Some(location) => {
                    let _ = writeln!(out, "  [{}] {} ({location})", error.kind, error.message);
                }
                None => {
                    let _ = writeln!(out, "  [{}] {}", error.kind, error.message);
                }
            }
        }
    }

    if !result.warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings:");
        for warning in &result.warnings {
            let _ = writeln!(out, "  [{}] {}", warning.kind, warning.message);
            if let Some(suggestion) = &warning.suggestion {
                let _ = writeln!(out, "      suggestion: {suggestion}");
            }
        }
    }

    out
}

/// Show which parts of `spec` the graph satisfies.
///
/// Markers: `+` satisfied, `-` missing, `!` present but forbidden.
#[must_use]
pub fn generate_diff_report(graph: &CallGraph, spec: &Specification) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Required nodes:");
    if spec.required_nodes.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for pattern in &spec.required_nodes {
        let present = graph.nodes.iter().any(|node| pattern.matches(&node.name));
        let marker = if present { '+' } else { '-' };
        let _ = writeln!(out, "  {marker} {pattern}");
    }

    let _ = writeln!(out, "\nRequired edges:");
    if spec.required_edges.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for rule in &spec.required_edges {
        let sources = matching_ids(graph, &rule.from);
        let targets = matching_ids(graph, &rule.to);
        let present = graph.edges.iter().any(|edge| {
            edge.kind == rule.kind
                && sources.contains(edge.source.as_str())
                && targets.contains(edge.target.as_str())
        });
        let marker = if present { '+' } else { '-' };
        let _ = writeln!(out, "  {marker} {} -> {} ({})", rule.from, rule.to, rule.kind);
    }

    let _ = writeln!(out, "\nForbidden edges:");
    if spec.forbidden_edges.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for rule in &spec.forbidden_edges {
        let sources = matching_ids(graph, &rule.from);
        let targets = matching_ids(graph, &rule.to);
        let hits = graph
            .edges
            .iter()
            .filter(|edge| {
                rule.forbids(edge.kind)
                    && sources.contains(edge.source.as_str())
                    && targets.contains(edge.target.as_str())
            })
            .count();
        let kind = rule.kind.map_or("any", CallKind::as_str);
        if hits == 0 {
            let _ = writeln!(out, "  + {} -> {} ({kind})", rule.from, rule.to);
        } else {
            let _ = writeln!(
                out,
                "  ! {} -> {} ({kind}): {hits} call site(s)",
                rule.from, rule.to
            );
        }
    }

    out
}
