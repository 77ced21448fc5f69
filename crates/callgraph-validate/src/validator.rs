//! Conformance checks of a built graph against a [`Specification`].
//!
//! Every check runs and appends its findings; none stops the others. The
//! result is valid exactly when no check produced an error. Warnings never
//! affect validity.

use std::collections::{HashMap, HashSet};

use callgraph_core::{CallGraph, Node, Pattern};
use tracing::{debug, instrument};

use crate::result::{ErrorKind, ValidationError, ValidationResult, ValidationWarning, WarningKind};
use crate::spec::Specification;

const DEPTH_SUGGESTION: &str =
    "Break long call chains into smaller functions or introduce an orchestration layer";
const COMPLEXITY_SUGGESTION: &str =
    "Reduce coupling between functions or split the module along its call clusters";

/// Check `graph` against `spec`.
#[must_use]
#[instrument(skip(graph, spec), fields(nodes = graph.nodes.len(), edges = graph.edges.len()))]
pub fn validate(graph: &CallGraph, spec: &Specification) -> ValidationResult {
    let mut run = Run::new(graph);

    run.check_entry_point(&spec.entry_point);
    run.check_required_edges(spec);
    run.check_forbidden_edges(spec);
    run.check_required_nodes(&spec.required_nodes);
    run.check_forbidden_nodes(&spec.forbidden_nodes);
    run.check_complexity(spec);

    let mut result = run.result;
    result.is_valid = result.errors.is_empty();

    debug!(
        valid = result.is_valid,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        required_found = result.summary.required_edges_found,
        forbidden_found = result.summary.forbidden_edges_found,
        "validation finished"
    );
    result
}

/// Ids of nodes whose name, id, or class name matches `pattern`.
pub(crate) fn matching_ids<'g>(graph: &'g CallGraph, pattern: &Pattern) -> HashSet<&'g str> {
    graph
        .nodes
        .iter()
        .filter(|node| pattern.matches_node(node))
        .map(|node| node.id.as_str())
        .collect()
}

struct Run<'g> {
    graph: &'g CallGraph,
    by_id: HashMap<&'g str, &'g Node>,
    result: ValidationResult,
}

impl<'g> Run<'g> {
    fn new(graph: &'g CallGraph) -> Self {
        let mut by_id = HashMap::with_capacity(graph.nodes.len());
        for node in &graph.nodes {
            by_id.entry(node.id.as_str()).or_insert(node);
        }
        Self {
            graph,
            by_id,
            result: ValidationResult::default(),
        }
    }

    fn error(&mut self, error: ValidationError) {
        self.result.errors.push(error);
    }

    fn matching_ids(&self, pattern: &Pattern) -> HashSet<&'g str> {
        matching_ids(self.graph, pattern)
    }

    fn name_of(&self, id: &str) -> String {
        self.by_id
            .get(id)
            .map_or_else(|| id.to_string(), |node| node.name.clone())
    }

    fn check_entry_point(&mut self, pattern: &Pattern) {
        let graph = self.graph;
        let Some(id) = graph.entry_point_id.as_ref() else {
            self.error(ValidationError::new(
                ErrorKind::MissingNode,
                format!("No entry point set; expected one matching '{pattern}'"),
            ));
            return;
        };

        let Some(&node) = self.by_id.get(id.as_str()) else {
            self.error(ValidationError::new(
                ErrorKind::MissingNode,
                format!("Entry point '{id}' not found in graph"),
            ));
            return;
        };

        if !pattern.matches_node(node) {
            self.error(
                ValidationError::new(
                    ErrorKind::TypeMismatch,
                    format!(
                        "Entry point '{}' does not match expected pattern '{pattern}'",
                        node.name
                    ),
                )
                .at(node.location.clone()),
            );
        }
    }

    fn check_required_edges(&mut self, spec: &Specification) {
        self.result.summary.required_edges_total = spec.required_edges.len();

        for rule in &spec.required_edges {
            let sources = self.matching_ids(&rule.from);
            let targets = self.matching_ids(&rule.to);

            if sources.is_empty() {
                self.error(ValidationError::new(
                    ErrorKind::MissingNode,
                    format!("No node matches source pattern '{}' of required edge", rule.from),
                ));
            }
            if targets.is_empty() {
                self.error(ValidationError::new(
                    ErrorKind::MissingNode,
                    format!("No node matches target pattern '{}' of required edge", rule.to),
                ));
            }
            if sources.is_empty() || targets.is_empty() {
                continue;
            }

            let found = self.graph.edges.iter().any(|edge| {
                edge.kind == rule.kind
                    && sources.contains(edge.source.as_str())
                    && targets.contains(edge.target.as_str())
            });

            if found {
                self.result.summary.required_edges_found += 1;
            } else {
                self.error(ValidationError::new(
                    ErrorKind::MissingEdge,
                    format!(
                        "Missing required {} call from '{}' to '{}'",
                        rule.kind, rule.from, rule.to
                    ),
                ));
            }
        }
    }

    fn check_forbidden_edges(&mut self, spec: &Specification) {
        for rule in &spec.forbidden_edges {
            let sources = self.matching_ids(&rule.from);
            let targets = self.matching_ids(&rule.to);
            if sources.is_empty() || targets.is_empty() {
                continue;
            }

            let graph = self.graph;
            for edge in &graph.edges {
                if !rule.forbids(edge.kind)
                    || !sources.contains(edge.source.as_str())
                    || !targets.contains(edge.target.as_str())
                {
                    continue;
                }

                let message = format!(
                    "Forbidden {} call from '{}' to '{}' (rule '{}' -> '{}')",
                    edge.kind,
                    self.name_of(edge.source.as_str()),
                    self.name_of(edge.target.as_str()),
                    rule.from,
                    rule.to
                );
                self.error(
                    ValidationError::new(ErrorKind::ForbiddenEdge, message)
                        .at(edge.location.clone()),
                );
                self.result.summary.forbidden_edges_found += 1;
            }
        }
    }

    fn check_required_nodes(&mut self, patterns: &[Pattern]) {
        for pattern in patterns {
            let present = self
                .graph
                .nodes
                .iter()
                .any(|node| pattern.matches(&node.name));
            if present {
                continue;
            }

            self.error(ValidationError::new(
                ErrorKind::MissingNode,
                format!("Required node matching '{pattern}' not found"),
            ));
            self.result.summary.missing_nodes.push(pattern.to_string());
        }
    }

    fn check_forbidden_nodes(&mut self, patterns: &[Pattern]) {
        let graph = self.graph;
        for pattern in patterns {
            for node in graph.nodes.iter().filter(|node| pattern.matches(&node.name)) {
                self.error(
                    ValidationError::new(
                        ErrorKind::TypeMismatch,
                        format!("Forbidden node '{}' matches pattern '{pattern}'", node.name),
                    )
                    .at(node.location.clone()),
                );
                self.result.summary.unexpected_nodes.push(node.name.clone());
            }
        }
    }

    fn check_complexity(&mut self, spec: &Specification) {
        if let Some((depth, limit)) = self
            .graph
            .metadata
            .max_depth
            .zip(spec.max_depth)
            .filter(|&(depth, limit)| depth > limit)
        {
            self.result.warnings.push(ValidationWarning::new(
                WarningKind::Complexity,
                format!("Call depth {depth} exceeds maximum {limit}"),
                DEPTH_SUGGESTION,
            ));
        }

        // E - V + 2, floored at zero.
        let complexity = (self.graph.edges.len() + 2).saturating_sub(self.graph.nodes.len());
        if let Some(limit) = spec.max_complexity.filter(|&limit| complexity > limit) {
            self.result.warnings.push(ValidationWarning::new(
                WarningKind::Complexity,
                format!("Cyclomatic complexity {complexity} exceeds maximum {limit}"),
                COMPLEXITY_SUGGESTION,
            ));
        }
    }
}
