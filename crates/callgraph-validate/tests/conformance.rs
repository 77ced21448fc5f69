//! End-to-end conformance scenarios: build a graph, parse a specification
//! document, validate, and render.

use callgraph_core::{CallKind, Edge, GraphBuilder, Node, NodeKind, SourceLocation};
use callgraph_validate::{
    ErrorKind, Pattern, Specification, generate_diff_report, generate_report, validate,
};

const SPEC: &str = r"
entryPoint: main
requiredEdges:
  - { from: main, to: processData, type: sync }
  - { from: processData, to: validateInput, type: async }
forbiddenEdges:
  - { from: validateInput, to: main, type: sync }
";

fn pipeline(with_async_edge: bool) -> GraphBuilder {
    let mut builder = GraphBuilder::new();
    for (id, file) in [
        ("main", "src/main.ts"),
        ("processData", "src/process.ts"),
        ("validateInput", "src/validate.ts"),
    ] {
        builder
            .add_node(Node::new(id, id, SourceLocation::new(file, 1), NodeKind::Function))
            .expect("add node");
    }
    builder
        .add_edge(Edge::new(
            "e1",
            "main",
            "processData",
            CallKind::Sync,
            SourceLocation::new("src/main.ts", 4),
        ))
        .expect("add e1");
    if with_async_edge {
        builder
            .add_edge(Edge::new(
                "e2",
                "processData",
                "validateInput",
                CallKind::Async,
                SourceLocation::new("src/process.ts", 8),
            ))
            .expect("add e2");
    }
    builder
}

#[test]
fn conforming_pipeline_is_valid() {
    let spec = Specification::from_yaml_str(SPEC).expect("parse spec");
    let graph = pipeline(true).build(Some("main"));

    let result = validate(&graph, &spec);
    assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
    assert_eq!(result.summary.required_edges_found, 2);
    assert_eq!(result.summary.required_edges_total, 2);
    assert_eq!(result.summary.forbidden_edges_found, 0);
    assert!(result.warnings.is_empty());

    let report = generate_report(&result);
    assert!(report.starts_with("Validation PASSED"));
}

#[test]
fn dropping_async_edge_yields_one_missing_edge() {
    let spec = Specification::from_yaml_str(SPEC).expect("parse spec");
    let graph = pipeline(false).build(Some("main"));

    let result = validate(&graph, &spec);
    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 1);

    let error = &result.errors[0];
    assert_eq!(error.kind, ErrorKind::MissingEdge);
    assert!(error.message.contains("processData"));
    assert!(error.message.contains("validateInput"));
    assert_eq!(result.summary.required_edges_found, 1);

    let diff = generate_diff_report(&graph, &spec);
    assert!(diff.contains("  + main -> processData (sync)"));
    assert!(diff.contains("  - processData -> validateInput (async)"));
    assert!(diff.contains("  + validateInput -> main (sync)"));
}

#[test]
fn forbidden_back_call_is_reported_at_call_site() {
    let spec = Specification::from_yaml_str(SPEC).expect("parse spec");
    let mut builder = pipeline(true);
    builder
        .add_edge(Edge::new(
            "e3",
            "validateInput",
            "main",
            CallKind::Sync,
            SourceLocation::new("src/validate.ts", 12).with_column(5),
        ))
        .expect("add e3");
    let result = validate(&builder.build(Some("main")), &spec);

    assert!(!result.is_valid);
    assert_eq!(result.summary.forbidden_edges_found, 1);
    assert_eq!(result.errors[0].kind, ErrorKind::ForbiddenEdge);

    let report = generate_report(&result);
    assert!(report.contains("(src/validate.ts:12:5)"));
}

#[test]
fn wildcard_required_node() {
    let pattern = Pattern::new("process*");
    assert!(pattern.matches("processData"));
    assert!(!pattern.matches("validateInput"));

    let graph = pipeline(true).build(Some("main"));
    let mut spec = Specification::new("main");
    spec.required_nodes = vec![pattern, Pattern::new("render*")];

    let result = validate(&graph, &spec);
    assert_eq!(result.summary.missing_nodes, vec!["render*".to_string()]);
}

#[test]
fn same_document_in_json_and_toml() {
    let json = r#"{
        "entryPoint": "main",
        "requiredEdges": [
            { "from": "main", "to": "processData", "type": "sync" },
            { "from": "processData", "to": "validateInput", "type": "async" }
        ]
    }"#;
    let toml = r#"
entryPoint = "main"

[[requiredEdges]]
from = "main"
to = "processData"
type = "sync"

[[requiredEdges]]
from = "processData"
to = "validateInput"
type = "async"
"#;
    let graph = pipeline(true).build(Some("main"));
    for spec in [
        Specification::from_json_str(json).expect("parse json"),
        Specification::from_toml_str(toml).expect("parse toml"),
    ] {
        let result = validate(&graph, &spec);
        assert!(result.is_valid);
        assert_eq!(result.summary.required_edges_found, 2);
    }
}
