use serde_json::json;
use stagecraft::types::{Edge, NodeSpec, WorkflowGraph};

#[test]
fn builder_assembles_nodes_and_edges() {
    let graph = WorkflowGraph::builder("etl")
        .node("extract", "./nodes/extract.ts")
        .node("load", "./nodes/load.ts")
        .edge("extract", "load")
        .build();

    assert_eq!(graph.name, "etl");
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.nodes["extract"].path, "./nodes/extract.ts");
    assert_eq!(graph.edges, vec![Edge::new("extract", "load")]);
}

#[test]
fn redeclaring_a_node_replaces_its_spec() {
    let graph = WorkflowGraph::builder("wf")
        .node("n", "./old.ts")
        .node("n", "./new.ts")
        .build();
    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes["n"].path, "./new.ts");
}

#[test]
fn node_spec_carries_capability_grants() {
    let mut spec = NodeSpec::new("./nodes/fetch.ts");
    spec.capabilities
        .insert("net".into(), "api.github.com".into());

    let graph = WorkflowGraph::builder("wf").node_spec("fetch", spec).build();
    assert_eq!(
        graph.nodes["fetch"].capabilities["net"],
        "api.github.com"
    );
}

#[test]
fn graph_deserializes_from_a_workflow_document() {
    let graph: WorkflowGraph = serde_json::from_value(json!({
        "name": "uptime-prober",
        "nodes": {
            "probe": { "path": "./nodes/probe.ts", "capabilities": { "net": "*" } },
            "report": { "path": "./nodes/report.ts" }
        },
        "edges": [ { "from": "probe", "to": "report" } ]
    }))
    .unwrap();

    assert_eq!(graph.name, "uptime-prober");
    assert_eq!(graph.nodes["probe"].capabilities["net"], "*");
    assert!(graph.nodes["report"].capabilities.is_empty());
    assert_eq!(graph.edges.len(), 1);
}

#[test]
fn edges_default_to_empty_when_absent() {
    let graph: WorkflowGraph = serde_json::from_value(json!({
        "name": "flat",
        "nodes": { "only": { "path": "./only.ts" } }
    }))
    .unwrap();
    assert!(graph.edges.is_empty());
}

#[test]
fn serialization_round_trips_without_empty_capability_noise() {
    let graph = WorkflowGraph::builder("wf").node("a", "./a.ts").build();
    let value = serde_json::to_value(&graph).unwrap();
    // Empty capability maps are omitted from documents.
    assert!(value["nodes"]["a"].get("capabilities").is_none());

    let back: WorkflowGraph = serde_json::from_value(value).unwrap();
    assert_eq!(back.nodes["a"], graph.nodes["a"]);
}

#[test]
fn dependency_map_groups_predecessors_by_target() {
    let graph = WorkflowGraph::builder("wf")
        .node("a", "./a.ts")
        .node("b", "./b.ts")
        .node("d", "./d.ts")
        .edge("a", "d")
        .edge("b", "d")
        .build();

    let deps = graph.dependency_map();
    assert_eq!(deps.get("d"), Some(&vec!["a", "b"]));
    assert!(deps.get("a").is_none());
}
