use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{EdgeStatus, NodeRole, NodeStatus, Topology, TopologyEdge, TopologyNode};

#[derive(Debug, Deserialize)]
struct TopologyFile {
    #[serde(default)]
    nodes: Vec<TopologyNode>,
    #[serde(default)]
    edges: Vec<TopologyEdge>,
}

/// Reads and validates a topology JSON file. Validation never fails: bad
/// edges and duplicate ids are dropped and reported through the model's
/// diagnostics; only I/O and parse errors surface here.
pub fn load_topology_file(path: &Path) -> Result<Topology> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read topology file {}", path.display()))?;
    let file: TopologyFile = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse topology file {}", path.display()))?;

    Ok(Topology::new(file.nodes, file.edges))
}

fn demo_node(id: &str, label: &str, role: NodeRole, status: NodeStatus, cpu: f64) -> TopologyNode {
    let mut metrics = BTreeMap::new();
    metrics.insert("cpu".to_owned(), cpu);
    metrics.insert("memory".to_owned(), (cpu * 1.3).min(97.0));
    TopologyNode {
        id: id.to_owned(),
        label: label.to_owned(),
        role,
        status,
        metrics,
    }
}

fn demo_edge(
    id: &str,
    source: &str,
    target: &str,
    status: EdgeStatus,
    bandwidth: f64,
    utilization: f64,
) -> TopologyEdge {
    TopologyEdge {
        id: id.to_owned(),
        source: source.to_owned(),
        target: target.to_owned(),
        directed: false,
        status,
        bandwidth: Some(bandwidth),
        utilization: Some(utilization),
    }
}

/// Small built-in network used when no topology file is supplied, so the
/// viewer is runnable out of the box.
pub fn demo_topology() -> Topology {
    let nodes = vec![
        demo_node("edge-fw", "Edge Firewall", NodeRole::Firewall, NodeStatus::Up, 34.0),
        demo_node("core-rtr-1", "Core Router 1", NodeRole::Router, NodeStatus::Up, 52.0),
        demo_node("core-rtr-2", "Core Router 2", NodeRole::Router, NodeStatus::Warning, 81.0),
        demo_node("dist-sw-1", "Dist Switch 1", NodeRole::Switch, NodeStatus::Up, 23.0),
        demo_node("dist-sw-2", "Dist Switch 2", NodeRole::Switch, NodeStatus::Up, 18.0),
        demo_node("srv-web", "Web Server", NodeRole::Server, NodeStatus::Up, 61.0),
        demo_node("srv-db", "DB Server", NodeRole::Server, NodeStatus::Down, 0.0),
        demo_node("ap-floor2", "AP Floor 2", NodeRole::Ap, NodeStatus::Up, 12.0),
        demo_node("ap-floor3", "AP Floor 3", NodeRole::Ap, NodeStatus::Unknown, 0.0),
    ];

    let edges = vec![
        demo_edge("l1", "edge-fw", "core-rtr-1", EdgeStatus::Up, 10_000.0, 41.0),
        demo_edge("l2", "edge-fw", "core-rtr-2", EdgeStatus::Degraded, 10_000.0, 88.0),
        demo_edge("l3", "core-rtr-1", "core-rtr-2", EdgeStatus::Up, 40_000.0, 17.0),
        demo_edge("l4", "core-rtr-1", "dist-sw-1", EdgeStatus::Up, 1_000.0, 35.0),
        demo_edge("l5", "core-rtr-2", "dist-sw-2", EdgeStatus::Up, 1_000.0, 52.0),
        demo_edge("l6", "dist-sw-1", "srv-web", EdgeStatus::Up, 1_000.0, 64.0),
        demo_edge("l7", "dist-sw-1", "srv-db", EdgeStatus::Down, 1_000.0, 0.0),
        demo_edge("l8", "dist-sw-2", "ap-floor2", EdgeStatus::Up, 100.0, 29.0),
        demo_edge("l9", "dist-sw-2", "ap-floor3", EdgeStatus::Up, 100.0, 8.0),
    ];

    Topology::new(nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_topology_is_clean() {
        let topology = demo_topology();
        assert_eq!(topology.node_count(), 9);
        assert_eq!(topology.edge_count(), 9);
        assert!(topology.diagnostics.is_empty());
    }

    #[test]
    fn topology_file_parses_with_defaults() {
        let raw = r#"{
            "nodes": [
                {"id": "a", "label": "A", "role": "router", "status": "up"},
                {"id": "b", "label": "B"}
            ],
            "edges": [
                {"id": "e1", "source": "a", "target": "b", "bandwidth": 1000}
            ]
        }"#;
        let file: TopologyFile = serde_json::from_str(raw).unwrap();
        let topology = Topology::new(file.nodes, file.edges);

        assert_eq!(topology.node_count(), 2);
        assert_eq!(topology.nodes[1].role, NodeRole::Generic);
        assert_eq!(topology.nodes[1].status, NodeStatus::Unknown);
        assert_eq!(topology.edges[0].bandwidth, Some(1000.0));
        assert!(!topology.edges[0].directed);
    }

    #[test]
    fn unknown_role_falls_back_to_generic() {
        let raw = r#"{"id": "x", "label": "X", "role": "toaster"}"#;
        let node: TopologyNode = serde_json::from_str(raw).unwrap();
        assert_eq!(node.role, NodeRole::Generic);
    }
}
