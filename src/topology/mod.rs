mod load;

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

pub use load::{demo_topology, load_topology_file};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Router,
    Switch,
    Firewall,
    Server,
    #[serde(alias = "access-point")]
    Ap,
    #[serde(other)]
    Generic,
}

impl NodeRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Router => "router",
            Self::Switch => "switch",
            Self::Firewall => "firewall",
            Self::Server => "server",
            Self::Ap => "access point",
            Self::Generic => "generic",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Up,
    Down,
    Warning,
    #[serde(other)]
    Unknown,
}

impl NodeStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Warning => "warning",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStatus {
    Up,
    Down,
    Degraded,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TopologyNode {
    pub id: String,
    pub label: String,
    #[serde(default = "default_role")]
    pub role: NodeRole,
    #[serde(default = "default_status")]
    pub status: NodeStatus,
    /// Arbitrary numeric metrics keyed by name (cpu, memory, utilization, ...).
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

fn default_role() -> NodeRole {
    NodeRole::Generic
}

fn default_status() -> NodeStatus {
    NodeStatus::Unknown
}

#[derive(Clone, Debug, Deserialize)]
pub struct TopologyEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub directed: bool,
    #[serde(default = "default_edge_status")]
    pub status: EdgeStatus,
    /// Link capacity in Mbps; drives stroke width and spring weight.
    pub bandwidth: Option<f64>,
    /// Current utilization percentage in [0, 100].
    pub utilization: Option<f64>,
}

fn default_edge_status() -> EdgeStatus {
    EdgeStatus::Up
}

/// Why a piece of input was dropped during validation. Also emitted as a
/// `tracing::warn!` event at build time; retained here so the UI can surface
/// a count without re-parsing logs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    DuplicateNodeId { id: String },
    DanglingEdge { edge_id: String, missing: String },
    SelfLoopEdge { edge_id: String },
}

impl Diagnostic {
    pub fn describe(&self) -> String {
        match self {
            Self::DuplicateNodeId { id } => format!("duplicate node id dropped: {id}"),
            Self::DanglingEdge { edge_id, missing } => {
                format!("edge {edge_id} dropped: unknown endpoint {missing}")
            }
            Self::SelfLoopEdge { edge_id } => format!("edge {edge_id} dropped: self loop"),
        }
    }
}

/// Normalized, validated node/edge sets with derived adjacency. Built once
/// per input change; the simulation holds its own kinematic state seeded
/// from the node order here.
#[derive(Clone, Debug, Default)]
pub struct Topology {
    pub nodes: Vec<TopologyNode>,
    pub edges: Vec<TopologyEdge>,
    pub index_by_id: HashMap<String, usize>,
    /// Undirected neighbor lists, indexed in parallel with `nodes`.
    pub neighbors: Vec<Vec<usize>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Topology {
    pub fn new(nodes: Vec<TopologyNode>, edges: Vec<TopologyEdge>) -> Self {
        let mut diagnostics = Vec::new();

        let mut kept_nodes: Vec<TopologyNode> = Vec::with_capacity(nodes.len());
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if index_by_id.contains_key(&node.id) {
                tracing::warn!(id = %node.id, "duplicate node id dropped");
                diagnostics.push(Diagnostic::DuplicateNodeId { id: node.id });
                continue;
            }
            index_by_id.insert(node.id.clone(), kept_nodes.len());
            kept_nodes.push(node);
        }

        let mut kept_edges: Vec<TopologyEdge> = Vec::with_capacity(edges.len());
        let mut neighbors = vec![Vec::new(); kept_nodes.len()];
        for edge in edges {
            let source = index_by_id.get(&edge.source).copied();
            let target = index_by_id.get(&edge.target).copied();
            let (Some(source), Some(target)) = (source, target) else {
                let missing = if source.is_none() {
                    edge.source.clone()
                } else {
                    edge.target.clone()
                };
                tracing::warn!(edge = %edge.id, %missing, "edge dropped: unknown endpoint");
                diagnostics.push(Diagnostic::DanglingEdge {
                    edge_id: edge.id,
                    missing,
                });
                continue;
            };

            if source == target {
                tracing::warn!(edge = %edge.id, "edge dropped: self loop");
                diagnostics.push(Diagnostic::SelfLoopEdge { edge_id: edge.id });
                continue;
            }

            neighbors[source].push(target);
            neighbors[target].push(source);
            kept_edges.push(edge);
        }

        Self {
            nodes: kept_nodes,
            edges: kept_edges,
            index_by_id,
            neighbors,
            diagnostics,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Endpoint indices for a kept edge. Always valid by construction.
    pub fn edge_endpoints(&self, edge: &TopologyEdge) -> (usize, usize) {
        (
            self.index_by_id[&edge.source],
            self.index_by_id[&edge.target],
        )
    }

    pub fn status_counts(&self) -> (usize, usize, usize, usize) {
        let mut counts = (0, 0, 0, 0);
        for node in &self.nodes {
            match node.status {
                NodeStatus::Up => counts.0 += 1,
                NodeStatus::Warning => counts.1 += 1,
                NodeStatus::Down => counts.2 += 1,
                NodeStatus::Unknown => counts.3 += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> TopologyNode {
        TopologyNode {
            id: id.to_owned(),
            label: id.to_uppercase(),
            role: NodeRole::Generic,
            status: NodeStatus::Up,
            metrics: BTreeMap::new(),
        }
    }

    fn edge(id: &str, source: &str, target: &str) -> TopologyEdge {
        TopologyEdge {
            id: id.to_owned(),
            source: source.to_owned(),
            target: target.to_owned(),
            directed: false,
            status: EdgeStatus::Up,
            bandwidth: None,
            utilization: None,
        }
    }

    #[test]
    fn dangling_edge_is_dropped_with_diagnostic() {
        let topology = Topology::new(
            vec![node("a"), node("b")],
            vec![edge("e1", "a", "b"), edge("e2", "a", "ghost")],
        );

        assert_eq!(topology.edge_count(), 1);
        assert_eq!(
            topology.diagnostics,
            vec![Diagnostic::DanglingEdge {
                edge_id: "e2".to_owned(),
                missing: "ghost".to_owned(),
            }]
        );
    }

    #[test]
    fn duplicate_node_id_keeps_first_occurrence() {
        let mut second = node("a");
        second.label = "SECOND".to_owned();
        let topology = Topology::new(vec![node("a"), second, node("b")], Vec::new());

        assert_eq!(topology.node_count(), 2);
        assert_eq!(topology.nodes[0].label, "A");
        assert!(matches!(
            topology.diagnostics.as_slice(),
            [Diagnostic::DuplicateNodeId { id }] if id == "a"
        ));
    }

    #[test]
    fn self_loop_is_dropped() {
        let topology = Topology::new(vec![node("a")], vec![edge("e1", "a", "a")]);
        assert_eq!(topology.edge_count(), 0);
        assert!(matches!(
            topology.diagnostics.as_slice(),
            [Diagnostic::SelfLoopEdge { edge_id }] if edge_id == "e1"
        ));
    }

    #[test]
    fn parallel_edges_are_kept() {
        let topology = Topology::new(
            vec![node("a"), node("b")],
            vec![edge("e1", "a", "b"), edge("e2", "a", "b")],
        );
        assert_eq!(topology.edge_count(), 2);
        assert!(topology.diagnostics.is_empty());
    }

    #[test]
    fn adjacency_is_undirected() {
        let topology = Topology::new(
            vec![node("a"), node("b"), node("c")],
            vec![edge("e1", "a", "b"), edge("e2", "b", "c")],
        );
        assert_eq!(topology.neighbors[0], vec![1]);
        assert_eq!(topology.neighbors[1], vec![0, 2]);
        assert_eq!(topology.neighbors[2], vec![1]);
    }
}
