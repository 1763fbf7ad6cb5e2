use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use crate::topology::Topology;
use crate::util::stable_pair;

use super::super::physics::{LINK_DISTANCE, SimEdge, SimGraph, SimNode};

const SEED_JITTER: f32 = 12.0;

/// Spring weight from link bandwidth (Mbps), sqrt-normalized around 1 Gbps
/// so a fat trunk pulls harder than an access link without dominating.
fn edge_weight(bandwidth: Option<f64>) -> f32 {
    match bandwidth {
        Some(mbps) if mbps > 0.0 => ((mbps / 1000.0).sqrt() as f32).clamp(0.5, 2.0),
        _ => 1.0,
    }
}

/// Deterministic circle seeding: order-indexed angle plus a small id-hash
/// jitter to break ties, radius growing with node count so dense topologies
/// start spread out.
fn seed_position(id: &str, index: usize, count: usize) -> Vec2 {
    let radius = LINK_DISTANCE * (count.max(1) as f32).sqrt().max(1.2) / 1.2;
    let angle = (index as f32 / count.max(1) as f32) * TAU;
    let (jx, jy) = stable_pair(id);
    vec2(angle.cos(), angle.sin()) * radius + vec2(jx, jy) * SEED_JITTER
}

/// Seeds a fresh simulation working set from a validated topology. Edge
/// endpoints are resolved to node indices; dangling edges were already
/// dropped during model validation.
pub(in crate::app) fn build_sim_graph(topology: &Topology) -> SimGraph {
    let count = topology.node_count();
    let nodes = topology
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| SimNode::at(seed_position(&node.id, index, count)))
        .collect::<Vec<_>>();

    let edges = topology
        .edges
        .iter()
        .map(|edge| {
            let (source, target) = topology.edge_endpoints(edge);
            // Normalizing by the smaller endpoint degree keeps the summed
            // spring stiffness on hub nodes bounded, so dense stars do not
            // oscillate while the layout is hot.
            let min_degree = topology.neighbors[source]
                .len()
                .min(topology.neighbors[target].len())
                .max(1);
            SimEdge {
                source,
                target,
                weight: edge_weight(edge.bandwidth) / min_degree as f32,
            }
        })
        .collect::<Vec<_>>();

    SimGraph::new(nodes, edges, Vec2::ZERO)
}
