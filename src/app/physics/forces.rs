use eframe::egui::{Vec2, vec2};

use super::{
    CENTER_STRENGTH, COLLISION_STRENGTH, LINK_DISTANCE, REPULSION_STRENGTH, SPRING_STRENGTH,
    SimEdge, SimNode,
};

const MIN_DISTANCE: f32 = 0.0001;

/// Deterministic separation direction for coincident node pairs, so a
/// zero-distance force never divides by zero and repeated runs agree.
fn jitter_direction(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

fn separation(from: usize, to: usize, delta: Vec2) -> (f32, Vec2) {
    let distance = delta.length();
    if distance > MIN_DISTANCE {
        (distance, delta / distance)
    } else {
        (MIN_DISTANCE, jitter_direction(from, to))
    }
}

/// Pairwise repulsion, inversely proportional to squared distance. Quadratic
/// in node count; fine at dashboard scale (tens of nodes).
pub(super) fn accumulate_repulsion(nodes: &[SimNode], forces: &mut [Vec2]) {
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let (distance, direction) = separation(i, j, nodes[i].pos - nodes[j].pos);
            let magnitude = REPULSION_STRENGTH / (distance * distance).max(1.0);
            forces[i] += direction * magnitude;
            forces[j] -= direction * magnitude;
        }
    }
}

/// Spring per edge pulling its endpoints toward the target link distance,
/// scaled by the edge's bandwidth weight.
pub(super) fn accumulate_springs(nodes: &[SimNode], edges: &[SimEdge], forces: &mut [Vec2]) {
    for edge in edges {
        let (from, to) = (edge.source, edge.target);
        if from >= nodes.len() || to >= nodes.len() {
            continue;
        }

        let (distance, direction) = separation(from, to, nodes[from].pos - nodes[to].pos);
        let correction = direction * (distance - LINK_DISTANCE) * SPRING_STRENGTH * edge.weight;
        forces[from] -= correction;
        forces[to] += correction;
    }
}

/// Uniform pull of the layout centroid toward the configured center. Applied
/// identically to every node, so it translates the layout without distorting
/// inter-node distances.
pub(super) fn accumulate_centering(nodes: &[SimNode], center: Vec2, forces: &mut [Vec2]) {
    if nodes.is_empty() {
        return;
    }

    let mut centroid = Vec2::ZERO;
    for node in nodes {
        centroid += node.pos;
    }
    centroid /= nodes.len() as f32;

    let pull = (center - centroid) * CENTER_STRENGTH;
    for force in forces.iter_mut() {
        *force += pull;
    }
}

/// Pushes overlapping glyph circles apart, proportional to overlap depth.
pub(super) fn accumulate_collisions(nodes: &[SimNode], forces: &mut [Vec2]) {
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let min_distance = nodes[i].radius + nodes[j].radius;
            let (distance, direction) = separation(i, j, nodes[i].pos - nodes[j].pos);
            if distance < min_distance {
                let push = (min_distance - distance) * COLLISION_STRENGTH;
                forces[i] += direction * push;
                forces[j] -= direction * push;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repulsion_pushes_pairs_apart() {
        let nodes = vec![SimNode::at(vec2(-10.0, 0.0)), SimNode::at(vec2(10.0, 0.0))];
        let mut forces = vec![Vec2::ZERO; 2];
        accumulate_repulsion(&nodes, &mut forces);

        assert!(forces[0].x < 0.0);
        assert!(forces[1].x > 0.0);
        assert_eq!(forces[0], -forces[1]);
    }

    #[test]
    fn spring_pulls_stretched_edge_together() {
        let nodes = vec![
            SimNode::at(vec2(0.0, 0.0)),
            SimNode::at(vec2(LINK_DISTANCE * 2.0, 0.0)),
        ];
        let edges = vec![SimEdge {
            source: 0,
            target: 1,
            weight: 1.0,
        }];
        let mut forces = vec![Vec2::ZERO; 2];
        accumulate_springs(&nodes, &edges, &mut forces);

        assert!(forces[0].x > 0.0);
        assert!(forces[1].x < 0.0);
    }

    #[test]
    fn spring_pushes_compressed_edge_apart() {
        let nodes = vec![
            SimNode::at(vec2(0.0, 0.0)),
            SimNode::at(vec2(LINK_DISTANCE * 0.25, 0.0)),
        ];
        let edges = vec![SimEdge {
            source: 0,
            target: 1,
            weight: 1.0,
        }];
        let mut forces = vec![Vec2::ZERO; 2];
        accumulate_springs(&nodes, &edges, &mut forces);

        assert!(forces[0].x < 0.0);
        assert!(forces[1].x > 0.0);
    }

    #[test]
    fn centering_moves_every_node_identically() {
        let nodes = vec![SimNode::at(vec2(100.0, 40.0)), SimNode::at(vec2(300.0, 40.0))];
        let mut forces = vec![Vec2::ZERO; 2];
        accumulate_centering(&nodes, Vec2::ZERO, &mut forces);

        assert_eq!(forces[0], forces[1]);
        assert!(forces[0].x < 0.0, "centroid sits right of center");
    }

    #[test]
    fn collision_only_acts_on_overlap() {
        let apart = vec![SimNode::at(vec2(0.0, 0.0)), SimNode::at(vec2(500.0, 0.0))];
        let mut forces = vec![Vec2::ZERO; 2];
        accumulate_collisions(&apart, &mut forces);
        assert_eq!(forces, vec![Vec2::ZERO; 2]);

        let overlapping = vec![SimNode::at(vec2(0.0, 0.0)), SimNode::at(vec2(20.0, 0.0))];
        let mut forces = vec![Vec2::ZERO; 2];
        accumulate_collisions(&overlapping, &mut forces);
        assert!(forces[0].x < 0.0);
        assert!(forces[1].x > 0.0);
    }

    #[test]
    fn coincident_pair_gets_deterministic_jitter() {
        let nodes = vec![SimNode::at(Vec2::ZERO), SimNode::at(Vec2::ZERO)];
        let mut first = vec![Vec2::ZERO; 2];
        let mut second = vec![Vec2::ZERO; 2];
        accumulate_repulsion(&nodes, &mut first);
        accumulate_repulsion(&nodes, &mut second);

        assert_eq!(first, second);
        assert!(first[0].length() > 0.0);
        assert!(first[0].x.is_finite() && first[0].y.is_finite());
    }
}
