mod forces;

use eframe::egui::Vec2;

use forces::{
    accumulate_centering, accumulate_collisions, accumulate_repulsion, accumulate_springs,
};

/// Target separation for linked nodes, in model units.
pub(in crate::app) const LINK_DISTANCE: f32 = 150.0;
/// Pairwise repulsion magnitude; force = strength / distance². Sized so that
/// repulsion at the link distance is a meaningful fraction of spring force,
/// which is what spreads unlinked chain ends apart.
pub(in crate::app) const REPULSION_STRENGTH: f32 = 10_000.0;
pub(in crate::app) const SPRING_STRENGTH: f32 = 0.3;
pub(in crate::app) const CENTER_STRENGTH: f32 = 0.05;
/// Glyph collision radius, in model units.
pub(in crate::app) const COLLISION_RADIUS: f32 = 40.0;
pub(in crate::app) const COLLISION_STRENGTH: f32 = 0.5;
pub(in crate::app) const VELOCITY_DAMPING: f32 = 0.6;
const MAX_SPEED: f32 = 60.0;

pub(in crate::app) const ALPHA_INITIAL: f32 = 1.0;
/// Alpha multiplies by (1 - cooling) per step; from 1.0 this crosses
/// ALPHA_MIN within 300 steps.
pub(in crate::app) const ALPHA_COOLING: f32 = 0.028;
pub(in crate::app) const ALPHA_MIN: f32 = 0.001;
/// Floor alpha is reheated to while a drag is in progress.
pub(in crate::app) const ALPHA_DRAG: f32 = 0.3;

/// Kinematic record for one node. `pin` overrides the integrator while set:
/// the node is held at the pinned position with zero velocity until released.
#[derive(Clone, Debug)]
pub(in crate::app) struct SimNode {
    pub(in crate::app) pos: Vec2,
    pub(in crate::app) vel: Vec2,
    pub(in crate::app) pin: Option<Vec2>,
    pub(in crate::app) radius: f32,
}

impl SimNode {
    pub(in crate::app) fn at(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            pin: None,
            radius: COLLISION_RADIUS,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct SimEdge {
    pub(in crate::app) source: usize,
    pub(in crate::app) target: usize,
    /// Spring strength multiplier derived from link bandwidth.
    pub(in crate::app) weight: f32,
}

/// The mutable working set of the layout: one kinematic record per node and
/// the cooling temperature. Owned by the frame loop; the drag handler is the
/// only other writer and runs on the same thread between steps.
#[derive(Clone, Debug)]
pub(in crate::app) struct SimGraph {
    pub(in crate::app) nodes: Vec<SimNode>,
    pub(in crate::app) edges: Vec<SimEdge>,
    pub(in crate::app) alpha: f32,
    pub(in crate::app) center: Vec2,
    forces: Vec<Vec2>,
}

impl SimGraph {
    pub(in crate::app) fn new(nodes: Vec<SimNode>, edges: Vec<SimEdge>, center: Vec2) -> Self {
        // An empty layout has nothing to settle; start it idle.
        let alpha = if nodes.is_empty() { 0.0 } else { ALPHA_INITIAL };
        Self {
            nodes,
            edges,
            alpha,
            center,
            forces: Vec::new(),
        }
    }

    pub(in crate::app) fn is_idle(&self) -> bool {
        self.alpha < ALPHA_MIN
    }

    /// Raises alpha back to at least the drag floor. The only operation that
    /// ever increases alpha.
    pub(in crate::app) fn reheat(&mut self) {
        self.alpha = self.alpha.max(ALPHA_DRAG);
    }

    pub(in crate::app) fn pin(&mut self, index: usize, pos: Vec2) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = Some(pos);
        }
    }

    pub(in crate::app) fn release(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = None;
        }
    }

    /// One integration step: accumulate forces, scale by alpha, integrate
    /// with damping, snap pinned nodes, decay alpha. Returns false once the
    /// layout is converged, at which point calling again is a no-op.
    pub(in crate::app) fn step(&mut self) -> bool {
        if self.is_idle() || self.nodes.is_empty() {
            return false;
        }

        self.forces.clear();
        self.forces.resize(self.nodes.len(), Vec2::ZERO);

        accumulate_repulsion(&self.nodes, &mut self.forces);
        accumulate_springs(&self.nodes, &self.edges, &mut self.forces);
        accumulate_centering(&self.nodes, self.center, &mut self.forces);
        accumulate_collisions(&self.nodes, &mut self.forces);

        let alpha = self.alpha;
        for (node, force) in self.nodes.iter_mut().zip(&self.forces) {
            if let Some(pin) = node.pin {
                node.pos = pin;
                node.vel = Vec2::ZERO;
                continue;
            }

            let mut vel = (node.vel + *force * alpha) * VELOCITY_DAMPING;
            let speed_sq = vel.length_sq();
            if speed_sq > MAX_SPEED * MAX_SPEED {
                vel *= MAX_SPEED / speed_sq.sqrt();
            }

            node.vel = vel;
            node.pos += vel;
        }

        self.alpha *= 1.0 - ALPHA_COOLING;
        true
    }
}
