use std::collections::HashSet;

use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2, pos2};

use crate::topology::{EdgeStatus, NodeRole, NodeStatus, Topology};
use crate::util::format_percent;

use super::camera::Camera;
use super::physics::SimGraph;

const NODE_DRAW_RADIUS: f32 = 25.0;
const ARROW_SIZE: f32 = 9.0;

pub(in crate::app) fn status_color(status: NodeStatus) -> Color32 {
    match status {
        NodeStatus::Up => Color32::from_rgb(0x10, 0xb9, 0x81),
        NodeStatus::Down => Color32::from_rgb(0xef, 0x44, 0x44),
        NodeStatus::Warning => Color32::from_rgb(0xf5, 0x9e, 0x0b),
        NodeStatus::Unknown => Color32::from_rgb(0x6b, 0x72, 0x80),
    }
}

pub(in crate::app) fn edge_status_color(status: EdgeStatus) -> Color32 {
    match status {
        EdgeStatus::Up => Color32::from_rgb(0x10, 0xb9, 0x81),
        EdgeStatus::Down => Color32::from_rgb(0xef, 0x44, 0x44),
        EdgeStatus::Degraded => Color32::from_rgb(0xf5, 0x9e, 0x0b),
    }
}

fn role_tag(role: NodeRole) -> &'static str {
    match role {
        NodeRole::Router => "RTR",
        NodeRole::Switch => "SW",
        NodeRole::Firewall => "FW",
        NodeRole::Server => "SRV",
        NodeRole::Ap => "AP",
        NodeRole::Generic => "NET",
    }
}

/// Stroke width from link bandwidth (Mbps), sqrt-scaled the way the source
/// dashboard drew it, then scaled with zoom.
fn edge_stroke_width(bandwidth: Option<f64>, zoom: f32) -> f32 {
    let base = (bandwidth.unwrap_or(1.0).max(1.0).sqrt() as f32) / 10.0 + 1.0;
    (base * zoom.sqrt()).clamp(0.6, 8.0)
}

pub(in crate::app) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(in crate::app) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;
    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

#[derive(Clone, Debug)]
pub(in crate::app) struct NodeGlyph {
    pub(in crate::app) index: usize,
    pub(in crate::app) center: Pos2,
    pub(in crate::app) radius: f32,
    pub(in crate::app) fill: Color32,
    pub(in crate::app) role_tag: &'static str,
    pub(in crate::app) label: String,
    pub(in crate::app) metric_text: Option<String>,
    pub(in crate::app) selected: bool,
    pub(in crate::app) pinned: bool,
}

#[derive(Clone, Debug)]
pub(in crate::app) struct EdgeLine {
    pub(in crate::app) start: Pos2,
    pub(in crate::app) end: Pos2,
    pub(in crate::app) width: f32,
    pub(in crate::app) color: Color32,
    /// Utilization percentage rendered at the midpoint.
    pub(in crate::app) label: Option<(Pos2, String)>,
    /// Arrowhead wing points for directed edges, already in screen space.
    pub(in crate::app) arrow: Option<[Pos2; 3]>,
}

/// Drawable scene description for one frame. Built fresh every tick from the
/// simulation's positions and the camera; holds no state of its own.
#[derive(Clone, Debug, Default)]
pub(in crate::app) struct Scene {
    pub(in crate::app) nodes: Vec<NodeGlyph>,
    pub(in crate::app) edges: Vec<EdgeLine>,
}

impl Scene {
    /// Topmost glyph under the pointer, nearest center wins.
    pub(in crate::app) fn hit_test(&self, pointer: Pos2) -> Option<usize> {
        self.nodes
            .iter()
            .filter_map(|glyph| {
                let distance = glyph.center.distance(pointer);
                (distance <= glyph.radius).then_some((glyph.index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}

fn arrowhead(start: Pos2, end: Pos2, target_radius: f32) -> Option<[Pos2; 3]> {
    let delta = end - start;
    let length = delta.length();
    if length <= target_radius + ARROW_SIZE {
        return None;
    }

    let direction = delta / length;
    let tip = end - direction * target_radius;
    let back = tip - direction * ARROW_SIZE;
    let normal = Vec2::new(-direction.y, direction.x) * (ARROW_SIZE * 0.5);
    Some([tip, back + normal, back - normal])
}

/// Pure mapping from (kinematic positions, camera, node/edge status + metric
/// data) to a drawable scene. Off-screen elements are culled.
pub(in crate::app) fn build_scene(
    sim: &SimGraph,
    topology: &Topology,
    camera: &Camera,
    rect: Rect,
    selected: Option<usize>,
    search_matches: Option<&HashSet<usize>>,
) -> Scene {
    let to_screen = |world: Vec2| -> Pos2 { rect.center() + camera.to_screen(world) };
    let node_radius = (NODE_DRAW_RADIUS * camera.zoom).clamp(4.0, 75.0);

    let mut scene = Scene::default();

    for (edge, sim_edge) in topology.edges.iter().zip(&sim.edges) {
        let start = to_screen(sim.nodes[sim_edge.source].pos);
        let end = to_screen(sim.nodes[sim_edge.target].pos);
        if !edge_visible(rect, start, end, 4.0) {
            continue;
        }

        let label = edge.utilization.map(|utilization| {
            let mid = start + (end - start) * 0.5;
            (mid, format_percent(utilization))
        });
        let arrow = edge
            .directed
            .then(|| arrowhead(start, end, node_radius))
            .flatten();

        scene.edges.push(EdgeLine {
            start,
            end,
            width: edge_stroke_width(edge.bandwidth, camera.zoom),
            color: edge_status_color(edge.status),
            label,
            arrow,
        });
    }

    for (index, (node, sim_node)) in topology.nodes.iter().zip(&sim.nodes).enumerate() {
        let center = to_screen(sim_node.pos);
        if !circle_visible(rect, center, node_radius + 4.0) {
            continue;
        }

        let mut fill = status_color(node.status);
        if let Some(matches) = search_matches {
            if matches.contains(&index) {
                fill = blend_color(fill, Color32::from_rgb(0x67, 0xc4, 0xff), 0.45);
            } else {
                fill = dim_color(fill, 0.35);
            }
        }

        let metric_text = node
            .metrics
            .get("cpu")
            .map(|cpu| format!("CPU {}", format_percent(*cpu)));

        scene.nodes.push(NodeGlyph {
            index,
            center,
            radius: node_radius,
            fill,
            role_tag: role_tag(node.role),
            label: node.label.clone(),
            metric_text,
            selected: selected == Some(index),
            pinned: sim_node.pin.is_some(),
        });
    }

    scene
}

pub(in crate::app) fn draw_background(painter: &Painter, rect: Rect, camera: &Camera) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * camera.zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + camera.pan;

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [pos2(x, rect.top()), pos2(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [pos2(rect.left(), y), pos2(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        y += step;
    }
}

pub(in crate::app) fn paint_scene(painter: &Painter, scene: &Scene, hovered: Option<usize>) {
    for edge in &scene.edges {
        painter.line_segment([edge.start, edge.end], Stroke::new(edge.width, edge.color));
        if let Some(arrow) = edge.arrow {
            painter.add(eframe::egui::Shape::convex_polygon(
                arrow.to_vec(),
                edge.color,
                Stroke::NONE,
            ));
        }
        if let Some((position, text)) = &edge.label {
            painter.text(
                *position,
                Align2::CENTER_CENTER,
                text,
                FontId::proportional(10.0),
                Color32::from_gray(150),
            );
        }
    }

    for glyph in &scene.nodes {
        let is_hovered = hovered == Some(glyph.index);
        let fill = if is_hovered {
            blend_color(glyph.fill, Color32::WHITE, 0.18)
        } else {
            glyph.fill
        };

        painter.circle_filled(glyph.center, glyph.radius, fill);

        let (stroke_width, stroke_color) = if glyph.selected {
            (3.0, Color32::from_rgb(245, 206, 93))
        } else {
            (2.0, Color32::from_gray(250))
        };
        painter.circle_stroke(glyph.center, glyph.radius, Stroke::new(stroke_width, stroke_color));

        if glyph.pinned {
            painter.circle_stroke(
                glyph.center,
                glyph.radius + 4.0,
                Stroke::new(1.2, Color32::from_rgba_unmultiplied(245, 206, 93, 160)),
            );
        }

        painter.text(
            glyph.center,
            Align2::CENTER_CENTER,
            glyph.role_tag,
            FontId::monospace((glyph.radius * 0.55).clamp(7.0, 16.0)),
            Color32::WHITE,
        );
        painter.text(
            glyph.center + Vec2::new(0.0, glyph.radius + 11.0),
            Align2::CENTER_CENTER,
            &glyph.label,
            FontId::proportional(12.0),
            Color32::from_gray(238),
        );
        if let Some(metric) = &glyph.metric_text {
            painter.text(
                glyph.center + Vec2::new(0.0, glyph.radius + 24.0),
                Align2::CENTER_CENTER,
                metric,
                FontId::proportional(10.0),
                Color32::from_gray(160),
            );
        }
    }
}
