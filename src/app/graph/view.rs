use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::util::format_percent;

use super::super::ViewModel;
use super::super::render::{build_scene, draw_background, paint_scene};

impl ViewModel {
    fn search_matches(&self) -> Option<HashSet<usize>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let matcher = SkimMatcherV2::default();
        Some(
            self.topology
                .nodes
                .iter()
                .enumerate()
                .filter_map(|(index, node)| {
                    matcher
                        .fuzzy_match(&node.label, query)
                        .or_else(|| matcher.fuzzy_match(&node.id, query))
                        .map(|_| index)
                })
                .collect(),
        )
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, &self.camera);
        self.handle_zoom(ui, rect, &response);

        if self.live_physics {
            self.sim.step();
        }

        let matches = self.search_matches();
        let scene = build_scene(
            &self.sim,
            &self.topology,
            &self.camera,
            rect,
            self.selected,
            matches.as_ref(),
        );

        let hovered = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|_| response.hovered())
            .and_then(|pointer| scene.hit_test(pointer));
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        // Pointer effects land in the camera and the simulation's pins; the
        // next step reads them. Same single thread, so no races to consider.
        self.handle_pointer(ui, rect, &response, &scene);

        if !self.sim.is_idle() || self.gesture.is_active() {
            ui.ctx().request_repaint();
        }

        paint_scene(&painter, &scene, hovered);

        if self.topology.node_count() == 0 {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No nodes in topology",
                FontId::proportional(14.0),
                Color32::from_gray(180),
            );
            return;
        }

        if let Some(index) = hovered
            && let Some(node) = self.topology.nodes.get(index)
        {
            let mut summary = format!("{}  |  {}  |  {}", node.label, node.role.label(), node.status.label());
            if let Some(cpu) = node.metrics.get("cpu") {
                summary.push_str(&format!("  |  cpu {}", format_percent(*cpu)));
            }
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                summary,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        painter.text(
            rect.right_bottom() + vec2(-10.0, -10.0),
            Align2::RIGHT_BOTTOM,
            format!("zoom {:.0}%", self.camera.zoom * 100.0),
            FontId::proportional(12.0),
            Color32::from_gray(170),
        );
    }
}
