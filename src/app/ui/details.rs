use eframe::egui::{self, Color32, RichText, Ui};

use crate::util::format_bandwidth;

use super::super::ViewModel;
use super::super::render::{edge_status_color, status_color};

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.add_space(6.0);

        let Some(index) = self.selected else {
            ui.label("Click a node to inspect it.");
            return;
        };
        let Some(node) = self.topology.nodes.get(index) else {
            // Selection can outlive a reload that shrank the node set.
            self.selected = None;
            return;
        };

        ui.heading(&node.label);
        ui.horizontal(|ui| {
            ui.label("status:");
            ui.label(
                RichText::new(node.status.label())
                    .color(status_color(node.status))
                    .strong(),
            );
        });
        ui.label(format!("role: {}", node.role.label()));
        ui.label(format!("id: {}", node.id));

        if !node.metrics.is_empty() {
            ui.add_space(8.0);
            ui.separator();
            ui.label("Metrics");
            egui::Grid::new("node_metrics").striped(true).show(ui, |ui| {
                for (name, value) in &node.metrics {
                    ui.label(name);
                    ui.label(format!("{value:.1}"));
                    ui.end_row();
                }
            });
        }

        let links: Vec<usize> = self
            .topology
            .edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| {
                let (source, target) = self.topology.edge_endpoints(edge);
                source == index || target == index
            })
            .map(|(edge_index, _)| edge_index)
            .collect();

        if !links.is_empty() {
            ui.add_space(8.0);
            ui.separator();
            ui.label("Links");
            let mut next_selection = None;
            for edge_index in links {
                let edge = &self.topology.edges[edge_index];
                let (source, target) = self.topology.edge_endpoints(edge);
                let peer = if source == index { target } else { source };
                let peer_label = self
                    .topology
                    .nodes
                    .get(peer)
                    .map(|n| n.label.as_str())
                    .unwrap_or("?");

                ui.horizontal(|ui| {
                    let (rect, _) =
                        ui.allocate_exact_size(egui::Vec2::splat(8.0), egui::Sense::hover());
                    ui.painter()
                        .circle_filled(rect.center(), 4.0, edge_status_color(edge.status));
                    if ui.link(peer_label).clicked() {
                        next_selection = Some(peer);
                    }
                    if let Some(bandwidth) = edge.bandwidth {
                        ui.label(
                            RichText::new(format_bandwidth(bandwidth))
                                .color(Color32::from_gray(150))
                                .small(),
                        );
                    }
                });
            }
            if next_selection.is_some() {
                self.set_selected(next_selection);
            }
        }
    }
}
