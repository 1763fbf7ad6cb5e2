use eframe::egui::{self, Align, Color32, Context, Layout, RichText, Ui, Vec2};

use crate::topology::NodeStatus;

use super::super::ViewModel;
use super::super::render::status_color;

const FPS_SAMPLE_WINDOW: usize = 180;
const ZOOM_BUTTON_FACTOR: f32 = 1.5;

impl ViewModel {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source_label: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.update_fps_counter(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("topomap");
                    ui.separator();
                    ui.label(format!("source: {source_label}"));
                    ui.label(format!("nodes: {}", self.topology.node_count()));
                    ui.label(format!("edges: {}", self.topology.edge_count()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload topology"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Loading topology...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }

    fn draw_controls(&mut self, ui: &mut Ui) {
        ui.add_space(6.0);
        ui.label("Search");
        ui.text_edit_singleline(&mut self.search);
        ui.add_space(8.0);

        ui.checkbox(&mut self.live_physics, "Live layout");
        ui.checkbox(&mut self.show_fps, "Show FPS");

        ui.add_space(8.0);
        ui.separator();
        ui.label("View");
        ui.horizontal(|ui| {
            if ui.button("Zoom in").clicked() {
                self.camera.zoom_by(ZOOM_BUTTON_FACTOR, Vec2::ZERO);
            }
            if ui.button("Zoom out").clicked() {
                self.camera.zoom_by(1.0 / ZOOM_BUTTON_FACTOR, Vec2::ZERO);
            }
            if ui.button("Reset view").clicked() {
                self.camera.reset();
            }
        });

        ui.add_space(8.0);
        ui.separator();
        ui.label("Status");
        let (up, warning, down, unknown) = self.topology.status_counts();
        legend_row(ui, NodeStatus::Up, up);
        legend_row(ui, NodeStatus::Warning, warning);
        legend_row(ui, NodeStatus::Down, down);
        legend_row(ui, NodeStatus::Unknown, unknown);

        if !self.topology.diagnostics.is_empty() {
            ui.add_space(8.0);
            ui.separator();
            ui.label(
                RichText::new(format!(
                    "{} input problem(s) dropped",
                    self.topology.diagnostics.len()
                ))
                .color(Color32::from_rgb(0xf5, 0x9e, 0x0b)),
            );
            for diagnostic in &self.topology.diagnostics {
                ui.small(diagnostic.describe());
            }
        }
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<usize>) {
        if self.selected == selected {
            return;
        }

        self.selected = selected;
        if let Some(index) = selected {
            self.pending_selection = Some(index);
        }
    }

    fn update_fps_counter(&mut self, ctx: &Context) {
        let dt = ctx.input(|input| input.stable_dt);
        if dt <= f32::EPSILON {
            return;
        }

        self.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
        self.fps_samples.push_back(self.fps_current);
        while self.fps_samples.len() > FPS_SAMPLE_WINDOW {
            self.fps_samples.pop_front();
        }
    }

    fn fps_display_text(&self) -> Option<String> {
        if !self.show_fps || self.fps_samples.is_empty() {
            return None;
        }

        let average = self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32;
        Some(format!("FPS {:.0} | avg {:.1}", self.fps_current, average))
    }
}

fn legend_row(ui: &mut Ui, status: NodeStatus, count: usize) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(10.0), egui::Sense::hover());
        ui.painter().circle_filled(rect.center(), 5.0, status_color(status));
        ui.label(format!("{} ({count})", status.label()));
    });
}
