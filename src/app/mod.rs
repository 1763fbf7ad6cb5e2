use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::topology::{Topology, TopologyNode, demo_topology, load_topology_file};

mod camera;
mod graph;
mod physics;
mod render;
mod ui;

use camera::Camera;
use graph::{Gesture, build_sim_graph};
use physics::SimGraph;

/// External consumer of node-selection events; invoked with the clicked
/// node's full record.
pub type NodeSelectionListener = Box<dyn FnMut(&TopologyNode)>;

#[derive(Clone, Debug)]
pub enum TopologySource {
    File(PathBuf),
    Demo,
}

impl TopologySource {
    fn label(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Demo => "built-in demo".to_owned(),
        }
    }
}

pub struct TopoApp {
    source: TopologySource,
    state: AppState,
    reload_rx: Option<Receiver<Result<Topology, String>>>,
    on_select: Option<NodeSelectionListener>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Topology, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

pub(crate) struct ViewModel {
    topology: Topology,
    sim: SimGraph,
    camera: Camera,
    gesture: Gesture,
    selected: Option<usize>,
    /// Selection events not yet delivered to the external listener.
    pending_selection: Option<usize>,
    search: String,
    live_physics: bool,
    show_fps: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

impl TopoApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: TopologySource,
        on_select: Option<NodeSelectionListener>,
    ) -> Self {
        let state = AppState::Loading {
            rx: Self::spawn_load(source.clone()),
        };
        Self {
            source,
            state,
            reload_rx: None,
            on_select,
        }
    }

    fn spawn_load(source: TopologySource) -> Receiver<Result<Topology, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = match source {
                TopologySource::File(path) => {
                    load_topology_file(&path).map_err(|error| format!("{error:#}"))
                }
                TopologySource::Demo => Ok(demo_topology()),
            };
            let _ = tx.send(result);
        });

        rx
    }

    fn deliver_selection_events(&mut self) {
        let AppState::Ready(model) = &mut self.state else {
            return;
        };
        if let Some(index) = model.pending_selection.take()
            && let Some(listener) = self.on_select.as_mut()
            && let Some(node) = model.topology.nodes.get(index)
        {
            listener(node);
        }
    }
}

impl eframe::App for TopoApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(topology) => AppState::Ready(Box::new(ViewModel::new(topology))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading topology...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                let source = self.source.clone();
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load topology");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(AppState::Loading {
                            rx: Self::spawn_load(source),
                        });
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.source.label(), &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(topology) => {
                                    AppState::Ready(Box::new(ViewModel::new(topology)))
                                }
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }

        self.deliver_selection_events();
    }
}

impl ViewModel {
    fn new(topology: Topology) -> Self {
        let sim = build_sim_graph(&topology);
        Self {
            topology,
            sim,
            camera: Camera::default(),
            gesture: Gesture::Idle,
            selected: None,
            pending_selection: None,
            search: String::new(),
            live_physics: true,
            show_fps: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }
}
