mod app;
mod topology;
mod util;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::{NodeSelectionListener, TopoApp, TopologySource};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Topology JSON file; the built-in demo network is used when omitted.
    #[arg(long)]
    topology: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let source = args
        .topology
        .map(TopologySource::File)
        .unwrap_or(TopologySource::Demo);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "topomap",
        options,
        Box::new(move |cc| {
            let on_select: NodeSelectionListener = Box::new(|node| {
                tracing::info!(
                    id = %node.id,
                    label = %node.label,
                    status = node.status.label(),
                    "node selected"
                );
            });
            Ok(Box::new(TopoApp::new(cc, source.clone(), Some(on_select))))
        }),
    )
}
