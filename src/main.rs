mod app;
mod charts;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::Context;
use clap::Parser;
use eframe::egui;

use app::BattedBallApp;
use config::Args;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let source = args.data_source();
    log::info!(
        "Reading {} (sheet '{}', columns {})",
        source.path.display(),
        source.sheet,
        source.columns
    );

    // A file that cannot be loaded at startup leaves nothing to show.
    let mut state = AppState::new(source.clone());
    state
        .load(source.clone())
        .with_context(|| format!("loading {}", source.path.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 1000.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Baseball Assessment",
        options,
        Box::new(|_cc| Ok(Box::new(BattedBallApp { state }))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
