mod app;
mod board;
mod command;
mod config;
mod panel;
mod render;

use anyhow::anyhow;
use eframe::egui;

use crate::config::BoardConfig;
use crate::render::Renderer;

const TITLE: &str = "Football Tactical Board";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = BoardConfig::load_or_default();
    log::info!(
        "starting with a {}x{} canvas",
        config.canvas_width,
        config.canvas_height
    );
    let renderer = Renderer::new(config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 860.0])
            .with_title(TITLE),
        ..Default::default()
    };

    eframe::run_native(
        TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(app::TacticalBoardApp::new(renderer)))),
    )
    .map_err(|err| anyhow!("failed to run eframe: {err}"))
}
