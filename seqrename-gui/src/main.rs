// Disable console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod picker;
mod session;

use app::SeqRenameApp;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init(); // Initialize logging

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 600.0])
            .with_min_inner_size([640.0, 420.0])
            .with_title("seqrename - Sequential File Renamer"),
        ..Default::default()
    };

    eframe::run_native(
        "seqrename",
        native_options,
        Box::new(|cc| Ok(Box::new(SeqRenameApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start the window: {}", e))
}
