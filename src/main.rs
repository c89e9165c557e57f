#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    use std::path::Path;

    use eframe_pixel_paint::{PaintApp, PaintConfig};

    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    // Optional first argument: path to a JSON config file
    let config = match std::env::args_os().nth(1) {
        Some(path) => match PaintConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(err) => {
                log::error!("Falling back to the default config: {}", err);
                PaintConfig::default()
            }
        },
        None => PaintConfig::default(),
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1500.0, 1100.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Pixel Paint",
        native_options,
        Box::new(move |cc| Ok(Box::new(PaintApp::new(cc, config)?))),
    )
}

// The paint app only ships as a native binary
#[cfg(target_arch = "wasm32")]
fn main() {}
