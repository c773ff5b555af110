#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    use frame_annotator::{AnnotatorApp, EngineConfig, FrameInbox};

    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = match std::env::var_os("FRAME_ANNOTATOR_CONFIG") {
        Some(path) => EngineConfig::load(&path).unwrap_or_else(|err| {
            log::warn!("Ignoring config {:?}: {}", path, err);
            EngineConfig::default()
        }),
        None => EngineConfig::default(),
    };

    // An image path on the command line stands in for the camera feed
    let inbox = FrameInbox::new();
    if let Some(path) = std::env::args().nth(1) {
        let sender = inbox.sender();
        std::thread::spawn(move || match image::open(&path) {
            Ok(decoded) => {
                log::info!("📷 Loaded frame from {}", path);
                sender.send(decoded.to_rgba8());
            }
            Err(err) => log::warn!("Failed to open {}: {}", path, err),
        });
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Frame Annotator",
        native_options,
        Box::new(move |cc| Ok(Box::new(AnnotatorApp::new(cc, config, inbox)))),
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {}
