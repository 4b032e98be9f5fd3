mod analysis;
mod app;
mod color;
mod config;
mod data;
mod report;
mod state;
mod ui;

use app::TitanicExplorerApp;
use config::AppConfig;
use eframe::egui;

/// Illustrations shown next to the analyses; all optional.
const IMAGES: [&str; 5] = [
    "titanic.jpg",
    "titanic_classes.jpg",
    "titanic_route.png",
    "titanic_captain.jpg",
    "titanic_door.jpg",
];

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load();
    for name in IMAGES {
        if let Err(warning) = config::image_source(&config.image(name)) {
            log::warn!("{warning}");
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Titanic Explorer",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render png/jpg from disk.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(TitanicExplorerApp::new(config)))
        }),
    )
}
