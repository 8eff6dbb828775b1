use xr_window_manager::desktop::{self, DesktopWindows, GdiWindowCapture};
use xr_window_manager::gui::DesktopApp;
use xr_window_manager::logging;
use xr_window_manager::manager::WindowManager;
use xr_window_manager::settings::{Settings, SETTINGS_FILE};
use xr_window_manager::source::UnavailableBrowserEngine;

use eframe::egui;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(SETTINGS_FILE)?;
    logging::init(settings.debug_logging, Some(settings.log_file_path()));
    tracing::info!("starting xr window manager");

    desktop::enable_per_monitor_dpi_awareness();

    let manager = WindowManager::new(
        Arc::new(UnavailableBrowserEngine),
        Arc::new(GdiWindowCapture),
        &settings,
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "XR Window Manager",
        native_options,
        Box::new(move |_cc| {
            Box::new(DesktopApp::new(
                manager,
                Box::new(DesktopWindows),
                &settings,
            ))
        }),
    )
    .map_err(|e| anyhow::anyhow!("failed to run the desktop window: {e}"))?;

    tracing::info!("exiting");
    Ok(())
}
