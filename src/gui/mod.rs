mod control_panel;
mod flat_ui;

pub use control_panel::ControlPanel;
pub use flat_ui::{FlatOverlayUi, TextureCache};

use crate::desktop::WindowEnumerator;
use crate::manager::WindowManager;
use crate::selection::{SelectionProvider, SelectionState};
use crate::settings::Settings;
use eframe::egui;

/// Control form on the left, flat preview of the overlay scene on the right.
pub struct DesktopApp {
    selection: SelectionState,
    control: ControlPanel,
    manager: WindowManager,
    enumerator: Box<dyn WindowEnumerator>,
    textures: TextureCache,
    pixels_per_meter: f32,
}

impl DesktopApp {
    pub fn new(
        manager: WindowManager,
        enumerator: Box<dyn WindowEnumerator>,
        settings: &Settings,
    ) -> Self {
        let mut selection = SelectionState::new(settings.show_helper_panel);
        if let Err(e) = selection.refresh_windows(enumerator.as_ref()) {
            tracing::warn!("initial window listing failed: {e}");
        }
        Self {
            selection,
            control: ControlPanel::default(),
            manager,
            enumerator,
            textures: TextureCache::default(),
            pixels_per_meter: settings.preview_pixels_per_meter.max(1.0),
        }
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("control_panel")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                self.control
                    .ui(ui, &mut self.selection, self.enumerator.as_ref());
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let snapshot = self.selection.snapshot();
            self.textures.begin_frame();
            {
                let mut overlay = FlatOverlayUi::new(ui, &mut self.textures, self.pixels_per_meter);
                self.manager.step(&snapshot, &mut overlay);
            }
            self.textures.end_frame();
        });

        // Browser paints and window captures arrive outside egui's input
        // loop, so keep stepping.
        ctx.request_repaint();
    }
}
