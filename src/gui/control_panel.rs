use crate::desktop::WindowEnumerator;
use crate::selection::SelectionState;
use eframe::egui;

/// Desktop form for choosing what gets projected.
#[derive(Default)]
pub struct ControlPanel {
    url_input: String,
    error: Option<String>,
}

impl ControlPanel {
    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        selection: &mut SelectionState,
        enumerator: &dyn WindowEnumerator,
    ) {
        ui.heading("Browsers");
        let mut remove = None;
        for i in 0..selection.browsers().len() {
            let entry = &selection.browsers()[i];
            let mut checked = entry.checked;
            let label = entry.url.clone();
            ui.horizontal(|ui| {
                if ui.checkbox(&mut checked, label).changed() {
                    selection.set_browser_checked(i, checked);
                }
                if ui.small_button("x").on_hover_text("Remove").clicked() {
                    remove = Some(i);
                }
            });
        }
        if let Some(i) = remove {
            selection.remove_browser(i);
        }

        ui.horizontal(|ui| {
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.url_input).hint_text("https://example.com"),
            );
            let submitted = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if (submitted || ui.button("Add").clicked()) && selection.add_browser(&self.url_input) {
                self.url_input.clear();
            }
        });

        ui.separator();
        ui.horizontal(|ui| {
            ui.heading("Desktop windows");
            if ui.button("Refresh").clicked() {
                self.error = selection
                    .refresh_windows(enumerator)
                    .err()
                    .map(|e| format!("Failed to list windows: {e}"));
            }
        });
        if let Some(err) = &self.error {
            ui.colored_label(egui::Color32::RED, err);
        }
        egui::ScrollArea::vertical()
            .id_source("window_list")
            .max_height(320.0)
            .show(ui, |ui| {
                for i in 0..selection.windows().len() {
                    let entry = &selection.windows()[i];
                    let mut checked = entry.checked;
                    if ui.checkbox(&mut checked, entry.info.title.clone()).changed() {
                        selection.set_window_checked(i, checked);
                    }
                }
            });

        ui.separator();
        ui.checkbox(&mut selection.show_helper, "Show helper panel");
    }
}
