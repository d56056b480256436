use crate::SketchApp;
use crate::components::ToolButton;
use crate::tools::{ToolMode, WIDTH_CHOICES};

pub fn tools_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(false)
        .default_width(160.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active = app.tool().mode;
            ui.horizontal_wrapped(|ui| {
                for mode in ToolMode::ALL {
                    if ToolButton::new(mode, mode == active).show(ui).clicked() {
                        log::info!("Tool selected from UI: {}", mode.name());
                        app.set_mode(mode);
                    }
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Color");
                let mut color = app.tool().color;
                if ui.color_edit_button_srgba(&mut color).changed() {
                    app.set_color(color);
                }
            });

            let mut width = app.tool().width;
            egui::ComboBox::from_label("Width")
                .selected_text(format!("{} px", width))
                .show_ui(ui, |ui| {
                    for choice in WIDTH_CHOICES {
                        ui.selectable_value(&mut width, choice, format!("{} px", choice));
                    }
                });
            if width != app.tool().width {
                app.set_width(width);
            }
            ui.separator();

            // Undo/Redo section
            let status = app.history_status();
            ui.horizontal(|ui| {
                if ui.add_enabled(status.can_undo, egui::Button::new("Undo")).clicked() {
                    app.undo();
                }
                if ui.add_enabled(status.can_redo, egui::Button::new("Redo")).clicked() {
                    app.redo();
                }
            });

            if let Some((len, limit)) = app.history_usage() {
                ui.label(format!("History: {} / {}", len, limit));
            }

            ui.horizontal(|ui| {
                if ui.button("Clear").clicked() {
                    app.request_clear();
                }
                if ui.button("Save").clicked() {
                    app.save_image();
                }
            });

            if let Some(status) = app.status() {
                ui.separator();
                ui.label(status);
            }
        });
}
