use crate::SketchApp;
use crate::input::route_event;

pub fn central_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let available = ui.available_size();
        app.fit_canvas(available.x.max(0.0) as u32, available.y.max(0.0) as u32);

        let modal_open = app.is_modal_open();
        let Some(canvas) = &mut app.canvas else {
            return;
        };

        let (width, height) = canvas.size();
        let (canvas_rect, _response) = ui.allocate_exact_size(
            egui::vec2(width as f32, height as f32),
            egui::Sense::click_and_drag(),
        );

        if modal_open {
            // A dialog opened mid-drag: end the gesture like leaving the canvas.
            if let Some(event) = app.input.release() {
                route_event(canvas, event);
            }
        } else {
            for event in app.input.process_input(ctx, canvas_rect) {
                route_event(canvas, event);
            }
        }

        let texture = app.texture.sync(ctx, canvas);
        ui.painter().image(
            texture,
            canvas_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        if app.input.is_pressed() {
            // Keep previews flowing while the pointer is held still.
            ctx.request_repaint();
        }
    });
}
