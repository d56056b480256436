use egui::Color32;

use crate::canvas::Canvas;
use crate::error::TransitionError;
use crate::history::HistoryStatus;
use crate::input::{InputHandler, Shortcut};
use crate::panels::{central_panel, tools_panel};
use crate::texture_manager::CanvasTexture;
use crate::tools::{ToolConfig, ToolMode};

/// Only the tool settings survive a restart; the drawing itself does not.
#[derive(serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct SketchApp {
    tool: ToolConfig,

    #[serde(skip)]
    pub(crate) canvas: Option<Canvas>,
    #[serde(skip)]
    pub(crate) texture: CanvasTexture,
    #[serde(skip)]
    pub(crate) input: InputHandler,
    #[serde(skip)]
    text_buffer: String,
    #[serde(skip)]
    confirm_clear: bool,
    /// Panel size the canvas was last fitted to, in points
    #[serde(skip)]
    last_requested_size: Option<(u32, u32)>,
    #[serde(skip)]
    status: Option<String>,
}

impl SketchApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        if let Some(storage) = cc.storage {
            if let Some(mut app) = eframe::get_value::<Self>(storage, eframe::APP_KEY) {
                app.tool.sanitize();
                log::info!("Restored tool settings: {:?}", app.tool);
                return app;
            }
        }
        Default::default()
    }

    pub fn tool(&self) -> &ToolConfig {
        &self.tool
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// True while a dialog owns the pointer.
    pub fn is_modal_open(&self) -> bool {
        self.confirm_clear || self.canvas.as_ref().is_some_and(|c| c.pending_text().is_some())
    }

    /// Make the canvas match the space the central panel offers.
    ///
    /// A new size re-initializes the canvas, discarding its pixels and history.
    pub(crate) fn fit_canvas(&mut self, width: u32, height: u32) {
        if self.canvas.is_some() && self.last_requested_size == Some((width, height)) {
            return;
        }
        self.last_requested_size = Some((width, height));

        match &mut self.canvas {
            Some(canvas) => {
                canvas.initialize(width, height);
            }
            None => {
                let mut canvas = Canvas::new(width, height);
                canvas.set_tool_config(self.tool.clone());
                self.canvas = Some(canvas);
            }
        }
        self.input.reset();
    }

    pub fn set_mode(&mut self, mode: ToolMode) {
        self.tool.mode = mode;
        if let Some(canvas) = &mut self.canvas {
            canvas.set_mode(mode);
        }
    }

    pub fn set_color(&mut self, color: Color32) {
        self.tool.set_color(color);
        if let Some(canvas) = &mut self.canvas {
            canvas.set_color(color);
        }
    }

    pub fn set_width(&mut self, width: f32) {
        self.tool.set_width(width);
        if let Some(canvas) = &mut self.canvas {
            canvas.set_width(width);
        }
    }

    pub fn history_status(&self) -> HistoryStatus {
        self.canvas.as_ref().map(Canvas::status).unwrap_or_default()
    }

    /// Entries held by the history log and its capacity.
    pub fn history_usage(&self) -> Option<(usize, usize)> {
        self.canvas
            .as_ref()
            .map(|canvas| (canvas.history().len(), canvas.history().limit()))
    }

    pub fn undo(&mut self) {
        if let Some(canvas) = &mut self.canvas {
            let result = canvas.undo();
            self.report(result);
        }
    }

    pub fn redo(&mut self) {
        if let Some(canvas) = &mut self.canvas {
            let result = canvas.redo();
            self.report(result);
        }
    }

    /// Ask for confirmation before wiping the canvas.
    pub fn request_clear(&mut self) {
        self.confirm_clear = true;
    }

    pub fn clear(&mut self) {
        self.confirm_clear = false;
        if let Some(canvas) = &mut self.canvas {
            canvas.clear();
            self.status = None;
        }
    }

    /// Write the canvas as a PNG next to the working directory.
    pub fn save_image(&mut self) {
        let Some(canvas) = &self.canvas else {
            return;
        };
        let file_name = canvas.config().export_file_name.clone();
        self.status = Some(match canvas.save_png(&file_name) {
            Ok(()) => format!("Saved {}", file_name),
            Err(err) => {
                log::error!("Export failed: {}", err);
                format!("Export failed: {}", err)
            }
        });
    }

    fn report(&mut self, result: Result<HistoryStatus, TransitionError>) {
        if let Err(err) = result {
            self.status = Some(err.to_string());
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // Typing into the text dialog must not trigger canvas commands.
        if self.is_modal_open() {
            return;
        }
        match Shortcut::consume(ctx) {
            Some(Shortcut::Save) => self.save_image(),
            Some(Shortcut::Undo) => self.undo(),
            Some(Shortcut::Redo) => self.redo(),
            Some(Shortcut::Clear) => self.request_clear(),
            None => {}
        }
    }

    fn text_dialog(&mut self, ctx: &egui::Context) {
        let Some(canvas) = &mut self.canvas else {
            return;
        };
        let Some(at) = canvas.pending_text() else {
            return;
        };

        let mut answer = None;
        egui::Window::new("Add text")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!("Text at ({:.0}, {:.0}):", at.x, at.y));
                let response = ui.add(egui::TextEdit::singleline(&mut self.text_buffer).desired_width(240.0));
                response.request_focus();
                let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() || submitted {
                        answer = Some(Some(std::mem::take(&mut self.text_buffer)));
                    }
                    if ui.button("Cancel").clicked() || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                        answer = Some(None);
                    }
                });
            });

        if let Some(text) = answer {
            self.text_buffer.clear();
            let result = canvas.resolve_text(text);
            self.report(result);
        }
    }

    fn clear_dialog(&mut self, ctx: &egui::Context) {
        if !self.confirm_clear {
            return;
        }
        egui::Window::new("Clear canvas")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Erase everything? This cannot be undone.");
                ui.horizontal(|ui| {
                    if ui.button("Clear").clicked() {
                        self.clear();
                    }
                    if ui.button("Keep drawing").clicked() {
                        self.confirm_clear = false;
                    }
                });
            });
    }
}

impl eframe::App for SketchApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);

        tools_panel(self, ctx);
        central_panel(self, ctx);

        self.text_dialog(ctx);
        self.clear_dialog(ctx);
    }
}
