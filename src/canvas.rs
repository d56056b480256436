//! The owning context tying the surface, history, tools and interaction
//! state together.
//!
//! `Canvas` is the only thing a host talks to. Pointer coordinates are
//! expected in buffer pixel space; every operation runs to completion on
//! the calling thread.

use std::io::Cursor;
use std::path::Path;

use egui::{Color32, Pos2};

use crate::config::CanvasConfig;
use crate::error::{CanvasResult, TransitionError};
use crate::history::{HistoryLog, HistoryStatus};
use crate::input::{self, Modifiers, PointerEvent};
use crate::state::{Gesture, GestureKind, InteractionState};
use crate::surface::{RasterSurface, Snapshot};
use crate::tools::{self, PromptReply, TextPrompt, TextStamper, ToolConfig, ToolKind, ToolMode};

pub struct Canvas {
    config: CanvasConfig,
    tool: ToolConfig,
    surface: RasterSurface,
    history: HistoryLog,
    state: InteractionState,
    text: Option<TextStamper>,
    prompt: Option<Box<dyn TextPrompt>>,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("size", &self.surface.size())
            .field("tool", &self.tool)
            .field("state", &self.state.name())
            .field("history_len", &self.history.len())
            .field("history_step", &self.history.step())
            .field("prompt", &self.prompt.as_ref().map(|_| "<prompt>"))
            .finish()
    }
}

impl Canvas {
    /// Creates a canvas with the default configuration.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(width, height, CanvasConfig::default())
    }

    /// Creates a canvas and records its blank state as the first history entry.
    pub fn with_config(width: u32, height: u32, config: CanvasConfig) -> Self {
        let (width, height) = config.clamp_size(width, height);
        let text = match TextStamper::bundled() {
            Ok(stamper) => Some(stamper),
            Err(err) => {
                log::warn!("Text tool disabled, bundled font failed to load: {}", err);
                None
            }
        };

        let mut canvas = Self {
            surface: RasterSurface::new(width, height, config.opaque_background()),
            history: HistoryLog::new(config.effective_history_limit()),
            tool: ToolConfig::default(),
            state: InteractionState::Idle,
            text,
            prompt: None,
            config,
        };
        canvas.history.record(canvas.surface.snapshot());
        canvas
    }

    // --- Raster surface ---

    /// Reallocates the surface, fills it with the background and restarts
    /// history from that blank state.
    ///
    /// Any gesture or outstanding text prompt is abandoned: its pixels
    /// belong to the old dimensions.
    pub fn initialize(&mut self, width: u32, height: u32) -> HistoryStatus {
        if !self.state.is_idle() {
            log::debug!("Abandoning {} for re-initialization", self.state.name());
        }
        self.state = InteractionState::Idle;

        let (width, height) = self.config.clamp_size(width, height);
        self.surface.initialize(width, height);
        self.history.reset();
        self.history.record(self.surface.snapshot())
    }

    /// Wipes the canvas at its current size.
    pub fn clear(&mut self) -> HistoryStatus {
        let (width, height) = self.surface.size();
        log::info!("Clearing canvas");
        self.initialize(width, height)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.surface.snapshot()
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn size(&self) -> (u32, u32) {
        self.surface.size()
    }

    /// Returns whether the pixels changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        self.surface.take_dirty()
    }

    // --- Tool configuration ---

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn tool_config(&self) -> &ToolConfig {
        &self.tool
    }

    /// Replace the whole tool configuration, e.g. when restoring persisted settings.
    pub fn set_tool_config(&mut self, tool: ToolConfig) {
        self.tool = tool;
        self.tool.sanitize();
    }

    pub fn mode(&self) -> ToolMode {
        self.tool.mode
    }

    /// Takes effect on the next gesture; an active gesture keeps its mode.
    pub fn set_mode(&mut self, mode: ToolMode) {
        log::debug!("Tool mode set to {}", mode.name());
        self.tool.mode = mode;
    }

    /// Any alpha is dropped; strokes are always opaque.
    pub fn set_color(&mut self, color: Color32) {
        self.tool.set_color(color);
    }

    pub fn set_width(&mut self, width: f32) {
        self.tool.set_width(width);
    }

    // --- Text ---

    /// Install the prompt asked for text whenever the text tool is clicked.
    pub fn set_text_prompt(&mut self, prompt: impl TextPrompt + 'static) {
        self.prompt = Some(Box::new(prompt));
    }

    /// Use a different font for text stamps.
    pub fn set_font(&mut self, bytes: Vec<u8>) -> CanvasResult<()> {
        let stamper = TextStamper::from_bytes(bytes)?;
        self.text = Some(stamper);
        log::info!("Loaded custom font for text stamps");
        Ok(())
    }

    /// Where a deferred text stamp will land, if one is outstanding.
    pub fn pending_text(&self) -> Option<Pos2> {
        self.state.pending_text()
    }

    /// Answer an outstanding text request. `None` cancels it.
    ///
    /// Empty or cancelled text leaves the surface and history untouched.
    pub fn resolve_text(&mut self, text: Option<String>) -> Result<HistoryStatus, TransitionError> {
        let Some(at) = self.state.pending_text() else {
            return Err(TransitionError::NotAwaitingText {
                state: self.state.name(),
            });
        };
        self.transition_to(InteractionState::Idle)?;

        match text {
            Some(text) => {
                self.stamp_text(at, &text);
            }
            None => log::debug!("Text prompt cancelled"),
        }
        Ok(self.status())
    }

    // --- Interaction state machine ---

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Attempts to transition to a new state, validating the transition first.
    fn transition_to(&mut self, new_state: InteractionState) -> Result<(), TransitionError> {
        if !self.state.can_transition_to(&new_state) {
            return Err(TransitionError::InvalidStateTransition {
                from: self.state.name(),
                to: new_state.name(),
            });
        }
        log::debug!("State {} -> {}", self.state.name(), new_state.name());
        self.state = new_state;
        Ok(())
    }

    fn ensure_idle(&self, action: &'static str) -> Result<(), TransitionError> {
        if self.state.is_idle() {
            Ok(())
        } else {
            log::warn!("Rejected {} while {}", action, self.state.name());
            Err(TransitionError::Busy {
                action,
                state: self.state.name(),
            })
        }
    }

    /// Dispatch a pointer event to the matching handler.
    pub fn handle_event(&mut self, event: PointerEvent) {
        input::route_event(self, event);
    }

    pub fn on_pointer_down(&mut self, pos: Pos2, _modifiers: Modifiers) {
        if !self.state.is_idle() {
            log::trace!("Ignoring pointer-down while {}", self.state.name());
            return;
        }

        let mode = self.tool.mode;
        let gesture = match mode.kind() {
            ToolKind::Stamp => {
                self.request_text(pos);
                return;
            }
            ToolKind::DirectMutation => Gesture::freehand(mode, pos),
            ToolKind::Preview => Gesture::preview(mode, pos, self.surface.snapshot()),
        };

        log::debug!("{} gesture started at ({}, {})", mode.name(), pos.x, pos.y);
        if let Err(err) = self.transition_to(InteractionState::GestureActive(gesture)) {
            log::warn!("Could not start gesture: {}", err);
        }
    }

    pub fn on_pointer_move(&mut self, pos: Pos2, modifiers: Modifiers) {
        let background = self.surface.background();
        let Some(gesture) = self.state.gesture_mut() else {
            return;
        };
        gesture.moves += 1;

        let color = self.tool.paint_color(gesture.mode, background);
        let width = self.tool.width;
        match &mut gesture.kind {
            GestureKind::Freehand(path) => {
                path.extend_to(self.surface.pixels_mut(), pos, color, width);
            }
            GestureKind::Preview { pre_gesture } => {
                self.surface.restore(pre_gesture);
                let shape = tools::render_preview(
                    self.surface.pixels_mut(),
                    gesture.mode,
                    gesture.start,
                    pos,
                    modifiers,
                    &self.tool,
                );
                log::trace!("Preview frame {}: {:?}", gesture.moves, shape);
            }
        }
    }

    pub fn on_pointer_up(&mut self) {
        self.commit_gesture("pointer-up");
    }

    /// Leaving the canvas commits the gesture exactly like releasing the pointer.
    pub fn on_pointer_leave(&mut self) {
        self.commit_gesture("pointer-leave");
    }

    fn commit_gesture(&mut self, cause: &'static str) {
        let Some(gesture) = self.state.gesture() else {
            return;
        };
        if gesture.is_degenerate() {
            log::debug!("{} gesture committed on {} without moving", gesture.mode.name(), cause);
        } else {
            log::debug!(
                "{} gesture committed on {} after {} moves",
                gesture.mode.name(),
                cause,
                gesture.moves
            );
        }

        if let Err(err) = self.transition_to(InteractionState::Idle) {
            log::warn!("Could not finish gesture: {}", err);
            return;
        }
        self.history.record(self.surface.snapshot());
    }

    fn request_text(&mut self, at: Pos2) {
        let reply = match self.prompt.as_mut() {
            Some(prompt) => prompt.request_text(at),
            None => PromptReply::Deferred,
        };

        match reply {
            PromptReply::Text(text) => {
                self.stamp_text(at, &text);
            }
            PromptReply::Cancelled => log::debug!("Text prompt cancelled"),
            PromptReply::Deferred => {
                if let Err(err) = self.transition_to(InteractionState::AwaitingTextInput { at }) {
                    log::warn!("Could not wait for text: {}", err);
                }
            }
        }
    }

    /// Stamps text and records it; returns whether anything was drawn.
    fn stamp_text(&mut self, at: Pos2, text: &str) -> bool {
        if text.is_empty() {
            log::debug!("Empty text, nothing stamped");
            return false;
        }
        let Some(stamper) = &self.text else {
            log::warn!("No font loaded, text stamp skipped");
            return false;
        };

        let color = self.tool.paint_color(ToolMode::Text, self.surface.background());
        stamper.stamp(self.surface.pixels_mut(), at, text, color, self.tool.width);
        self.history.record(self.surface.snapshot());
        true
    }

    // --- History ---

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn status(&self) -> HistoryStatus {
        self.history.status()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Steps back one history entry. Rejected mid-gesture or while text is pending.
    pub fn undo(&mut self) -> Result<HistoryStatus, TransitionError> {
        self.ensure_idle("undo")?;
        match self.history.undo() {
            Some(snapshot) => self.surface.restore(snapshot),
            None => log::debug!("Nothing to undo"),
        }
        Ok(self.status())
    }

    /// Steps forward one history entry. Rejected mid-gesture or while text is pending.
    pub fn redo(&mut self) -> Result<HistoryStatus, TransitionError> {
        self.ensure_idle("redo")?;
        match self.history.redo() {
            Some(snapshot) => self.surface.restore(snapshot),
            None => log::debug!("Nothing to redo"),
        }
        Ok(self.status())
    }

    // --- Export ---

    /// Encode the current buffer as PNG.
    pub fn export_png(&self) -> CanvasResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.surface
            .pixels()
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Encode the current buffer as PNG and write it to `path`.
    pub fn save_png(&self, path: impl AsRef<Path>) -> CanvasResult<()> {
        let path = path.as_ref();
        let bytes = self.export_png()?;
        std::fs::write(path, &bytes)?;
        log::info!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}
