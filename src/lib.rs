#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod components;
pub mod config;
pub mod error;
pub mod history;
pub mod input;
pub mod paint;
pub mod panels;
pub mod state;
pub mod surface;
pub mod texture_manager;
pub mod tools;

pub use app::SketchApp;
pub use canvas::Canvas;
pub use config::CanvasConfig;
pub use error::{CanvasError, CanvasResult, TransitionError};
pub use history::{HISTORY_LIMIT, HistoryLog, HistoryStatus};
pub use input::{InputHandler, Modifiers, PointerEvent, Shortcut, route_event};
pub use state::InteractionState;
pub use surface::{RasterSurface, Snapshot};
pub use tools::{PromptReply, TextPrompt, ToolConfig, ToolMode};
