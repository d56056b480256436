use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::history::HISTORY_LIMIT;

/// Smallest width or height a canvas is ever allocated with.
pub const MIN_CANVAS_SIZE: u32 = 100;

/// File name used when the host saves the canvas to disk.
pub const DEFAULT_EXPORT_NAME: &str = "lecture-note.png";

/// Settings fixed for the lifetime of a [`crate::Canvas`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct CanvasConfig {
    /// Maximum number of snapshots kept by the history log
    pub history_limit: usize,
    /// Opaque fill used by `initialize` and by the eraser
    pub background: Color32,
    pub min_width: u32,
    pub min_height: u32,
    pub export_file_name: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            history_limit: HISTORY_LIMIT,
            background: Color32::WHITE,
            min_width: MIN_CANVAS_SIZE,
            min_height: MIN_CANVAS_SIZE,
            export_file_name: DEFAULT_EXPORT_NAME.to_owned(),
        }
    }
}

impl CanvasConfig {
    /// The history bound actually enforced; a log must hold at least the current entry.
    pub fn effective_history_limit(&self) -> usize {
        self.history_limit.max(1)
    }

    /// Clamp requested dimensions to the configured minimum.
    pub fn clamp_size(&self, width: u32, height: u32) -> (u32, u32) {
        (width.max(self.min_width.max(1)), height.max(self.min_height.max(1)))
    }

    /// The background with its alpha forced to opaque.
    pub fn opaque_background(&self) -> Color32 {
        let [r, g, b, _] = self.background.to_srgba_unmultiplied();
        Color32::from_rgb(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CanvasConfig::default();
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.background, Color32::WHITE);
        assert_eq!(config.export_file_name, "lecture-note.png");
    }

    #[test]
    fn test_clamp_size() {
        let config = CanvasConfig::default();
        assert_eq!(config.clamp_size(0, 0), (100, 100));
        assert_eq!(config.clamp_size(400, 30), (400, 100));
        assert_eq!(config.clamp_size(640, 480), (640, 480));
    }

    #[test]
    fn test_history_limit_never_zero() {
        let config = CanvasConfig {
            history_limit: 0,
            ..Default::default()
        };
        assert_eq!(config.effective_history_limit(), 1);
    }

    #[test]
    fn test_background_forced_opaque() {
        let config = CanvasConfig {
            background: Color32::from_rgba_unmultiplied(200, 100, 50, 128),
            ..Default::default()
        };
        assert_eq!(config.opaque_background().a(), 255);
        assert_eq!(CanvasConfig::default().opaque_background(), Color32::WHITE);
    }
}
