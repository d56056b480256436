use egui::{Color32, Pos2};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::input::Modifiers;

mod freehand;
pub use freehand::FreehandPath;

mod shapes;
pub use shapes::{ARROW_HEAD_ANGLE, Shape, arrow_head, arrow_head_len, snap_to_axis};

mod text;
pub use text::{PromptReply, TextPrompt, TextStamper, font_size_for};

/// Default stroke width in pixels.
pub const DEFAULT_WIDTH: f32 = 5.0;

/// Stroke widths offered by the host's width selector.
pub const WIDTH_CHOICES: [f32; 6] = [1.0, 3.0, 5.0, 10.0, 15.0, 20.0];

/// How a tool mode interacts with the surface during a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// Mutates the buffer cumulatively on every move (pen, eraser).
    DirectMutation,
    /// Restores the pre-gesture snapshot and redraws on every move (shapes).
    Preview,
    /// Stamps once on pointer-down, never starts a gesture (text).
    Stamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolMode {
    #[default]
    Pen,
    Eraser,
    Rectangle,
    Circle,
    Arrow,
    Line,
    Text,
}

impl ToolMode {
    /// Every mode, in toolbar order.
    pub const ALL: [ToolMode; 7] = [
        ToolMode::Pen,
        ToolMode::Eraser,
        ToolMode::Rectangle,
        ToolMode::Circle,
        ToolMode::Arrow,
        ToolMode::Line,
        ToolMode::Text,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Pen => "Pen",
            Self::Eraser => "Eraser",
            Self::Rectangle => "Rectangle",
            Self::Circle => "Circle",
            Self::Arrow => "Arrow",
            Self::Line => "Line",
            Self::Text => "Text",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Pen => "✏",
            Self::Eraser => "⌫",
            Self::Rectangle => "▭",
            Self::Circle => "○",
            Self::Arrow => "➡",
            Self::Line => "╱",
            Self::Text => "T",
        }
    }

    pub fn kind(self) -> ToolKind {
        match self {
            Self::Pen | Self::Eraser => ToolKind::DirectMutation,
            Self::Rectangle | Self::Circle | Self::Arrow | Self::Line => ToolKind::Preview,
            Self::Text => ToolKind::Stamp,
        }
    }

    pub fn is_preview(self) -> bool {
        self.kind() == ToolKind::Preview
    }
}

/// Current color, stroke width and mode; read by the strategies on every draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub mode: ToolMode,
    pub color: Color32,
    pub width: f32,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            mode: ToolMode::Pen,
            color: Color32::BLACK,
            width: DEFAULT_WIDTH,
        }
    }
}

/// Drop the alpha channel; strokes always cover what is beneath them.
pub fn opaque(color: Color32) -> Color32 {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    Color32::from_rgb(r, g, b)
}

impl ToolConfig {
    pub fn set_color(&mut self, color: Color32) {
        self.color = opaque(color);
    }

    /// Bring persisted or hand-built settings back within range.
    pub fn sanitize(&mut self) {
        self.color = opaque(self.color);
        let width = self.width;
        self.set_width(width);
    }

    /// Widths below one pixel (or NaN) are raised to one.
    pub fn set_width(&mut self, width: f32) {
        self.width = if width.is_nan() { 1.0 } else { width.max(1.0) };
    }

    /// Opaque color the given mode paints with; the eraser paints the background.
    pub fn paint_color(&self, mode: ToolMode, background: Color32) -> Color32 {
        match mode {
            ToolMode::Eraser => opaque(background),
            _ => opaque(self.color),
        }
    }
}

/// Draw one preview frame of a shape tool onto an already-restored buffer.
///
/// Returns the rendered shape, or `None` when `mode` is not a preview tool.
pub fn render_preview(
    image: &mut RgbaImage,
    mode: ToolMode,
    start: Pos2,
    current: Pos2,
    modifiers: Modifiers,
    config: &ToolConfig,
) -> Option<Shape> {
    let shape = Shape::from_drag(mode, start, current, modifiers.snap, config.width)?;
    shape.stroke(image, opaque(config.color), config.width);
    Some(shape)
}
