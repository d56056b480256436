use ab_glyph::{FontArc, PxScale};
use egui::{Color32, Pos2};
use image::RgbaImage;
use imageproc::drawing::draw_text_mut;

use crate::error::CanvasResult;
use crate::surface::to_rgba;

/// Font size in pixels for a given stroke width.
pub fn font_size_for(width: f32) -> f32 {
    (width * 4.0).max(12.0)
}

/// How a host answers a request for text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptReply {
    /// The user entered this text (possibly empty).
    Text(String),
    /// The user dismissed the prompt.
    Cancelled,
    /// The answer will arrive later through `Canvas::resolve_text`.
    Deferred,
}

/// Source of text for the text tool.
///
/// Synchronous hosts answer immediately; hosts with asynchronous dialogs
/// return [`PromptReply::Deferred`] and resolve the request later.
pub trait TextPrompt {
    fn request_text(&mut self, at: Pos2) -> PromptReply;
}

impl<F> TextPrompt for F
where
    F: FnMut(Pos2) -> PromptReply,
{
    fn request_text(&mut self, at: Pos2) -> PromptReply {
        self(at)
    }
}

/// Rasterizes text stamps with a TrueType/OpenType font.
#[derive(Clone)]
pub struct TextStamper {
    font: FontArc,
}

impl std::fmt::Debug for TextStamper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextStamper")
            .field("font", &"<font>")
            .finish()
    }
}

impl TextStamper {
    /// The Ubuntu-Light face bundled with egui.
    pub fn bundled() -> CanvasResult<Self> {
        Ok(Self {
            font: FontArc::try_from_slice(epaint_default_fonts::UBUNTU_LIGHT)?,
        })
    }

    /// Load a font from raw file contents.
    pub fn from_bytes(bytes: Vec<u8>) -> CanvasResult<Self> {
        Ok(Self {
            font: FontArc::try_from_vec(bytes)?,
        })
    }

    /// Stamp `text` with the top of its glyph box at `at`.
    ///
    /// Returns `false` (and draws nothing) for empty text.
    pub fn stamp(&self, image: &mut RgbaImage, at: Pos2, text: &str, color: Color32, width: f32) -> bool {
        if text.is_empty() {
            return false;
        }
        let scale = PxScale::from(font_size_for(width));
        draw_text_mut(
            image,
            to_rgba(color),
            at.x.round() as i32,
            at.y.round() as i32,
            scale,
            &self.font,
            text,
        );
        true
    }
}
