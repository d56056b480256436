use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

use crate::canvas::Canvas;

/// Keeps the GPU copy of the canvas buffer in sync with its pixels.
///
/// The texture is only re-uploaded when the canvas reports changes.
#[derive(Default)]
pub struct CanvasTexture {
    handle: Option<TextureHandle>,
}

impl std::fmt::Debug for CanvasTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasTexture")
            .field("handle", &self.handle.as_ref().map(|h| h.id()))
            .finish()
    }
}

impl CanvasTexture {
    /// Upload the canvas if it changed and return the texture to paint.
    pub fn sync(&mut self, ctx: &Context, canvas: &mut Canvas) -> TextureId {
        let dirty = canvas.take_dirty();
        match &mut self.handle {
            Some(handle) if !dirty => handle.id(),
            Some(handle) => {
                handle.set(to_color_image(canvas), TextureOptions::NEAREST);
                handle.id()
            }
            None => {
                let handle = ctx.load_texture("canvas", to_color_image(canvas), TextureOptions::NEAREST);
                let id = handle.id();
                self.handle = Some(handle);
                id
            }
        }
    }
}

fn to_color_image(canvas: &Canvas) -> ColorImage {
    let (width, height) = canvas.size();
    ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        canvas.surface().pixels().as_raw(),
    )
}
