use egui::Color32;
use image::{Rgba, RgbaImage};
use std::sync::Arc;

/// Convert an egui color into the pixel type stored by the raster buffer.
pub fn to_rgba(color: Color32) -> Rgba<u8> {
    Rgba(color.to_srgba_unmultiplied())
}

/// Convert a stored pixel back into an egui color.
pub fn to_color32(pixel: Rgba<u8>) -> Color32 {
    let [r, g, b, a] = pixel.0;
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Immutable copy of the surface's pixels at one instant.
///
/// Snapshots share their pixel storage with each other when cloned but
/// never with the live buffer: capturing copies, restoring copies back.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pixels: Arc<RgbaImage>,
}

impl Snapshot {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        self.pixels.get_pixel_checked(x, y).map(|p| to_color32(*p))
    }
}

/// The live pixel buffer every tool draws into.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixels: RgbaImage,
    background: Color32,
    /// Set whenever pixels change; cleared by whoever uploads the buffer.
    dirty: bool,
}

impl RasterSurface {
    /// Allocate a surface filled with `background`. Dimensions are used as-is,
    /// callers clamp them first (see [`crate::CanvasConfig::clamp_size`]).
    pub fn new(width: u32, height: u32, background: Color32) -> Self {
        let mut surface = Self {
            pixels: RgbaImage::new(0, 0),
            background,
            dirty: true,
        };
        surface.initialize(width, height);
        surface
    }

    /// Reallocate the grid and fill it with the background color.
    pub fn initialize(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        self.pixels = RgbaImage::from_pixel(width, height, to_rgba(self.background));
        self.dirty = true;
        log::info!("Surface initialized at {}x{}", width, height);
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn background(&self) -> Color32 {
        self.background
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Mutable access for tool strategies; marks the surface dirty.
    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        self.dirty = true;
        &mut self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        self.pixels.get_pixel_checked(x, y).map(|p| to_color32(*p))
    }

    /// Full, independent copy of the current pixels.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pixels: Arc::new(self.pixels.clone()),
        }
    }

    /// Overwrite the whole buffer with the snapshot's pixels.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        if self.pixels.dimensions() == snapshot.pixels.dimensions() {
            self.pixels.copy_from_slice(snapshot.pixels.as_raw());
        } else {
            log::warn!(
                "Restoring {}x{} snapshot over {}x{} surface",
                snapshot.width(),
                snapshot.height(),
                self.width(),
                self.height()
            );
            self.pixels = RgbaImage::clone(&snapshot.pixels);
        }
        self.dirty = true;
    }

    /// True if the buffer equals the snapshot pixel for pixel.
    pub fn matches(&self, snapshot: &Snapshot) -> bool {
        *snapshot.pixels == self.pixels
    }

    /// Returns whether the pixels changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
