use egui::{Color32, Pos2};
use image::RgbaImage;

use crate::paint;
use crate::surface::to_rgba;

/// Incremental path for the pen and eraser.
///
/// Each extension strokes a round-capped segment from the previous point,
/// so consecutive segments meet with round joins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreehandPath {
    last: Pos2,
    segments: usize,
}

impl FreehandPath {
    /// Start a path at the given position without drawing anything.
    pub fn begin(at: Pos2) -> Self {
        Self {
            last: at,
            segments: 0,
        }
    }

    pub fn last_point(&self) -> Pos2 {
        self.last
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Continue the path to `to`, painting directly into `image`.
    pub fn extend_to(&mut self, image: &mut RgbaImage, to: Pos2, color: Color32, width: f32) {
        paint::stroke_segment(image, self.last, to, width, to_rgba(color));
        self.last = to;
        self.segments += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_begin_draws_nothing() {
        let image = RgbaImage::from_pixel(10, 10, to_rgba(Color32::WHITE));
        let path = FreehandPath::begin(pos2(5.0, 5.0));
        assert_eq!(path.segments(), 0);
        assert!(image.pixels().all(|p| *p == to_rgba(Color32::WHITE)));
    }

    #[test]
    fn test_extend_accumulates() {
        let mut image = RgbaImage::from_pixel(40, 40, to_rgba(Color32::WHITE));
        let mut path = FreehandPath::begin(pos2(5.0, 5.0));
        path.extend_to(&mut image, pos2(20.0, 5.0), Color32::BLACK, 3.0);
        path.extend_to(&mut image, pos2(20.0, 30.0), Color32::BLACK, 3.0);

        assert_eq!(path.segments(), 2);
        assert_eq!(path.last_point(), pos2(20.0, 30.0));
        // both segments survive, nothing is restored between moves
        assert_eq!(*image.get_pixel(12, 5), to_rgba(Color32::BLACK));
        assert_eq!(*image.get_pixel(20, 18), to_rgba(Color32::BLACK));
    }
}
