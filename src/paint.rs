//! Hard-edged raster primitives shared by the tool strategies.
//!
//! Coordinates are in buffer pixel space; pixel `(x, y)` is covered when its
//! center `(x + 0.5, y + 0.5)` falls inside the primitive. Everything is
//! clipped to the image bounds.

use egui::{Pos2, Rect, pos2, vec2};
use image::{Rgba, RgbaImage};

/// Half the stroke width, never thinner than a single pixel.
fn half_width(width: f32) -> f32 {
    (width * 0.5).max(0.5)
}

/// Pixel index range covering `bounds`, clipped to the image.
fn pixel_span(image: &RgbaImage, bounds: Rect) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = image.dimensions();
    let min_x = (bounds.min.x - 0.5).floor().max(0.0);
    let min_y = (bounds.min.y - 0.5).floor().max(0.0);
    let max_x = (bounds.max.x - 0.5).ceil().min(w as f32 - 1.0);
    let max_y = (bounds.max.y - 0.5).ceil().min(h as f32 - 1.0);
    if !(min_x <= max_x && min_y <= max_y) {
        return None;
    }
    Some((min_x as u32, min_y as u32, max_x as u32, max_y as u32))
}

fn fill_where(image: &mut RgbaImage, bounds: Rect, color: Rgba<u8>, inside: impl Fn(Pos2) -> bool) {
    let Some((x0, y0, x1, y1)) = pixel_span(image, bounds) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            if inside(pos2(x as f32 + 0.5, y as f32 + 0.5)) {
                image.put_pixel(x, y, color);
            }
        }
    }
}

/// Distance from `p` to the segment `a..b`.
pub fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Stroke a segment with round caps. A zero-length segment leaves a dot.
pub fn stroke_segment(image: &mut RgbaImage, from: Pos2, to: Pos2, width: f32, color: Rgba<u8>) {
    let radius = half_width(width);
    let bounds = Rect::from_two_pos(from, to).expand(radius);
    fill_where(image, bounds, color, |p| distance_to_segment(p, from, to) <= radius);
}

/// Stroke an axis-aligned rectangle outline with corners at `a` and `b`.
pub fn stroke_rect(image: &mut RgbaImage, a: Pos2, b: Pos2, width: f32, color: Rgba<u8>) {
    let corners = [a, pos2(b.x, a.y), b, pos2(a.x, b.y)];
    for (i, &corner) in corners.iter().enumerate() {
        stroke_segment(image, corner, corners[(i + 1) % corners.len()], width, color);
    }
}

/// Stroke a circle outline. A zero radius leaves a dot.
pub fn stroke_circle(image: &mut RgbaImage, center: Pos2, radius: f32, width: f32, color: Rgba<u8>) {
    let half = half_width(width);
    let radius = radius.max(0.0);
    let bounds = Rect::from_center_size(center, vec2(2.0, 2.0) * (radius + half));
    fill_where(image, bounds, color, |p| (p.distance(center) - radius).abs() <= half);
}
