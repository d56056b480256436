use std::f32::consts::PI;

use egui::{Color32, Pos2, pos2};
use image::RgbaImage;

use super::ToolMode;
use crate::paint;
use crate::surface::to_rgba;

/// Angle between the shaft and each arrowhead stroke (30°).
pub const ARROW_HEAD_ANGLE: f32 = PI / 6.0;

/// Constrain `end` to a horizontal or vertical line through `start`.
///
/// Horizontal wins only when the horizontal displacement strictly dominates;
/// ties snap vertically.
pub fn snap_to_axis(start: Pos2, end: Pos2) -> Pos2 {
    let dx = (end.x - start.x).abs();
    let dy = (end.y - start.y).abs();
    if dx > dy {
        pos2(end.x, start.y)
    } else {
        pos2(start.x, end.y)
    }
}

pub fn arrow_head_len(width: f32) -> f32 {
    (width * 2.0).max(10.0)
}

/// Far ends of the two arrowhead strokes drawn back from `to`.
pub fn arrow_head(from: Pos2, to: Pos2, len: f32) -> [Pos2; 2] {
    let angle = (to.y - from.y).atan2(to.x - from.x);
    [angle - ARROW_HEAD_ANGLE, angle + ARROW_HEAD_ANGLE]
        .map(|a| pos2(to.x - len * a.cos(), to.y - len * a.sin()))
}

/// A fully resolved preview shape, ready to be stroked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rectangle { corner: Pos2, opposite: Pos2 },
    Circle { center: Pos2, radius: f32 },
    Line { from: Pos2, to: Pos2 },
    Arrow { from: Pos2, to: Pos2, head: [Pos2; 2] },
}

impl Shape {
    /// Resolve a drag from `start` to `current` into the shape `mode` draws.
    ///
    /// `snap` only affects lines and arrows. Returns `None` for modes that
    /// do not preview.
    pub fn from_drag(mode: ToolMode, start: Pos2, current: Pos2, snap: bool, width: f32) -> Option<Self> {
        let end = if snap { snap_to_axis(start, current) } else { current };
        match mode {
            ToolMode::Rectangle => Some(Self::Rectangle {
                corner: start,
                opposite: current,
            }),
            ToolMode::Circle => Some(Self::Circle {
                center: start,
                radius: start.distance(current),
            }),
            ToolMode::Line => Some(Self::Line { from: start, to: end }),
            ToolMode::Arrow => Some(Self::Arrow {
                from: start,
                to: end,
                head: arrow_head(start, end, arrow_head_len(width)),
            }),
            ToolMode::Pen | ToolMode::Eraser | ToolMode::Text => None,
        }
    }

    pub fn stroke(&self, image: &mut RgbaImage, color: Color32, width: f32) {
        let color = to_rgba(color);
        match *self {
            Self::Rectangle { corner, opposite } => {
                paint::stroke_rect(image, corner, opposite, width, color);
            }
            Self::Circle { center, radius } => {
                paint::stroke_circle(image, center, radius, width, color);
            }
            Self::Line { from, to } => {
                paint::stroke_segment(image, from, to, width, color);
            }
            Self::Arrow { from, to, head } => {
                paint::stroke_segment(image, from, to, width, color);
                for tip in head {
                    paint::stroke_segment(image, to, tip, width, color);
                }
            }
        }
    }
}
