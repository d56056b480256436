use crate::canvas::Canvas;

use super::PointerEvent;

/// Routes a pointer event to the matching canvas operation.
pub fn route_event(canvas: &mut Canvas, event: PointerEvent) {
    match event {
        PointerEvent::Down { pos, modifiers } => canvas.on_pointer_down(pos, modifiers),
        PointerEvent::Move { pos, modifiers } => canvas.on_pointer_move(pos, modifiers),
        PointerEvent::Up => canvas.on_pointer_up(),
        PointerEvent::Leave => canvas.on_pointer_leave(),
    }
}
