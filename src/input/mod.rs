use egui::{Context, Key, KeyboardShortcut, Pos2, Rect};

mod router;
pub use router::route_event;

/// Modifier state that matters to the drawing core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Constrain lines and arrows to the nearest axis
    pub snap: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { snap: false };
    pub const SNAP: Self = Self { snap: true };
}

impl From<egui::Modifiers> for Modifiers {
    fn from(modifiers: egui::Modifiers) -> Self {
        Self {
            snap: modifiers.shift,
        }
    }
}

/// Pointer input already translated into buffer pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { pos: Pos2, modifiers: Modifiers },
    Move { pos: Pos2, modifiers: Modifiers },
    Up,
    Leave,
}

/// Keyboard commands the host understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Save,
    Undo,
    Redo,
    Clear,
}

impl Shortcut {
    pub const ALL: [Shortcut; 4] = [Shortcut::Clear, Shortcut::Save, Shortcut::Undo, Shortcut::Redo];

    pub fn keyboard_shortcut(self) -> KeyboardShortcut {
        let command = egui::Modifiers::COMMAND;
        match self {
            Self::Save => KeyboardShortcut::new(command, Key::S),
            Self::Undo => KeyboardShortcut::new(command, Key::Z),
            Self::Redo => KeyboardShortcut::new(command, Key::Y),
            Self::Clear => KeyboardShortcut::new(command | egui::Modifiers::SHIFT, Key::K),
        }
    }

    /// Consume the first shortcut pressed this frame, if any.
    ///
    /// Clear is checked first so Ctrl+Shift+K is not swallowed by a
    /// less specific binding.
    pub fn consume(ctx: &Context) -> Option<Shortcut> {
        ctx.input_mut(|i| {
            Self::ALL
                .into_iter()
                .find(|shortcut| i.consume_shortcut(&shortcut.keyboard_shortcut()))
        })
    }
}

/// Turns raw egui pointer state into [`PointerEvent`]s for the canvas area.
///
/// A gesture starts only when the primary button is pressed inside the
/// canvas rect; leaving the rect while pressed produces `Leave`.
#[derive(Debug, Default)]
pub struct InputHandler {
    pressed: bool,
    last_pos: Option<Pos2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Forget any press in progress, e.g. after the canvas was reallocated.
    pub fn reset(&mut self) {
        self.pressed = false;
        self.last_pos = None;
    }

    /// Give up the press in progress, e.g. because a dialog took the pointer.
    ///
    /// Returns `Leave` when a press was being tracked so the canvas can
    /// commit its gesture instead of waiting for a release it will never see.
    pub fn release(&mut self) -> Option<PointerEvent> {
        let was_pressed = self.pressed;
        self.reset();
        was_pressed.then_some(PointerEvent::Leave)
    }

    /// Process this frame's pointer input for a canvas drawn at `canvas_rect`.
    pub fn process_input(&mut self, ctx: &Context, canvas_rect: Rect) -> Vec<PointerEvent> {
        let (hover, pressed, released, modifiers) = ctx.input(|i| {
            (
                i.pointer.hover_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.modifiers,
            )
        });
        self.translate(hover, pressed, released, modifiers.into(), canvas_rect)
    }

    /// Pure translation step, separated from egui for testing.
    pub fn translate(
        &mut self,
        hover: Option<Pos2>,
        pressed: bool,
        released: bool,
        modifiers: Modifiers,
        canvas_rect: Rect,
    ) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        let inside = hover.filter(|pos| canvas_rect.contains(*pos));
        let to_canvas = |pos: Pos2| (pos - canvas_rect.min).to_pos2();

        if !self.pressed {
            if let (true, Some(pos)) = (pressed, inside) {
                events.push(PointerEvent::Down {
                    pos: to_canvas(pos),
                    modifiers,
                });
                self.pressed = true;
                self.last_pos = Some(pos);
            }
        } else {
            match inside {
                Some(pos) => {
                    if self.last_pos != Some(pos) {
                        events.push(PointerEvent::Move {
                            pos: to_canvas(pos),
                            modifiers,
                        });
                        self.last_pos = Some(pos);
                    }
                }
                None => {
                    events.push(PointerEvent::Leave);
                    self.reset();
                    return events;
                }
            }
        }

        if self.pressed && released {
            events.push(PointerEvent::Up);
            self.reset();
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn rect() -> Rect {
        Rect::from_min_size(pos2(100.0, 50.0), egui::vec2(200.0, 100.0))
    }

    #[test]
    fn test_shift_maps_to_snap() {
        let modifiers = egui::Modifiers {
            shift: true,
            ..Default::default()
        };
        assert_eq!(Modifiers::from(modifiers), Modifiers::SNAP);
        assert_eq!(Modifiers::from(egui::Modifiers::NONE), Modifiers::NONE);
    }

    #[test]
    fn test_press_drag_release() {
        let mut handler = InputHandler::new();
        let m = Modifiers::NONE;

        let events = handler.translate(Some(pos2(110.0, 60.0)), true, false, m, rect());
        assert_eq!(events, vec![PointerEvent::Down { pos: pos2(10.0, 10.0), modifiers: m }]);

        let events = handler.translate(Some(pos2(150.0, 70.0)), false, false, m, rect());
        assert_eq!(events, vec![PointerEvent::Move { pos: pos2(50.0, 20.0), modifiers: m }]);

        // no movement, no event
        let events = handler.translate(Some(pos2(150.0, 70.0)), false, false, m, rect());
        assert!(events.is_empty());

        let events = handler.translate(Some(pos2(150.0, 70.0)), false, true, m, rect());
        assert_eq!(events, vec![PointerEvent::Up]);
        assert!(!handler.is_pressed());
    }

    #[test]
    fn test_press_outside_is_ignored() {
        let mut handler = InputHandler::new();
        let events = handler.translate(Some(pos2(10.0, 10.0)), true, false, Modifiers::NONE, rect());
        assert!(events.is_empty());
        assert!(!handler.is_pressed());
    }

    #[test]
    fn test_leaving_while_pressed() {
        let mut handler = InputHandler::new();
        handler.translate(Some(pos2(110.0, 60.0)), true, false, Modifiers::NONE, rect());
        let events = handler.translate(Some(pos2(5.0, 5.0)), false, false, Modifiers::NONE, rect());
        assert_eq!(events, vec![PointerEvent::Leave]);

        // the later release belongs to nobody
        let events = handler.translate(Some(pos2(5.0, 5.0)), false, true, Modifiers::NONE, rect());
        assert!(events.is_empty());
    }

    #[test]
    fn test_release_reports_leave_only_while_pressed() {
        let mut handler = InputHandler::new();
        assert_eq!(handler.release(), None);

        handler.translate(Some(pos2(110.0, 60.0)), true, false, Modifiers::NONE, rect());
        assert_eq!(handler.release(), Some(PointerEvent::Leave));
        assert!(!handler.is_pressed());
        assert_eq!(handler.release(), None);
    }

    #[test]
    fn test_click_in_one_frame() {
        let mut handler = InputHandler::new();
        let events = handler.translate(Some(pos2(110.0, 60.0)), true, true, Modifiers::NONE, rect());
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], PointerEvent::Up);
    }
}
