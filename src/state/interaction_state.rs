//! The interaction state machine driving a canvas.
//!
//! Every pointer gesture moves the machine through these states:
//! ```text
//!            pointer-down (pen, eraser, shapes)
//!   ┌──────┐ ─────────────────────────────────► ┌───────────────┐
//!   │      │                                    │ GestureActive │ ◄─┐ pointer-move
//!   │ Idle │ ◄───────────────────────────────── └───────────────┘ ──┘
//!   │      │      pointer-up / pointer-leave (commit)
//!   │      │
//!   │      │ pointer-down (text, deferred prompt)
//!   │      │ ─────────────────────────────────► ┌───────────────────┐
//!   │      │ ◄───────────────────────────────── │ AwaitingTextInput │
//!   └──────┘      text resolved or cancelled    └───────────────────┘
//! ```
//!
//! A text prompt that is answered synchronously never leaves `Idle`.
//! Pointer events in `AwaitingTextInput` are ignored.
use egui::Pos2;

use crate::surface::Snapshot;
use crate::tools::{FreehandPath, ToolMode};

/// What a gesture keeps between moves.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureKind {
    /// Pen and eraser extend a path directly in the buffer.
    Freehand(FreehandPath),
    /// Shape tools redraw on top of the pixels captured at pointer-down.
    Preview { pre_gesture: Snapshot },
}

/// Transient state of one pointer-down → pointer-up interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub mode: ToolMode,
    pub start: Pos2,
    pub kind: GestureKind,
    /// Number of moves received so far
    pub moves: usize,
}

impl Gesture {
    pub fn freehand(mode: ToolMode, start: Pos2) -> Self {
        Self {
            mode,
            start,
            kind: GestureKind::Freehand(FreehandPath::begin(start)),
            moves: 0,
        }
    }

    pub fn preview(mode: ToolMode, start: Pos2, pre_gesture: Snapshot) -> Self {
        Self {
            mode,
            start,
            kind: GestureKind::Preview { pre_gesture },
            moves: 0,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.moves == 0
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    /// No gesture and no outstanding prompt
    #[default]
    Idle,
    /// A pointer is down and a gesture is in progress
    GestureActive(Gesture),
    /// A text stamp is waiting for the host to supply its content
    AwaitingTextInput { at: Pos2 },
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::GestureActive(_) => "GestureActive",
            Self::AwaitingTextInput { .. } => "AwaitingTextInput",
        }
    }

    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &InteractionState) -> bool {
        match (self, new_state) {
            // From Idle, we can start a gesture or wait for text
            (Self::Idle, _) => true,

            // Everything else only ever returns to Idle
            (Self::GestureActive(_), Self::Idle) => true,
            (Self::AwaitingTextInput { .. }, Self::Idle) => true,

            _ => false,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_gesture_active(&self) -> bool {
        matches!(self, Self::GestureActive(_))
    }

    pub fn is_awaiting_text(&self) -> bool {
        matches!(self, Self::AwaitingTextInput { .. })
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        match self {
            Self::GestureActive(gesture) => Some(gesture),
            _ => None,
        }
    }

    pub fn gesture_mut(&mut self) -> Option<&mut Gesture> {
        match self {
            Self::GestureActive(gesture) => Some(gesture),
            _ => None,
        }
    }

    /// Where the outstanding text stamp will land, if one is pending.
    pub fn pending_text(&self) -> Option<Pos2> {
        match self {
            Self::AwaitingTextInput { at } => Some(*at),
            _ => None,
        }
    }
}
