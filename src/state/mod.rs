mod interaction_state;

pub use interaction_state::{Gesture, GestureKind, InteractionState};
