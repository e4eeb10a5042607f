//! Hit-testing state machine shared by button-like widgets.

use crate::{ClickTrigger, Input, PointerButton, Rect};

/// Base interaction phase, in precedence order: an active widget is also
/// hovered, but draws with the active style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractPhase {
    #[default]
    Normal,
    Hovered,
    Active,
}

/// Recomputed from scratch every frame; the only cross-frame memory is the
/// previous pointer position inside the input snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InteractState {
    pub phase: InteractPhase,
    /// Pointer moved into the rectangle this frame.
    pub entered: bool,
    /// Pointer was in the rectangle last frame and the hover edge fired.
    pub left: bool,
}

impl InteractState {
    pub fn is_hovered(&self) -> bool {
        matches!(self.phase, InteractPhase::Hovered | InteractPhase::Active)
    }
}

/// Run one frame of button behavior over `bounds` (already expanded by any
/// touch padding). Writes the resulting state through `state` and returns
/// whether the widget activated this frame.
///
/// `input: None` is the read-only path: state resets to normal and the
/// widget never activates.
pub fn button_behavior(
    state: &mut InteractState,
    bounds: Rect,
    input: Option<&Input>,
    trigger: ClickTrigger,
) -> bool {
    *state = InteractState::default();
    let Some(input) = input else {
        return false;
    };

    let mut activated = false;
    if input.hovering(bounds) {
        state.phase = InteractPhase::Hovered;
        if input.is_down(PointerButton::Primary) {
            state.phase = InteractPhase::Active;
        }
        if input.click_started_in(PointerButton::Primary, bounds) {
            activated = match trigger {
                ClickTrigger::OnRelease => input.is_released(PointerButton::Primary),
                ClickTrigger::OnPress => input.is_pressed(PointerButton::Primary),
            };
        }
    }

    // Edge triggers layer on top of the base phase.
    if state.is_hovered() && !input.prev_hovering(bounds) {
        state.entered = true;
    } else if input.prev_hovering(bounds) {
        state.left = true;
    }
    activated
}
