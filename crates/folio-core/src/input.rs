//! Per-frame input snapshot.
//!
//! The platform runner brackets each frame with [`Input::begin`] /
//! [`Input::end`] and feeds pointer motion and button transitions in
//! between. Widgets only ever query the snapshot; the only history it
//! carries is the previous frame's pointer position and, per button, the
//! position where the current press started.

use crate::{Rect, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,   // Left mouse, touch
    Secondary, // Right mouse
    Tertiary,  // Middle mouse
}

const BUTTON_COUNT: usize = 3;

#[derive(Clone, Copy, Debug, Default)]
struct ButtonState {
    down: bool,
    /// State changes seen this frame (press or release).
    transitions: u32,
    /// Where the most recent press started.
    pressed_at: Vec2,
}

#[derive(Clone, Debug, Default)]
pub struct Input {
    pointer: Vec2,
    pointer_prev: Vec2,
    scroll: Vec2,
    buttons: [ButtonState; BUTTON_COUNT],
}

impl Input {
    /// Start collecting a new frame of input. The current pointer position
    /// becomes the previous-frame position; per-frame transitions reset.
    pub fn begin(&mut self) {
        self.pointer_prev = self.pointer;
        self.scroll = Vec2::ZERO;
        for b in &mut self.buttons {
            b.transitions = 0;
        }
    }

    pub fn motion(&mut self, pos: Vec2) {
        self.pointer = pos;
    }

    pub fn button(&mut self, button: PointerButton, pos: Vec2, down: bool) {
        let b = &mut self.buttons[button as usize];
        if b.down == down {
            return;
        }
        if down {
            b.pressed_at = pos;
        }
        b.down = down;
        b.transitions += 1;
    }

    pub fn scroll(&mut self, delta: Vec2) {
        self.scroll.x += delta.x;
        self.scroll.y += delta.y;
    }

    /// Finish the frame's input collection. Nothing to finalize today; the
    /// bracket exists so the platform layer has a fixed protocol.
    pub fn end(&mut self) {}

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Pointer movement since the previous frame.
    pub fn pointer_delta(&self) -> Vec2 {
        Vec2::new(
            self.pointer.x - self.pointer_prev.x,
            self.pointer.y - self.pointer_prev.y,
        )
    }

    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll
    }

    pub fn hovering(&self, rect: Rect) -> bool {
        rect.contains(self.pointer)
    }

    pub fn prev_hovering(&self, rect: Rect) -> bool {
        rect.contains(self.pointer_prev)
    }

    pub fn is_down(&self, button: PointerButton) -> bool {
        self.buttons[button as usize].down
    }

    /// Button went down this frame.
    pub fn is_pressed(&self, button: PointerButton) -> bool {
        let b = &self.buttons[button as usize];
        b.down && b.transitions > 0
    }

    /// Button came up this frame.
    pub fn is_released(&self, button: PointerButton) -> bool {
        let b = &self.buttons[button as usize];
        !b.down && b.transitions > 0
    }

    /// The current (or most recent) press of `button` started inside `rect`.
    pub fn click_started_in(&self, button: PointerButton, rect: Rect) -> bool {
        rect.contains(self.buttons[button as usize].pressed_at)
    }
}
