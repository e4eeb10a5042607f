//! Renderer-agnostic draw command list.
//!
//! Every window records into its own [`CommandBuffer`] during the build
//! pass; [`crate::Context::frame_end`] concatenates the buffers in window
//! order into a [`Frame`] the backend replays. Scissor commands carry
//! absolute rectangles: the core has already done all clip intersection,
//! so the backend just applies them as they come.

use crate::{Color, Rect, Vec2};

#[derive(Clone, Debug)]
pub enum DrawCommand {
    RectFilled {
        rect: Rect,
        rounding: f32,
        color: Color,
    },
    RectStroked {
        rect: Rect,
        rounding: f32,
        thickness: f32,
        color: Color,
    },
    Text {
        pos: Vec2,
        text: String,
        px: f32,
        color: Color,
    },
    Scissor {
        rect: Rect,
    },
}

#[derive(Clone, Debug)]
pub struct CommandBuffer {
    commands: Vec<DrawCommand>,
    /// Clip rectangle currently in effect for this buffer.
    pub clip: Rect,
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBuffer {
    pub fn new() -> Self {
        CommandBuffer {
            commands: Vec::new(),
            clip: Rect::EVERYTHING,
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.clip = Rect::EVERYTHING;
    }

    pub fn fill_rect(&mut self, rect: Rect, rounding: f32, color: Color) {
        if rect.is_empty() || color.3 == 0 {
            return;
        }
        self.commands.push(DrawCommand::RectFilled {
            rect,
            rounding,
            color,
        });
    }

    pub fn stroke_rect(&mut self, rect: Rect, rounding: f32, thickness: f32, color: Color) {
        if rect.is_empty() || thickness <= 0.0 || color.3 == 0 {
            return;
        }
        self.commands.push(DrawCommand::RectStroked {
            rect,
            rounding,
            thickness,
            color,
        });
    }

    pub fn text(&mut self, pos: Vec2, text: &str, px: f32, color: Color) {
        if text.is_empty() || color.3 == 0 {
            return;
        }
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_owned(),
            px,
            color,
        });
    }

    /// Install `rect` as the active clip and record the scissor change.
    pub fn push_scissor(&mut self, rect: Rect) {
        self.clip = rect;
        self.commands.push(DrawCommand::Scissor { rect });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn drain_into(&mut self, out: &mut Vec<DrawCommand>) {
        out.append(&mut self.commands);
    }
}

/// Output of one build pass: what the backend draws this tick.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub clear: Color,
    pub commands: Vec<DrawCommand>,
}
