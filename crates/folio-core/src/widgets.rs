//! Leaf widgets: label and button. Both allocate from the current row and
//! share the behavior/draw split the card uses.

use crate::behavior::{InteractPhase, InteractState, button_behavior};
use crate::{Context, Rect, Vec2};

/// Line boxes are laid out at 1.3x the font size, matching the shaper.
const LINE_HEIGHT: f32 = 1.3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

fn text_origin(bounds: Rect, width: f32, px: f32, align: TextAlign) -> Vec2 {
    let x = match align {
        TextAlign::Left => bounds.x,
        TextAlign::Center => bounds.x + ((bounds.w - width).max(0.0)) / 2.0,
        TextAlign::Right => bounds.x + (bounds.w - width).max(0.0),
    };
    let y = bounds.y + ((bounds.h - px * LINE_HEIGHT).max(0.0)) / 2.0;
    Vec2::new(x, y)
}

pub fn label(ctx: &mut Context, text: &str, align: TextAlign) {
    let Some(bounds) = ctx.alloc_space() else {
        return;
    };
    if !ctx.current_clip().intersects(&bounds) {
        return;
    }
    let style = ctx.style.text;
    let width = folio_text::measure_line(text, style.size);
    let pos = text_origin(bounds, width, style.size, align);
    if let Some(buf) = ctx.buffer_mut() {
        buf.text(pos, text, style.size, style.color);
    }
}

/// Draws a push button with the given title; true when it was clicked this
/// frame (per the context's click trigger).
pub fn button(ctx: &mut Context, title: &str) -> bool {
    let Some(bounds) = ctx.alloc_space() else {
        return false;
    };
    if !ctx.current_clip().intersects(&bounds) {
        return false;
    }

    let style = ctx.style.button;
    let text_size = ctx.style.text.size;
    let read_only = ctx
        .active_panel()
        .map(|p| p.is_read_only())
        .unwrap_or(true);

    let mut state = InteractState::default();
    let input = if read_only { None } else { Some(&ctx.input) };
    let pressed = button_behavior(
        &mut state,
        bounds.pad(style.touch_padding),
        input,
        ctx.style.click_trigger,
    );

    let (background, text_color) = match state.phase {
        InteractPhase::Normal => (style.normal, style.text_normal),
        InteractPhase::Hovered => (style.hover, style.text_hover),
        InteractPhase::Active => (style.active, style.text_active),
    };

    let width = folio_text::measure_line(title, text_size);
    let inner = bounds.shrink(style.padding);
    let pos = text_origin(inner, width, text_size, TextAlign::Center);
    if let Some(buf) = ctx.buffer_mut() {
        buf.fill_rect(bounds, style.rounding, background);
        buf.stroke_rect(bounds, style.rounding, style.border, style.border_color);
        buf.text(pos, title, text_size, text_color);
    }
    pressed
}

/// Reserve one empty cell of the current row.
pub fn spacing(ctx: &mut Context) {
    let _ = ctx.alloc_space();
}
