//! Card widget: a bordered, colored panel with hover/press feedback that
//! hosts nested child widgets.
//!
//! A card is a group panel dressed up with interaction styling. It never
//! grows scrollbars, and it is always dynamic so the background color it
//! resolves becomes the ambient background for whatever the caller nests
//! inside it. Per-card scroll offsets persist across frames in the
//! enclosing window's store, keyed by the hash of a caller-supplied key;
//! two cards given the same key share the same offsets.

use crate::behavior::{InteractPhase, InteractState, button_behavior};
use crate::context::identity_hash;
use crate::{CardStyle, Color, CommandBuffer, Context, PanelFlags, PanelKind, Rect, Vec2};

/// Result of [`card_begin`]. Call [`card_end`] exactly when this is
/// [`CardBegin::Open`]; every other variant means the card's panel was
/// either never opened or already torn down.
#[must_use = "card_end must be called if and only if the card opened"]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardBegin {
    /// The card is fully outside the active clip. Layout space was still
    /// consumed, so siblings land where they should.
    Skipped,
    /// The card is visible; render content, then call [`card_end`].
    Open {
        /// The card itself was clicked this frame.
        pressed: bool,
    },
    Closed,
    Minimized,
}

impl CardBegin {
    pub fn is_open(&self) -> bool {
        matches!(self, CardBegin::Open { .. })
    }
}

/// Queue the card's background and border. Pure: picks the state color
/// (active over hovered over normal), applies the background color factor,
/// and returns the color actually used so the lifecycle can install it as
/// the ambient panel background.
pub(crate) fn draw_card(
    out: &mut CommandBuffer,
    bounds: Rect,
    state: InteractState,
    style: &CardStyle,
) -> Color {
    let base = match state.phase {
        InteractPhase::Normal => style.normal,
        InteractPhase::Hovered => style.hover,
        InteractPhase::Active => style.active,
    };
    let background = base.factor(style.color_factor_background);
    out.fill_rect(bounds, style.rounding, background);
    out.stroke_rect(
        bounds,
        style.rounding,
        style.border,
        style.border_color.factor(style.color_factor_background),
    );
    background
}

/// Open a card. Reserves one full-width layout row of
/// `height + 2 * margin.y`, draws the card, and pushes a nested panel over
/// the content rectangle. The ambient window background and text color are
/// retargeted to the card's resolved colors until the caller restores its
/// style, so nested widgets blend in without explicit styling.
pub fn card_begin(ctx: &mut Context, key: &str, height: f32, style: &CardStyle) -> CardBegin {
    // Insufficient padding lets child content overlap the rounded border.
    // Purely cosmetic, so release builds carry on.
    debug_assert!(
        style.padding.x * 2.0 >= style.rounding && style.padding.y * 2.0 >= style.rounding,
        "card padding must be at least half the rounding per axis"
    );

    if !ctx.is_building() {
        log::warn!("card_begin outside a frame");
        return CardBegin::Skipped;
    }
    let Some(active) = ctx.active_panel() else {
        log::warn!("card_begin with no open window");
        return CardBegin::Skipped;
    };
    let read_only = active.is_read_only();

    let total_height = height + style.margin.y * 2.0;
    ctx.layout_row_dynamic(total_height, 1);
    let Some(bounds) = ctx.alloc_space() else {
        return CardBegin::Skipped;
    };

    // Fast path for off-screen cards: the row above already advanced the
    // cursor, nothing else may be touched.
    if !ctx.current_clip().intersects(&bounds) {
        return CardBegin::Skipped;
    }

    let mut flags = PanelFlags::NO_SCROLLBAR | PanelFlags::DYNAMIC;
    if read_only {
        flags |= PanelFlags::ROM;
    }

    let bounds = bounds.shrink(style.margin);

    let mut state = InteractState::default();
    let input = if read_only { None } else { Some(&ctx.input) };
    let pressed = button_behavior(
        &mut state,
        bounds.pad(style.touch_padding),
        input,
        ctx.style.click_trigger,
    );

    let Some(out) = ctx.buffer_mut() else {
        return CardBegin::Skipped;
    };
    let background = draw_card(out, bounds, state, style);

    ctx.style.window.background = background;
    let text = match state.phase {
        InteractPhase::Normal => style.text_normal,
        InteractPhase::Hovered => style.text_hover,
        InteractPhase::Active => style.text_active,
    };
    ctx.style.text.color = text.factor(style.color_factor_text);

    let content = bounds.shrink(style.padding);

    // Persistent offsets, created on first use and shared by every card
    // with the same key in this window.
    let hash = identity_hash(key.as_bytes(), PanelKind::Group.salt());
    let (offset_x, offset_y) = {
        let Some(win) = ctx.current_window_mut() else {
            return CardBegin::Skipped;
        };
        match (win.find_value(hash), win.find_value(hash.wrapping_add(1))) {
            (Some(x), Some(y)) => (x, y),
            _ => (
                win.add_value(hash, 0),
                win.add_value(hash.wrapping_add(1), 0),
            ),
        }
    };

    ctx.group_panel_begin(
        content,
        flags,
        Vec2::new(offset_x as f32, offset_y as f32),
        Some(hash),
        background,
    );

    // Only reachable if something upstream forced close/minimize flags onto
    // the panel; default card flags never do.
    let panel_flags = ctx.active_panel().map(|p| p.flags).unwrap_or_default();
    if panel_flags.intersects(PanelFlags::CLOSED | PanelFlags::MINIMIZED) {
        let parent_clip = ctx
            .active_panel()
            .and_then(|p| p.parent)
            .and_then(|i| ctx.panel_at(i))
            .map(|p| p.clip)
            .unwrap_or(Rect::EVERYTHING);
        let _ = ctx.group_panel_end();
        if let Some(buf) = ctx.buffer_mut() {
            buf.push_scissor(parent_clip);
        }
        return if panel_flags.contains(PanelFlags::CLOSED) {
            CardBegin::Closed
        } else {
            CardBegin::Minimized
        };
    }

    CardBegin::Open { pressed }
}

/// Close the card opened by the matching [`card_begin`]. Restores the
/// enclosing panel's clip exactly and returns the card panel's final
/// bounds (dynamic height included) for the caller's bookkeeping.
pub fn card_end(ctx: &mut Context) -> Rect {
    let Some(panel) = ctx.active_panel() else {
        debug_assert!(false, "card_end without card_begin");
        log::warn!("card_end without card_begin");
        return Rect::default();
    };
    if panel.kind != PanelKind::Group {
        debug_assert!(false, "card_end without card_begin");
        log::warn!("card_end without an open card");
        return Rect::default();
    }

    let child_bounds = panel.bounds;
    let child_header = panel.header_height;
    let child_border = panel.border;
    let child_flags = panel.flags;
    let parent_clip = panel
        .parent
        .and_then(|i| ctx.panel_at(i))
        .map(|p| p.clip)
        .unwrap_or(Rect::EVERYTHING);

    // Full extent of the child: bounds grown back out by the group padding
    // convention and the header, plus the border when one is drawn.
    let group_padding = ctx.style.window.group_padding;
    let mut extent = Rect::new(
        child_bounds.x - group_padding.x,
        child_bounds.y - child_header,
        child_bounds.w + group_padding.x * 2.0,
        child_bounds.h + child_header,
    );
    if child_flags.contains(PanelFlags::BORDER) {
        extent = extent.pad(Vec2::splat(child_border));
    }

    // Everything drawn while closing the child stays inside the widened
    // clip; the second scissor puts the parent clip back for siblings.
    let closing_clip = parent_clip.union_bounds(&extent);
    if let Some(buf) = ctx.buffer_mut() {
        buf.push_scissor(closing_clip);
    }
    let final_bounds = ctx.group_panel_end();
    if let Some(buf) = ctx.buffer_mut() {
        buf.push_scissor(parent_clip);
    }
    final_bounds
}
