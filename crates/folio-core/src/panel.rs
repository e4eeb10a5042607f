//! Panel records and per-row layout state.
//!
//! Panels form a strict stack for the duration of a window's build:
//! the window panel at the bottom, one group panel pushed per open card.
//! The stack is a plain vector owned by the context; parent links are
//! indices into it, never pointers.

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::{Color, Rect, Vec2};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct PanelFlags: u32 {
        /// Stroke the panel outline on close.
        const BORDER = 1 << 0;
        /// Window can be dragged by its header.
        const MOVABLE = 1 << 1;
        /// Window draws a header with its title.
        const TITLE = 1 << 2;
        /// Never grow scrollbars. Cards always set this.
        const NO_SCROLLBAR = 1 << 3;
        /// Panel height follows its content. Cards always set this so the
        /// ambient background they install is inherited by nested content.
        const DYNAMIC = 1 << 4;
        /// Read-only: widgets lay out and draw but receive no input.
        const ROM = 1 << 5;
        /// Panel was closed by its owner this frame.
        const CLOSED = 1 << 6;
        /// Panel is collapsed to its header.
        const MINIMIZED = 1 << 7;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelKind {
    Window,
    Group,
}

impl PanelKind {
    /// Namespace salt mixed into identity hashes so window names and
    /// per-window widget keys cannot collide.
    pub(crate) fn salt(self) -> u64 {
        match self {
            PanelKind::Window => 0x57494e44,
            PanelKind::Group => 0x47525550,
        }
    }
}

/// Current row of the layout cursor. Declared by the `layout_row*` calls,
/// consumed column by column by widget allocation.
#[derive(Clone, Debug, Default)]
pub(crate) struct RowLayout {
    pub height: f32,
    pub columns: usize,
    /// Per-column width ratios; empty means equal columns.
    pub ratios: SmallVec<[f32; 8]>,
    /// Next column to allocate.
    pub index: usize,
}

#[derive(Clone, Debug)]
pub struct Panel {
    pub kind: PanelKind,
    pub bounds: Rect,
    pub flags: PanelFlags,
    /// Clip rectangle in effect while this panel is active.
    pub clip: Rect,
    /// Scroll offsets installed from the window store at panel begin and
    /// written back at panel end.
    pub offset: Vec2,
    /// Store key the offsets came from, if any.
    pub(crate) store_key: Option<u64>,
    /// Ambient background nested content inherits.
    pub background: Color,
    pub header_height: f32,
    pub border: f32,
    /// Index of the enclosing panel in the context's panel stack.
    pub parent: Option<usize>,
    /// Top of the row currently being laid out, in window space.
    pub(crate) at_y: f32,
    /// Lowest extent content has reached; the final height of DYNAMIC
    /// panels.
    pub(crate) max_y: f32,
    pub(crate) row: RowLayout,
}

impl Panel {
    pub(crate) fn new(kind: PanelKind, bounds: Rect, flags: PanelFlags) -> Self {
        Panel {
            kind,
            bounds,
            flags,
            clip: Rect::EVERYTHING,
            offset: Vec2::ZERO,
            store_key: None,
            background: Color::TRANSPARENT,
            header_height: 0.0,
            border: 0.0,
            parent: None,
            at_y: bounds.y,
            max_y: bounds.y,
            row: RowLayout::default(),
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.flags.contains(PanelFlags::ROM)
    }
}
