//! The GUI context: one per thread of UI, owner of every piece of mutable
//! toolkit state.
//!
//! A frame is built strictly inside `frame_begin`/`frame_end`. Windows are
//! retained across frames and resolved by a hash of their title; panels are
//! per-frame records on a vector-backed stack, with parent links expressed
//! as indices into that stack.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use slotmap::SlotMap;

use crate::panel::RowLayout;
use crate::window::WindowId;
use crate::{
    Color, CommandBuffer, Frame, Input, Panel, PanelFlags, PanelKind, PointerButton, Rect, Style,
    Vec2, Window,
};

/// Stable hash for widget and window identities. Salted by panel kind so a
/// window name can never collide with a widget key inside it.
pub(crate) fn identity_hash(bytes: &[u8], salt: u64) -> u64 {
    let mut h = ahash::AHasher::default();
    salt.hash(&mut h);
    bytes.hash(&mut h);
    h.finish()
}

pub struct Context {
    pub style: Style,
    pub input: Input,
    windows: SlotMap<WindowId, Window>,
    lookup: HashMap<u64, WindowId>,
    /// Windows begun this frame, in begin order; drained at frame end.
    order: Vec<WindowId>,
    /// Panel stack for the window currently being built.
    panels: Vec<Panel>,
    current: Option<WindowId>,
    building: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Style::dark())
    }
}

impl Context {
    pub fn new(style: Style) -> Self {
        Context {
            style,
            input: Input::default(),
            windows: SlotMap::with_key(),
            lookup: HashMap::new(),
            order: Vec::new(),
            panels: Vec::new(),
            current: None,
            building: false,
        }
    }

    // ---------------------------------------------------------------- frame

    pub fn frame_begin(&mut self) {
        debug_assert!(!self.building, "frame_begin while a frame is already open");
        self.building = true;
        self.order.clear();
        self.panels.clear();
        self.current = None;
    }

    pub fn frame_end(&mut self) -> Frame {
        debug_assert!(self.building, "frame_end without frame_begin");
        if self.current.is_some() || !self.panels.is_empty() {
            log::warn!("frame_end with an unclosed window; discarding its panel stack");
            self.panels.clear();
            self.current = None;
        }
        let mut frame = Frame {
            clear: self.style.clear_color,
            commands: Vec::new(),
        };
        for id in self.order.drain(..) {
            if let Some(win) = self.windows.get_mut(id) {
                win.buffer.drain_into(&mut frame.commands);
            }
        }
        self.building = false;
        frame
    }

    pub fn is_building(&self) -> bool {
        self.building
    }

    // --------------------------------------------------------------- window

    /// Begin a named window. Creates it on first use with the given bounds;
    /// afterwards the stored bounds win, so `MOVABLE` windows keep their
    /// dragged position. Returns false when the window is collapsed or
    /// closed; skip its content, but still call [`Context::window_end`].
    pub fn window_begin(&mut self, title: &str, bounds: Rect, flags: PanelFlags) -> bool {
        if !self.building {
            log::warn!("window_begin outside a frame");
            return false;
        }
        if self.current.is_some() {
            log::warn!("window_begin while another window is open");
            return false;
        }

        let name = identity_hash(title.as_bytes(), PanelKind::Window.salt());
        let existing = self
            .lookup
            .get(&name)
            .copied()
            .filter(|id| self.windows.contains_key(*id));
        let id = match existing {
            Some(id) => {
                self.windows[id].flags = flags;
                id
            }
            None => {
                let id = self.windows.insert(Window::new(name, title, bounds, flags));
                self.lookup.insert(name, id);
                id
            }
        };
        self.order.push(id);
        self.current = Some(id);

        let style = self.style;
        let header_height = if flags.contains(PanelFlags::TITLE) {
            style.window.header.height
        } else {
            0.0
        };

        // Drag before layout so this frame already draws at the new spot.
        // The drag latches on a press that starts in the header and follows
        // the pointer until release.
        if flags.contains(PanelFlags::MOVABLE) && !flags.contains(PanelFlags::ROM) {
            let grab = {
                let b = self.windows[id].bounds;
                Rect::new(b.x, b.y, b.w, header_height.max(style.window.header.height))
            };
            let start = self.input.is_pressed(PointerButton::Primary)
                && self.input.click_started_in(PointerButton::Primary, grab);
            let held = self.input.is_down(PointerButton::Primary);
            let delta = self.input.pointer_delta();

            let win = &mut self.windows[id];
            if start {
                win.moving = true;
            }
            if !held {
                win.moving = false;
            }
            if win.moving {
                win.bounds.x += delta.x;
                win.bounds.y += delta.y;
            }
        }

        let win = &mut self.windows[id];
        let bounds = win.bounds;
        let title_text = win.title.clone();
        win.buffer.clear();
        win.buffer
            .fill_rect(bounds, 0.0, style.window.background);
        if flags.contains(PanelFlags::TITLE) {
            let header = Rect::new(bounds.x, bounds.y, bounds.w, header_height);
            win.buffer.fill_rect(header, 0.0, style.window.header.background);
            let text_pos = Vec2::new(
                header.x + style.window.header.padding.x,
                header.y + ((header.h - style.text.size * 1.3).max(0.0)) / 2.0,
            );
            win.buffer
                .text(text_pos, &title_text, style.text.size, style.window.header.text);
        }

        let content = Rect::new(
            bounds.x + style.window.padding.x,
            bounds.y + header_height + style.window.padding.y,
            (bounds.w - style.window.padding.x * 2.0).max(0.0),
            (bounds.h - header_height - style.window.padding.y * 2.0).max(0.0),
        );

        let mut panel = Panel::new(PanelKind::Window, bounds, flags);
        panel.header_height = header_height;
        panel.border = style.window.border;
        panel.background = style.window.background;
        panel.clip = content;
        panel.at_y = content.y;
        panel.max_y = content.y;
        win.buffer.push_scissor(content);
        self.panels.push(panel);

        !flags.intersects(PanelFlags::CLOSED | PanelFlags::MINIMIZED)
    }

    pub fn window_end(&mut self) {
        if !self.building || self.current.is_none() {
            debug_assert!(false, "window_end without window_begin");
            log::warn!("window_end without window_begin");
            return;
        }
        while self
            .panels
            .last()
            .is_some_and(|p| p.kind != PanelKind::Window)
        {
            log::warn!("window_end with an unclosed card; closing it");
            self.panels.pop();
        }
        let Some(panel) = self.panels.pop() else {
            self.current = None;
            return;
        };

        let id = self.current.take().expect("checked above");
        let style = self.style;
        if let Some(win) = self.windows.get_mut(id) {
            win.buffer.push_scissor(Rect::EVERYTHING);
            if panel.flags.contains(PanelFlags::BORDER) {
                win.buffer
                    .stroke_rect(panel.bounds, 0.0, panel.border, style.window.border_color);
            }
        }
    }

    // --------------------------------------------------------------- layout

    /// Start a row of equal-width columns spanning the panel's inner width.
    pub fn layout_row_dynamic(&mut self, height: f32, columns: usize) {
        self.declare_row(height, columns.max(1), &[]);
    }

    /// Start a row with one column per entry in `ratios`, each a fraction of
    /// the panel's inner width.
    pub fn layout_row(&mut self, height: f32, ratios: &[f32]) {
        if ratios.is_empty() {
            self.declare_row(height, 1, &[]);
        } else {
            self.declare_row(height, ratios.len(), ratios);
        }
    }

    fn declare_row(&mut self, height: f32, columns: usize, ratios: &[f32]) {
        let spacing = self.style.window.spacing;
        let Some(panel) = self.panels.last_mut() else {
            log::warn!("layout row declared with no active panel");
            return;
        };
        if panel.row.columns > 0 {
            panel.at_y += panel.row.height + spacing.y;
        }
        panel.row = RowLayout {
            height,
            columns,
            ratios: ratios.iter().copied().collect(),
            index: 0,
        };
    }

    /// Allocate the next widget rectangle from the current row. The layout
    /// cursor always advances, whatever the clip outcome. Custom widgets
    /// build on this the same way [`crate::widgets`] does.
    pub fn alloc_space(&mut self) -> Option<Rect> {
        let style = self.style;
        let panel = self.panels.last_mut()?;

        if panel.row.columns == 0 {
            // No row declared; fall back to one text-height column.
            panel.row = RowLayout {
                height: style.text.size + style.window.spacing.y,
                columns: 1,
                ratios: Default::default(),
                index: 0,
            };
        }
        if panel.row.index >= panel.row.columns {
            panel.at_y += panel.row.height + style.window.spacing.y;
            panel.row.index = 0;
        }

        let pad = match panel.kind {
            PanelKind::Window => style.window.padding,
            PanelKind::Group => style.window.group_padding,
        };
        let inner_x = panel.bounds.x + pad.x;
        let avail = (panel.bounds.w - pad.x * 2.0).max(0.0);
        let columns = panel.row.columns;
        let spacing_total = style.window.spacing.x * (columns as f32 - 1.0);
        let usable = (avail - spacing_total).max(0.0);

        let (x_off, width) = if panel.row.ratios.is_empty() {
            let w = usable / columns as f32;
            (
                (w + style.window.spacing.x) * panel.row.index as f32,
                w,
            )
        } else {
            let prefix: f32 = panel.row.ratios[..panel.row.index].iter().sum();
            (
                usable * prefix + style.window.spacing.x * panel.row.index as f32,
                usable * panel.row.ratios[panel.row.index],
            )
        };

        let rect = Rect::new(
            inner_x + x_off - panel.offset.x,
            panel.at_y - panel.offset.y,
            width,
            panel.row.height,
        );
        panel.row.index += 1;
        panel.max_y = panel.max_y.max(panel.at_y + panel.row.height);
        Some(rect)
    }

    // ---------------------------------------------------------------- panel

    /// Clip rectangle currently in effect for widget allocation.
    pub fn current_clip(&self) -> Rect {
        self.panels.last().map(|p| p.clip).unwrap_or(Rect::EVERYTHING)
    }

    /// The innermost open panel: the window itself, or the deepest open
    /// card.
    pub fn active_panel(&self) -> Option<&Panel> {
        self.panels.last()
    }

    pub fn active_panel_mut(&mut self) -> Option<&mut Panel> {
        self.panels.last_mut()
    }

    pub fn panel_at(&self, index: usize) -> Option<&Panel> {
        self.panels.get(index)
    }

    /// Depth of the panel stack; 1 inside a window with no open card.
    pub fn panel_depth(&self) -> usize {
        self.panels.len()
    }

    pub fn current_window(&self) -> Option<&Window> {
        self.windows.get(self.current?)
    }

    pub fn current_window_mut(&mut self) -> Option<&mut Window> {
        let id = self.current?;
        self.windows.get_mut(id)
    }

    pub(crate) fn buffer_mut(&mut self) -> Option<&mut CommandBuffer> {
        self.current_window_mut().map(|w| &mut w.buffer)
    }

    /// Push a nested group panel scoped to `bounds` and make it active.
    /// Clips to the intersection of the parent clip and the group bounds and
    /// records the scissor change.
    pub(crate) fn group_panel_begin(
        &mut self,
        bounds: Rect,
        flags: PanelFlags,
        offset: Vec2,
        store_key: Option<u64>,
        background: Color,
    ) {
        let parent = self.panels.len().checked_sub(1);
        let parent_clip = self.current_clip();
        let clip = parent_clip.intersect(&bounds);

        let group_padding = self.style.window.group_padding;
        let mut panel = Panel::new(PanelKind::Group, bounds, flags);
        panel.clip = clip;
        panel.offset = offset;
        panel.store_key = store_key;
        panel.background = background;
        panel.parent = parent;
        panel.at_y = bounds.y + group_padding.y;
        panel.max_y = panel.at_y;
        self.panels.push(panel);

        if let Some(buf) = self.buffer_mut() {
            buf.push_scissor(clip);
        }
    }

    /// Finalize and pop the active group panel: dynamic height from the
    /// content extent, scroll offsets written back to the window store.
    /// Returns the panel's final bounds. Scissor state is the caller's
    /// business.
    pub(crate) fn group_panel_end(&mut self) -> Rect {
        let Some(mut panel) = self.panels.pop() else {
            debug_assert!(false, "group_panel_end with an empty panel stack");
            return Rect::default();
        };
        debug_assert_eq!(panel.kind, PanelKind::Group, "group_panel_end on a window panel");

        if panel.flags.contains(PanelFlags::DYNAMIC) {
            let group_padding = self.style.window.group_padding;
            panel.bounds.h = (panel.max_y - panel.bounds.y + group_padding.y).max(0.0);
        }
        if let Some(key) = panel.store_key {
            let offset = panel.offset;
            if let Some(win) = self.current_window_mut() {
                win.set_value(key, offset.x.max(0.0) as u32);
                win.set_value(key.wrapping_add(1), offset.y.max(0.0) as u32);
            }
        }
        panel.bounds
    }

    #[cfg(test)]
    pub(crate) fn window_by_title(&self, title: &str) -> Option<&Window> {
        let name = identity_hash(title.as_bytes(), PanelKind::Window.salt());
        self.lookup.get(&name).and_then(|id| self.windows.get(*id))
    }
}
