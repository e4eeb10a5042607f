//! Window records: named, retained across frames.

use std::collections::HashMap;

use slotmap::new_key_type;

use crate::{CommandBuffer, PanelFlags, Rect};

new_key_type! {
    pub struct WindowId;
}

/// A top-level window. Created lazily on the first `window_begin` for a
/// given title and retained until the context is dropped; its key-value
/// store is where widgets park persistent integer state (scroll offsets).
#[derive(Debug)]
pub struct Window {
    pub(crate) name: u64,
    pub(crate) title: String,
    pub bounds: Rect,
    pub flags: PanelFlags,
    pub(crate) buffer: CommandBuffer,
    /// A header drag is in progress.
    pub(crate) moving: bool,
    storage: HashMap<u64, u32>,
}

impl Window {
    pub(crate) fn new(name: u64, title: &str, bounds: Rect, flags: PanelFlags) -> Self {
        Window {
            name,
            title: title.to_owned(),
            bounds,
            flags,
            buffer: CommandBuffer::new(),
            moving: false,
            storage: HashMap::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Stable identity of this window (hash of its title).
    pub fn name_hash(&self) -> u64 {
        self.name
    }

    /// Look up a stored slot.
    pub(crate) fn find_value(&self, key: u64) -> Option<u32> {
        self.storage.get(&key).copied()
    }

    /// Create-and-initialize a slot. Returns the stored value, which is the
    /// existing one if the key was already present.
    pub(crate) fn add_value(&mut self, key: u64, value: u32) -> u32 {
        *self.storage.entry(key).or_insert(value)
    }

    pub(crate) fn set_value(&mut self, key: u64, value: u32) {
        self.storage.insert(key, value);
    }

    #[cfg(test)]
    pub(crate) fn storage_len(&self) -> usize {
        self.storage.len()
    }
}
