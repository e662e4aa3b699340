//! core/playlist.rs
//! Ordered, mutable collection of media descriptors.
//!
//! Insertion order is playback order. The store owns transient-handle
//! release: every path that removes an operator item (`remove_at`,
//! `set_all`, `retain_bundled`, drop) releases its handle, so release
//! happens on exactly one code path per item.

use log::debug;

use crate::core::types::MediaDescriptor;

#[derive(Default)]
pub struct PlaylistStore {
    items: Vec<MediaDescriptor>,
    current_index: usize,
}

impl PlaylistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Always in `[0, len)` while the store is non-empty.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn set_current_index(&mut self, index: usize) {
        debug_assert!(index < self.items.len().max(1));
        self.current_index = index;
    }

    pub fn current(&self) -> Option<&MediaDescriptor> {
        self.items.get(self.current_index)
    }

    pub fn get(&self, index: usize) -> Option<&MediaDescriptor> {
        self.items.get(index)
    }

    /// Replace the whole sequence and reset the cursor to 0.
    /// Empty input is legal: unplayable, but a valid state.
    pub fn set_all(&mut self, items: Vec<MediaDescriptor>) {
        for old in &self.items {
            release_handle(old);
        }
        self.items = items;
        self.current_index = 0;
        debug!("playlist replaced: {} item(s)", self.items.len());
    }

    /// Add to the end; the cursor does not move.
    pub fn append(&mut self, item: MediaDescriptor) {
        self.items.push(item);
    }

    /// Remove one entry, releasing its transient handle. If the cursor
    /// would now be out of bounds it is clamped to 0.
    pub fn remove_at(&mut self, index: usize) -> Option<MediaDescriptor> {
        if index >= self.items.len() {
            return None;
        }

        let removed = self.items.remove(index);
        release_handle(&removed);

        if self.current_index >= self.items.len() {
            self.current_index = 0;
        }

        Some(removed)
    }

    /// Purge every operator-supplied item (maintenance sweep), releasing
    /// each handle; clamp the cursor if it fell off the end.
    pub fn retain_bundled(&mut self) {
        let before = self.items.len();
        self.items.retain(|item| {
            let keep = !item.has_transient_handle();
            if !keep {
                release_handle(item);
            }
            keep
        });

        if self.current_index >= self.items.len() {
            self.current_index = 0;
        }

        debug!(
            "ephemeral sweep: {} -> {} item(s)",
            before,
            self.items.len()
        );
    }

    /// Record the measured length of a video file (the one permitted
    /// descriptor mutation).
    pub fn set_measured_duration(&mut self, index: usize, duration_ms: u64) {
        if let Some(item) = self.items.get_mut(index) {
            item.duration_ms = duration_ms;
        }
    }
}

impl Drop for PlaylistStore {
    fn drop(&mut self) {
        // Controller teardown: nothing may leak past the store.
        for item in &self.items {
            release_handle(item);
        }
    }
}

fn release_handle(item: &MediaDescriptor) {
    if let Some(handle) = &item.handle {
        handle.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MediaDescriptor, MediaKind};

    fn operator_item(label: &str) -> MediaDescriptor {
        MediaDescriptor::from_operator_bytes(label, b"bytes", MediaKind::Image).unwrap()
    }

    #[test]
    fn set_all_resets_cursor() {
        let mut store = PlaylistStore::new();
        store.set_all(vec![
            MediaDescriptor::bundled_image("a.png", 5_000),
            MediaDescriptor::bundled_image("b.png", 5_000),
        ]);
        store.set_current_index(1);

        store.set_all(vec![MediaDescriptor::bundled_image("c.png", 5_000)]);
        assert_eq!(store.current_index(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn empty_set_is_legal() {
        let mut store = PlaylistStore::new();
        store.set_all(Vec::new());
        assert!(store.is_empty());
        assert!(store.current().is_none());
    }

    #[test]
    fn append_does_not_move_cursor() {
        let mut store = PlaylistStore::new();
        store.set_all(vec![
            MediaDescriptor::bundled_image("a.png", 5_000),
            MediaDescriptor::bundled_image("b.png", 5_000),
        ]);
        store.set_current_index(1);

        store.append(MediaDescriptor::bundled_image("c.png", 5_000));
        assert_eq!(store.current_index(), 1);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn remove_clamps_cursor_to_zero() {
        let mut store = PlaylistStore::new();
        store.set_all(vec![
            MediaDescriptor::bundled_image("a.png", 5_000),
            MediaDescriptor::bundled_image("b.png", 5_000),
        ]);
        store.set_current_index(1);

        store.remove_at(1);
        assert_eq!(store.current_index(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn removal_releases_the_handle_exactly_once() {
        let item = operator_item("upload.png");
        let witness = item.handle.clone().unwrap();

        let mut store = PlaylistStore::new();
        store.set_all(vec![item]);
        store.remove_at(0);

        assert_eq!(witness.times_released(), 1);
        assert!(!witness.path().is_file());
    }

    #[test]
    fn sweep_keeps_bundled_items_only() {
        let upload = operator_item("upload.png");
        let witness = upload.handle.clone().unwrap();

        let mut store = PlaylistStore::new();
        store.set_all(vec![MediaDescriptor::bundled_image("a.png", 5_000), upload]);
        store.set_current_index(1);

        store.retain_bundled();

        assert_eq!(store.len(), 1);
        assert_eq!(store.current_index(), 0);
        assert_eq!(witness.times_released(), 1);
    }

    #[test]
    fn measured_duration_is_written_back() {
        let mut store = PlaylistStore::new();
        store.set_all(vec![MediaDescriptor::bundled_video("clip.mp4")]);
        assert_eq!(store.get(0).unwrap().duration_ms, 0);

        store.set_measured_duration(0, 12_345);
        assert_eq!(store.get(0).unwrap().duration_ms, 12_345);
    }
}
