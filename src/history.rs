use std::collections::VecDeque;

use crate::surface::Snapshot;

/// Default number of snapshots kept by a [`HistoryLog`].
pub const HISTORY_LIMIT: usize = 5;

/// Undo/redo availability, handed back to the host for button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Bounded, linear log of surface snapshots with a cursor.
///
/// Recording while the cursor is not at the tail drops every entry after
/// the cursor first, so abandoned redo states are gone for good. When the
/// log grows past its limit the oldest entry is evicted.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<Snapshot>,
    /// Index of the current entry; `None` only while the log is empty.
    step: Option<usize>,
    limit: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(HISTORY_LIMIT)
    }
}

impl HistoryLog {
    /// Creates an empty log holding at most `limit` snapshots (at least one).
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit + 1),
            step: None,
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn step(&self) -> Option<usize> {
        self.step
    }

    /// The snapshot under the cursor, if any.
    pub fn current(&self) -> Option<&Snapshot> {
        self.step.and_then(|step| self.entries.get(step))
    }

    pub fn entries(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }

    /// Empties the log.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.step = None;
        log::debug!("History reset");
    }

    /// Appends a snapshot after the cursor, discarding the redo branch.
    pub fn record(&mut self, snapshot: Snapshot) -> HistoryStatus {
        let keep = self.step.map_or(0, |step| step + 1);
        let discarded = self.entries.len().saturating_sub(keep);
        self.entries.truncate(keep);
        self.entries.push_back(snapshot);

        let mut evicted = 0;
        while self.entries.len() > self.limit {
            self.entries.pop_front();
            evicted += 1;
        }
        self.step = Some(self.entries.len() - 1);

        log::debug!(
            "History recorded entry {} of {} (discarded {} redo, evicted {})",
            self.entries.len() - 1,
            self.limit,
            discarded,
            evicted
        );
        self.status()
    }

    /// Moves the cursor back one entry and returns the snapshot now current.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        let step = self.step? - 1;
        self.step = Some(step);
        log::debug!("Undo to history entry {}", step);
        self.entries.get(step)
    }

    /// Moves the cursor forward one entry and returns the snapshot now current.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        let step = self.step? + 1;
        self.step = Some(step);
        log::debug!("Redo to history entry {}", step);
        self.entries.get(step)
    }

    pub fn can_undo(&self) -> bool {
        self.step.is_some_and(|step| step > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.step
            .is_some_and(|step| step + 1 < self.entries.len())
    }

    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RasterSurface, to_rgba};
    use egui::Color32;

    /// A snapshot whose pixel (0, 0) encodes `marker` in its red channel.
    fn marked(marker: u8) -> Snapshot {
        let mut surface = RasterSurface::new(2, 2, Color32::WHITE);
        surface
            .pixels_mut()
            .put_pixel(0, 0, to_rgba(Color32::from_rgb(marker, 0, 0)));
        surface.snapshot()
    }

    fn marker_of(snapshot: &Snapshot) -> u8 {
        snapshot.pixels().get_pixel(0, 0).0[0]
    }

    #[test]
    fn test_empty_log() {
        let mut history = HistoryLog::default();
        assert!(history.is_empty());
        assert_eq!(history.step(), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_single_entry_cannot_undo() {
        let mut history = HistoryLog::default();
        let status = history.record(marked(1));
        assert_eq!(status, HistoryStatus::default());
        assert_eq!(history.step(), Some(0));
    }

    #[test]
    fn test_undo_redo_moves_cursor() {
        let mut history = HistoryLog::default();
        for marker in 1..=3 {
            history.record(marked(marker));
        }

        assert_eq!(history.undo().map(marker_of), Some(2));
        assert_eq!(history.undo().map(marker_of), Some(1));
        assert!(history.undo().is_none());
        assert_eq!(history.step(), Some(0));

        assert_eq!(history.redo().map(marker_of), Some(2));
        assert_eq!(history.redo().map(marker_of), Some(3));
        assert!(history.redo().is_none());
        assert_eq!(history.step(), Some(2));
    }

    #[test]
    fn test_length_never_exceeds_limit() {
        let mut history = HistoryLog::new(5);
        for marker in 0..20 {
            history.record(marked(marker));
            assert!(history.len() <= 5);
            assert_eq!(history.step(), Some(history.len() - 1));
        }
        let markers: Vec<u8> = history.entries().map(marker_of).collect();
        assert_eq!(markers, vec![15, 16, 17, 18, 19]);
    }

    #[test]
    fn test_record_discards_redo_branch() {
        let mut history = HistoryLog::default();
        for marker in 1..=4 {
            history.record(marked(marker));
        }
        history.undo();
        history.undo();

        let status = history.record(marked(9));
        assert!(!status.can_redo);
        assert!(status.can_undo);

        let markers: Vec<u8> = history.entries().map(marker_of).collect();
        assert_eq!(markers, vec![1, 2, 9]);
        while history.redo().is_some() {}
        assert_eq!(history.current().map(marker_of), Some(9));
    }

    #[test]
    fn test_eviction_after_undo_keeps_cursor_on_new_entry() {
        let mut history = HistoryLog::new(3);
        for marker in 1..=3 {
            history.record(marked(marker));
        }
        history.undo();
        history.record(marked(7));
        history.record(marked(8));

        let markers: Vec<u8> = history.entries().map(marker_of).collect();
        assert_eq!(markers, vec![2, 7, 8]);
        assert_eq!(history.current().map(marker_of), Some(8));
    }

    #[test]
    fn test_reset() {
        let mut history = HistoryLog::default();
        history.record(marked(1));
        history.record(marked(2));
        history.reset();
        assert!(history.is_empty());
        assert_eq!(history.step(), None);
        assert_eq!(history.status(), HistoryStatus::default());
    }

    #[test]
    fn test_zero_limit_holds_one_entry() {
        let mut history = HistoryLog::new(0);
        history.record(marked(1));
        history.record(marked(2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.current().map(marker_of), Some(2));
    }
}
