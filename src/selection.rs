//! Selection engine
//!
//! Owns the torrent inventory for one interactive session together with the
//! filtered/sorted view and the set of selected info hashes. Everything here
//! is synchronous and terminal-free so the presentation layer stays a thin
//! adapter over it.

use std::cmp::Ordering;
use std::collections::HashSet;

use thiserror::Error;

use crate::models::{SessionOutcome, SortKey, TorrentRecord};

/// Selection engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid inventory: {0}")]
    InvalidInput(String),

    #[error("Unknown info hash: {0}")]
    NotFound(String),

    #[error("No torrents selected")]
    EmptySelection,
}

/// Counts shown in the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionStatus {
    pub visible: usize,
    pub total: usize,
    pub selected: usize,
}

impl SelectionStatus {
    /// Whether a filter currently hides part of the inventory
    pub fn is_filtered(&self) -> bool {
        self.visible < self.total
    }
}

/// Selection state for one session
#[derive(Debug, Clone, Default)]
pub struct SelectionEngine {
    /// Full inventory, fixed after `load`
    records: Vec<TorrentRecord>,
    /// Lower-cased names, parallel to `records`
    name_keys: Vec<String>,
    /// Positions into `records` in display order
    visible: Vec<usize>,
    /// Selected info hashes (may include hidden rows)
    selected: HashSet<String>,
    sort_key: Option<SortKey>,
    sort_reverse: bool,
    filter_text: String,
}

impl SelectionEngine {
    /// Create an empty engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine already loaded with `records`
    pub fn with_records(records: Vec<TorrentRecord>) -> Result<Self, SelectionError> {
        let mut engine = Self::new();
        engine.load(records)?;
        Ok(engine)
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Replace the inventory and reset filter, sort and selection
    pub fn load(&mut self, records: Vec<TorrentRecord>) -> Result<(), SelectionError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if record.hash.trim().is_empty() {
                return Err(SelectionError::InvalidInput(format!(
                    "torrent '{}' has an empty info hash",
                    record.name
                )));
            }
            if !seen.insert(record.hash.as_str()) {
                return Err(SelectionError::InvalidInput(format!(
                    "duplicate info hash {}",
                    record.hash
                )));
            }
        }

        self.name_keys = records.iter().map(|r| r.name.to_lowercase()).collect();
        self.visible = (0..records.len()).collect();
        self.records = records;
        self.selected.clear();
        self.sort_key = None;
        self.sort_reverse = false;
        self.filter_text.clear();
        Ok(())
    }

    /// Filter visible rows by a case-insensitive substring of the name
    pub fn set_filter(&mut self, text: &str) {
        self.filter_text = text.trim().to_lowercase();

        self.visible = if self.filter_text.is_empty() {
            (0..self.records.len()).collect()
        } else {
            self.name_keys
                .iter()
                .enumerate()
                .filter(|(_, name)| name.contains(&self.filter_text))
                .map(|(idx, _)| idx)
                .collect()
        };

        self.apply_sort();
    }

    /// Sort by `key`, reversing direction when the same key is chosen again
    pub fn set_sort(&mut self, key: SortKey) {
        if self.sort_key == Some(key) {
            self.sort_reverse = !self.sort_reverse;
        } else {
            self.sort_key = Some(key);
            self.sort_reverse = false;
        }
        self.apply_sort();
    }

    /// Flip selection of `hash`, returning whether it is now selected
    pub fn toggle(&mut self, hash: &str) -> Result<bool, SelectionError> {
        if !self.contains(hash) {
            return Err(SelectionError::NotFound(hash.to_string()));
        }

        if self.selected.remove(hash) {
            Ok(false)
        } else {
            self.selected.insert(hash.to_string());
            Ok(true)
        }
    }

    /// Select every currently visible row
    pub fn select_all_visible(&mut self) {
        for &idx in &self.visible {
            self.selected.insert(self.records[idx].hash.clone());
        }
    }

    /// Clear the whole selection, hidden rows included
    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    /// Return the selected hashes in inventory order
    pub fn confirm(&self) -> Result<Vec<String>, SelectionError> {
        if self.selected.is_empty() {
            return Err(SelectionError::EmptySelection);
        }

        Ok(self
            .records
            .iter()
            .filter(|r| self.selected.contains(&r.hash))
            .map(|r| r.hash.clone())
            .collect())
    }

    /// End the session without a selection
    pub fn cancel(&self) -> SessionOutcome {
        SessionOutcome::Cancelled
    }

    // -------------------------------------------------------------------------
    // Read Accessors
    // -------------------------------------------------------------------------

    /// Visible records in display order
    pub fn visible(&self) -> impl ExactSizeIterator<Item = &TorrentRecord> + '_ {
        self.visible.iter().map(move |&idx| &self.records[idx])
    }

    /// Visible record at display position `row`
    pub fn visible_at(&self, row: usize) -> Option<&TorrentRecord> {
        self.visible.get(row).map(|&idx| &self.records[idx])
    }

    /// Display position of `hash`, if it is visible
    pub fn position_of(&self, hash: &str) -> Option<usize> {
        self.visible
            .iter()
            .position(|&idx| self.records[idx].hash == hash)
    }

    /// Full inventory in load order
    pub fn records(&self) -> &[TorrentRecord] {
        &self.records
    }

    pub fn is_selected(&self, hash: &str) -> bool {
        self.selected.contains(hash)
    }

    /// Whether `hash` belongs to the loaded inventory
    pub fn contains(&self, hash: &str) -> bool {
        self.records.iter().any(|r| r.hash == hash)
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn total_len(&self) -> usize {
        self.records.len()
    }

    pub fn selected_len(&self) -> usize {
        self.selected.len()
    }

    /// Counts for the status line
    pub fn status(&self) -> SelectionStatus {
        SelectionStatus {
            visible: self.visible_len(),
            total: self.total_len(),
            selected: self.selected_len(),
        }
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// Active sort key and whether it is descending
    pub fn sort(&self) -> Option<(SortKey, bool)> {
        self.sort_key.map(|key| (key, self.sort_reverse))
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Re-sort `visible` with the current key and direction
    fn apply_sort(&mut self) {
        let Some(key) = self.sort_key else {
            return;
        };
        let reverse = self.sort_reverse;

        // Take the view out so the comparator can borrow `self` immutably
        let mut visible = std::mem::take(&mut self.visible);
        match key {
            SortKey::Name => visible.sort_by(|&a, &b| {
                directed(self.name_keys[a].cmp(&self.name_keys[b]), reverse)
            }),
            SortKey::Size => visible.sort_by(|&a, &b| {
                directed(
                    self.records[a].size_bytes.cmp(&self.records[b].size_bytes),
                    reverse,
                )
            }),
            SortKey::Tracker => {
                // One url parse per row, not per comparison
                let mut keyed: Vec<(String, usize)> = visible
                    .iter()
                    .map(|&idx| (self.records[idx].tracker_sort_key(), idx))
                    .collect();
                keyed.sort_by(|a, b| directed(a.0.cmp(&b.0), reverse));
                visible = keyed.into_iter().map(|(_, idx)| idx).collect();
            }
            SortKey::Selected => visible.sort_by(|&a, &b| {
                let a_sel = self.selected.contains(&self.records[a].hash);
                let b_sel = self.selected.contains(&self.records[b].hash);
                directed(a_sel.cmp(&b_sel), reverse).then(a.cmp(&b))
            }),
        }
        self.visible = visible;
    }
}

/// Apply sort direction to a primary comparison
///
/// Reversing the comparison (rather than the sorted output) keeps equal keys
/// in their prior relative order in both directions.
fn directed(ordering: Ordering, reverse: bool) -> Ordering {
    if reverse {
        ordering.reverse()
    } else {
        ordering
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hash: &str, name: &str, size: u64, tracker: Option<&str>) -> TorrentRecord {
        TorrentRecord {
            hash: hash.into(),
            name: name.into(),
            size_bytes: size,
            tracker: tracker.map(String::from),
            state: "stalledUP".into(),
        }
    }

    fn sample() -> SelectionEngine {
        SelectionEngine::with_records(vec![
            record("h1", "Charlie.S01", 300, Some("http://zeta.example/ann")),
            record("h2", "alpha.2020", 100, None),
            record("h3", "Bravo.Movie", 200, Some("http://Alpha.example/ann")),
        ])
        .unwrap()
    }

    fn visible_hashes(engine: &SelectionEngine) -> Vec<&str> {
        engine.visible().map(|r| r.hash.as_str()).collect()
    }

    #[test]
    fn test_load_resets_state() {
        let mut engine = sample();
        engine.toggle("h1").unwrap();
        engine.set_filter("alpha");
        engine.set_sort(SortKey::Size);

        engine
            .load(vec![record("x", "Xray", 1, None), record("y", "Yankee", 2, None)])
            .unwrap();

        assert_eq!(visible_hashes(&engine), ["x", "y"]);
        assert_eq!(engine.selected_len(), 0);
        assert_eq!(engine.filter_text(), "");
        assert_eq!(engine.sort(), None);
    }

    #[test]
    fn test_load_rejects_duplicate_hashes() {
        let err = SelectionEngine::with_records(vec![
            record("dup", "One", 1, None),
            record("dup", "Two", 2, None),
        ])
        .unwrap_err();
        assert!(matches!(err, SelectionError::InvalidInput(_)));
    }

    #[test]
    fn test_load_rejects_empty_hash() {
        let err = SelectionEngine::with_records(vec![record("  ", "Blank", 1, None)]).unwrap_err();
        assert!(matches!(err, SelectionError::InvalidInput(_)));
    }

    #[test]
    fn test_failed_load_keeps_previous_inventory() {
        let mut engine = sample();
        assert!(engine
            .load(vec![record("a", "A", 1, None), record("a", "B", 1, None)])
            .is_err());
        assert_eq!(engine.total_len(), 3);
    }

    #[test]
    fn test_filter_is_trimmed_and_lowercased() {
        let mut engine = sample();
        engine.set_filter("  BRAVO ");
        assert_eq!(engine.filter_text(), "bravo");
        assert_eq!(visible_hashes(&engine), ["h3"]);
    }

    #[test]
    fn test_filter_preserves_load_order() {
        let mut engine = sample();
        engine.set_filter("a");
        assert_eq!(visible_hashes(&engine), ["h1", "h2", "h3"]);
        engine.set_filter("s");
        assert_eq!(visible_hashes(&engine), ["h1"]);
    }

    #[test]
    fn test_filter_reapplies_active_sort() {
        let mut engine = sample();
        engine.set_sort(SortKey::Size);
        engine.set_sort(SortKey::Size); // descending
        engine.set_filter("a");
        assert_eq!(visible_hashes(&engine), ["h1", "h3", "h2"]);
        // Direction is not toggled by filtering
        assert_eq!(engine.sort(), Some((SortKey::Size, true)));
    }

    #[test]
    fn test_sort_by_name_case_insensitive() {
        let mut engine = sample();
        engine.set_sort(SortKey::Name);
        assert_eq!(visible_hashes(&engine), ["h2", "h3", "h1"]);
    }

    #[test]
    fn test_sort_by_tracker_missing_first() {
        let mut engine = sample();
        engine.set_sort(SortKey::Tracker);
        // "" < "alpha.example" < "zeta.example"
        assert_eq!(visible_hashes(&engine), ["h2", "h3", "h1"]);
    }

    #[test]
    fn test_sort_by_selected_ties_by_original_position() {
        let mut engine = sample();
        engine.set_sort(SortKey::Name); // scramble the view first
        engine.toggle("h2").unwrap();

        engine.set_sort(SortKey::Selected);
        assert_eq!(visible_hashes(&engine), ["h1", "h3", "h2"]);

        engine.set_sort(SortKey::Selected);
        assert_eq!(visible_hashes(&engine), ["h2", "h1", "h3"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut engine = SelectionEngine::with_records(vec![
            record("a", "Same", 5, None),
            record("b", "same", 5, None),
            record("c", "SAME", 5, None),
        ])
        .unwrap();

        engine.set_sort(SortKey::Size);
        assert_eq!(visible_hashes(&engine), ["a", "b", "c"]);
        engine.set_sort(SortKey::Size);
        assert_eq!(visible_hashes(&engine), ["a", "b", "c"]);
        engine.set_sort(SortKey::Name);
        assert_eq!(visible_hashes(&engine), ["a", "b", "c"]);
    }

    #[test]
    fn test_toggle_unknown_hash() {
        let mut engine = sample();
        assert_eq!(
            engine.toggle("nope"),
            Err(SelectionError::NotFound("nope".into()))
        );
        assert_eq!(engine.selected_len(), 0);
    }

    #[test]
    fn test_toggle_hidden_row() {
        let mut engine = sample();
        engine.set_filter("bravo");
        assert_eq!(engine.toggle("h1"), Ok(true));
        assert!(engine.is_selected("h1"));
    }

    #[test]
    fn test_select_all_visible_only_adds_visible() {
        let mut engine = sample();
        engine.set_filter("movie");
        let visible: Vec<String> = engine.visible().map(|r| r.hash.clone()).collect();
        engine.select_all_visible();
        assert_eq!(engine.selected_len(), visible.len());
        for hash in &visible {
            assert!(engine.is_selected(hash));
        }
    }

    #[test]
    fn test_select_none_clears_hidden_selection() {
        let mut engine = sample();
        engine.toggle("h1").unwrap();
        engine.set_filter("bravo");
        engine.select_none();
        assert_eq!(engine.selected_len(), 0);
    }

    #[test]
    fn test_confirm_returns_inventory_order() {
        let mut engine = sample();
        engine.toggle("h3").unwrap();
        engine.toggle("h1").unwrap();
        engine.set_sort(SortKey::Name);
        assert_eq!(engine.confirm().unwrap(), ["h1", "h3"]);
    }

    #[test]
    fn test_confirm_empty() {
        let engine = sample();
        assert_eq!(engine.confirm(), Err(SelectionError::EmptySelection));
    }

    #[test]
    fn test_cancel_is_distinct() {
        let engine = sample();
        assert_eq!(engine.cancel(), SessionOutcome::Cancelled);
    }

    #[test]
    fn test_position_and_visible_at() {
        let mut engine = sample();
        engine.set_sort(SortKey::Name);
        assert_eq!(engine.position_of("h1"), Some(2));
        assert_eq!(engine.visible_at(0).map(|r| r.hash.as_str()), Some("h2"));
        engine.set_filter("bravo");
        assert_eq!(engine.position_of("h1"), None);
        assert!(engine.visible_at(1).is_none());
    }

    #[test]
    fn test_status_counts() {
        let mut engine = sample();
        engine.toggle("h1").unwrap();
        engine.set_filter("bravo");
        let status = engine.status();
        assert_eq!(
            status,
            SelectionStatus {
                visible: 1,
                total: 3,
                selected: 1
            }
        );
        assert!(status.is_filtered());
    }
}
