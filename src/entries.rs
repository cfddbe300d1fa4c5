//! Ordered entry list with timestamp-encoded ordering
//!
//! The downstream consumer of a map log determines mowing/navigation order
//! purely by message timestamp, so the only way to change area order without
//! altering the wire format is to rewrite order keys. [`EntryList`] keeps the
//! in-memory position of every entry consistent with its [`OrderKey`] and
//! mutates only the keys of affected entries, never renumbering the rest.
//!
//! Edge moves use a fixed 60-second gap against the current first/last key.
//! With `i64` seconds that key space cannot realistically be exhausted under
//! interactive use.

use crate::error::{MaplogError, Result};
use crate::types::Entry;
use tracing::debug;

/// Gap applied when relocating an entry to either edge of the list
const EDGE_GAP_SECS: i64 = 60;

/// In-memory representation of the log's entries
///
/// Wraps the loaded sequence and exposes position-relative mutations, each
/// preserving a strict total order: after every operation the sequence sorted
/// by `order_key` ascending equals the sequence by position, and no two
/// entries compare equal in `order_key`.
#[derive(Debug)]
pub struct EntryList {
    entries: Vec<Entry>,
    dirty: bool,
}

impl EntryList {
    /// Wrap a loaded sequence, establishing the position-equals-key-order
    /// invariant
    pub fn new(mut entries: Vec<Entry>) -> Self {
        entries.sort_by_key(|e| e.order_key);
        Self {
            entries,
            dirty: false,
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True iff any mutation occurred since the list was created or last
    /// marked clean
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag (called after a completed save)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Entry at `idx`, if in range
    pub fn get(&self, idx: usize) -> Option<&Entry> {
        self.entries.get(idx)
    }

    /// Iterate entries in position order
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Entries in position order
    pub fn as_slice(&self) -> &[Entry] {
        &self.entries
    }

    /// Consume the list, yielding the entries in their final order
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    fn check_index(&self, idx: usize) -> Result<()> {
        if idx < self.entries.len() {
            Ok(())
        } else {
            Err(MaplogError::unsupported(format!(
                "entry index {} out of range (len {})",
                idx,
                self.entries.len()
            )))
        }
    }

    /// Relocate the entry at `idx` to the front of the list
    ///
    /// The moved entry takes the current first entry's key minus a fixed gap.
    /// If the entry is already first (which covers the single-entry list) the
    /// list is left unchanged and stays valid. Returns the entry's new index.
    pub fn move_to_first(&mut self, idx: usize) -> Result<usize> {
        self.check_index(idx)?;
        if idx == 0 {
            return Ok(0);
        }
        let new_key = self.entries[0].order_key.minus_secs(EDGE_GAP_SECS);
        let mut entry = self.entries.remove(idx);
        debug!(
            "Moving entry {} to first position, key {} -> {}",
            idx, entry.order_key, new_key
        );
        entry.order_key = new_key;
        self.entries.insert(0, entry);
        self.dirty = true;
        Ok(0)
    }

    /// Relocate the entry at `idx` to the back of the list
    ///
    /// Symmetric to [`EntryList::move_to_first`]: the moved entry takes the
    /// current last entry's key plus a fixed gap.
    pub fn move_to_last(&mut self, idx: usize) -> Result<usize> {
        self.check_index(idx)?;
        let last = self.entries.len() - 1;
        if idx == last {
            return Ok(idx);
        }
        let new_key = self.entries[last].order_key.plus_secs(EDGE_GAP_SECS);
        let mut entry = self.entries.remove(idx);
        debug!(
            "Moving entry {} to last position, key {} -> {}",
            idx, entry.order_key, new_key
        );
        entry.order_key = new_key;
        self.entries.push(entry);
        self.dirty = true;
        Ok(self.entries.len() - 1)
    }

    /// Swap the entry at `idx` with its predecessor
    ///
    /// Only the two order keys are exchanged (then the positions), so both
    /// entries end up consistent with their new positions and nothing else is
    /// renumbered. Rejected at the top boundary.
    pub fn move_up(&mut self, idx: usize) -> Result<usize> {
        self.check_index(idx)?;
        if idx == 0 {
            return Err(MaplogError::unsupported("entry is already first"));
        }
        self.swap_keys_and_positions(idx, idx - 1);
        Ok(idx - 1)
    }

    /// Swap the entry at `idx` with its successor
    ///
    /// Rejected at the bottom boundary.
    pub fn move_down(&mut self, idx: usize) -> Result<usize> {
        self.check_index(idx)?;
        if idx == self.entries.len() - 1 {
            return Err(MaplogError::unsupported("entry is already last"));
        }
        self.swap_keys_and_positions(idx, idx + 1);
        Ok(idx + 1)
    }

    fn swap_keys_and_positions(&mut self, a: usize, b: usize) {
        let key_a = self.entries[a].order_key;
        self.entries[a].order_key = self.entries[b].order_key;
        self.entries[b].order_key = key_a;
        self.entries.swap(a, b);
        self.dirty = true;
    }

    /// Delete and return the entry at `idx`
    ///
    /// Order keys are absolute, not positional, so the remaining entries need
    /// no renumbering.
    pub fn remove(&mut self, idx: usize) -> Result<Entry> {
        self.check_index(idx)?;
        let entry = self.entries.remove(idx);
        debug!("Removed entry {} ({})", idx, entry.summary(0));
        self.dirty = true;
        Ok(entry)
    }

    /// Set the name of the entry at `idx`
    ///
    /// Fails with [`MaplogError::UnsupportedOperation`] if the entry's
    /// category is not nameable.
    pub fn rename(&mut self, idx: usize, new_name: impl Into<String>) -> Result<()> {
        self.check_index(idx)?;
        let entry = &mut self.entries[idx];
        match &mut entry.payload {
            crate::types::Payload::Named { name, .. } => {
                *name = new_name.into();
                self.dirty = true;
                Ok(())
            }
            crate::types::Payload::Opaque { .. } => Err(MaplogError::unsupported(format!(
                "entries of category '{}' cannot be named",
                entry.category
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Entry, OrderKey};
    use proptest::prelude::*;

    fn area(secs: i64, name: &str) -> Entry {
        Entry::named(Category::MowingArea, OrderKey::new(secs, 0), name, vec![])
    }

    fn sample_list() -> EntryList {
        EntryList::new(vec![area(100, "a"), area(200, "b"), area(300, "c")])
    }

    fn keys(list: &EntryList) -> Vec<i64> {
        list.iter().map(|e| e.order_key.secs).collect()
    }

    fn names(list: &EntryList) -> Vec<String> {
        list.iter()
            .map(|e| e.name().unwrap_or_default().to_string())
            .collect()
    }

    fn assert_position_order_matches_key_order(list: &EntryList) {
        let mut sorted = keys(list);
        sorted.sort_unstable();
        assert_eq!(keys(list), sorted);
        // Strict ordering: no duplicate keys
        sorted.dedup();
        assert_eq!(sorted.len(), list.len());
    }

    #[test]
    fn test_move_last_to_first_scenario() {
        let mut list = sample_list();
        let new_idx = list.move_to_first(2).unwrap();
        assert_eq!(new_idx, 0);
        assert_eq!(keys(&list), vec![40, 100, 200]);
        assert_eq!(names(&list), vec!["c", "a", "b"]);
        assert_position_order_matches_key_order(&list);
        assert!(list.is_dirty());
    }

    #[test]
    fn test_move_to_first_key_strictly_least() {
        let mut list = sample_list();
        list.move_to_first(1).unwrap();
        let first_key = list.get(0).unwrap().order_key;
        assert!(list.iter().skip(1).all(|e| first_key < e.order_key));
    }

    #[test]
    fn test_move_to_last() {
        let mut list = sample_list();
        let new_idx = list.move_to_last(0).unwrap();
        assert_eq!(new_idx, 2);
        assert_eq!(keys(&list), vec![200, 300, 360]);
        assert_eq!(names(&list), vec!["b", "c", "a"]);
        assert_position_order_matches_key_order(&list);
    }

    #[test]
    fn test_move_up_then_down_restores_relative_order() {
        let mut list = sample_list();
        let idx = list.move_up(2).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(names(&list), vec!["a", "c", "b"]);
        let idx = list.move_down(idx).unwrap();
        assert_eq!(idx, 2);
        assert_eq!(names(&list), vec!["a", "b", "c"]);
        assert_position_order_matches_key_order(&list);
    }

    #[test]
    fn test_move_up_swaps_only_the_pair() {
        let mut list = sample_list();
        list.move_up(1).unwrap();
        // The moved entry carries its former neighbor's key and vice versa;
        // the third entry is untouched.
        assert_eq!(keys(&list), vec![100, 200, 300]);
        assert_eq!(names(&list), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_boundary_moves_rejected() {
        let mut list = sample_list();
        assert!(matches!(
            list.move_up(0),
            Err(MaplogError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            list.move_down(2),
            Err(MaplogError::UnsupportedOperation(_))
        ));
        assert!(!list.is_dirty());
    }

    #[test]
    fn test_single_entry_edge_moves_are_noops() {
        let mut list = EntryList::new(vec![area(100, "only")]);
        assert_eq!(list.move_to_first(0).unwrap(), 0);
        assert_eq!(list.move_to_last(0).unwrap(), 0);
        assert_eq!(keys(&list), vec![100]);
        assert!(!list.is_dirty());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut list = sample_list();
        assert!(list.move_to_first(3).is_err());
        assert!(list.remove(99).is_err());
        assert!(list.rename(99, "x").is_err());
    }

    #[test]
    fn test_remove_keeps_other_keys() {
        let mut list = sample_list();
        let removed = list.remove(1).unwrap();
        assert_eq!(removed.name(), Some("b"));
        assert_eq!(list.len(), 2);
        assert_eq!(keys(&list), vec![100, 300]);
        assert!(list.is_dirty());
    }

    #[test]
    fn test_rename_nameable_changes_only_target() {
        let mut list = sample_list();
        list.rename(1, "Front Yard").unwrap();
        assert_eq!(names(&list), vec!["a", "Front Yard", "c"]);
        assert_eq!(keys(&list), vec![100, 200, 300]);
        assert!(list.is_dirty());
    }

    #[test]
    fn test_rename_unnameable_fails() {
        let mut list = EntryList::new(vec![
            Entry::opaque(Category::DockingPoint, OrderKey::new(50, 0), vec![1, 2]),
            area(100, "a"),
        ]);
        let err = list.rename(0, "Dock").unwrap_err();
        assert!(matches!(err, MaplogError::UnsupportedOperation(_)));
        assert!(!list.is_dirty());
    }

    #[test]
    fn test_new_sorts_by_order_key() {
        let list = EntryList::new(vec![area(300, "c"), area(100, "a"), area(200, "b")]);
        assert_eq!(names(&list), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_mark_clean() {
        let mut list = sample_list();
        list.remove(0).unwrap();
        assert!(list.is_dirty());
        list.mark_clean();
        assert!(!list.is_dirty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        First(usize),
        Last(usize),
        Up(usize),
        Down(usize),
    }

    fn op_strategy(len: usize) -> impl Strategy<Value = Op> {
        (0..len, 0..4u8).prop_map(|(idx, kind)| match kind {
            0 => Op::First(idx),
            1 => Op::Last(idx),
            2 => Op::Up(idx),
            _ => Op::Down(idx),
        })
    }

    proptest! {
        #[test]
        fn prop_moves_preserve_strict_order_and_contents(
            ops in proptest::collection::vec(op_strategy(5), 0..32)
        ) {
            let mut list = EntryList::new(
                (0..5).map(|i| area(1_000 + i * 100, &format!("area{}", i))).collect(),
            );
            for op in ops {
                // Boundary errors are fine; the list must stay valid either way
                let _ = match op {
                    Op::First(idx) => list.move_to_first(idx),
                    Op::Last(idx) => list.move_to_last(idx),
                    Op::Up(idx) => list.move_up(idx),
                    Op::Down(idx) => list.move_down(idx),
                };
                assert_position_order_matches_key_order(&list);
            }
            prop_assert_eq!(list.len(), 5);
            let mut all_names = names(&list);
            all_names.sort();
            prop_assert_eq!(
                all_names,
                (0..5).map(|i| format!("area{}", i)).collect::<Vec<_>>()
            );
        }
    }
}
