// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    ecmascript::types::Value,
    heap::{HeapMarkAndSweep, WorkQueues},
};

/// Farthest distance from the materialized range that a write may extend
/// indexed storage by. Writes farther away become named properties.
pub(crate) const SHIFT_LIMIT: u32 = 1 << 20;
/// Capacity of freshly allocated indexed storage.
pub(crate) const INITIAL_INDEXED_CAPACITY: usize = 4;
/// Largest number of materialized elements.
pub(crate) const MAX_INDEXED_ELEMENTS: u32 = 1 << 28;

/// Array-index keyed values of an object: the materialized range
/// `[begin_index, end_index)`, where each element may be an empty hole.
#[derive(Debug, Clone, Default)]
pub struct IndexedStorage {
    begin_index: u32,
    elements: Vec<Option<Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IndexedSet {
    Stored,
    /// The index is too far from the materialized range.
    OutOfReach,
    /// Storing would exceed [`MAX_INDEXED_ELEMENTS`].
    TooLarge,
}

impl IndexedStorage {
    /// Fresh storage holding a single element at `index`.
    pub(crate) fn with_element(index: u32, value: Value) -> Self {
        let mut elements = Vec::with_capacity(INITIAL_INDEXED_CAPACITY);
        elements.push(Some(value));
        Self {
            begin_index: index,
            elements,
        }
    }

    pub(crate) fn from_values(values: &[Value]) -> Self {
        Self {
            begin_index: 0,
            elements: values.iter().copied().map(Some).collect(),
        }
    }

    pub fn begin_index(&self) -> u32 {
        self.begin_index
    }

    pub fn end_index(&self) -> u32 {
        self.begin_index + self.elements.len() as u32
    }

    pub fn capacity(&self) -> usize {
        self.elements.capacity()
    }

    pub fn get(&self, index: u32) -> Option<Value> {
        let offset = index.checked_sub(self.begin_index)? as usize;
        self.elements.get(offset).copied().flatten()
    }

    pub fn has(&self, index: u32) -> bool {
        self.get(index).is_some()
    }

    pub(crate) fn set(&mut self, index: u32, value: Value) -> IndexedSet {
        let begin = self.begin_index;
        let end = self.end_index();
        if (begin..end).contains(&index) {
            self.elements[(index - begin) as usize] = Some(value);
            return IndexedSet::Stored;
        }
        if begin == end {
            // Nothing materialized: rebase onto the index.
            self.begin_index = index;
            self.elements.push(Some(value));
            return IndexedSet::Stored;
        }
        if index >= end {
            if index - end > SHIFT_LIMIT {
                return IndexedSet::OutOfReach;
            }
            let new_len = index - begin + 1;
            if new_len > MAX_INDEXED_ELEMENTS {
                return IndexedSet::TooLarge;
            }
            self.resize_right(new_len as usize);
            self.elements[(index - begin) as usize] = Some(value);
            return IndexedSet::Stored;
        }
        // index < begin
        let shift = begin - index;
        if shift > SHIFT_LIMIT {
            return IndexedSet::OutOfReach;
        }
        if end - index > MAX_INDEXED_ELEMENTS {
            return IndexedSet::TooLarge;
        }
        log::trace!("Shifting indexed storage left by {shift}");
        self.elements
            .splice(0..0, std::iter::repeat_n(None, shift as usize));
        self.begin_index = index;
        self.elements[0] = Some(value);
        IndexedSet::Stored
    }

    fn resize_right(&mut self, new_len: usize) {
        if new_len > self.elements.capacity() {
            let new_capacity = new_len.max(self.elements.capacity() * 2);
            log::trace!(
                "Reallocating indexed storage from {} to {new_capacity}",
                self.elements.capacity()
            );
            self.elements
                .reserve_exact(new_capacity - self.elements.len());
        }
        self.elements.resize(new_len, None);
    }

    /// Turn the element at `index` into a hole. Returns whether an element
    /// was present.
    pub(crate) fn delete(&mut self, index: u32) -> bool {
        let Some(offset) = index.checked_sub(self.begin_index) else {
            return false;
        };
        match self.elements.get_mut(offset as usize) {
            Some(element) => element.take().is_some(),
            None => false,
        }
    }

    /// Move the end of the materialized range to `new_end`. Returns `false`
    /// if nothing remains materialized, in which case the owner drops the
    /// storage.
    pub(crate) fn set_end_index(&mut self, new_end: u32) -> bool {
        if new_end <= self.begin_index {
            self.elements.clear();
            return false;
        }
        let new_len = (new_end - self.begin_index) as usize;
        if new_len <= self.elements.len() {
            self.elements.truncate(new_len);
        } else {
            self.resize_right(new_len);
        }
        true
    }

    /// Indices holding an element, in ascending order.
    pub fn present_indices(&self) -> impl Iterator<Item = u32> + '_ {
        let begin = self.begin_index;
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, element)| element.is_some())
            .map(move |(offset, _)| begin + offset as u32)
    }

    /// Highest index holding an element in `[lower, upper)`, searching
    /// backwards.
    pub(crate) fn last_present_in(&self, lower: u32, upper: u32) -> Option<u32> {
        let lower = lower.max(self.begin_index);
        let upper = upper.min(self.end_index());
        (lower..upper).rev().find(|&index| self.has(index))
    }
}

impl HeapMarkAndSweep for IndexedStorage {
    fn mark_values(&self, queues: &mut WorkQueues) {
        for value in self.elements.iter().flatten() {
            value.mark_values(queues);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extends_right_within_shift_limit() {
        let mut storage = IndexedStorage::with_element(0, Value::Number(0.0));
        assert_eq!(storage.set(5, Value::Number(5.0)), IndexedSet::Stored);
        assert_eq!(storage.begin_index(), 0);
        assert_eq!(storage.end_index(), 6);
        assert!(!storage.has(3));
        assert_eq!(storage.get(5), Some(Value::Number(5.0)));
    }

    #[test]
    fn extends_left_by_shifting() {
        let mut storage = IndexedStorage::with_element(10, Value::Boolean(true));
        assert_eq!(storage.set(7, Value::Boolean(false)), IndexedSet::Stored);
        assert_eq!(storage.begin_index(), 7);
        assert_eq!(storage.end_index(), 11);
        assert_eq!(storage.get(10), Some(Value::Boolean(true)));
        assert_eq!(storage.present_indices().collect::<Vec<_>>(), vec![7, 10]);
    }

    #[test]
    fn far_indices_are_out_of_reach() {
        let mut storage = IndexedStorage::from_values(&[Value::Null; 3]);
        assert_eq!(
            storage.set(10_000_000, Value::Null),
            IndexedSet::OutOfReach
        );
        assert_eq!(storage.end_index(), 3);
        let mut storage = IndexedStorage::with_element(5_000_000, Value::Null);
        assert_eq!(storage.set(0, Value::Null), IndexedSet::OutOfReach);
    }

    #[test]
    fn empty_range_rebases() {
        let mut storage = IndexedStorage::with_element(2, Value::Null);
        assert!(!storage.set_end_index(1));
        assert_eq!(storage.set(40_000_000, Value::Null), IndexedSet::Stored);
        assert_eq!(storage.begin_index(), 40_000_000);
        assert_eq!(storage.end_index(), 40_000_001);
    }

    #[test]
    fn shrinking_drops_trailing_elements() {
        let mut storage = IndexedStorage::from_values(&[Value::Null; 6]);
        assert!(storage.delete(4));
        assert!(!storage.delete(4));
        assert_eq!(storage.last_present_in(0, 6), Some(5));
        assert_eq!(storage.last_present_in(4, 5), None);
        assert!(storage.set_end_index(2));
        assert_eq!(storage.end_index(), 2);
        assert_eq!(storage.get(5), None);
    }
}
