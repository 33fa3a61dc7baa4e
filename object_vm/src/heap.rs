// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod heap_bits;
pub(crate) mod heap_gc;
pub mod indexes;

use hashbrown::HashTable;

use self::indexes::BaseIndex;

pub use self::heap_bits::{HeapMarkAndSweep, WorkQueues};
use crate::ecmascript::{
    builtins::{accessor::AccessorHeapData, ordinary::shape::ShapeHeapData},
    types::{ObjectHeapData, String, StringHeapData, SymbolHeapData},
};

/// All garbage collected data of an [`Agent`](crate::ecmascript::execution::Agent).
///
/// Every arena is a vector of optional heap data; a `None` entry is a slot
/// freed by the garbage collector. Handles never move, and freed slots are
/// handed out again before an arena grows.
#[derive(Debug)]
pub struct Heap {
    pub(crate) accessors: Vec<Option<AccessorHeapData>>,
    pub(crate) objects: Vec<Option<ObjectHeapData>>,
    pub(crate) shapes: Vec<Option<ShapeHeapData>>,
    pub(crate) strings: Vec<Option<StringHeapData>>,
    /// Interning table mapping string contents to their unique handle.
    pub(crate) string_lookup: HashTable<String>,
    pub(crate) symbols: Vec<Option<SymbolHeapData>>,
    pub(crate) free: FreeLists,
    /// Hasher shared by the interning table and the shape tables.
    pub(crate) hasher: ahash::RandomState,
}

/// Indexes of the slots freed by the garbage collector, per arena.
#[derive(Debug, Default)]
pub(crate) struct FreeLists {
    pub(crate) accessors: Vec<u32>,
    pub(crate) objects: Vec<u32>,
    pub(crate) shapes: Vec<u32>,
    pub(crate) strings: Vec<u32>,
    pub(crate) symbols: Vec<u32>,
}

/// Store `data` in a freed slot of `arena` if there is one, or append it.
pub(crate) fn allocate<T>(
    arena: &mut Vec<Option<T>>,
    free: &mut Vec<u32>,
    data: T,
) -> BaseIndex<T> {
    while let Some(index) = free.pop() {
        let Some(slot) = arena.get_mut(index as usize) else {
            continue;
        };
        debug_assert!(slot.is_none(), "free list points at a live slot");
        *slot = Some(data);
        return BaseIndex::from_u32_index(index);
    }
    arena.push(Some(data));
    BaseIndex::last(arena)
}

pub trait CreateHeapData<T, F> {
    /// Creates a [`Value`](crate::ecmascript::types::Value) from the given
    /// data. Allocating the data is **not** guaranteed.
    fn create(&mut self, data: T) -> F;
}

impl Heap {
    pub fn new() -> Heap {
        let mut heap = Heap {
            accessors: Vec::with_capacity(64),
            objects: Vec::with_capacity(1024),
            shapes: Vec::with_capacity(256),
            strings: Vec::with_capacity(1024),
            string_lookup: HashTable::with_capacity(1024),
            symbols: Vec::with_capacity(64),
            free: FreeLists::default(),
            hasher: ahash::RandomState::new(),
        };
        // The root shape always lives at index zero.
        heap.shapes.push(Some(ShapeHeapData::new_root(&heap.hasher)));
        heap
    }

    pub(crate) fn alloc_counter(&self) -> usize {
        self.objects.iter().filter(|o| o.is_some()).count()
            + self.shapes.iter().filter(|s| s.is_some()).count()
            + self.strings.iter().filter(|s| s.is_some()).count()
            + self.symbols.iter().filter(|s| s.is_some()).count()
            + self.accessors.iter().filter(|a| a.is_some()).count()
    }

    /// Number of slots in all arenas, live or free.
    pub(crate) fn slot_count(&self) -> usize {
        self.objects.len()
            + self.shapes.len()
            + self.strings.len()
            + self.symbols.len()
            + self.accessors.len()
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}
