// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod data;
mod indexed_storage;
mod internal_methods;
mod property_flags;
mod property_key;
mod property_storage;

use core::ops::{BitOr, BitOrAssign};
use std::ops::{Index, IndexMut};

pub use data::{ObjectHeapData, ObjectKind};
pub(crate) use indexed_storage::IndexedSet;
pub use indexed_storage::IndexedStorage;
pub use internal_methods::InternalMethods;
pub use property_flags::PropertyFlags;
pub use property_key::{MAX_ARRAY_INDEX, PropertyKey};
pub use property_storage::{PropertyStorage, PropertyValue};

use super::FunctionHeapData;
use crate::{
    ecmascript::{builtins::ordinary::shape::Shape, execution::Agent},
    heap::{CreateHeapData, Heap, HeapMarkAndSweep, WorkQueues, allocate, indexes::ObjectIndex},
};

/// ### [6.1.7 The Object Type](https://tc39.es/ecma262/#sec-object-type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Object(pub(crate) ObjectIndex);

/// Object level flags. `SEALED` and `FROZEN` are set by the integrity
/// operations and also cache a positive answer of `is_sealed` and
/// `is_frozen`; they decide the flags of indexed storage elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectFlags(u16);

impl ObjectFlags {
    pub const EXTENSIBLE: Self = Self(1 << 0);
    pub const SEALED: Self = Self(1 << 1);
    pub const FROZEN: Self = Self(1 << 2);
    /// Own property resolution is provided by a host object.
    pub const HOST_OBJECT: Self = Self(1 << 3);
    /// Own property resolution is provided by a proxy handler.
    pub const PROXY: Self = Self(1 << 4);
    /// Some own properties have not been materialized yet.
    pub const LAZY: Self = Self(1 << 5);
    /// Array index keys are stored in indexed storage.
    pub const INDEXED_STORAGE: Self = Self(1 << 6);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub(crate) fn set(&mut self, flag: Self, value: bool) {
        if value {
            self.0 |= flag.0;
        } else {
            self.0 &= !flag.0;
        }
    }
}

impl BitOr for ObjectFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ObjectFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Which keys an own property key enumeration reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnKeysFlags {
    pub include_symbols: bool,
    pub include_non_symbols: bool,
    pub include_non_enumerable: bool,
}

impl OwnKeysFlags {
    /// Everything, as reported by `[[OwnPropertyKeys]]`.
    pub const ALL: Self = Self {
        include_symbols: true,
        include_non_symbols: true,
        include_non_enumerable: true,
    };

    /// Enumerable string and index keys, as seen by `Object.keys`.
    pub const ENUMERABLE_STRINGS: Self = Self {
        include_symbols: false,
        include_non_symbols: true,
        include_non_enumerable: false,
    };
}

/// Options of a property operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropOpFlags {
    /// Raise a TypeError (or RangeError) instead of returning `false`.
    pub throw_on_error: bool,
    /// Raise a ReferenceError when a read finds no property.
    pub must_exist: bool,
}

impl PropOpFlags {
    pub const NONE: Self = Self {
        throw_on_error: false,
        must_exist: false,
    };

    pub const THROW_ON_ERROR: Self = Self {
        throw_on_error: true,
        must_exist: false,
    };

    pub const fn from_throw(throw: bool) -> Self {
        Self {
            throw_on_error: throw,
            must_exist: false,
        }
    }
}

impl Object {
    pub(crate) const fn get_index(self) -> usize {
        self.0.into_index()
    }

    pub fn is_proxy(self, agent: &Agent) -> bool {
        agent[self].flags.contains(ObjectFlags::PROXY)
    }

    pub fn is_host_object(self, agent: &Agent) -> bool {
        agent[self].flags.contains(ObjectFlags::HOST_OBJECT)
    }

    pub fn is_array_exotic(self, agent: &Agent) -> bool {
        matches!(agent[self].kind, ObjectKind::Array)
    }

    pub fn is_bound_function(self, agent: &Agent) -> bool {
        matches!(
            agent[self].kind,
            ObjectKind::Function(FunctionHeapData::Bound(_))
        )
    }

    pub fn has_indexed_storage(self, agent: &Agent) -> bool {
        agent[self].flags.contains(ObjectFlags::INDEXED_STORAGE)
    }

    pub fn is_sealed_flag(self, agent: &Agent) -> bool {
        agent[self].flags.contains(ObjectFlags::SEALED)
    }

    pub fn is_frozen_flag(self, agent: &Agent) -> bool {
        agent[self].flags.contains(ObjectFlags::FROZEN)
    }

    pub fn shape(self, agent: &Agent) -> Shape {
        agent[self].shape
    }

    /// The materialized indexed range `[begin, end)`, if any.
    pub fn indexed_range(self, agent: &Agent) -> Option<(u32, u32)> {
        agent[self]
            .indexed
            .as_ref()
            .map(|indexed| (indexed.begin_index(), indexed.end_index()))
    }

    /// Capacity of the materialized indexed storage, zero if none.
    pub fn indexed_capacity(self, agent: &Agent) -> usize {
        agent[self]
            .indexed
            .as_ref()
            .map_or(0, IndexedStorage::capacity)
    }
}

impl CreateHeapData<ObjectHeapData, Object> for Heap {
    fn create(&mut self, data: ObjectHeapData) -> Object {
        Object(allocate(&mut self.objects, &mut self.free.objects, data))
    }
}

impl Index<Object> for Agent {
    type Output = ObjectHeapData;

    fn index(&self, index: Object) -> &Self::Output {
        self.heap
            .objects
            .get(index.get_index())
            .expect("Object out of bounds")
            .as_ref()
            .expect("Object slot empty")
    }
}

impl IndexMut<Object> for Agent {
    fn index_mut(&mut self, index: Object) -> &mut Self::Output {
        self.heap
            .objects
            .get_mut(index.get_index())
            .expect("Object out of bounds")
            .as_mut()
            .expect("Object slot empty")
    }
}

impl HeapMarkAndSweep for Object {
    fn mark_values(&self, queues: &mut WorkQueues) {
        queues.objects.push(*self);
    }
}
