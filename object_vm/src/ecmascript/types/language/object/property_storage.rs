// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    ecmascript::{builtins::accessor::Accessor, types::Value},
    heap::{HeapMarkAndSweep, WorkQueues},
};

/// Number of named property slots stored inline in every object.
pub(crate) const DIRECT_PROPERTY_SLOTS: usize = 5;

/// Contents of a named property slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Data(Value),
    Accessor(Accessor),
}

impl Default for PropertyValue {
    fn default() -> Self {
        PropertyValue::Data(Value::Undefined)
    }
}

impl PropertyValue {
    pub fn as_data(self) -> Option<Value> {
        match self {
            PropertyValue::Data(value) => Some(value),
            PropertyValue::Accessor(_) => None,
        }
    }
}

/// Named property values of one object. Slot numbers are handed out by the
/// object's shape; the first [`DIRECT_PROPERTY_SLOTS`] live inline and the
/// rest in a lazily allocated overflow vector.
#[derive(Debug, Default)]
pub struct PropertyStorage {
    direct: [PropertyValue; DIRECT_PROPERTY_SLOTS],
    indirect: Vec<PropertyValue>,
}

impl PropertyStorage {
    pub fn get(&self, slot: u32) -> PropertyValue {
        let slot = slot as usize;
        if slot < DIRECT_PROPERTY_SLOTS {
            self.direct[slot]
        } else {
            self.indirect
                .get(slot - DIRECT_PROPERTY_SLOTS)
                .copied()
                .unwrap_or_default()
        }
    }

    /// Write to an already allocated slot.
    pub fn set(&mut self, slot: u32, value: PropertyValue) {
        let slot = slot as usize;
        if slot < DIRECT_PROPERTY_SLOTS {
            self.direct[slot] = value;
        } else {
            self.indirect[slot - DIRECT_PROPERTY_SLOTS] = value;
        }
    }

    /// Write `value` to `slot`, growing the overflow vector if the slot has
    /// not been allocated yet. Growth doubles the capacity.
    pub fn allocate_slot(&mut self, slot: u32, value: PropertyValue) {
        let slot = slot as usize;
        if slot < DIRECT_PROPERTY_SLOTS {
            self.direct[slot] = value;
            return;
        }
        let index = slot - DIRECT_PROPERTY_SLOTS;
        if index < self.indirect.len() {
            self.indirect[index] = value;
            return;
        }
        let required = index + 1;
        if required > self.indirect.capacity() {
            let new_capacity = required.max(self.indirect.capacity() * 2).max(4);
            log::trace!(
                "Growing indirect property storage from {} to {new_capacity}",
                self.indirect.capacity()
            );
            self.indirect
                .reserve_exact(new_capacity - self.indirect.len());
        }
        self.indirect.resize(index, PropertyValue::default());
        self.indirect.push(value);
    }

    /// Reset a slot released by a deleted property.
    pub fn clear_slot(&mut self, slot: u32) {
        self.set(slot, PropertyValue::default());
    }

    pub fn indirect_capacity(&self) -> usize {
        self.indirect.capacity()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyValue> {
        self.direct.iter().chain(self.indirect.iter())
    }
}

impl HeapMarkAndSweep for PropertyValue {
    fn mark_values(&self, queues: &mut WorkQueues) {
        match self {
            PropertyValue::Data(value) => value.mark_values(queues),
            PropertyValue::Accessor(accessor) => queues.accessors.push(*accessor),
        }
    }
}

impl HeapMarkAndSweep for PropertyStorage {
    fn mark_values(&self, queues: &mut WorkQueues) {
        for value in self.iter() {
            value.mark_values(queues);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_slots_are_allocated_lazily() {
        let mut storage = PropertyStorage::default();
        for slot in 0..DIRECT_PROPERTY_SLOTS as u32 {
            storage.allocate_slot(slot, PropertyValue::Data(Value::Number(slot as f64)));
        }
        assert_eq!(storage.indirect_capacity(), 0);
        storage.allocate_slot(5, PropertyValue::Data(Value::Boolean(true)));
        assert!(storage.indirect_capacity() >= 1);
        assert_eq!(storage.get(5), PropertyValue::Data(Value::Boolean(true)));
        assert_eq!(storage.get(2), PropertyValue::Data(Value::Number(2.0)));
        storage.clear_slot(5);
        assert_eq!(storage.get(5), PropertyValue::Data(Value::Undefined));
    }
}
