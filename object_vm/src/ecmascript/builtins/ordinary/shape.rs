// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## Object shapes
//!
//! A shape maps property keys to storage slots and property flags. Shapes
//! form a tree: adding a property or changing its flags transitions to a
//! cached child, so objects that receive the same properties in the same
//! order end up sharing a single shape. Once a shape grows past the
//! dictionary threshold, or a property is deleted, the object moves to a
//! private dictionary shape that is never shared and never cached.

use std::ops::{Index, IndexMut};

use hashbrown::{HashMap, HashTable};

use crate::{
    ecmascript::{
        execution::Agent,
        types::{PropertyFlags, PropertyKey},
    },
    heap::{CreateHeapData, Heap, HeapMarkAndSweep, WorkQueues, allocate, indexes::ShapeIndex},
};

/// Data structure describing the shape of an object.
///
/// A published (non-dictionary) shape is immutable: slot numbers assigned in
/// it never change, and every "mutation" returns a different shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Shape(pub(crate) ShapeIndex);

/// A property as recorded in a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeProperty {
    pub key: PropertyKey,
    pub slot: u32,
    pub flags: PropertyFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TransitionKey {
    Add(PropertyKey, PropertyFlags),
    UpdateFlags(PropertyKey, PropertyFlags),
    MakeAllNonConfigurable,
    MakeAllReadOnly,
}

#[derive(Debug)]
struct ShapeTransition {
    key: TransitionKey,
    hash: u64,
    child: Shape,
}

#[derive(Debug)]
pub struct ShapeHeapData {
    /// Shape this one was derived from; `None` for the root and for
    /// dictionaries.
    parent: Option<Shape>,
    /// Properties in insertion order. Deleted entries of a dictionary are
    /// left as `None` until the next compaction.
    properties: Vec<Option<ShapeProperty>>,
    /// Key to index into `properties`.
    lookup: HashMap<PropertyKey, u32, ahash::RandomState>,
    /// Slots released by deleted properties, reused by later additions.
    free_slots: Vec<u32>,
    slot_count: u32,
    property_count: u32,
    /// Cached children. Weak: dead children are dropped by the collector.
    transitions: HashTable<ShapeTransition>,
    dictionary: bool,
    has_index_like_properties: bool,
}

impl ShapeHeapData {
    pub(crate) fn new_root(hasher: &ahash::RandomState) -> Self {
        Self {
            parent: None,
            properties: Vec::new(),
            lookup: HashMap::with_hasher(hasher.clone()),
            free_slots: Vec::new(),
            slot_count: 0,
            property_count: 0,
            transitions: HashTable::new(),
            dictionary: false,
            has_index_like_properties: false,
        }
    }

    /// Copy of this shape's property table with no transitions.
    fn derive(&self, parent: Option<Shape>) -> Self {
        Self {
            parent,
            properties: self.properties.clone(),
            lookup: self.lookup.clone(),
            free_slots: self.free_slots.clone(),
            slot_count: self.slot_count,
            property_count: self.property_count,
            transitions: HashTable::new(),
            dictionary: self.dictionary,
            has_index_like_properties: self.has_index_like_properties,
        }
    }

    fn find(&self, key: PropertyKey) -> Option<(usize, ShapeProperty)> {
        let index = *self.lookup.get(&key)? as usize;
        self.properties[index].map(|property| (index, property))
    }

    fn add_in_place(&mut self, key: PropertyKey, flags: PropertyFlags) -> u32 {
        debug_assert!(!self.lookup.contains_key(&key));
        let reused = if self.dictionary {
            self.free_slots.pop()
        } else {
            None
        };
        let slot = reused.unwrap_or_else(|| {
            let slot = self.slot_count;
            self.slot_count += 1;
            slot
        });
        self.lookup.insert(key, self.properties.len() as u32);
        self.properties.push(Some(ShapeProperty { key, slot, flags }));
        self.property_count += 1;
        if key.is_array_index() {
            self.has_index_like_properties = true;
        }
        slot
    }

    fn remove_in_place(&mut self, key: PropertyKey) -> Option<ShapeProperty> {
        debug_assert!(self.dictionary);
        let index = self.lookup.remove(&key)? as usize;
        let property = self.properties[index].take()?;
        self.free_slots.push(property.slot);
        self.property_count -= 1;
        if self.properties.len() > 8 && self.property_count as usize * 2 < self.properties.len() {
            self.compact();
        }
        if property.key.is_array_index() && self.has_index_like_properties {
            self.has_index_like_properties = self
                .properties
                .iter()
                .flatten()
                .any(|property| property.key.is_array_index());
        }
        Some(property)
    }

    fn compact(&mut self) {
        self.properties.retain(Option::is_some);
        self.lookup.clear();
        for (index, property) in self.properties.iter().enumerate() {
            if let Some(property) = property {
                self.lookup.insert(property.key, index as u32);
            }
        }
    }

    fn set_flags_in_place(&mut self, key: PropertyKey, flags: PropertyFlags) {
        if let Some((index, mut property)) = self.find(key) {
            property.flags = flags;
            self.properties[index] = Some(property);
        }
    }

    fn map_flags_in_place(&mut self, f: impl Fn(PropertyFlags) -> PropertyFlags) {
        for property in self.properties.iter_mut().flatten() {
            property.flags = f(property.flags);
        }
    }
}

fn non_configurable(flags: PropertyFlags) -> PropertyFlags {
    flags.with(PropertyFlags::CONFIGURABLE, false)
}

fn read_only(flags: PropertyFlags) -> PropertyFlags {
    let flags = flags.with(PropertyFlags::CONFIGURABLE, false);
    if flags.accessor() {
        flags
    } else {
        flags.with(PropertyFlags::WRITABLE, false)
    }
}

impl Shape {
    /// The empty shape every object starts from.
    pub const ROOT: Shape = Shape(ShapeIndex::from_u32_index(0));

    pub(crate) const fn get_index(self) -> usize {
        self.0.into_index()
    }

    /// Number of properties.
    pub fn len(self, agent: &Agent) -> u32 {
        agent[self].property_count
    }

    pub fn is_empty(self, agent: &Agent) -> bool {
        self.len(agent) == 0
    }

    /// Number of storage slots an object with this shape needs.
    pub fn slot_count(self, agent: &Agent) -> u32 {
        agent[self].slot_count
    }

    pub fn parent(self, agent: &Agent) -> Option<Shape> {
        agent[self].parent
    }

    pub fn is_dictionary(self, agent: &Agent) -> bool {
        agent[self].dictionary
    }

    /// True if a property key of this shape is an array index.
    pub fn has_index_like_properties(self, agent: &Agent) -> bool {
        agent[self].has_index_like_properties
    }

    pub fn get_property(self, agent: &Agent, key: PropertyKey) -> Option<ShapeProperty> {
        agent[self].find(key).map(|(_, property)| property)
    }

    /// Visit every property in insertion order.
    pub fn for_each_property(self, agent: &Agent, mut visitor: impl FnMut(&ShapeProperty)) {
        for property in agent[self].properties.iter().flatten() {
            visitor(property);
        }
    }

    pub fn keys(self, agent: &Agent) -> Vec<PropertyKey> {
        let mut keys = Vec::with_capacity(self.len(agent) as usize);
        self.for_each_property(agent, |property| keys.push(property.key));
        keys
    }

    pub fn are_all_non_configurable(self, agent: &Agent) -> bool {
        agent[self]
            .properties
            .iter()
            .flatten()
            .all(|property| !property.flags.configurable())
    }

    pub fn are_all_read_only(self, agent: &Agent) -> bool {
        agent[self].properties.iter().flatten().all(|property| {
            !property.flags.configurable()
                && (property.flags.accessor() || !property.flags.writable())
        })
    }

    /// Add a property, returning the new shape and the slot assigned to the
    /// property.
    pub(crate) fn add_property(
        self,
        agent: &mut Agent,
        key: PropertyKey,
        flags: PropertyFlags,
    ) -> (Shape, u32) {
        if self.is_dictionary(agent) {
            let slot = agent[self].add_in_place(key, flags);
            return (self, slot);
        }
        if self.len(agent) >= agent.options.dictionary_threshold {
            let dictionary = self.convert_to_dictionary(agent);
            let slot = agent[dictionary].add_in_place(key, flags);
            return (dictionary, slot);
        }
        let transition = TransitionKey::Add(key, flags);
        let child = self.get_or_create_child_shape(agent, transition, |data| {
            data.add_in_place(key, flags);
        });
        let slot = agent[child]
            .find(key)
            .map(|(_, property)| property.slot)
            .unwrap_or_else(|| unreachable_missing_property());
        (child, slot)
    }

    /// Remove a property. Always results in a dictionary shape; the caller
    /// clears the released storage slot.
    pub(crate) fn delete_property(self, agent: &mut Agent, key: PropertyKey) -> Shape {
        let dictionary = if self.is_dictionary(agent) {
            self
        } else {
            self.convert_to_dictionary(agent)
        };
        agent[dictionary].remove_in_place(key);
        dictionary
    }

    /// Change the flags of an existing property. The slot is unchanged.
    pub(crate) fn update_flags(
        self,
        agent: &mut Agent,
        key: PropertyKey,
        flags: PropertyFlags,
    ) -> Shape {
        if self.is_dictionary(agent) {
            agent[self].set_flags_in_place(key, flags);
            return self;
        }
        let transition = TransitionKey::UpdateFlags(key, flags);
        self.get_or_create_child_shape(agent, transition, |data| {
            data.set_flags_in_place(key, flags);
        })
    }

    /// Clear `configurable` on every property.
    pub(crate) fn make_all_non_configurable(self, agent: &mut Agent) -> Shape {
        if self.is_dictionary(agent) {
            agent[self].map_flags_in_place(non_configurable);
            return self;
        }
        self.get_or_create_child_shape(agent, TransitionKey::MakeAllNonConfigurable, |data| {
            data.map_flags_in_place(non_configurable)
        })
    }

    /// Clear `configurable` on every property and `writable` on every data
    /// property.
    pub(crate) fn make_all_read_only(self, agent: &mut Agent) -> Shape {
        if self.is_dictionary(agent) {
            agent[self].map_flags_in_place(read_only);
            return self;
        }
        self.get_or_create_child_shape(agent, TransitionKey::MakeAllReadOnly, |data| {
            data.map_flags_in_place(read_only)
        })
    }

    fn get_transition_to(self, agent: &Agent, key: TransitionKey, hash: u64) -> Option<Shape> {
        agent[self]
            .transitions
            .find(hash, |transition| transition.key == key)
            .map(|transition| transition.child)
    }

    fn get_or_create_child_shape(
        self,
        agent: &mut Agent,
        key: TransitionKey,
        mutate: impl FnOnce(&mut ShapeHeapData),
    ) -> Shape {
        let hash = agent.heap.hasher.hash_one(key);
        if let Some(child) = self.get_transition_to(agent, key, hash) {
            return child;
        }
        log::trace!("Shape {:?} has no cached transition for {key:?}", self.0);
        let mut data = agent[self].derive(Some(self));
        mutate(&mut data);
        let child = agent.heap.create(data);
        agent[self].transitions.insert_unique(
            hash,
            ShapeTransition { key, hash, child },
            |transition| transition.hash,
        );
        child
    }

    /// Copy this shape into a fresh dictionary owned by a single object.
    fn convert_to_dictionary(self, agent: &mut Agent) -> Shape {
        log::debug!(
            "Converting shape {:?} with {} properties to dictionary mode",
            self.0,
            self.len(agent)
        );
        let mut data = agent[self].derive(None);
        data.dictionary = true;
        agent.heap.create(data)
    }
}

#[cold]
#[inline(never)]
fn unreachable_missing_property() -> ! {
    unreachable!("Shape transition lost the added property")
}

impl CreateHeapData<ShapeHeapData, Shape> for Heap {
    fn create(&mut self, data: ShapeHeapData) -> Shape {
        Shape(allocate(&mut self.shapes, &mut self.free.shapes, data))
    }
}

impl Index<Shape> for Agent {
    type Output = ShapeHeapData;

    fn index(&self, index: Shape) -> &Self::Output {
        self.heap
            .shapes
            .get(index.get_index())
            .expect("Shape out of bounds")
            .as_ref()
            .expect("Shape slot empty")
    }
}

impl IndexMut<Shape> for Agent {
    fn index_mut(&mut self, index: Shape) -> &mut Self::Output {
        self.heap
            .shapes
            .get_mut(index.get_index())
            .expect("Shape out of bounds")
            .as_mut()
            .expect("Shape slot empty")
    }
}

impl HeapMarkAndSweep for ShapeHeapData {
    fn mark_values(&self, queues: &mut WorkQueues) {
        if let Some(parent) = self.parent {
            queues.shapes.push(parent);
        }
        for property in self.properties.iter().flatten() {
            queues.push_key(property.key);
        }
    }
}

impl ShapeHeapData {
    /// Drop cached transitions to shapes that did not survive collection.
    pub(crate) fn sweep_transitions(&mut self, is_alive: impl Fn(Shape) -> bool) {
        self.transitions
            .retain(|transition| is_alive(transition.child));
    }
}
