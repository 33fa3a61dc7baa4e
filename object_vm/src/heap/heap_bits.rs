// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::Heap;
use crate::ecmascript::{
    builtins::{accessor::Accessor, ordinary::shape::Shape},
    types::{Object, PropertyKey, String, Symbol, Value},
};

/// Mark bits of every heap arena, indexed like the arena itself.
#[derive(Debug)]
pub(crate) struct HeapBits {
    pub(crate) accessors: Box<[bool]>,
    pub(crate) objects: Box<[bool]>,
    pub(crate) shapes: Box<[bool]>,
    pub(crate) strings: Box<[bool]>,
    pub(crate) symbols: Box<[bool]>,
}

/// Handles found reachable but not yet traced.
#[derive(Debug)]
pub struct WorkQueues {
    pub accessors: Vec<Accessor>,
    pub objects: Vec<Object>,
    pub shapes: Vec<Shape>,
    pub strings: Vec<String>,
    pub symbols: Vec<Symbol>,
}

impl HeapBits {
    pub(crate) fn new(heap: &Heap) -> Self {
        Self {
            accessors: vec![false; heap.accessors.len()].into_boxed_slice(),
            objects: vec![false; heap.objects.len()].into_boxed_slice(),
            shapes: vec![false; heap.shapes.len()].into_boxed_slice(),
            strings: vec![false; heap.strings.len()].into_boxed_slice(),
            symbols: vec![false; heap.symbols.len()].into_boxed_slice(),
        }
    }
}

impl WorkQueues {
    pub(crate) fn new(heap: &Heap) -> Self {
        Self {
            accessors: Vec::with_capacity(heap.accessors.len() / 4),
            objects: Vec::with_capacity(heap.objects.len() / 4),
            shapes: Vec::with_capacity(heap.shapes.len() / 4),
            strings: Vec::with_capacity(heap.strings.len() / 4),
            symbols: Vec::with_capacity(heap.symbols.len() / 4),
        }
    }

    pub fn push_value(&mut self, value: Value) {
        match value {
            Value::String(string) => self.strings.push(string),
            Value::Symbol(symbol) => self.symbols.push(symbol),
            Value::Object(object) => self.objects.push(object),
            Value::Undefined | Value::Null | Value::Boolean(_) | Value::Number(_) => {}
        }
    }

    pub fn push_key(&mut self, key: PropertyKey) {
        match key {
            PropertyKey::Integer(_) => {}
            PropertyKey::String(string) => self.strings.push(string),
            PropertyKey::Symbol(symbol) => self.symbols.push(symbol),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
            && self.objects.is_empty()
            && self.shapes.is_empty()
            && self.strings.is_empty()
            && self.symbols.is_empty()
    }
}

/// Tracing of the handles held by a piece of heap data.
pub trait HeapMarkAndSweep {
    fn mark_values(&self, queues: &mut WorkQueues);
}

impl<T: HeapMarkAndSweep> HeapMarkAndSweep for Option<T> {
    fn mark_values(&self, queues: &mut WorkQueues) {
        if let Some(content) = self {
            content.mark_values(queues);
        }
    }
}

impl<T: HeapMarkAndSweep> HeapMarkAndSweep for [T] {
    fn mark_values(&self, queues: &mut WorkQueues) {
        self.iter().for_each(|entry| entry.mark_values(queues));
    }
}
