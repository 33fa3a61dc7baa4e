// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Getter/setter pairs stored in the property slots of accessor properties.

use std::ops::Index;

use crate::{
    ecmascript::{execution::Agent, types::Function},
    heap::{CreateHeapData, Heap, HeapMarkAndSweep, WorkQueues, allocate, indexes::AccessorIndex},
};

/// A heap allocated `{ [[Get]], [[Set]] }` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Accessor(pub(crate) AccessorIndex);

#[derive(Debug, Clone, Copy)]
pub struct AccessorHeapData {
    pub(crate) getter: Option<Function>,
    pub(crate) setter: Option<Function>,
}

impl Accessor {
    pub(crate) const fn get_index(self) -> usize {
        self.0.into_index()
    }

    pub fn create(agent: &mut Agent, getter: Option<Function>, setter: Option<Function>) -> Self {
        agent.heap.create(AccessorHeapData { getter, setter })
    }

    pub fn getter(self, agent: &Agent) -> Option<Function> {
        agent[self].getter
    }

    pub fn setter(self, agent: &Agent) -> Option<Function> {
        agent[self].setter
    }
}

impl CreateHeapData<AccessorHeapData, Accessor> for Heap {
    fn create(&mut self, data: AccessorHeapData) -> Accessor {
        Accessor(allocate(&mut self.accessors, &mut self.free.accessors, data))
    }
}

impl Index<Accessor> for Agent {
    type Output = AccessorHeapData;

    fn index(&self, index: Accessor) -> &Self::Output {
        self.heap
            .accessors
            .get(index.get_index())
            .expect("Accessor out of bounds")
            .as_ref()
            .expect("Accessor slot empty")
    }
}

impl HeapMarkAndSweep for AccessorHeapData {
    fn mark_values(&self, queues: &mut WorkQueues) {
        if let Some(getter) = self.getter {
            queues.objects.push(getter.into_object());
        }
        if let Some(setter) = self.setter {
            queues.objects.push(setter.into_object());
        }
    }
}
