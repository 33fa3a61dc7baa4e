// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::rc::Rc;

use super::{IndexedStorage, Object, ObjectFlags, PropertyStorage};
use crate::{
    ecmascript::{
        builtins::{
            host_object::HostObject, ordinary::shape::Shape, proxy::data::ProxyHeapData,
        },
        execution::ExceptionType,
        types::FunctionHeapData,
    },
    heap::{HeapMarkAndSweep, WorkQueues},
};

/// What kind of object this is beyond its named and indexed properties.
#[derive(Debug)]
pub enum ObjectKind {
    Ordinary,
    /// ### [10.4.2 Array Exotic Objects](https://tc39.es/ecma262/#sec-array-exotic-objects)
    Array,
    /// ### [10.4.4 Arguments Exotic Objects](https://tc39.es/ecma262/#sec-arguments-exotic-objects)
    Arguments,
    Error(ExceptionType),
    Function(FunctionHeapData),
    /// ### [10.5 Proxy Object Internal Methods and Internal Slots](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots)
    Proxy(ProxyHeapData),
    Host(Rc<dyn HostObject>),
}

#[derive(Debug)]
pub struct ObjectHeapData {
    pub(crate) prototype: Option<Object>,
    pub(crate) shape: Shape,
    pub(crate) flags: ObjectFlags,
    pub(crate) storage: PropertyStorage,
    /// `None` when no element is materialized; only objects flagged
    /// [`ObjectFlags::INDEXED_STORAGE`] ever allocate one.
    pub(crate) indexed: Option<IndexedStorage>,
    pub(crate) kind: ObjectKind,
}

impl ObjectHeapData {
    pub(crate) fn new(prototype: Option<Object>, kind: ObjectKind) -> Self {
        let mut flags = ObjectFlags::EXTENSIBLE;
        match &kind {
            ObjectKind::Array | ObjectKind::Arguments => flags |= ObjectFlags::INDEXED_STORAGE,
            ObjectKind::Function(_) => flags |= ObjectFlags::LAZY,
            ObjectKind::Proxy(_) => flags |= ObjectFlags::PROXY,
            ObjectKind::Host(_) => flags |= ObjectFlags::HOST_OBJECT,
            ObjectKind::Ordinary | ObjectKind::Error(_) => {}
        }
        Self {
            prototype,
            shape: Shape::ROOT,
            flags,
            storage: PropertyStorage::default(),
            indexed: None,
            kind,
        }
    }

    pub fn is_extensible(&self) -> bool {
        self.flags.contains(ObjectFlags::EXTENSIBLE)
    }

    pub(crate) fn set_extensible(&mut self, value: bool) {
        self.flags.set(ObjectFlags::EXTENSIBLE, value);
    }

    pub fn prototype(&self) -> Option<Object> {
        self.prototype
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn flags(&self) -> ObjectFlags {
        self.flags
    }
}

impl HeapMarkAndSweep for ObjectHeapData {
    fn mark_values(&self, queues: &mut WorkQueues) {
        let Self {
            prototype,
            shape,
            flags: _,
            storage,
            indexed,
            kind,
        } = self;
        if let Some(prototype) = prototype {
            queues.objects.push(*prototype);
        }
        queues.shapes.push(*shape);
        storage.mark_values(queues);
        if let Some(indexed) = indexed {
            indexed.mark_values(queues);
        }
        match kind {
            ObjectKind::Ordinary
            | ObjectKind::Array
            | ObjectKind::Arguments
            | ObjectKind::Error(_) => {}
            ObjectKind::Function(data) => data.mark_values(queues),
            ObjectKind::Proxy(data) => data.mark_values(queues),
            ObjectKind::Host(host) => host.mark_values(queues),
        }
    }
}
