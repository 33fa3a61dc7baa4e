// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Objects whose properties are provided by the embedder.
//!
//! Every key that is not an own property of the object's shape resolves to
//! the host: it reports a writable, enumerable, non-configurable data
//! property whose value comes from [`HostObject::get`]. Host properties
//! cannot be deleted, and `has` is always true for a host object.

use core::fmt::Debug;
use std::rc::Rc;

use crate::{
    ecmascript::{
        builtins::ordinary::object_create_with_kind,
        execution::{Agent, JsResult},
        types::{Object, ObjectKind, PropertyKey, Value},
    },
    engine::context::GcScope,
    heap::WorkQueues,
};

/// Native callbacks backing a host object. Each callback runs as a nested
/// native call and may call back into the object model.
pub trait HostObject: Debug {
    fn get(&self, agent: &mut Agent, key: PropertyKey, gc: GcScope) -> JsResult<Value>;

    /// Returns `false` to reject the write.
    fn set(&self, agent: &mut Agent, key: PropertyKey, value: Value, gc: GcScope)
    -> JsResult<bool>;

    /// Keys reported by enumeration, after the object's own shape keys.
    fn own_keys(&self, agent: &mut Agent, gc: GcScope) -> JsResult<Vec<PropertyKey>>;

    /// Mark the heap values the host holds on to.
    fn mark_values(&self, _queues: &mut WorkQueues) {}
}

/// Create a host object. `prototype` defaults to `%Object.prototype%`.
pub fn host_object_create(
    agent: &mut Agent,
    host: Rc<dyn HostObject>,
    prototype: Option<Object>,
) -> Object {
    let prototype = match prototype {
        Some(prototype) => prototype,
        None => agent.intrinsics().object_prototype,
    };
    object_create_with_kind(agent, Some(prototype), ObjectKind::Host(host))
}
