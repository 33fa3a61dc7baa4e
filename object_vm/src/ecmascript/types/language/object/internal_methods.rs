// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{Object, OwnKeysFlags, PropOpFlags, PropertyKey};
use crate::{
    ecmascript::{
        builtins::{
            array::{Array, array_length},
            ordinary::{
                ordinary_define_own_property, ordinary_delete, ordinary_get,
                ordinary_get_own_property, ordinary_get_prototype_of, ordinary_has_property,
                ordinary_is_extensible, ordinary_own_property_keys, ordinary_prevent_extensions,
                ordinary_set, ordinary_set_prototype_of, peek_own_property,
            },
            proxy::Proxy,
        },
        execution::{Agent, ExceptionType, JsResult},
        types::{PropertyDescriptor, Value},
    },
    engine::context::{GcScope, NoGcScope},
};

/// ### [Table 4: Essential Internal Methods](https://tc39.es/ecma262/#table-essential-internal-methods)
///
/// Boolean results report benign failure as `Ok(false)`; callers decide
/// whether that becomes an exception.
pub trait InternalMethods: Copy + Into<Object> {
    /// ## \[\[GetPrototypeOf\]\]
    fn internal_get_prototype_of(self, agent: &mut Agent, gc: GcScope) -> JsResult<Option<Object>>;

    /// ## \[\[SetPrototypeOf\]\]
    fn internal_set_prototype_of(
        self,
        agent: &mut Agent,
        prototype: Option<Object>,
        gc: GcScope,
    ) -> JsResult<bool>;

    /// ## \[\[IsExtensible\]\]
    fn internal_is_extensible(self, agent: &mut Agent, gc: GcScope) -> JsResult<bool>;

    /// ## \[\[PreventExtensions\]\]
    fn internal_prevent_extensions(self, agent: &mut Agent, gc: GcScope) -> JsResult<bool>;

    /// ## \[\[GetOwnProperty\]\]
    fn internal_get_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        gc: GcScope,
    ) -> JsResult<Option<PropertyDescriptor>>;

    /// ## \[\[DefineOwnProperty\]\]
    fn internal_define_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
        gc: GcScope,
    ) -> JsResult<bool>;

    /// ## \[\[HasProperty\]\]
    fn internal_has_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        gc: GcScope,
    ) -> JsResult<bool>;

    /// ## \[\[Get\]\]
    fn internal_get(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        receiver: Value,
        gc: GcScope,
    ) -> JsResult<Value>;

    /// ## \[\[Set\]\]
    fn internal_set(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
        gc: GcScope,
    ) -> JsResult<bool>;

    /// ## \[\[Delete\]\]
    fn internal_delete(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        gc: GcScope,
    ) -> JsResult<bool>;

    /// ## \[\[OwnPropertyKeys\]\]
    fn internal_own_property_keys(
        self,
        agent: &mut Agent,
        gc: GcScope,
    ) -> JsResult<Vec<PropertyKey>>;
}

impl Object {
    fn as_proxy(self, agent: &Agent) -> Option<Proxy> {
        self.is_proxy(agent)
            .then(|| Proxy::from_object_unchecked(self))
    }
}

impl InternalMethods for Object {
    fn internal_get_prototype_of(self, agent: &mut Agent, gc: GcScope) -> JsResult<Option<Object>> {
        match self.as_proxy(agent) {
            Some(proxy) => proxy.internal_get_prototype_of(agent, gc),
            None => Ok(ordinary_get_prototype_of(agent, self)),
        }
    }

    fn internal_set_prototype_of(
        self,
        agent: &mut Agent,
        prototype: Option<Object>,
        gc: GcScope,
    ) -> JsResult<bool> {
        match self.as_proxy(agent) {
            Some(proxy) => proxy.internal_set_prototype_of(agent, prototype, gc),
            None => Ok(ordinary_set_prototype_of(agent, self, prototype)),
        }
    }

    fn internal_is_extensible(self, agent: &mut Agent, gc: GcScope) -> JsResult<bool> {
        match self.as_proxy(agent) {
            Some(proxy) => proxy.internal_is_extensible(agent, gc),
            None => Ok(ordinary_is_extensible(agent, self)),
        }
    }

    fn internal_prevent_extensions(self, agent: &mut Agent, gc: GcScope) -> JsResult<bool> {
        match self.as_proxy(agent) {
            Some(proxy) => proxy.internal_prevent_extensions(agent, gc),
            None => Ok(ordinary_prevent_extensions(agent, self)),
        }
    }

    fn internal_get_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        gc: GcScope,
    ) -> JsResult<Option<PropertyDescriptor>> {
        match self.as_proxy(agent) {
            Some(proxy) => proxy.internal_get_own_property(agent, property_key, gc),
            None => ordinary_get_own_property(agent, self, property_key, gc),
        }
    }

    fn internal_define_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
        gc: GcScope,
    ) -> JsResult<bool> {
        match self.as_proxy(agent) {
            Some(proxy) => {
                proxy.internal_define_own_property(agent, property_key, property_descriptor, gc)
            }
            None => {
                ordinary_define_own_property(agent, self, property_key, property_descriptor, gc)
            }
        }
    }

    fn internal_has_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        gc: GcScope,
    ) -> JsResult<bool> {
        match self.as_proxy(agent) {
            Some(proxy) => proxy.internal_has_property(agent, property_key, gc),
            None => ordinary_has_property(agent, self, property_key, gc),
        }
    }

    fn internal_get(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        receiver: Value,
        gc: GcScope,
    ) -> JsResult<Value> {
        match self.as_proxy(agent) {
            Some(proxy) => proxy.internal_get(agent, property_key, receiver, gc),
            None => ordinary_get(agent, self, property_key, receiver, gc),
        }
    }

    fn internal_set(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
        gc: GcScope,
    ) -> JsResult<bool> {
        match self.as_proxy(agent) {
            Some(proxy) => proxy.internal_set(agent, property_key, value, receiver, gc),
            None => ordinary_set(agent, self, property_key, value, receiver, gc),
        }
    }

    fn internal_delete(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        gc: GcScope,
    ) -> JsResult<bool> {
        match self.as_proxy(agent) {
            Some(proxy) => proxy.internal_delete(agent, property_key, gc),
            None => Ok(ordinary_delete(agent, self, property_key)),
        }
    }

    fn internal_own_property_keys(
        self,
        agent: &mut Agent,
        gc: GcScope,
    ) -> JsResult<Vec<PropertyKey>> {
        match self.as_proxy(agent) {
            Some(proxy) => proxy.internal_own_property_keys(agent, gc),
            None => ordinary_own_property_keys(agent, self, OwnKeysFlags::ALL, gc),
        }
    }
}

/// Turn a benign failure into an exception if the caller asked for it.
fn fail(
    agent: &mut Agent,
    flags: PropOpFlags,
    kind: ExceptionType,
    message: impl FnOnce(&mut Agent) -> std::string::String,
    gc: NoGcScope,
) -> JsResult<bool> {
    if !flags.throw_on_error {
        return Ok(false);
    }
    let message = message(agent);
    Err(agent.throw_exception(kind, &message, gc))
}

/// Explain why `[[Set]]` of `key` on `o` returned false.
fn set_failure_message(agent: &mut Agent, o: Object, key: PropertyKey) -> std::string::String {
    let name = key.to_display(agent);
    let mut holder = Some(o);
    while let Some(object) = holder {
        if object.is_proxy(agent) {
            return format!("'set' on proxy: trap returned falsish for property '{name}'");
        }
        if let Some(property) = peek_own_property(agent, object, key) {
            if property.flags.accessor() {
                return format!("Cannot assign to property '{name}' which has only a getter");
            }
            if !property.flags.writable() {
                return format!("Cannot assign to read-only property '{name}'");
            }
            if property.flags.internal_setter() {
                let length = array_length(agent, Array::from_object_unchecked(object));
                return format!("Cannot delete property '{}'", length.saturating_sub(1));
            }
            break;
        }
        holder = agent[object].prototype;
    }
    if !agent[o].is_extensible() {
        return format!("Cannot add new property '{name}'");
    }
    format!("Cannot assign to property '{name}'")
}

fn define_failure_message(agent: &mut Agent, o: Object, key: PropertyKey) -> std::string::String {
    let name = key.to_display(agent);
    if o.is_proxy(agent) {
        return format!("'defineProperty' on proxy: trap returned falsish for property '{name}'");
    }
    match peek_own_property(agent, o, key) {
        None => format!("Cannot add new property '{name}'"),
        Some(property) if property.flags.internal_setter() && property.flags.writable() => {
            let length = array_length(agent, Array::from_object_unchecked(o));
            format!("Cannot delete property '{}'", length.saturating_sub(1))
        }
        Some(_) => format!("Property '{name}' is not configurable"),
    }
}

impl Object {
    /// `[[Get]]` with the object as receiver. With `must_exist`, a missing
    /// property raises a ReferenceError.
    pub fn get_with_flags(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        flags: PropOpFlags,
        mut gc: GcScope,
    ) -> JsResult<Value> {
        if flags.must_exist && !self.internal_has_property(agent, property_key, gc.reborrow())? {
            let message = format!(
                "Property '{}' doesn't exist",
                property_key.to_display(agent)
            );
            return Err(agent.throw_exception(ExceptionType::ReferenceError, &message, gc.nogc()));
        }
        self.internal_get(agent, property_key, Value::Object(self), gc)
    }

    /// `[[Set]]` with the object as receiver.
    pub fn set_with_flags(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        value: Value,
        flags: PropOpFlags,
        mut gc: GcScope,
    ) -> JsResult<bool> {
        if self.internal_set(
            agent,
            property_key,
            value,
            Value::Object(self),
            gc.reborrow(),
        )? {
            return Ok(true);
        }
        fail(
            agent,
            flags,
            ExceptionType::TypeError,
            |agent| set_failure_message(agent, self, property_key),
            gc.nogc(),
        )
    }

    pub fn delete_with_flags(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        flags: PropOpFlags,
        mut gc: GcScope,
    ) -> JsResult<bool> {
        if self.internal_delete(agent, property_key, gc.reborrow())? {
            return Ok(true);
        }
        fail(
            agent,
            flags,
            ExceptionType::TypeError,
            |agent| {
                let name = property_key.to_display(agent);
                if self.is_proxy(agent) {
                    format!("'deleteProperty' on proxy: trap returned falsish for property '{name}'")
                } else {
                    format!("Property '{name}' is not configurable")
                }
            },
            gc.nogc(),
        )
    }

    pub fn define_own_property_with_flags(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
        flags: PropOpFlags,
        mut gc: GcScope,
    ) -> JsResult<bool> {
        if self.internal_define_own_property(
            agent,
            property_key,
            property_descriptor,
            gc.reborrow(),
        )? {
            return Ok(true);
        }
        fail(
            agent,
            flags,
            ExceptionType::TypeError,
            |agent| define_failure_message(agent, self, property_key),
            gc.nogc(),
        )
    }

    pub fn set_prototype_of_with_flags(
        self,
        agent: &mut Agent,
        prototype: Option<Object>,
        flags: PropOpFlags,
        mut gc: GcScope,
    ) -> JsResult<bool> {
        if self.internal_set_prototype_of(agent, prototype, gc.reborrow())? {
            return Ok(true);
        }
        fail(
            agent,
            flags,
            ExceptionType::TypeError,
            |agent| {
                if self.is_proxy(agent) {
                    "'setPrototypeOf' on proxy: trap returned falsish".to_string()
                } else if !agent[self].is_extensible() {
                    "Object is not extensible.".to_string()
                } else {
                    "Prototype cycle detected".to_string()
                }
            },
            gc.nogc(),
        )
    }

    /// `[[OwnPropertyKeys]]` filtered by key kind and enumerability.
    pub fn own_property_keys_with_flags(
        self,
        agent: &mut Agent,
        flags: OwnKeysFlags,
        mut gc: GcScope,
    ) -> JsResult<Vec<PropertyKey>> {
        let Some(proxy) = self.as_proxy(agent) else {
            return ordinary_own_property_keys(agent, self, flags, gc);
        };
        let keys = proxy.internal_own_property_keys(agent, gc.reborrow())?;
        let mut result = Vec::with_capacity(keys.len());
        for key in keys {
            if key.is_symbol() && !flags.include_symbols
                || !key.is_symbol() && !flags.include_non_symbols
            {
                continue;
            }
            if !flags.include_non_enumerable {
                let desc = proxy.internal_get_own_property(agent, key, gc.reborrow())?;
                if !desc.is_some_and(|desc| desc.enumerable == Some(true)) {
                    continue;
                }
            }
            result.push(key);
        }
        Ok(result)
    }
}
