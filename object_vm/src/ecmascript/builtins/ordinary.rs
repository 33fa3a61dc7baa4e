// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [10.1 Ordinary Object Internal Methods and Internal Slots](https://tc39.es/ecma262/#sec-ordinary-object-internal-methods-and-internal-slots)
//!
//! Own properties of an object live in one of three places:
//!
//! - named properties: the object's [`Shape`](shape::Shape) maps the key to
//!   a slot of the object's [`PropertyStorage`](crate::ecmascript::types::PropertyStorage);
//! - indexed elements: objects flagged with
//!   [`ObjectFlags::INDEXED_STORAGE`] keep array index keyed data properties
//!   with default attributes in [`IndexedStorage`];
//! - host properties: any key not found in the shape of a host object is
//!   resolved by its [`HostObject`] callbacks.
//!
//! An array index key is never present both as a named property and as an
//! indexed element.

pub mod shape;

use std::rc::Rc;

use crate::{
    ecmascript::{
        abstract_operations::{
            operations_on_objects::{call_function, create_data_property},
            testing_and_comparison::same_value,
        },
        builtins::{
            accessor::Accessor,
            array::{
                Array, array_define_length, array_length, array_length_writable,
                array_set_length_from_value, write_array_length,
            },
            host_object::HostObject,
        },
        execution::{Agent, ExceptionType, JsResult},
        types::{
            ArgumentsList, FunctionHeapData, IndexedSet, IndexedStorage, InternalMethods, Object,
            ObjectFlags, ObjectHeapData, ObjectKind, OwnKeysFlags, PropertyDescriptor,
            PropertyFlags, PropertyKey, PropertyValue, String, Value,
        },
    },
    engine::context::{GcScope, NoGcScope},
    heap::CreateHeapData,
};

/// Where an own property is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PropertyLocation {
    /// Slot in the property storage.
    Named(u32),
    /// Element of the indexed storage.
    Indexed(u32),
    /// Provided by the host object callbacks.
    Host,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct OwnProperty {
    pub(crate) location: PropertyLocation,
    pub(crate) flags: PropertyFlags,
}

pub(crate) fn object_create_with_kind(
    agent: &mut Agent,
    prototype: Option<Object>,
    kind: ObjectKind,
) -> Object {
    agent.heap.create(ObjectHeapData::new(prototype, kind))
}

/// ### [10.1.12 OrdinaryObjectCreate ( proto \[ , additionalInternalSlotsList \] )](https://tc39.es/ecma262/#sec-ordinaryobjectcreate)
///
/// Creates an ordinary object inheriting from `%Object.prototype%`.
pub fn ordinary_object_create(agent: &mut Agent) -> Object {
    let prototype = agent.intrinsics().object_prototype;
    object_create_with_kind(agent, Some(prototype), ObjectKind::Ordinary)
}

/// Creates an ordinary object with the given prototype.
pub fn ordinary_object_create_with_prototype(
    agent: &mut Agent,
    prototype: Option<Object>,
) -> Object {
    object_create_with_kind(agent, prototype, ObjectKind::Ordinary)
}

/// Append a named property without any checks. The key must not be present
/// on the object yet.
pub(crate) fn add_own_property(
    agent: &mut Agent,
    o: Object,
    key: PropertyKey,
    flags: PropertyFlags,
    value: PropertyValue,
) {
    let shape = agent[o].shape;
    let (shape, slot) = shape.add_property(agent, key, flags);
    let data = &mut agent[o];
    data.shape = shape;
    data.storage.allocate_slot(slot, value);
}

fn remove_named_property(agent: &mut Agent, o: Object, key: PropertyKey, slot: u32) {
    let shape = agent[o].shape.delete_property(agent, key);
    let data = &mut agent[o];
    data.shape = shape;
    data.storage.clear_slot(slot);
}

/// Materialize the `length` and `name` properties of a function object.
pub(crate) fn ensure_initialized(agent: &mut Agent, o: Object) {
    if !agent[o].flags.contains(ObjectFlags::LAZY) {
        return;
    }
    agent[o].flags.set(ObjectFlags::LAZY, false);
    let (length, name) = match &agent[o].kind {
        ObjectKind::Function(FunctionHeapData::Builtin(data)) => (data.length, Some(data.name)),
        ObjectKind::Function(FunctionHeapData::Bound(data)) => {
            let bound_count = data.bound_arguments.len() as u32;
            match &agent[data.target.into_object()].kind {
                ObjectKind::Function(FunctionHeapData::Builtin(target)) => {
                    (target.length.saturating_sub(bound_count), Some(target.name))
                }
                _ => (0, None),
            }
        }
        ObjectKind::Function(FunctionHeapData::ProxyRevoker(_)) => (0, None),
        _ => return,
    };
    let name = if o.is_bound_function(agent) {
        let target_name = name.map(|name| name.to_string_lossy(agent)).unwrap_or_default();
        String::from_str(agent, &format!("bound {target_name}"))
    } else {
        match name {
            Some(name) => name,
            None => String::from_str(agent, ""),
        }
    };
    let names = agent.predefined();
    add_own_property(
        agent,
        o,
        PropertyKey::String(names.length),
        PropertyFlags::CONFIGURABLE,
        PropertyValue::Data(Value::from(length)),
    );
    add_own_property(
        agent,
        o,
        PropertyKey::String(names.name),
        PropertyFlags::CONFIGURABLE,
        PropertyValue::Data(Value::String(name)),
    );
}

/// Attributes of an element in indexed storage.
pub(crate) fn indexed_element_flags(flags: ObjectFlags) -> PropertyFlags {
    PropertyFlags::default_new_property()
        .with(PropertyFlags::INDEXED, true)
        .with(
            PropertyFlags::CONFIGURABLE,
            !flags.contains(ObjectFlags::SEALED),
        )
        .with(PropertyFlags::WRITABLE, !flags.contains(ObjectFlags::FROZEN))
}

/// Attributes reported for a host provided property.
pub(crate) fn host_property_flags() -> PropertyFlags {
    PropertyFlags::HOST_OBJECT | PropertyFlags::WRITABLE | PropertyFlags::ENUMERABLE
}

/// Find an own property without materializing lazy properties.
pub(crate) fn peek_own_property(agent: &Agent, o: Object, key: PropertyKey) -> Option<OwnProperty> {
    let data = &agent[o];
    if let PropertyKey::Integer(index) = key
        && data.flags.contains(ObjectFlags::INDEXED_STORAGE)
    {
        if data.indexed.as_ref().is_some_and(|indexed| indexed.has(index)) {
            return Some(OwnProperty {
                location: PropertyLocation::Indexed(index),
                flags: indexed_element_flags(data.flags),
            });
        }
        if !data.shape.has_index_like_properties(agent) {
            return None;
        }
    }
    if let Some(property) = data.shape.get_property(agent, key) {
        return Some(OwnProperty {
            location: PropertyLocation::Named(property.slot),
            flags: property.flags,
        });
    }
    if data.flags.contains(ObjectFlags::HOST_OBJECT) {
        return Some(OwnProperty {
            location: PropertyLocation::Host,
            flags: host_property_flags(),
        });
    }
    None
}

pub(crate) fn find_own_property(
    agent: &mut Agent,
    o: Object,
    key: PropertyKey,
) -> Option<OwnProperty> {
    ensure_initialized(agent, o);
    peek_own_property(agent, o, key)
}

fn host_of(agent: &Agent, o: Object) -> Option<Rc<dyn HostObject>> {
    match &agent[o].kind {
        ObjectKind::Host(host) => Some(host.clone()),
        _ => None,
    }
}

fn host_get(agent: &mut Agent, o: Object, key: PropertyKey, gc: GcScope) -> JsResult<Value> {
    let Some(host) = host_of(agent, o) else {
        return Ok(Value::Undefined);
    };
    agent.with_native_call(gc, |agent, gc| host.get(agent, key, gc))
}

fn host_set(
    agent: &mut Agent,
    o: Object,
    key: PropertyKey,
    value: Value,
    gc: GcScope,
) -> JsResult<bool> {
    let Some(host) = host_of(agent, o) else {
        return Ok(false);
    };
    agent.with_native_call(gc, |agent, gc| host.set(agent, key, value, gc))
}

/// Read the value of an own property, invoking its getter with `receiver`
/// as the this value.
fn read_own_value(
    agent: &mut Agent,
    o: Object,
    key: PropertyKey,
    property: OwnProperty,
    receiver: Value,
    gc: GcScope,
) -> JsResult<Value> {
    match property.location {
        PropertyLocation::Named(slot) => match agent[o].storage.get(slot) {
            PropertyValue::Data(value) => Ok(value),
            PropertyValue::Accessor(accessor) => match accessor.getter(agent) {
                Some(getter) => call_function(agent, getter, receiver, None, gc),
                None => Ok(Value::Undefined),
            },
        },
        PropertyLocation::Indexed(index) => Ok(agent[o]
            .indexed
            .as_ref()
            .and_then(|indexed| indexed.get(index))
            .unwrap_or(Value::Undefined)),
        PropertyLocation::Host => host_get(agent, o, key, gc),
    }
}

/// Descriptor of a named or indexed own property.
fn stored_descriptor(agent: &Agent, o: Object, property: OwnProperty) -> PropertyDescriptor {
    let flags = property.flags;
    match property.location {
        PropertyLocation::Named(slot) => match agent[o].storage.get(slot) {
            PropertyValue::Data(value) => PropertyDescriptor::from_data_flags(value, flags),
            PropertyValue::Accessor(accessor) => PropertyDescriptor::from_accessor_flags(
                accessor.getter(agent),
                accessor.setter(agent),
                flags,
            ),
        },
        PropertyLocation::Indexed(index) => {
            let value = agent[o]
                .indexed
                .as_ref()
                .and_then(|indexed| indexed.get(index))
                .unwrap_or(Value::Undefined);
            PropertyDescriptor::from_data_flags(value, flags)
        }
        PropertyLocation::Host => {
            PropertyDescriptor::from_data_flags(Value::Undefined, flags)
        }
    }
}

/// ### [10.1.1.1 OrdinaryGetPrototypeOf ( O )](https://tc39.es/ecma262/#sec-ordinarygetprototypeof)
pub(crate) fn ordinary_get_prototype_of(agent: &Agent, o: Object) -> Option<Object> {
    // 1. Return O.[[Prototype]].
    agent[o].prototype
}

/// ### [10.1.2.1 OrdinarySetPrototypeOf ( O, V )](https://tc39.es/ecma262/#sec-ordinarysetprototypeof)
pub(crate) fn ordinary_set_prototype_of(
    agent: &mut Agent,
    o: Object,
    v: Option<Object>,
) -> bool {
    // 1. Let current be O.[[Prototype]].
    let current = agent[o].prototype;
    // 2. If SameValue(V, current) is true, return true.
    if v == current {
        return true;
    }
    // 3. Let extensible be O.[[Extensible]].
    // 4. If extensible is false, return false.
    if !agent[o].is_extensible() {
        return false;
    }
    // 5. Let p be V.
    let mut p = v;
    // 6. Let done be false.
    // 7. Repeat, while done is false,
    while let Some(object) = p {
        // b. Else if SameValue(p, O) is true, return false.
        if object == o {
            return false;
        }
        // c. Else,
        // i. If p is not an ordinary object, set done to true.
        if object.is_proxy(agent) {
            break;
        }
        // ii. Else, set p to p.[[Prototype]].
        p = agent[object].prototype;
    }
    // 8. Set O.[[Prototype]] to V.
    agent[o].prototype = v;
    // 9. Return true.
    true
}

/// ### [10.1.3.1 OrdinaryIsExtensible ( O )](https://tc39.es/ecma262/#sec-ordinaryisextensible)
pub(crate) fn ordinary_is_extensible(agent: &Agent, o: Object) -> bool {
    agent[o].is_extensible()
}

/// ### [10.1.4.1 OrdinaryPreventExtensions ( O )](https://tc39.es/ecma262/#sec-ordinarypreventextensions)
pub(crate) fn ordinary_prevent_extensions(agent: &mut Agent, o: Object) -> bool {
    agent[o].set_extensible(false);
    true
}

/// ### [10.1.5.1 OrdinaryGetOwnProperty ( O, P )](https://tc39.es/ecma262/#sec-ordinarygetownproperty)
pub(crate) fn ordinary_get_own_property(
    agent: &mut Agent,
    o: Object,
    key: PropertyKey,
    gc: GcScope,
) -> JsResult<Option<PropertyDescriptor>> {
    // 1. If O does not have an own property with key P, return undefined.
    let Some(property) = find_own_property(agent, o, key) else {
        return Ok(None);
    };
    if property.location == PropertyLocation::Host {
        let value = host_get(agent, o, key, gc)?;
        return Ok(Some(PropertyDescriptor::from_data_flags(
            value,
            property.flags,
        )));
    }
    // 2-9. Build the descriptor from the stored attributes.
    Ok(Some(stored_descriptor(agent, o, property)))
}

/// Shared part of ValidateAndApplyPropertyDescriptor and
/// IsCompatiblePropertyDescriptor: whether `desc` may be applied over
/// `current`.
///
/// ### [10.1.6.2 IsCompatiblePropertyDescriptor ( Extensible, Desc, Current )](https://tc39.es/ecma262/#sec-iscompatiblepropertydescriptor)
pub(crate) fn is_compatible_property_descriptor(
    extensible: bool,
    desc: &PropertyDescriptor,
    current: Option<&PropertyDescriptor>,
) -> bool {
    // 2. If current is undefined, then
    let Some(current) = current else {
        // a. If extensible is false, return false.
        return extensible;
    };
    // 4. If Desc does not have any fields, return true.
    if !desc.has_fields() {
        return true;
    }
    // 5. If current.[[Configurable]] is false, then
    if current.configurable == Some(false) {
        // a. If Desc has a [[Configurable]] field and Desc.[[Configurable]] is true, return false.
        if desc.configurable == Some(true) {
            return false;
        }
        // b. If Desc has an [[Enumerable]] field and Desc.[[Enumerable]] is not current.[[Enumerable]], return false.
        if desc.enumerable.is_some() && desc.enumerable != current.enumerable {
            return false;
        }
        // c. If IsGenericDescriptor(Desc) is false and IsAccessorDescriptor(Desc) is not IsAccessorDescriptor(current), return false.
        if !desc.is_generic_descriptor()
            && desc.is_accessor_descriptor() != current.is_accessor_descriptor()
        {
            return false;
        }
        // d. If IsAccessorDescriptor(current) is true, then
        if current.is_accessor_descriptor() {
            // i. If Desc has a [[Get]] field and SameValue(Desc.[[Get]], current.[[Get]]) is false, return false.
            if desc.get.is_some() && desc.get != current.get {
                return false;
            }
            // ii. If Desc has a [[Set]] field and SameValue(Desc.[[Set]], current.[[Set]]) is false, return false.
            if desc.set.is_some() && desc.set != current.set {
                return false;
            }
        } else if current.writable == Some(false) {
            // e. Else if current.[[Writable]] is false, then
            // i. If Desc has a [[Writable]] field and Desc.[[Writable]] is true, return false.
            if desc.writable == Some(true) {
                return false;
            }
            // ii. If Desc has a [[Value]] field and SameValue(Desc.[[Value]], current.[[Value]]) is false, return false.
            if let Some(value) = desc.value
                && !same_value(value, current.value.unwrap_or(Value::Undefined))
            {
                return false;
            }
        }
    }
    true
}

/// ### [10.1.6.1 OrdinaryDefineOwnProperty ( O, P, Desc )](https://tc39.es/ecma262/#sec-ordinarydefineownproperty)
pub(crate) fn ordinary_define_own_property(
    agent: &mut Agent,
    o: Object,
    key: PropertyKey,
    desc: PropertyDescriptor,
    gc: GcScope,
) -> JsResult<bool> {
    ensure_initialized(agent, o);
    if o.is_array_exotic(agent) && key == PropertyKey::String(agent.predefined().length) {
        return array_define_length(agent, Array::from_object_unchecked(o), desc, gc);
    }
    // 1. Let current be ? O.[[GetOwnProperty]](P).
    let Some(property) = peek_own_property(agent, o, key) else {
        // 2. Let extensible be ? IsExtensible(O).
        // ValidateAndApplyPropertyDescriptor 2.a. If extensible is false, return false.
        if !agent[o].is_extensible() {
            return Ok(false);
        }
        return define_new_own_property(agent, o, key, desc, gc.into_nogc());
    };
    if property.location == PropertyLocation::Host {
        return host_define_own_property(agent, o, key, desc, gc);
    }
    let current = stored_descriptor(agent, o, property);
    // 3. Return ValidateAndApplyPropertyDescriptor(O, P, extensible, Desc, current).
    if !is_compatible_property_descriptor(true, &desc, Some(&current)) {
        return Ok(false);
    }
    if !desc.has_fields() {
        return Ok(true);
    }
    apply_property_update(agent, o, key, property, &current, &desc);
    Ok(true)
}

/// Whether a data property with `flags` can live in the indexed storage of
/// `o`.
fn can_be_indexed(agent: &Agent, o: Object, flags: PropertyFlags) -> bool {
    let object_flags = agent[o].flags;
    object_flags.contains(ObjectFlags::INDEXED_STORAGE)
        && flags | PropertyFlags::INDEXED == indexed_element_flags(object_flags)
}

/// Store an element, falling back to a named property when the index is out
/// of reach of the materialized indexed range.
pub(crate) fn set_own_indexed(
    agent: &mut Agent,
    o: Object,
    index: u32,
    value: Value,
    gc: NoGcScope,
) -> JsResult<()> {
    let data = &mut agent[o];
    let result = match data.indexed.as_mut() {
        Some(indexed) => indexed.set(index, value),
        None => {
            data.indexed = Some(IndexedStorage::with_element(index, value));
            IndexedSet::Stored
        }
    };
    match result {
        IndexedSet::Stored => Ok(()),
        IndexedSet::OutOfReach => {
            log::debug!("Index {index} is out of reach of indexed storage, storing as named");
            add_own_property(
                agent,
                o,
                PropertyKey::Integer(index),
                PropertyFlags::default_new_property(),
                PropertyValue::Data(value),
            );
            Ok(())
        }
        IndexedSet::TooLarge => Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Out of memory for array elements",
            gc,
        )),
    }
}

fn define_new_own_property(
    agent: &mut Agent,
    o: Object,
    key: PropertyKey,
    desc: PropertyDescriptor,
    gc: NoGcScope,
) -> JsResult<bool> {
    let index = key.as_array_index();
    let array = o.is_array_exotic(agent).then(|| Array::from_object_unchecked(o));
    let mut old_length = None;
    if let (Some(array), Some(index)) = (array, index) {
        // 10.4.2.1 [[DefineOwnProperty]] 1.b-h: indices past a read-only
        // length cannot be added.
        let length = array_length(agent, array);
        if index >= length {
            if !array_length_writable(agent, array) {
                return Ok(false);
            }
            old_length = Some(length);
        }
    }
    let flags = desc.to_flags();
    if desc.is_accessor_descriptor() {
        let accessor = Accessor::create(agent, desc.get.flatten(), desc.set.flatten());
        add_own_property(agent, o, key, flags, PropertyValue::Accessor(accessor));
    } else {
        let value = desc.value.unwrap_or(Value::Undefined);
        match index {
            Some(index) if can_be_indexed(agent, o, flags) => {
                set_own_indexed(agent, o, index, value, gc)?
            }
            _ => add_own_property(agent, o, key, flags, PropertyValue::Data(value)),
        }
    }
    if let (Some(array), Some(index), Some(_)) = (array, index, old_length) {
        write_array_length(agent, array, index + 1);
    }
    Ok(true)
}

/// ValidateAndApplyPropertyDescriptor step 6: overwrite the attributes of
/// an existing property. The update has been validated already.
fn apply_property_update(
    agent: &mut Agent,
    o: Object,
    key: PropertyKey,
    property: OwnProperty,
    current: &PropertyDescriptor,
    desc: &PropertyDescriptor,
) {
    let configurable = desc.configurable.or(current.configurable) == Some(true);
    let enumerable = desc.enumerable.or(current.enumerable) == Some(true);
    let becomes_accessor = if current.is_accessor_descriptor() {
        !desc.is_data_descriptor()
    } else {
        desc.is_accessor_descriptor()
    };
    let base = PropertyFlags::empty()
        .with(PropertyFlags::CONFIGURABLE, configurable)
        .with(PropertyFlags::ENUMERABLE, enumerable);
    let (flags, value) = if becomes_accessor {
        let (getter, setter) = if current.is_accessor_descriptor() {
            (
                desc.get.unwrap_or(current.get.flatten()),
                desc.set.unwrap_or(current.set.flatten()),
            )
        } else {
            (desc.get.flatten(), desc.set.flatten())
        };
        let reused = match property.location {
            PropertyLocation::Named(slot) => match agent[o].storage.get(slot) {
                PropertyValue::Accessor(accessor)
                    if accessor.getter(agent) == getter && accessor.setter(agent) == setter =>
                {
                    Some(accessor)
                }
                _ => None,
            },
            _ => None,
        };
        let accessor = reused.unwrap_or_else(|| Accessor::create(agent, getter, setter));
        (
            base.with(PropertyFlags::ACCESSOR, true),
            PropertyValue::Accessor(accessor),
        )
    } else {
        let (value, writable) = if current.is_accessor_descriptor() {
            (
                desc.value.unwrap_or(Value::Undefined),
                desc.writable == Some(true),
            )
        } else {
            (
                desc.value.or(current.value).unwrap_or(Value::Undefined),
                desc.writable.or(current.writable) == Some(true),
            )
        };
        (
            base.with(PropertyFlags::WRITABLE, writable),
            PropertyValue::Data(value),
        )
    };

    match property.location {
        PropertyLocation::Indexed(index) => {
            if let PropertyValue::Data(value) = value
                && can_be_indexed(agent, o, flags)
            {
                if let Some(indexed) = agent[o].indexed.as_mut() {
                    indexed.set(index, value);
                }
                return;
            }
            log::debug!("Converting element {index} to a named property with {flags:?}");
            if let Some(indexed) = agent[o].indexed.as_mut() {
                indexed.delete(index);
            }
            add_own_property(agent, o, key, flags, value);
        }
        PropertyLocation::Named(slot) => {
            if let (PropertyKey::Integer(index), PropertyValue::Data(data)) = (key, value)
                && can_be_indexed(agent, o, flags)
                && agent[o]
                    .indexed
                    .as_mut()
                    .is_some_and(|indexed| indexed.set(index, data) == IndexedSet::Stored)
            {
                remove_named_property(agent, o, key, slot);
                return;
            }
            let flags = flags.with(
                PropertyFlags::INTERNAL_SETTER,
                property.flags.internal_setter(),
            );
            if flags != property.flags {
                let shape = agent[o].shape.update_flags(agent, key, flags);
                agent[o].shape = shape;
            }
            agent[o].storage.set(slot, value);
        }
        PropertyLocation::Host => {}
    }
}

/// Host properties are writable, enumerable and non-configurable data
/// properties; redefining one with a value writes through the host.
fn host_define_own_property(
    agent: &mut Agent,
    o: Object,
    key: PropertyKey,
    desc: PropertyDescriptor,
    gc: GcScope,
) -> JsResult<bool> {
    if desc.is_accessor_descriptor()
        || desc.configurable == Some(true)
        || desc.enumerable == Some(false)
        || desc.writable == Some(false)
    {
        return Ok(false);
    }
    match desc.value {
        Some(value) => host_set(agent, o, key, value, gc),
        None => Ok(true),
    }
}

/// ### [10.1.7.1 OrdinaryHasProperty ( O, P )](https://tc39.es/ecma262/#sec-ordinaryhasproperty)
pub(crate) fn ordinary_has_property(
    agent: &mut Agent,
    o: Object,
    key: PropertyKey,
    gc: GcScope,
) -> JsResult<bool> {
    // 1. Let hasOwn be ? O.[[GetOwnProperty]](P).
    // 2. If hasOwn is not undefined, return true.
    if find_own_property(agent, o, key).is_some() {
        return Ok(true);
    }
    // 3. Let parent be ? O.[[GetPrototypeOf]]().
    // 4. If parent is not null, then
    if let Some(parent) = agent[o].prototype {
        // a. Return ? parent.[[HasProperty]](P).
        return parent.internal_has_property(agent, key, gc);
    }
    // 5. Return false.
    Ok(false)
}

/// ### [10.1.8.1 OrdinaryGet ( O, P, Receiver )](https://tc39.es/ecma262/#sec-ordinaryget)
pub(crate) fn ordinary_get(
    agent: &mut Agent,
    o: Object,
    key: PropertyKey,
    receiver: Value,
    gc: GcScope,
) -> JsResult<Value> {
    // 1. Let desc be ? O.[[GetOwnProperty]](P).
    let Some(property) = find_own_property(agent, o, key) else {
        // 2. If desc is undefined, then
        // a. Let parent be ? O.[[GetPrototypeOf]]().
        // b. If parent is null, return undefined.
        // c. Return ? parent.[[Get]](P, Receiver).
        return match agent[o].prototype {
            Some(parent) => parent.internal_get(agent, key, receiver, gc),
            None => Ok(Value::Undefined),
        };
    };
    // 3. If IsDataDescriptor(desc) is true, return desc.[[Value]].
    // 4-7. Return ? Call(getter, Receiver).
    read_own_value(agent, o, key, property, receiver, gc)
}

/// ### [10.1.9.1 OrdinarySet ( O, P, V, Receiver )](https://tc39.es/ecma262/#sec-ordinaryset)
pub(crate) fn ordinary_set(
    agent: &mut Agent,
    o: Object,
    key: PropertyKey,
    value: Value,
    receiver: Value,
    gc: GcScope,
) -> JsResult<bool> {
    // 1. Let ownDesc be ? O.[[GetOwnProperty]](P).
    let Some(property) = find_own_property(agent, o, key) else {
        // OrdinarySetWithOwnDescriptor 2. If ownDesc is undefined, then
        // a. Let parent be ? O.[[GetPrototypeOf]]().
        // b. If parent is not null, then
        if let Some(parent) = agent[o].prototype {
            // i. Return ? parent.[[Set]](P, V, Receiver).
            return parent.internal_set(agent, key, value, receiver, gc);
        }
        // c. Else,
        // i. Set ownDesc to the PropertyDescriptor { [[Value]]: undefined, [[Writable]]: true, [[Enumerable]]: true, [[Configurable]]: true }.
        return set_on_receiver(agent, key, value, receiver, gc);
    };
    // 2. Return ? OrdinarySetWithOwnDescriptor(O, P, V, Receiver, ownDesc).
    ordinary_set_with_own_property(agent, o, key, value, receiver, property, gc)
}

/// ### [10.1.9.2 OrdinarySetWithOwnDescriptor ( O, P, V, Receiver, ownDesc )](https://tc39.es/ecma262/#sec-ordinarysetwithowndescriptor)
fn ordinary_set_with_own_property(
    agent: &mut Agent,
    o: Object,
    key: PropertyKey,
    value: Value,
    receiver: Value,
    property: OwnProperty,
    gc: GcScope,
) -> JsResult<bool> {
    // 4. Assert: IsAccessorDescriptor(ownDesc) is true.
    if property.flags.accessor() {
        let PropertyLocation::Named(slot) = property.location else {
            return Ok(false);
        };
        let PropertyValue::Accessor(accessor) = agent[o].storage.get(slot) else {
            return Ok(false);
        };
        // 5. Let setter be ownDesc.[[Set]].
        // 6. If setter is undefined, return false.
        let Some(setter) = accessor.setter(agent) else {
            return Ok(false);
        };
        // 7. Perform ? Call(setter, Receiver, « V »).
        call_function(
            agent,
            setter,
            receiver,
            Some(ArgumentsList::new(&[value])),
            gc,
        )?;
        // 8. Return true.
        return Ok(true);
    }
    // 2. If IsDataDescriptor(ownDesc) is true, then
    // a. If ownDesc.[[Writable]] is false, return false.
    if !property.flags.writable() {
        return Ok(false);
    }
    if receiver == Value::Object(o) {
        // The receiver owns a writable data property: write it in place.
        return match property.location {
            PropertyLocation::Named(slot) => {
                if property.flags.internal_setter() {
                    return array_set_length_from_value(
                        agent,
                        Array::from_object_unchecked(o),
                        value,
                        gc,
                    );
                }
                agent[o].storage.set(slot, PropertyValue::Data(value));
                Ok(true)
            }
            PropertyLocation::Indexed(index) => {
                if let Some(indexed) = agent[o].indexed.as_mut() {
                    indexed.set(index, value);
                }
                Ok(true)
            }
            PropertyLocation::Host => host_set(agent, o, key, value, gc),
        };
    }
    set_on_receiver(agent, key, value, receiver, gc)
}

/// OrdinarySetWithOwnDescriptor steps 2.b-e: create or update the property
/// on a receiver different from the holder.
fn set_on_receiver(
    agent: &mut Agent,
    key: PropertyKey,
    value: Value,
    receiver: Value,
    mut gc: GcScope,
) -> JsResult<bool> {
    // b. If Receiver is not an Object, return false.
    let Value::Object(receiver) = receiver else {
        return Ok(false);
    };
    // c. Let existingDescriptor be ? Receiver.[[GetOwnProperty]](P).
    let existing = receiver.internal_get_own_property(agent, key, gc.reborrow())?;
    // d. If existingDescriptor is not undefined, then
    if let Some(existing) = existing {
        // i. If IsAccessorDescriptor(existingDescriptor) is true, return false.
        if existing.is_accessor_descriptor() {
            return Ok(false);
        }
        // ii. If existingDescriptor.[[Writable]] is false, return false.
        if existing.writable == Some(false) {
            return Ok(false);
        }
        // iii. Let valueDesc be the PropertyDescriptor { [[Value]]: V }.
        let value_desc = PropertyDescriptor {
            value: Some(value),
            ..Default::default()
        };
        // iv. Return ? Receiver.[[DefineOwnProperty]](P, valueDesc).
        return receiver.internal_define_own_property(agent, key, value_desc, gc);
    }
    // e. Else,
    // i. Assert: Receiver does not currently have a property P.
    // ii. Return ? CreateDataProperty(Receiver, P, V).
    create_data_property(agent, receiver, key, value, gc)
}

/// ### [10.1.10.1 OrdinaryDelete ( O, P )](https://tc39.es/ecma262/#sec-ordinarydelete)
pub(crate) fn ordinary_delete(agent: &mut Agent, o: Object, key: PropertyKey) -> bool {
    // 1. Let desc be ? O.[[GetOwnProperty]](P).
    // 2. If desc is undefined, return true.
    let Some(property) = find_own_property(agent, o, key) else {
        return true;
    };
    // 3. If desc.[[Configurable]] is true, then
    if !property.flags.configurable() {
        // 4. Return false.
        return false;
    }
    // a. Remove the own property with name P from O.
    match property.location {
        PropertyLocation::Named(slot) => remove_named_property(agent, o, key, slot),
        PropertyLocation::Indexed(index) => {
            if let Some(indexed) = agent[o].indexed.as_mut() {
                indexed.delete(index);
            }
        }
        PropertyLocation::Host => return false,
    }
    // b. Return true.
    true
}

/// ### [10.1.11.1 OrdinaryOwnPropertyKeys ( O )](https://tc39.es/ecma262/#sec-ordinaryownpropertykeys)
///
/// Array indices of indexed elements, index-like named properties and host
/// keys are merged into one ascending run, followed by string keys and then
/// symbol keys in insertion order.
pub(crate) fn ordinary_own_property_keys(
    agent: &mut Agent,
    o: Object,
    flags: OwnKeysFlags,
    gc: GcScope,
) -> JsResult<Vec<PropertyKey>> {
    ensure_initialized(agent, o);
    let mut indices: Vec<u32> = Vec::new();
    let mut strings: Vec<PropertyKey> = Vec::new();
    let mut symbols: Vec<PropertyKey> = Vec::new();
    let data = &agent[o];
    if flags.include_non_symbols
        && let Some(indexed) = data.indexed.as_ref()
    {
        indices.extend(indexed.present_indices());
    }
    data.shape.for_each_property(agent, |property| {
        if !flags.include_non_enumerable && !property.flags.enumerable() {
            return;
        }
        match property.key {
            PropertyKey::Integer(index) if flags.include_non_symbols => indices.push(index),
            PropertyKey::String(_) if flags.include_non_symbols => strings.push(property.key),
            PropertyKey::Symbol(_) if flags.include_symbols => symbols.push(property.key),
            _ => {}
        }
    });
    if let Some(host) = host_of(agent, o) {
        let host_keys = agent.with_native_call(gc, |agent, gc| host.own_keys(agent, gc))?;
        for key in host_keys {
            match key {
                PropertyKey::Integer(index) if flags.include_non_symbols => {
                    if !indices.contains(&index) {
                        indices.push(index);
                    }
                }
                PropertyKey::String(_) if flags.include_non_symbols => {
                    if !strings.contains(&key) {
                        strings.push(key);
                    }
                }
                PropertyKey::Symbol(_) if flags.include_symbols => {
                    if !symbols.contains(&key) {
                        symbols.push(key);
                    }
                }
                _ => {}
            }
        }
    }
    indices.sort_unstable();
    indices.dedup();
    let mut keys = Vec::with_capacity(indices.len() + strings.len() + symbols.len());
    keys.extend(indices.into_iter().map(PropertyKey::Integer));
    keys.extend(strings);
    keys.extend(symbols);
    Ok(keys)
}

/// Make the object non-extensible and every own property non-configurable.
pub(crate) fn ordinary_seal(agent: &mut Agent, o: Object) {
    ensure_initialized(agent, o);
    let shape = agent[o].shape.make_all_non_configurable(agent);
    let data = &mut agent[o];
    data.shape = shape;
    data.set_extensible(false);
    data.flags |= ObjectFlags::SEALED;
}

/// Seal the object and make every own data property read-only.
pub(crate) fn ordinary_freeze(agent: &mut Agent, o: Object) {
    ensure_initialized(agent, o);
    let shape = agent[o].shape.make_all_read_only(agent);
    let data = &mut agent[o];
    data.shape = shape;
    data.set_extensible(false);
    data.flags |= ObjectFlags::SEALED | ObjectFlags::FROZEN;
}

fn has_indexed_elements(data: &ObjectHeapData) -> bool {
    data.indexed
        .as_ref()
        .is_some_and(|indexed| indexed.present_indices().next().is_some())
}

/// Whether the object is sealed. A positive answer is cached on the object.
pub(crate) fn ordinary_is_sealed(agent: &mut Agent, o: Object) -> bool {
    if o.is_sealed_flag(agent) {
        return true;
    }
    ensure_initialized(agent, o);
    let data = &agent[o];
    if data.is_extensible() || has_indexed_elements(data) {
        return false;
    }
    if !data.shape.are_all_non_configurable(agent) {
        return false;
    }
    agent[o].flags |= ObjectFlags::SEALED;
    true
}

/// Whether the object is frozen. A positive answer is cached on the object.
pub(crate) fn ordinary_is_frozen(agent: &mut Agent, o: Object) -> bool {
    if o.is_frozen_flag(agent) {
        return true;
    }
    ensure_initialized(agent, o);
    let data = &agent[o];
    // Host provided properties are always writable.
    if data.is_extensible() || has_indexed_elements(data) || o.is_host_object(agent) {
        return false;
    }
    if !data.shape.are_all_read_only(agent) {
        return false;
    }
    agent[o].flags |= ObjectFlags::SEALED | ObjectFlags::FROZEN;
    true
}
