// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### 10.4.2 Array Exotic Objects
//!
//! https://tc39.es/ecma262/#sec-array-exotic-objects
//!
//! The `length` of an array is its first named property, stored in slot
//! [`LENGTH_SLOT`] and flagged with an internal setter so that writes to it
//! go through [`array_set_length`].

use crate::{
    ecmascript::{
        abstract_operations::type_conversion::{to_number, to_uint32_number},
        builtins::ordinary::{
            add_own_property, is_compatible_property_descriptor, object_create_with_kind,
            ordinary_delete,
        },
        execution::{Agent, ExceptionType, JsResult},
        types::{
            IndexedStorage, Object, ObjectFlags, ObjectKind, PropOpFlags, PropertyDescriptor,
            PropertyFlags, PropertyKey, PropertyValue, Value,
        },
    },
    engine::context::{GcScope, NoGcScope},
};

/// Property storage slot of an array's `length`.
pub(crate) const LENGTH_SLOT: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Array(Object);

impl Array {
    /// The caller guarantees that `object` is an Array exotic object.
    pub(crate) fn from_object_unchecked(object: Object) -> Self {
        Self(object)
    }

    pub fn into_object(self) -> Object {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn len(self, agent: &Agent) -> u32 {
        array_length(agent, self)
    }

    pub fn is_empty(self, agent: &Agent) -> bool {
        self.len(agent) == 0
    }

    /// Set the length, deleting elements past it. If some element cannot be
    /// deleted the length stops just above it and the operation fails.
    pub fn set_length(
        self,
        agent: &mut Agent,
        new_length: u32,
        flags: PropOpFlags,
        gc: NoGcScope,
    ) -> JsResult<bool> {
        if !array_length_writable(agent, self) {
            return fail(
                agent,
                flags,
                "Cannot assign to read-only property 'length'".to_string(),
                gc,
            );
        }
        if array_set_length(agent, self, new_length) {
            return Ok(true);
        }
        let blocking = self.len(agent).saturating_sub(1);
        fail(
            agent,
            flags,
            format!("Cannot delete property '{blocking}'"),
            gc,
        )
    }

    /// Set the length from a language value. Values that are not valid
    /// array lengths raise a RangeError.
    pub fn set_length_from_value(
        self,
        agent: &mut Agent,
        value: Value,
        flags: PropOpFlags,
        mut gc: GcScope,
    ) -> JsResult<bool> {
        let new_length = to_array_length(agent, value, gc.reborrow())?;
        self.set_length(agent, new_length, flags, gc.nogc())
    }
}

impl From<Array> for Object {
    fn from(value: Array) -> Self {
        value.0
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Object(value.0)
    }
}

fn fail(
    agent: &mut Agent,
    flags: PropOpFlags,
    message: std::string::String,
    gc: NoGcScope,
) -> JsResult<bool> {
    if flags.throw_on_error {
        Err(agent.throw_exception(ExceptionType::TypeError, &message, gc))
    } else {
        Ok(false)
    }
}

/// Create an array with the given length and prototype, without elements.
pub fn array_create_with_prototype(
    agent: &mut Agent,
    length: u32,
    prototype: Option<Object>,
) -> Array {
    let object = object_create_with_kind(agent, prototype, ObjectKind::Array);
    let key = PropertyKey::String(agent.predefined().length);
    add_own_property(
        agent,
        object,
        key,
        PropertyFlags::WRITABLE | PropertyFlags::INTERNAL_SETTER,
        PropertyValue::Data(Value::from(length)),
    );
    Array(object)
}

/// ### [10.4.2.2 ArrayCreate ( length \[ , proto \] )](https://tc39.es/ecma262/#sec-arraycreate)
pub fn array_create(
    agent: &mut Agent,
    length: u64,
    proto: Option<Object>,
    gc: NoGcScope,
) -> JsResult<Array> {
    // 1. If length > 2**32 - 1, throw a RangeError exception.
    let Ok(length) = u32::try_from(length) else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Invalid array length",
            gc,
        ));
    };
    // 2. If proto is not present, set proto to %Array.prototype%.
    let proto = match proto {
        Some(proto) => proto,
        None => agent.intrinsics().array_prototype,
    };
    // 3. Let A be MakeBasicObject(« [[Prototype]], [[Extensible]] »).
    // 4. Set A.[[Prototype]] to proto.
    // 5. Set A.[[DefineOwnProperty]] as specified in 10.4.2.1.
    // 6. Perform ! OrdinaryDefineOwnProperty(A, "length", PropertyDescriptor { [[Value]]: 𝔽(length), [[Writable]]: true, [[Enumerable]]: false, [[Configurable]]: false }).
    // 7. Return A.
    Ok(array_create_with_prototype(agent, length, Some(proto)))
}

/// ### [7.3.18 CreateArrayFromList ( elements )](https://tc39.es/ecma262/#sec-createarrayfromlist)
pub fn create_array_from_list(agent: &mut Agent, elements: &[Value]) -> Array {
    let prototype = agent.intrinsics().array_prototype;
    // Lists reaching the object model come from argument lists and
    // CreateListFromArrayLike, which stops at 2^32 - 1 elements.
    debug_assert!(u32::try_from(elements.len()).is_ok());
    let array = array_create_with_prototype(agent, elements.len() as u32, Some(prototype));
    if !elements.is_empty() {
        agent[array.0].indexed = Some(IndexedStorage::from_values(elements));
    }
    array
}

pub(crate) fn array_length(agent: &Agent, array: Array) -> u32 {
    match agent[array.0].storage.get(LENGTH_SLOT) {
        // Only written by `write_array_length` and
        // `array_create_with_prototype`: always an integer in u32 range.
        PropertyValue::Data(Value::Number(length)) => length as u32,
        _ => 0,
    }
}

pub(crate) fn write_array_length(agent: &mut Agent, array: Array, length: u32) {
    agent[array.0]
        .storage
        .set(LENGTH_SLOT, PropertyValue::Data(Value::from(length)));
}

fn length_flags(agent: &mut Agent, array: Array) -> PropertyFlags {
    let key = PropertyKey::String(agent.predefined().length);
    agent[array.0]
        .shape
        .get_property(agent, key)
        .map_or(PropertyFlags::empty(), |property| property.flags)
}

pub(crate) fn array_length_writable(agent: &mut Agent, array: Array) -> bool {
    length_flags(agent, array).writable()
}

fn make_length_read_only(agent: &mut Agent, array: Array) {
    let flags = length_flags(agent, array);
    if !flags.writable() {
        return;
    }
    let key = PropertyKey::String(agent.predefined().length);
    let shape = agent[array.0].shape.update_flags(
        agent,
        key,
        flags.with(PropertyFlags::WRITABLE, false),
    );
    agent[array.0].shape = shape;
}

/// Convert a language value into an array length, raising a RangeError if
/// it is not an integral Number in the u32 range.
pub(crate) fn to_array_length(agent: &mut Agent, value: Value, mut gc: GcScope) -> JsResult<u32> {
    // 3. Let newLen be ? ToUint32(Desc.[[Value]]).
    // 4. Let numberLen be ? ToNumber(Desc.[[Value]]).
    let number = to_number(agent, value, gc.reborrow())?;
    let length = to_uint32_number(number);
    // 5. If SameValueZero(newLen, numberLen) is false, throw a RangeError exception.
    if f64::from(length) != number {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Invalid array length",
            gc.nogc(),
        ));
    }
    Ok(length)
}

/// Change the length of an array whose `length` is writable.
///
/// Growing only updates the length. Shrinking deletes elements from the
/// highest index down and stops at the first element that cannot be
/// deleted; the length is left just above it. Returns whether the requested
/// length was reached.
pub(crate) fn array_set_length(agent: &mut Agent, array: Array, new_length: u32) -> bool {
    let o = array.0;
    let current = array_length(agent, array);
    if new_length >= current {
        write_array_length(agent, array, new_length);
        return true;
    }
    let mut adjusted = new_length;
    // Elements of a sealed object cannot be deleted.
    if agent[o].flags.contains(ObjectFlags::SEALED)
        && let Some(last) = agent[o]
            .indexed
            .as_ref()
            .and_then(|indexed| indexed.last_present_in(new_length, current))
    {
        adjusted = last + 1;
    }
    let shape = agent[o].shape;
    if shape.has_index_like_properties(agent) {
        let mut named = Vec::new();
        shape.for_each_property(agent, |property| {
            if let PropertyKey::Integer(index) = property.key
                && index >= adjusted
            {
                named.push((index, property.flags));
            }
        });
        named.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        for (index, flags) in named {
            if !flags.configurable() {
                adjusted = index + 1;
                break;
            }
            ordinary_delete(agent, o, PropertyKey::Integer(index));
        }
    }
    let data = &mut agent[o];
    if let Some(indexed) = data.indexed.as_mut()
        && indexed.end_index() > adjusted
    {
        log::trace!(
            "Truncating indexed storage from {} to {adjusted}",
            indexed.end_index()
        );
        if !indexed.set_end_index(adjusted) {
            data.indexed = None;
        }
    }
    write_array_length(agent, array, adjusted);
    adjusted == new_length
}

/// `[[Set]]` of a writable `length` with the array as receiver.
pub(crate) fn array_set_length_from_value(
    agent: &mut Agent,
    array: Array,
    value: Value,
    mut gc: GcScope,
) -> JsResult<bool> {
    let new_length = to_array_length(agent, value, gc.reborrow())?;
    // The conversion may have run code that froze the array.
    if !array_length_writable(agent, array) {
        return Ok(false);
    }
    Ok(array_set_length(agent, array, new_length))
}

/// ### [10.4.2.4 ArraySetLength ( A, Desc )](https://tc39.es/ecma262/#sec-arraysetlength)
pub(crate) fn array_define_length(
    agent: &mut Agent,
    array: Array,
    desc: PropertyDescriptor,
    mut gc: GcScope,
) -> JsResult<bool> {
    // 1. If Desc does not have a [[Value]] field, then
    //    a. Return ! OrdinaryDefineOwnProperty(A, "length", Desc).
    // 2. Let newLenDesc be a copy of Desc.
    // 3-5. Convert the new length.
    let new_length = match desc.value {
        Some(value) => Some(to_array_length(agent, value, gc.reborrow())?),
        None => None,
    };
    // 7. Let oldLenDesc be OrdinaryGetOwnProperty(A, "length").
    let flags = length_flags(agent, array);
    let old_length = array_length(agent, array);
    let current = PropertyDescriptor::from_data_flags(Value::from(old_length), flags);
    let mut new_length_desc = desc;
    new_length_desc.value = new_length.map(Value::from);
    if !is_compatible_property_descriptor(true, &new_length_desc, Some(&current)) {
        return Ok(false);
    }
    let Some(new_length) = new_length else {
        if desc.writable == Some(false) {
            make_length_read_only(agent, array);
        }
        return Ok(true);
    };
    // 11. If newLen ≥ oldLen, then
    //     a. Return ! OrdinaryDefineOwnProperty(A, "length", newLenDesc).
    // 12. If oldLenDesc.[[Writable]] is false, return false.
    // 13-17. Delete elements from the highest index down.
    let succeeded = new_length == old_length || array_set_length(agent, array, new_length);
    // 18. If newWritable is false, then
    //     a. Set succeeded to ! OrdinaryDefineOwnProperty(A, "length", PropertyDescriptor { [[Writable]]: false }).
    if desc.writable == Some(false) {
        make_length_read_only(agent, array);
    }
    // 19. Return true.
    Ok(succeeded)
}
