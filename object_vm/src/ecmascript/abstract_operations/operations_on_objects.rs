// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [7.3 Operations on Objects](https://tc39.es/ecma262/#sec-operations-on-objects)

use super::{testing_and_comparison::is_callable, type_conversion::to_length};
use crate::{
    ecmascript::{
        builtins::{
            array::Array,
            ordinary::{ordinary_freeze, ordinary_is_frozen, ordinary_is_sealed, ordinary_seal},
        },
        execution::{Agent, ExceptionType, JsResult},
        types::{
            ArgumentsList, Function, InternalMethods, Object, ObjectKind, PropOpFlags,
            PropertyDescriptor, PropertyKey, Value,
        },
    },
    engine::context::GcScope,
};

/// ### [7.3.2 Get ( O, P )](https://tc39.es/ecma262/#sec-get-o-p)
///
/// The abstract operation Get takes arguments O (an Object) and P (a
/// property key) and returns either a normal completion containing an
/// ECMAScript language value or a throw completion. It is used to retrieve
/// the value of a specific property of an object.
pub fn get(agent: &mut Agent, o: Object, p: PropertyKey, gc: GcScope) -> JsResult<Value> {
    // 1. Return ? O.[[Get]](P, O).
    o.internal_get(agent, p, Value::Object(o), gc)
}

/// ### [7.3.3 GetV ( V, P )](https://tc39.es/ecma262/#sec-getv)
///
/// Primitives have no wrapper objects here: their properties are looked up
/// on %Object.prototype% with the primitive as the receiver.
pub fn get_v(agent: &mut Agent, v: Value, p: PropertyKey, gc: GcScope) -> JsResult<Value> {
    // 1. Let O be ? ToObject(V).
    let o = match v {
        Value::Object(o) => o,
        Value::Undefined | Value::Null => {
            let message = format!(
                "Cannot read properties of {} (reading '{}')",
                if v.is_undefined() { "undefined" } else { "null" },
                p.to_display(agent)
            );
            return Err(agent.throw_exception(ExceptionType::TypeError, &message, gc.nogc()));
        }
        _ => agent.intrinsics().object_prototype,
    };
    // 2. Return ? O.[[Get]](P, V).
    o.internal_get(agent, p, v, gc)
}

/// ### [7.3.4 Set ( O, P, V, Throw )](https://tc39.es/ecma262/#sec-set-o-p-v-throw)
///
/// The abstract operation Set takes arguments O (an Object), P (a property
/// key), V (an ECMAScript language value), and Throw (a Boolean) and returns
/// either a normal completion containing UNUSED or a throw completion. It is
/// used to set the value of a specific property of an object. V is the new
/// value for the property.
pub fn set(
    agent: &mut Agent,
    o: Object,
    p: PropertyKey,
    v: Value,
    throw: bool,
    gc: GcScope,
) -> JsResult<()> {
    // 1. Let success be ? O.[[Set]](P, V, O).
    // 2. If success is false and Throw is true, throw a TypeError exception.
    // 3. Return UNUSED.
    o.set_with_flags(agent, p, v, PropOpFlags::from_throw(throw), gc)
        .map(|_| ())
}

/// ### [7.3.5 CreateDataProperty ( O, P, V )](https://tc39.es/ecma262/#sec-createdataproperty)
///
/// The abstract operation CreateDataProperty takes arguments O (an Object),
/// P (a property key), and V (an ECMAScript language value) and returns
/// either a normal completion containing a Boolean or a throw completion. It
/// is used to create a new own property of an object.
///
/// > NOTE: This abstract operation creates a property whose attributes are
/// > set to the same defaults used for properties created by the ECMAScript
/// > language assignment operator. Normally, the property will not already
/// > exist. If it does exist and is not configurable or if O is not
/// > extensible, \[\[DefineOwnProperty]] will return false.
pub fn create_data_property(
    agent: &mut Agent,
    o: Object,
    p: PropertyKey,
    v: Value,
    gc: GcScope,
) -> JsResult<bool> {
    // 1. Let newDesc be the PropertyDescriptor { [[Value]]: V, [[Writable]]: true, [[Enumerable]]: true, [[Configurable]]: true }.
    let new_desc = PropertyDescriptor::new_data_descriptor(v);
    // 2. Return ? O.[[DefineOwnProperty]](P, newDesc).
    o.internal_define_own_property(agent, p, new_desc, gc)
}

/// ### [7.3.7 CreateDataPropertyOrThrow ( O, P, V )](https://tc39.es/ecma262/#sec-createdatapropertyorthrow)
pub fn create_data_property_or_throw(
    agent: &mut Agent,
    o: Object,
    p: PropertyKey,
    v: Value,
    gc: GcScope,
) -> JsResult<()> {
    // 1. Let success be ? CreateDataProperty(O, P, V).
    // 2. If success is false, throw a TypeError exception.
    // 3. Return UNUSED.
    o.define_own_property_with_flags(
        agent,
        p,
        PropertyDescriptor::new_data_descriptor(v),
        PropOpFlags::THROW_ON_ERROR,
        gc,
    )
    .map(|_| ())
}

/// ### [7.3.8 DefinePropertyOrThrow ( O, P, desc )](https://tc39.es/ecma262/#sec-definepropertyorthrow)
pub fn define_property_or_throw(
    agent: &mut Agent,
    o: Object,
    p: PropertyKey,
    desc: PropertyDescriptor,
    gc: GcScope,
) -> JsResult<()> {
    // 1. Let success be ? O.[[DefineOwnProperty]](P, desc).
    // 2. If success is false, throw a TypeError exception.
    // 3. Return UNUSED.
    o.define_own_property_with_flags(agent, p, desc, PropOpFlags::THROW_ON_ERROR, gc)
        .map(|_| ())
}

/// ### [7.3.9 DeletePropertyOrThrow ( O, P )](https://tc39.es/ecma262/#sec-deletepropertyorthrow)
pub fn delete_property_or_throw(
    agent: &mut Agent,
    o: Object,
    p: PropertyKey,
    gc: GcScope,
) -> JsResult<()> {
    // 1. Let success be ? O.[[Delete]](P).
    // 2. If success is false, throw a TypeError exception.
    // 3. Return UNUSED.
    o.delete_with_flags(agent, p, PropOpFlags::THROW_ON_ERROR, gc)
        .map(|_| ())
}

/// ### [7.3.11 GetMethod ( V, P )](https://tc39.es/ecma262/#sec-getmethod)
///
/// The abstract operation GetMethod takes arguments V (an ECMAScript
/// language value) and P (a property key) and returns either a normal
/// completion containing either a function object or undefined, or a throw
/// completion. It is used to get the value of a specific property of an
/// ECMAScript language value when the value of the property is expected to
/// be a function.
pub fn get_method(
    agent: &mut Agent,
    v: Value,
    p: PropertyKey,
    mut gc: GcScope,
) -> JsResult<Option<Function>> {
    // 1. Let func be ? GetV(V, P).
    let func = get_v(agent, v, p, gc.reborrow())?;
    // 2. If func is either undefined or null, return undefined.
    if func.is_nullish() {
        return Ok(None);
    }
    // 3. If IsCallable(func) is false, throw a TypeError exception.
    match is_callable(agent, func) {
        // 4. Return func.
        Some(func) => Ok(Some(func)),
        None => {
            let message = format!("Property '{}' is not a function", p.to_display(agent));
            Err(agent.throw_exception(ExceptionType::TypeError, &message, gc.nogc()))
        }
    }
}

/// ### [7.3.12 HasProperty ( O, P )](https://tc39.es/ecma262/#sec-hasproperty)
pub fn has_property(agent: &mut Agent, o: Object, p: PropertyKey, gc: GcScope) -> JsResult<bool> {
    // 1. Return ? O.[[HasProperty]](P).
    o.internal_has_property(agent, p, gc)
}

/// ### [7.3.13 HasOwnProperty ( O, P )](https://tc39.es/ecma262/#sec-hasownproperty)
pub fn has_own_property(
    agent: &mut Agent,
    o: Object,
    p: PropertyKey,
    gc: GcScope,
) -> JsResult<bool> {
    // 1. Let desc be ? O.[[GetOwnProperty]](P).
    let desc = o.internal_get_own_property(agent, p, gc)?;
    // 2. If desc is undefined, return false.
    // 3. Return true.
    Ok(desc.is_some())
}

/// ### [7.3.14 Call ( F, V \[ , argumentsList \] )](https://tc39.es/ecma262/#sec-call)
///
/// The abstract operation Call takes arguments F (an ECMAScript language
/// value) and V (an ECMAScript language value) and optional argument
/// argumentsList (a List of ECMAScript language values) and returns either a
/// normal completion containing an ECMAScript language value or a throw
/// completion. It is used to call the \[\[Call]] internal method of a
/// function object.
pub fn call(
    agent: &mut Agent,
    f: Value,
    v: Value,
    arguments_list: Option<ArgumentsList>,
    gc: GcScope,
) -> JsResult<Value> {
    // 2. If IsCallable(F) is false, throw a TypeError exception.
    let Some(f) = is_callable(agent, f) else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Not a function",
            gc.nogc(),
        ));
    };
    // 1. If argumentsList is not present, set argumentsList to a new empty List.
    // 3. Return ? F.[[Call]](V, argumentsList).
    call_function(agent, f, v, arguments_list, gc)
}

/// Abstract operation Call specialized for a Function.
pub fn call_function(
    agent: &mut Agent,
    f: Function,
    v: Value,
    arguments_list: Option<ArgumentsList>,
    gc: GcScope,
) -> JsResult<Value> {
    let arguments_list = arguments_list.unwrap_or_default();
    f.internal_call(agent, v, arguments_list, gc)
}

/// ### [7.3.15 Construct ( F \[ , argumentsList \[ , newTarget \] \] )](https://tc39.es/ecma262/#sec-construct)
pub fn construct(
    agent: &mut Agent,
    f: Function,
    arguments_list: Option<ArgumentsList>,
    new_target: Option<Function>,
    gc: GcScope,
) -> JsResult<Object> {
    // 1. If newTarget is not present, set newTarget to F.
    let new_target = new_target.unwrap_or(f);
    // 2. If argumentsList is not present, set argumentsList to a new empty List.
    let arguments_list = arguments_list.unwrap_or_default();
    // 3. Return ? F.[[Construct]](argumentsList, newTarget).
    f.internal_construct(agent, arguments_list, new_target, gc)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityLevel {
    Sealed,
    Frozen,
}

pub trait Level {
    const LEVEL: IntegrityLevel;
}

pub mod integrity {
    use super::{IntegrityLevel, Level};

    pub struct Sealed {}
    pub struct Frozen {}

    impl Level for Sealed {
        const LEVEL: IntegrityLevel = IntegrityLevel::Sealed;
    }

    impl Level for Frozen {
        const LEVEL: IntegrityLevel = IntegrityLevel::Frozen;
    }
}

/// Objects whose integrity level can be changed without going through the
/// generic property by property protocol.
fn has_ordinary_integrity(agent: &Agent, o: Object) -> bool {
    !o.is_proxy(agent) && !o.is_host_object(agent)
}

/// ### [7.3.16 SetIntegrityLevel ( O, level )](https://tc39.es/ecma262/#sec-setintegritylevel)
///
/// The abstract operation SetIntegrityLevel takes arguments O (an Object) and
/// level (SEALED or FROZEN) and returns either a normal completion containing
/// a Boolean or a throw completion. It is used to fix the set of own
/// properties of an object.
///
/// Ordinary objects take a shape level shortcut that also marks the object,
/// so later additions to indexed storage inherit the level.
pub fn set_integrity_level<T: Level>(
    agent: &mut Agent,
    o: Object,
    mut gc: GcScope,
) -> JsResult<bool> {
    if has_ordinary_integrity(agent, o) {
        match T::LEVEL {
            IntegrityLevel::Sealed => ordinary_seal(agent, o),
            IntegrityLevel::Frozen => ordinary_freeze(agent, o),
        }
        return Ok(true);
    }
    // 1. Let status be ? O.[[PreventExtensions]]().
    let status = o.internal_prevent_extensions(agent, gc.reborrow())?;
    // 2. If status is false, return false.
    if !status {
        return Ok(false);
    }
    // 3. Let keys be ? O.[[OwnPropertyKeys]]().
    let keys = o.internal_own_property_keys(agent, gc.reborrow())?;
    // 4. If level is SEALED, then
    if T::LEVEL == IntegrityLevel::Sealed {
        // a. For each element k of keys, do
        for k in keys {
            // i. Perform ? DefinePropertyOrThrow(O, k, PropertyDescriptor { [[Configurable]]: false }).
            define_property_or_throw(
                agent,
                o,
                k,
                PropertyDescriptor {
                    configurable: Some(false),
                    ..Default::default()
                },
                gc.reborrow(),
            )?;
        }
    } else {
        // 5. Else,
        // a. Assert: level is FROZEN.
        // b. For each element k of keys, do
        for k in keys {
            // i. Let currentDesc be ? O.[[GetOwnProperty]](k).
            let current_desc = o.internal_get_own_property(agent, k, gc.reborrow())?;
            // ii. If currentDesc is not undefined, then
            if let Some(current_desc) = current_desc {
                // 1. If IsAccessorDescriptor(currentDesc) is true, then
                let desc = if current_desc.is_accessor_descriptor() {
                    // a. Let desc be the PropertyDescriptor { [[Configurable]]: false }.
                    PropertyDescriptor {
                        configurable: Some(false),
                        ..Default::default()
                    }
                } else {
                    // 2. Else,
                    // a. Let desc be the PropertyDescriptor { [[Configurable]]: false, [[Writable]]: false }.
                    PropertyDescriptor {
                        configurable: Some(false),
                        writable: Some(false),
                        ..Default::default()
                    }
                };
                // 3. Perform ? DefinePropertyOrThrow(O, k, desc).
                define_property_or_throw(agent, o, k, desc, gc.reborrow())?;
            }
        }
    }
    // 6. Return true.
    Ok(true)
}

/// ### [7.3.17 TestIntegrityLevel ( O, level )](https://tc39.es/ecma262/#sec-testintegritylevel)
///
/// The abstract operation TestIntegrityLevel takes arguments O (an Object) and
/// level (SEALED or FROZEN) and returns either a normal completion containing a
/// Boolean or a throw completion. It is used to determine if the set of own
/// properties of an object are fixed.
pub fn test_integrity_level<T: Level>(
    agent: &mut Agent,
    o: Object,
    mut gc: GcScope,
) -> JsResult<bool> {
    if !o.is_proxy(agent) {
        return Ok(match T::LEVEL {
            IntegrityLevel::Sealed => ordinary_is_sealed(agent, o),
            IntegrityLevel::Frozen => ordinary_is_frozen(agent, o),
        });
    }
    // 1. Let extensible be ? IsExtensible(O).
    // 2. If extensible is true, return false.
    // 3. NOTE: If the object is extensible, none of its properties are examined.
    if o.internal_is_extensible(agent, gc.reborrow())? {
        return Ok(false);
    }
    // 4. Let keys be ? O.[[OwnPropertyKeys]]().
    let keys = o.internal_own_property_keys(agent, gc.reborrow())?;
    // 5. For each element k of keys, do
    for k in keys {
        // a. Let currentDesc be ? O.[[GetOwnProperty]](k).
        // b. If currentDesc is not undefined, then
        if let Some(current_desc) = o.internal_get_own_property(agent, k, gc.reborrow())? {
            // i. If currentDesc.[[Configurable]] is true, return false.
            if current_desc.configurable == Some(true) {
                return Ok(false);
            }
            // ii. If level is FROZEN and IsDataDescriptor(currentDesc) is true, then
            //     1. If currentDesc.[[Writable]] is true, return false.
            if T::LEVEL == IntegrityLevel::Frozen
                && current_desc.is_data_descriptor()
                && current_desc.writable == Some(true)
            {
                return Ok(false);
            }
        }
    }
    // 6. Return true.
    Ok(true)
}

/// ### [7.3.19 LengthOfArrayLike ( obj )](https://tc39.es/ecma262/#sec-lengthofarraylike)
///
/// The abstract operation LengthOfArrayLike takes argument obj (an Object)
/// and returns either a normal completion containing a non-negative integer
/// or a throw completion. It returns the value of the "length" property of
/// an array-like object.
pub fn length_of_array_like(agent: &mut Agent, obj: Object, mut gc: GcScope) -> JsResult<u64> {
    // NOTE: Fast path for Array objects.
    if matches!(agent[obj].kind, ObjectKind::Array) {
        return Ok(u64::from(Array::from_object_unchecked(obj).len(agent)));
    }
    // 1. Return ℝ(? ToLength(? Get(obj, "length"))).
    let key = PropertyKey::String(agent.predefined().length);
    let property = get(agent, obj, key, gc.reborrow())?;
    to_length(agent, property, gc)
}

/// ### [7.3.20 CreateListFromArrayLike ( obj \[ , elementTypes \] )](https://tc39.es/ecma262/#sec-createlistfromarraylike)
///
/// The abstract operation CreateListFromArrayLike takes argument obj (an
/// ECMAScript language value) and returns either a normal completion
/// containing a List of ECMAScript language values or a throw completion. It
/// is used to create a List value whose elements are provided by the indexed
/// properties of obj.
pub fn create_list_from_array_like(
    agent: &mut Agent,
    obj: Value,
    mut gc: GcScope,
) -> JsResult<Vec<Value>> {
    // 2. If obj is not an Object, throw a TypeError exception.
    let Value::Object(object) = obj else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "CreateListFromArrayLike called on non-object",
            gc.nogc(),
        ));
    };
    // 3. Let len be ? LengthOfArrayLike(obj).
    let len = length_of_array_like(agent, object, gc.reborrow())?;
    if len > u64::from(u32::MAX) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Too many elements in array-like object",
            gc.nogc(),
        ));
    }
    let len = len as u32;
    // 4. Let list be a new empty List.
    let mut list = Vec::with_capacity(len.min(1024) as usize);
    // 5. Let index be 0.
    // 6. Repeat, while index < len,
    for index in 0..len {
        // a. Let indexName be ! ToString(𝔽(index)).
        // b. Let next be ? Get(obj, indexName).
        let next = get(agent, object, PropertyKey::Integer(index), gc.reborrow())?;
        // d. Append next to list.
        list.push(next);
        // e. Set index to index + 1.
    }
    // 7. Return list.
    Ok(list)
}

/// CreateListFromArrayLike with elementTypes « String, Symbol », converting
/// every element into a property key.
pub fn create_property_key_list_from_array_like(
    agent: &mut Agent,
    obj: Value,
    mut gc: GcScope,
) -> JsResult<Vec<PropertyKey>> {
    let list = create_list_from_array_like(agent, obj, gc.reborrow())?;
    let mut keys = Vec::with_capacity(list.len());
    for next in list {
        // c. If elementTypes does not contain Type(next), throw a TypeError exception.
        match next {
            Value::String(string) => keys.push(PropertyKey::from_string(agent, string)),
            Value::Symbol(symbol) => keys.push(PropertyKey::Symbol(symbol)),
            _ => {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Property key list elements must be strings or symbols",
                    gc.nogc(),
                ));
            }
        }
    }
    Ok(keys)
}
