// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.4.4 Arguments Exotic Objects](https://tc39.es/ecma262/#sec-arguments-exotic-objects)
//!
//! Arguments objects are unmapped: their elements are plain indexed data
//! properties that do not alias the parameters of the function.

use crate::ecmascript::{
    builtins::ordinary::{add_own_property, object_create_with_kind},
    execution::Agent,
    types::{
        ArgumentsList, Function, IndexedStorage, Object, ObjectKind, PropertyFlags, PropertyKey,
        PropertyValue, Value,
    },
};

/// ### [10.4.4.6 CreateUnmappedArgumentsObject ( argumentsList )](https://tc39.es/ecma262/#sec-createunmappedargumentsobject)
///
/// In strict code `callee` and `caller` are poisoned with
/// `%ThrowTypeError%`; otherwise `callee` is the function itself.
pub fn create_arguments_object(
    agent: &mut Agent,
    function: Function,
    arguments_list: ArgumentsList,
    strict: bool,
) -> Object {
    let intrinsics = agent.intrinsics();
    let names = agent.predefined();
    // 1. Let len be the number of elements in argumentsList.
    let len = arguments_list.len() as u32;
    // 2. Let obj be OrdinaryObjectCreate(%Object.prototype%, « [[ParameterMap]] »).
    // 3. Set obj.[[ParameterMap]] to undefined.
    let obj = object_create_with_kind(
        agent,
        Some(intrinsics.object_prototype),
        ObjectKind::Arguments,
    );
    // 4. Perform ! DefinePropertyOrThrow(obj, "length", PropertyDescriptor { [[Value]]: 𝔽(len), [[Writable]]: true, [[Enumerable]]: false, [[Configurable]]: true }).
    add_own_property(
        agent,
        obj,
        PropertyKey::String(names.length),
        PropertyFlags::WRITABLE | PropertyFlags::CONFIGURABLE,
        PropertyValue::Data(Value::from(len)),
    );
    // 5. Let index be 0.
    // 6. Repeat, while index < len,
    //    a. Let val be argumentsList[index].
    //    b. Perform ! CreateDataPropertyOrThrow(obj, ! ToString(𝔽(index)), val).
    if !arguments_list.is_empty() {
        agent[obj].indexed = Some(IndexedStorage::from_values(arguments_list.as_slice()));
    }
    if strict {
        // 8. Perform ! DefinePropertyOrThrow(obj, "callee", PropertyDescriptor { [[Get]]: %ThrowTypeError%, [[Set]]: %ThrowTypeError%, [[Enumerable]]: false, [[Configurable]]: false }).
        let poison = PropertyValue::Accessor(intrinsics.throw_type_error_accessor);
        add_own_property(
            agent,
            obj,
            PropertyKey::String(names.callee),
            PropertyFlags::ACCESSOR,
            poison,
        );
        add_own_property(
            agent,
            obj,
            PropertyKey::String(names.caller),
            PropertyFlags::ACCESSOR,
            poison,
        );
    } else {
        add_own_property(
            agent,
            obj,
            PropertyKey::String(names.callee),
            PropertyFlags::WRITABLE | PropertyFlags::CONFIGURABLE,
            PropertyValue::Data(function.into_value()),
        );
    }
    // 9. Return obj.
    obj
}
