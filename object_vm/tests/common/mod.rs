// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![allow(dead_code)]

use object_vm::{
    ecmascript::{
        abstract_operations::operations_on_objects::{create_data_property_or_throw, get},
        builtins::{Behaviour, builtin_function, ordinary::ordinary_object_create},
        execution::{Agent, ExceptionType, JsError, JsResult},
        types::{ArgumentsList, Function, Object, PropertyKey, Value},
    },
    engine::GcScope,
};

pub fn key(agent: &mut Agent, name: &str) -> PropertyKey {
    PropertyKey::from_str(agent, name)
}

pub fn string(agent: &mut Agent, content: &str) -> Value {
    Value::from_str(agent, content)
}

/// Kind and message of a thrown error object.
pub fn thrown(agent: &mut Agent, error: JsError, gc: GcScope) -> (ExceptionType, String) {
    let kind = error
        .exception_type(agent)
        .expect("thrown value is not an error object");
    let Value::Object(error) = error.value() else {
        unreachable!();
    };
    let message = PropertyKey::String(agent.predefined().message);
    let message = match get(agent, error, message, gc).unwrap() {
        Value::String(message) => message.to_string_lossy(agent),
        other => panic!("error message is not a string: {other:?}"),
    };
    (kind, message)
}

/// Assert that `result` threw an error of `kind` with `message`.
pub fn assert_throws<T: std::fmt::Debug>(
    agent: &mut Agent,
    result: JsResult<T>,
    kind: ExceptionType,
    message: &str,
    gc: GcScope,
) {
    let error = result.expect_err("expected an exception");
    assert_eq!(thrown(agent, error, gc), (kind, message.to_string()));
}

/// Ordinary object with the given enumerable, writable, configurable data
/// properties.
pub fn object_with(agent: &mut Agent, entries: &[(&str, Value)], mut gc: GcScope) -> Object {
    let object = ordinary_object_create(agent);
    for (name, value) in entries {
        let key = key(agent, name);
        create_data_property_or_throw(agent, object, key, *value, gc.reborrow()).unwrap();
    }
    object
}

pub fn function(
    agent: &mut Agent,
    name: &str,
    length: u32,
    f: fn(&mut Agent, Value, ArgumentsList, GcScope) -> JsResult<Value>,
) -> Function {
    builtin_function(agent, Behaviour::Regular(f), length, name)
}

/// Number stored in `value`, panicking otherwise.
pub fn number(value: Value) -> f64 {
    value.as_number().expect("not a number")
}
