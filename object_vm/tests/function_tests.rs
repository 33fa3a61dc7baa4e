// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod common;

use common::{assert_throws, function, key, number, string};
use object_vm::{
    ecmascript::{
        abstract_operations::{
            operations_on_objects::{
                call, call_function, construct, create_data_property_or_throw,
                create_list_from_array_like, get, length_of_array_like,
            },
            testing_and_comparison::{is_callable, is_constructor},
        },
        builtins::{
            Behaviour, bound_function_create, create_arguments_object, create_builtin_function,
            ordinary::ordinary_object_create,
        },
        execution::{Agent, ExceptionType, JsResult, Options},
        types::{ArgumentsList, InternalMethods, Object, PropertyKey, Value},
    },
    engine::GcScope,
};

/// Returns `[this, ...arguments]` as a list of values in an array-like.
fn echo(agent: &mut Agent, this: Value, arguments: ArgumentsList, mut gc: GcScope) -> JsResult<Value> {
    let result = ordinary_object_create(agent);
    create_data_property_or_throw(agent, result, PropertyKey::Integer(0), this, gc.reborrow())?;
    for (index, value) in arguments.as_slice().iter().enumerate() {
        let index = PropertyKey::Integer(index as u32 + 1);
        create_data_property_or_throw(agent, result, index, *value, gc.reborrow())?;
    }
    let length = PropertyKey::String(agent.predefined().length);
    let count = Value::from(arguments.len() as u32 + 1);
    create_data_property_or_throw(agent, result, length, count, gc)?;
    Ok(Value::Object(result))
}

/// Constructor recording its `NewTarget` and first argument.
fn point(
    agent: &mut Agent,
    _this: Value,
    arguments: ArgumentsList,
    new_target: Option<Object>,
    mut gc: GcScope,
) -> JsResult<Value> {
    let result = ordinary_object_create(agent);
    let x = PropertyKey::from_str(agent, "x");
    create_data_property_or_throw(agent, result, x, arguments.get(0), gc.reborrow())?;
    let target = PropertyKey::from_str(agent, "newTarget");
    create_data_property_or_throw(agent, result, target, new_target.into(), gc)?;
    Ok(Value::Object(result))
}

fn not_an_object(
    _agent: &mut Agent,
    _this: Value,
    _arguments: ArgumentsList,
    _new_target: Option<Object>,
    _gc: GcScope,
) -> JsResult<Value> {
    Ok(Value::from(1))
}

fn list(agent: &mut Agent, value: Value, gc: GcScope) -> Vec<Value> {
    create_list_from_array_like(agent, value, gc).unwrap()
}

#[test]
fn strict_arguments_poison_callee() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let f = function(agent, "f", 2, echo);
        let values = [Value::from(1), Value::from(2)];
        let arguments = create_arguments_object(agent, f, ArgumentsList::new(&values), true);
        let length = key(agent, "length");
        assert_eq!(number(get(agent, arguments, length, gc.reborrow()).unwrap()), 2.0);
        assert_eq!(
            get(agent, arguments, PropertyKey::Integer(1), gc.reborrow()).unwrap(),
            Value::from(2)
        );
        assert_eq!(
            list(agent, Value::Object(arguments), gc.reborrow()),
            values.to_vec()
        );

        for name in ["callee", "caller"] {
            let poisoned = key(agent, name);
            let result = get(agent, arguments, poisoned, gc.reborrow());
            assert_throws(
                agent,
                result,
                ExceptionType::TypeError,
                "Restricted in strict mode",
                gc.reborrow(),
            );
            let desc = arguments
                .internal_get_own_property(agent, poisoned, gc.reborrow())
                .unwrap()
                .unwrap();
            assert_eq!(desc.configurable, Some(false));
            assert_eq!(desc.get, Some(Some(agent.intrinsics().throw_type_error)));
        }
    });
}

#[test]
fn sloppy_arguments_expose_the_callee() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let f = function(agent, "f", 0, echo);
        let arguments = create_arguments_object(agent, f, ArgumentsList::default(), false);
        let callee = key(agent, "callee");
        assert_eq!(
            get(agent, arguments, callee, gc.reborrow()).unwrap(),
            f.into_value()
        );
        assert_eq!(length_of_array_like(agent, arguments, gc.reborrow()).unwrap(), 0);
        // The length is an ordinary writable property.
        let length = key(agent, "length");
        create_data_property_or_throw(agent, arguments, length, Value::from(3), gc.reborrow())
            .unwrap();
        assert_eq!(
            list(agent, Value::Object(arguments), gc.reborrow()),
            vec![Value::Undefined; 3]
        );
    });
}

#[test]
fn builtin_functions_expose_length_and_name() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let f = function(agent, "echo", 3, echo).into_object();
        let (length, name) = (key(agent, "length"), key(agent, "name"));
        assert_eq!(number(get(agent, f, length, gc.reborrow()).unwrap()), 3.0);
        let name_value = get(agent, f, name, gc.reborrow()).unwrap();
        assert_eq!(name_value, string(agent, "echo"));
        let desc = f
            .internal_get_own_property(agent, length, gc.reborrow())
            .unwrap()
            .unwrap();
        assert_eq!(desc.writable, Some(false));
        assert_eq!(desc.enumerable, Some(false));
        assert_eq!(desc.configurable, Some(true));
        assert_eq!(
            f.internal_own_property_keys(agent, gc.reborrow()).unwrap(),
            vec![length, name]
        );
    });
}

#[test]
fn calls_pass_this_and_arguments() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let f = function(agent, "echo", 0, echo);
        let this = string(agent, "receiver");
        let values = [Value::from(1), Value::Null];
        let result = call_function(
            agent,
            f,
            this,
            Some(ArgumentsList::new(&values)),
            gc.reborrow(),
        )
        .unwrap();
        assert_eq!(list(agent, result, gc.reborrow()), vec![this, Value::from(1), Value::Null]);
        assert_eq!(agent.call_depth(), 0);

        let result = call(agent, Value::from(1), Value::Undefined, None, gc.reborrow());
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Not a function",
            gc.reborrow(),
        );
        assert!(is_callable(agent, f.into_value()).is_some());
        assert!(is_constructor(agent, f.into_value()).is_none());
        let result = construct(agent, f, None, None, gc.reborrow());
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Not a constructor",
            gc.reborrow(),
        );
    });
}

#[test]
fn constructors_receive_new_target() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let prototype = agent.intrinsics().function_prototype;
        let point = create_builtin_function(
            agent,
            Behaviour::Constructor(point),
            1,
            "Point",
            Some(prototype),
        );
        assert!(is_constructor(agent, point.into_value()).is_some());
        let values = [Value::from(4)];
        let instance =
            construct(agent, point, Some(ArgumentsList::new(&values)), None, gc.reborrow()).unwrap();
        let (x, new_target) = (key(agent, "x"), key(agent, "newTarget"));
        assert_eq!(get(agent, instance, x, gc.reborrow()).unwrap(), Value::from(4));
        assert_eq!(
            get(agent, instance, new_target, gc.reborrow()).unwrap(),
            point.into_value()
        );
        // Called without `new`, NewTarget is undefined.
        let called = call_function(agent, point, Value::Undefined, None, gc.reborrow()).unwrap();
        let Value::Object(called) = called else {
            panic!("constructor returned a primitive");
        };
        assert_eq!(
            get(agent, called, new_target, gc.reborrow()).unwrap(),
            Value::Undefined
        );

        let broken = create_builtin_function(
            agent,
            Behaviour::Constructor(not_an_object),
            0,
            "Broken",
            Some(prototype),
        );
        let result = construct(agent, broken, None, None, gc.reborrow());
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Constructor did not return an object",
            gc.reborrow(),
        );
    });
}

#[test]
fn bound_functions_prepend_arguments() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let f = function(agent, "echo", 3, echo);
        let this = string(agent, "bound this");
        let bound = bound_function_create(agent, f, this, &[Value::from(1)], gc.reborrow()).unwrap();
        assert!(bound.into_object().is_bound_function(agent));

        let (length, name) = (key(agent, "length"), key(agent, "name"));
        let bound_object = bound.into_object();
        assert_eq!(number(get(agent, bound_object, length, gc.reborrow()).unwrap()), 2.0);
        let name_value = get(agent, bound_object, name, gc.reborrow()).unwrap();
        assert_eq!(name_value, string(agent, "bound echo"));

        let values = [Value::from(2)];
        let result = call_function(
            agent,
            bound,
            Value::Null,
            Some(ArgumentsList::new(&values)),
            gc.reborrow(),
        )
        .unwrap();
        assert_eq!(
            list(agent, result, gc.reborrow()),
            vec![this, Value::from(1), Value::from(2)]
        );

        // More bound arguments than the target declares.
        let many = [Value::Null; 5];
        let saturated = bound_function_create(agent, f, this, &many, gc.reborrow()).unwrap();
        let saturated = saturated.into_object();
        assert_eq!(number(get(agent, saturated, length, gc.reborrow()).unwrap()), 0.0);
    });
}

#[test]
fn bound_constructors_forward_new_target() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let prototype = agent.intrinsics().function_prototype;
        let point = create_builtin_function(
            agent,
            Behaviour::Constructor(point),
            1,
            "Point",
            Some(prototype),
        );
        let bound =
            bound_function_create(agent, point, Value::Undefined, &[Value::from(9)], gc.reborrow())
                .unwrap();
        assert!(is_constructor(agent, bound.into_value()).is_some());
        let instance = construct(agent, bound, None, None, gc.reborrow()).unwrap();
        let (x, new_target) = (key(agent, "x"), key(agent, "newTarget"));
        assert_eq!(get(agent, instance, x, gc.reborrow()).unwrap(), Value::from(9));
        assert_eq!(
            get(agent, instance, new_target, gc.reborrow()).unwrap(),
            point.into_value()
        );
        assert_eq!(
            bound
                .into_object()
                .internal_get_prototype_of(agent, gc.reborrow())
                .unwrap(),
            Some(prototype)
        );
    });
}
