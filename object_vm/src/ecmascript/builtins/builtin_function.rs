// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::fmt::Debug;

use crate::{
    ecmascript::{
        builtins::ordinary::object_create_with_kind,
        execution::{Agent, ExceptionType, JsResult},
        types::{ArgumentsList, Function, FunctionHeapData, Object, ObjectKind, String, Value},
    },
    engine::context::GcScope,
    heap::{HeapMarkAndSweep, WorkQueues},
};

pub type RegularFn = fn(&mut Agent, Value, ArgumentsList, GcScope) -> JsResult<Value>;
pub type ConstructorFn =
    fn(&mut Agent, Value, ArgumentsList, Option<Object>, GcScope) -> JsResult<Value>;

/// Native implementation of a builtin function.
#[derive(Clone, Copy)]
pub enum Behaviour {
    Regular(RegularFn),
    /// Receives `NewTarget` as the fourth argument; `None` when called
    /// without `new`.
    Constructor(ConstructorFn),
}

impl Debug for Behaviour {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Behaviour::Regular(_) => f.write_str("Behaviour::Regular"),
            Behaviour::Constructor(_) => f.write_str("Behaviour::Constructor"),
        }
    }
}

#[derive(Debug)]
pub struct BuiltinFunctionHeapData {
    pub(crate) behaviour: Behaviour,
    /// Value of the lazily created `length` property.
    pub(crate) length: u32,
    /// Value of the lazily created `name` property.
    pub(crate) name: String,
}

impl BuiltinFunctionHeapData {
    pub(crate) fn is_constructor(&self) -> bool {
        matches!(self.behaviour, Behaviour::Constructor(_))
    }
}

/// ### [10.3.4 CreateBuiltinFunction ( behaviour, length, name, additionalInternalSlotsList \[ , realm \[ , prototype \[ , prefix \] \] \] )](https://tc39.es/ecma262/#sec-createbuiltinfunction)
///
/// The `length` and `name` properties are materialized on first access.
pub fn create_builtin_function(
    agent: &mut Agent,
    behaviour: Behaviour,
    length: u32,
    name: &str,
    prototype: Option<Object>,
) -> Function {
    let name = String::from_str(agent, name);
    let data = BuiltinFunctionHeapData {
        behaviour,
        length,
        name,
    };
    let object = object_create_with_kind(
        agent,
        prototype,
        ObjectKind::Function(FunctionHeapData::Builtin(data)),
    );
    Function::from_object_unchecked(object)
}

/// Create a builtin function inheriting from `%Function.prototype%`.
pub fn builtin_function(
    agent: &mut Agent,
    behaviour: Behaviour,
    length: u32,
    name: &str,
) -> Function {
    let prototype = agent.intrinsics().function_prototype;
    create_builtin_function(agent, behaviour, length, name, Some(prototype))
}

fn behaviour_of(agent: &Agent, f: Function) -> Option<Behaviour> {
    match &agent[f.into_object()].kind {
        ObjectKind::Function(FunctionHeapData::Builtin(data)) => Some(data.behaviour),
        _ => None,
    }
}

/// ### [10.3.1 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-built-in-function-objects-call-thisargument-argumentslist)
pub(crate) fn builtin_call(
    agent: &mut Agent,
    f: Function,
    this_argument: Value,
    arguments_list: ArgumentsList,
    gc: GcScope,
) -> JsResult<Value> {
    match behaviour_of(agent, f) {
        Some(Behaviour::Regular(func)) => func(agent, this_argument, arguments_list, gc),
        Some(Behaviour::Constructor(func)) => func(agent, this_argument, arguments_list, None, gc),
        None => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Not a function",
            gc.nogc(),
        )),
    }
}

/// ### [10.3.2 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-built-in-function-objects-construct-argumentslist-newtarget)
pub(crate) fn builtin_construct(
    agent: &mut Agent,
    f: Function,
    arguments_list: ArgumentsList,
    new_target: Function,
    mut gc: GcScope,
) -> JsResult<Object> {
    let Some(Behaviour::Constructor(func)) = behaviour_of(agent, f) else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Not a constructor",
            gc.nogc(),
        ));
    };
    let result = func(
        agent,
        Value::Undefined,
        arguments_list,
        Some(new_target.into_object()),
        gc.reborrow(),
    )?;
    match result {
        Value::Object(object) => Ok(object),
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Constructor did not return an object",
            gc.nogc(),
        )),
    }
}

impl HeapMarkAndSweep for BuiltinFunctionHeapData {
    fn mark_values(&self, queues: &mut WorkQueues) {
        queues.strings.push(self.name);
    }
}
