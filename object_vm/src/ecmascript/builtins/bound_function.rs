// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    ecmascript::{
        builtins::ordinary::object_create_with_kind,
        execution::{Agent, JsResult},
        types::{
            ArgumentsList, Function, FunctionHeapData, InternalMethods, Object, ObjectKind, Value,
        },
    },
    engine::context::GcScope,
    heap::{HeapMarkAndSweep, WorkQueues},
};

#[derive(Debug)]
pub struct BoundFunctionHeapData {
    pub(crate) target: Function,
    pub(crate) bound_this: Value,
    pub(crate) bound_arguments: Box<[Value]>,
}

/// ### [10.4.1.3 BoundFunctionCreate ( targetFunction, boundThis, boundArgs )](https://tc39.es/ecma262/#sec-boundfunctioncreate)
pub fn bound_function_create(
    agent: &mut Agent,
    target_function: Function,
    bound_this: Value,
    bound_args: &[Value],
    gc: GcScope,
) -> JsResult<Function> {
    // 1. Let proto be ? targetFunction.[[GetPrototypeOf]]().
    let proto = target_function
        .into_object()
        .internal_get_prototype_of(agent, gc)?;
    let data = BoundFunctionHeapData {
        target: target_function,
        bound_this,
        bound_arguments: bound_args.into(),
    };
    let object = object_create_with_kind(
        agent,
        proto,
        ObjectKind::Function(FunctionHeapData::Bound(data)),
    );
    // 11. Return obj.
    Ok(Function::from_object_unchecked(object))
}

fn bound_data(agent: &Agent, f: Function) -> (Function, Value, Vec<Value>) {
    match &agent[f.into_object()].kind {
        ObjectKind::Function(FunctionHeapData::Bound(data)) => (
            data.target,
            data.bound_this,
            data.bound_arguments.to_vec(),
        ),
        _ => unreachable!("bound function data missing"),
    }
}

/// ### [10.4.1.1 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-bound-function-exotic-objects-call-thisargument-argumentslist)
pub(crate) fn bound_function_call(
    agent: &mut Agent,
    f: Function,
    arguments_list: ArgumentsList,
    gc: GcScope,
) -> JsResult<Value> {
    // 1. Let target be F.[[BoundTargetFunction]].
    // 2. Let boundThis be F.[[BoundThis]].
    // 3. Let boundArgs be F.[[BoundArguments]].
    let (target, bound_this, mut args) = bound_data(agent, f);
    // 4. Let args be the list-concatenation of boundArgs and argumentsList.
    args.extend_from_slice(arguments_list.as_slice());
    // 5. Return ? Call(target, boundThis, args).
    target.internal_call(agent, bound_this, ArgumentsList::new(&args), gc)
}

/// ### [10.4.1.2 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-bound-function-exotic-objects-construct-argumentslist-newtarget)
pub(crate) fn bound_function_construct(
    agent: &mut Agent,
    f: Function,
    arguments_list: ArgumentsList,
    new_target: Function,
    gc: GcScope,
) -> JsResult<Object> {
    let (target, _, mut args) = bound_data(agent, f);
    args.extend_from_slice(arguments_list.as_slice());
    // 5. If SameValue(F, newTarget) is true, set newTarget to target.
    let new_target = if new_target == f { target } else { new_target };
    // 6. Return ? Construct(target, args, newTarget).
    target.internal_construct(agent, ArgumentsList::new(&args), new_target, gc)
}

impl HeapMarkAndSweep for BoundFunctionHeapData {
    fn mark_values(&self, queues: &mut WorkQueues) {
        queues.objects.push(self.target.into_object());
        queues.push_value(self.bound_this);
        for value in self.bound_arguments.iter() {
            queues.push_value(*value);
        }
    }
}
