// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{Object, ObjectKind, Value};
use crate::{
    ecmascript::{
        builtins::{
            bound_function::{BoundFunctionHeapData, bound_function_call, bound_function_construct},
            builtin_function::{BuiltinFunctionHeapData, builtin_call, builtin_construct},
            proxy::{Proxy, ProxyRevokerHeapData, proxy_revoker_call},
        },
        execution::{Agent, ExceptionType, JsResult},
    },
    engine::context::GcScope,
    heap::{HeapMarkAndSweep, WorkQueues},
};

/// A callable object.
///
/// Callables form a closed set of kinds; `[[Call]]` and `[[Construct]]`
/// dispatch over it by matching on the object's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Function(Object);

#[derive(Debug)]
pub enum FunctionHeapData {
    Builtin(BuiltinFunctionHeapData),
    Bound(BoundFunctionHeapData),
    /// The revoke function returned by `Proxy.revocable`.
    ProxyRevoker(ProxyRevokerHeapData),
}

/// Arguments of a native call. Missing arguments read as `undefined`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentsList<'a>(&'a [Value]);

impl<'a> ArgumentsList<'a> {
    pub fn new(arguments: &'a [Value]) -> Self {
        Self(arguments)
    }

    pub fn get(&self, index: usize) -> Value {
        self.0.get(index).copied().unwrap_or(Value::Undefined)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &'a [Value] {
        self.0
    }
}

#[derive(Clone, Copy)]
enum Callee {
    Builtin,
    Bound,
    ProxyRevoker,
    Proxy,
}

impl Function {
    /// The caller guarantees that `object` is callable.
    pub(crate) fn from_object_unchecked(object: Object) -> Self {
        Self(object)
    }

    pub fn into_object(self) -> Object {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    fn callee(self, agent: &Agent) -> Option<Callee> {
        match &agent[self.0].kind {
            ObjectKind::Function(FunctionHeapData::Builtin(_)) => Some(Callee::Builtin),
            ObjectKind::Function(FunctionHeapData::Bound(_)) => Some(Callee::Bound),
            ObjectKind::Function(FunctionHeapData::ProxyRevoker(_)) => Some(Callee::ProxyRevoker),
            ObjectKind::Proxy(data) if data.is_callable => Some(Callee::Proxy),
            _ => None,
        }
    }

    /// ### [7.2.4 IsConstructor ( argument )](https://tc39.es/ecma262/#sec-isconstructor)
    pub fn is_constructor(self, agent: &Agent) -> bool {
        match &agent[self.0].kind {
            ObjectKind::Function(FunctionHeapData::Builtin(data)) => data.is_constructor(),
            ObjectKind::Function(FunctionHeapData::Bound(data)) => data.target.is_constructor(agent),
            ObjectKind::Proxy(data) => data.is_constructor,
            _ => false,
        }
    }

    /// `[[Call]] ( thisArgument, argumentsList )`
    pub(crate) fn internal_call(
        self,
        agent: &mut Agent,
        this_argument: Value,
        arguments_list: ArgumentsList,
        gc: GcScope,
    ) -> JsResult<Value> {
        let Some(callee) = self.callee(agent) else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Not a function",
                gc.nogc(),
            ));
        };
        agent.with_native_call(gc, |agent, gc| match callee {
            Callee::Builtin => builtin_call(agent, self, this_argument, arguments_list, gc),
            Callee::Bound => bound_function_call(agent, self, arguments_list, gc),
            Callee::ProxyRevoker => proxy_revoker_call(agent, self, gc),
            Callee::Proxy => Proxy::from_object_unchecked(self.0).internal_call(
                agent,
                this_argument,
                arguments_list,
                gc,
            ),
        })
    }

    /// `[[Construct]] ( argumentsList, newTarget )`
    pub(crate) fn internal_construct(
        self,
        agent: &mut Agent,
        arguments_list: ArgumentsList,
        new_target: Function,
        gc: GcScope,
    ) -> JsResult<Object> {
        if !self.is_constructor(agent) {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Not a constructor",
                gc.nogc(),
            ));
        }
        let callee = self.callee(agent);
        agent.with_native_call(gc, |agent, gc| match callee {
            Some(Callee::Builtin) => {
                builtin_construct(agent, self, arguments_list, new_target, gc)
            }
            Some(Callee::Bound) => {
                bound_function_construct(agent, self, arguments_list, new_target, gc)
            }
            Some(Callee::Proxy) => Proxy::from_object_unchecked(self.0).internal_construct(
                agent,
                arguments_list,
                new_target,
                gc,
            ),
            Some(Callee::ProxyRevoker) | None => Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Not a constructor",
                gc.nogc(),
            )),
        })
    }
}

impl From<Function> for Value {
    fn from(value: Function) -> Self {
        Value::Object(value.0)
    }
}

impl From<Function> for Object {
    fn from(value: Function) -> Self {
        value.0
    }
}

impl HeapMarkAndSweep for FunctionHeapData {
    fn mark_values(&self, queues: &mut WorkQueues) {
        match self {
            FunctionHeapData::Builtin(data) => data.mark_values(queues),
            FunctionHeapData::Bound(data) => data.mark_values(queues),
            FunctionHeapData::ProxyRevoker(data) => data.mark_values(queues),
        }
    }
}
