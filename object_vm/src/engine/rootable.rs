// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod scoped;

pub use scoped::Scoped;

use crate::{
    ecmascript::{
        builtins::{Array, proxy::Proxy},
        execution::Agent,
        types::{Function, Object, String, Symbol, Value},
    },
    engine::context::NoGcScope,
};

/// A heap value that can be pushed onto the root stack of an [`Agent`].
///
/// Rooted values survive a garbage collection regardless of whether anything
/// else on the heap refers to them.
pub trait Rootable: Copy {
    fn into_root_value(self) -> Value;

    fn from_root_value(value: Value) -> Option<Self>;

    /// Root this value for the remainder of the current root scope.
    fn scope<'scope>(self, agent: &Agent, gc: NoGcScope<'_, 'scope>) -> Scoped<'scope, Self>
    where
        Self: 'static,
    {
        Scoped::new(agent, self, gc)
    }
}

impl Rootable for Value {
    fn into_root_value(self) -> Value {
        self
    }

    fn from_root_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl Rootable for Object {
    fn into_root_value(self) -> Value {
        Value::Object(self)
    }

    fn from_root_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl Rootable for String {
    fn into_root_value(self) -> Value {
        Value::String(self)
    }

    fn from_root_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Rootable for Symbol {
    fn into_root_value(self) -> Value {
        Value::Symbol(self)
    }

    fn from_root_value(value: Value) -> Option<Self> {
        match value {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

impl Rootable for Function {
    fn into_root_value(self) -> Value {
        Value::Object(self.into_object())
    }

    fn from_root_value(value: Value) -> Option<Self> {
        // Only callable objects are ever rooted as functions.
        match value {
            Value::Object(o) => Some(Function::from_object_unchecked(o)),
            _ => None,
        }
    }
}

impl Rootable for Array {
    fn into_root_value(self) -> Value {
        Value::Object(self.into_object())
    }

    fn from_root_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(o) => Some(Array::from_object_unchecked(o)),
            _ => None,
        }
    }
}

impl Rootable for Proxy {
    fn into_root_value(self) -> Value {
        Value::Object(self.into_object())
    }

    fn from_root_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(o) => Some(Proxy::from_object_unchecked(o)),
            _ => None,
        }
    }
}
