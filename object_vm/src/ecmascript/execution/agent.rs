// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # 9.7 Agents
//!
//! The [`Agent`] is the runtime context of the object model: it owns the
//! heap, the root stack, the native call depth counter and the lazily
//! created intrinsic objects.

use std::cell::RefCell;

use super::intrinsics::{Intrinsics, PredefinedStrings};
use crate::{
    ecmascript::{
        builtins::ordinary::{add_own_property, object_create_with_kind},
        types::{ObjectKind, PropertyFlags, PropertyKey, PropertyValue, String, Value},
    },
    engine::context::{GcScope, NoGcScope},
    heap::{Heap, heap_gc::heap_gc},
};

/// Agent configuration.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Make [`Agent::gc`] a no-op.
    pub disable_gc: bool,
    /// Log every raised exception at debug level.
    pub print_internals: bool,
    /// Depth of nested native calls (function calls and proxy traps) after
    /// which a RangeError is raised instead of recursing further.
    pub max_native_call_depth: u32,
    /// Number of properties after which a shape stops caching transitions
    /// and turns into a private dictionary.
    pub dictionary_threshold: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            disable_gc: false,
            print_internals: false,
            max_native_call_depth: 512,
            dictionary_threshold: 64,
        }
    }
}

pub type JsResult<T> = std::result::Result<T, JsError>;

/// A raised exception travelling up the native call stack.
///
/// Benign failures of the fundamental object operations are not errors: they
/// are reported as `Ok(false)` and only turned into a `JsError` when the
/// caller asked for throwing semantics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsError {
    value: Value,
    catchable: bool,
}

impl JsError {
    pub(crate) fn new(value: Value) -> Self {
        Self {
            value,
            catchable: true,
        }
    }

    /// An exception that no catch boundary may intercept. Used by embedders
    /// to terminate execution.
    pub fn uncatchable(value: Value) -> Self {
        Self {
            value,
            catchable: false,
        }
    }

    pub fn value(self) -> Value {
        self.value
    }

    pub fn is_catchable(self) -> bool {
        self.catchable
    }

    /// Returns the kind of the thrown error object, if the thrown value is
    /// one created by [`Agent::throw_exception`].
    pub fn exception_type(self, agent: &Agent) -> Option<ExceptionType> {
        let Value::Object(o) = self.value else {
            return None;
        };
        match agent[o].kind {
            ObjectKind::Error(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Catch boundary: catchable exceptions are handed to the caller as the
/// thrown value, uncatchable ones keep propagating.
pub fn catch_exception<T>(result: JsResult<T>) -> JsResult<Result<T, Value>> {
    match result {
        Ok(value) => Ok(Ok(value)),
        Err(err) if err.is_catchable() => Ok(Err(err.value())),
        Err(err) => Err(err),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionType {
    Error,
    EvalError,
    RangeError,
    ReferenceError,
    SyntaxError,
    TypeError,
    UriError,
}

impl ExceptionType {
    pub fn name(self) -> &'static str {
        match self {
            ExceptionType::Error => "Error",
            ExceptionType::EvalError => "EvalError",
            ExceptionType::RangeError => "RangeError",
            ExceptionType::ReferenceError => "ReferenceError",
            ExceptionType::SyntaxError => "SyntaxError",
            ExceptionType::TypeError => "TypeError",
            ExceptionType::UriError => "URIError",
        }
    }
}

/// ### [9.7 Agents](https://tc39.es/ecma262/#sec-agents)
#[derive(Debug)]
pub struct Agent {
    pub(crate) heap: Heap,
    pub(crate) options: Options,
    /// Values rooted by [`Scoped`](crate::engine::Scoped) handles.
    pub(crate) stack_refs: RefCell<Vec<Value>>,
    /// Number of native calls currently on the stack.
    pub(crate) call_depth: u32,
    pub(crate) intrinsics: Option<Intrinsics>,
    pub(crate) predefined: Option<PredefinedStrings>,
}

impl Agent {
    pub fn new(options: Options) -> Self {
        Self {
            heap: Heap::new(),
            options,
            stack_refs: RefCell::new(Vec::with_capacity(64)),
            call_depth: 0,
            intrinsics: None,
            predefined: None,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Enter the object model from the embedder: creates the root garbage
    /// collection scope and releases every root created inside `f`.
    pub fn run<R>(&mut self, f: impl FnOnce(&mut Agent, GcScope) -> R) -> R {
        let (mut gc_token, mut scope_token) = GcScope::create_root();
        let gc = GcScope::new(&mut gc_token, &mut scope_token);
        self.root_scope(|agent| f(agent, gc))
    }

    /// Run `f` and release every [`Scoped`](crate::engine::Scoped) root it
    /// created, on every exit path of `f`.
    pub fn root_scope<R>(&mut self, f: impl FnOnce(&mut Agent) -> R) -> R {
        let depth = self.stack_refs.borrow().len();
        let result = f(self);
        self.stack_refs.borrow_mut().truncate(depth);
        result
    }

    /// Number of values currently rooted on the root stack.
    pub fn root_count(&self) -> usize {
        self.stack_refs.borrow().len()
    }

    /// Number of native calls currently on the stack.
    pub fn call_depth(&self) -> u32 {
        self.call_depth
    }

    /// The per-agent intrinsic objects, created on first use.
    pub fn intrinsics(&mut self) -> Intrinsics {
        if let Some(intrinsics) = self.intrinsics {
            return intrinsics;
        }
        let intrinsics = Intrinsics::create(self);
        self.intrinsics = Some(intrinsics);
        intrinsics
    }

    /// The per-agent table of predefined identifiers, interned on first use.
    pub fn predefined(&mut self) -> PredefinedStrings {
        if let Some(predefined) = self.predefined {
            return predefined;
        }
        let predefined = PredefinedStrings::create(self);
        self.predefined = Some(predefined);
        predefined
    }

    /// Create an error object of the given kind with an own `message`
    /// property.
    pub fn create_exception(&mut self, kind: ExceptionType, message: &str) -> Value {
        let prototype = self.intrinsics().error_prototype(kind);
        let object = object_create_with_kind(self, Some(prototype), ObjectKind::Error(kind));
        let message = String::from_str(self, message);
        let key = PropertyKey::String(self.predefined().message);
        add_own_property(
            self,
            object,
            key,
            PropertyFlags::WRITABLE | PropertyFlags::CONFIGURABLE,
            PropertyValue::Data(Value::String(message)),
        );
        Value::Object(object)
    }

    pub fn throw_exception_with_static_message(
        &mut self,
        kind: ExceptionType,
        message: &'static str,
        gc: NoGcScope,
    ) -> JsError {
        self.throw_exception(kind, message, gc)
    }

    pub fn throw_exception(&mut self, kind: ExceptionType, message: &str, _: NoGcScope) -> JsError {
        if self.options.print_internals {
            log::debug!("Throwing {}: {}", kind.name(), message);
        }
        JsError::new(self.create_exception(kind, message))
    }

    /// Raise an exception that no catch boundary intercepts.
    pub fn terminate_execution(&mut self, message: &str, _: NoGcScope) -> JsError {
        log::debug!("Terminating execution: {message}");
        JsError::uncatchable(self.create_exception(ExceptionType::Error, message))
    }

    /// Run `f` as a nested native call. Every function call and every proxy
    /// trap dispatch goes through here; past the configured depth a
    /// catchable RangeError is raised instead of recursing.
    pub(crate) fn with_native_call<R>(
        &mut self,
        gc: GcScope,
        f: impl FnOnce(&mut Agent, GcScope) -> JsResult<R>,
    ) -> JsResult<R> {
        if self.call_depth >= self.options.max_native_call_depth {
            log::debug!(
                "Native call depth {} exceeded, raising stack overflow",
                self.call_depth
            );
            return Err(self.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "Maximum call stack size exceeded",
                gc.nogc(),
            ));
        }
        self.call_depth += 1;
        let result = f(self, gc);
        self.call_depth -= 1;
        result
    }

    /// Perform a garbage collection.
    ///
    /// Collection only happens between native calls: while a getter, setter,
    /// trap or host callback is running the request is ignored, as the
    /// protocol frames below it hold unrooted handles.
    pub fn gc(&mut self, _gc: GcScope) {
        if self.options.disable_gc {
            return;
        }
        if self.call_depth > 0 {
            log::trace!("Garbage collection deferred inside a native call");
            return;
        }
        heap_gc(self);
    }

    /// Number of live heap allocations.
    pub fn heap_size(&self) -> usize {
        self.heap.alloc_counter()
    }

    /// Number of heap slots, including the ones freed by earlier collections
    /// and waiting to be reused.
    pub fn heap_slot_count(&self) -> usize {
        self.heap.slot_count()
    }
}
