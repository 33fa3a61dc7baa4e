// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::marker::PhantomData;

use crate::{
    ecmascript::execution::Agent,
    engine::{context::NoGcScope, rootable::Rootable},
};

/// # Scoped heap root
///
/// This type roots a heap-allocated JavaScript engine value for the duration
/// of the current root scope, roughly corresponding to a native call scope.
/// Rooted values cannot be garbage collected, so accessing the rooted value
/// is always safe within the scope. This type is intended for cheap rooting
/// of values that need to be used after calling into functions that may
/// trigger garbage collection.
#[derive(Debug, Hash)]
pub struct Scoped<'a, T: 'static + Rootable> {
    index: usize,
    _marker: PhantomData<T>,
    _scope: PhantomData<&'a ()>,
}

impl<'scope, T: 'static + Rootable> Scoped<'scope, T> {
    pub fn new(agent: &Agent, value: T, _gc: NoGcScope<'_, 'scope>) -> Self {
        let mut stack_refs = agent.stack_refs.borrow_mut();
        let index = stack_refs.len();
        stack_refs.push(value.into_root_value());
        Self {
            index,
            _marker: PhantomData,
            _scope: PhantomData,
        }
    }

    pub fn get(&self, agent: &Agent) -> T {
        let Some(&value) = agent.stack_refs.borrow().get(self.index) else {
            handle_bound_check_failure()
        };
        let Some(value) = T::from_root_value(value) else {
            handle_invalid_local_conversion()
        };
        value
    }

    /// Replace the rooted value in place.
    pub fn replace(&self, agent: &Agent, value: T) {
        let mut stack_refs = agent.stack_refs.borrow_mut();
        let Some(slot) = stack_refs.get_mut(self.index) else {
            handle_bound_check_failure()
        };
        *slot = value.into_root_value();
    }
}

#[cold]
#[inline(never)]
fn handle_bound_check_failure() -> ! {
    panic!("Attempted to access dropped Scoped Value")
}

#[cold]
#[inline(never)]
fn handle_invalid_local_conversion() -> ! {
    panic!("Attempted to convert mismatched Scoped Value")
}
