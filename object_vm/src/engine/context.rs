// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::marker::PhantomData;

/// # ZST type representing access to the garbage collector.
///
/// Holding a `GcScope` borrowing this token is required for anything that
/// may end up running a garbage collection.
// Note: non-exhaustive to make sure this is not constructable on the outside.
#[non_exhaustive]
#[derive(Debug)]
pub struct GcToken;

/// # ZST type representing a native call scope
///
/// Scoped roots are bound to the lifetime of this token.
// Note: non-exhaustive to make sure this is not constructable on the outside.
#[non_exhaustive]
#[derive(Debug)]
pub struct ScopeToken;

/// # Access to garbage collector
///
/// Holding this token is required for garbage collection and for calling
/// into JavaScript: getters, setters, proxy traps and host callbacks can all
/// trigger a collection.
#[derive(Debug)]
pub struct GcScope<'a, 'b> {
    _gc_marker: PhantomData<&'a mut GcToken>,
    _scope_marker: PhantomData<&'b ScopeToken>,
}

/// # Access to the heap without garbage collection
///
/// Holding this token guarantees that no collection happens while it is
/// alive. Creating exceptions and scoped roots require one.
#[derive(Debug, Clone, Copy)]
pub struct NoGcScope<'a, 'b> {
    _gc_marker: PhantomData<&'a GcToken>,
    _scope_marker: PhantomData<&'b ScopeToken>,
}

impl<'a, 'b> GcScope<'a, 'b> {
    /// Only one GcScope root should be alive at any point in time; the
    /// caller creates a new root only when a new native call stack is
    /// entered from the embedder.
    #[inline]
    pub(crate) fn create_root() -> (GcToken, ScopeToken) {
        (GcToken, ScopeToken)
    }

    #[inline]
    pub(crate) fn new(_: &'a mut GcToken, _: &'b mut ScopeToken) -> Self {
        Self {
            _gc_marker: PhantomData,
            _scope_marker: PhantomData,
        }
    }

    #[inline]
    pub fn reborrow(&mut self) -> GcScope<'_, 'b> {
        GcScope {
            _gc_marker: PhantomData,
            _scope_marker: PhantomData,
        }
    }

    #[inline]
    pub fn nogc(&self) -> NoGcScope<'_, 'b> {
        NoGcScope {
            _gc_marker: PhantomData,
            _scope_marker: PhantomData,
        }
    }

    #[inline]
    pub fn into_nogc(self) -> NoGcScope<'a, 'b> {
        NoGcScope {
            _gc_marker: PhantomData,
            _scope_marker: PhantomData,
        }
    }
}
