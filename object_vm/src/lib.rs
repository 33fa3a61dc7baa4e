// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Object model of a JavaScript engine
//!
//! Hidden classes ([`Shape`](ecmascript::builtins::ordinary::shape::Shape)),
//! named and indexed property storage, the property access protocol and the
//! Proxy exotic object. Everything is reached through an
//! [`Agent`](ecmascript::execution::Agent) which owns the heap.

pub mod ecmascript;
pub mod engine;
pub mod heap;
