// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # [7 Abstract Operations](https://tc39.es/ecma262/#sec-abstract-operations)
//!
//! The subset of the language's abstract operations that the object model
//! needs: property access helpers built on the internal methods, calls and
//! constructs, integrity levels, comparisons and the primitive conversions
//! used by `length` and property key handling.

pub mod operations_on_objects;
pub mod testing_and_comparison;
pub mod type_conversion;
