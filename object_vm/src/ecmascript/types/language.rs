// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod function;
mod object;
mod string;
mod symbol;
mod value;

pub use function::{ArgumentsList, Function, FunctionHeapData};
pub(crate) use object::IndexedSet;
pub use object::{
    IndexedStorage, InternalMethods, MAX_ARRAY_INDEX, Object, ObjectFlags, ObjectHeapData,
    ObjectKind, OwnKeysFlags, PropOpFlags, PropertyFlags, PropertyKey, PropertyStorage,
    PropertyValue,
};
pub use string::{String, StringHeapData};
pub use symbol::{Symbol, SymbolHeapData};
pub use value::Value;
