// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod language;
mod spec;

pub use language::{
    ArgumentsList, Function, FunctionHeapData, IndexedStorage, InternalMethods, MAX_ARRAY_INDEX,
    Object, ObjectFlags, ObjectHeapData, ObjectKind, OwnKeysFlags, PropOpFlags, PropertyFlags,
    PropertyKey, PropertyStorage, PropertyValue, String, StringHeapData, Symbol, SymbolHeapData,
    Value,
};
pub(crate) use language::IndexedSet;
pub use spec::PropertyDescriptor;
