// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod accessor;
pub mod arguments;
pub mod array;
pub mod bound_function;
pub mod builtin_function;
pub mod host_object;
pub mod ordinary;
pub mod proxy;

pub use accessor::Accessor;
pub use arguments::create_arguments_object;
pub use array::{Array, array_create, create_array_from_list};
pub use bound_function::bound_function_create;
pub use builtin_function::{Behaviour, builtin_function, create_builtin_function};
pub use host_object::{HostObject, host_object_create};
pub use proxy::{Proxy, proxy_create, proxy_revocable};
