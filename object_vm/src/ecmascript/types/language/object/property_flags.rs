// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::{
    fmt::Debug,
    ops::{BitOr, BitOrAssign},
};

/// Per-property flags stored in a [`Shape`](crate::ecmascript::builtins::ordinary::shape::Shape).
///
/// The last three flags never appear in a shape: they mark descriptors
/// synthesized for host objects, indexed storage elements and proxies.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PropertyFlags(u8);

impl PropertyFlags {
    pub const ENUMERABLE: Self = Self(1 << 0);
    pub const WRITABLE: Self = Self(1 << 1);
    pub const CONFIGURABLE: Self = Self(1 << 2);
    /// The slot holds an [`Accessor`](crate::ecmascript::builtins::accessor::Accessor)
    /// pair instead of a value.
    pub const ACCESSOR: Self = Self(1 << 3);
    /// Writes are routed through a native setter; used by array `length`.
    pub const INTERNAL_SETTER: Self = Self(1 << 4);
    pub const HOST_OBJECT: Self = Self(1 << 5);
    pub const INDEXED: Self = Self(1 << 6);
    pub const PROXY_OBJECT: Self = Self(1 << 7);

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Flags of a property created by a plain assignment.
    pub const fn default_new_property() -> Self {
        Self(Self::ENUMERABLE.0 | Self::WRITABLE.0 | Self::CONFIGURABLE.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn with(self, other: Self, value: bool) -> Self {
        if value {
            Self(self.0 | other.0)
        } else {
            Self(self.0 & !other.0)
        }
    }

    pub const fn enumerable(self) -> bool {
        self.contains(Self::ENUMERABLE)
    }

    pub const fn writable(self) -> bool {
        self.contains(Self::WRITABLE)
    }

    pub const fn configurable(self) -> bool {
        self.contains(Self::CONFIGURABLE)
    }

    pub const fn accessor(self) -> bool {
        self.contains(Self::ACCESSOR)
    }

    pub const fn internal_setter(self) -> bool {
        self.contains(Self::INTERNAL_SETTER)
    }

    pub const fn host_object(self) -> bool {
        self.contains(Self::HOST_OBJECT)
    }

    pub const fn indexed(self) -> bool {
        self.contains(Self::INDEXED)
    }

    pub const fn proxy_object(self) -> bool {
        self.contains(Self::PROXY_OBJECT)
    }
}

impl BitOr for PropertyFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PropertyFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl Debug for PropertyFlags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names = [
            (Self::ENUMERABLE, "enumerable"),
            (Self::WRITABLE, "writable"),
            (Self::CONFIGURABLE, "configurable"),
            (Self::ACCESSOR, "accessor"),
            (Self::INTERNAL_SETTER, "internalSetter"),
            (Self::HOST_OBJECT, "hostObject"),
            (Self::INDEXED, "indexed"),
            (Self::PROXY_OBJECT, "proxyObject"),
        ];
        let mut set = f.debug_set();
        for (flag, name) in names {
            if self.contains(flag) {
                set.entry(&format_args!("{name}"));
            }
        }
        set.finish()
    }
}
