// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    ecmascript::{
        abstract_operations::type_conversion::number_to_string,
        execution::Agent,
        types::{String, Symbol, Value},
    },
    heap::{HeapMarkAndSweep, WorkQueues},
};

/// Largest valid array index, 2^32 - 2.
pub const MAX_ARRAY_INDEX: u32 = u32::MAX - 1;

/// ### [6.1.7 The Object Type](https://tc39.es/ecma262/#sec-object-type) property key
///
/// Strings that are canonical array indices are always represented as
/// `Integer`; a `String` key never parses as an array index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Integer(u32),
    String(String),
    Symbol(Symbol),
}

impl PropertyKey {
    pub fn from_str(agent: &mut Agent, str: &str) -> Self {
        match parse_array_index(str) {
            Some(index) => PropertyKey::Integer(index),
            None => PropertyKey::String(String::from_str(agent, str)),
        }
    }

    pub fn from_string(agent: &Agent, string: String) -> Self {
        match string.as_str(agent).and_then(parse_array_index) {
            Some(index) => PropertyKey::Integer(index),
            None => PropertyKey::String(string),
        }
    }

    pub fn from_number(agent: &mut Agent, number: f64) -> Self {
        // -0 stringifies to "0".
        if number.fract() == 0.0 && (0.0..=MAX_ARRAY_INDEX as f64).contains(&number) {
            return PropertyKey::Integer(number as u32);
        }
        let string = number_to_string(agent, number);
        PropertyKey::String(string)
    }

    pub fn is_array_index(self) -> bool {
        matches!(self, PropertyKey::Integer(_))
    }

    pub fn as_array_index(self) -> Option<u32> {
        match self {
            PropertyKey::Integer(index) => Some(index),
            _ => None,
        }
    }

    pub fn is_symbol(self) -> bool {
        matches!(self, PropertyKey::Symbol(_))
    }

    /// Convert back into a language value: array indices become their
    /// canonical string.
    pub fn into_value(self, agent: &mut Agent) -> Value {
        match self {
            PropertyKey::Integer(index) => Value::from_str(agent, &index.to_string()),
            PropertyKey::String(s) => Value::String(s),
            PropertyKey::Symbol(s) => Value::Symbol(s),
        }
    }

    /// Human readable form used in error messages.
    pub fn to_display(self, agent: &Agent) -> std::string::String {
        match self {
            PropertyKey::Integer(index) => index.to_string(),
            PropertyKey::String(s) => s.to_string_lossy(agent),
            PropertyKey::Symbol(s) => s.descriptive_string(agent),
        }
    }
}

impl From<u32> for PropertyKey {
    fn from(value: u32) -> Self {
        debug_assert!(value <= MAX_ARRAY_INDEX);
        PropertyKey::Integer(value)
    }
}

impl From<Symbol> for PropertyKey {
    fn from(value: Symbol) -> Self {
        PropertyKey::Symbol(value)
    }
}

/// Parse a canonical array index: `"0"` or a digit string without leading
/// zeroes whose value is at most 2^32 - 2.
pub(crate) fn parse_array_index(str: &str) -> Option<u32> {
    let bytes = str.as_bytes();
    if bytes.is_empty() || bytes.len() > 10 {
        return None;
    }
    if bytes[0] == b'0' {
        return (bytes.len() == 1).then_some(0);
    }
    let mut value: u64 = 0;
    for &byte in bytes {
        if !byte.is_ascii_digit() {
            return None;
        }
        value = value * 10 + u64::from(byte - b'0');
    }
    if value > u64::from(MAX_ARRAY_INDEX) {
        return None;
    }
    Some(value as u32)
}

impl HeapMarkAndSweep for PropertyKey {
    fn mark_values(&self, queues: &mut WorkQueues) {
        match *self {
            PropertyKey::Integer(_) => {}
            PropertyKey::String(s) => queues.strings.push(s),
            PropertyKey::Symbol(s) => queues.symbols.push(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_array_index;

    #[test]
    fn canonical_array_indices() {
        assert_eq!(parse_array_index("0"), Some(0));
        assert_eq!(parse_array_index("10000000"), Some(10_000_000));
        assert_eq!(parse_array_index("4294967294"), Some(4_294_967_294));
        assert_eq!(parse_array_index("4294967295"), None);
        assert_eq!(parse_array_index("01"), None);
        assert_eq!(parse_array_index("-1"), None);
        assert_eq!(parse_array_index("1.5"), None);
        assert_eq!(parse_array_index(""), None);
        assert_eq!(parse_array_index("99999999999"), None);
    }
}
