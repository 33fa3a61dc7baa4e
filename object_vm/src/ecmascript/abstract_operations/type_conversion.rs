// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [7.1 Type Conversion](https://tc39.es/ecma262/#sec-type-conversion)
//!
//! The conversions needed by the object model: primitives to property keys,
//! array lengths and booleans. Objects convert through their `valueOf` and
//! `toString` methods; there are no well-known symbols and therefore no
//! `@@toPrimitive` lookup.

use num_traits::ToPrimitive;

use super::{
    operations_on_objects::{call_function, get},
    testing_and_comparison::is_callable,
};
use crate::{
    ecmascript::{
        execution::{Agent, ExceptionType, JsResult},
        types::{Object, PropertyKey, String, Value},
    },
    engine::context::GcScope,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredType {
    String = 1,
    Number,
}

/// ### [7.1.1 ToPrimitive ( input \[ , preferredType \] )](https://tc39.es/ecma262/#sec-toprimitive)
///
/// The abstract operation ToPrimitive takes argument input (an ECMAScript
/// language value) and optional argument preferredType (STRING or NUMBER) and
/// returns either a normal completion containing an ECMAScript language value
/// or a throw completion. It converts its input argument to a non-Object type.
pub fn to_primitive(
    agent: &mut Agent,
    input: Value,
    preferred_type: Option<PreferredType>,
    gc: GcScope,
) -> JsResult<Value> {
    // 1. If input is an Object, then
    match input {
        // c. If preferredType is not present, let preferredType be NUMBER.
        // d. Return ? OrdinaryToPrimitive(input, preferredType).
        Value::Object(input) => ordinary_to_primitive(
            agent,
            input,
            preferred_type.unwrap_or(PreferredType::Number),
            gc,
        ),
        // 2. Return input.
        _ => Ok(input),
    }
}

/// #### [7.1.1.1 OrdinaryToPrimitive ( O, hint )](https://tc39.es/ecma262/#sec-ordinarytoprimitive)
pub fn ordinary_to_primitive(
    agent: &mut Agent,
    o: Object,
    hint: PreferredType,
    mut gc: GcScope,
) -> JsResult<Value> {
    let names = agent.predefined();
    let to_string_key = PropertyKey::String(names.to_string);
    let value_of_key = PropertyKey::String(names.value_of);
    let method_names = match hint {
        // 1. If hint is STRING, then
        //    a. Let methodNames be « "toString", "valueOf" ».
        PreferredType::String => [to_string_key, value_of_key],
        // 2. Else,
        //    a. Let methodNames be « "valueOf", "toString" ».
        PreferredType::Number => [value_of_key, to_string_key],
    };
    // 3. For each element name of methodNames, do
    for name in method_names {
        // a. Let method be ? Get(O, name).
        let method = get(agent, o, name, gc.reborrow())?;
        // b. If IsCallable(method) is true, then
        if let Some(method) = is_callable(agent, method) {
            // i. Let result be ? Call(method, O).
            let result = call_function(agent, method, Value::Object(o), None, gc.reborrow())?;
            // ii. If result is not an Object, return result.
            if !result.is_object() {
                return Ok(result);
            }
        }
    }
    // 4. Throw a TypeError exception.
    Err(agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "Cannot convert object to primitive value",
        gc.nogc(),
    ))
}

/// ### [7.1.2 ToBoolean ( argument )](https://tc39.es/ecma262/#sec-toboolean)
pub fn to_boolean(agent: &Agent, argument: Value) -> bool {
    match argument {
        // 1. If argument is a Boolean, return argument.
        Value::Boolean(value) => value,
        // 2. If argument is one of undefined, null, +0𝔽, -0𝔽, NaN, 0ℤ, or the
        //    empty String, return false.
        Value::Undefined | Value::Null => false,
        Value::Number(value) => !(value == 0.0 || value.is_nan()),
        Value::String(value) => !value.is_empty(agent),
        // 4. Return true.
        Value::Symbol(_) | Value::Object(_) => true,
    }
}

/// ### [7.1.4 ToNumber ( argument )](https://tc39.es/ecma262/#sec-tonumber)
pub fn to_number(agent: &mut Agent, argument: Value, mut gc: GcScope) -> JsResult<f64> {
    let primitive = match argument {
        Value::Object(_) => {
            // 7. Assert: argument is an Object.
            // 8. Let primValue be ? ToPrimitive(argument, NUMBER).
            // 9. Assert: primValue is not an Object.
            // 10. Return ? ToNumber(primValue).
            to_primitive(agent, argument, Some(PreferredType::Number), gc.reborrow())?
        }
        _ => argument,
    };
    match primitive {
        // 1. If argument is a Number, return argument.
        Value::Number(value) => Ok(value),
        // 2. If argument is either a Symbol or a BigInt, throw a TypeError exception.
        Value::Symbol(_) => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert a Symbol value to a number",
            gc.nogc(),
        )),
        // 3. If argument is undefined, return NaN.
        Value::Undefined => Ok(f64::NAN),
        // 4. If argument is either null or false, return +0𝔽.
        Value::Null | Value::Boolean(false) => Ok(0.0),
        // 5. If argument is true, return 1𝔽.
        Value::Boolean(true) => Ok(1.0),
        // 6. If argument is a String, return StringToNumber(argument).
        Value::String(value) => Ok(string_to_number(&value.to_string_lossy(agent))),
        Value::Object(_) => unreachable!("ToPrimitive returned an object"),
    }
}

fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{9}'
            | '\u{a}'
            | '\u{b}'
            | '\u{c}'
            | '\u{d}'
            | ' '
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

/// ### [7.1.4.1.1 StringToNumber ( str )](https://tc39.es/ecma262/#sec-stringtonumber)
pub fn string_to_number(str: &str) -> f64 {
    let str = str.trim_matches(is_js_whitespace);
    // StrWhiteSpace_opt
    if str.is_empty() {
        return 0.0;
    }
    match str {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // NonDecimalIntegerLiteral
    let bytes = str.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' {
        let radix = match bytes[1] {
            b'x' | b'X' => Some(16),
            b'o' | b'O' => Some(8),
            b'b' | b'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            let mut value = 0.0f64;
            for c in str[2..].chars() {
                let Some(digit) = c.to_digit(radix) else {
                    return f64::NAN;
                };
                value = value * f64::from(radix) + f64::from(digit);
            }
            return value;
        }
    }
    // StrDecimalLiteral; the float parser also accepts "inf" and "nan" which
    // are not numeric literals.
    if !bytes
        .iter()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return f64::NAN;
    }
    fast_float::parse::<f64, _>(str).unwrap_or(f64::NAN)
}

/// ### [7.1.5 ToIntegerOrInfinity ( argument )](https://tc39.es/ecma262/#sec-tointegerorinfinity)
pub fn to_integer_or_infinity(agent: &mut Agent, argument: Value, gc: GcScope) -> JsResult<f64> {
    // 1. Let number be ? ToNumber(argument).
    let number = to_number(agent, argument, gc)?;
    // 2. If number is one of NaN, +0𝔽, or -0𝔽, return 0.
    if number.is_nan() || number == 0.0 {
        return Ok(0.0);
    }
    // 3. If number is one of +∞𝔽 or -∞𝔽, return number.
    // 4. Let integer be floor(abs(ℝ(number))).
    // 5. If number < +0𝔽, set integer to -integer.
    // 6. Return integer.
    Ok(number.trunc())
}

/// ### [7.1.7 ToUint32 ( argument )](https://tc39.es/ecma262/#sec-touint32)
pub fn to_uint32(agent: &mut Agent, argument: Value, gc: GcScope) -> JsResult<u32> {
    // 1. Let number be ? ToNumber(argument).
    let number = to_number(agent, argument, gc)?;
    Ok(to_uint32_number(number))
}

/// ToUint32 steps 2-5 on an already converted Number.
pub fn to_uint32_number(number: f64) -> u32 {
    // 2. If number is not finite or number is either +0𝔽 or -0𝔽, return +0𝔽.
    if !number.is_finite() || number == 0.0 {
        return 0;
    }
    // 3. Let int be truncate(ℝ(number)).
    // 4. Let int32bit be int modulo 2**32.
    // 5. Return 𝔽(int32bit).
    number
        .trunc()
        .rem_euclid(4_294_967_296.0)
        .to_u32()
        .unwrap_or(0)
}

/// ### [7.1.17 ToString ( argument )](https://tc39.es/ecma262/#sec-tostring)
pub fn to_string(agent: &mut Agent, argument: Value, mut gc: GcScope) -> JsResult<String> {
    let primitive = match argument {
        // 10. Let primValue be ? ToPrimitive(argument, STRING).
        // 12. Return ? ToString(primValue).
        Value::Object(_) => {
            to_primitive(agent, argument, Some(PreferredType::String), gc.reborrow())?
        }
        _ => argument,
    };
    match primitive {
        // 1. If argument is a String, return argument.
        Value::String(value) => Ok(value),
        // 2. If argument is a Symbol, throw a TypeError exception.
        Value::Symbol(_) => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert a Symbol value to a string",
            gc.nogc(),
        )),
        // 3. If argument is undefined, return "undefined".
        Value::Undefined => Ok(String::from_str(agent, "undefined")),
        // 4. If argument is null, return "null".
        Value::Null => Ok(String::from_str(agent, "null")),
        // 5. If argument is true, return "true".
        // 6. If argument is false, return "false".
        Value::Boolean(value) => Ok(String::from_str(agent, if value { "true" } else { "false" })),
        // 7. If argument is a Number, return Number::toString(argument, 10).
        Value::Number(value) => Ok(number_to_string(agent, value)),
        Value::Object(_) => unreachable!("ToPrimitive returned an object"),
    }
}

/// ### [6.1.6.1.20 Number::toString ( x, radix )](https://tc39.es/ecma262/#sec-numeric-types-number-tostring)
///
/// Radix 10 only.
pub fn number_to_string(agent: &mut Agent, x: f64) -> String {
    let mut buffer = ryu_js::Buffer::new();
    let str = buffer.format(x);
    String::from_str(agent, str)
}

/// ### [7.1.19 ToPropertyKey ( argument )](https://tc39.es/ecma262/#sec-topropertykey)
pub fn to_property_key(agent: &mut Agent, argument: Value, mut gc: GcScope) -> JsResult<PropertyKey> {
    // Fast paths that need no user code.
    match argument {
        Value::String(string) => return Ok(PropertyKey::from_string(agent, string)),
        Value::Symbol(symbol) => return Ok(PropertyKey::Symbol(symbol)),
        Value::Number(number) => return Ok(PropertyKey::from_number(agent, number)),
        _ => {}
    }
    // 1. Let key be ? ToPrimitive(argument, STRING).
    let key = to_primitive(agent, argument, Some(PreferredType::String), gc.reborrow())?;
    // 2. If key is a Symbol, then
    //    a. Return key.
    if let Value::Symbol(symbol) = key {
        return Ok(PropertyKey::Symbol(symbol));
    }
    // 3. Return ! ToString(key).
    let string = to_string(agent, key, gc)?;
    Ok(PropertyKey::from_string(agent, string))
}

/// ### [7.1.20 ToLength ( argument )](https://tc39.es/ecma262/#sec-tolength)
pub fn to_length(agent: &mut Agent, argument: Value, gc: GcScope) -> JsResult<u64> {
    // 1. Let len be ? ToIntegerOrInfinity(argument).
    let len = to_integer_or_infinity(agent, argument, gc)?;
    // 2. If len ≤ 0, return +0𝔽.
    if len <= 0.0 {
        return Ok(0);
    }
    // 3. Return 𝔽(min(len, 2**53 - 1)).
    Ok(len.min(9_007_199_254_740_991.0) as u64)
}

#[cfg(test)]
mod tests {
    use super::{string_to_number, to_uint32_number};

    #[test]
    fn string_to_number_follows_numeric_literal_grammar() {
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("  \n42\t"), 42.0);
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert_eq!(string_to_number("+Infinity"), f64::INFINITY);
        assert_eq!(string_to_number("0x1f"), 31.0);
        assert_eq!(string_to_number("0b101"), 5.0);
        assert_eq!(string_to_number("1e3"), 1000.0);
        assert_eq!(string_to_number(".5"), 0.5);
        assert!(string_to_number("inf").is_nan());
        assert!(string_to_number("nan").is_nan());
        assert!(string_to_number("12px").is_nan());
        assert!(string_to_number("-0x10").is_nan());
    }

    #[test]
    fn to_uint32_wraps_modulo_two_to_the_32() {
        assert_eq!(to_uint32_number(-1.0), u32::MAX);
        assert_eq!(to_uint32_number(4_294_967_296.0), 0);
        assert_eq!(to_uint32_number(3.7), 3);
        assert_eq!(to_uint32_number(f64::NAN), 0);
        assert_eq!(to_uint32_number(f64::INFINITY), 0);
    }
}
