// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [7.2 Testing and Comparison Operations](https://tc39.es/ecma262/#sec-testing-and-comparison-operations)

use crate::{
    ecmascript::{
        builtins::proxy::Proxy,
        execution::{Agent, ExceptionType, JsResult},
        types::{Function, InternalMethods, Object, ObjectKind, Value},
    },
    engine::context::{GcScope, NoGcScope},
};

/// ### [7.2.2 IsArray ( argument )](https://tc39.es/ecma262/#sec-isarray)
///
/// The abstract operation IsArray takes argument argument (an ECMAScript
/// language value) and returns either a normal completion containing a
/// Boolean or a throw completion. Proxies are looked through to their
/// target; a revoked proxy throws.
pub fn is_array(agent: &mut Agent, argument: Value, gc: NoGcScope) -> JsResult<bool> {
    // 1. If argument is not an Object, return false.
    let Value::Object(mut object) = argument else {
        return Ok(false);
    };
    loop {
        let target = match &agent[object].kind {
            // 2. If argument is an Array exotic object, return true.
            ObjectKind::Array => return Ok(true),
            // 3. If argument is a Proxy exotic object, then
            ObjectKind::Proxy(data) => data.target,
            // 4. Return false.
            _ => return Ok(false),
        };
        // a. Perform ? ValidateNonRevokedProxy(argument).
        let Some(target) = target else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Cannot perform 'IsArray' on a proxy that has been revoked",
                gc,
            ));
        };
        // b. Let proxyTarget be argument.[[ProxyTarget]].
        // c. Return ? IsArray(proxyTarget).
        object = target;
    }
}

/// ### [7.2.3 IsCallable ( argument )](https://tc39.es/ecma262/#sec-iscallable)
///
/// Returns the argument as a [`Function`] if it has a `[[Call]]` internal
/// method.
pub fn is_callable(agent: &Agent, argument: Value) -> Option<Function> {
    // 1. If argument is not an Object, return false.
    let Value::Object(object) = argument else {
        return None;
    };
    // 2. If argument has a [[Call]] internal method, return true.
    // 3. Return false.
    match &agent[object].kind {
        ObjectKind::Function(_) => Some(Function::from_object_unchecked(object)),
        ObjectKind::Proxy(data) if data.is_callable => Some(Function::from_object_unchecked(object)),
        _ => None,
    }
}

/// ### [7.2.4 IsConstructor ( argument )](https://tc39.es/ecma262/#sec-isconstructor)
pub fn is_constructor(agent: &Agent, argument: Value) -> Option<Function> {
    is_callable(agent, argument).filter(|f| f.is_constructor(agent))
}

/// ### [7.2.5 IsExtensible ( O )](https://tc39.es/ecma262/#sec-isextensible-o)
pub fn is_extensible(agent: &mut Agent, o: Object, gc: GcScope) -> JsResult<bool> {
    // 1. Return ? O.[[IsExtensible]]().
    if o.is_proxy(agent) {
        Proxy::from_object_unchecked(o).internal_is_extensible(agent, gc)
    } else {
        Ok(agent[o].is_extensible())
    }
}

/// ### [7.2.9 SameValue ( x, y )](https://tc39.es/ecma262/#sec-samevalue)
///
/// The abstract operation SameValue takes arguments x (an ECMAScript
/// language value) and y (an ECMAScript language value) and returns a
/// Boolean. It determines whether or not the two arguments are the same
/// value: NaN is the same as NaN, +0 is not the same as -0.
pub fn same_value(x: Value, y: Value) -> bool {
    match (x, y) {
        // 2. If x is a Number, then
        //    a. Return Number::sameValue(x, y).
        (Value::Number(x), Value::Number(y)) => {
            if x.is_nan() && y.is_nan() {
                return true;
            }
            x == y && x.is_sign_negative() == y.is_sign_negative()
        }
        // 3. Return SameValueNonNumber(x, y).
        _ => same_value_non_number(x, y),
    }
}

/// ### [7.2.10 SameValueZero ( x, y )](https://tc39.es/ecma262/#sec-samevaluezero)
pub fn same_value_zero(x: Value, y: Value) -> bool {
    match (x, y) {
        (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
        _ => same_value_non_number(x, y),
    }
}

/// ### [7.2.11 SameValueNonNumber ( x, y )](https://tc39.es/ecma262/#sec-samevaluenonnumber)
///
/// Strings are interned, so handle equality is content equality.
fn same_value_non_number(x: Value, y: Value) -> bool {
    match (x, y) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x == y,
        (Value::Object(x), Value::Object(y)) => x == y,
        _ => false,
    }
}
