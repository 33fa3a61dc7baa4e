// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::Proxy;
use crate::{
    ecmascript::{
        abstract_operations::testing_and_comparison::is_callable,
        execution::{Agent, ExceptionType, JsResult},
        types::{Function, InternalMethods, Object, PropertyKey, String, Value},
    },
    engine::context::{GcScope, NoGcScope},
};

/// Target and handler of a proxy that has not been revoked.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NonRevokedProxy {
    pub(crate) target: Object,
    pub(crate) handler: Object,
}

/// ### [10.5.14 ValidateNonRevokedProxy ( proxy )](https://tc39.es/ecma262/#sec-validatenonrevokedproxy)
///
/// The abstract operation ValidateNonRevokedProxy takes argument
/// proxy (a Proxy exotic object) and returns either a normal completion containing unused or a throw completion.
/// It throws a TypeError exception if proxy has been revoked.
pub(crate) fn validate_non_revoked_proxy(
    agent: &mut Agent,
    proxy: Proxy,
    gc: NoGcScope,
) -> JsResult<NonRevokedProxy> {
    let proxy_data = &agent[proxy];
    let (target, handler) = (proxy_data.target, proxy_data.handler);

    // 1. If proxy.[[ProxyTarget]] is null, throw a TypeError exception.
    let Some(target) = target else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Proxy target is missing",
            gc,
        ));
    };

    // 2. Assert: proxy.[[ProxyHandler]] is not null.
    let Some(handler) = handler else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Proxy handler is missing",
            gc,
        ));
    };

    // 3. Return unused.
    Ok(NonRevokedProxy { target, handler })
}

/// GetMethod(handler, name) for a proxy trap.
pub(crate) fn get_trap(
    agent: &mut Agent,
    handler: Object,
    name: String,
    mut gc: GcScope,
) -> JsResult<Option<Function>> {
    // 1. Let func be ? GetV(V, P).
    let func = handler.internal_get(
        agent,
        PropertyKey::String(name),
        Value::Object(handler),
        gc.reborrow(),
    )?;
    // 2. If func is either undefined or null, return undefined.
    if func.is_undefined() || func.is_null() {
        return Ok(None);
    }
    // 3. If IsCallable(func) is false, throw a TypeError exception.
    match is_callable(agent, func) {
        // 4. Return func.
        Some(func) => Ok(Some(func)),
        None => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Proxy trap is not a function",
            gc.nogc(),
        )),
    }
}
