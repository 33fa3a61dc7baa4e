// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [10.5 Proxy Object Internal Methods and Internal Slots](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots)
//!
//! Every internal method of a proxy runs as a nested native call, so that
//! arbitrarily deep proxy chains hit the call depth limit instead of
//! exhausting the native stack.

pub(crate) mod abstract_operations;
pub mod data;

use std::ops::{Index, IndexMut};

use self::{
    abstract_operations::{NonRevokedProxy, get_trap, validate_non_revoked_proxy},
    data::ProxyHeapData,
};
use crate::{
    ecmascript::{
        abstract_operations::{
            operations_on_objects::{
                call_function, construct, create_property_key_list_from_array_like,
            },
            testing_and_comparison::{is_callable, is_extensible, same_value},
            type_conversion::to_boolean,
        },
        builtins::{
            array::create_array_from_list,
            ordinary::{
                add_own_property, is_compatible_property_descriptor, object_create_with_kind,
                ordinary_object_create,
            },
        },
        execution::{Agent, ExceptionType, JsResult},
        types::{
            ArgumentsList, Function, FunctionHeapData, InternalMethods, Object, ObjectKind,
            PropertyDescriptor, PropertyFlags, PropertyKey, PropertyValue, String, Value,
        },
    },
    engine::context::{GcScope, NoGcScope},
    heap::{HeapMarkAndSweep, WorkQueues},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Proxy(Object);

/// Data of the revoke function returned by `Proxy.revocable`.
#[derive(Debug)]
pub struct ProxyRevokerHeapData {
    /// \[\[RevocableProxy\]\]; `None` once the proxy has been revoked.
    pub(crate) revocable_proxy: Option<Proxy>,
}

impl Proxy {
    /// The caller guarantees that `object` is a Proxy exotic object.
    pub(crate) fn from_object_unchecked(object: Object) -> Self {
        Self(object)
    }

    pub fn into_object(self) -> Object {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn is_revoked(self, agent: &Agent) -> bool {
        agent[self].target.is_none()
    }

    /// Sever the proxy from its target and handler. Every later operation on
    /// the proxy throws a TypeError.
    pub fn revoke(self, agent: &mut Agent) {
        log::debug!("Revoking proxy {:?}", self.0);
        let data = &mut agent[self];
        data.target = None;
        data.handler = None;
    }

    /// Run one trap: the common prologue of every proxy internal method.
    fn with_trap<R>(
        self,
        agent: &mut Agent,
        name: impl FnOnce(&mut Agent) -> String,
        gc: GcScope,
        f: impl FnOnce(&mut Agent, NonRevokedProxy, Option<Function>, GcScope) -> JsResult<R>,
    ) -> JsResult<R> {
        agent.with_native_call(gc, |agent, mut gc| {
            // 1. Perform ? ValidateNonRevokedProxy(O).
            // 2. Let target be O.[[ProxyTarget]].
            // 3. Let handler be O.[[ProxyHandler]].
            // 4. Assert: handler is an Object.
            let proxy = validate_non_revoked_proxy(agent, self, gc.nogc())?;
            // 5. Let trap be ? GetMethod(handler, name).
            let name = name(agent);
            let trap = get_trap(agent, proxy.handler, name, gc.reborrow())?;
            f(agent, proxy, trap, gc)
        })
    }

    /// ### [10.5.12 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-call-thisargument-argumentslist)
    pub(crate) fn internal_call(
        self,
        agent: &mut Agent,
        this_argument: Value,
        arguments_list: ArgumentsList,
        gc: GcScope,
    ) -> JsResult<Value> {
        self.with_trap(
            agent,
            |agent| agent.predefined().apply,
            gc,
            |agent, NonRevokedProxy { target, handler }, trap, gc| {
                let target = Function::from_object_unchecked(target);
                // 6. If trap is undefined, then
                let Some(trap) = trap else {
                    // a. Return ? Call(target, thisArgument, argumentsList).
                    return call_function(agent, target, this_argument, Some(arguments_list), gc);
                };
                // 7. Let argArray be CreateArrayFromList(argumentsList).
                let arg_array = create_array_from_list(agent, arguments_list.as_slice());
                // 8. Return ? Call(trap, handler, « target, thisArgument, argArray »).
                call_function(
                    agent,
                    trap,
                    Value::Object(handler),
                    Some(ArgumentsList::new(&[
                        target.into_value(),
                        this_argument,
                        arg_array.into_value(),
                    ])),
                    gc,
                )
            },
        )
    }

    /// ### [10.5.13 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-construct-argumentslist-newtarget)
    pub(crate) fn internal_construct(
        self,
        agent: &mut Agent,
        arguments_list: ArgumentsList,
        new_target: Function,
        gc: GcScope,
    ) -> JsResult<Object> {
        self.with_trap(
            agent,
            |agent| agent.predefined().construct,
            gc,
            |agent, NonRevokedProxy { target, handler }, trap, mut gc| {
                // 5. Assert: IsConstructor(target) is true.
                let target = Function::from_object_unchecked(target);
                // 7. If trap is undefined, then
                let Some(trap) = trap else {
                    // a. Return ? Construct(target, argumentsList, newTarget).
                    return construct(agent, target, Some(arguments_list), Some(new_target), gc);
                };
                // 8. Let argArray be CreateArrayFromList(argumentsList).
                let arg_array = create_array_from_list(agent, arguments_list.as_slice());
                // 9. Let newObj be ? Call(trap, handler, « target, argArray, newTarget »).
                let new_obj = call_function(
                    agent,
                    trap,
                    Value::Object(handler),
                    Some(ArgumentsList::new(&[
                        target.into_value(),
                        arg_array.into_value(),
                        new_target.into_value(),
                    ])),
                    gc.reborrow(),
                )?;
                // 10. If newObj is not an Object, throw a TypeError exception.
                match new_obj {
                    // 11. Return newObj.
                    Value::Object(new_obj) => Ok(new_obj),
                    _ => Err(agent.throw_exception_with_static_message(
                        ExceptionType::TypeError,
                        "Proxy construct trap must return an object",
                        gc.nogc(),
                    )),
                }
            },
        )
    }
}

fn trap_error<T>(agent: &mut Agent, message: &'static str, gc: NoGcScope) -> JsResult<T> {
    Err(agent.throw_exception_with_static_message(ExceptionType::TypeError, message, gc))
}

impl InternalMethods for Proxy {
    /// ### [10.5.1 \[\[GetPrototypeOf\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-getprototypeof)
    fn internal_get_prototype_of(self, agent: &mut Agent, gc: GcScope) -> JsResult<Option<Object>> {
        self.with_trap(
            agent,
            |agent| agent.predefined().get_prototype_of,
            gc,
            |agent, NonRevokedProxy { target, handler }, trap, mut gc| {
                // 6. If trap is undefined, then
                let Some(trap) = trap else {
                    // a. Return ? target.[[GetPrototypeOf]]().
                    return target.internal_get_prototype_of(agent, gc);
                };
                // 7. Let handlerProto be ? Call(trap, handler, « target »).
                let handler_proto = call_function(
                    agent,
                    trap,
                    Value::Object(handler),
                    Some(ArgumentsList::new(&[Value::Object(target)])),
                    gc.reborrow(),
                )?;
                // 8. If handlerProto is not an Object and handlerProto is not null, throw a TypeError exception.
                let handler_proto = match handler_proto {
                    Value::Null => None,
                    Value::Object(handler_proto) => Some(handler_proto),
                    _ => {
                        return trap_error(
                            agent,
                            "Proxy getPrototypeOf trap returned neither object nor null",
                            gc.nogc(),
                        );
                    }
                };
                // 9. Let extensibleTarget be ? IsExtensible(target).
                // 10. If extensibleTarget is true, return handlerProto.
                if is_extensible(agent, target, gc.reborrow())? {
                    return Ok(handler_proto);
                }
                // 11. Let targetProto be ? target.[[GetPrototypeOf]]().
                let target_proto = target.internal_get_prototype_of(agent, gc.reborrow())?;
                // 12. If SameValue(handlerProto, targetProto) is false, throw a TypeError exception.
                if handler_proto != target_proto {
                    return trap_error(
                        agent,
                        "Proxy getPrototypeOf trap returned a different prototype for a non-extensible target",
                        gc.nogc(),
                    );
                }
                // 13. Return handlerProto.
                Ok(handler_proto)
            },
        )
    }

    /// ### [10.5.2 \[\[SetPrototypeOf\]\] ( V )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-setprototypeof-v)
    fn internal_set_prototype_of(
        self,
        agent: &mut Agent,
        prototype: Option<Object>,
        gc: GcScope,
    ) -> JsResult<bool> {
        self.with_trap(
            agent,
            |agent| agent.predefined().set_prototype_of,
            gc,
            |agent, NonRevokedProxy { target, handler }, trap, mut gc| {
                // 7. If trap is undefined, then
                let Some(trap) = trap else {
                    // a. Return ? target.[[SetPrototypeOf]](V).
                    return target.internal_set_prototype_of(agent, prototype, gc);
                };
                // 8. Let booleanTrapResult be ToBoolean(? Call(trap, handler, « target, V »)).
                let result = call_function(
                    agent,
                    trap,
                    Value::Object(handler),
                    Some(ArgumentsList::new(&[
                        Value::Object(target),
                        prototype.map_or(Value::Null, Value::Object),
                    ])),
                    gc.reborrow(),
                )?;
                // 9. If booleanTrapResult is false, return false.
                if !to_boolean(agent, result) {
                    return Ok(false);
                }
                // 10. Let extensibleTarget be ? IsExtensible(target).
                // 11. If extensibleTarget is true, return true.
                if is_extensible(agent, target, gc.reborrow())? {
                    return Ok(true);
                }
                // 12. Let targetProto be ? target.[[GetPrototypeOf]]().
                let target_proto = target.internal_get_prototype_of(agent, gc.reborrow())?;
                // 13. If SameValue(V, targetProto) is false, throw a TypeError exception.
                if prototype != target_proto {
                    return trap_error(
                        agent,
                        "Proxy setPrototypeOf trap succeeded with a different prototype for a non-extensible target",
                        gc.nogc(),
                    );
                }
                // 14. Return true.
                Ok(true)
            },
        )
    }

    /// ### [10.5.3 \[\[IsExtensible\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-isextensible)
    fn internal_is_extensible(self, agent: &mut Agent, gc: GcScope) -> JsResult<bool> {
        self.with_trap(
            agent,
            |agent| agent.predefined().is_extensible,
            gc,
            |agent, NonRevokedProxy { target, handler }, trap, mut gc| {
                // 6. If trap is undefined, then
                let Some(trap) = trap else {
                    // a. Return ? IsExtensible(target).
                    return is_extensible(agent, target, gc);
                };
                // 7. Let booleanTrapResult be ToBoolean(? Call(trap, handler, « target »)).
                let result = call_function(
                    agent,
                    trap,
                    Value::Object(handler),
                    Some(ArgumentsList::new(&[Value::Object(target)])),
                    gc.reborrow(),
                )?;
                let result = to_boolean(agent, result);
                // 8. Let targetResult be ? IsExtensible(target).
                let target_result = is_extensible(agent, target, gc.reborrow())?;
                // 9. If booleanTrapResult is not targetResult, throw a TypeError exception.
                if result != target_result {
                    return trap_error(
                        agent,
                        "Proxy isExtensible trap result does not reflect extensibility of the target",
                        gc.nogc(),
                    );
                }
                // 10. Return booleanTrapResult.
                Ok(result)
            },
        )
    }

    /// ### [10.5.4 \[\[PreventExtensions\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-preventextensions)
    fn internal_prevent_extensions(self, agent: &mut Agent, gc: GcScope) -> JsResult<bool> {
        self.with_trap(
            agent,
            |agent| agent.predefined().prevent_extensions,
            gc,
            |agent, NonRevokedProxy { target, handler }, trap, mut gc| {
                // 6. If trap is undefined, then
                let Some(trap) = trap else {
                    // a. Return ? target.[[PreventExtensions]]().
                    return target.internal_prevent_extensions(agent, gc);
                };
                // 7. Let booleanTrapResult be ToBoolean(? Call(trap, handler, « target »)).
                let result = call_function(
                    agent,
                    trap,
                    Value::Object(handler),
                    Some(ArgumentsList::new(&[Value::Object(target)])),
                    gc.reborrow(),
                )?;
                let result = to_boolean(agent, result);
                // 8. If booleanTrapResult is true, then
                // a. Let extensibleTarget be ? IsExtensible(target).
                // b. If extensibleTarget is true, throw a TypeError exception.
                if result && is_extensible(agent, target, gc.reborrow())? {
                    return trap_error(
                        agent,
                        "Proxy preventExtensions trap returned true but the target is extensible",
                        gc.nogc(),
                    );
                }
                // 9. Return booleanTrapResult.
                Ok(result)
            },
        )
    }

    /// ### [10.5.5 \[\[GetOwnProperty\]\] ( P )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-getownproperty-p)
    fn internal_get_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        gc: GcScope,
    ) -> JsResult<Option<PropertyDescriptor>> {
        self.with_trap(
            agent,
            |agent| agent.predefined().get_own_property_descriptor,
            gc,
            |agent, NonRevokedProxy { target, handler }, trap, mut gc| {
                // 6. If trap is undefined, then
                let Some(trap) = trap else {
                    // a. Return ? target.[[GetOwnProperty]](P).
                    return target.internal_get_own_property(agent, property_key, gc);
                };
                // 7. Let trapResultObj be ? Call(trap, handler, « target, P »).
                let key = property_key.into_value(agent);
                let trap_result_obj = call_function(
                    agent,
                    trap,
                    Value::Object(handler),
                    Some(ArgumentsList::new(&[Value::Object(target), key])),
                    gc.reborrow(),
                )?;
                // 8. If trapResultObj is not an Object and trapResultObj is not undefined, throw a TypeError exception.
                if !trap_result_obj.is_object() && !trap_result_obj.is_undefined() {
                    return trap_error(
                        agent,
                        "Proxy getOwnPropertyDescriptor trap returned neither object nor undefined",
                        gc.nogc(),
                    );
                }
                // 9. Let targetDesc be ? target.[[GetOwnProperty]](P).
                let target_desc = target.internal_get_own_property(agent, property_key, gc.reborrow())?;
                // 10. If trapResultObj is undefined, then
                if trap_result_obj.is_undefined() {
                    // a. If targetDesc is undefined, return undefined.
                    let Some(target_desc) = target_desc else {
                        return Ok(None);
                    };
                    // b. If targetDesc.[[Configurable]] is false, throw a TypeError exception.
                    if target_desc.configurable == Some(false) {
                        return trap_error(
                            agent,
                            "Proxy getOwnPropertyDescriptor trap hid a non-configurable property",
                            gc.nogc(),
                        );
                    }
                    // c. Let extensibleTarget be ? IsExtensible(target).
                    // d. If extensibleTarget is false, throw a TypeError exception.
                    if !is_extensible(agent, target, gc.reborrow())? {
                        return trap_error(
                            agent,
                            "Proxy getOwnPropertyDescriptor trap hid a property of a non-extensible target",
                            gc.nogc(),
                        );
                    }
                    // e. Return undefined.
                    return Ok(None);
                }
                // 11. Let extensibleTarget be ? IsExtensible(target).
                let extensible_target = is_extensible(agent, target, gc.reborrow())?;
                // 12. Let resultDesc be ? ToPropertyDescriptor(trapResultObj).
                let mut result_desc =
                    PropertyDescriptor::to_property_descriptor(agent, trap_result_obj, gc.reborrow())?;
                // 13. Call CompletePropertyDescriptor(resultDesc).
                result_desc.complete_property_descriptor();
                // 14. Let valid be IsCompatiblePropertyDescriptor(extensibleTarget, resultDesc, targetDesc).
                // 15. If valid is false, throw a TypeError exception.
                if !is_compatible_property_descriptor(
                    extensible_target,
                    &result_desc,
                    target_desc.as_ref(),
                ) {
                    return trap_error(
                        agent,
                        "Proxy getOwnPropertyDescriptor trap returned an incompatible descriptor",
                        gc.nogc(),
                    );
                }
                // 16. If resultDesc.[[Configurable]] is false, then
                if result_desc.configurable == Some(false) {
                    // a. If targetDesc is undefined or targetDesc.[[Configurable]] is true, then
                    match target_desc {
                        None
                        | Some(PropertyDescriptor {
                            configurable: Some(true),
                            ..
                        }) => {
                            // i. Throw a TypeError exception.
                            return trap_error(
                                agent,
                                "Proxy getOwnPropertyDescriptor trap reported non-configurability for a configurable property",
                                gc.nogc(),
                            );
                        }
                        Some(target_desc) => {
                            // b. If resultDesc has a [[Writable]] field and resultDesc.[[Writable]] is false, then
                            // i. Assert: targetDesc has a [[Writable]] field.
                            // ii. If targetDesc.[[Writable]] is true, throw a TypeError exception.
                            if result_desc.writable == Some(false)
                                && target_desc.writable == Some(true)
                            {
                                return trap_error(
                                    agent,
                                    "Proxy getOwnPropertyDescriptor trap reported a writable property as read-only",
                                    gc.nogc(),
                                );
                            }
                        }
                    }
                }
                // 17. Return resultDesc.
                Ok(Some(result_desc))
            },
        )
    }

    /// ### [10.5.6 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-defineownproperty-p-desc)
    fn internal_define_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
        gc: GcScope,
    ) -> JsResult<bool> {
        self.with_trap(
            agent,
            |agent| agent.predefined().define_property,
            gc,
            |agent, NonRevokedProxy { target, handler }, trap, mut gc| {
                // 6. If trap is undefined, then
                let Some(trap) = trap else {
                    // a. Return ? target.[[DefineOwnProperty]](P, Desc).
                    return target.internal_define_own_property(
                        agent,
                        property_key,
                        property_descriptor,
                        gc,
                    );
                };
                // 7. Let descObj be FromPropertyDescriptor(Desc).
                let desc_obj =
                    PropertyDescriptor::from_property_descriptor(Some(property_descriptor), agent)
                        .map_or(Value::Undefined, Value::Object);
                // 8. Let booleanTrapResult be ToBoolean(? Call(trap, handler, « target, P, descObj »)).
                let key = property_key.into_value(agent);
                let result = call_function(
                    agent,
                    trap,
                    Value::Object(handler),
                    Some(ArgumentsList::new(&[Value::Object(target), key, desc_obj])),
                    gc.reborrow(),
                )?;
                // 9. If booleanTrapResult is false, return false.
                if !to_boolean(agent, result) {
                    return Ok(false);
                }
                // 10. Let targetDesc be ? target.[[GetOwnProperty]](P).
                let target_desc = target.internal_get_own_property(agent, property_key, gc.reborrow())?;
                // 11. Let extensibleTarget be ? IsExtensible(target).
                let extensible_target = is_extensible(agent, target, gc.reborrow())?;
                // 12. If Desc has a [[Configurable]] field and Desc.[[Configurable]] is false, then
                //     a. Let settingConfigFalse be true.
                // 13. Else, let settingConfigFalse be false.
                let setting_config_false = property_descriptor.configurable == Some(false);
                match target_desc {
                    // 14. If targetDesc is undefined, then
                    None => {
                        // a. If extensibleTarget is false, throw a TypeError exception.
                        if !extensible_target {
                            return trap_error(
                                agent,
                                "Proxy defineProperty trap added a property to a non-extensible target",
                                gc.nogc(),
                            );
                        }
                        // b. If settingConfigFalse is true, throw a TypeError exception.
                        if setting_config_false {
                            return trap_error(
                                agent,
                                "Proxy defineProperty trap defined a non-configurable property missing on the target",
                                gc.nogc(),
                            );
                        }
                    }
                    // 15. Else,
                    Some(target_desc) => {
                        // a. If IsCompatiblePropertyDescriptor(extensibleTarget, Desc, targetDesc) is false, throw a TypeError exception.
                        if !is_compatible_property_descriptor(
                            extensible_target,
                            &property_descriptor,
                            Some(&target_desc),
                        ) {
                            return trap_error(
                                agent,
                                "Proxy defineProperty trap accepted a descriptor incompatible with the target",
                                gc.nogc(),
                            );
                        }
                        // b. If settingConfigFalse is true and targetDesc.[[Configurable]] is true, throw a TypeError exception.
                        if setting_config_false && target_desc.configurable == Some(true) {
                            return trap_error(
                                agent,
                                "Proxy defineProperty trap reported non-configurability for a configurable property",
                                gc.nogc(),
                            );
                        }
                        // c. If IsDataDescriptor(targetDesc) is true, targetDesc.[[Configurable]] is false, and targetDesc.[[Writable]] is true, then
                        //    i. If Desc has a [[Writable]] field and Desc.[[Writable]] is false, throw a TypeError exception.
                        if target_desc.is_data_descriptor()
                            && target_desc.configurable == Some(false)
                            && target_desc.writable == Some(true)
                            && property_descriptor.writable == Some(false)
                        {
                            return trap_error(
                                agent,
                                "Proxy defineProperty trap made a writable non-configurable property read-only",
                                gc.nogc(),
                            );
                        }
                    }
                }
                // 16. Return true.
                Ok(true)
            },
        )
    }

    /// ### [10.5.7 \[\[HasProperty\]\] ( P )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-hasproperty-p)
    fn internal_has_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        gc: GcScope,
    ) -> JsResult<bool> {
        self.with_trap(
            agent,
            |agent| agent.predefined().has,
            gc,
            |agent, NonRevokedProxy { target, handler }, trap, mut gc| {
                // 6. If trap is undefined, then
                let Some(trap) = trap else {
                    // a. Return ? target.[[HasProperty]](P).
                    return target.internal_has_property(agent, property_key, gc);
                };
                // 7. Let booleanTrapResult be ToBoolean(? Call(trap, handler, « target, P »)).
                let key = property_key.into_value(agent);
                let result = call_function(
                    agent,
                    trap,
                    Value::Object(handler),
                    Some(ArgumentsList::new(&[Value::Object(target), key])),
                    gc.reborrow(),
                )?;
                let result = to_boolean(agent, result);
                // 8. If booleanTrapResult is false, then
                if !result {
                    // a. Let targetDesc be ? target.[[GetOwnProperty]](P).
                    // b. If targetDesc is not undefined, then
                    if let Some(target_desc) =
                        target.internal_get_own_property(agent, property_key, gc.reborrow())?
                    {
                        // i. If targetDesc.[[Configurable]] is false, throw a TypeError exception.
                        if target_desc.configurable == Some(false) {
                            return trap_error(
                                agent,
                                "Proxy has trap hid a non-configurable property",
                                gc.nogc(),
                            );
                        }
                        // ii. Let extensibleTarget be ? IsExtensible(target).
                        // iii. If extensibleTarget is false, throw a TypeError exception.
                        if !is_extensible(agent, target, gc.reborrow())? {
                            return trap_error(
                                agent,
                                "Proxy has trap hid a property of a non-extensible target",
                                gc.nogc(),
                            );
                        }
                    }
                }
                // 9. Return booleanTrapResult.
                Ok(result)
            },
        )
    }

    /// ### [10.5.8 \[\[Get\]\] ( P, Receiver )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-get-p-receiver)
    ///
    /// > The value reported for a property must be the same as the value of
    /// > the corresponding target object property if the target object
    /// > property is a non-writable, non-configurable own data property.
    /// > The value reported for a property must be undefined if the
    /// > corresponding target object property is a non-configurable own
    /// > accessor property that has undefined as its \[\[Get]] attribute.
    fn internal_get(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        receiver: Value,
        gc: GcScope,
    ) -> JsResult<Value> {
        self.with_trap(
            agent,
            |agent| agent.predefined().get,
            gc,
            |agent, NonRevokedProxy { target, handler }, trap, mut gc| {
                // 6. If trap is undefined, then
                let Some(trap) = trap else {
                    // a. Return ? target.[[Get]](P, Receiver).
                    return target.internal_get(agent, property_key, receiver, gc);
                };
                // 7. Let trapResult be ? Call(trap, handler, « target, P, Receiver »).
                let key = property_key.into_value(agent);
                let trap_result = call_function(
                    agent,
                    trap,
                    Value::Object(handler),
                    Some(ArgumentsList::new(&[Value::Object(target), key, receiver])),
                    gc.reborrow(),
                )?;
                // 8. Let targetDesc be ? target.[[GetOwnProperty]](P).
                let target_desc =
                    target.internal_get_own_property(agent, property_key, gc.reborrow())?;
                // 9. If targetDesc is not undefined and targetDesc.[[Configurable]] is false, then
                if let Some(target_desc) = target_desc
                    && target_desc.configurable == Some(false)
                {
                    // a. If IsDataDescriptor(targetDesc) is true and targetDesc.[[Writable]] is false, then
                    //    i. If SameValue(trapResult, targetDesc.[[Value]]) is false, throw a TypeError exception.
                    if target_desc.is_data_descriptor()
                        && target_desc.writable == Some(false)
                        && !same_value(trap_result, target_desc.value.unwrap_or(Value::Undefined))
                    {
                        return trap_error(
                            agent,
                            "Proxy get trap reported a different value for a read-only non-configurable property",
                            gc.nogc(),
                        );
                    }
                    // b. If IsAccessorDescriptor(targetDesc) is true and targetDesc.[[Get]] is undefined, then
                    //    i. If trapResult is not undefined, throw a TypeError exception.
                    if target_desc.is_accessor_descriptor()
                        && target_desc.get == Some(None)
                        && !trap_result.is_undefined()
                    {
                        return trap_error(
                            agent,
                            "Proxy get trap reported a value for a non-configurable accessor without a getter",
                            gc.nogc(),
                        );
                    }
                }
                // 10. Return trapResult.
                Ok(trap_result)
            },
        )
    }

    /// ### [10.5.9 \[\[Set\]\] ( P, V, Receiver )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-set-p-v-receiver)
    fn internal_set(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
        gc: GcScope,
    ) -> JsResult<bool> {
        self.with_trap(
            agent,
            |agent| agent.predefined().set,
            gc,
            |agent, NonRevokedProxy { target, handler }, trap, mut gc| {
                // 6. If trap is undefined, then
                let Some(trap) = trap else {
                    // a. Return ? target.[[Set]](P, V, Receiver).
                    return target.internal_set(agent, property_key, value, receiver, gc);
                };
                // 7. Let booleanTrapResult be ToBoolean(? Call(trap, handler, « target, P, V, Receiver »)).
                let key = property_key.into_value(agent);
                let result = call_function(
                    agent,
                    trap,
                    Value::Object(handler),
                    Some(ArgumentsList::new(&[
                        Value::Object(target),
                        key,
                        value,
                        receiver,
                    ])),
                    gc.reborrow(),
                )?;
                // 8. If booleanTrapResult is false, return false.
                if !to_boolean(agent, result) {
                    return Ok(false);
                }
                // 9. Let targetDesc be ? target.[[GetOwnProperty]](P).
                let target_desc =
                    target.internal_get_own_property(agent, property_key, gc.reborrow())?;
                // 10. If targetDesc is not undefined and targetDesc.[[Configurable]] is false, then
                if let Some(target_desc) = target_desc
                    && target_desc.configurable == Some(false)
                {
                    // a. If IsDataDescriptor(targetDesc) is true and targetDesc.[[Writable]] is false, then
                    //    i. If SameValue(V, targetDesc.[[Value]]) is false, throw a TypeError exception.
                    if target_desc.is_data_descriptor()
                        && target_desc.writable == Some(false)
                        && !same_value(value, target_desc.value.unwrap_or(Value::Undefined))
                    {
                        return trap_error(
                            agent,
                            "Proxy set trap changed the value of a read-only non-configurable property",
                            gc.nogc(),
                        );
                    }
                    // b. If IsAccessorDescriptor(targetDesc) is true, then
                    //    i. If targetDesc.[[Set]] is undefined, throw a TypeError exception.
                    if target_desc.is_accessor_descriptor() && target_desc.set == Some(None) {
                        return trap_error(
                            agent,
                            "Proxy set trap succeeded for a non-configurable accessor without a setter",
                            gc.nogc(),
                        );
                    }
                }
                // 11. Return true.
                Ok(true)
            },
        )
    }

    /// ### [10.5.10 \[\[Delete\]\] ( P )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-delete-p)
    fn internal_delete(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        gc: GcScope,
    ) -> JsResult<bool> {
        self.with_trap(
            agent,
            |agent| agent.predefined().delete_property,
            gc,
            |agent, NonRevokedProxy { target, handler }, trap, mut gc| {
                // 6. If trap is undefined, then
                let Some(trap) = trap else {
                    // a. Return ? target.[[Delete]](P).
                    return target.internal_delete(agent, property_key, gc);
                };
                // 7. Let booleanTrapResult be ToBoolean(? Call(trap, handler, « target, P »)).
                let key = property_key.into_value(agent);
                let result = call_function(
                    agent,
                    trap,
                    Value::Object(handler),
                    Some(ArgumentsList::new(&[Value::Object(target), key])),
                    gc.reborrow(),
                )?;
                // 8. If booleanTrapResult is false, return false.
                if !to_boolean(agent, result) {
                    return Ok(false);
                }
                // 9. Let targetDesc be ? target.[[GetOwnProperty]](P).
                // 10. If targetDesc is undefined, return true.
                let Some(target_desc) =
                    target.internal_get_own_property(agent, property_key, gc.reborrow())?
                else {
                    return Ok(true);
                };
                // 11. If targetDesc.[[Configurable]] is false, throw a TypeError exception.
                if target_desc.configurable == Some(false) {
                    return trap_error(
                        agent,
                        "Proxy deleteProperty trap deleted a non-configurable property",
                        gc.nogc(),
                    );
                }
                // 12. Let extensibleTarget be ? IsExtensible(target).
                // 13. If extensibleTarget is false, throw a TypeError exception.
                if !is_extensible(agent, target, gc.reborrow())? {
                    return trap_error(
                        agent,
                        "Proxy deleteProperty trap deleted a property of a non-extensible target",
                        gc.nogc(),
                    );
                }
                // 14. Return true.
                Ok(true)
            },
        )
    }

    /// ### [10.5.11 \[\[OwnPropertyKeys\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-ownpropertykeys)
    fn internal_own_property_keys(
        self,
        agent: &mut Agent,
        gc: GcScope,
    ) -> JsResult<Vec<PropertyKey>> {
        self.with_trap(
            agent,
            |agent| agent.predefined().own_keys,
            gc,
            |agent, NonRevokedProxy { target, handler }, trap, mut gc| {
                // 6. If trap is undefined, then
                let Some(trap) = trap else {
                    // a. Return ? target.[[OwnPropertyKeys]]().
                    return target.internal_own_property_keys(agent, gc);
                };
                // 7. Let trapResultArray be ? Call(trap, handler, « target »).
                let trap_result_array = call_function(
                    agent,
                    trap,
                    Value::Object(handler),
                    Some(ArgumentsList::new(&[Value::Object(target)])),
                    gc.reborrow(),
                )?;
                // 8. Let trapResult be ? CreateListFromArrayLike(trapResultArray, property-key).
                let trap_result =
                    create_property_key_list_from_array_like(agent, trap_result_array, gc.reborrow())?;
                // 9. If trapResult contains any duplicate entries, throw a TypeError exception.
                let mut seen = hashbrown::HashSet::with_capacity(trap_result.len());
                if !trap_result.iter().all(|key| seen.insert(*key)) {
                    return trap_error(
                        agent,
                        "Proxy ownKeys trap result contains duplicate entries",
                        gc.nogc(),
                    );
                }
                // 10. Let extensibleTarget be ? IsExtensible(target).
                let extensible_target = is_extensible(agent, target, gc.reborrow())?;
                // 11. Let targetKeys be ? target.[[OwnPropertyKeys]]().
                let target_keys = target.internal_own_property_keys(agent, gc.reborrow())?;
                // 13. Let targetConfigurableKeys be a new empty List.
                let mut target_configurable_keys = Vec::new();
                // 14. Let targetNonconfigurableKeys be a new empty List.
                let mut target_nonconfigurable_keys = Vec::new();
                // 15. For each element key of targetKeys, do
                for key in target_keys {
                    // a. Let desc be ? target.[[GetOwnProperty]](key).
                    let desc = target.internal_get_own_property(agent, key, gc.reborrow())?;
                    // b. If desc is not undefined and desc.[[Configurable]] is false, then
                    if desc.is_some_and(|desc| desc.configurable == Some(false)) {
                        // i. Append key to targetNonconfigurableKeys.
                        target_nonconfigurable_keys.push(key);
                    } else {
                        // c. Else,
                        // i. Append key to targetConfigurableKeys.
                        target_configurable_keys.push(key);
                    }
                }
                // 16. If extensibleTarget is true and targetNonconfigurableKeys is empty, then
                if extensible_target && target_nonconfigurable_keys.is_empty() {
                    // a. Return trapResult.
                    return Ok(trap_result);
                }
                // 17. Let uncheckedResultKeys be a List whose elements are the elements of trapResult.
                let mut unchecked_result_keys = seen;
                // 18. For each element key of targetNonconfigurableKeys, do
                for key in target_nonconfigurable_keys {
                    // a. If uncheckedResultKeys does not contain key, throw a TypeError exception.
                    // b. Remove key from uncheckedResultKeys.
                    if !unchecked_result_keys.remove(&key) {
                        return trap_error(
                            agent,
                            "Proxy ownKeys trap result is missing a non-configurable key of the target",
                            gc.nogc(),
                        );
                    }
                }
                // 19. If extensibleTarget is true, return trapResult.
                if extensible_target {
                    return Ok(trap_result);
                }
                // 20. For each element key of targetConfigurableKeys, do
                for key in target_configurable_keys {
                    // a. If uncheckedResultKeys does not contain key, throw a TypeError exception.
                    // b. Remove key from uncheckedResultKeys.
                    if !unchecked_result_keys.remove(&key) {
                        return trap_error(
                            agent,
                            "Proxy ownKeys trap result is missing a key of the non-extensible target",
                            gc.nogc(),
                        );
                    }
                }
                // 21. If uncheckedResultKeys is not empty, throw a TypeError exception.
                if !unchecked_result_keys.is_empty() {
                    return trap_error(
                        agent,
                        "Proxy ownKeys trap result added keys to the non-extensible target",
                        gc.nogc(),
                    );
                }
                // 22. Return trapResult.
                Ok(trap_result)
            },
        )
    }
}

/// ### [10.5.15 ProxyCreate ( target, handler )](https://tc39.es/ecma262/#sec-proxycreate)
///
/// The abstract operation ProxyCreate takes arguments target (an ECMAScript
/// language value) and handler (an ECMAScript language value) and returns
/// either a normal completion containing a Proxy exotic object or a throw
/// completion. It is used to specify the creation of new Proxy objects.
pub fn proxy_create(
    agent: &mut Agent,
    target: Value,
    handler: Value,
    gc: NoGcScope,
) -> JsResult<Proxy> {
    // 1. If target is not an Object, throw a TypeError exception.
    let Value::Object(target) = target else {
        return trap_error(agent, "Proxy target must be an object", gc);
    };
    // 2. If handler is not an Object, throw a TypeError exception.
    let Value::Object(handler) = handler else {
        return trap_error(agent, "Proxy handler must be an object", gc);
    };
    // 5. If IsCallable(target) is true, then
    //    a. Set P.[[Call]] as specified in 10.5.12.
    //    b. If IsConstructor(target) is true, then
    //       i. Set P.[[Construct]] as specified in 10.5.13.
    let callable = is_callable(agent, Value::Object(target));
    let is_constructor = callable.is_some_and(|f| f.is_constructor(agent));
    // 3. Let P be MakeBasicObject(« [[ProxyHandler]], [[ProxyTarget]] »).
    // 6. Set P.[[ProxyTarget]] to target.
    // 7. Set P.[[ProxyHandler]] to handler.
    let p = object_create_with_kind(
        agent,
        None,
        ObjectKind::Proxy(ProxyHeapData {
            target: Some(target),
            handler: Some(handler),
            is_callable: callable.is_some(),
            is_constructor,
        }),
    );
    // 8. Return P.
    Ok(Proxy(p))
}

/// ### [28.2.2.1 Proxy.revocable ( target, handler )](https://tc39.es/ecma262/#sec-proxy.revocable)
///
/// Returns an object `{ proxy, revoke }`.
pub fn proxy_revocable(
    agent: &mut Agent,
    target: Value,
    handler: Value,
    gc: NoGcScope,
) -> JsResult<Object> {
    // 1. Let proxy be ? ProxyCreate(target, handler).
    let proxy = proxy_create(agent, target, handler, gc)?;
    // 2. Let revokerClosure be a new Abstract Closure with no parameters that captures nothing and performs the following steps when called:
    // 3. Let revoker be CreateBuiltinFunction(revokerClosure, 0, "", « [[RevocableProxy]] »).
    // 4. Set revoker.[[RevocableProxy]] to proxy.
    let function_prototype = agent.intrinsics().function_prototype;
    let revoker = object_create_with_kind(
        agent,
        Some(function_prototype),
        ObjectKind::Function(FunctionHeapData::ProxyRevoker(ProxyRevokerHeapData {
            revocable_proxy: Some(proxy),
        })),
    );
    // 5. Let result be OrdinaryObjectCreate(%Object.prototype%).
    let result = ordinary_object_create(agent);
    let names = agent.predefined();
    // 6. Perform ! CreateDataPropertyOrThrow(result, "proxy", proxy).
    add_own_property(
        agent,
        result,
        PropertyKey::String(names.proxy),
        PropertyFlags::default_new_property(),
        PropertyValue::Data(proxy.into_value()),
    );
    // 7. Perform ! CreateDataPropertyOrThrow(result, "revoke", revoker).
    add_own_property(
        agent,
        result,
        PropertyKey::String(names.revoke),
        PropertyFlags::default_new_property(),
        PropertyValue::Data(Value::Object(revoker)),
    );
    // 8. Return result.
    Ok(result)
}

/// The revoker closure of `Proxy.revocable`.
pub(crate) fn proxy_revoker_call(agent: &mut Agent, f: Function, _: GcScope) -> JsResult<Value> {
    // a. Let F be the active function object.
    // b. Let p be F.[[RevocableProxy]].
    // c. If p is null, return undefined.
    // d. Set F.[[RevocableProxy]] to null.
    let p = match &mut agent[f.into_object()].kind {
        ObjectKind::Function(FunctionHeapData::ProxyRevoker(data)) => data.revocable_proxy.take(),
        _ => None,
    };
    // e. Assert: p is a Proxy exotic object.
    // f. Set p.[[ProxyTarget]] to null.
    // g. Set p.[[ProxyHandler]] to null.
    if let Some(p) = p {
        p.revoke(agent);
    }
    // h. Return undefined.
    Ok(Value::Undefined)
}

impl From<Proxy> for Object {
    fn from(value: Proxy) -> Self {
        value.0
    }
}

impl From<Proxy> for Value {
    fn from(value: Proxy) -> Self {
        Value::Object(value.0)
    }
}

impl Index<Proxy> for Agent {
    type Output = ProxyHeapData;

    fn index(&self, index: Proxy) -> &Self::Output {
        match &self[index.0].kind {
            ObjectKind::Proxy(data) => data,
            _ => unreachable_not_a_proxy(),
        }
    }
}

impl IndexMut<Proxy> for Agent {
    fn index_mut(&mut self, index: Proxy) -> &mut Self::Output {
        match &mut self[index.0].kind {
            ObjectKind::Proxy(data) => data,
            _ => unreachable_not_a_proxy(),
        }
    }
}

#[cold]
#[inline(never)]
fn unreachable_not_a_proxy() -> ! {
    unreachable!("Proxy handle does not point to a proxy object")
}

impl HeapMarkAndSweep for ProxyRevokerHeapData {
    fn mark_values(&self, queues: &mut WorkQueues) {
        if let Some(proxy) = self.revocable_proxy {
            queues.objects.push(proxy.0);
        }
    }
}
