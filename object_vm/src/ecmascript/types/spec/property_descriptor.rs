// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    ecmascript::{
        abstract_operations::{
            operations_on_objects::{get, has_property},
            testing_and_comparison::is_callable,
            type_conversion::to_boolean,
        },
        builtins::ordinary::{add_own_property, ordinary_object_create},
        execution::{Agent, ExceptionType, JsResult},
        types::{Function, Object, PropertyFlags, PropertyKey, PropertyValue, String, Value},
    },
    engine::context::GcScope,
};

/// ### [6.2.6 The Property Descriptor Specification Type](https://tc39.es/ecma262/#sec-property-descriptor-specification-type)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PropertyDescriptor {
    /// \[\[Value]]
    pub value: Option<Value>,

    /// \[\[Writable]]
    pub writable: Option<bool>,

    /// \[\[Get]]
    pub get: Option<Option<Function>>,

    /// \[\[Set]]
    pub set: Option<Option<Function>>,

    /// \[\[Enumerable]]
    pub enumerable: Option<bool>,

    /// \[\[Configurable]]
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    /// A fully populated data descriptor with every attribute `true`.
    pub fn new_data_descriptor(value: Value) -> Self {
        Self {
            value: Some(value),
            writable: Some(true),
            get: None,
            set: None,
            enumerable: Some(true),
            configurable: Some(true),
        }
    }

    /// A fully populated data descriptor built from property flags.
    pub fn from_data_flags(value: Value, flags: PropertyFlags) -> Self {
        Self {
            value: Some(value),
            writable: Some(flags.writable()),
            get: None,
            set: None,
            enumerable: Some(flags.enumerable()),
            configurable: Some(flags.configurable()),
        }
    }

    /// A fully populated accessor descriptor built from property flags.
    pub fn from_accessor_flags(
        getter: Option<Function>,
        setter: Option<Function>,
        flags: PropertyFlags,
    ) -> Self {
        Self {
            value: None,
            writable: None,
            get: Some(getter),
            set: Some(setter),
            enumerable: Some(flags.enumerable()),
            configurable: Some(flags.configurable()),
        }
    }

    /// ### [6.2.6.1 IsAccessorDescriptor ( Desc )](https://tc39.es/ecma262/#sec-isaccessordescriptor)
    pub fn is_accessor_descriptor(&self) -> bool {
        // 1. If Desc is undefined, return false.
        // 2. If Desc has a [[Get]] field, return true.
        // 3. If Desc has a [[Set]] field, return true.
        // 4. Return false.
        self.get.is_some() || self.set.is_some()
    }

    /// ### [6.2.6.2 IsDataDescriptor ( Desc )](https://tc39.es/ecma262/#sec-isdatadescriptor)
    pub fn is_data_descriptor(&self) -> bool {
        // 1. If Desc is undefined, return false.
        // 2. If Desc has a [[Value]] field, return true.
        // 3. If Desc has a [[Writable]] field, return true.
        // 4. Return false.
        self.value.is_some() || self.writable.is_some()
    }

    /// ### [6.2.6.3 IsGenericDescriptor ( Desc )](https://tc39.es/ecma262/#sec-isgenericdescriptor)
    pub fn is_generic_descriptor(&self) -> bool {
        // 1. If Desc is undefined, return false.
        // 2. If IsAccessorDescriptor(Desc) is true, return false.
        // 3. If IsDataDescriptor(Desc) is true, return false.
        // 4. Return true.
        !self.is_accessor_descriptor() && !self.is_data_descriptor()
    }

    pub fn has_fields(&self) -> bool {
        self.value.is_some()
            || self.writable.is_some()
            || self.get.is_some()
            || self.set.is_some()
            || self.enumerable.is_some()
            || self.configurable.is_some()
    }

    pub fn is_fully_populated(&self) -> bool {
        ((self.value.is_some() && self.writable.is_some())
            || (self.get.is_some() && self.set.is_some()))
            && self.enumerable.is_some()
            && self.configurable.is_some()
    }

    /// Property flags this descriptor asks for, absent fields as `false`.
    pub(crate) fn to_flags(&self) -> PropertyFlags {
        let accessor = self.is_accessor_descriptor();
        PropertyFlags::empty()
            .with(PropertyFlags::ENUMERABLE, self.enumerable == Some(true))
            .with(PropertyFlags::CONFIGURABLE, self.configurable == Some(true))
            .with(
                PropertyFlags::WRITABLE,
                !accessor && self.writable == Some(true),
            )
            .with(PropertyFlags::ACCESSOR, accessor)
    }

    /// ### [6.2.6.4 FromPropertyDescriptor ( Desc )](https://tc39.es/ecma262/#sec-frompropertydescriptor)
    pub fn from_property_descriptor(desc: Option<Self>, agent: &mut Agent) -> Option<Object> {
        // 1. If Desc is undefined, return undefined.
        let desc = desc?;

        // 2. Let obj be OrdinaryObjectCreate(%Object.prototype%).
        let obj = ordinary_object_create(agent);
        // 3. Assert: obj is an extensible ordinary object with no own properties.
        let names = agent.predefined();
        let define = |agent: &mut Agent, name: String, value: Value| {
            add_own_property(
                agent,
                obj,
                PropertyKey::String(name),
                PropertyFlags::default_new_property(),
                PropertyValue::Data(value),
            );
        };

        // 4. If Desc has a [[Value]] field, then
        if let Some(value) = desc.value {
            // a. Perform ! CreateDataPropertyOrThrow(obj, "value", Desc.[[Value]]).
            define(agent, names.value, value);
        }
        // 5. If Desc has a [[Writable]] field, then
        if let Some(writable) = desc.writable {
            // a. Perform ! CreateDataPropertyOrThrow(obj, "writable", Desc.[[Writable]]).
            define(agent, names.writable, writable.into());
        }
        // 6. If Desc has a [[Get]] field, then
        if let Some(getter) = desc.get {
            // a. Perform ! CreateDataPropertyOrThrow(obj, "get", Desc.[[Get]]).
            define(agent, names.get, getter.map(Function::into_value).into());
        }
        // 7. If Desc has a [[Set]] field, then
        if let Some(setter) = desc.set {
            // a. Perform ! CreateDataPropertyOrThrow(obj, "set", Desc.[[Set]]).
            define(agent, names.set, setter.map(Function::into_value).into());
        }
        // 8. If Desc has an [[Enumerable]] field, then
        if let Some(enumerable) = desc.enumerable {
            // a. Perform ! CreateDataPropertyOrThrow(obj, "enumerable", Desc.[[Enumerable]]).
            define(agent, names.enumerable, enumerable.into());
        }
        // 9. If Desc has a [[Configurable]] field, then
        if let Some(configurable) = desc.configurable {
            // a. Perform ! CreateDataPropertyOrThrow(obj, "configurable", Desc.[[Configurable]]).
            define(agent, names.configurable, configurable.into());
        }
        // 10. Return obj.
        Some(obj)
    }

    /// ### [6.2.6.5 ToPropertyDescriptor ( Obj )](https://tc39.es/ecma262/#sec-topropertydescriptor)
    pub fn to_property_descriptor(
        agent: &mut Agent,
        obj: Value,
        mut gc: GcScope,
    ) -> JsResult<Self> {
        // 1. If Obj is not an Object, throw a TypeError exception.
        let Value::Object(obj) = obj else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Property descriptor must be an object",
                gc.nogc(),
            ));
        };
        let names = agent.predefined();
        // 2. Let desc be a new Property Descriptor that initially has no fields.
        let mut desc = PropertyDescriptor::default();
        // 3. Let hasEnumerable be ? HasProperty(Obj, "enumerable").
        // 4. If hasEnumerable is true, then
        //    a. Let enumerable be ToBoolean(? Get(Obj, "enumerable")).
        //    b. Set desc.[[Enumerable]] to enumerable.
        if let Some(enumerable) = get_field(agent, obj, names.enumerable, gc.reborrow())? {
            desc.enumerable = Some(to_boolean(agent, enumerable));
        }
        // 5. Let hasConfigurable be ? HasProperty(Obj, "configurable").
        // 6. If hasConfigurable is true, then
        //    a. Let configurable be ToBoolean(? Get(Obj, "configurable")).
        //    b. Set desc.[[Configurable]] to configurable.
        if let Some(configurable) = get_field(agent, obj, names.configurable, gc.reborrow())? {
            desc.configurable = Some(to_boolean(agent, configurable));
        }
        // 7. Let hasValue be ? HasProperty(Obj, "value").
        // 8. If hasValue is true, then
        //    a. Let value be ? Get(Obj, "value").
        //    b. Set desc.[[Value]] to value.
        if let Some(value) = get_field(agent, obj, names.value, gc.reborrow())? {
            desc.value = Some(value);
        }
        // 9. Let hasWritable be ? HasProperty(Obj, "writable").
        // 10. If hasWritable is true, then
        //     a. Let writable be ToBoolean(? Get(Obj, "writable")).
        //     b. Set desc.[[Writable]] to writable.
        if let Some(writable) = get_field(agent, obj, names.writable, gc.reborrow())? {
            desc.writable = Some(to_boolean(agent, writable));
        }
        // 11. Let hasGet be ? HasProperty(Obj, "get").
        // 12. If hasGet is true, then
        if let Some(getter) = get_field(agent, obj, names.get, gc.reborrow())? {
            // a. Let getter be ? Get(Obj, "get").
            // b. If IsCallable(getter) is false and getter is not undefined,
            //    throw a TypeError exception.
            let getter = match getter {
                Value::Undefined => None,
                _ => match is_callable(agent, getter) {
                    Some(getter) => Some(getter),
                    None => {
                        return Err(agent.throw_exception_with_static_message(
                            ExceptionType::TypeError,
                            "Getter must be a function",
                            gc.nogc(),
                        ));
                    }
                },
            };
            // c. Set desc.[[Get]] to getter.
            desc.get = Some(getter);
        }
        // 13. Let hasSet be ? HasProperty(Obj, "set").
        // 14. If hasSet is true, then
        if let Some(setter) = get_field(agent, obj, names.set, gc.reborrow())? {
            // a. Let setter be ? Get(Obj, "set").
            // b. If IsCallable(setter) is false and setter is not undefined,
            //    throw a TypeError exception.
            let setter = match setter {
                Value::Undefined => None,
                _ => match is_callable(agent, setter) {
                    Some(setter) => Some(setter),
                    None => {
                        return Err(agent.throw_exception_with_static_message(
                            ExceptionType::TypeError,
                            "Setter must be a function",
                            gc.nogc(),
                        ));
                    }
                },
            };
            // c. Set desc.[[Set]] to setter.
            desc.set = Some(setter);
        }
        // 15. If desc has a [[Get]] field or desc has a [[Set]] field, then
        //     a. If desc has a [[Value]] field or desc has a [[Writable]]
        //        field, throw a TypeError exception.
        if desc.is_accessor_descriptor() && desc.is_data_descriptor() {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Invalid property descriptor. Cannot both specify accessors and a value or writable attribute",
                gc.nogc(),
            ));
        }
        // 16. Return desc.
        Ok(desc)
    }

    /// ### [6.2.6.6 CompletePropertyDescriptor ( Desc )](https://tc39.es/ecma262/#sec-completepropertydescriptor)
    pub fn complete_property_descriptor(&mut self) {
        // 1. Let like be the Record { [[Value]]: undefined, [[Writable]]: false, [[Get]]: undefined, [[Set]]: undefined, [[Enumerable]]: false, [[Configurable]]: false }.
        // 2. If IsGenericDescriptor(Desc) is true or IsDataDescriptor(Desc) is true, then
        if self.is_generic_descriptor() || self.is_data_descriptor() {
            // a. If Desc does not have a [[Value]] field, set Desc.[[Value]] to like.[[Value]].
            self.value.get_or_insert(Value::Undefined);
            // b. If Desc does not have a [[Writable]] field, set Desc.[[Writable]] to like.[[Writable]].
            self.writable.get_or_insert(false);
        } else {
            // 3. Else,
            // a. If Desc does not have a [[Get]] field, set Desc.[[Get]] to like.[[Get]].
            self.get.get_or_insert(None);
            // b. If Desc does not have a [[Set]] field, set Desc.[[Set]] to like.[[Set]].
            self.set.get_or_insert(None);
        }
        // 4. If Desc does not have an [[Enumerable]] field, set Desc.[[Enumerable]] to like.[[Enumerable]].
        self.enumerable.get_or_insert(false);
        // 5. If Desc does not have a [[Configurable]] field, set Desc.[[Configurable]] to like.[[Configurable]].
        self.configurable.get_or_insert(false);
    }
}

/// `HasProperty` followed by `Get` of a descriptor field.
fn get_field(
    agent: &mut Agent,
    obj: Object,
    name: String,
    mut gc: GcScope,
) -> JsResult<Option<Value>> {
    let key = PropertyKey::String(name);
    if !has_property(agent, obj, key, gc.reborrow())? {
        return Ok(None);
    }
    get(agent, obj, key, gc).map(Some)
}
