// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod common;

use std::rc::Rc;

use common::{function, key, object_with};
use object_vm::{
    ecmascript::{
        abstract_operations::{
            operations_on_objects::{
                create_data_property, define_property_or_throw, get,
                integrity::{Frozen, Sealed},
                set, set_integrity_level, test_integrity_level,
            },
            testing_and_comparison::is_extensible,
        },
        builtins::{
            HostObject, create_array_from_list, host_object_create,
            ordinary::ordinary_object_create, proxy_create,
        },
        execution::{Agent, JsResult, Options},
        types::{
            ArgumentsList, InternalMethods, PropOpFlags, PropertyDescriptor, PropertyKey, Value,
        },
    },
    engine::GcScope,
};

fn return_this(
    _agent: &mut Agent,
    this: Value,
    _arguments: ArgumentsList,
    _gc: GcScope,
) -> JsResult<Value> {
    Ok(this)
}

/// Host without keys of its own that accepts every write.
#[derive(Debug)]
struct Sink;

impl HostObject for Sink {
    fn get(&self, _agent: &mut Agent, _key: PropertyKey, _gc: GcScope) -> JsResult<Value> {
        Ok(Value::Undefined)
    }

    fn set(&self, _: &mut Agent, _: PropertyKey, _: Value, _: GcScope) -> JsResult<bool> {
        Ok(true)
    }

    fn own_keys(&self, _agent: &mut Agent, _gc: GcScope) -> JsResult<Vec<PropertyKey>> {
        Ok(Vec::new())
    }
}

#[test]
fn sealing_keeps_values_writable() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let o = object_with(agent, &[("a", Value::from(1))], gc.reborrow());
        assert!(!test_integrity_level::<Sealed>(agent, o, gc.reborrow()).unwrap());
        assert!(set_integrity_level::<Sealed>(agent, o, gc.reborrow()).unwrap());
        assert!(o.is_sealed_flag(agent));
        assert!(!o.is_frozen_flag(agent));
        assert!(test_integrity_level::<Sealed>(agent, o, gc.reborrow()).unwrap());
        assert!(!test_integrity_level::<Frozen>(agent, o, gc.reborrow()).unwrap());

        let (a, b) = (key(agent, "a"), key(agent, "b"));
        set(agent, o, a, Value::from(2), true, gc.reborrow()).unwrap();
        assert_eq!(get(agent, o, a, gc.reborrow()).unwrap(), Value::from(2));
        assert!(!o.internal_delete(agent, a, gc.reborrow()).unwrap());
        assert!(!create_data_property(agent, o, b, Value::Null, gc.reborrow()).unwrap());
        assert!(!is_extensible(agent, o, gc.reborrow()).unwrap());
    });
}

#[test]
fn freezing_makes_data_read_only_and_keeps_accessors() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let o = object_with(agent, &[("a", Value::from(1))], gc.reborrow());
        let getter = function(agent, "get", 0, return_this);
        let accessor = key(agent, "accessor");
        define_property_or_throw(
            agent,
            o,
            accessor,
            PropertyDescriptor {
                get: Some(Some(getter)),
                configurable: Some(true),
                ..Default::default()
            },
            gc.reborrow(),
        )
        .unwrap();
        assert!(set_integrity_level::<Frozen>(agent, o, gc.reborrow()).unwrap());
        assert!(test_integrity_level::<Frozen>(agent, o, gc.reborrow()).unwrap());
        assert!(test_integrity_level::<Sealed>(agent, o, gc.reborrow()).unwrap());

        let a = key(agent, "a");
        assert!(
            !o.set_with_flags(agent, a, Value::from(2), PropOpFlags::NONE, gc.reborrow())
                .unwrap()
        );
        assert_eq!(get(agent, o, a, gc.reborrow()).unwrap(), Value::from(1));
        let desc = o
            .internal_get_own_property(agent, accessor, gc.reborrow())
            .unwrap()
            .unwrap();
        assert_eq!(desc.configurable, Some(false));
        assert_eq!(desc.get, Some(Some(getter)));
        assert_eq!(get(agent, o, accessor, gc.reborrow()).unwrap(), Value::Object(o));
    });
}

#[test]
fn integrity_is_detected_without_sealing() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let o = ordinary_object_create(agent);
        let a = key(agent, "a");
        define_property_or_throw(
            agent,
            o,
            a,
            PropertyDescriptor {
                value: Some(Value::from(1)),
                writable: Some(false),
                configurable: Some(false),
                ..Default::default()
            },
            gc.reborrow(),
        )
        .unwrap();
        // Still extensible.
        assert!(!test_integrity_level::<Sealed>(agent, o, gc.reborrow()).unwrap());
        assert!(o.internal_prevent_extensions(agent, gc.reborrow()).unwrap());
        assert!(test_integrity_level::<Frozen>(agent, o, gc.reborrow()).unwrap());
        // The answer is remembered.
        assert!(o.is_frozen_flag(agent));

        // An empty non-extensible object is trivially frozen.
        let empty = ordinary_object_create(agent);
        assert!(empty.internal_prevent_extensions(agent, gc.reborrow()).unwrap());
        assert!(test_integrity_level::<Frozen>(agent, empty, gc.reborrow()).unwrap());
    });
}

#[test]
fn sealed_arrays_keep_their_elements() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let array = create_array_from_list(agent, &[Value::from(1), Value::from(2)]);
        let o = array.into_object();
        assert!(!test_integrity_level::<Sealed>(agent, o, gc.reborrow()).unwrap());
        assert!(set_integrity_level::<Sealed>(agent, o, gc.reborrow()).unwrap());
        assert!(test_integrity_level::<Sealed>(agent, o, gc.reborrow()).unwrap());

        set(agent, o, PropertyKey::Integer(0), Value::from(7), true, gc.reborrow()).unwrap();
        assert_eq!(
            get(agent, o, PropertyKey::Integer(0), gc.reborrow()).unwrap(),
            Value::from(7)
        );
        let desc = o
            .internal_get_own_property(agent, PropertyKey::Integer(1), gc.reborrow())
            .unwrap()
            .unwrap();
        assert_eq!(desc.configurable, Some(false));
        assert_eq!(desc.writable, Some(true));
        assert!(!o.internal_delete(agent, PropertyKey::Integer(1), gc.reborrow()).unwrap());
        // Truncation stops at the sealed elements.
        assert!(
            !array
                .set_length(agent, 0, PropOpFlags::NONE, gc.nogc())
                .unwrap()
        );
        assert_eq!(array.len(agent), 2);
    });
}

#[test]
fn proxies_go_through_their_traps() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let target = object_with(agent, &[("a", Value::from(1))], gc.reborrow());
        let handler = ordinary_object_create(agent);
        let proxy = proxy_create(agent, target.into(), handler.into(), gc.nogc()).unwrap();
        let p = proxy.into_object();
        assert!(!test_integrity_level::<Frozen>(agent, p, gc.reborrow()).unwrap());
        assert!(set_integrity_level::<Frozen>(agent, p, gc.reborrow()).unwrap());
        assert!(test_integrity_level::<Frozen>(agent, p, gc.reborrow()).unwrap());
        // The target received every definition.
        assert!(test_integrity_level::<Frozen>(agent, target, gc.reborrow()).unwrap());
        let a = key(agent, "a");
        let desc = target
            .internal_get_own_property(agent, a, gc.reborrow())
            .unwrap()
            .unwrap();
        assert_eq!(desc.writable, Some(false));
        assert_eq!(desc.configurable, Some(false));
    });
}

#[test]
fn host_objects_can_be_sealed_but_never_frozen() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let o = host_object_create(agent, Rc::new(Sink), None);
        assert!(set_integrity_level::<Sealed>(agent, o, gc.reborrow()).unwrap());
        assert!(!is_extensible(agent, o, gc.reborrow()).unwrap());
        assert!(test_integrity_level::<Sealed>(agent, o, gc.reborrow()).unwrap());
        assert!(set_integrity_level::<Frozen>(agent, o, gc.reborrow()).unwrap());
        assert!(!test_integrity_level::<Frozen>(agent, o, gc.reborrow()).unwrap());
        // Host properties stay writable.
        let x = key(agent, "x");
        set(agent, o, x, Value::from(1), true, gc.reborrow()).unwrap();
    });
}
