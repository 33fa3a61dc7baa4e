// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod common;

use common::{assert_throws, function, key, number, object_with, string};
use object_vm::{
    ecmascript::{
        abstract_operations::operations_on_objects::{
            create_data_property, create_data_property_or_throw, define_property_or_throw,
            delete_property_or_throw, get, get_v, has_own_property, has_property, set,
        },
        builtins::ordinary::{ordinary_object_create, ordinary_object_create_with_prototype},
        execution::{Agent, ExceptionType, JsResult, Options},
        types::{
            ArgumentsList, InternalMethods, OwnKeysFlags, PropOpFlags, PropertyDescriptor,
            PropertyKey, Symbol, Value,
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

/// Setter storing its argument as `seen` on the receiver.
fn record_on_receiver(
    agent: &mut Agent,
    this: Value,
    arguments: ArgumentsList,
    gc: GcScope,
) -> JsResult<Value> {
    let Value::Object(this) = this else {
        return Ok(Value::Undefined);
    };
    let seen = PropertyKey::from_str(agent, "seen");
    create_data_property_or_throw(agent, this, seen, arguments.get(0), gc)?;
    Ok(Value::Undefined)
}

#[test]
fn define_get_delete_round_trip() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let o = ordinary_object_create(agent);
        let x = key(agent, "x");
        define_property_or_throw(
            agent,
            o,
            x,
            PropertyDescriptor::new_data_descriptor(Value::from(1)),
            gc.reborrow(),
        )
        .unwrap();
        assert_eq!(get(agent, o, x, gc.reborrow()).unwrap(), Value::from(1));
        delete_property_or_throw(agent, o, x, gc.reborrow()).unwrap();
        assert!(!has_property(agent, o, x, gc.reborrow()).unwrap());
        assert_eq!(get(agent, o, x, gc.reborrow()).unwrap(), Value::Undefined);
        // Deleting a missing property succeeds.
        assert!(o.internal_delete(agent, x, gc.reborrow()).unwrap());
    });
}

#[test]
fn reads_walk_the_prototype_chain() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let grandparent = object_with(agent, &[("deep", Value::from(3))], gc.reborrow());
        let parent = ordinary_object_create_with_prototype(agent, Some(grandparent));
        let child = ordinary_object_create_with_prototype(agent, Some(parent));
        let deep = key(agent, "deep");
        assert_eq!(get(agent, child, deep, gc.reborrow()).unwrap(), Value::from(3));
        assert!(has_property(agent, child, deep, gc.reborrow()).unwrap());
        assert!(!has_own_property(agent, child, deep, gc.reborrow()).unwrap());
        assert_eq!(
            child.internal_get_prototype_of(agent, gc.reborrow()).unwrap(),
            Some(parent)
        );
    });
}

#[test]
fn writes_shadow_inherited_data_properties() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let parent = object_with(agent, &[("x", Value::from(1))], gc.reborrow());
        let child = ordinary_object_create_with_prototype(agent, Some(parent));
        let x = key(agent, "x");
        set(agent, child, x, Value::from(2), true, gc.reborrow()).unwrap();
        assert_eq!(get(agent, child, x, gc.reborrow()).unwrap(), Value::from(2));
        assert_eq!(get(agent, parent, x, gc.reborrow()).unwrap(), Value::from(1));
        let desc = child
            .internal_get_own_property(agent, x, gc.reborrow())
            .unwrap()
            .unwrap();
        assert_eq!(desc, PropertyDescriptor::new_data_descriptor(Value::from(2)));
    });
}

#[test]
fn accessors_receive_the_receiver() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let getter = function(agent, "get", 0, return_this);
        let setter = function(agent, "set", 1, record_on_receiver);
        let parent = ordinary_object_create(agent);
        let prop = key(agent, "prop");
        define_property_or_throw(
            agent,
            parent,
            prop,
            PropertyDescriptor {
                get: Some(Some(getter)),
                set: Some(Some(setter)),
                enumerable: Some(true),
                configurable: Some(true),
                ..Default::default()
            },
            gc.reborrow(),
        )
        .unwrap();
        let child = ordinary_object_create_with_prototype(agent, Some(parent));
        assert_eq!(
            get(agent, child, prop, gc.reborrow()).unwrap(),
            Value::Object(child)
        );

        set(agent, child, prop, Value::from(7), true, gc.reborrow()).unwrap();
        let seen = key(agent, "seen");
        assert_eq!(get(agent, child, seen, gc.reborrow()).unwrap(), Value::from(7));
        assert!(!has_own_property(agent, parent, seen, gc.reborrow()).unwrap());
        // The setter did not create an own `prop` on the receiver.
        assert!(!has_own_property(agent, child, prop, gc.reborrow()).unwrap());

        let desc = parent
            .internal_get_own_property(agent, prop, gc.reborrow())
            .unwrap()
            .unwrap();
        assert!(desc.is_accessor_descriptor());
        assert_eq!(desc.writable, None);
        assert_eq!(desc.get, Some(Some(getter)));
    });
}

#[test]
fn failed_writes_are_benign_unless_throwing() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let o = ordinary_object_create(agent);
        let fixed = key(agent, "fixed");
        define_property_or_throw(
            agent,
            o,
            fixed,
            PropertyDescriptor {
                value: Some(Value::from(1)),
                writable: Some(false),
                ..Default::default()
            },
            gc.reborrow(),
        )
        .unwrap();
        assert!(
            !o.set_with_flags(agent, fixed, Value::from(2), PropOpFlags::NONE, gc.reborrow())
                .unwrap()
        );
        let result = o.set_with_flags(
            agent,
            fixed,
            Value::from(2),
            PropOpFlags::THROW_ON_ERROR,
            gc.reborrow(),
        );
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Cannot assign to read-only property 'fixed'",
            gc.reborrow(),
        );
        assert_eq!(get(agent, o, fixed, gc.reborrow()).unwrap(), Value::from(1));

        // A getter without a setter.
        let getter = function(agent, "get", 0, return_this);
        let only_getter = key(agent, "onlyGetter");
        define_property_or_throw(
            agent,
            o,
            only_getter,
            PropertyDescriptor {
                get: Some(Some(getter)),
                ..Default::default()
            },
            gc.reborrow(),
        )
        .unwrap();
        let result = o.set_with_flags(
            agent,
            only_getter,
            Value::Null,
            PropOpFlags::THROW_ON_ERROR,
            gc.reborrow(),
        );
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Cannot assign to property 'onlyGetter' which has only a getter",
            gc.reborrow(),
        );

        // Additions to a non-extensible object.
        assert!(o.internal_prevent_extensions(agent, gc.reborrow()).unwrap());
        let fresh = key(agent, "fresh");
        let result = set(agent, o, fresh, Value::Null, true, gc.reborrow());
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Cannot add new property 'fresh'",
            gc.reborrow(),
        );
        assert!(!create_data_property(agent, o, fresh, Value::Null, gc.reborrow()).unwrap());
    });
}

#[test]
fn inherited_read_only_properties_block_writes() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let parent = ordinary_object_create(agent);
        let x = key(agent, "x");
        define_property_or_throw(
            agent,
            parent,
            x,
            PropertyDescriptor {
                value: Some(Value::from(1)),
                writable: Some(false),
                configurable: Some(true),
                ..Default::default()
            },
            gc.reborrow(),
        )
        .unwrap();
        let child = ordinary_object_create_with_prototype(agent, Some(parent));
        let result = set(agent, child, x, Value::from(2), true, gc.reborrow());
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Cannot assign to read-only property 'x'",
            gc.reborrow(),
        );
        assert!(!has_own_property(agent, child, x, gc.reborrow()).unwrap());
        // Defining bypasses the inherited attribute.
        create_data_property_or_throw(agent, child, x, Value::from(2), gc.reborrow()).unwrap();
        assert_eq!(get(agent, child, x, gc.reborrow()).unwrap(), Value::from(2));
    });
}

#[test]
fn non_configurable_properties_reject_incompatible_updates() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let o = ordinary_object_create(agent);
        let x = key(agent, "x");
        define_property_or_throw(
            agent,
            o,
            x,
            PropertyDescriptor {
                value: Some(Value::from(1)),
                writable: Some(true),
                enumerable: Some(false),
                configurable: Some(false),
                ..Default::default()
            },
            gc.reborrow(),
        )
        .unwrap();
        // Writable non-configurable: the value may change, and writable may
        // be cleared once.
        define_property_or_throw(
            agent,
            o,
            x,
            PropertyDescriptor {
                value: Some(Value::from(2)),
                writable: Some(false),
                ..Default::default()
            },
            gc.reborrow(),
        )
        .unwrap();
        let getter = function(agent, "get", 0, return_this);
        for desc in [
            PropertyDescriptor {
                writable: Some(true),
                ..Default::default()
            },
            PropertyDescriptor {
                value: Some(Value::from(3)),
                ..Default::default()
            },
            PropertyDescriptor {
                enumerable: Some(true),
                ..Default::default()
            },
            PropertyDescriptor {
                configurable: Some(true),
                ..Default::default()
            },
            PropertyDescriptor {
                get: Some(Some(getter)),
                ..Default::default()
            },
        ] {
            assert!(!o.internal_define_own_property(agent, x, desc, gc.reborrow()).unwrap());
        }
        let result = define_property_or_throw(
            agent,
            o,
            x,
            PropertyDescriptor {
                configurable: Some(true),
                ..Default::default()
            },
            gc.reborrow(),
        );
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Property 'x' is not configurable",
            gc.reborrow(),
        );
        // Same value is always compatible.
        assert!(
            o.internal_define_own_property(
                agent,
                x,
                PropertyDescriptor {
                    value: Some(Value::from(2)),
                    ..Default::default()
                },
                gc.reborrow()
            )
            .unwrap()
        );
        let result = delete_property_or_throw(agent, o, x, gc.reborrow());
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Property 'x' is not configurable",
            gc.reborrow(),
        );
        assert_eq!(get(agent, o, x, gc.reborrow()).unwrap(), Value::from(2));
    });
}

#[test]
fn converting_between_data_and_accessor_properties() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let o = object_with(agent, &[("x", Value::from(1))], gc.reborrow());
        let x = key(agent, "x");
        let getter = function(agent, "get", 0, return_this);
        define_property_or_throw(
            agent,
            o,
            x,
            PropertyDescriptor {
                get: Some(Some(getter)),
                ..Default::default()
            },
            gc.reborrow(),
        )
        .unwrap();
        let desc = o
            .internal_get_own_property(agent, x, gc.reborrow())
            .unwrap()
            .unwrap();
        assert_eq!(desc.get, Some(Some(getter)));
        assert_eq!(desc.set, Some(None));
        assert_eq!(desc.enumerable, Some(true));
        assert_eq!(desc.configurable, Some(true));
        assert_eq!(get(agent, o, x, gc.reborrow()).unwrap(), Value::Object(o));

        // Back to data: writable defaults to false.
        define_property_or_throw(
            agent,
            o,
            x,
            PropertyDescriptor {
                value: Some(Value::from(5)),
                ..Default::default()
            },
            gc.reborrow(),
        )
        .unwrap();
        let desc = o
            .internal_get_own_property(agent, x, gc.reborrow())
            .unwrap()
            .unwrap();
        assert_eq!(desc.value, Some(Value::from(5)));
        assert_eq!(desc.writable, Some(false));
        assert_eq!(desc.get, None);
    });
}

#[test]
fn must_exist_reads_raise_reference_errors() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let o = ordinary_object_create(agent);
        let missing = key(agent, "missing");
        assert_eq!(
            o.get_with_flags(agent, missing, PropOpFlags::NONE, gc.reborrow())
                .unwrap(),
            Value::Undefined
        );
        let result = o.get_with_flags(
            agent,
            missing,
            PropOpFlags {
                must_exist: true,
                ..PropOpFlags::NONE
            },
            gc.reborrow(),
        );
        assert_throws(
            agent,
            result,
            ExceptionType::ReferenceError,
            "Property 'missing' doesn't exist",
            gc.reborrow(),
        );
    });
}

#[test]
fn reading_from_nullish_values_throws() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let x = key(agent, "x");
        let result = get_v(agent, Value::Undefined, x, gc.reborrow());
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Cannot read properties of undefined (reading 'x')",
            gc.reborrow(),
        );
        let result = get_v(agent, Value::Null, PropertyKey::Integer(0), gc.reborrow());
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Cannot read properties of null (reading '0')",
            gc.reborrow(),
        );
        // Primitives read through %Object.prototype%.
        let prototype = agent.intrinsics().object_prototype;
        let shared = key(agent, "shared");
        create_data_property_or_throw(agent, prototype, shared, Value::from(9), gc.reborrow())
            .unwrap();
        let primitive = string(agent, "text");
        assert_eq!(
            get_v(agent, primitive, shared, gc.reborrow()).unwrap(),
            Value::from(9)
        );
    });
}

#[test]
fn own_keys_order_and_filters() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let o = ordinary_object_create(agent);
        let symbol = PropertyKey::Symbol(Symbol::new(agent, Some("tag")));
        let hidden = key(agent, "hidden");
        let z = key(agent, "z");
        let a = key(agent, "a");
        create_data_property_or_throw(agent, o, symbol, Value::Null, gc.reborrow()).unwrap();
        create_data_property_or_throw(agent, o, z, Value::Null, gc.reborrow()).unwrap();
        create_data_property_or_throw(agent, o, PropertyKey::Integer(7), Value::Null, gc.reborrow())
            .unwrap();
        define_property_or_throw(
            agent,
            o,
            hidden,
            PropertyDescriptor {
                value: Some(Value::Null),
                ..Default::default()
            },
            gc.reborrow(),
        )
        .unwrap();
        create_data_property_or_throw(agent, o, a, Value::Null, gc.reborrow()).unwrap();
        create_data_property_or_throw(agent, o, PropertyKey::Integer(1), Value::Null, gc.reborrow())
            .unwrap();

        assert_eq!(
            o.internal_own_property_keys(agent, gc.reborrow()).unwrap(),
            vec![
                PropertyKey::Integer(1),
                PropertyKey::Integer(7),
                z,
                hidden,
                a,
                symbol
            ]
        );
        assert_eq!(
            o.own_property_keys_with_flags(agent, OwnKeysFlags::ENUMERABLE_STRINGS, gc.reborrow())
                .unwrap(),
            vec![PropertyKey::Integer(1), PropertyKey::Integer(7), z, a]
        );
        let symbols_only = OwnKeysFlags {
            include_symbols: true,
            include_non_symbols: false,
            include_non_enumerable: true,
        };
        assert_eq!(
            o.own_property_keys_with_flags(agent, symbols_only, gc.reborrow())
                .unwrap(),
            vec![symbol]
        );
    });
}

#[test]
fn prototype_cycles_are_rejected() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let a = ordinary_object_create(agent);
        let b = ordinary_object_create_with_prototype(agent, Some(a));
        assert!(!a.internal_set_prototype_of(agent, Some(b), gc.reborrow()).unwrap());
        let result = a.set_prototype_of_with_flags(
            agent,
            Some(a),
            PropOpFlags::THROW_ON_ERROR,
            gc.reborrow(),
        );
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Prototype cycle detected",
            gc.reborrow(),
        );
        // Setting the current prototype succeeds even when non-extensible.
        assert!(b.internal_prevent_extensions(agent, gc.reborrow()).unwrap());
        assert!(b.internal_set_prototype_of(agent, Some(a), gc.reborrow()).unwrap());
        let result =
            b.set_prototype_of_with_flags(agent, None, PropOpFlags::THROW_ON_ERROR, gc.reborrow());
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Object is not extensible.",
            gc.reborrow(),
        );
    });
}

#[test]
fn descriptor_objects_round_trip() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let getter = function(agent, "get", 0, return_this);
        let desc = PropertyDescriptor {
            get: Some(Some(getter)),
            set: Some(None),
            enumerable: Some(false),
            configurable: Some(true),
            ..Default::default()
        };
        let object = PropertyDescriptor::from_property_descriptor(Some(desc), agent).unwrap();
        let back =
            PropertyDescriptor::to_property_descriptor(agent, Value::Object(object), gc.reborrow())
                .unwrap();
        assert_eq!(back, desc);
        assert_eq!(PropertyDescriptor::from_property_descriptor(None, agent), None);

        let mut partial = PropertyDescriptor {
            value: Some(Value::from(1)),
            ..Default::default()
        };
        partial.complete_property_descriptor();
        assert!(partial.is_fully_populated());
        assert_eq!(partial.writable, Some(false));
        assert_eq!(partial.enumerable, Some(false));
    });
}

#[test]
fn invalid_descriptor_objects_throw() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let result = PropertyDescriptor::to_property_descriptor(agent, Value::from(1), gc.reborrow());
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Property descriptor must be an object",
            gc.reborrow(),
        );

        let not_callable = object_with(agent, &[("get", Value::from(1))], gc.reborrow());
        let result = PropertyDescriptor::to_property_descriptor(
            agent,
            Value::Object(not_callable),
            gc.reborrow(),
        );
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Getter must be a function",
            gc.reborrow(),
        );

        let getter = function(agent, "get", 0, return_this);
        let mixed = object_with(
            agent,
            &[("get", getter.into_value()), ("value", Value::from(1))],
            gc.reborrow(),
        );
        let result =
            PropertyDescriptor::to_property_descriptor(agent, Value::Object(mixed), gc.reborrow());
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Invalid property descriptor. Cannot both specify accessors and a value or writable attribute",
            gc.reborrow(),
        );
    });
}
