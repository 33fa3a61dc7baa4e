// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod common;

use common::{assert_throws, key, number};
use object_vm::ecmascript::{
    abstract_operations::operations_on_objects::{
        create_data_property_or_throw, define_property_or_throw, get, has_property,
        integrity::Frozen, length_of_array_like, set, set_integrity_level,
    },
    builtins::{array_create, create_array_from_list},
    execution::{Agent, ExceptionType, Options},
    types::{InternalMethods, PropOpFlags, PropertyDescriptor, PropertyKey, Value},
};

fn values(range: std::ops::Range<i32>) -> Vec<Value> {
    range.map(Value::from).collect()
}

#[test]
fn writing_past_the_end_grows_the_length() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let array = create_array_from_list(agent, &values(1..4));
        assert_eq!(array.len(agent), 3);
        let o = array.into_object();
        set(agent, o, PropertyKey::Integer(5), Value::from(6), true, gc.reborrow()).unwrap();
        assert_eq!(array.len(agent), 6);
        let length = key(agent, "length");
        assert_eq!(number(get(agent, o, length, gc.reborrow()).unwrap()), 6.0);
        assert!(!has_property(agent, o, PropertyKey::Integer(4), gc.reborrow()).unwrap());
        assert_eq!(
            get(agent, o, PropertyKey::Integer(4), gc.reborrow()).unwrap(),
            Value::Undefined
        );
        assert_eq!(
            get(agent, o, PropertyKey::Integer(5), gc.reborrow()).unwrap(),
            Value::from(6)
        );
        assert_eq!(length_of_array_like(agent, o, gc.reborrow()).unwrap(), 6);
    });
}

#[test]
fn the_length_property_is_writable_but_hidden() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let array = create_array_from_list(agent, &values(0..2));
        let length = key(agent, "length");
        let desc = array
            .into_object()
            .internal_get_own_property(agent, length, gc.reborrow())
            .unwrap()
            .unwrap();
        assert_eq!(
            desc,
            PropertyDescriptor {
                value: Some(Value::from(2)),
                writable: Some(true),
                enumerable: Some(false),
                configurable: Some(false),
                ..Default::default()
            }
        );
        assert_eq!(
            array
                .into_object()
                .internal_own_property_keys(agent, gc.reborrow())
                .unwrap(),
            vec![PropertyKey::Integer(0), PropertyKey::Integer(1), length]
        );
    });
}

#[test]
fn shrinking_the_length_drops_elements() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let array = create_array_from_list(agent, &values(0..5));
        assert!(array.set_length(agent, 2, PropOpFlags::THROW_ON_ERROR, gc.nogc()).unwrap());
        assert_eq!(array.len(agent), 2);
        let o = array.into_object();
        assert!(o.indexed_range(agent).is_none_or(|(_, end)| end <= 2));
        assert!(!has_property(agent, o, PropertyKey::Integer(2), gc.reborrow()).unwrap());

        // Growing again does not bring elements back.
        let length = key(agent, "length");
        set(agent, o, length, Value::from(4), true, gc.reborrow()).unwrap();
        assert_eq!(array.len(agent), 4);
        assert_eq!(
            get(agent, o, PropertyKey::Integer(3), gc.reborrow()).unwrap(),
            Value::Undefined
        );
        assert_eq!(
            get(agent, o, PropertyKey::Integer(1), gc.reborrow()).unwrap(),
            Value::from(1)
        );

        set(agent, o, length, Value::from(0), true, gc.reborrow()).unwrap();
        assert!(array.is_empty(agent));
        assert_eq!(
            o.internal_own_property_keys(agent, gc.reborrow()).unwrap(),
            vec![length]
        );
    });
}

#[test]
fn far_away_indices_become_named_properties() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let array = create_array_from_list(agent, &values(1..4));
        let o = array.into_object();
        let far = PropertyKey::Integer(10_000_000);
        let capacity = o.indexed_capacity(agent);
        set(agent, o, far, Value::from(42), true, gc.reborrow()).unwrap();
        assert_eq!(o.indexed_capacity(agent), capacity);
        assert!(o.shape(agent).get_property(agent, far).is_some());
        assert!(o.shape(agent).has_index_like_properties(agent));
        assert_eq!(array.len(agent), 10_000_001);

        assert!(has_property(agent, o, far, gc.reborrow()).unwrap());
        assert_eq!(get(agent, o, far, gc.reborrow()).unwrap(), Value::from(42));
        let length = key(agent, "length");
        assert_eq!(
            o.internal_own_property_keys(agent, gc.reborrow()).unwrap(),
            vec![
                PropertyKey::Integer(0),
                PropertyKey::Integer(1),
                PropertyKey::Integer(2),
                far,
                length
            ]
        );

        assert!(o.internal_delete(agent, far, gc.reborrow()).unwrap());
        assert!(!has_property(agent, o, far, gc.reborrow()).unwrap());
        // Deleting never changes the length.
        assert_eq!(array.len(agent), 10_000_001);
        // Truncating below a named element removes it.
        set(agent, o, far, Value::from(1), true, gc.reborrow()).unwrap();
        assert!(array.set_length(agent, 3, PropOpFlags::NONE, gc.nogc()).unwrap());
        assert!(!has_property(agent, o, far, gc.reborrow()).unwrap());
    });
}

#[test]
fn non_configurable_elements_stop_truncation() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let array = create_array_from_list(agent, &values(1..4));
        let o = array.into_object();
        define_property_or_throw(
            agent,
            o,
            PropertyKey::Integer(1),
            PropertyDescriptor {
                configurable: Some(false),
                ..Default::default()
            },
            gc.reborrow(),
        )
        .unwrap();
        let result = array.set_length(agent, 0, PropOpFlags::THROW_ON_ERROR, gc.nogc());
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Cannot delete property '1'",
            gc.reborrow(),
        );
        assert_eq!(array.len(agent), 2);
        assert_eq!(
            get(agent, o, PropertyKey::Integer(0), gc.reborrow()).unwrap(),
            Value::from(1)
        );
        assert_eq!(
            get(agent, o, PropertyKey::Integer(1), gc.reborrow()).unwrap(),
            Value::from(2)
        );
        assert!(!has_property(agent, o, PropertyKey::Integer(2), gc.reborrow()).unwrap());
        assert!(!array.set_length(agent, 1, PropOpFlags::NONE, gc.nogc()).unwrap());
    });
}

#[test]
fn read_only_length_blocks_growth() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let array = create_array_from_list(agent, &values(0..2));
        let o = array.into_object();
        let length = key(agent, "length");
        define_property_or_throw(
            agent,
            o,
            length,
            PropertyDescriptor {
                writable: Some(false),
                ..Default::default()
            },
            gc.reborrow(),
        )
        .unwrap();
        let result = set(agent, o, PropertyKey::Integer(2), Value::Null, true, gc.reborrow());
        assert!(result.is_err());
        assert_eq!(array.len(agent), 2);
        // Existing elements stay writable.
        set(agent, o, PropertyKey::Integer(0), Value::from(5), true, gc.reborrow()).unwrap();

        let result = array.set_length(agent, 0, PropOpFlags::THROW_ON_ERROR, gc.nogc());
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Cannot assign to read-only property 'length'",
            gc.reborrow(),
        );
        let result = set(agent, o, length, Value::from(7), true, gc.reborrow());
        assert_throws(
            agent,
            result,
            ExceptionType::TypeError,
            "Cannot assign to read-only property 'length'",
            gc.reborrow(),
        );
        assert_eq!(array.len(agent), 2);
    });
}

#[test]
fn invalid_lengths_are_range_errors() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let result = array_create(agent, u64::from(u32::MAX) + 1, None, gc.nogc());
        assert_throws(
            agent,
            result,
            ExceptionType::RangeError,
            "Invalid array length",
            gc.reborrow(),
        );
        let array = array_create(agent, u64::from(u32::MAX), None, gc.nogc()).unwrap();
        assert_eq!(array.len(agent), u32::MAX);

        let array = create_array_from_list(agent, &[]);
        for invalid in [Value::from(-1), Value::from(1.5), Value::from(f64::NAN)] {
            let result = array.set_length_from_value(
                agent,
                invalid,
                PropOpFlags::THROW_ON_ERROR,
                gc.reborrow(),
            );
            assert_throws(
                agent,
                result,
                ExceptionType::RangeError,
                "Invalid array length",
                gc.reborrow(),
            );
        }
        let text = key(agent, "3").into_value(agent);
        assert!(
            array
                .set_length_from_value(agent, text, PropOpFlags::NONE, gc.reborrow())
                .unwrap()
        );
        assert_eq!(array.len(agent), 3);
    });
}

#[test]
fn frozen_arrays_reject_every_write() {
    let mut agent = Agent::new(Options::default());
    agent.run(|agent, mut gc| {
        let array = create_array_from_list(agent, &values(0..3));
        let o = array.into_object();
        assert!(set_integrity_level::<Frozen>(agent, o, gc.reborrow()).unwrap());
        assert!(o.is_frozen_flag(agent));

        assert!(
            !o.set_with_flags(
                agent,
                PropertyKey::Integer(0),
                Value::from(9),
                PropOpFlags::NONE,
                gc.reborrow()
            )
            .unwrap()
        );
        assert!(
            !o.set_with_flags(
                agent,
                PropertyKey::Integer(3),
                Value::from(9),
                PropOpFlags::NONE,
                gc.reborrow()
            )
            .unwrap()
        );
        assert!(!o.internal_delete(agent, PropertyKey::Integer(2), gc.reborrow()).unwrap());
        assert!(!array.set_length(agent, 0, PropOpFlags::NONE, gc.nogc()).unwrap());
        let result = create_data_property_or_throw(
            agent,
            o,
            PropertyKey::Integer(3),
            Value::Null,
            gc.reborrow(),
        );
        assert!(result.is_err());

        assert_eq!(array.len(agent), 3);
        assert_eq!(
            get(agent, o, PropertyKey::Integer(0), gc.reborrow()).unwrap(),
            Value::from(0)
        );
        let desc = o
            .internal_get_own_property(agent, PropertyKey::Integer(1), gc.reborrow())
            .unwrap()
            .unwrap();
        assert_eq!(desc.writable, Some(false));
        assert_eq!(desc.configurable, Some(false));
        assert_eq!(desc.enumerable, Some(true));
    });
}
