// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod common;

use common::{function, key, object_with, string};
use object_vm::{
    ecmascript::{
        abstract_operations::operations_on_objects::{
            call_function, create_data_property_or_throw, define_property_or_throw, get,
        },
        builtins::{create_array_from_list, ordinary::ordinary_object_create},
        execution::{Agent, JsResult, Options},
        types::{ArgumentsList, PropertyDescriptor, PropertyKey, Symbol, Value},
    },
    engine::{GcScope, Rootable},
};

/// Agent with its intrinsics in place and no garbage left over.
fn settled_agent(options: Options) -> Agent {
    let mut agent = Agent::new(options);
    agent.run(|agent, gc| {
        agent.intrinsics();
        agent.predefined();
        agent.gc(gc);
    });
    agent
}

fn return_this(
    _agent: &mut Agent,
    this: Value,
    _arguments: ArgumentsList,
    _gc: GcScope,
) -> JsResult<Value> {
    Ok(this)
}

/// Requests a collection, then reports whether the heap is unchanged.
fn collect_inside_call(
    agent: &mut Agent,
    _this: Value,
    arguments: ArgumentsList,
    mut gc: GcScope,
) -> JsResult<Value> {
    let before = agent.heap_size();
    agent.gc(gc.reborrow());
    let unchanged = agent.heap_size() == before;
    // The unrooted argument is still intact.
    let Value::Object(argument) = arguments.get(0) else {
        return Ok(Value::from(false));
    };
    let inner = PropertyKey::from_str(agent, "inner");
    let value = get(agent, argument, inner, gc)?;
    Ok(Value::from(unchanged && value == Value::from(1)))
}

#[test]
fn unreachable_objects_are_reclaimed() {
    let mut agent = settled_agent(Options::default());
    let baseline = agent.heap_size();
    agent.run(|agent, mut gc| {
        for index in 0..100 {
            let name = format!("property{index}");
            object_with(agent, &[(name.as_str(), Value::from(index))], gc.reborrow());
        }
        assert!(agent.heap_size() > baseline + 100);
        agent.gc(gc);
    });
    assert_eq!(agent.heap_size(), baseline);
}

#[test]
fn freed_slots_are_reused() {
    let mut agent = settled_agent(Options::default());
    let baseline = agent.heap_slot_count();
    agent.run(|agent, mut gc| {
        for _ in 0..10_000 {
            let o = ordinary_object_create(agent);
            let x = key(agent, "x");
            create_data_property_or_throw(agent, o, x, Value::from(1), gc.reborrow()).unwrap();
            agent.gc(gc.reborrow());
        }
    });
    // One object, its shape and the key string at most.
    assert!(agent.heap_slot_count() <= baseline + 3);
}

#[test]
fn reused_slots_hold_fresh_data() {
    let mut agent = settled_agent(Options::default());
    agent.run(|agent, mut gc| {
        let kept = object_with(agent, &[("a", Value::from(1))], gc.reborrow());
        let scoped = kept.scope(agent, gc.nogc());
        for index in 0..10 {
            object_with(agent, &[("garbage", Value::from(index))], gc.reborrow());
        }
        agent.gc(gc.reborrow());
        let slots = agent.heap_slot_count();

        let fresh = object_with(agent, &[("b", Value::from(2))], gc.reborrow());
        assert_eq!(agent.heap_slot_count(), slots);
        let (a, b) = (key(agent, "a"), key(agent, "b"));
        let kept = scoped.get(agent);
        assert_eq!(get(agent, kept, a, gc.reborrow()).unwrap(), Value::from(1));
        assert_eq!(get(agent, fresh, b, gc.reborrow()).unwrap(), Value::from(2));
        assert_eq!(fresh.shape(agent).keys(agent), vec![b]);
        assert_eq!(get(agent, fresh, a, gc.reborrow()).unwrap(), Value::Undefined);
    });
}

#[test]
fn rooted_values_survive_collection() {
    let mut agent = settled_agent(Options::default());
    agent.run(|agent, mut gc| {
        let text = string(agent, "kept alive");
        let inner = object_with(agent, &[("text", text)], gc.reborrow());
        let outer = object_with(agent, &[("inner", inner.into())], gc.reborrow());
        let symbol = Symbol::new(agent, Some("tag"));
        let getter = function(agent, "get", 0, return_this);
        define_property_or_throw(
            agent,
            outer,
            PropertyKey::Symbol(symbol),
            PropertyDescriptor {
                get: Some(Some(getter)),
                configurable: Some(true),
                ..Default::default()
            },
            gc.reborrow(),
        )
        .unwrap();
        let scoped = outer.scope(agent, gc.nogc());
        let scoped_symbol = symbol.scope(agent, gc.nogc());
        ordinary_object_create(agent);

        agent.gc(gc.reborrow());

        let outer = scoped.get(agent);
        let inner_key = key(agent, "inner");
        let Value::Object(inner) = get(agent, outer, inner_key, gc.reborrow()).unwrap() else {
            panic!("inner object was lost");
        };
        let text_key = key(agent, "text");
        let text = get(agent, inner, text_key, gc.reborrow()).unwrap();
        assert_eq!(text, string(agent, "kept alive"));
        let symbol = PropertyKey::Symbol(scoped_symbol.get(agent));
        assert_eq!(
            get(agent, outer, symbol, gc.reborrow()).unwrap(),
            Value::Object(outer)
        );
    });
}

#[test]
fn roots_are_released_with_their_scope() {
    let mut agent = settled_agent(Options::default());
    agent.run(|agent, gc| {
        let before = agent.root_count();
        let o = ordinary_object_create(agent);
        let inside = agent.root_scope(|agent| {
            let scoped = o.scope(agent, gc.nogc());
            assert_eq!(scoped.get(agent), o);
            agent.root_count()
        });
        assert_eq!(inside, before + 1);
        assert_eq!(agent.root_count(), before);

        let scoped = o.scope(agent, gc.nogc());
        let replacement = ordinary_object_create(agent);
        scoped.replace(agent, replacement);
        assert_eq!(scoped.get(agent), replacement);
    });
    assert_eq!(agent.root_count(), 0);
}

#[test]
fn dead_transitions_are_forgotten() {
    let mut agent = settled_agent(Options::default());
    agent.run(|agent, mut gc| {
        let kept = object_with(agent, &[("kept", Value::from(1))], gc.reborrow());
        let kept_shape = kept.shape(agent);
        let scoped = kept.scope(agent, gc.nogc());
        object_with(agent, &[("dropped", Value::from(1))], gc.reborrow());

        agent.gc(gc.reborrow());

        // The live object keeps its shape and its transition.
        let again = object_with(agent, &[("kept", Value::from(2))], gc.reborrow());
        assert_eq!(again.shape(agent), kept_shape);
        assert_eq!(scoped.get(agent).shape(agent), kept_shape);

        // The freed shape slot goes to an unrelated shape; the dead
        // transition must not lead there.
        let other = object_with(agent, &[("other", Value::from(2))], gc.reborrow());
        let fresh = object_with(agent, &[("dropped", Value::from(3))], gc.reborrow());
        assert_ne!(fresh.shape(agent), other.shape(agent));
        let dropped_key = key(agent, "dropped");
        assert_eq!(
            get(agent, fresh, dropped_key, gc.reborrow()).unwrap(),
            Value::from(3)
        );
        assert_eq!(fresh.shape(agent).keys(agent), vec![dropped_key]);
    });
}

#[test]
fn collection_waits_for_native_calls_to_return() {
    let mut agent = settled_agent(Options::default());
    agent.run(|agent, mut gc| {
        let collector = function(agent, "collect", 1, collect_inside_call);
        let scoped = collector.scope(agent, gc.nogc());
        // Garbage that an immediate collection would free.
        for _ in 0..10 {
            create_array_from_list(agent, &[Value::Null]);
        }
        let argument = object_with(agent, &[("inner", Value::from(1))], gc.reborrow());
        let values = [Value::Object(argument)];
        let result = call_function(
            agent,
            collector,
            Value::Undefined,
            Some(ArgumentsList::new(&values)),
            gc.reborrow(),
        )
        .unwrap();
        assert_eq!(result, Value::from(true));

        let before = agent.heap_size();
        agent.gc(gc.reborrow());
        assert!(agent.heap_size() < before);
        // The rooted collector is still callable.
        let collector = scoped.get(agent);
        let argument = object_with(agent, &[("inner", Value::from(1))], gc.reborrow());
        let values = [Value::Object(argument)];
        call_function(
            agent,
            collector,
            Value::Undefined,
            Some(ArgumentsList::new(&values)),
            gc.reborrow(),
        )
        .unwrap();
    });
}

#[test]
fn disabled_collection_keeps_everything() {
    let mut agent = settled_agent(Options {
        disable_gc: true,
        ..Default::default()
    });
    agent.run(|agent, mut gc| {
        let o = ordinary_object_create(agent);
        let x = key(agent, "x");
        create_data_property_or_throw(agent, o, x, Value::from(1), gc.reborrow()).unwrap();
        let before = agent.heap_size();
        agent.gc(gc.reborrow());
        assert_eq!(agent.heap_size(), before);
        assert_eq!(get(agent, o, x, gc.reborrow()).unwrap(), Value::from(1));
    });
}
