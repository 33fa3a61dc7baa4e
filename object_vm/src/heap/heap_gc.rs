// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{
    Heap,
    heap_bits::{HeapBits, HeapMarkAndSweep, WorkQueues},
};
use crate::ecmascript::{builtins::ordinary::shape::Shape, execution::Agent};

/// Trace one work queue: every handle not yet marked gets marked and its
/// heap data traced in turn.
macro_rules! mark_queue {
    ($queues: ident, $bits: ident, $heap: ident, $field: ident) => {{
        let mut marks = std::mem::take(&mut $queues.$field);
        marks.sort_unstable();
        marks.dedup();
        for handle in marks {
            let index = handle.get_index();
            let Some(marked) = $bits.$field.get_mut(index) else {
                continue;
            };
            if *marked {
                // Already marked, ignore
                continue;
            }
            *marked = true;
            if let Some(Some(data)) = $heap.$field.get(index) {
                data.mark_values(&mut $queues);
            }
        }
    }};
}

/// Empty every unmarked slot and hand it to the free list. Slots are pushed
/// from the back so that the lowest indexes are reused first.
fn sweep_arena<T>(arena: &mut [Option<T>], bits: &[bool], free: &mut Vec<u32>) -> usize {
    let mut freed = 0;
    for (index, (slot, &marked)) in arena.iter_mut().zip(bits).enumerate().rev() {
        if !marked && slot.is_some() {
            *slot = None;
            free.push(index as u32);
            freed += 1;
        }
    }
    freed
}

/// Collect everything that is not reachable from the roots of the agent:
/// the root stack, the intrinsics, the predefined strings and the root shape.
///
/// Handles never move, so live handles held by the embedder remain valid.
/// Freed slots go to the heap's free lists and are reused by later
/// allocations.
pub(crate) fn heap_gc(agent: &mut Agent) {
    let mut bits = HeapBits::new(&agent.heap);
    let mut queues = WorkQueues::new(&agent.heap);

    agent.stack_refs.borrow().mark_values(&mut queues);
    agent.intrinsics.mark_values(&mut queues);
    agent.predefined.mark_values(&mut queues);
    queues.shapes.push(Shape::ROOT);

    let heap = &mut agent.heap;
    while !queues.is_empty() {
        mark_queue!(queues, bits, heap, accessors);
        mark_queue!(queues, bits, heap, objects);
        mark_queue!(queues, bits, heap, shapes);
        mark_queue!(queues, bits, heap, strings);
        mark_queue!(queues, bits, heap, symbols);
    }

    sweep(heap, &bits);
}

fn sweep(heap: &mut Heap, bits: &HeapBits) {
    let Heap {
        accessors,
        objects,
        shapes,
        strings,
        string_lookup,
        symbols,
        free,
        hasher: _,
    } = heap;
    let freed_accessors = sweep_arena(accessors, &bits.accessors, &mut free.accessors);
    let freed_objects = sweep_arena(objects, &bits.objects, &mut free.objects);
    let freed_shapes = sweep_arena(shapes, &bits.shapes, &mut free.shapes);
    let freed_strings = sweep_arena(strings, &bits.strings, &mut free.strings);
    let freed_symbols = sweep_arena(symbols, &bits.symbols, &mut free.symbols);

    // Transition tables and the interning table hold their entries weakly.
    let shape_is_alive = |shape: Shape| bits.shapes.get(shape.get_index()).copied() == Some(true);
    for shape in shapes.iter_mut().flatten() {
        shape.sweep_transitions(shape_is_alive);
    }
    string_lookup.retain(|string| bits.strings.get(string.get_index()).copied() == Some(true));

    log::debug!(
        "Garbage collection freed {freed_objects} objects, {freed_shapes} shapes, \
         {freed_strings} strings, {freed_symbols} symbols and {freed_accessors} accessors"
    );
}
