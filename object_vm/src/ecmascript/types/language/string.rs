// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::ops::{Index, IndexMut};

use wtf8::Wtf8Buf;

use crate::{
    ecmascript::execution::Agent,
    heap::{HeapMarkAndSweep, WorkQueues, allocate, indexes::StringIndex},
};

/// ### [6.1.4 The String Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-string-type)
///
/// Strings are interned: two strings with equal contents always share the
/// same handle, which makes property key comparison an integer comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct String(pub(crate) StringIndex);

#[derive(Debug)]
pub struct StringHeapData {
    pub(crate) data: Wtf8Buf,
}

impl String {
    pub(crate) const fn get_index(self) -> usize {
        self.0.into_index()
    }

    /// Intern `str`, returning the existing handle if the contents were seen
    /// before.
    pub fn from_str(agent: &mut Agent, str: &str) -> String {
        let heap = &mut agent.heap;
        let hash = heap.hasher.hash_one(str);
        let strings = &heap.strings;
        if let Some(found) = heap
            .string_lookup
            .find(hash, |s| {
                strings[s.get_index()]
                    .as_ref()
                    .is_some_and(|data| data.data.as_str() == Some(str))
            })
            .copied()
        {
            return found;
        }
        let data = StringHeapData {
            data: Wtf8Buf::from_str(str),
        };
        let string = String(allocate(&mut heap.strings, &mut heap.free.strings, data));
        let strings = &heap.strings;
        let hasher = &heap.hasher;
        heap.string_lookup.insert_unique(hash, string, |s| {
            strings[s.get_index()]
                .as_ref()
                .map_or(0, |data| hasher.hash_one(&*data.data.to_string_lossy()))
        });
        string
    }

    /// The contents as UTF-8, if they contain no lone surrogates.
    pub fn as_str(self, agent: &Agent) -> Option<&str> {
        agent[self].data.as_str()
    }

    pub fn to_string_lossy(self, agent: &Agent) -> std::string::String {
        agent[self].data.to_string_lossy().into_owned()
    }

    pub fn is_empty(self, agent: &Agent) -> bool {
        agent[self].data.to_string_lossy().is_empty()
    }
}

impl Index<String> for Agent {
    type Output = StringHeapData;

    fn index(&self, index: String) -> &Self::Output {
        self.heap
            .strings
            .get(index.get_index())
            .expect("String out of bounds")
            .as_ref()
            .expect("String slot empty")
    }
}

impl IndexMut<String> for Agent {
    fn index_mut(&mut self, index: String) -> &mut Self::Output {
        self.heap
            .strings
            .get_mut(index.get_index())
            .expect("String out of bounds")
            .as_mut()
            .expect("String slot empty")
    }
}

impl HeapMarkAndSweep for String {
    fn mark_values(&self, queues: &mut WorkQueues) {
        queues.strings.push(*self);
    }
}

impl HeapMarkAndSweep for StringHeapData {
    fn mark_values(&self, _queues: &mut WorkQueues) {
        // Strings hold no handles.
    }
}
