// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::ops::Index;

use super::String;
use crate::{
    ecmascript::execution::Agent,
    heap::{CreateHeapData, Heap, HeapMarkAndSweep, WorkQueues, allocate, indexes::SymbolIndex},
};

/// ### [6.1.5 The Symbol Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-symbol-type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(pub(crate) SymbolIndex);

#[derive(Debug)]
pub struct SymbolHeapData {
    pub(crate) descriptor: Option<String>,
}

impl Symbol {
    pub(crate) const fn get_index(self) -> usize {
        self.0.into_index()
    }

    pub fn new(agent: &mut Agent, description: Option<&str>) -> Symbol {
        let descriptor = description.map(|description| String::from_str(agent, description));
        agent.heap.create(SymbolHeapData { descriptor })
    }

    pub fn description(self, agent: &Agent) -> Option<String> {
        agent[self].descriptor
    }

    /// ### [20.4.3.3.1 SymbolDescriptiveString ( sym )](https://tc39.es/ecma262/#sec-symboldescriptivestring)
    pub fn descriptive_string(self, agent: &Agent) -> std::string::String {
        match agent[self].descriptor {
            Some(descriptor) => format!("Symbol({})", descriptor.to_string_lossy(agent)),
            None => "Symbol()".to_string(),
        }
    }
}

impl CreateHeapData<SymbolHeapData, Symbol> for Heap {
    fn create(&mut self, data: SymbolHeapData) -> Symbol {
        Symbol(allocate(&mut self.symbols, &mut self.free.symbols, data))
    }
}

impl Index<Symbol> for Agent {
    type Output = SymbolHeapData;

    fn index(&self, index: Symbol) -> &Self::Output {
        self.heap
            .symbols
            .get(index.get_index())
            .expect("Symbol out of bounds")
            .as_ref()
            .expect("Symbol slot empty")
    }
}

impl HeapMarkAndSweep for SymbolHeapData {
    fn mark_values(&self, queues: &mut WorkQueues) {
        if let Some(descriptor) = self.descriptor {
            queues.strings.push(descriptor);
        }
    }
}
