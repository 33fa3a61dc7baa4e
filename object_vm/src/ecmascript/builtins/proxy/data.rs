// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    ecmascript::types::Object,
    heap::{HeapMarkAndSweep, WorkQueues},
};

#[derive(Debug, Clone)]
pub struct ProxyHeapData {
    /// \[\[ProxyTarget\]\]; `None` once revoked.
    pub(crate) target: Option<Object>,
    /// \[\[ProxyHandler\]\]; `None` once revoked.
    pub(crate) handler: Option<Object>,
    /// Set at creation if the target was callable; survives revocation.
    pub(crate) is_callable: bool,
    pub(crate) is_constructor: bool,
}

impl HeapMarkAndSweep for ProxyHeapData {
    fn mark_values(&self, queues: &mut WorkQueues) {
        if let Some(target) = self.target {
            queues.objects.push(target);
        }
        if let Some(handler) = self.handler {
            queues.objects.push(handler);
        }
    }
}
