// Copyright 2025 Roost Contributors (https://github.com/roost-wm/roost)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The dispatch loop.
//!
//! One event at a time: encode, stage, deliver to every matching module in
//! registration order, clear the stage. The staged buffer being occupied is
//! the `Dispatching` state; empty is `Idle`. A module fault never stops
//! delivery to the remaining matches.

use std::sync::mpsc::Receiver;
use std::time::Instant;

use roost_core::encoding::Encode;
use roost_core::event::Event;

use crate::error::PluginError;
use crate::manager::{PluginId, PluginManager};

/// Report for one dispatched event.
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    /// Modules whose `handle` ran to completion, in delivery order.
    pub delivered: Vec<PluginId>,
    /// Modules that faulted, with the fault.
    pub faults: Vec<(PluginId, PluginError)>,
    /// Modules unloaded after reaching the fault threshold.
    pub unloaded: Vec<PluginId>,
    pub total_time_us: u64,
}

impl DispatchOutcome {
    pub fn all_delivered(&self) -> bool {
        self.faults.is_empty()
    }

    pub fn delivery_count(&self) -> usize {
        self.delivered.len()
    }
}

impl PluginManager {
    /// Deliver one event to every module with a matching subscription.
    ///
    /// Modules run synchronously, to completion or fault, one after another.
    /// Faults are contained: the offending module is skipped for the rest of
    /// this event and unloaded only once it reaches the configured
    /// consecutive-fault threshold.
    pub fn dispatch(&mut self, event: &Event) -> DispatchOutcome {
        let start = Instant::now();
        let mut outcome = DispatchOutcome::default();

        let matched = self.registry.read().matches(event);
        if matched.is_empty() {
            outcome.total_time_us = start.elapsed().as_micros() as u64;
            return outcome;
        }

        tracing::debug!(
            kind = event.kind().id(),
            matches = matched.len(),
            "dispatching event"
        );
        self.staged.stage(event.encode_to_vec());

        for id in matched {
            let Some(active) = self.modules.iter_mut().find(|m| m.info.id == id) else {
                tracing::error!(plugin = %id, "subscription references an unloaded module");
                continue;
            };

            match active.module.call_handle() {
                Ok(()) => {
                    active.info.consecutive_faults = 0;
                    outcome.delivered.push(id);
                }
                Err(fault) => {
                    active.info.consecutive_faults += 1;
                    tracing::warn!(
                        plugin = %id,
                        error = %fault,
                        consecutive = active.info.consecutive_faults,
                        "module fault during dispatch"
                    );
                    if active.info.consecutive_faults >= self.config.fault_threshold {
                        outcome.unloaded.push(id.clone());
                    }
                    outcome.faults.push((id, fault));
                }
            }
        }

        self.staged.clear();

        for id in &outcome.unloaded {
            tracing::warn!(plugin = %id, "fault threshold reached; unloading module");
            let _ = self.unload(id);
        }

        outcome.total_time_us = start.elapsed().as_micros() as u64;
        outcome
    }
}

/// Blocking driver: pulls events from the input source and dispatches until
/// the channel closes.
pub struct Runner {
    manager: PluginManager,
    rx: Receiver<Event>,
}

impl Runner {
    pub fn new(manager: PluginManager, rx: Receiver<Event>) -> Self {
        Self { manager, rx }
    }

    pub fn run(&mut self) {
        while let Ok(event) = self.rx.recv() {
            let outcome = self.manager.dispatch(&event);
            if !outcome.all_delivered() {
                tracing::debug!(
                    delivered = outcome.delivery_count(),
                    faults = outcome.faults.len(),
                    "dispatch completed with faults"
                );
            }
        }
        tracing::info!("input channel closed; dispatch loop exiting");
    }

    pub fn manager(&self) -> &PluginManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut PluginManager {
        &mut self.manager
    }

    pub fn into_manager(self) -> PluginManager {
        self.manager
    }
}
