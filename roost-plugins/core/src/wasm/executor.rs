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

//! WASM module executor.
//!
//! Compiles and instantiates plugin artifacts with wasmtime and runs their
//! `init`/`handle` entry points under a per-call fuel budget. A trap, a
//! missing export mid-call, or an exhausted budget is reported as a
//! [`PluginError::ModuleFault`] and never unwinds into the host.

use wasmtime::{Config, Engine, Linker, Module, Store, Trap, TypedFunc};

use crate::config::RuntimeConfig;
use crate::error::{Phase, PluginError, PluginResult};
use crate::manager::PluginId;

use super::host_functions::{self, HostState, ModuleMetrics};

/// Shared engine and linker for every module the runtime loads.
pub struct WasmExecutor {
    engine: Engine,
    linker: Linker<HostState>,
    max_fuel: u64,
}

impl WasmExecutor {
    pub fn new(config: &RuntimeConfig) -> PluginResult<Self> {
        let mut engine_config = Config::new();
        // Fuel metering is the per-call execution budget.
        engine_config.consume_fuel(true);

        let engine = Engine::new(&engine_config)
            .map_err(|e| PluginError::LoadFailed(format!("failed to create WASM engine: {e}")))?;

        let mut linker = Linker::new(&engine);
        host_functions::add_to_linker(&mut linker)
            .map_err(|e| PluginError::LoadFailed(format!("failed to build host imports: {e}")))?;

        Ok(Self {
            engine,
            linker,
            max_fuel: config.max_fuel,
        })
    }

    /// Compile and instantiate one module. Does not call `init`.
    pub fn instantiate(
        &self,
        id: PluginId,
        state: HostState,
        wasm_bytes: &[u8],
    ) -> PluginResult<LoadedModule> {
        let module = Module::new(&self.engine, wasm_bytes)
            .map_err(|e| PluginError::InvalidModule(e.to_string()))?;

        let mut store = Store::new(&self.engine, state);
        store.limiter(|state| &mut state.limits);
        store
            .set_fuel(self.max_fuel)
            .map_err(|e| PluginError::LoadFailed(e.to_string()))?;

        let instance = self
            .linker
            .instantiate(&mut store, &module)
            .map_err(|e| PluginError::LoadFailed(e.to_string()))?;

        let init = instance
            .get_typed_func::<(), ()>(&mut store, Phase::Init.export_name())
            .map_err(|_| PluginError::MissingExport {
                plugin: id.clone(),
                export: Phase::Init.export_name(),
            })?;
        let handle = instance
            .get_typed_func::<(), ()>(&mut store, Phase::Handle.export_name())
            .map_err(|_| PluginError::MissingExport {
                plugin: id.clone(),
                export: Phase::Handle.export_name(),
            })?;

        Ok(LoadedModule {
            id,
            store,
            init,
            handle,
            max_fuel: self.max_fuel,
        })
    }
}

/// A live plugin instance with its own store, memory, and fuel budget.
pub struct LoadedModule {
    id: PluginId,
    store: Store<HostState>,
    init: TypedFunc<(), ()>,
    handle: TypedFunc<(), ()>,
    max_fuel: u64,
}

impl LoadedModule {
    pub fn id(&self) -> &PluginId {
        &self.id
    }

    pub fn metrics(&self) -> ModuleMetrics {
        self.store.data().metrics
    }

    pub(crate) fn call_init(&mut self) -> PluginResult<()> {
        self.call(Phase::Init)
    }

    pub(crate) fn call_handle(&mut self) -> PluginResult<()> {
        self.call(Phase::Handle)
    }

    fn call(&mut self, phase: Phase) -> PluginResult<()> {
        let func = match phase {
            Phase::Init => &self.init,
            Phase::Handle => &self.handle,
        };

        // Refill the budget: each invocation gets the full allowance.
        self.store
            .set_fuel(self.max_fuel)
            .map_err(|e| PluginError::LoadFailed(e.to_string()))?;

        match func.call(&mut self.store, ()) {
            Ok(()) => {
                if phase == Phase::Handle {
                    self.store.data_mut().metrics.handle_count += 1;
                }
                Ok(())
            }
            Err(err) => {
                self.store.data_mut().metrics.fault_count += 1;
                let reason = if matches!(err.downcast_ref::<Trap>(), Some(Trap::OutOfFuel)) {
                    "execution budget exhausted".to_string()
                } else {
                    err.to_string()
                };
                Err(PluginError::ModuleFault {
                    plugin: self.id.clone(),
                    phase,
                    reason,
                })
            }
        }
    }
}
