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

//! Module lifecycle: discovery, load, init, fault bookkeeping, unload.

use std::fmt::{self, Display};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::RuntimeConfig;
use crate::error::{PluginError, PluginResult};
use crate::registry::SubscriptionRegistry;
use crate::shell::{LogSink, TracingLogSink, WindowOps};
use crate::stage::StagedEvent;
use crate::wasm::{HostState, LoadedModule, ModuleMetrics, WasmExecutor};
use crate::PLUGIN_EXTENSION;

/// Identity of a loaded module. Unique among live modules; derived from the
/// artifact's file stem on directory loads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PluginId(String);

impl PluginId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PluginId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PluginId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Bookkeeping for one loaded module.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleInfo {
    pub id: PluginId,
    /// blake3 hash of the artifact, hex-encoded.
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
    /// Faults since the last successful `handle` call.
    pub consecutive_faults: u32,
}

pub(crate) struct ActiveModule {
    pub(crate) info: ModuleInfo,
    pub(crate) module: LoadedModule,
}

/// Owner of every loaded module and of the subscription registry.
///
/// Modules are loaded and initialized strictly sequentially, before event
/// dispatch begins; dispatch itself runs on the same thread (see
/// [`dispatch`](PluginManager::dispatch) and
/// [`Runner`](crate::dispatcher::Runner)).
pub struct PluginManager {
    pub(crate) config: RuntimeConfig,
    executor: WasmExecutor,
    pub(crate) registry: Arc<RwLock<SubscriptionRegistry>>,
    pub(crate) staged: StagedEvent,
    window_ops: Arc<dyn WindowOps>,
    log_sink: Arc<dyn LogSink>,
    /// Load order; delivery order within a dispatch follows subscription
    /// registration order, which init-time subscribes tie to load order.
    pub(crate) modules: Vec<ActiveModule>,
}

impl PluginManager {
    /// Create a manager that logs plugin diagnostics through `tracing`.
    pub fn new(config: RuntimeConfig, window_ops: Arc<dyn WindowOps>) -> PluginResult<Self> {
        Self::with_log_sink(config, window_ops, Arc::new(TracingLogSink))
    }

    pub fn with_log_sink(
        config: RuntimeConfig,
        window_ops: Arc<dyn WindowOps>,
        log_sink: Arc<dyn LogSink>,
    ) -> PluginResult<Self> {
        let executor = WasmExecutor::new(&config)?;
        Ok(Self {
            config,
            executor,
            registry: Arc::new(RwLock::new(SubscriptionRegistry::new())),
            staged: StagedEvent::new(),
            window_ops,
            log_sink,
            modules: Vec::new(),
        })
    }

    /// Load a module from raw WASM bytes and run its `init`.
    ///
    /// A module whose `init` faults is discarded along with any
    /// subscriptions it managed to register; the error is returned so the
    /// caller can report it, but other modules are unaffected.
    pub fn load_from_bytes(&mut self, id: impl Into<PluginId>, wasm: &[u8]) -> PluginResult<()> {
        let id = id.into();
        if self.modules.iter().any(|m| m.info.id == id) {
            return Err(PluginError::DuplicateModuleId(id));
        }

        let fingerprint = hex::encode(blake3::hash(wasm).as_bytes());
        let state = HostState::new(
            id.clone(),
            Arc::clone(&self.registry),
            self.staged.clone(),
            Arc::clone(&self.window_ops),
            Arc::clone(&self.log_sink),
            self.config.max_memory_bytes,
        );

        let mut module = self.executor.instantiate(id.clone(), state, wasm)?;

        if let Err(fault) = module.call_init() {
            // A half-initialized module must not leave subscriptions behind.
            self.registry.write().unsubscribe_all(&id);
            return Err(fault);
        }

        tracing::info!(plugin = %id, %fingerprint, "module initialized");
        self.modules.push(ActiveModule {
            info: ModuleInfo {
                id,
                fingerprint,
                loaded_at: Utc::now(),
                consecutive_faults: 0,
            },
            module,
        });
        Ok(())
    }

    /// Load a single artifact, deriving the module id from its file stem.
    pub fn load_from_file(&mut self, path: &Path) -> PluginResult<PluginId> {
        let id: PluginId = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| {
                PluginError::LoadFailed(format!(
                    "cannot derive a module id from '{}'",
                    path.display()
                ))
            })?
            .into();

        let wasm = std::fs::read(path)?;
        self.load_from_bytes(id.clone(), &wasm)?;
        Ok(id)
    }

    /// Scan the configured plugin directory and load every `.wasm` artifact,
    /// in file-name order. Individual load failures are logged and skipped;
    /// the scan continues.
    pub fn load_plugin_dir(&mut self) -> PluginResult<Vec<PluginId>> {
        let dir = self.config.plugin_dir.clone();
        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "plugin directory not found; starting without plugins");
            return Ok(Vec::new());
        }

        let mut loaded = Vec::new();
        for entry in WalkDir::new(&dir).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| PluginError::LoadFailed(e.to_string()))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(PLUGIN_EXTENSION)
            {
                continue;
            }

            match self.load_from_file(path) {
                Ok(id) => loaded.push(id),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping plugin");
                }
            }
        }
        Ok(loaded)
    }

    /// Unload a module and prune every subscription it holds.
    pub fn unload(&mut self, id: &PluginId) -> PluginResult<()> {
        let position = self
            .modules
            .iter()
            .position(|m| m.info.id == *id)
            .ok_or_else(|| PluginError::NotLoaded(id.clone()))?;

        self.modules.remove(position);
        self.registry.write().unsubscribe_all(id);
        tracing::info!(plugin = %id, "module unloaded");
        Ok(())
    }

    pub fn is_loaded(&self, id: &PluginId) -> bool {
        self.modules.iter().any(|m| m.info.id == *id)
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn module_info(&self, id: &PluginId) -> Option<ModuleInfo> {
        self.modules
            .iter()
            .find(|m| m.info.id == *id)
            .map(|m| m.info.clone())
    }

    pub fn module_metrics(&self, id: &PluginId) -> Option<ModuleMetrics> {
        self.modules
            .iter()
            .find(|m| m.info.id == *id)
            .map(|m| m.module.metrics())
    }

    pub fn list_modules(&self) -> Vec<ModuleInfo> {
        self.modules.iter().map(|m| m.info.clone()).collect()
    }

    /// Number of live subscriptions across all modules.
    pub fn subscription_count(&self) -> usize {
        self.registry.read().len()
    }
}
