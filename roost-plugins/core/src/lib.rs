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

//! Roost plugin runtime
//!
//! A sandboxed WASM plugin host for window-manager events. Plugins are core
//! WASM modules exposing two entry points, `init` and `handle`, and talk
//! back to the host exclusively through a small `env` import surface:
//! `subscribe`/`unsubscribe`, `event_len`/`event_read`, `debug_log`, and
//! window commands (`move_window`, `resize_window`, `focus_window`,
//! `close_window`).
//!
//! # Architecture
//!
//! - [`SubscriptionRegistry`]: per-plugin `(kind, optional filter)` interest
//!   table, populated from a module's own `init`, read during dispatch,
//!   pruned at unload.
//! - [`PluginManager`]: loads artifacts, enforces id uniqueness, runs `init`,
//!   tracks faults, unloads.
//! - Dispatch ([`PluginManager::dispatch`] / [`Runner`]): stages one encoded
//!   event at a time and delivers it synchronously to every matching module
//!   in registration order. A trap or exhausted fuel budget faults that one
//!   invocation only.
//!
//! Isolation is wasmtime's: each module gets its own store, memory cap, and
//! per-call fuel budget, and every host import bounds-checks the guest
//! pointers it is handed.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use roost_plugins::{PluginManager, RuntimeConfig, NullWindowOps};
//!
//! let mut manager = PluginManager::new(
//!     RuntimeConfig::default(),
//!     Arc::new(NullWindowOps),
//! )?;
//! manager.load_plugin_dir()?;
//!
//! // Feed events from the input hook:
//! let outcome = manager.dispatch(&event);
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod manager;
pub mod registry;
pub mod shell;
pub mod stage;
pub mod wasm;

// Re-exports
pub use config::RuntimeConfig;
pub use dispatcher::{DispatchOutcome, Runner};
pub use error::{Phase, PluginError, PluginResult};
pub use manager::{ModuleInfo, PluginId, PluginManager};
pub use registry::{SubscribeError, SubscriptionRegistry};
pub use shell::{LogSink, NullWindowOps, TracingLogSink, WindowOpError, WindowOps};
pub use stage::StagedEvent;
pub use wasm::{LoadedModule, ModuleMetrics, WasmExecutor};

/// File extension plugin artifacts are discovered by.
pub const PLUGIN_EXTENSION: &str = "wasm";
