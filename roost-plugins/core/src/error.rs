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

//! Runtime error types.

use std::fmt;

use thiserror::Error;

use crate::manager::PluginId;

/// Result type for runtime operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors surfaced by the plugin runtime.
///
/// None of these abort dispatch: module failures are contained to the
/// offending module, logged, and reported through
/// [`DispatchOutcome`](crate::dispatcher::DispatchOutcome).
#[derive(Debug, Error)]
pub enum PluginError {
    // Load-time errors
    #[error("a module with id '{0}' is already loaded")]
    DuplicateModuleId(PluginId),

    #[error("module '{0}' is not loaded")]
    NotLoaded(PluginId),

    #[error("artifact is not valid WASM: {0}")]
    InvalidModule(String),

    #[error("module load failed: {0}")]
    LoadFailed(String),

    #[error("module '{plugin}' does not export `{export}`")]
    MissingExport {
        plugin: PluginId,
        export: &'static str,
    },

    // Run-time errors
    #[error("module '{plugin}' faulted during {phase}: {reason}")]
    ModuleFault {
        plugin: PluginId,
        phase: Phase,
        reason: String,
    },

    // Environment errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid runtime config: {0}")]
    Config(#[from] toml::de::Error),
}

impl PluginError {
    /// Whether this error is a contained module failure rather than a host
    /// problem.
    pub fn is_module_fault(&self) -> bool {
        matches!(self, Self::ModuleFault { .. })
    }
}

/// The module entry point an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Handle,
}

impl Phase {
    pub(crate) fn export_name(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Handle => "handle",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.export_name())
    }
}
