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

//! Runtime configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::PluginResult;

/// Configuration for the plugin runtime.
///
/// # Example TOML
///
/// ```toml
/// plugin_dir = "/etc/roost/plugins"
/// max_memory_bytes = 16777216
/// max_fuel = 50000000
/// fault_threshold = 3
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    /// Directory scanned for `.wasm` plugin artifacts.
    #[serde(default = "default_plugin_dir")]
    pub plugin_dir: PathBuf,

    /// Linear-memory cap per module instance, in bytes.
    #[serde(default = "default_max_memory")]
    pub max_memory_bytes: usize,

    /// Fuel (instruction) budget per `init`/`handle` invocation. A call that
    /// exhausts it traps and is reported as a module fault.
    #[serde(default = "default_max_fuel")]
    pub max_fuel: u64,

    /// Consecutive faults after which a module is unloaded.
    #[serde(default = "default_fault_threshold")]
    pub fault_threshold: u32,
}

fn default_plugin_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("roost")
        .join("plugins")
}

fn default_max_memory() -> usize {
    16 * 1024 * 1024 // 16MB
}

fn default_max_fuel() -> u64 {
    50_000_000
}

fn default_fault_threshold() -> u32 {
    3
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            plugin_dir: default_plugin_dir(),
            max_memory_bytes: default_max_memory(),
            max_fuel: default_max_fuel(),
            fault_threshold: default_fault_threshold(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a TOML file. Missing fields fall back to
    /// defaults.
    pub fn load(path: &Path) -> PluginResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
