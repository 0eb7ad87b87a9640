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

//! Outbound seams: window commands and plugin diagnostics.
//!
//! The runtime only relays. Actual window placement is the embedding window
//! manager's job, and diagnostic text goes to whatever sink the embedder
//! wires in.

use thiserror::Error;

use roost_core::window::WindowId;

use crate::manager::PluginId;

#[derive(Debug, Error)]
pub enum WindowOpError {
    #[error("no window with id {0}")]
    UnknownWindow(WindowId),

    #[error("window system error: {0}")]
    Backend(String),
}

/// Window-management primitives plugins may invoke.
pub trait WindowOps: Send + Sync {
    fn move_window(&self, window: WindowId, x: i32, y: i32) -> Result<(), WindowOpError>;

    fn resize_window(&self, window: WindowId, width: u32, height: u32)
        -> Result<(), WindowOpError>;

    fn focus_window(&self, window: WindowId) -> Result<(), WindowOpError>;

    fn close_window(&self, window: WindowId) -> Result<(), WindowOpError>;
}

/// Sink for `debug_log` diagnostics.
pub trait LogSink: Send + Sync {
    fn debug_log(&self, plugin: &PluginId, message: &str);
}

/// Forwards plugin diagnostics to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn debug_log(&self, plugin: &PluginId, message: &str) {
        tracing::info!(plugin = %plugin, "{message}");
    }
}

/// Accepts and discards every window command. Useful for embedders that only
/// want event fan-out, and as a harness default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullWindowOps;

impl WindowOps for NullWindowOps {
    fn move_window(&self, window: WindowId, x: i32, y: i32) -> Result<(), WindowOpError> {
        tracing::debug!(%window, x, y, "move_window (no-op backend)");
        Ok(())
    }

    fn resize_window(
        &self,
        window: WindowId,
        width: u32,
        height: u32,
    ) -> Result<(), WindowOpError> {
        tracing::debug!(%window, width, height, "resize_window (no-op backend)");
        Ok(())
    }

    fn focus_window(&self, window: WindowId) -> Result<(), WindowOpError> {
        tracing::debug!(%window, "focus_window (no-op backend)");
        Ok(())
    }

    fn close_window(&self, window: WindowId) -> Result<(), WindowOpError> {
        tracing::debug!(%window, "close_window (no-op backend)");
        Ok(())
    }
}
