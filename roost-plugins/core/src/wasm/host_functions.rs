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

//! The `env` import surface exposed to plugin modules.
//!
//! Every import bounds-checks the guest pointers it is handed and copies
//! across the boundary; a module can only ever touch host data through these
//! functions. Failures are reported to the guest as status codes from
//! [`roost_core::status`], never as host-side panics.

use std::sync::Arc;

use parking_lot::RwLock;
use wasmtime::{Caller, Extern, Linker, Memory, StoreLimits, StoreLimitsBuilder};

use roost_core::status;
use roost_core::window::WindowId;

use crate::manager::PluginId;
use crate::registry::{SubscribeError, SubscriptionRegistry};
use crate::shell::{LogSink, WindowOpError, WindowOps};
use crate::stage::StagedEvent;

/// Per-instance host state, reachable from every import via the store.
pub struct HostState {
    pub(crate) plugin_id: PluginId,
    pub(crate) registry: Arc<RwLock<SubscriptionRegistry>>,
    pub(crate) staged: StagedEvent,
    pub(crate) window_ops: Arc<dyn WindowOps>,
    pub(crate) log_sink: Arc<dyn LogSink>,
    pub(crate) limits: StoreLimits,
    pub(crate) metrics: ModuleMetrics,
}

impl HostState {
    pub(crate) fn new(
        plugin_id: PluginId,
        registry: Arc<RwLock<SubscriptionRegistry>>,
        staged: StagedEvent,
        window_ops: Arc<dyn WindowOps>,
        log_sink: Arc<dyn LogSink>,
        max_memory_bytes: usize,
    ) -> Self {
        Self {
            plugin_id,
            registry,
            staged,
            window_ops,
            log_sink,
            limits: StoreLimitsBuilder::new()
                .memory_size(max_memory_bytes)
                .build(),
            metrics: ModuleMetrics::default(),
        }
    }
}

/// Counters collected while a module runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleMetrics {
    /// Completed `handle` invocations.
    pub handle_count: u64,
    /// Faulted `init`/`handle` invocations.
    pub fault_count: u64,
    /// Host import calls made by the module.
    pub host_call_count: u64,
}

pub(crate) fn add_to_linker(linker: &mut Linker<HostState>) -> wasmtime::Result<()> {
    linker.func_wrap("env", "subscribe", subscribe)?;
    linker.func_wrap("env", "unsubscribe", unsubscribe)?;
    linker.func_wrap("env", "event_len", event_len)?;
    linker.func_wrap("env", "event_read", event_read)?;
    linker.func_wrap("env", "debug_log", debug_log)?;
    linker.func_wrap("env", "move_window", move_window)?;
    linker.func_wrap("env", "resize_window", resize_window)?;
    linker.func_wrap("env", "focus_window", focus_window)?;
    linker.func_wrap("env", "close_window", close_window)?;
    Ok(())
}

fn exported_memory(caller: &mut Caller<'_, HostState>) -> Option<Memory> {
    match caller.get_export("memory") {
        Some(Extern::Memory(memory)) => Some(memory),
        _ => None,
    }
}

/// Copy `len` bytes out of guest memory, rejecting ranges that fall outside
/// it.
fn copy_from_guest(
    caller: &Caller<'_, HostState>,
    memory: &Memory,
    ptr: u32,
    len: u32,
) -> Option<Vec<u8>> {
    let start = ptr as usize;
    let end = start.checked_add(len as usize)?;
    memory.data(caller).get(start..end).map(<[u8]>::to_vec)
}

fn subscribe(mut caller: Caller<'_, HostState>, sub_ptr: u32, sub_len: u32) -> i32 {
    caller.data_mut().metrics.host_call_count += 1;

    let Some(memory) = exported_memory(&mut caller) else {
        return status::ERR_NO_MEMORY;
    };
    let Some(raw) = copy_from_guest(&caller, &memory, sub_ptr, sub_len) else {
        return status::ERR_BAD_ARGUMENT;
    };

    let state = caller.data();
    match state
        .registry
        .write()
        .subscribe(state.plugin_id.clone(), &raw)
    {
        Ok(()) => status::OK,
        Err(err @ SubscribeError::UnknownKind(_)) => {
            tracing::warn!(plugin = %state.plugin_id, error = %err, "subscribe rejected");
            status::ERR_UNKNOWN_KIND
        }
        Err(err @ SubscribeError::BadLength { .. }) => {
            tracing::warn!(plugin = %state.plugin_id, error = %err, "subscribe rejected");
            status::ERR_BAD_LENGTH
        }
    }
}

fn unsubscribe(mut caller: Caller<'_, HostState>, sub_ptr: u32, sub_len: u32) -> i32 {
    caller.data_mut().metrics.host_call_count += 1;

    let Some(memory) = exported_memory(&mut caller) else {
        return status::ERR_NO_MEMORY;
    };
    let Some(raw) = copy_from_guest(&caller, &memory, sub_ptr, sub_len) else {
        return status::ERR_BAD_ARGUMENT;
    };

    let state = caller.data();
    match state.registry.write().unsubscribe(&state.plugin_id, &raw) {
        Ok(()) => status::OK,
        Err(SubscribeError::UnknownKind(_)) => status::ERR_UNKNOWN_KIND,
        Err(SubscribeError::BadLength { .. }) => status::ERR_BAD_LENGTH,
    }
}

/// Length in bytes of the currently staged event; 0 outside dispatch.
fn event_len(mut caller: Caller<'_, HostState>) -> u32 {
    caller.data_mut().metrics.host_call_count += 1;
    caller.data().staged.len() as u32
}

/// Copy up to `buf_len` bytes of the staged event, starting at `offset`,
/// into the caller's buffer. Returns the number of bytes copied, clamped to
/// what is available.
fn event_read(mut caller: Caller<'_, HostState>, buf_ptr: u32, buf_len: u32, offset: u32) -> i32 {
    caller.data_mut().metrics.host_call_count += 1;

    let Some(memory) = exported_memory(&mut caller) else {
        return status::ERR_NO_MEMORY;
    };

    let Some(chunk) = caller
        .data()
        .staged
        .read_at(offset as usize, buf_len as usize)
    else {
        return status::ERR_BAD_ARGUMENT;
    };

    let start = buf_ptr as usize;
    let Some(end) = start.checked_add(chunk.len()) else {
        return status::ERR_BAD_ARGUMENT;
    };
    match memory.data_mut(&mut caller).get_mut(start..end) {
        Some(dest) => {
            dest.copy_from_slice(&chunk);
            chunk.len() as i32
        }
        None => status::ERR_BAD_ARGUMENT,
    }
}

fn debug_log(mut caller: Caller<'_, HostState>, msg_ptr: u32, msg_len: u32) -> i32 {
    caller.data_mut().metrics.host_call_count += 1;

    let Some(memory) = exported_memory(&mut caller) else {
        return status::ERR_NO_MEMORY;
    };
    let Some(raw) = copy_from_guest(&caller, &memory, msg_ptr, msg_len) else {
        return status::ERR_BAD_ARGUMENT;
    };
    let Ok(message) = std::str::from_utf8(&raw) else {
        return status::ERR_BAD_ARGUMENT;
    };

    let state = caller.data();
    state.log_sink.debug_log(&state.plugin_id, message);
    status::OK
}

fn window_op_status(result: Result<(), WindowOpError>) -> i32 {
    match result {
        Ok(()) => status::OK,
        Err(WindowOpError::UnknownWindow(_)) => status::ERR_WINDOW,
        Err(WindowOpError::Backend(_)) => status::ERR_UNKNOWN,
    }
}

fn move_window(mut caller: Caller<'_, HostState>, window: u32, x: i32, y: i32) -> i32 {
    caller.data_mut().metrics.host_call_count += 1;

    let state = caller.data();
    tracing::debug!(plugin = %state.plugin_id, window, x, y, "move_window");
    window_op_status(state.window_ops.move_window(WindowId(window), x, y))
}

fn resize_window(mut caller: Caller<'_, HostState>, window: u32, width: u32, height: u32) -> i32 {
    caller.data_mut().metrics.host_call_count += 1;

    let state = caller.data();
    tracing::debug!(plugin = %state.plugin_id, window, width, height, "resize_window");
    window_op_status(state.window_ops.resize_window(WindowId(window), width, height))
}

fn focus_window(mut caller: Caller<'_, HostState>, window: u32) -> i32 {
    caller.data_mut().metrics.host_call_count += 1;

    let state = caller.data();
    tracing::debug!(plugin = %state.plugin_id, window, "focus_window");
    window_op_status(state.window_ops.focus_window(WindowId(window)))
}

fn close_window(mut caller: Caller<'_, HostState>, window: u32) -> i32 {
    caller.data_mut().metrics.host_call_count += 1;

    let state = caller.data();
    tracing::debug!(plugin = %state.plugin_id, window, "close_window");
    window_op_status(state.window_ops.close_window(WindowId(window)))
}
