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

//! Raw host imports.
//!
//! Thin, safe-to-call wrappers over the runtime's `env` import surface.
//! Prefer the typed helpers in [`event`](crate::event),
//! [`command`](crate::command), and [`debug`](crate::debug).
//!
//! Return values are status codes from [`roost_core::status`]; `event_read`
//! returns the byte count copied.

#[cfg(target_arch = "wasm32")]
mod raw {
    extern "C" {
        // Events
        pub fn subscribe(sub_ptr: *const u8, sub_len: u32) -> i32;
        pub fn unsubscribe(sub_ptr: *const u8, sub_len: u32) -> i32;
        pub fn event_read(buf_ptr: *mut u8, buf_len: u32, offset: u32) -> i32;
        pub fn event_len() -> u32;

        // Window commands
        pub fn move_window(id: u32, x: i32, y: i32) -> i32;
        pub fn resize_window(id: u32, width: u32, height: u32) -> i32;
        pub fn focus_window(id: u32) -> i32;
        pub fn close_window(id: u32) -> i32;

        // Debugging utilities
        pub fn debug_log(msg_ptr: *const u8, msg_len: u32) -> i32;
    }
}

// Panicking stubs keep the crate linkable on native targets; the real
// imports exist only inside the plugin runtime.
#[cfg(not(target_arch = "wasm32"))]
mod raw {
    fn only_in_runtime() -> ! {
        panic!("roost host imports are only available inside the wasm32 plugin runtime")
    }

    pub unsafe fn subscribe(_: *const u8, _: u32) -> i32 {
        only_in_runtime()
    }
    pub unsafe fn unsubscribe(_: *const u8, _: u32) -> i32 {
        only_in_runtime()
    }
    pub unsafe fn event_read(_: *mut u8, _: u32, _: u32) -> i32 {
        only_in_runtime()
    }
    pub unsafe fn event_len() -> u32 {
        only_in_runtime()
    }
    pub unsafe fn move_window(_: u32, _: i32, _: i32) -> i32 {
        only_in_runtime()
    }
    pub unsafe fn resize_window(_: u32, _: u32, _: u32) -> i32 {
        only_in_runtime()
    }
    pub unsafe fn focus_window(_: u32) -> i32 {
        only_in_runtime()
    }
    pub unsafe fn close_window(_: u32) -> i32 {
        only_in_runtime()
    }
    pub unsafe fn debug_log(_: *const u8, _: u32) -> i32 {
        only_in_runtime()
    }
}

pub fn subscribe(subscription: &[u8]) -> i32 {
    unsafe { raw::subscribe(subscription.as_ptr(), subscription.len() as u32) }
}

pub fn unsubscribe(subscription: &[u8]) -> i32 {
    unsafe { raw::unsubscribe(subscription.as_ptr(), subscription.len() as u32) }
}

pub fn event_read(buffer: &mut [u8], offset: u32) -> i32 {
    unsafe { raw::event_read(buffer.as_mut_ptr(), buffer.len() as u32, offset) }
}

pub fn event_len() -> u32 {
    unsafe { raw::event_len() }
}

pub fn move_window(id: u32, x: i32, y: i32) -> i32 {
    unsafe { raw::move_window(id, x, y) }
}

pub fn resize_window(id: u32, width: u32, height: u32) -> i32 {
    unsafe { raw::resize_window(id, width, height) }
}

pub fn focus_window(id: u32) -> i32 {
    unsafe { raw::focus_window(id) }
}

pub fn close_window(id: u32) -> i32 {
    unsafe { raw::close_window(id) }
}

pub fn debug_log(message: &str) -> i32 {
    unsafe { raw::debug_log(message.as_ptr(), message.len() as u32) }
}
