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

//! Window commands relayed through the host to the window manager.

use roost_core::window::WindowId;

use crate::ffi;

pub fn move_window(window: WindowId, x: i32, y: i32) -> i32 {
    ffi::move_window(window.0, x, y)
}

pub fn resize_window(window: WindowId, width: u32, height: u32) -> i32 {
    ffi::resize_window(window.0, width, height)
}

pub fn focus_window(window: WindowId) -> i32 {
    ffi::focus_window(window.0)
}

pub fn close_window(window: WindowId) -> i32 {
    ffi::close_window(window.0)
}
