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

//! Roost plugin SDK
//!
//! Build Roost plugins in Rust. A plugin is a `cdylib` compiled for
//! `wasm32-unknown-unknown` exporting two entry points the runtime calls:
//!
//! ```rust,ignore
//! use roost_plugin_sdk::prelude::*;
//!
//! #[no_mangle]
//! pub extern "C" fn init() {
//!     Subscription::key_press(Key::new(ModMask::M4, Keycode::A)).subscribe();
//! }
//!
//! #[no_mangle]
//! pub extern "C" fn handle() {
//!     if let Some(Event::KeyPress(_)) = event::read() {
//!         debug::log("Win+A pressed");
//!         command::move_window(WindowId(2), 300, 400);
//!     }
//! }
//! ```
//!
//! Inside `handle`, the staged event is only valid for the duration of the
//! call; read what you need and let it go.

pub mod command;
pub mod debug;
pub mod event;
pub mod ffi;

pub mod prelude {
    pub use crate::command;
    pub use crate::debug;
    pub use crate::event::{self, SubscriptionExt};
    pub use roost_core::event::{Event, EventKind, Subscription};
    pub use roost_core::key::{Key, Keycode, ModMask};
    pub use roost_core::window::WindowId;
}

pub use roost_core::event::{Event, EventKind, Subscription};
pub use roost_core::key::{Key, Keycode, ModMask};
pub use roost_core::status;
pub use roost_core::window::WindowId;
