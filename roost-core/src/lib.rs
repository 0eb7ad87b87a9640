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

//! Roost wire format
//!
//! The binary protocol spoken across the plugin ABI boundary: event records,
//! subscription descriptors, and the status codes host calls return. Both
//! sides link this crate (the runtime natively, plugins on `wasm32` via the
//! SDK), so the layout is defined exactly once.
//!
//! An encoded event is a 4-byte little-endian kind id followed by a
//! kind-specific fixed-size payload:
//!
//! | kind            | id | payload                          | total |
//! |-----------------|----|----------------------------------|-------|
//! | `KeyPress`      | 1  | `modifiers: u16 LE, keycode: u8` | 7     |
//! | `KeyRelease`    | 2  | `modifiers: u16 LE, keycode: u8` | 7     |
//! | `WindowAdd`     | 3  | `window_id: u32 LE`              | 8     |
//! | `WindowRemove`  | 4  | `window_id: u32 LE`              | 8     |
//!
//! A subscription descriptor is the 4-byte kind id alone (wildcard) or the
//! kind id followed by a full payload to match byte-for-byte.

pub mod encoding;
pub mod event;
pub mod key;
pub mod status;
pub mod window;

pub use encoding::{Decode, DecodeError, Encode, EncodeError};
pub use event::{Event, EventFilter, EventKind, Subscription};
pub use key::{Key, Keycode, ModMask};
pub use window::WindowId;
