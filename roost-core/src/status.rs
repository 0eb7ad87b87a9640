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

//! Status codes returned by host calls.
//!
//! Calls that transfer data (`event_read`) return a non-negative byte count
//! on success; every other call returns [`OK`]. Negative values are errors.

pub const OK: i32 = 0;

/// Failure with no further information.
pub const ERR_UNKNOWN: i32 = -1;

/// A pointer/length pair does not lie inside the caller's memory, an offset
/// is out of range, or a buffer failed to parse.
pub const ERR_BAD_ARGUMENT: i32 = -3;

/// The window system rejected the target window id.
pub const ERR_WINDOW: i32 = -4;

/// A subscription named an event kind the host does not recognize.
pub const ERR_UNKNOWN_KIND: i32 = -5;

/// A subscription filter's length does not match its kind's payload size.
pub const ERR_BAD_LENGTH: i32 = -6;

/// The calling module exports no linear memory.
pub const ERR_NO_MEMORY: i32 = -128;
