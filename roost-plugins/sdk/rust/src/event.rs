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

//! Reading the staged event and managing subscriptions.

use roost_core::encoding::{Decode, Encode};
use roost_core::event::{Event, Subscription};

use crate::ffi;

/// Register/unregister interest from inside `init` (or `handle`).
pub trait SubscriptionExt {
    fn subscribe(&self) -> i32;
    fn unsubscribe(&self) -> i32;
}

impl SubscriptionExt for Subscription {
    fn subscribe(&self) -> i32 {
        ffi::subscribe(&self.encode_to_vec())
    }

    fn unsubscribe(&self) -> i32 {
        ffi::unsubscribe(&self.encode_to_vec())
    }
}

/// Read and decode the event staged for the current `handle` call.
///
/// `None` outside dispatch or if the buffer fails to parse.
pub fn read() -> Option<Event> {
    let len = ffi::event_len() as usize;
    if len == 0 {
        return None;
    }

    let mut buffer = vec![0; len];
    let copied = ffi::event_read(&mut buffer, 0);
    if copied < 0 {
        return None;
    }

    Event::decode(&buffer[..copied as usize]).ok()
}
