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

//! The single-slot staged event buffer.

use std::sync::Arc;

use parking_lot::RwLock;

/// Host-owned slot holding the encoded bytes of the event currently being
/// dispatched.
///
/// Occupied exactly while the dispatch loop is delivering one event and
/// cleared before the loop goes idle; only the in-flight `handle` call ever
/// reads it, through `event_len`/`event_read`. Clones are cheap handles
/// sharing the same slot.
#[derive(Debug, Clone, Default)]
pub struct StagedEvent {
    slot: Arc<RwLock<Option<Vec<u8>>>>,
}

impl StagedEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the next event's bytes in the slot, replacing any prior content.
    pub(crate) fn stage(&self, bytes: Vec<u8>) {
        *self.slot.write() = Some(bytes);
    }

    /// Invalidate the slot on returning to idle.
    pub(crate) fn clear(&self) {
        *self.slot.write() = None;
    }

    /// Length of the staged event in bytes; 0 while idle.
    pub fn len(&self) -> usize {
        self.slot.read().as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy up to `max_len` bytes starting at `offset`.
    ///
    /// The result is clamped to the bytes actually available; `None` means
    /// the offset lies past the end of the staged event.
    pub fn read_at(&self, offset: usize, max_len: usize) -> Option<Vec<u8>> {
        let slot = self.slot.read();
        let bytes = slot.as_deref().unwrap_or(&[]);
        if offset > bytes.len() {
            return None;
        }

        let end = bytes.len().min(offset.saturating_add(max_len));
        Some(bytes[offset..end].to_vec())
    }
}
