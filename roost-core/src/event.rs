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

//! Event records and subscription descriptors.

use crate::encoding::{Decode, DecodeError, Encode, EncodeError};
use crate::key::Key;
use crate::window::WindowId;

/// Stable kind ids, agreed on by host and every plugin.
pub mod id {
    pub const KEY_PRESS: u32 = 1;
    pub const KEY_RELEASE: u32 = 2;
    pub const WINDOW_ADD: u32 = 3;
    pub const WINDOW_REMOVE: u32 = 4;
}

const KIND_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyPress,
    KeyRelease,
    WindowAdd,
    WindowRemove,
}

impl EventKind {
    pub fn from_id(kind_id: u32) -> Option<Self> {
        match kind_id {
            id::KEY_PRESS => Some(Self::KeyPress),
            id::KEY_RELEASE => Some(Self::KeyRelease),
            id::WINDOW_ADD => Some(Self::WindowAdd),
            id::WINDOW_REMOVE => Some(Self::WindowRemove),
            _ => None,
        }
    }

    pub fn id(self) -> u32 {
        match self {
            Self::KeyPress => id::KEY_PRESS,
            Self::KeyRelease => id::KEY_RELEASE,
            Self::WindowAdd => id::WINDOW_ADD,
            Self::WindowRemove => id::WINDOW_REMOVE,
        }
    }

    /// Fixed payload size for this kind, in bytes.
    pub fn payload_size(self) -> usize {
        match self {
            Self::KeyPress | Self::KeyRelease => Key::WIRE_SIZE,
            Self::WindowAdd | Self::WindowRemove => WindowId::WIRE_SIZE,
        }
    }
}

/// One input event as delivered to plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    KeyPress(Key),
    KeyRelease(Key),
    WindowAdd(WindowId),
    WindowRemove(WindowId),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::KeyPress(_) => EventKind::KeyPress,
            Self::KeyRelease(_) => EventKind::KeyRelease,
            Self::WindowAdd(_) => EventKind::WindowAdd,
            Self::WindowRemove(_) => EventKind::WindowRemove,
        }
    }

    /// The payload bytes alone, without the kind prefix.
    pub fn payload(&self) -> Vec<u8> {
        match self {
            Self::KeyPress(key) | Self::KeyRelease(key) => key.encode_to_vec(),
            Self::WindowAdd(window) | Self::WindowRemove(window) => window.encode_to_vec(),
        }
    }
}

impl Encode for Event {
    fn encoded_size(&self) -> usize {
        KIND_SIZE + self.kind().payload_size()
    }

    fn encode_to(&self, buffer: &mut [u8]) -> Result<(), EncodeError> {
        if buffer.len() < self.encoded_size() {
            return Err(EncodeError::BufferSize {
                need: self.encoded_size(),
                have: buffer.len(),
            });
        }

        buffer[0..KIND_SIZE].copy_from_slice(&self.kind().id().to_le_bytes());
        match self {
            Self::KeyPress(key) | Self::KeyRelease(key) => key.encode_to(&mut buffer[KIND_SIZE..]),
            Self::WindowAdd(window) | Self::WindowRemove(window) => {
                window.encode_to(&mut buffer[KIND_SIZE..])
            }
        }
    }
}

impl Decode for Event {
    fn decode(buffer: &[u8]) -> Result<Self, DecodeError> {
        let (kind, payload) = split_kind(buffer)?;
        if payload.len() != kind.payload_size() {
            return Err(DecodeError::PayloadLength {
                expected: kind.payload_size(),
                have: payload.len(),
            });
        }

        Ok(match kind {
            EventKind::KeyPress => Self::KeyPress(Key::decode(payload)?),
            EventKind::KeyRelease => Self::KeyRelease(Key::decode(payload)?),
            EventKind::WindowAdd => Self::WindowAdd(WindowId::decode(payload)?),
            EventKind::WindowRemove => Self::WindowRemove(WindowId::decode(payload)?),
        })
    }
}

/// A registered interest: an event kind, optionally narrowed to one exact
/// payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    pub kind: EventKind,
    pub filter: Option<EventFilter>,
}

/// Typed filter payload; matches an event only on byte-exact payload
/// equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFilter {
    Key(Key),
    Window(WindowId),
}

impl Subscription {
    /// Subscribe to every event of `kind`, regardless of payload.
    pub fn wildcard(kind: EventKind) -> Self {
        Self { kind, filter: None }
    }

    pub fn key_press(key: Key) -> Self {
        Self {
            kind: EventKind::KeyPress,
            filter: Some(EventFilter::Key(key)),
        }
    }

    pub fn key_release(key: Key) -> Self {
        Self {
            kind: EventKind::KeyRelease,
            filter: Some(EventFilter::Key(key)),
        }
    }

    pub fn window_add(window: WindowId) -> Self {
        Self {
            kind: EventKind::WindowAdd,
            filter: Some(EventFilter::Window(window)),
        }
    }

    pub fn window_remove(window: WindowId) -> Self {
        Self {
            kind: EventKind::WindowRemove,
            filter: Some(EventFilter::Window(window)),
        }
    }

    /// Whether `event` should be delivered under this subscription.
    pub fn matches(&self, event: &Event) -> bool {
        if self.kind != event.kind() {
            return false;
        }

        match (&self.filter, event) {
            (None, _) => true,
            (Some(EventFilter::Key(filter)), Event::KeyPress(key) | Event::KeyRelease(key)) => {
                filter == key
            }
            (
                Some(EventFilter::Window(filter)),
                Event::WindowAdd(window) | Event::WindowRemove(window),
            ) => filter == window,
            _ => false,
        }
    }
}

impl Encode for Subscription {
    fn encoded_size(&self) -> usize {
        match self.filter {
            None => KIND_SIZE,
            Some(_) => KIND_SIZE + self.kind.payload_size(),
        }
    }

    fn encode_to(&self, buffer: &mut [u8]) -> Result<(), EncodeError> {
        if buffer.len() < self.encoded_size() {
            return Err(EncodeError::BufferSize {
                need: self.encoded_size(),
                have: buffer.len(),
            });
        }

        buffer[0..KIND_SIZE].copy_from_slice(&self.kind.id().to_le_bytes());
        match &self.filter {
            None => Ok(()),
            Some(EventFilter::Key(key)) => key.encode_to(&mut buffer[KIND_SIZE..]),
            Some(EventFilter::Window(window)) => window.encode_to(&mut buffer[KIND_SIZE..]),
        }
    }
}

impl Decode for Subscription {
    fn decode(buffer: &[u8]) -> Result<Self, DecodeError> {
        let (kind, payload) = split_kind(buffer)?;
        if payload.is_empty() {
            return Ok(Self::wildcard(kind));
        }

        if payload.len() != kind.payload_size() {
            return Err(DecodeError::PayloadLength {
                expected: kind.payload_size(),
                have: payload.len(),
            });
        }

        let filter = match kind {
            EventKind::KeyPress | EventKind::KeyRelease => EventFilter::Key(Key::decode(payload)?),
            EventKind::WindowAdd | EventKind::WindowRemove => {
                EventFilter::Window(WindowId::decode(payload)?)
            }
        };

        Ok(Self {
            kind,
            filter: Some(filter),
        })
    }
}

fn split_kind(buffer: &[u8]) -> Result<(EventKind, &[u8]), DecodeError> {
    if buffer.len() < KIND_SIZE {
        return Err(DecodeError::Truncated {
            need: KIND_SIZE,
            have: buffer.len(),
        });
    }

    let kind_id = u32::from_le_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]);
    let kind = EventKind::from_id(kind_id).ok_or(DecodeError::UnknownKind(kind_id))?;
    Ok((kind, &buffer[KIND_SIZE..]))
}
