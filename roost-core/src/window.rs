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

//! Window identifiers as assigned by the window system.

use core::fmt;

use crate::encoding::{Decode, DecodeError, Encode, EncodeError};

/// Opaque window handle, 4 bytes LE on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u32);

impl WindowId {
    pub const WIRE_SIZE: usize = 4;
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl From<u32> for WindowId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<WindowId> for u32 {
    fn from(id: WindowId) -> Self {
        id.0
    }
}

impl Encode for WindowId {
    fn encoded_size(&self) -> usize {
        Self::WIRE_SIZE
    }

    fn encode_to(&self, buffer: &mut [u8]) -> Result<(), EncodeError> {
        if buffer.len() < Self::WIRE_SIZE {
            return Err(EncodeError::BufferSize {
                need: Self::WIRE_SIZE,
                have: buffer.len(),
            });
        }

        buffer[0..4].copy_from_slice(&self.0.to_le_bytes());
        Ok(())
    }
}

impl Decode for WindowId {
    fn decode(buffer: &[u8]) -> Result<Self, DecodeError> {
        if buffer.len() < Self::WIRE_SIZE {
            return Err(DecodeError::Truncated {
                need: Self::WIRE_SIZE,
                have: buffer.len(),
            });
        }

        Ok(Self(u32::from_le_bytes([
            buffer[0], buffer[1], buffer[2], buffer[3],
        ])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_id_round_trip() {
        let id = WindowId(0xdead_beef);
        assert_eq!(WindowId::decode(&id.encode_to_vec()), Ok(id));
    }

    #[test]
    fn truncated_window_id_is_rejected() {
        assert_eq!(
            WindowId::decode(&[1, 2, 3]),
            Err(DecodeError::Truncated { need: 4, have: 3 })
        );
    }
}
