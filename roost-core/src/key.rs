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

//! Key event payloads: a modifier mask plus a hardware keycode.

use core::ops::{BitOr, BitOrAssign};

use crate::encoding::{Decode, DecodeError, Encode, EncodeError};

/// A key chord as it appears on the wire: 2-byte LE modifier mask, 1-byte
/// keycode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub modifiers: ModMask,
    pub keycode: Keycode,
}

impl Key {
    pub const WIRE_SIZE: usize = 3;

    pub fn new(modifiers: ModMask, keycode: Keycode) -> Self {
        Self { modifiers, keycode }
    }
}

impl From<(ModMask, Keycode)> for Key {
    fn from((modifiers, keycode): (ModMask, Keycode)) -> Self {
        Self { modifiers, keycode }
    }
}

impl Encode for Key {
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

        buffer[0..2].copy_from_slice(&u16::from(self.modifiers).to_le_bytes());
        buffer[2] = self.keycode.into();
        Ok(())
    }
}

impl Decode for Key {
    fn decode(buffer: &[u8]) -> Result<Self, DecodeError> {
        if buffer.len() < Self::WIRE_SIZE {
            return Err(DecodeError::Truncated {
                need: Self::WIRE_SIZE,
                have: buffer.len(),
            });
        }

        let modifiers = ModMask::from(u16::from_le_bytes([buffer[0], buffer[1]]));
        Ok(Self {
            modifiers,
            keycode: Keycode::from(buffer[2]),
        })
    }
}

/// X11-style modifier bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModMask(u16);

impl ModMask {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1 << 0);
    pub const LOCK: Self = Self(1 << 1);
    pub const CONTROL: Self = Self(1 << 2);
    pub const M1: Self = Self(1 << 3);
    pub const M2: Self = Self(1 << 4);
    pub const M3: Self = Self(1 << 5);
    /// The "super"/"win" modifier on common layouts.
    pub const M4: Self = Self(1 << 6);
    pub const M5: Self = Self(1 << 7);
    pub const ANY: Self = Self(1 << 15);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl From<ModMask> for u16 {
    #[inline]
    fn from(mask: ModMask) -> Self {
        mask.0
    }
}

impl From<u16> for ModMask {
    #[inline]
    fn from(bits: u16) -> Self {
        Self(bits)
    }
}

impl BitOr for ModMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ModMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

/// Hardware keycode as reported by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Keycode(u8);

#[allow(non_upper_case_globals)]
impl Keycode {
    pub const Escape: Self = Self(9);
    pub const BackSpace: Self = Self(22);
    pub const Tab: Self = Self(23);
    pub const Q: Self = Self(24);
    pub const W: Self = Self(25);
    pub const E: Self = Self(26);
    pub const R: Self = Self(27);
    pub const T: Self = Self(28);
    pub const Y: Self = Self(29);
    pub const U: Self = Self(30);
    pub const I: Self = Self(31);
    pub const O: Self = Self(32);
    pub const P: Self = Self(33);
    pub const Return: Self = Self(36);
    pub const A: Self = Self(38);
    pub const S: Self = Self(39);
    pub const D: Self = Self(40);
    pub const F: Self = Self(41);
    pub const G: Self = Self(42);
    pub const H: Self = Self(43);
    pub const J: Self = Self(44);
    pub const K: Self = Self(45);
    pub const L: Self = Self(46);
    pub const Z: Self = Self(52);
    pub const X: Self = Self(53);
    pub const C: Self = Self(54);
    pub const V: Self = Self(55);
    pub const B: Self = Self(56);
    pub const N: Self = Self(57);
    pub const M: Self = Self(58);
    pub const Space: Self = Self(65);
}

impl From<Keycode> for u8 {
    #[inline]
    fn from(keycode: Keycode) -> Self {
        keycode.0
    }
}

impl From<u8> for Keycode {
    #[inline]
    fn from(code: u8) -> Self {
        Self(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trip() {
        let key = Key::new(ModMask::M4 | ModMask::SHIFT, Keycode::A);
        let bytes = key.encode_to_vec();
        assert_eq!(bytes.len(), Key::WIRE_SIZE);
        assert_eq!(Key::decode(&bytes), Ok(key));
    }

    #[test]
    fn modifiers_are_little_endian() {
        let key = Key::new(ModMask::ANY, Keycode::Escape);
        let bytes = key.encode_to_vec();
        assert_eq!(bytes, [0x00, 0x80, 9]);
    }

    #[test]
    fn truncated_key_is_rejected() {
        assert_eq!(
            Key::decode(&[0x40, 0x00]),
            Err(DecodeError::Truncated { need: 3, have: 2 })
        );
    }

    #[test]
    fn modmask_bit_ops() {
        let mask = ModMask::CONTROL | ModMask::M4;
        assert!(mask.contains(ModMask::M4));
        assert!(!mask.contains(ModMask::SHIFT));
        assert_eq!(u16::from(mask), (1 << 2) | (1 << 6));
    }
}
