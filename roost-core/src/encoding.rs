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

//! Byte-level encoding contract.
//!
//! `decode(encode(x)) == x` for every well-formed value; decoding truncated
//! or unrecognized input fails with [`DecodeError`] instead of reading out of
//! bounds.

use thiserror::Error;

/// Serialize a value into its canonical wire form.
pub trait Encode: Sized {
    /// Exact number of bytes [`Encode::encode_to`] will write.
    fn encoded_size(&self) -> usize;

    /// Write the wire form into the front of `buffer`.
    fn encode_to(&self, buffer: &mut [u8]) -> Result<(), EncodeError>;

    /// Encode into a freshly allocated, exactly-sized buffer.
    fn encode_to_vec(&self) -> Vec<u8> {
        let mut buffer = vec![0; self.encoded_size()];
        self.encode_to(&mut buffer)
            .expect("buffer sized by encoded_size");
        buffer
    }
}

/// Parse a value back out of its wire form.
pub trait Decode: Sized {
    fn decode(buffer: &[u8]) -> Result<Self, DecodeError>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("destination buffer too small: need {need} bytes, have {have}")]
    BufferSize { need: usize, have: usize },
}

/// A malformed event or subscription buffer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("buffer truncated: need {need} bytes, have {have}")]
    Truncated { need: usize, have: usize },

    #[error("unrecognized event kind {0}")]
    UnknownKind(u32),

    #[error("payload is {have} bytes, this kind carries {expected}")]
    PayloadLength { expected: usize, have: usize },
}
