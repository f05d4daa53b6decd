//! Little-endian wire codec for recorded values.
//!
//! Integers are fixed-width little-endian, `bool` is one byte, strings and
//! sequences carry a `u32` length prefix. Encoding exists for building
//! traces in tests and tools; the player itself only decodes.

use crate::stream::TraceStream;
use extplay_core::{CallbackId, PlaybackResult};

/// A value with a fixed recorded layout
pub trait Wire: Sized {
    /// Decode one value from the stream
    ///
    /// # Errors
    ///
    /// Returns error if the stream ends inside the value
    fn decode(stream: &mut TraceStream) -> PlaybackResult<Self>;

    /// Append the encoded value to `out`
    fn encode(&self, out: &mut Vec<u8>);
}

macro_rules! wire_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Wire for $ty {
                fn decode(stream: &mut TraceStream) -> PlaybackResult<Self> {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    stream.read_exact(&mut buf)?;
                    Ok(<$ty>::from_le_bytes(buf))
                }

                fn encode(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

wire_int!(u8, u16, u32, u64, i16, i32, i64);

impl Wire for bool {
    fn decode(stream: &mut TraceStream) -> PlaybackResult<Self> {
        Ok(u8::decode(stream)? != 0)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.push(u8::from(*self));
    }
}

impl Wire for String {
    fn decode(stream: &mut TraceStream) -> PlaybackResult<Self> {
        let bytes = stream.read_blob()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn encode(&self, out: &mut Vec<u8>) {
        encode_len(self.len(), out);
        out.extend_from_slice(self.as_bytes());
    }
}

/// Sequences: `u32` count followed by the elements.
///
/// Every element type occupies at least one byte, so a count larger than the
/// remaining trace is rejected before anything is allocated.
impl<T: Wire> Wire for Vec<T> {
    fn decode(stream: &mut TraceStream) -> PlaybackResult<Self> {
        let count = u32::decode(stream)?;
        stream.ensure_available(u64::from(count))?;
        let mut items = Vec::with_capacity(count as usize);
        for _ in 0..count {
            items.push(T::decode(stream)?);
        }
        Ok(items)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        encode_len(self.len(), out);
        for item in self {
            item.encode(out);
        }
    }
}

impl Wire for CallbackId {
    fn decode(stream: &mut TraceStream) -> PlaybackResult<Self> {
        Ok(CallbackId(i32::decode(stream)?))
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.0.encode(out);
    }
}

/// Fixed-length arrays carry no length prefix
pub trait WireArray: Wire + Copy + Default {}

impl WireArray for u8 {}
impl WireArray for u16 {}
impl WireArray for i32 {}

impl<T: WireArray, const N: usize> Wire for [T; N] {
    fn decode(stream: &mut TraceStream) -> PlaybackResult<Self> {
        let mut items = [T::default(); N];
        for item in &mut items {
            *item = T::decode(stream)?;
        }
        Ok(items)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        for item in self {
            item.encode(out);
        }
    }
}

fn encode_len(len: usize, out: &mut Vec<u8>) {
    // lengths above u32::MAX cannot be represented in a trace
    let len = u32::try_from(len).unwrap_or(u32::MAX);
    len.encode(out);
}
