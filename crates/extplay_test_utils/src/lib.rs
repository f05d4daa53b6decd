//! Trace builders for EXTPLAY tests.
//!
//! [`TraceBuilder`] writes traces in the exact layout a recorder produces,
//! so tests can describe a recorded session call by call instead of
//! hand-assembling bytes.

#![forbid(unsafe_code)]
#![allow(missing_docs)]

use extplay_calls::{CallKind, FrameHeader};
use extplay_core::{Opcode, ProtocolVersion};
use extplay_trace::TraceHeader;

/// Assembles a trace in memory
#[derive(Debug, Clone)]
pub struct TraceBuilder {
    header: TraceHeader,
    body: Vec<u8>,
}

impl TraceBuilder {
    pub fn new() -> Self {
        Self {
            header: TraceHeader::new("hlds.exe -game valve"),
            body: Vec::new(),
        }
    }

    /// Override the header version
    #[must_use]
    pub fn version(mut self, major: u16, minor: u16) -> Self {
        self.header = self.header.with_version(ProtocolVersion::new(major, minor));
        self
    }

    /// Override the recorder command line
    #[must_use]
    pub fn cmdline(mut self, cmdline: &str) -> Self {
        self.header.cmdline = cmdline.to_owned();
        self
    }

    /// A call recorded in one frame carrying both halves
    #[must_use]
    pub fn call<C: CallKind>(mut self, call: &C) -> Self {
        self.frame(C::OPCODE, true, true);
        call.encode_prologue(&mut self.body);
        call.encode_epilogue(&mut self.body);
        self
    }

    /// Only the entry half of a call
    #[must_use]
    pub fn prologue<C: CallKind>(mut self, call: &C) -> Self {
        self.frame(C::OPCODE, true, false);
        call.encode_prologue(&mut self.body);
        self
    }

    /// Only the exit half of a call
    #[must_use]
    pub fn epilogue<C: CallKind>(mut self, call: &C) -> Self {
        self.frame(C::OPCODE, false, true);
        call.encode_epilogue(&mut self.body);
        self
    }

    /// Arbitrary bytes appended to the body
    #[must_use]
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(bytes);
        self
    }

    /// Bytes written so far after the header
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Finished trace
    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.body.len() + 64);
        self.header.encode(&mut out);
        out.extend_from_slice(&self.body);
        out
    }

    fn frame(&mut self, opcode: Opcode, start: bool, end: bool) {
        let raw = FrameHeader::new(opcode, start, end).encode();
        self.body.extend_from_slice(&raw.to_le_bytes());
    }
}

impl Default for TraceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extplay_calls::{Rand, Srand};

    #[test]
    fn test_empty_trace_is_header_only() {
        let bytes = TraceBuilder::new().cmdline("x").build();
        assert_eq!(bytes, [6, 0, 0, 0, 1, 0, 0, 0, b'x']);
    }

    #[test]
    fn test_unsplit_call_layout() {
        let mut rand = Rand::new();
        rand.res = 7;
        let builder = TraceBuilder::new().call(&Srand::new(42)).call(&rand);
        // frame + seed, frame + result
        assert_eq!(builder.body_len(), 2 + 4 + 2 + 4);
        let bytes = builder.build();
        let body = &bytes[bytes.len() - builder.body_len()..];
        assert_eq!(&body[..2], &(0xC000u16 | 3).to_le_bytes());
        assert_eq!(&body[2..6], &42u32.to_le_bytes());
    }

    #[test]
    fn test_split_halves_carry_one_flag_each() {
        let builder = TraceBuilder::new()
            .prologue(&Srand::new(1))
            .epilogue(&Srand::new(1));
        let bytes = builder.build();
        let body = &bytes[bytes.len() - builder.body_len()..];
        assert_eq!(&body[..2], &(0x8000u16 | 3).to_le_bytes());
        assert_eq!(&body[6..8], &(0x4000u16 | 3).to_le_bytes());
    }
}
