//! Opcode record frame header.

use extplay_core::{Opcode, PlaybackError, PlaybackResult};
use extplay_trace::{TraceStream, Wire};

/// Decoded 16-bit frame header: 14-bit opcode plus start/end flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHeader {
    /// Recorded operation
    pub opcode: Opcode,
    /// Prologue payload follows
    pub start: bool,
    /// Epilogue payload follows
    pub end: bool,
}

impl FrameHeader {
    /// Bit set when a prologue payload follows
    pub const START_BIT: u16 = 0x8000;
    /// Bit set when an epilogue payload follows
    pub const END_BIT: u16 = 0x4000;

    /// Create a header
    #[must_use]
    pub const fn new(opcode: Opcode, start: bool, end: bool) -> Self {
        Self { opcode, start, end }
    }

    /// Split a raw header word.
    ///
    /// Opcode 0 is reserved for the synthesized sentinel and is rejected
    /// like any other unknown opcode.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOpcode` if the low 14 bits name no operation
    pub fn parse(raw: u16) -> PlaybackResult<Self> {
        let code = raw & Opcode::MAX_RAW;
        let opcode = Opcode::try_from(code)?;
        if opcode.is_sentinel() {
            return Err(PlaybackError::UnknownOpcode { opcode: code });
        }
        Ok(Self {
            opcode,
            start: raw & Self::START_BIT != 0,
            end: raw & Self::END_BIT != 0,
        })
    }

    /// Read and validate the next header from the stream
    ///
    /// # Errors
    ///
    /// Returns error on truncation, unknown opcode, or a frame with no flags
    pub fn read(stream: &mut TraceStream) -> PlaybackResult<Self> {
        let offset = stream.offset();
        let header = Self::parse(u16::decode(stream)?)?;
        if !header.start && !header.end {
            return Err(PlaybackError::FlaglessFrame {
                opcode: header.opcode,
                offset,
            });
        }
        Ok(header)
    }

    /// Raw header word
    #[must_use]
    pub fn encode(&self) -> u16 {
        let mut raw = self.opcode.as_raw();
        if self.start {
            raw |= Self::START_BIT;
        }
        if self.end {
            raw |= Self::END_BIT;
        }
        raw
    }
}
