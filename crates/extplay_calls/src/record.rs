//! Decoded record: one half of a recorded call.

use crate::call::ExtCall;
use crate::frame::FrameHeader;
use extplay_core::{Direction, Opcode, PlaybackResult};
use extplay_trace::TraceStream;
use serde::Serialize;

/// One queued half of a call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    /// Decoded payload
    pub call: ExtCall,
    /// Prologue half: arguments are populated
    pub start: bool,
    /// Epilogue half: results are populated
    pub end: bool,
}

impl CallRecord {
    /// Synthesized end-of-trace record
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            call: ExtCall::End,
            start: false,
            end: false,
        }
    }

    /// Decode the prologue that follows a frame header
    ///
    /// # Errors
    ///
    /// Returns error if the payload is truncated
    pub fn read_prologue(header: FrameHeader, stream: &mut TraceStream) -> PlaybackResult<Self> {
        let mut call = ExtCall::for_opcode(header.opcode);
        call.decode_prologue(stream)?;
        Ok(Self {
            call,
            start: true,
            end: false,
        })
    }

    /// Decode the epilogue that follows a frame header or prologue
    ///
    /// # Errors
    ///
    /// Returns error if the payload is truncated
    pub fn read_epilogue(header: FrameHeader, stream: &mut TraceStream) -> PlaybackResult<Self> {
        let mut call = ExtCall::for_opcode(header.opcode);
        call.decode_epilogue(stream)?;
        Ok(Self {
            call,
            start: false,
            end: true,
        })
    }

    /// Recorded operation
    #[must_use]
    pub fn opcode(&self) -> Opcode {
        self.call.opcode()
    }

    /// Whether this is the end-of-trace sentinel
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.opcode().is_sentinel()
    }

    /// Whether this is the start of a callback invocation
    #[must_use]
    pub fn is_callback_start(&self) -> bool {
        self.start && self.call.is_callback()
    }

    /// Whether this record carries the given half
    #[must_use]
    pub fn has(&self, direction: Direction) -> bool {
        match direction {
            Direction::Start => self.start,
            Direction::End => self.end,
        }
    }

    /// Half carried by this record; `None` for the sentinel
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        match (self.start, self.end) {
            (true, _) => Some(Direction::Start),
            (false, true) => Some(Direction::End),
            (false, false) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::{CallKind, Srand, SteamCallback1};
    use extplay_core::PlayerConfig;
    use extplay_trace::TraceHeader;

    #[test]
    fn test_sentinel() {
        let record = CallRecord::sentinel();
        assert!(record.is_sentinel());
        assert!(!record.is_callback_start());
        assert_eq!(record.direction(), None);
    }

    #[test]
    fn test_read_halves() {
        let mut bytes = Vec::new();
        TraceHeader::default().encode(&mut bytes);
        Srand::new(42).encode_prologue(&mut bytes);

        let mut stream = TraceStream::from_bytes(bytes, &PlayerConfig::default()).unwrap();
        let header = FrameHeader::new(Opcode::Srand, true, false);
        let record = CallRecord::read_prologue(header, &mut stream).unwrap();
        assert_eq!(record.call, Srand::new(42).into_call());
        assert!(record.has(Direction::Start));
        assert!(!record.has(Direction::End));

        let record = CallRecord::read_epilogue(header, &mut stream).unwrap();
        assert_eq!(record.direction(), Some(Direction::End));
        assert!(stream.is_exhausted());
    }

    #[test]
    fn test_callback_start() {
        let record = CallRecord {
            call: SteamCallback1::default().into_call(),
            start: true,
            end: false,
        };
        assert!(record.is_callback_start());

        let end = CallRecord {
            start: false,
            end: true,
            ..record
        };
        assert!(!end.is_callback_start());
    }
}
