//! Core error types for EXTPLAY.
//!
//! Every variant is fatal to a playback session: once the player has
//! desynchronized from its trace, all later results would be meaningless.
//! Errors travel back to the harness as values so tests can assert on the
//! exact failure instead of losing the process.

use crate::id::CallbackId;
use crate::opcode::{Direction, Opcode};
use std::fmt;

/// Core result type
pub type PlaybackResult<T> = Result<T, PlaybackError>;

/// Process status used when the trace ends while a call is still expected
pub const EXIT_END_OF_TRACE: i32 = 777;

/// Broad classes of playback failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed header, truncated stream, unrecognized opcode
    Format,
    /// Call order or direction diverged from the trace
    Desync,
    /// Live arguments differ from recorded arguments (strict mode only)
    ArgumentMismatch,
    /// Slot pool exhausted or misused
    Resource,
    /// Live callback state diverged from the recording
    CallbackDesync,
    /// The player was driven in a way it does not allow
    Usage,
    /// The operation has no recorded counterpart
    Unsupported,
}

/// When a callback state snapshot was compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncPhase {
    /// Before running the callback
    Pre,
    /// After running the callback
    Post,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pre => write!(f, "PRE"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// Core error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    /// Underlying I/O failure
    #[error("I/O error reading trace: {message}")]
    Io {
        /// Error message
        message: String,
    },

    /// Stream ended inside a value
    #[error("trace truncated at offset {offset}: {needed} more bytes needed")]
    Truncated {
        /// Stream offset where the read started
        offset: u64,
        /// Bytes missing from the stream
        needed: u64,
    },

    /// Header major version differs from the player's
    #[error("protocol major version mismatch; need {expected}, got {found}")]
    MajorVersionMismatch {
        /// Major version the player speaks
        expected: u16,
        /// Major version in the header
        found: u16,
    },

    /// Header minor version is newer than the player's
    #[error("protocol minor version mismatch; need <= {supported}, got {found}")]
    MinorVersionTooNew {
        /// Newest minor version the player reads
        supported: u16,
        /// Minor version in the header
        found: u16,
    },

    /// Embedded recorder command line exceeds the configured limit
    #[error("too long cmdline: {len} bytes, limit {limit}")]
    CmdlineTooLong {
        /// Declared command line length
        len: u32,
        /// Configured limit
        limit: usize,
    },

    /// Opcode has no call variant
    #[error("unknown opcode {opcode}")]
    UnknownOpcode {
        /// Raw 14-bit opcode
        opcode: u16,
    },

    /// Frame header carries neither start nor end flag
    #[error("frame for opcode {opcode} at offset {offset} has neither start nor end flag")]
    FlaglessFrame {
        /// Opcode carried by the frame
        opcode: Opcode,
        /// Stream offset of the frame header
        offset: u64,
    },

    /// Next record is not the operation the caller is performing
    #[error("{caller}: bad opcode; expected {expected} got {actual}; size left: {remaining}")]
    OpcodeMismatch {
        /// Live operation
        caller: &'static str,
        /// Opcode of the live operation
        expected: Opcode,
        /// Opcode of the next record
        actual: Opcode,
        /// Unread trace bytes when the check started
        remaining: u64,
    },

    /// Next record is the wrong half of the call
    #[error("{caller}: bad fcall {opcode}; expected {flag} flag")]
    MissingFlag {
        /// Live operation
        caller: &'static str,
        /// Opcode of the next record
        opcode: Opcode,
        /// Half the caller needed
        flag: Direction,
    },

    /// Trace ended while a specific call was expected
    #[error("{caller}: end of trace reached while a call was still expected")]
    UnexpectedEndOfTrace {
        /// Live operation
        caller: &'static str,
    },

    /// No record could be produced
    #[error("command queue is empty")]
    QueueEmpty,

    /// Playback finished with records left over
    #[error("trace not exhausted; next record is {next}")]
    TraceNotExhausted {
        /// Opcode of the first unconsumed record
        next: Opcode,
    },

    /// Decoded payload does not belong to the validated opcode
    #[error("{caller}: record payload for {actual} where {expected} was validated")]
    RecordKindMismatch {
        /// Live operation
        caller: &'static str,
        /// Opcode that passed validation
        expected: Opcode,
        /// Opcode of the decoded payload
        actual: Opcode,
    },

    /// Callback record found where callbacks may not be replayed
    #[error("{caller}: read a callback, but it's not allowed here")]
    CallbackNotAllowed {
        /// Live operation
        caller: &'static str,
    },

    /// Recorded output does not fit the caller's buffer
    #[error("{caller}: recorded output of {needed} bytes exceeds buffer of {capacity}")]
    OutputOverflow {
        /// Live operation
        caller: &'static str,
        /// Recorded output length
        needed: usize,
        /// Caller buffer length
        capacity: usize,
    },

    /// Live argument differs from the recorded one
    #[error("{caller}: argument '{field}' of {opcode} differs; recorded {recorded}, live {live}")]
    ArgumentMismatch {
        /// Live operation
        caller: &'static str,
        /// Opcode of the call
        opcode: Opcode,
        /// First differing argument
        field: &'static str,
        /// Recorded value, debug-formatted
        recorded: String,
        /// Live value, debug-formatted
        live: String,
    },

    /// No free slot left for another in-flight record
    #[error("running out of free slots (capacity {capacity})")]
    SlotsExhausted {
        /// Pool capacity
        capacity: usize,
    },

    /// Slot handle is foreign, stale, or already released
    #[error("invalid slot handle provided: slot {index} generation {generation}")]
    InvalidSlot {
        /// Slot index in the handle
        index: usize,
        /// Generation in the handle
        generation: u32,
    },

    /// Recorded callback id was never registered
    #[error("callback {id} not found")]
    CallbackNotFound {
        /// Recorded callback id
        id: CallbackId,
    },

    /// Callback is already running further up the stack
    #[error("callback {id} is already running")]
    CallbackBusy {
        /// Id of the running callback
        id: CallbackId,
    },

    /// Live callback registration state differs from the recording
    #[error("{phase} {field} desync for callback {id}; recorded {recorded}, live {live}")]
    CallbackDesync {
        /// Callback being delivered
        id: CallbackId,
        /// Whether the check ran before or after delivery
        phase: SyncPhase,
        /// `flags` or `index`
        field: &'static str,
        /// Recorded value
        recorded: i64,
        /// Live value
        live: i64,
    },

    /// Player configuration is unusable
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with it
        reason: String,
    },

    /// Operation has no recorded counterpart
    #[error("{caller}: not implemented")]
    Unsupported {
        /// Operation that was attempted
        caller: &'static str,
    },
}

impl PlaybackError {
    /// Taxonomy class of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. }
            | Self::Truncated { .. }
            | Self::MajorVersionMismatch { .. }
            | Self::MinorVersionTooNew { .. }
            | Self::CmdlineTooLong { .. }
            | Self::UnknownOpcode { .. }
            | Self::FlaglessFrame { .. } => ErrorKind::Format,
            Self::OpcodeMismatch { .. }
            | Self::MissingFlag { .. }
            | Self::UnexpectedEndOfTrace { .. }
            | Self::QueueEmpty
            | Self::TraceNotExhausted { .. }
            | Self::RecordKindMismatch { .. } => ErrorKind::Desync,
            Self::ArgumentMismatch { .. } => ErrorKind::ArgumentMismatch,
            Self::SlotsExhausted { .. } | Self::InvalidSlot { .. } => ErrorKind::Resource,
            Self::CallbackNotFound { .. } | Self::CallbackDesync { .. } => {
                ErrorKind::CallbackDesync
            }
            Self::CallbackNotAllowed { .. }
            | Self::CallbackBusy { .. }
            | Self::OutputOverflow { .. }
            | Self::InvalidConfig { .. } => ErrorKind::Usage,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
        }
    }

    /// Process status a harness should exit with
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnexpectedEndOfTrace { .. } => EXIT_END_OF_TRACE,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for PlaybackError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PlaybackError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlaybackError::QueueEmpty;
        assert_eq!(format!("{}", err), "command queue is empty");

        let err = PlaybackError::MajorVersionMismatch {
            expected: 0,
            found: 1,
        };
        assert_eq!(
            format!("{}", err),
            "protocol major version mismatch; need 0, got 1"
        );
    }

    #[test]
    fn test_opcode_mismatch_names_both_opcodes() {
        let err = PlaybackError::OpcodeMismatch {
            caller: "srand",
            expected: Opcode::Srand,
            actual: Opcode::Rand,
            remaining: 12,
        };
        let s = err.to_string();
        assert!(s.contains("srand"));
        assert!(s.contains("3 (srand)"));
        assert!(s.contains("4 (rand)"));
        assert!(s.contains("12"));
    }

    #[test]
    fn test_callback_desync_display() {
        let err = PlaybackError::CallbackDesync {
            id: CallbackId(3),
            phase: SyncPhase::Post,
            field: "flags",
            recorded: 1,
            live: 2,
        };
        assert_eq!(
            err.to_string(),
            "POST flags desync for callback #3; recorded 1, live 2"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(PlaybackError::QueueEmpty.kind(), ErrorKind::Desync);
        assert_eq!(
            PlaybackError::UnknownOpcode { opcode: 99 }.kind(),
            ErrorKind::Format
        );
        assert_eq!(
            PlaybackError::SlotsExhausted { capacity: 4 }.kind(),
            ErrorKind::Resource
        );
        assert_eq!(
            PlaybackError::CallbackNotFound { id: CallbackId(0) }.kind(),
            ErrorKind::CallbackDesync
        );
        assert_eq!(
            PlaybackError::Unsupported { caller: "LogOn" }.kind(),
            ErrorKind::Unsupported
        );
    }

    #[test]
    fn test_exit_codes() {
        let err = PlaybackError::UnexpectedEndOfTrace { caller: "rand" };
        assert_eq!(err.exit_code(), EXIT_END_OF_TRACE);
        assert_eq!(PlaybackError::QueueEmpty.exit_code(), 1);
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = PlaybackError::from(io);
        assert!(matches!(err, PlaybackError::Io { .. }));
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
