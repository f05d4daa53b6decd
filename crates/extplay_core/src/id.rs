//! Identifiers for callbacks seen during playback.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity a live callback object reports about itself.
///
/// The player never interprets the value; it only needs equal tokens for
/// the same object and distinct tokens for distinct objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallbackToken(pub u64);

impl CallbackToken {
    /// Create from a raw value
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get as raw value
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallbackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cb_{:016x}", self.0)
    }
}

/// Sequential id assigned to a callback the first time the player sees it.
///
/// Recorded callback invocations refer to callbacks by this id, so ids must
/// be handed out in the same order the recorder handed them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct CallbackId(pub i32);

impl CallbackId {
    /// Get as raw value
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_display() {
        assert_eq!(CallbackToken(0xAB).to_string(), "cb_00000000000000ab");
    }

    #[test]
    fn test_callback_id_display() {
        assert_eq!(CallbackId(7).to_string(), "#7");
    }

    #[test]
    fn test_token_roundtrip() {
        let token = CallbackToken::from_raw(42);
        assert_eq!(token.as_u64(), 42);
    }
}
