//! Trace protocol version.

use crate::error::{PlaybackError, PlaybackResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Protocol version carried in every trace header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProtocolVersion {
    /// Major version; must match the player exactly
    pub major: u16,
    /// Minor version; the player reads any minor up to its own
    pub minor: u16,
}

impl ProtocolVersion {
    /// Version this player speaks
    pub const SUPPORTED: Self = Self::new(0, 6);

    /// Create a new version
    #[must_use]
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Check that a trace written with `self` can be played by `player`.
    ///
    /// Minor revisions are forward-compatible only: an older trace plays on a
    /// newer player, never the reverse.
    ///
    /// # Errors
    ///
    /// Returns error if the major differs or the minor is newer than `player`
    pub fn ensure_playable_by(self, player: Self) -> PlaybackResult<()> {
        if self.major != player.major {
            return Err(PlaybackError::MajorVersionMismatch {
                expected: player.major,
                found: self.major,
            });
        }
        if self.minor > player.minor {
            return Err(PlaybackError::MinorVersionTooNew {
                supported: player.minor,
                found: self.minor,
            });
        }
        Ok(())
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::SUPPORTED
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
