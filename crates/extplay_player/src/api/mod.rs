//! Call sites for every intercepted environment function.
//!
//! Each call site runs the two-phase exchange against its one fixed opcode
//! and hands back the recorded results.

pub mod apps;
pub mod clock;
pub mod dns;
pub mod game_server;
pub mod socket;
pub mod steam;

pub use apps::SteamApps;
pub use clock::ProcessTimes;
pub use game_server::{GameServer, OutgoingPacket};

use extplay_core::{PlaybackError, PlaybackResult};

/// Copy a recorded blob into a caller buffer, returning the bytes written
pub(crate) fn copy_out(caller: &'static str, recorded: &[u8], dst: &mut [u8]) -> PlaybackResult<usize> {
    let capacity = dst.len();
    let target = dst
        .get_mut(..recorded.len())
        .ok_or(PlaybackError::OutputOverflow {
            caller,
            needed: recorded.len(),
            capacity,
        })?;
    target.copy_from_slice(recorded);
    Ok(recorded.len())
}

/// Length of a caller buffer as the platform's `int`
pub(crate) fn buffer_len(buf: &[u8]) -> i32 {
    i32::try_from(buf.len()).unwrap_or(i32::MAX)
}
