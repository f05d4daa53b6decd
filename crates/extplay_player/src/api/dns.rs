//! Name resolution call sites.

use super::{buffer_len, copy_out};
use crate::engine::Player;
use extplay_calls::{GetHostByName, GetHostName, HostEntry};
use extplay_core::PlaybackResult;

impl Player {
    /// `gethostbyname()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn gethostbyname(&mut self, name: &str) -> PlaybackResult<HostEntry> {
        self.play(GetHostByName::new(name.to_owned()), "gethostbyname", |rec| {
            Ok(rec.res.clone())
        })
    }

    /// `gethostname()`: writes the recorded name and a terminating NUL
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next, or the
    /// recorded name does not fit `buf`
    pub fn gethostname(&mut self, buf: &mut [u8]) -> PlaybackResult<i32> {
        let expected = GetHostName::new(buffer_len(buf));
        self.play(expected, "gethostname", |rec| {
            let mut name = Vec::with_capacity(rec.name.len() + 1);
            name.extend_from_slice(rec.name.as_bytes());
            name.push(0);
            copy_out("gethostname", &name, buf)?;
            Ok(rec.res)
        })
    }
}
