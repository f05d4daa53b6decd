//! Socket call sites.
//!
//! Addresses travel as raw `sockaddr` bytes; the player never interprets
//! them.

use super::{buffer_len, copy_out};
use crate::engine::Player;
use extplay_calls::{
    Bind, CloseSocket, GetSockName, IoctlSocket, RecvFrom, SendTo, SetSockOpt, Socket,
    WsaGetLastError,
};
use extplay_core::PlaybackResult;

impl Player {
    /// `socket()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn socket(&mut self, af: i32, kind: i32, protocol: i32) -> PlaybackResult<u32> {
        self.play(Socket::new(af, kind, protocol), "socket", |rec| Ok(rec.res))
    }

    /// `ioctlsocket()`; `arg` is both input and output
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn ioctlsocket(&mut self, socket: u32, cmd: i32, arg: &mut u32) -> PlaybackResult<i32> {
        self.play(IoctlSocket::new(socket, cmd, *arg), "ioctlsocket", |rec| {
            *arg = rec.out_value;
            Ok(rec.res)
        })
    }

    /// `setsockopt()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn setsockopt(
        &mut self,
        socket: u32,
        level: i32,
        optname: i32,
        optval: &[u8],
    ) -> PlaybackResult<i32> {
        self.play(
            SetSockOpt::new(socket, level, optname, optval.to_vec()),
            "setsockopt",
            |rec| Ok(rec.res),
        )
    }

    /// `closesocket()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn closesocket(&mut self, socket: u32) -> PlaybackResult<i32> {
        self.play(CloseSocket::new(socket), "closesocket", |rec| Ok(rec.res))
    }

    /// `recvfrom()`.
    ///
    /// The recorded address length is always reported through `from_len`;
    /// data and address are copied only when the recorded result is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next, or a
    /// recorded datagram or address does not fit its buffer
    pub fn recvfrom(
        &mut self,
        socket: u32,
        buf: &mut [u8],
        flags: i32,
        from: &mut [u8],
        from_len: &mut i32,
    ) -> PlaybackResult<i32> {
        let expected = RecvFrom::new(socket, buffer_len(buf), flags, *from_len);
        self.play(expected, "recvfrom", |rec| {
            *from_len = rec.from_len_out;
            if rec.res >= 0 {
                copy_out("recvfrom", &rec.data, buf)?;
                copy_out("recvfrom", &rec.from, from)?;
            }
            Ok(rec.res)
        })
    }

    /// `sendto()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn sendto(&mut self, socket: u32, data: &[u8], flags: i32, to: &[u8]) -> PlaybackResult<i32> {
        self.play(
            SendTo::new(socket, data.to_vec(), flags, to.to_vec()),
            "sendto",
            |rec| Ok(rec.res),
        )
    }

    /// `bind()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn bind(&mut self, socket: u32, addr: &[u8]) -> PlaybackResult<i32> {
        self.play(Bind::new(socket, addr.to_vec()), "bind", |rec| Ok(rec.res))
    }

    /// `getsockname()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next, or the
    /// recorded address does not fit `name`
    pub fn getsockname(
        &mut self,
        socket: u32,
        name: &mut [u8],
        name_len: &mut i32,
    ) -> PlaybackResult<i32> {
        self.play(GetSockName::new(socket, *name_len), "getsockname", |rec| {
            *name_len = rec.addr_len_out;
            if rec.res >= 0 {
                copy_out("getsockname", &rec.addr, name)?;
            }
            Ok(rec.res)
        })
    }

    /// `WSAGetLastError()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn wsa_get_last_error(&mut self) -> PlaybackResult<i32> {
        self.play(WsaGetLastError::new(), "WSAGetLastError", |rec| Ok(rec.res))
    }
}
