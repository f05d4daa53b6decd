//! One call variant per intercepted operation.
//!
//! Each variant owns both halves of a call: the arguments captured on entry
//! (prologue) and the results captured on exit (epilogue). A decoded record
//! only has the half its frame carried; the other half stays at its default.

use crate::types::{CallbackState, FileTime, HostEntry, SystemTime, TimeZoneInfo, Tm};
use extplay_core::{CallbackId, Opcode, PlaybackError, PlaybackResult};
use extplay_trace::{TraceStream, Wire};
use serde::Serialize;
use std::fmt;

/// Behavior shared by every call variant
pub trait CallKind: fmt::Debug + Clone + Default + Sized {
    /// Opcode this variant is recorded under
    const OPCODE: Opcode;

    /// Decode entry arguments
    ///
    /// # Errors
    ///
    /// Returns error if the stream ends inside the payload
    fn decode_prologue(&mut self, stream: &mut TraceStream) -> PlaybackResult<()>;

    /// Decode exit results
    ///
    /// # Errors
    ///
    /// Returns error if the stream ends inside the payload
    fn decode_epilogue(&mut self, stream: &mut TraceStream) -> PlaybackResult<()>;

    /// Append entry arguments in trace layout
    fn encode_prologue(&self, out: &mut Vec<u8>);

    /// Append exit results in trace layout
    fn encode_epilogue(&self, out: &mut Vec<u8>);

    /// Compare live arguments (`self`) against a recorded prologue
    ///
    /// # Errors
    ///
    /// Returns `ArgumentMismatch` naming the first differing field
    fn ensure_args_equal(&self, recorded: &Self, caller: &'static str) -> PlaybackResult<()>;

    /// Borrow this variant out of a decoded call
    fn from_call(call: &ExtCall) -> Option<&Self>;

    /// Wrap into the sum type
    fn into_call(self) -> ExtCall;
}

fn argument_mismatch<T: fmt::Debug>(
    caller: &'static str,
    opcode: Opcode,
    field: &'static str,
    recorded: &T,
    live: &T,
) -> PlaybackError {
    PlaybackError::ArgumentMismatch {
        caller,
        opcode,
        field,
        recorded: format!("{recorded:?}"),
        live: format!("{live:?}"),
    }
}

macro_rules! calls {
    ($(
        $(#[$meta:meta])*
        $name:ident {
            args { $($arg:ident : $arg_ty:ty),* $(,)? }
            results { $($res:ident : $res_ty:ty),* $(,)? }
        }
    )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
            pub struct $name {
                $(
                    #[doc = concat!("Argument `", stringify!($arg), "`")]
                    pub $arg: $arg_ty,
                )*
                $(
                    #[doc = concat!("Recorded result `", stringify!($res), "`")]
                    pub $res: $res_ty,
                )*
            }

            impl $name {
                /// Build the expected call from live arguments
                #[must_use]
                #[allow(clippy::needless_update, clippy::too_many_arguments)]
                pub fn new($($arg: $arg_ty),*) -> Self {
                    Self {
                        $( $arg, )*
                        ..Self::default()
                    }
                }
            }

            impl CallKind for $name {
                const OPCODE: Opcode = Opcode::$name;

                #[allow(unused_variables)]
                fn decode_prologue(&mut self, stream: &mut TraceStream) -> PlaybackResult<()> {
                    $( self.$arg = Wire::decode(stream)?; )*
                    Ok(())
                }

                #[allow(unused_variables)]
                fn decode_epilogue(&mut self, stream: &mut TraceStream) -> PlaybackResult<()> {
                    $( self.$res = Wire::decode(stream)?; )*
                    Ok(())
                }

                #[allow(unused_variables)]
                fn encode_prologue(&self, out: &mut Vec<u8>) {
                    $( self.$arg.encode(out); )*
                }

                #[allow(unused_variables)]
                fn encode_epilogue(&self, out: &mut Vec<u8>) {
                    $( self.$res.encode(out); )*
                }

                #[allow(unused_variables)]
                fn ensure_args_equal(
                    &self,
                    recorded: &Self,
                    caller: &'static str,
                ) -> PlaybackResult<()> {
                    $(
                        if self.$arg != recorded.$arg {
                            return Err(argument_mismatch(
                                caller,
                                Self::OPCODE,
                                stringify!($arg),
                                &recorded.$arg,
                                &self.$arg,
                            ));
                        }
                    )*
                    Ok(())
                }

                fn from_call(call: &ExtCall) -> Option<&Self> {
                    match call {
                        ExtCall::$name(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn into_call(self) -> ExtCall {
                    ExtCall::$name(self)
                }
            }
        )*

        /// Decoded call of any kind
        #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
        pub enum ExtCall {
            /// End-of-trace sentinel
            End,
            $(
                $(#[$meta])*
                $name($name),
            )*
        }

        impl ExtCall {
            /// Empty call for an opcode, ready to decode into
            #[must_use]
            pub fn for_opcode(opcode: Opcode) -> Self {
                match opcode {
                    Opcode::None => ExtCall::End,
                    $( Opcode::$name => ExtCall::$name($name::default()), )*
                }
            }

            /// Opcode of this call
            #[must_use]
            pub fn opcode(&self) -> Opcode {
                match self {
                    ExtCall::End => Opcode::None,
                    $( ExtCall::$name(_) => Opcode::$name, )*
                }
            }

            /// Decode entry arguments into this call
            ///
            /// # Errors
            ///
            /// Returns error if the stream ends inside the payload
            pub fn decode_prologue(&mut self, stream: &mut TraceStream) -> PlaybackResult<()> {
                match self {
                    ExtCall::End => Ok(()),
                    $( ExtCall::$name(inner) => inner.decode_prologue(stream), )*
                }
            }

            /// Decode exit results into this call
            ///
            /// # Errors
            ///
            /// Returns error if the stream ends inside the payload
            pub fn decode_epilogue(&mut self, stream: &mut TraceStream) -> PlaybackResult<()> {
                match self {
                    ExtCall::End => Ok(()),
                    $( ExtCall::$name(inner) => inner.decode_epilogue(stream), )*
                }
            }

            /// Append entry arguments in trace layout
            pub fn encode_prologue(&self, out: &mut Vec<u8>) {
                match self {
                    ExtCall::End => {}
                    $( ExtCall::$name(inner) => inner.encode_prologue(out), )*
                }
            }

            /// Append exit results in trace layout
            pub fn encode_epilogue(&self, out: &mut Vec<u8>) {
                match self {
                    ExtCall::End => {}
                    $( ExtCall::$name(inner) => inner.encode_epilogue(out), )*
                }
            }

            /// Compare live arguments against a recorded call of the same kind
            ///
            /// # Errors
            ///
            /// Returns `RecordKindMismatch` if the kinds differ, otherwise
            /// `ArgumentMismatch` for the first differing field
            pub fn ensure_args_equal(
                &self,
                recorded: &ExtCall,
                caller: &'static str,
            ) -> PlaybackResult<()> {
                match (self, recorded) {
                    (ExtCall::End, ExtCall::End) => Ok(()),
                    $(
                        (ExtCall::$name(live), ExtCall::$name(rec)) => {
                            live.ensure_args_equal(rec, caller)
                        }
                    )*
                    _ => Err(PlaybackError::RecordKindMismatch {
                        caller,
                        expected: self.opcode(),
                        actual: recorded.opcode(),
                    }),
                }
            }
        }
    };
}

calls! {
    /// `time()`
    Time {
        args {}
        results { res: u32 }
    }
    /// `localtime()`
    LocalTime {
        args { time: u32 }
        results { res: Tm }
    }
    /// `srand()`
    Srand {
        args { seed: u32 }
        results {}
    }
    /// `rand()`
    Rand {
        args {}
        results { res: i32 }
    }
    /// `Sleep()`
    Sleep {
        args { msec: u32 }
        results {}
    }
    /// `QueryPerformanceFrequency()`
    QueryPerfFreq {
        args {}
        results { freq: i64, res: bool }
    }
    /// `QueryPerformanceCounter()`
    QueryPerfCounter {
        args {}
        results { counter: i64, res: bool }
    }
    /// `GetTickCount()`
    GetTickCount {
        args {}
        results { res: u32 }
    }
    /// `GetLocalTime()`
    GetLocalTime {
        args {}
        results { res: SystemTime }
    }
    /// `GetSystemTime()`
    GetSystemTime {
        args {}
        results { res: SystemTime }
    }
    /// `GetTimeZoneInformation()`
    GetTimeZoneInfo {
        args {}
        results { res: TimeZoneInfo }
    }
    /// `GetProcessTimes()`
    GetProcessTimes {
        args {}
        results {
            res: bool,
            creation_time: FileTime,
            exit_time: FileTime,
            kernel_time: FileTime,
            user_time: FileTime,
        }
    }
    /// `GetSystemTimeAsFileTime()`
    GetSystemTimeAsFileTime {
        args {}
        results { system_time: FileTime }
    }
    /// `socket()`
    Socket {
        args { af: i32, kind: i32, protocol: i32 }
        results { res: u32 }
    }
    /// `ioctlsocket()`
    IoctlSocket {
        args { socket: u32, cmd: i32, arg: u32 }
        results { res: i32, out_value: u32 }
    }
    /// `setsockopt()`
    SetSockOpt {
        args { socket: u32, level: i32, optname: i32, optval: Vec<u8> }
        results { res: i32 }
    }
    /// `closesocket()`
    CloseSocket {
        args { socket: u32 }
        results { res: i32 }
    }
    /// `recvfrom()`
    RecvFrom {
        args { socket: u32, len: i32, flags: i32, from_len: i32 }
        results { res: i32, data: Vec<u8>, from: Vec<u8>, from_len_out: i32 }
    }
    /// `sendto()`
    SendTo {
        args { socket: u32, data: Vec<u8>, flags: i32, to: Vec<u8> }
        results { res: i32 }
    }
    /// `bind()`
    Bind {
        args { socket: u32, addr: Vec<u8> }
        results { res: i32 }
    }
    /// `getsockname()`
    GetSockName {
        args { socket: u32, name_len: i32 }
        results { res: i32, addr: Vec<u8>, addr_len_out: i32 }
    }
    /// `WSAGetLastError()`
    WsaGetLastError {
        args {}
        results { res: i32 }
    }
    /// `gethostbyname()`
    GetHostByName {
        args { name: String }
        results { res: HostEntry }
    }
    /// `gethostname()`
    GetHostName {
        args { name_len: i32 }
        results { res: i32, name: String }
    }
    /// Callback invocation with a payload
    SteamCallback1 {
        args { callback_id: CallbackId, in_state: CallbackState, data: Vec<u8> }
        results { out_state: CallbackState }
    }
    /// Call-result invocation with a payload, I/O failure flag and call handle
    SteamCallback2 {
        args {
            callback_id: CallbackId,
            in_state: CallbackState,
            data: Vec<u8>,
            io_failure: bool,
            api_call: u64,
        }
        results { out_state: CallbackState }
    }
    /// `SteamAPI_SetBreakpadAppID()`
    SteamApiSetBreakpadAppId {
        args { app_id: u32 }
        results {}
    }
    /// `SteamAPI_RegisterCallback()`
    SteamApiRegisterCallback {
        args { callback_id: CallbackId, i_callback: i32, in_state: CallbackState }
        results { out_state: CallbackState }
    }
    /// `SteamAPI_UnregisterCallback()`
    SteamApiUnregisterCallback {
        args { callback_id: CallbackId, in_state: CallbackState }
        results { out_state: CallbackState }
    }
    /// `SteamAPI_UnregisterCallResult()`
    SteamApiUnregisterCallResult {
        args { callback_id: CallbackId, api_call: u64, in_state: CallbackState }
        results { out_state: CallbackState }
    }
    /// `SteamAPI_Init()`
    SteamApiInit {
        args {}
        results { res: bool }
    }
    /// `SteamAPI_RunCallbacks()`
    SteamApiRunCallbacks {
        args {}
        results {}
    }
    /// `SteamApps()`
    SteamApps {
        args {}
        results { return_null: bool }
    }
    /// `SteamGameServer_Init()`
    SteamGameServerInit {
        args {
            ip: u32,
            steam_port: u16,
            game_port: u16,
            query_port: u16,
            server_mode: i32,
            version: String,
        }
        results { res: bool }
    }
    /// `SteamGameServer()`
    SteamGameServer {
        args {}
        results { return_null: bool }
    }
    /// `SteamGameServer_RunCallbacks()`
    SteamGameServerRunCallbacks {
        args {}
        results {}
    }
    /// `SteamGameServer_Shutdown()`
    SteamGameServerShutdown {
        args {}
        results {}
    }
    /// `ISteamGameServer::SetProduct()`
    GsSetProduct {
        args { product: String }
        results {}
    }
    /// `ISteamGameServer::SetGameDescription()`
    GsSetGameDesc {
        args { description: String }
        results {}
    }
    /// `ISteamGameServer::SetModDir()`
    GsSetModDir {
        args { mod_dir: String }
        results {}
    }
    /// `ISteamGameServer::SetDedicatedServer()`
    GsSetDedicatedServer {
        args { dedicated: bool }
        results {}
    }
    /// `ISteamGameServer::LogOnAnonymous()`
    GsLogOnAnonymous {
        args {}
        results {}
    }
    /// `ISteamGameServer::LogOff()`
    GsLogOff {
        args {}
        results {}
    }
    /// `ISteamGameServer::BLoggedOn()`
    GsBLoggedOn {
        args {}
        results { res: bool }
    }
    /// `ISteamGameServer::BSecure()`
    GsBSecure {
        args {}
        results { res: bool }
    }
    /// `ISteamGameServer::GetSteamID()`
    GsGetSteamId {
        args {}
        results { steam_id: u64 }
    }
    /// `ISteamGameServer::WasRestartRequested()`
    GsWasRestartRequested {
        args {}
        results { res: bool }
    }
    /// `ISteamGameServer::SetMaxPlayerCount()`
    GsSetMaxPlayerCount {
        args { max_players: i32 }
        results {}
    }
    /// `ISteamGameServer::SetBotPlayerCount()`
    GsSetBotPlayerCount {
        args { bot_players: i32 }
        results {}
    }
    /// `ISteamGameServer::SetServerName()`
    GsSetServerName {
        args { server_name: String }
        results {}
    }
    /// `ISteamGameServer::SetMapName()`
    GsSetMapName {
        args { map_name: String }
        results {}
    }
    /// `ISteamGameServer::SetPasswordProtected()`
    GsSetPasswordProtected {
        args { password_protected: bool }
        results {}
    }
    /// `ISteamGameServer::ClearAllKeyValues()`
    GsClearAllKeyValues {
        args {}
        results {}
    }
    /// `ISteamGameServer::SetKeyValue()`
    GsSetKeyValue {
        args { key: String, value: String }
        results {}
    }
    /// `ISteamGameServer::SendUserConnectAndAuthenticate()`
    GsSendUserConnectAndAuthenticate {
        args { client_ip: u32, auth_blob: Vec<u8> }
        results { res: bool, steam_id: u64 }
    }
    /// `ISteamGameServer::CreateUnauthenticatedUserConnection()`
    GsCreateUnauthUserConnection {
        args {}
        results { steam_id: u64 }
    }
    /// `ISteamGameServer::SendUserDisconnect()`
    GsSendUserDisconnect {
        args { steam_id: u64 }
        results {}
    }
    /// `ISteamGameServer::BUpdateUserData()`
    GsBUpdateUserData {
        args { steam_id: u64, player_name: String, score: u32 }
        results { res: bool }
    }
    /// `ISteamGameServer::HandleIncomingPacket()`
    GsHandleIncomingPacket {
        args { data: Vec<u8>, src_ip: u32, src_port: u16 }
        results { res: bool }
    }
    /// `ISteamGameServer::GetNextOutgoingPacket()`
    GsGetNextOutgoingPacket {
        args { max_out: i32 }
        results { res: i32, buf: Vec<u8>, addr: u32, port: u16 }
    }
    /// `ISteamGameServer::EnableHeartbeats()`
    GsEnableHeartbeats {
        args { active: bool }
        results {}
    }
    /// `ISteamGameServer::SetHeartbeatInterval()`
    GsSetHeartbeatInterval {
        args { interval: i32 }
        results {}
    }
}

impl ExtCall {
    /// Whether this is a callback invocation
    #[must_use]
    pub fn is_callback(&self) -> bool {
        self.opcode().is_callback()
    }

    /// Callback id and pre/post snapshots of a callback invocation
    #[must_use]
    pub fn callback_states(&self) -> Option<(CallbackId, CallbackState, CallbackState)> {
        match self {
            ExtCall::SteamCallback1(cb) => Some((cb.callback_id, cb.in_state, cb.out_state)),
            ExtCall::SteamCallback2(cb) => Some((cb.callback_id, cb.in_state, cb.out_state)),
            _ => None,
        }
    }
}
