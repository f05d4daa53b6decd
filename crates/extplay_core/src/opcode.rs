//! Opcode table for recorded boundary calls.
//!
//! Every frame header carries a 14-bit opcode naming the intercepted
//! operation. Opcode `0` is reserved for the synthesized end-of-trace
//! sentinel and never appears on the wire.

use crate::error::{PlaybackError, PlaybackResult};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! opcodes {
    ($( $(#[$meta:meta])* $variant:ident = $code:literal => $name:literal, )*) => {
        /// Identifies an intercepted operation and its payload layout
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(u16)]
        pub enum Opcode {
            /// End-of-trace sentinel
            None = 0,
            $( $(#[$meta])* $variant = $code, )*
        }

        impl Opcode {
            /// Every opcode that may appear on the wire, in numeric order
            pub const ALL: &'static [Opcode] = &[$(Opcode::$variant,)*];

            /// Name of the intercepted environment function
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    Opcode::None => "<end of trace>",
                    $(Opcode::$variant => $name,)*
                }
            }
        }

        impl TryFrom<u16> for Opcode {
            type Error = PlaybackError;

            fn try_from(raw: u16) -> PlaybackResult<Self> {
                match raw {
                    0 => Ok(Opcode::None),
                    $($code => Ok(Opcode::$variant),)*
                    _ => Err(PlaybackError::UnknownOpcode { opcode: raw }),
                }
            }
        }
    };
}

opcodes! {
    /// `time()`
    Time = 1 => "time",
    /// `localtime()`
    LocalTime = 2 => "localtime",
    /// `srand()`
    Srand = 3 => "srand",
    /// `rand()`
    Rand = 4 => "rand",
    /// `Sleep()`
    Sleep = 5 => "Sleep",
    /// `QueryPerformanceFrequency()`
    QueryPerfFreq = 6 => "QueryPerfFreq",
    /// `QueryPerformanceCounter()`
    QueryPerfCounter = 7 => "QueryPerfCounter",
    /// `GetTickCount()`
    GetTickCount = 8 => "GetTickCount",
    /// `GetLocalTime()`
    GetLocalTime = 9 => "GetLocalTime",
    /// `GetSystemTime()`
    GetSystemTime = 10 => "GetSystemTime",
    /// `GetTimeZoneInformation()`
    GetTimeZoneInfo = 11 => "GetTimeZoneInfo",
    /// `GetProcessTimes()`
    GetProcessTimes = 12 => "GetProcessTimes",
    /// `GetSystemTimeAsFileTime()`
    GetSystemTimeAsFileTime = 13 => "GetSystemTimeAsFileTime",
    /// `socket()`
    Socket = 14 => "socket",
    /// `ioctlsocket()`
    IoctlSocket = 15 => "ioctlsocket",
    /// `setsockopt()`
    SetSockOpt = 16 => "setsockopt",
    /// `closesocket()`
    CloseSocket = 17 => "closesocket",
    /// `recvfrom()`
    RecvFrom = 18 => "recvfrom",
    /// `sendto()`
    SendTo = 19 => "sendto",
    /// `bind()`
    Bind = 20 => "bind",
    /// `getsockname()`
    GetSockName = 21 => "getsockname",
    /// `WSAGetLastError()`
    WsaGetLastError = 22 => "WSAGetLastError",
    /// `gethostbyname()`
    GetHostByName = 23 => "gethostbyname",
    /// `gethostname()`
    GetHostName = 24 => "gethostname",
    /// Callback invocation carrying only a payload
    SteamCallback1 = 25 => "SteamCallback1",
    /// Call-result invocation carrying payload, I/O failure flag and call handle
    SteamCallback2 = 26 => "SteamCallback2",
    /// `SteamAPI_SetBreakpadAppID()`
    SteamApiSetBreakpadAppId = 27 => "SteamAPI_SetBreakpadAppID",
    /// `SteamAPI_RegisterCallback()`
    SteamApiRegisterCallback = 28 => "SteamAPI_RegisterCallback",
    /// `SteamAPI_UnregisterCallback()`
    SteamApiUnregisterCallback = 29 => "SteamAPI_UnregisterCallback",
    /// `SteamAPI_UnregisterCallResult()`
    SteamApiUnregisterCallResult = 30 => "SteamAPI_UnregisterCallResult",
    /// `SteamAPI_Init()`
    SteamApiInit = 31 => "SteamAPI_Init",
    /// `SteamAPI_RunCallbacks()`
    SteamApiRunCallbacks = 32 => "SteamAPI_RunCallbacks",
    /// `SteamApps()`
    SteamApps = 33 => "SteamApps",
    /// `SteamGameServer_Init()`
    SteamGameServerInit = 34 => "SteamGameServer_Init",
    /// `SteamGameServer()`
    SteamGameServer = 35 => "SteamGameServer",
    /// `SteamGameServer_RunCallbacks()`
    SteamGameServerRunCallbacks = 36 => "SteamGameServer_RunCallbacks",
    /// `SteamGameServer_Shutdown()`
    SteamGameServerShutdown = 37 => "SteamGameServer_Shutdown",
    /// `ISteamGameServer::SetProduct()`
    GsSetProduct = 38 => "SetProduct",
    /// `ISteamGameServer::SetGameDescription()`
    GsSetGameDesc = 39 => "SetGameDescription",
    /// `ISteamGameServer::SetModDir()`
    GsSetModDir = 40 => "SetModDir",
    /// `ISteamGameServer::SetDedicatedServer()`
    GsSetDedicatedServer = 41 => "SetDedicatedServer",
    /// `ISteamGameServer::LogOnAnonymous()`
    GsLogOnAnonymous = 42 => "LogOnAnonymous",
    /// `ISteamGameServer::LogOff()`
    GsLogOff = 43 => "LogOff",
    /// `ISteamGameServer::BLoggedOn()`
    GsBLoggedOn = 44 => "BLoggedOn",
    /// `ISteamGameServer::BSecure()`
    GsBSecure = 45 => "BSecure",
    /// `ISteamGameServer::GetSteamID()`
    GsGetSteamId = 46 => "GetSteamID",
    /// `ISteamGameServer::WasRestartRequested()`
    GsWasRestartRequested = 47 => "WasRestartRequested",
    /// `ISteamGameServer::SetMaxPlayerCount()`
    GsSetMaxPlayerCount = 48 => "SetMaxPlayerCount",
    /// `ISteamGameServer::SetBotPlayerCount()`
    GsSetBotPlayerCount = 49 => "SetBotPlayerCount",
    /// `ISteamGameServer::SetServerName()`
    GsSetServerName = 50 => "SetServerName",
    /// `ISteamGameServer::SetMapName()`
    GsSetMapName = 51 => "SetMapName",
    /// `ISteamGameServer::SetPasswordProtected()`
    GsSetPasswordProtected = 52 => "SetPasswordProtected",
    /// `ISteamGameServer::ClearAllKeyValues()`
    GsClearAllKeyValues = 53 => "ClearAllKeyValues",
    /// `ISteamGameServer::SetKeyValue()`
    GsSetKeyValue = 54 => "SetKeyValue",
    /// `ISteamGameServer::SendUserConnectAndAuthenticate()`
    GsSendUserConnectAndAuthenticate = 55 => "SendUserConnectAndAuthenticate",
    /// `ISteamGameServer::CreateUnauthenticatedUserConnection()`
    GsCreateUnauthUserConnection = 56 => "CreateUnauthenticatedUserConnection",
    /// `ISteamGameServer::SendUserDisconnect()`
    GsSendUserDisconnect = 57 => "SendUserDisconnect",
    /// `ISteamGameServer::BUpdateUserData()`
    GsBUpdateUserData = 58 => "BUpdateUserData",
    /// `ISteamGameServer::HandleIncomingPacket()`
    GsHandleIncomingPacket = 59 => "HandleIncomingPacket",
    /// `ISteamGameServer::GetNextOutgoingPacket()`
    GsGetNextOutgoingPacket = 60 => "GetNextOutgoingPacket",
    /// `ISteamGameServer::EnableHeartbeats()`
    GsEnableHeartbeats = 61 => "EnableHeartbeats",
    /// `ISteamGameServer::SetHeartbeatInterval()`
    GsSetHeartbeatInterval = 62 => "SetHeartbeatInterval",
}

impl Opcode {
    /// Largest value representable in a frame header
    pub const MAX_RAW: u16 = 0x3FFF;

    /// Raw 14-bit value
    #[must_use]
    pub const fn as_raw(self) -> u16 {
        self as u16
    }

    /// Whether records with this opcode are callback invocations
    #[must_use]
    pub const fn is_callback(self) -> bool {
        matches!(self, Opcode::SteamCallback1 | Opcode::SteamCallback2)
    }

    /// Whether this is the end-of-trace sentinel
    #[must_use]
    pub const fn is_sentinel(self) -> bool {
        matches!(self, Opcode::None)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_raw(), self.name())
    }
}

/// Which half of a call a record represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Prologue: arguments captured on entry
    Start,
    /// Epilogue: results captured on exit
    End,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::End => write!(f, "end"),
        }
    }
}
