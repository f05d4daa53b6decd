//! `ISteamGameServer` interface played back from the trace.

use super::{buffer_len, copy_out};
use crate::engine::Player;
use extplay_calls::{
    GsBLoggedOn, GsBSecure, GsBUpdateUserData, GsClearAllKeyValues,
    GsCreateUnauthUserConnection, GsEnableHeartbeats, GsGetNextOutgoingPacket, GsGetSteamId,
    GsHandleIncomingPacket, GsLogOff, GsLogOnAnonymous, GsSendUserConnectAndAuthenticate,
    GsSendUserDisconnect, GsSetBotPlayerCount, GsSetDedicatedServer, GsSetGameDesc,
    GsSetHeartbeatInterval, GsSetKeyValue, GsSetMapName, GsSetMaxPlayerCount, GsSetModDir,
    GsSetPasswordProtected, GsSetProduct, GsSetServerName, GsWasRestartRequested,
};
use extplay_core::{PlaybackError, PlaybackResult};

/// Packet handed out by [`GameServer::get_next_outgoing_packet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutgoingPacket {
    /// Recorded return value; bytes written when positive
    pub len: i32,
    /// Destination IPv4 address in host order
    pub addr: u32,
    /// Destination port
    pub port: u16,
}

/// Game server interface bound to a running player.
///
/// Every member consumes its own recorded call. Members the recorder never
/// captured fail with [`PlaybackError::Unsupported`].
#[derive(Debug)]
pub struct GameServer<'a> {
    player: &'a mut Player,
}

macro_rules! unsupported {
    ($( $(#[$meta:meta])* $method:ident => $caller:literal ( $($arg:ident : $ty:ty),* ) -> $ret:ty; )*) => {
        $(
            $(#[$meta])*
            ///
            /// # Errors
            ///
            /// Always returns `Unsupported`; traces never contain this call
            #[allow(unused_variables)]
            pub fn $method(&mut self, $($arg: $ty),*) -> PlaybackResult<$ret> {
                Err(PlaybackError::Unsupported { caller: $caller })
            }
        )*
    };
}

impl<'a> GameServer<'a> {
    pub(crate) fn new(player: &'a mut Player) -> Self {
        Self { player }
    }

    /// Player this interface plays through
    #[must_use]
    pub fn player(&mut self) -> &mut Player {
        &mut *self.player
    }

    /// `SetProduct()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn set_product(&mut self, product: &str) -> PlaybackResult<()> {
        self.player
            .play(GsSetProduct::new(product.to_owned()), "SetProduct", |_| Ok(()))
    }

    /// `SetGameDescription()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn set_game_description(&mut self, description: &str) -> PlaybackResult<()> {
        self.player.play(
            GsSetGameDesc::new(description.to_owned()),
            "SetGameDescription",
            |_| Ok(()),
        )
    }

    /// `SetModDir()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn set_mod_dir(&mut self, mod_dir: &str) -> PlaybackResult<()> {
        self.player
            .play(GsSetModDir::new(mod_dir.to_owned()), "SetModDir", |_| Ok(()))
    }

    /// `SetDedicatedServer()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn set_dedicated_server(&mut self, dedicated: bool) -> PlaybackResult<()> {
        self.player.play(
            GsSetDedicatedServer::new(dedicated),
            "SetDedicatedServer",
            |_| Ok(()),
        )
    }

    /// `LogOnAnonymous()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn log_on_anonymous(&mut self) -> PlaybackResult<()> {
        self.player
            .play(GsLogOnAnonymous::new(), "LogOnAnonymous", |_| Ok(()))
    }

    /// `LogOff()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn log_off(&mut self) -> PlaybackResult<()> {
        self.player.play(GsLogOff::new(), "LogOff", |_| Ok(()))
    }

    /// `BLoggedOn()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn b_logged_on(&mut self) -> PlaybackResult<bool> {
        self.player
            .play(GsBLoggedOn::new(), "BLoggedOn", |rec| Ok(rec.res))
    }

    /// `BSecure()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn b_secure(&mut self) -> PlaybackResult<bool> {
        self.player.play(GsBSecure::new(), "BSecure", |rec| Ok(rec.res))
    }

    /// `GetSteamID()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn get_steam_id(&mut self) -> PlaybackResult<u64> {
        self.player
            .play(GsGetSteamId::new(), "GetSteamID", |rec| Ok(rec.steam_id))
    }

    /// `WasRestartRequested()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn was_restart_requested(&mut self) -> PlaybackResult<bool> {
        self.player.play(
            GsWasRestartRequested::new(),
            "WasRestartRequested",
            |rec| Ok(rec.res),
        )
    }

    /// `SetMaxPlayerCount()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn set_max_player_count(&mut self, max_players: i32) -> PlaybackResult<()> {
        self.player.play(
            GsSetMaxPlayerCount::new(max_players),
            "SetMaxPlayerCount",
            |_| Ok(()),
        )
    }

    /// `SetBotPlayerCount()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn set_bot_player_count(&mut self, bot_players: i32) -> PlaybackResult<()> {
        self.player.play(
            GsSetBotPlayerCount::new(bot_players),
            "SetBotPlayerCount",
            |_| Ok(()),
        )
    }

    /// `SetServerName()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn set_server_name(&mut self, server_name: &str) -> PlaybackResult<()> {
        self.player.play(
            GsSetServerName::new(server_name.to_owned()),
            "SetServerName",
            |_| Ok(()),
        )
    }

    /// `SetMapName()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn set_map_name(&mut self, map_name: &str) -> PlaybackResult<()> {
        self.player
            .play(GsSetMapName::new(map_name.to_owned()), "SetMapName", |_| Ok(()))
    }

    /// `SetPasswordProtected()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn set_password_protected(&mut self, password_protected: bool) -> PlaybackResult<()> {
        self.player.play(
            GsSetPasswordProtected::new(password_protected),
            "SetPasswordProtected",
            |_| Ok(()),
        )
    }

    /// `ClearAllKeyValues()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn clear_all_key_values(&mut self) -> PlaybackResult<()> {
        self.player
            .play(GsClearAllKeyValues::new(), "ClearAllKeyValues", |_| Ok(()))
    }

    /// `SetKeyValue()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn set_key_value(&mut self, key: &str, value: &str) -> PlaybackResult<()> {
        self.player.play(
            GsSetKeyValue::new(key.to_owned(), value.to_owned()),
            "SetKeyValue",
            |_| Ok(()),
        )
    }

    /// `SendUserConnectAndAuthenticate()`; returns the result and the
    /// recorded user id
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn send_user_connect_and_authenticate(
        &mut self,
        client_ip: u32,
        auth_blob: &[u8],
    ) -> PlaybackResult<(bool, u64)> {
        self.player.play(
            GsSendUserConnectAndAuthenticate::new(client_ip, auth_blob.to_vec()),
            "SendUserConnectAndAuthenticate",
            |rec| Ok((rec.res, rec.steam_id)),
        )
    }

    /// `CreateUnauthenticatedUserConnection()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn create_unauthenticated_user_connection(&mut self) -> PlaybackResult<u64> {
        self.player.play(
            GsCreateUnauthUserConnection::new(),
            "CreateUnauthenticatedUserConnection",
            |rec| Ok(rec.steam_id),
        )
    }

    /// `SendUserDisconnect()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn send_user_disconnect(&mut self, steam_id: u64) -> PlaybackResult<()> {
        self.player.play(
            GsSendUserDisconnect::new(steam_id),
            "SendUserDisconnect",
            |_| Ok(()),
        )
    }

    /// `BUpdateUserData()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn b_update_user_data(
        &mut self,
        steam_id: u64,
        player_name: &str,
        score: u32,
    ) -> PlaybackResult<bool> {
        self.player.play(
            GsBUpdateUserData::new(steam_id, player_name.to_owned(), score),
            "BUpdateUserData",
            |rec| Ok(rec.res),
        )
    }

    /// `HandleIncomingPacket()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn handle_incoming_packet(
        &mut self,
        data: &[u8],
        src_ip: u32,
        src_port: u16,
    ) -> PlaybackResult<bool> {
        self.player.play(
            GsHandleIncomingPacket::new(data.to_vec(), src_ip, src_port),
            "HandleIncomingPacket",
            |rec| Ok(rec.res),
        )
    }

    /// `GetNextOutgoingPacket()`: fills `out` with the recorded packet
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next or the
    /// recorded packet does not fit `out`
    pub fn get_next_outgoing_packet(&mut self, out: &mut [u8]) -> PlaybackResult<OutgoingPacket> {
        let expected = GsGetNextOutgoingPacket::new(buffer_len(out));
        self.player
            .play(expected, "GetNextOutgoingPacket", |rec| {
                copy_out("GetNextOutgoingPacket", &rec.buf, out)?;
                Ok(OutgoingPacket {
                    len: rec.res,
                    addr: rec.addr,
                    port: rec.port,
                })
            })
    }

    /// `EnableHeartbeats()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn enable_heartbeats(&mut self, active: bool) -> PlaybackResult<()> {
        self.player
            .play(GsEnableHeartbeats::new(active), "EnableHeartbeats", |_| Ok(()))
    }

    /// `SetHeartbeatInterval()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn set_heartbeat_interval(&mut self, interval: i32) -> PlaybackResult<()> {
        self.player.play(
            GsSetHeartbeatInterval::new(interval),
            "SetHeartbeatInterval",
            |_| Ok(()),
        )
    }

    unsupported! {
        /// `InitGameServer()`
        init_game_server => "InitGameServer"(ip: u32, game_port: u16, query_port: u16, flags: u32, app_id: u32, version: &str) -> bool;
        /// `LogOn()`
        log_on => "LogOn"(token: &str) -> ();
        /// `SetSpectatorPort()`
        set_spectator_port => "SetSpectatorPort"(port: u16) -> ();
        /// `SetSpectatorServerName()`
        set_spectator_server_name => "SetSpectatorServerName"(name: &str) -> ();
        /// `SetGameTags()`
        set_game_tags => "SetGameTags"(tags: &str) -> ();
        /// `SetGameData()`
        set_game_data => "SetGameData"(data: &str) -> ();
        /// `SetRegion()`
        set_region => "SetRegion"(region: &str) -> ();
        /// `GetAuthSessionTicket()`
        get_auth_session_ticket => "GetAuthSessionTicket"(ticket: &mut [u8]) -> (u32, u32);
        /// `BeginAuthSession()`
        begin_auth_session => "BeginAuthSession"(ticket: &[u8], steam_id: u64) -> i32;
        /// `EndAuthSession()`
        end_auth_session => "EndAuthSession"(steam_id: u64) -> ();
        /// `CancelAuthTicket()`
        cancel_auth_ticket => "CancelAuthTicket"(auth_ticket: u32) -> ();
        /// `UserHasLicenseForApp()`
        user_has_license_for_app => "UserHasLicenseForApp"(steam_id: u64, app_id: u32) -> i32;
        /// `RequestUserGroupStatus()`
        request_user_group_status => "RequestUserGroupStatus"(user: u64, group: u64) -> bool;
        /// `GetGameplayStats()`
        get_gameplay_stats => "GetGameplayStats"() -> ();
        /// `GetServerReputation()`
        get_server_reputation => "GetServerReputation"() -> u64;
        /// `GetPublicIP()`
        get_public_ip => "GetPublicIP"() -> u32;
        /// `ForceHeartbeat()`
        force_heartbeat => "ForceHeartbeat"() -> ();
        /// `AssociateWithClan()`
        associate_with_clan => "AssociateWithClan"(clan_id: u64) -> u64;
        /// `ComputeNewPlayerCompatibility()`
        compute_new_player_compatibility => "ComputeNewPlayerCompatibility"(steam_id: u64) -> u64;
    }
}
