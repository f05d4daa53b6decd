//! Steam API entry points and callback registration.

use super::apps::SteamApps;
use super::game_server::GameServer;
use crate::callback::SharedCallback;
use crate::engine::Player;
use extplay_calls::{
    CallbackState, SteamApiInit, SteamApiRegisterCallback, SteamApiRunCallbacks,
    SteamApiSetBreakpadAppId, SteamApiUnregisterCallResult, SteamApiUnregisterCallback,
    SteamGameServer, SteamGameServerInit, SteamGameServerRunCallbacks, SteamGameServerShutdown,
};
use extplay_core::{CallbackId, PlaybackError, PlaybackResult};
use tracing::debug;

/// Interfaces the trace has handed out so far
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Interfaces {
    pub(crate) game_server: bool,
    pub(crate) apps: bool,
}

/// Write recorded post-call registration state back into the live callback
fn apply_state(callback: &SharedCallback, id: CallbackId, state: CallbackState) -> PlaybackResult<()> {
    callback
        .try_borrow_mut()
        .map_err(|_| PlaybackError::CallbackBusy { id })?
        .set_state(state);
    Ok(())
}

impl Player {
    /// `SteamAPI_SetBreakpadAppID()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn steam_api_set_breakpad_app_id(&mut self, app_id: u32) -> PlaybackResult<()> {
        self.play(
            SteamApiSetBreakpadAppId::new(app_id),
            "SteamAPI_SetBreakpadAppID",
            |_| Ok(()),
        )
    }

    /// `SteamAPI_UseBreakpadCrashHandler()`: never recorded, accepted and ignored
    pub fn steam_api_use_breakpad_crash_handler(
        &mut self,
        version: &str,
        date: &str,
        time: &str,
        full_memory_dumps: bool,
    ) {
        debug!(version, date, time, full_memory_dumps, "ignoring crash handler setup");
    }

    /// `SteamAPI_RegisterCallback()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next or the
    /// callback's registration state differs from the recording
    pub fn steam_api_register_callback(
        &mut self,
        callback: &SharedCallback,
        i_callback: i32,
    ) -> PlaybackResult<()> {
        let (id, state) = self.callbacks.register(callback)?;
        let out = self.play(
            SteamApiRegisterCallback::new(id, i_callback, state),
            "SteamAPI_RegisterCallback",
            |rec| Ok(rec.out_state),
        )?;
        apply_state(callback, id, out)
    }

    /// `SteamAPI_UnregisterCallback()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next or the
    /// callback's registration state differs from the recording
    pub fn steam_api_unregister_callback(&mut self, callback: &SharedCallback) -> PlaybackResult<()> {
        let (id, state) = self.callbacks.register(callback)?;
        let out = self.play(
            SteamApiUnregisterCallback::new(id, state),
            "SteamAPI_UnregisterCallback",
            |rec| Ok(rec.out_state),
        )?;
        apply_state(callback, id, out)
    }

    /// `SteamAPI_RegisterCallResult()`: the recorder has no opcode for it
    ///
    /// # Errors
    ///
    /// Always returns `Unsupported`
    pub fn steam_api_register_call_result(
        &mut self,
        _callback: &SharedCallback,
        _api_call: u64,
    ) -> PlaybackResult<()> {
        Err(PlaybackError::Unsupported {
            caller: "SteamAPI_RegisterCallResult",
        })
    }

    /// `SteamAPI_UnregisterCallResult()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next or the
    /// callback's registration state differs from the recording
    pub fn steam_api_unregister_call_result(
        &mut self,
        callback: &SharedCallback,
        api_call: u64,
    ) -> PlaybackResult<()> {
        let (id, state) = self.callbacks.register(callback)?;
        let out = self.play(
            SteamApiUnregisterCallResult::new(id, api_call, state),
            "SteamAPI_UnregisterCallResult",
            |rec| Ok(rec.out_state),
        )?;
        apply_state(callback, id, out)
    }

    /// `SteamAPI_Init()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn steam_api_init(&mut self) -> PlaybackResult<bool> {
        self.play(SteamApiInit::new(), "SteamAPI_Init", |rec| Ok(rec.res))
    }

    /// `SteamAPI_RunCallbacks()`; recorded callbacks are replayed inside it
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn steam_api_run_callbacks(&mut self) -> PlaybackResult<()> {
        self.play(SteamApiRunCallbacks::new(), "SteamAPI_RunCallbacks", |_| Ok(()))
    }

    /// `SteamApps()`; `None` if the recorded server got no interface
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn steam_apps(&mut self) -> PlaybackResult<Option<SteamApps<'_>>> {
        let return_null = self.play(extplay_calls::SteamApps::new(), "SteamApps", |rec| {
            Ok(rec.return_null)
        })?;
        if return_null {
            return Ok(None);
        }
        self.interfaces.apps = true;
        Ok(Some(SteamApps::new(self)))
    }

    /// Apps interface handed out earlier, without consuming a record
    #[must_use]
    pub fn apps(&mut self) -> Option<SteamApps<'_>> {
        if self.interfaces.apps {
            Some(SteamApps::new(self))
        } else {
            None
        }
    }

    /// `SteamGameServer_Init()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    #[allow(clippy::too_many_arguments)]
    pub fn steam_game_server_init(
        &mut self,
        ip: u32,
        steam_port: u16,
        game_port: u16,
        query_port: u16,
        server_mode: i32,
        version: &str,
    ) -> PlaybackResult<bool> {
        let expected = SteamGameServerInit::new(
            ip,
            steam_port,
            game_port,
            query_port,
            server_mode,
            version.to_owned(),
        );
        self.play(expected, "SteamGameServer_Init", |rec| Ok(rec.res))
    }

    /// `SteamGameServer()`; `None` if the recorded server got no interface
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn steam_game_server(&mut self) -> PlaybackResult<Option<GameServer<'_>>> {
        let return_null = self.play(SteamGameServer::new(), "SteamGameServer", |rec| {
            Ok(rec.return_null)
        })?;
        if return_null {
            return Ok(None);
        }
        self.interfaces.game_server = true;
        Ok(Some(GameServer::new(self)))
    }

    /// Game server interface handed out earlier, without consuming a record
    #[must_use]
    pub fn game_server(&mut self) -> Option<GameServer<'_>> {
        if self.interfaces.game_server {
            Some(GameServer::new(self))
        } else {
            None
        }
    }

    /// `SteamGameServer_RunCallbacks()`; recorded callbacks are replayed inside it
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn steam_game_server_run_callbacks(&mut self) -> PlaybackResult<()> {
        self.play(
            SteamGameServerRunCallbacks::new(),
            "SteamGameServer_RunCallbacks",
            |_| Ok(()),
        )
    }

    /// `SteamGameServer_Shutdown()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn steam_game_server_shutdown(&mut self) -> PlaybackResult<()> {
        self.play(
            SteamGameServerShutdown::new(),
            "SteamGameServer_Shutdown",
            |_| Ok(()),
        )
    }
}
