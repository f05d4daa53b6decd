//! Steam API bootstrap and the game server interface.

mod common;

use common::strict;
use extplay_calls::{
    GsBLoggedOn, GsGetNextOutgoingPacket, GsGetSteamId, GsLogOnAnonymous, GsSetKeyValue,
    GsSetProduct, SteamApiInit, SteamApiRunCallbacks, SteamApiSetBreakpadAppId, SteamApps,
    SteamGameServer, SteamGameServerInit, SteamGameServerShutdown,
};
use extplay_core::{ErrorKind, Opcode, PlaybackError};
use extplay_test_utils::TraceBuilder;

fn server_init() -> SteamGameServerInit {
    let mut call = SteamGameServerInit::new(0, 26900, 27015, 27015, 3, "1.1.2.7".into());
    call.res = true;
    call
}

fn interface(return_null: bool) -> SteamGameServer {
    let mut call = SteamGameServer::new();
    call.return_null = return_null;
    call
}

#[test]
fn test_game_server_session() {
    let mut init = SteamApiInit::new();
    init.res = true;
    let mut logged_on = GsBLoggedOn::new();
    logged_on.res = true;
    let mut steam_id = GsGetSteamId::new();
    steam_id.steam_id = 90_071_992_547_409_920;
    let mut packet = GsGetNextOutgoingPacket::new(16);
    packet.res = 4;
    packet.buf = vec![0xFF, 0xFF, 0xFF, 0xFF];
    packet.addr = 0x0A00_0001;
    packet.port = 27010;

    let trace = TraceBuilder::new()
        .call(&SteamApiSetBreakpadAppId::new(10))
        .call(&init)
        .call(&server_init())
        .call(&interface(false))
        .call(&GsSetProduct::new("valve".into()))
        .call(&GsSetKeyValue::new("protocol".into(), "48".into()))
        .call(&GsLogOnAnonymous::new())
        .call(&SteamApiRunCallbacks::new())
        .call(&logged_on)
        .call(&steam_id)
        .call(&packet)
        .call(&SteamGameServerShutdown::new());
    let mut player = strict(&trace);

    player.steam_api_set_breakpad_app_id(10).unwrap();
    player.steam_api_use_breakpad_crash_handler("1.0", "Oct 19 2026", "10:00:00", false);
    assert!(player.steam_api_init().unwrap());
    assert!(player
        .steam_game_server_init(0, 26900, 27015, 27015, 3, "1.1.2.7")
        .unwrap());
    assert!(player.game_server().is_none());

    {
        let mut gs = player.steam_game_server().unwrap().unwrap();
        gs.set_product("valve").unwrap();
        gs.set_key_value("protocol", "48").unwrap();
        gs.log_on_anonymous().unwrap();
        gs.player().steam_api_run_callbacks().unwrap();
    }

    let mut gs = player.game_server().unwrap();
    assert!(gs.b_logged_on().unwrap());
    assert_eq!(gs.get_steam_id().unwrap(), 90_071_992_547_409_920);

    let mut out = [0u8; 16];
    let sent = gs.get_next_outgoing_packet(&mut out).unwrap();
    assert_eq!(sent.len, 4);
    assert_eq!(sent.addr, 0x0A00_0001);
    assert_eq!(sent.port, 27010);
    assert_eq!(&out[..4], &[0xFF; 4]);

    player.steam_game_server_shutdown().unwrap();
    player.finish().unwrap();
}

#[test]
fn test_null_interface() {
    let trace = TraceBuilder::new().call(&interface(true));
    let mut player = strict(&trace);
    assert!(player.steam_game_server().unwrap().is_none());
    assert!(player.game_server().is_none());
    player.finish().unwrap();
}

#[test]
fn test_unrecorded_member_is_unsupported() {
    let trace = TraceBuilder::new().call(&interface(false));
    let mut player = strict(&trace);
    let mut gs = player.steam_game_server().unwrap().unwrap();

    let err = gs.log_on("token").unwrap_err();
    assert_eq!(err, PlaybackError::Unsupported { caller: "LogOn" });
    assert_eq!(err.kind(), ErrorKind::Unsupported);
    assert!(gs.force_heartbeat().is_err());
    player.finish().unwrap();
}

#[test]
fn test_apps_interface_is_unsupported() {
    let trace = TraceBuilder::new().call(&SteamApps::new());
    let mut player = strict(&trace);

    let mut apps = player.steam_apps().unwrap().unwrap();
    assert_eq!(
        apps.b_is_vac_banned().unwrap_err(),
        PlaybackError::Unsupported { caller: "BIsVACBanned" }
    );
    assert!(player.apps().is_some());
    player.finish().unwrap();
}

#[test]
fn test_game_server_arguments_are_compared() {
    let trace = TraceBuilder::new()
        .call(&interface(false))
        .call(&GsSetProduct::new("valve".into()));
    let mut player = strict(&trace);
    let mut gs = player.steam_game_server().unwrap().unwrap();

    let err = gs.set_product("cstrike").unwrap_err();
    assert!(matches!(
        err,
        PlaybackError::ArgumentMismatch {
            opcode: Opcode::GsSetProduct,
            field: "product",
            ..
        }
    ));
}

#[test]
fn test_register_call_result_is_unsupported() {
    let mut player = strict(&TraceBuilder::new());
    let (_mock, shared) = common::MockCallback::new(1).shared();
    assert_eq!(
        player.steam_api_register_call_result(&shared, 7).unwrap_err(),
        PlaybackError::Unsupported {
            caller: "SteamAPI_RegisterCallResult"
        }
    );
    player.finish().unwrap();
}
