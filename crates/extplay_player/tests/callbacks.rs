//! Callback registration and replay inside intercepted calls.

mod common;

use common::{
    call_result, delivery, registration, strict, MockCallback, FIRST, GS_CLIENT_APPROVE, REGISTERED,
};
use extplay_calls::{
    CallbackState, Rand, Srand, SteamApiRegisterCallback, SteamApiUnregisterCallback,
};
use extplay_core::{CallbackId, CallbackToken, ErrorKind, PlaybackError, PlayerConfig, SyncPhase};
use extplay_player::Player;
use extplay_test_utils::TraceBuilder;

/// Registration followed by `srand(42)` with one delivery recorded inside it
fn interleaved(data: &[u8]) -> TraceBuilder {
    TraceBuilder::new()
        .call(&registration())
        .prologue(&Srand::new(42))
        .prologue(&delivery(data))
        .epilogue(&delivery(data))
        .epilogue(&Srand::new(42))
}

#[test]
fn test_registration_applies_recorded_state() {
    let trace = TraceBuilder::new().call(&registration());
    let mut player = strict(&trace);
    let (mock, shared) = MockCallback::new(0xB0B).shared();

    player
        .steam_api_register_callback(&shared, GS_CLIENT_APPROVE)
        .unwrap();
    assert_eq!(mock.borrow().state, REGISTERED);
    assert_eq!(player.callbacks().id_of(CallbackToken(0xB0B)), Some(FIRST));
    player.finish().unwrap();
}

#[test]
fn test_callback_replayed_inside_call() {
    let mut player = strict(&interleaved(&[1, 2, 3]));
    let (mock, shared) = MockCallback::new(1).shared();

    player
        .steam_api_register_callback(&shared, GS_CLIENT_APPROVE)
        .unwrap();
    player.srand(42).unwrap();

    assert_eq!(mock.borrow().runs, vec![vec![1, 2, 3]]);
    assert_eq!(player.stats().callbacks_replayed, 1);
    assert_eq!(player.in_flight(), 0);
    player.finish().unwrap();
}

#[test]
fn test_call_result_delivery() {
    let recorded = call_result(&[9], true, 0xDEAD_BEEF);
    let trace = TraceBuilder::new()
        .call(&registration())
        .prologue(&Srand::new(42))
        .prologue(&recorded)
        .epilogue(&recorded)
        .epilogue(&Srand::new(42));
    let mut player = strict(&trace);
    let (mock, shared) = MockCallback::new(1).shared();

    player
        .steam_api_register_callback(&shared, GS_CLIENT_APPROVE)
        .unwrap();
    player.srand(42).unwrap();

    assert_eq!(mock.borrow().call_results, vec![(vec![9], true, 0xDEAD_BEEF)]);
    assert!(mock.borrow().runs.is_empty());
}

#[test]
fn test_nested_call_inside_callback() {
    let mut rand = Rand::new();
    rand.res = 77;
    let trace = TraceBuilder::new()
        .call(&registration())
        .prologue(&Srand::new(42))
        .prologue(&delivery(&[]))
        .call(&rand)
        .epilogue(&delivery(&[]))
        .epilogue(&Srand::new(42));
    let mut player = strict(&trace);

    let mut callback = MockCallback::new(1);
    callback.nested = Some(Box::new(|player: &mut Player| {
        assert_eq!(player.rand()?, 77);
        Ok(())
    }));
    let (mock, shared) = callback.shared();

    player
        .steam_api_register_callback(&shared, GS_CLIENT_APPROVE)
        .unwrap();
    player.srand(42).unwrap();

    assert_eq!(mock.borrow().runs.len(), 1);
    assert_eq!(player.stats().calls_verified, 3);
    player.finish().unwrap();
}

#[test]
fn test_callback_where_prologue_expected() {
    let trace = TraceBuilder::new().prologue(&delivery(&[]));
    let err = strict(&trace).srand(42).unwrap_err();
    assert_eq!(err, PlaybackError::CallbackNotAllowed { caller: "srand" });
    assert_eq!(err.kind(), ErrorKind::Usage);
}

#[test]
fn test_unregistered_callback_id() {
    let trace = TraceBuilder::new()
        .prologue(&Srand::new(42))
        .prologue(&delivery(&[]));
    let err = strict(&trace).srand(42).unwrap_err();
    assert_eq!(err, PlaybackError::CallbackNotFound { id: FIRST });
}

#[test]
fn test_pre_state_desync() {
    let stale = {
        let mut call = delivery(&[]);
        call.in_state = CallbackState::new(1, 999);
        call
    };
    let trace = TraceBuilder::new()
        .call(&registration())
        .prologue(&Srand::new(42))
        .prologue(&stale);
    let mut player = strict(&trace);
    let (mock, shared) = MockCallback::new(1).shared();

    player
        .steam_api_register_callback(&shared, GS_CLIENT_APPROVE)
        .unwrap();
    let err = player.srand(42).unwrap_err();
    assert_eq!(
        err,
        PlaybackError::CallbackDesync {
            id: FIRST,
            phase: SyncPhase::Pre,
            field: "index",
            recorded: 999,
            live: i64::from(GS_CLIENT_APPROVE),
        }
    );
    assert!(mock.borrow().runs.is_empty());
}

#[test]
fn test_post_state_desync() {
    let mut player = strict(&interleaved(&[]));
    let mut callback = MockCallback::new(1);
    callback.after_run = Some(CallbackState::new(2, GS_CLIENT_APPROVE));
    let (_mock, shared) = callback.shared();

    player
        .steam_api_register_callback(&shared, GS_CLIENT_APPROVE)
        .unwrap();
    let err = player.srand(42).unwrap_err();
    assert_eq!(
        err,
        PlaybackError::CallbackDesync {
            id: FIRST,
            phase: SyncPhase::Post,
            field: "flags",
            recorded: 1,
            live: 2,
        }
    );
}

#[test]
fn test_callback_busy_during_its_own_delivery() {
    let unregister = {
        let mut call = SteamApiUnregisterCallback::new(FIRST, REGISTERED);
        call.out_state = CallbackState::default();
        call
    };
    let trace = interleaved(&[]).call(&unregister);
    let mut player = strict(&trace);

    let (mock, shared) = MockCallback::new(1).shared();
    let this = shared.clone();
    mock.borrow_mut().nested = Some(Box::new(move |player: &mut Player| {
        player.steam_api_unregister_callback(&this)
    }));

    player
        .steam_api_register_callback(&shared, GS_CLIENT_APPROVE)
        .unwrap();
    assert_eq!(
        player.srand(42).unwrap_err(),
        PlaybackError::CallbackBusy { id: FIRST }
    );
}

#[test]
fn test_unregister_restores_recorded_state() {
    let unregister = {
        let mut call = SteamApiUnregisterCallback::new(FIRST, REGISTERED);
        call.out_state = CallbackState::default();
        call
    };
    let trace = TraceBuilder::new().call(&registration()).call(&unregister);
    let mut player = strict(&trace);
    let (mock, shared) = MockCallback::new(1).shared();

    player
        .steam_api_register_callback(&shared, GS_CLIENT_APPROVE)
        .unwrap();
    player.steam_api_unregister_callback(&shared).unwrap();
    assert_eq!(mock.borrow().state, CallbackState::default());
    assert_eq!(player.callbacks().len(), 1);
    player.finish().unwrap();
}

#[test]
fn test_ids_follow_registration_order() {
    let mut second = SteamApiRegisterCallback::new(CallbackId(1), 202, CallbackState::default());
    second.out_state = CallbackState::new(1, 202);
    let trace = TraceBuilder::new().call(&registration()).call(&second);
    let mut player = strict(&trace);

    let (_a, first_cb) = MockCallback::new(10).shared();
    let (_b, second_cb) = MockCallback::new(20).shared();
    player
        .steam_api_register_callback(&first_cb, GS_CLIENT_APPROVE)
        .unwrap();
    player.steam_api_register_callback(&second_cb, 202).unwrap();

    assert_eq!(player.callbacks().id_of(CallbackToken(10)), Some(CallbackId(0)));
    assert_eq!(player.callbacks().id_of(CallbackToken(20)), Some(CallbackId(1)));
}

#[test]
fn test_slot_exhaustion() {
    let config = PlayerConfig::new().with_slot_capacity(2);
    let mut player = Player::from_bytes(interleaved(&[]).build(), config).unwrap();
    let (_mock, shared) = MockCallback::new(1).shared();

    player
        .steam_api_register_callback(&shared, GS_CLIENT_APPROVE)
        .unwrap();
    assert_eq!(
        player.srand(42).unwrap_err(),
        PlaybackError::SlotsExhausted { capacity: 2 }
    );
}
