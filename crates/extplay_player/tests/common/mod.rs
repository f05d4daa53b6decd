//! Shared fixtures for player integration tests.

#![allow(dead_code)]

use extplay_calls::{CallbackState, SteamApiRegisterCallback, SteamCallback1, SteamCallback2};
use extplay_core::{CallbackId, CallbackToken, PlaybackResult, PlayerConfig};
use extplay_player::{ExtCallback, Player, SharedCallback};
use extplay_test_utils::TraceBuilder;
use std::cell::RefCell;
use std::rc::Rc;

/// Callback id recorded for the first registered callback
pub const FIRST: CallbackId = CallbackId(0);

/// `i_callback` used by the fixtures
pub const GS_CLIENT_APPROVE: i32 = 201;

/// State a freshly registered fixture callback is left in
pub const REGISTERED: CallbackState = CallbackState::new(1, GS_CLIENT_APPROVE);

type Nested = Box<dyn FnMut(&mut Player) -> PlaybackResult<()>>;

/// Callback double that records every delivery
pub struct MockCallback {
    pub token: u64,
    pub state: CallbackState,
    /// State forced after every delivery
    pub after_run: Option<CallbackState>,
    /// Boundary calls made from inside a delivery
    pub nested: Option<Nested>,
    pub runs: Vec<Vec<u8>>,
    pub call_results: Vec<(Vec<u8>, bool, u64)>,
}

impl MockCallback {
    pub fn new(token: u64) -> Self {
        Self {
            token,
            state: CallbackState::default(),
            after_run: None,
            nested: None,
            runs: Vec::new(),
            call_results: Vec::new(),
        }
    }

    pub fn shared(self) -> (Rc<RefCell<MockCallback>>, SharedCallback) {
        let mock = Rc::new(RefCell::new(self));
        let shared: SharedCallback = mock.clone();
        (mock, shared)
    }

    fn delivered(&mut self, player: &mut Player) -> PlaybackResult<()> {
        if let Some(nested) = self.nested.as_mut() {
            nested(player)?;
        }
        if let Some(state) = self.after_run {
            self.state = state;
        }
        Ok(())
    }
}

impl ExtCallback for MockCallback {
    fn token(&self) -> CallbackToken {
        CallbackToken(self.token)
    }

    fn flags(&self) -> u8 {
        self.state.flags
    }

    fn callback_index(&self) -> i32 {
        self.state.index
    }

    fn set_flags(&mut self, flags: u8) {
        self.state.flags = flags;
    }

    fn set_callback_index(&mut self, index: i32) {
        self.state.index = index;
    }

    fn run(&mut self, player: &mut Player, data: &[u8]) -> PlaybackResult<()> {
        self.runs.push(data.to_vec());
        self.delivered(player)
    }

    fn run_call_result(
        &mut self,
        player: &mut Player,
        data: &[u8],
        io_failure: bool,
        api_call: u64,
    ) -> PlaybackResult<()> {
        self.call_results.push((data.to_vec(), io_failure, api_call));
        self.delivered(player)
    }
}

/// Recorded registration of the first callback
pub fn registration() -> SteamApiRegisterCallback {
    let mut call = SteamApiRegisterCallback::new(FIRST, GS_CLIENT_APPROVE, CallbackState::default());
    call.out_state = REGISTERED;
    call
}

/// Recorded delivery to the first callback that leaves its state alone
pub fn delivery(data: &[u8]) -> SteamCallback1 {
    let mut call = SteamCallback1::new(FIRST, REGISTERED, data.to_vec());
    call.out_state = REGISTERED;
    call
}

/// Recorded call-result delivery to the first callback
pub fn call_result(data: &[u8], io_failure: bool, api_call: u64) -> SteamCallback2 {
    let mut call = SteamCallback2::new(FIRST, REGISTERED, data.to_vec(), io_failure, api_call);
    call.out_state = REGISTERED;
    call
}

pub fn strict(builder: &TraceBuilder) -> Player {
    Player::from_bytes(builder.build(), PlayerConfig::new()).unwrap()
}

pub fn relaxed(builder: &TraceBuilder) -> Player {
    Player::from_bytes(builder.build(), PlayerConfig::relaxed()).unwrap()
}
