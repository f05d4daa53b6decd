//! Callback registry and the collaborator surface it drives.
//!
//! Recorded callback invocations name their target by a small integer id.
//! Ids are handed out in first-seen order, so registering callbacks in the
//! same order as the recorded server reproduces the recorded ids.

use crate::engine::Player;
use extplay_calls::CallbackState;
use extplay_core::{CallbackId, CallbackToken, PlaybackError, PlaybackResult, SyncPhase};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Live callback object the server hands to the callback API
pub trait ExtCallback {
    /// Stable identity of this object
    fn token(&self) -> CallbackToken;

    /// Current registration flags
    fn flags(&self) -> u8;

    /// Current callback index
    fn callback_index(&self) -> i32;

    /// Overwrite registration flags
    fn set_flags(&mut self, flags: u8);

    /// Overwrite callback index
    fn set_callback_index(&mut self, index: i32);

    /// Deliver a callback payload.
    ///
    /// The player is lent back so the callback can make further boundary
    /// calls; those are verified against the trace like any other.
    ///
    /// # Errors
    ///
    /// Returns error if a nested call desynchronizes
    fn run(&mut self, player: &mut Player, data: &[u8]) -> PlaybackResult<()>;

    /// Deliver an asynchronous call result
    ///
    /// # Errors
    ///
    /// Returns error if a nested call desynchronizes
    fn run_call_result(
        &mut self,
        player: &mut Player,
        data: &[u8],
        io_failure: bool,
        api_call: u64,
    ) -> PlaybackResult<()>;

    /// Snapshot of the registration state
    fn state(&self) -> CallbackState {
        CallbackState::new(self.flags(), self.callback_index())
    }

    /// Restore a registration state snapshot
    fn set_state(&mut self, state: CallbackState) {
        self.set_flags(state.flags);
        self.set_callback_index(state.index);
    }
}

/// Shared handle to a live callback
pub type SharedCallback = Rc<RefCell<dyn ExtCallback>>;

/// Callbacks seen during playback, indexed by id
#[derive(Default)]
pub struct CallbackRegistry {
    entries: IndexMap<CallbackToken, SharedCallback>,
}

impl CallbackRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered callbacks
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Id of a known token, assigning the next id to a new one
    pub fn get_or_register(&mut self, token: CallbackToken, callback: &SharedCallback) -> CallbackId {
        let entry = self.entries.entry(token);
        let index = entry.index();
        entry.or_insert_with(|| Rc::clone(callback));
        Self::id_at(index)
    }

    /// Register a callback by the token it reports, returning its id and
    /// current registration state
    ///
    /// # Errors
    ///
    /// Returns `CallbackBusy` if the callback is running further up the stack
    pub fn register(&mut self, callback: &SharedCallback) -> PlaybackResult<(CallbackId, CallbackState)> {
        let (token, state) = {
            let live = callback.try_borrow().map_err(|_| PlaybackError::CallbackBusy {
                id: self.id_of_object(callback),
            })?;
            (live.token(), live.state())
        };
        Ok((self.get_or_register(token, callback), state))
    }

    /// Id previously assigned to a token
    #[must_use]
    pub fn id_of(&self, token: CallbackToken) -> Option<CallbackId> {
        self.entries.get_index_of(&token).map(Self::id_at)
    }

    /// Callback registered under an id
    #[must_use]
    pub fn get(&self, id: CallbackId) -> Option<SharedCallback> {
        let index = usize::try_from(id.as_i32()).ok()?;
        self.entries.get_index(index).map(|(_, cb)| Rc::clone(cb))
    }

    fn id_of_object(&self, callback: &SharedCallback) -> CallbackId {
        let index = self
            .entries
            .values()
            .position(|known| Rc::ptr_eq(known, callback))
            .unwrap_or(self.entries.len());
        Self::id_at(index)
    }

    fn id_at(index: usize) -> CallbackId {
        CallbackId(i32::try_from(index).unwrap_or(i32::MAX))
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

/// Fail unless a live callback state matches the recorded snapshot
///
/// # Errors
///
/// Returns `CallbackDesync` naming the first differing field
pub fn ensure_state(
    id: CallbackId,
    phase: SyncPhase,
    recorded: CallbackState,
    live: CallbackState,
) -> PlaybackResult<()> {
    if recorded.flags != live.flags {
        return Err(PlaybackError::CallbackDesync {
            id,
            phase,
            field: "flags",
            recorded: i64::from(recorded.flags),
            live: i64::from(live.flags),
        });
    }
    if recorded.index != live.index {
        return Err(PlaybackError::CallbackDesync {
            id,
            phase,
            field: "index",
            recorded: i64::from(recorded.index),
            live: i64::from(live.index),
        });
    }
    Ok(())
}
