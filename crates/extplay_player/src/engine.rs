//! Playback engine: the expect/verify state machine.

use crate::api::steam::Interfaces;
use crate::callback::{ensure_state, CallbackRegistry};
use crate::pool::{SlotHandle, SlotPool};
use crate::queue::CallQueue;
use extplay_calls::{CallKind, CallRecord, ExtCall};
use extplay_core::{
    Direction, Opcode, PlaybackError, PlaybackResult, PlayerConfig, SyncPhase,
};
use extplay_trace::{TraceHeader, TraceSource, TraceStream};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, trace};

/// Counters describing playback progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlayerStats {
    /// Records taken off the queue
    pub records_read: u64,
    /// Callback invocations replayed
    pub callbacks_replayed: u64,
    /// Calls matched prologue to epilogue
    pub calls_verified: u64,
}

/// Plays one trace back against a live caller
#[derive(Debug)]
pub struct Player {
    config: PlayerConfig,
    stream: TraceStream,
    pool: SlotPool<CallRecord>,
    queue: CallQueue,
    pub(crate) callbacks: CallbackRegistry,
    pub(crate) interfaces: Interfaces,
    stats: PlayerStats,
}

/// Payload handed to a callback during replay
enum Invocation {
    Run(Vec<u8>),
    CallResult {
        data: Vec<u8>,
        io_failure: bool,
        api_call: u64,
    },
}

impl Player {
    /// Create a player over an opened trace
    ///
    /// # Errors
    ///
    /// Returns error if the config is invalid
    pub fn new(stream: TraceStream, config: PlayerConfig) -> PlaybackResult<Self> {
        config.validate()?;
        Ok(Self {
            pool: SlotPool::with_capacity(config.slot_capacity),
            queue: CallQueue::new(),
            callbacks: CallbackRegistry::new(),
            interfaces: Interfaces::default(),
            stats: PlayerStats::default(),
            config,
            stream,
        })
    }

    /// Open a trace file
    ///
    /// # Errors
    ///
    /// Returns error if the config is invalid, the file cannot be read, or
    /// its header is rejected
    pub fn open(path: impl AsRef<Path>, config: PlayerConfig) -> PlaybackResult<Self> {
        let stream = TraceStream::open(path, &config)?;
        Self::new(stream, config)
    }

    /// Play a trace held in memory
    ///
    /// # Errors
    ///
    /// Returns error if the config is invalid or the header is rejected
    pub fn from_bytes(bytes: Vec<u8>, config: PlayerConfig) -> PlaybackResult<Self> {
        let stream = TraceStream::from_bytes(bytes, &config)?;
        Self::new(stream, config)
    }

    /// Play a trace from any seekable source
    ///
    /// # Errors
    ///
    /// Returns error if the config is invalid or the header is rejected
    pub fn from_source<S: TraceSource + 'static>(
        source: S,
        config: PlayerConfig,
    ) -> PlaybackResult<Self> {
        let stream = TraceStream::from_source(source, &config)?;
        Self::new(stream, config)
    }

    /// Trace header
    #[must_use]
    pub fn header(&self) -> &TraceHeader {
        self.stream.header()
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Whether live arguments are compared against recorded ones
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.config.strict_checks
    }

    /// Progress counters
    #[must_use]
    pub fn stats(&self) -> PlayerStats {
        self.stats
    }

    /// Records currently holding a slot
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.pool.occupied()
    }

    /// Current read offset into the trace
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.stream.offset()
    }

    /// Callback registry
    #[must_use]
    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }

    /// Borrow a queued or in-flight record
    #[must_use]
    pub fn record(&self, handle: SlotHandle) -> Option<&CallRecord> {
        self.pool.get(handle)
    }

    /// Return a record's slot to the pool
    ///
    /// # Errors
    ///
    /// Returns `InvalidSlot` for a stale or foreign handle
    pub fn release(&mut self, handle: SlotHandle) -> PlaybackResult<CallRecord> {
        self.pool.release(handle)
    }

    /// Next record in the trace without any expectation.
    ///
    /// Yields the end-of-trace sentinel exactly once; asking again after
    /// consuming it is `QueueEmpty`.
    ///
    /// # Errors
    ///
    /// Returns error on malformed frames or an exhausted queue
    pub fn next_call(&mut self, peek: bool) -> PlaybackResult<SlotHandle> {
        self.dequeue(peek)
    }

    /// Consume the end-of-trace sentinel, proving every record was played
    ///
    /// # Errors
    ///
    /// Returns `TraceNotExhausted` if records remain
    pub fn finish(&mut self) -> PlaybackResult<()> {
        let handle = self.dequeue(false)?;
        let record = self.pool.release(handle)?;
        if record.is_sentinel() {
            debug!(stats = ?self.stats, "trace fully played");
            Ok(())
        } else {
            Err(PlaybackError::TraceNotExhausted {
                next: record.opcode(),
            })
        }
    }

    /// Fetch the next record and check it is `want` of `expected`.
    ///
    /// Callback invocations found first are replayed in place when
    /// `allow_callbacks` is set. With `peek` the front record is returned
    /// as is and left queued.
    ///
    /// # Errors
    ///
    /// Returns a desync error if the record is not the expected half of the
    /// expected operation
    pub fn expect(
        &mut self,
        peek: bool,
        allow_callbacks: bool,
        expected: Opcode,
        want: Direction,
        caller: &'static str,
    ) -> PlaybackResult<SlotHandle> {
        let remaining = self.stream.remaining();
        let mut handle = self.dequeue(peek)?;
        if peek {
            return Ok(handle);
        }

        loop {
            let record = self.record_ref(handle)?;
            if record.is_sentinel() {
                return Err(PlaybackError::UnexpectedEndOfTrace { caller });
            }
            if !record.is_callback_start() {
                break;
            }
            if !allow_callbacks {
                return Err(PlaybackError::CallbackNotAllowed { caller });
            }
            self.replay_callback(handle)?;
            handle = self.dequeue(false)?;
        }

        let record = self.record_ref(handle)?;
        let actual = record.opcode();
        if actual != expected {
            return Err(PlaybackError::OpcodeMismatch {
                caller,
                expected,
                actual,
                remaining,
            });
        }
        if !record.has(want) {
            return Err(PlaybackError::MissingFlag {
                caller,
                opcode: actual,
                flag: want,
            });
        }
        trace!(caller, opcode = %actual, direction = %want, "expectation met");
        Ok(handle)
    }

    /// Run one full two-phase exchange for a call kind.
    ///
    /// `expected` carries the live arguments; they are compared against the
    /// recorded prologue only in strict mode. `extract` reads results out of
    /// the recorded epilogue before both slots are released.
    pub(crate) fn play<C: CallKind, T>(
        &mut self,
        expected: C,
        caller: &'static str,
        extract: impl FnOnce(&C) -> PlaybackResult<T>,
    ) -> PlaybackResult<T> {
        let start = self.expect(false, false, C::OPCODE, Direction::Start, caller)?;
        if self.config.strict_checks {
            let recorded = self.typed::<C>(start, caller)?;
            expected.ensure_args_equal(recorded, caller)?;
        }

        let end = self.expect(false, true, C::OPCODE, Direction::End, caller)?;
        let out = extract(self.typed::<C>(end, caller)?)?;

        self.pool.release(start)?;
        self.pool.release(end)?;
        self.stats.calls_verified += 1;
        Ok(out)
    }

    /// Replay a drained callback invocation in full
    fn replay_callback(&mut self, handle: SlotHandle) -> PlaybackResult<()> {
        let record = self.record_ref(handle)?;
        let opcode = record.opcode();
        let caller = opcode.name();
        let (id, in_state, invocation) = match &record.call {
            ExtCall::SteamCallback1(cb) => (
                cb.callback_id,
                cb.in_state,
                Invocation::Run(cb.data.clone()),
            ),
            ExtCall::SteamCallback2(cb) => (
                cb.callback_id,
                cb.in_state,
                Invocation::CallResult {
                    data: cb.data.clone(),
                    io_failure: cb.io_failure,
                    api_call: cb.api_call,
                },
            ),
            other => {
                return Err(PlaybackError::RecordKindMismatch {
                    caller,
                    expected: Opcode::SteamCallback1,
                    actual: other.opcode(),
                });
            }
        };

        let callback = self
            .callbacks
            .get(id)
            .ok_or(PlaybackError::CallbackNotFound { id })?;
        let mut live = callback
            .try_borrow_mut()
            .map_err(|_| PlaybackError::CallbackBusy { id })?;
        ensure_state(id, SyncPhase::Pre, in_state, live.state())?;

        debug!(callback = %id, opcode = %opcode, "replaying callback");
        match invocation {
            Invocation::Run(data) => live.run(self, &data)?,
            Invocation::CallResult {
                data,
                io_failure,
                api_call,
            } => live.run_call_result(self, &data, io_failure, api_call)?,
        }

        let end = self.expect(false, false, opcode, Direction::End, caller)?;
        let end_record = self.record_ref(end)?;
        let (_, _, out_state) =
            end_record
                .call
                .callback_states()
                .ok_or(PlaybackError::RecordKindMismatch {
                    caller,
                    expected: opcode,
                    actual: end_record.opcode(),
                })?;
        ensure_state(id, SyncPhase::Post, out_state, live.state())?;

        self.pool.release(handle)?;
        self.pool.release(end)?;
        self.stats.callbacks_replayed += 1;
        Ok(())
    }

    fn dequeue(&mut self, peek: bool) -> PlaybackResult<SlotHandle> {
        let handle = self.queue.dequeue(peek, &mut self.stream, &mut self.pool)?;
        if !peek {
            self.stats.records_read += 1;
        }
        Ok(handle)
    }

    fn record_ref(&self, handle: SlotHandle) -> PlaybackResult<&CallRecord> {
        self.pool.get(handle).ok_or(PlaybackError::InvalidSlot {
            index: handle.index(),
            generation: handle.generation(),
        })
    }

    fn typed<C: CallKind>(&self, handle: SlotHandle, caller: &'static str) -> PlaybackResult<&C> {
        let record = self.record_ref(handle)?;
        C::from_call(&record.call).ok_or(PlaybackError::RecordKindMismatch {
            caller,
            expected: C::OPCODE,
            actual: record.opcode(),
        })
    }
}
