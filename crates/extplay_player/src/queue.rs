//! Call queue and frame reader.

use crate::pool::{SlotHandle, SlotPool};
use extplay_calls::{CallRecord, FrameHeader};
use extplay_core::{PlaybackError, PlaybackResult};
use extplay_trace::TraceStream;
use std::collections::VecDeque;
use tracing::debug;

/// Pending records in trace order
#[derive(Debug, Default)]
pub struct CallQueue {
    pending: VecDeque<SlotHandle>,
    sentinel_emitted: bool,
}

impl CallQueue {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued records
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no records are queued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether the end-of-trace sentinel has been produced
    #[must_use]
    pub fn sentinel_emitted(&self) -> bool {
        self.sentinel_emitted
    }

    /// Materialize the next frame into the queue.
    ///
    /// At end of stream the sentinel is queued exactly once; after that
    /// `Ok(false)` reports that nothing more can be read. A frame carrying
    /// both flags queues two records: the prologue half, then the epilogue
    /// half.
    ///
    /// # Errors
    ///
    /// Returns error on malformed frames or slot exhaustion
    pub fn read_next_frame(
        &mut self,
        stream: &mut TraceStream,
        pool: &mut SlotPool<CallRecord>,
    ) -> PlaybackResult<bool> {
        if stream.is_exhausted() {
            if self.sentinel_emitted {
                return Ok(false);
            }
            self.sentinel_emitted = true;
            let handle = pool.acquire(CallRecord::sentinel())?;
            self.pending.push_back(handle);
            debug!(offset = stream.offset(), "end of trace");
            return Ok(true);
        }

        let offset = stream.offset();
        let header = FrameHeader::read(stream)?;
        debug!(
            offset,
            opcode = %header.opcode,
            start = header.start,
            end = header.end,
            "read frame"
        );

        if header.start {
            let record = CallRecord::read_prologue(header, stream)?;
            self.pending.push_back(pool.acquire(record)?);
        }
        if header.end {
            let record = CallRecord::read_epilogue(header, stream)?;
            self.pending.push_back(pool.acquire(record)?);
        }
        Ok(true)
    }

    /// Front record, reading a frame first if the queue is empty
    ///
    /// # Errors
    ///
    /// Returns `QueueEmpty` if nothing could be read
    pub fn dequeue(
        &mut self,
        peek: bool,
        stream: &mut TraceStream,
        pool: &mut SlotPool<CallRecord>,
    ) -> PlaybackResult<SlotHandle> {
        if self.pending.is_empty() {
            self.read_next_frame(stream, pool)?;
        }
        let front = if peek {
            self.pending.front().copied()
        } else {
            self.pending.pop_front()
        };
        front.ok_or(PlaybackError::QueueEmpty)
    }
}
