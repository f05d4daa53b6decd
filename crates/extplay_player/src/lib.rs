//! EXTPLAY Player
//!
//! Replays a recorded trace of boundary calls against a live caller. Every
//! call site expects the next record to be its own prologue, compares the
//! live arguments in strict mode, replays any callbacks recorded while the
//! call was in progress, and hands back the recorded results.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod callback;
pub mod engine;
pub mod pool;
pub mod queue;

// Re-exports
pub use api::{GameServer, OutgoingPacket, ProcessTimes, SteamApps};
pub use callback::{CallbackRegistry, ExtCallback, SharedCallback};
pub use engine::{Player, PlayerStats};
pub use pool::{SlotHandle, SlotPool};
pub use queue::CallQueue;
