//! EXTPLAY Core Types
//!
//! Shared vocabulary of the trace player: the error taxonomy, the protocol
//! version the player accepts, the opcode table, and player configuration.
//! This crate performs no I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod id;
pub mod opcode;
pub mod version;

// Re-exports
pub use config::PlayerConfig;
pub use error::{ErrorKind, PlaybackError, PlaybackResult, SyncPhase};
pub use id::{CallbackId, CallbackToken};
pub use opcode::{Direction, Opcode};
pub use version::ProtocolVersion;
