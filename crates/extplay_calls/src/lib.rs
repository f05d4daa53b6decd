//! EXTPLAY Call Object Model
//!
//! A closed family of recorded calls, one variant per intercepted
//! operation, each able to decode its own prologue and epilogue and to
//! compare live arguments against a recorded prologue.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod call;
pub mod frame;
pub mod record;
pub mod types;

pub use call::*;
pub use frame::FrameHeader;
pub use record::CallRecord;
pub use types::{CallbackState, FileTime, HostEntry, SystemTime, TimeZoneInfo, Tm};
