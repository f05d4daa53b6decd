//! EXTPLAY Trace Stream
//!
//! Checked sequential access to a recorded trace: header validation on
//! open, little-endian primitive reads, and the `Wire` codec every recorded
//! value is built from. Any short read is a format error.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod encoding;
pub mod stream;

pub use encoding::{Wire, WireArray};
pub use stream::{TraceHeader, TraceSource, TraceStream};
