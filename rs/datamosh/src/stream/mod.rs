//! The intermediate container as a sequence of delimited frames.
//!
//! The container interleaves video frames as chunks that each start with the
//! same 4 byte marker. Everything before the first marker is an opaque header.
//! [`FrameStream`] splits a buffer along those markers, [`FrameKind`] labels each
//! frame from a signature at a fixed offset, and [`StreamWriter`] puts the
//! (possibly rewritten) frames back together.

mod frame;
mod kind;
mod split;
mod writer;

pub use frame::*;
pub use kind::*;
pub use split::*;
pub use writer::*;

/// The marker that precedes every frame payload: `00dc`, a compressed video chunk.
pub const DELIMITER: [u8; 4] = [0x30, 0x30, 0x64, 0x63];
