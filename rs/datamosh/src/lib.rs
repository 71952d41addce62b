//! # datamosh: frame-level video corruption
//!
//! `datamosh` rewrites an intermediate video container at the byte level so that
//! a decoder applies motion information to the wrong frames, producing smear and
//! melt artifacts. No video data is decoded or re-encoded here: frames are only
//! dropped, passed through, or have their payload replaced with an older one.
//!
//! ## Overview
//!
//! - **Stream**: Split a container into a header and frames, classify each frame,
//!   and write the result back out. See [`stream`].
//! - **Ranges**: The frame intervals a transform applies to. See [`RangeSet`].
//! - **Engine**: Key-frame removal and delta-frame repeat. See [`Mosher`].
//! - **Process**: Raw bytes in, moshed bytes out. See [`process`].
//! - **Pipeline**: A full job including the external transcode steps,
//!   which are provided by a [`Transcoder`] implementation.
//!
//! The intermediate container is expected to be produced with a constant frame
//! rate, no B-frames, and lossless settings, so every video frame is either a
//! key frame or a predicted frame. This is assumed, not validated.
mod config;
mod engine;
mod error;
mod pipeline;
mod process;
mod range;
mod transcode;

pub mod stream;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use pipeline::*;
pub use process::*;
pub use range::*;
pub use transcode::*;
