//! The external tools a mosh job depends on.
//!
//! Moshing only works on a container with a known layout, and the result is only
//! watchable after another encode. Both steps, plus probing the source, are done
//! by an external transcoder. The core stays independent of any particular tool;
//! callers (such as `datamosh-cli`) provide a [`Transcoder`] that runs one.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use crate::{Error, Result};

/// A boxed future returned by [`Transcoder`] methods.
pub type TranscodeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// The external transcoder used by [`crate::DataMosher`].
pub trait Transcoder: Send + Sync {
	/// Re-encode `source` into the intermediate container at `target`.
	///
	/// The output must have a constant frame rate of `fps`, no B-frames, and be
	/// losslessly encoded, so every video frame is a key or predicted frame.
	fn to_intermediate<'a>(&'a self, source: &'a Path, target: &'a Path, fps: u32) -> TranscodeFuture<'a, ()>;

	/// Encode the moshed container at `source` into a deliverable video at `target`.
	fn to_final<'a>(&'a self, source: &'a Path, target: &'a Path, fps: u32) -> TranscodeFuture<'a, ()>;

	/// Return the average frame rate of the first video stream.
	fn probe_frame_rate<'a>(&'a self, source: &'a Path) -> TranscodeFuture<'a, f64>;

	/// Return the total number of frames in the first video stream.
	fn count_frames<'a>(&'a self, source: &'a Path) -> TranscodeFuture<'a, usize>;
}

/// Parse a frame rate in `num/den` form, ex. `30000/1001`.
///
/// A zero denominator yields `0.0` rather than an error, since that's how probes
/// report an unknown rate. A bare number is accepted as `num/1`.
pub fn parse_frame_rate(value: &str) -> Result<f64> {
	let value = value.trim();
	let (num, den) = value.split_once('/').unwrap_or((value, "1"));

	let num: i64 = num
		.trim()
		.parse()
		.map_err(|_| Error::Probe(format!("invalid frame rate numerator: {value:?}")))?;
	let den: i64 = den
		.trim()
		.parse()
		.map_err(|_| Error::Probe(format!("invalid frame rate denominator: {value:?}")))?;

	if den == 0 {
		return Ok(0.0);
	}

	Ok(num as f64 / den as f64)
}
