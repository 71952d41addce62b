use bytes::Bytes;
use serde::Serialize;

use crate::stream::{FrameStream, StreamWriter};
use crate::{Action, MoshConfig, MoshRange, MoshStats, Mosher, Result};

/// A summary of one mosh pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoshReport {
	/// The number of frames in the input, of any kind.
	pub frames: usize,

	/// The number of key and predicted frames in the input.
	pub video_frames: usize,

	/// The ranges after resolving open ends.
	pub ranges: Vec<MoshRange>,

	#[serde(flatten)]
	pub stats: MoshStats,
}

/// The output of [`process`].
#[derive(Debug, Clone)]
pub struct Moshed {
	pub stream: Bytes,
	pub report: MoshReport,
}

/// Mosh a complete intermediate container.
///
/// The configuration is validated before anything else happens, and nothing is
/// produced unless the whole pass succeeds.
pub fn process(input: Bytes, config: &MoshConfig) -> Result<Moshed> {
	config.validate()?;

	let capacity = input.len();
	let stream = FrameStream::split(input)?;

	let frames = stream.len();
	let video_frames = stream.video_frames();
	let ranges = config.resolve(video_frames)?;

	tracing::info!(
		frames,
		video_frames,
		ranges = ?ranges.ranges(),
		mode = ?config.mode,
		"processing ranges"
	);

	let (header, stream) = stream.into_parts();
	let mut mosher = Mosher::new(config.mode, ranges)?;
	let mut writer = StreamWriter::with_capacity(&header, capacity);

	for frame in stream {
		match mosher.mosh(&frame) {
			Action::Emit => writer.write_frame(&frame.payload),
			Action::Substitute(payload) => writer.write_frame(&payload),
			Action::Drop => {}
		}
	}

	let report = MoshReport {
		frames,
		video_frames,
		ranges: mosher.ranges().ranges().to_vec(),
		stats: mosher.stats(),
	};

	tracing::debug!(written = writer.frames(), ?report, "finished mosh pass");

	Ok(Moshed {
		stream: writer.finish(),
		report,
	})
}
