use bytes::Bytes;
use derive_more::Debug;

use super::FrameKind;

/// A single frame chunk from the intermediate container.
///
/// Frames are produced by [`super::FrameStream::split`] and never reordered:
/// a transform can only drop a frame, pass it through, or write different
/// payload bytes in its place.
#[derive(Clone, Debug)]
pub struct Frame {
	/// The position of this frame in split order, starting at zero.
	pub index: usize,

	/// The classification, computed once when the frame is created.
	pub kind: FrameKind,

	/// The bytes between this frame's delimiter and the next one.
	///
	/// This is a view into the original buffer, so cloning is cheap.
	#[debug("{} bytes", payload.len())]
	pub payload: Bytes,
}

impl Frame {
	pub fn new(index: usize, payload: Bytes) -> Self {
		Self {
			index,
			kind: FrameKind::classify(&payload),
			payload,
		}
	}
}
