use bytes::{BufMut, Bytes, BytesMut};

use super::DELIMITER;

/// Reassembles a container from a header and a sequence of frame payloads.
///
/// The header is written exactly once, up front. Each frame is written as the
/// delimiter followed by its payload, in the order the frames are given.
pub struct StreamWriter {
	buf: BytesMut,
	frames: usize,
}

impl StreamWriter {
	pub fn new(header: &[u8]) -> Self {
		Self::with_capacity(header, header.len())
	}

	/// Create a writer, reserving room for `capacity` bytes of output.
	pub fn with_capacity(header: &[u8], capacity: usize) -> Self {
		let mut buf = BytesMut::with_capacity(capacity.max(header.len()));
		buf.put_slice(header);

		Self { buf, frames: 0 }
	}

	pub fn write_frame(&mut self, payload: &[u8]) {
		self.buf.put_slice(&DELIMITER);
		self.buf.put_slice(payload);
		self.frames += 1;
	}

	/// The number of frames written so far.
	pub fn frames(&self) -> usize {
		self.frames
	}

	pub fn finish(self) -> Bytes {
		self.buf.freeze()
	}
}
