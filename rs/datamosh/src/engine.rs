use std::num::NonZeroUsize;

use bytes::Bytes;
use serde::Serialize;

use crate::stream::{Frame, FrameKind};
use crate::{ConfigError, Mode, RangeSet, Result};

/// What to do with a single frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
	/// Write the frame unchanged.
	Emit,

	/// Write these bytes in place of the frame's payload.
	Substitute(Bytes),

	/// Don't write the frame at all.
	Drop,
}

/// A fixed-capacity loop of predicted frame payloads.
///
/// The buffer fills up once and is then only read from, cycling through the
/// recorded payloads in order.
#[derive(Debug, Clone)]
pub struct RepeatBuffer {
	frames: Vec<Bytes>,
	capacity: NonZeroUsize,
	cursor: usize,
}

impl RepeatBuffer {
	pub fn new(capacity: NonZeroUsize) -> Self {
		Self {
			frames: Vec::with_capacity(capacity.get()),
			capacity,
			cursor: 0,
		}
	}

	pub fn is_full(&self) -> bool {
		self.frames.len() == self.capacity.get()
	}

	pub fn len(&self) -> usize {
		self.frames.len()
	}

	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// The index of the next payload [`Self::replay`] returns.
	pub fn cursor(&self) -> usize {
		self.cursor
	}

	/// Record a payload. Returns false (and drops it) once the buffer is full.
	pub fn record(&mut self, payload: Bytes) -> bool {
		if self.is_full() {
			return false;
		}

		self.frames.push(payload);
		true
	}

	/// Return the payload at the cursor and advance it, wrapping around.
	///
	/// Returns `None` until the buffer is full.
	pub fn replay(&mut self) -> Option<Bytes> {
		if !self.is_full() {
			return None;
		}

		let payload = self.frames[self.cursor].clone();
		self.cursor = (self.cursor + 1) % self.capacity.get();
		Some(payload)
	}
}

/// Counters for a single mosh pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MoshStats {
	/// Frames written with their own payload.
	pub emitted: usize,

	/// Frames written with a replayed payload.
	pub substituted: usize,

	/// Frames not written.
	pub dropped: usize,

	/// Predicted frames recorded into the repeat buffer.
	pub buffered: usize,
}

enum Engine {
	KeyFrameRemoval,
	DeltaRepeat(RepeatBuffer),
}

/// Decides, frame by frame, how the output stream differs from the input.
///
/// A `Mosher` is created for one pass over one stream. Its state, including the
/// repeat buffer, carries over from one range to the next and is never reset.
pub struct Mosher {
	ranges: RangeSet,
	engine: Engine,
	stats: MoshStats,
}

impl Mosher {
	pub fn new(mode: Mode, ranges: RangeSet) -> Result<Self> {
		let engine = match mode {
			Mode::KeyFrameRemoval => Engine::KeyFrameRemoval,
			Mode::DeltaRepeat { n_repeat } => {
				let capacity = NonZeroUsize::new(n_repeat).ok_or(ConfigError::InvalidRepeat(n_repeat))?;
				Engine::DeltaRepeat(RepeatBuffer::new(capacity))
			}
		};

		Ok(Self {
			ranges,
			engine,
			stats: MoshStats::default(),
		})
	}

	/// Decide what to do with the next frame.
	///
	/// Frames must be passed in split order, each exactly once.
	pub fn mosh(&mut self, frame: &Frame) -> Action {
		let covered = self.ranges.covers(frame.index);

		let action = match &mut self.engine {
			Engine::KeyFrameRemoval => match frame.kind {
				FrameKind::Key if covered => Action::Drop,
				_ => Action::Emit,
			},
			Engine::DeltaRepeat(repeat) => {
				if !covered || frame.kind == FrameKind::Other {
					Action::Emit
				} else if !repeat.is_full() && frame.kind == FrameKind::Predicted {
					repeat.record(frame.payload.clone());
					self.stats.buffered += 1;
					Action::Emit
				} else if let Some(payload) = repeat.replay() {
					Action::Substitute(payload)
				} else {
					// A key frame before the buffer filled up.
					Action::Emit
				}
			}
		};

		match &action {
			Action::Emit => self.stats.emitted += 1,
			Action::Substitute(_) => self.stats.substituted += 1,
			Action::Drop => self.stats.dropped += 1,
		}

		tracing::trace!(index = frame.index, kind = ?frame.kind, covered, ?action, "moshed frame");

		action
	}

	pub fn ranges(&self) -> &RangeSet {
		&self.ranges
	}

	/// The repeat buffer, if running in delta repeat mode.
	pub fn repeat_buffer(&self) -> Option<&RepeatBuffer> {
		match &self.engine {
			Engine::DeltaRepeat(repeat) => Some(repeat),
			Engine::KeyFrameRemoval => None,
		}
	}

	pub fn stats(&self) -> MoshStats {
		self.stats
	}
}
