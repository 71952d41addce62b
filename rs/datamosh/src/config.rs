use serde::{Deserialize, Serialize};

use crate::{ConfigError, RangeSet, RangeSpec, Result};

/// The transform to apply within the configured ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum Mode {
	/// Drop key frames, so predicted frames keep applying motion to stale content.
	KeyFrameRemoval,

	/// Record the first `n_repeat` predicted frames, then replay them in a loop
	/// in place of every later key or predicted frame.
	DeltaRepeat { n_repeat: usize },
}

impl Mode {
	pub fn validate(&self) -> Result<()> {
		match *self {
			Self::DeltaRepeat { n_repeat: 0 } => Err(ConfigError::InvalidRepeat(0).into()),
			_ => Ok(()),
		}
	}
}

/// Everything the core needs to mosh a stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoshConfig {
	pub ranges: Vec<RangeSpec>,
	#[serde(flatten)]
	pub mode: Mode,
}

impl MoshConfig {
	pub fn new(ranges: Vec<RangeSpec>, mode: Mode) -> Self {
		Self { ranges, mode }
	}

	/// Build a config from parallel lists of start and end frames.
	pub fn from_frames(starts: &[usize], ends: &[i64], mode: Mode) -> Result<Self> {
		let config = Self::new(RangeSpec::zip(starts, ends)?, mode);
		config.validate()?;
		Ok(config)
	}

	/// Check everything that can be checked without looking at the stream.
	pub fn validate(&self) -> Result<()> {
		self.mode.validate()?;

		for range in &self.ranges {
			range.validate()?;
		}

		Ok(())
	}

	/// Resolve open ranges against the number of key and predicted frames.
	pub fn resolve(&self, video_frames: usize) -> Result<RangeSet> {
		self.ranges.iter().map(|range| range.resolve(video_frames)).collect()
	}
}
