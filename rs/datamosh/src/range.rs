use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// A range as configured by the user.
///
/// `end` may be negative, meaning "through the last video frame". It is resolved
/// against the number of key and predicted frames with [`RangeSpec::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSpec {
	pub start: usize,
	pub end: i64,
}

impl RangeSpec {
	pub fn new(start: usize, end: i64) -> Self {
		Self { start, end }
	}

	/// Pair up parallel lists of start and end frames.
	pub fn zip(starts: &[usize], ends: &[i64]) -> Result<Vec<Self>> {
		if starts.len() != ends.len() {
			return Err(ConfigError::RangeCountMismatch {
				starts: starts.len(),
				ends: ends.len(),
			}
			.into());
		}

		Ok(starts.iter().zip(ends).map(|(&start, &end)| Self::new(start, end)).collect())
	}

	/// Returns true if the end is the "through the last frame" sentinel.
	pub fn is_open(&self) -> bool {
		self.end < 0
	}

	/// Check the range without knowing the number of frames.
	///
	/// Open ranges can only be checked once resolved.
	pub fn validate(&self) -> Result<()> {
		match usize::try_from(self.end) {
			Ok(end) if end <= self.start => Err(ConfigError::EmptyRange { start: self.start, end }.into()),
			_ => Ok(()),
		}
	}

	/// Resolve a negative end to `video_frames`, the number of key and predicted frames.
	///
	/// NOTE: The resolved value is used as a bound on the raw frame index, which also
	/// counts frames that are neither. This matches how ranges have always behaved.
	pub fn resolve(&self, video_frames: usize) -> Result<MoshRange> {
		let end = usize::try_from(self.end).unwrap_or(video_frames);
		if end <= self.start {
			return Err(ConfigError::EmptyRange { start: self.start, end }.into());
		}

		Ok(MoshRange { start: self.start, end })
	}
}

/// A resolved, half-open range of frame indexes: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoshRange {
	pub start: usize,
	pub end: usize,
}

impl MoshRange {
	pub fn contains(&self, index: usize) -> bool {
		self.start <= index && index < self.end
	}
}

impl fmt::Display for MoshRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}, {})", self.start, self.end)
	}
}

/// The ranges a transform applies to.
///
/// Ranges may be unsorted and may overlap. There are expected to be only a few,
/// so a query is a linear scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
	ranges: Vec<MoshRange>,
}

impl RangeSet {
	pub fn new(ranges: Vec<MoshRange>) -> Self {
		Self { ranges }
	}

	/// Returns true if any range contains the index.
	pub fn covers(&self, index: usize) -> bool {
		self.ranges.iter().any(|range| range.contains(index))
	}

	pub fn ranges(&self) -> &[MoshRange] {
		&self.ranges
	}

	pub fn is_empty(&self) -> bool {
		self.ranges.is_empty()
	}
}

impl FromIterator<MoshRange> for RangeSet {
	fn from_iter<I: IntoIterator<Item = MoshRange>>(iter: I) -> Self {
		Self::new(iter.into_iter().collect())
	}
}

/// Evenly spaced ranges: `step` frames moshed, then `offset` frames left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangePlan {
	/// The first frame of the first range.
	pub start: usize,

	/// Where the plan stops. `None` means the total number of frames.
	pub end: Option<usize>,

	/// The length of each range.
	pub step: usize,

	/// The gap between ranges.
	pub offset: usize,
}

impl RangePlan {
	/// Lay out ranges over a video with `total_frames` frames.
	///
	/// Only ranges that start a full `step + offset` stride before the end are
	/// produced; a trailing partial stride is skipped.
	pub fn plan(&self, total_frames: usize) -> Result<Vec<RangeSpec>> {
		let end = self.end.unwrap_or(total_frames);
		if end <= self.start {
			return Err(ConfigError::EmptyRange { start: self.start, end }.into());
		}

		let stride = self.step + self.offset;
		if stride == 0 {
			return Err(ConfigError::InvalidStride.into());
		}

		let count = (end - self.start) / stride;
		let ranges = (0..count)
			.map(|i| {
				let start = self.start + i * stride;
				RangeSpec::new(start, (start + self.step) as i64)
			})
			.collect();

		Ok(ranges)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Error;

	#[test]
	fn zip_pairs() {
		let ranges = RangeSpec::zip(&[2, 10], &[5, -1]).unwrap();
		assert_eq!(ranges, vec![RangeSpec::new(2, 5), RangeSpec::new(10, -1)]);
	}

	#[test]
	fn zip_mismatch() {
		let err = RangeSpec::zip(&[2, 10], &[5]).unwrap_err();
		assert!(matches!(
			err,
			Error::InvalidConfiguration(ConfigError::RangeCountMismatch { starts: 2, ends: 1 })
		));
	}

	#[test]
	fn validate_empty_range() {
		assert!(RangeSpec::new(5, 5).validate().is_err());
		assert!(RangeSpec::new(5, 3).validate().is_err());
		assert!(RangeSpec::new(5, 6).validate().is_ok());
		assert!(RangeSpec::new(5, -1).validate().is_ok());
	}

	#[test]
	fn resolve_negative_end() {
		let range = RangeSpec::new(2, -1).resolve(40).unwrap();
		assert_eq!(range, MoshRange { start: 2, end: 40 });
	}

	#[test]
	fn resolve_any_negative_end() {
		let range = RangeSpec::new(0, -7).resolve(12).unwrap();
		assert_eq!(range.end, 12);
	}

	#[test]
	fn resolve_explicit_end() {
		let range = RangeSpec::new(2, 8).resolve(40).unwrap();
		assert_eq!(range, MoshRange { start: 2, end: 8 });
	}

	#[test]
	fn resolve_open_range_past_end() {
		// Starting after the last video frame leaves nothing to mosh.
		let err = RangeSpec::new(50, -1).resolve(10).unwrap_err();
		assert!(matches!(
			err,
			Error::InvalidConfiguration(ConfigError::EmptyRange { start: 50, end: 10 })
		));
	}

	#[test]
	fn range_is_half_open() {
		let range = MoshRange { start: 2, end: 4 };
		assert!(!range.contains(1));
		assert!(range.contains(2));
		assert!(range.contains(3));
		assert!(!range.contains(4));
		assert_eq!(range.to_string(), "[2, 4)");
	}

	#[test]
	fn covers_any_range() {
		let set: RangeSet = [MoshRange { start: 10, end: 12 }, MoshRange { start: 0, end: 3 }]
			.into_iter()
			.collect();

		let covered: Vec<_> = (0..14).filter(|&i| set.covers(i)).collect();
		assert_eq!(covered, vec![0, 1, 2, 10, 11]);
	}

	#[test]
	fn covers_overlapping() {
		let set = RangeSet::new(vec![MoshRange { start: 0, end: 5 }, MoshRange { start: 3, end: 8 }]);
		assert!(set.covers(4));
		assert!(set.covers(7));
		assert!(!set.covers(8));
	}

	#[test]
	fn covers_nothing_when_empty() {
		let set = RangeSet::default();
		assert!(set.is_empty());
		assert!(!set.covers(0));
	}

	#[test]
	fn plan_ranges() {
		let plan = RangePlan {
			start: 2,
			end: None,
			step: 50,
			offset: 10,
		};

		let ranges = plan.plan(200).unwrap();
		assert_eq!(
			ranges,
			vec![
				RangeSpec::new(2, 52),
				RangeSpec::new(62, 112),
				RangeSpec::new(122, 172),
			]
		);
	}

	#[test]
	fn plan_explicit_end() {
		let plan = RangePlan {
			start: 0,
			end: Some(30),
			step: 5,
			offset: 5,
		};

		let ranges = plan.plan(1000).unwrap();
		assert_eq!(ranges.len(), 3);
		assert_eq!(ranges[2], RangeSpec::new(20, 25));
	}

	#[test]
	fn plan_too_short() {
		let plan = RangePlan {
			start: 2,
			end: None,
			step: 50,
			offset: 10,
		};

		// Not enough frames for a full stride.
		assert!(plan.plan(40).unwrap().is_empty());
		assert!(plan.plan(2).is_err());
	}

	#[test]
	fn plan_zero_stride() {
		let plan = RangePlan {
			start: 0,
			end: Some(10),
			step: 0,
			offset: 0,
		};

		let err = plan.plan(10).unwrap_err();
		assert!(matches!(err, Error::InvalidConfiguration(ConfigError::InvalidStride)));
	}
}
