use bytes::Bytes;

use super::{DELIMITER, Frame};
use crate::{Error, Result};

/// An intermediate container split into a header and frames.
#[derive(Clone, Debug)]
pub struct FrameStream {
	header: Bytes,
	frames: Vec<Frame>,
}

impl FrameStream {
	/// Split the buffer on every occurrence of [`DELIMITER`].
	///
	/// The header is everything before the first delimiter. Each frame is the data
	/// between two delimiters, and the last frame runs to the end of the buffer.
	///
	/// The delimiter is matched anywhere, including inside frame data. A payload
	/// that happens to contain the marker is split into two frames; that is how the
	/// technique behaves and it's left alone.
	pub fn split(buf: Bytes) -> Result<Self> {
		let first = find_delimiter(&buf).ok_or(Error::MalformedStream)?;
		let header = buf.slice(..first);

		let mut frames = Vec::new();
		let mut start = first + DELIMITER.len();

		loop {
			let end = match find_delimiter(&buf[start..]) {
				Some(size) => start + size,
				None => buf.len(),
			};

			frames.push(Frame::new(frames.len(), buf.slice(start..end)));

			if end == buf.len() {
				break;
			}

			start = end + DELIMITER.len();
		}

		Ok(Self { header, frames })
	}

	/// The bytes before the first delimiter.
	pub fn header(&self) -> &Bytes {
		&self.header
	}

	pub fn frames(&self) -> &[Frame] {
		&self.frames
	}

	/// The number of frames in split order, regardless of their kind.
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// The number of frames classified as key or predicted frames.
	///
	/// This is a different index space than [`Self::len`]; frames of kind
	/// [`super::FrameKind::Other`] are not counted.
	pub fn video_frames(&self) -> usize {
		self.frames.iter().filter(|frame| frame.kind.is_video()).count()
	}

	pub fn into_parts(self) -> (Bytes, Vec<Frame>) {
		(self.header, self.frames)
	}
}

// Return the offset of the first delimiter in the buffer.
fn find_delimiter(b: &[u8]) -> Option<usize> {
	// Compare the window, then skip ahead based on its last byte.
	// The delimiter is `0 0 d c`, so:
	// - `d` could be the third byte of a match starting at the next offset.
	// - `0` could be the second byte of a match starting two bytes later.
	// - anything else (including `c`) can't be part of a match, so skip the window.
	let mut pos = 0;

	while pos + DELIMITER.len() <= b.len() {
		let window = &b[pos..pos + DELIMITER.len()];
		if window == DELIMITER {
			return Some(pos);
		}

		pos += match window[3] {
			0x64 => 1,
			0x30 => 2,
			_ => 4,
		};
	}

	None
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::stream::FrameKind;

	fn buffer(parts: &[&[u8]]) -> Bytes {
		let mut buf = Vec::new();
		for (i, part) in parts.iter().enumerate() {
			if i > 0 {
				buf.extend_from_slice(&DELIMITER);
			}
			buf.extend_from_slice(part);
		}
		Bytes::from(buf)
	}

	#[test]
	fn test_find_delimiter_start() {
		assert_eq!(find_delimiter(b"00dcxyz"), Some(0));
	}

	#[test]
	fn test_find_delimiter_after_data() {
		assert_eq!(find_delimiter(b"RIFF....00dc"), Some(8));
	}

	#[test]
	fn test_find_delimiter_none() {
		assert_eq!(find_delimiter(b"00d"), None);
		assert_eq!(find_delimiter(b"01wb00db"), None);
	}

	#[test]
	fn test_find_delimiter_shifted_by_one() {
		// The window `x00d` ends in `d`, the match starts one byte later.
		assert_eq!(find_delimiter(b"x00dc"), Some(1));
	}

	#[test]
	fn test_find_delimiter_leading_zeros() {
		assert_eq!(find_delimiter(b"000dc"), Some(1));
		assert_eq!(find_delimiter(b"0000dc"), Some(2));
		assert_eq!(find_delimiter(b"00000dc"), Some(3));
	}

	#[test]
	fn test_find_delimiter_ignores_other_chunks() {
		// Audio chunks use `01wb` and must not match.
		assert_eq!(find_delimiter(b"01wbaaaa00dcbbbb"), Some(8));
	}

	#[test]
	fn test_split_header_and_frames() {
		let stream = FrameStream::split(buffer(&[b"HEADER", b"one", b"two", b"three"])).unwrap();

		assert_eq!(stream.header().as_ref(), b"HEADER");
		assert_eq!(stream.len(), 3);

		let payloads: Vec<_> = stream.frames().iter().map(|f| f.payload.as_ref()).collect();
		assert_eq!(payloads, vec![&b"one"[..], &b"two"[..], &b"three"[..]]);

		let indexes: Vec<_> = stream.frames().iter().map(|f| f.index).collect();
		assert_eq!(indexes, vec![0, 1, 2]);
	}

	#[test]
	fn test_split_empty_header() {
		let stream = FrameStream::split(buffer(&[b"", b"frame"])).unwrap();
		assert!(stream.header().is_empty());
		assert_eq!(stream.len(), 1);
	}

	#[test]
	fn test_split_trailing_delimiter() {
		// A trailing delimiter produces an empty final frame.
		let stream = FrameStream::split(Bytes::from_static(b"H00dcabc00dc")).unwrap();
		assert_eq!(stream.len(), 2);
		assert_eq!(stream.frames()[0].payload.as_ref(), b"abc");
		assert!(stream.frames()[1].payload.is_empty());
	}

	#[test]
	fn test_split_consecutive_delimiters() {
		let stream = FrameStream::split(Bytes::from_static(b"H00dc00dcabc")).unwrap();
		assert_eq!(stream.len(), 2);
		assert!(stream.frames()[0].payload.is_empty());
		assert_eq!(stream.frames()[0].kind, FrameKind::Other);
		assert_eq!(stream.frames()[1].payload.as_ref(), b"abc");
	}

	#[test]
	fn test_split_delimiter_inside_payload() {
		// A payload that contains the marker is split in two.
		let stream = FrameStream::split(Bytes::from_static(b"H00dcfoo00dcbar")).unwrap();
		assert_eq!(stream.len(), 2);
		assert_eq!(stream.frames()[0].payload.as_ref(), b"foo");
		assert_eq!(stream.frames()[1].payload.as_ref(), b"bar");
	}

	#[test]
	fn test_split_malformed() {
		let err = FrameStream::split(Bytes::from_static(b"RIFF no frames here")).unwrap_err();
		assert!(matches!(err, Error::MalformedStream));

		let err = FrameStream::split(Bytes::new()).unwrap_err();
		assert!(matches!(err, Error::MalformedStream));
	}

	#[test]
	fn test_split_classifies_frames() {
		let key = [0, 0, 0, 0, 0, 0x00, 0x01, 0xB0, 9];
		let predicted = [0, 0, 0, 0, 0, 0x00, 0x01, 0xB6, 9];
		let stream = FrameStream::split(buffer(&[b"H", &key, &predicted, b"junk", &predicted])).unwrap();

		let kinds: Vec<_> = stream.frames().iter().map(|f| f.kind).collect();
		assert_eq!(
			kinds,
			vec![FrameKind::Key, FrameKind::Predicted, FrameKind::Other, FrameKind::Predicted]
		);
		assert_eq!(stream.len(), 4);
		assert_eq!(stream.video_frames(), 3);
	}
}
