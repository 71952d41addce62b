use serde::{Deserialize, Serialize};

/// Where the codec signature starts within a frame payload.
pub const SIGNATURE_OFFSET: usize = 5;

/// The length of the codec signature.
pub const SIGNATURE_LEN: usize = 3;

/// The signature of a self-contained key frame.
pub const KEY_FRAME_SIGNATURE: [u8; SIGNATURE_LEN] = [0x00, 0x01, 0xB0];

/// The signature of a frame predicted from an earlier one.
pub const PREDICTED_FRAME_SIGNATURE: [u8; SIGNATURE_LEN] = [0x00, 0x01, 0xB6];

/// The kind of a frame, as far as moshing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
	/// Can be decoded on its own.
	Key,

	/// Reconstructed from a previous frame using motion prediction.
	Predicted,

	/// Anything else, including payloads too short to hold a signature.
	Other,
}

impl FrameKind {
	/// Classify a payload by the signature at a fixed offset.
	///
	/// This is not a bitstream parser: the payload's own length field is ignored
	/// and only bytes `[5, 8)` are inspected. It works because the intermediate
	/// container is re-encoded so that each frame starts with one of two headers.
	/// Short or unrecognized payloads are [`FrameKind::Other`], never an error.
	pub fn classify(payload: &[u8]) -> Self {
		match payload.get(SIGNATURE_OFFSET..SIGNATURE_OFFSET + SIGNATURE_LEN) {
			Some(signature) if signature == KEY_FRAME_SIGNATURE => Self::Key,
			Some(signature) if signature == PREDICTED_FRAME_SIGNATURE => Self::Predicted,
			_ => Self::Other,
		}
	}

	/// Returns true for key and predicted frames.
	pub fn is_video(self) -> bool {
		matches!(self, Self::Key | Self::Predicted)
	}
}
