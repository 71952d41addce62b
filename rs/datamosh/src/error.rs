use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, thiserror::Error, Clone)]
pub enum Error {
	#[error("malformed stream: frame delimiter not found")]
	MalformedStream,

	#[error("invalid configuration: {0}")]
	InvalidConfiguration(#[from] ConfigError),

	#[error("source video not found: {}", .0.display())]
	SourceNotFound(PathBuf),

	#[error("transcode failed: {0}")]
	Transcode(String),

	#[error("probe failed: {0}")]
	Probe(String),

	#[error("io error: {0}")]
	Io(Arc<std::io::Error>),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Error::Io(Arc::new(err))
	}
}

/// A configuration that is rejected before any transform work begins.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
	#[error("{starts} start frames but {ends} end frames")]
	RangeCountMismatch { starts: usize, ends: usize },

	#[error("range end {end} must be greater than start {start}")]
	EmptyRange { start: usize, end: usize },

	#[error("repeat count must be positive, got {0}")]
	InvalidRepeat(usize),

	#[error("step plus offset must be positive")]
	InvalidStride,
}

pub type Result<T> = std::result::Result<T, Error>;
