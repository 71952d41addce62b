use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::{Error, MoshConfig, MoshReport, Result, Transcoder, process};

/// The file name of the intermediate container, created in the work directory.
pub const INTERMEDIATE_FILE: &str = "datamoshing_input.avi";

/// A single video to mosh.
#[derive(Debug, Clone)]
pub struct MoshJob {
	/// The video to mosh, in any format the transcoder understands.
	pub source: PathBuf,

	/// Where the moshed video is written.
	pub output_dir: PathBuf,

	/// The base name of the output, ex. `clip` produces `clip_moshed.mp4`.
	pub name: String,

	/// The frame rate of the intermediate and final videos.
	pub fps: u32,

	pub config: MoshConfig,
}

impl MoshJob {
	/// The moshed container, before the final encode.
	pub fn moshed_path(&self) -> PathBuf {
		self.output_dir.join(format!("{}_moshed.avi", self.name))
	}

	/// The final, watchable video.
	pub fn output_path(&self) -> PathBuf {
		self.output_dir.join(format!("{}_moshed.mp4", self.name))
	}
}

/// The result of a successful [`DataMosher::run`].
#[derive(Debug, Clone)]
pub struct MoshOutput {
	/// The final video.
	pub path: PathBuf,
	pub report: MoshReport,
}

/// Runs mosh jobs, using a [`Transcoder`] for everything but the mosh itself.
pub struct DataMosher<T: Transcoder> {
	transcoder: T,
	work_dir: PathBuf,
}

impl<T: Transcoder> DataMosher<T> {
	/// Intermediate files are created in `work_dir` and removed when the job ends.
	pub fn new(transcoder: T, work_dir: impl Into<PathBuf>) -> Self {
		Self {
			transcoder,
			work_dir: work_dir.into(),
		}
	}

	pub fn transcoder(&self) -> &T {
		&self.transcoder
	}

	pub fn intermediate_path(&self) -> PathBuf {
		self.work_dir.join(INTERMEDIATE_FILE)
	}

	/// Transcode, mosh, and re-encode a video.
	///
	/// Any failure aborts the job: nothing is retried and no partial output is kept.
	#[tracing::instrument("mosh", skip_all, fields(source = %job.source.display(), name = %job.name))]
	pub async fn run(&self, job: &MoshJob) -> Result<MoshOutput> {
		job.config.validate()?;

		if !tokio::fs::try_exists(&job.source).await? {
			return Err(Error::SourceNotFound(job.source.clone()));
		}

		tokio::fs::create_dir_all(&job.output_dir).await?;

		let intermediate = self.intermediate_path();
		let res = self.run_with(job, &intermediate).await;
		remove_file(&intermediate).await;

		res
	}

	async fn run_with(&self, job: &MoshJob, intermediate: &Path) -> Result<MoshOutput> {
		tracing::debug!(path = %intermediate.display(), fps = job.fps, "transcoding to intermediate");
		self.transcoder.to_intermediate(&job.source, intermediate, job.fps).await?;

		let input = Bytes::from(tokio::fs::read(intermediate).await?);
		let moshed = process(input, &job.config)?;

		let moshed_path = job.moshed_path();
		tokio::fs::write(&moshed_path, &moshed.stream).await?;

		let path = job.output_path();
		tracing::debug!(path = %path.display(), "transcoding to final");
		let res = self.transcoder.to_final(&moshed_path, &path, job.fps).await;
		remove_file(&moshed_path).await;
		res?;

		tracing::info!(path = %path.display(), "final video saved");

		Ok(MoshOutput {
			path,
			report: moshed.report,
		})
	}
}

async fn remove_file(path: &Path) {
	match tokio::fs::remove_file(path).await {
		Ok(()) => {}
		Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
		Err(err) => tracing::warn!(%err, path = %path.display(), "failed to remove temporary file"),
	}
}
