mod ffmpeg;
mod log;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser};
use datamosh::{DataMosher, Mode, MoshConfig, MoshJob, RangePlan, RangeSpec, Transcoder};
use ffmpeg::{Ffmpeg, FfmpegConfig};
use log::Log;

/// Used when no start frames are given and no plan is requested.
const DEFAULT_START_FRAMES: [usize; 1] = [2];

/// Used when no end frames are given: through the last video frame.
const DEFAULT_END_FRAMES: [i64; 1] = [-1];

/// Datamosh a video by removing key frames or repeating predicted frames.
#[derive(Parser, Clone, Debug)]
#[command(version)]
pub struct Cli {
	#[command(flatten)]
	log: Log,

	#[command(flatten)]
	ffmpeg: FfmpegConfig,

	/// The video to mosh.
	#[arg(long, env = "DATAMOSH_VIDEO")]
	video: PathBuf,

	/// The first frame of each range to mosh [default: 2]
	#[arg(long, num_args = 1.., value_delimiter = ',')]
	start_frames: Vec<usize>,

	/// The end of each range, exclusive. A negative value means the last video frame [default: -1]
	#[arg(long, num_args = 1.., value_delimiter = ',', allow_negative_numbers = true)]
	end_frames: Vec<i64>,

	/// The frame rate the video is converted to.
	#[arg(short, long, env = "DATAMOSH_FPS", default_value_t = 30)]
	fps: u32,

	/// The base name of the output [default: <video>_<fps>]
	#[arg(long)]
	save_path: Option<String>,

	/// The number of predicted frames to repeat. Zero removes key frames instead.
	#[arg(short, long, env = "DATAMOSH_DELTA", default_value_t = 0)]
	delta: usize,

	#[command(flatten)]
	plan: PlanArgs,

	/// Where the moshed video is written.
	#[arg(long, env = "DATAMOSH_OUTPUT_DIR", default_value = "results")]
	output_dir: PathBuf,

	/// Where intermediate files are written. They're removed when done.
	#[arg(long, env = "DATAMOSH_WORK_DIR", default_value = ".")]
	work_dir: PathBuf,

	/// Print a JSON report to stdout when done.
	#[arg(long)]
	json: bool,
}

/// Evenly spaced ranges, used instead of explicit start and end frames.
#[derive(Args, Clone, Debug)]
pub struct PlanArgs {
	/// Mosh ranges of this many frames, spaced across the whole video.
	#[arg(long, conflicts_with_all = ["start_frames", "end_frames"])]
	step: Option<usize>,

	/// The number of untouched frames between planned ranges.
	#[arg(long, default_value_t = 0, requires = "step")]
	offset: usize,

	/// The first frame of the first planned range.
	#[arg(long, default_value_t = 2, requires = "step")]
	plan_start: usize,

	/// Where planned ranges stop [default: the last frame]
	#[arg(long, requires = "step")]
	plan_end: Option<usize>,
}

impl Cli {
	fn mode(&self) -> Mode {
		match self.delta {
			0 => Mode::KeyFrameRemoval,
			n_repeat => Mode::DeltaRepeat { n_repeat },
		}
	}

	fn name(&self) -> String {
		if let Some(name) = &self.save_path {
			return name.clone();
		}

		let stem = self
			.video
			.file_stem()
			.map(|stem| stem.to_string_lossy().into_owned())
			.unwrap_or_else(|| "video".to_string());

		match self.plan.step {
			Some(step) => format!("{stem}_{}_{step}_{}", self.fps, self.plan.offset),
			None => format!("{stem}_{}", self.fps),
		}
	}

	async fn ranges<T: Transcoder>(&self, transcoder: &T) -> anyhow::Result<Vec<RangeSpec>> {
		if let Some(step) = self.plan.step {
			let total = transcoder
				.count_frames(&self.video)
				.await
				.context("failed to count frames")?;

			let plan = RangePlan {
				start: self.plan.plan_start,
				end: self.plan.plan_end,
				step,
				offset: self.plan.offset,
			};

			tracing::info!(step, offset = plan.offset, total, "planning ranges");
			return Ok(plan.plan(total)?);
		}

		let starts = match self.start_frames.is_empty() {
			true => &DEFAULT_START_FRAMES[..],
			false => &self.start_frames[..],
		};
		let ends = match self.end_frames.is_empty() {
			true => &DEFAULT_END_FRAMES[..],
			false => &self.end_frames[..],
		};

		Ok(RangeSpec::zip(starts, ends)?)
	}
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	cli.log.init();

	let transcoder = Ffmpeg::new(cli.ffmpeg.clone());

	match transcoder.probe_frame_rate(&cli.video).await {
		Ok(fps) => tracing::info!(fps, "video frame rate"),
		Err(err) => tracing::warn!(%err, "failed to probe frame rate"),
	}

	let ranges = cli.ranges(&transcoder).await?;
	let config = MoshConfig::new(ranges, cli.mode());
	config.validate().context("invalid mosh configuration")?;

	let job = MoshJob {
		source: cli.video.clone(),
		output_dir: cli.output_dir.clone(),
		name: cli.name(),
		fps: cli.fps,
		config,
	};

	let mosher = DataMosher::new(transcoder, &cli.work_dir);
	let output = mosher
		.run(&job)
		.await
		.with_context(|| format!("failed to mosh {}", job.source.display()))?;

	tracing::info!(
		path = %output.path.display(),
		frames = output.report.video_frames,
		"total frames"
	);

	if cli.json {
		println!("{}", serde_json::to_string_pretty(&output.report)?);
	}

	Ok(())
}
