use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use clap::Args;
use datamosh::{Error, TranscodeFuture, Transcoder, parse_frame_rate};
use tokio::process::Command;

#[derive(Args, Clone, Debug)]
pub struct FfmpegConfig {
	/// The ffmpeg binary used for both encodes.
	#[arg(long, env = "DATAMOSH_FFMPEG", default_value = "ffmpeg")]
	pub ffmpeg: PathBuf,

	/// The ffprobe binary used to inspect the source video.
	#[arg(long, env = "DATAMOSH_FFPROBE", default_value = "ffprobe")]
	pub ffprobe: PathBuf,

	/// The video bitrate of both encodes.
	#[arg(long, env = "DATAMOSH_BITRATE", default_value = "10000k")]
	pub bitrate: String,
}

/// A [`Transcoder`] that shells out to ffmpeg and ffprobe.
pub struct Ffmpeg {
	config: FfmpegConfig,
}

impl Ffmpeg {
	pub fn new(config: FfmpegConfig) -> Self {
		Self { config }
	}

	// Lossless, no B-frames, constant frame rate: every frame ends up a key or predicted frame.
	fn intermediate_args(&self, source: &Path, target: &Path, fps: u32) -> Vec<OsString> {
		let mut args = self.input_args(source);
		args.extend(
			["-crf", "0", "-pix_fmt", "yuv420p", "-bf", "0", "-b:v", self.config.bitrate.as_str()]
				.into_iter()
				.map(OsString::from),
		);
		args.extend(output_args(target, fps));
		args
	}

	fn final_args(&self, source: &Path, target: &Path, fps: u32) -> Vec<OsString> {
		let mut args = self.input_args(source);
		args.extend(
			[
				"-crf",
				"18",
				"-pix_fmt",
				"yuv420p",
				"-vcodec",
				"libx264",
				"-acodec",
				"aac",
				"-b:v",
				self.config.bitrate.as_str(),
			]
			.into_iter()
			.map(OsString::from),
		);
		args.extend(output_args(target, fps));
		args
	}

	fn input_args(&self, source: &Path) -> Vec<OsString> {
		let mut args: Vec<OsString> = ["-loglevel", "error", "-y", "-i"].into_iter().map(OsString::from).collect();
		args.push(source.as_os_str().to_owned());
		args
	}

	fn probe_args(source: &Path, entries: &str, extra: &[&str]) -> Vec<OsString> {
		let mut args: Vec<OsString> = ["-v", "error", "-select_streams", "v:0"]
			.into_iter()
			.chain(extra.iter().copied())
			.chain(["-show_entries", entries, "-of", "csv=p=0"])
			.map(OsString::from)
			.collect();
		args.push(source.as_os_str().to_owned());
		args
	}
}

fn output_args(target: &Path, fps: u32) -> [OsString; 3] {
	[
		OsString::from("-r"),
		OsString::from(fps.to_string()),
		target.as_os_str().to_owned(),
	]
}

impl Transcoder for Ffmpeg {
	fn to_intermediate<'a>(&'a self, source: &'a Path, target: &'a Path, fps: u32) -> TranscodeFuture<'a, ()> {
		let args = self.intermediate_args(source, target, fps);

		Box::pin(async move {
			run(&self.config.ffmpeg, args).await.map_err(Error::Transcode)?;
			Ok(())
		})
	}

	fn to_final<'a>(&'a self, source: &'a Path, target: &'a Path, fps: u32) -> TranscodeFuture<'a, ()> {
		let args = self.final_args(source, target, fps);

		Box::pin(async move {
			run(&self.config.ffmpeg, args).await.map_err(Error::Transcode)?;
			Ok(())
		})
	}

	fn probe_frame_rate<'a>(&'a self, source: &'a Path) -> TranscodeFuture<'a, f64> {
		let args = Self::probe_args(source, "stream=avg_frame_rate", &[]);

		Box::pin(async move {
			let stdout = run(&self.config.ffprobe, args).await.map_err(Error::Probe)?;
			parse_frame_rate(&stdout)
		})
	}

	fn count_frames<'a>(&'a self, source: &'a Path) -> TranscodeFuture<'a, usize> {
		let args = Self::probe_args(source, "stream=nb_read_packets", &["-count_packets"]);

		Box::pin(async move {
			let stdout = run(&self.config.ffprobe, args).await.map_err(Error::Probe)?;
			parse_count(&stdout)
		})
	}
}

// Run the program to completion, returning stdout or a description of the failure.
async fn run(program: &Path, args: Vec<OsString>) -> Result<String, String> {
	tracing::debug!(program = %program.display(), ?args, "running");

	let output = Command::new(program)
		.args(&args)
		.stdin(Stdio::null())
		.output()
		.await
		.map_err(|err| format!("failed to run {}: {err}", program.display()))?;

	if !output.status.success() {
		let stderr = String::from_utf8_lossy(&output.stderr);
		return Err(format!("{} {}: {}", program.display(), output.status, stderr.trim()));
	}

	Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn parse_count(stdout: &str) -> datamosh::Result<usize> {
	let value = stdout.trim().trim_end_matches(',');
	value
		.parse()
		.map_err(|_| Error::Probe(format!("invalid frame count: {value:?}")))
}
