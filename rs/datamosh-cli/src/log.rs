use clap::{ArgAction, Args};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Logging flags shared by every command.
///
/// `RUST_LOG` takes precedence over the flags when set.
#[derive(Args, Clone, Debug, Default)]
pub struct Log {
	/// Log more; repeat for even more (-v debug, -vv trace).
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,

	/// Only log errors.
	#[arg(short, long, global = true, conflicts_with = "verbose")]
	quiet: bool,
}

impl Log {
	pub fn level(&self) -> LevelFilter {
		if self.quiet {
			return LevelFilter::ERROR;
		}

		match self.verbose {
			0 => LevelFilter::INFO,
			1 => LevelFilter::DEBUG,
			_ => LevelFilter::TRACE,
		}
	}

	pub fn init(&self) {
		let filter = EnvFilter::builder()
			.with_default_directive(self.level().into())
			.from_env_lossy();

		tracing_subscriber::fmt()
			.with_env_filter(filter)
			.with_writer(std::io::stderr)
			.init();
	}
}

#[cfg(test)]
mod tests {
	use clap::Parser;

	use super::*;

	#[derive(Parser)]
	struct Test {
		#[command(flatten)]
		log: Log,
	}

	fn level(args: &[&str]) -> LevelFilter {
		let args = std::iter::once("test").chain(args.iter().copied());
		Test::try_parse_from(args).unwrap().log.level()
	}

	#[test]
	fn levels() {
		assert_eq!(level(&[]), LevelFilter::INFO);
		assert_eq!(level(&["-v"]), LevelFilter::DEBUG);
		assert_eq!(level(&["-vv"]), LevelFilter::TRACE);
		assert_eq!(level(&["-vvv"]), LevelFilter::TRACE);
		assert_eq!(level(&["--quiet"]), LevelFilter::ERROR);
	}

	#[test]
	fn quiet_conflicts_with_verbose() {
		assert!(Test::try_parse_from(["test", "-q", "-v"]).is_err());
	}
}
