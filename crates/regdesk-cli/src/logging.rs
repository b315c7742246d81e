//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Filter directive for a configured level and `-v` count
///
/// `-v` selects `debug` and `-vv` selects `trace`.
pub(crate) fn directive(level: &str, verbosity: u8) -> String {
	match verbosity {
		0 => level.to_string(),
		1 => "debug".to_string(),
		_ => "trace".to_string(),
	}
}

/// Install the global subscriber, writing to stderr
///
/// `RUST_LOG` wins over both the configured level and `-v`.
pub(crate) fn init(level: &str, verbosity: u8) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(directive(level, verbosity)));

	// A subscriber may already be installed (tests); keep that one
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.try_init();
}
