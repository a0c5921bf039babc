//! Tracing subscriber setup for the command-line tools.
//!
//! Events go to stderr so they never mix with program output on stdout.
//! `RUST_LOG` takes precedence over the verbosity flag when set.

use tracing_subscriber::EnvFilter;

/// Level name for a `-v` count: 0 => warn, 1 => debug, 2+ => trace.
pub fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global fmt subscriber. Later calls are ignored.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("emu64={}", level_for(verbose))));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
