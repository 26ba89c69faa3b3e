//! Tracing subscriber setup.

use anyhow::Result;
use qvis_sim::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Log level for a `-v` count, or `None` to defer to the configuration.
pub fn verbosity_level(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays
/// machine-readable.
pub fn init(verbose: u8, config: &LoggingConfig) -> Result<()> {
    let level = verbosity_level(verbose).unwrap_or(config.level.as_str());
    let filter = EnvFilter::new(level);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = match config.format.as_str() {
        "json" => builder.json().try_init(),
        _ => builder.try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}
