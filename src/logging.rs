//! Structured logging setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{AppConfig, LogFormat};

/// Build the env filter, falling back to `info` when the directive doesn't parse
fn env_filter(level: &str) -> EnvFilter {
  EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init(config: &AppConfig) {
  let registry = tracing_subscriber::registry().with(env_filter(&config.log_level));

  // Logs go to stderr so command output on stdout stays machine-readable
  let result = match config.log_format {
    LogFormat::Json => registry
      .with(fmt::layer().json().with_writer(std::io::stderr))
      .try_init(),
    LogFormat::Pretty => registry
      .with(
        fmt::layer()
          .with_file(true)
          .with_line_number(true)
          .with_target(true)
          .with_writer(std::io::stderr),
      )
      .try_init(),
    LogFormat::Compact => registry
      .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
      .try_init(),
  };

  if result.is_ok() {
    tracing::debug!(format = ?config.log_format, level = %config.log_level, "Logging initialized");
  }
}
