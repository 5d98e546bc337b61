use std::env;
use std::str::FromStr;

use crate::progression::{DEFAULT_LOOKBACK_DAYS, DEFAULT_MAX_WORKOUTS};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DATABASE_URL_VAR: &str = "STRENGTH_LOG_DATABASE_URL";
const LOOKBACK_DAYS_VAR: &str = "STRENGTH_LOG_LOOKBACK_DAYS";
const MAX_WORKOUTS_VAR: &str = "STRENGTH_LOG_MAX_WORKOUTS";
const LOG_FORMAT_VAR: &str = "STRENGTH_LOG_LOG_FORMAT";
const LOG_LEVEL_VAR: &str = "RUST_LOG";

const DEFAULT_DATABASE_URL: &str = "sqlite://strength-log.db?mode=rwc";
const DEFAULT_LOG_LEVEL: &str = "info";

/// A century of history is more than any lookback needs
const MAX_LOOKBACK_DAYS: i64 = 36_500;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
  #[error("Invalid value for {var}: {value:?} ({reason})")]
  Invalid {
    var: &'static str,
    value: String,
    reason: String,
  },
}

/// ---------------------------------------------------------------------------
/// Log Output Format
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
  Pretty,
  #[default]
  Compact,
  Json,
}

impl FromStr for LogFormat {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "pretty" => Ok(Self::Pretty),
      "compact" => Ok(Self::Compact),
      "json" => Ok(Self::Json),
      other => Err(format!("expected pretty, compact or json, got {}", other)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Application Config
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
  pub database_url: String,
  /// Trailing window fetched for progression suggestions
  pub lookback_days: i64,
  /// Upper bound on workouts fetched for progression suggestions
  pub max_workouts: i64,
  pub log_level: String,
  pub log_format: LogFormat,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      lookback_days: DEFAULT_LOOKBACK_DAYS,
      max_workouts: DEFAULT_MAX_WORKOUTS,
      log_level: DEFAULT_LOG_LEVEL.to_string(),
      log_format: LogFormat::default(),
    }
  }
}

impl AppConfig {
  /// Read config from the environment, falling back to defaults for unset vars.
  /// Call `dotenvy::dotenv()` first to pick up a local `.env`.
  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();

    Ok(Self {
      database_url: env::var(DATABASE_URL_VAR).unwrap_or(defaults.database_url),
      lookback_days: parse_at_most(LOOKBACK_DAYS_VAR, defaults.lookback_days, MAX_LOOKBACK_DAYS)?,
      max_workouts: parse_positive(MAX_WORKOUTS_VAR, defaults.max_workouts)?,
      log_level: env::var(LOG_LEVEL_VAR).unwrap_or(defaults.log_level),
      log_format: match env::var(LOG_FORMAT_VAR) {
        Ok(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
          var: LOG_FORMAT_VAR,
          value: raw,
          reason,
        })?,
        Err(_) => defaults.log_format,
      },
    })
  }
}

fn parse_positive(var: &'static str, default: i64) -> Result<i64, ConfigError> {
  let Ok(raw) = env::var(var) else {
    return Ok(default);
  };

  match raw.trim().parse::<i64>() {
    Ok(value) if value > 0 => Ok(value),
    Ok(_) => Err(ConfigError::Invalid {
      var,
      value: raw,
      reason: "must be greater than zero".to_string(),
    }),
    Err(e) => Err(ConfigError::Invalid {
      var,
      value: raw,
      reason: e.to_string(),
    }),
  }
}

fn parse_at_most(var: &'static str, default: i64, max: i64) -> Result<i64, ConfigError> {
  let value = parse_positive(var, default)?;
  if value > max {
    return Err(ConfigError::Invalid {
      var,
      value: value.to_string(),
      reason: format!("must be at most {}", max),
    });
  }
  Ok(value)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  const ALL_VARS: [&str; 5] = [
    DATABASE_URL_VAR,
    LOOKBACK_DAYS_VAR,
    MAX_WORKOUTS_VAR,
    LOG_FORMAT_VAR,
    LOG_LEVEL_VAR,
  ];

  #[test]
  #[serial]
  fn test_defaults_when_unset() {
    temp_env::with_vars_unset(ALL_VARS, || {
      let config = AppConfig::from_env().expect("Defaults should load");
      assert_eq!(config, AppConfig::default());
      assert_eq!(config.lookback_days, 30);
      assert_eq!(config.max_workouts, 50);
      assert_eq!(config.log_format, LogFormat::Compact);
    });
  }

  #[test]
  #[serial]
  fn test_reads_overrides() {
    temp_env::with_vars(
      [
        (DATABASE_URL_VAR, Some("sqlite::memory:")),
        (LOOKBACK_DAYS_VAR, Some("14")),
        (MAX_WORKOUTS_VAR, Some(" 20 ")),
        (LOG_FORMAT_VAR, Some("JSON")),
        (LOG_LEVEL_VAR, Some("debug")),
      ],
      || {
        let config = AppConfig::from_env().expect("Overrides should load");
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.lookback_days, 14);
        assert_eq!(config.max_workouts, 20);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, "debug");
      },
    );
  }

  #[test]
  #[serial]
  fn test_rejects_bad_numbers() {
    temp_env::with_var(LOOKBACK_DAYS_VAR, Some("thirty"), || {
      let err = AppConfig::from_env().unwrap_err();
      assert!(err.to_string().contains(LOOKBACK_DAYS_VAR));
    });

    temp_env::with_var(MAX_WORKOUTS_VAR, Some("0"), || {
      let err = AppConfig::from_env().unwrap_err();
      assert!(err.to_string().contains("greater than zero"));
    });
  }

  #[test]
  #[serial]
  fn test_rejects_lookback_beyond_calendar() {
    temp_env::with_var(LOOKBACK_DAYS_VAR, Some("1000000000"), || {
      let err = AppConfig::from_env().unwrap_err();
      assert!(err.to_string().contains("must be at most 36500"));
    });

    temp_env::with_var(LOOKBACK_DAYS_VAR, Some("36500"), || {
      let config = AppConfig::from_env().expect("Upper bound is allowed");
      assert_eq!(config.lookback_days, MAX_LOOKBACK_DAYS);
    });
  }

  #[test]
  #[serial]
  fn test_rejects_unknown_log_format() {
    temp_env::with_var(LOG_FORMAT_VAR, Some("xml"), || {
      let err = AppConfig::from_env().unwrap_err();
      assert!(matches!(err, ConfigError::Invalid { var: LOG_FORMAT_VAR, .. }));
    });
  }
}
