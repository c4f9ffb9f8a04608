//! Diagnostic settings read from the environment.
//!
//! The protocol itself takes no configuration; these variables only shape
//! what is written to stderr.

use std::env;
use std::str::FromStr;

use thiserror::Error;

pub const LOG_FILTER_ENV: &str = "BLINKBOARD_LOG";
pub const LOG_FORMAT_ENV: &str = "BLINKBOARD_LOG_FORMAT";

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unsupported log format '{value}' in {variable}, expected 'compact' or 'json'")]
    LogFormat { variable: &'static str, value: String },

    #[error("{variable} is not valid unicode")]
    NotUnicode { variable: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::LogFormat {
                variable: LOG_FORMAT_ENV,
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    log_filter: String,
    log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Reads `BLINKBOARD_LOG` and `BLINKBOARD_LOG_FORMAT`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let filter = read_var(LOG_FILTER_ENV)?;
        let format = read_var(LOG_FORMAT_ENV)?;
        Self::from_values(filter, format)
    }

    fn from_values(filter: Option<String>, format: Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(filter) = filter.filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }
        if let Some(format) = format.filter(|f| !f.trim().is_empty()) {
            config.log_format = format.parse()?;
        }

        Ok(config)
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

fn read_var(variable: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(variable) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { variable }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_values(None, None).expect("defaults");

        assert_eq!(config.log_filter(), "info");
        assert_eq!(config.log_format(), LogFormat::Compact);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config =
            Config::from_values(Some("  ".into()), Some(String::new())).expect("defaults");

        assert_eq!(config, Config::default());
    }

    #[test]
    fn takes_filter_verbatim() {
        let config = Config::from_values(Some("blinkboard_core=debug,warn".into()), None)
            .expect("filter");

        assert_eq!(config.log_filter(), "blinkboard_core=debug,warn");
    }

    #[rstest]
    #[case("json", LogFormat::Json)]
    #[case("JSON", LogFormat::Json)]
    #[case(" compact ", LogFormat::Compact)]
    fn parses_log_format(#[case] raw: &str, #[case] expected: LogFormat) {
        assert_eq!(raw.parse::<LogFormat>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_log_format() {
        let error = Config::from_values(None, Some("pretty".into())).expect_err("bad format");

        assert_eq!(
            error,
            ConfigError::LogFormat {
                variable: LOG_FORMAT_ENV,
                value: "pretty".into(),
            }
        );
    }
}
