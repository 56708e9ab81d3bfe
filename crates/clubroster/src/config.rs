use std::env;

use chrono_tz::Tz;
use thiserror::Error;

/// Default SQLite database file.
pub const DEFAULT_DATABASE: &str = "clubroster.db";

/// Default time zone used to decide what "this year" means.
pub const DEFAULT_TIME_ZONE: Tz = Tz::America__New_York;

/// Errors raised while loading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid time zone '{0}': expected an IANA name such as America/New_York")]
    InvalidTimeZone(String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file (default: "clubroster.db")
    pub sqlite_path: String,
    /// Time zone for calendar-year decisions (default: America/New_York)
    pub time_zone: Tz,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CLUBROSTER_DATABASE` - SQLite database path (default: "clubroster.db")
    /// - `CLUBROSTER_TIME_ZONE` - IANA time zone name (default: "America/New_York")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let sqlite_path = lookup("CLUBROSTER_DATABASE")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let time_zone = match lookup("CLUBROSTER_TIME_ZONE").filter(|v| !v.is_empty()) {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimeZone(name))?,
            None => DEFAULT_TIME_ZONE,
        };

        Ok(Self {
            sqlite_path,
            time_zone,
        })
    }

    /// Replaces the database path, e.g. from a command-line flag.
    pub fn with_sqlite_path(mut self, path: impl Into<String>) -> Self {
        self.sqlite_path = path.into();
        self
    }
}
