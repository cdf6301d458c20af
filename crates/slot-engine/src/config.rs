//! Engine configuration.
//!
//! Loaded from TOML; every key is optional and falls back to the defaults
//! below.
//!
//! ```toml
//! timezone = "America/Sao_Paulo"
//! day_length_minutes = 1440
//!
//! [palette]
//! colors = ["#3b82f6", "#10b981"]
//! free = "#e5e7eb"
//!
//! [form]
//! default_start = "09:00"
//! default_end = "10:00"
//! untitled_title = "Untitled"
//! ```

use std::path::Path;

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::day::{parse_timezone, MINUTES_PER_DAY};
use crate::error::{Result, SlotError};
use crate::timeline::Palette;

/// Top-level engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// IANA timezone used to map instants onto local days.
    pub timezone: String,
    /// Length of the searchable day for the free-slot finder.
    pub day_length_minutes: u32,
    pub palette: Palette,
    pub form: FormDefaults,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            day_length_minutes: MINUTES_PER_DAY,
            palette: Palette::default(),
            form: FormDefaults::default(),
        }
    }
}

/// Initial state of the event form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDefaults {
    /// `HH:MM`
    pub default_start: String,
    /// `HH:MM`
    pub default_end: String,
    /// Title used when the form's title is left blank.
    pub untitled_title: String,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            default_start: "09:00".to_string(),
            default_end: "10:00".to_string(),
            untitled_title: "Untitled".to_string(),
        }
    }
}

impl FormDefaults {
    pub fn start_time(&self) -> Result<NaiveTime> {
        parse_clock(&self.default_start)
    }

    pub fn end_time(&self) -> Result<NaiveTime> {
        parse_clock(&self.default_end)
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| SlotError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SlotError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), timezone = %config.timezone, "config loaded");
        Ok(config)
    }

    /// Check every field that later operations rely on.
    pub fn validate(&self) -> Result<()> {
        parse_timezone(&self.timezone)?;
        if self.day_length_minutes == 0 || self.day_length_minutes > MINUTES_PER_DAY {
            return Err(SlotError::InvalidDayLength(self.day_length_minutes));
        }
        self.palette.validate()?;
        let (start, end) = (self.form.start_time()?, self.form.end_time()?);
        if start >= end {
            return Err(SlotError::Config(format!(
                "form default_end {} must be after default_start {}",
                self.form.default_end, self.form.default_start
            )));
        }
        if self.form.untitled_title.trim().is_empty() {
            return Err(SlotError::Config("form untitled_title must not be blank".to_string()));
        }
        Ok(())
    }

    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }
}

/// Parse an `HH:MM` wall-clock time.
pub fn parse_clock(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| SlotError::InvalidDateTime {
        input: s.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.palette.len(), 8);
        assert_eq!(config.palette.free, "#e5e7eb");
        assert_eq!(config.day_length_minutes, 1440);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_document_overrides_only_given_keys() {
        let config = EngineConfig::from_toml_str(
            r#"
timezone = "America/Sao_Paulo"

[form]
default_start = "08:30"
"#,
        )
        .unwrap();
        assert_eq!(config.timezone, "America/Sao_Paulo");
        assert_eq!(config.tz().unwrap(), chrono_tz::America::Sao_Paulo);
        assert_eq!(config.form.default_start, "08:30");
        assert_eq!(config.form.default_end, "10:00");
        assert_eq!(config.palette, Palette::default());
    }

    #[test]
    fn custom_palette() {
        let config = EngineConfig::from_toml_str(
            r#"
[palette]
colors = ["red", "blue"]
free = "white"
"#,
        )
        .unwrap();
        assert_eq!(config.palette.color_for(3), "blue");
        assert_eq!(config.palette.free, "white");
    }

    #[test]
    fn unknown_timezone_rejected() {
        let err = EngineConfig::from_toml_str(r#"timezone = "Mars/Olympus""#).unwrap_err();
        assert!(matches!(err, SlotError::InvalidTimezone(_)));
    }

    #[test]
    fn empty_palette_rejected() {
        let err = EngineConfig::from_toml_str("[palette]\ncolors = []").unwrap_err();
        assert!(matches!(err, SlotError::Config(_)));
    }

    #[test]
    fn day_length_out_of_range_rejected() {
        let err = EngineConfig::from_toml_str("day_length_minutes = 1500").unwrap_err();
        assert_eq!(err, SlotError::InvalidDayLength(1500));
    }

    #[test]
    fn inverted_form_defaults_rejected() {
        let err = EngineConfig::from_toml_str(
            "[form]\ndefault_start = \"11:00\"\ndefault_end = \"10:00\"",
        )
        .unwrap_err();
        assert!(matches!(err, SlotError::Config(_)));
    }

    #[test]
    fn malformed_toml_rejected() {
        let err = EngineConfig::from_toml_str("timezone = ").unwrap_err();
        assert!(err.to_string().starts_with("Config error: Failed to parse TOML"));
    }

    #[test]
    fn clock_parsing() {
        assert_eq!(
            parse_clock("09:05").unwrap(),
            NaiveTime::from_hms_opt(9, 5, 0).unwrap()
        );
        assert!(parse_clock("9h").is_err());
    }
}
