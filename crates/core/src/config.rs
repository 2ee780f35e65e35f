//! Site configuration, loaded from TOML.
//!
//! Every field has a default, so a missing or partial file still yields a
//! usable configuration. Each scroll consumer carries its own tracker
//! settings because they measure reveal progress differently.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use folio_protocol::{SectionLayout, ThemeMode, TrackerConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ConfigError;
use crate::reveal::RevealGate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub theme: ThemeMode,
    pub log_level: LogLevel,
    /// Rows scrolled per arrow key or wheel notch in the terminal front end.
    pub scroll_step: f64,
    pub frame_interval_ms: u64,
    pub progress_bar_delay_ms: u64,
    pub section_dots_delay_ms: u64,
    /// Four-panel showcase: reveal measured against the whole container.
    pub showcase: TrackerConfig,
    /// Dot rail: element intersection, reveal against local progress.
    pub section_dots: TrackerConfig,
    /// Per-card reveal on the long content pages.
    pub reveal: RevealGate,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Dark,
            log_level: LogLevel::default(),
            scroll_step: 2.0,
            frame_interval_ms: 16,
            progress_bar_delay_ms: 3000,
            section_dots_delay_ms: 2000,
            showcase: TrackerConfig {
                reveal_basis: folio_protocol::RevealBasis::Container,
                ..TrackerConfig::default()
            },
            section_dots: TrackerConfig {
                layout: SectionLayout::elements(),
                ..TrackerConfig::default()
            },
            reveal: RevealGate::default(),
        }
    }
}

impl FolioConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn progress_bar_delay(&self) -> Duration {
        Duration::from_millis(self.progress_bar_delay_ms)
    }

    pub fn section_dots_delay(&self) -> Duration {
        Duration::from_millis(self.section_dots_delay_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut checks = vec![
            ("showcase.reveal_threshold", self.showcase.reveal_threshold),
            ("section_dots.reveal_threshold", self.section_dots.reveal_threshold),
            ("reveal.threshold", self.reveal.threshold),
        ];
        if let SectionLayout::Elements {
            intersection_threshold,
            ..
        } = self.section_dots.layout
        {
            checks.push(("section_dots.layout.intersection_threshold", intersection_threshold));
        }
        for (field, value) in checks {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

/// Parse and validate a TOML document.
pub fn parse_config(contents: &str) -> Result<FolioConfig, ConfigError> {
    let config: FolioConfig = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

/// Read `path`, falling back to defaults when it is missing or invalid.
pub fn load_config(path: &Path) -> FolioConfig {
    match read_config(path) {
        Ok(config) => {
            info!(path = %path.display(), "Loaded config");
            config
        }
        Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No config file; using defaults");
            FolioConfig::default()
        }
        Err(err) => {
            warn!(path = %path.display(), "Falling back to default config: {err}");
            FolioConfig::default()
        }
    }
}

fn read_config(path: &Path) -> Result<FolioConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents)
}
