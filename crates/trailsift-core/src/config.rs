//! Configuration types for trailsift.
//!
//! [`Config::load`] layers an optional user file over the built-in defaults.
//! [`Config::defaults`] returns the same defaults without touching the
//! filesystem (useful in tests).

use crate::extract::HeuristicStrategy;
use crate::summary::SummaryOptions;
use crate::timestamp::YearWindow;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[timestamps]
min_year = 2000
max_year = 2099

[heuristics]
strategy = "probes"

[summary]
top_actors    = 10
top_resources = 10

[key_events]
limit = 50

[remote]
endpoint     = "http://127.0.0.1:11434/api/generate"
model        = "llama3.1"
timeout_secs = 120
"#;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),
    #[error("timestamp window is empty: min_year {min} > max_year {max}")]
    EmptyWindow { min: i32, max: i32 },
}

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded from `~/.config/trailsift/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timestamps: TimestampConfig,
    #[serde(default)]
    pub heuristics: HeuristicsConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub key_events: KeyEventsConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// `[timestamps]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TimestampConfig {
    #[serde(default = "default_min_year")]
    pub min_year: i32,
    #[serde(default = "default_max_year")]
    pub max_year: i32,
}

fn default_min_year() -> i32 { 2000 }
fn default_max_year() -> i32 { 2099 }

impl Default for TimestampConfig {
    fn default() -> Self {
        Self {
            min_year: default_min_year(),
            max_year: default_max_year(),
        }
    }
}

/// `[heuristics]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeuristicsConfig {
    #[serde(default)]
    pub strategy: HeuristicStrategy,
}

/// `[summary]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    #[serde(default = "default_top_n")]
    pub top_actors: usize,
    #[serde(default = "default_top_n")]
    pub top_resources: usize,
}

fn default_top_n() -> usize { 10 }

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            top_actors: default_top_n(),
            top_resources: default_top_n(),
        }
    }
}

/// `[key_events]` section. A limit of 0 means unbounded.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyEventsConfig {
    #[serde(default = "default_key_event_limit")]
    pub limit: usize,
}

fn default_key_event_limit() -> usize { 50 }

impl Default for KeyEventsConfig {
    fn default() -> Self {
        Self {
            limit: default_key_event_limit(),
        }
    }
}

/// `[remote]` section, consumed by the remote completion path.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String { "http://127.0.0.1:11434/api/generate".to_string() }
fn default_model() -> String { "llama3.1".to_string() }
fn default_timeout_secs() -> u64 { 120 }

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Everything the parse engine needs, flattened out of [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub window: YearWindow,
    pub strategy: HeuristicStrategy,
    pub summary: SummaryOptions,
    /// Cap on the key-event subset; `None` means unbounded.
    pub key_event_limit: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: YearWindow::default(),
            strategy: HeuristicStrategy::default(),
            summary: SummaryOptions::default(),
            key_event_limit: Some(default_key_event_limit()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Layer `path` (required) or, when `None`, the per-user config file
    /// (optional) over the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let source = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::from(config_path().as_path()).required(false),
        };
        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(source)
            .build()?
            .try_deserialize()?;
        cfg.validate()
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    fn validate(self) -> Result<Self, ConfigError> {
        let (min, max) = (self.timestamps.min_year, self.timestamps.max_year);
        if min > max {
            return Err(ConfigError::EmptyWindow { min, max });
        }
        Ok(self)
    }

    /// The engine's view of this configuration.
    pub fn engine(&self) -> EngineConfig {
        let window = YearWindow::new(self.timestamps.min_year, self.timestamps.max_year);
        EngineConfig {
            window,
            strategy: self.heuristics.strategy,
            summary: SummaryOptions {
                top_actors: self.summary.top_actors,
                top_resources: self.summary.top_resources,
                window,
            },
            key_event_limit: (self.key_events.limit > 0).then_some(self.key_events.limit),
        }
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("trailsift")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
