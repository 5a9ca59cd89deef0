// =============================================================================
// Runtime Configuration — scoring profiles and service settings
// =============================================================================
//
// Every tunable of the service lives here: where to listen, which symbol is
// the benchmark, how many analyses to keep in memory, and the scoring
// profiles each engine runs with.  Profiles default to the built-in presets
// and can be overridden wholesale from the JSON file.
//
// Persistence uses an atomic tmp + rename pattern.  All fields carry
// `#[serde(default)]` so that a partial file still loads.
//
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::{ConfluenceProfile, ScoringProfile};

pub const CONFIG_PATH_ENV: &str = "SIGNAL_CONFIG_PATH";
pub const BIND_ADDR_ENV: &str = "SIGNAL_BIND_ADDR";
pub const DEFAULT_CONFIG_PATH: &str = "signal_config.json";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_benchmark_symbol() -> String {
    "SPY".to_string()
}

fn default_max_recent_analyses() -> usize {
    100
}

fn default_basic() -> ScoringProfile {
    ScoringProfile::basic()
}

fn default_advanced() -> ScoringProfile {
    ScoringProfile::advanced()
}

fn default_institutional() -> ScoringProfile {
    ScoringProfile::institutional()
}

fn default_chart() -> ConfluenceProfile {
    ConfluenceProfile::chart()
}

fn default_multi_timeframe() -> ConfluenceProfile {
    ConfluenceProfile::multi_timeframe()
}

// =============================================================================
// RuntimeConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Service -------------------------------------------------------------

    /// Socket address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Benchmark used for beta, alpha and correlation.
    #[serde(default = "default_benchmark_symbol")]
    pub benchmark_symbol: String,

    /// Size of the in-memory analysis log.
    #[serde(default = "default_max_recent_analyses")]
    pub max_recent_analyses: usize,

    // --- Scoring profiles ----------------------------------------------------

    #[serde(default = "default_basic")]
    pub basic: ScoringProfile,

    #[serde(default = "default_advanced")]
    pub advanced: ScoringProfile,

    #[serde(default = "default_institutional")]
    pub institutional: ScoringProfile,

    // --- Confluence ----------------------------------------------------------

    /// Daily/weekly blend shown on the chart view.
    #[serde(default = "default_chart")]
    pub chart: ConfluenceProfile,

    /// Weekly-weighted blend with alignment reasons.
    #[serde(default = "default_multi_timeframe")]
    pub multi_timeframe: ConfluenceProfile,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            benchmark_symbol: default_benchmark_symbol(),
            max_recent_analyses: default_max_recent_analyses(),
            basic: default_basic(),
            advanced: default_advanced(),
            institutional: default_institutional(),
            chart: default_chart(),
            multi_timeframe: default_multi_timeframe(),
        }
    }
}

impl RuntimeConfig {
    /// Config file path from `SIGNAL_CONFIG_PATH`, or the default.
    pub fn path_from_env() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            benchmark = %config.benchmark_symbol,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Load from `path`, falling back to defaults with a warning when the file
    /// is missing or invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "using default runtime config");
                Self::default()
            }
        }
    }

    /// Apply `SIGNAL_BIND_ADDR` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var(BIND_ADDR_ENV) {
            let addr = addr.trim();
            if !addr.is_empty() {
                self.bind_addr = addr.to_string();
            }
        }
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }
}
