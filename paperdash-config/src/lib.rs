//! JSON configuration for the PaperDash dashboard
//!
//! A configuration file lists only what differs from the built-in profile:
//!
//! ```json
//! {
//!   "seasonal_gauges": true,
//!   "gauges": {
//!     "outdoor_temp": {
//!       "min": -10, "max": 35,
//!       "seasonal": { "winter": { "min": -20, "max": 15 } }
//!     }
//!   },
//!   "stale": { "threshold_sec": 900 }
//! }
//! ```
//!
//! Gauges named in the file replace the default gauge for that sensor; every
//! other sensor keeps its default. Durations are whole seconds
//! (`threshold_sec`, `refresh_sec`) or milliseconds (`threshold_ms`,
//! `refresh_ms`). Loading reports all problems at once through
//! [`LoadError::Invalid`].
//!
//! ```rust
//! let config = paperdash_config::load_str(r#"{"refresh_sec": 60}"#)?;
//! assert_eq!(config.refresh_interval_ms, 60_000);
//! # Ok::<(), paperdash_config::LoadError>(())
//! ```

pub mod document;
pub mod errors;

use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use paperdash_core::DashboardConfig;

pub use document::ConfigDocument;
pub use errors::{ConfigIssue, ConfigIssues, LoadError};

/// Built-in profile, spelled out in full
pub const DEFAULT_PROFILE_JSON: &str = include_str!("../profiles/default.json");

/// Parse and validate a configuration document
pub fn load_str(json: &str) -> Result<DashboardConfig, LoadError> {
    let document: ConfigDocument = serde_json::from_str(json)?;
    document.into_config().map_err(|issues| {
        for issue in issues.iter() {
            warn!("Rejected configuration entry: {issue}");
        }
        LoadError::Invalid(issues)
    })
}

/// Read, parse and validate a configuration file
pub fn load_file(path: impl AsRef<Path>) -> Result<DashboardConfig, LoadError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = load_str(&json)?;
    info!(
        "Loaded configuration from {} (seasonal gauges {}, {} gauges enabled)",
        path.display(),
        if config.seasonal_gauges { "on" } else { "off" },
        config.gauges.enabled_sensors().count()
    );
    Ok(config)
}

/// Built-in profile
///
/// Identical to `DashboardConfig::default()`; `DEFAULT_PROFILE_JSON` is the
/// same profile written out as a starting point for a config file.
pub fn default_profile() -> DashboardConfig {
    debug!("Using built-in configuration profile");
    DashboardConfig::default()
}

/// Full document for `config`, pretty-printed
pub fn to_json_pretty(config: &DashboardConfig) -> Result<String, LoadError> {
    Ok(serde_json::to_string_pretty(&ConfigDocument::from_config(config))?)
}
