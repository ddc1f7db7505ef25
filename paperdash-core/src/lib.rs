//! Logic core for the PaperDash e-paper sensor dashboard
//!
//! Turns the dashboard's declarative configuration into per-refresh decisions:
//! - which of four seasons is active for today's date
//! - which min/max bounds each visible gauge is drawn with
//! - whether a sensor feed has stopped changing (stale)
//! - which comfort band the latest THI value falls in
//!
//! Key constraints:
//! - Runs on the display MCU (no heap, `no_std` without the `std` feature)
//! - No blocking I/O, every call completes in bounded time
//! - MQTT, JSON parsing, NTP and rendering stay outside this crate
//!
//! ```no_run
//! use paperdash_core::{Dashboard, DashboardConfig, MonthDay, SensorIndex};
//!
//! let mut dashboard = Dashboard::new(DashboardConfig::default())?;
//!
//! // Feed samples as MQTT messages arrive
//! dashboard.observe(SensorIndex::OutdoorTemp, 18.5, 1_000)?;
//!
//! // Once per refresh tick
//! let today = MonthDay::new(3, 1)?;
//! let frame = dashboard.refresh(today, 120_000);
//! for gauge in &frame.gauges {
//!     // draw gauge.range.min ..= gauge.range.max
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod logging;

pub mod config;
pub mod constants;
pub mod dashboard;
pub mod errors;
pub mod gauge;
pub mod season;
pub mod seasonal;
pub mod sensors;
#[cfg(feature = "std")]
pub mod shared;
pub mod stale;
pub mod thi;
pub mod time;

// Public API
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, GaugeFrame, RefreshFrame, ThiReading};
pub use errors::{ConfigError, ConfigResult, ObserveError};
pub use gauge::{GaugeRange, GaugeSpec, GaugeTable};
pub use season::{MonthDay, Season, SeasonBoundaries, SeasonBoundary};
pub use seasonal::Seasonal;
pub use sensors::{SensorIndex, SensorSet, Source, ValueKind};
#[cfg(feature = "std")]
pub use shared::{SharedDashboard, SharedError};
pub use stale::{SampleValue, SensorState, StaleConfig, StaleStatus, StalenessDetector};
pub use thi::{Band, ThiConfig, ThiThresholds};
pub use time::{TimeSource, Timestamp};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
