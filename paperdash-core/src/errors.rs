//! Error Types for Dashboard Configuration and Sample Ingestion
//!
//! ## Error Classes
//!
//! The core distinguishes two kinds of failure:
//!
//! ### Configuration errors (`ConfigError`)
//! Detected while a configuration is assembled or loaded. They are fatal for
//! whatever they describe: a gauge with an inverted default range is never
//! drawn, ambiguous season boundaries refuse to resolve at all.
//! - `AmbiguousSeasonBoundary`: two seasons start on the same day
//! - `DuplicateSeason` / `MissingSeason`: boundaries don't name each season once
//! - `InvalidMonthDay`: not a real calendar day (Feb 29 is accepted)
//! - `InvertedRange` / `InvertedSeasonalRange` / `NonFiniteBound`: bad gauge bounds
//! - `MissingDefaultRange`: enabled gauge without default bounds
//! - `UnorderedThiThresholds`: THI cut points not strictly ascending
//! - `InvalidTolerance` / `ZeroStaleThreshold`: unusable staleness settings
//!
//! ### Ingestion errors (`ObserveError`)
//! A single rejected sample. State is left untouched and ingestion continues
//! with the next message.
//!
//! Stale sensors are not errors: `StaleStatus::Stale` is an advisory that
//! clears itself on the next changed sample.
//!
//! ## Memory Layout
//!
//! Both enums are `Copy` and carry no heap data, so they can be returned from
//! the hot path and stored in fixed-size queues.

use thiserror_no_std::Error;

use crate::season::{MonthDay, Season};
use crate::sensors::SensorIndex;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors - fatal at load time for the item they describe
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Two seasons share a start day, so resolution would be ambiguous
    #[error("Seasons {first} and {second} both start on {start}")]
    AmbiguousSeasonBoundary {
        /// Season sorted first
        first: Season,
        /// Season sharing its start day
        second: Season,
        /// The shared start day
        start: MonthDay,
    },

    /// The same season was given more than one start day
    #[error("Season {season} has more than one start boundary")]
    DuplicateSeason {
        /// The repeated season
        season: Season,
    },

    /// A season has no start day
    #[error("Season {season} has no start boundary")]
    MissingSeason {
        /// The season without a boundary
        season: Season,
    },

    /// Month/day pair that is not a calendar day
    #[error("Invalid month/day {mmdd:04}")]
    InvalidMonthDay {
        /// Offending value in MMDD form
        mmdd: u16,
    },

    /// Default gauge range is inverted or zero-width
    #[error("Gauge {sensor} default range [{min}, {max}] must satisfy min < max")]
    InvertedRange {
        /// Sensor owning the gauge
        sensor: SensorIndex,
        /// Configured minimum
        min: f32,
        /// Configured maximum
        max: f32,
    },

    /// Seasonal override with min above max
    #[error("Gauge {sensor} {season} range [{min}, {max}] is inverted")]
    InvertedSeasonalRange {
        /// Sensor owning the gauge
        sensor: SensorIndex,
        /// Season of the override
        season: Season,
        /// Configured minimum
        min: f32,
        /// Configured maximum
        max: f32,
    },

    /// Gauge bound is NaN or infinite
    #[error("Gauge {sensor} has a non-finite bound")]
    NonFiniteBound {
        /// Sensor owning the gauge
        sensor: SensorIndex,
    },

    /// Enabled gauge configured without default bounds
    #[error("Gauge {sensor} is enabled but has no default range")]
    MissingDefaultRange {
        /// Sensor owning the gauge
        sensor: SensorIndex,
    },

    /// THI cut points not strictly ascending (or not finite)
    #[error("THI thresholds {cool_max} < {comfy_max} < {warm_max} do not hold")]
    UnorderedThiThresholds {
        /// Upper edge of the cool band
        cool_max: f32,
        /// Upper edge of the comfortable band
        comfy_max: f32,
        /// Upper edge of the warm band
        warm_max: f32,
    },

    /// Numeric equality tolerance is negative or not finite
    #[error("Stale tolerance {tolerance} must be a finite value >= 0")]
    InvalidTolerance {
        /// Configured tolerance
        tolerance: f32,
    },

    /// Stale threshold of zero would flag every repeated sample
    #[error("Stale threshold must be greater than zero")]
    ZeroStaleThreshold,

    /// Refresh interval of zero
    #[error("Refresh interval must be greater than zero")]
    ZeroRefreshInterval,

    /// UTC offset outside -14h..=+14h
    #[error("UTC offset {minutes} min is out of range")]
    InvalidUtcOffset {
        /// Configured offset in minutes
        minutes: i32,
    },
}

/// Rejected sensor sample
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ObserveError {
    /// Numeric sample is NaN or infinite
    #[error("Sample for {sensor} is not a finite number")]
    NonFinite {
        /// Sensor the sample was addressed to
        sensor: SensorIndex,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::AmbiguousSeasonBoundary { first, second, start } =>
                defmt::write!(fmt, "Seasons {} and {} both start {}", first, second, start.ordinal()),
            Self::DuplicateSeason { season } =>
                defmt::write!(fmt, "Duplicate season {}", season),
            Self::MissingSeason { season } =>
                defmt::write!(fmt, "Missing season {}", season),
            Self::InvalidMonthDay { mmdd } =>
                defmt::write!(fmt, "Invalid month/day {}", mmdd),
            Self::InvertedRange { sensor, min, max } =>
                defmt::write!(fmt, "Gauge {} range [{}, {}] inverted", sensor, min, max),
            Self::InvertedSeasonalRange { sensor, season, min, max } =>
                defmt::write!(fmt, "Gauge {} {} range [{}, {}] inverted", sensor, season, min, max),
            Self::NonFiniteBound { sensor } =>
                defmt::write!(fmt, "Gauge {} bound not finite", sensor),
            Self::MissingDefaultRange { sensor } =>
                defmt::write!(fmt, "Gauge {} missing default range", sensor),
            Self::UnorderedThiThresholds { cool_max, comfy_max, warm_max } =>
                defmt::write!(fmt, "THI thresholds {} {} {} unordered", cool_max, comfy_max, warm_max),
            Self::InvalidTolerance { tolerance } =>
                defmt::write!(fmt, "Invalid stale tolerance {}", tolerance),
            Self::ZeroStaleThreshold =>
                defmt::write!(fmt, "Zero stale threshold"),
            Self::ZeroRefreshInterval =>
                defmt::write!(fmt, "Zero refresh interval"),
            Self::InvalidUtcOffset { minutes } =>
                defmt::write!(fmt, "UTC offset {} min out of range", minutes),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ObserveError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NonFinite { sensor } => defmt::write!(fmt, "Non-finite sample for {}", sensor),
        }
    }
}
