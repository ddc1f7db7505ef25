//! Thermal-Humidity Index Banding
//!
//! The THI value itself is computed by the room node and arrives as the
//! `pico_thi` sensor. Here it is only placed into one of four bands by three
//! ascending cut points. A value equal to a cut point belongs to the lower
//! band:
//!
//! ```text
//! (-inf, cool_max]        Cool
//! (cool_max, comfy_max]   Comfortable
//! (comfy_max, warm_max]   Warm
//! (warm_max, +inf)        Hot
//! ```
//!
//! Thresholds can vary by season through the same [`Seasonal`] mechanism the
//! gauges use. That is off unless `ThiConfig::seasonal` is set.

use crate::constants::{THI_COMFY_MAX, THI_COOL_MAX, THI_WARM_MAX};
use crate::errors::{ConfigError, ConfigResult};
use crate::season::Season;
use crate::seasonal::Seasonal;
use crate::sensors::SensorIndex;

/// Sensor carrying the computed THI
pub const THI_SENSOR: SensorIndex = SensorIndex::PicoThi;

/// Comfort band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Band {
    /// At or below `cool_max`
    Cool,
    /// Up to `comfy_max`
    Comfortable,
    /// Up to `warm_max`
    Warm,
    /// Above `warm_max`
    Hot,
}

impl Band {
    /// Short label for the display
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cool => "COOL",
            Self::Comfortable => "COMFY",
            Self::Warm => "WARM",
            Self::Hot => "HOT",
        }
    }
}

/// Three ascending cut points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThiThresholds {
    /// Upper edge of `Cool`
    pub cool_max: f32,
    /// Upper edge of `Comfortable`
    pub comfy_max: f32,
    /// Upper edge of `Warm`
    pub warm_max: f32,
}

impl Default for ThiThresholds {
    fn default() -> Self {
        Self::new(THI_COOL_MAX, THI_COMFY_MAX, THI_WARM_MAX)
    }
}

impl ThiThresholds {
    /// Thresholds from cut points (not validated)
    pub const fn new(cool_max: f32, comfy_max: f32, warm_max: f32) -> Self {
        Self {
            cool_max,
            comfy_max,
            warm_max,
        }
    }

    /// Cut points must be finite and strictly ascending
    pub fn validate(&self) -> ConfigResult<()> {
        // NaN fails both comparisons
        if self.cool_max < self.comfy_max
            && self.comfy_max < self.warm_max
            && self.cool_max.is_finite()
            && self.warm_max.is_finite()
        {
            Ok(())
        } else {
            Err(ConfigError::UnorderedThiThresholds {
                cool_max: self.cool_max,
                comfy_max: self.comfy_max,
                warm_max: self.warm_max,
            })
        }
    }

    /// Band for a THI value
    ///
    /// The value is expected to be finite; the dashboard only classifies
    /// samples that passed ingestion.
    pub fn classify(&self, thi: f32) -> Band {
        if thi <= self.cool_max {
            Band::Cool
        } else if thi <= self.comfy_max {
            Band::Comfortable
        } else if thi <= self.warm_max {
            Band::Warm
        } else {
            Band::Hot
        }
    }
}

/// Band for `thi` under `thresholds`
pub fn classify(thi: f32, thresholds: &ThiThresholds) -> Band {
    thresholds.classify(thi)
}

/// THI banding settings
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThiConfig {
    /// Use seasonal thresholds when seasonal gauges are on
    pub seasonal: bool,
    /// Default thresholds plus optional seasonal variants
    pub thresholds: Seasonal<ThiThresholds>,
}

impl ThiConfig {
    /// Fixed thresholds, no seasonal variants
    pub fn new(thresholds: ThiThresholds) -> Self {
        Self {
            seasonal: false,
            thresholds: Seasonal::new(thresholds),
        }
    }

    /// Validate default and seasonal thresholds
    pub fn validate(&self) -> ConfigResult<()> {
        self.thresholds.default_value().validate()?;
        for (_, thresholds) in self.thresholds.overrides() {
            thresholds.validate()?;
        }
        Ok(())
    }

    /// Thresholds in effect
    ///
    /// Seasonal variants apply only when both the global seasonal switch and
    /// `self.seasonal` are on.
    pub fn resolve(&self, seasonal_enabled: bool, season: Season) -> &ThiThresholds {
        let active = seasonal_enabled && self.seasonal;
        self.thresholds.resolve(active.then_some(season))
    }

    /// Band for `thi` with the thresholds in effect
    pub fn classify(&self, thi: f32, seasonal_enabled: bool, season: Season) -> Band {
        self.resolve(seasonal_enabled, season).classify(thi)
    }
}
