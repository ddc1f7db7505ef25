//! Gauge Range Resolution
//!
//! ## Overview
//!
//! Each gauge needle/bar is scaled linearly between a minimum and maximum.
//! Every sensor with a gauge carries:
//! - an enable flag (disabled gauges are never drawn, whatever their range)
//! - a default range, always `min < max`
//! - optional seasonal overrides, any subset of the four seasons
//!
//! ## Resolution
//!
//! ```text
//! gauge disabled / not configured  → None (skip drawing)
//! seasonal gauges off              → default
//! no override for active season    → default
//! override present                 → override, exactly as configured
//! ```
//!
//! Validation happens when a spec enters a [`GaugeTable`], so every range the
//! table hands out has finite bounds and a default that is not inverted.

use crate::constants::DEFAULT_GAUGES;
use crate::errors::{ConfigError, ConfigResult};
use crate::season::Season;
use crate::seasonal::Seasonal;
use crate::sensors::SensorIndex;

/// Display bounds for one gauge
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GaugeRange {
    /// Value drawn at the empty end
    pub min: f32,
    /// Value drawn at the full end
    pub max: f32,
}

impl GaugeRange {
    /// Range from bounds (not validated)
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Distance between the bounds
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Whether `value` lies within the bounds (inclusive)
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Needle position for `value`, clamped to `[0, 1]`
    ///
    /// Zero-width ranges and non-finite values sit at 0.
    pub fn fraction(&self, value: f32) -> f32 {
        let span = self.span();
        if !(span > 0.0) || !value.is_finite() {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

/// Gauge configuration for one sensor
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeSpec {
    /// Draw this gauge at all
    pub enabled: bool,
    /// Default range plus seasonal overrides
    pub ranges: Seasonal<GaugeRange>,
}

impl GaugeSpec {
    /// Enabled gauge with a default range
    pub fn new(min: f32, max: f32) -> Self {
        Self {
            enabled: true,
            ranges: Seasonal::new(GaugeRange::new(min, max)),
        }
    }

    /// Disabled gauge (range kept for when it is switched back on)
    pub fn disabled(min: f32, max: f32) -> Self {
        Self {
            enabled: false,
            ..Self::new(min, max)
        }
    }

    /// Add a seasonal override
    pub fn with_season(mut self, season: Season, min: f32, max: f32) -> Self {
        self.ranges.set_override(season, GaugeRange::new(min, max));
        self
    }

    /// Range used outside seasonal overrides
    pub fn default_range(&self) -> GaugeRange {
        *self.ranges.default_value()
    }

    /// Check the bounds for `sensor`
    ///
    /// The default must satisfy `min < max`. Overrides may be zero-width but
    /// not inverted. All bounds must be finite.
    pub fn validate(&self, sensor: SensorIndex) -> ConfigResult<()> {
        let default = self.default_range();
        if !default.is_finite() {
            return Err(ConfigError::NonFiniteBound { sensor });
        }
        if !(default.min < default.max) {
            return Err(ConfigError::InvertedRange {
                sensor,
                min: default.min,
                max: default.max,
            });
        }

        for (season, range) in self.ranges.overrides() {
            if !range.is_finite() {
                return Err(ConfigError::NonFiniteBound { sensor });
            }
            if range.min > range.max {
                return Err(ConfigError::InvertedSeasonalRange {
                    sensor,
                    season,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        Ok(())
    }

    /// Range for the season, honouring the global seasonal switch
    pub fn resolve(&self, seasonal_enabled: bool, season: Season) -> GaugeRange {
        *self.ranges.resolve(seasonal_enabled.then_some(season))
    }
}

/// Validated gauge configuration for every sensor
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeTable {
    specs: [Option<GaugeSpec>; SensorIndex::COUNT],
}

impl Default for GaugeTable {
    /// The dashboard's stock gauge set
    fn default() -> Self {
        let mut table = Self::new();
        for (sensor, enabled, min, max) in DEFAULT_GAUGES {
            let spec = if enabled {
                GaugeSpec::new(min, max)
            } else {
                GaugeSpec::disabled(min, max)
            };
            table.specs[sensor.index()] = Some(spec);
        }
        table
    }
}

impl GaugeTable {
    /// Table with no gauges
    pub fn new() -> Self {
        Self {
            specs: core::array::from_fn(|_| None),
        }
    }

    /// Validate and store a sensor's gauge, replacing any previous one
    ///
    /// On error the table is left unchanged, so the offending gauge is never drawn.
    pub fn insert(&mut self, sensor: SensorIndex, spec: GaugeSpec) -> ConfigResult<Option<GaugeSpec>> {
        if let Err(err) = spec.validate(sensor) {
            log_warn!("rejecting gauge for {}: {}", sensor, err);
            return Err(err);
        }
        Ok(self.specs[sensor.index()].replace(spec))
    }

    /// Build a table, stopping at the first invalid gauge
    pub fn try_from_specs<I>(specs: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (SensorIndex, GaugeSpec)>,
    {
        let mut table = Self::new();
        for (sensor, spec) in specs {
            table.insert(sensor, spec)?;
        }
        Ok(table)
    }

    /// Remove a sensor's gauge
    pub fn remove(&mut self, sensor: SensorIndex) -> Option<GaugeSpec> {
        self.specs[sensor.index()].take()
    }

    /// Configuration for a sensor's gauge
    pub fn spec(&self, sensor: SensorIndex) -> Option<&GaugeSpec> {
        self.specs[sensor.index()].as_ref()
    }

    /// Whether the sensor's gauge should be drawn
    pub fn is_enabled(&self, sensor: SensorIndex) -> bool {
        self.spec(sensor).is_some_and(|spec| spec.enabled)
    }

    /// Effective range for an enabled gauge, `None` if it is disabled or absent
    pub fn resolve_range(
        &self,
        sensor: SensorIndex,
        seasonal_enabled: bool,
        season: Season,
    ) -> Option<GaugeRange> {
        self.spec(sensor)
            .filter(|spec| spec.enabled)
            .map(|spec| spec.resolve(seasonal_enabled, season))
    }

    /// Configured gauges in sensor order
    pub fn iter(&self) -> impl Iterator<Item = (SensorIndex, &GaugeSpec)> {
        SensorIndex::ALL
            .into_iter()
            .filter_map(move |sensor| self.spec(sensor).map(|spec| (sensor, spec)))
    }

    /// Sensors whose gauge is drawn, in sensor order
    pub fn enabled_sensors(&self) -> impl Iterator<Item = SensorIndex> + '_ {
        self.iter()
            .filter(|(_, spec)| spec.enabled)
            .map(|(sensor, _)| sensor)
    }
}

/// Display-skip decision for a sensor's gauge
pub fn is_enabled(sensor: SensorIndex, table: &GaugeTable) -> bool {
    table.is_enabled(sensor)
}

/// Effective range for a sensor's gauge
///
/// Callers check [`is_enabled`] first; a disabled gauge has no range.
pub fn resolve_range(
    sensor: SensorIndex,
    seasonal_enabled: bool,
    season: Season,
    table: &GaugeTable,
) -> Option<GaugeRange> {
    table.resolve_range(sensor, seasonal_enabled, season)
}
