//! Staleness Detection
//!
//! ## Overview
//!
//! A feed is stale when its value has not changed for longer than a threshold.
//! Frozen values usually mean the publisher crashed or lost its sensor while
//! the broker keeps delivering retained messages.
//!
//! ## Per-Sensor State
//!
//! ```text
//! first sample      → state created, last change = now        → Fresh
//! changed sample    → baseline = value, last change = now     → Fresh
//! same sample       → last change untouched
//! any evaluation    → excluded?                               → Excluded
//!                     now - last change > threshold?          → Stale
//!                     otherwise                               → Fresh
//! ```
//!
//! "Same" is exact for binary sensors and within a tolerance for continuous
//! readings, compared against the value recorded at the last change. Binary
//! sensors reporting numbers are read as on/off first.
//!
//! ## Exclusions
//!
//! Some quantities legitimately sit still (cable-connected flags, coarse
//! counters, slow room temperatures). Excluded sensors always report
//! `Excluded`; their samples are still recorded for display.
//!
//! ## Concurrency
//!
//! All mutation goes through [`StalenessDetector::observe`]. Evaluation works
//! on a `Copy` of the sensor's state, so a reader never mixes fields from two
//! different updates. Hosts that ingest on another thread wrap the detector
//! in a lock (see `SharedDashboard` with the `std` feature).

use libm::fabsf;

use crate::constants::{DEFAULT_STALE_EXCLUSIONS, DEFAULT_STALE_THRESHOLD_MS, DEFAULT_STALE_TOLERANCE};
use crate::errors::{ConfigError, ConfigResult, ObserveError};
use crate::sensors::{SensorIndex, SensorSet, ValueKind};
use crate::time::Timestamp;

/// Sample payload
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleValue {
    /// Continuous reading
    Numeric(f32),
    /// On/off state
    Binary(bool),
}

impl SampleValue {
    /// Numeric view for gauges (`true` = 1, `false` = 0)
    pub fn as_f32(&self) -> f32 {
        match *self {
            Self::Numeric(value) => value,
            Self::Binary(true) => 1.0,
            Self::Binary(false) => 0.0,
        }
    }

    /// Whether two samples count as the same value
    ///
    /// Samples of different kinds are always different.
    pub fn same_as(&self, other: &SampleValue, tolerance: f32) -> bool {
        match (*self, *other) {
            (Self::Numeric(a), Self::Numeric(b)) => fabsf(a - b) <= tolerance,
            (Self::Binary(a), Self::Binary(b)) => a == b,
            _ => false,
        }
    }

    /// Payload as the sensor's kind reads it
    ///
    /// Binary sensors often publish `0`/`1`; any non-zero number is "on".
    pub fn for_kind(self, kind: ValueKind) -> SampleValue {
        match (kind, self) {
            (ValueKind::Binary, Self::Numeric(value)) => Self::Binary(value != 0.0),
            _ => self,
        }
    }

    fn is_finite(&self) -> bool {
        match *self {
            Self::Numeric(value) => value.is_finite(),
            Self::Binary(_) => true,
        }
    }
}

impl From<f32> for SampleValue {
    fn from(value: f32) -> Self {
        Self::Numeric(value)
    }
}

impl From<f64> for SampleValue {
    fn from(value: f64) -> Self {
        Self::Numeric(value as f32)
    }
}

impl From<i32> for SampleValue {
    fn from(value: i32) -> Self {
        Self::Numeric(value as f32)
    }
}

impl From<u32> for SampleValue {
    fn from(value: u32) -> Self {
        Self::Numeric(value as f32)
    }
}

impl From<bool> for SampleValue {
    fn from(value: bool) -> Self {
        Self::Binary(value)
    }
}

// Bare JSON number or bool, as the feeds publish them
#[cfg(feature = "serde")]
impl serde::Serialize for SampleValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::Numeric(value) => serializer.serialize_f32(value),
            Self::Binary(value) => serializer.serialize_bool(value),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SampleValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SampleVisitor;

        impl<'de> serde::de::Visitor<'de> for SampleVisitor {
            type Value = SampleValue;

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("a number or a boolean")
            }

            fn visit_bool<E: serde::de::Error>(self, value: bool) -> Result<SampleValue, E> {
                Ok(SampleValue::Binary(value))
            }

            fn visit_f64<E: serde::de::Error>(self, value: f64) -> Result<SampleValue, E> {
                Ok(SampleValue::Numeric(value as f32))
            }

            fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<SampleValue, E> {
                Ok(SampleValue::Numeric(value as f32))
            }

            fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<SampleValue, E> {
                Ok(SampleValue::Numeric(value as f32))
            }
        }

        deserializer.deserialize_any(SampleVisitor)
    }
}

/// Staleness verdict for a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StaleStatus {
    /// Value changed within the threshold
    Fresh,
    /// Value unchanged for longer than the threshold
    Stale,
    /// Sensor not monitored
    Excluded,
}

/// Runtime record for one sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorState {
    /// Most recent sample
    pub last_value: SampleValue,
    /// Sample recorded at the last change; new samples are compared to this
    pub baseline: SampleValue,
    /// When the most recent sample arrived
    pub last_seen: Timestamp,
    /// When the value last changed
    pub last_change: Timestamp,
}

impl SensorState {
    fn first(value: SampleValue, now: Timestamp) -> Self {
        Self {
            last_value: value,
            baseline: value,
            last_seen: now,
            last_change: now,
        }
    }

    /// Time since the value last changed (0 if the clock went backwards)
    pub fn unchanged_for(&self, now: Timestamp) -> u64 {
        now.saturating_sub(self.last_change)
    }
}

/// Staleness settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaleConfig {
    /// Longest time a value may stay unchanged (milliseconds)
    pub threshold_ms: u64,
    /// Largest difference between numeric samples still treated as equal
    pub tolerance: f32,
    /// Sensors never reported stale
    pub excluded: SensorSet,
}

impl Default for StaleConfig {
    fn default() -> Self {
        Self {
            threshold_ms: DEFAULT_STALE_THRESHOLD_MS,
            tolerance: DEFAULT_STALE_TOLERANCE,
            excluded: SensorSet::from_slice(&DEFAULT_STALE_EXCLUSIONS),
        }
    }
}

impl StaleConfig {
    /// Threshold with default tolerance and no exclusions
    pub fn new(threshold_ms: u64) -> Self {
        Self {
            threshold_ms,
            tolerance: DEFAULT_STALE_TOLERANCE,
            excluded: SensorSet::EMPTY,
        }
    }

    /// Replace the numeric tolerance
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Add a sensor to the exclusion set
    pub fn exclude(mut self, sensor: SensorIndex) -> Self {
        self.excluded.insert(sensor);
        self
    }

    /// Membership in the exclusion set
    pub fn is_excluded(&self, sensor: SensorIndex) -> bool {
        self.excluded.contains(sensor)
    }

    /// Reject settings that would make every verdict meaningless
    pub fn validate(&self) -> ConfigResult<()> {
        if self.threshold_ms == 0 {
            return Err(ConfigError::ZeroStaleThreshold);
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance { tolerance: self.tolerance });
        }
        Ok(())
    }

    /// Verdict for a sensor given its state snapshot
    ///
    /// `None` only for a monitored sensor that has never reported.
    pub fn status(&self, sensor: SensorIndex, state: Option<SensorState>, now: Timestamp) -> Option<StaleStatus> {
        if self.is_excluded(sensor) {
            return Some(StaleStatus::Excluded);
        }
        let state = state?;
        if state.unchanged_for(now) > self.threshold_ms {
            Some(StaleStatus::Stale)
        } else {
            Some(StaleStatus::Fresh)
        }
    }
}

/// Tracks every sensor's last change and reports stale feeds
#[derive(Debug, Clone)]
pub struct StalenessDetector {
    config: StaleConfig,
    states: [Option<SensorState>; SensorIndex::COUNT],
    /// Sensors last reported stale, for transition logging
    flagged: SensorSet,
}

impl StalenessDetector {
    /// Detector with validated settings
    pub fn new(config: StaleConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            states: [None; SensorIndex::COUNT],
            flagged: SensorSet::EMPTY,
        })
    }

    /// Active settings
    pub fn config(&self) -> &StaleConfig {
        &self.config
    }

    /// Record a sample and return the sensor's status at `now`
    ///
    /// Non-finite numeric samples are rejected without touching state.
    pub fn observe(
        &mut self,
        sensor: SensorIndex,
        value: impl Into<SampleValue>,
        now: Timestamp,
    ) -> Result<StaleStatus, ObserveError> {
        let value = value.into();
        if !value.is_finite() {
            log_warn!("dropping non-finite sample for {}", sensor);
            return Err(ObserveError::NonFinite { sensor });
        }
        let value = value.for_kind(sensor.kind());

        let tolerance = self.config.tolerance;
        let state = match self.states[sensor.index()].as_mut() {
            Some(state) => {
                state.last_value = value;
                state.last_seen = now;
                if !state.baseline.same_as(&value, tolerance) {
                    state.baseline = value;
                    state.last_change = now;
                }
                *state
            }
            None => {
                log_debug!("first sample for {} at {}", sensor, now);
                let state = SensorState::first(value, now);
                self.states[sensor.index()] = Some(state);
                state
            }
        };

        // A state exists now, so the verdict is always present
        let status = self
            .config
            .status(sensor, Some(state), now)
            .unwrap_or(StaleStatus::Fresh);
        self.track(sensor, status);
        Ok(status)
    }

    /// Status at `now` without a new sample
    ///
    /// `None` if a monitored sensor has never reported.
    pub fn evaluate(&self, sensor: SensorIndex, now: Timestamp) -> Option<StaleStatus> {
        self.config.status(sensor, self.snapshot(sensor), now)
    }

    /// Consistent copy of a sensor's state
    pub fn snapshot(&self, sensor: SensorIndex) -> Option<SensorState> {
        self.states[sensor.index()]
    }

    /// Sensors stale at `now`
    pub fn stale_sensors(&self, now: Timestamp) -> SensorSet {
        SensorIndex::ALL
            .into_iter()
            .filter(|sensor| self.evaluate(*sensor, now) == Some(StaleStatus::Stale))
            .collect()
    }

    /// Evaluate every sensor for a refresh tick, logging transitions
    pub fn sweep(&mut self, now: Timestamp) -> SensorSet {
        for sensor in SensorIndex::ALL {
            if let Some(status) = self.evaluate(sensor, now) {
                self.track(sensor, status);
            }
        }
        self.flagged
    }

    /// Sensors that have reported at least once, with their state
    pub fn observed(&self) -> impl Iterator<Item = (SensorIndex, SensorState)> + '_ {
        SensorIndex::ALL
            .into_iter()
            .filter_map(move |sensor| self.snapshot(sensor).map(|state| (sensor, state)))
    }

    fn track(&mut self, sensor: SensorIndex, status: StaleStatus) {
        match status {
            StaleStatus::Stale => {
                if self.flagged.insert(sensor) {
                    log_warn!("{} stale: value unchanged for over {} ms", sensor, self.config.threshold_ms);
                }
            }
            StaleStatus::Fresh | StaleStatus::Excluded => {
                if self.flagged.remove(sensor) {
                    log_info!("{} recovered", sensor);
                }
            }
        }
    }
}

/// Record a sample on `detector` and return the sensor's status
pub fn observe(
    detector: &mut StalenessDetector,
    sensor: SensorIndex,
    value: impl Into<SampleValue>,
    now: Timestamp,
) -> Result<StaleStatus, ObserveError> {
    detector.observe(sensor, value, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MS_PER_MINUTE;

    fn detector(threshold_minutes: u64) -> StalenessDetector {
        StalenessDetector::new(StaleConfig::new(threshold_minutes * MS_PER_MINUTE)).unwrap()
    }

    fn min(m: u64) -> Timestamp {
        m * MS_PER_MINUTE
    }

    #[test]
    fn first_observation_is_fresh() {
        let mut d = detector(10);
        assert_eq!(d.observe(SensorIndex::OutdoorTemp, 5.0, min(0)), Ok(StaleStatus::Fresh));
        let state = d.snapshot(SensorIndex::OutdoorTemp).unwrap();
        assert_eq!(state.last_change, 0);
        assert_eq!(state.last_value, SampleValue::Numeric(5.0));
    }

    #[test]
    fn repeated_value_goes_stale_then_recovers() {
        let mut d = detector(10);
        let s = SensorIndex::OutdoorTemp;

        assert_eq!(d.observe(s, 5.0, min(0)), Ok(StaleStatus::Fresh));
        assert_eq!(d.observe(s, 5.0, min(5)), Ok(StaleStatus::Fresh));
        assert_eq!(d.observe(s, 5.0, min(9)), Ok(StaleStatus::Fresh));
        assert_eq!(d.observe(s, 5.0, min(11)), Ok(StaleStatus::Stale));
        assert_eq!(d.observe(s, 6.0, min(12)), Ok(StaleStatus::Fresh));
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut d = detector(10);
        let s = SensorIndex::PicoCo2;
        d.observe(s, 800.0, 0).unwrap();
        assert_eq!(d.evaluate(s, min(10)), Some(StaleStatus::Fresh));
        assert_eq!(d.evaluate(s, min(10) + 1), Some(StaleStatus::Stale));
    }

    #[test]
    fn evaluation_without_samples_goes_stale() {
        let mut d = detector(10);
        d.observe(SensorIndex::RpiTemp, 48.2, 0).unwrap();
        assert_eq!(d.evaluate(SensorIndex::RpiTemp, min(30)), Some(StaleStatus::Stale));
        assert!(d.stale_sensors(min(30)).contains(SensorIndex::RpiTemp));
    }

    #[test]
    fn never_observed_has_no_verdict() {
        let d = detector(10);
        assert_eq!(d.evaluate(SensorIndex::StudyCo2, min(60)), None);
    }

    #[test]
    fn excluded_sensor_never_stale() {
        let config = StaleConfig::new(min(10)).exclude(SensorIndex::RainUptime);
        let mut d = StalenessDetector::new(config).unwrap();
        let s = SensorIndex::RainUptime;

        assert_eq!(d.observe(s, 12.0, 0), Ok(StaleStatus::Excluded));
        assert_eq!(d.observe(s, 12.0, min(10_000)), Ok(StaleStatus::Excluded));
        assert_eq!(d.evaluate(s, min(1_000_000)), Some(StaleStatus::Excluded));
        // Still recorded for display
        assert!(d.snapshot(s).is_some());
    }

    #[test]
    fn excluded_reported_even_before_first_sample() {
        let config = StaleConfig::new(min(10)).exclude(SensorIndex::RainCableConnected);
        let d = StalenessDetector::new(config).unwrap();
        assert_eq!(d.evaluate(SensorIndex::RainCableConnected, 0), Some(StaleStatus::Excluded));
    }

    #[test]
    fn noise_within_tolerance_is_not_a_change() {
        let config = StaleConfig::new(min(10)).with_tolerance(0.05);
        let mut d = StalenessDetector::new(config).unwrap();
        let s = SensorIndex::OutdoorPressure;

        d.observe(s, 1013.20, 0).unwrap();
        d.observe(s, 1013.23, min(6)).unwrap();
        assert_eq!(d.observe(s, 1013.18, min(11)), Ok(StaleStatus::Stale));
        assert_eq!(d.snapshot(s).unwrap().last_change, 0);
    }

    #[test]
    fn slow_drift_is_measured_from_last_change() {
        let config = StaleConfig::new(min(10)).with_tolerance(0.05);
        let mut d = StalenessDetector::new(config).unwrap();
        let s = SensorIndex::StudyTemp;

        d.observe(s, 20.00, 0).unwrap();
        d.observe(s, 20.03, min(4)).unwrap();
        // 0.06 away from the baseline even though each step was below tolerance
        d.observe(s, 20.06, min(8)).unwrap();
        assert_eq!(d.snapshot(s).unwrap().last_change, min(8));
    }

    #[test]
    fn binary_values_compare_exactly() {
        let mut d = detector(10);
        let s = SensorIndex::RainState;

        d.observe(s, false, 0).unwrap();
        assert_eq!(d.observe(s, false, min(11)), Ok(StaleStatus::Stale));
        assert_eq!(d.observe(s, true, min(12)), Ok(StaleStatus::Fresh));
    }

    #[test]
    fn numeric_payload_on_binary_sensor_compares_exactly() {
        let config = StaleConfig::new(min(10)).with_tolerance(1.0);
        let mut d = StalenessDetector::new(config).unwrap();
        let s = SensorIndex::RainState;

        d.observe(s, 0.0, 0).unwrap();
        assert_eq!(d.observe(s, 1.0, min(11)), Ok(StaleStatus::Fresh));
        assert_eq!(d.snapshot(s).unwrap().last_value, SampleValue::Binary(true));
        assert_eq!(d.snapshot(s).unwrap().last_change, min(11));

        // Same state published as a bool is not a change
        assert_eq!(d.observe(s, true, min(15)), Ok(StaleStatus::Fresh));
        assert_eq!(d.snapshot(s).unwrap().last_change, min(11));
    }

    #[test]
    fn continuous_sensor_keeps_numeric_payload() {
        assert_eq!(
            SampleValue::Numeric(1.0).for_kind(ValueKind::Continuous),
            SampleValue::Numeric(1.0)
        );
        assert_eq!(
            SampleValue::Numeric(0.0).for_kind(ValueKind::Binary),
            SampleValue::Binary(false)
        );
    }

    #[test]
    fn kind_change_counts_as_change() {
        assert!(!SampleValue::Binary(true).same_as(&SampleValue::Numeric(1.0), 1.0));
    }

    #[test]
    fn non_finite_sample_rejected() {
        let mut d = detector(10);
        let s = SensorIndex::PicoHumidity;
        d.observe(s, 55.0, 0).unwrap();

        assert_eq!(d.observe(s, f32::NAN, min(1)), Err(ObserveError::NonFinite { sensor: s }));
        assert_eq!(d.snapshot(s).unwrap().last_seen, 0);
    }

    #[test]
    fn clock_going_backwards_reads_fresh() {
        let mut d = detector(10);
        d.observe(SensorIndex::QzssTemp, 40.0, min(60)).unwrap();
        assert_eq!(d.evaluate(SensorIndex::QzssTemp, min(1)), Some(StaleStatus::Fresh));
    }

    #[test]
    fn sweep_tracks_flagged_set() {
        let mut d = detector(10);
        d.observe(SensorIndex::OutdoorTemp, 1.0, 0).unwrap();
        d.observe(SensorIndex::OutdoorHumidity, 50.0, 0).unwrap();

        let stale = d.sweep(min(11));
        assert_eq!(stale.len(), 2);

        d.observe(SensorIndex::OutdoorTemp, 2.0, min(12)).unwrap();
        let stale = d.sweep(min(12));
        assert_eq!(stale, SensorSet::from_slice(&[SensorIndex::OutdoorHumidity]));
    }

    #[test]
    fn invalid_settings_rejected() {
        assert_eq!(
            StalenessDetector::new(StaleConfig::new(0)).err(),
            Some(ConfigError::ZeroStaleThreshold)
        );
        assert!(matches!(
            StaleConfig::new(1000).with_tolerance(-0.1).validate(),
            Err(ConfigError::InvalidTolerance { .. })
        ));
        assert!(StaleConfig::new(1000).with_tolerance(f32::NAN).validate().is_err());
    }

    #[test]
    fn default_config_excludes_slow_sensors() {
        let config = StaleConfig::default();
        assert!(config.is_excluded(SensorIndex::RainUptime));
        assert!(config.is_excluded(SensorIndex::StudyTemp));
        assert!(!config.is_excluded(SensorIndex::OutdoorTemp));
        assert!(config.validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn samples_serialize_as_bare_values() {
        let samples: [SampleValue; 3] = serde_json::from_str("[21, 1013.5, true]").unwrap();
        assert_eq!(
            samples,
            [
                SampleValue::Numeric(21.0),
                SampleValue::Numeric(1013.5),
                SampleValue::Binary(true)
            ]
        );
        assert_eq!(serde_json::to_string(&samples).unwrap(), "[21.0,1013.5,true]");
        assert!(serde_json::from_str::<SampleValue>("\"on\"").is_err());
    }
}
