//! Refresh-cycle facade
//!
//! Ties the resolvers together the way the dashboard controller uses them:
//!
//! ```text
//! MQTT message ──► observe(sensor, value, now) ──► StalenessDetector
//!
//! refresh tick ──► resolve season for today
//!              ──► per enabled gauge: range, latest value, stale status
//!              ──► THI band from the latest pico_thi sample
//!              ──► RefreshFrame for the renderer
//! ```

use heapless::Vec;

use crate::config::DashboardConfig;
use crate::errors::{ConfigResult, ObserveError};
use crate::gauge::GaugeRange;
use crate::season::{MonthDay, Season};
use crate::sensors::{SensorIndex, SensorSet};
use crate::stale::{SampleValue, SensorState, StaleStatus, StalenessDetector};
use crate::thi::{Band, THI_SENSOR};
#[cfg(feature = "chrono")]
use crate::time::TimeSource;
use crate::time::Timestamp;

/// Upper bound on gauges per frame
pub const MAX_GAUGES: usize = SensorIndex::COUNT;

/// Everything the renderer needs for one gauge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeFrame {
    /// Sensor shown
    pub sensor: SensorIndex,
    /// Bounds to scale against
    pub range: GaugeRange,
    /// Latest sample, if any arrived
    pub value: Option<SampleValue>,
    /// Needle position in `[0, 1]`, if a sample arrived
    pub fraction: Option<f32>,
    /// Staleness verdict, `None` before the first sample
    pub status: Option<StaleStatus>,
}

/// Latest THI and its band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThiReading {
    /// THI value as reported
    pub value: f32,
    /// Band under the thresholds in effect
    pub band: Band,
}

/// Output of one refresh tick
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshFrame {
    /// Season in effect
    pub season: Season,
    /// Enabled gauges in sensor order
    pub gauges: Vec<GaugeFrame, MAX_GAUGES>,
    /// THI band region, `None` until a THI sample arrives
    pub thi: Option<ThiReading>,
    /// Sensors currently stale
    pub stale: SensorSet,
}

impl RefreshFrame {
    /// Frame entry for a sensor's gauge
    pub fn gauge(&self, sensor: SensorIndex) -> Option<&GaugeFrame> {
        self.gauges.iter().find(|gauge| gauge.sensor == sensor)
    }
}

/// Configuration plus runtime staleness state
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: DashboardConfig,
    detector: StalenessDetector,
    last_season: Option<Season>,
}

impl Dashboard {
    /// Validate `config` and start with no sensor history
    pub fn new(config: DashboardConfig) -> ConfigResult<Self> {
        if let Err(err) = config.validate() {
            log_warn!("dashboard configuration rejected: {}", err);
            return Err(err);
        }
        let detector = StalenessDetector::new(config.stale)?;
        Ok(Self {
            config,
            detector,
            last_season: None,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Read access to sensor history
    pub fn detector(&self) -> &StalenessDetector {
        &self.detector
    }

    /// Consistent copy of one sensor's state
    pub fn snapshot(&self, sensor: SensorIndex) -> Option<SensorState> {
        self.detector.snapshot(sensor)
    }

    /// Ingest one sample
    pub fn observe(
        &mut self,
        sensor: SensorIndex,
        value: impl Into<SampleValue>,
        now: Timestamp,
    ) -> Result<StaleStatus, ObserveError> {
        self.detector.observe(sensor, value, now)
    }

    /// Season in effect on `today`
    pub fn season(&self, today: MonthDay) -> Season {
        self.config.seasons.resolve(today)
    }

    /// Build the frame for a refresh tick
    pub fn refresh(&mut self, today: MonthDay, now: Timestamp) -> RefreshFrame {
        let season = self.season(today);
        if self.last_season != Some(season) {
            log_info!("season is now {} ({})", season, today);
            self.last_season = Some(season);
        }

        let stale = self.detector.sweep(now);
        let seasonal = self.config.seasonal_gauges;

        let mut gauges = Vec::new();
        for sensor in self.config.gauges.enabled_sensors() {
            let Some(range) = self.config.gauges.resolve_range(sensor, seasonal, season) else {
                continue;
            };
            let value = self.detector.snapshot(sensor).map(|state| state.last_value);
            let frame = GaugeFrame {
                sensor,
                range,
                value,
                fraction: value.map(|value| range.fraction(value.as_f32())),
                status: self.detector.evaluate(sensor, now),
            };
            // One slot per sensor, so the frame never overflows
            if gauges.push(frame).is_err() {
                break;
            }
        }

        let thi = match self.detector.snapshot(THI_SENSOR).map(|state| state.last_value) {
            Some(SampleValue::Numeric(value)) => Some(ThiReading {
                value,
                band: self.config.thi.classify(value, seasonal, season),
            }),
            _ => None,
        };

        RefreshFrame {
            season,
            gauges,
            thi,
            stale,
        }
    }

    /// Refresh using the local date of a wall-clock timestamp
    ///
    /// `None` if the timestamp cannot be mapped to a date.
    #[cfg(feature = "chrono")]
    pub fn refresh_at(&mut self, now: Timestamp) -> Option<RefreshFrame> {
        let today = MonthDay::from_timestamp(now, self.config.utc_offset_minutes)?;
        Some(self.refresh(today, now))
    }

    /// Refresh reading time from `clock`
    ///
    /// Needs a wall-clock source; before NTP sync there is no date and the
    /// tick is skipped.
    #[cfg(feature = "chrono")]
    pub fn refresh_from<T: TimeSource>(&mut self, clock: &T) -> Option<RefreshFrame> {
        if !clock.is_wall_clock() {
            log_debug!("skipping refresh: clock not synchronised");
            return None;
        }
        self.refresh_at(clock.now())
    }
}
