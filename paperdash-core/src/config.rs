//! Dashboard configuration aggregate
//!
//! Collects every table the core consumes. Fields are public so a host can
//! assemble a configuration in code; [`DashboardConfig::validate`] runs before
//! a [`Dashboard`](crate::Dashboard) accepts it.

use heapless::Vec;

use crate::constants::{DEFAULT_REFRESH_INTERVAL_MS, DEFAULT_UTC_OFFSET_MINUTES, MAX_UTC_OFFSET_MINUTES};
use crate::errors::{ConfigError, ConfigResult};
use crate::gauge::GaugeTable;
use crate::season::SeasonBoundaries;
use crate::stale::StaleConfig;
use crate::thi::ThiConfig;

/// Complete dashboard configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Use seasonal gauge overrides at all
    pub seasonal_gauges: bool,
    /// Season start days
    pub seasons: SeasonBoundaries,
    /// Per-sensor gauges
    pub gauges: GaugeTable,
    /// Staleness threshold, tolerance and exclusions
    pub stale: StaleConfig,
    /// THI band thresholds
    pub thi: ThiConfig,
    /// Local time offset used to derive today's date (minutes east of UTC)
    pub utc_offset_minutes: i32,
    /// Refresh tick period (milliseconds)
    pub refresh_interval_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            seasonal_gauges: false,
            seasons: SeasonBoundaries::default(),
            gauges: GaugeTable::default(),
            stale: StaleConfig::default(),
            thi: ThiConfig::default(),
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
        }
    }
}

impl DashboardConfig {
    /// Check the parts not already validated by construction
    ///
    /// Season boundaries and gauge tables can only be built valid; staleness,
    /// THI, offset and refresh settings are plain values and checked here.
    pub fn validate(&self) -> ConfigResult<()> {
        match self.problems().first() {
            Some(err) => Err(*err),
            None => Ok(()),
        }
    }

    /// Every failing check, in the order `validate` reports them
    pub fn problems(&self) -> Vec<ConfigError, 4> {
        let mut problems = Vec::new();
        let checks = [
            self.stale.validate(),
            self.thi.validate(),
            self.check_utc_offset(),
            self.check_refresh_interval(),
        ];
        for err in checks.into_iter().filter_map(Result::err) {
            // Four checks, four slots
            let _ = problems.push(err);
        }
        problems
    }

    fn check_utc_offset(&self) -> ConfigResult<()> {
        if self.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ConfigError::InvalidUtcOffset {
                minutes: self.utc_offset_minutes,
            });
        }
        Ok(())
    }

    fn check_refresh_interval(&self) -> ConfigResult<()> {
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        Ok(())
    }
}
