//! Shared fixtures for integration tests
//!
//! - Season boundaries and gauge tables used across scenarios
//! - A replay helper that feeds timed samples into a dashboard

#![allow(dead_code)]

use paperdash_core::{
    constants::MS_PER_MINUTE, Dashboard, DashboardConfig, GaugeSpec, GaugeTable, MonthDay,
    SampleValue, Season, SeasonBoundaries, SensorIndex, StaleConfig, StaleStatus, Timestamp,
};

/// Month/day from MMDD, panicking on bad fixtures
pub fn md(mmdd: u16) -> MonthDay {
    MonthDay::from_mmdd(mmdd).expect("fixture month/day")
}

/// Minutes to milliseconds
pub fn minutes(m: u64) -> Timestamp {
    m * MS_PER_MINUTE
}

/// Spring 0204, Summer 0505, Autumn 0807, Winter 1107
pub fn standard_seasons() -> SeasonBoundaries {
    SeasonBoundaries::from_starts(md(204), md(505), md(807), md(1107)).expect("fixture seasons")
}

/// Outdoor temperature gauge (-10, 40) with a Spring override (-5, 25)
pub fn outdoor_gauges() -> GaugeTable {
    GaugeTable::try_from_specs([(
        SensorIndex::OutdoorTemp,
        GaugeSpec::new(-10.0, 40.0).with_season(Season::Spring, -5.0, 25.0),
    )])
    .expect("fixture gauges")
}

/// Dashboard with seasonal gauges on and a 10 minute stale threshold
pub fn scenario_dashboard(excluded: &[SensorIndex]) -> Dashboard {
    let mut stale = StaleConfig::new(minutes(10));
    for sensor in excluded {
        stale = stale.exclude(*sensor);
    }
    let config = DashboardConfig {
        seasonal_gauges: true,
        seasons: standard_seasons(),
        gauges: outdoor_gauges(),
        stale,
        ..DashboardConfig::default()
    };
    Dashboard::new(config).expect("fixture dashboard")
}

/// One timed sample
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub minute: u64,
    pub sensor: SensorIndex,
    pub value: SampleValue,
}

impl Step {
    pub fn new(minute: u64, sensor: SensorIndex, value: impl Into<SampleValue>) -> Self {
        Self {
            minute,
            sensor,
            value: value.into(),
        }
    }
}

/// Feed steps in order, returning the status reported for each
pub fn replay(dashboard: &mut Dashboard, steps: &[Step]) -> Vec<StaleStatus> {
    steps
        .iter()
        .map(|step| {
            dashboard
                .observe(step.sensor, step.value, minutes(step.minute))
                .expect("fixture samples are finite")
        })
        .collect()
}
