//! End-to-end dashboard scenarios
//!
//! Each test drives the dashboard the way the controller does: samples as
//! they arrive, frames on refresh ticks.

mod common;

use paperdash_core::{
    gauge::{is_enabled, resolve_range},
    season::{resolve_season, SeasonBoundary},
    stale::observe,
    thi::{classify, ThiThresholds},
    Band, GaugeRange, Season, SensorIndex, StaleConfig, StaleStatus, StalenessDetector,
};

use common::{md, minutes, outdoor_gauges, replay, scenario_dashboard, standard_seasons, Step};

#[test]
fn january_is_winter() {
    assert_eq!(standard_seasons().resolve(md(115)), Season::Winter);
}

#[test]
fn every_boundary_and_the_day_before_the_first() {
    let boundaries = [
        SeasonBoundary::new(Season::Spring, md(204)),
        SeasonBoundary::new(Season::Summer, md(505)),
        SeasonBoundary::new(Season::Autumn, md(807)),
        SeasonBoundary::new(Season::Winter, md(1107)),
    ];
    for boundary in boundaries {
        assert_eq!(resolve_season(boundary.start, &boundaries), Ok(boundary.season));
    }
    assert_eq!(resolve_season(md(203), &boundaries), Ok(Season::Winter));
}

#[test]
fn spring_override_then_winter_fallback() {
    let seasons = standard_seasons();
    let table = outdoor_gauges();
    let sensor = SensorIndex::OutdoorTemp;

    assert!(is_enabled(sensor, &table));

    let march = seasons.resolve(md(301));
    assert_eq!(march, Season::Spring);
    assert_eq!(resolve_range(sensor, true, march, &table), Some(GaugeRange::new(-5.0, 25.0)));

    let january = seasons.resolve(md(115));
    assert_eq!(resolve_range(sensor, true, january, &table), Some(GaugeRange::new(-10.0, 40.0)));
}

#[test]
fn seasonal_switch_off_ignores_overrides() {
    let table = outdoor_gauges();
    assert_eq!(
        resolve_range(SensorIndex::OutdoorTemp, false, Season::Spring, &table),
        Some(GaugeRange::new(-10.0, 40.0))
    );
}

#[test]
fn frozen_feed_goes_stale_and_recovers() {
    let mut dashboard = scenario_dashboard(&[]);
    let s = SensorIndex::OutdoorHumidity;

    let statuses = replay(
        &mut dashboard,
        &[
            Step::new(0, s, 5.0),
            Step::new(5, s, 5.0),
            Step::new(9, s, 5.0),
            Step::new(11, s, 5.0),
            Step::new(12, s, 6.0),
        ],
    );

    assert_eq!(
        statuses,
        vec![
            StaleStatus::Fresh,
            StaleStatus::Fresh,
            StaleStatus::Fresh,
            StaleStatus::Stale,
            StaleStatus::Fresh,
        ]
    );
}

#[test]
fn excluded_feed_never_alarms() {
    let mut dashboard = scenario_dashboard(&[SensorIndex::RainUptime]);
    let steps: Vec<Step> = (0..=100)
        .map(|hour| Step::new(hour * 60, SensorIndex::RainUptime, 12.0))
        .collect();

    let statuses = replay(&mut dashboard, &steps);
    assert!(statuses.iter().all(|status| *status == StaleStatus::Excluded));

    let frame = dashboard.refresh(md(301), minutes(100 * 60));
    assert!(!frame.stale.contains(SensorIndex::RainUptime));
}

#[test]
fn stale_alarm_shows_on_refresh_without_new_samples() {
    let mut dashboard = scenario_dashboard(&[]);
    dashboard.observe(SensorIndex::OutdoorTemp, 18.0, 0).unwrap();

    let early = dashboard.refresh(md(301), minutes(2));
    assert_eq!(
        early.gauge(SensorIndex::OutdoorTemp).unwrap().status,
        Some(StaleStatus::Fresh)
    );

    let late = dashboard.refresh(md(301), minutes(20));
    assert_eq!(
        late.gauge(SensorIndex::OutdoorTemp).unwrap().status,
        Some(StaleStatus::Stale)
    );
    assert_eq!(late.gauge(SensorIndex::OutdoorTemp).unwrap().range, GaugeRange::new(-5.0, 25.0));
}

#[test]
fn thi_band_edges() {
    let t = ThiThresholds::default();
    assert_eq!(classify(t.cool_max, &t), Band::Cool);
    assert_eq!(classify(t.warm_max + 1.0, &t), Band::Hot);
}

#[test]
fn free_observe_matches_method() {
    let mut detector = StalenessDetector::new(StaleConfig::new(minutes(10))).unwrap();
    assert_eq!(observe(&mut detector, SensorIndex::StudyCo2, 600.0, 0), Ok(StaleStatus::Fresh));
    assert_eq!(
        observe(&mut detector, SensorIndex::StudyCo2, 600.0, minutes(11)),
        Ok(StaleStatus::Stale)
    );
}
