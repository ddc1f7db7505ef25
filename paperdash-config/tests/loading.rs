use std::io::Write;

use paperdash_config::{load_file, load_str, to_json_pretty, ConfigIssue, LoadError};
use paperdash_core::{
    ConfigError, Dashboard, GaugeRange, MonthDay, Season, SensorIndex, StaleStatus,
};
use tempfile::NamedTempFile;

const SEASONAL_OUTDOOR: &str = r#"{
    "seasonal_gauges": true,
    "seasons": { "spring": 301, "summer": 601, "autumn": 901, "winter": 1201 },
    "gauges": {
        "outdoor_temp": {
            "min": -10, "max": 35,
            "seasonal": {
                "winter": { "min": -20, "max": 15 },
                "summer": { "min": 10, "max": 40 }
            }
        }
    },
    "stale": { "threshold_sec": 600, "exclude": ["rain_cable_connected"] }
}"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn file_drives_a_dashboard() {
    let file = write_temp(SEASONAL_OUTDOOR);
    let config = load_file(file.path()).unwrap();
    let mut dashboard = Dashboard::new(config).unwrap();

    dashboard.observe(SensorIndex::OutdoorTemp, 3.5, 0).unwrap();
    let frame = dashboard.refresh(MonthDay::new(1, 15).unwrap(), 60_000);

    assert_eq!(frame.season, Season::Winter);
    let gauge = frame.gauge(SensorIndex::OutdoorTemp).unwrap();
    assert_eq!(gauge.range, GaugeRange::new(-20.0, 15.0));
    assert_eq!(gauge.status, Some(StaleStatus::Fresh));
}

#[test]
fn season_without_override_uses_default_range() {
    let config = load_str(SEASONAL_OUTDOOR).unwrap();
    let range = config
        .gauges
        .resolve_range(SensorIndex::OutdoorTemp, config.seasonal_gauges, Season::Spring);
    assert_eq!(range, Some(GaugeRange::new(-10.0, 35.0)));
}

#[test]
fn threshold_from_file_applies() {
    let config = load_str(SEASONAL_OUTDOOR).unwrap();
    assert_eq!(config.stale.threshold_ms, 600_000);
    assert!(config.stale.is_excluded(SensorIndex::RainCableConnected));
    assert!(!config.stale.is_excluded(SensorIndex::StudyTemp));

    let mut dashboard = Dashboard::new(config).unwrap();
    dashboard.observe(SensorIndex::OutdoorTemp, 3.5, 0).unwrap();
    dashboard.observe(SensorIndex::OutdoorTemp, 3.5, 660_000).unwrap();
    let frame = dashboard.refresh(MonthDay::new(1, 15).unwrap(), 660_000);
    assert!(frame.stale.contains(SensorIndex::OutdoorTemp));
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    match load_file(&path) {
        Err(LoadError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected I/O error, got {other:?}"),
    }
}

#[test]
fn invalid_file_collects_all_issues() {
    let file = write_temp(
        r#"{
            "seasons": { "spring": 301, "summer": 301, "autumn": 901, "winter": 1201 },
            "gauges": { "outdoor_temp": { "min": 10, "max": 10 }, "garage_temp": { "min": 0, "max": 1 } },
            "utc_offset_minutes": 900
        }"#,
    );

    let err = load_file(file.path()).unwrap_err();
    let issues = err.issues();
    assert_eq!(issues.len(), 4);
    assert!(issues.iter().any(|issue| matches!(
        issue,
        ConfigIssue::Invalid(ConfigError::AmbiguousSeasonBoundary { .. })
    )));
    assert!(issues.contains(&ConfigIssue::Invalid(ConfigError::InvertedRange {
        sensor: SensorIndex::OutdoorTemp,
        min: 10.0,
        max: 10.0,
    })));
    assert!(issues.contains(&ConfigIssue::UnknownSensor("garage_temp".into())));
    assert!(issues.contains(&ConfigIssue::Invalid(ConfigError::InvalidUtcOffset { minutes: 900 })));
}

#[test]
fn written_profile_reloads_from_disk() {
    let config = load_str(SEASONAL_OUTDOOR).unwrap();
    let file = write_temp(&to_json_pretty(&config).unwrap());
    assert_eq!(load_file(file.path()).unwrap(), config);
}

#[test]
fn sub_second_settings_survive_json() {
    let mut config = paperdash_config::default_profile();
    config.stale.threshold_ms = 1_500;
    config.refresh_interval_ms = 500;

    let json = to_json_pretty(&config).unwrap();
    assert!(json.contains("\"refresh_ms\": 500"));
    assert_eq!(load_str(&json).unwrap(), config);
}
