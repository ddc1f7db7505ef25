//! Defaults and Unit Conversions
//!
//! Values here mirror the configuration the dashboard ships with. Every
//! default can be overridden at load time; these are what an empty
//! configuration document resolves to.

use crate::sensors::SensorIndex;

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: u64 = 60;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: u64 = MS_PER_SECOND * SECONDS_PER_MINUTE;

/// Milliseconds per hour.
pub const MS_PER_HOUR: u64 = MS_PER_MINUTE * 60;

/// Minutes per hour.
pub const MINUTES_PER_HOUR: i32 = 60;

// ===== REFRESH =====

/// Periodic screen refresh interval (milliseconds).
///
/// E-paper full refreshes are slow and visible; two minutes keeps the
/// readings current without constant flashing.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 120 * MS_PER_SECOND;

/// Local time offset from UTC (minutes). JST = UTC+9.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 9 * MINUTES_PER_HOUR;

/// Largest UTC offset accepted in either direction (minutes).
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * MINUTES_PER_HOUR;

// ===== SEASONS =====

/// Spring start (MMDD). Feb 4.
pub const DEFAULT_SPRING_START_MMDD: u16 = 204;

/// Summer start (MMDD). May 5.
pub const DEFAULT_SUMMER_START_MMDD: u16 = 505;

/// Autumn start (MMDD). Aug 7.
pub const DEFAULT_AUTUMN_START_MMDD: u16 = 807;

/// Winter start (MMDD). Nov 7, runs across New Year until spring.
pub const DEFAULT_WINTER_START_MMDD: u16 = 1107;

const _: () = assert!(DEFAULT_SPRING_START_MMDD < DEFAULT_SUMMER_START_MMDD);
const _: () = assert!(DEFAULT_SUMMER_START_MMDD < DEFAULT_AUTUMN_START_MMDD);
const _: () = assert!(DEFAULT_AUTUMN_START_MMDD < DEFAULT_WINTER_START_MMDD);

// ===== STALENESS =====

/// Time a value may stay unchanged before its feed is reported stale (milliseconds).
pub const DEFAULT_STALE_THRESHOLD_MS: u64 = 30 * MS_PER_MINUTE;

/// Two numeric samples closer than this count as the same value.
///
/// Below the resolution of every sensor on the dashboard (0.01°C, 0.1%RH,
/// 1 ppm, 0.1 hPa), so real movement always registers as a change.
pub const DEFAULT_STALE_TOLERANCE: f32 = 0.001;

/// Sensors whose value legitimately stays put for long periods.
///
/// - Rain uptime counts in coarse steps
/// - Rain cable flag is expected to sit at "connected"
/// - Study room temperature drifts slowly
pub const DEFAULT_STALE_EXCLUSIONS: [SensorIndex; 3] = [
    SensorIndex::RainUptime,
    SensorIndex::RainCableConnected,
    SensorIndex::StudyTemp,
];

// ===== THI BANDS =====

/// Upper edge of the cool band.
pub const THI_COOL_MAX: f32 = 65.0;

/// Upper edge of the comfortable band.
pub const THI_COMFY_MAX: f32 = 72.0;

/// Upper edge of the warm band. Anything above is hot.
pub const THI_WARM_MAX: f32 = 78.0;

const _: () = assert!(THI_COOL_MAX < THI_COMFY_MAX);
const _: () = assert!(THI_COMFY_MAX < THI_WARM_MAX);

// ===== GAUGES =====

/// Default gauge table: (sensor, enabled, min, max).
///
/// Raw rain ADC gauges are off; the board reports them for debugging only.
pub const DEFAULT_GAUGES: [(SensorIndex, bool, f32, f32); 15] = [
    (SensorIndex::RainCurrent, false, 0.0, 4095.0),
    (SensorIndex::RainBaseline, false, 0.0, 4095.0),
    (SensorIndex::RainUptime, true, 0.0, 38.0),
    (SensorIndex::PicoTemp, true, -10.0, 45.0),
    (SensorIndex::PicoHumidity, true, 0.0, 100.0),
    (SensorIndex::PicoCo2, true, 400.0, 2000.0),
    (SensorIndex::PicoThi, true, 50.0, 85.0),
    (SensorIndex::OutdoorTemp, true, -10.0, 40.0),
    (SensorIndex::OutdoorHumidity, true, 0.0, 100.0),
    (SensorIndex::OutdoorPressure, true, 980.0, 1040.0),
    (SensorIndex::RpiTemp, true, 20.0, 90.0),
    (SensorIndex::QzssTemp, true, 20.0, 90.0),
    (SensorIndex::StudyCo2, true, 400.0, 2000.0),
    (SensorIndex::StudyTemp, true, 0.0, 40.0),
    (SensorIndex::StudyHumidity, true, 0.0, 100.0),
];
