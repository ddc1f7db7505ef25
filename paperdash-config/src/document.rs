//! Serialized form of a dashboard configuration
//!
//! Sensor and season names stay as strings here so a document with several
//! unknown names reports all of them instead of stopping at the first parse
//! failure. Every section is optional; anything omitted keeps the built-in
//! default.

use std::collections::BTreeMap;

use paperdash_core::constants::MS_PER_SECOND;
use paperdash_core::{
    ConfigError, DashboardConfig, GaugeRange, GaugeSpec, MonthDay, Season, SeasonBoundaries,
    Seasonal, SensorIndex, ThiThresholds,
};
use serde::{Deserialize, Serialize};

use crate::errors::{ConfigIssue, ConfigIssues};

/// Top-level JSON document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonal_gauges: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasons: Option<SeasonsDocument>,

    /// Gauges keyed by sensor name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub gauges: BTreeMap<String, GaugeDocument>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale: Option<StaleDocument>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thi: Option<ThiDocument>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_sec: Option<u64>,

    /// Refresh period for intervals that are not whole seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_ms: Option<u64>,
}

/// Season start days as MMDD integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeasonsDocument {
    pub spring: Option<u16>,
    pub summer: Option<u16>,
    pub autumn: Option<u16>,
    pub winter: Option<u16>,
}

/// One gauge; `min`/`max` are the default range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GaugeDocument {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f32>,

    /// Overrides keyed by season name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub seasonal: BTreeMap<String, RangeDocument>,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeDocument {
    pub min: f32,
    pub max: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaleDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_sec: Option<u64>,

    /// Threshold for values that are not whole seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f32>,

    /// Sensor names never flagged stale; replaces the default list when given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThiCutsDocument {
    pub cool_max: f32,
    pub comfy_max: f32,
    pub warm_max: f32,
}

impl From<ThiCutsDocument> for ThiThresholds {
    fn from(doc: ThiCutsDocument) -> Self {
        ThiThresholds::new(doc.cool_max, doc.comfy_max, doc.warm_max)
    }
}

impl From<&ThiThresholds> for ThiCutsDocument {
    fn from(thresholds: &ThiThresholds) -> Self {
        Self {
            cool_max: thresholds.cool_max,
            comfy_max: thresholds.comfy_max,
            warm_max: thresholds.warm_max,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThiDocument {
    pub cool_max: f32,
    pub comfy_max: f32,
    pub warm_max: f32,

    #[serde(default)]
    pub seasonal_enabled: bool,

    /// Per-season cut points keyed by season name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub seasonal: BTreeMap<String, ThiCutsDocument>,
}

impl ThiDocument {
    fn default_cuts(&self) -> ThiThresholds {
        ThiThresholds::new(self.cool_max, self.comfy_max, self.warm_max)
    }
}

impl ConfigDocument {
    /// Merge onto the defaults and validate, collecting every issue
    pub fn into_config(self) -> Result<DashboardConfig, ConfigIssues> {
        let mut issues = ConfigIssues::default();
        let mut config = DashboardConfig::default();

        if let Some(seasonal) = self.seasonal_gauges {
            config.seasonal_gauges = seasonal;
        }

        if let Some(seasons) = self.seasons {
            if let Some(boundaries) = seasons.build(&mut issues) {
                config.seasons = boundaries;
            }
        }

        for (name, gauge) in self.gauges {
            let Some(sensor) = SensorIndex::from_name(&name) else {
                issues.push(ConfigIssue::UnknownSensor(name));
                continue;
            };
            match gauge.build(sensor, &mut issues) {
                Some(spec) => {
                    if let Err(err) = config.gauges.insert(sensor, spec) {
                        issues.push(err);
                    }
                }
                None if !gauge.enabled => {
                    config.gauges.remove(sensor);
                }
                None => {}
            }
        }

        if let Some(stale) = self.stale {
            if let Some(threshold_ms) = millis(
                ("stale.threshold_sec", stale.threshold_sec),
                ("stale.threshold_ms", stale.threshold_ms),
                &mut issues,
            ) {
                config.stale.threshold_ms = threshold_ms;
            }
            if let Some(tolerance) = stale.tolerance {
                config.stale.tolerance = tolerance;
            }
            if let Some(names) = stale.exclude {
                config.stale.excluded = names
                    .into_iter()
                    .filter_map(|name| match SensorIndex::from_name(&name) {
                        Some(sensor) => Some(sensor),
                        None => {
                            issues.push(ConfigIssue::UnknownSensor(name));
                            None
                        }
                    })
                    .collect();
            }
        }

        if let Some(thi) = self.thi {
            config.thi.seasonal = thi.seasonal_enabled;
            config.thi.thresholds = Seasonal::new(thi.default_cuts());
            for (name, cuts) in thi.seasonal {
                match Season::from_name(&name) {
                    Some(season) => {
                        config.thi.thresholds.set_override(season, cuts.into());
                    }
                    None => issues.push(ConfigIssue::UnknownSeason(name)),
                }
            }
        }

        if let Some(minutes) = self.utc_offset_minutes {
            config.utc_offset_minutes = minutes;
        }
        if let Some(refresh_ms) = millis(
            ("refresh_sec", self.refresh_sec),
            ("refresh_ms", self.refresh_ms),
            &mut issues,
        ) {
            config.refresh_interval_ms = refresh_ms;
        }

        for err in config.problems() {
            issues.push(err);
        }

        if issues.is_empty() {
            Ok(config)
        } else {
            Err(issues)
        }
    }

    /// Fully spelled-out document for `config`
    ///
    /// Staleness threshold and refresh interval are written in seconds when
    /// they are whole seconds, in milliseconds otherwise.
    pub fn from_config(config: &DashboardConfig) -> Self {
        let gauges = config
            .gauges
            .iter()
            .map(|(sensor, spec)| (sensor.name().to_string(), GaugeDocument::from_spec(spec)))
            .collect();

        let thresholds = &config.thi.thresholds;
        let defaults = thresholds.default_value();
        let thi = ThiDocument {
            cool_max: defaults.cool_max,
            comfy_max: defaults.comfy_max,
            warm_max: defaults.warm_max,
            seasonal_enabled: config.thi.seasonal,
            seasonal: thresholds
                .overrides()
                .map(|(season, cuts)| (season.name().to_string(), cuts.into()))
                .collect(),
        };

        let (threshold_sec, threshold_ms) = split_millis(config.stale.threshold_ms);
        let (refresh_sec, refresh_ms) = split_millis(config.refresh_interval_ms);

        Self {
            seasonal_gauges: Some(config.seasonal_gauges),
            seasons: Some(SeasonsDocument {
                spring: Some(config.seasons.start_of(Season::Spring).into()),
                summer: Some(config.seasons.start_of(Season::Summer).into()),
                autumn: Some(config.seasons.start_of(Season::Autumn).into()),
                winter: Some(config.seasons.start_of(Season::Winter).into()),
            }),
            gauges,
            stale: Some(StaleDocument {
                threshold_sec,
                threshold_ms,
                tolerance: Some(config.stale.tolerance),
                exclude: Some(
                    config
                        .stale
                        .excluded
                        .iter()
                        .map(|sensor| sensor.name().to_string())
                        .collect(),
                ),
            }),
            thi: Some(thi),
            utc_offset_minutes: Some(config.utc_offset_minutes),
            refresh_sec,
            refresh_ms,
        }
    }
}

/// Duration from a seconds field or a milliseconds field, never both
fn millis(
    (sec_name, sec): (&'static str, Option<u64>),
    (ms_name, ms): (&'static str, Option<u64>),
    issues: &mut ConfigIssues,
) -> Option<u64> {
    match (sec, ms) {
        (Some(_), Some(_)) => {
            issues.push(ConfigIssue::ConflictingFields {
                first: sec_name,
                second: ms_name,
            });
            None
        }
        (Some(sec), None) => Some(sec.saturating_mul(MS_PER_SECOND)),
        (None, ms) => ms,
    }
}

/// Seconds field if `ms` is whole seconds, milliseconds field otherwise
fn split_millis(ms: u64) -> (Option<u64>, Option<u64>) {
    if ms % MS_PER_SECOND == 0 {
        (Some(ms / MS_PER_SECOND), None)
    } else {
        (None, Some(ms))
    }
}

impl SeasonsDocument {
    fn build(&self, issues: &mut ConfigIssues) -> Option<SeasonBoundaries> {
        let mut start = |season: Season, mmdd: Option<u16>| -> Option<MonthDay> {
            let Some(mmdd) = mmdd else {
                issues.push(ConfigError::MissingSeason { season });
                return None;
            };
            MonthDay::from_mmdd(mmdd)
                .map_err(|err| issues.push(err))
                .ok()
        };

        let spring = start(Season::Spring, self.spring);
        let summer = start(Season::Summer, self.summer);
        let autumn = start(Season::Autumn, self.autumn);
        let winter = start(Season::Winter, self.winter);

        match (spring, summer, autumn, winter) {
            (Some(spring), Some(summer), Some(autumn), Some(winter)) => {
                SeasonBoundaries::from_starts(spring, summer, autumn, winter)
                    .map_err(|err| issues.push(err))
                    .ok()
            }
            _ => None,
        }
    }
}

impl GaugeDocument {
    /// Spec for `sensor`, or `None` when the default range is missing
    ///
    /// A disabled gauge without bounds is not an error; the caller drops it
    /// from the table.
    fn build(&self, sensor: SensorIndex, issues: &mut ConfigIssues) -> Option<GaugeSpec> {
        let (min, max) = match (self.min, self.max) {
            (Some(min), Some(max)) => (min, max),
            _ if self.enabled => {
                issues.push(ConfigError::MissingDefaultRange { sensor });
                return None;
            }
            _ => return None,
        };

        let mut spec = if self.enabled {
            GaugeSpec::new(min, max)
        } else {
            GaugeSpec::disabled(min, max)
        };
        for (name, range) in &self.seasonal {
            match Season::from_name(name) {
                Some(season) => spec = spec.with_season(season, range.min, range.max),
                None => issues.push(ConfigIssue::UnknownSeason(name.clone())),
            }
        }
        Some(spec)
    }

    fn from_spec(spec: &GaugeSpec) -> Self {
        let GaugeRange { min, max } = spec.default_range();
        Self {
            enabled: spec.enabled,
            min: Some(min),
            max: Some(max),
            seasonal: spec
                .ranges
                .overrides()
                .map(|(season, range)| {
                    (
                        season.name().to_string(),
                        RangeDocument {
                            min: range.min,
                            max: range.max,
                        },
                    )
                })
                .collect(),
        }
    }
}
