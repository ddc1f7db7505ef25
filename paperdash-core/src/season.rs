//! Season Resolution
//!
//! ## Overview
//!
//! The year is split into four seasons by four start days. Days are compared
//! as MMDD ordinals (`month * 100 + day`), which keeps ordering independent of
//! the year and of leap days.
//!
//! ## Wrap-Around
//!
//! The season active on a day is the one whose start is the latest start on
//! or before that day. Days earlier than every start belong to the season
//! with the latest start, because that season runs across New Year:
//!
//! ```text
//!   0101        0204        0505        0807        1107        1231
//!    |  winter   | spring    | summer    | autumn    | winter     |
//!    └─ carried over from the previous year's 1107 start
//! ```
//!
//! ## Example
//!
//! ```rust
//! use paperdash_core::season::{MonthDay, Season, SeasonBoundaries};
//!
//! let seasons = SeasonBoundaries::from_starts(
//!     MonthDay::from_mmdd(204)?,
//!     MonthDay::from_mmdd(505)?,
//!     MonthDay::from_mmdd(807)?,
//!     MonthDay::from_mmdd(1107)?,
//! )?;
//!
//! assert_eq!(seasons.resolve(MonthDay::new(1, 15)?), Season::Winter);
//! assert_eq!(seasons.resolve(MonthDay::new(3, 1)?), Season::Spring);
//! # Ok::<(), paperdash_core::ConfigError>(())
//! ```

use core::fmt;

use crate::constants::{
    DEFAULT_AUTUMN_START_MMDD, DEFAULT_SPRING_START_MMDD, DEFAULT_SUMMER_START_MMDD,
    DEFAULT_WINTER_START_MMDD,
};
use crate::errors::{ConfigError, ConfigResult};

/// One of the four gauge-range seasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Season {
    /// Spring
    Spring,
    /// Summer
    Summer,
    /// Autumn
    Autumn,
    /// Winter
    Winter,
}

impl Season {
    /// All seasons in calendar-name order
    pub const ALL: [Season; 4] = [Self::Spring, Self::Summer, Self::Autumn, Self::Winter];

    /// Slot for per-season tables
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Configuration name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }

    /// Look a season up by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|season| season.name() == name)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Calendar day without a year
///
/// Ordering follows the MMDD ordinal. February 29 is a valid day; in
/// non-leap years it simply never occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u16", into = "u16"))]
pub struct MonthDay {
    month: u8,
    day: u8,
}

impl MonthDay {
    /// Validated constructor
    pub const fn new(month: u8, day: u8) -> ConfigResult<Self> {
        if month == 0 || month > 12 || day == 0 || day > days_in_month(month) {
            return Err(ConfigError::InvalidMonthDay {
                mmdd: month as u16 * 100 + day as u16,
            });
        }
        Ok(Self { month, day })
    }

    /// Parse the MMDD convention used by configuration (`1107` = Nov 7)
    pub const fn from_mmdd(mmdd: u16) -> ConfigResult<Self> {
        if mmdd > 1231 {
            return Err(ConfigError::InvalidMonthDay { mmdd });
        }
        Self::new((mmdd / 100) as u8, (mmdd % 100) as u8)
    }

    /// Constructor for compile-time constants known to be valid
    pub(crate) const fn from_mmdd_unchecked(mmdd: u16) -> Self {
        Self {
            month: (mmdd / 100) as u8,
            day: (mmdd % 100) as u8,
        }
    }

    /// Month, 1-12
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Day of month, 1-31
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// MMDD ordinal
    pub const fn ordinal(&self) -> u16 {
        self.month as u16 * 100 + self.day as u16
    }

    /// Month/day of a calendar date
    #[cfg(feature = "chrono")]
    pub fn from_date<D: chrono::Datelike>(date: &D) -> Self {
        // chrono guarantees month 1-12 and a day valid for that month
        Self {
            month: date.month() as u8,
            day: date.day() as u8,
        }
    }

    /// Local month/day of a wall-clock timestamp (ms since Unix epoch)
    ///
    /// Returns `None` for an out-of-range timestamp or offset.
    #[cfg(feature = "chrono")]
    pub fn from_timestamp(timestamp: crate::time::Timestamp, utc_offset_minutes: i32) -> Option<Self> {
        let offset = chrono::FixedOffset::east_opt(utc_offset_minutes.checked_mul(60)?)?;
        let millis = i64::try_from(timestamp).ok()?;
        let utc = chrono::DateTime::from_timestamp_millis(millis)?;
        Some(Self::from_date(&utc.with_timezone(&offset)))
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl TryFrom<u16> for MonthDay {
    type Error = ConfigError;

    fn try_from(mmdd: u16) -> ConfigResult<Self> {
        Self::from_mmdd(mmdd)
    }
}

impl From<MonthDay> for u16 {
    fn from(day: MonthDay) -> u16 {
        day.ordinal()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MonthDay {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=u16}", self.ordinal())
    }
}

const fn days_in_month(month: u8) -> u8 {
    match month {
        2 => 29,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Start day of one season
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeasonBoundary {
    /// Season starting on `start`
    pub season: Season,
    /// First day of the season
    pub start: MonthDay,
}

impl SeasonBoundary {
    /// Pair a season with its start day
    pub const fn new(season: Season, start: MonthDay) -> Self {
        Self { season, start }
    }
}

/// Four validated season boundaries, kept sorted by start day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonBoundaries {
    sorted: [SeasonBoundary; 4],
    /// Start days indexed by `Season::index()`
    starts: [MonthDay; 4],
}

impl Default for SeasonBoundaries {
    fn default() -> Self {
        let starts = [
            MonthDay::from_mmdd_unchecked(DEFAULT_SPRING_START_MMDD),
            MonthDay::from_mmdd_unchecked(DEFAULT_SUMMER_START_MMDD),
            MonthDay::from_mmdd_unchecked(DEFAULT_AUTUMN_START_MMDD),
            MonthDay::from_mmdd_unchecked(DEFAULT_WINTER_START_MMDD),
        ];
        Self {
            sorted: [
                SeasonBoundary::new(Season::Spring, starts[Season::Spring.index()]),
                SeasonBoundary::new(Season::Summer, starts[Season::Summer.index()]),
                SeasonBoundary::new(Season::Autumn, starts[Season::Autumn.index()]),
                SeasonBoundary::new(Season::Winter, starts[Season::Winter.index()]),
            ],
            starts,
        }
    }
}

impl SeasonBoundaries {
    /// Validate four boundaries given in any order
    ///
    /// Each season must appear exactly once and no two may share a start day.
    pub fn new(boundaries: [SeasonBoundary; 4]) -> ConfigResult<Self> {
        let mut seen = [false; 4];
        for boundary in &boundaries {
            let slot = &mut seen[boundary.season.index()];
            if *slot {
                return Err(ConfigError::DuplicateSeason { season: boundary.season });
            }
            *slot = true;
        }

        // Four boundaries without a repeated season cover every slot
        let mut starts = [boundaries[0].start; 4];
        for boundary in &boundaries {
            starts[boundary.season.index()] = boundary.start;
        }

        let mut sorted = boundaries;
        sorted.sort_unstable_by_key(|boundary| boundary.start);

        for pair in sorted.windows(2) {
            if pair[0].start == pair[1].start {
                return Err(ConfigError::AmbiguousSeasonBoundary {
                    first: pair[0].season,
                    second: pair[1].season,
                    start: pair[0].start,
                });
            }
        }

        Ok(Self { sorted, starts })
    }

    /// Validate boundaries given per season
    pub fn from_starts(
        spring: MonthDay,
        summer: MonthDay,
        autumn: MonthDay,
        winter: MonthDay,
    ) -> ConfigResult<Self> {
        Self::new([
            SeasonBoundary::new(Season::Spring, spring),
            SeasonBoundary::new(Season::Summer, summer),
            SeasonBoundary::new(Season::Autumn, autumn),
            SeasonBoundary::new(Season::Winter, winter),
        ])
    }

    /// Season active on `today`
    pub fn resolve(&self, today: MonthDay) -> Season {
        match self.sorted.iter().rev().find(|boundary| boundary.start <= today) {
            Some(boundary) => boundary.season,
            // Before the earliest start: the latest-starting season wraps over New Year
            None => self.sorted[3].season,
        }
    }

    /// Start day of a season
    pub fn start_of(&self, season: Season) -> MonthDay {
        self.starts[season.index()]
    }

    /// Boundaries in start-day order
    pub fn iter(&self) -> impl Iterator<Item = &SeasonBoundary> {
        self.sorted.iter()
    }
}

/// Resolve the season for `today` from four unsorted boundaries
///
/// Fails if the boundaries are ambiguous or don't cover each season once.
pub fn resolve_season(today: MonthDay, boundaries: &[SeasonBoundary; 4]) -> ConfigResult<Season> {
    SeasonBoundaries::new(*boundaries).map(|seasons| seasons.resolve(today))
}
