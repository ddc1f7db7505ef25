//! Property tests over the whole calendar and value space

mod common;

use paperdash_core::{
    Band, MonthDay, Season, SeasonBoundaries, SensorIndex, StaleConfig, StaleStatus,
    StalenessDetector, ThiThresholds,
};
use proptest::prelude::*;

use common::standard_seasons;

fn month_day() -> impl Strategy<Value = MonthDay> {
    (1u8..=12, 1u8..=31).prop_filter_map("valid calendar day", |(m, d)| MonthDay::new(m, d).ok())
}

fn distinct_starts() -> impl Strategy<Value = [MonthDay; 4]> {
    prop::collection::btree_set(month_day(), 4).prop_map(|set| {
        let days: Vec<MonthDay> = set.into_iter().collect();
        [days[0], days[1], days[2], days[3]]
    })
}

proptest! {
    #[test]
    fn resolved_season_starts_on_or_before_today_or_wraps(today in month_day()) {
        let seasons = standard_seasons();
        let season = seasons.resolve(today);
        let start = seasons.start_of(season);

        if start <= today {
            // No other season starts between `start` and today
            for boundary in seasons.iter() {
                prop_assert!(!(boundary.start > start && boundary.start <= today));
            }
        } else {
            // Wrapped: today precedes every start and the latest season applies
            prop_assert_eq!(season, Season::Winter);
            for boundary in seasons.iter() {
                prop_assert!(today < boundary.start);
            }
        }
    }

    #[test]
    fn each_start_day_resolves_to_its_season(starts in distinct_starts(), rotate in 0usize..4) {
        // Rotate so any season can be the earliest
        let boundaries = SeasonBoundaries::from_starts(
            starts[rotate % 4],
            starts[(rotate + 1) % 4],
            starts[(rotate + 2) % 4],
            starts[(rotate + 3) % 4],
        ).unwrap();

        for season in Season::ALL {
            prop_assert_eq!(boundaries.resolve(boundaries.start_of(season)), season);
        }
    }

    #[test]
    fn thi_band_is_monotone(a in 30.0f32..100.0, b in 30.0f32..100.0) {
        let t = ThiThresholds::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(t.classify(lo) <= t.classify(hi));
        if hi <= t.cool_max {
            prop_assert_eq!(t.classify(hi), Band::Cool);
        }
    }

    #[test]
    fn never_stale_within_threshold(
        value in -50.0f32..50.0,
        offsets in prop::collection::vec(0u64..=600_000, 1..20),
    ) {
        let mut detector = StalenessDetector::new(StaleConfig::new(600_000)).unwrap();
        detector.observe(SensorIndex::OutdoorTemp, value, 0).unwrap();
        for offset in offsets {
            prop_assert_eq!(
                detector.evaluate(SensorIndex::OutdoorTemp, offset),
                Some(StaleStatus::Fresh)
            );
        }
    }
}
