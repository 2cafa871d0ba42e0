use std::collections::BTreeMap;

use serde::Serialize;

use super::model::BattedBallEvent;

// ---------------------------------------------------------------------------
// Derived tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeCount {
    pub outcome: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeAvgSpeed {
    pub outcome: String,
    pub avg_exit_speed: f64,
    /// Rows that contributed to the mean.
    pub samples: usize,
    pub min_exit_speed: f64,
    pub max_exit_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchPoint {
    pub launch_angle: f64,
    pub exit_speed: f64,
    pub outcome: String,
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Frequency of each outcome; rows without an outcome are skipped.
///
/// Sorted by count (descending), then outcome, so the result is stable
/// between runs.
pub fn outcome_distribution<'a>(
    events: impl IntoIterator<Item = &'a BattedBallEvent>,
) -> Vec<OutcomeCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for outcome in events.into_iter().filter_map(|e| e.play_outcome.as_deref()) {
        *counts.entry(outcome).or_default() += 1;
    }

    let mut result: Vec<OutcomeCount> = counts
        .into_iter()
        .map(|(outcome, count)| OutcomeCount {
            outcome: outcome.to_string(),
            count,
        })
        .collect();
    // BTreeMap order is the tie-break; sort_by is stable.
    result.sort_by(|a, b| b.count.cmp(&a.count));
    result
}

#[derive(Default)]
struct SpeedGroup {
    sum: f64,
    samples: usize,
    min: f64,
    max: f64,
}

/// Mean exit speed per outcome over rows that have both values, sorted by
/// outcome.
pub fn exit_speed_by_outcome<'a>(
    events: impl IntoIterator<Item = &'a BattedBallEvent>,
) -> Vec<OutcomeAvgSpeed> {
    let mut groups: BTreeMap<&str, SpeedGroup> = BTreeMap::new();
    for (outcome, speed) in events
        .into_iter()
        .filter_map(|e| Some((e.play_outcome.as_deref()?, e.exit_speed?)))
    {
        let group = groups.entry(outcome).or_insert(SpeedGroup {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            ..SpeedGroup::default()
        });
        group.sum += speed;
        group.samples += 1;
        group.min = group.min.min(speed);
        group.max = group.max.max(speed);
    }

    groups
        .into_iter()
        .map(|(outcome, g)| OutcomeAvgSpeed {
            outcome: outcome.to_string(),
            avg_exit_speed: g.sum / g.samples as f64,
            samples: g.samples,
            min_exit_speed: g.min,
            max_exit_speed: g.max,
        })
        .collect()
}

/// One point per row with launch angle, exit speed and outcome all present,
/// in source order.
pub fn launch_points<'a>(
    events: impl IntoIterator<Item = &'a BattedBallEvent>,
) -> Vec<LaunchPoint> {
    events
        .into_iter()
        .filter_map(|e| {
            Some(LaunchPoint {
                launch_angle: e.launch_angle?,
                exit_speed: e.exit_speed?,
                outcome: e.play_outcome.clone()?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::data::filter::{filter_by_batter, BatterSelection};
    use crate::data::model::{event, BattedBallDataset};

    fn worked_example() -> BattedBallDataset {
        BattedBallDataset::from_events(vec![
            event("A", Some("Out"), Some(90.0), None),
            event("A", Some("Single"), Some(98.0), None),
            event("B", Some("Out"), Some(85.0), None),
        ])
    }

    fn counts(result: &[OutcomeCount]) -> Vec<(&str, usize)> {
        result.iter().map(|c| (c.outcome.as_str(), c.count)).collect()
    }

    #[test]
    fn test_worked_example() {
        let ds = worked_example();

        let all = outcome_distribution(filter_by_batter(&ds, &BatterSelection::All));
        assert_eq!(counts(&all), vec![("Out", 2), ("Single", 1)]);

        let a = outcome_distribution(filter_by_batter(&ds, &BatterSelection::Batter("A".into())));
        assert_eq!(counts(&a), vec![("Out", 1), ("Single", 1)]);

        let velo = exit_speed_by_outcome(&ds.events);
        assert_eq!(velo.len(), 2);
        assert_eq!(velo[0].outcome, "Out");
        assert_relative_eq!(velo[0].avg_exit_speed, 87.5);
        assert_eq!(velo[1].outcome, "Single");
        assert_relative_eq!(velo[1].avg_exit_speed, 98.0);
    }

    #[test]
    fn test_distribution_skips_missing_outcome() {
        let events = vec![
            event("A", Some("Out"), None, None),
            event("A", None, Some(99.0), Some(10.0)),
        ];
        assert_eq!(counts(&outcome_distribution(&events)), vec![("Out", 1)]);
    }

    #[test]
    fn test_distribution_of_nothing_is_empty() {
        assert!(outcome_distribution(&Vec::<BattedBallEvent>::new()).is_empty());
    }

    #[test]
    fn test_velocity_drops_rows_missing_either_column() {
        let events = vec![
            event("A", Some("Out"), Some(80.0), None),
            event("A", Some("Out"), None, Some(5.0)),
            event("A", None, Some(120.0), None),
            event("B", Some("Triple"), Some(104.0), Some(22.0)),
        ];
        let velo = exit_speed_by_outcome(&events);
        assert_eq!(velo.len(), 2);
        assert_eq!(velo[0].samples, 1);
        assert_relative_eq!(velo[0].avg_exit_speed, 80.0);
        assert_eq!(velo[1].outcome, "Triple");
    }

    #[test]
    fn test_launch_points_need_all_three() {
        let events = vec![
            event("A", Some("Out"), Some(80.0), Some(-40.0)),
            event("A", Some("Out"), None, Some(5.0)),
            event("A", None, Some(100.0), Some(15.0)),
            event("A", Some("Home Run"), Some(108.0), None),
            event("B", Some("Single"), Some(95.0), Some(12.0)),
        ];
        let points = launch_points(&events);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].launch_angle, -40.0);
        assert_eq!(points[1].outcome, "Single");
    }

    #[test]
    fn test_views_filter_independently() {
        // Missing launch angle still counts toward the velocity chart.
        let events = vec![event("A", Some("Out"), Some(90.0), None)];
        assert_eq!(exit_speed_by_outcome(&events).len(), 1);
        assert!(launch_points(&events).is_empty());
        assert_eq!(exit_speed_by_outcome(&events).len(), 1);
    }

    // -- property tests --

    const OUTCOMES: [&str; 4] = ["Out", "Single", "Double", "Fielder's Choice"];

    fn arb_event() -> impl Strategy<Value = BattedBallEvent> {
        (
            prop::sample::select(vec!["A", "B", "C"]),
            prop::option::of(prop::sample::select(OUTCOMES.to_vec())),
            prop::option::of(40.0f64..120.0),
            prop::option::of(-90.0f64..90.0),
        )
            .prop_map(|(b, o, s, a)| event(b, o, s, a))
    }

    fn arb_events() -> impl Strategy<Value = Vec<BattedBallEvent>> {
        prop::collection::vec(arb_event(), 0..60)
    }

    fn has_launch_point(e: &BattedBallEvent) -> bool {
        e.launch_angle.is_some() && e.exit_speed.is_some() && e.play_outcome.is_some()
    }

    proptest! {
        #[test]
        fn prop_counts_sum_to_rows_with_outcome(events in arb_events()) {
            let ds = BattedBallDataset::from_events(events);
            for sel in crate::data::filter::batter_options(&ds) {
                let filtered = filter_by_batter(&ds, &sel);
                let total: usize = outcome_distribution(filtered.iter().copied())
                    .iter()
                    .map(|c| c.count)
                    .sum();
                let expected = filtered.iter().filter(|e| e.play_outcome.is_some()).count();
                prop_assert_eq!(total, expected);
            }
        }

        #[test]
        fn prop_all_batters_matches_no_filter(events in arb_events()) {
            let ds = BattedBallDataset::from_events(events);
            let all = outcome_distribution(filter_by_batter(&ds, &BatterSelection::All));
            prop_assert_eq!(all, outcome_distribution(&ds.events));
        }

        #[test]
        fn prop_single_batter_total_bounded(events in arb_events()) {
            let ds = BattedBallDataset::from_events(events);
            let total = |sel: &BatterSelection| -> usize {
                outcome_distribution(filter_by_batter(&ds, sel)).iter().map(|c| c.count).sum()
            };
            let all_total = total(&BatterSelection::All);
            for sel in crate::data::filter::batter_options(&ds).iter().skip(1) {
                let own = total(sel);
                prop_assert!(own <= all_total);
                let others = ds.events.iter().any(|e| {
                    let batter = BatterSelection::Batter(e.batter.clone().unwrap_or_default());
                    e.play_outcome.is_some() && sel != &batter
                });
                if others {
                    prop_assert!(own < all_total);
                }
            }
        }

        #[test]
        fn prop_mean_within_group_bounds(events in arb_events()) {
            for row in exit_speed_by_outcome(&events) {
                prop_assert!(row.samples > 0);
                prop_assert!(row.avg_exit_speed >= row.min_exit_speed - 1e-9);
                prop_assert!(row.avg_exit_speed <= row.max_exit_speed + 1e-9);
            }
        }

        #[test]
        fn prop_scatter_count(events in arb_events()) {
            let complete = events.iter().filter(|e| has_launch_point(e)).count();
            let missing = events.iter().filter(|e| !has_launch_point(e)).count();
            let points = launch_points(&events);
            prop_assert_eq!(points.len(), complete);
            prop_assert_eq!(points.len(), events.len() - missing);
        }
    }
}
