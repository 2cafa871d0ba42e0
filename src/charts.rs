use std::ops::RangeInclusive;

use eframe::egui::Color32;
use serde::Serialize;
use thiserror::Error;

use crate::color::ColorMap;
use crate::data::aggregate::{
    exit_speed_by_outcome, launch_points, outcome_distribution, LaunchPoint, OutcomeAvgSpeed,
    OutcomeCount,
};
use crate::data::filter::{events_for_scope, filter_by_batter, BatterSelection, ChartScope};
use crate::data::model::BattedBallDataset;

pub const VELOCITY_TITLE: &str = "Average Exit Speed by Play Outcome";
pub const LAUNCH_TITLE: &str = "Launch Angle vs Exit Speed Colored by Play Outcome";
pub const OUTCOME_LABEL: &str = "Outcome";
pub const AVG_SPEED_LABEL: &str = "Avg Exit Velocity (mph)";
pub const LAUNCH_ANGLE_LABEL: &str = "Launch Angle (°)";
pub const EXIT_SPEED_LABEL: &str = "Exit Velocity (mph)";

/// Fixed y-axis of the velocity bars, in mph.
pub const VELOCITY_Y_RANGE: RangeInclusive<f64> = 60.0..=110.0;
/// Fixed x-axis of the launch-angle scatter, in degrees.
pub const LAUNCH_X_RANGE: RangeInclusive<f64> = -90.0..=90.0;

/// A chart that could not be built. The other charts are unaffected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error("{view}: non-finite value {value} for outcome '{outcome}'")]
    NonFinite {
        view: &'static str,
        outcome: String,
        value: f64,
    },
}

// ---------------------------------------------------------------------------
// Chart specifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub outcome: String,
    pub count: usize,
    /// Start and end of the slice as fractions of a full turn, clockwise
    /// from twelve o'clock.
    pub start: f64,
    pub end: f64,
    pub color: Color32,
}

impl PieSlice {
    pub fn fraction(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
    pub total: usize,
}

impl PieChart {
    /// Slice under a position given as a fraction of a full turn.
    pub fn slice_at(&self, turn: f64) -> Option<&PieSlice> {
        let turn = turn.rem_euclid(1.0);
        self.slices
            .iter()
            .find(|s| turn >= s.start && turn < s.end)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSpec {
    pub outcome: String,
    pub value: f64,
    pub samples: usize,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub y_range: RangeInclusive<f64>,
    pub bars: Vec<BarSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub outcome: String,
    pub color: Color32,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub x_range: RangeInclusive<f64>,
    /// Fitted to the data; `None` when there are no points.
    pub y_range: Option<RangeInclusive<f64>>,
    /// One series per outcome, sorted by outcome.
    pub series: Vec<ScatterSeries>,
}

impl ScatterChart {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

/// The aggregated tables behind the three charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedTables {
    pub distribution: Vec<OutcomeCount>,
    pub velocity: Vec<OutcomeAvgSpeed>,
    pub launch: Vec<LaunchPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardCharts {
    pub distribution: Result<PieChart, ViewError>,
    pub velocity: Result<BarChart, ViewError>,
    pub launch: Result<ScatterChart, ViewError>,
    pub tables: DerivedTables,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Filter, aggregate and lay out all three charts for one selection.
///
/// Each aggregation reads the same immutable dataset, so the order in which
/// they run does not matter.
pub fn render(
    dataset: &BattedBallDataset,
    selection: &BatterSelection,
    scope: ChartScope,
    colors: &ColorMap,
) -> DashboardCharts {
    let by_batter = filter_by_batter(dataset, selection);
    let scoped = events_for_scope(dataset, selection, scope);

    let tables = DerivedTables {
        distribution: outcome_distribution(by_batter.iter().copied()),
        velocity: exit_speed_by_outcome(scoped.iter().copied()),
        launch: launch_points(scoped.iter().copied()),
    };

    let dropped_velocity = scoped.len() - tables.velocity.iter().map(|r| r.samples).sum::<usize>();
    let dropped_launch = scoped.len() - tables.launch.len();
    if dropped_velocity > 0 || dropped_launch > 0 {
        log::warn!(
            "Dropped rows with missing values: {dropped_velocity} from velocity chart, \
             {dropped_launch} from launch-angle chart"
        );
    }

    let suffix = match (scope, selection) {
        (ChartScope::SelectedBatter, BatterSelection::Batter(name)) => format!(" ({name})"),
        _ => String::new(),
    };

    DashboardCharts {
        distribution: Ok(pie_chart(selection, &tables.distribution, colors)),
        velocity: bar_chart(&tables.velocity, colors, &suffix),
        launch: scatter_chart(&tables.launch, colors, &suffix),
        tables,
    }
}

pub fn pie_chart(
    selection: &BatterSelection,
    counts: &[OutcomeCount],
    colors: &ColorMap,
) -> PieChart {
    let total: usize = counts.iter().map(|c| c.count).sum();
    let mut start = 0.0;
    let slices = counts
        .iter()
        .filter(|c| c.count > 0)
        .map(|c| {
            let end = start + c.count as f64 / total as f64;
            let slice = PieSlice {
                outcome: c.outcome.clone(),
                count: c.count,
                start,
                end,
                color: colors.color_for(&c.outcome),
            };
            start = end;
            slice
        })
        .collect::<Vec<_>>();

    PieChart {
        title: format!("Distribution for {selection}"),
        slices,
        total,
    }
}

pub fn bar_chart(
    rows: &[OutcomeAvgSpeed],
    colors: &ColorMap,
    title_suffix: &str,
) -> Result<BarChart, ViewError> {
    let bars = rows
        .iter()
        .map(|r| {
            if !r.avg_exit_speed.is_finite() {
                return Err(ViewError::NonFinite {
                    view: VELOCITY_TITLE,
                    outcome: r.outcome.clone(),
                    value: r.avg_exit_speed,
                });
            }
            Ok(BarSpec {
                outcome: r.outcome.clone(),
                value: r.avg_exit_speed,
                samples: r.samples,
                color: colors.color_for(&r.outcome),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BarChart {
        title: format!("{VELOCITY_TITLE}{title_suffix}"),
        x_label: OUTCOME_LABEL,
        y_label: AVG_SPEED_LABEL,
        y_range: VELOCITY_Y_RANGE,
        bars,
    })
}

pub fn scatter_chart(
    points: &[LaunchPoint],
    colors: &ColorMap,
    title_suffix: &str,
) -> Result<ScatterChart, ViewError> {
    let mut series: Vec<ScatterSeries> = Vec::new();
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for p in points {
        for value in [p.launch_angle, p.exit_speed] {
            if !value.is_finite() {
                return Err(ViewError::NonFinite {
                    view: LAUNCH_TITLE,
                    outcome: p.outcome.clone(),
                    value,
                });
            }
        }
        y_min = y_min.min(p.exit_speed);
        y_max = y_max.max(p.exit_speed);

        let idx = match series.binary_search_by(|s| s.outcome.as_str().cmp(&p.outcome)) {
            Ok(i) => i,
            Err(i) => {
                series.insert(
                    i,
                    ScatterSeries {
                        outcome: p.outcome.clone(),
                        color: colors.color_for(&p.outcome),
                        points: Vec::new(),
                    },
                );
                i
            }
        };
        series[idx].points.push([p.launch_angle, p.exit_speed]);
    }

    let y_range = (!points.is_empty()).then(|| {
        let pad = ((y_max - y_min) * 0.05).max(1.0);
        (y_min - pad)..=(y_max + pad)
    });

    Ok(ScatterChart {
        title: format!("{LAUNCH_TITLE}{title_suffix}"),
        x_label: LAUNCH_ANGLE_LABEL,
        y_label: EXIT_SPEED_LABEL,
        x_range: LAUNCH_X_RANGE,
        y_range,
        series,
    })
}
