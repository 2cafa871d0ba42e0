use std::collections::BTreeSet;
use std::fmt;

use super::model::{BattedBallDataset, BattedBallEvent};

pub const ALL_BATTERS: &str = "All Batters";

// ---------------------------------------------------------------------------
// Batter selection
// ---------------------------------------------------------------------------

/// The value of the "Select a Batter" control.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BatterSelection {
    /// Sentinel: no filter.
    #[default]
    All,
    Batter(String),
}

impl fmt::Display for BatterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatterSelection::All => write!(f, "{ALL_BATTERS}"),
            BatterSelection::Batter(name) => write!(f, "{name}"),
        }
    }
}

/// Which events feed the velocity and launch-angle charts.
///
/// The outcome distribution always follows the batter selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartScope {
    #[default]
    FullDataset,
    SelectedBatter,
}

/// Choices for the selector: the sentinel first, then the distinct
/// non-missing batters in sorted order.
pub fn batter_options(dataset: &BattedBallDataset) -> Vec<BatterSelection> {
    let batters: BTreeSet<&str> = dataset
        .events
        .iter()
        .filter_map(|e| e.batter.as_deref())
        .collect();

    std::iter::once(BatterSelection::All)
        .chain(batters.into_iter().map(|b| BatterSelection::Batter(b.to_string())))
        .collect()
}

/// Events visible under `selection`.
///
/// * `All` → every event, in source order
/// * `Batter(name)` → only events whose batter equals `name`; events without
///   a batter never match
pub fn filter_by_batter<'a>(
    dataset: &'a BattedBallDataset,
    selection: &BatterSelection,
) -> Vec<&'a BattedBallEvent> {
    match selection {
        BatterSelection::All => dataset.events.iter().collect(),
        BatterSelection::Batter(name) => dataset
            .events
            .iter()
            .filter(|e| e.batter.as_deref() == Some(name.as_str()))
            .collect(),
    }
}

/// Events feeding the velocity and launch-angle charts under `scope`.
pub fn events_for_scope<'a>(
    dataset: &'a BattedBallDataset,
    selection: &BatterSelection,
    scope: ChartScope,
) -> Vec<&'a BattedBallEvent> {
    match scope {
        ChartScope::FullDataset => filter_by_batter(dataset, &BatterSelection::All),
        ChartScope::SelectedBatter => filter_by_batter(dataset, selection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::event;

    fn dataset() -> BattedBallDataset {
        let mut unnamed = event("x", Some("Out"), Some(80.0), Some(3.0));
        unnamed.batter = None;
        BattedBallDataset::from_events(vec![
            event("Smith", Some("Out"), Some(90.0), Some(10.0)),
            event("Adams", Some("Single"), Some(98.0), None),
            event("Smith", Some("Double"), None, Some(20.0)),
            unnamed,
        ])
    }

    #[test]
    fn test_options_sentinel_first_then_sorted() {
        let opts = batter_options(&dataset());
        assert_eq!(
            opts,
            vec![
                BatterSelection::All,
                BatterSelection::Batter("Adams".into()),
                BatterSelection::Batter("Smith".into()),
            ]
        );
        assert_eq!(opts[0].to_string(), "All Batters");
    }

    #[test]
    fn test_options_for_empty_dataset() {
        let ds = BattedBallDataset::from_events(vec![]);
        assert_eq!(batter_options(&ds), vec![BatterSelection::All]);
    }

    #[test]
    fn test_all_returns_everything() {
        let ds = dataset();
        assert_eq!(filter_by_batter(&ds, &BatterSelection::All).len(), 4);
    }

    #[test]
    fn test_single_batter() {
        let ds = dataset();
        let smith = filter_by_batter(&ds, &BatterSelection::Batter("Smith".into()));
        assert_eq!(smith.len(), 2);
        assert!(smith.iter().all(|e| e.batter.as_deref() == Some("Smith")));
    }

    #[test]
    fn test_unknown_batter_is_empty() {
        let ds = dataset();
        assert!(filter_by_batter(&ds, &BatterSelection::Batter("Nobody".into())).is_empty());
    }

    #[test]
    fn test_scope() {
        let ds = dataset();
        let sel = BatterSelection::Batter("Adams".into());
        assert_eq!(events_for_scope(&ds, &sel, ChartScope::FullDataset).len(), 4);
        assert_eq!(events_for_scope(&ds, &sel, ChartScope::SelectedBatter).len(), 1);
    }
}
