use crate::charts::{render, DashboardCharts};
use crate::color::ColorMap;
use crate::config::DataSource;
use crate::data::error::DataLoadError;
use crate::data::filter::{batter_options, BatterSelection, ChartScope};
use crate::data::loader::load_file;
use crate::data::model::BattedBallDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Where the current dataset was (or will be) read from.
    pub source: DataSource,

    /// Loaded dataset (None until a file loads).
    pub dataset: Option<BattedBallDataset>,

    /// Choices for the batter selector, sentinel first.
    pub batter_options: Vec<BatterSelection>,

    /// Current batter selection.
    pub selection: BatterSelection,

    /// Whether the velocity and launch-angle charts follow the selection.
    pub scope: ChartScope,

    /// Outcome colours shared by all charts.
    pub color_map: ColorMap,

    /// Charts for the current selection (cached until the next interaction).
    pub charts: Option<DashboardCharts>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(source: DataSource) -> Self {
        Self {
            source,
            dataset: None,
            batter_options: vec![BatterSelection::All],
            selection: BatterSelection::All,
            scope: ChartScope::default(),
            color_map: ColorMap::default(),
            charts: None,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset, reset the selection and redraw.
    pub fn set_dataset(&mut self, dataset: BattedBallDataset) {
        self.batter_options = batter_options(&dataset);
        self.color_map = ColorMap::new(&dataset.outcomes());
        self.selection = BatterSelection::All;
        self.dataset = Some(dataset);
        self.status_message = None;
        self.rebuild_charts();
    }

    /// Load `source`, replacing the current dataset on success.
    ///
    /// On failure the previous dataset stays on screen and the error is
    /// shown in the status bar.
    pub fn load(&mut self, source: DataSource) -> Result<(), DataLoadError> {
        match load_file(&source) {
            Ok(dataset) => {
                self.source = source;
                self.set_dataset(dataset);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", source.path.display());
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    /// Re-read the current source from disk.
    pub fn reload(&mut self) -> Result<(), DataLoadError> {
        let source = self.source.clone();
        let previous = self.selection.clone();
        self.load(source)?;
        // Keep the batter if they are still in the file.
        if self.batter_options.contains(&previous) {
            self.select_batter(previous);
        }
        Ok(())
    }

    pub fn select_batter(&mut self, selection: BatterSelection) {
        if self.selection != selection {
            self.selection = selection;
            self.rebuild_charts();
        }
    }

    pub fn set_scope(&mut self, scope: ChartScope) {
        if self.scope != scope {
            self.scope = scope;
            self.rebuild_charts();
        }
    }

    /// Re-run filter → aggregate → chart layout for the current selection.
    pub fn rebuild_charts(&mut self) {
        self.charts = self.dataset.as_ref().map(|ds| {
            log::debug!("Rebuilding charts for {} ({:?})", self.selection, self.scope);
            render(ds, &self.selection, self.scope, &self.color_map)
        });
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::event;

    fn dataset() -> BattedBallDataset {
        BattedBallDataset::from_events(vec![
            event("A", Some("Out"), Some(90.0), Some(5.0)),
            event("A", Some("Single"), Some(98.0), Some(14.0)),
            event("B", Some("Out"), Some(85.0), Some(-20.0)),
        ])
    }

    fn pie_total(state: &AppState) -> usize {
        state.charts.as_ref().unwrap().distribution.as_ref().unwrap().total
    }

    #[test]
    fn test_new_state_has_sentinel_only() {
        let state = AppState::new(DataSource::default());
        assert_eq!(state.batter_options, vec![BatterSelection::All]);
        assert!(state.charts.is_none());
    }

    #[test]
    fn test_set_dataset_builds_charts() {
        let mut state = AppState::new(DataSource::default());
        state.set_dataset(dataset());
        assert_eq!(state.batter_options.len(), 3);
        assert_eq!(state.selection, BatterSelection::All);
        assert_eq!(pie_total(&state), 3);
    }

    #[test]
    fn test_selection_change_rebuilds() {
        let mut state = AppState::new(DataSource::default());
        state.set_dataset(dataset());
        state.select_batter(BatterSelection::Batter("B".into()));
        assert_eq!(pie_total(&state), 1);
        state.select_batter(BatterSelection::All);
        assert_eq!(pie_total(&state), 3);
    }

    #[test]
    fn test_scope_toggle() {
        let mut state = AppState::new(DataSource::default());
        state.set_dataset(dataset());
        state.select_batter(BatterSelection::Batter("B".into()));
        let full = state.charts.as_ref().unwrap().tables.launch.len();
        state.set_scope(ChartScope::SelectedBatter);
        let narrowed = state.charts.as_ref().unwrap().tables.launch.len();
        assert_eq!((full, narrowed), (3, 1));
    }

    #[test]
    fn test_failed_load_keeps_previous_dataset() {
        let mut state = AppState::new(DataSource::default());
        state.set_dataset(dataset());

        let missing = DataSource::default().with_path("/no/such/file.xlsx".into());
        assert!(state.load(missing).is_err());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
        assert_eq!(state.dataset.as_ref().unwrap().len(), 3);
        assert!(state.charts.is_some());
    }

    #[test]
    fn test_reload_keeps_selection() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "BATTER,PLAY_OUTCOME,EXIT_SPEED,LAUNCH_ANGLE").unwrap();
        writeln!(file, "A,Out,90,5").unwrap();
        writeln!(file, "B,Single,99,12").unwrap();
        file.flush().unwrap();

        let mut state = AppState::new(DataSource::default());
        state
            .load(DataSource::default().with_path(file.path().to_path_buf()))
            .unwrap();
        state.select_batter(BatterSelection::Batter("B".into()));

        writeln!(file, "B,Double,103,20").unwrap();
        file.flush().unwrap();
        state.reload().unwrap();

        assert_eq!(state.selection, BatterSelection::Batter("B".into()));
        assert_eq!(pie_total(&state), 2);
    }
}
