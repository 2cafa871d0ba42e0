use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use super::error::DataLoadError;

/// Column holding the batter identifier.
pub const BATTER: &str = "BATTER";
/// Column holding the categorical play outcome.
pub const PLAY_OUTCOME: &str = "PLAY_OUTCOME";
/// Column holding the exit speed in mph.
pub const EXIT_SPEED: &str = "EXIT_SPEED";
/// Column holding the launch angle in degrees.
pub const LAUNCH_ANGLE: &str = "LAUNCH_ANGLE";

pub const REQUIRED_COLUMNS: [&str; 4] = [BATTER, PLAY_OUTCOME, EXIT_SPEED, LAUNCH_ANGLE];

static NULL_CELL: CellValue = CellValue::Null;

/// Text that reads as "no value", matched exactly after trimming.
///
/// Same set the usual dataframe readers treat as NA by default.
const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether `text` is one of the NA markers.
pub fn is_na_token(text: &str) -> bool {
    NA_TOKENS.contains(&text.trim())
}

// ---------------------------------------------------------------------------
// CellValue – a single raw cell before validation
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as produced by the file readers.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Empty cells, blank strings, NA markers and NaN all count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => is_na_token(s),
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Interpret the cell as an optional number.
    ///
    /// Returns `Err(())` when the cell holds something that is present but not
    /// numeric; the caller attaches row / column context.
    fn to_number(&self) -> Result<Option<f64>, ()> {
        if self.is_missing() {
            return Ok(None);
        }
        match self {
            CellValue::Float(v) if v.is_finite() => Ok(Some(*v)),
            CellValue::Integer(i) => Ok(Some(*i as f64)),
            CellValue::String(s) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_nan() => Ok(None),
                Ok(v) if v.is_finite() => Ok(Some(v)),
                _ => Err(()),
            },
            _ => Err(()),
        }
    }

    /// Interpret the cell as an optional label.
    ///
    /// Numbers are stringified so numeric batter ids still group correctly;
    /// integral floats lose their trailing `.0`.
    fn to_label(&self) -> Option<String> {
        if self.is_missing() {
            return None;
        }
        match self {
            CellValue::String(s) => Some(s.clone()),
            CellValue::Integer(i) => Some(i.to_string()),
            CellValue::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                Some(format!("{}", *v as i64))
            }
            CellValue::Float(v) => Some(v.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Null => None,
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – headers + rows straight from a reader
// ---------------------------------------------------------------------------

/// Untyped table produced by every loader; validated once into events.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    fn column_index(&self, name: &str) -> Result<usize, DataLoadError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataLoadError::MissingColumn {
                column: name.to_string(),
                available: self.headers.clone(),
            })
    }
}

// ---------------------------------------------------------------------------
// BattedBallEvent – one row of the source sheet
// ---------------------------------------------------------------------------

/// A single batted ball (one row of the source sheet).
#[derive(Debug, Clone, PartialEq)]
pub struct BattedBallEvent {
    pub batter: Option<String>,
    pub play_outcome: Option<String>,
    /// Exit speed in mph.
    pub exit_speed: Option<f64>,
    /// Launch angle in degrees.
    pub launch_angle: Option<f64>,
    /// Every other loaded column, untouched.
    pub extra: BTreeMap<String, CellValue>,
}

// ---------------------------------------------------------------------------
// BattedBallDataset – the complete loaded snapshot
// ---------------------------------------------------------------------------

/// The validated dataset. Views only ever borrow it.
#[derive(Debug, Clone)]
pub struct BattedBallDataset {
    pub events: Vec<BattedBallEvent>,
    /// Header order as it appeared in the source.
    pub column_names: Vec<String>,
    /// Where the data came from, for the status bar.
    pub source: Option<PathBuf>,
}

impl BattedBallDataset {
    /// Validate a raw table into typed events.
    ///
    /// All four required columns must be present. Numeric columns reject text
    /// that does not parse as a number; missing cells become `None`.
    pub fn from_table(table: RawTable) -> Result<Self, DataLoadError> {
        if table.headers.iter().all(|h| h.trim().is_empty()) {
            return Err(DataLoadError::EmptyHeader);
        }

        let mut required = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in required.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = table.column_index(name)?;
        }
        let [batter_idx, outcome_idx, speed_idx, angle_idx] = required;

        let mut events = Vec::with_capacity(table.rows.len());
        for (row_no, row) in table.rows.iter().enumerate() {
            // Spreadsheet rows are 1-based and the header takes row 1.
            let line = row_no + 2;
            let cell = |idx: usize| row.get(idx).unwrap_or(&NULL_CELL);
            let number = |idx: usize, column: &str| {
                cell(idx)
                    .to_number()
                    .map_err(|()| DataLoadError::InvalidNumber {
                        row: line,
                        column: column.to_string(),
                        value: cell(idx).to_string(),
                    })
            };

            let extra = table
                .headers
                .iter()
                .enumerate()
                .filter(|(i, _)| !required.contains(i))
                .map(|(i, h)| (h.clone(), cell(i).clone()))
                .collect();

            events.push(BattedBallEvent {
                batter: cell(batter_idx).to_label(),
                play_outcome: cell(outcome_idx).to_label(),
                exit_speed: number(speed_idx, EXIT_SPEED)?,
                launch_angle: number(angle_idx, LAUNCH_ANGLE)?,
                extra,
            });
        }

        Ok(BattedBallDataset {
            events,
            column_names: table.headers,
            source: None,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_events(events: Vec<BattedBallEvent>) -> Self {
        BattedBallDataset {
            events,
            column_names: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            source: None,
        }
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Sorted set of distinct, non-missing outcomes.
    pub fn outcomes(&self) -> BTreeSet<String> {
        self.events
            .iter()
            .filter_map(|e| e.play_outcome.clone())
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn event(
    batter: &str,
    outcome: Option<&str>,
    exit_speed: Option<f64>,
    launch_angle: Option<f64>,
) -> BattedBallEvent {
    BattedBallEvent {
        batter: Some(batter.to_string()),
        play_outcome: outcome.map(str::to_string),
        exit_speed,
        launch_angle,
        extra: BTreeMap::new(),
    }
}
