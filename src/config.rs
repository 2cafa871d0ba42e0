use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use crate::data::error::DataLoadError;

pub const DEFAULT_FILE: &str = "BattedBallData.xlsx";
pub const DEFAULT_SHEET: &str = "Data";
pub const DEFAULT_COLUMNS: &str = "A:M";

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Interactive batted-ball outcome dashboard.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    /// Spreadsheet (.xlsx/.xls/.ods), .csv, .json or .parquet file to open.
    #[arg(default_value = DEFAULT_FILE)]
    pub path: PathBuf,

    /// Worksheet to read (spreadsheets only).
    #[arg(long, default_value = DEFAULT_SHEET)]
    pub sheet: String,

    /// Inclusive column range to read, in spreadsheet letters (spreadsheets only).
    #[arg(long, default_value = DEFAULT_COLUMNS)]
    pub columns: ColumnRange,
}

impl Args {
    pub fn data_source(&self) -> DataSource {
        DataSource {
            path: self.path.clone(),
            sheet: self.sheet.clone(),
            columns: self.columns,
        }
    }
}

// ---------------------------------------------------------------------------
// DataSource – everything the loader needs to find the table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    pub path: PathBuf,
    pub sheet: String,
    pub columns: ColumnRange,
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource {
            path: PathBuf::from(DEFAULT_FILE),
            sheet: DEFAULT_SHEET.to_string(),
            columns: ColumnRange::default(),
        }
    }
}

impl DataSource {
    /// Same sheet and columns, different file.
    pub fn with_path(&self, path: PathBuf) -> Self {
        DataSource {
            path,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnRange – "A:M" style, zero-based and inclusive
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRange {
    pub first: usize,
    pub last: usize,
}

impl Default for ColumnRange {
    fn default() -> Self {
        // A:M
        ColumnRange { first: 0, last: 12 }
    }
}

impl ColumnRange {
    pub fn contains(&self, column: usize) -> bool {
        (self.first..=self.last).contains(&column)
    }
}

/// `A` → 0, `Z` → 25, `AA` → 26.
fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    letters.chars().try_fold(0usize, |acc, c| {
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        acc.checked_mul(26)?.checked_add(digit)
    })
    .map(|n| n - 1)
}

fn column_letters(mut index: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push((b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    out.iter().rev().collect()
}

impl FromStr for ColumnRange {
    type Err = DataLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DataLoadError::InvalidColumnRange(s.to_string());
        let (a, b) = match s.trim().split_once(':') {
            Some((a, b)) => (a.trim(), b.trim()),
            None => (s.trim(), s.trim()),
        };
        let first = column_index(a).ok_or_else(invalid)?;
        let last = column_index(b).ok_or_else(invalid)?;
        if first > last {
            return Err(invalid());
        }
        Ok(ColumnRange { first, last })
    }
}

impl fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", column_letters(self.first), column_letters(self.last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_range() {
        let r: ColumnRange = "A:M".parse().unwrap();
        assert_eq!(r, ColumnRange::default());
        assert!(r.contains(0));
        assert!(r.contains(12));
        assert!(!r.contains(13));
    }

    #[test]
    fn test_parse_multi_letter_and_lowercase() {
        let r: ColumnRange = "b:aa".parse().unwrap();
        assert_eq!(r, ColumnRange { first: 1, last: 26 });
        assert_eq!(r.to_string(), "B:AA");
    }

    #[test]
    fn test_single_column() {
        let r: ColumnRange = "C".parse().unwrap();
        assert_eq!(r, ColumnRange { first: 2, last: 2 });
    }

    #[test]
    fn test_invalid_ranges() {
        for bad in ["", "M:A", "A1:M", "A:", ":"] {
            assert!(bad.parse::<ColumnRange>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_letters_round_trip_edges() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");
        assert_eq!(column_index("ZZ"), Some(701));
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["batted-ball-viewer"]);
        assert_eq!(args.data_source(), DataSource::default());

        let args = Args::parse_from([
            "batted-ball-viewer",
            "games.csv",
            "--sheet",
            "2024",
            "--columns",
            "B:F",
        ]);
        let src = args.data_source();
        assert_eq!(src.path, PathBuf::from("games.csv"));
        assert_eq!(src.sheet, "2024");
        assert_eq!(src.columns, ColumnRange { first: 1, last: 5 });
    }
}
