use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::error::ArrowError;
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataLoadError;
use super::model::{is_na_token, BattedBallDataset, CellValue, RawTable};
use crate::config::{ColumnRange, DataSource};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and validate a batted-ball dataset.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – worksheet `source.sheet`,
///   columns `source.columns`, first row is the header
/// * `.csv`     – header row, one event per line
/// * `.json`    – `[{ "BATTER": "...", "PLAY_OUTCOME": "...", ... }, ...]`
/// * `.parquet` – one scalar column per field
pub fn load_file(source: &DataSource) -> Result<BattedBallDataset, DataLoadError> {
    let path = source.path.as_path();
    if !path.is_file() {
        return Err(DataLoadError::FileNotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => {
            load_spreadsheet(path, &source.sheet, source.columns)?
        }
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataLoadError::UnsupportedExtension(other.to_string())),
    };

    let dataset = BattedBallDataset::from_table(table)?.with_source(path);
    log::info!(
        "Loaded {} events from {} with columns {:?}",
        dataset.len(),
        path.display(),
        dataset.column_names
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_spreadsheet(
    path: &Path,
    sheet: &str,
    columns: ColumnRange,
) -> Result<RawTable, DataLoadError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| DataLoadError::Workbook(e.to_string()))?;

    let available = workbook.sheet_names();
    if !available.iter().any(|s| s == sheet) {
        return Err(DataLoadError::SheetNotFound {
            sheet: sheet.to_string(),
            available,
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| DataLoadError::Workbook(e.to_string()))?;

    // calamine trims leading empty columns; keep column letters absolute.
    let start_col = range.start().map(|(_, c)| c as usize).unwrap_or(0);
    let rows = range
        .rows()
        .map(|row| row.iter().map(spreadsheet_cell).collect::<Vec<_>>());

    table_from_grid(rows, start_col, columns)
}

fn spreadsheet_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Empty | Data::Error(_) => CellValue::Null,
        // Dates and durations are not used by any view; keep them readable.
        other => CellValue::String(other.to_string()),
    }
}

/// Turn a grid of cells into a header + rows table.
///
/// `start_col` is the absolute index of the grid's first column; only cells
/// whose absolute column falls in `columns` are kept. Rows where every kept
/// cell is missing are skipped.
fn table_from_grid(
    mut rows: impl Iterator<Item = Vec<CellValue>>,
    start_col: usize,
    columns: ColumnRange,
) -> Result<RawTable, DataLoadError> {
    let select = |row: Vec<CellValue>| -> Vec<CellValue> {
        row.into_iter()
            .enumerate()
            .filter(|(i, _)| columns.contains(start_col + i))
            .map(|(_, c)| c)
            .collect()
    };

    let header_row = rows.next().map(&select).ok_or(DataLoadError::EmptyHeader)?;
    if header_row.iter().all(CellValue::is_missing) {
        return Err(DataLoadError::EmptyHeader);
    }
    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            CellValue::Null => format!("Unnamed: {i}"),
            other => other.to_string().trim().to_string(),
        })
        .collect();

    let width = headers.len();
    let rows = rows
        .map(|row| {
            let mut kept = select(row);
            // Ragged rows still line up with the header.
            kept.resize(width, CellValue::Null);
            kept
        })
        .filter(|row| !row.iter().all(CellValue::is_missing))
        .collect();

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<RawTable, DataLoadError> {
    let malformed = |e: csv::Error| DataLoadError::malformed("CSV", e);

    let mut reader = csv::Reader::from_path(path).map_err(malformed)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(malformed)?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(RawTable { headers, rows })
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if is_na_token(s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Headers are the union of keys over all records.
fn load_json(path: &Path) -> Result<RawTable, DataLoadError> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue =
        serde_json::from_str(&text).map_err(|e| DataLoadError::malformed("JSON", e))?;

    let records = root
        .as_array()
        .ok_or_else(|| DataLoadError::malformed("JSON", "expected top-level array"))?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataLoadError::malformed("JSON", format!("row {i} is not an object")))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map_or(CellValue::Null, json_to_cell))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RawTable, DataLoadError> {
    let malformed = |e: parquet::errors::ParquetError| DataLoadError::malformed("Parquet", e);

    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(malformed)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().map_err(malformed)?;

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|e| DataLoadError::malformed("Parquet", e))?;
        let columns = batch
            .columns()
            .iter()
            .map(arrow_column_cells)
            .collect::<Result<Vec<_>, _>>()?;

        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| col[row].clone()).collect());
        }
    }

    Ok(RawTable { headers, rows })
}

/// Flatten one Arrow column into cells. Integers and floats are widened to
/// 64 bits; anything else is cast to text.
fn arrow_column_cells(col: &ArrayRef) -> Result<Vec<CellValue>, DataLoadError> {
    let malformed = |e: ArrowError| DataLoadError::malformed("Parquet", e);

    let cells = match col.data_type() {
        DataType::Boolean => col
            .as_boolean()
            .iter()
            .map(|v| v.map_or(CellValue::Null, CellValue::Bool))
            .collect(),
        dt if dt.is_integer() => cast(col, &DataType::Int64)
            .map_err(malformed)?
            .as_primitive::<Int64Type>()
            .iter()
            .map(|v| v.map_or(CellValue::Null, CellValue::Integer))
            .collect(),
        dt if dt.is_floating() => cast(col, &DataType::Float64)
            .map_err(malformed)?
            .as_primitive::<Float64Type>()
            .iter()
            .map(|v| v.map_or(CellValue::Null, CellValue::Float))
            .collect(),
        _ => {
            let text = cast(col, &DataType::Utf8).map_err(malformed)?;
            let text = text.as_string::<i32>();
            (0..text.len())
                .map(|i| {
                    if text.is_null(i) {
                        CellValue::Null
                    } else {
                        CellValue::String(text.value(i).to_string())
                    }
                })
                .collect()
        }
    };
    Ok(cells)
}
