use crate::config::LoaderOptions;
use crate::error::{FinancialAnalysisError, Result};
use crate::schema::{CellValue, RawLineItem, RawStatement};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use log::debug;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

pub const EXPECTED_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    Csv,
    /// Anything calamine can open: xlsx, xlsm, xlsb, xls, ods.
    Workbook,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") | Some("txt") => FileKind::Csv,
            _ => FileKind::Workbook,
        }
    }
}

pub fn load_statement(path: &Path, options: &LoaderOptions) -> Result<RawStatement> {
    debug!("Loading statement from {}", path.display());
    match FileKind::from_path(path) {
        FileKind::Csv => {
            let reader = csv_reader().from_path(path)?;
            read_csv_records(reader, options)
        }
        FileKind::Workbook => {
            let mut workbook = open_workbook_auto(path)?;
            let range = first_sheet(&mut workbook)?;
            statement_from_range(&range, options)
        }
    }
}

pub fn load_statement_from_bytes(
    bytes: &[u8],
    kind: FileKind,
    options: &LoaderOptions,
) -> Result<RawStatement> {
    match kind {
        FileKind::Csv => read_csv_records(csv_reader().from_reader(bytes), options),
        FileKind::Workbook => {
            let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
            let range = first_sheet(&mut workbook)?;
            statement_from_range(&range, options)
        }
    }
}

fn first_sheet<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> Result<Range<Data>> {
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            FinancialAnalysisError::InvalidStructure("workbook has no worksheets".to_string())
        })?
        .map_err(FinancialAnalysisError::from)
}

fn csv_reader() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(false).flexible(true).trim(csv::Trim::All);
    builder
}

fn read_csv_records<R: Read>(
    mut reader: csv::Reader<R>,
    options: &LoaderOptions,
) -> Result<RawStatement> {
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }
    statement_from_rows(rows, options)
}

/// Converts a calamine worksheet range into a raw statement.
pub fn statement_from_range(
    range: &Range<Data>,
    options: &LoaderOptions,
) -> Result<RawStatement> {
    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect();
    statement_from_rows(rows, options)
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Empty => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

fn label_text(cell: CellValue) -> String {
    match cell {
        CellValue::Text(s) => s.trim().to_string(),
        CellValue::Number(v) => v.to_string(),
        CellValue::Empty => String::new(),
    }
}

/// Shared by the CSV and workbook readers.
///
/// Blank rows are dropped, trailing blank cells are ignored, and the widest
/// remaining row must have exactly three columns.
pub fn statement_from_rows(
    rows: Vec<Vec<CellValue>>,
    options: &LoaderOptions,
) -> Result<RawStatement> {
    let mut rows: Vec<Vec<CellValue>> = rows
        .into_iter()
        .filter_map(|mut row| {
            while row.last().is_some_and(CellValue::is_empty) {
                row.pop();
            }
            if row.is_empty() {
                None
            } else {
                Some(row)
            }
        })
        .collect();

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return Err(FinancialAnalysisError::EmptyStatement);
    }
    if width != EXPECTED_COLUMNS {
        return Err(FinancialAnalysisError::InvalidStructure(format!(
            "expected {} columns (item, prior year, current year) but found {}",
            EXPECTED_COLUMNS, width
        )));
    }

    if options.has_header {
        rows.remove(0);
    }
    if rows.is_empty() {
        return Err(FinancialAnalysisError::EmptyStatement);
    }

    let items: Vec<RawLineItem> = rows
        .into_iter()
        .map(|row| {
            let mut cells = row.into_iter();
            let label = label_text(cells.next().unwrap_or(CellValue::Empty));
            let prior = cells.next().unwrap_or(CellValue::Empty);
            let current = cells.next().unwrap_or(CellValue::Empty);
            RawLineItem {
                label,
                prior,
                current,
            }
        })
        .collect();

    debug!("Loaded {} line items", items.len());
    Ok(RawStatement { rows: items })
}
