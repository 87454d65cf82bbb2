// Equipment CSV Parser
//
// Turns an uploaded CSV into equipment records.
//
// Recognised header names (case-sensitive, exact match):
//    Equipment Name, Type, Flowrate, Pressure, Temperature
// Any other column is ignored. Missing columns and empty or non-numeric
// cells fall back to defaults ("Unknown/NA" / 0.0) and are reported as
// field warnings instead of failing the upload.

use eqlens_common::{EquipmentRecord, UNKNOWN_LABEL};
use serde::Serialize;
use std::io::Read;
use thiserror::Error;
use tracing::{debug, warn};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum IngestError {
    /// The input cannot be read as a table at all
    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        let message = match err.position() {
            Some(pos) => format!("{} (line {})", err, pos.line()),
            None => err.to_string(),
        };
        IngestError::MalformedInput(message)
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;

// ============================================================================
// Columns and Warnings
// ============================================================================

/// A recognised input column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Name,
    Type,
    Flowrate,
    Pressure,
    Temperature,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Name,
        Column::Type,
        Column::Flowrate,
        Column::Pressure,
        Column::Temperature,
    ];

    /// Header text as it must appear in the CSV
    pub fn header(self) -> &'static str {
        match self {
            Column::Name => "Equipment Name",
            Column::Type => "Type",
            Column::Flowrate => "Flowrate",
            Column::Pressure => "Pressure",
            Column::Temperature => "Temperature",
        }
    }

    fn is_numeric(self) -> bool {
        matches!(self, Column::Flowrate | Column::Pressure | Column::Temperature)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WarningKind {
    /// The header row has no such column; every row used the default
    MissingColumn,
    EmptyCell,
    NotNumeric { value: String },
}

/// A value that was replaced by its default during coercion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldWarning {
    /// 1-based data row, `None` for column-level warnings
    pub row: Option<usize>,
    pub column: Column,
    #[serde(flatten)]
    pub kind: WarningKind,
}

/// Output of a successful parse
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedRecords {
    pub records: Vec<EquipmentRecord>,
    pub warnings: Vec<FieldWarning>,
}

impl ParsedRecords {
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

// ============================================================================
// Record Parser
// ============================================================================

/// Maps recognised columns to their position in the header row
#[derive(Debug, Default)]
struct ColumnLayout {
    positions: [Option<usize>; 5],
    width: usize,
}

impl ColumnLayout {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut positions = [None; 5];
        for (slot, column) in positions.iter_mut().zip(Column::ALL) {
            *slot = headers.iter().position(|h| h == column.header());
        }
        Self {
            positions,
            width: headers.len(),
        }
    }

    fn position(&self, column: Column) -> Option<usize> {
        self.positions[column as usize]
    }
}

/// Lenient CSV parser for equipment readings
#[derive(Debug, Default, Clone)]
pub struct RecordParser;

impl RecordParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse an in-memory upload
    pub fn parse_bytes(&self, data: &[u8]) -> Result<ParsedRecords> {
        self.parse_reader(data)
    }

    /// Parse CSV data from any reader
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<ParsedRecords> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(IngestError::MalformedInput(
                "No columns to parse: the header row is empty".to_string(),
            ));
        }

        let layout = ColumnLayout::from_headers(&headers);
        let mut parsed = ParsedRecords::default();

        for column in Column::ALL {
            if layout.position(column).is_none() {
                parsed.warnings.push(FieldWarning {
                    row: None,
                    column,
                    kind: WarningKind::MissingColumn,
                });
            }
        }

        for (index, row) in csv_reader.records().enumerate() {
            let row = row?;
            let row_number = index + 1;

            if row.len() > layout.width {
                return Err(IngestError::MalformedInput(format!(
                    "Expected {} fields in row {}, saw {}",
                    layout.width,
                    row_number,
                    row.len()
                )));
            }

            let record = coerce_row(&layout, &row, row_number, &mut parsed.warnings);
            parsed.records.push(record);
        }

        debug!(
            records = parsed.records.len(),
            warnings = parsed.warnings.len(),
            "Parsed equipment CSV"
        );
        if !parsed.is_clean() {
            warn!(
                warnings = parsed.warnings.len(),
                "Equipment CSV contained values that fell back to defaults"
            );
        }

        Ok(parsed)
    }
}

/// Parse an in-memory upload with the default parser
pub fn parse_csv(data: &[u8]) -> Result<ParsedRecords> {
    RecordParser::new().parse_bytes(data)
}

// ============================================================================
// Field Coercion
// ============================================================================

fn coerce_row(
    layout: &ColumnLayout,
    row: &csv::StringRecord,
    row_number: usize,
    warnings: &mut Vec<FieldWarning>,
) -> EquipmentRecord {
    let mut cell = |column: Column| -> Option<String> {
        // Missing columns were reported once at header level
        let position = layout.position(column)?;
        let raw = row.get(position).unwrap_or("");
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            warnings.push(FieldWarning {
                row: Some(row_number),
                column,
                kind: WarningKind::EmptyCell,
            });
            return None;
        }

        if column.is_numeric() {
            Some(trimmed.to_string())
        } else {
            Some(raw.to_string())
        }
    };

    let name = cell(Column::Name).unwrap_or_else(|| UNKNOWN_LABEL.to_string());
    let equipment_type = cell(Column::Type).unwrap_or_else(|| UNKNOWN_LABEL.to_string());
    let flowrate = cell(Column::Flowrate);
    let pressure = cell(Column::Pressure);
    let temperature = cell(Column::Temperature);

    EquipmentRecord {
        name,
        equipment_type,
        flowrate: coerce_number(flowrate, Column::Flowrate, row_number, warnings),
        pressure: coerce_number(pressure, Column::Pressure, row_number, warnings),
        temperature: coerce_number(temperature, Column::Temperature, row_number, warnings),
    }
}

fn coerce_number(
    value: Option<String>,
    column: Column,
    row_number: usize,
    warnings: &mut Vec<FieldWarning>,
) -> f64 {
    let Some(value) = value else {
        return 0.0;
    };

    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => number,
        _ => {
            warnings.push(FieldWarning {
                row: Some(row_number),
                column,
                kind: WarningKind::NotNumeric { value },
            });
            0.0
        },
    }
}
