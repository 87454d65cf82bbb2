//! eqlens Ingest Library
//!
//! Turns uploaded equipment CSV files into validated [`EquipmentRecord`]s.
//!
//! Parsing is lenient: unknown columns are ignored, and missing or
//! non-numeric values fall back to defaults with a [`FieldWarning`] for each
//! substitution. Only input that cannot be read as a table at all fails, with
//! [`IngestError::MalformedInput`].
//!
//! # Example
//!
//! ```
//! use eqlens_ingest::parse_csv;
//!
//! let csv = "Equipment Name,Type,Flowrate,Pressure,Temperature\nPump A,Pump,10,20,30\n";
//! let parsed = parse_csv(csv.as_bytes())?;
//! assert_eq!(parsed.count(), 1);
//! # Ok::<(), eqlens_ingest::IngestError>(())
//! ```
//!
//! [`EquipmentRecord`]: eqlens_common::EquipmentRecord

pub mod parser;

pub use parser::{
    parse_csv, Column, FieldWarning, IngestError, ParsedRecords, RecordParser, WarningKind,
};
