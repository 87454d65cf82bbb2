//! Reading equipment CSV files from disk

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use colored::Colorize;
use eqlens_analytics::aggregate;
use eqlens_common::{Dataset, EquipmentRecord};
use eqlens_ingest::{parse_csv, FieldWarning};
use tracing::debug;

use crate::error::{CliError, Result};

/// User id stamped on datasets built from local files
pub const LOCAL_USER: &str = "local";

/// A CSV file parsed into a dataset
#[derive(Debug, Clone)]
pub struct LoadedInput {
    pub dataset: Dataset,
    pub records: Vec<EquipmentRecord>,
    pub warnings: Vec<FieldWarning>,
}

impl LoadedInput {
    /// Path-free display name of the input
    pub fn filename(&self) -> &str {
        &self.dataset.filename
    }
}

/// Parse `path` and wrap the records in a [`Dataset`].
///
/// The upload time is the file's modification time when the platform
/// reports one.
pub fn load(path: &Path) -> Result<LoadedInput> {
    if !path.is_file() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }

    let data = fs::read(path)?;
    let parsed = parse_csv(&data)?;

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let averages = aggregate(&parsed.records)
        .map(|stats| stats.averages())
        .unwrap_or_default();

    let mut dataset = Dataset::new(LOCAL_USER, filename, parsed.count(), averages);
    if let Ok(modified) = fs::metadata(path).and_then(|m| m.modified()) {
        dataset = dataset.with_uploaded_at(DateTime::<Utc>::from(modified));
    }

    debug!(
        path = %path.display(),
        records = parsed.count(),
        warnings = parsed.warnings.len(),
        "Loaded input"
    );

    Ok(LoadedInput {
        dataset,
        records: parsed.records,
        warnings: parsed.warnings,
    })
}

/// Tell the user how many values fell back to defaults
pub fn report_warnings(input: &LoadedInput) {
    if input.warnings.is_empty() {
        return;
    }
    eprintln!(
        "{} {} value(s) in '{}' were missing or not numeric and fell back to defaults",
        "warning:".yellow().bold(),
        input.warnings.len(),
        input.filename()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_csv() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "Equipment Name,Type,Flowrate,Pressure,Temperature\nP1,Pump,10,2,30\nP2,Pump,20,4,50\n"
        )
        .unwrap();

        let input = load(file.path()).unwrap();
        assert_eq!(input.records.len(), 2);
        assert_eq!(input.dataset.total_count, 2);
        assert_eq!(input.dataset.avg_flowrate, 15.0);
        assert_eq!(input.dataset.user_id, LOCAL_USER);
        assert!(input.warnings.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(CliError::FileNotFound(_))));
    }

    #[test]
    fn test_load_empty_file_is_malformed() {
        let file = NamedTempFile::new().unwrap();
        assert!(matches!(load(file.path()), Err(CliError::Ingest(_))));
    }
}
