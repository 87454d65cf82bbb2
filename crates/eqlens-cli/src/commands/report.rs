//! `eqlens report` command implementation
//!
//! Renders the two-page PDF report for a CSV file.

use std::fs;
use std::io::Write;
use std::path::Path;

use colored::Colorize;
use eqlens_analytics::render_report;
use tracing::info;

use crate::error::{CliError, Result};
use crate::input::{load, report_warnings};

pub fn run(path: &Path, output: &Path, force: bool, out: &mut impl Write) -> Result<()> {
    if output.exists() && !force {
        return Err(CliError::OutputExists(output.display().to_string()));
    }

    let input = load(path)?;
    report_warnings(&input);

    let bytes = render_report(&input.dataset, &input.records)
        .map_err(|e| CliError::from_report(e, input.filename()))?;
    fs::write(output, &bytes)?;

    info!(output = %output.display(), bytes = bytes.len(), "Report written");
    writeln!(
        out,
        "{} {} ({} records)",
        "Report written to".green(),
        output.display(),
        input.records.len()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{csv_file, HEADER_ONLY_CSV, SAMPLE_CSV};
    use tempfile::TempDir;

    #[test]
    fn test_report_written() {
        let file = csv_file(SAMPLE_CSV);
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("report.pdf");

        let mut out = Vec::new();
        run(file.path(), &output, false, &mut out).unwrap();

        let bytes = fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(String::from_utf8_lossy(&out).contains("report.pdf"));
    }

    #[test]
    fn test_existing_output_needs_force() {
        let file = csv_file(SAMPLE_CSV);
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("report.pdf");
        fs::write(&output, b"old").unwrap();

        let mut out = Vec::new();
        let result = run(file.path(), &output, false, &mut out);
        assert!(matches!(result, Err(CliError::OutputExists(_))));
        assert_eq!(fs::read(&output).unwrap(), b"old");

        run(file.path(), &output, true, &mut out).unwrap();
        assert!(fs::read(&output).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_empty_file_has_no_report() {
        let file = csv_file(HEADER_ONLY_CSV);
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("report.pdf");

        let result = run(file.path(), &output, false, &mut Vec::new());
        assert!(matches!(result, Err(CliError::NoEquipmentData(_))));
        assert!(!output.exists());
    }
}
