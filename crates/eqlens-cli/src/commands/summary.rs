//! `eqlens summary` command implementation
//!
//! Prints the statistics shown on the first page of the PDF report.

use std::io::Write;
use std::path::Path;

use eqlens_analytics::{aggregate, distribution, summary_lines};

use crate::error::{CliError, Result};
use crate::input::{load, report_warnings};

pub fn run(path: &Path, out: &mut impl Write) -> Result<()> {
    let input = load(path)?;
    report_warnings(&input);

    let stats = aggregate(&input.records)
        .map_err(|_| CliError::NoEquipmentData(input.filename().to_string()))?;

    for line in summary_lines(&input.dataset, &stats) {
        writeln!(out, "{line}")?;
    }

    writeln!(out)?;
    writeln!(out, "Equipment Types")?;
    for entry in distribution(&input.records) {
        writeln!(out, "  {:<16}{}", format!("{}:", entry.equipment_type), entry.count)?;
    }

    Ok(())
}
