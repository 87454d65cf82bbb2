//! `eqlens charts` command implementation
//!
//! Prints chart specifications as JSON for rendering elsewhere.

use std::io::Write;
use std::path::Path;

use eqlens_analytics::{compose_charts, distribution, equipment_bar};

use crate::error::Result;
use crate::input::{load, report_warnings};

/// Print the dashboard chart set, or the per-equipment bar chart when
/// `equipment` is set
pub fn run(path: &Path, equipment: bool, out: &mut impl Write) -> Result<()> {
    let input = load(path)?;
    report_warnings(&input);

    if equipment {
        serde_json::to_writer_pretty(&mut *out, &equipment_bar(&input.records))?;
    } else {
        let entries = distribution(&input.records);
        serde_json::to_writer_pretty(&mut *out, &compose_charts(&input.records, &entries))?;
    }
    writeln!(out)?;
    Ok(())
}
