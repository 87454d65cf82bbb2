//! `eqlens distribution` command implementation

use std::io::Write;
use std::path::Path;

use eqlens_analytics::{distribution, DistributionEntry};
use serde::Serialize;

use crate::error::Result;
use crate::input::{load, report_warnings};

#[derive(Debug, Serialize)]
struct DistributionOutput<'a> {
    source: &'a str,
    total_count: usize,
    distribution: Vec<DistributionEntry>,
}

/// Print the type distribution as JSON. Empty files give an empty list.
pub fn run(path: &Path, out: &mut impl Write) -> Result<()> {
    let input = load(path)?;
    report_warnings(&input);

    let output = DistributionOutput {
        source: input.filename(),
        total_count: input.records.len(),
        distribution: distribution(&input.records),
    };

    serde_json::to_writer_pretty(&mut *out, &output)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{csv_file, HEADER_ONLY_CSV, SAMPLE_CSV};
    use serde_json::{json, Value};

    fn output_for(content: &str) -> Value {
        let file = csv_file(content);
        let mut out = Vec::new();
        run(file.path(), &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn test_distribution_json() {
        let value = output_for(SAMPLE_CSV);
        assert_eq!(value["total_count"], 3);
        assert_eq!(
            value["distribution"],
            json!([
                {"equipment_type": "Pump", "count": 2, "equipment_names": ["Pump-1", "Pump-2"]},
                {"equipment_type": "Valve", "count": 1, "equipment_names": ["Valve-1"]}
            ])
        );
    }

    #[test]
    fn test_distribution_of_empty_file() {
        let value = output_for(HEADER_ONLY_CSV);
        assert_eq!(value["total_count"], 0);
        assert_eq!(value["distribution"], json!([]));
    }
}
