//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function that writes its
//! result to the given writer, so commands can be tested without a terminal.

pub mod charts;
pub mod distribution;
pub mod report;
pub mod summary;

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;
    use tempfile::NamedTempFile;

    pub const SAMPLE_CSV: &str = "\
Equipment Name,Type,Flowrate,Pressure,Temperature
Pump-1,Pump,10,5,40
Valve-1,Valve,20,3,30
Pump-2,Pump,30,7,50
";

    pub const HEADER_ONLY_CSV: &str = "Equipment Name,Type,Flowrate,Pressure,Temperature\n";

    pub fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }
}
