//! JSON output formatting

use super::PreviewReport;
use crate::Result;
use anyhow::Context;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Serialize a preview report
pub fn preview_to_json(report: &PreviewReport, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(json)
}

/// Write a preview report to a file
pub fn write_json_output(output_path: &Path, report: &PreviewReport, pretty: bool) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create JSON output file: {}", output_path.display()))?;
    let writer = BufWriter::new(file);

    if pretty {
        serde_json::to_writer_pretty(writer, report)?;
    } else {
        serde_json::to_writer(writer, report)?;
    }

    Ok(())
}
