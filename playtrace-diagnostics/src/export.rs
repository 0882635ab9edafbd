//! Export of recorded sample histories
//!
//! CSV rows follow the fixed sample order with the timestamp in seconds.
//! JSON output is an array of sample objects.

use crate::error::DiagnosticsResult;
use playtrace_core::{Sample, SampleStore};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Header line of the CSV export
pub const CSV_HEADER: &str = "timestamp_s,paused,played_until,buffered_until,videoWidth,videoHeight,decodedFrames,droppedFrames";

/// Output format for [`export_to_file`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma separated values with [`CSV_HEADER`]
    Csv,
    /// JSON array of samples
    Json,
}

impl ExportFormat {
    /// Pick a format from a file extension, defaulting to CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

fn csv_row(sample: &Sample) -> String {
    format!(
        "{}.{:03},{},{},{},{},{},{},{}",
        sample.timestamp / 1000,
        sample.timestamp % 1000,
        sample.paused,
        sample.played_until,
        sample.buffered_until,
        sample.video_width,
        sample.video_height,
        sample.decoded_frames,
        sample.dropped_frames,
    )
}

/// Write the history as CSV
pub fn write_csv<W: Write>(store: &SampleStore, mut writer: W) -> DiagnosticsResult<()> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for sample in store.iter() {
        writeln!(writer, "{}", csv_row(&sample))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the history as a JSON array
pub fn write_json<W: Write>(store: &SampleStore, mut writer: W) -> DiagnosticsResult<()> {
    serde_json::to_writer_pretty(&mut writer, &store.to_samples())?;
    writer.flush()?;
    Ok(())
}

/// Write the history to `path` in the given format
pub fn export_to_file(
    store: &SampleStore,
    path: impl AsRef<Path>,
    format: ExportFormat,
) -> DiagnosticsResult<()> {
    let path = path.as_ref();
    let writer = BufWriter::new(File::create(path)?);

    match format {
        ExportFormat::Csv => write_csv(store, writer)?,
        ExportFormat::Json => write_json(store, writer)?,
    }

    info!(
        "Exported {} samples to {} as {:?}",
        store.len(),
        path.display(),
        format
    );
    Ok(())
}
