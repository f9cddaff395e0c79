//! Export per-request metrics to CSV.
//!
//! One row per replayed request, carrying the same header values the proxy
//! would attach, so the file can be diffed against live response headers.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::EvaluatedRequest;
use crate::error::AppError;
use crate::report::{HEADER_NAMES, metric_headers};

/// Write per-request metrics to a CSV file.
pub fn write_metrics_csv(path: &Path, rows: &[EvaluatedRequest]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_metrics(file, rows)
}

/// Write per-request metrics as CSV to any writer.
pub fn write_metrics<W: Write>(sink: W, rows: &[EvaluatedRequest]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(sink);

    let mut header = vec!["line", "timestamp", "path", "matched"];
    header.extend(HEADER_NAMES);
    writer
        .write_record(&header)
        .map_err(|e| AppError::output(format!("Failed to write export CSV header: {e}")))?;

    for row in rows {
        let mut record = vec![
            row.line.to_string(),
            row.timestamp.map(|t| t.to_rfc3339()).unwrap_or_default(),
            row.path.clone(),
            row.matched.to_string(),
        ];
        record.extend(metric_headers(&row.metrics).into_iter().map(|(_, value)| value));
        writer
            .write_record(&record)
            .map_err(|e| AppError::output(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::output(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
