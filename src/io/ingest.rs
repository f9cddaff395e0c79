//! Access-log CSV ingest for offline replay.
//!
//! The CSV mirrors the proxy variables the per-request hook sees:
//!
//! `timestamp,uri,upstream_response_time,request_time,request_length,body_bytes_sent`
//!
//! Only `uri` is required. Field values are kept as raw strings so replay goes
//! through exactly the same resolution code as live traffic.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use csv::StringRecord;

use crate::domain::RequestRecord;
use crate::error::AppError;

const LOG_TARGET: &str = "ingest";

/// nginx `$time_local`, e.g. `10/Oct/2026:13:55:36 +0000`.
const TIME_LOCAL_FMT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One usable access-log row.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// 1-based line number in the CSV (header is line 1).
    pub line: usize,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub request: RequestRecord,
}

/// A row that could not be read at all.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: records + row errors.
#[derive(Debug, Clone)]
pub struct IngestedLog {
    pub records: Vec<LogRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load an access-log CSV file.
pub fn load_access_log(path: &Path) -> Result<IngestedLog, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open access log '{}': {e}", path.display())))?;
    read_access_log(file)
}

/// Read access-log CSV from any reader.
pub fn read_access_log<R: Read>(source: R) -> Result<IngestedLog, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read access log headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    if !header_map.contains_key("uri") {
        return Err(AppError::input("Missing required access log column: `uri`"));
    }

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let field = |name: &str| get_optional(&record, &header_map, name).map(str::to_string);
        let timestamp = get_optional(&record, &header_map, "timestamp").and_then(|raw| {
            let parsed = parse_timestamp(raw);
            if parsed.is_none() {
                log::debug!(target: LOG_TARGET, "line {line}: ignoring unparsable timestamp '{raw}'");
            }
            parsed
        });

        records.push(LogRecord {
            line,
            timestamp,
            request: RequestRecord {
                uri: field("uri"),
                upstream_response_time: field("upstream_response_time"),
                request_time: field("request_time"),
                request_length: field("request_length"),
                body_bytes_sent: field("body_bytes_sent"),
            },
        });
    }

    log::info!(
        target: LOG_TARGET,
        "Read {rows_read} access log row(s), {} unreadable",
        row_errors.len()
    );

    Ok(IngestedLog {
        records,
        row_errors,
        rows_read,
    })
}

/// Accept RFC 3339 or nginx `$time_local`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, TIME_LOCAL_FMT))
        .ok()
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn reads_rows_with_optional_columns() {
        let csv = "\u{feff}URI,request_time,request_length,body_bytes_sent,timestamp\n\
                   /todos/,0.5,100,500,2026-10-19T08:00:00Z\n\
                   /health,-,,12,not-a-date\n";
        let log = read_access_log(csv.as_bytes()).unwrap();
        assert_eq!(log.rows_read, 2);
        assert!(log.row_errors.is_empty());

        let first = &log.records[0];
        assert_eq!(first.line, 2);
        assert_eq!(first.request.uri.as_deref(), Some("/todos/"));
        assert_eq!(first.request.upstream_response_time, None);
        assert_eq!(first.request.body_bytes_sent.as_deref(), Some("500"));
        assert_eq!(
            first.timestamp.map(|t| t.with_timezone(&Utc).to_rfc3339()),
            Some("2026-10-19T08:00:00+00:00".to_string())
        );

        let second = &log.records[1];
        assert_eq!(second.request.request_time.as_deref(), Some("-"));
        assert_eq!(second.request.request_length, None);
        assert_eq!(second.timestamp, None);
    }

    #[test]
    fn quoted_upstream_chain_survives() {
        let csv = "uri,upstream_response_time\n/a,\"0.1, 0.2\"\n";
        let log = read_access_log(csv.as_bytes()).unwrap();
        assert_eq!(log.records[0].request.upstream_response_time.as_deref(), Some("0.1, 0.2"));
    }

    #[test]
    fn uri_column_is_required() {
        let err = read_access_log("path,request_time\n/a,1\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn nginx_time_local_is_accepted() {
        let ts = parse_timestamp("10/Oct/2026:13:55:36 +0200").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-10-10T13:55:36+02:00");
        assert!(parse_timestamp("yesterday").is_none());
    }
}
