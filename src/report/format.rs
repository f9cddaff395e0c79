//! Display formatting for metrics, configuration summaries and replay output.
//!
//! Header values follow one rule: every carbon/energy/time figure is clamped at
//! zero and printed with six fractional digits; the byte count is printed as a
//! plain number without clamping.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{CarbonMetrics, EnergyModel, EvaluatedRequest};
use crate::error::AppError;
use crate::io::config::LoadedConfig;
use crate::io::ingest::IngestedLog;
use crate::math::finite_value;

pub const ENERGY_VALUE: &str = "X-Energy-Value";
pub const EMBODIED_RATE: &str = "X-Embodied-Rate";
pub const EMBODIED_TOTAL: &str = "X-Embodied-gCO2eq";
pub const GRID_INTENSITY: &str = "X-Grid-Intensity";
pub const OPERATIONAL_TOTAL: &str = "X-Operational-gCO2eq";
pub const REQUEST_CARBON: &str = "X-Request-Carbon-gCO2eq";
pub const REQUEST_TIME: &str = "X-Request-Time-Sec";
pub const DATA_SIZE: &str = "X-Data-Size-Bytes";

/// All output header names, in emission order.
pub const HEADER_NAMES: [&str; 8] = [
    ENERGY_VALUE,
    EMBODIED_RATE,
    EMBODIED_TOTAL,
    GRID_INTENSITY,
    OPERATIONAL_TOTAL,
    REQUEST_CARBON,
    REQUEST_TIME,
    DATA_SIZE,
];

/// Clamp at zero and render with six fractional digits.
///
/// Non-finite values render as zero, and so does negative zero. An exact tie
/// at the seventh digit rounds up, not to even.
pub fn format_fixed(value: f64) -> String {
    let value = finite_value(value, 0.0);
    let value = if value > 0.0 { value } else { 0.0 };
    match tie_rounded_micros(value) {
        Some(micros) => format!("{}.{:06}", micros / 1_000_000, micros % 1_000_000),
        None => format!("{value:.6}"),
    }
}

/// The only doubles lying exactly halfway between two multiples of 1e-6 are
/// the odd multiples of 1/128. For those, return the value rounded half up in
/// millionths; `None` for everything else.
fn tie_rounded_micros(value: f64) -> Option<u128> {
    let scaled = value * 128.0;
    if scaled.fract() != 0.0 || scaled % 2.0 != 1.0 {
        return None;
    }
    let odd = scaled as u128;
    Some((odd * 15_625 + 1) / 2)
}

/// Render a byte count: integral values without a fraction, otherwise the
/// shortest decimal form. Negative counts are kept.
pub fn format_bytes(value: f64) -> String {
    let value = finite_value(value, 0.0);
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Header name/value pairs for one request.
pub fn metric_headers(m: &CarbonMetrics) -> Vec<(&'static str, String)> {
    vec![
        (ENERGY_VALUE, format_fixed(m.energy)),
        (EMBODIED_RATE, format_fixed(m.embodied_rate)),
        (EMBODIED_TOTAL, format_fixed(m.embodied_total)),
        (GRID_INTENSITY, format_fixed(m.grid_intensity)),
        (OPERATIONAL_TOTAL, format_fixed(m.operational_total)),
        (REQUEST_CARBON, format_fixed(m.total_carbon)),
        (REQUEST_TIME, format_fixed(m.time_sec)),
        (DATA_SIZE, format_bytes(m.data_size_bytes)),
    ]
}

/// `Name: value` lines, as they would appear on the response.
pub fn format_headers_text(m: &CarbonMetrics) -> String {
    metric_headers(m)
        .into_iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Machine-readable result of a single evaluation.
#[derive(Debug, Serialize)]
struct EvalReport<'a> {
    path: &'a str,
    matched: bool,
    headers: Map<String, Value>,
    metrics: &'a CarbonMetrics,
}

/// JSON rendering of one evaluation: formatted headers plus the unclamped figures.
pub fn format_eval_json(path: &str, matched: bool, m: &CarbonMetrics) -> Result<String, AppError> {
    let headers: Map<String, Value> = metric_headers(m)
        .into_iter()
        .map(|(name, value)| (name.to_string(), Value::String(value)))
        .collect();
    let report = EvalReport {
        path,
        matched,
        headers,
        metrics: m,
    };
    serde_json::to_string_pretty(&report)
        .map_err(|e| AppError::output(format!("Failed to render metrics JSON: {e}")))
}

/// Per-endpoint overview of a loaded configuration.
pub fn format_config_summary(loaded: &LoadedConfig) -> String {
    let mut out = String::new();

    out.push_str("=== carbon - endpoint configuration ===\n");
    out.push_str(&format!(
        "Endpoints: {} | warnings: {}\n\n",
        loaded.table.len(),
        loaded.warnings.len()
    ));

    out.push_str(&format!(
        "{:<32} {:<12} {:<34} {:>12} {:>12}\n",
        "path", "model", "parameters", "embodied", "grid"
    ));

    for path in loaded.table.sorted_paths() {
        let Some(config) = loaded.table.lookup(path) else {
            continue;
        };
        let (kind, params) = match &config.energy_model {
            None => ("none".to_string(), "-".to_string()),
            Some(model) => (model.kind_name().to_string(), describe_model(model)),
        };
        out.push_str(&format!(
            "{:<32} {:<12} {:<34} {:>12} {:>12}\n",
            path,
            kind,
            params,
            format_fixed(config.embodied_rate()),
            format_fixed(config.grid_intensity),
        ));
    }

    if !loaded.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for w in &loaded.warnings {
            out.push_str(&format!("  {}: {}\n", w.path, w.message));
        }
    }

    out
}

fn describe_model(model: &EnergyModel) -> String {
    match model {
        EnergyModel::Constant { value } => format!("value={value}"),
        EnergyModel::Linear {
            intercept,
            time_coeff,
            size_coeff,
        } => format!("a={intercept} t={time_coeff} s={size_coeff}"),
        EnergyModel::Curve {
            points,
            input,
            extrapolate,
        } => format!("{} pts on {} ({})", points.len(), input.as_str(), extrapolate.as_str()),
        EnergyModel::Unsupported { .. } => "unsupported (0)".to_string(),
    }
}

/// Per-row replay table followed by row counts.
pub fn format_replay(log: &IngestedLog, rows: &[EvaluatedRequest]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{:>6} {:<32} {:>14} {:>14} {:>14} {:>12}\n",
        "line", "path", "energy", "carbon", "time_sec", "bytes"
    ));
    for row in rows {
        out.push_str(&format!(
            "{:>6} {:<32} {:>14} {:>14} {:>14} {:>12}\n",
            row.line,
            row.path,
            format_fixed(row.metrics.energy),
            format_fixed(row.metrics.total_carbon),
            format_fixed(row.metrics.time_sec),
            format_bytes(row.metrics.data_size_bytes),
        ));
    }

    let matched = rows.iter().filter(|r| r.matched).count();
    out.push_str(&format!(
        "\nRows: read={} | evaluated={} | matched={} | unmatched={} | unreadable={}\n",
        log.rows_read,
        rows.len(),
        matched,
        rows.len() - matched,
        log.row_errors.len()
    ));
    for e in &log.row_errors {
        out.push_str(&format!("  line {}: {}\n", e.line, e.message));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EndpointConfig, EndpointTable};
    use crate::io::config::ConfigWarning;
    use crate::io::ingest::RowError;

    #[test]
    fn fixed_clamps_and_rounds() {
        assert_eq!(format_fixed(2.0), "2.000000");
        assert_eq!(format_fixed(10.0), "10.000000");
        assert_eq!(format_fixed(0.1234567), "0.123457");
        assert_eq!(format_fixed(-3.0), "0.000000");
        assert_eq!(format_fixed(-0.0), "0.000000");
        assert_eq!(format_fixed(f64::NAN), "0.000000");
        assert_eq!(format_fixed(f64::INFINITY), "0.000000");
    }

    #[test]
    fn fixed_ties_round_up() {
        assert_eq!(format_fixed(0.0078125), "0.007813");
        assert_eq!(format_fixed(0.0234375), "0.023438");
        assert_eq!(format_fixed(1.0078125), "1.007813");
        assert_eq!(format_fixed(300.9921875), "300.992188");
        assert_eq!(format_fixed(0.5), "0.500000");
        assert_eq!(format_fixed(0.25), "0.250000");
        assert_eq!(format_fixed(0.015625), "0.015625");
    }

    #[test]
    fn bytes_are_plain_numbers() {
        assert_eq!(format_bytes(500.0), "500");
        assert_eq!(format_bytes(0.0), "0");
        assert_eq!(format_bytes(-0.0), "0");
        assert_eq!(format_bytes(-5.0), "-5");
        assert_eq!(format_bytes(12.5), "12.5");
    }

    #[test]
    fn headers_in_order() {
        let m = CarbonMetrics {
            energy: 2.0,
            embodied_rate: 1.0,
            embodied_total: 4.0,
            grid_intensity: 3.0,
            operational_total: 6.0,
            total_carbon: 10.0,
            time_sec: 4.0,
            data_size_bytes: 64.0,
        };
        let headers = metric_headers(&m);
        let names: Vec<&str> = headers.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, HEADER_NAMES.to_vec());
        assert_eq!(headers[5].1, "10.000000");
        assert_eq!(headers[7].1, "64");

        let text = format_headers_text(&m);
        assert!(text.starts_with("X-Energy-Value: 2.000000\n"));
        assert!(text.ends_with("X-Data-Size-Bytes: 64"));

        let json = format_eval_json("/api", true, &m).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["path"], "/api");
        assert_eq!(parsed["matched"], true);
        assert_eq!(parsed["headers"]["X-Request-Carbon-gCO2eq"], "10.000000");
        assert_eq!(parsed["metrics"]["total_carbon"], 10.0);
        assert!(json.find(ENERGY_VALUE).unwrap() < json.find(DATA_SIZE).unwrap());
    }

    #[test]
    fn config_summary_lists_paths_and_warnings() {
        let table: EndpointTable = [
            (
                "/b".to_string(),
                EndpointConfig {
                    energy_model: Some(EnergyModel::Constant { value: 2.0 }),
                    embodied: Some(1.0),
                    embodied_legacy: None,
                    grid_intensity: 3.0,
                },
            ),
            ("/a".to_string(), EndpointConfig::default()),
        ]
        .into_iter()
        .collect();
        let loaded = LoadedConfig {
            table,
            warnings: vec![ConfigWarning {
                path: "/a/".to_string(),
                message: "never matches".to_string(),
            }],
        };
        let text = format_config_summary(&loaded);
        assert!(text.find("\n/a ").unwrap() < text.find("\n/b ").unwrap());
        assert!(text.contains("value=2"));
        assert!(text.contains("/a/: never matches"));
    }

    #[test]
    fn replay_counts() {
        let log = IngestedLog {
            records: vec![],
            row_errors: vec![RowError {
                line: 4,
                message: "CSV parse error".to_string(),
            }],
            rows_read: 3,
        };
        let rows = vec![
            EvaluatedRequest {
                line: 2,
                timestamp: None,
                path: "/a".to_string(),
                matched: true,
                metrics: CarbonMetrics::default(),
            },
            EvaluatedRequest {
                line: 3,
                timestamp: None,
                path: "/b".to_string(),
                matched: false,
                metrics: CarbonMetrics::default(),
            },
        ];
        let text = format_replay(&log, &rows);
        assert!(text.contains("read=3 | evaluated=2 | matched=1 | unmatched=1 | unreadable=1"));
        assert!(text.contains("line 4: CSV parse error"));
    }
}
