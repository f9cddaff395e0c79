//! Per-request evaluation pipeline shared by every front-end.
//!
//! raw request fields -> (normalized path, context) -> endpoint lookup
//! -> energy model -> carbon derivation
//!
//! Everything here reads the `EndpointTable` immutably, so any number of
//! requests can be evaluated concurrently against one table.

use rayon::prelude::*;

use crate::domain::{CarbonMetrics, EndpointConfig, EndpointTable, EvaluatedRequest, RequestContext, RequestRecord};
use crate::io::ingest::LogRecord;
use crate::models::evaluate_energy;
use crate::report::derive_carbon;

const LOG_TARGET: &str = "pipeline";

/// Metrics for a request against an optional endpoint configuration.
///
/// Without a configuration every rate is zero; time and size still reflect
/// the request.
pub fn evaluate_endpoint(config: Option<&EndpointConfig>, ctx: &RequestContext) -> CarbonMetrics {
    let (energy, embodied_rate, grid_intensity) = match config {
        Some(config) => (
            evaluate_energy(config.energy_model.as_ref(), ctx),
            config.embodied_rate(),
            config.grid_intensity,
        ),
        None => (0.0, 0.0, 0.0),
    };
    derive_carbon(energy, embodied_rate, grid_intensity, ctx)
}

/// Evaluate one request; also reports whether its path was configured.
pub fn evaluate_request(table: &EndpointTable, record: &RequestRecord) -> (String, bool, CarbonMetrics) {
    let path = record.lookup_path();
    let ctx = RequestContext::from_record(record);
    let config = table.lookup(&path);

    if config.is_none() {
        log::debug!(target: LOG_TARGET, "No endpoint configured for '{path}'");
    }

    let metrics = evaluate_endpoint(config, &ctx);
    (path, config.is_some(), metrics)
}

/// Metrics for a single request.
pub fn compute_metrics(table: &EndpointTable, record: &RequestRecord) -> CarbonMetrics {
    evaluate_request(table, record).2
}

/// Evaluate replayed access-log rows in parallel, preserving input order.
pub fn replay(table: &EndpointTable, records: &[LogRecord]) -> Vec<EvaluatedRequest> {
    records
        .par_iter()
        .map(|record| {
            let (path, matched, metrics) = evaluate_request(table, &record.request);
            EvaluatedRequest {
                line: record.line,
                timestamp: record.timestamp,
                path,
                matched,
                metrics,
            }
        })
        .collect()
}
