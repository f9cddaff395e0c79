//! Carbon derivation and output formatting.

pub mod format;

pub use format::*;

use crate::domain::{CarbonMetrics, RequestContext};

/// Combine an energy estimate with the configured rates.
///
/// ```text
/// embodied_total    = embodied_rate * time_sec
/// operational_total = energy * grid_intensity
/// total_carbon      = embodied_total + operational_total
/// ```
///
/// No clamping happens here; negative inputs propagate until display.
pub fn derive_carbon(energy: f64, embodied_rate: f64, grid_intensity: f64, ctx: &RequestContext) -> CarbonMetrics {
    let embodied_total = embodied_rate * ctx.time_sec;
    let operational_total = energy * grid_intensity;
    CarbonMetrics {
        energy,
        embodied_rate,
        embodied_total,
        grid_intensity,
        operational_total,
        total_carbon: embodied_total + operational_total,
        time_sec: ctx.time_sec,
        data_size_bytes: ctx.data_size_bytes,
    }
}
