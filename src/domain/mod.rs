//! Domain types used throughout the evaluation path.
//!
//! This module defines:
//!
//! - canonical energy models (`EnergyModel`, `CurvePoint`, `Extrapolation`)
//! - per-path configuration (`EndpointConfig`, `EndpointTable`)
//! - request-scoped values (`RequestRecord`, `RequestContext`, `CarbonMetrics`)

pub mod types;

pub use types::*;
