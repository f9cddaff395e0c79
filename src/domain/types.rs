//! Shared domain types.
//!
//! Configuration arrives loosely typed (see `io::config`) and is normalized into
//! the canonical types below before any request is evaluated. Request-scoped
//! values (`RequestContext`, `CarbonMetrics`) are plain `Copy` data.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// One `(x, y)` sample of an energy curve. Both coordinates are finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

impl CurvePoint {
    /// Build a point, rejecting non-finite coordinates.
    pub fn new(x: f64, y: f64) -> Option<Self> {
        if x.is_finite() && y.is_finite() {
            Some(Self { x, y })
        } else {
            None
        }
    }
}

/// Which request measurement a curve is indexed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveInput {
    /// Elapsed time in seconds.
    Time,
    /// Transferred bytes. Anything other than `"time"` selects this.
    #[default]
    Size,
}

impl CurveInput {
    pub fn from_config(raw: Option<&str>) -> Self {
        match raw {
            Some("time") => CurveInput::Time,
            _ => CurveInput::Size,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CurveInput::Time => "time",
            CurveInput::Size => "size",
        }
    }
}

/// Behavior outside the configured x-range of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolation {
    /// Hold the boundary point's y.
    Clamp,
    /// Extend the line through the two points nearest the boundary.
    #[default]
    LinearTail,
}

impl Extrapolation {
    /// Only the exact string `"clamp"` clamps; every other value extends.
    pub fn from_config(raw: Option<&str>) -> Self {
        match raw {
            Some("clamp") => Extrapolation::Clamp,
            _ => Extrapolation::LinearTail,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Extrapolation::Clamp => "clamp",
            Extrapolation::LinearTail => "linear_tail",
        }
    }
}

/// Canonical energy model of an endpoint.
///
/// The bare-number shorthand of the configuration file is folded into
/// `Constant` by the loader, so evaluators only ever see these variants.
#[derive(Debug, Clone, PartialEq)]
pub enum EnergyModel {
    Constant {
        value: f64,
    },
    Linear {
        intercept: f64,
        time_coeff: f64,
        size_coeff: f64,
    },
    Curve {
        /// Usable points in configuration order (malformed entries already dropped).
        points: Vec<CurvePoint>,
        input: CurveInput,
        extrapolate: Extrapolation,
    },
    /// A `kind` this crate does not know; always evaluates to zero.
    Unsupported {
        name: String,
    },
}

impl EnergyModel {
    pub fn kind_name(&self) -> &str {
        match self {
            EnergyModel::Constant { .. } => "constant",
            EnergyModel::Linear { .. } => "linear",
            EnergyModel::Curve { .. } => "curve",
            EnergyModel::Unsupported { name } => name,
        }
    }
}

/// Resolve the embodied carbon rate: canonical field, then the legacy
/// misspelled alias, then zero.
pub fn resolve_embodied_rate(canonical: Option<f64>, legacy: Option<f64>) -> f64 {
    canonical.or(legacy).unwrap_or(0.0)
}

/// Per-path configuration record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointConfig {
    pub energy_model: Option<EnergyModel>,
    /// `embodied` in the configuration file.
    pub embodied: Option<f64>,
    /// `emboddied` in the configuration file (historical spelling).
    pub embodied_legacy: Option<f64>,
    pub grid_intensity: f64,
}

impl EndpointConfig {
    pub fn embodied_rate(&self) -> f64 {
        resolve_embodied_rate(self.embodied, self.embodied_legacy)
    }
}

/// Immutable mapping from normalized request path to endpoint configuration.
///
/// Built once at startup and only read afterwards; share it by reference or
/// behind an `Arc` between concurrent evaluations.
#[derive(Debug, Clone, Default)]
pub struct EndpointTable {
    endpoints: HashMap<String, EndpointConfig>,
}

impl EndpointTable {
    pub fn new(endpoints: HashMap<String, EndpointConfig>) -> Self {
        Self { endpoints }
    }

    /// Exact-match lookup; callers pass an already normalized path.
    pub fn lookup(&self, path: &str) -> Option<&EndpointConfig> {
        self.endpoints.get(path)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Paths in lexicographic order (for stable reports).
    pub fn sorted_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.endpoints.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}

impl FromIterator<(String, EndpointConfig)> for EndpointTable {
    fn from_iter<I: IntoIterator<Item = (String, EndpointConfig)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Raw per-request fields as exposed by the proxy (all strings, all optional).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestRecord {
    pub uri: Option<String>,
    /// Upstream elapsed seconds, possibly comma-chained across hops or `"-"`.
    pub upstream_response_time: Option<String>,
    /// Total request elapsed seconds, same format.
    pub request_time: Option<String>,
    pub request_length: Option<String>,
    pub body_bytes_sent: Option<String>,
}

/// Measurements an energy model is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RequestContext {
    /// Elapsed seconds. Not clamped: a negative parsed time flows through as-is.
    pub time_sec: f64,
    pub data_size_bytes: f64,
}

/// Per-request derived figures, prior to display formatting.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CarbonMetrics {
    pub energy: f64,
    pub embodied_rate: f64,
    pub embodied_total: f64,
    pub grid_intensity: f64,
    pub operational_total: f64,
    pub total_carbon: f64,
    pub time_sec: f64,
    pub data_size_bytes: f64,
}

/// Outcome of evaluating one replayed access-log row.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedRequest {
    pub line: usize,
    pub timestamp: Option<DateTime<FixedOffset>>,
    /// Normalized lookup path.
    pub path: String,
    /// Whether the path matched a configured endpoint.
    pub matched: bool,
    pub metrics: CarbonMetrics,
}
