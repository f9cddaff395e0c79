//! Piecewise-linear energy curves.
//!
//! A curve is a set of `(x, y)` samples indexed either by elapsed time or by
//! transferred bytes. Between samples we interpolate linearly; outside the
//! sampled range the extrapolation policy decides between holding the boundary
//! value and extending the nearest segment.

use std::cmp::Ordering;

use crate::domain::{CurveInput, CurvePoint, Extrapolation, RequestContext};
use crate::math::linear_interpolate;

/// Evaluate a curve at the context's time or size.
///
/// Returns `0` when no points are configured. A single point is a constant
/// regardless of the extrapolation policy.
pub fn evaluate_curve(
    points: &[CurvePoint],
    input: CurveInput,
    extrapolate: Extrapolation,
    ctx: &RequestContext,
) -> f64 {
    if points.is_empty() {
        return 0.0;
    }

    // Stable sort: points sharing an x keep their configured order.
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));

    let x = match input {
        CurveInput::Time => ctx.time_sec,
        CurveInput::Size => ctx.data_size_bytes,
    };

    let n = sorted.len();
    let first = sorted[0];
    let last = sorted[n - 1];
    let clamp = extrapolate == Extrapolation::Clamp || n < 2;

    if x <= first.x {
        if clamp {
            return first.y;
        }
        return through(x, first, sorted[1]);
    }

    if x >= last.x {
        if clamp {
            return last.y;
        }
        return through(x, sorted[n - 2], last);
    }

    sorted
        .windows(2)
        .find(|pair| pair[0].x <= x && x <= pair[1].x)
        .map_or(0.0, |pair| through(x, pair[0], pair[1]))
}

fn through(x: f64, left: CurvePoint, right: CurvePoint) -> f64 {
    linear_interpolate(x, left.x, left.y, right.x, right.y)
}
