//! Straight-line interpolation through two points.

/// Evaluate the line through `(x0, y0)` and `(x1, y1)` at `x`.
///
/// Works for interpolation and extrapolation alike. When both points share the
/// same x the line is undefined and `y1` is returned.
pub fn linear_interpolate(x: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    if x1 == x0 {
        return y1;
    }
    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}
