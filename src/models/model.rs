//! Energy model dispatch.
//!
//! Every variant maps a `RequestContext` to a scalar energy estimate. Evaluation
//! is pure and infallible: missing models and unsupported kinds yield zero.

use crate::domain::{EnergyModel, RequestContext};
use crate::models::curve::evaluate_curve;

const LOG_TARGET: &str = "models";

/// Estimate the energy of one request under `model`.
pub fn evaluate_energy(model: Option<&EnergyModel>, ctx: &RequestContext) -> f64 {
    let Some(model) = model else {
        return 0.0;
    };

    log::trace!(target: LOG_TARGET, "Evaluating {} model", model.kind_name());

    match model {
        EnergyModel::Constant { value } => *value,
        EnergyModel::Linear {
            intercept,
            time_coeff,
            size_coeff,
        } => intercept + time_coeff * ctx.time_sec + size_coeff * ctx.data_size_bytes,
        EnergyModel::Curve {
            points,
            input,
            extrapolate,
        } => evaluate_curve(points, *input, *extrapolate, ctx),
        EnergyModel::Unsupported { .. } => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurveInput, CurvePoint, Extrapolation};

    fn ctx(time_sec: f64, data_size_bytes: f64) -> RequestContext {
        RequestContext {
            time_sec,
            data_size_bytes,
        }
    }

    #[test]
    fn absent_model_is_zero() {
        assert_eq!(evaluate_energy(None, &ctx(3.0, 100.0)), 0.0);
    }

    #[test]
    fn constant_ignores_context() {
        let model = EnergyModel::Constant { value: 5.0 };
        assert_eq!(evaluate_energy(Some(&model), &ctx(3.0, 100.0)), 5.0);
    }

    #[test]
    fn linear_combines_time_and_size() {
        let model = EnergyModel::Linear {
            intercept: 1.0,
            time_coeff: 2.0,
            size_coeff: 0.0,
        };
        assert_eq!(evaluate_energy(Some(&model), &ctx(3.0, 0.0)), 7.0);

        let model = EnergyModel::Linear {
            intercept: 0.0,
            time_coeff: 0.0,
            size_coeff: 0.5,
        };
        assert_eq!(evaluate_energy(Some(&model), &ctx(3.0, 10.0)), 5.0);
    }

    #[test]
    fn linear_uses_negative_time_unclamped() {
        let model = EnergyModel::Linear {
            intercept: 1.0,
            time_coeff: 2.0,
            size_coeff: 0.0,
        };
        assert_eq!(evaluate_energy(Some(&model), &ctx(-1.0, 0.0)), -1.0);
    }

    #[test]
    fn curve_delegates() {
        let model = EnergyModel::Curve {
            points: vec![CurvePoint { x: 0.0, y: 10.0 }, CurvePoint { x: 10.0, y: 20.0 }],
            input: CurveInput::Time,
            extrapolate: Extrapolation::LinearTail,
        };
        assert_eq!(evaluate_energy(Some(&model), &ctx(20.0, 0.0)), 30.0);
    }

    #[test]
    fn unsupported_kind_is_zero() {
        let model = EnergyModel::Unsupported {
            name: "quadratic".to_string(),
        };
        assert_eq!(evaluate_energy(Some(&model), &ctx(3.0, 100.0)), 0.0);
    }
}
