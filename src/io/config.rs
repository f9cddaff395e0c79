//! Endpoint configuration loading and normalization.
//!
//! The configuration file is a JSON object mapping request paths to endpoint
//! records:
//!
//! ```json
//! {
//!   "/api/todos": {
//!     "energy_model": { "kind": "linear", "intercept": 0.1, "time_coeff": 2.0, "size_coeff": 0.000001 },
//!     "embodied": 0.05,
//!     "grid_intensity": 420
//!   },
//!   "/health": { "energy_model": 0.01, "grid_intensity": 420 }
//! }
//! ```
//!
//! Values are coerced best-effort (quoted numbers, booleans, `null`) rather than
//! validated. Anything that cannot be interpreted degrades to a documented
//! default and is reported as a `ConfigWarning` instead of failing the load.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::context::normalize_path;
use crate::domain::{CurveInput, CurvePoint, EndpointConfig, EndpointTable, EnergyModel, Extrapolation};
use crate::error::AppError;
use crate::math::{finite_number, to_number_opt};

const LOG_TARGET: &str = "config";

/// Something in the configuration that was ignored or degraded during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub path: String,
    pub message: String,
}

/// Load output: the immutable table plus everything that was degraded.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub table: EndpointTable,
    pub warnings: Vec<ConfigWarning>,
}

/// Read and normalize a configuration file.
pub fn load_endpoint_table(path: &Path) -> Result<LoadedConfig, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::input(format!("Failed to read configuration '{}': {e}", path.display())))?;
    let loaded = parse_endpoint_table(&text)
        .map_err(|e| AppError::input(format!("{} ({})", e.message(), path.display())))?;

    log::info!(
        target: LOG_TARGET,
        "Loaded {} endpoint(s) from '{}' with {} warning(s)",
        loaded.table.len(),
        path.display(),
        loaded.warnings.len()
    );
    Ok(loaded)
}

/// Parse configuration JSON text.
pub fn parse_endpoint_table(text: &str) -> Result<LoadedConfig, AppError> {
    let root: Value =
        serde_json::from_str(text).map_err(|e| AppError::input(format!("Invalid configuration JSON: {e}")))?;
    endpoint_table_from_value(&root)
}

/// Normalize an already-parsed configuration document.
pub fn endpoint_table_from_value(root: &Value) -> Result<LoadedConfig, AppError> {
    let Value::Object(entries) = root else {
        return Err(AppError::input(
            "Configuration must be a JSON object mapping paths to endpoint settings.",
        ));
    };

    let mut warnings = Vec::new();
    let mut endpoints = Vec::with_capacity(entries.len());

    for (path, raw) in entries {
        if normalize_path(path) != *path {
            warn(
                &mut warnings,
                path,
                format!(
                    "key is not a normalized path; only requests with extra trailing separators reach it (plain requests resolve to '{}')",
                    normalize_path(path)
                ),
            );
        }
        if let Some(config) = endpoint_from_value(path, raw, &mut warnings) {
            endpoints.push((path.clone(), config));
        }
    }

    Ok(LoadedConfig {
        table: endpoints.into_iter().collect(),
        warnings,
    })
}

/// A falsy entry (`null`, `false`, `0`, `""`) is treated as not configured.
fn endpoint_from_value(path: &str, raw: &Value, warnings: &mut Vec<ConfigWarning>) -> Option<EndpointConfig> {
    if is_falsy(raw) {
        return None;
    }
    let Value::Object(fields) = raw else {
        warn(warnings, path, "endpoint entry is not an object; all figures default to 0");
        return Some(EndpointConfig::default());
    };

    Some(EndpointConfig {
        energy_model: fields
            .get("energy_model")
            .and_then(|model| energy_model_from_value(path, model, warnings)),
        embodied: fields.get("embodied").and_then(finite_number),
        embodied_legacy: fields.get("emboddied").and_then(finite_number),
        grid_intensity: to_number_opt(fields.get("grid_intensity"), 0.0),
    })
}

/// Fold the loose model shapes into a canonical `EnergyModel`.
///
/// - a bare number is `Constant`
/// - an object dispatches on `kind` (missing/empty means constant)
/// - falsy values mean "no model"
/// - any other scalar is a constant without a value, i.e. zero
pub fn energy_model_from_value(path: &str, raw: &Value, warnings: &mut Vec<ConfigWarning>) -> Option<EnergyModel> {
    if is_falsy(raw) {
        return None;
    }
    match raw {
        Value::Number(n) => Some(EnergyModel::Constant {
            value: n.as_f64().unwrap_or(0.0),
        }),
        Value::Object(fields) => Some(model_from_object(path, fields, warnings)),
        other => {
            warn(
                warnings,
                path,
                format!("energy_model {other} is neither a number nor an object; treated as 0"),
            );
            Some(EnergyModel::Constant { value: 0.0 })
        }
    }
}

fn model_from_object(path: &str, fields: &Map<String, Value>, warnings: &mut Vec<ConfigWarning>) -> EnergyModel {
    let kind = match fields.get("kind") {
        None => "constant".to_string(),
        Some(v) if is_falsy(v) => "constant".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    match kind.as_str() {
        "constant" => EnergyModel::Constant {
            value: to_number_opt(fields.get("value"), 0.0),
        },
        "linear" => EnergyModel::Linear {
            intercept: to_number_opt(fields.get("intercept"), 0.0),
            time_coeff: to_number_opt(fields.get("time_coeff"), 0.0),
            size_coeff: to_number_opt(fields.get("size_coeff"), 0.0),
        },
        "curve" => EnergyModel::Curve {
            points: curve_points(path, fields.get("points"), warnings),
            input: CurveInput::from_config(fields.get("input").and_then(Value::as_str)),
            extrapolate: Extrapolation::from_config(
                fields
                    .get("extrapolate")
                    .filter(|v| !is_falsy(v))
                    .and_then(Value::as_str),
            ),
        },
        _ => {
            warn(warnings, path, format!("unsupported energy model kind '{kind}'; energy is 0"));
            EnergyModel::Unsupported { name: kind }
        }
    }
}

/// Keep every `[x, y, ...]` entry whose first two coordinates coerce to finite
/// numbers; drop everything else.
fn curve_points(path: &str, raw: Option<&Value>, warnings: &mut Vec<ConfigWarning>) -> Vec<CurvePoint> {
    let entries: &[Value] = match raw {
        Some(Value::Array(entries)) => entries.as_slice(),
        None | Some(Value::Null) => &[],
        Some(other) => {
            warn(warnings, path, format!("curve points {other} are not a list; curve evaluates to 0"));
            &[]
        }
    };

    let mut points = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        match curve_point(entry) {
            Some(point) => points.push(point),
            None => warn(warnings, path, format!("dropped malformed curve point #{idx}: {entry}")),
        }
    }

    if points.is_empty() {
        warn(warnings, path, "curve has no usable points; energy is 0");
    }
    points
}

fn curve_point(entry: &Value) -> Option<CurvePoint> {
    let Value::Array(coords) = entry else {
        return None;
    };
    let [x, y, ..] = coords.as_slice() else {
        return None;
    };
    CurvePoint::new(finite_number(x)?, finite_number(y)?)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn warn(warnings: &mut Vec<ConfigWarning>, path: &str, message: impl Into<String>) {
    let message = message.into();
    log::warn!(target: LOG_TARGET, "{path}: {message}");
    warnings.push(ConfigWarning {
        path: path.to_string(),
        message,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load(value: Value) -> LoadedConfig {
        endpoint_table_from_value(&value).unwrap()
    }

    #[test]
    fn bare_number_is_constant() {
        let loaded = load(json!({"/a": {"energy_model": 5}}));
        let config = loaded.table.lookup("/a").unwrap();
        assert_eq!(config.energy_model, Some(EnergyModel::Constant { value: 5.0 }));
    }

    #[test]
    fn kind_defaults_to_constant() {
        let loaded = load(json!({
            "/a": {"energy_model": {"value": "2.5"}},
            "/b": {"energy_model": {"kind": "", "value": 1}},
            "/c": {"energy_model": {"kind": "constant"}}
        }));
        assert_eq!(
            loaded.table.lookup("/a").unwrap().energy_model,
            Some(EnergyModel::Constant { value: 2.5 })
        );
        assert_eq!(
            loaded.table.lookup("/b").unwrap().energy_model,
            Some(EnergyModel::Constant { value: 1.0 })
        );
        assert_eq!(
            loaded.table.lookup("/c").unwrap().energy_model,
            Some(EnergyModel::Constant { value: 0.0 })
        );
    }

    #[test]
    fn linear_coefficients_default_independently() {
        let loaded = load(json!({"/a": {"energy_model": {"kind": "linear", "time_coeff": "3", "size_coeff": "x"}}}));
        assert_eq!(
            loaded.table.lookup("/a").unwrap().energy_model,
            Some(EnergyModel::Linear {
                intercept: 0.0,
                time_coeff: 3.0,
                size_coeff: 0.0
            })
        );
    }

    #[test]
    fn malformed_curve_points_are_dropped() {
        let loaded = load(json!({"/a": {"energy_model": {
            "kind": "curve",
            "input": "time",
            "extrapolate": "clamp",
            "points": [[0, 10], [1], "bad", "12", [2, "x"], ["3", "30", 99], {"x": 1, "y": 2}, [null, 4]]
        }}}));
        let Some(EnergyModel::Curve {
            points,
            input,
            extrapolate,
        }) = &loaded.table.lookup("/a").unwrap().energy_model
        else {
            panic!("expected curve");
        };
        assert_eq!(
            points,
            &vec![
                CurvePoint { x: 0.0, y: 10.0 },
                CurvePoint { x: 3.0, y: 30.0 },
                CurvePoint { x: 0.0, y: 4.0 },
            ]
        );
        assert_eq!(*input, CurveInput::Time);
        assert_eq!(*extrapolate, Extrapolation::Clamp);
        assert_eq!(loaded.warnings.len(), 5);
    }

    #[test]
    fn curve_defaults() {
        let loaded = load(json!({"/a": {"energy_model": {"kind": "curve", "points": [[0, 1]], "extrapolate": ""}}}));
        let Some(EnergyModel::Curve { input, extrapolate, .. }) = &loaded.table.lookup("/a").unwrap().energy_model
        else {
            panic!("expected curve");
        };
        assert_eq!(*input, CurveInput::Size);
        assert_eq!(*extrapolate, Extrapolation::LinearTail);
    }

    #[test]
    fn unknown_kind_is_kept_as_unsupported() {
        let loaded = load(json!({"/a": {"energy_model": {"kind": "quadratic"}}}));
        assert_eq!(
            loaded.table.lookup("/a").unwrap().energy_model,
            Some(EnergyModel::Unsupported {
                name: "quadratic".to_string()
            })
        );
        assert_eq!(loaded.warnings.len(), 1);
    }

    #[test]
    fn embodied_alias_and_grid_intensity() {
        let loaded = load(json!({
            "/canonical": {"embodied": 1, "emboddied": 9, "grid_intensity": "3"},
            "/legacy": {"emboddied": "0.5"},
            "/bad-canonical": {"embodied": "n/a", "emboddied": 2},
            "/none": {}
        }));
        assert_eq!(loaded.table.lookup("/canonical").unwrap().embodied_rate(), 1.0);
        assert_eq!(loaded.table.lookup("/canonical").unwrap().grid_intensity, 3.0);
        assert_eq!(loaded.table.lookup("/legacy").unwrap().embodied_rate(), 0.5);
        assert_eq!(loaded.table.lookup("/bad-canonical").unwrap().embodied_rate(), 2.0);
        assert_eq!(loaded.table.lookup("/none").unwrap().embodied_rate(), 0.0);
        assert_eq!(loaded.table.lookup("/none").unwrap().energy_model, None);
    }

    #[test]
    fn falsy_and_non_object_entries() {
        let loaded = load(json!({"/off": null, "/zero": 0, "/weird": "yes"}));
        assert!(loaded.table.lookup("/off").is_none());
        assert!(loaded.table.lookup("/zero").is_none());
        assert_eq!(loaded.table.lookup("/weird"), Some(&EndpointConfig::default()));
    }

    #[test]
    fn non_normalized_keys_are_flagged() {
        let loaded = load(json!({"/a/": {"energy_model": 1}}));
        assert!(loaded.table.lookup("/a/").is_some());
        assert_eq!(loaded.warnings.len(), 1);
        assert_eq!(loaded.warnings[0].path, "/a/");
    }

    #[test]
    fn top_level_must_be_object() {
        let err = parse_endpoint_table("[1, 2]").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(parse_endpoint_table("{not json").is_err());
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("request-carbon-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"/": {"energy_model": 2, "embodied": 1, "grid_intensity": 3}}"#).unwrap();
        let loaded = load_endpoint_table(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(loaded.table.len(), 1);
        assert!(load_endpoint_table(Path::new("/definitely/missing.json")).is_err());
    }
}
