//! Helpers for reading generator options out of a `serde_json::Value` object.
//!
//! Numeric and boolean helpers never fail: a missing or mistyped key yields
//! the default. Named selections (wrap modes, easings, colors) are different:
//! a present but unrecognized name is an error, so a typo in a config never
//! silently becomes the default.

use std::str::FromStr;

use serde_json::Value;

use crate::error::GridError;
use crate::pixel::Rgba;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or
/// not a number. Integers are accepted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `bool` from `params[name]`, returning `default` if missing or
/// wrong type.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Parses the string at `params[name]` with `T::from_str`.
///
/// Returns `Ok(default)` when the key is missing or not a string, and the
/// parse error when the string is not a recognized name.
pub fn param_parsed<T>(params: &Value, name: &str, default: T) -> Result<T, GridError>
where
    T: FromStr<Err = GridError>,
{
    match params.get(name).and_then(Value::as_str) {
        Some(s) => s.parse(),
        None => Ok(default),
    }
}

/// Parses a hex color at `params[name]`.
///
/// Returns `Ok(None)` when the key is missing or null, and
/// `GridError::InvalidColor` for a string that is not a hex color.
pub fn param_color(params: &Value, name: &str) -> Result<Option<Rgba>, GridError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(hex)) => Rgba::from_hex(hex).map(Some),
        Some(other) => Err(GridError::InvalidColor(format!(
            "'{name}' must be a hex string, got {other}"
        ))),
    }
}
