//! Forgiving extraction of flat JSON overrides.
//!
//! Each helper reads `params[name]` and falls back to `default` when the key
//! is missing or holds the wrong type. They never fail, so a partial or
//! sloppy override object still yields a usable configuration.

use serde_json::Value;

/// Reads a number (integers included) as `f64`.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Reads a non-negative integer as `usize`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Reads a JSON boolean; anything else falls back to `default`.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Reads a string and maps it through `choices`; unknown strings fall back
/// to `default` like any other mismatch.
pub fn param_choice<T: Copy>(params: &Value, name: &str, choices: &[(&str, T)], default: T) -> T {
    params
        .get(name)
        .and_then(Value::as_str)
        .and_then(|s| {
            choices
                .iter()
                .find(|(label, _)| label.eq_ignore_ascii_case(s))
                .map(|&(_, v)| v)
        })
        .unwrap_or(default)
}
