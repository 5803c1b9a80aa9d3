//! Rendering of JSON scalars into cell text

use crate::melt::types::{MeltConfig, NumberFormat};
use serde_json::{Number, Value};

/// Significant digits used by [`NumberFormat::General`]
const GENERAL_PRECISION: i32 = 6;

/// Plain decimal range for [`NumberFormat::Shortest`]; magnitudes outside
/// it switch to exponent notation.
const PLAIN_MIN: f64 = 1e-5;
const PLAIN_MAX: f64 = 1e16;

/// Render a value as the text stored in a cell
///
/// Strings are kept verbatim (escaping happens on export), null becomes the
/// empty string and containers become the configured placeholder.
pub fn render_value(value: &Value, config: &MeltConfig) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => render_number(n, config.number_format),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Object(_) | Value::Array(_) => config.complex_placeholder.clone(),
    }
}

pub fn render_number(n: &Number, format: NumberFormat) -> String {
    match format {
        NumberFormat::Shortest => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(format_shortest).unwrap_or_else(|| n.to_string())
            }
        }
        NumberFormat::General => n
            .as_f64()
            .map(format_general)
            .unwrap_or_else(|| n.to_string()),
    }
}

/// Shortest text that reads back as the same `f64`: plain decimals for
/// moderate magnitudes, `<mantissa>e<exponent>` otherwise.
pub fn format_shortest(v: f64) -> String {
    let magnitude = v.abs();
    if v == 0.0 || !v.is_finite() || (PLAIN_MIN..PLAIN_MAX).contains(&magnitude) {
        v.to_string()
    } else {
        format!("{:e}", v)
    }
}

/// Format like C's `%g`: six significant digits, trailing zeros removed,
/// exponent notation below 1e-4 or from 1e6 upwards.
pub fn format_general(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Round to the target precision first; the exponent decides the notation.
    let scientific = format!("{:.*e}", (GENERAL_PRECISION - 1) as usize, v);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= GENERAL_PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (GENERAL_PRECISION - 1 - exponent) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, v)).to_string()
    }
}

fn strip_trailing_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
