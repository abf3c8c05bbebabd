//! Value normalization applied before values reach the index.
//!
//! Numeric coercion is deliberately permissive: it parses the longest numeric
//! prefix of the input and falls back to zero. It is not input validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{BackendType, IndexValue};

static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("numeric prefix pattern is valid")
});

/// Whether zero-like values count as indexable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroValuePolicy {
    /// `0`, `0.0`, `""` and `"0"` are treated as "no value" and dropped.
    #[default]
    Drop,
    /// Blank raw inputs are dropped before coercion; numeric zero and `"0"` are kept.
    Keep,
}

impl ZeroValuePolicy {
    /// Returns `true` when the raw input should go through coercion at all.
    pub fn accepts_raw(self, raw: &str) -> bool {
        match self {
            ZeroValuePolicy::Drop => true,
            ZeroValuePolicy::Keep => !raw.trim().is_empty(),
        }
    }

    /// Returns `true` when a normalized value should be written to the index.
    pub fn is_indexable(self, value: &IndexValue) -> bool {
        match (self, value) {
            (_, IndexValue::Text(text)) if text.is_empty() => false,
            (ZeroValuePolicy::Keep, _) => true,
            (ZeroValuePolicy::Drop, IndexValue::Integer(number)) => *number != 0,
            (ZeroValuePolicy::Drop, IndexValue::Double(number)) => *number != 0.0,
            (ZeroValuePolicy::Drop, IndexValue::Text(text)) => text != "0",
        }
    }

    /// Same predicate for resolved option texts; `None` is never indexable.
    pub fn is_indexable_text(self, text: Option<&str>) -> bool {
        match text {
            None | Some("") => false,
            Some("0") => self == ZeroValuePolicy::Keep,
            Some(_) => true,
        }
    }
}

/// Coerce a raw value according to the attribute's storage type.
pub fn prepare_simple_value(backend_type: &BackendType, raw: &str) -> IndexValue {
    match backend_type {
        BackendType::Decimal => IndexValue::Double(coerce_float(raw)),
        BackendType::Int => IndexValue::Integer(coerce_int(raw)),
        _ => IndexValue::Text(raw.to_string()),
    }
}

/// Best-effort float parse; non-numeric input yields `0.0`.
pub fn coerce_float(raw: &str) -> f64 {
    numeric_prefix(raw)
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Best-effort integer parse; fractions truncate toward zero, overflow saturates.
pub fn coerce_int(raw: &str) -> i64 {
    let Some(prefix) = numeric_prefix(raw) else {
        return 0;
    };
    if let Ok(value) = prefix.parse::<i64>() {
        return value;
    }
    // `as` saturates at the i64 bounds and maps NaN to zero.
    prefix.parse::<f64>().map(|value| value as i64).unwrap_or(0)
}

fn numeric_prefix(raw: &str) -> Option<&str> {
    NUMERIC_PREFIX.find(raw.trim_start()).map(|found| found.as_str())
}
