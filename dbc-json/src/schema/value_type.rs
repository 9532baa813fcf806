//! Value type inference
//!
//! Chooses the native representation of a signal from its scaling and range.

use crate::types::ValueType;

const SIGNED_RANGES: [(ValueType, f64, f64); 3] = [
    (ValueType::Int8, i8::MIN as f64, i8::MAX as f64),
    (ValueType::Int16, i16::MIN as f64, i16::MAX as f64),
    (ValueType::Int32, i32::MIN as f64, i32::MAX as f64),
];

const UNSIGNED_LIMITS: [(ValueType, f64); 3] = [
    (ValueType::Uint8, u8::MAX as f64),
    (ValueType::Uint16, u16::MAX as f64),
    (ValueType::Uint32, u32::MAX as f64),
];

/// Infer the value type of a signal
///
/// Rules, first match wins:
/// 1. any fractional scale, offset, minimum or maximum gives `float`
/// 2. a missing minimum or maximum gives `int64`
/// 3. a negative minimum picks the smallest signed type holding `[min, max]`
/// 4. otherwise the smallest unsigned type holding `max`
///
/// Missing scale or offset counts as integral. Never fails.
pub fn infer_value_type(
    scale: Option<f64>,
    offset: Option<f64>,
    minimum: Option<f64>,
    maximum: Option<f64>,
) -> ValueType {
    let all_integral = [scale, offset, minimum, maximum]
        .iter()
        .flatten()
        .all(|v| is_integral(*v));

    if !all_integral {
        return ValueType::Float;
    }

    let (min, max) = match (minimum, maximum) {
        (Some(min), Some(max)) => (min, max),
        _ => return ValueType::Int64,
    };

    if min < 0.0 {
        SIGNED_RANGES
            .iter()
            .find(|(_, lo, hi)| min >= *lo && max <= *hi)
            .map(|(vt, _, _)| *vt)
            .unwrap_or(ValueType::Int64)
    } else {
        UNSIGNED_LIMITS
            .iter()
            .find(|(_, hi)| max <= *hi)
            .map(|(vt, _)| *vt)
            .unwrap_or(ValueType::Uint64)
    }
}

/// NaN and infinities are not integral
fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}
