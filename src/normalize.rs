use serde_json::Value;
use tracing::debug;

pub const MIN_PERCENTAGE: f64 = 0.0;
pub const MAX_PERCENTAGE: f64 = 100.0;

/// Values at or below this are read as a 10-point CGPA.
///
/// Known flaw: a genuine 10% is indistinguishable from a CGPA of 10 and gets
/// scaled to 100. Kept as-is so existing clients see the same numbers.
pub const TEN_POINT_SCALE_MAX: f64 = 10.0;

/// Reads a client-supplied value as a number. Anything unusable becomes 0.0.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        None | Some(Value::Null) => Some(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        Some(Value::Array(_)) | Some(Value::Object(_)) => None,
    };

    match parsed {
        Some(v) if v.is_finite() => v,
        _ => {
            debug!(?value, "Could not read numeric input, using 0.0");
            0.0
        }
    }
}

/// Reads an optional identity field. Non-strings become empty.
pub fn coerce_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

pub fn clamp_percentage(value: f64) -> f64 {
    value.clamp(MIN_PERCENTAGE, MAX_PERCENTAGE)
}

/// Converts a CGPA on either a 10-point or a percentage scale into [0, 100].
pub fn normalize_cgpa(raw: f64) -> f64 {
    let scaled = if raw <= TEN_POINT_SCALE_MAX { raw * 10.0 } else { raw };
    clamp_percentage(scaled)
}

pub fn normalize_attendance(raw: f64) -> f64 {
    clamp_percentage(raw)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cgpa_ten_point_scale() {
        assert_eq!(normalize_cgpa(8.0), 80.0);
        assert_eq!(normalize_cgpa(7.25), 72.5);
    }

    #[test]
    fn test_cgpa_exactly_ten_is_scaled() {
        // a real 10% lands here too and comes out as 100
        assert_eq!(normalize_cgpa(10.0), 100.0);
    }

    #[test]
    fn test_cgpa_just_above_threshold_kept() {
        assert_eq!(normalize_cgpa(10.01), 10.01);
        assert_eq!(normalize_cgpa(78.0), 78.0);
    }

    #[test]
    fn test_cgpa_clamped() {
        assert_eq!(normalize_cgpa(-5.0), 0.0);
        assert_eq!(normalize_cgpa(150.0), 100.0);
        assert_eq!(normalize_cgpa(0.0), 0.0);
    }

    #[test]
    fn test_attendance_clamped() {
        assert_eq!(normalize_attendance(-1.0), 0.0);
        assert_eq!(normalize_attendance(101.5), 100.0);
        assert_eq!(normalize_attendance(92.5), 92.5);
        // no scale heuristic for attendance
        assert_eq!(normalize_attendance(8.0), 8.0);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(Some(&json!(92.5))), 92.5);
        assert_eq!(coerce_number(Some(&json!(90))), 90.0);
        assert_eq!(coerce_number(Some(&json!(" 8.5 "))), 8.5);
        assert_eq!(coerce_number(Some(&json!(true))), 1.0);
    }

    #[test]
    fn test_coerce_number_fails_soft() {
        assert_eq!(coerce_number(None), 0.0);
        assert_eq!(coerce_number(Some(&Value::Null)), 0.0);
        assert_eq!(coerce_number(Some(&json!("ninety"))), 0.0);
        assert_eq!(coerce_number(Some(&json!("NaN"))), 0.0);
        assert_eq!(coerce_number(Some(&json!([1, 2]))), 0.0);
        assert_eq!(coerce_number(Some(&json!({"v": 1}))), 0.0);
    }

    #[test]
    fn test_coerce_text() {
        assert_eq!(coerce_text(Some(&json!("  Jane  "))), "Jane");
        assert_eq!(coerce_text(Some(&json!(42))), "");
        assert_eq!(coerce_text(None), "");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(71.23456), 71.23);
        assert_eq!(round2(0.0), 0.0);
    }
}
