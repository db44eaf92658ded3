//! Loose coordinate input -> `f64`

use serde_json::Value;

/// Read a coordinate from arbitrary JSON.
///
/// Numbers and numeric strings are taken as is; anything else, including
/// non-finite results, becomes `0.0`.
pub fn coerce_coordinate(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Coerce a `(latitude, longitude)` pair
pub fn coerce_pair(latitude: &Value, longitude: &Value) -> (f64, f64) {
    (coerce_coordinate(latitude), coerce_coordinate(longitude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_and_numeric_strings() {
        assert_eq!(coerce_coordinate(&json!(-6.2)), -6.2);
        assert_eq!(coerce_coordinate(&json!(106)), 106.0);
        assert_eq!(coerce_coordinate(&json!(" 106.816 ")), 106.816);
        assert_eq!(coerce_coordinate(&json!("1e2")), 100.0);
    }

    #[test]
    fn test_malformed_values_become_zero() {
        for value in [json!("abc"), json!(""), json!(null), json!(true), json!([1.0]), json!({"lat": 1})] {
            assert_eq!(coerce_coordinate(&value), 0.0, "{}", value);
        }
        assert_eq!(coerce_coordinate(&json!("NaN")), 0.0);
        assert_eq!(coerce_coordinate(&json!("inf")), 0.0);
    }

    #[test]
    fn test_pair_order_is_lat_lon() {
        assert_eq!(coerce_pair(&json!("-6.2"), &json!(106.8)), (-6.2, 106.8));
    }
}
