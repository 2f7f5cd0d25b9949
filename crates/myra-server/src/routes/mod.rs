pub mod agreements;
pub mod livestock;
pub mod zones;

use crate::error::AppError;

/// Parse a path parameter that must be numeric; the error message names
/// the parameter and says "numeric", matching the external contract.
pub(crate) fn numeric_path_param(name: &str, raw: &str) -> Result<i32, AppError> {
    raw.parse::<i32>()
        .map_err(|_| AppError::bad_request(format!("{name} must be provided and be numeric")))
}

/// Extract a numeric body value that may arrive as a JSON number or a
/// numeric string.
pub(crate) fn numeric_body_value(value: Option<&serde_json::Value>) -> Option<i32> {
    match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Some(serde_json::Value::String(s)) => s.parse::<i32>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_path_param_accepts_digits() {
        assert_eq!(numeric_path_param("zoneId", "42").unwrap(), 42);
    }

    #[test]
    fn numeric_path_param_rejects_text() {
        assert!(numeric_path_param("zoneId", "abc").is_err());
    }

    #[test]
    fn numeric_body_value_accepts_number_and_numeric_string() {
        assert_eq!(numeric_body_value(Some(&serde_json::json!(7))), Some(7));
        assert_eq!(numeric_body_value(Some(&serde_json::json!("7"))), Some(7));
    }

    #[test]
    fn numeric_body_value_rejects_text_and_missing() {
        assert_eq!(numeric_body_value(Some(&serde_json::json!("abc"))), None);
        assert_eq!(numeric_body_value(None), None);
    }
}
