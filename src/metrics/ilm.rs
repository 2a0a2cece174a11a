use serde_json::Value;

use crate::error::MetricError;

const ERROR_STEP: &str = "ERROR";

/// 1 when any ILM-managed index sits on the `ERROR` step, 0 otherwise.
///
/// # Errors
///
/// Fails when the response has no `indices` object.
pub fn ilm_explain(response: &Value) -> Result<u8, MetricError> {
    let indices = response
        .get("indices")
        .and_then(Value::as_object)
        .ok_or_else(|| MetricError::MissingField {
            field: "indices".to_string(),
        })?;

    let failing = indices
        .values()
        .filter(|index| is_managed(index))
        .any(|index| index.get("step").and_then(Value::as_str) == Some(ERROR_STEP));
    Ok(u8::from(failing))
}

fn is_managed(index: &Value) -> bool {
    match index.get("managed") {
        Some(Value::Bool(managed)) => *managed,
        Some(Value::String(managed)) => managed.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::ilm_explain;
    use serde_json::json;

    #[test]
    fn error_step_on_any_managed_index_is_reported() {
        let response = json!({"indices": {
            "logs-000001": {"index": "logs-000001", "managed": true, "phase": "hot", "step": "complete"},
            "logs-000002": {"index": "logs-000002", "managed": true, "phase": "warm", "step": "ERROR"}
        }});
        assert_eq!(ilm_explain(&response).ok(), Some(1));
    }

    #[test]
    fn unmanaged_indices_are_ignored() {
        let response = json!({"indices": {
            "scratch": {"index": "scratch", "managed": false, "step": "ERROR"},
            "logs": {"index": "logs", "managed": "true", "step": "check-rollover-ready"}
        }});
        assert_eq!(ilm_explain(&response).ok(), Some(0));
    }

    #[test]
    fn string_managed_flag_is_honoured() {
        let response = json!({"indices": {
            "logs": {"managed": "true", "step": "ERROR"}
        }});
        assert_eq!(ilm_explain(&response).ok(), Some(1));
    }

    #[test]
    fn missing_indices_is_an_error() {
        assert!(ilm_explain(&json!({"acknowledged": true})).is_err());
    }
}
