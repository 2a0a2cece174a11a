//! Zabbix low-level discovery documents.

use serde_json::{Map, Value, json};

use crate::error::MetricError;

/// `{"data": [{"{#NODE_ID}", "{#NODE_NAME}", "{#NODE_IP}"}, ...]}` from a
/// nodes stats response.
///
/// # Errors
///
/// Fails when `nodes` is absent or a node lacks `name` or `ip`.
pub fn node_discovery(response: &Value) -> Result<Value, MetricError> {
    let nodes = object_at(response, "nodes")?;
    let data = nodes
        .iter()
        .map(|(id, node)| -> Result<Value, MetricError> {
            Ok(json!({
                "{#NODE_ID}": id,
                "{#NODE_NAME}": string_at(node, "nodes", id, "name")?,
                "{#NODE_IP}": string_at(node, "nodes", id, "ip")?,
            }))
        })
        .collect::<Result<Vec<_>, MetricError>>()?;
    Ok(json!({ "data": data }))
}

/// `{"data": [{"{#INDEX_NAME}", "{#INDEX_UUID}"}, ...]}` from an indices
/// stats response.
///
/// # Errors
///
/// Fails when `indices` is absent or an index lacks `uuid`.
pub fn index_discovery(response: &Value) -> Result<Value, MetricError> {
    let indices = object_at(response, "indices")?;
    let data = indices
        .iter()
        .map(|(name, index)| -> Result<Value, MetricError> {
            Ok(json!({
                "{#INDEX_NAME}": name,
                "{#INDEX_UUID}": string_at(index, "indices", name, "uuid")?,
            }))
        })
        .collect::<Result<Vec<_>, MetricError>>()?;
    Ok(json!({ "data": data }))
}

fn object_at<'a>(response: &'a Value, field: &str) -> Result<&'a Map<String, Value>, MetricError> {
    response
        .get(field)
        .and_then(Value::as_object)
        .ok_or_else(|| MetricError::MissingField {
            field: field.to_string(),
        })
}

fn string_at<'a>(
    entry: &'a Value,
    parent: &str,
    key: &str,
    field: &str,
) -> Result<&'a str, MetricError> {
    entry
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| MetricError::MissingField {
            field: format!("{parent}.{key}.{field}"),
        })
}

#[cfg(test)]
mod tests {
    use super::{index_discovery, node_discovery};
    use crate::error::MetricError;
    use serde_json::json;

    #[test]
    fn nodes_become_discovery_rows() {
        let doc = node_discovery(&json!({
            "_nodes": {"total": 2},
            "nodes": {
                "b2": {"name": "es-data-2", "ip": "10.0.0.2", "jvm": {}},
                "a1": {"name": "es-data-1", "ip": "10.0.0.1"}
            }
        }));
        assert_eq!(
            doc.ok(),
            Some(json!({"data": [
                {"{#NODE_ID}": "a1", "{#NODE_NAME}": "es-data-1", "{#NODE_IP}": "10.0.0.1"},
                {"{#NODE_ID}": "b2", "{#NODE_NAME}": "es-data-2", "{#NODE_IP}": "10.0.0.2"}
            ]}))
        );
    }

    #[test]
    fn node_without_ip_is_an_error() {
        match node_discovery(&json!({"nodes": {"a1": {"name": "es-data-1"}}})) {
            Err(MetricError::MissingField { field }) => assert_eq!(field, "nodes.a1.ip"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn indices_become_discovery_rows() {
        let doc = index_discovery(&json!({
            "_all": {"primaries": {}},
            "indices": {"logs": {"uuid": "abc", "primaries": {}}}
        }));
        assert_eq!(
            doc.ok(),
            Some(json!({"data": [{"{#INDEX_NAME}": "logs", "{#INDEX_UUID}": "abc"}]}))
        );
    }

    #[test]
    fn missing_indices_object_is_an_error() {
        assert!(matches!(
            index_discovery(&json!({"status": "green"})),
            Err(MetricError::MissingField { .. })
        ));
    }

    #[test]
    fn empty_cluster_yields_empty_data() {
        assert_eq!(node_discovery(&json!({"nodes": {}})).ok(), Some(json!({"data": []})));
    }
}
