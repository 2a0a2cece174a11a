use std::collections::HashSet;

use serde_json::Value;

use crate::error::MetricError;

/// Count `_cat/shards` rows allocated to any of the comma-separated `nodes`.
///
/// Names match exactly. Unassigned shards have no node and never count.
///
/// # Errors
///
/// Fails when `nodes` names nothing or the response is not a JSON array.
pub fn shards_per_node(response: &Value, nodes: &str) -> Result<usize, MetricError> {
    let wanted: HashSet<&str> = nodes
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();
    if wanted.is_empty() {
        return Err(MetricError::NodesNotSpecified);
    }

    let rows = response
        .as_array()
        .ok_or(MetricError::UnexpectedShape {
            metric: "shards_per_node",
            expected: "a JSON array of shards (use --api cat --endpoint shards)",
        })?;

    Ok(rows
        .iter()
        .filter_map(|row| row.get("node").and_then(Value::as_str))
        .filter(|node| wanted.contains(node))
        .count())
}
