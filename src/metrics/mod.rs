use std::fmt::{self, Display};

use serde_json::Value;

use crate::Result;
use crate::error::MetricError;
use crate::types::Endpoint;

pub mod discovery;
pub mod flatten;
pub mod ilm;
pub mod shards;

pub use flatten::flatten;

/// What `--metric` asks for. Anything that is not one of the computed metrics
/// is a dotted path into the flattened response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metric {
    NodeDiscovery,
    IndexDiscovery,
    ShardsPerNode,
    IlmExplain,
    Field(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Scalar(Value),
    Discovery(Value),
}

impl Metric {
    /// # Errors
    ///
    /// Returns [`MetricError::NotSpecified`] when no metric was given.
    pub fn from_arg(arg: Option<&str>) -> std::result::Result<Self, MetricError> {
        let name = arg
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(MetricError::NotSpecified)?;
        Ok(match name {
            "node_discovery" => Self::NodeDiscovery,
            "index_discovery" => Self::IndexDiscovery,
            "shards_per_node" => Self::ShardsPerNode,
            "ilm_explain" => Self::IlmExplain,
            field => Self::Field(field.to_string()),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::NodeDiscovery => "node_discovery",
            Self::IndexDiscovery => "index_discovery",
            Self::ShardsPerNode => "shards_per_node",
            Self::IlmExplain => "ilm_explain",
            Self::Field(field) => field,
        }
    }

    pub const fn is_discovery(&self) -> bool {
        matches!(self, Self::NodeDiscovery | Self::IndexDiscovery)
    }

    /// Pull this metric out of an API response.
    ///
    /// # Errors
    ///
    /// Fails when the response lacks what the metric needs, when
    /// `shards_per_node` is asked for without `nodes`, or when a field path
    /// does not exist in the response.
    pub fn extract(
        &self,
        endpoint: Endpoint,
        response: &Value,
        nodes: Option<&str>,
    ) -> Result<MetricValue> {
        let value = match self {
            Self::NodeDiscovery => MetricValue::Discovery(discovery::node_discovery(response)?),
            Self::IndexDiscovery => MetricValue::Discovery(discovery::index_discovery(response)?),
            Self::ShardsPerNode => {
                let nodes = nodes.ok_or(MetricError::NodesNotSpecified)?;
                MetricValue::Scalar(Value::from(shards::shards_per_node(response, nodes)?))
            }
            Self::IlmExplain => MetricValue::Scalar(Value::from(ilm::ilm_explain(response)?)),
            Self::Field(field) => {
                let mut flat = flatten(response, flatten::SEPARATOR);
                let value = flat.remove(field).ok_or_else(|| MetricError::Unknown {
                    metric: field.clone(),
                    endpoint: endpoint.to_string(),
                })?;
                MetricValue::Scalar(value)
            }
        };
        Ok(value)
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strings print bare. Everything else prints as compact JSON.
impl Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(Value::String(s)) => f.write_str(s),
            Self::Scalar(value) | Self::Discovery(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Metric, MetricValue};
    use crate::error::{Error, MetricError};
    use crate::types::Endpoint;
    use serde_json::{Value, json};

    fn health() -> Value {
        json!({
            "cluster_name": "prod",
            "status": "green",
            "timed_out": false,
            "number_of_nodes": 3,
            "active_shards_percent_as_number": 100.0
        })
    }

    fn metric(name: &str) -> Metric {
        match Metric::from_arg(Some(name)) {
            Ok(metric) => metric,
            Err(err) => panic!("metric should parse: {err}"),
        }
    }

    #[test]
    fn names_dispatch_to_computed_metrics() {
        assert_eq!(metric("node_discovery"), Metric::NodeDiscovery);
        assert_eq!(metric("index_discovery"), Metric::IndexDiscovery);
        assert_eq!(metric("shards_per_node"), Metric::ShardsPerNode);
        assert_eq!(metric("ilm_explain"), Metric::IlmExplain);
        assert_eq!(metric("status"), Metric::Field("status".to_string()));
        assert!(metric("index_discovery").is_discovery());
        assert!(!metric("status").is_discovery());
    }

    #[test]
    fn missing_metric_is_rejected() {
        assert!(matches!(Metric::from_arg(None), Err(MetricError::NotSpecified)));
        assert!(matches!(Metric::from_arg(Some("  ")), Err(MetricError::NotSpecified)));
    }

    #[test]
    fn field_lookup_renders_scalars() {
        let render = |name: &str| match metric(name).extract(Endpoint::Health, &health(), None) {
            Ok(value) => value.to_string(),
            Err(err) => panic!("{name} should extract: {err}"),
        };
        assert_eq!(render("status"), "green");
        assert_eq!(render("number_of_nodes"), "3");
        assert_eq!(render("timed_out"), "false");
        assert_eq!(render("active_shards_percent_as_number"), "100.0");
    }

    #[test]
    fn nested_field_lookup_uses_dotted_path() {
        let response = json!({"indices": {"docs": {"count": 42}}});
        let value = metric("indices.docs.count").extract(Endpoint::Stats, &response, None);
        assert_eq!(value.ok(), Some(MetricValue::Scalar(json!(42))));
    }

    #[test]
    fn unknown_field_names_metric_and_endpoint() {
        match metric("colour").extract(Endpoint::Health, &health(), None) {
            Err(Error::Metric(MetricError::Unknown { metric, endpoint })) => {
                assert_eq!(metric, "colour");
                assert_eq!(endpoint, "health");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn shards_per_node_requires_nodes() {
        let shards = json!([{"node": "n1"}]);
        assert!(matches!(
            Metric::ShardsPerNode.extract(Endpoint::Shards, &shards, None),
            Err(Error::Metric(MetricError::NodesNotSpecified))
        ));
        let value = Metric::ShardsPerNode.extract(Endpoint::Shards, &shards, Some("n1"));
        assert_eq!(value.ok().map(|v| v.to_string()), Some("1".to_string()));
    }

    #[test]
    fn discovery_renders_compact_json() {
        let value = MetricValue::Discovery(json!({"data": [{"{#INDEX_NAME}": "logs"}]}));
        assert_eq!(value.to_string(), r#"{"data":[{"{#INDEX_NAME}":"logs"}]}"#);
    }
}
