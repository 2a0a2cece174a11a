use url::Url;

use crate::Result;
use crate::error::{ConfigError, EsError};
use crate::types::{Api, Endpoint};

const DEFAULT_FORMAT: &str = "json";

/// A GET against one of the administrative endpoints.
///
/// Path parameters (`index`, `node_id`, `metric`, `index_metric`) are lifted
/// out of the `--parameters` pairs and the rest go to the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    segments: Vec<String>,
    query: Vec<(String, String)>,
    format: String,
}

impl ApiRequest {
    /// # Errors
    ///
    /// Fails on a malformed parameter string or an api/endpoint pair that
    /// does not exist.
    pub fn build(
        api: Api,
        endpoint: Endpoint,
        parameters: Option<&str>,
        nodes: Option<&str>,
    ) -> Result<Self> {
        let mut query = parse_parameters(parameters)?;
        let node_filter = nodes.map(str::trim).filter(|n| !n.is_empty());

        let segments: Vec<String> = match (api, endpoint) {
            (Api::Cluster, Endpoint::Stats) => {
                let node_id = take(&mut query, &["node_id", "nodes"])
                    .or_else(|| node_filter.map(str::to_string));
                let mut segments = vec!["_cluster".to_string(), "stats".to_string()];
                if let Some(node_id) = node_id {
                    segments.push("nodes".to_string());
                    segments.push(node_id);
                }
                segments
            }
            (Api::Cluster, Endpoint::Health) => {
                let mut segments = vec!["_cluster".to_string(), "health".to_string()];
                segments.extend(take(&mut query, &["index"]));
                segments
            }
            (Api::Indices, Endpoint::Stats) => {
                let mut segments: Vec<String> = take(&mut query, &["index"]).into_iter().collect();
                segments.push("_stats".to_string());
                segments.extend(take(&mut query, &["metric"]));
                segments
            }
            (Api::Nodes, Endpoint::Stats) => {
                let node_id = take(&mut query, &["node_id", "nodes"])
                    .or_else(|| node_filter.map(str::to_string));
                let mut segments = vec!["_nodes".to_string()];
                segments.extend(node_id);
                segments.push("stats".to_string());
                if let Some(metric) = take(&mut query, &["metric"]) {
                    segments.push(metric);
                    segments.extend(take(&mut query, &["index_metric"]));
                }
                segments
            }
            (Api::Cat, Endpoint::Shards) => {
                let mut segments = vec!["_cat".to_string(), "shards".to_string()];
                segments.extend(take(&mut query, &["index"]));
                segments
            }
            (Api::All, Endpoint::IlmExplain) => {
                let index = take(&mut query, &["index"]).unwrap_or_else(|| "_all".to_string());
                vec![index, "_ilm".to_string(), "explain".to_string()]
            }
            (api, endpoint) => {
                return Err(ConfigError::InvalidEndpoint {
                    api: api.to_string(),
                    endpoint: endpoint.to_string(),
                }
                .into());
            }
        };

        let format = query
            .iter()
            .find(|(key, _)| key == "format")
            .map_or_else(|| DEFAULT_FORMAT.to_string(), |(_, value)| value.clone());

        Ok(Self {
            segments,
            query,
            format,
        })
    }

    /// Path relative to the host, e.g. `/_cluster/health`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// The `format` parameter sent with the call.
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    pub(crate) fn url_for(&self, base: &Url) -> std::result::Result<Url, EsError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| EsError::InvalidUrl {
                host: base.to_string(),
                message: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(&self.segments);
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

/// Parse `key=value;key=value` into ordered pairs and add `format=json` when
/// no format was asked for.
///
/// # Errors
///
/// Returns [`EsError::InvalidParameter`] for a segment without `=` or with an
/// empty key.
pub fn parse_parameters(raw: Option<&str>) -> std::result::Result<Vec<(String, String)>, EsError> {
    let mut pairs = Vec::new();
    for segment in raw.unwrap_or_default().split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let (key, value) = segment
            .split_once('=')
            .filter(|(key, _)| !key.trim().is_empty())
            .ok_or_else(|| EsError::InvalidParameter {
                segment: segment.to_string(),
            })?;
        pairs.push((key.trim().to_string(), value.trim().to_string()));
    }

    match pairs.iter_mut().find(|(key, _)| key == "format") {
        Some((_, value)) if value.is_empty() => *value = DEFAULT_FORMAT.to_string(),
        Some(_) => {}
        None => pairs.push(("format".to_string(), DEFAULT_FORMAT.to_string())),
    }
    Ok(pairs)
}

fn take(pairs: &mut Vec<(String, String)>, names: &[&str]) -> Option<String> {
    let idx = pairs
        .iter()
        .position(|(key, value)| names.contains(&key.as_str()) && !value.is_empty())?;
    Some(pairs.remove(idx).1)
}

#[cfg(test)]
mod tests {
    use super::{ApiRequest, parse_parameters};
    use crate::error::{ConfigError, Error, EsError};
    use crate::types::{Api, Endpoint};
    use url::Url;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn build(
        api: Api,
        endpoint: Endpoint,
        params: Option<&str>,
        nodes: Option<&str>,
    ) -> ApiRequest {
        match ApiRequest::build(api, endpoint, params, nodes) {
            Ok(request) => request,
            Err(err) => panic!("request should build: {err}"),
        }
    }

    #[test]
    fn parameters_default_to_json_format() {
        assert_eq!(parse_parameters(None).ok(), Some(pairs(&[("format", "json")])));
        assert_eq!(
            parse_parameters(Some("bytes=kb;level=indices")).ok(),
            Some(pairs(&[("bytes", "kb"), ("level", "indices"), ("format", "json")]))
        );
        assert_eq!(
            parse_parameters(Some("format=;bytes=b")).ok(),
            Some(pairs(&[("format", "json"), ("bytes", "b")]))
        );
    }

    #[test]
    fn parameters_keep_explicit_format_and_skip_empty_segments() {
        assert_eq!(
            parse_parameters(Some("format=yaml;;h=index,node;")).ok(),
            Some(pairs(&[("format", "yaml"), ("h", "index,node")]))
        );
    }

    #[test]
    fn malformed_parameter_is_rejected() {
        match parse_parameters(Some("bytes=kb;verbose")) {
            Err(EsError::InvalidParameter { segment }) => assert_eq!(segment, "verbose"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(parse_parameters(Some("=kb")).is_err());
    }

    #[test]
    fn cluster_paths() {
        assert_eq!(build(Api::Cluster, Endpoint::Stats, None, None).path(), "/_cluster/stats");
        assert_eq!(
            build(Api::Cluster, Endpoint::Stats, None, Some("node-1")).path(),
            "/_cluster/stats/nodes/node-1"
        );
        let health = build(Api::Cluster, Endpoint::Health, Some("index=logs;level=shards"), None);
        assert_eq!(health.path(), "/_cluster/health/logs");
        assert_eq!(health.query(), pairs(&[("level", "shards"), ("format", "json")]).as_slice());
    }

    #[test]
    fn index_and_node_stats_paths() {
        assert_eq!(build(Api::Indices, Endpoint::Stats, None, None).path(), "/_stats");
        assert_eq!(
            build(Api::Indices, Endpoint::Stats, Some("index=logs-*;metric=docs"), None).path(),
            "/logs-*/_stats/docs"
        );
        assert_eq!(build(Api::Nodes, Endpoint::Stats, None, None).path(), "/_nodes/stats");
        assert_eq!(
            build(
                Api::Nodes,
                Endpoint::Stats,
                Some("nodes=node_1,node_2;metric=indices;index_metric=docs"),
                None
            )
            .path(),
            "/_nodes/node_1,node_2/stats/indices/docs"
        );
        // an explicit path parameter beats --nodes
        assert_eq!(
            build(Api::Nodes, Endpoint::Stats, Some("node_id=a"), Some("b")).path(),
            "/_nodes/a/stats"
        );
    }

    #[test]
    fn shard_and_ilm_paths() {
        assert_eq!(build(Api::Cat, Endpoint::Shards, None, Some("n1")).path(), "/_cat/shards");
        assert_eq!(
            build(Api::All, Endpoint::IlmExplain, None, None).path(),
            "/_all/_ilm/explain"
        );
        assert_eq!(
            build(Api::All, Endpoint::IlmExplain, Some("index=metrics-*"), None).path(),
            "/metrics-*/_ilm/explain"
        );
    }

    #[test]
    fn unknown_pair_is_rejected() {
        assert!(matches!(
            ApiRequest::build(Api::Cat, Endpoint::Stats, None, None),
            Err(Error::Config(ConfigError::InvalidEndpoint { .. }))
        ));
    }

    #[test]
    fn url_keeps_base_path_and_encodes_segments() {
        let request = build(Api::Cluster, Endpoint::Health, Some("index=my index"), None);
        let base = match Url::parse("https://proxy.local/es/") {
            Ok(url) => url,
            Err(err) => panic!("valid url: {err}"),
        };
        let url = match request.url_for(&base) {
            Ok(url) => url,
            Err(err) => panic!("url should build: {err}"),
        };
        assert_eq!(
            url.as_str(),
            "https://proxy.local/es/_cluster/health/my%20index?format=json"
        );
        assert_eq!(request.format(), "json");
    }
}
