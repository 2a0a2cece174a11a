use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Elasticsearch(#[from] EsError),
    #[error(transparent)]
    Metric(#[from] MetricError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("Configuration Error: No section: '{section}'")]
    MissingSection { section: &'static str },
    #[error("missing required configuration field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("'{flag}' has not been specified")]
    MissingArgument { flag: &'static str },
    #[error("'{endpoint}' is not a valid endpoint for the '{api}' api")]
    InvalidEndpoint { api: String, endpoint: String },
    #[error("Log file: {path} can not be written")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum EsError {
    #[error("failed to build HTTP client")]
    Client {
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid Elasticsearch host {host}: {message}")]
    InvalidUrl { host: String, message: String },
    #[error("invalid API parameter '{segment}', expected key=value")]
    InvalidParameter { segment: String },
    #[error("request to {host} failed: {source}")]
    Request {
        host: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected HTTP status {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("check that {format} is a valid format for this API: {message}")]
    Json { format: String, message: String },
    #[error("no Elasticsearch host reachable after {attempted} attempt(s)")]
    Unreachable {
        attempted: usize,
        #[source]
        source: Box<EsError>,
    },
}

#[derive(Debug, Error)]
pub enum MetricError {
    #[error("'--metric' has not been specified")]
    NotSpecified,
    #[error("'--nodes' has not been specified, cannot count shards per node")]
    NodesNotSpecified,
    #[error("'{metric}' is not a valid metric for the '{endpoint}' endpoint")]
    Unknown { metric: String, endpoint: String },
    #[error("missing field in API response: {field}")]
    MissingField { field: String },
    #[error("unexpected response shape for {metric}: expected {expected}")]
    UnexpectedShape {
        metric: &'static str,
        expected: &'static str,
    },
}

impl Error {
    /// Transport-level failures, as opposed to bad arguments or bad metric names.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Elasticsearch(
                EsError::Request { .. } | EsError::Unreachable { .. } | EsError::HttpStatus { .. }
            )
        )
    }
}
