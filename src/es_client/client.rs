use std::time::Instant;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::Result;
use crate::config::{BasicAuth, EsSettings};
use crate::error::EsError;

use super::request::ApiRequest;

const BODY_PREVIEW_LIMIT: usize = 256;
const OPAQUE_ID_HEADER: &str = "x-opaque-id";

pub struct EsClient {
    http: reqwest::Client,
    hosts: Vec<Url>,
    auth: Option<BasicAuth>,
}

impl EsClient {
    /// Build a client for the configured hosts.
    ///
    /// # Errors
    ///
    /// Returns an error if a host cannot be turned into a URL or if the
    /// underlying HTTP client fails to build.
    pub fn new(settings: EsSettings) -> Result<Self> {
        let hosts = settings
            .hosts
            .iter()
            .map(|host| host_url(host, &settings.scheme, settings.port))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .user_agent(concat!("zabbix-elasticsearch/", env!("CARGO_PKG_VERSION")));

        if !settings.verify_certs {
            if settings.warn_insecure {
                warn!("TLS certificate verification is disabled for Elasticsearch connections");
            }
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|source| EsError::Client { source })?;

        Ok(Self {
            http,
            hosts,
            auth: settings.auth,
        })
    }

    #[must_use]
    pub fn hosts(&self) -> &[Url] {
        &self.hosts
    }

    /// Issue the request and parse the body as JSON.
    ///
    /// Hosts are tried in order; the next one is used only when the
    /// connection itself could not be established.
    ///
    /// # Errors
    ///
    /// Returns an error when no host accepts the connection, when the
    /// response status is not a success, or when the body is not JSON.
    pub async fn get(&self, request: &ApiRequest) -> Result<Value> {
        let mut last_err = None;

        for (attempt, base) in self.hosts.iter().enumerate() {
            let url = request.url_for(base)?;
            let opaque_id = Uuid::now_v7().to_string();
            let started = Instant::now();

            let mut call = self
                .http
                .get(url)
                .header(OPAQUE_ID_HEADER, &opaque_id);
            if let Some(auth) = &self.auth {
                call = call.basic_auth(&auth.username, Some(auth.password.expose_secret()));
            }

            let response = match call.send().await {
                Ok(resp) => resp,
                Err(source) if source.is_connect() => {
                    warn!(
                        host = %base,
                        attempt = attempt + 1,
                        error = %source,
                        "connection failed, trying next host"
                    );
                    last_err = Some(EsError::Request {
                        host: base.to_string(),
                        source,
                    });
                    continue;
                }
                Err(source) => {
                    return Err(EsError::Request {
                        host: base.to_string(),
                        source,
                    }
                    .into());
                }
            };

            let status = response.status();
            let body = response.bytes().await.map_err(|source| EsError::Request {
                host: base.to_string(),
                source,
            })?;

            if !status.is_success() {
                return Err(EsError::HttpStatus {
                    status,
                    body: body_preview(&body),
                }
                .into());
            }

            let value: Value = serde_json::from_slice(&body).map_err(|err| EsError::Json {
                format: request.format().to_string(),
                message: format!("{err}; body preview: {}", body_preview(&body)),
            })?;

            debug!(
                path = %request.path(),
                host = %base,
                %opaque_id,
                latency_ms = started.elapsed().as_millis(),
                "elasticsearch call succeeded"
            );
            return Ok(value);
        }

        let source = last_err.ok_or_else(|| EsError::InvalidUrl {
            host: String::new(),
            message: "no Elasticsearch host configured".to_string(),
        })?;
        Err(EsError::Unreachable {
            attempted: self.hosts.len(),
            source: Box::new(source),
        }
        .into())
    }
}

/// Turn a `hosts` entry into a base URL.
///
/// Entries carrying a scheme are taken verbatim; otherwise the configured
/// scheme is used and the configured port fills in when the entry has none.
pub(crate) fn host_url(host: &str, scheme: &str, port: u16) -> std::result::Result<Url, EsError> {
    let invalid = |err: url::ParseError| EsError::InvalidUrl {
        host: host.to_string(),
        message: err.to_string(),
    };

    if host.contains("://") {
        return Url::parse(host).map_err(invalid);
    }

    let mut url = Url::parse(&format!("{scheme}://{host}")).map_err(invalid)?;
    let has_port = host
        .rsplit(']')
        .next()
        .is_some_and(|tail| tail.contains(':'));
    if !has_port {
        url.set_port(Some(port)).map_err(|()| EsError::InvalidUrl {
            host: host.to_string(),
            message: "cannot set port on this URL".to_string(),
        })?;
    }
    Ok(url)
}

fn body_preview(body: &[u8]) -> String {
    if body.is_empty() {
        return "<empty>".to_string();
    }
    let end = body.len().min(BODY_PREVIEW_LIMIT);
    let mut preview = String::from_utf8_lossy(&body[..end]).to_string();
    if body.len() > BODY_PREVIEW_LIMIT {
        preview.push_str("...");
    }
    preview.replace('\n', "\\n")
}
