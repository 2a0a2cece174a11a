use std::fmt::{self, Display};
use std::str::FromStr;

use clap::ValueEnum;
use tracing::Level;

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Api {
    Cluster,
    Indices,
    Nodes,
    Cat,
    #[value(name = "_all")]
    All,
}

impl Api {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cluster => "cluster",
            Self::Indices => "indices",
            Self::Nodes => "nodes",
            Self::Cat => "cat",
            Self::All => "_all",
        }
    }

    /// Endpoints each API family exposes.
    pub const fn endpoints(self) -> &'static [Endpoint] {
        match self {
            Self::Cluster => &[Endpoint::Stats, Endpoint::Health],
            Self::Indices | Self::Nodes => &[Endpoint::Stats],
            Self::Cat => &[Endpoint::Shards],
            Self::All => &[Endpoint::IlmExplain],
        }
    }
}

impl Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Endpoint {
    Stats,
    Health,
    Shards,
    #[value(name = "_ilm/explain")]
    IlmExplain,
}

impl Endpoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stats => "stats",
            Self::Health => "health",
            Self::Shards => "shards",
            Self::IlmExplain => "_ilm/explain",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum LogLevel {
    #[value(name = "DEBUG")]
    Debug,
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARNING")]
    Warning,
    #[value(name = "ERROR")]
    Error,
    #[value(name = "CRITICAL")]
    Critical,
}

impl LogLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// `tracing` has no level above ERROR, so CRITICAL folds into it.
    pub const fn as_tracing(self) -> Level {
        match self {
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error | Self::Critical => Level::ERROR,
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" | "WARNING" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            "CRITICAL" => Ok(Self::Critical),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Check that both `--api` and `--endpoint` were supplied and that the pair
/// exists.
///
/// # Errors
///
/// Returns [`ConfigError::MissingArgument`] when either flag is absent and
/// [`ConfigError::InvalidEndpoint`] when the endpoint does not belong to the api.
pub fn validate_args(
    api: Option<Api>,
    endpoint: Option<Endpoint>,
) -> Result<(Api, Endpoint), ConfigError> {
    let api = api.ok_or(ConfigError::MissingArgument { flag: "--api" })?;
    let endpoint = endpoint.ok_or(ConfigError::MissingArgument { flag: "--endpoint" })?;
    if !api.endpoints().contains(&endpoint) {
        return Err(ConfigError::InvalidEndpoint {
            api: api.to_string(),
            endpoint: endpoint.to_string(),
        });
    }
    Ok((api, endpoint))
}
