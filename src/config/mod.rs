use std::env::VarError;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;

use crate::Result;
use crate::error::Error as AgentError;
use crate::types::LogLevel;

mod defaults;
mod env;
mod raw;
mod serde;

pub const DEFAULT_CONFIG_PATH: &str = "conf/default.conf";

#[derive(Debug)]
pub struct Config {
    pub log: LogSettings,
    pub elasticsearch: EsSettings,
}

#[derive(Debug, Clone)]
pub struct LogSettings {
    pub stdout: bool,
    pub dir: PathBuf,
    pub filename: String,
    pub level: LogLevel,
}

#[derive(Debug)]
pub struct EsSettings {
    pub hosts: Vec<String>,
    pub scheme: String,
    pub port: u16,
    pub verify_certs: bool,
    /// Log a warning when certificate verification is disabled.
    pub warn_insecure: bool,
    pub auth: Option<BasicAuth>,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

#[derive(Debug)]
pub struct BasicAuth {
    pub username: String,
    pub password: SecretString,
}

/// Values given on the command line. They win over the file and the
/// environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub logstdout: Option<String>,
    pub logdir: Option<PathBuf>,
    pub logfilename: Option<String>,
    pub loglevel: Option<LogLevel>,
    pub hosts: Option<String>,
}

impl Config {
    /// Load configuration from an INI file, the environment and CLI overrides,
    /// in that order of increasing precedence.
    ///
    /// # Errors
    ///
    /// Returns an error when a required file cannot be read, when either the
    /// `[GLOBAL]` or `[ELASTICSEARCH]` section is missing, or when a value
    /// fails validation.
    pub fn load(path: impl AsRef<Path>, required: bool, overrides: &Overrides) -> Result<Self> {
        Self::load_with_env(path.as_ref(), required, overrides, env::process_env)
    }

    fn load_with_env<F>(
        path: &Path,
        required: bool,
        overrides: &Overrides,
        lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, VarError>,
    {
        let mut raw = raw::load(path, required).map_err(AgentError::from)?;
        raw.apply_env_overrides(lookup).map_err(AgentError::from)?;
        raw.apply_cli_overrides(overrides).map_err(AgentError::from)?;
        raw.validate_and_build().map_err(AgentError::from)
    }
}

impl LogSettings {
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            stdout: false,
            dir: defaults::default_logdir(),
            filename: defaults::default_logfilename(),
            level: LogLevel::Info,
        }
    }
}

impl EsSettings {
    /// Plain-HTTP settings for the given hosts, with no auth.
    #[must_use]
    pub fn for_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
            scheme: "http".to_string(),
            port: 9200,
            verify_certs: true,
            warn_insecure: true,
            auth: None,
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}
