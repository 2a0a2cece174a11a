use std::env::VarError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;

use crate::error::ConfigError;
use crate::types::LogLevel;

use super::defaults::{
    default_connect_timeout, default_hosts, default_httpscheme, default_logdir,
    default_logfilename, default_loglevel, default_port, default_timeout, default_true,
};
use super::env::{env_bool, env_string};
use super::serde::{HumantimeDuration, StrToBool, parse_bool};
use super::{BasicAuth, Config, EsSettings, LogSettings, Overrides};

/// Read the INI file at `path`.
///
/// A missing file is only an error when the caller named it explicitly.
pub(super) fn load(path: &Path, required: bool) -> std::result::Result<RawConfig, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound && !required => {
            return Ok(RawConfig::builtin());
        }
        Err(source) => {
            return Err(ConfigError::FileRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let raw: RawConfig = ::config::Config::builder()
        .add_source(::config::File::from_str(&text, ::config::FileFormat::Ini))
        .build()
        .map_err(|err| ConfigError::Parse(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))?;

    if raw.global.is_none() {
        return Err(ConfigError::MissingSection { section: "GLOBAL" });
    }
    if raw.elasticsearch.is_none() {
        return Err(ConfigError::MissingSection {
            section: "ELASTICSEARCH",
        });
    }
    Ok(raw)
}

#[derive(Debug, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default, alias = "GLOBAL")]
    pub(super) global: Option<RawGlobal>,
    #[serde(default, alias = "ELASTICSEARCH")]
    pub(super) elasticsearch: Option<RawElasticsearch>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawGlobal {
    #[serde(default)]
    #[serde_as(as = "StrToBool")]
    pub(super) logstdout: bool,
    #[serde(default = "default_logdir")]
    pub(super) logdir: PathBuf,
    #[serde(default = "default_logfilename")]
    pub(super) logfilename: String,
    #[serde(default = "default_loglevel")]
    pub(super) loglevel: String,
}

// sniffonstart, sniffonconnectionfail and sniffertimeout are tolerated in
// existing files and ignored.
#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawElasticsearch {
    #[serde(default = "default_hosts")]
    pub(super) hosts: String,
    #[serde(default = "default_httpscheme")]
    pub(super) httpscheme: String,
    #[serde(default = "default_port")]
    pub(super) port: u32,
    #[serde(default)]
    #[serde_as(as = "StrToBool")]
    pub(super) use_ssl: bool,
    #[serde(default = "default_true")]
    #[serde_as(as = "StrToBool")]
    pub(super) verify_ssl_certs: bool,
    #[serde(default = "default_true")]
    #[serde_as(as = "StrToBool")]
    pub(super) ssl_show_warn: bool,
    #[serde(default)]
    #[serde_as(as = "StrToBool")]
    pub(super) disable_ssl_warning: bool,
    #[serde(default)]
    #[serde_as(as = "StrToBool")]
    pub(super) httpauth: bool,
    #[serde(default)]
    pub(super) authuser: Option<String>,
    #[serde(default)]
    pub(super) authpassword: Option<String>,
    #[serde(default = "default_timeout")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) timeout: Duration,
    #[serde(default = "default_connect_timeout")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) connect_timeout: Duration,
}

impl RawConfig {
    fn builtin() -> Self {
        Self {
            global: Some(RawGlobal::default()),
            elasticsearch: Some(RawElasticsearch::default()),
        }
    }

    pub(super) fn apply_env_overrides<F>(
        &mut self,
        lookup: F,
    ) -> std::result::Result<(), ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let global = self.global.get_or_insert_with(RawGlobal::default);
        if let Some(level) = env_string(&lookup, "ZBX_ES_LOGLEVEL")? {
            global.loglevel = level;
        }
        if let Some(stdout) = env_bool(&lookup, "ZBX_ES_LOGSTDOUT")? {
            global.logstdout = stdout;
        }

        let es = self
            .elasticsearch
            .get_or_insert_with(RawElasticsearch::default);
        if let Some(hosts) = env_string(&lookup, "ZBX_ES_HOSTS")? {
            es.hosts = hosts;
        }
        if let Some(user) = env_string(&lookup, "ZBX_ES_AUTHUSER")? {
            es.authuser = Some(user);
        }
        if let Some(password) = env_string(&lookup, "ZBX_ES_AUTHPASSWORD")? {
            es.authpassword = Some(password);
        }
        Ok(())
    }

    pub(super) fn apply_cli_overrides(
        &mut self,
        overrides: &Overrides,
    ) -> std::result::Result<(), ConfigError> {
        let global = self.global.get_or_insert_with(RawGlobal::default);
        if let Some(stdout) = overrides.logstdout.as_deref() {
            global.logstdout = parse_bool(stdout).map_err(|message| ConfigError::InvalidField {
                field: "--logstdout",
                message,
            })?;
        }
        if let Some(dir) = &overrides.logdir {
            global.logdir.clone_from(dir);
        }
        if let Some(name) = &overrides.logfilename {
            global.logfilename.clone_from(name);
        }
        if let Some(level) = overrides.loglevel {
            global.loglevel = level.to_string();
        }

        if let Some(hosts) = &overrides.hosts {
            self.elasticsearch
                .get_or_insert_with(RawElasticsearch::default)
                .hosts
                .clone_from(hosts);
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> std::result::Result<Config, ConfigError> {
        let global = self.global.unwrap_or_default();
        let es = self.elasticsearch.unwrap_or_default();

        let level = LogLevel::from_str(&global.loglevel).map_err(|message| {
            ConfigError::InvalidField {
                field: "GLOBAL.loglevel",
                message,
            }
        })?;
        if global.logfilename.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "GLOBAL.logfilename",
                message: "log file name cannot be empty".to_string(),
            });
        }

        let hosts: Vec<String> = es
            .hosts
            .split(',')
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .map(str::to_string)
            .collect();
        if hosts.is_empty() {
            return Err(ConfigError::MissingField {
                field: "ELASTICSEARCH.hosts",
            });
        }

        let port = u16::try_from(es.port)
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(|| ConfigError::InvalidField {
                field: "ELASTICSEARCH.port",
                message: format!("expected between 1 and 65535, got {}", es.port),
            })?;

        let scheme = es.httpscheme.trim().to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ConfigError::InvalidField {
                field: "ELASTICSEARCH.httpscheme",
                message: format!("expected http or https, got {scheme}"),
            });
        }

        let auth = if es.httpauth {
            let username = es
                .authuser
                .filter(|user| !user.trim().is_empty())
                .ok_or(ConfigError::MissingField {
                    field: "ELASTICSEARCH.authuser",
                })?;
            let password = es
                .authpassword
                .filter(|password| !password.is_empty())
                .ok_or(ConfigError::MissingField {
                    field: "ELASTICSEARCH.authpassword",
                })?;
            Some(BasicAuth {
                username,
                password: password.into(),
            })
        } else {
            None
        };

        if es.timeout.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "ELASTICSEARCH.timeout",
                message: "timeout must be greater than zero".to_string(),
            });
        }
        if es.connect_timeout.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "ELASTICSEARCH.connect_timeout",
                message: "connect timeout must be greater than zero".to_string(),
            });
        }

        Ok(Config {
            log: LogSettings {
                stdout: global.logstdout,
                dir: global.logdir,
                filename: global.logfilename,
                level,
            },
            elasticsearch: EsSettings {
                hosts,
                scheme: if es.use_ssl {
                    "https".to_string()
                } else {
                    scheme
                },
                port,
                verify_certs: es.verify_ssl_certs,
                warn_insecure: es.ssl_show_warn && !es.disable_ssl_warning,
                auth,
                request_timeout: es.timeout,
                connect_timeout: es.connect_timeout,
            },
        })
    }
}

impl Default for RawGlobal {
    fn default() -> Self {
        Self {
            logstdout: false,
            logdir: default_logdir(),
            logfilename: default_logfilename(),
            loglevel: default_loglevel(),
        }
    }
}

impl Default for RawElasticsearch {
    fn default() -> Self {
        Self {
            hosts: default_hosts(),
            httpscheme: default_httpscheme(),
            port: default_port(),
            use_ssl: false,
            verify_ssl_certs: true,
            ssl_show_warn: true,
            disable_ssl_warning: false,
            httpauth: false,
            authuser: None,
            authpassword: None,
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}
