use std::path::PathBuf;

use clap::{ArgAction, Parser};
use zabbix_elasticsearch::config::{DEFAULT_CONFIG_PATH, Overrides};
use zabbix_elasticsearch::types::{Api, Endpoint, LogLevel};

#[derive(Parser, Debug)]
#[command(author, version, about = "Elasticsearch Monitoring for Zabbix Server", long_about = None)]
pub struct Cli {
    /// Specify path to config file
    #[arg(short = 'c', long = "conf_file", value_name = "FILE")]
    pub conf_file: Option<PathBuf>,

    /// API family to query
    #[arg(long, value_enum)]
    pub api: Option<Api>,

    /// Endpoint within the API
    #[arg(long, value_enum)]
    pub endpoint: Option<Endpoint>,

    /// Metric to extract: a dotted field path, or one of node_discovery,
    /// index_discovery, shards_per_node, ilm_explain
    #[arg(long)]
    pub metric: Option<String>,

    /// ';'-separated parameters for the API call.
    /// Example: format=json;bytes=kb;index=index_name;nodes=node_1,node_2
    #[arg(long, allow_hyphen_values = true)]
    pub parameters: Option<String>,

    /// Comma-separated list of nodes. Limits the returned data to those nodes
    #[arg(long)]
    pub nodes: Option<String>,

    /// Log to the console instead of the log file (true/false)
    #[arg(long, value_name = "BOOL")]
    pub logstdout: Option<String>,

    /// Log directory
    #[arg(long, value_name = "DIR")]
    pub logdir: Option<PathBuf>,

    /// Log file name
    #[arg(long, value_name = "NAME")]
    pub logfilename: Option<String>,

    /// Log level
    #[arg(long, value_enum)]
    pub loglevel: Option<LogLevel>,

    /// Comma-separated list of hosts
    #[arg(long)]
    pub hosts: Option<String>,

    /// Use a JSON layer for logs (`--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Explicit log filter (e.g. "zabbix_elasticsearch=debug"), overrides --loglevel.
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Config file to read and whether it has to exist.
    pub fn config_path(&self) -> (PathBuf, bool) {
        self.conf_file.clone().map_or_else(
            || (PathBuf::from(DEFAULT_CONFIG_PATH), false),
            |path| (path, true),
        )
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            logstdout: self.logstdout.clone(),
            logdir: self.logdir.clone(),
            logfilename: self.logfilename.clone(),
            loglevel: self.loglevel,
            hosts: self.hosts.clone(),
        }
    }
}
