use std::path::PathBuf;
use std::time::Duration;

pub(super) fn default_logdir() -> PathBuf {
    PathBuf::from("/var/log/zabbix/")
}

pub(super) fn default_logfilename() -> String {
    "zabbix_elasticsearch.log".to_string()
}

pub(super) fn default_loglevel() -> String {
    "INFO".to_string()
}

pub(super) fn default_hosts() -> String {
    "localhost".to_string()
}

pub(super) fn default_httpscheme() -> String {
    "http".to_string()
}

pub(super) const fn default_port() -> u32 {
    9200
}

pub(super) const fn default_true() -> bool {
    true
}

pub(super) const fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

pub(super) const fn default_connect_timeout() -> Duration {
    Duration::from_secs(5)
}
