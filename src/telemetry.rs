use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

use crate::Result;
use crate::config::LogSettings;
use crate::error::{ConfigError, Error};

/// Initialise tracing from the `[GLOBAL]` log settings.
///
/// Console output goes to stderr: stdout carries the value Zabbix reads.
///
/// # Errors
///
/// Returns an error if no usable filter can be built, if the log file cannot
/// be opened for appending, if JSON output is requested without the
/// `json-logs` feature, or if a global subscriber is already installed.
pub fn init_tracing(
    settings: &LogSettings,
    explicit_filter: Option<&str>,
    use_json: bool,
) -> Result<()> {
    let mut filter_candidates = Vec::new();
    if let Some(f) = explicit_filter {
        filter_candidates.push(f.to_string());
    }
    if let Ok(env) = std::env::var("RUST_LOG") {
        filter_candidates.push(env);
    }
    filter_candidates.push(settings.level.as_tracing().to_string().to_ascii_lowercase());

    let filter = filter_candidates
        .into_iter()
        .find_map(|candidate| EnvFilter::try_new(candidate).ok())
        .ok_or_else(|| Error::Telemetry("invalid log filter".to_string()))?;

    let (writer, ansi) = make_writer(settings)?;

    #[cfg(feature = "json-logs")]
    if use_json {
        let subscriber = Registry::default().with(filter).with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .json()
                .flatten_event(true),
        );
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|err| Error::Telemetry(err.to_string()))?;
        return Ok(());
    }

    #[cfg(not(feature = "json-logs"))]
    if use_json {
        return Err(Error::Telemetry(
            "binary was built without the `json-logs` feature".to_string(),
        ));
    }

    let subscriber = Registry::default().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(false),
    );
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| Error::Telemetry(err.to_string()))
}

fn make_writer(settings: &LogSettings) -> Result<(BoxMakeWriter, bool)> {
    if settings.stdout {
        let ansi = std::io::stderr().is_terminal();
        return Ok((BoxMakeWriter::new(std::io::stderr), ansi));
    }

    let path = settings.file_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| ConfigError::LogFile { path, source })?;
    Ok((BoxMakeWriter::new(Mutex::new(file)), false))
}

#[cfg(test)]
mod tests {
    use super::make_writer;
    use crate::config::LogSettings;
    use crate::error::{ConfigError, Error};
    use std::io::IsTerminal;
    use std::path::PathBuf;

    #[test]
    fn unwritable_log_file_is_reported() {
        let settings = LogSettings {
            stdout: false,
            dir: PathBuf::from("/nonexistent-zabbix-elasticsearch-dir"),
            ..LogSettings::default()
        };
        match make_writer(&settings) {
            Err(Error::Config(ConfigError::LogFile { path, .. })) => {
                assert_eq!(path, settings.file_path());
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("opening a file in a missing directory should fail"),
        }
    }

    #[test]
    fn console_logging_needs_no_file() {
        let settings = LogSettings {
            stdout: true,
            dir: PathBuf::from("/nonexistent-zabbix-elasticsearch-dir"),
            ..LogSettings::default()
        };
        assert!(make_writer(&settings).is_ok());
    }

    #[test]
    fn colours_follow_the_stderr_terminal() {
        let settings = LogSettings {
            stdout: true,
            ..LogSettings::default()
        };
        match make_writer(&settings) {
            Ok((_, ansi)) => assert_eq!(ansi, std::io::stderr().is_terminal()),
            Err(err) => panic!("console writer should build: {err}"),
        }
    }

    #[test]
    fn file_output_never_uses_colours() {
        let dir = std::env::temp_dir();
        let settings = LogSettings {
            stdout: false,
            dir: dir.clone(),
            filename: format!("zabbix-elasticsearch-{}.log", uuid::Uuid::now_v7()),
            ..LogSettings::default()
        };
        let result = make_writer(&settings);
        let _ = std::fs::remove_file(dir.join(&settings.filename));
        match result {
            Ok((_, ansi)) => assert!(!ansi),
            Err(err) => panic!("log file should open: {err}"),
        }
    }
}
