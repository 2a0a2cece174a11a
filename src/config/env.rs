use std::env::VarError;

use crate::error::ConfigError;

use super::serde::parse_bool;

/// Reads a variable from the process environment.
pub(super) fn process_env(key: &str) -> Result<String, VarError> {
    std::env::var(key)
}

/// Blank values count as unset.
pub(super) fn env_string<F>(
    lookup: &F,
    key: &'static str,
) -> std::result::Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    match lookup(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(err) => Err(ConfigError::InvalidField {
            field: key,
            message: err.to_string(),
        }),
    }
}

pub(super) fn env_bool<F>(
    lookup: &F,
    key: &'static str,
) -> std::result::Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    env_string(lookup, key)?
        .map(|value| {
            parse_bool(&value).map_err(|message| ConfigError::InvalidField {
                field: key,
                message,
            })
        })
        .transpose()
}
