#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod error;
pub mod es_client;
pub mod metrics;
pub mod telemetry;
pub mod types;

pub type Result<T> = std::result::Result<T, error::Error>;
