pub(crate) mod client;
pub(crate) mod request;

pub use client::EsClient;
pub use request::{ApiRequest, parse_parameters};
