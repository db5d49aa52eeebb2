use std::sync::Arc;

use thiserror::Error;
use url::Url;

/// Errors returned by the registry client.
///
/// Registration, heartbeat and deregistration never return these to their
/// callers: a failed call is logged and reported as `false`. Queries and
/// the startup preconditions do.
#[derive(Debug, Error, Clone)]
pub enum Error {
    #[error("Unable to list the network interfaces: {source}")]
    UnableToListInterfaces { source: Arc<local_ip_address::Error> },

    #[error("No non-loopback IPv4 address found on any network interface")]
    NoLocalAddress,

    #[error("The registry base url \"{url}\" can not have path segments")]
    InvalidBaseUrl { url: Url },

    #[error("Unable to build the http client: {source}")]
    UnableToBuildClient { source: Arc<reqwest::Error> },

    #[error("Unable to serialize the registration document: {source}")]
    UnableToSerialize { source: Arc<serde_json::Error> },

    #[error("Request to {url} failed: {source}")]
    RequestFailed { url: Url, source: Arc<reqwest::Error> },

    #[error("Request to {url} returned the unexpected status {status}")]
    UnexpectedStatus { url: Url, status: reqwest::StatusCode },

    #[error("Malformed response from {url}: {source}")]
    MalformedResponse { url: Url, source: Arc<serde_json::Error> },
}
