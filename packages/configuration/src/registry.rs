use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use url::Url;

use crate::Error;

/// The discovery registry this service joins.
#[serde_as]
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Registry {
    /// Base URL of the Eureka server, without the `/eureka` suffix.
    #[serde(default = "Registry::default_base_url")]
    pub base_url: Url,

    /// Delay between two failed registration attempts, in seconds.
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "Registry::default_retry_interval")]
    pub retry_interval: Duration,

    /// Delay between two heartbeats, in seconds.
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "Registry::default_heartbeat_interval")]
    pub heartbeat_interval: Duration,

    /// Timeout applied to every request sent to the registry, in seconds.
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "Registry::default_request_timeout")]
    pub request_timeout: Duration,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            retry_interval: Self::default_retry_interval(),
            heartbeat_interval: Self::default_heartbeat_interval(),
            request_timeout: Self::default_request_timeout(),
        }
    }
}

impl Registry {
    #[allow(clippy::missing_panics_doc)]
    fn default_base_url() -> Url {
        Url::parse("http://localhost:8761").expect("the default registry url should be valid")
    }

    fn default_retry_interval() -> Duration {
        Duration::from_secs(5)
    }

    fn default_heartbeat_interval() -> Duration {
        Duration::from_secs(30)
    }

    fn default_request_timeout() -> Duration {
        Duration::from_secs(10)
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(Error::UnsupportedRegistryScheme {
                url: self.base_url.clone(),
            });
        }

        if self.base_url.host().is_none() {
            return Err(Error::MissingRegistryHost {
                url: self.base_url.clone(),
            });
        }

        for (field, duration) in [
            ("retry_interval", self.retry_interval),
            ("heartbeat_interval", self.heartbeat_interval),
            ("request_timeout", self.request_timeout),
        ] {
            if duration.is_zero() {
                return Err(Error::ZeroDuration { field });
            }
        }

        Ok(())
    }
}
