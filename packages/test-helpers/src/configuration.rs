//! Room service configuration for testing.
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use room_service_configuration::{Configuration, Threshold};
use url::Url;

/// A configuration for a single test.
///
/// The status API binds to `127.0.0.1:0`, the advertised address is the
/// loopback one (so interface discovery is skipped), logging is off, and the
/// retry and heartbeat intervals are one second.
#[must_use]
pub fn ephemeral() -> Configuration {
    let mut config = Configuration::default();

    config.logging.threshold = Threshold::Off;

    config.service.app_name = "roomSvcTest".to_string();
    config.service.bind_address = SocketAddr::new(Ipv4Addr::LOCALHOST.into(), 0);
    config.service.ip_address = Some(Ipv4Addr::LOCALHOST);

    config.registry.retry_interval = Duration::from_secs(1);
    config.registry.heartbeat_interval = Duration::from_secs(1);
    config.registry.request_timeout = Duration::from_secs(2);

    config
}

/// An [`ephemeral`] configuration registering into the given registry.
#[must_use]
pub fn ephemeral_with_registry(base_url: &Url) -> Configuration {
    let mut config = ephemeral();

    config.registry.base_url = base_url.clone();

    config
}

/// An [`ephemeral`] configuration pointing to a port nobody listens on.
#[must_use]
pub fn ephemeral_with_unreachable_registry() -> Configuration {
    let mut config = ephemeral();

    config.registry.base_url = unreachable_registry();

    config
}

/// A registry base url that refuses every connection.
///
/// # Panics
///
/// Will panic if the port can not be reserved.
#[must_use]
pub fn unreachable_registry() -> Url {
    let listener = std::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).expect("it should reserve a port");
    let local_addr = listener.local_addr().expect("it should get the reserved port");
    drop(listener);

    Url::parse(&format!("http://{local_addr}")).expect("it should be a valid url")
}
