use std::net::Ipv4Addr;
use std::time::Duration;

use room_service_registry::{DescriptorBuilder, HttpTransport, Timing};
use url::Url;

mod http_transport;
mod lifecycle;

pub const APP_NAME: &str = "roomSvc";

pub fn builder() -> DescriptorBuilder {
    DescriptorBuilder::new(APP_NAME, Ipv4Addr::new(10, 0, 0, 5), 8096, 443)
}

pub fn transport(base_url: &Url) -> HttpTransport {
    HttpTransport::new(base_url.clone(), Duration::from_secs(2)).expect("it should build the http transport")
}

pub fn fast_timing() -> Timing {
    Timing::new(Duration::from_millis(100), Duration::from_millis(200))
}
