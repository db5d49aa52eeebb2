use std::net::{Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// The service advertised to the registry.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Service {
    /// Application name used as the registry application and VIP address.
    #[serde(default = "Service::default_app_name")]
    pub app_name: String,

    /// Address the status API listens on.
    #[serde(default = "Service::default_bind_address")]
    pub bind_address: SocketAddr,

    /// Plain port advertised to the registry.
    #[serde(default = "Service::default_port")]
    pub port: u16,

    /// Secure port advertised to the registry.
    #[serde(default = "Service::default_secure_port")]
    pub secure_port: u16,

    /// Address advertised to the registry. When missing, the first
    /// non-loopback IPv4 address of the host is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<Ipv4Addr>,
}

impl Default for Service {
    fn default() -> Self {
        Self {
            app_name: Self::default_app_name(),
            bind_address: Self::default_bind_address(),
            port: Self::default_port(),
            secure_port: Self::default_secure_port(),
            ip_address: None,
        }
    }
}

impl Service {
    fn default_app_name() -> String {
        String::from("msSalasGo")
    }

    fn default_bind_address() -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, Self::default_port()))
    }

    fn default_port() -> u16 {
        8096
    }

    fn default_secure_port() -> u16 {
        443
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.app_name.trim().is_empty() {
            return Err(Error::EmptyAppName);
        }
        Ok(())
    }
}
