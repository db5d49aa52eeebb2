//! Instance descriptor builder.
//!
//! The [`DescriptorBuilder`] holds the fields that do not change between
//! registrations (application name, ports and advertised address). Each call
//! to [`DescriptorBuilder::build`] generates a fresh [`InstanceId`] and
//! returns the immutable [`InstanceIdentity`] used for the registration, the
//! heartbeats and the deregistration of one instance.
//!
//! The identity renders to the [`RegistrationDocument`] sent to the registry:
//!
//! ```json
//! {
//!   "instance": {
//!     "hostName": "10.0.0.5",
//!     "app": "roomSvc",
//!     "ipAddr": "10.0.0.5",
//!     "vipAddress": "roomSvc",
//!     "status": "UP",
//!     "port": { "$": 8096, "@enabled": true },
//!     "securePort": { "$": 443, "@enabled": true },
//!     "homePageUrl": "http://10.0.0.5:8096/",
//!     "statusPageUrl": "http://10.0.0.5:8096/info",
//!     "healthCheckUrl": "http://10.0.0.5:8096/health",
//!     "dataCenterInfo": {
//!       "@class": "com.netflix.appinfo.InstanceInfo$DefaultDataCenterInfo",
//!       "name": "MyOwn"
//!     },
//!     "metadata": { "instanceId": "roomSvc:<uuid>" }
//!   }
//! }
//! ```
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{DataCenterInfo, InstanceStatus, PortInfo};
use crate::Error;

/// Opaque token identifying one registration of this process.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(Uuid);

impl InstanceId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for InstanceId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Who this instance is, as far as the registry is concerned.
///
/// Heartbeats and the deregistration must use the same identity as the
/// registration, so it is never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceIdentity {
    instance_id: InstanceId,
    app_name: String,
    ip_address: Ipv4Addr,
    port: u16,
    secure_port: u16,
}

impl InstanceIdentity {
    #[must_use]
    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    #[must_use]
    pub fn ip_address(&self) -> Ipv4Addr {
        self.ip_address
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn secure_port(&self) -> u16 {
        self.secure_port
    }

    /// The key of this instance in the registry: `{ip}:{app}:{instance id}`.
    #[must_use]
    pub fn instance_key(&self) -> String {
        format!("{}:{}:{}", self.ip_address, self.app_name, self.instance_id)
    }

    /// The value written in the `metadata.instanceId` field: `{app}:{instance id}`.
    #[must_use]
    pub fn metadata_instance_id(&self) -> String {
        format!("{}:{}", self.app_name, self.instance_id)
    }

    /// Renders the registration document sent to the registry.
    #[must_use]
    pub fn to_document(&self) -> RegistrationDocument {
        let base_url = format!("http://{}:{}", self.ip_address, self.port);
        let address = self.ip_address.to_string();

        RegistrationDocument {
            instance: InstanceDescriptor {
                host_name: address.clone(),
                app: self.app_name.clone(),
                ip_addr: address,
                vip_address: self.app_name.clone(),
                status: InstanceStatus::Up,
                port: PortInfo::enabled(self.port),
                secure_port: PortInfo::enabled(self.secure_port),
                home_page_url: format!("{base_url}/"),
                status_page_url: format!("{base_url}/info"),
                health_check_url: format!("{base_url}/health"),
                data_center_info: DataCenterInfo::default(),
                metadata: Metadata {
                    instance_id: self.metadata_instance_id(),
                },
            },
        }
    }
}

/// The body of `POST /eureka/apps/{app}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDocument {
    pub instance: InstanceDescriptor,
}

impl RegistrationDocument {
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.instance.app
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceDescriptor {
    pub host_name: String,
    pub app: String,
    pub ip_addr: String,
    pub vip_address: String,
    pub status: InstanceStatus,
    pub port: PortInfo,
    pub secure_port: PortInfo,
    pub home_page_url: String,
    pub status_page_url: String,
    pub health_check_url: String,
    pub data_center_info: DataCenterInfo,
    pub metadata: Metadata,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub instance_id: String,
}

/// Builds a fresh [`InstanceIdentity`] for every registration sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorBuilder {
    app_name: Arc<str>,
    ip_address: Ipv4Addr,
    port: u16,
    secure_port: u16,
}

impl DescriptorBuilder {
    #[must_use]
    pub fn new(app_name: &str, ip_address: Ipv4Addr, port: u16, secure_port: u16) -> Self {
        Self {
            app_name: Arc::from(app_name),
            ip_address,
            port,
            secure_port,
        }
    }

    /// Uses the first non-loopback IPv4 address of the host.
    ///
    /// # Errors
    ///
    /// Will return an error if the interfaces can not be listed or if none of
    /// them has a non-loopback IPv4 address. The service can not be
    /// registered without one.
    pub fn with_local_address(app_name: &str, port: u16, secure_port: u16) -> Result<Self, Error> {
        Ok(Self::new(app_name, local_ipv4_address()?, port, secure_port))
    }

    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    #[must_use]
    pub fn ip_address(&self) -> Ipv4Addr {
        self.ip_address
    }

    /// Generates a new instance id and returns the identity carrying it.
    #[must_use]
    pub fn build(&self) -> InstanceIdentity {
        self.build_with_id(InstanceId::generate())
    }

    #[must_use]
    pub fn build_with_id(&self, instance_id: InstanceId) -> InstanceIdentity {
        InstanceIdentity {
            instance_id,
            app_name: self.app_name.to_string(),
            ip_address: self.ip_address,
            port: self.port,
            secure_port: self.secure_port,
        }
    }
}

/// The first non-loopback IPv4 address found on any network interface.
///
/// # Errors
///
/// Will return [`Error::UnableToListInterfaces`] if the interfaces can not be
/// listed and [`Error::NoLocalAddress`] if none qualifies.
pub fn local_ipv4_address() -> Result<Ipv4Addr, Error> {
    let interfaces = local_ip_address::list_afinet_netifas()
        .map_err(|source| Error::UnableToListInterfaces { source: Arc::new(source) })?;

    tracing::debug!(target: crate::REGISTRY_CLIENT_LOG_TARGET, ?interfaces, "looking for a local address");

    first_non_loopback_ipv4(interfaces.into_iter().map(|(_, address)| address)).ok_or(Error::NoLocalAddress)
}

fn first_non_loopback_ipv4(addresses: impl IntoIterator<Item = IpAddr>) -> Option<Ipv4Addr> {
    addresses.into_iter().find_map(|address| match address {
        IpAddr::V4(ipv4) if !ipv4.is_loopback() => Some(ipv4),
        _ => None,
    })
}
