//! Eureka wire types shared by the registration document and the query
//! responses.
//!
//! Eureka serializes its XML model to JSON, which leaves a few quirks the
//! types here accept:
//!
//! - A list with a single element may be sent as the bare element.
//! - `"$"` and `"@enabled"` may be sent as strings (`"8080"`, `"true"`).
use std::collections::HashMap;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_with::formats::PreferMany;
use serde_with::{serde_as, DisplayFromStr, OneOrMany, PickFirst};

/// The `@class` Eureka expects for instances that are not hosted on AWS.
pub const DEFAULT_DATA_CENTER_CLASS: &str = "com.netflix.appinfo.InstanceInfo$DefaultDataCenterInfo";

/// The data center name for instances that are not hosted on AWS.
pub const DEFAULT_DATA_CENTER_NAME: &str = "MyOwn";

#[derive(Serialize, Deserialize, Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    #[display("UP")]
    Up,
    #[display("DOWN")]
    Down,
    #[display("STARTING")]
    Starting,
    #[display("OUT_OF_SERVICE")]
    OutOfService,
    #[default]
    #[serde(other)]
    #[display("UNKNOWN")]
    Unknown,
}

/// A port as Eureka writes it: `{"$": 8080, "@enabled": true}`.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortInfo {
    #[serde(rename = "$")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub port: u16,

    #[serde(rename = "@enabled")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub enabled: bool,
}

impl PortInfo {
    #[must_use]
    pub fn enabled(port: u16) -> Self {
        Self { port, enabled: true }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataCenterInfo {
    #[serde(rename = "@class")]
    pub class: String,
    pub name: String,
}

impl Default for DataCenterInfo {
    fn default() -> Self {
        Self {
            class: DEFAULT_DATA_CENTER_CLASS.to_owned(),
            name: DEFAULT_DATA_CENTER_NAME.to_owned(),
        }
    }
}

/// An instance as returned by the registry queries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,

    #[serde(default)]
    pub host_name: String,

    pub app: String,

    #[serde(default)]
    pub ip_addr: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vip_address: Option<String>,

    #[serde(default)]
    pub status: InstanceStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<PortInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_port: Option<PortInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_page_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_page_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_center_info: Option<DataCenterInfo>,

    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Instance {
    /// The instance id, falling back to the `instanceId` metadata entry
    /// written by clients that do not set the top-level field.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.instance_id
            .as_deref()
            .or_else(|| self.metadata.get("instanceId").map(String::as_str))
    }
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub name: String,

    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default)]
    pub instance: Vec<Instance>,
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Applications {
    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default)]
    pub application: Vec<Application>,
}

/// Body of `GET /eureka/apps/{app}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ApplicationResponse {
    pub application: Application,
}

/// Body of `GET /eureka/apps`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ApplicationsResponse {
    pub applications: Applications,
}
