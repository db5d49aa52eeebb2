//! Configuration data structures for the room service.
//!
//! The configuration is loaded with [`figment`] from (in order of priority,
//! lowest first):
//!
//! 1. The built-in defaults ([`Configuration::default`]).
//! 2. A TOML document, either inline in the `ROOM_SERVICE_CONFIG_TOML`
//!    environment variable or read from the file given on the command line or
//!    in `ROOM_SERVICE_CONFIG_TOML_PATH`.
//! 3. Environment variables prefixed with `ROOM_SERVICE_CONFIG_OVERRIDE_`,
//!    using `__` to separate sections from fields. For example
//!    `ROOM_SERVICE_CONFIG_OVERRIDE_REGISTRY__BASE_URL`.
//!
//! A sample configuration:
//!
//! ```toml
//! [logging]
//! threshold = "info"
//!
//! [service]
//! app_name = "msSalasGo"
//! bind_address = "0.0.0.0:8096"
//! port = 8096
//! secure_port = 443
//!
//! [registry]
//! base_url = "http://localhost:8761"
//! retry_interval = 5
//! heartbeat_interval = 30
//! request_timeout = 10
//! ```
pub mod logging;
pub mod registry;
pub mod service;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::logging::{Logging, Threshold};
pub use crate::registry::Registry;
pub use crate::service::Service;

/// Inline TOML configuration. Takes precedence over the file path.
pub const ENV_VAR_CONFIG_TOML: &str = "ROOM_SERVICE_CONFIG_TOML";

/// Path of the TOML configuration file.
pub const ENV_VAR_CONFIG_TOML_PATH: &str = "ROOM_SERVICE_CONFIG_TOML_PATH";

/// Prefix of the environment variables overriding single values.
pub const CONFIG_OVERRIDE_PREFIX: &str = "ROOM_SERVICE_CONFIG_OVERRIDE_";

/// Separator between the section and the field in override variables.
pub const CONFIG_OVERRIDE_SEPARATOR: &str = "__";

/// Where the configuration comes from.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Info {
    config_toml: Option<String>,
    config_toml_path: Option<PathBuf>,
}

impl Info {
    /// Collects the configuration sources.
    ///
    /// An explicit `config_toml_path` (e.g. from the command line) wins over
    /// the `ROOM_SERVICE_CONFIG_TOML_PATH` variable. Inline TOML in
    /// `ROOM_SERVICE_CONFIG_TOML` wins over both.
    #[must_use]
    pub fn new(config_toml_path: Option<PathBuf>) -> Self {
        let config_toml = std::env::var(ENV_VAR_CONFIG_TOML).ok();

        let config_toml_path = config_toml_path.or_else(|| std::env::var(ENV_VAR_CONFIG_TOML_PATH).ok().map(PathBuf::from));

        Self {
            config_toml,
            config_toml_path,
        }
    }

    #[must_use]
    pub fn from_toml(config_toml: &str) -> Self {
        Self {
            config_toml: Some(config_toml.to_owned()),
            config_toml_path: None,
        }
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Unable to load the configuration from figment: {source}")]
    UnableToLoadFromConfigFile { source: Arc<figment::Error> },

    #[error("Configuration file not found: {path}")]
    MissingConfigFile { path: PathBuf },

    #[error("The application name must not be empty")]
    EmptyAppName,

    #[error("The registry base url \"{url}\" must use the http or https scheme")]
    UnsupportedRegistryScheme { url: url::Url },

    #[error("The registry base url \"{url}\" has no host")]
    MissingRegistryHost { url: url::Url },

    #[error("The \"{field}\" duration must be greater than zero")]
    ZeroDuration { field: &'static str },
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::UnableToLoadFromConfigFile { source: Arc::new(err) }
    }
}

/// Core configuration of the room service.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct Configuration {
    #[serde(default)]
    pub logging: Logging,

    #[serde(default)]
    pub service: Service,

    #[serde(default)]
    pub registry: Registry,
}

impl Configuration {
    /// Loads the configuration from the given sources.
    ///
    /// # Errors
    ///
    /// Will return an error if the configuration file is missing, can not be
    /// parsed, or holds invalid values.
    pub fn load(info: &Info) -> Result<Configuration, Error> {
        let figment = Figment::from(Serialized::defaults(Configuration::default()));

        let figment = if let Some(config_toml) = &info.config_toml {
            figment.merge(Toml::string(config_toml))
        } else if let Some(path) = &info.config_toml_path {
            Self::check_file_exists(path)?;
            figment.merge(Toml::file(path))
        } else {
            figment
        };

        let figment = figment.merge(Env::prefixed(CONFIG_OVERRIDE_PREFIX).split(CONFIG_OVERRIDE_SEPARATOR));

        let config: Configuration = figment.extract()?;

        config.validate()?;

        Ok(config)
    }

    /// Checks the values that serde can not.
    ///
    /// # Errors
    ///
    /// Will return the first invalid value found.
    pub fn validate(&self) -> Result<(), Error> {
        self.service.validate()?;
        self.registry.validate()?;
        Ok(())
    }

    fn check_file_exists(path: &Path) -> Result<(), Error> {
        if path.is_file() {
            Ok(())
        } else {
            Err(Error::MissingConfigFile { path: path.to_owned() })
        }
    }
}
