//! Loads the configuration once, at startup.
use std::path::PathBuf;

use room_service_configuration::{Configuration, Error, Info};

/// Loads the configuration from the given file (or the environment) and validates it.
///
/// # Errors
///
/// Will return an error if the configuration can not be loaded or is invalid.
pub fn initialize(config_toml_path: Option<PathBuf>) -> Result<Configuration, Error> {
    Configuration::load(&Info::new(config_toml_path))
}
