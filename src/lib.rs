//! **Room Service** is a small HTTP service that joins a [Eureka](https://github.com/Netflix/eureka)
//! discovery registry.
//!
//! At startup it registers one instance of itself, retrying every few seconds until the registry accepts it. While
//! registered, a heartbeat renews the lease of the instance. On `SIGINT` or `SIGTERM` it leaves the registry and exits.
//!
//! The service also serves the three pages the registration advertises:
//!
//! Endpoint    | Response
//! ------------|---------------------------------------------------
//! `GET /`       | `{}`
//! `GET /info`   | `{"app": "msSalasGo", "registration": "registered"}`
//! `GET /health` | `{"status": "UP"}`
//!
//! # Packages
//!
//! - [`room_service_registry`]: the registry client and the registration lifecycle.
//! - [`room_service_configuration`]: the configuration, loaded from TOML and environment variables.
//!
//! # Configuration
//!
//! ```text
//! room-service --config ./share/default/config/room-service.toml
//! ```
//!
//! Refer to the [configuration crate documentation](room_service_configuration) for the options and the ways to
//! override them.
//!
//! # Exit status
//!
//! Status | Meaning
//! -------|---------------------------------------------------------------
//! `1`    | Stopped by a signal, after leaving the registry.
//! `2`    | Invalid configuration, or no address to advertise.
pub mod app;
pub mod bootstrap;
pub mod servers;
