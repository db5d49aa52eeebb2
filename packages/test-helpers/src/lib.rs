//! Testing helpers for the room service.
//!
//! - [`configuration`]: configurations listening on ephemeral ports, with short intervals.
//! - [`fake_registry`]: an in-process Eureka registry recording every request it receives.
pub mod configuration;
pub mod fake_registry;
