//! Servers. Only the status API for now.
pub mod signals;
pub mod status_api;
