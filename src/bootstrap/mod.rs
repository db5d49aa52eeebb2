//! Application bootstrap: configuration, tracing and the jobs started by the application.
pub mod config;
pub mod jobs;
pub mod tracing;
