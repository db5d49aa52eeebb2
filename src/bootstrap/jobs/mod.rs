//! Jobs started by the application.
//!
//! A job starts a server in its own tasks and reports back, through a [`Started`] message, the address it is
//! listening on.
pub mod status_api;

/// Sent by a server once it is listening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Started {
    pub local_addr: std::net::SocketAddr,
}
