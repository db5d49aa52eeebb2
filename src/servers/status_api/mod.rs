//! Status API.
//!
//! Serves the pages advertised in the registration document:
//!
//! - `GET /`: the home page, an empty json object.
//! - `GET /info`: the application name and its registration state.
//! - `GET /health`: always `{"status": "UP"}` while the process serves requests.
//!
//! ```text
//! curl -s http://localhost:8096/info
//! {"app":"msSalasGo","registration":"registered"}
//! ```
pub mod handlers;
pub mod resources;
pub mod routes;
pub mod server;

pub const STATUS_API_LOG_TARGET: &str = "STATUS API";
