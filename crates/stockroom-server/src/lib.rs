//! # Stockroom Server
//!
//! Request dispatch and HTTP serving for Stockroom.
//!
//! - [`Router`] - Method + path template table mapping requests onto chains
//! - [`App`] - Socket-free dispatcher: body parsing, 404/405, panic boundary, error rendering
//! - [`Server`] - Hyper HTTP/1.1 server with request timeouts and graceful shutdown
//! - [`ShutdownSignal`] - Cloneable shutdown trigger, optionally wired to SIGINT/SIGTERM
//!
//! ## Example
//!
//! ```rust,ignore
//! use stockroom_server::{App, Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = App::builder().build()?;
//!     let config = ServerConfig::builder().http_addr("127.0.0.1:5000").build();
//!
//!     Server::new(config, app).run().await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/stockroom-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod config;
mod error;
mod router;
mod server;
pub mod shutdown;

pub use app::{App, AppBuilder, REQUEST_ID_HEADER};
pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_REQUEST_TIMEOUT_MS,
    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use error::{ServerError, ServerResult};
pub use router::{RouteMatch, Router};
pub use server::Server;
pub use shutdown::{ConnectionTracker, ShutdownSignal};
