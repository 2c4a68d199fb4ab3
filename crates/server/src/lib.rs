//! Contacts Server - HTTP REST API for contact CRUD
//!
//! A thin translation layer between HTTP requests and single-document store
//! operations on the `contacts` collection.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::init_tracing(&config);
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /healthz` - Liveness probe, always `{"status":"ok"}`
//! - `POST /contacts` - Create a contact from `{"name", "phone"}`
//! - `GET /contacts` - List every contact
//! - `GET /contacts/{id}` - Get one contact
//! - `PUT /contacts/{id}` - Update `name` and/or `phone`
//! - `DELETE /contacts/{id}` - Delete a contact
//!
//! Errors are `{"error": "<message>"}` with a fixed message per failure kind.
//! Every response carries permissive CORS headers and `OPTIONS` is always
//! answered with an empty 200.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, init_tracing, start_server};
pub use state::ServerState;
