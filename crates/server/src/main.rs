//! Contacts Server - HTTP REST API for contact CRUD
//!
//! Reads configuration from the environment, connects the contact store and
//! serves until interrupted. Exits non-zero if the store is unreachable.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    server::init_tracing(&config);

    server::start_server(config).await?;

    Ok(())
}
