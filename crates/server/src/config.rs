use contacts::StoreConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Which persistence backend to serve from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Mongo,
    Memory,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Persistence backend
    #[serde(default = "default_backend")]
    pub backend: Backend,

    /// MongoDB connection string
    #[serde(default = "default_mongo_uri")]
    pub mongo_uri: String,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    /// Upper bound for a single store call, in seconds
    #[serde(default = "default_store_timeout_secs")]
    pub store_timeout_secs: u64,

    /// Upper bound for the initial store connection, in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            backend: default_backend(),
            mongo_uri: default_mongo_uri(),
            database: default_database(),
            collection: default_collection(),
            store_timeout_secs: default_store_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from an optional `.env`, an optional `server.*`
    /// file and environment variables.
    ///
    /// `CONTACTS_SERVER__<KEY>` sets any field; the bare `MONGO_URI` and
    /// `PORT` variables win over everything else.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let port = std::env::var("PORT")
            .ok()
            .map(|raw| raw.parse::<u16>())
            .transpose()
            .map_err(|e| anyhow::anyhow!("PORT must be a valid port number: {e}"))?;

        let builder = config::Config::builder()
            .add_source(config::File::with_name("server").required(false))
            .add_source(config::Environment::with_prefix("CONTACTS_SERVER").separator("__"))
            .set_override_option("mongo_uri", std::env::var("MONGO_URI").ok())?
            .set_override_option("port", port.map(i64::from))?;

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    pub fn store_config(&self) -> StoreConfig {
        match self.backend {
            Backend::Memory => StoreConfig::in_memory(),
            Backend::Mongo => StoreConfig::mongo(&self.mongo_uri, &self.database, &self.collection),
        }
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_backend() -> Backend {
    Backend::Mongo
}

fn default_mongo_uri() -> String {
    "mongodb://user-db:27017".to_string()
}

fn default_database() -> String {
    "contacts_db".to_string()
}

fn default_collection() -> String {
    "contacts".to_string()
}

fn default_store_timeout_secs() -> u64 {
    5
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}
