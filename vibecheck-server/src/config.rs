//! Server configuration from environment variables
//!
//! - `VIBECHECK_PORT`: listening port (default: 3030)
//! - `VIBECHECK_BIND`: bind address (default: 127.0.0.1)
//! - `VIBECHECK_DB`: database file path (default: ~/.vibecheck/vibecheck.db)
//! - `VIBECHECK_ALLOWED_ORIGIN`: CORS allowed origin, `*` for permissive
//!   (default: http://localhost:5173)
//! - `VIBECHECK_ADMIN_PASSWORD`: password seeded into the admin table on
//!   first boot (default: changeme, with a logged warning)

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::warn;

const DEFAULT_PORT: u16 = 3030;
const DEFAULT_BIND: &str = "127.0.0.1";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_ADMIN_PASSWORD: &str = "changeme";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Database file path
    pub db_path: PathBuf,

    /// CORS allowed origin; `*` allows any origin
    pub allowed_origin: String,

    /// Password seeded for the admin account when none is stored yet
    pub admin_password: String,
}

impl ServerConfig {
    /// Create config from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let port = match std::env::var("VIBECHECK_PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "Invalid VIBECHECK_PORT, using {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };
        let bind = std::env::var("VIBECHECK_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let bind_addr = format!("{}:{}", bind, port).parse().unwrap_or_else(|_| {
            warn!(value = %bind, "Invalid VIBECHECK_BIND, using {}", DEFAULT_BIND);
            SocketAddr::from(([127, 0, 0, 1], port))
        });

        let db_path = std::env::var("VIBECHECK_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_db_path());

        let allowed_origin = std::env::var("VIBECHECK_ALLOWED_ORIGIN")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGIN.to_string());

        let admin_password = std::env::var("VIBECHECK_ADMIN_PASSWORD").unwrap_or_else(|_| {
            warn!("VIBECHECK_ADMIN_PASSWORD not set, seeding the default admin password");
            DEFAULT_ADMIN_PASSWORD.to_string()
        });

        Self {
            bind_addr,
            db_path,
            allowed_origin,
            admin_password,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            db_path: default_db_path(),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

/// Default database location under the user's home directory
fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".vibecheck")
        .join("vibecheck.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3030);
        assert!(config.bind_addr.ip().is_loopback());
        assert_eq!(config.allowed_origin, "http://localhost:5173");
        assert_eq!(config.admin_password, "changeme");
        assert!(config.db_path.ends_with(".vibecheck/vibecheck.db"));
    }
}
