//! Server Configuration
//!
//! Read once at startup from the environment. `JWT_SECRET` is read
//! separately by the auth module at verification time.

use std::net::SocketAddr;

/// Default bind port when `SERVER_PORT` is unset
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: [u8; 4],
    pub port: u16,
}

impl ServerConfig {
    /// Load from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        Self {
            host: [0, 0, 0, 0],
            port,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: [0, 0, 0, 0],
            port: DEFAULT_PORT,
        }
    }
}
