// ABOUTME: Control server configuration
// ABOUTME: Bind endpoint and per-connection write timeout

use crate::endpoint::Endpoint;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address and port to listen on (port 0 picks a free port)
    pub endpoint: Endpoint,
    /// Upper bound on writing sync info to one client
    pub write_timeout: Duration,
}

impl ServerConfig {
    /// Create a configuration listening on the given endpoint
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            ..Default::default()
        }
    }

    /// Set the write timeout
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::from(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))),
            write_timeout: Duration::from_secs(5),
        }
    }
}
