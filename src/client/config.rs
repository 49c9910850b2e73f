// ABOUTME: Control client configuration
// ABOUTME: Target endpoint plus connect and read timeouts

use crate::endpoint::Endpoint;
use std::time::Duration;

/// Control client configuration
///
/// The endpoint is fixed for the lifetime of a client; connecting somewhere
/// else means building a new client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Server to fetch sync info from
    pub endpoint: Endpoint,
    /// Upper bound on establishing the TCP connection
    pub connect_timeout: Duration,
    /// Upper bound on waiting for the server's single message
    pub read_timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration for the given server endpoint
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(5),
        }
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the read timeout
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ClientConfig::new(Endpoint::new("127.0.0.1", 9999).unwrap())
            .connect_timeout(Duration::from_millis(250))
            .read_timeout(Duration::from_secs(1));

        assert_eq!(config.endpoint.port(), 9999);
        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.read_timeout, Duration::from_secs(1));
    }
}
