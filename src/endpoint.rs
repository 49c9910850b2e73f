// ABOUTME: TCP endpoint (address, port) used by the control client and server
// ABOUTME: Validates the address and parses "host:port" strings

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// Address and port of a TCP listening point
///
/// The address may be a hostname or a literal IP. It is never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawEndpoint")]
pub struct Endpoint {
    address: String,
    port: u16,
}

/// Unvalidated wire form of an endpoint
#[derive(Deserialize)]
struct RawEndpoint {
    address: String,
    port: u16,
}

impl TryFrom<RawEndpoint> for Endpoint {
    type Error = Error;

    fn try_from(raw: RawEndpoint) -> Result<Self, Self::Error> {
        Self::new(raw.address, raw.port)
    }
}

impl Endpoint {
    /// Create a new endpoint, rejecting an empty address
    pub fn new(address: impl Into<String>, port: u16) -> crate::Result<Self> {
        let address = address.into();
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidEndpoint("address must not be empty".to_string()));
        }

        // Accept "[::1]" as well as "::1"
        let address = trimmed
            .strip_prefix('[')
            .and_then(|a| a.strip_suffix(']'))
            .unwrap_or(trimmed)
            .to_string();

        Ok(Self { address, port })
    }

    /// Hostname or IP literal
    pub fn address(&self) -> &str {
        &self.address
    }

    /// TCP port
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl From<SocketAddr> for Endpoint {
    fn from(addr: SocketAddr) -> Self {
        Self {
            address: addr.ip().to_string(),
            port: addr.port(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.address.contains(':') {
            write!(f, "[{}]:{}", self.address, self.port)
        } else {
            write!(f, "{}:{}", self.address, self.port)
        }
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, port) = s
            .rsplit_once(':')
            .ok_or_else(|| Error::InvalidEndpoint(format!("missing port in '{}'", s)))?;

        if address.contains(':') && !address.starts_with('[') {
            return Err(Error::InvalidEndpoint(format!(
                "IPv6 address must be bracketed in '{}'",
                s
            )));
        }

        let port = port
            .parse::<u16>()
            .map_err(|e| Error::InvalidEndpoint(format!("bad port in '{}': {}", s, e)))?;

        Self::new(address, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_address() {
        assert!(matches!(Endpoint::new("", 9999), Err(Error::InvalidEndpoint(_))));
        assert!(matches!(Endpoint::new("   ", 9999), Err(Error::InvalidEndpoint(_))));
    }

    #[test]
    fn test_parse_host_port() {
        let ep: Endpoint = "127.0.0.1:9999".parse().unwrap();
        assert_eq!(ep.address(), "127.0.0.1");
        assert_eq!(ep.port(), 9999);

        let ep: Endpoint = "sync.local:0".parse().unwrap();
        assert_eq!(ep.address(), "sync.local");
        assert_eq!(ep.port(), 0);
    }

    #[test]
    fn test_parse_ipv6() {
        let ep: Endpoint = "[::1]:4000".parse().unwrap();
        assert_eq!(ep.address(), "::1");
        assert_eq!(ep.to_string(), "[::1]:4000");

        assert!("::1:4000".parse::<Endpoint>().is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!("localhost".parse::<Endpoint>().is_err());
        assert!("localhost:70000".parse::<Endpoint>().is_err());
        assert!(":9000".parse::<Endpoint>().is_err());
    }

    #[test]
    fn test_deserialize_validates_address() {
        let err = serde_json::from_str::<Endpoint>(r#"{"address":"","port":9999}"#).unwrap_err();
        assert!(err.to_string().contains("address must not be empty"));

        let ep: Endpoint =
            serde_json::from_str(r#"{"address":"[::1]","port":4000}"#).unwrap();
        assert_eq!(ep.address(), "::1");

        let json = serde_json::to_string(&ep).unwrap();
        assert_eq!(serde_json::from_str::<Endpoint>(&json).unwrap(), ep);
    }

    #[test]
    fn test_from_socket_addr() {
        let addr: SocketAddr = "10.0.0.2:8554".parse().unwrap();
        let ep = Endpoint::from(addr);
        assert_eq!(ep.to_string(), "10.0.0.2:8554");
    }
}
