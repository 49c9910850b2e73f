// ABOUTME: Main library entry point for syncctl
// ABOUTME: Exports the sync control client, server and exchange protocol

//! # syncctl
//!
//! TCP control protocol that hands clock synchronization parameters from one
//! authoritative sync server to any number of playback clients.
//!
//! Each connection carries exactly one JSON document: the server writes its
//! current [`SyncParameters`] and the client reads it once, parses it and
//! publishes it to whoever drives playback.
//!
//! ## Example: Serving parameters
//!
//! ```no_run
//! use syncctl::protocol::{ClockType, SyncParameters};
//! use syncctl::server::{ControlServer, ServerConfig, SharedSyncParameters};
//!
//! #[tokio::main]
//! async fn main() -> syncctl::Result<()> {
//!     let params = SharedSyncParameters::new(SyncParameters::new(ClockType::Net, 1_000));
//!     let mut server = ControlServer::new(ServerConfig::default(), params);
//!
//!     let addr = server.start().await?;
//!     println!("serving sync info on {}", addr);
//!
//!     tokio::signal::ctrl_c().await?;
//!     server.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Example: Receiving parameters
//!
//! ```no_run
//! use syncctl::client::{ClientConfig, ControlClient};
//! use syncctl::Endpoint;
//!
//! #[tokio::main]
//! async fn main() -> syncctl::Result<()> {
//!     let config = ClientConfig::new(Endpoint::new("127.0.0.1", 9999)?);
//!     let client = ControlClient::connect(config).await;
//!
//!     match client.sync_info() {
//!         Some(info) => println!("base time {}", info.base_time),
//!         None => println!("no sync info: {:?}", client.failure()),
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Control client that fetches sync parameters from a server
pub mod client;
/// Command-line argument definitions shared by the binaries
pub mod cli;
/// Network endpoint type
pub mod endpoint;
/// Sync parameter schema and wire codec
pub mod protocol;
/// Control server that hands out sync parameters
pub mod server;

pub use client::{ClientConfig, ControlClient};
pub use endpoint::Endpoint;
pub use protocol::{ClockType, SyncParameters};
pub use server::{ControlServer, ServerConfig, SharedSyncParameters};

/// Result type for syncctl operations
pub type Result<T> = std::result::Result<T, error::Error>;

/// Error types for syncctl
pub mod error {
    use thiserror::Error;

    /// Error types for syncctl operations
    #[derive(Error, Debug)]
    pub enum Error {
        /// Endpoint address or port could not be used
        #[error("Invalid endpoint: {0}")]
        InvalidEndpoint(String),

        /// Connection could not be established or was closed early
        #[error("Connection error: {0}")]
        Connection(String),

        /// A network operation did not finish in time
        #[error("Timed out: {0}")]
        Timeout(String),

        /// Underlying socket I/O failure
        #[error("I/O error: {0}")]
        Io(#[from] std::io::Error),

        /// Received bytes are not a JSON document
        #[error("Could not parse JSON: {0}")]
        Parse(String),

        /// JSON document does not describe sync parameters
        #[error("Invalid sync info: {0}")]
        Schema(String),

        /// Sync parameters could not be serialized for sending
        #[error("Could not encode sync info: {0}")]
        Encode(String),

        /// Encoded message does not fit in a single read
        #[error("Message of {size} bytes exceeds the {limit} byte limit")]
        MessageTooLarge {
            /// Encoded size in bytes
            size: usize,
            /// Maximum allowed size in bytes
            limit: usize,
        },

        /// Listening socket could not be set up
        #[error("Could not bind {addr}: {source}")]
        Bind {
            /// Endpoint the server tried to bind
            addr: String,
            /// Underlying bind error
            source: std::io::Error,
        },

        /// `start` called on a server that is already listening
        #[error("Server already started")]
        AlreadyStarted,
    }
}
