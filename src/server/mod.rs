// ABOUTME: Server module for the sync control protocol
// ABOUTME: Provides the TCP listener lifecycle, per-connection handler and parameter source

mod config;
mod connection_handler;
mod server;
mod source;

pub use config::ServerConfig;
pub use connection_handler::handle_connection;
pub use server::ControlServer;
pub use source::{SharedSyncParameters, SyncInfoSource};
