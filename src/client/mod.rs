// ABOUTME: Client module for the sync control protocol
// ABOUTME: Connects to a control server and publishes the received sync info

mod config;
mod control_client;

pub use config::ClientConfig;
pub use control_client::{ControlClient, SyncInfoReceiver, SyncInfoSender};
