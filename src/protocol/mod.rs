// ABOUTME: Protocol module for the sync info exchange
// ABOUTME: Re-exports the parameter schema and the JSON wire codec

/// Single-document JSON codec
pub mod codec;
/// Sync parameter schema
pub mod messages;

pub use codec::{decode, encode, MAX_MESSAGE_SIZE};
pub use messages::{ClockType, Playlist, SyncParameters, SYNC_INFO_VERSION};
