// ABOUTME: Wire codec for the single-document sync info exchange
// ABOUTME: Encodes sync parameters to bounded JSON and decodes received bytes

use crate::error::Error;
use crate::protocol::messages::SyncParameters;
use serde::Serialize;

/// Largest document the client reads in its single read call
///
/// Messages are not framed, so anything larger would be truncated.
pub const MAX_MESSAGE_SIZE: usize = 4095;

/// Serialize sync parameters into one JSON document
///
/// Fails with [`Error::MessageTooLarge`] when the document would not fit in
/// a client's read buffer.
pub fn encode(params: &SyncParameters) -> crate::Result<Vec<u8>> {
    encode_document(params)
}

fn encode_document<T: Serialize + ?Sized>(value: &T) -> crate::Result<Vec<u8>> {
    let bytes = serde_json::to_vec(value).map_err(|e| Error::Encode(e.to_string()))?;
    if bytes.len() > MAX_MESSAGE_SIZE {
        return Err(Error::MessageTooLarge {
            size: bytes.len(),
            limit: MAX_MESSAGE_SIZE,
        });
    }
    Ok(bytes)
}

/// Parse received bytes as one JSON document, then as sync parameters
pub fn decode(bytes: &[u8]) -> crate::Result<SyncParameters> {
    let node: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| Error::Parse(e.to_string()))?;

    serde_json::from_value(node).map_err(|e| Error::Schema(e.to_string()))
}
