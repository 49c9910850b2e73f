// ABOUTME: Per-connection handler for the sync control server
// ABOUTME: Writes one JSON sync info document to an accepted client and closes

use crate::error::Error;
use crate::protocol::codec;
use crate::server::source::SyncInfoSource;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

/// Serve one accepted connection
///
/// Errors are logged and end only this connection.
pub async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    source: Arc<dyn SyncInfoSource>,
    write_timeout: Duration,
) {
    let params = source.snapshot();

    let payload = match codec::encode(&params) {
        Ok(payload) => payload,
        Err(e) => {
            log::error!("Failed to encode sync info for {}: {}", peer, e);
            let _ = stream.shutdown().await;
            return;
        }
    };

    match send_sync_info(&mut stream, &payload, write_timeout).await {
        Ok(()) => log::debug!("Sent sync info to {} ({} bytes)", peer, payload.len()),
        Err(e) => log::warn!("Failed to send sync info to {}: {}", peer, e),
    }

    if let Err(e) = stream.shutdown().await {
        log::debug!("Error closing connection to {}: {}", peer, e);
    }
}

/// Write the whole document in one go, bounded by the write timeout
async fn send_sync_info<W>(stream: &mut W, payload: &[u8], write_timeout: Duration) -> crate::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let write = async {
        stream.write_all(payload).await?;
        stream.flush().await
    };

    match tokio::time::timeout(write_timeout, write).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(Error::Timeout(format!(
            "writing sync info took longer than {:?}",
            write_timeout
        ))),
    }
}
