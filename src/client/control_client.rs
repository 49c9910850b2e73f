// ABOUTME: Sync control client
// ABOUTME: Connects once, reads a single JSON sync info message and publishes it

use crate::client::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::protocol::codec::{self, MAX_MESSAGE_SIZE};
use crate::protocol::messages::SyncParameters;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::watch;

/// Sending half of the sync info notification channel
pub type SyncInfoSender = watch::Sender<Option<SyncParameters>>;

/// Receiving half of the sync info notification channel
pub type SyncInfoReceiver = watch::Receiver<Option<SyncParameters>>;

/// Client side of the sync control protocol
///
/// Building a client performs the whole exchange: connect, one read, parse,
/// publish. None of these steps fail the construction. When anything goes
/// wrong a warning is logged, [`ControlClient::sync_info`] stays `None` and
/// [`ControlClient::failure`] says why.
#[derive(Debug)]
pub struct ControlClient {
    config: ClientConfig,
    sync_info: Option<SyncParameters>,
    failure: Option<Error>,
    conn: Option<TcpStream>,
    updates: SyncInfoSender,
    updates_rx: SyncInfoReceiver,
}

impl ControlClient {
    /// Connect to the configured server and fetch its sync info
    pub async fn connect(config: ClientConfig) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self::connect_with(config, tx).await
    }

    /// Like [`ControlClient::connect`], publishing into an existing channel
    ///
    /// Receivers created before the call observe the update as it happens.
    pub async fn connect_with(config: ClientConfig, updates: SyncInfoSender) -> Self {
        let updates_rx = updates.subscribe();
        let mut client = Self {
            config,
            sync_info: None,
            failure: None,
            conn: None,
            updates,
            updates_rx,
        };

        client.run_exchange().await;
        client
    }

    async fn run_exchange(&mut self) {
        let endpoint = self.config.endpoint.clone();

        let mut stream = match open_connection(&self.config).await {
            Ok(stream) => stream,
            Err(e) => {
                log::warn!("Could not connect to server {}: {}", endpoint, e);
                self.failure = Some(e);
                return;
            }
        };

        log::debug!("Connected to sync server {}", endpoint);

        match receive_sync_info(&mut stream, self.config.read_timeout).await {
            Ok(info) => {
                log::info!(
                    "Received sync info from {}: clock={} base_time={}",
                    endpoint,
                    info.clock_type.as_str(),
                    info.base_time
                );
                self.conn = Some(stream);
                self.sync_info = Some(info.clone());
                self.updates.send_replace(Some(info));
            }
            Err(e) => {
                log::warn!("Could not read sync info from {}: {}", endpoint, e);
                self.failure = Some(e);
                let _ = stream.shutdown().await;
            }
        }
    }

    /// Server endpoint this client was built for
    pub fn endpoint(&self) -> &Endpoint {
        &self.config.endpoint
    }

    /// Server address
    pub fn address(&self) -> &str {
        self.config.endpoint.address()
    }

    /// Server port
    pub fn port(&self) -> u16 {
        self.config.endpoint.port()
    }

    /// Received sync info, if the exchange succeeded
    pub fn sync_info(&self) -> Option<&SyncParameters> {
        self.sync_info.as_ref()
    }

    /// Take the received sync info out of the client
    pub fn into_sync_info(self) -> Option<SyncParameters> {
        self.sync_info
    }

    /// Why the exchange failed, if it did
    pub fn failure(&self) -> Option<&Error> {
        self.failure.as_ref()
    }

    /// Whether the connection to the server is still open
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Subscribe to sync info updates
    ///
    /// A successful receipt that happened before this call is reported as an
    /// unseen change on the returned receiver.
    pub fn subscribe(&self) -> SyncInfoReceiver {
        self.updates_rx.clone()
    }

    /// Close the connection to the server
    ///
    /// Safe to call repeatedly and when the connection was never opened.
    pub async fn close(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            if let Err(e) = conn.shutdown().await {
                log::debug!("Error closing connection to {}: {}", self.config.endpoint, e);
            }
            log::debug!("Closed connection to {}", self.config.endpoint);
        }
    }
}

/// Open the TCP connection, bounded by the connect timeout
async fn open_connection(config: &ClientConfig) -> crate::Result<TcpStream> {
    let endpoint = &config.endpoint;
    let connect = TcpStream::connect((endpoint.address(), endpoint.port()));

    match tokio::time::timeout(config.connect_timeout, connect).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) => Err(Error::Connection(e.to_string())),
        Err(_) => Err(Error::Timeout(format!(
            "connecting to {} after {:?}",
            endpoint, config.connect_timeout
        ))),
    }
}

/// Perform the single bounded read and decode the result
///
/// This is one read call, not a read-until-closed loop.
async fn receive_sync_info<R>(stream: &mut R, read_timeout: Duration) -> crate::Result<SyncParameters>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; MAX_MESSAGE_SIZE];

    let n = match tokio::time::timeout(read_timeout, stream.read(&mut buf)).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(Error::Timeout(format!(
                "no sync info within {:?}",
                read_timeout
            )))
        }
    };

    if n == 0 {
        return Err(Error::Connection(
            "connection closed before sync info was sent".to_string(),
        ));
    }

    codec::decode(&buf[..n])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::ClockType;
    use std::io;
    use tokio_test::io::Builder;
    use tokio_test::{assert_err, assert_ok};

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn test_receive_decodes_single_read() {
        let mut mock = Builder::new()
            .read(br#"{"clock_type":"net","base_time":1000}"#)
            .build();

        let info = assert_ok!(receive_sync_info(&mut mock, TIMEOUT).await);
        assert_eq!(info, SyncParameters::new(ClockType::Net, 1000));
    }

    #[tokio::test]
    async fn test_receive_empty_read() {
        let mut mock = Builder::new().build();

        let err = assert_err!(receive_sync_info(&mut mock, TIMEOUT).await);
        assert!(matches!(err, Error::Connection(_)));
    }

    #[tokio::test]
    async fn test_receive_read_error() {
        let mut mock = Builder::new()
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            .build();

        let err = assert_err!(receive_sync_info(&mut mock, TIMEOUT).await);
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn test_receive_invalid_json() {
        let mut mock = Builder::new().read(b"not-json").build();

        let err = assert_err!(receive_sync_info(&mut mock, TIMEOUT).await);
        assert!(matches!(err, Error::Parse(_)));
    }
}
