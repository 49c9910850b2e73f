// ABOUTME: Counts the warnings the control client logs on failed exchanges
// ABOUTME: Installs a capturing logger, so it lives in its own test binary

use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::time::Duration;
use syncctl::{ClientConfig, ControlClient, Endpoint};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

static CAPTURED: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());

struct CapturingLogger;

impl Log for CapturingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("syncctl")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            CAPTURED.lock().push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger;

fn take_warnings() -> Vec<String> {
    CAPTURED
        .lock()
        .drain(..)
        .filter(|(level, _)| *level == Level::Warn)
        .map(|(_, msg)| msg)
        .collect()
}

fn client_config(endpoint: Endpoint) -> ClientConfig {
    ClientConfig::new(endpoint)
        .connect_timeout(Duration::from_secs(2))
        .read_timeout(Duration::from_secs(2))
}

// Scenarios run sequentially in one test so the shared log is not interleaved
#[tokio::test]
async fn test_failed_exchange_logs_exactly_one_warning() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    // Nobody listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = Endpoint::from(listener.local_addr().unwrap());
    drop(listener);

    let client = ControlClient::connect(client_config(endpoint)).await;
    assert!(client.sync_info().is_none());

    let warnings = take_warnings();
    assert_eq!(warnings.len(), 1, "warnings: {:?}", warnings);
    assert!(warnings[0].starts_with("Could not connect to server"));

    // Peer sends something that is not JSON
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = Endpoint::from(listener.local_addr().unwrap());
    let peer = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        stream.write_all(b"not-json").await.unwrap();
        stream.shutdown().await.unwrap();
    });

    let client = ControlClient::connect(client_config(endpoint)).await;
    peer.await.unwrap();
    assert!(client.sync_info().is_none());

    let warnings = take_warnings();
    assert_eq!(warnings.len(), 1, "warnings: {:?}", warnings);
    assert!(warnings[0].starts_with("Could not read sync info"));

    // A successful exchange logs no warning
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = Endpoint::from(listener.local_addr().unwrap());
    let peer = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        stream
            .write_all(br#"{"clock_type":"net","base_time":1000}"#)
            .await
            .unwrap();
        stream.shutdown().await.unwrap();
    });

    let client = ControlClient::connect(client_config(endpoint)).await;
    peer.await.unwrap();
    assert!(client.sync_info().is_some());
    assert!(take_warnings().is_empty());
}
