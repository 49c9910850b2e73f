// ABOUTME: Sync control server lifecycle
// ABOUTME: Binds the listener, runs the accept loop and hands connections to handlers

use crate::error::Error;
use crate::server::config::ServerConfig;
use crate::server::connection_handler::handle_connection;
use crate::server::source::SyncInfoSource;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Listener state that exists only between `start` and `stop`
struct RunningServer {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    accept_task: JoinHandle<()>,
}

/// Sync control server
///
/// Every client that connects gets one JSON document with the source's
/// current sync parameters, after which the connection is closed. Later
/// changes are not pushed; clients reconnect to pick them up.
pub struct ControlServer {
    /// Server configuration
    config: Arc<ServerConfig>,
    /// Where sync parameters come from
    source: Arc<dyn SyncInfoSource>,
    /// Listener state while started
    running: Option<RunningServer>,
}

impl ControlServer {
    /// Create a server that is not yet listening
    pub fn new(config: ServerConfig, source: impl SyncInfoSource) -> Self {
        Self {
            config: Arc::new(config),
            source: Arc::new(source),
            running: None,
        }
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Whether the server is currently listening
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Address actually bound, while running
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.local_addr)
    }

    /// Bind the configured endpoint and start accepting clients
    ///
    /// Returns the bound address. Fails if the server is already running or
    /// the endpoint cannot be bound.
    pub async fn start(&mut self) -> crate::Result<SocketAddr> {
        if self.running.is_some() {
            return Err(Error::AlreadyStarted);
        }

        let endpoint = &self.config.endpoint;
        let listener = TcpListener::bind((endpoint.address(), endpoint.port()))
            .await
            .map_err(|source| Error::Bind {
                addr: endpoint.to_string(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let accept_task = tokio::spawn(accept_loop(
            listener,
            Arc::clone(&self.source),
            self.config.write_timeout,
            shutdown_rx,
        ));

        log::info!("Sync control server listening on {}", local_addr);

        self.running = Some(RunningServer {
            local_addr,
            shutdown_tx,
            accept_task,
        });
        Ok(local_addr)
    }

    /// Stop accepting clients and release the listening socket
    ///
    /// Does nothing if the server is not running. Connections already being
    /// served finish on their own.
    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        let _ = running.shutdown_tx.send(true);
        if let Err(e) = running.accept_task.await {
            log::warn!("Accept loop ended abnormally: {}", e);
        }

        log::info!("Sync control server on {} stopped", running.local_addr);
    }
}

impl Drop for ControlServer {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.accept_task.abort();
        }
    }
}

/// Accept clients until shutdown is signalled, one task per connection
async fn accept_loop(
    listener: TcpListener,
    source: Arc<dyn SyncInfoSource>,
    write_timeout: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    log::debug!("Accepted sync client {}", peer);
                    tokio::spawn(handle_connection(
                        stream,
                        peer,
                        Arc::clone(&source),
                        write_timeout,
                    ));
                }
                Err(e) => {
                    // Usually fd exhaustion; back off instead of spinning
                    log::warn!("Failed to accept connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }
    }
}
