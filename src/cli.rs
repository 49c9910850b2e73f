// ABOUTME: Shared CLI argument parsing for the syncctl binaries
// ABOUTME: Maps command-line flags onto client/server configs and sets up tracing

use crate::client::ClientConfig;
use crate::endpoint::Endpoint;
use crate::protocol::{ClockType, Playlist, SyncParameters};
use crate::server::ServerConfig;
use clap::Args;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Initialize tracing based on verbosity flag
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = if verbose { "syncctl=debug" } else { "syncctl=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Arguments of the control server binary
///
/// Use with `#[command(flatten)]` in the binary's Args struct.
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(short, long, default_value = "0.0.0.0")]
    pub address: String,

    /// Port to listen on (0 picks a free port)
    #[arg(short, long, default_value_t = 0)]
    pub port: u16,

    /// Clock type clients should use (system, net, ntp, ptp)
    #[arg(long, default_value = "net")]
    pub clock_type: ClockType,

    /// Address of the network clock provider
    #[arg(long)]
    pub clock_address: Option<String>,

    /// Port of the network clock provider
    #[arg(long, default_value_t = 0)]
    pub clock_port: u16,

    /// Pipeline base time in nanoseconds (defaults to now)
    #[arg(long)]
    pub base_time: Option<u64>,

    /// Pipeline latency in milliseconds
    #[arg(long, default_value_t = 0)]
    pub latency_ms: u64,

    /// Media URI to play (repeat for a playlist)
    #[arg(long = "uri")]
    pub uris: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServerArgs {
    /// Initialize tracing based on verbosity flag
    pub fn init_tracing(&self) {
        init_tracing(self.verbose);
    }

    /// Log startup information
    pub fn log_startup_info(&self) {
        tracing::info!("Sync control server v{}", env!("CARGO_PKG_VERSION"));
        tracing::info!("Bind: {}:{}", self.address, self.port);
        tracing::info!("Clock: {}", self.clock_type.as_str());
    }

    /// Build ServerConfig from these args
    pub fn build_config(&self) -> crate::Result<ServerConfig> {
        Ok(ServerConfig::new(Endpoint::new(self.address.clone(), self.port)?))
    }

    /// Build the initial sync parameters from these args
    pub fn build_sync_parameters(&self) -> SyncParameters {
        let base_time = self.base_time.unwrap_or_else(now_nanos);

        let mut params = SyncParameters::new(self.clock_type, base_time)
            .latency(self.latency_ms.saturating_mul(1_000_000));

        if let Some(ref address) = self.clock_address {
            params = params.clock(address.clone(), self.clock_port);
        }
        if !self.uris.is_empty() {
            params = params.playlist(Playlist::new(self.uris.clone()));
        }

        params
    }
}

/// Arguments of the control client binary
#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// Address of the sync server
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Port of the sync server
    #[arg(short, long)]
    pub port: u16,

    /// Connect timeout in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub connect_timeout_ms: u64,

    /// Read timeout in milliseconds
    #[arg(long, default_value_t = 5_000)]
    pub read_timeout_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ClientArgs {
    /// Initialize tracing based on verbosity flag
    pub fn init_tracing(&self) {
        init_tracing(self.verbose);
    }

    /// Build ClientConfig from these args
    pub fn build_config(&self) -> crate::Result<ClientConfig> {
        let endpoint = Endpoint::new(self.address.clone(), self.port)?;
        Ok(ClientConfig::new(endpoint)
            .connect_timeout(Duration::from_millis(self.connect_timeout_ms))
            .read_timeout(Duration::from_millis(self.read_timeout_ms)))
    }
}

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
