// ABOUTME: Sync control server binary
// ABOUTME: Serves sync parameters to playback clients until Ctrl-C

use clap::Parser;
use syncctl::cli::ServerArgs;
use syncctl::server::{ControlServer, SharedSyncParameters};

#[derive(Parser, Debug)]
#[command(name = "syncctl-server")]
#[command(author, version, about = "Sync parameter control server", long_about = None)]
struct Args {
    #[command(flatten)]
    server: ServerArgs,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    args.server.init_tracing();
    args.server.log_startup_info();

    let params = SharedSyncParameters::new(args.server.build_sync_parameters());
    let config = args.server.build_config()?;

    let mut server = ControlServer::new(config, params);
    let addr = server.start().await?;

    tracing::info!("Serving sync info on {}", addr);
    tracing::info!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Received shutdown signal");

    server.stop().await;
    Ok(())
}
