// ABOUTME: Sync control client binary
// ABOUTME: Fetches sync parameters from a server and prints them as JSON

use clap::Parser;
use syncctl::cli::ClientArgs;
use syncctl::ControlClient;

#[derive(Parser, Debug)]
#[command(name = "syncctl")]
#[command(author, version, about = "Fetch sync parameters from a control server", long_about = None)]
struct Args {
    #[command(flatten)]
    client: ClientArgs,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    args.client.init_tracing();

    let config = args.client.build_config()?;
    tracing::info!("Fetching sync info from {}", config.endpoint);

    let mut client = ControlClient::connect(config).await;

    let result: Result<(), Box<dyn std::error::Error + Send + Sync>> = match client.sync_info() {
        Some(info) => {
            println!("{}", serde_json::to_string_pretty(info)?);
            Ok(())
        }
        None => Err(format!("no sync info received from {}", client.endpoint()).into()),
    };

    client.close().await;
    result
}
