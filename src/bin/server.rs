use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gametable::registry::RoomRegistry;
use gametable::server;

#[derive(Debug, Parser)]
#[command(name = "gametable", about = "Room server for turn-based multiplayer games")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8193")]
    addr: String,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let registry = Arc::new(RoomRegistry::new());
    let app = server::router(registry);

    let listener = tokio::net::TcpListener::bind(&args.addr).await?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, app).await
}
