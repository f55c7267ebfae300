mod protocol;
mod server;

use clap::Parser;
use server::Server;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// TCP/JSON front-end for the exchange
#[derive(Debug, Parser)]
#[command(name = "exchange-server")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Tradeable tickers
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "AAPL,GOOG,TSLA,MSFT,QQQ,TQQQ"
    )]
    tickers: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    tracing::info!(tickers = ?args.tickers, "starting exchange server");

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    Server::new(args.tickers).run(addr).await
}
