//! formsite CLI
//!
//! Serves the form builder API and the public form pages.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_formsite::{serve, App, SiteConfig};

/// Drag-and-drop form builder service.
#[derive(Parser)]
#[command(name = "formsite")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on.
    #[arg(short, long, env = "FORMSITE_ADDR", default_value = "127.0.0.1:3000")]
    addr: SocketAddr,

    /// Public origin used in shareable form links (defaults to the listen
    /// address).
    #[arg(short, long, env = "FORMSITE_BASE_URL")]
    base_url: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = SiteConfig::new(cli.addr, cli.base_url);
    let listener = TcpListener::bind(config.addr).await?;
    info!(base_url = %config.base_url, "public forms served under /form/{{id}}");

    let app = Arc::new(App::new(config)?);
    serve(listener, app).await?;
    Ok(())
}
