//! Server entry point.
//!
//! # Responsibility
//! - Load configuration, initialize logging, build the application context.
//! - Serve the route tree until ctrl-c.

use clap::Parser;
use log::info;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokenbook_server::api;
use tokenbook_server::config::Config;
use tokenbook_server::context::AppContext;

#[derive(Debug, Parser)]
#[command(name = "tokenbook_server", about = "Contact directory HTTP service", version)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the listen address.
    #[arg(long)]
    listen_addr: Option<SocketAddr>,
    /// Override the directory document path.
    #[arg(long)]
    store_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(listen_addr) = cli.listen_addr {
        config.listen_addr = listen_addr;
    }
    if let Some(store_path) = cli.store_path {
        config.store_path = store_path;
    }

    let log_dir = config.absolute_log_dir()?;
    tokenbook_core::init_logging(&config.log_level, &log_dir)?;

    let listen_addr = config.listen_addr;
    let ctx = Arc::new(AppContext::new(config));

    info!(
        "event=server_start module=server status=ok listen={} version={}",
        listen_addr,
        env!("CARGO_PKG_VERSION")
    );

    let (bound_addr, server) =
        warp::serve(api::routes(ctx)).bind_with_graceful_shutdown(listen_addr, async {
            let _ = tokio::signal::ctrl_c().await;
        });

    info!("event=server_listen module=server status=ok addr={bound_addr}");
    server.await;
    info!("event=server_stop module=server status=ok");

    Ok(())
}
