//! kelp-relay - forward phone orientation and buttons to the game
//!
//! ## Usage
//!
//! ```bash
//! # Defaults: HTTP on 8080, samples to 127.0.0.1:5006
//! kelp-relay
//!
//! # Game on another machine
//! KELP_RELAY_DEST=192.168.1.20:5006 kelp-relay
//! ```

use std::net::{Ipv4Addr, SocketAddr};

use tracing::info;

use kelp_relay::{RelayConfig, RelayServer};
use kelp_runtime::init_logging;
use kelp_transport::detect_local_ip;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = RelayConfig::from_env()?;
    init_logging(config.log_format)?;

    let local_ip = detect_local_ip();
    let bind = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.http_port));
    let server = RelayServer::bind(bind, &config, local_ip).await?;
    let state = server.state();

    info!("Kelp phone relay starting");
    info!("  HTTP port: {}", config.http_port);
    info!("  Forwarding samples to: {}", config.destination);
    info!("  Local IP: {}", local_ip);
    info!("  Pages from: {}", config.static_dir.display());
    info!("Open on the phone:");
    info!("  Buttons only: http://{}:{}/buttons", local_ip, config.http_port);
    info!("  Gyroscope:    http://{}:{}/", local_ip, config.http_port);
    info!("Press Ctrl+C to stop");

    server
        .serve_until(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Ctrl-C received, shutting down");
        })
        .await?;

    let stats = state.stats();
    info!(
        "Relay stats: {} pages served, {} samples relayed, {} failures",
        stats.pages_served, stats.samples_relayed, stats.relay_failures
    );
    info!("Goodbye!");
    Ok(())
}
