use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "mason", about = "AI project scaffolder backend")]
struct Cli {
    /// Host to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind (0 for auto-assign).
    #[arg(long, default_value_t = 8787)]
    port: u16,

    /// Directory holding the built SPA; unmatched routes fall back to its
    /// index.html for client-side routing.
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Outbound queue depth per WebSocket subscriber.
    #[arg(long, default_value_t = 256)]
    max_send_queue: usize,

    /// Per-send delivery bound in seconds during broadcast.
    #[arg(long, default_value_t = 5)]
    send_timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!("Starting Mason server");

    let config = mason_server::ServerConfig {
        host: cli.host,
        port: cli.port,
        max_send_queue: cli.max_send_queue,
        send_timeout_secs: cli.send_timeout_secs,
        static_dir: cli.static_dir,
    };

    let handle = mason_server::start(config)
        .await
        .expect("Failed to start server");

    tracing::info!(port = handle.port, "Mason server ready");

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for ctrl+c");

    tracing::info!("Shutting down");
}
