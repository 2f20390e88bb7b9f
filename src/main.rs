use std::sync::Arc;

use minihttpd::config::Config;
use minihttpd::routing::Router;
use minihttpd::server::Multiplexer;
use minihttpd::store::FileStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    tracing::info!(
        listen_addr = %cfg.server.listen_addr,
        storage_root = %cfg.storage.root.display(),
        read_timeout_ms = cfg.server.read_timeout_ms,
        "Configuration loaded"
    );

    let store = Arc::new(FileStore::new(cfg.storage.root.clone()));
    let router = Router::with_default_routes(store);
    let server = Multiplexer::bind(&cfg.server, router).await?;

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown signal received");
        })
        .await
}
