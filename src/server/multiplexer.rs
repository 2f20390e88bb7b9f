use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tracing::{Instrument, error, info, info_span, warn};

use crate::config::ServerConfig;
use crate::http::connection::{self, ConnectionSettings};
use crate::routing::Router;

/// Owns the listener and every live connection.
///
/// Meant to run on a current-thread runtime: the reactor is the readiness
/// multiplexer, and each connection task only makes progress when its
/// socket is ready.
pub struct Multiplexer {
    listener: TcpListener,
    router: Arc<Router>,
    settings: ConnectionSettings,
    connections: JoinSet<()>,
    next_id: u64,
}

impl Multiplexer {
    pub async fn bind(cfg: &ServerConfig, router: Router) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(&cfg.listen_addr)
            .await
            .with_context(|| format!("binding {}", cfg.listen_addr))?;
        Ok(Self::from_listener(listener, router, cfg.into()))
    }

    pub fn from_listener(
        listener: TcpListener,
        router: Router,
        settings: ConnectionSettings,
    ) -> Self {
        Self {
            listener,
            router: Arc::new(router),
            settings,
            connections: JoinSet::new(),
            next_id: 0,
        }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn run(self) -> anyhow::Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Serves until `shutdown` resolves, then aborts whatever is still open.
    pub async fn run_until(mut self, shutdown: impl Future<Output = ()>) -> anyhow::Result<()> {
        info!("Listening on {}", self.local_addr()?);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((socket, peer)) => self.register(socket, peer),
                    // Only this connection is lost.
                    Err(e) => warn!(error = %e, "Accept failed"),
                },

                Some(joined) = self.connections.join_next() => {
                    if let Err(e) = joined {
                        if e.is_panic() {
                            error!(error = %e, "Connection task panicked");
                        }
                    }
                }

                _ = &mut shutdown => {
                    info!(open = self.connections.len(), "Shutting down");
                    break;
                }
            }
        }

        self.connections.shutdown().await;
        Ok(())
    }

    fn register(&mut self, socket: TcpStream, peer: SocketAddr) {
        self.next_id += 1;
        let id = self.next_id;
        info!(id, %peer, "Accepted connection");

        let span = info_span!("connection", id, %peer);
        let router = Arc::clone(&self.router);
        let settings = self.settings;
        self.connections
            .spawn(connection::serve(socket, router, settings).instrument(span));
    }
}
