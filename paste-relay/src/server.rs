//! Relay state and the HTTP serve loop.
//!
//! [`PasteRelay`] owns the store and the salt rotator. [`serve`] runs the
//! router on a bound listener until a shutdown signal arrives, then gives
//! in-flight requests a bounded grace period.

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Instant;

use paste_crypto::{OsRandom, RandomSource};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::cleanup::spawn_sweep_task;
use crate::config::Config;
use crate::error::{RelayError, Result};
use crate::http::build_router;
use crate::salt::SaltRotator;
use crate::storage::RelayStore;

/// Main relay server state.
pub struct PasteRelay {
    config: Config,
    store: Arc<RelayStore>,
    salt: SaltRotator,
    started_at: Instant,
}

impl std::fmt::Debug for PasteRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasteRelay")
            .field("config", &self.config)
            .field("ttl", &self.store.ttl())
            .finish_non_exhaustive()
    }
}

impl PasteRelay {
    /// Create a relay using the operating system RNG for salts.
    pub fn new(config: Config) -> Self {
        Self::with_random(config, Arc::new(OsRandom))
    }

    /// Create a relay drawing salts from `rng`.
    pub fn with_random(config: Config, rng: Arc<dyn RandomSource>) -> Self {
        let store = Arc::new(match config.ttl() {
            Some(ttl) => RelayStore::with_ttl(ttl),
            None => RelayStore::new(),
        });
        let salt = SaltRotator::new(store.clone(), rng);
        Self {
            config,
            store,
            salt,
            started_at: Instant::now(),
        }
    }

    /// Get the relay configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get access to the store.
    pub fn store(&self) -> &RelayStore {
        &self.store
    }

    /// Get a clone of the store Arc for background tasks.
    pub fn store_arc(&self) -> Arc<RelayStore> {
        self.store.clone()
    }

    /// Get access to the salt rotator.
    pub fn salt(&self) -> &SaltRotator {
        &self.salt
    }

    /// Seconds since this relay was created.
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Resolves when the process receives Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Serve `relay` on `listener` until `shutdown` resolves.
///
/// After the signal no new connections are accepted. Requests still open
/// when the grace period ends are abandoned.
pub async fn serve<F>(relay: Arc<PasteRelay>, listener: TcpListener, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let grace = relay.config().shutdown_grace();
    let sweeper = spawn_sweep_task(relay.store_arc(), relay.config().sweep_interval());
    let router = build_router(relay);

    let (draining_tx, draining_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown.await;
            let _ = draining_tx.send(());
        })
        .into_future();
    let mut server = std::pin::pin!(server);

    let result = tokio::select! {
        result = &mut server => result,
        _ = draining_rx => {
            tracing::info!("Draining connections (grace: {}s)", grace.as_secs());
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!("Grace period elapsed; abandoning open requests");
                    Ok(())
                }
            }
        }
    };

    if let Some(handle) = sweeper {
        handle.abort();
    }
    tracing::info!("Relay stopped");
    result.map_err(RelayError::Io)
}

/// Bind the configured address and serve until `shutdown` resolves.
pub async fn run<F>(config: Config, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = config.server.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| RelayError::Bind {
            address: address.clone(),
            source,
        })?;

    match config.ttl() {
        Some(ttl) => tracing::info!("Entries expire after {}s", ttl.as_secs()),
        None => tracing::info!("Entry expiry disabled"),
    }
    if config.auth.credentials().is_some() {
        tracing::info!("Basic authentication enabled");
    }
    tracing::info!("Listening on {}", address);

    serve(Arc::new(PasteRelay::new(config)), listener, shutdown).await
}
