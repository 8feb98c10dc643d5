//! Expiry Sweeper
//!
//! Recurring background task that reclaims orders stuck in Pending past
//! their allowed age. Runs on its own tick, decoupled from request
//! handling; a failed sweep logs and waits for the next tick.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::config::SweeperConfig;

pub struct ExpirySweeper {
    pool: PgPool,
    tick_interval: Duration,
    expiry: chrono::Duration,
}

impl ExpirySweeper {
    pub fn new(pool: PgPool, cfg: &SweeperConfig) -> Self {
        Self {
            pool,
            tick_interval: Duration::from_secs(cfg.interval_secs),
            expiry: chrono::Duration::seconds(cfg.expiry_secs),
        }
    }

    /// Spawn the sweeper loop; the returned handle owns its lifecycle.
    pub fn spawn(self) -> SweeperHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(self.run(shutdown_rx));
        SweeperHandle {
            shutdown: shutdown_tx,
            handle,
        }
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut tick = interval(self.tick_interval);
        tracing::info!(
            "Expiry sweeper started (tick {}s, window {}s)",
            self.tick_interval.as_secs(),
            self.expiry.num_seconds()
        );

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    match Self::sweep_once(&self.pool, self.expiry).await {
                        // Quiet no-op runs; log only when something was reclaimed
                        Ok(0) => {}
                        Ok(deleted) => {
                            tracing::info!("Expiry sweep reclaimed {} pending order(s)", deleted);
                        }
                        Err(e) => {
                            tracing::error!("Expiry sweep failed: {}", e);
                        }
                    }
                }
                _ = shutdown.changed() => {
                    tracing::info!("Expiry sweeper stopping");
                    break;
                }
            }
        }
    }

    /// One sweep pass: delete Pending orders created strictly before
    /// `now - expiry`. Idempotent by construction.
    pub async fn sweep_once(
        pool: &PgPool,
        expiry: chrono::Duration,
    ) -> Result<u64, sqlx::Error> {
        let cutoff = Utc::now() - expiry;
        crate::store::OrderRepository::delete_expired_pending(pool, cutoff).await
    }
}

/// Lifecycle handle for the background sweeper task.
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signal the loop to stop and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
