//! Background task owning the game-store connection lifecycle.
//!
//! The server keeps answering requests while the store is away; the
//! supervisor flips the shared degraded flag so handlers fail fast with 503
//! instead of timing out per request.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::{game_store::GameStore, storage::StorageError},
    state::SharedState,
};

const CONNECT_BASE_DELAY: Duration = Duration::from_secs(1);
const CONNECT_MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const RECONNECT_ATTEMPT_LIMIT: u32 = 3;

/// Drive the game-store connection: connect with backoff, install the store,
/// then watch its health until it is lost for good and start over.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn GameStore>, StorageError>> + Send,
{
    let mut delay = CONNECT_BASE_DELAY;

    loop {
        match connect().await {
            Ok(store) => {
                state.set_game_store(store.clone()).await;
                info!("game store connected; leaving degraded mode");
                delay = CONNECT_BASE_DELAY;

                monitor(&state, store).await;
                warn!("game store lost; restarting the connection loop");
            }
            Err(err) => {
                warn!(error = %err, "game store connection attempt failed");
            }
        }

        sleep(delay).await;
        delay = backoff(delay);
    }
}

/// Poll the installed store until a health failure survives every reconnect
/// attempt, keeping the degraded flag in sync along the way.
async fn monitor(state: &SharedState, store: Arc<dyn GameStore>) {
    loop {
        match store.health_check().await {
            Ok(()) => {
                if state.is_degraded().await {
                    info!("game store healthy again; leaving degraded mode");
                    state.update_degraded(false).await;
                }
                sleep(HEALTH_POLL_INTERVAL).await;
            }
            Err(err) => {
                warn!(error = %err, "game store health check failed; entering degraded mode");
                state.update_degraded(true).await;

                if !reconnect_with_backoff(store.as_ref()).await {
                    warn!("exhausted game store reconnect attempts; staying degraded");
                    return;
                }

                info!("game store reconnected; leaving degraded mode");
                state.update_degraded(false).await;
                sleep(HEALTH_POLL_INTERVAL).await;
            }
        }
    }
}

/// Bounded reconnect attempts against the already-installed store; `true`
/// when one of them lands.
async fn reconnect_with_backoff(store: &dyn GameStore) -> bool {
    let mut delay = CONNECT_BASE_DELAY;

    for attempt in 1..=RECONNECT_ATTEMPT_LIMIT {
        match store.try_reconnect().await {
            Ok(()) => return true,
            Err(err) => {
                warn!(attempt, error = %err, "game store reconnect attempt failed");
                sleep(delay).await;
                delay = backoff(delay);
            }
        }
    }

    false
}

fn backoff(delay: Duration) -> Duration {
    (delay * 2).min(CONNECT_MAX_DELAY)
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::atomic::{AtomicU32, Ordering},
    };

    use super::*;
    use crate::{config::AppConfig, dao::game_store::memory::MemoryGameStore, state::AppState};

    #[test]
    fn backoff_doubles_and_caps() {
        assert_eq!(backoff(CONNECT_BASE_DELAY), Duration::from_secs(2));
        assert_eq!(backoff(Duration::from_secs(8)), CONNECT_MAX_DELAY);
        assert_eq!(backoff(CONNECT_MAX_DELAY), CONNECT_MAX_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_until_a_connection_lands_then_leaves_degraded_mode() {
        let state = AppState::new(AppConfig::default());
        let mut degraded = state.degraded_watcher();
        assert!(*degraded.borrow());

        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();
        tokio::spawn(run(state.clone(), move || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(StorageError::unavailable(
                        "connection refused".into(),
                        io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
                    ))
                } else {
                    Ok(Arc::new(MemoryGameStore::new()) as Arc<dyn GameStore>)
                }
            }
        }));

        degraded
            .wait_for(|flag| !*flag)
            .await
            .expect("supervisor dropped the degraded channel");

        // First attempt failed, second installed the store.
        assert!(attempts.load(Ordering::SeqCst) >= 2);
        assert!(state.game_store().await.is_some());
    }
}
