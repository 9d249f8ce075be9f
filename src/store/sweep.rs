//! Periodic sweep task for expired entries.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;

use super::{CacheBackend, CacheStore};

/// Spawn a background task that sweeps expired entries at a fixed interval.
///
/// Scheduling stays in the host's hands: it picks the cadence (an hour is a
/// reasonable default for this data) and aborts the returned handle on
/// shutdown. A failed sweep is logged and the task keeps running.
pub fn spawn_sweeper<B>(store: Arc<CacheStore<B>>, every: Duration) -> JoinHandle<()>
where
  B: CacheBackend + 'static,
{
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(every);
    // The first tick fires immediately; skip it so the first sweep runs a
    // full interval after startup.
    ticker.tick().await;

    loop {
      ticker.tick().await;
      if let Err(e) = store.clear_expired().await {
        warn!(error = %e, "periodic cache sweep failed");
      }
    }
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::clock::Clock;
  use crate::store::{Collection, SqliteBackend};

  #[tokio::test(start_paused = true)]
  async fn test_sweeper_removes_expired_entries_on_schedule() {
    let clock = Clock::manual(1_700_000_000_000);
    let store = Arc::new(CacheStore::with_backend(
      SqliteBackend::open_in_memory().unwrap(),
      clock.clone(),
    ));

    store
      .set(
        Collection::Benefits,
        "1",
        &serde_json::json!({ "id": "1" }),
        Some(Duration::from_secs(1)),
      )
      .await
      .unwrap();
    clock.advance(Duration::from_secs(2));

    let sweeper = spawn_sweeper(Arc::clone(&store), Duration::from_secs(60));

    // Before the first interval elapses nothing has been swept.
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(store.stats().await.unwrap().store_stats[&Collection::Benefits], 1);

    tokio::time::sleep(Duration::from_secs(31)).await;
    assert_eq!(store.stats().await.unwrap().store_stats[&Collection::Benefits], 0);

    sweeper.abort();
  }
}
