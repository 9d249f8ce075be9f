//! Online/offline connectivity signal and the deferred-sync contract.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Tracks the ambient online/offline signal.
///
/// The platform integration feeds transitions in through [`set_online`];
/// consumers read the current state or wait for connectivity. Clones share
/// the same signal.
///
/// [`set_online`]: ConnectivityMonitor::set_online
#[derive(Clone)]
pub struct ConnectivityMonitor {
  tx: Arc<watch::Sender<bool>>,
  rx: watch::Receiver<bool>,
}

impl ConnectivityMonitor {
  /// Start tracking from the given initial state.
  pub fn new(initially_online: bool) -> Self {
    let (tx, rx) = watch::channel(initially_online);
    Self {
      tx: Arc::new(tx),
      rx,
    }
  }

  /// Current state of the signal.
  pub fn is_online(&self) -> bool {
    *self.rx.borrow()
  }

  /// Feed a connectivity transition from the platform.
  pub fn set_online(&self, online: bool) {
    self.tx.send_replace(online);
  }

  /// Wait until the signal reports online.
  ///
  /// Returns immediately if it already does. Dropping the future releases
  /// the subscription; nothing stays registered for an abandoned caller.
  pub async fn wait_until_online(&self) {
    let mut rx = self.rx.clone();
    // wait_for inspects the current value first, so an already-online
    // signal never blocks. The channel cannot close while `self` holds
    // the sender.
    let _ = rx.wait_for(|online| *online).await;
  }

  /// Run `callback` once connectivity is available.
  ///
  /// If the signal reports online now, the callback runs within this call.
  /// Otherwise it runs after the next transition to online. There is no
  /// timeout: if connectivity never returns, the future never resolves,
  /// though dropping it cancels the wait cleanly.
  pub async fn sync_when_online<F, Fut, T, E>(&self, callback: F) -> Result<T, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
  {
    if !self.is_online() {
      self.wait_until_online().await;
    }
    callback().await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use futures::FutureExt;
  use std::sync::atomic::{AtomicBool, Ordering};

  #[tokio::test]
  async fn test_callback_runs_immediately_when_online() {
    let monitor = ConnectivityMonitor::new(true);

    // The future must complete without yielding to the runtime.
    let result: Result<u32, ()> = monitor
      .sync_when_online(|| async { Ok(42) })
      .now_or_never()
      .expect("online sync should not defer");
    assert_eq!(result, Ok(42));
  }

  #[tokio::test]
  async fn test_callback_deferred_until_online_transition() {
    let monitor = ConnectivityMonitor::new(false);
    let ran = Arc::new(AtomicBool::new(false));

    let task = tokio::spawn({
      let monitor = monitor.clone();
      let ran = Arc::clone(&ran);
      async move {
        monitor
          .sync_when_online(|| async {
            ran.store(true, Ordering::SeqCst);
            Ok::<_, ()>(())
          })
          .await
      }
    });

    // Still offline: the callback must not have run.
    tokio::task::yield_now().await;
    assert!(!ran.load(Ordering::SeqCst));

    monitor.set_online(true);
    task.await.unwrap().unwrap();
    assert!(ran.load(Ordering::SeqCst));
  }

  #[tokio::test]
  async fn test_callback_error_propagates() {
    let monitor = ConnectivityMonitor::new(true);

    let result: Result<(), &str> = monitor.sync_when_online(|| async { Err("sync failed") }).await;
    assert_eq!(result, Err("sync failed"));
  }

  #[tokio::test]
  async fn test_dropped_wait_leaves_no_subscription() {
    let monitor = ConnectivityMonitor::new(false);

    {
      let wait = monitor.wait_until_online();
      futures::pin_mut!(wait);
      assert!(wait.as_mut().now_or_never().is_none());
      // Dropped here without ever seeing an online transition.
    }

    assert_eq!(monitor.tx.receiver_count(), 1);
  }

  #[tokio::test]
  async fn test_offline_transition_does_not_wake_waiters() {
    let monitor = ConnectivityMonitor::new(false);
    let ran = Arc::new(AtomicBool::new(false));

    let task = tokio::spawn({
      let monitor = monitor.clone();
      let ran = Arc::clone(&ran);
      async move {
        monitor
          .sync_when_online(|| async {
            ran.store(true, Ordering::SeqCst);
            Ok::<_, ()>(())
          })
          .await
      }
    });

    // A redundant offline report must not trigger the callback.
    monitor.set_online(false);
    tokio::task::yield_now().await;
    assert!(!ran.load(Ordering::SeqCst));

    monitor.set_online(true);
    task.await.unwrap().unwrap();
    assert!(ran.load(Ordering::SeqCst));
  }
}
