//! Debounced persistence of the plan store.
//!
//! Every mutation calls [`Autosave::schedule`], which cancels any write still
//! waiting and starts a new delay. Only the last snapshot of a burst of edits
//! reaches the backing store. [`Autosave::save_now`] writes immediately and
//! reports its progress through [`SaveStatus`].

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::backing::{KeyValueStore, PLANS_KEY};
use crate::error::PlanResult;
use crate::store::PlanStore;

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_SAVED_DISPLAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveConfig {
    /// Quiet period after the last mutation before the store is written.
    pub delay: Duration,
    /// How long a manual save stays `Saved` before going back to `Idle`.
    pub saved_display: Duration,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        AutosaveConfig {
            delay: DEFAULT_AUTOSAVE_DELAY,
            saved_display: DEFAULT_SAVED_DISPLAY,
        }
    }
}

pub struct Autosave {
    backing: Arc<dyn KeyValueStore>,
    config: AutosaveConfig,
    pending: Option<JoinHandle<()>>,
    status: Arc<watch::Sender<SaveStatus>>,
    status_reset: Option<JoinHandle<()>>,
}

/// Serialize and write the whole store under the fixed key.
pub fn persist(backing: &dyn KeyValueStore, store: &PlanStore) -> PlanResult<()> {
    let json = store.to_json_pretty()?;
    backing.set(PLANS_KEY, &json)
}

impl Autosave {
    pub fn new(backing: Arc<dyn KeyValueStore>, config: AutosaveConfig) -> Self {
        let (status, _) = watch::channel(SaveStatus::Idle);

        Autosave {
            backing,
            config,
            pending: None,
            status: Arc::new(status),
            status_reset: None,
        }
    }

    pub fn status(&self) -> SaveStatus {
        *self.status.borrow()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Restart the debounce timer with a new snapshot.
    pub fn schedule(&mut self, store: &PlanStore) {
        self.cancel();

        let Ok(handle) = Handle::try_current() else {
            // No runtime to run a timer on: write straight through.
            tracing::debug!("no async runtime, autosaving immediately");
            if let Err(e) = persist(self.backing.as_ref(), store) {
                tracing::error!("autosave failed: {}", e);
            }
            return;
        };

        let backing = Arc::clone(&self.backing);
        let snapshot = store.clone();
        let delay = self.config.delay;

        self.pending = Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;

            match persist(backing.as_ref(), &snapshot) {
                Ok(()) => tracing::debug!(days = snapshot.len(), "autosaved plans"),
                // In-memory state stays as is; the next mutation retries.
                Err(e) => tracing::error!("autosave failed: {}", e),
            }
        }));

        tracing::debug!(delay_ms = delay.as_millis() as u64, "autosave scheduled");
    }

    /// Cancel a waiting write. Returns true if one was waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                tracing::debug!("pending autosave cancelled");
                true
            }
            _ => false,
        }
    }

    /// Write a waiting snapshot right away instead of after the delay.
    pub fn flush(&mut self, store: &PlanStore) -> PlanResult<()> {
        if self.cancel() {
            persist(self.backing.as_ref(), store)?;
            tracing::debug!("flushed pending autosave");
        }
        Ok(())
    }

    /// Manual save: Idle -> Saving -> Saved -> Idle. A failed write goes
    /// straight back to Idle and is returned to the caller.
    pub fn save_now(&mut self, store: &PlanStore) -> PlanResult<()> {
        self.cancel();
        if let Some(reset) = self.status_reset.take() {
            reset.abort();
        }

        self.status.send_replace(SaveStatus::Saving);

        if let Err(e) = persist(self.backing.as_ref(), store) {
            tracing::error!("manual save failed: {}", e);
            self.status.send_replace(SaveStatus::Idle);
            return Err(e);
        }

        tracing::info!(days = store.len(), "plans saved");
        self.status.send_replace(SaveStatus::Saved);

        match Handle::try_current() {
            Ok(handle) => {
                let status = Arc::clone(&self.status);
                let display = self.config.saved_display;
                self.status_reset = Some(handle.spawn(async move {
                    tokio::time::sleep(display).await;
                    status.send_replace(SaveStatus::Idle);
                }));
            }
            Err(_) => {
                self.status.send_replace(SaveStatus::Idle);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backing::MemoryStore;
    use crate::date_key::DateKey;

    fn setup() -> (Arc<MemoryStore>, Autosave) {
        let backing = Arc::new(MemoryStore::new());
        let autosave = Autosave::new(backing.clone(), AutosaveConfig::default());
        (backing, autosave)
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_write() {
        let (backing, mut autosave) = setup();
        autosave.schedule(&PlanStore::new());
        assert!(autosave.is_pending());

        assert!(autosave.cancel());
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(backing.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_writes_pending_snapshot_once() {
        let (backing, mut autosave) = setup();
        let store = PlanStore::new().add_entry(&DateKey::parse("2024-06-01").unwrap());

        autosave.schedule(&store);
        autosave.flush(&store).unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(backing.writes().len(), 1);

        // Nothing pending: flush is a no-op
        autosave.flush(&store).unwrap();
        assert_eq!(backing.writes().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_saved_status_returns_to_idle() {
        let (_backing, mut autosave) = setup();
        autosave.save_now(&PlanStore::new()).unwrap();
        assert_eq!(autosave.status(), SaveStatus::Saved);

        tokio::time::sleep(DEFAULT_SAVED_DISPLAY + Duration::from_millis(1)).await;
        assert_eq!(autosave.status(), SaveStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_save_returns_to_idle() {
        let (backing, mut autosave) = setup();
        backing.set_fail_writes(true);

        assert!(autosave.save_now(&PlanStore::new()).is_err());
        assert_eq!(autosave.status(), SaveStatus::Idle);
    }

    #[test]
    fn test_schedule_without_runtime_writes_through() {
        let (backing, mut autosave) = setup();
        autosave.schedule(&PlanStore::new());
        assert_eq!(backing.writes().len(), 1);
        assert!(!autosave.is_pending());
    }
}
