//! The single owned state cell holding the plan store.
//!
//! Every mutation goes through here: the pure store operation runs, the new
//! snapshot replaces the old one if anything changed, and an autosave is
//! scheduled.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;

use crate::autosave::{Autosave, AutosaveConfig, SaveStatus};
use crate::backing::{KeyValueStore, PLANS_KEY};
use crate::date_key::{DateKey, MonthKey};
use crate::day_plan::DayPlan;
use crate::entry::{EntryId, FieldEdit};
use crate::error::{PlanError, PlanResult};
use crate::exchange;
use crate::store::PlanStore;

pub struct Planner {
    store: PlanStore,
    autosave: Autosave,
}

/// Load the saved store. Anything unreadable is an error here; `Planner::open`
/// decides what to do with it.
pub fn load_store(backing: &dyn KeyValueStore) -> PlanResult<PlanStore> {
    match backing.get(PLANS_KEY)? {
        Some(text) => PlanStore::from_json(&text).map_err(|e| PlanError::Load(e.to_string())),
        None => Ok(PlanStore::new()),
    }
}

impl Planner {
    /// Open the planner on a backing store. A missing or corrupt saved store
    /// starts empty; the problem is logged, not returned.
    pub fn open(backing: Arc<dyn KeyValueStore>, config: AutosaveConfig) -> Self {
        let store = match load_store(backing.as_ref()) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("starting with an empty plan store: {}", e);
                PlanStore::new()
            }
        };

        Planner {
            store,
            autosave: Autosave::new(backing, config),
        }
    }

    pub fn store(&self) -> &PlanStore {
        &self.store
    }

    /// The plan to display for a date (never empty, never written back).
    pub fn day(&self, date: &DateKey) -> DayPlan {
        self.store.day(date)
    }

    pub fn month(&self, month: &MonthKey) -> Vec<(DateKey, &DayPlan)> {
        self.store.month(month)
    }

    pub fn save_status(&self) -> SaveStatus {
        self.autosave.status()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.autosave.is_pending()
    }

    // MUTATIONS:

    pub fn add_entry(&mut self, date: &DateKey) -> bool {
        let next = self.store.add_entry(date);
        self.commit(next)
    }

    pub fn set_entry_field(&mut self, date: &DateKey, id: &EntryId, edit: &FieldEdit) -> bool {
        let next = self.store.set_entry_field(date, id, edit);
        self.commit(next)
    }

    pub fn remove_entry(&mut self, date: &DateKey, id: &EntryId) -> bool {
        let next = self.store.remove_entry(date, id);
        self.commit(next)
    }

    /// Destructive: only call after the user has confirmed.
    pub fn clear_day(&mut self, date: &DateKey) -> bool {
        let next = self.store.clear_day(date);
        self.commit(next)
    }

    pub fn replace_store(&mut self, new_store: PlanStore) -> bool {
        let next = self.store.replace_store(new_store);
        self.commit(next)
    }

    /// Returns true if the store changed.
    fn commit(&mut self, next: PlanStore) -> bool {
        if next == self.store {
            return false;
        }
        self.store = next;
        self.autosave.schedule(&self.store);
        true
    }

    // PERSISTENCE:

    /// Manual save, bypassing the debounce.
    pub fn save_now(&mut self) -> PlanResult<()> {
        self.autosave.save_now(&self.store)
    }

    /// Write any pending autosave immediately.
    pub fn flush(&mut self) -> PlanResult<()> {
        self.autosave.flush(&self.store)
    }

    // IMPORT / EXPORT:

    /// Replace the whole store with a backup file. On failure the current
    /// store is left exactly as it was.
    pub async fn import_file(&mut self, path: &Path) -> PlanResult<usize> {
        let imported = exchange::read_backup(path).await?;
        let days = imported.len();

        self.replace_store(imported);
        tracing::info!(path = %path.display(), days, "imported plans");

        Ok(days)
    }

    pub fn export_to(&self, dir: &Path) -> PlanResult<PathBuf> {
        exchange::export_to_dir(&self.store, dir, Local::now())
    }
}
