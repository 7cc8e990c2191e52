//! The plan store: every day plan, keyed by date.
//!
//! All operations are pure. They take `&self` and return a new `PlanStore`,
//! so callers can compare snapshots to detect changes. A date with nothing
//! stored reads as a placeholder day, but the placeholder is never written
//! back unless an edit actually lands on it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::date_key::{DateKey, MonthKey};
use crate::day_plan::DayPlan;
use crate::entry::{Entry, EntryId, FieldEdit};
use crate::error::{PlanError, PlanResult};

/// A stored day value. Anything that does not decode as a day plan is kept
/// as-is so that a restore followed by a backup loses nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredDay {
    Plan(DayPlan),
    Opaque(Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanStore {
    days: BTreeMap<String, StoredDay>,
}

impl PlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a store from any parsed value. The only requirement is that it
    /// is a mapping; the shape of each day is not validated.
    pub fn from_value(value: Value) -> PlanResult<Self> {
        if !value.is_object() {
            return Err(PlanError::Parse(
                "expected an object mapping dates to day plans".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| PlanError::Parse(e.to_string()))
    }

    pub fn from_json(text: &str) -> PlanResult<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| PlanError::Parse(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn to_json_pretty(&self) -> PlanResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PlanError::Parse(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn contains(&self, date: &DateKey) -> bool {
        self.days.contains_key(&date.to_string())
    }

    /// The stored plan for a date, without any fallback.
    pub fn stored(&self, date: &DateKey) -> Option<&DayPlan> {
        match self.days.get(&date.to_string()) {
            Some(StoredDay::Plan(plan)) => Some(plan),
            _ => None,
        }
    }

    pub fn raw(&self, key: &str) -> Option<&StoredDay> {
        self.days.get(key)
    }

    /// Stored days that decoded as plans, in date order. Keys that are not
    /// valid dates are skipped.
    pub fn plans(&self) -> impl Iterator<Item = (DateKey, &DayPlan)> {
        self.days.iter().filter_map(|(key, day)| match day {
            StoredDay::Plan(plan) => DateKey::parse(key).ok().map(|date| (date, plan)),
            StoredDay::Opaque(_) => None,
        })
    }

    /// Stored plans that fall within one calendar month.
    pub fn month(&self, month: &MonthKey) -> Vec<(DateKey, &DayPlan)> {
        self.plans()
            .filter(|(date, _)| month.contains(date))
            .collect()
    }

    // READS:

    /// The plan to display for a date. Always has at least one entry. Never
    /// writes anything back.
    pub fn day(&self, date: &DateKey) -> DayPlan {
        match self.stored(date) {
            Some(plan) if !plan.entries.is_empty() => DayPlan {
                date: date.to_string(),
                ..plan.clone()
            },
            Some(plan) => DayPlan {
                date: date.to_string(),
                entries: DayPlan::placeholder(date).entries,
                extra: plan.extra.clone(),
            },
            None => DayPlan::placeholder(date),
        }
    }

    // WRITES:

    /// Replace one field of one entry. Unknown ids leave the store unchanged.
    pub fn set_entry_field(&self, date: &DateKey, id: &EntryId, edit: &FieldEdit) -> PlanStore {
        let mut plan = self.day(date);

        let Some(entry) = plan.entries.iter_mut().find(|e| &e.id == id) else {
            return self.clone();
        };
        *entry = entry.with_edit(edit);

        self.with_day(date, plan)
    }

    /// Append a blank entry. A date with nothing stored ends up with exactly
    /// that one entry.
    pub fn add_entry(&self, date: &DateKey) -> PlanStore {
        let mut plan = self
            .stored(date)
            .cloned()
            .unwrap_or_else(|| DayPlan::empty(date));
        plan.entries.push(Entry::blank());

        self.with_day(date, plan)
    }

    /// Remove an entry. Removing the last one leaves a single fresh blank
    /// entry in its place. On a stored day with no entries, only the
    /// placeholder shown by [`PlanStore::day`] can be removed.
    pub fn remove_entry(&self, date: &DateKey, id: &EntryId) -> PlanStore {
        let Some(stored) = self.stored(date) else {
            return self.clone();
        };

        let known = if stored.entries.is_empty() {
            *id == EntryId::placeholder(date)
        } else {
            stored.entries.iter().any(|e| &e.id == id)
        };
        if !known {
            return self.clone();
        }

        let mut plan = stored.clone();
        plan.entries.retain(|e| &e.id != id);

        if plan.entries.is_empty() {
            plan.entries.push(Entry::blank());
        }

        self.with_day(date, plan)
    }

    /// Discard every entry of a date, leaving one blank entry. Irreversible;
    /// callers confirm with the user first.
    pub fn clear_day(&self, date: &DateKey) -> PlanStore {
        self.with_day(date, DayPlan::blank(date))
    }

    /// Wholesale replacement, as done by import.
    pub fn replace_store(&self, new_store: PlanStore) -> PlanStore {
        new_store
    }

    fn with_day(&self, date: &DateKey, mut plan: DayPlan) -> PlanStore {
        plan.date = date.to_string();

        let mut days = self.days.clone();
        days.insert(date.to_string(), StoredDay::Plan(plan));
        PlanStore { days }
    }
}
