//! The ordered entries of one calendar date.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::date_key::DateKey;
use crate::entry::{Entry, EntryId, Outcome};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// Embedded copy of the store key. Re-stamped from the key on every write.
    #[serde(default)]
    pub date: String,

    /// Insertion order is display order.
    #[serde(rename = "games", default)]
    pub entries: Vec<Entry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Tally of active entries by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayStats {
    pub pending: usize,
    pub positive: usize,
    pub negative: usize,
    pub voided: usize,
}

impl DayStats {
    pub fn total(&self) -> usize {
        self.pending + self.positive + self.negative + self.voided
    }
}

impl DayPlan {
    /// A day with no entries at all. Only used as the base for a write that
    /// is about to add one.
    pub(crate) fn empty(date: &DateKey) -> Self {
        DayPlan {
            date: date.to_string(),
            entries: Vec::new(),
            extra: Map::new(),
        }
    }

    /// A day holding a single fresh blank entry.
    pub fn blank(date: &DateKey) -> Self {
        DayPlan {
            entries: vec![Entry::blank()],
            ..Self::empty(date)
        }
    }

    /// The read-time fallback for a day with nothing stored.
    pub(crate) fn placeholder(date: &DateKey) -> Self {
        DayPlan {
            entries: vec![Entry::placeholder(date)],
            ..Self::empty(date)
        }
    }

    pub fn entry(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn active_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.is_active())
    }

    pub fn has_active_entries(&self) -> bool {
        self.active_entries().next().is_some()
    }

    pub fn stats(&self) -> DayStats {
        let mut stats = DayStats::default();
        for entry in self.active_entries() {
            match entry.outcome {
                Outcome::Pending => stats.pending += 1,
                Outcome::Positive => stats.positive += 1,
                Outcome::Negative => stats.negative += 1,
                Outcome::Voided => stats.voided += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::FieldEdit;
    use serde_json::json;

    fn date() -> DateKey {
        DateKey::parse("2024-06-01").unwrap()
    }

    #[test]
    fn test_blank_day_has_one_blank_entry() {
        let day = DayPlan::blank(&date());
        assert_eq!(day.date, "2024-06-01");
        assert_eq!(day.entries.len(), 1);
        assert!(!day.has_active_entries());
    }

    #[test]
    fn test_stats_only_count_active_entries() {
        let mut day = DayPlan::blank(&date());
        day.entries.push(
            Entry::blank()
                .with_edit(&FieldEdit::Description("A vs B".into()))
                .with_edit(&FieldEdit::Outcome(Outcome::Positive)),
        );
        day.entries.push(Entry::blank().with_edit(&FieldEdit::Description("C vs D".into())));
        day.entries.push(Entry::blank().with_edit(&FieldEdit::Outcome(Outcome::Negative)));

        let stats = day.stats();
        assert_eq!(stats.positive, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.negative, 0);
        assert_eq!(stats.total(), 2);
    }

    #[test]
    fn test_stored_format_uses_games_key() {
        let day = DayPlan::blank(&date());
        let value = serde_json::to_value(&day).unwrap();
        assert_eq!(value["date"], json!("2024-06-01"));
        assert_eq!(value["games"].as_array().map(|g| g.len()), Some(1));
    }

    #[test]
    fn test_decode_empty_games() {
        let day: DayPlan =
            serde_json::from_value(json!({ "date": "2024-06-01", "games": [] })).unwrap();
        assert!(day.entries.is_empty());
    }
}
