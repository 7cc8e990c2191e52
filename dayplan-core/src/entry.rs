//! A single planned event for one day.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::date_key::DateKey;
use crate::error::{PlanError, PlanResult};

/// Opaque entry identifier. Generated once, never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn generate() -> Self {
        EntryId(uuid::Uuid::new_v4().to_string())
    }

    /// Id of the read-time placeholder shown for a day with no stored entries.
    /// Stable per date so an edit made against the placeholder can find it.
    pub fn placeholder(date: &DateKey) -> Self {
        EntryId(format!("draft-{}", date))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        EntryId(s.to_string())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Pending,
    #[serde(alias = "won", alias = "win")]
    Positive,
    #[serde(alias = "lost", alias = "loss")]
    Negative,
    #[serde(alias = "void")]
    Voided,
}

impl Outcome {
    pub const ALL: [Outcome; 4] = [
        Outcome::Pending,
        Outcome::Positive,
        Outcome::Negative,
        Outcome::Voided,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Pending => "pending",
            Outcome::Positive => "positive",
            Outcome::Negative => "negative",
            Outcome::Voided => "voided",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Outcome::Pending),
            "positive" | "won" | "win" => Ok(Outcome::Positive),
            "negative" | "lost" | "loss" => Ok(Outcome::Negative),
            "voided" | "void" => Ok(Outcome::Voided),
            other => Err(PlanError::InvalidField(format!(
                "unknown outcome '{}' (expected pending, positive, negative or voided)",
                other
            ))),
        }
    }
}

/// One planned event.
///
/// Decoding is lenient so that hand-edited or older backups still load:
/// missing fields default to empty, scalar values are accepted as text and
/// unknown fields are kept in `extra` so they survive a re-export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default = "EntryId::generate", deserialize_with = "lenient_id")]
    pub id: EntryId,

    #[serde(default, deserialize_with = "lenient_text")]
    pub time: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub category: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,

    #[serde(default, deserialize_with = "lenient_outcome")]
    pub outcome: Outcome,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entry {
    /// A blank entry with a freshly generated id.
    pub fn blank() -> Self {
        Self::with_id(EntryId::generate())
    }

    pub(crate) fn placeholder(date: &DateKey) -> Self {
        Self::with_id(EntryId::placeholder(date))
    }

    fn with_id(id: EntryId) -> Self {
        Entry {
            id,
            time: String::new(),
            category: String::new(),
            description: String::new(),
            outcome: Outcome::Pending,
            extra: Map::new(),
        }
    }

    /// Only entries with a description count as planned events. Any
    /// non-empty text counts, whitespace included.
    pub fn is_active(&self) -> bool {
        !self.description.is_empty()
    }

    /// Returns a copy of this entry with one field replaced.
    pub fn with_edit(&self, edit: &FieldEdit) -> Entry {
        let mut entry = self.clone();
        match edit {
            FieldEdit::Time(v) => entry.time = v.clone(),
            FieldEdit::Category(v) => entry.category = v.clone(),
            FieldEdit::Description(v) => entry.description = v.clone(),
            FieldEdit::Outcome(v) => entry.outcome = *v,
        }
        entry
    }
}

/// A single-field edit: which field, and its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Time(String),
    Category(String),
    Description(String),
    Outcome(Outcome),
}

impl FieldEdit {
    pub const FIELDS: [&'static str; 4] = ["time", "category", "description", "outcome"];

    /// Build an edit from a field name and a textual value.
    pub fn parse(field: &str, value: &str) -> PlanResult<Self> {
        match field {
            "time" => Ok(FieldEdit::Time(value.to_string())),
            "category" => Ok(FieldEdit::Category(value.to_string())),
            "description" => Ok(FieldEdit::Description(value.to_string())),
            "outcome" => Ok(FieldEdit::Outcome(value.parse()?)),
            other => Err(PlanError::InvalidField(format!(
                "unknown field '{}' (expected one of: {})",
                other,
                Self::FIELDS.join(", ")
            ))),
        }
    }

}

fn scalar_to_text<E: serde::de::Error>(value: Value) -> Result<String, E> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(E::custom(format!("expected text, found {}", other))),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    scalar_to_text(Value::deserialize(deserializer)?)
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<EntryId, D::Error> {
    let id = scalar_to_text(Value::deserialize(deserializer)?)?;
    if id.is_empty() {
        Ok(EntryId::generate())
    } else {
        Ok(EntryId(id))
    }
}

fn lenient_outcome<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Outcome, D::Error> {
    Ok(Option::<Outcome>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_entries_get_distinct_ids() {
        let a = Entry::blank();
        let b = Entry::blank();
        assert_ne!(a.id, b.id);
        assert_eq!(a.outcome, Outcome::Pending);
        assert!(!a.is_active());
    }

    #[test]
    fn test_with_edit_leaves_original_untouched() {
        let entry = Entry::blank();
        let edited = entry.with_edit(&FieldEdit::Description("Team A vs Team B".into()));

        assert_eq!(edited.description, "Team A vs Team B");
        assert_eq!(edited.id, entry.id);
        assert!(entry.description.is_empty());
    }

    #[test]
    fn test_whitespace_description_is_active() {
        let entry = Entry::blank().with_edit(&FieldEdit::Description("   ".into()));
        assert!(entry.is_active());

        let cleared = entry.with_edit(&FieldEdit::Description(String::new()));
        assert!(!cleared.is_active());
    }

    #[test]
    fn test_field_edit_parse() {
        assert_eq!(
            FieldEdit::parse("time", "18:00").unwrap(),
            FieldEdit::Time("18:00".into())
        );
        assert_eq!(
            FieldEdit::parse("outcome", "Won").unwrap(),
            FieldEdit::Outcome(Outcome::Positive)
        );
        assert!(FieldEdit::parse("outcome", "maybe").is_err());
        assert!(FieldEdit::parse("colour", "red").is_err());
    }

    #[test]
    fn test_lenient_decode_of_sparse_entry() {
        let entry: Entry = serde_json::from_value(json!({
            "id": 1717200000000u64,
            "description": "Team A vs Team B",
            "outcome": "won",
            "stake": 10
        }))
        .unwrap();

        assert_eq!(entry.id.as_str(), "1717200000000");
        assert_eq!(entry.time, "");
        assert_eq!(entry.outcome, Outcome::Positive);
        assert_eq!(entry.extra.get("stake"), Some(&json!(10)));
    }

    #[test]
    fn test_missing_id_is_generated() {
        let entry: Entry = serde_json::from_value(json!({ "time": "18:00" })).unwrap();
        assert!(!entry.id.as_str().is_empty());
    }

    #[test]
    fn test_outcome_serializes_lowercase() {
        let value = serde_json::to_value(Outcome::Voided).unwrap();
        assert_eq!(value, json!("voided"));
    }
}
