pub mod add;
pub mod advise;
pub mod clear;
pub mod edit;
pub mod export;
pub mod import;
pub mod month;
pub mod remove;
pub mod save;
pub mod set;
pub mod show;

use anyhow::Result;
use dayplan_core::{DayPlan, EntryId};

use crate::render::pluralize;

/// Find an entry by its number in `show` output (1-based) or by id.
/// A unique id prefix is enough.
pub fn resolve_entry(day: &DayPlan, reference: &str) -> Result<EntryId> {
    if let Some(entry) = day.entries.iter().find(|e| e.id.as_str() == reference) {
        return Ok(entry.id.clone());
    }

    if let Ok(n) = reference.parse::<usize>() {
        return match n.checked_sub(1).and_then(|i| day.entries.get(i)) {
            Some(entry) => Ok(entry.id.clone()),
            None => anyhow::bail!(
                "{} has {} {}; there is no entry {}",
                day.date,
                day.entries.len(),
                pluralize("entry", day.entries.len()),
                n
            ),
        };
    }

    let matches: Vec<_> = day
        .entries
        .iter()
        .filter(|e| e.id.as_str().starts_with(reference))
        .collect();

    match matches.as_slice() {
        [entry] => Ok(entry.id.clone()),
        [] => anyhow::bail!(
            "No entry '{}' on {}. Run `dayplan show {}` to list entries.",
            reference,
            day.date,
            day.date
        ),
        _ => anyhow::bail!("Entry reference '{}' is ambiguous; use more of the id", reference),
    }
}
