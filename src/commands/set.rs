use anyhow::Result;
use dayplan_core::{DateKey, FieldEdit, Planner};
use owo_colors::OwoColorize;

use super::resolve_entry;
use crate::render::Render;

pub fn run(planner: &mut Planner, date: DateKey, entry: &str, field: &str, value: &str) -> Result<()> {
    let id = resolve_entry(&planner.day(&date), entry)?;
    let edit = FieldEdit::parse(field, value)?;

    if !planner.set_entry_field(&date, &id, &edit) {
        println!("{}", "No change".dimmed());
        return Ok(());
    }

    if let Some(updated) = planner.day(&date).entry(&id) {
        println!("{}", date.render());
        println!("   {} {}", "~".yellow(), updated.render());
    }

    Ok(())
}
