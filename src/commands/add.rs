use anyhow::{Context, Result};
use dayplan_core::{DateKey, FieldEdit, Planner};
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(
    planner: &mut Planner,
    date: DateKey,
    description: Option<String>,
    time: Option<String>,
    category: Option<String>,
) -> Result<()> {
    planner.add_entry(&date);

    let day = planner.day(&date);
    let entry = day
        .entries
        .last()
        .context("Day has no entries after adding one")?;
    let id = entry.id.clone();
    let number = day.entries.len();

    let edits = [
        time.map(FieldEdit::Time),
        category.map(FieldEdit::Category),
        description.map(FieldEdit::Description),
    ];
    for edit in edits.into_iter().flatten() {
        planner.set_entry_field(&date, &id, &edit);
    }

    let day = planner.day(&date);
    if let Some(entry) = day.entry(&id) {
        println!("{}", date.render());
        println!("   {} {}", format!("{}.", number).green(), entry.render());
    }

    Ok(())
}
