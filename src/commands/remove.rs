use anyhow::Result;
use dayplan_core::{DateKey, Planner};
use owo_colors::OwoColorize;

use super::resolve_entry;
use crate::render::render_day;

pub fn run(planner: &mut Planner, date: DateKey, entry: &str) -> Result<()> {
    let id = resolve_entry(&planner.day(&date), entry)?;

    if !planner.remove_entry(&date, &id) {
        println!("{}", "Nothing to remove".dimmed());
        return Ok(());
    }

    println!("{}", render_day(&date, &planner.day(&date)));
    Ok(())
}
