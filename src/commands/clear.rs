use anyhow::Result;
use dayplan_core::{DateKey, Planner};
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::render::{pluralize, render_day};

pub fn run(planner: &mut Planner, date: DateKey, yes: bool) -> Result<()> {
    let day = planner.day(&date);
    let count = day.entries.len();

    if !yes {
        println!("{}", render_day(&date, &day));
        println!();

        if !confirm_clear(&date, count)? {
            return Ok(());
        }
    }

    planner.clear_day(&date);
    println!(
        "Cleared {} {} from {}",
        count,
        pluralize("entry", count),
        date.to_string().bold()
    );

    Ok(())
}

/// Clearing cannot be undone, so it always asks first (default: no).
pub fn confirm_clear(date: &DateKey, count: usize) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(format!(
            "Discard all {} {} for {}? This cannot be undone",
            count,
            pluralize("entry", count),
            date
        ))
        .default(false)
        .interact()?;

    Ok(confirmed)
}
