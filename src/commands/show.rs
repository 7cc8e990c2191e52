use anyhow::Result;
use dayplan_core::{DateKey, Planner};

use crate::render::render_day;

pub fn run(planner: &Planner, date: DateKey, json: bool) -> Result<()> {
    let day = planner.day(&date);

    if json {
        println!("{}", serde_json::to_string_pretty(&day)?);
        return Ok(());
    }

    println!("{}", render_day(&date, &day));
    Ok(())
}
