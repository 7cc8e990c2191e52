use anyhow::Result;
use dayplan_core::{MonthKey, Planner};

use crate::render::render_month;

pub fn run(planner: &Planner, month: MonthKey) -> Result<()> {
    println!("{}", render_month(&month, &planner.month(&month)));
    Ok(())
}
