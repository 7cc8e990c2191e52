use anyhow::{Context, Result};
use dayplan_core::Planner;

use crate::render::Render;

pub fn run(planner: &mut Planner) -> Result<()> {
    planner.save_now().context("Failed to save plans")?;

    println!("{}", planner.save_status().render());
    Ok(())
}
