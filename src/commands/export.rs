use std::path::Path;

use anyhow::{Context, Result};
use dayplan_core::Planner;
use owo_colors::OwoColorize;

use crate::render::pluralize;

pub fn run(planner: &Planner, dir: &Path) -> Result<()> {
    let path = planner
        .export_to(dir)
        .with_context(|| format!("Failed to export plans to {}", dir.display()))?;

    let days = planner.store().len();
    println!(
        "Exported {} {} to {}",
        days,
        pluralize("day", days),
        path.display().to_string().green()
    );

    Ok(())
}
