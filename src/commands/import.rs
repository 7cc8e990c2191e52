use std::path::Path;

use anyhow::{Context, Result};
use dayplan_core::Planner;
use owo_colors::OwoColorize;

use crate::render::pluralize;

/// Restores a backup. This replaces every saved plan and does not ask first.
pub async fn run(planner: &mut Planner, file: &Path) -> Result<()> {
    let days = planner.import_file(file).await.with_context(|| {
        format!(
            "Could not import {}. Your plans were left unchanged",
            file.display()
        )
    })?;

    println!(
        "Imported {} {} from {}",
        days,
        pluralize("day", days),
        file.display().to_string().green()
    );

    Ok(())
}
