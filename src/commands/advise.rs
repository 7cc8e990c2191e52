use anyhow::Result;
use dayplan_core::advisory::{AdvisoryClient, HttpGenerator};
use dayplan_core::config::PlanConfig;
use dayplan_core::{DateKey, DayPlan, Planner};

use crate::render::{Render, render_day};
use crate::utils::tui;

pub async fn run(planner: &Planner, config: &PlanConfig, date: DateKey) -> Result<()> {
    let day = planner.day(&date);
    println!("{}", render_day(&date, &day));
    println!();

    let text = advise(config, &date, &day).await;
    println!("{}", text);

    Ok(())
}

/// Ask the advisory service, with a spinner while waiting.
pub async fn advise(config: &PlanConfig, date: &DateKey, day: &DayPlan) -> String {
    let generator = HttpGenerator::from_config(&config.advisory);
    let client = AdvisoryClient::new(generator, config.advisory.temperature);

    tui::with_spinner(format!("Analyzing {}", date.render()), client.advise(day)).await
}
