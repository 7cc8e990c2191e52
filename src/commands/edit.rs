//! Interactive editing session for one day at a time.
//!
//! Edits are autosaved in the background after a short pause, so the
//! session never has to be saved explicitly.

use anyhow::Result;
use chrono::Duration;
use dayplan_core::config::PlanConfig;
use dayplan_core::{DateKey, EntryId, FieldEdit, Outcome, Planner};
use dialoguer::{Input, Select};
use owo_colors::OwoColorize;

use super::{advise, clear};
use crate::render::{Render, render_day};

#[derive(Clone, Copy)]
enum Action {
    Edit,
    Add,
    Remove,
    Clear,
    Save,
    Prev,
    Next,
    Advise,
    Quit,
}

impl Action {
    const ALL: [Action; 9] = [
        Action::Edit,
        Action::Add,
        Action::Remove,
        Action::Clear,
        Action::Save,
        Action::Prev,
        Action::Next,
        Action::Advise,
        Action::Quit,
    ];

    fn label(&self) -> &'static str {
        match self {
            Action::Edit => "Edit an entry",
            Action::Add => "Add an entry",
            Action::Remove => "Remove an entry",
            Action::Clear => "Clear the day",
            Action::Save => "Save now",
            Action::Prev => "Previous day",
            Action::Next => "Next day",
            Action::Advise => "Get advice",
            Action::Quit => "Quit",
        }
    }
}

pub async fn run(planner: &mut Planner, config: &PlanConfig, date: DateKey) -> Result<()> {
    let mut date = date;
    let labels: Vec<_> = Action::ALL.iter().map(|a| a.label()).collect();

    loop {
        println!();
        println!("{}", render_day(&date, &planner.day(&date)));

        let status = planner.save_status().render();
        if !status.is_empty() {
            println!("   {}", status);
        } else if planner.has_unsaved_changes() {
            println!("   {}", "Unsaved changes".dimmed());
        }

        let choice = Select::new()
            .with_prompt("  What next?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[choice] {
            Action::Edit => {
                if let Some(id) = pick_entry(planner, &date)? {
                    if let Some(edit) = prompt_edit(planner, &date, &id)? {
                        planner.set_entry_field(&date, &id, &edit);
                    }
                }
            }
            Action::Add => {
                planner.add_entry(&date);
            }
            Action::Remove => {
                if let Some(id) = pick_entry(planner, &date)? {
                    planner.remove_entry(&date, &id);
                }
            }
            Action::Clear => {
                let count = planner.day(&date).entries.len();
                if clear::confirm_clear(&date, count)? {
                    planner.clear_day(&date);
                }
            }
            Action::Save => {
                if let Err(e) = planner.save_now() {
                    println!("   {}", format!("Save failed: {}", e).red());
                }
            }
            Action::Prev => date = DateKey::new(date.date() - Duration::days(1)),
            Action::Next => date = DateKey::new(date.date() + Duration::days(1)),
            Action::Advise => {
                let day = planner.day(&date);
                println!();
                println!("{}", advise::advise(config, &date, &day).await);
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

fn pick_entry(planner: &Planner, date: &DateKey) -> Result<Option<EntryId>> {
    let day = planner.day(date);

    if day.entries.len() == 1 {
        return Ok(Some(day.entries[0].id.clone()));
    }

    let items: Vec<String> = day
        .entries
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}. {}", i + 1, e.render()))
        .collect();

    let choice = Select::new()
        .with_prompt("  Which entry?")
        .items(&items)
        .default(0)
        .interact_opt()?;

    Ok(choice.map(|i| day.entries[i].id.clone()))
}

fn prompt_edit(planner: &Planner, date: &DateKey, id: &EntryId) -> Result<Option<FieldEdit>> {
    let day = planner.day(date);
    let Some(entry) = day.entry(id) else {
        return Ok(None);
    };

    let Some(field) = Select::new()
        .with_prompt("  Which field?")
        .items(&FieldEdit::FIELDS)
        .default(2)
        .interact_opt()?
    else {
        return Ok(None);
    };

    let edit = match FieldEdit::FIELDS[field] {
        "outcome" => {
            let labels: Vec<_> = Outcome::ALL.iter().map(|o| o.as_str()).collect();
            let current = Outcome::ALL
                .iter()
                .position(|o| *o == entry.outcome)
                .unwrap_or(0);

            let choice = Select::new()
                .with_prompt("  Outcome")
                .items(&labels)
                .default(current)
                .interact()?;
            FieldEdit::Outcome(Outcome::ALL[choice])
        }
        name => {
            let current = match name {
                "time" => &entry.time,
                "category" => &entry.category,
                _ => &entry.description,
            };

            let value: String = Input::new()
                .with_prompt(format!("  {}", name))
                .with_initial_text(current.clone())
                .allow_empty(true)
                .interact_text()?;
            FieldEdit::parse(name, &value)?
        }
    };

    Ok(Some(edit))
}
