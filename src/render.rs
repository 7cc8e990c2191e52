//! Terminal rendering for dayplan types.
//!
//! Extension traits that add colored output to dayplan-core types using
//! owo_colors.

use dayplan_core::autosave::SaveStatus;
use dayplan_core::{DateKey, DayPlan, DayStats, Entry, MonthKey, Outcome};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Outcome {
    fn render(&self) -> String {
        match self {
            Outcome::Pending => "· pending".dimmed().to_string(),
            Outcome::Positive => "✓ positive".green().to_string(),
            Outcome::Negative => "✗ negative".red().to_string(),
            Outcome::Voided => "∅ voided".yellow().to_string(),
        }
    }
}

impl Render for DateKey {
    fn render(&self) -> String {
        format!("📅 {} {}", self, self.date().format("(%a)").dimmed())
    }
}

impl Render for Entry {
    fn render(&self) -> String {
        if !self.is_active() && self.time.is_empty() && self.category.is_empty() {
            return "(blank)".dimmed().to_string();
        }

        let time = if self.time.is_empty() { "--:--" } else { self.time.as_str() };
        let mut parts = vec![time.bold().to_string()];

        if !self.category.is_empty() {
            parts.push(format!("[{}]", self.category).cyan().to_string());
        }

        if self.is_active() {
            parts.push(self.description.clone());
        } else {
            parts.push("(no description)".dimmed().to_string());
        }

        parts.push(self.outcome.render());
        parts.join("  ")
    }
}

impl Render for DayStats {
    fn render(&self) -> String {
        let mut parts = Vec::new();
        if self.positive > 0 {
            parts.push(format!("✓{}", self.positive).green().to_string());
        }
        if self.negative > 0 {
            parts.push(format!("✗{}", self.negative).red().to_string());
        }
        if self.voided > 0 {
            parts.push(format!("∅{}", self.voided).yellow().to_string());
        }
        if self.pending > 0 {
            parts.push(format!("·{}", self.pending).dimmed().to_string());
        }
        parts.join(" ")
    }
}

impl Render for SaveStatus {
    fn render(&self) -> String {
        match self {
            SaveStatus::Idle => String::new(),
            SaveStatus::Saving => "Saving...".dimmed().to_string(),
            SaveStatus::Saved => "Saved".green().to_string(),
        }
    }
}

/// Render one day: a header and a numbered entry list.
pub fn render_day(date: &DateKey, day: &DayPlan) -> String {
    let mut lines = vec![date.render()];

    for (i, entry) in day.entries.iter().enumerate() {
        lines.push(format!("   {} {}", format!("{}.", i + 1).dimmed(), entry.render()));
    }

    let stats = day.stats();
    if stats.total() > 0 {
        lines.push(format!(
            "   {} {}",
            format!("{} planned", stats.total()).dimmed(),
            stats.render()
        ));
    }

    lines.join("\n")
}

/// Render a month overview listing only days that have planned entries.
pub fn render_month(month: &MonthKey, plans: &[(DateKey, &DayPlan)]) -> String {
    let title = month.first_day().date().format("%B %Y").to_string();
    let mut lines = vec![format!("📅 {}", title.bold())];

    let active: Vec<_> = plans
        .iter()
        .filter(|(_, day)| day.has_active_entries())
        .collect();

    if active.is_empty() {
        lines.push("   Nothing planned".dimmed().to_string());
        return lines.join("\n");
    }

    for (date, day) in active {
        let stats = day.stats();
        lines.push(format!(
            "   {}  {} {}  {}",
            date.date().format("%a %d").to_string().bold(),
            stats.total(),
            pluralize("entry", stats.total()),
            stats.render()
        ));
    }

    lines.join("\n")
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> &str {
    if count == 1 {
        word
    } else {
        match word {
            "entry" => "entries",
            "day" => "days",
            _ => word,
        }
    }
}
