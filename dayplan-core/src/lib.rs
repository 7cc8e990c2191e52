//! Core types for dayplan.
//!
//! This crate holds everything except the user interface:
//! - `store` and its model types (`entry`, `day_plan`, `date_key`)
//! - `planner`, the state cell all edits go through
//! - `autosave` and `backing` for persistence
//! - `exchange` for backup export and restore
//! - `advisory` for commentary from a text generation service

pub mod advisory;
pub mod autosave;
pub mod backing;
pub mod config;
pub mod date_key;
pub mod day_plan;
pub mod entry;
pub mod error;
pub mod exchange;
pub mod planner;
pub mod store;

pub use date_key::{DateKey, MonthKey};
pub use day_plan::{DayPlan, DayStats};
pub use entry::{Entry, EntryId, FieldEdit, Outcome};
pub use error::{PlanError, PlanResult};
pub use planner::Planner;
pub use store::{PlanStore, StoredDay};
