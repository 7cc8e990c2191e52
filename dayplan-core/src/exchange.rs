//! Backup export and restore of the whole plan store.
//!
//! A backup is the store serialized as pretty-printed JSON, the same text
//! that goes to the backing store. Restoring replaces the store wholesale;
//! a file that fails to parse leaves the current store untouched.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::{PlanError, PlanResult};
use crate::store::PlanStore;

pub const BACKUP_EXTENSION: &str = "json";
const BACKUP_PREFIX: &str = "dayplan-backup";

/// `dayplan-backup-2024-06-01-183000.json`
pub fn backup_filename(at: DateTime<Local>) -> String {
    format!(
        "{}-{}.{}",
        BACKUP_PREFIX,
        at.format("%Y-%m-%d-%H%M%S"),
        BACKUP_EXTENSION
    )
}

pub fn export_json(store: &PlanStore) -> PlanResult<String> {
    store.to_json_pretty()
}

/// Write a backup into `dir` and return its path. Never overwrites an
/// existing file; a second export in the same second gets a numeric suffix.
pub fn export_to_dir(store: &PlanStore, dir: &Path, at: DateTime<Local>) -> PlanResult<PathBuf> {
    let contents = export_json(store)?;

    std::fs::create_dir_all(dir)?;

    let path = unique_path(dir, &backup_filename(at))?;
    std::fs::write(&path, contents)?;

    tracing::info!(path = %path.display(), days = store.len(), "exported plans");
    Ok(path)
}

fn unique_path(dir: &Path, filename: &str) -> PlanResult<PathBuf> {
    let base = dir.join(filename);
    if !base.exists() {
        return Ok(base);
    }

    let stem = filename.trim_end_matches(&format!(".{}", BACKUP_EXTENSION));
    for n in 2..=100 {
        let candidate = dir.join(format!("{}-{}.{}", stem, n, BACKUP_EXTENSION));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(PlanError::Persist(format!(
        "Too many backups named '{}' in {}",
        filename,
        dir.display()
    )))
}

/// Parse backup text. The result is not checked beyond being a mapping.
pub fn parse_backup(text: &str) -> PlanResult<PlanStore> {
    PlanStore::from_json(text)
}

/// Read and parse a user-supplied backup file.
pub async fn read_backup(path: &Path) -> PlanResult<PlanStore> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PlanError::Load(format!("{}: {}", path.display(), e)))?;

    parse_backup(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_key::DateKey;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 1, 18, 30, 5).unwrap()
    }

    #[test]
    fn test_backup_filename_embeds_timestamp() {
        assert_eq!(backup_filename(at()), "dayplan-backup-2024-06-01-183005.json");
    }

    #[test]
    fn test_export_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlanStore::new().add_entry(&DateKey::parse("2024-06-01").unwrap());

        let first = export_to_dir(&store, dir.path(), at()).unwrap();
        let second = export_to_dir(&store, dir.path(), at()).unwrap();

        assert_ne!(first, second);
        assert!(second.to_string_lossy().ends_with("-183005-2.json"));
    }

    #[tokio::test]
    async fn test_export_then_read_backup() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlanStore::new().clear_day(&DateKey::parse("2024-06-01").unwrap());

        let path = export_to_dir(&store, dir.path(), at()).unwrap();
        let restored = read_backup(&path).await.unwrap();

        assert_eq!(restored, store);
    }

    #[tokio::test]
    async fn test_read_backup_reports_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(read_backup(&path).await, Err(PlanError::Parse(_))));
    }

    #[tokio::test]
    async fn test_read_backup_missing_file() {
        let result = read_backup(Path::new("/definitely/not/here.json")).await;
        assert!(matches!(result, Err(PlanError::Load(_))));
    }
}
