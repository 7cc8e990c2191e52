//! Integration tests for the planner: autosave timing, manual save, startup
//! load and backup restore.

use std::sync::Arc;
use std::time::Duration;

use dayplan_core::autosave::{AutosaveConfig, SaveStatus};
use dayplan_core::backing::{FileStore, KeyValueStore, MemoryStore, PLANS_KEY};
use dayplan_core::{DateKey, FieldEdit, Outcome, PlanError, PlanStore, Planner};

fn june_first() -> DateKey {
    DateKey::parse("2024-06-01").unwrap()
}

fn open(backing: &Arc<MemoryStore>) -> Planner {
    Planner::open(backing.clone(), AutosaveConfig::default())
}

#[tokio::test(start_paused = true)]
async fn test_debounce_writes_once_with_latest_state() {
    let backing = Arc::new(MemoryStore::new());
    let mut planner = open(&backing);
    let date = june_first();

    // t = 0ms
    assert!(planner.add_entry(&date));
    tokio::time::sleep(Duration::from_millis(100)).await;

    // t = 100ms
    let id = planner.day(&date).entries[0].id.clone();
    assert!(planner.set_entry_field(&date, &id, &FieldEdit::Description("latest".into())));

    // t = 599ms: the first timer was superseded, the second has not fired
    tokio::time::sleep(Duration::from_millis(499)).await;
    assert!(backing.writes().is_empty());
    assert!(planner.has_unsaved_changes());

    // t = 601ms
    tokio::time::sleep(Duration::from_millis(2)).await;
    let writes = backing.writes();
    assert_eq!(writes.len(), 1);

    let saved = PlanStore::from_json(&writes[0]).unwrap();
    assert_eq!(saved.stored(&date).unwrap().entries[0].description, "latest");
    assert_eq!(&saved, planner.store());
}

#[tokio::test(start_paused = true)]
async fn test_noop_mutation_schedules_nothing() {
    let backing = Arc::new(MemoryStore::new());
    let mut planner = open(&backing);
    let date = june_first();

    let changed = planner.set_entry_field(
        &date,
        &"missing".into(),
        &FieldEdit::Time("18:00".into()),
    );
    assert!(!changed);
    assert!(!planner.has_unsaved_changes());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(backing.writes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_manual_save_twice_is_byte_identical() {
    let backing = Arc::new(MemoryStore::new());
    let mut planner = open(&backing);
    let date = june_first();

    planner.add_entry(&date);
    let id = planner.day(&date).entries[0].id.clone();
    planner.set_entry_field(&date, &id, &FieldEdit::Outcome(Outcome::Positive));

    planner.save_now().unwrap();
    planner.save_now().unwrap();

    let writes = backing.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0], writes[1]);
    assert_eq!(planner.save_status(), SaveStatus::Saved);

    // The manual save superseded the pending autosave
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(backing.writes().len(), 2);
    assert_eq!(planner.save_status(), SaveStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_failed_persist_keeps_memory_state() {
    let backing = Arc::new(MemoryStore::new());
    let mut planner = open(&backing);
    let date = june_first();
    backing.set_fail_writes(true);

    planner.add_entry(&date);
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(backing.writes().is_empty());
    assert!(planner.store().contains(&date));

    let result = planner.save_now();
    assert!(matches!(result, Err(PlanError::Persist(_))));
    assert_eq!(planner.save_status(), SaveStatus::Idle);
    assert!(planner.store().contains(&date));

    backing.set_fail_writes(false);
    planner.add_entry(&date);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(backing.writes().len(), 1);
}

#[test]
fn test_corrupt_saved_store_starts_empty() {
    let backing = Arc::new(MemoryStore::with_value(PLANS_KEY, "{ this is not json"));
    let planner = open(&backing);

    assert!(planner.store().is_empty());
}

#[test]
fn test_saved_store_is_loaded_at_open() {
    let date = june_first();
    let saved = PlanStore::new().clear_day(&date);
    let backing = Arc::new(MemoryStore::with_value(
        PLANS_KEY,
        &saved.to_json_pretty().unwrap(),
    ));

    let planner = open(&backing);
    assert_eq!(planner.store(), &saved);
}

#[tokio::test]
async fn test_flush_persists_to_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let backing: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()));
    let date = june_first();

    let mut planner = Planner::open(backing.clone(), AutosaveConfig::default());
    planner.add_entry(&date);
    planner.flush().unwrap();

    let reopened = Planner::open(backing, AutosaveConfig::default());
    assert_eq!(reopened.store(), planner.store());
}

#[tokio::test]
async fn test_import_replaces_store_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backup.json");
    std::fs::write(
        &path,
        r#"{"2024-06-01": {"date":"2024-06-01","games":[]}}"#,
    )
    .unwrap();

    let backing = Arc::new(MemoryStore::new());
    let mut planner = open(&backing);
    let other = DateKey::parse("2024-05-31").unwrap();
    planner.add_entry(&other);

    let days = planner.import_file(&path).await.unwrap();

    assert_eq!(days, 1);
    assert!(!planner.store().contains(&other));

    // Display still shows one entry, but nothing was written back
    let date = june_first();
    assert_eq!(planner.day(&date).entries.len(), 1);
    assert!(planner.store().stored(&date).unwrap().entries.is_empty());

    let id = planner.day(&date).entries[0].id.clone();
    planner.set_entry_field(&date, &id, &FieldEdit::Description("Team A vs Team B".into()));
    assert_eq!(planner.store().stored(&date).unwrap().entries.len(), 1);
}

#[tokio::test]
async fn test_failed_import_leaves_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "[\"not\", \"a\", \"mapping\"]").unwrap();

    let backing = Arc::new(MemoryStore::new());
    let mut planner = open(&backing);
    planner.add_entry(&june_first());
    let before = planner.store().clone();

    let result = planner.import_file(&path).await;

    assert!(matches!(result, Err(PlanError::Parse(_))));
    assert_eq!(planner.store(), &before);
}

#[tokio::test]
async fn test_export_then_import_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let backing = Arc::new(MemoryStore::new());
    let mut planner = open(&backing);
    let date = june_first();

    planner.add_entry(&date);
    planner.add_entry(&date);
    let ids: Vec<_> = planner.day(&date).entries.iter().map(|e| e.id.clone()).collect();
    planner.set_entry_field(&date, &ids[0], &FieldEdit::Category("Football".into()));
    planner.set_entry_field(&date, &ids[1], &FieldEdit::Outcome(Outcome::Voided));
    let expected = planner.store().clone();

    let path = planner.export_to(dir.path()).unwrap();

    let mut fresh = open(&Arc::new(MemoryStore::new()));
    fresh.import_file(&path).await.unwrap();
    assert_eq!(fresh.store(), &expected);
}
