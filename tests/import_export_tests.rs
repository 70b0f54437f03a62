use daily_schedule::{
    Category, ClockTime, DEFAULT_DOCUMENT, MarkdownFileStore, PersistenceError, Schedule,
    ScheduleStore, Task, load_or_seed, load_schedule_from_csv, load_schedule_from_json,
    load_schedule_from_markdown, save_schedule, save_schedule_to_csv, save_schedule_to_json,
    save_schedule_to_markdown,
};
use std::cell::Cell;
use std::fs;
use tempfile::{NamedTempFile, tempdir};

fn t(s: &str) -> ClockTime {
    s.parse().unwrap()
}

fn build_sample_schedule() -> Schedule {
    let mut schedule = Schedule::from_parts(
        Vec::new(),
        vec![
            Category::new("Main Tasks", "#3E847C"),
            Category::new("Sleep, mostly", "#3D505E"),
        ],
    );
    schedule
        .add_task(Task::new("Deep work", t("09:00"), t("12:00"), "Main Tasks"))
        .unwrap();
    schedule
        .add_task(
            Task::new("Sleep", t("23:00"), t("07:00"), "Sleep, mostly")
                .with_status("✅ Completed"),
        )
        .unwrap();
    schedule
}

#[test]
fn json_round_trip_preserves_ids() {
    let schedule = build_sample_schedule();
    let file = NamedTempFile::new().unwrap();

    save_schedule_to_json(&schedule, file.path()).unwrap();
    let loaded = load_schedule_from_json(file.path()).unwrap();

    assert_eq!(loaded.tasks(), schedule.tasks());
    assert_eq!(loaded.categories(), schedule.categories());
    assert_eq!(loaded.markdown(), schedule.markdown());
}

#[test]
fn json_uses_camel_case_fields() {
    let schedule = build_sample_schedule();
    let file = NamedTempFile::new().unwrap();
    save_schedule_to_json(&schedule, file.path()).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(file.path()).unwrap()).unwrap();
    let first = &raw["tasks"][0];
    assert_eq!(first["startTime"], "09:00");
    assert_eq!(first["categoryName"], "Main Tasks");
}

#[test]
fn json_with_bad_times_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        r#"{"tasks":[{"id":"a","name":"X","startTime":"25:00","endTime":"01:00","categoryName":"C","status":"s"}]}"#,
    )
    .unwrap();
    assert!(matches!(
        load_schedule_from_json(file.path()),
        Err(PersistenceError::Serialization(_))
    ));
}

#[test]
fn json_with_duplicate_ids_is_invalid() {
    let file = NamedTempFile::new().unwrap();
    let task = r#"{"id":"same","name":"X","startTime":"01:00","endTime":"02:00","categoryName":"C","status":"s"}"#;
    fs::write(file.path(), format!(r#"{{"tasks":[{task},{task}]}}"#)).unwrap();
    assert!(matches!(
        load_schedule_from_json(file.path()),
        Err(PersistenceError::InvalidData(_))
    ));
}

#[test]
fn csv_round_trip_preserves_everything() {
    let schedule = build_sample_schedule();
    let file = NamedTempFile::new().unwrap();

    save_schedule_to_csv(&schedule, file.path()).unwrap();
    let loaded = load_schedule_from_csv(file.path()).unwrap();

    assert_eq!(loaded.tasks(), schedule.tasks());
    assert_eq!(loaded.categories(), schedule.categories());
}

#[test]
fn csv_with_unknown_row_kind_is_invalid() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        "kind,id,name,start_time,end_time,category_name,status,color\nnote,,hello,,,,,\n",
    )
    .unwrap();
    assert!(matches!(
        load_schedule_from_csv(file.path()),
        Err(PersistenceError::InvalidData(_))
    ));
}

#[test]
fn markdown_export_matches_the_document() {
    let schedule = build_sample_schedule();
    let file = NamedTempFile::new().unwrap();

    save_schedule_to_markdown(&schedule, file.path()).unwrap();
    assert_eq!(fs::read_to_string(file.path()).unwrap(), schedule.markdown());

    let loaded = load_schedule_from_markdown(file.path()).unwrap();
    assert_eq!(loaded.categories(), schedule.categories());
    for (a, b) in loaded.tasks().iter().zip(schedule.tasks()) {
        assert!(a.same_content(b));
    }
}

#[test]
fn file_store_seeds_the_default_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("schedule.md");
    let store = MarkdownFileStore::new(&path);

    assert_eq!(store.load_document().unwrap(), None);
    let schedule = load_or_seed(&store).unwrap();
    assert_eq!(schedule.markdown(), DEFAULT_DOCUMENT);
    assert_eq!(schedule.tasks().len(), 6);
    assert_eq!(fs::read_to_string(&path).unwrap(), schedule.markdown());
}

#[test]
fn file_store_returns_saved_edits() {
    let dir = tempdir().unwrap();
    let store = MarkdownFileStore::new(dir.path().join("schedule.md"));

    let mut schedule = load_or_seed(&store).unwrap();
    schedule
        .add_task(Task::new("Stretch", t("07:00"), t("07:15"), "Rest / Food"))
        .unwrap();
    save_schedule(&store, &schedule).unwrap();

    let reloaded = load_or_seed(&store).unwrap();
    assert_eq!(reloaded.markdown(), schedule.markdown());
    assert_eq!(reloaded.tasks().len(), 7);
}

#[test]
fn blank_stored_document_is_reseeded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schedule.md");
    fs::write(&path, "   \n").unwrap();

    let schedule = load_or_seed(&MarkdownFileStore::new(&path)).unwrap();
    assert_eq!(schedule.tasks().len(), 6);
    assert_eq!(fs::read_to_string(&path).unwrap(), schedule.markdown());
}

#[test]
fn stray_bytes_keep_the_stored_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schedule.md");
    let original: &[u8] = b"## Categories\n- Main Tasks (#3E847C)\n\n## Tasks\n### 08:00-09:00 My precious task \xff\n- Category: Main Tasks\n- Status: \xe2\x8f\xb3 In Progress\n";
    fs::write(&path, original).unwrap();

    let schedule = load_or_seed(&MarkdownFileStore::new(&path)).unwrap();
    assert_eq!(schedule.tasks().len(), 1);
    assert!(schedule.tasks()[0].name.starts_with("My precious task"));
    assert_eq!(schedule.tasks()[0].start_time, t("08:00"));
    assert_eq!(fs::read(&path).unwrap(), original);

    let imported = load_schedule_from_markdown(&path).unwrap();
    assert_eq!(imported.tasks().len(), 1);
}

struct UnreadableStore {
    saves: Cell<usize>,
}

impl ScheduleStore for UnreadableStore {
    fn save_document(&self, _markdown: &str) -> Result<(), PersistenceError> {
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn load_document(&self) -> Result<Option<String>, PersistenceError> {
        Err(PersistenceError::InvalidData("disk on fire".into()))
    }
}

#[test]
fn failed_load_falls_back_without_writing() {
    let store = UnreadableStore { saves: Cell::new(0) };
    let schedule = load_or_seed(&store).unwrap();
    assert_eq!(schedule.markdown(), DEFAULT_DOCUMENT);
    assert_eq!(store.saves.get(), 0);
}

#[test]
fn unreadable_path_is_left_alone() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schedule.md");
    fs::create_dir(&path).unwrap();

    let schedule = load_or_seed(&MarkdownFileStore::new(&path)).unwrap();
    assert_eq!(schedule.tasks().len(), 6);
    assert!(path.is_dir());
}
