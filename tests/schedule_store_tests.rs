use daily_schedule::{
    Category, ClockTime, DEFAULT_DOCUMENT, STATUS_COMPLETED, Schedule, ScheduleError, Task,
    TaskEdit, TaskId, format_duration,
};

fn t(s: &str) -> ClockTime {
    s.parse().unwrap()
}

fn find_by_name<'a>(schedule: &'a Schedule, name: &str) -> &'a Task {
    schedule
        .tasks()
        .iter()
        .find(|task| task.name == name)
        .unwrap_or_else(|| panic!("task {name} missing"))
}

#[test]
fn default_schedule_keeps_the_seed_document() {
    let schedule = Schedule::new();
    assert_eq!(schedule.tasks().len(), 6);
    assert_eq!(schedule.categories().len(), 5);
    assert_eq!(schedule.markdown(), DEFAULT_DOCUMENT);
    assert_eq!(schedule.category_color("Sleep"), Some("#3D505E"));
    assert_eq!(schedule.overlaps().conflict_count, 0);
}

#[test]
fn adding_a_task_sorts_and_regenerates() {
    let mut schedule = Schedule::new();
    let id = schedule
        .add_task(Task::new("Reading", t("08:00"), t("08:45"), "Spiritual Development"))
        .unwrap();

    let names: Vec<&str> = schedule.tasks().iter().map(|task| task.name.as_str()).collect();
    assert_eq!(names[0], "Morning Routine");
    assert_eq!(names[1], "Reading");
    assert!(schedule
        .markdown()
        .contains("### 08:00-08:45 Reading\n- Category: Spiritual Development"));
    assert_eq!(schedule.find_task(&id).map(|task| task.name.as_str()), Some("Reading"));
}

#[test]
fn ids_survive_unrelated_edits() {
    let mut schedule = Schedule::new();
    let lunch_id = find_by_name(&schedule, "Lunch").id.clone();

    schedule
        .add_task(Task::new("Walk", t("13:00"), t("13:30"), "Rest / Food"))
        .unwrap();
    let sleep = find_by_name(&schedule, "Sleep").id.clone();
    assert!(schedule.delete_task(&sleep));

    assert_eq!(schedule.find_task(&lunch_id).map(|task| task.name.as_str()), Some("Lunch"));
}

#[test]
fn duplicate_and_invalid_tasks_are_rejected() {
    let mut schedule = Schedule::new();
    let existing = schedule.tasks()[0].clone();
    assert_eq!(
        schedule.add_task(existing.clone()),
        Err(ScheduleError::DuplicateTask(existing.id.clone()))
    );

    let blank = Task::new("  ", t("10:00"), t("11:00"), "Main Tasks");
    assert!(matches!(schedule.add_task(blank), Err(ScheduleError::Invalid(_))));

    let injected = Task::new("Nap\n## Tasks", t("10:00"), t("11:00"), "Main Tasks");
    assert!(matches!(schedule.add_task(injected), Err(ScheduleError::Invalid(_))));
    assert_eq!(schedule.tasks().len(), 6);
}

#[test]
fn updating_changes_fields_in_place() {
    let mut schedule = Schedule::new();
    let lunch = find_by_name(&schedule, "Lunch").clone();
    schedule
        .update_task(lunch.clone().with_status(STATUS_COMPLETED))
        .unwrap();

    let updated = schedule.find_task(&lunch.id).unwrap();
    assert!(updated.is_completed());
    assert!(schedule
        .markdown()
        .contains("### 12:30-13:00 Lunch\n- Category: Rest / Food\n- Status: ✅ Completed"));

    let ghost = Task::new("Ghost", t("01:00"), t("02:00"), "Sleep");
    assert_eq!(
        schedule.update_task(ghost.clone()),
        Err(ScheduleError::TaskNotFound(ghost.id))
    );
}

#[test]
fn moving_a_task_keeps_the_list_in_start_order() {
    let mut schedule = Schedule::new();
    let mut lunch = find_by_name(&schedule, "Lunch").clone();
    lunch.start_time = t("05:00");
    lunch.end_time = t("05:30");
    schedule.update_task(lunch.clone()).unwrap();

    assert_eq!(schedule.tasks()[0].id, lunch.id);
    let starts: Vec<u32> = schedule
        .tasks()
        .iter()
        .map(|task| task.start_time.sort_key())
        .collect();
    assert!(starts.windows(2).all(|pair| pair[0] <= pair[1]));

    let reloaded = Schedule::from_markdown(schedule.markdown());
    assert_eq!(reloaded.tasks()[0].name, "Lunch");
    assert_eq!(reloaded.tasks()[1].name, "Morning Routine");
}

#[test]
fn edits_remove_deleted_tasks_from_the_document() {
    let mut schedule = Schedule::new();
    let lunch_id = find_by_name(&schedule, "Lunch").id.clone();

    schedule.apply_edit(TaskEdit::Delete(lunch_id.clone())).unwrap();
    assert!(schedule.find_task(&lunch_id).is_none());
    assert!(!schedule.markdown().contains("Lunch"));

    assert_eq!(
        schedule.apply_edit(TaskEdit::Delete(lunch_id.clone())),
        Err(ScheduleError::TaskNotFound(lunch_id))
    );
    assert!(!schedule.delete_task(&TaskId::new("missing")));
}

#[test]
fn strict_import_keeps_state_on_damaged_documents() {
    let mut schedule = Schedule::new();
    let before = schedule.clone();

    let result = schedule.try_import_markdown("## Tasks\n### 10:00-11:00 Orphan\n");
    match result {
        Err(ScheduleError::Repaired(diagnostics)) => assert_eq!(diagnostics.len(), 1),
        other => panic!("expected repaired error, got {other:?}"),
    }
    assert_eq!(schedule, before);

    let clean = "## Categories\n- Work (#3E847C)\n\n## Tasks\n### 10:00-11:00 Focus\n- Category: Work\n- Status: ⏳ In Progress";
    schedule.try_import_markdown(clean).unwrap();
    assert_eq!(schedule.tasks().len(), 1);
    assert_eq!(schedule.markdown(), clean);
}

#[test]
fn lossy_import_repairs_and_replaces() {
    let mut schedule = Schedule::new();
    schedule.import_markdown("## Tasks\n### 10:00-11:00 Orphan\n");
    assert_eq!(schedule.tasks().len(), 1);
    assert_eq!(schedule.tasks()[0].category_name, "Uncategorized");
    assert!(schedule.categories().is_empty());
}

#[test]
fn categories_can_be_recolored_added_and_removed() {
    let mut schedule = Schedule::new();

    schedule
        .upsert_category(Category::new("Sleep", "#000000"))
        .unwrap();
    schedule
        .upsert_category(Category::new("Exercise", "#00AA00"))
        .unwrap();
    assert_eq!(schedule.category_color("Sleep"), Some("#000000"));
    assert_eq!(schedule.categories().len(), 6);
    assert!(schedule.markdown().contains("- Exercise (#00AA00)"));

    assert!(schedule.remove_category("Planning"));
    assert!(!schedule.remove_category("Planning"));
    // Tasks keep pointing at the removed category.
    assert_eq!(find_by_name(&schedule, "Evening Planning").category_name, "Planning");

    assert!(matches!(
        schedule.upsert_category(Category::new("Bad", "red")),
        Err(ScheduleError::Invalid(_))
    ));
    assert!(matches!(
        schedule.set_categories(vec![Category::new("Hash#tag", "#123456")]),
        Err(ScheduleError::Invalid(_))
    ));
}

#[test]
fn from_parts_renders_a_parseable_document() {
    let tasks = vec![Task::new("Focus", t("09:00"), t("10:00"), "Work")];
    let categories = vec![Category::new("Work", "#3E847C")];
    let schedule = Schedule::from_parts(tasks.clone(), categories.clone());

    let reread = Schedule::from_markdown(schedule.markdown());
    assert_eq!(reread.categories(), categories.as_slice());
    assert!(reread.tasks()[0].same_content(&tasks[0]));
}

#[test]
fn default_day_statistics() {
    let stats = Schedule::new().day_stats();

    assert_eq!(stats.total_minutes, 870);
    assert_eq!(stats.fill_percentage, 60);
    assert_eq!(stats.conflict_count, 0);
    let order: Vec<(&str, u32)> = stats
        .categories
        .iter()
        .map(|entry| (entry.category_name.as_str(), entry.minutes))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Sleep", 480),
            ("Main Tasks", 300),
            ("Planning", 30),
            ("Rest / Food", 30),
            ("Spiritual Development", 30),
        ]
    );
}

#[test]
fn conflicts_show_up_in_statistics() {
    let mut schedule = Schedule::new();
    let call = schedule
        .add_task(Task::new("Call", t("10:00"), t("11:00"), "Main Tasks"))
        .unwrap();

    let stats = schedule.day_stats();
    assert_eq!(stats.conflict_count, 1);
    assert!(stats.overlapping_ids.contains(&call));
    assert_eq!(stats.overlapping_ids.len(), 2);
}

#[test]
fn durations_are_formatted_compactly() {
    assert_eq!(format_duration(0), "0m");
    assert_eq!(format_duration(45), "45m");
    assert_eq!(format_duration(120), "2h");
    assert_eq!(format_duration(90), "1h 30m");
}

#[test]
fn agenda_during_a_task() {
    let schedule = Schedule::new();
    let agenda = schedule.agenda_at(t("10:00"));

    let current = agenda.current.expect("a task is running");
    assert_eq!(current.task.name, "Work - Block 1");
    assert_eq!(current.minutes_remaining, 120);

    let next = agenda.next.expect("something comes next");
    assert_eq!(next.task.name, "Lunch");
    assert_eq!(next.minutes_until, 150);
}

#[test]
fn agenda_inside_an_overnight_task() {
    let schedule = Schedule::new();

    let early = schedule.agenda_at(t("03:00"));
    let current = early.current.expect("sleep is running");
    assert_eq!(current.task.name, "Sleep");
    assert_eq!(current.minutes_remaining, 210);
    let next = early.next.expect("morning routine is next");
    assert_eq!(next.task.name, "Morning Routine");
    assert_eq!(next.minutes_until, 210);

    let late = schedule.agenda_at(t("23:00"));
    assert_eq!(late.current.map(|active| active.minutes_remaining), Some(450));
    let wrapped = late.next.expect("tomorrow's first task");
    assert_eq!(wrapped.task.name, "Morning Routine");
    assert_eq!(wrapped.minutes_until, 450);
}

#[test]
fn agenda_of_an_empty_day() {
    let schedule = Schedule::from_parts(Vec::new(), Vec::new());
    let agenda = schedule.agenda_at(t("12:00"));
    assert!(agenda.current.is_none());
    assert!(agenda.next.is_none());
}
