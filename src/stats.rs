//! Day-level summaries shown next to the clock faces.

use crate::overlap::detect_overlaps;
use crate::task::{Task, TaskId};
use crate::time::{ClockTime, MINUTES_PER_DAY};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMinutes {
    pub category_name: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    pub total_minutes: u32,
    /// Share of the day that is scheduled, rounded. Exceeds 100 when tasks overlap.
    pub fill_percentage: u32,
    pub conflict_count: usize,
    pub overlapping_ids: HashSet<TaskId>,
    /// Sorted by minutes descending, then by name.
    pub categories: Vec<CategoryMinutes>,
}

pub fn day_stats(tasks: &[Task]) -> DayStats {
    let total_minutes: u32 = tasks.iter().map(Task::duration_minutes).sum();
    let fill_percentage = (total_minutes * 100 + MINUTES_PER_DAY / 2) / MINUTES_PER_DAY;
    let overlapping_ids = detect_overlaps(tasks);

    let mut per_category: HashMap<&str, u32> = HashMap::new();
    for task in tasks {
        *per_category.entry(task.category_name.as_str()).or_default() += task.duration_minutes();
    }
    let mut categories: Vec<CategoryMinutes> = per_category
        .into_iter()
        .map(|(name, minutes)| CategoryMinutes {
            category_name: name.to_string(),
            minutes,
        })
        .collect();
    categories.sort_by(|a, b| {
        b.minutes
            .cmp(&a.minutes)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });

    DayStats {
        total_minutes,
        fill_percentage,
        conflict_count: overlapping_ids.len() / 2,
        overlapping_ids,
        categories,
    }
}

pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTask<'a> {
    pub task: &'a Task,
    pub minutes_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingTask<'a> {
    pub task: &'a Task,
    pub minutes_until: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Agenda<'a> {
    pub current: Option<ActiveTask<'a>>,
    pub next: Option<UpcomingTask<'a>>,
}

/// What is running at `now` and what starts next.
///
/// When several tasks cover `now`, the one starting latest wins. If nothing
/// starts later today, the earliest task of the day is reported as next.
pub fn agenda_at(tasks: &[Task], now: ClockTime) -> Agenda<'_> {
    let now = now.minutes();
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by_key(|task| task.start_time.minutes());

    let mut agenda = Agenda::default();
    for &task in &sorted {
        let start = task.start_time.minutes();
        let end = start + task.duration_minutes();
        // An overnight task that started yesterday evening is still running
        // in the small hours.
        let adjusted_now = if now < start && end > MINUTES_PER_DAY {
            now + MINUTES_PER_DAY
        } else {
            now
        };

        if adjusted_now >= start && adjusted_now < end {
            agenda.current = Some(ActiveTask {
                task,
                minutes_remaining: end - adjusted_now,
            });
        } else if start > now && agenda.next.is_none() {
            agenda.next = Some(UpcomingTask {
                task,
                minutes_until: start - now,
            });
        }
    }

    if agenda.next.is_none() {
        if let Some(&first) = sorted.first() {
            let first_start = first.start_time.minutes();
            if first_start < now {
                agenda.next = Some(UpcomingTask {
                    task: first,
                    minutes_until: MINUTES_PER_DAY - now + first_start,
                });
            }
        }
    }

    agenda
}
