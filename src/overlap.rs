//! Pairwise time-range conflict detection.
//!
//! Each task covers one half-open minute range, or two when it wraps past
//! midnight (`[start, 1440)` and `[0, end)`). Two tasks conflict when any of
//! their ranges intersect. Touching ranges (`10:00-11:00`, `11:00-12:00`) do
//! not conflict.

use crate::task::{Task, TaskId};
use crate::time::MINUTES_PER_DAY;
use serde::Serialize;
use std::collections::HashSet;
use std::ops::Range;

pub fn minute_ranges(task: &Task) -> Vec<Range<u32>> {
    let start = task.start_time.minutes();
    let end = task.end_time.minutes();
    if task.is_overnight() {
        vec![start..MINUTES_PER_DAY, 0..end]
    } else {
        vec![start..end]
    }
}

pub fn ranges_intersect(a: &Range<u32>, b: &Range<u32>) -> bool {
    a.start < b.end && b.start < a.end
}

pub fn tasks_overlap(a: &Task, b: &Task) -> bool {
    let ranges_b = minute_ranges(b);
    minute_ranges(a)
        .iter()
        .any(|ra| ranges_b.iter().any(|rb| ranges_intersect(ra, rb)))
}

/// Every unordered pair of tasks that overlap, in list order.
pub fn conflicting_pairs(tasks: &[Task]) -> Vec<(&Task, &Task)> {
    let mut pairs = Vec::new();
    for (i, a) in tasks.iter().enumerate() {
        for b in &tasks[i + 1..] {
            if tasks_overlap(a, b) {
                pairs.push((a, b));
            }
        }
    }
    pairs
}

/// Ids of every task that overlaps at least one other task.
pub fn detect_overlaps(tasks: &[Task]) -> HashSet<TaskId> {
    let mut overlapping = HashSet::new();
    for (a, b) in conflicting_pairs(tasks) {
        overlapping.insert(a.id.clone());
        overlapping.insert(b.id.clone());
    }
    overlapping
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapStats {
    pub overlapping_ids: HashSet<TaskId>,
    /// `floor(|overlapping_ids| / 2)`. Undercounts when three or more tasks
    /// overlap one another.
    pub conflict_count: usize,
}

pub fn overlap_stats(tasks: &[Task]) -> OverlapStats {
    let overlapping_ids = detect_overlaps(tasks);
    let conflict_count = overlapping_ids.len() / 2;
    OverlapStats {
        overlapping_ids,
        conflict_count,
    }
}
