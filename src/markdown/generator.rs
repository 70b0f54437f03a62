use super::labels::{
    CATEGORY_FIELD_LABELS, CATEGORY_SECTION_HEADERS, DOCUMENT_TITLE, STATUS_FIELD_LABELS,
    TASK_HEADER_PREFIX, TASK_SECTION_HEADERS, canonical,
};
use crate::task::{Category, Task};
use std::fmt::Write;

/// Writes the canonical English document. Tasks are ordered by their `HHMM`
/// start value (ties keep input order); categories keep input order.
pub fn generate_markdown(tasks: &[Task], categories: &[Category]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_document(&mut out, tasks, categories);
    out.trim().to_string()
}

fn write_document(
    out: &mut String,
    tasks: &[Task],
    categories: &[Category],
) -> std::fmt::Result {
    writeln!(out, "{DOCUMENT_TITLE}")?;
    writeln!(out)?;

    writeln!(out, "{}", canonical(CATEGORY_SECTION_HEADERS))?;
    for category in categories {
        writeln!(out, "- {} ({})", category.name, category.color)?;
    }
    writeln!(out)?;

    writeln!(out, "{}", canonical(TASK_SECTION_HEADERS))?;
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by_key(|task| task.start_time.sort_key());
    for task in sorted {
        writeln!(
            out,
            "{TASK_HEADER_PREFIX} {}-{} {}",
            task.start_time, task.end_time, task.name
        )?;
        writeln!(out, "{} {}", canonical(CATEGORY_FIELD_LABELS), task.category_name)?;
        writeln!(out, "{} {}", canonical(STATUS_FIELD_LABELS), task.status)?;
        writeln!(out)?;
    }
    Ok(())
}
