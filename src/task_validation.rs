use crate::task::{Category, Task};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap_or_else(|err| panic!("invalid color regex: {err}"))
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TaskValidationError {
    message: String,
}

impl TaskValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn is_single_line(value: &str) -> bool {
    !value.contains(['\n', '\r'])
}

fn has_edge_whitespace(value: &str) -> bool {
    value.trim().len() != value.len()
}

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

pub fn validate_task(task: &Task) -> Result<(), TaskValidationError> {
    if task.name.trim().is_empty() {
        return Err(TaskValidationError::new(format!(
            "task {} has an empty name",
            task.id
        )));
    }
    if !is_single_line(&task.name) {
        return Err(TaskValidationError::new(format!(
            "task {} name must fit on one line",
            task.id
        )));
    }
    if has_edge_whitespace(&task.name) {
        return Err(TaskValidationError::new(format!(
            "task '{}' name must not start or end with whitespace",
            task.name.trim()
        )));
    }
    if task.category_name.trim().is_empty() || !is_single_line(&task.category_name) {
        return Err(TaskValidationError::new(format!(
            "task '{}' needs a single-line category name",
            task.name
        )));
    }
    if task.status.trim().is_empty() || !is_single_line(&task.status) {
        return Err(TaskValidationError::new(format!(
            "task '{}' needs a single-line status",
            task.name
        )));
    }
    if has_edge_whitespace(&task.category_name) || has_edge_whitespace(&task.status) {
        return Err(TaskValidationError::new(format!(
            "task '{}' category and status must not start or end with whitespace",
            task.name
        )));
    }
    Ok(())
}

pub fn validate_category(category: &Category) -> Result<(), TaskValidationError> {
    let name = category.name.trim();
    if name.is_empty() {
        return Err(TaskValidationError::new("category name cannot be empty"));
    }
    if has_edge_whitespace(&category.name) {
        return Err(TaskValidationError::new(format!(
            "category name '{name}' must not start or end with whitespace"
        )));
    }
    if name.contains('#') || !is_single_line(name) {
        return Err(TaskValidationError::new(format!(
            "category name '{name}' must be one line without '#'"
        )));
    }
    if !is_hex_color(&category.color) {
        return Err(TaskValidationError::new(format!(
            "category '{name}' has invalid color '{}' (expected #RRGGBB)",
            category.color
        )));
    }
    Ok(())
}

pub fn validate_task_collection(tasks: &[Task]) -> Result<(), TaskValidationError> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert(&task.id) {
            return Err(TaskValidationError::new(format!(
                "duplicate task id {}",
                task.id
            )));
        }
        validate_task(task)?;
    }
    Ok(())
}

pub fn validate_categories(categories: &[Category]) -> Result<(), TaskValidationError> {
    categories.iter().try_for_each(validate_category)
}
