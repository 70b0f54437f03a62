use crate::markdown::{
    ParseDiagnostic, generate_markdown, parse_markdown, parse_markdown_with_report,
};
use crate::overlap::{OverlapStats, overlap_stats};
use crate::stats::{Agenda, DayStats, agenda_at, day_stats};
use crate::task::{Category, Task, TaskEdit, TaskId};
use crate::task_validation::{self, TaskValidationError};
use crate::time::ClockTime;
use tracing::{debug, info};

/// Seed document for a fresh install.
pub const DEFAULT_DOCUMENT: &str = "# Daily Schedule

## Categories
- Spiritual Development (#F6A24C)
- Main Tasks (#3E847C)
- Rest / Food (#D8D4C9)
- Planning (#EB7957)
- Sleep (#3D505E)

## Tasks
### 06:30-07:00 Morning Routine
- Category: Spiritual Development
- Status: ⏳ In Progress

### 09:00-12:00 Work - Block 1
- Category: Main Tasks
- Status: ⏳ In Progress

### 12:30-13:00 Lunch
- Category: Rest / Food
- Status: ⏳ In Progress

### 15:00-17:00 Work - Block 2
- Category: Main Tasks
- Status: ⏳ In Progress

### 21:30-22:00 Evening Planning
- Category: Planning
- Status: ⏳ In Progress

### 22:30-06:30 Sleep
- Category: Sleep
- Status: ✅ Completed
";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    #[error("task {0} already exists")]
    DuplicateTask(TaskId),
    #[error(transparent)]
    Invalid(#[from] TaskValidationError),
    #[error("document has {} incomplete task block(s)", .0.len())]
    Repaired(Vec<ParseDiagnostic>),
}

/// The authoritative task and category lists plus the document they serialize to.
///
/// Every mutation rewrites `markdown` from the lists. The store never re-parses
/// its own output, so task ids stay stable for the life of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    tasks: Vec<Task>,
    categories: Vec<Category>,
    markdown: String,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::from_markdown(DEFAULT_DOCUMENT)
    }
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps `text` verbatim as the current document.
    pub fn from_markdown(text: &str) -> Self {
        let parsed = parse_markdown(text);
        Self {
            tasks: parsed.tasks,
            categories: parsed.categories,
            markdown: text.to_string(),
        }
    }

    /// Builds a schedule from already-typed lists and renders its document.
    pub fn from_parts(tasks: Vec<Task>, categories: Vec<Category>) -> Self {
        let mut schedule = Self {
            tasks,
            categories,
            markdown: String::new(),
        };
        schedule.regenerate();
        schedule
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn find_task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn category_color(&self, name: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| category.name == name)
            .map(|category| category.color.as_str())
    }

    /// Replaces everything with the contents of `text`, repairing what it must.
    pub fn import_markdown(&mut self, text: &str) {
        *self = Self::from_markdown(text);
        info!(
            tasks = self.tasks.len(),
            categories = self.categories.len(),
            "schedule imported"
        );
    }

    /// Replaces everything with `text` only if it parses cleanly and every
    /// entity validates. On error the current state is left untouched.
    pub fn try_import_markdown(&mut self, text: &str) -> Result<(), ScheduleError> {
        let (parsed, diagnostics) = parse_markdown_with_report(text);
        if !diagnostics.is_empty() {
            return Err(ScheduleError::Repaired(diagnostics));
        }
        task_validation::validate_task_collection(&parsed.tasks)?;
        task_validation::validate_categories(&parsed.categories)?;
        self.tasks = parsed.tasks;
        self.categories = parsed.categories;
        self.markdown = text.to_string();
        Ok(())
    }

    pub fn add_task(&mut self, task: Task) -> Result<TaskId, ScheduleError> {
        task_validation::validate_task(&task)?;
        if self.find_task(&task.id).is_some() {
            return Err(ScheduleError::DuplicateTask(task.id));
        }
        let id = task.id.clone();
        self.tasks.push(task);
        self.sort_tasks();
        self.regenerate();
        Ok(id)
    }

    pub fn update_task(&mut self, task: Task) -> Result<(), ScheduleError> {
        task_validation::validate_task(&task)?;
        let slot = self
            .tasks
            .iter_mut()
            .find(|existing| existing.id == task.id)
            .ok_or_else(|| ScheduleError::TaskNotFound(task.id.clone()))?;
        *slot = task;
        self.sort_tasks();
        self.regenerate();
        Ok(())
    }

    /// Stable, so tasks sharing a start keep their relative order.
    fn sort_tasks(&mut self) {
        self.tasks.sort_by_key(|task| task.start_time.sort_key());
    }

    pub fn delete_task(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| &task.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            self.regenerate();
        }
        removed
    }

    pub fn apply_edit(&mut self, edit: TaskEdit) -> Result<(), ScheduleError> {
        match edit {
            TaskEdit::Replace(task) => self.update_task(task),
            TaskEdit::Delete(id) => {
                if self.delete_task(&id) {
                    Ok(())
                } else {
                    Err(ScheduleError::TaskNotFound(id))
                }
            }
        }
    }

    pub fn set_categories(&mut self, categories: Vec<Category>) -> Result<(), ScheduleError> {
        task_validation::validate_categories(&categories)?;
        self.categories = categories;
        self.regenerate();
        Ok(())
    }

    /// Adds a category, or recolors the one with the same name.
    pub fn upsert_category(&mut self, category: Category) -> Result<(), ScheduleError> {
        task_validation::validate_category(&category)?;
        match self
            .categories
            .iter_mut()
            .find(|existing| existing.name == category.name)
        {
            Some(existing) => existing.color = category.color,
            None => self.categories.push(category),
        }
        self.regenerate();
        Ok(())
    }

    /// Tasks that referenced the category keep their (now orphaned) name.
    pub fn remove_category(&mut self, name: &str) -> bool {
        let before = self.categories.len();
        self.categories.retain(|category| category.name != name);
        let removed = self.categories.len() != before;
        if removed {
            self.regenerate();
        }
        removed
    }

    pub fn overlaps(&self) -> OverlapStats {
        overlap_stats(&self.tasks)
    }

    pub fn day_stats(&self) -> DayStats {
        day_stats(&self.tasks)
    }

    pub fn agenda_at(&self, now: ClockTime) -> Agenda<'_> {
        agenda_at(&self.tasks, now)
    }

    fn regenerate(&mut self) {
        self.markdown = generate_markdown(&self.tasks, &self.categories);
        debug!(
            tasks = self.tasks.len(),
            categories = self.categories.len(),
            bytes = self.markdown.len(),
            "schedule document regenerated"
        );
    }
}
