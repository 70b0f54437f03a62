use super::{PersistenceError, PersistenceResult, ScheduleStore};
use crate::{Category, ClockTime, Schedule, Task, TaskId};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Keeps the document as a plain Markdown file.
#[derive(Debug, Clone)]
pub struct MarkdownFileStore {
    path: PathBuf,
}

impl MarkdownFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScheduleStore for MarkdownFileStore {
    fn save_document(&self, markdown: &str) -> PersistenceResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, markdown)?;
        debug!(path = %self.path.display(), bytes = markdown.len(), "schedule document written");
        Ok(())
    }

    fn load_document(&self) -> PersistenceResult<Option<String>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(decode_document(&self.path, bytes))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Hand-edited files may carry stray bytes; they become U+FFFD rather than
/// making the whole document unreadable.
fn decode_document(path: &Path, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), "schedule document is not valid UTF-8; replacing bad bytes");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}

pub fn save_schedule_to_markdown<P: AsRef<Path>>(
    schedule: &Schedule,
    path: P,
) -> PersistenceResult<()> {
    fs::write(path, schedule.markdown())?;
    Ok(())
}

pub fn load_schedule_from_markdown<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let path = path.as_ref();
    let text = decode_document(path, fs::read(path)?);
    Ok(Schedule::from_markdown(&text))
}

#[derive(Serialize, Deserialize)]
struct ScheduleSnapshot {
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl ScheduleSnapshot {
    fn from_schedule(schedule: &Schedule) -> Self {
        Self {
            categories: schedule.categories().to_vec(),
            tasks: schedule.tasks().to_vec(),
        }
    }

    fn into_schedule(self) -> PersistenceResult<Schedule> {
        super::validate_tasks(&self.tasks)?;
        super::validate_categories(&self.categories)?;
        Ok(Schedule::from_parts(self.tasks, self.categories))
    }
}

/// JSON keeps task ids, unlike Markdown.
pub fn save_schedule_to_json<P: AsRef<Path>>(
    schedule: &Schedule,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &ScheduleSnapshot::from_schedule(schedule))?;
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let file = File::open(path)?;
    let snapshot: ScheduleSnapshot = serde_json::from_reader(file)?;
    snapshot.into_schedule()
}

const KIND_CATEGORY: &str = "category";
const KIND_TASK: &str = "task";

#[derive(Default, Serialize, Deserialize)]
struct ScheduleCsvRecord {
    kind: String,
    id: String,
    name: String,
    start_time: String,
    end_time: String,
    category_name: String,
    status: String,
    color: String,
}

impl From<&Category> for ScheduleCsvRecord {
    fn from(category: &Category) -> Self {
        Self {
            kind: KIND_CATEGORY.to_string(),
            name: category.name.clone(),
            color: category.color.clone(),
            ..Self::default()
        }
    }
}

impl From<&Task> for ScheduleCsvRecord {
    fn from(task: &Task) -> Self {
        Self {
            kind: KIND_TASK.to_string(),
            id: task.id.to_string(),
            name: task.name.clone(),
            start_time: task.start_time.to_string(),
            end_time: task.end_time.to_string(),
            category_name: task.category_name.clone(),
            status: task.status.clone(),
            color: String::new(),
        }
    }
}

impl ScheduleCsvRecord {
    fn into_task(self) -> PersistenceResult<Task> {
        let parse_time = |value: &str| {
            value.trim().parse::<ClockTime>().map_err(|err| {
                PersistenceError::InvalidData(format!("task '{}': {err}", self.name))
            })
        };
        let start_time = parse_time(&self.start_time)?;
        let end_time = parse_time(&self.end_time)?;
        let id = if self.id.trim().is_empty() {
            TaskId::generate()
        } else {
            TaskId::new(self.id.trim())
        };
        Ok(Task {
            id,
            name: self.name,
            start_time,
            end_time,
            category_name: self.category_name,
            status: self.status,
        })
    }
}

/// One row per category, then one per task, told apart by the `kind` column.
pub fn save_schedule_to_csv<P: AsRef<Path>>(schedule: &Schedule, path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for category in schedule.categories() {
        writer.serialize(ScheduleCsvRecord::from(category))?;
    }
    for task in schedule.tasks() {
        writer.serialize(ScheduleCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_schedule_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut categories = Vec::new();
    let mut tasks = Vec::new();
    for record in reader.deserialize::<ScheduleCsvRecord>() {
        let record = record?;
        let kind = record.kind.trim().to_string();
        match kind.as_str() {
            KIND_CATEGORY => categories.push(Category::new(record.name, record.color)),
            KIND_TASK => tasks.push(record.into_task()?),
            other => {
                return Err(PersistenceError::InvalidData(format!(
                    "unknown row kind '{other}'"
                )));
            }
        }
    }

    super::validate_tasks(&tasks)?;
    super::validate_categories(&categories)?;
    Ok(Schedule::from_parts(tasks, categories))
}
