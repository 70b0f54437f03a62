use crate::config::{AppConfig, StoreKind};
use crate::schedule::{DEFAULT_DOCUMENT, Schedule};
use crate::task_validation;
use crate::{Category, Task};
use std::io;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("store backend '{0}' is not available in this build")]
    Unsupported(&'static str),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Durable home of the schedule document. Stores hold text only; parsing and
/// generation stay in the pure core.
pub trait ScheduleStore {
    fn save_document(&self, markdown: &str) -> PersistenceResult<()>;
    fn load_document(&self) -> PersistenceResult<Option<String>>;
}

pub fn save_schedule<S: ScheduleStore + ?Sized>(
    store: &S,
    schedule: &Schedule,
) -> PersistenceResult<()> {
    store.save_document(schedule.markdown())
}

/// Loads the stored document, seeding the default one when nothing is stored.
/// A failed load falls back to the default schedule in memory only; the store
/// is left untouched until the next explicit save.
pub fn load_or_seed<S: ScheduleStore + ?Sized>(store: &S) -> PersistenceResult<Schedule> {
    match store.load_document() {
        Ok(Some(text)) if !text.trim().is_empty() => {
            let schedule = Schedule::from_markdown(&text);
            info!(
                tasks = schedule.tasks().len(),
                categories = schedule.categories().len(),
                "schedule loaded"
            );
            return Ok(schedule);
        }
        Ok(_) => info!("no stored schedule; seeding default document"),
        Err(err) => {
            warn!(error = %err, "failed to load schedule; using default document without saving");
            return Ok(Schedule::from_markdown(DEFAULT_DOCUMENT));
        }
    }
    store.save_document(DEFAULT_DOCUMENT)?;
    Ok(Schedule::from_markdown(DEFAULT_DOCUMENT))
}

pub fn validate_tasks(tasks: &[Task]) -> PersistenceResult<()> {
    task_validation::validate_task_collection(tasks)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

pub fn validate_categories(categories: &[Category]) -> PersistenceResult<()> {
    task_validation::validate_categories(categories)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

/// Opens the backend named by the configuration.
pub fn open_store(config: &AppConfig) -> PersistenceResult<Box<dyn ScheduleStore + Send + Sync>> {
    match config.store_kind {
        StoreKind::Markdown => Ok(Box::new(file::MarkdownFileStore::new(&config.document_path))),
        #[cfg(feature = "sqlite")]
        StoreKind::Sqlite => Ok(Box::new(sqlite::SqliteScheduleStore::new(
            &config.document_path,
        )?)),
        #[cfg(not(feature = "sqlite"))]
        StoreKind::Sqlite => Err(PersistenceError::Unsupported("sqlite")),
    }
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    MarkdownFileStore, load_schedule_from_csv, load_schedule_from_json,
    load_schedule_from_markdown, save_schedule_to_csv, save_schedule_to_json,
    save_schedule_to_markdown,
};
