//! A personal daily schedule kept as a Markdown document.
//!
//! The core is four pure transforms: wall-clock arithmetic ([`time`]),
//! conflict detection ([`overlap`]), and reading and writing the document
//! ([`markdown`]). [`Schedule`] owns the live lists and keeps the document in
//! step with every edit; [`persistence`] stores that document.

pub mod config;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod markdown;
pub mod overlap;
pub mod persistence;
pub mod schedule;
pub mod stats;
pub mod task;
pub mod task_validation;
pub mod time;

pub use config::{AppConfig, CliArgs, ConfigError, StoreKind};
pub use logging::{LoggingError, init_logging};
pub use markdown::{
    ParseDiagnostic, ParsedSchedule, generate_markdown, parse_markdown,
    parse_markdown_with_report,
};
pub use overlap::{OverlapStats, detect_overlaps, overlap_stats, tasks_overlap};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteScheduleStore;
pub use persistence::{
    MarkdownFileStore, PersistenceError, ScheduleStore, load_or_seed, load_schedule_from_csv,
    load_schedule_from_json, load_schedule_from_markdown, open_store, save_schedule,
    save_schedule_to_csv, save_schedule_to_json, save_schedule_to_markdown,
};
pub use schedule::{DEFAULT_DOCUMENT, Schedule, ScheduleError};
pub use stats::{Agenda, DayStats, agenda_at, day_stats, format_duration};
pub use task::{Category, STATUS_COMPLETED, STATUS_IN_PROGRESS, Task, TaskEdit, TaskId};
pub use task_validation::TaskValidationError;
pub use time::{ClockTime, TimeError, minutes_to_time, time_to_minutes};
