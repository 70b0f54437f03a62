use super::labels::{
    CATEGORY_FIELD_LABELS, CATEGORY_SECTION_HEADERS, STATUS_FIELD_LABELS, TASK_SECTION_HEADERS,
    starts_with_any, strip_label,
};
use crate::task::{Category, STATUS_IN_PROGRESS, Task, TaskId};
use crate::time::ClockTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::warn;

pub const UNNAMED_TASK: &str = "Unnamed Task";
pub const UNCATEGORIZED: &str = "Uncategorized";

// `[0-9]` rather than `\d`: the regex crate's `\d` is Unicode-aware.
static CATEGORY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-\s*([^#]+)\(\s*#([0-9A-Fa-f]{6})\s*\)$")
        .unwrap_or_else(|err| panic!("invalid category regex: {err}"))
});

static TASK_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^###\s*([0-9]{2}:[0-9]{2})-([0-9]{2}:[0-9]{2})\s*(.+)$")
        .unwrap_or_else(|err| panic!("invalid task header regex: {err}"))
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedSchedule {
    pub tasks: Vec<Task>,
    pub categories: Vec<Category>,
}

/// A task block that was completed with fallback values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostic {
    /// 1-based line of the task header.
    pub line: usize,
    pub task_name: Option<String>,
    pub missing: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Categories,
    Tasks,
}

#[derive(Debug)]
struct TaskDraft {
    line: usize,
    name: Option<String>,
    start_time: Option<ClockTime>,
    end_time: Option<ClockTime>,
    category_name: Option<String>,
    status: Option<String>,
}

impl TaskDraft {
    fn from_header(line: usize, start: &str, end: &str, name: &str) -> Self {
        Self {
            line,
            name: non_empty(name),
            start_time: start.parse().ok(),
            end_time: end.parse().ok(),
            category_name: None,
            status: None,
        }
    }

    fn finalize(self) -> (Task, Option<ParseDiagnostic>) {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name");
        }
        if self.start_time.is_none() {
            missing.push("startTime");
        }
        if self.end_time.is_none() {
            missing.push("endTime");
        }
        if self.category_name.is_none() {
            missing.push("categoryName");
        }

        let diagnostic = (!missing.is_empty()).then(|| ParseDiagnostic {
            line: self.line,
            task_name: self.name.clone(),
            missing,
        });

        let task = Task {
            id: TaskId::generate(),
            name: self.name.unwrap_or_else(|| UNNAMED_TASK.to_string()),
            start_time: self.start_time.unwrap_or(ClockTime::MIDNIGHT),
            end_time: self.end_time.unwrap_or(ClockTime::MIDNIGHT),
            category_name: self
                .category_name
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            status: self
                .status
                .unwrap_or_else(|| STATUS_IN_PROGRESS.to_string()),
        };
        (task, diagnostic)
    }
}

#[derive(Debug, Default)]
struct ParseState {
    section: Option<Section>,
    current: Option<TaskDraft>,
    parsed: ParsedSchedule,
    diagnostics: Vec<ParseDiagnostic>,
}

impl ParseState {
    fn advance(mut self, line_no: usize, line: &str) -> Self {
        if starts_with_any(line, CATEGORY_SECTION_HEADERS) {
            self.section = Some(Section::Categories);
            return self;
        }
        if starts_with_any(line, TASK_SECTION_HEADERS) {
            self.section = Some(Section::Tasks);
            self.flush();
            return self;
        }

        match self.section {
            Some(Section::Categories) => self.category_line(line),
            Some(Section::Tasks) => self.task_line(line_no, line),
            None => {}
        }
        self
    }

    fn category_line(&mut self, line: &str) {
        if let Some(caps) = CATEGORY_LINE.captures(line) {
            self.parsed.categories.push(Category {
                name: caps[1].trim().to_string(),
                color: format!("#{}", &caps[2]),
            });
        }
    }

    fn task_line(&mut self, line_no: usize, line: &str) {
        if let Some(caps) = TASK_HEADER.captures(line) {
            self.flush();
            self.current = Some(TaskDraft::from_header(
                line_no,
                &caps[1],
                &caps[2],
                &caps[3],
            ));
            return;
        }

        let Some(draft) = self.current.as_mut() else {
            return;
        };
        if let Some(value) = strip_label(line, CATEGORY_FIELD_LABELS) {
            draft.category_name = non_empty(value);
        } else if let Some(value) = strip_label(line, STATUS_FIELD_LABELS) {
            draft.status = non_empty(value);
        }
    }

    fn flush(&mut self) {
        let Some(draft) = self.current.take() else {
            return;
        };
        let (task, diagnostic) = draft.finalize();
        if let Some(diagnostic) = diagnostic {
            warn!(
                line = diagnostic.line,
                name = diagnostic.task_name.as_deref().unwrap_or(""),
                missing = ?diagnostic.missing,
                "incomplete task block repaired with defaults"
            );
            self.diagnostics.push(diagnostic);
        }
        self.parsed.tasks.push(task);
    }

    fn finish(mut self) -> (ParsedSchedule, Vec<ParseDiagnostic>) {
        self.flush();
        (self.parsed, self.diagnostics)
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Reads a schedule document. Never fails: unknown lines are skipped and
/// incomplete task blocks are completed with placeholder values.
pub fn parse_markdown(text: &str) -> ParsedSchedule {
    parse_markdown_with_report(text).0
}

/// Like [`parse_markdown`], also returning every repair that was made.
pub fn parse_markdown_with_report(text: &str) -> (ParsedSchedule, Vec<ParseDiagnostic>) {
    text.lines()
        .enumerate()
        .fold(ParseState::default(), |state, (idx, line)| {
            state.advance(idx + 1, line.trim())
        })
        .finish()
}
