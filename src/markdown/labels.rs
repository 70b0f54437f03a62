//! Literal prefixes recognized when reading a schedule document.
//!
//! Each concept lists its spellings in priority order; the first entry is the
//! one the generator writes. Supporting another language means adding an entry.

pub const DOCUMENT_TITLE: &str = "# Daily Schedule";

pub const CATEGORY_SECTION_HEADERS: &[&str] = &["## Categories", "## Категории"];
pub const TASK_SECTION_HEADERS: &[&str] = &["## Tasks", "## Задачи"];
pub const CATEGORY_FIELD_LABELS: &[&str] = &["- Category:", "- Категория:"];
pub const STATUS_FIELD_LABELS: &[&str] = &["- Status:", "- Статус:"];

pub const TASK_HEADER_PREFIX: &str = "###";

pub fn starts_with_any(line: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| line.starts_with(prefix))
}

/// Returns the trimmed text after the first matching label.
pub fn strip_label<'a>(line: &'a str, labels: &[&str]) -> Option<&'a str> {
    labels
        .iter()
        .find_map(|label| line.strip_prefix(label))
        .map(str::trim)
}

/// The spelling used when writing a document.
pub fn canonical<'a>(spellings: &[&'a str]) -> &'a str {
    spellings.first().copied().unwrap_or_default()
}
