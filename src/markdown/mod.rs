//! The schedule document: a `## Categories` list and a `## Tasks` list of
//! `### HH:MM-HH:MM name` blocks. Reading accepts English or Russian labels;
//! writing always produces English.

pub mod generator;
pub mod labels;
pub mod parser;

pub use generator::generate_markdown;
pub use parser::{
    ParseDiagnostic, ParsedSchedule, UNCATEGORIZED, UNNAMED_TASK, parse_markdown,
    parse_markdown_with_report,
};
