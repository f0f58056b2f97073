//! Output formatters for comparison graphs.

pub mod json;
pub mod text;
pub mod tree;

pub use json::{build_report, format_json, Report, ReportEntry, SideReport};
pub use text::{change_details, difference_line, format_summary, format_text};
pub use tree::format_tree;
