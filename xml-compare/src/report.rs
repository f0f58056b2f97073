use colored::Colorize;
use xml_compare_core::{format_summary, format_text, format_tree, ComparisonGraph};

/// Render the difference listing for terminal output.
pub fn render_text(graph: &ComparisonGraph<'_>) -> String {
    if graph.differences().is_empty() {
        return "no differences".green().to_string();
    }
    colorize(&format_text(graph))
}

/// Render the comparison tree. Without `all`, unchanged subtrees are left
/// out.
pub fn render_tree(graph: &ComparisonGraph<'_>, all: bool) -> String {
    let raw = format_tree(graph, !all);
    if raw.is_empty() {
        return "no differences".green().to_string();
    }
    colorize(&raw)
}

/// Render the one-line summary.
pub fn render_summary(graph: &ComparisonGraph<'_>) -> String {
    format_summary(graph).cyan().to_string()
}

fn colorize(raw: &str) -> String {
    let mut out = Vec::new();
    for line in raw.lines() {
        let colored = match line.trim_start().chars().next() {
            Some('+') => line.green().to_string(),
            Some('-') => line.red().to_string(),
            Some('~') => line.yellow().to_string(),
            Some('=') => line.dimmed().to_string(),
            _ => line.to_string(),
        };
        out.push(colored);
    }
    out.join("\n")
}
