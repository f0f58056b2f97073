use crate::compare::{ComparisonGraph, ComparisonId};

/// Render the comparison tree, one node per line, indented by depth.
///
/// With `changed_only`, subtrees without any difference are skipped.
pub fn format_tree(graph: &ComparisonGraph<'_>, changed_only: bool) -> String {
    let mut lines = Vec::new();
    let mut skip_below: Option<usize> = None;

    for (id, depth) in graph.iter() {
        if let Some(limit) = skip_below {
            if depth > limit {
                continue;
            }
            skip_below = None;
        }
        let node = graph.node(id);
        if changed_only && !node.status().is_changed() && !node.has_different_descendant() {
            skip_below = Some(depth);
            continue;
        }
        lines.push(format!("{}{}", "  ".repeat(depth), tree_line(graph, id)));
    }
    lines.join("\n")
}

fn tree_line(graph: &ComparisonGraph<'_>, id: ComparisonId) -> String {
    let node = graph.node(id);
    let mut line = format!("{} {}", node.status().marker(), graph.name(id));
    if node.moved().is_moved() {
        line.push_str(&format!(" ({})", node.moved()));
    }
    line
}
