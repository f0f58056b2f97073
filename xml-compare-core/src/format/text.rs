use crate::compare::{ComparisonGraph, ComparisonId, NodeStatus, Side};
use crate::tree::XmlNode;

/// Format the differences of a comparison as plain text, one entry per
/// changed node in document order.
///
/// Entry lines start with the status marker (`+`, `-`, `~`). Updated nodes
/// are followed by indented lines naming what changed.
pub fn format_text(graph: &ComparisonGraph<'_>) -> String {
    let mut lines = Vec::with_capacity(graph.differences().len());
    for id in graph.differences().iter() {
        lines.push(difference_line(graph, id));
        if graph.status(id) == NodeStatus::Updated {
            if let (Some(left), Some(right)) =
                (graph.element(id, Side::Left), graph.element(id, Side::Right))
            {
                lines.extend(change_details(left, right).into_iter().map(|d| format!("    {d}")));
            }
        }
    }
    lines.join("\n")
}

/// Format the document state and per-status counts on one line.
pub fn format_summary(graph: &ComparisonGraph<'_>) -> String {
    format!(
        "state={} differences={} {}",
        graph.comparison_state(),
        graph.differences().len(),
        graph.summary()
    )
}

/// Headline of one changed node: marker, structural key, move and source
/// lines.
pub fn difference_line(graph: &ComparisonGraph<'_>, id: ComparisonId) -> String {
    let node = graph.node(id);
    let mut line = format!("{} {}", node.status().marker(), node.key());
    if node.moved().is_moved() {
        line.push_str(&format!(" ({})", node.moved()));
    }
    if let Some(location) = location(graph, id) {
        line.push_str(&format!(" [{location}]"));
    }
    line
}

fn location(graph: &ComparisonGraph<'_>, id: ComparisonId) -> Option<String> {
    let left = graph.side(id, Side::Left).line();
    let right = graph.side(id, Side::Right).line();
    match (left, right) {
        (Some(l), Some(r)) => Some(format!("line {l} -> {r}")),
        (Some(l), None) => Some(format!("left line {l}")),
        (None, Some(r)) => Some(format!("right line {r}")),
        (None, None) => None,
    }
}

/// Raw attribute and text differences between two elements.
pub fn change_details(left: &XmlNode, right: &XmlNode) -> Vec<String> {
    let mut details = Vec::new();
    for (name, value) in &left.attributes {
        match right.attr(name) {
            None => details.push(format!("@{name} removed (was \"{value}\")")),
            Some(other) if other != value.as_str() => {
                details.push(format!("@{name}: \"{value}\" -> \"{other}\""));
            }
            Some(_) => {}
        }
    }
    for (name, value) in &right.attributes {
        if !left.attributes.contains_key(name) {
            details.push(format!("@{name} added (\"{value}\")"));
        }
    }
    if left.text != right.text {
        let show = |text: &Option<String>| match text {
            Some(text) => format!("{:?}", text),
            None => "none".to_string(),
        };
        details.push(format!("text: {} -> {}", show(&left.text), show(&right.text)));
    }
    details
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::compare::compare;
    use crate::rules::RuleSet;

    #[test]
    fn lists_changes_in_order() {
        let left = XmlNode::new("r")
            .with_child(XmlNode::new("a").with_text("one"))
            .with_child(XmlNode::new("gone"));
        let right = XmlNode::new("r")
            .with_child(XmlNode::new("a").with_text("two"))
            .with_child(XmlNode::new("fresh").with_attr("k", "v"));
        let rules = RuleSet::default();
        let graph = compare(&left, &right, &rules);

        assert_eq!(
            format_text(&graph),
            "~ a@/0\n    text: \"one\" -> \"two\"\n- gone@/1\n+ fresh@/1"
        );
        assert_eq!(
            format_summary(&graph),
            "state=updated differences=3 unchanged=1 new=1 deleted=1 updated=1 moved=0"
        );
    }

    #[test]
    fn attribute_details() {
        let left = XmlNode::new("a").with_attr("x", "1").with_attr("y", "2");
        let right = XmlNode::new("a").with_attr("x", "3").with_attr("z", "4");
        assert_eq!(
            change_details(&left, &right),
            vec![
                "@x: \"1\" -> \"3\"".to_string(),
                "@y removed (was \"2\")".to_string(),
                "@z added (\"4\")".to_string(),
            ]
        );
    }
}
