use std::collections::BTreeMap;

use serde::Serialize;

use crate::compare::{ComparisonGraph, ComparisonId, MovedState, NodeStatus, Side, Summary};

/// Serializable view of a comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'g> {
    pub state: NodeStatus,
    pub summary: Summary,
    pub differences: Vec<ReportEntry<'g>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry<'g> {
    pub key: String,
    pub status: NodeStatus,
    pub moved: MovedState,
    pub left: Option<SideReport<'g>>,
    pub right: Option<SideReport<'g>>,
}

/// The element on one side; absent for a phantom.
#[derive(Debug, Clone, Serialize)]
pub struct SideReport<'g> {
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub attributes: &'g BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'g str>,
}

/// Build the report for `graph`.
pub fn build_report<'g>(graph: &'g ComparisonGraph<'_>) -> Report<'g> {
    Report {
        state: graph.comparison_state(),
        summary: graph.summary(),
        differences: graph
            .differences()
            .iter()
            .map(|id| entry(graph, id))
            .collect(),
    }
}

fn entry<'g>(graph: &'g ComparisonGraph<'_>, id: ComparisonId) -> ReportEntry<'g> {
    let node = graph.node(id);
    ReportEntry {
        key: node.key().to_string(),
        status: node.status(),
        moved: node.moved(),
        left: side(graph, id, Side::Left),
        right: side(graph, id, Side::Right),
    }
}

fn side<'g>(graph: &'g ComparisonGraph<'_>, id: ComparisonId, side: Side) -> Option<SideReport<'g>> {
    let wrapper = graph.side(id, side);
    wrapper.node().map(|element| SideReport {
        index: wrapper.index(),
        line: element.line,
        attributes: &element.attributes,
        text: element.text.as_deref(),
    })
}

/// Format a comparison as pretty-printed JSON.
pub fn format_json(graph: &ComparisonGraph<'_>) -> String {
    serde_json::to_string_pretty(&build_report(graph)).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::compare::compare;
    use crate::rules::RuleSet;
    use crate::tree::XmlNode;

    #[test]
    fn phantom_side_is_null() {
        let left = XmlNode::new("r");
        let right = XmlNode::new("r").with_child(XmlNode::new("x").with_attr("k", "v"));
        let rules = RuleSet::default();
        let graph = compare(&left, &right, &rules);

        let json: Value = serde_json::from_str(&format_json(&graph)).expect("valid json");
        assert_eq!(json["state"], "Updated");
        assert_eq!(json["summary"]["new"], 1);
        let entry = &json["differences"][0];
        assert_eq!(entry["key"], "x@/0");
        assert_eq!(entry["status"], "New");
        assert_eq!(entry["moved"], "None");
        assert!(entry["left"].is_null());
        assert_eq!(entry["right"]["attributes"]["k"], "v");
    }
}
