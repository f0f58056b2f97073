use pretty_assertions::assert_eq;
use xml_compare_core::{
    compare, parse, ComparisonGraph, ComparisonId, MovedState, NodeStatus, Rule, RuleSet, Side,
    XmlNode,
};

fn item(id: &str) -> XmlNode {
    XmlNode::new("A").with_attr("id", id)
}

fn root_children(graph: &ComparisonGraph<'_>) -> Vec<ComparisonId> {
    graph.children(graph.root()).to_vec()
}

fn right_index(graph: &ComparisonGraph<'_>, id: ComparisonId) -> Option<usize> {
    graph.side(id, Side::Right).index()
}

#[test]
fn first_fit_pairs_identity_matches_across_positions() {
    let left = XmlNode::new("r").with_child(item("1")).with_child(item("2"));
    let right = XmlNode::new("r").with_child(item("2")).with_child(item("1"));
    let mut rules = RuleSet::default();
    rules.insert(Rule::new().with_identity(&["id"]), ["A"]);

    let graph = compare(&left, &right, &rules);
    let children = root_children(&graph);

    assert_eq!(right_index(&graph, children[0]), Some(1));
    assert_eq!(graph.node(children[0]).moved(), MovedState::DownThenUpdated);
    assert_eq!(right_index(&graph, children[1]), Some(0));
    assert_eq!(graph.node(children[1]).moved(), MovedState::UpThenUpdated);
}

#[test]
fn pure_reorder_with_significant_order_is_an_update() {
    let left = XmlNode::new("r")
        .with_child(XmlNode::new("A"))
        .with_child(XmlNode::new("B"));
    let right = XmlNode::new("r")
        .with_child(XmlNode::new("B"))
        .with_child(XmlNode::new("A"));
    let rules = RuleSet::default();

    let graph = compare(&left, &right, &rules);
    let children = root_children(&graph);

    assert_eq!(graph.status(children[0]), NodeStatus::Updated);
    assert_eq!(graph.node(children[0]).moved(), MovedState::DownThenUpdated);
    assert_eq!(graph.status(children[1]), NodeStatus::Updated);
    assert_eq!(graph.node(children[1]).moved(), MovedState::UpThenUpdated);
    assert_eq!(graph.differences().len(), 2);
    assert_eq!(graph.comparison_state(), NodeStatus::Updated);
}

#[test]
fn pure_reorder_without_significant_order_is_a_move() {
    let left = XmlNode::new("r")
        .with_child(XmlNode::new("A"))
        .with_child(XmlNode::new("B"));
    let right = XmlNode::new("r")
        .with_child(XmlNode::new("B"))
        .with_child(XmlNode::new("A"));
    let rules = RuleSet::new(Rule::new().with_order_significant(false));

    let graph = compare(&left, &right, &rules);
    let children = root_children(&graph);

    assert_eq!(graph.status(children[0]), NodeStatus::Unchanged);
    assert_eq!(graph.node(children[0]).moved(), MovedState::Down);
    assert_eq!(graph.status(children[1]), NodeStatus::Unchanged);
    assert_eq!(graph.node(children[1]).moved(), MovedState::Up);
    assert!(graph.differences().is_empty());
    assert_eq!(graph.comparison_state(), NodeStatus::Unchanged);
    assert!(!graph.node(graph.root()).has_different_descendant());
}

#[test]
fn deletion_places_phantom_first_on_the_right() {
    let left = XmlNode::new("r").with_child(XmlNode::new("A"));
    let right = XmlNode::new("r");
    let rules = RuleSet::default();

    let graph = compare(&left, &right, &rules);
    let child = root_children(&graph)[0];
    assert_eq!(graph.status(child), NodeStatus::Deleted);

    let right_root = graph.node(graph.root()).right();
    let projected = graph.projected_children(Side::Right, right_root);
    assert_eq!(projected.len(), 1);
    let phantom = graph.wrapper(Side::Right, projected[0]);
    assert!(phantom.is_phantom());
    assert_eq!(phantom.name(), "A");
    assert_eq!(phantom.comparison(), Some(child));
}

#[test]
fn insertion_places_phantom_first_on_the_left() {
    let left = XmlNode::new("r");
    let right = XmlNode::new("r").with_child(XmlNode::new("B"));
    let rules = RuleSet::default();

    let graph = compare(&left, &right, &rules);
    let child = root_children(&graph)[0];
    assert_eq!(graph.status(child), NodeStatus::New);

    let left_root = graph.node(graph.root()).left();
    let projected = graph.projected_children(Side::Left, left_root);
    assert_eq!(projected.len(), 1);
    assert!(graph.wrapper(Side::Left, projected[0]).is_phantom());
    assert_eq!(graph.wrapper(Side::Left, projected[0]).name(), "B");
}

#[test]
fn phantom_follows_counterpart_of_previous_sibling() {
    let left = XmlNode::new("r")
        .with_child(XmlNode::new("a"))
        .with_child(XmlNode::new("b"))
        .with_child(XmlNode::new("c"));
    let right = XmlNode::new("r")
        .with_child(XmlNode::new("a"))
        .with_child(XmlNode::new("c"));
    let rules = RuleSet::new(Rule::new().with_order_significant(false));

    let graph = compare(&left, &right, &rules);
    let right_root = graph.node(graph.root()).right();
    let names: Vec<(String, bool)> = graph
        .projected_children(Side::Right, right_root)
        .iter()
        .map(|&w| {
            let wrapper = graph.wrapper(Side::Right, w);
            (wrapper.name().to_string(), wrapper.is_phantom())
        })
        .collect();
    assert_eq!(
        names,
        vec![
            ("a".to_string(), false),
            ("b".to_string(), true),
            ("c".to_string(), false),
        ]
    );
}

#[test]
fn identity_match_with_different_content_is_updated() {
    let left = XmlNode::new("r").with_child(item("1").with_attr("v", "x"));
    let right = XmlNode::new("r").with_child(item("1").with_attr("v", "y"));
    let mut rules = RuleSet::default();
    rules.insert(Rule::new().with_identity(&["id"]), ["A"]);

    let graph = compare(&left, &right, &rules);
    let child = root_children(&graph)[0];
    assert_eq!(graph.status(child), NodeStatus::Updated);
    assert_eq!(graph.node(child).moved(), MovedState::None);
    assert_eq!(graph.differences().as_slice(), &[child]);
}

#[test]
fn root_text_counts_even_when_text_comparison_is_off() {
    let left = XmlNode::new("r").with_text("alpha");
    let right = XmlNode::new("r").with_text("beta");
    let rules = RuleSet::new(Rule::new().with_compare_text(false));

    let graph = compare(&left, &right, &rules);
    assert_eq!(graph.status(graph.root()), NodeStatus::Updated);
    assert_eq!(graph.differences().as_slice(), &[graph.root()]);
    assert_eq!(graph.comparison_state(), NodeStatus::Updated);
}

#[test]
fn differences_are_in_pre_order() {
    let left = parse(
        br#"<r>
  <box n="1"><x/><y v="1"/></box>
  <gone/>
</r>"#,
    )
    .expect("left parse");
    let right = parse(
        br#"<r>
  <box n="1"><x/><y v="2"/></box>
  <box n="2"><z/></box>
</r>"#,
    )
    .expect("right parse");
    let rules = RuleSet::default();
    let graph = compare(&left, &right, &rules);

    let keys: Vec<String> = graph
        .differences()
        .iter()
        .map(|id| format!("{}{}", graph.status(id).marker(), graph.node(id).key()))
        .collect();
    assert_eq!(
        keys,
        vec!["-y@/0/1", "+y@/0/1", "-gone@/1", "+box@/1", "+z@/1/0"]
    );
}

#[test]
fn deep_documents_are_walked_iteratively() {
    let depth = 2_500;
    let mut left = XmlNode::new("leaf");
    let mut right = XmlNode::new("leaf").with_attr("changed", "yes");
    for _ in 0..depth {
        left = XmlNode::new("n").with_child(left);
        right = XmlNode::new("n").with_child(right);
    }
    let rules = RuleSet::default();
    let graph = compare(&left, &right, &rules);

    assert_eq!(graph.len(), depth + 2);
    assert_eq!(graph.differences().len(), 2);
    assert!(graph.node(graph.root()).has_different_descendant());
    assert_eq!(graph.iter().map(|(_, d)| d).max(), Some(depth));
}
