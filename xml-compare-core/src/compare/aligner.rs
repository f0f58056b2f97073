use std::collections::HashSet;

use tracing::debug;

use crate::compare::graph::{ComparisonGraph, ComparisonId, NodeKey, Side, WrapperId};
use crate::compare::state::{Direction, MovedState, NodeStatus};
use crate::equality::{self, ContentStatus};
use crate::rules::RuleSet;
use crate::tree::XmlNode;

/// Compare two documents under `rules`.
///
/// The roots are always paired. Child lists are aligned first-fit: each left
/// child takes the first unused right sibling that is not
/// [`ContentStatus::Different`] under the left child's rule. Unpaired nodes
/// get a phantom counterpart on the other side.
pub fn compare<'a>(left: &'a XmlNode, right: &'a XmlNode, rules: &RuleSet) -> ComparisonGraph<'a> {
    let mut graph = ComparisonGraph::with_roots(left, right);
    let root = graph.root();
    let root_status = if equality::structurally_equal(rules.resolve(&left.tag), left, right) {
        NodeStatus::Unchanged
    } else {
        NodeStatus::Updated
    };
    graph.mark_status(root, root_status);

    let mut aligner = Aligner { graph, rules };
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if aligner.graph.status(id).is_changed() {
            aligner.graph.differences_mut().push(id);
        }
        let children = aligner.align_children(id);
        stack.extend(children.into_iter().rev());
    }

    let graph = aligner.graph;
    debug!(
        nodes = graph.len(),
        differences = graph.differences().len(),
        "comparison finished"
    );
    graph
}

/// Status and move state of a candidate pairing, or `None` when the nodes
/// are not the same logical node.
pub fn classify(
    content: ContentStatus,
    left_index: usize,
    right_index: usize,
    order_significant: bool,
) -> Option<(NodeStatus, MovedState)> {
    let same_index = left_index == right_index;
    let direction = Direction::between(left_index, right_index);
    let classified = match (content, same_index, order_significant) {
        (ContentStatus::Different, _, _) => return None,
        (ContentStatus::Identical, true, _) => (NodeStatus::Unchanged, MovedState::None),
        (ContentStatus::Updated, true, _) => (NodeStatus::Updated, MovedState::None),
        (_, false, true) => (NodeStatus::Updated, MovedState::then_updated(direction)),
        (ContentStatus::Identical, false, false) => {
            (NodeStatus::Unchanged, MovedState::moved(direction))
        }
        (ContentStatus::Updated, false, false) => {
            (NodeStatus::Updated, MovedState::and_updated(direction))
        }
    };
    Some(classified)
}

struct Aligner<'a, 'r> {
    graph: ComparisonGraph<'a>,
    rules: &'r RuleSet,
}

impl<'a> Aligner<'a, '_> {
    /// Create the child pairings of `id` and return them in order.
    fn align_children(&mut self, id: ComparisonId) -> Vec<ComparisonId> {
        let node = self.graph.node(id);
        let (left_wrapper, right_wrapper) = (node.left(), node.right());
        let key = node.key().clone();
        let left = self.graph.wrapper(Side::Left, left_wrapper).node();
        let right = self.graph.wrapper(Side::Right, right_wrapper).node();

        match (left, right) {
            (Some(left), Some(right)) => {
                self.align_pair(id, &key, (left_wrapper, left), (right_wrapper, right))
            }
            (Some(left), None) => self.cascade(
                id,
                &key,
                Side::Left,
                (left_wrapper, left),
                right_wrapper,
                NodeStatus::Deleted,
            ),
            (None, Some(right)) => self.cascade(
                id,
                &key,
                Side::Right,
                (right_wrapper, right),
                left_wrapper,
                NodeStatus::New,
            ),
            (None, None) => Vec::new(),
        }
    }

    fn align_pair(
        &mut self,
        parent: ComparisonId,
        key: &NodeKey,
        (left_wrapper, left): (WrapperId, &'a XmlNode),
        (right_wrapper, right): (WrapperId, &'a XmlNode),
    ) -> Vec<ComparisonId> {
        let rules = self.rules;
        let left_children = self.real_children(Side::Left, left_wrapper, left);
        let right_children = self.real_children(Side::Right, right_wrapper, right);

        let mut used = HashSet::new();
        let mut created = Vec::with_capacity(left.children.len().max(right.children.len()));

        for (left_index, left_child) in left.children.iter().enumerate() {
            let rule = rules.resolve(&left_child.tag);
            let matched = right
                .children
                .iter()
                .enumerate()
                .filter(|(right_index, _)| !used.contains(right_index))
                .find_map(|(right_index, right_child)| {
                    let content = equality::status(rule, left_child, right_child);
                    classify(content, left_index, right_index, rule.order_significant)
                        .map(|classified| (right_index, classified))
                });

            let child_key = key.child(left_index, &left_child.tag);
            let id = match matched {
                Some((right_index, (status, moved))) => {
                    used.insert(right_index);
                    self.link(
                        parent,
                        (left_children[left_index], right_children[right_index]),
                        child_key,
                        moved,
                        status,
                    )
                }
                None => {
                    let previous = left_index.checked_sub(1).map(|p| left_children[p]);
                    let phantom = self.insert_phantom(
                        Side::Right,
                        right_wrapper,
                        left_children[left_index],
                        previous,
                    );
                    self.link(
                        parent,
                        (left_children[left_index], phantom),
                        child_key,
                        MovedState::None,
                        NodeStatus::Deleted,
                    )
                }
            };
            created.push(id);
        }

        for (right_index, right_child) in right.children.iter().enumerate() {
            if used.contains(&right_index) {
                continue;
            }
            let previous = right_index.checked_sub(1).map(|p| right_children[p]);
            let phantom = self.insert_phantom(
                Side::Left,
                left_wrapper,
                right_children[right_index],
                previous,
            );
            let id = self.link(
                parent,
                (phantom, right_children[right_index]),
                key.child(right_index, &right_child.tag),
                MovedState::None,
                NodeStatus::New,
            );
            created.push(id);
        }

        created
    }

    /// Pair every child of a one-sided node with a phantom.
    fn cascade(
        &mut self,
        parent: ComparisonId,
        key: &NodeKey,
        real_side: Side,
        (real_wrapper, real): (WrapperId, &'a XmlNode),
        phantom_parent: WrapperId,
        status: NodeStatus,
    ) -> Vec<ComparisonId> {
        let real_children = self.real_children(real_side, real_wrapper, real);
        let mut created = Vec::with_capacity(real_children.len());

        for (index, child) in real.children.iter().enumerate() {
            let previous = index.checked_sub(1).map(|p| real_children[p]);
            let phantom = self.insert_phantom(
                real_side.opposite(),
                phantom_parent,
                real_children[index],
                previous,
            );
            let pair = match real_side {
                Side::Left => (real_children[index], phantom),
                Side::Right => (phantom, real_children[index]),
            };
            let id = self.link(
                parent,
                pair,
                key.child(index, &child.tag),
                MovedState::None,
                status,
            );
            created.push(id);
        }
        created
    }

    /// Wrap the children of `node` and append them to the projected list of
    /// `wrapper`.
    fn real_children(&mut self, side: Side, wrapper: WrapperId, node: &'a XmlNode) -> Vec<WrapperId> {
        let mut ids = Vec::with_capacity(node.children.len());
        for (index, child) in node.children.iter().enumerate() {
            let id = self
                .graph
                .new_wrapper(side, Some(child), &child.tag, Some(wrapper), Some(index));
            self.graph.push_projected(side, wrapper, id);
            ids.push(id);
        }
        ids
    }

    /// Create a phantom on `target` for `counterpart`.
    ///
    /// Without a previous sibling the phantom becomes the first projected
    /// child of `target_parent`. Otherwise it goes right after the partner of
    /// `previous`.
    fn insert_phantom(
        &mut self,
        target: Side,
        target_parent: WrapperId,
        counterpart: WrapperId,
        previous: Option<WrapperId>,
    ) -> WrapperId {
        let source = target.opposite();
        let name = self.graph.wrapper(source, counterpart).name().to_string();
        let phantom = self
            .graph
            .new_wrapper(target, None, &name, Some(target_parent), None);

        let position = match previous {
            None => 0,
            Some(previous) => {
                let partner = self
                    .graph
                    .wrapper(source, previous)
                    .comparison()
                    .map(|id| self.graph.node(id).wrapper(target));
                let siblings = self.graph.projected_children(target, target_parent);
                partner
                    .and_then(|partner| siblings.iter().position(|&sibling| sibling == partner))
                    .map_or(siblings.len(), |position| position + 1)
            }
        };
        self.graph
            .insert_projected(target, target_parent, position, phantom);
        phantom
    }

    fn link(
        &mut self,
        parent: ComparisonId,
        (left, right): (WrapperId, WrapperId),
        key: NodeKey,
        moved: MovedState,
        status: NodeStatus,
    ) -> ComparisonId {
        let id = self.graph.new_comparison(left, right, key, moved);
        self.graph.add_child(parent, id);
        self.graph.mark_status(id, status);
        id
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::rules::Rule;

    #[test]
    fn decision_table() {
        use ContentStatus::{Different, Identical, Updated};
        use MovedState as M;
        use NodeStatus as S;

        assert_eq!(classify(Different, 0, 0, true), None);
        assert_eq!(classify(Different, 0, 3, false), None);
        assert_eq!(classify(Identical, 1, 1, true), Some((S::Unchanged, M::None)));
        assert_eq!(classify(Identical, 1, 1, false), Some((S::Unchanged, M::None)));
        assert_eq!(classify(Updated, 2, 2, true), Some((S::Updated, M::None)));
        assert_eq!(classify(Identical, 0, 1, true), Some((S::Updated, M::DownThenUpdated)));
        assert_eq!(classify(Identical, 1, 0, true), Some((S::Updated, M::UpThenUpdated)));
        assert_eq!(classify(Identical, 0, 1, false), Some((S::Unchanged, M::Down)));
        assert_eq!(classify(Identical, 1, 0, false), Some((S::Unchanged, M::Up)));
        assert_eq!(classify(Updated, 0, 1, true), Some((S::Updated, M::DownThenUpdated)));
        assert_eq!(classify(Updated, 1, 0, false), Some((S::Updated, M::UpAndUpdated)));
        assert_eq!(classify(Updated, 0, 1, false), Some((S::Updated, M::DownAndUpdated)));
    }

    #[test]
    fn deleted_subtree_cascades_with_phantoms() {
        let left = XmlNode::new("r").with_child(
            XmlNode::new("group")
                .with_attr("k", "1")
                .with_child(XmlNode::new("a"))
                .with_child(XmlNode::new("b")),
        );
        let right = XmlNode::new("r").with_child(XmlNode::new("group").with_attr("k", "2"));
        let rules = RuleSet::default();
        let graph = compare(&left, &right, &rules);

        let root = graph.root();
        let statuses: Vec<_> = graph.iter().map(|(id, _)| graph.status(id)).collect();
        assert_eq!(
            statuses,
            vec![
                NodeStatus::Unchanged,
                NodeStatus::Deleted,
                NodeStatus::Deleted,
                NodeStatus::Deleted,
                NodeStatus::New,
            ]
        );

        let group = graph.children(root)[0];
        let phantom = graph.side(group, Side::Right);
        assert!(phantom.is_phantom());
        let names: Vec<_> = phantom
            .children()
            .iter()
            .map(|&w| graph.wrapper(Side::Right, w).name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);

        let right_root = graph.node(root).right();
        let projected: Vec<_> = graph
            .projected_children(Side::Right, right_root)
            .iter()
            .map(|&w| graph.wrapper(Side::Right, w).is_phantom())
            .collect();
        assert_eq!(projected, vec![true, false]);
    }

    #[test]
    fn new_subtree_cascades_on_left() {
        let left = XmlNode::new("r");
        let right = XmlNode::new("r")
            .with_child(XmlNode::new("x").with_child(XmlNode::new("y")));
        let rules = RuleSet::default();
        let graph = compare(&left, &right, &rules);

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.differences().len(), 2);
        let x = graph.children(graph.root())[0];
        let y = graph.children(x)[0];
        assert_eq!(graph.status(y), NodeStatus::New);
        assert!(graph.element(y, Side::Left).is_none());
        assert_eq!(graph.name(y), "y");
        assert_eq!(graph.node(y).key().to_string(), "y@/0/0");
    }

    #[test]
    fn rule_of_left_child_drives_matching() {
        let mut rules = RuleSet::default();
        rules.insert(Rule::new().with_identity(&["id"]), ["item"]);

        let left = XmlNode::new("r")
            .with_child(XmlNode::new("item").with_attr("id", "1").with_attr("v", "a"));
        let right = XmlNode::new("r")
            .with_child(XmlNode::new("item").with_attr("id", "1").with_attr("v", "b"));
        let graph = compare(&left, &right, &rules);

        let item = graph.children(graph.root())[0];
        assert_eq!(graph.status(item), NodeStatus::Updated);
        assert_eq!(graph.node(item).moved(), MovedState::None);
    }

    #[test]
    fn root_mismatch_is_updated_and_still_aligned() {
        let left = XmlNode::new("r").with_attr("v", "1").with_child(XmlNode::new("a"));
        let right = XmlNode::new("r").with_attr("v", "2").with_child(XmlNode::new("a"));
        let rules = RuleSet::default();
        let graph = compare(&left, &right, &rules);

        assert_eq!(graph.status(graph.root()), NodeStatus::Updated);
        assert_eq!(graph.differences().as_slice(), &[graph.root()]);
        assert_eq!(graph.status(graph.children(graph.root())[0]), NodeStatus::Unchanged);
    }
}
