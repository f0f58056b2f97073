use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::compare::differences::DifferenceIndex;
use crate::compare::state::{MovedState, NodeStatus};
use crate::tree::XmlNode;

/// Handle of a comparison node inside its [`ComparisonGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ComparisonId(usize);

impl ComparisonId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle of a side wrapper inside one side's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WrapperId(usize);

impl WrapperId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Structural position of a pairing: sibling indices from the root plus the
/// element name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NodeKey {
    pub path: Vec<usize>,
    pub name: String,
}

impl NodeKey {
    pub fn new(path: Vec<usize>, name: impl Into<String>) -> Self {
        Self {
            path,
            name: name.into(),
        }
    }

    /// Key of the child at sibling `index` named `name`.
    pub fn child(&self, index: usize, name: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(index);
        Self::new(path, name)
    }
}

impl Display for NodeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}@", self.name)?;
        if self.path.is_empty() {
            return f.write_str("/");
        }
        for index in &self.path {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

/// One side of a pairing. A wrapper without a node is a phantom standing in
/// for an element that only exists on the other side.
#[derive(Debug, Clone)]
pub struct SideWrapper<'a> {
    node: Option<&'a XmlNode>,
    name: String,
    parent: Option<WrapperId>,
    children: Vec<WrapperId>,
    index: Option<usize>,
    comparison: Option<ComparisonId>,
}

impl<'a> SideWrapper<'a> {
    pub fn node(&self) -> Option<&'a XmlNode> {
        self.node
    }

    pub fn is_phantom(&self) -> bool {
        self.node.is_none()
    }

    /// Element name; a phantom carries its counterpart's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<WrapperId> {
        self.parent
    }

    /// Children on this side after phantom insertion.
    pub fn children(&self) -> &[WrapperId] {
        &self.children
    }

    /// Sibling index in the source document. `None` for phantoms.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn comparison(&self) -> Option<ComparisonId> {
        self.comparison
    }

    pub fn line(&self) -> Option<usize> {
        self.node.and_then(|node| node.line)
    }
}

/// Pairing of a left and a right wrapper.
#[derive(Debug, Clone)]
pub struct ComparisonNode {
    left: WrapperId,
    right: WrapperId,
    status: NodeStatus,
    moved: MovedState,
    key: NodeKey,
    parent: Option<ComparisonId>,
    children: Vec<ComparisonId>,
    has_different_descendant: bool,
}

impl ComparisonNode {
    pub fn left(&self) -> WrapperId {
        self.left
    }

    pub fn right(&self) -> WrapperId {
        self.right
    }

    pub fn wrapper(&self, side: Side) -> WrapperId {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn status(&self) -> NodeStatus {
        self.status
    }

    /// Move state as seen from the left document.
    pub fn moved(&self) -> MovedState {
        self.moved
    }

    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    pub fn parent(&self) -> Option<ComparisonId> {
        self.parent
    }

    pub fn children(&self) -> &[ComparisonId] {
        &self.children
    }

    /// True when any node below this one is not unchanged.
    pub fn has_different_descendant(&self) -> bool {
        self.has_different_descendant
    }
}

/// Counts per status over a whole graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub unchanged: usize,
    pub new: usize,
    pub deleted: usize,
    pub updated: usize,
    pub moved: usize,
}

impl Summary {
    pub fn changed(&self) -> usize {
        self.new + self.deleted + self.updated
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unchanged={} new={} deleted={} updated={} moved={}",
            self.unchanged, self.new, self.deleted, self.updated, self.moved
        )
    }
}

/// Result of a comparison run: comparison nodes in an arena, one wrapper
/// arena per side, and the index of differences.
///
/// The graph borrows the compared trees. The root pairing always exists.
#[derive(Debug, Clone)]
pub struct ComparisonGraph<'a> {
    nodes: Vec<ComparisonNode>,
    left: Vec<SideWrapper<'a>>,
    right: Vec<SideWrapper<'a>>,
    keys: HashMap<NodeKey, ComparisonId>,
    differences: DifferenceIndex,
}

impl<'a> ComparisonGraph<'a> {
    /// Graph holding only the root pairing of `left` and `right`.
    pub(crate) fn with_roots(left: &'a XmlNode, right: &'a XmlNode) -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            left: Vec::new(),
            right: Vec::new(),
            keys: HashMap::new(),
            differences: DifferenceIndex::default(),
        };
        let left_root = graph.new_wrapper(Side::Left, Some(left), &left.tag, None, Some(0));
        let right_root = graph.new_wrapper(Side::Right, Some(right), &right.tag, None, Some(0));
        graph.new_comparison(
            left_root,
            right_root,
            NodeKey::new(Vec::new(), left.tag.clone()),
            MovedState::None,
        );
        graph
    }

    pub(crate) fn new_wrapper(
        &mut self,
        side: Side,
        node: Option<&'a XmlNode>,
        name: &str,
        parent: Option<WrapperId>,
        index: Option<usize>,
    ) -> WrapperId {
        let arena = self.arena_mut(side);
        let id = WrapperId(arena.len());
        arena.push(SideWrapper {
            node,
            name: name.to_string(),
            parent,
            children: Vec::new(),
            index,
            comparison: None,
        });
        id
    }

    /// Append `child` to the projected children of `parent`.
    pub(crate) fn push_projected(&mut self, side: Side, parent: WrapperId, child: WrapperId) {
        self.arena_mut(side)[parent.0].children.push(child);
    }

    /// Insert `child` into the projected children of `parent` at `position`,
    /// clamped to the end of the list.
    pub(crate) fn insert_projected(
        &mut self,
        side: Side,
        parent: WrapperId,
        position: usize,
        child: WrapperId,
    ) {
        let children = &mut self.arena_mut(side)[parent.0].children;
        let position = position.min(children.len());
        children.insert(position, child);
    }

    /// Create an unlinked comparison node. The first key registration wins.
    pub(crate) fn new_comparison(
        &mut self,
        left: WrapperId,
        right: WrapperId,
        key: NodeKey,
        moved: MovedState,
    ) -> ComparisonId {
        let id = ComparisonId(self.nodes.len());
        self.left[left.0].comparison = Some(id);
        self.right[right.0].comparison = Some(id);
        self.keys.entry(key.clone()).or_insert(id);
        self.nodes.push(ComparisonNode {
            left,
            right,
            status: NodeStatus::Unchanged,
            moved,
            key,
            parent: None,
            children: Vec::new(),
            has_different_descendant: false,
        });
        id
    }

    /// Set the status of `id`. A changed status flags every ancestor,
    /// stopping at the first one already flagged.
    pub(crate) fn mark_status(&mut self, id: ComparisonId, status: NodeStatus) {
        self.nodes[id.0].status = status;
        if status.is_changed() {
            self.flag_ancestors(id);
        }
    }

    /// Link `child` under `parent`, propagating the difference flag when the
    /// child or its subtree is already changed.
    pub(crate) fn add_child(&mut self, parent: ComparisonId, child: ComparisonId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        let node = &self.nodes[child.0];
        if node.status.is_changed() || node.has_different_descendant {
            self.flag_ancestors(child);
        }
    }

    fn flag_ancestors(&mut self, id: ComparisonId) {
        let mut current = self.nodes[id.0].parent;
        while let Some(ancestor) = current {
            let node = &mut self.nodes[ancestor.0];
            if node.has_different_descendant {
                break;
            }
            node.has_different_descendant = true;
            current = node.parent;
        }
    }

    pub fn root(&self) -> ComparisonId {
        ComparisonId(0)
    }

    pub fn node(&self, id: ComparisonId) -> &ComparisonNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: ComparisonId) -> &[ComparisonId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: ComparisonId) -> Option<ComparisonId> {
        self.nodes[id.0].parent
    }

    pub fn status(&self, id: ComparisonId) -> NodeStatus {
        self.nodes[id.0].status
    }

    pub fn wrapper(&self, side: Side, id: WrapperId) -> &SideWrapper<'a> {
        &self.arena(side)[id.0]
    }

    /// Wrapper of `id` on `side`.
    pub fn side(&self, id: ComparisonId, side: Side) -> &SideWrapper<'a> {
        self.wrapper(side, self.nodes[id.0].wrapper(side))
    }

    /// Underlying element of `id` on `side`; `None` when that side is a
    /// phantom.
    pub fn element(&self, id: ComparisonId, side: Side) -> Option<&'a XmlNode> {
        self.side(id, side).node
    }

    /// Element name of a pairing, taken from whichever side is real.
    pub fn name(&self, id: ComparisonId) -> &str {
        self.side(id, Side::Left).name()
    }

    pub fn projected_children(&self, side: Side, wrapper: WrapperId) -> &[WrapperId] {
        &self.arena(side)[wrapper.0].children
    }

    pub fn find_by_key(&self, key: &NodeKey) -> Option<ComparisonId> {
        self.keys.get(key).copied()
    }

    /// Number of comparison nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Comparison nodes in pre-order, children left to right.
    pub fn iter(&self) -> PreOrder<'_, 'a> {
        PreOrder {
            graph: self,
            stack: if self.nodes.is_empty() {
                Vec::new()
            } else {
                vec![(self.root(), 0)]
            },
        }
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for node in &self.nodes {
            match node.status {
                NodeStatus::Unchanged => summary.unchanged += 1,
                NodeStatus::New => summary.new += 1,
                NodeStatus::Deleted => summary.deleted += 1,
                NodeStatus::Updated => summary.updated += 1,
            }
            if node.moved.is_moved() {
                summary.moved += 1;
            }
        }
        summary
    }

    /// Document-level outcome: unchanged exactly when nothing differs.
    pub fn comparison_state(&self) -> NodeStatus {
        if self.differences.is_empty() {
            NodeStatus::Unchanged
        } else {
            NodeStatus::Updated
        }
    }

    /// Move state of `id` as seen from `side`. The right-hand view has the
    /// direction mirrored.
    pub fn side_moved_state(&self, id: ComparisonId, side: Side) -> MovedState {
        let moved = self.nodes[id.0].moved;
        match side {
            Side::Left => moved,
            Side::Right => moved.mirrored(),
        }
    }

    pub fn differences(&self) -> &DifferenceIndex {
        &self.differences
    }

    pub fn differences_mut(&mut self) -> &mut DifferenceIndex {
        &mut self.differences
    }

    fn arena(&self, side: Side) -> &[SideWrapper<'a>] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn arena_mut(&mut self, side: Side) -> &mut Vec<SideWrapper<'a>> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Pre-order walk over a [`ComparisonGraph`], yielding each node with its
/// depth below the root.
pub struct PreOrder<'g, 'a> {
    graph: &'g ComparisonGraph<'a>,
    stack: Vec<(ComparisonId, usize)>,
}

impl Iterator for PreOrder<'_, '_> {
    type Item = (ComparisonId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        self.stack.extend(
            self.graph.nodes[id.0]
                .children
                .iter()
                .rev()
                .map(|&child| (child, depth + 1)),
        );
        Some((id, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(graph: &mut ComparisonGraph<'_>, depth: usize) -> Vec<ComparisonId> {
        let mut ids = vec![graph.root()];
        for level in 0..depth {
            let parent = ids[level];
            let left = graph.new_wrapper(Side::Left, None, "n", None, None);
            let right = graph.new_wrapper(Side::Right, None, "n", None, None);
            let key = NodeKey::new(vec![0; level + 1], "n");
            let id = graph.new_comparison(left, right, key, MovedState::None);
            graph.add_child(parent, id);
            ids.push(id);
        }
        ids
    }

    #[test]
    fn changed_status_flags_all_ancestors() {
        let (a, b) = (XmlNode::new("r"), XmlNode::new("r"));
        let mut graph = ComparisonGraph::with_roots(&a, &b);
        let ids = chain(&mut graph, 3);

        graph.mark_status(ids[3], NodeStatus::Deleted);
        for id in &ids[..3] {
            assert!(graph.node(*id).has_different_descendant());
        }
        assert!(!graph.node(ids[3]).has_different_descendant());

        graph.mark_status(ids[3], NodeStatus::Unchanged);
        assert!(graph.node(ids[0]).has_different_descendant());
    }

    #[test]
    fn adding_changed_child_propagates() {
        let (a, b) = (XmlNode::new("r"), XmlNode::new("r"));
        let mut graph = ComparisonGraph::with_roots(&a, &b);
        let left = graph.new_wrapper(Side::Left, None, "x", None, None);
        let right = graph.new_wrapper(Side::Right, None, "x", None, None);
        let id = graph.new_comparison(left, right, NodeKey::new(vec![0], "x"), MovedState::None);
        graph.mark_status(id, NodeStatus::New);
        assert!(!graph.node(graph.root()).has_different_descendant());

        graph.add_child(graph.root(), id);
        assert!(graph.node(graph.root()).has_different_descendant());
        assert_eq!(graph.parent(id), Some(graph.root()));
    }

    #[test]
    fn pre_order_reports_depth() {
        let (a, b) = (XmlNode::new("r"), XmlNode::new("r"));
        let mut graph = ComparisonGraph::with_roots(&a, &b);
        let ids = chain(&mut graph, 2);
        let walked: Vec<_> = graph.iter().collect();
        assert_eq!(walked, vec![(ids[0], 0), (ids[1], 1), (ids[2], 2)]);
    }

    #[test]
    fn key_display() {
        assert_eq!(NodeKey::new(vec![], "root").to_string(), "root@/");
        assert_eq!(NodeKey::new(vec![0, 2], "item").to_string(), "item@/0/2");
    }

    #[test]
    fn right_view_mirrors_direction() {
        let (a, b) = (XmlNode::new("r"), XmlNode::new("r"));
        let mut graph = ComparisonGraph::with_roots(&a, &b);
        let left = graph.new_wrapper(Side::Left, None, "x", None, None);
        let right = graph.new_wrapper(Side::Right, None, "x", None, None);
        let id = graph.new_comparison(
            left,
            right,
            NodeKey::new(vec![0], "x"),
            MovedState::DownAndUpdated,
        );
        assert_eq!(graph.side_moved_state(id, Side::Left), MovedState::DownAndUpdated);
        assert_eq!(graph.side_moved_state(id, Side::Right), MovedState::UpAndUpdated);
    }
}
