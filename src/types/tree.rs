//! Ordered multi-way tree.
//!
//! Nodes live in an arena owned by the [`Tree`] and are addressed by
//! [`NodeId`]. Children are owned top-down; the parent link is a plain
//! index used for walking back up while building a patch.

/// Handle to a node in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct TreeNode<T> {
    value: T,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A tree holding one value per node.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    nodes: Vec<TreeNode<T>>,
}

impl<T> Tree<T> {
    /// Create a tree with a single root node.
    pub fn new(root: T) -> Self {
        Self {
            nodes: vec![TreeNode {
                value: root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn value(&self, id: NodeId) -> &T {
        &self.nodes[id.0].value
    }

    pub fn value_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.nodes[id.0].value
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Immediate children of a node, in insertion order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id.0].children.is_empty()
    }

    /// Append a new leaf holding `value` under `parent`.
    pub fn add(&mut self, parent: NodeId, value: T) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            value,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append several leaves under `parent`, keeping their order.
    pub fn add_children(&mut self, parent: NodeId, values: impl IntoIterator<Item = T>) -> Vec<NodeId> {
        values.into_iter().map(|value| self.add(parent, value)).collect()
    }

    /// Graft another tree as the last child of `parent`.
    ///
    /// The subtree's nodes move into this tree's arena; the returned id is
    /// the grafted root.
    pub fn add_branch(&mut self, parent: NodeId, branch: Tree<T>) -> NodeId {
        let offset = self.nodes.len();
        let shift = |id: NodeId| NodeId(id.0 + offset);

        for node in branch.nodes {
            self.nodes.push(TreeNode {
                value: node.value,
                parent: node.parent.map(shift),
                children: node.children.into_iter().map(shift).collect(),
            });
        }

        let grafted = NodeId(offset);
        self.nodes[offset].parent = Some(parent);
        self.nodes[parent.0].children.push(grafted);
        grafted
    }

    /// Depth-first pre-order traversal from the root.
    pub fn iter(&self) -> Iter<'_, T> {
        self.iter_from(self.root())
    }

    /// Depth-first pre-order traversal of the subtree under `start`.
    ///
    /// Depths are relative to `start`, which is visited at depth 0.
    pub fn iter_from(&self, start: NodeId) -> Iter<'_, T> {
        Iter {
            tree: self,
            stack: vec![(start, 0)],
        }
    }

    /// Call `f` for every node in traversal order.
    pub fn apply<F>(&self, mut f: F)
    where
        F: FnMut(NodeId, &T, usize),
    {
        for (id, value, depth) in self.iter() {
            f(id, value, depth);
        }
    }
}

/// Pre-order iterator yielding `(id, value, depth)`.
#[derive(Debug)]
pub struct Iter<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<(NodeId, usize)>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (NodeId, &'a T, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        let node = &self.tree.nodes[id.0];

        self.stack
            .extend(node.children.iter().rev().map(|&child| (child, depth + 1)));

        Some((id, &node.value, depth))
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = (NodeId, &'a T, usize);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Trees are equal when their traversals visit equal values at equal
/// depths, regardless of how the arenas are laid out.
impl<T: PartialEq> PartialEq for Tree<T> {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((_, a, da), (_, b, db))| da == db && a == b)
    }
}

impl<T: Eq> Eq for Tree<T> {}
