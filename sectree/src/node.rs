use std::sync::Arc;

use crate::element::{BranchState, TreeElement};

/// Shared handle to a child node.
///
/// Successive tree versions share every subtree a toggle did not touch.
pub type NodeRef<E> = Arc<Node<E>>;

/// Recursive tree container: a leaf payload or a branch with ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<E> {
    Leaf(E),
    Branch {
        data: E,
        children: Vec<NodeRef<E>>,
        state: BranchState,
    },
}

impl<E: Clone> Node<E> {
    /// Create a leaf node.
    pub fn leaf(data: E) -> Self {
        Self::Leaf(data)
    }

    /// Create a branch node from owned children.
    pub fn branch(data: E, children: Vec<Node<E>>, state: BranchState) -> Self {
        Self::Branch {
            data,
            children: children.into_iter().map(Arc::new).collect(),
            state,
        }
    }

    /// Return the payload.
    pub fn data(&self) -> &E {
        match self {
            Self::Leaf(data) => data,
            Self::Branch { data, .. } => data,
        }
    }

    /// Return the expansion state (branches only).
    pub fn state(&self) -> Option<BranchState> {
        match self {
            Self::Leaf(_) => None,
            Self::Branch { state, .. } => Some(*state),
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Self::Branch { .. })
    }

    /// Return the children (branches only).
    pub fn children(&self) -> Option<&[NodeRef<E>]> {
        match self {
            Self::Leaf(_) => None,
            Self::Branch { children, .. } => Some(children),
        }
    }

    pub fn child_count(&self) -> usize {
        self.children().map_or(0, <[NodeRef<E>]>::len)
    }

    /// Flip the expansion flag. Leaves are left untouched.
    pub fn toggle(&mut self) {
        if let Self::Branch { state, .. } = self {
            state.toggle();
        }
    }

    /// Return a copy with the expansion flag flipped.
    ///
    /// Children are shared with `self`.
    pub fn toggled(&self) -> Self {
        let mut node = self.clone();
        node.toggle();
        node
    }

    /// Replace the payload, keeping children and state.
    pub fn set_data(&mut self, element: E) {
        match self {
            Self::Leaf(data) => *data = element,
            Self::Branch { data, .. } => *data = element,
        }
    }

    /// Append children. A leaf becomes an expanded branch.
    pub fn append_children<I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = Node<E>>,
    {
        self.children_mut().extend(nodes.into_iter().map(Arc::new));
    }

    /// Replace all children. A leaf becomes an expanded branch.
    pub fn replace_children(&mut self, nodes: Vec<NodeRef<E>>) {
        *self.children_mut() = nodes;
    }

    /// Replace the child at `index`.
    ///
    /// Returns `false` for leaves and out-of-range indices.
    pub fn replace_child(&mut self, index: usize, node: NodeRef<E>) -> bool {
        let Self::Branch { children, .. } = self else {
            return false;
        };
        let Some(slot) = children.get_mut(index) else {
            return false;
        };

        *slot = node;
        true
    }

    /// Insert a child at `index` (`index <= child_count`).
    ///
    /// Inserting at `0` into a leaf turns it into an expanded branch.
    pub fn insert_child(&mut self, index: usize, node: Node<E>) -> bool {
        if index > self.child_count() {
            return false;
        }

        self.children_mut().insert(index, Arc::new(node));
        true
    }

    /// Remove the child at `index`.
    ///
    /// A branch whose last child is removed becomes a leaf.
    pub fn remove_child(&mut self, index: usize) -> Option<NodeRef<E>> {
        let Self::Branch { children, .. } = self else {
            return None;
        };
        if index >= children.len() {
            return None;
        }

        let removed = children.remove(index);
        if children.is_empty() {
            self.demote();
        }
        Some(removed)
    }

    /// Drop all children and turn the node into a leaf.
    ///
    /// Returns the removed children, `None` if the node was already a leaf.
    pub fn remove_all_children(&mut self) -> Option<Vec<NodeRef<E>>> {
        let removed = match self {
            Self::Leaf(_) => return None,
            Self::Branch { children, .. } => std::mem::take(children),
        };
        self.demote();
        Some(removed)
    }

    fn children_mut(&mut self) -> &mut Vec<NodeRef<E>> {
        if let Self::Leaf(data) = self {
            *self = Self::Branch {
                data: data.clone(),
                children: Vec::new(),
                state: BranchState::Expanded,
            };
        }

        match self {
            Self::Branch { children, .. } => children,
            Self::Leaf(_) => unreachable!("leaf was promoted to a branch"),
        }
    }

    fn demote(&mut self) {
        *self = Self::Leaf(self.data().clone());
    }
}

impl<E: TreeElement> Node<E> {
    /// Find a direct child by element id.
    pub fn find_child(&self, id: &E::Id) -> Option<(usize, &NodeRef<E>)> {
        self.children()?
            .iter()
            .enumerate()
            .find(|(_, child)| child.data().id() == id)
    }

    /// Walk `path` (root-first ids, excluding this node) to a descendant.
    pub fn descendant(&self, path: &[E::Id]) -> Option<&Node<E>> {
        let Some((head, tail)) = path.split_first() else {
            return Some(self);
        };
        let (_, child) = self.find_child(head)?;
        child.descendant(tail)
    }
}

impl<E> Drop for Node<E> {
    /// Release descendants one by one so deep chains do not exhaust the
    /// stack through nested drops.
    fn drop(&mut self) {
        let Self::Branch { children, .. } = self else {
            return;
        };
        let mut pending = std::mem::take(children);
        while let Some(child) = pending.pop() {
            if let Ok(mut node) = Arc::try_unwrap(child) {
                if let Self::Branch { children, .. } = &mut node {
                    pending.append(children);
                }
            }
        }
    }
}
