use std::ops::{Index, IndexMut};

/// A handle to a [`Node`] stored in an [`Arena`].
///
/// Handles are only meaningful for the arena that issued them, and only until
/// the node they refer to is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

#[derive(Debug, Clone)]
pub(crate) struct Node<K> {
    pub(crate) key: K,

    /// Child node links.
    ///
    /// A node logically owns its children: they are released with it when
    /// the tree is cleared or dropped.
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,

    /// A back-reference to the node that holds this node as a child, or
    /// [`None`] for the root.
    ///
    /// This link is a relation only - it is never followed to release memory.
    pub(crate) parent: Option<NodeId>,

    /// The height of the subtree rooted at this node.
    ///
    /// A leaf has a height of 0. Callers mutating the structure are
    /// responsible for refreshing it (see [`Arena::update_height()`]).
    pub(crate) height: usize,
}

impl<K> Node<K> {
    pub(crate) fn new(key: K, parent: Option<NodeId>) -> Self {
        Self {
            key,
            left: None,
            right: None,
            parent,
            height: 0,
        }
    }
}

/// Slot storage for the nodes of a single tree.
///
/// Released slots are recycled by subsequent allocations, so the backing
/// [`Vec`] never grows beyond the peak number of live nodes.
#[derive(Debug, Clone)]
pub(crate) struct Arena<K> {
    slots: Vec<Option<Node<K>>>,
    free: Vec<usize>,
    len: usize,
}

impl<K> Default for Arena<K> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }
}

impl<K> Arena<K> {
    /// Store `node`, returning the handle to access it.
    pub(crate) fn alloc(&mut self, node: Node<K>) -> NodeId {
        self.len += 1;

        match self.free.pop() {
            Some(idx) => {
                debug_assert!(self.slots[idx].is_none());
                self.slots[idx] = Some(node);
                NodeId(idx)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Release the node referenced by `id`, returning it.
    ///
    /// The caller must have unlinked the node from the tree beforehand.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a live node.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<K> {
        let Some(node) = self.slots[id.0].take() else {
            unreachable!("release of vacant node slot {id:?}");
        };
        self.free.push(id.0);
        self.len -= 1;
        node
    }

    /// The number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }

    /// Recompute the cached height of `id` from its direct children.
    pub(crate) fn update_height(&mut self, id: NodeId) {
        let n = &self[id];

        // Correctness: an absent child has a height of -1, so the result is
        // always >= 0.
        let h = self.height(n.left).max(self.height(n.right)) + 1;
        self[id].height = h as usize;
    }

    /// Refresh the cached heights of `from` and every ancestor of it, up to
    /// and including the root.
    pub(crate) fn update_heights_upwards(&mut self, from: Option<NodeId>) {
        let mut ptr = from;
        while let Some(id) = ptr {
            self.update_height(id);
            ptr = self[id].parent;
        }
    }

    /// The height of the (possibly absent) subtree rooted at `id`.
    ///
    /// An absent subtree has a height of -1, a single node a height of 0.
    pub(crate) fn height(&self, id: Option<NodeId>) -> isize {
        id.map(|v| self[v].height as isize).unwrap_or(-1)
    }

    /// Compute the "balance factor" of the subtree rooted at `id`.
    ///
    /// Returns a positive number when left heavy, and a negative number when
    /// right heavy.
    pub(crate) fn balance(&self, id: NodeId) -> isize {
        self.height(self[id].left) - self.height(self[id].right)
    }
}

impl<K> Index<NodeId> for Arena<K> {
    type Output = Node<K>;

    fn index(&self, id: NodeId) -> &Self::Output {
        match self.slots.get(id.0) {
            Some(Some(n)) => n,
            _ => unreachable!("dangling node id {id:?}"),
        }
    }
}

impl<K> IndexMut<NodeId> for Arena<K> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match self.slots.get_mut(id.0) {
            Some(Some(n)) => n,
            _ => unreachable!("dangling node id {id:?}"),
        }
    }
}
