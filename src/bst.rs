use std::{cmp::Ordering, ops::Deref};

use crate::{
    error::TreeError,
    node::{Node, NodeId},
    tree::{BinaryTree, MAX_RECURSION_DEPTH},
};

/// An unbalanced binary search tree of keys.
///
/// For every node, all keys in its left subtree are strictly less than its
/// own key, and all keys in its right subtree are greater than or equal to
/// it. Duplicate keys are permitted and always placed to the right.
///
/// No balancing is performed - inserting keys in sorted order produces a
/// tree with a height linear in the number of keys. Use [`AvlTree`] when the
/// input order is not known to be random.
///
/// All the traversals of [`BinaryTree`] are available through [`Deref`].
///
/// ```
/// use arbor::{BinarySearchTree, TreeError};
///
/// let mut t = [2, 5, 8, 1, 3].into_iter().collect::<BinarySearchTree<_>>();
///
/// assert_eq!(t.minimum(), Ok(&1));
/// assert_eq!(t.successor(&3), Ok(&5));
/// assert_eq!(t.rank(&3), Some(2));
///
/// assert_eq!(t.remove(&5), Ok(5));
/// assert_eq!(t.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 8]);
/// assert_eq!(t.successor(&8), Err(TreeError::NoSuccessor));
/// ```
///
/// [`AvlTree`]: crate::AvlTree
#[derive(Debug, Clone)]
pub struct BinarySearchTree<K>(BinaryTree<K>);

impl<K> Default for BinarySearchTree<K> {
    fn default() -> Self {
        Self(BinaryTree::default())
    }
}

impl<K> Deref for BinarySearchTree<K> {
    type Target = BinaryTree<K>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<K> BinarySearchTree<K> {
    /// Construct an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all keys from the tree.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Wrap `tree` without checking the search order invariant.
    #[cfg(test)]
    pub(crate) fn from_tree_unchecked(tree: BinaryTree<K>) -> Self {
        Self(tree)
    }

    /// Mutable access to the underlying structure, for layers that restore
    /// their own invariants after restructuring it.
    pub(crate) fn tree_mut(&mut self) -> &mut BinaryTree<K> {
        &mut self.0
    }

    /// Return the left-most (minimum) node of the subtree rooted at `id`.
    fn subtree_min(&self, id: NodeId) -> NodeId {
        let mut ptr = id;
        while let Some(v) = self.0.nodes[ptr].left {
            ptr = v;
        }
        ptr
    }

    /// Return the right-most (maximum) node of the subtree rooted at `id`.
    fn subtree_max(&self, id: NodeId) -> NodeId {
        let mut ptr = id;
        while let Some(v) = self.0.nodes[ptr].right {
            ptr = v;
        }
        ptr
    }

    /// Return the node visited immediately after `id` in an in-order walk,
    /// if any.
    fn successor_node(&self, id: NodeId) -> Option<NodeId> {
        if let Some(right) = self.0.nodes[id].right {
            return Some(self.subtree_min(right));
        }

        // Walk up while "child" is a right child. The first ancestor reached
        // from its left subtree is the successor.
        let mut child = id;
        let mut parent = self.0.nodes[id].parent;
        while let Some(p) = parent {
            if self.0.nodes[p].right != Some(child) {
                break;
            }
            child = p;
            parent = self.0.nodes[p].parent;
        }

        parent
    }

    /// Return the node visited immediately before `id` in an in-order walk,
    /// if any.
    fn predecessor_node(&self, id: NodeId) -> Option<NodeId> {
        if let Some(left) = self.0.nodes[id].left {
            return Some(self.subtree_max(left));
        }

        let mut child = id;
        let mut parent = self.0.nodes[id].parent;
        while let Some(p) = parent {
            if self.0.nodes[p].left != Some(child) {
                break;
            }
            child = p;
            parent = self.0.nodes[p].parent;
        }

        parent
    }

    /// Unlink and release the node `id`, returning its key and the lowest
    /// node whose subtree was restructured by the removal (if any), from
    /// which the ancestor chain may need rebalancing.
    ///
    /// The cached heights of that node and all its ancestors are refreshed.
    pub(crate) fn remove_node(&mut self, id: NodeId) -> (K, Option<NodeId>) {
        let n = &self.0.nodes[id];
        let (left, right, parent) = (n.left, n.right, n.parent);

        // The node to be removed may have 0, 1 or 2 children:
        //
        //                          +----------+
        //                          |  parent  |
        //                          +----------+
        //                                |
        //                                v
        //                          +----------+
        //                     +----|    id    |----+
        //                     |    +----------+    |
        //                     |                    |
        //                     v                    v
        //               +-----------+        +-----------+
        //               |   left    |        |   right   |
        //               +-----------+        +-----------+
        //
        // With at most one child, that child (or nothing) takes the place of
        // "id" in the parent.
        //
        // With both, the in-order successor of "id" (the minimum of "right")
        // is spliced out of its position and promoted into the place of "id".
        let lowest_changed = match (left, right) {
            (None, _) => {
                self.0.transplant(id, right);
                parent
            }
            (_, None) => {
                self.0.transplant(id, left);
                parent
            }
            (Some(left), Some(right)) => {
                // The successor is the left-most node of "right" and therefore
                // has no left child.
                let succ = self.subtree_min(right);
                debug_assert!(self.0.nodes[succ].left.is_none());

                let lowest = if succ != right {
                    // Replace the successor with its own right subtree, then
                    // hang "right" beneath it.
                    //
                    // ```text
                    //        id                 id
                    //       /  \               /  \
                    //      L    R             L    R
                    //          /      ->          /
                    //        succ                x
                    //          \
                    //           x
                    // ```
                    let succ_parent = self.0.nodes[succ].parent;
                    let succ_right = self.0.nodes[succ].right;
                    self.0.transplant(succ, succ_right);
                    self.0.set_right(succ, Some(right));

                    log::trace!("spliced out successor {succ:?} from below {right:?}");
                    succ_parent
                } else {
                    Some(succ)
                };

                self.0.transplant(id, Some(succ));
                self.0.set_left(succ, Some(left));
                lowest
            }
        };

        self.0.nodes.update_heights_upwards(lowest_changed);
        log::trace!("removed {id:?}, lowest changed node {lowest_changed:?}");

        let node = self.0.nodes.release(id);
        (node.key, lowest_changed)
    }
}

impl<K> BinarySearchTree<K>
where
    K: Ord,
{
    /// Return the first node with a key equal to `key` found descending from
    /// the root, if any.
    pub(crate) fn find_node(&self, key: &K) -> Option<NodeId> {
        let mut ptr = self.0.root;

        while let Some(id) = ptr {
            let n = &self.0.nodes[id];
            ptr = match key.cmp(&n.key) {
                Ordering::Less => n.left,
                Ordering::Equal => return Some(id),
                Ordering::Greater => n.right,
            };
        }

        None
    }

    /// Return the stored key equal to `key`, if any.
    ///
    /// When duplicates are stored, the one nearest the root is returned.
    /// Runs in `O(height)` time.
    pub fn search(&self, key: &K) -> Option<&K> {
        self.find_node(key).map(|v| self.0.key(v))
    }

    /// Returns true if a key equal to `key` is stored in the tree.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find_node(key).is_some()
    }

    /// Return the smallest key in the tree.
    pub fn minimum(&self) -> Result<&K, TreeError> {
        let root = self.0.root.ok_or(TreeError::EmptyTree)?;
        Ok(self.0.key(self.subtree_min(root)))
    }

    /// Return the largest key in the tree.
    pub fn maximum(&self) -> Result<&K, TreeError> {
        let root = self.0.root.ok_or(TreeError::EmptyTree)?;
        Ok(self.0.key(self.subtree_max(root)))
    }

    /// Return the key that follows `key` in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyTree`] if the tree is empty,
    /// [`TreeError::ValueNotFound`] if `key` is not stored, and
    /// [`TreeError::NoSuccessor`] if `key` is the maximum.
    pub fn successor(&self, key: &K) -> Result<&K, TreeError> {
        if self.0.is_empty() {
            return Err(TreeError::EmptyTree);
        }

        let id = self.find_node(key).ok_or(TreeError::ValueNotFound)?;
        self.successor_node(id)
            .map(|v| self.0.key(v))
            .ok_or(TreeError::NoSuccessor)
    }

    /// Return the key that precedes `key` in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyTree`] if the tree is empty,
    /// [`TreeError::ValueNotFound`] if `key` is not stored, and
    /// [`TreeError::NoPredecessor`] if `key` is the minimum.
    pub fn predecessor(&self, key: &K) -> Result<&K, TreeError> {
        if self.0.is_empty() {
            return Err(TreeError::EmptyTree);
        }

        let id = self.find_node(key).ok_or(TreeError::ValueNotFound)?;
        self.predecessor_node(id)
            .map(|v| self.0.key(v))
            .ok_or(TreeError::NoPredecessor)
    }

    /// Return the zero-based position of the first occurrence of `key` in
    /// ascending order, or [`None`] if it is not stored.
    pub fn rank(&self, key: &K) -> Option<usize> {
        self.0.iter().position(|v| v == key)
    }

    /// Insert `key` into the tree.
    ///
    /// The insertion point is located by an iterative descent, so arbitrarily
    /// deep (unbalanced) trees are supported.
    pub fn insert(&mut self, key: K) {
        self.insert_node(key);
    }

    /// Insert `key` into the tree, returning the newly created leaf.
    pub(crate) fn insert_node(&mut self, key: K) -> NodeId {
        let mut parent = None;
        let mut go_left = false;
        let mut ptr = self.0.root;

        // Descend to the empty slot the key belongs in, tracking the node
        // that will become its parent.
        while let Some(id) = ptr {
            let n = &self.0.nodes[id];
            parent = Some(id);
            go_left = key < n.key;
            ptr = if go_left { n.left } else { n.right };
        }

        let id = self.0.nodes.alloc(Node::new(key, parent));
        match parent {
            None => self.0.root = Some(id),
            Some(p) if go_left => self.0.nodes[p].left = Some(id),
            Some(p) => self.0.nodes[p].right = Some(id),
        }

        self.0.nodes.update_heights_upwards(parent);
        id
    }

    /// Insert `key` into the tree by recursive descent, relinking each child
    /// to its parent on the way back up.
    ///
    /// Produces the same shape as [`BinarySearchTree::insert()`]. The call
    /// depth is bounded by the tree height, which may be linear in the number
    /// of keys for adversarial (e.g. sorted) input. Trees with a height above
    /// 256 are instead descended iteratively by
    /// [`BinarySearchTree::insert()`].
    pub fn insert_recursive(&mut self, key: K) {
        if self.0.height() > MAX_RECURSION_DEPTH {
            return self.insert(key);
        }

        let root = self.insert_at(self.0.root, key);
        self.0.root = Some(root);
        self.0.nodes[root].parent = None;
    }

    fn insert_at(&mut self, ptr: Option<NodeId>, key: K) -> NodeId {
        let Some(id) = ptr else {
            return self.0.nodes.alloc(Node::new(key, None));
        };

        let n = &self.0.nodes[id];
        let (left, right) = (n.left, n.right);
        if key < n.key {
            let child = self.insert_at(left, key);
            self.0.set_left(id, Some(child));
        } else {
            let child = self.insert_at(right, key);
            self.0.set_right(id, Some(child));
        }

        self.0.nodes.update_height(id);
        id
    }

    /// Remove one occurrence of `key` from the tree, returning the stored
    /// key.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyTree`] if the tree is empty, and
    /// [`TreeError::ValueNotFound`] if `key` is not stored. The tree is not
    /// modified in either case.
    pub fn remove(&mut self, key: &K) -> Result<K, TreeError> {
        if self.0.is_empty() {
            return Err(TreeError::EmptyTree);
        }

        let id = self.find_node(key).ok_or(TreeError::ValueNotFound)?;
        Ok(self.remove_node(id).0)
    }
}

impl<K> FromIterator<K> for BinarySearchTree<K>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut this = Self::default();
        this.extend(iter);
        this
    }
}

impl<K> Extend<K> for BinarySearchTree<K>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for v in iter {
            self.insert(v);
        }
    }
}
