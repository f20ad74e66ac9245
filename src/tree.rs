use std::collections::VecDeque;

use crate::{
    iter::Iter,
    node::{Arena, Node, NodeId},
};

/// Trees taller than this are walked with an explicit stack, even by the
/// recursive traversals, keeping the call depth bounded for degenerate
/// (unbalanced) shapes.
pub(crate) const MAX_RECURSION_DEPTH: isize = 256;

/// A binary tree of keys, without any ordering semantics.
///
/// This is the traversal substrate for [`BinarySearchTree`] and [`AvlTree`],
/// which both dereference to it - every traversal defined here is available
/// on those trees too.
///
/// A [`BinaryTree`] can be constructed directly from a level-order encoding
/// with [`BinaryTree::from_level_order()`]:
///
/// ```
/// use arbor::BinaryTree;
///
/// //        1
/// //       / \
/// //      2   3
/// //         / \
/// //        4   5
/// let t = BinaryTree::from_level_order([Some(1), Some(2), Some(3), None, None, Some(4), Some(5)]);
///
/// let mut keys = vec![];
/// t.in_order(|k| keys.push(*k));
/// assert_eq!(keys, [2, 1, 4, 3, 5]);
/// ```
///
/// [`BinarySearchTree`]: crate::BinarySearchTree
/// [`AvlTree`]: crate::AvlTree
#[derive(Debug, Clone)]
pub struct BinaryTree<K> {
    pub(crate) nodes: Arena<K>,
    pub(crate) root: Option<NodeId>,
}

impl<K> Default for BinaryTree<K> {
    fn default() -> Self {
        Self {
            nodes: Arena::default(),
            root: None,
        }
    }
}

impl<K> BinaryTree<K> {
    /// Construct an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a breadth-first sequence of optional keys, where
    /// [`None`] marks "no node here".
    ///
    /// Each present node, in breadth-first order, takes the next two
    /// unconsumed entries as its left and right child. An absent position has
    /// no children and consumes no further entries, so the encoding of a tree
    /// with `n` nodes holds at most `2n + 1` entries. Entries remaining once
    /// every node has taken its children have no parent to attach to and are
    /// discarded.
    ///
    /// An empty sequence, or one starting with [`None`], yields an empty
    /// tree.
    pub fn from_level_order<I>(encoding: I) -> Self
    where
        I: IntoIterator<Item = Option<K>>,
    {
        let mut this = Self::default();
        let mut values = encoding.into_iter();

        let root = match values.next() {
            Some(Some(v)) => this.nodes.alloc(Node::new(v, None)),
            _ => return this,
        };
        this.root = Some(root);

        // Every node in allocation order, which places all children after
        // their parent.
        let mut allocated = vec![root];

        let mut pending = VecDeque::from([root]);

        while let Some(parent) = pending.pop_front() {
            let Some(slot) = values.next() else { break };
            let left = slot.map(|v| this.nodes.alloc(Node::new(v, Some(parent))));
            this.nodes[parent].left = left;
            allocated.extend(left);
            pending.extend(left);

            let Some(slot) = values.next() else { break };
            let right = slot.map(|v| this.nodes.alloc(Node::new(v, Some(parent))));
            this.nodes[parent].right = right;
            allocated.extend(right);
            pending.extend(right);
        }

        let discarded = values.filter(Option::is_some).count();
        if discarded > 0 {
            log::debug!("discarding {discarded} level-order entries with no parent");
        }

        // Compute the subtree heights bottom-up.
        for &id in allocated.iter().rev() {
            this.nodes.update_height(id);
        }

        this
    }

    /// Returns true if the tree contains no nodes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The number of edges on the longest path from the root to a leaf.
    ///
    /// A tree with a single node has a height of 0, and an empty tree has a
    /// height of -1. Per-node heights are maintained incrementally as the
    /// tree is modified, so this is a constant-time read.
    pub fn height(&self) -> isize {
        self.nodes.height(self.root)
    }

    /// The key held in the root node, if any.
    pub fn root(&self) -> Option<&K> {
        self.root.map(|v| &self.nodes[v].key)
    }

    /// Remove all nodes from the tree.
    pub fn clear(&mut self) {
        self.root = None;
        self.nodes.clear();
    }

    /// Return an iterator of keys in ascending (in-order) order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self)
    }

    /// Emit the level-order encoding of this tree, the inverse of
    /// [`BinaryTree::from_level_order()`].
    ///
    /// Only present nodes emit child positions, and trailing absent markers
    /// are omitted, so the encoding holds at most `2 * len + 1` entries
    /// regardless of the tree shape.
    pub fn to_level_order(&self) -> Vec<Option<K>>
    where
        K: Clone,
    {
        let Some(root) = self.root else {
            return vec![];
        };

        let mut out = Vec::with_capacity(2 * self.len() + 1);
        out.push(Some(self.nodes[root].key.clone()));

        let mut queue = VecDeque::from([root]);
        while let Some(id) = queue.pop_front() {
            let n = &self.nodes[id];
            for child in [n.left, n.right] {
                out.push(child.map(|v| self.nodes[v].key.clone()));
                queue.extend(child);
            }
        }

        while matches!(out.last(), Some(None)) {
            out.pop();
        }

        out
    }

    /// Visit each key in pre-order (node, left, right) by recursion.
    ///
    /// The call depth is bounded by the tree height. Trees with a height
    /// above 256 are instead walked by
    /// [`BinaryTree::pre_order_iter()`].
    pub fn pre_order<F>(&self, mut f: F)
    where
        F: FnMut(&K),
    {
        if self.height() > MAX_RECURSION_DEPTH {
            return self.pre_order_iter(f);
        }
        self.pre_order_from(self.root, &mut f);
    }

    fn pre_order_from<F>(&self, id: Option<NodeId>, f: &mut F)
    where
        F: FnMut(&K),
    {
        let Some(id) = id else { return };
        let n = &self.nodes[id];
        f(&n.key);
        self.pre_order_from(n.left, f);
        self.pre_order_from(n.right, f);
    }

    /// Visit each key in-order (left, node, right) by recursion.
    ///
    /// The call depth is bounded by the tree height. Trees with a height
    /// above 256 are instead walked by
    /// [`BinaryTree::in_order_iter()`].
    pub fn in_order<F>(&self, mut f: F)
    where
        F: FnMut(&K),
    {
        if self.height() > MAX_RECURSION_DEPTH {
            return self.in_order_iter(f);
        }
        self.in_order_from(self.root, &mut f);
    }

    fn in_order_from<F>(&self, id: Option<NodeId>, f: &mut F)
    where
        F: FnMut(&K),
    {
        let Some(id) = id else { return };
        let n = &self.nodes[id];
        self.in_order_from(n.left, f);
        f(&n.key);
        self.in_order_from(n.right, f);
    }

    /// Visit each key in post-order (left, right, node) by recursion.
    ///
    /// The call depth is bounded by the tree height. Trees with a height
    /// above 256 are instead walked by
    /// [`BinaryTree::post_order_iter_one_stack()`].
    pub fn post_order<F>(&self, mut f: F)
    where
        F: FnMut(&K),
    {
        if self.height() > MAX_RECURSION_DEPTH {
            return self.post_order_iter_one_stack(f);
        }
        self.post_order_from(self.root, &mut f);
    }

    fn post_order_from<F>(&self, id: Option<NodeId>, f: &mut F)
    where
        F: FnMut(&K),
    {
        let Some(id) = id else { return };
        let n = &self.nodes[id];
        self.post_order_from(n.left, f);
        self.post_order_from(n.right, f);
        f(&n.key);
    }

    /// Visit each key in pre-order using an explicit stack.
    pub fn pre_order_iter<F>(&self, mut f: F)
    where
        F: FnMut(&K),
    {
        let mut stack = Vec::from_iter(self.root);

        while let Some(id) = stack.pop() {
            let n = &self.nodes[id];
            f(&n.key);

            // Push the right child first so the left subtree is popped (and
            // visited) before it.
            stack.extend(n.right);
            stack.extend(n.left);
        }
    }

    /// Visit each key in-order using an explicit stack holding the ancestors
    /// on the current left spine.
    pub fn in_order_iter<F>(&self, mut f: F)
    where
        F: FnMut(&K),
    {
        let mut stack = vec![];
        let mut ptr = self.root;

        loop {
            // Descend down the left side of the subtree.
            while let Some(id) = ptr {
                stack.push(id);
                ptr = self.nodes[id].left;
            }

            let Some(id) = stack.pop() else { return };
            let n = &self.nodes[id];
            f(&n.key);
            ptr = n.right;
        }
    }

    /// Visit each key in post-order using two explicit stacks.
    ///
    /// The first stack produces nodes in (node, right, left) order, which the
    /// second stack reverses into post-order before any key is visited.
    pub fn post_order_iter_two_stacks<F>(&self, mut f: F)
    where
        F: FnMut(&K),
    {
        let mut pending = Vec::from_iter(self.root);
        let mut output = Vec::with_capacity(self.len());

        while let Some(id) = pending.pop() {
            output.push(id);

            let n = &self.nodes[id];
            pending.extend(n.left);
            pending.extend(n.right);
        }

        while let Some(id) = output.pop() {
            f(&self.nodes[id].key);
        }
    }

    /// Visit each key in post-order using a single explicit stack.
    ///
    /// A node is visited once its right subtree is either absent or was the
    /// last thing visited.
    pub fn post_order_iter_one_stack<F>(&self, mut f: F)
    where
        F: FnMut(&K),
    {
        let mut stack: Vec<NodeId> = vec![];
        let mut ptr = self.root;
        let mut last = None;

        loop {
            if let Some(id) = ptr {
                stack.push(id);
                ptr = self.nodes[id].left;
                continue;
            }

            let Some(&top) = stack.last() else { return };
            let n = &self.nodes[top];

            if n.right.is_none() || n.right == last {
                f(&n.key);
                stack.pop();
                last = Some(top);
            } else {
                ptr = n.right;
            }
        }
    }

    /// Visit each key level by level, left to right.
    pub fn breadth_first<F>(&self, mut f: F)
    where
        F: FnMut(&K),
    {
        let mut queue = VecDeque::from_iter(self.root);

        while let Some(id) = queue.pop_front() {
            let n = &self.nodes[id];
            f(&n.key);
            queue.extend(n.left);
            queue.extend(n.right);
        }
    }

    pub(crate) fn key(&self, id: NodeId) -> &K {
        &self.nodes[id].key
    }

    /// Link `child` as the left child of `parent`, pointing the child's
    /// parent reference back up.
    pub(crate) fn set_left(&mut self, parent: NodeId, child: Option<NodeId>) {
        self.nodes[parent].left = child;
        if let Some(c) = child {
            self.nodes[c].parent = Some(parent);
        }
    }

    /// Link `child` as the right child of `parent`, pointing the child's
    /// parent reference back up.
    pub(crate) fn set_right(&mut self, parent: NodeId, child: Option<NodeId>) {
        self.nodes[parent].right = child;
        if let Some(c) = child {
            self.nodes[c].parent = Some(parent);
        }
    }

    /// Replace the subtree rooted at `old` with the subtree rooted at `new`
    /// in the slot of `old`'s parent (or the root slot).
    ///
    /// The parent reference of `old` is left untouched, and `old` keeps its
    /// children - it is the caller's responsibility to relink or release it.
    pub(crate) fn transplant(&mut self, old: NodeId, new: Option<NodeId>) {
        let parent = self.nodes[old].parent;

        log::trace!("transplanting {new:?} into the slot of {old:?}");

        match parent {
            None => self.root = new,
            Some(p) if self.nodes[p].left == Some(old) => self.nodes[p].left = new,
            Some(p) => {
                debug_assert_eq!(self.nodes[p].right, Some(old));
                self.nodes[p].right = new;
            }
        }

        if let Some(n) = new {
            self.nodes[n].parent = parent;
        }
    }
}

impl<'a, K> IntoIterator for &'a BinaryTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
