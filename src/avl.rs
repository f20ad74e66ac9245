use std::ops::Deref;

use crate::{bst::BinarySearchTree, error::TreeError, node::NodeId};

/// A height-balanced (AVL) binary search tree of keys.
///
/// For every node, the heights of its left and right subtrees differ by at
/// most 1, bounding the tree height to `O(log n)`. Balance is restored after
/// every insertion and removal by walking from the modified node up to the
/// root, rotating any subtree found to be out of balance.
///
/// All the read-only operations of [`BinarySearchTree`] (and the traversals
/// of [`BinaryTree`]) are available through [`Deref`].
///
/// ```
/// use arbor::AvlTree;
///
/// let t = (1..=7).collect::<AvlTree<_>>();
///
/// // A plain binary search tree would have a height of 6.
/// assert_eq!(t.height(), 2);
/// assert_eq!(t.root(), Some(&4));
/// assert_eq!(t.maximum(), Ok(&7));
/// ```
///
/// [`BinaryTree`]: crate::BinaryTree
#[derive(Debug, Clone)]
pub struct AvlTree<K>(BinarySearchTree<K>);

impl<K> Default for AvlTree<K> {
    fn default() -> Self {
        Self(BinarySearchTree::default())
    }
}

impl<K> Deref for AvlTree<K> {
    type Target = BinarySearchTree<K>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<K> AvlTree<K> {
    /// Construct an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all keys from the tree.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Left rotate the subtree rooted at `x` around its right child `P`.
    ///
    /// ```text
    ///
    ///      x
    ///     / \                               P
    ///    1   P         Rotate Left        /   \
    ///       / \      --------------->    x     y
    ///      2   y                        / \   / \
    ///         / \                      1   2 3   4
    ///        3   4
    /// ```
    ///
    /// `P` takes the place of `x` in its parent (or becomes the root). A no-op
    /// if `x` has no right child.
    fn rotate_left(&mut self, x: NodeId) {
        let t = self.0.tree_mut();
        let Some(p) = t.nodes[x].right else { return };

        let inner = t.nodes[p].left;
        t.set_right(x, inner);
        t.transplant(x, Some(p));
        t.set_left(p, Some(x));

        t.nodes.update_height(x);
        t.nodes.update_height(p);

        log::trace!("rotated {x:?} left around pivot {p:?}");
    }

    /// Right rotate the subtree rooted at `y` around its left child `P`.
    ///
    /// ```text
    ///          y
    ///         / \                           P
    ///        P   4     Rotate Right       /   \
    ///       / \      --------------->    x     y
    ///      x   3                        / \   / \
    ///     / \                          1   2 3   4
    ///    1   2
    /// ```
    ///
    /// `P` takes the place of `y` in its parent (or becomes the root). A no-op
    /// if `y` has no left child.
    fn rotate_right(&mut self, y: NodeId) {
        let t = self.0.tree_mut();
        let Some(p) = t.nodes[y].left else { return };

        let inner = t.nodes[p].right;
        t.set_left(y, inner);
        t.transplant(y, Some(p));
        t.set_right(p, Some(y));

        t.nodes.update_height(y);
        t.nodes.update_height(p);

        log::trace!("rotated {y:?} right around pivot {p:?}");
    }

    /// Walk from `start` up to the root, correcting the balance of every
    /// subtree on the way.
    ///
    /// The parent link is read after any rotation at the current node, so the
    /// walk continues from the rotated subtree's new root.
    fn rebalance(&mut self, start: Option<NodeId>) {
        let mut ptr = start;

        while let Some(x) = ptr {
            self.0.tree_mut().nodes.update_height(x);

            let n = &self.nodes[x];
            let (left, right) = (n.left, n.right);
            match (self.nodes.balance(x), left, right) {
                // Left-heavy, straight line.
                (b @ 2.., Some(l), _) if self.nodes.balance(l) >= 0 => {
                    log::trace!("rebalancing {x:?} (balance {b}): left-left");
                    self.rotate_right(x);
                }
                // Left-heavy, zig-zag.
                (b @ 2.., Some(l), _) => {
                    log::trace!("rebalancing {x:?} (balance {b}): left-right");
                    self.rotate_left(l);
                    self.rotate_right(x);
                }
                // Right-heavy, straight line.
                (b @ ..=-2, _, Some(r)) if self.nodes.balance(r) <= 0 => {
                    log::trace!("rebalancing {x:?} (balance {b}): right-right");
                    self.rotate_left(x);
                }
                // Right-heavy, zig-zag.
                (b @ ..=-2, _, Some(r)) => {
                    log::trace!("rebalancing {x:?} (balance {b}): right-left");
                    self.rotate_right(r);
                    self.rotate_left(x);
                }
                (-1..=1, _, _) => { /* The subtree is well balanced */ }
                _ => unreachable!(),
            }

            // Invariant: the absolute difference between subtree heights
            // ("balance factor") cannot exceed 1 once rebalanced.
            debug_assert!(self.nodes.balance(x).abs() <= 1);

            ptr = self.nodes[x].parent;
        }
    }
}

impl<K> AvlTree<K>
where
    K: Ord,
{
    /// Insert `key` into the tree, rebalancing as necessary.
    ///
    /// Duplicate keys are permitted.
    pub fn insert(&mut self, key: K) {
        let id = self.0.insert_node(key);
        self.rebalance(Some(id));
    }

    /// Remove one occurrence of `key` from the tree, returning the stored
    /// key and rebalancing as necessary.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyTree`] if the tree is empty, and
    /// [`TreeError::ValueNotFound`] if `key` is not stored. The tree is not
    /// modified in either case.
    pub fn remove(&mut self, key: &K) -> Result<K, TreeError> {
        if self.is_empty() {
            return Err(TreeError::EmptyTree);
        }

        let id = self.find_node(key).ok_or(TreeError::ValueNotFound)?;
        let (key, lowest_changed) = self.0.remove_node(id);
        self.rebalance(lowest_changed);

        Ok(key)
    }
}

impl<K> FromIterator<K> for AvlTree<K>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut this = Self::default();
        this.extend(iter);
        this
    }
}

impl<K> Extend<K> for AvlTree<K>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for v in iter {
            self.insert(v);
        }
    }
}
