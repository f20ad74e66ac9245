use crate::{node::NodeId, tree::BinaryTree};

/// An [`Iterator`] that performs a depth-first, in-order walk of a tree,
/// yielding references to its keys in ascending order.
///
/// Constructed by [`BinaryTree::iter()`].
#[derive(Debug, Clone)]
pub struct Iter<'a, K> {
    tree: &'a BinaryTree<K>,
    stack: Vec<NodeId>,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(tree: &'a BinaryTree<K>) -> Self {
        let mut this = Self {
            tree,
            stack: vec![],
        };

        // Descend down the left side of the tree.
        this.push_subtree(tree.root);

        this
    }

    fn push_subtree(&mut self, subtree_root: Option<NodeId>) {
        let mut ptr = subtree_root;

        while let Some(v) = ptr {
            self.stack.push(v);
            ptr = self.tree.nodes[v].left;
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let v = self.stack.pop()?;
        let n = &tree.nodes[v];

        // Descend down the left side of the right hand child of this node, if
        // any.
        self.push_subtree(n.right);

        Some(&n.key)
    }
}
