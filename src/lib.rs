//! An arena-backed binary search tree, with optional AVL height balancing.
//!
//! The crate is layered, each type building on the one below it:
//!
//! * [`BinaryTree`]: the tree structure and its traversals (recursive and
//!   iterative pre/in/post-order, and breadth-first), plus construction from
//!   and emission of a level-order encoding. It has no ordering semantics.
//!
//! * [`BinarySearchTree`]: maintains the binary search property, providing
//!   search, insertion, removal, minimum/maximum, successor/predecessor and
//!   rank queries.
//!
//! * [`AvlTree`]: additionally maintains the AVL height invariant, rotating
//!   subtrees after every insertion and removal to keep the tree height
//!   logarithmic in the number of keys.
//!
//! Each layer dereferences to the one below it, so the read-only operations
//! and traversals of the lower layers are available on every tree. Mutations
//! are only exposed by the layer that upholds the invariants they affect.
//!
//! ```
//! use arbor::{AvlTree, TreeError};
//!
//! let mut t = [5, 3, 8, 1, 4, 7, 9].into_iter().collect::<AvlTree<_>>();
//!
//! let mut keys = vec![];
//! t.in_order_iter(|k| keys.push(*k));
//! assert_eq!(keys, [1, 3, 4, 5, 7, 8, 9]);
//!
//! assert_eq!(t.successor(&5), Ok(&7));
//! assert_eq!(t.predecessor(&1), Err(TreeError::NoPredecessor));
//!
//! t.remove(&5).unwrap();
//! assert_eq!(t.rank(&7), Some(3));
//! ```
//!
//! ## Node storage
//!
//! Nodes are stored in an arena owned by the tree and linked by index, with
//! each node holding a non-owning link to its parent. Dropping a tree
//! releases all of its nodes at once, regardless of the tree depth.

#![deny(missing_docs, missing_debug_implementations)]

mod avl;
mod bst;
mod error;
mod iter;
mod node;
mod tree;

#[cfg(test)]
mod test_utils;

pub use avl::AvlTree;
pub use bst::BinarySearchTree;
pub use error::TreeError;
pub use iter::Iter;
pub use tree::BinaryTree;
