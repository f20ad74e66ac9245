use thiserror::Error;

/// Errors returned by the fallible lookup and removal operations of
/// [`BinarySearchTree`] and [`AvlTree`].
///
/// All checks are performed before the tree is modified - an error always
/// leaves the tree untouched.
///
/// [`BinarySearchTree`]: crate::BinarySearchTree
/// [`AvlTree`]: crate::AvlTree
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The operation requires at least one node, but the tree is empty.
    #[error("the tree is empty")]
    EmptyTree,

    /// The requested key does not exist in the tree.
    #[error("the key is not present in the tree")]
    ValueNotFound,

    /// The requested key is the maximum of the tree.
    #[error("the key has no successor")]
    NoSuccessor,

    /// The requested key is the minimum of the tree.
    #[error("the key has no predecessor")]
    NoPredecessor,
}
