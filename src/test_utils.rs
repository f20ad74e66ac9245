use std::{
    collections::HashMap,
    fmt::{Debug, Write},
};

use proptest::prelude::*;

use crate::{node::NodeId, tree::BinaryTree};

const KEY_MAX: u8 = 20;

/// Generate arbitrary keys from [0..[`KEY_MAX`]).
///
/// A small key domain encourages duplicates, and operations that act on
/// previously inserted keys.
pub(crate) fn arbitrary_key() -> impl Strategy<Value = u8> {
    0..KEY_MAX
}

/// Generate arbitrary (possibly non-canonical) level-order encodings.
pub(crate) fn arbitrary_level_order() -> impl Strategy<Value = Vec<Option<u8>>> {
    prop::collection::vec(prop::option::weighted(0.8, arbitrary_key()), 0..64)
}

/// Render the tree as a graphviz dot digraph, for inclusion in assertion
/// messages.
pub(crate) fn print_dot<K>(t: &BinaryTree<K>) -> String
where
    K: Debug,
{
    let mut buf = String::new();

    writeln!(buf, "digraph {{").unwrap();
    writeln!(buf, r#"bgcolor = "transparent";"#).unwrap();
    writeln!(
        buf,
        r#"node [shape = record; style = filled; fontcolor = orange4; fillcolor = white;];"#
    )
    .unwrap();
    if let Some(root) = t.root {
        recurse(t, root, &mut buf);
    }
    writeln!(buf, "}}").unwrap();

    buf
}

fn recurse<K, W>(t: &BinaryTree<K>, id: NodeId, buf: &mut W)
where
    W: std::fmt::Write,
    K: Debug,
{
    let n = &t.nodes[id];

    writeln!(
        buf,
        r#""{:?}" [label="{:?} | {{ h={} }}"];"#,
        id, n.key, n.height,
    )
    .unwrap();

    for v in [n.left, n.right] {
        match v {
            Some(v) => {
                writeln!(buf, "\"{id:?}\" -> \"{v:?}\" [color = \"orange1\";];").unwrap();
                recurse(t, v, buf);
            }
            None => {
                writeln!(buf, "\"null_{id:?}\" [shape=point,style=invis];").unwrap();
                writeln!(buf, "\"{id:?}\" -> \"null_{id:?}\" [style=invis];").unwrap();
            }
        };
    }
}

/// Recompute the height of every subtree from the tree shape, ignoring the
/// cached heights.
fn shape_heights<K>(t: &BinaryTree<K>) -> HashMap<NodeId, isize> {
    // Collect the nodes in reverse post-order, so that popping them yields
    // every child before its parent.
    let mut pending = Vec::from_iter(t.root);
    let mut order = vec![];
    while let Some(id) = pending.pop() {
        order.push(id);
        let n = &t.nodes[id];
        pending.extend(n.left.iter().chain(n.right.iter()));
    }

    let mut heights = HashMap::with_capacity(order.len());
    while let Some(id) = order.pop() {
        let n = &t.nodes[id];
        let child = |v: Option<NodeId>| v.map(|v| heights[&v]).unwrap_or(-1);
        let h = child(n.left).max(child(n.right)) + 1;
        heights.insert(id, h);
    }

    heights
}

/// Assert the structural invariants of the tree that hold regardless of key
/// ordering: parent/child link consistency, node count, and cached heights.
pub(crate) fn validate_tree_structure<K>(t: &BinaryTree<K>)
where
    K: Debug,
{
    let root = match t.root {
        Some(v) => v,
        None => {
            assert_eq!(t.len(), 0);
            assert_eq!(t.height(), -1);
            return;
        }
    };

    // Invariant 1: the root has no parent.
    assert_eq!(t.nodes[root].parent, None, "{}", print_dot(t));

    let heights = shape_heights(t);

    // Perform a pre-order traversal of the tree.
    let mut count = 0;
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        count += 1;
        let n = &t.nodes[id];

        // Prepare to visit the children
        stack.extend(n.left.iter().chain(n.right.iter()));

        // Invariant 2: every child points back at the node that links it.
        for child in [n.left, n.right].into_iter().flatten() {
            assert_eq!(
                t.nodes[child].parent,
                Some(id),
                "child {:?} of {:?} has wrong parent\n{}",
                t.nodes[child].key,
                n.key,
                print_dot(t)
            );
        }

        // Invariant 3: the cached height matches the shape of the subtree.
        let want_height = heights[&id];
        assert_eq!(
            n.height as isize,
            want_height,
            "expect node with key {:?} to have height {}, has {}\n{}",
            n.key,
            want_height,
            n.height,
            print_dot(t),
        );
    }

    // Invariant 4: every live node is reachable from the root.
    assert_eq!(count, t.len(), "{}", print_dot(t));
}

/// Assert the search order invariant for every node: all keys in the left
/// subtree are less than the node key (or equal, unless `strict_left` is
/// set), and all keys in the right subtree are greater than or equal to it.
pub(crate) fn validate_search_order<K>(t: &BinaryTree<K>, strict_left: bool)
where
    K: Ord + Debug,
{
    let Some(root) = t.root else { return };

    // Each node is visited with the (lower, upper) bounds inherited from its
    // ancestors.
    let mut stack: Vec<(NodeId, Option<&K>, Option<&K>)> = vec![(root, None, None)];
    while let Some((id, lower, upper)) = stack.pop() {
        let n = &t.nodes[id];

        if let Some(lower) = lower {
            assert!(
                n.key >= *lower,
                "key {:?} below lower bound {lower:?}\n{}",
                n.key,
                print_dot(t)
            );
        }
        if let Some(upper) = upper {
            let ok = if strict_left {
                n.key < *upper
            } else {
                n.key <= *upper
            };
            assert!(
                ok,
                "key {:?} above upper bound {upper:?}\n{}",
                n.key,
                print_dot(t)
            );
        }

        stack.extend(n.left.map(|v| (v, lower, Some(&n.key))));
        stack.extend(n.right.map(|v| (v, Some(&n.key), upper)));
    }

    // An in-order walk therefore yields non-decreasing keys.
    let keys = t.iter().collect::<Vec<_>>();
    assert!(keys.windows(2).all(|w| w[0] <= w[1]));
}

/// Assert the AVL invariant: the absolute height difference between the left
/// and right subtree of every node (the "balance factor") does not exceed 1.
pub(crate) fn validate_balance<K>(t: &BinaryTree<K>)
where
    K: Debug,
{
    let heights = shape_heights(t);
    let height = |v: Option<NodeId>| v.map(|v| heights[&v]).unwrap_or(-1);

    let mut stack = Vec::from_iter(t.root);
    while let Some(id) = stack.pop() {
        let n = &t.nodes[id];
        stack.extend(n.left.iter().chain(n.right.iter()));

        let balance = height(n.left) - height(n.right);
        assert!(
            balance.abs() <= 1,
            "balance={balance}, key={:?}\n{}",
            n.key,
            print_dot(t)
        );
    }
}
