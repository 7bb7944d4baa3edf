use alloc::string::String;
use core::fmt::{self, Write};

use crate::raw::{Handle, RawMBTreeMap};

/// A read-only view of one node of a `MBTreeMap`.
///
/// Obtained from [`MBTreeMap::root`]; walking [`NodeRef::children`] reaches
/// every node. Intended for diagnostics and tests that need to see the tree
/// shape rather than just its contents.
///
/// # Examples
///
/// ```
/// use mbtree::{MBTreeMap, Order};
///
/// let mut map = MBTreeMap::with_order(Order::new(3).unwrap());
/// map.extend([(1, 'a'), (2, 'b'), (3, 'c')]);
///
/// let root = map.root();
/// assert!(!root.is_leaf());
/// assert_eq!(root.keys().collect::<Vec<_>>(), [&2]);
/// let leaves: Vec<Vec<&i32>> = root.children().map(|c| c.keys().collect()).collect();
/// assert_eq!(leaves, [[&1], [&3]]);
/// ```
///
/// [`MBTreeMap::root`]: super::MBTreeMap::root
pub struct NodeRef<'a, K, V> {
    tree: &'a RawMBTreeMap<K, V>,
    handle: Handle,
}

impl<'a, K, V> NodeRef<'a, K, V> {
    pub(super) fn new(tree: &'a RawMBTreeMap<K, V>, handle: Handle) -> Self {
        NodeRef { tree, handle }
    }

    /// Returns `true` if this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.tree.node(self.handle).is_leaf()
    }

    /// Number of entries held directly by this node.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.node(self.handle).len()
    }

    /// Returns `true` if this node holds no entries. Only the root of an empty map does.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The keys of this node, in order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &'a K> + use<'a, K, V> {
        let tree = self.tree;
        tree.node(self.handle).entries().iter().map(|entry| &entry.key)
    }

    /// The entries of this node, in order.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = (&'a K, &'a V)> + use<'a, K, V> {
        let tree = self.tree;
        tree.node(self.handle).entries().iter().map(move |entry| (&entry.key, tree.value(entry.value)))
    }

    /// The children of this node, left to right. Empty for a leaf.
    pub fn children(&self) -> impl ExactSizeIterator<Item = NodeRef<'a, K, V>> + use<'a, K, V> {
        let tree = self.tree;
        tree.node(self.handle).children().iter().map(move |&handle| NodeRef::new(tree, handle))
    }
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

/// Writes one line per node, pre-order, indented two spaces per level.
pub(super) fn render<K: fmt::Debug, V>(root: NodeRef<'_, K, V>) -> String {
    let mut out = String::new();
    let mut stack = alloc::vec![(root, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        for _ in 0..depth {
            out.push_str("  ");
        }
        // Writing into a `String` cannot fail.
        let _ = writeln!(out, "{node:?}");
        let children: alloc::vec::Vec<_> = node.children().collect();
        stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
    }
    out
}
