use core::borrow::Borrow;
use core::mem;

use tracing::{debug, trace};

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Entry, Node, SearchResult};
use super::path::{Lookup, Path, PathElement};
use crate::Order;

/// The B-tree engine backing `MBTreeMap`.
#[derive(Clone)]
pub(crate) struct RawMBTreeMap<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Arena storing all values, addressed by the handles held in entries.
    values: Arena<V>,
    /// The root node. Always present; an empty tree is a root leaf with no entries.
    root: Handle,
    /// Total number of key-value pairs in the tree.
    len: usize,
    order: Order,
}

impl<K, V> RawMBTreeMap<K, V> {
    /// Creates a new, empty tree.
    pub(crate) fn new(order: Order) -> Self {
        let mut nodes = Arena::new();
        let root = nodes.insert(Node::with_capacity(order.get()));
        Self {
            nodes,
            values: Arena::new(),
            root,
            len: 0,
            order,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) const fn order(&self) -> Order {
        self.order
    }

    pub(crate) const fn root(&self) -> Handle {
        self.root
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    pub(crate) fn value(&self, handle: Handle) -> &V {
        self.values.get(handle)
    }

    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        self.values.get_mut(handle)
    }

    /// Number of levels, counting the root.
    pub(crate) fn height(&self) -> usize {
        let mut height = 1;
        let mut node = self.nodes.get(self.root);
        while !node.is_leaf() {
            height += 1;
            node = self.nodes.get(node.child(0));
        }
        height
    }

    /// Drops every entry, leaving a single empty root.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        self.root = self.nodes.insert(Node::with_capacity(self.order.get()));
        self.len = 0;
    }

    /// Surrenders the arenas for an owning traversal.
    pub(crate) fn into_parts(self) -> (Arena<Node<K>>, Arena<V>, Handle, usize) {
        (self.nodes, self.values, self.root, self.len)
    }

    /// The entry addressed by the last step of `path`.
    pub(crate) fn entry_at(&self, target: PathElement) -> &Entry<K> {
        self.nodes.get(target.node).entry(target.index)
    }

    /// Path to the smallest (`last == false`) or largest entry, if any.
    fn edge_path(&self, last: bool) -> Option<Path> {
        let mut path = Path::new();
        let mut current = self.root;
        loop {
            let node = self.nodes.get(current);
            if node.is_leaf() {
                if node.len() == 0 {
                    return None;
                }
                let index = if last { node.len() - 1 } else { 0 };
                path.push(PathElement { node: current, index });
                return Some(path);
            }
            let index = if last { node.len() } else { 0 };
            path.push(PathElement { node: current, index });
            current = node.child(index);
        }
    }

    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        let path = self.edge_path(false)?;
        let entry = self.entry_at(*path.last()?);
        Some((&entry.key, self.values.get(entry.value)))
    }

    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        let path = self.edge_path(true)?;
        let entry = self.entry_at(*path.last()?);
        Some((&entry.key, self.values.get(entry.value)))
    }

    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let path = self.edge_path(false)?;
        Some(self.remove_at(path))
    }

    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let path = self.edge_path(true)?;
        Some(self.remove_at(path))
    }

    /// Inserts a new entry at the insertion point recorded by an unsuccessful
    /// lookup, then splits overflowing nodes from the leaf upwards.
    ///
    /// Returns the handle of the stored value.
    pub(crate) fn insert_at(&mut self, path: &Path, key: K, value: V) -> Handle {
        let Some(&target) = path.last() else {
            unreachable!("lookup always records the root");
        };
        let value = self.values.insert(value);
        self.nodes.get_mut(target.node).insert(target.index, Entry::new(key, value));
        self.len += 1;
        self.split_overflowing(path);
        debug_assert_eq!(self.values.len(), self.len, "value arena out of step with len");
        value
    }

    fn split_overflowing(&mut self, path: &Path) {
        let max = self.order.max_entries();
        for depth in (0..path.len()).rev() {
            if self.nodes.get(path[depth].node).len() <= max {
                return;
            }
            if depth == 0 {
                self.grow_root();
            } else {
                let parent = path[depth - 1];
                self.split_child(parent.node, parent.index);
            }
        }
    }

    /// Places a new root above the overflowing root and splits the old one beneath it.
    fn grow_root(&mut self) {
        let old_root = self.root;
        self.root = self.nodes.insert(Node::with_only_child(self.order.get(), old_root));
        self.split_child(self.root, 0);
        debug!(height = self.height(), "root split, tree grew");
    }

    /// Splits `children[index]` of `parent`, promoting its median into `parent`.
    fn split_child(&mut self, parent: Handle, index: usize) {
        let child = self.nodes.get(parent).child(index);
        let (median, right) = self.nodes.get_mut(child).split();
        debug_assert!(self.within_bounds(self.nodes.get(child).len()), "left half of split out of bounds");
        debug_assert!(self.within_bounds(right.len()), "right half of split out of bounds");

        let right = self.nodes.insert(right);
        self.nodes.get_mut(parent).insert_child(index, median, right);
        trace!(child_index = index, entries = self.nodes.get(parent).len(), "split node");
    }

    /// Removes the entry addressed by a successful lookup and restores the
    /// minimum-occupancy bound from the affected leaf upwards.
    pub(crate) fn remove_at(&mut self, mut path: Path) -> (K, V) {
        let Some(&target) = path.last() else {
            unreachable!("lookup always records the root");
        };

        let removed = if self.nodes.get(target.node).is_leaf() {
            self.nodes.get_mut(target.node).remove(target.index)
        } else {
            // Swap in the in-order successor: the leftmost entry of the right subtree.
            let last = path.len() - 1;
            path[last].index = target.index + 1;
            let mut current = self.nodes.get(target.node).child(target.index + 1);
            loop {
                path.push(PathElement { node: current, index: 0 });
                let node = self.nodes.get(current);
                if node.is_leaf() {
                    break;
                }
                current = node.child(0);
            }
            let successor = self.nodes.get_mut(current).remove(0);
            self.nodes.get_mut(target.node).replace(target.index, successor)
        };
        self.len -= 1;

        self.rebalance_underflowing(&path);
        let value = self.values.remove(removed.value);
        debug_assert_eq!(self.values.len(), self.len, "value arena out of step with len");
        (removed.key, value)
    }

    fn rebalance_underflowing(&mut self, path: &Path) {
        let min = self.order.min_entries();
        for depth in (1..path.len()).rev() {
            let node = path[depth].node;
            if self.nodes.get(node).len() >= min {
                break;
            }

            let parent = path[depth - 1];
            let (left, right) = self.nodes.get(parent.node).brothers(parent.index);
            if let Some(left) = left.filter(|&h| self.nodes.get(h).len() > min) {
                self.rotate_from_left(parent.node, parent.index, left, node);
                break;
            }
            if let Some(right) = right.filter(|&h| self.nodes.get(h).len() > min) {
                self.rotate_from_right(parent.node, parent.index, right, node);
                break;
            }
            match (left, right) {
                (Some(_), _) => self.merge_children(parent.node, parent.index - 1),
                (None, Some(_)) => self.merge_children(parent.node, parent.index),
                (None, None) => unreachable!("non-root node without siblings"),
            }
        }
        self.shrink_root();
    }

    /// Moves the separator left of `children[index]` down into `node` and the
    /// last entry of `left` up into its place.
    fn rotate_from_left(&mut self, parent: Handle, index: usize, left: Handle, node: Handle) {
        let Some((entry, child)) = self.nodes.get_mut(left).pop_back() else {
            unreachable!("lending sibling is empty");
        };
        let separator = self.nodes.get_mut(parent).replace(index - 1, entry);
        self.nodes.get_mut(node).push_front(separator, child);
        debug_assert!(self.within_bounds(self.nodes.get(node).len()), "rotation left node deficient");
        trace!(child_index = index, "rotated entry from left sibling");
    }

    /// Mirror of [`Self::rotate_from_left`] using the right sibling.
    fn rotate_from_right(&mut self, parent: Handle, index: usize, right: Handle, node: Handle) {
        let Some((entry, child)) = self.nodes.get_mut(right).pop_front() else {
            unreachable!("lending sibling is empty");
        };
        let separator = self.nodes.get_mut(parent).replace(index, entry);
        self.nodes.get_mut(node).push_back(separator, child);
        debug_assert!(self.within_bounds(self.nodes.get(node).len()), "rotation left node deficient");
        trace!(child_index = index, "rotated entry from right sibling");
    }

    /// Joins `children[index]`, the separator `entries[index]` and
    /// `children[index + 1]` of `parent` into the left child.
    fn merge_children(&mut self, parent: Handle, index: usize) {
        let (separator, right) = self.nodes.get_mut(parent).remove_child(index);
        let left = self.nodes.get(parent).child(index);
        let right = self.nodes.remove(right);
        self.nodes.get_mut(left).merge_with_right(separator, right);
        debug_assert!(self.within_bounds(self.nodes.get(left).len()), "merged node out of bounds");
        trace!(child_index = index, entries = self.nodes.get(left).len(), "merged siblings");
    }

    /// Promotes the only child of an entry-less root.
    fn shrink_root(&mut self) {
        let root = self.nodes.get(self.root);
        if root.len() == 0 && !root.is_leaf() {
            let child = root.child(0);
            self.nodes.remove(self.root);
            self.root = child;
            debug!(height = self.height(), "root emptied, tree shrank");
        }
    }

    fn within_bounds(&self, entries: usize) -> bool {
        (self.order.min_entries()..=self.order.max_entries()).contains(&entries)
    }
}

impl<K: Ord, V> RawMBTreeMap<K, V> {
    /// Descends from the root towards `key`, recording every step.
    pub(crate) fn lookup<Q>(&self, key: &Q) -> Lookup
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut path = Path::new();
        let mut current = self.root;
        loop {
            let node = self.nodes.get(current);
            match node.search(key) {
                SearchResult::Found(index) => {
                    path.push(PathElement { node: current, index });
                    return Lookup { path, found: true };
                }
                SearchResult::NotFound(index) => {
                    path.push(PathElement { node: current, index });
                    if node.is_leaf() {
                        return Lookup { path, found: false };
                    }
                    current = node.child(index);
                }
            }
        }
    }

    /// Handle of the value stored under `key`.
    fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let lookup = self.lookup(key);
        lookup.found.then(|| self.entry_at(lookup.target()).value)
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.lookup(key).found
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.find(key).map(|handle| self.values.get(handle))
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.find(key)?;
        Some(self.values.get_mut(handle))
    }

    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let lookup = self.lookup(key);
        if !lookup.found {
            return None;
        }
        let entry = self.entry_at(lookup.target());
        Some((&entry.key, self.values.get(entry.value)))
    }

    /// Inserts a key-value pair, returning the previous value if the key was present.
    /// An existing key keeps its original instance.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let lookup = self.lookup(&key);
        if lookup.found {
            let handle = self.entry_at(lookup.target()).value;
            return Some(mem::replace(self.values.get_mut(handle), value));
        }
        self.insert_at(&lookup.path, key, value);
        None
    }

    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let lookup = self.lookup(key);
        lookup.found.then(|| self.remove_at(lookup.path))
    }
}
