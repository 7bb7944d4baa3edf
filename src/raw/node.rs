use alloc::vec::Vec;
use core::borrow::Borrow;

use super::handle::Handle;

/// A key paired with the handle of its value.
///
/// Values stay put in the value arena; splitting, rotating and merging nodes
/// only moves the key and the handle.
#[derive(Clone, Debug)]
pub(crate) struct Entry<K> {
    pub(crate) key: K,
    pub(crate) value: Handle,
}

impl<K> Entry<K> {
    pub(crate) const fn new(key: K, value: Handle) -> Self {
        Self { key, value }
    }
}

/// A B-tree node.
///
/// A node with no children is a leaf. An internal node with `e` entries has
/// exactly `e + 1` children, and every key under `children[i]` sorts before
/// `entries[i].key`, which sorts before every key under `children[i + 1]`.
#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    entries: Vec<Entry<K>>,
    children: Vec<Handle>,
}

/// Result of searching for a key in a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SearchResult {
    /// Key was found at the given index.
    Found(usize),
    /// Key was not found; index is where it would be inserted, which is also
    /// the child to descend into.
    NotFound(usize),
}

impl<K> Node<K> {
    /// Creates an empty leaf sized for a tree of order `order`.
    ///
    /// One slot of headroom is reserved so a node may overflow by one entry
    /// before it is split.
    pub(crate) fn with_capacity(order: usize) -> Self {
        Self {
            entries: Vec::with_capacity(order),
            children: Vec::new(),
        }
    }

    /// Creates an internal node whose only child is `child`. Used when the root splits.
    pub(crate) fn with_only_child(order: usize, child: Handle) -> Self {
        let mut children = Vec::with_capacity(order + 1);
        children.push(child);
        Self {
            entries: Vec::with_capacity(order),
            children,
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of entries in this node.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn entry(&self, index: usize) -> &Entry<K> {
        &self.entries[index]
    }

    pub(crate) fn entries(&self) -> &[Entry<K>] {
        &self.entries
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    pub(crate) fn children(&self) -> &[Handle] {
        &self.children
    }

    /// Consumes the node, yielding its entries and children.
    pub(crate) fn into_parts(self) -> (Vec<Entry<K>>, Vec<Handle>) {
        (self.entries, self.children)
    }

    /// Binary-searches the entries of this node.
    #[inline]
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.entries.binary_search_by(|entry| entry.key.borrow().cmp(key)) {
            Ok(index) => SearchResult::Found(index),
            Err(index) => SearchResult::NotFound(index),
        }
    }

    /// Inserts an entry into a leaf.
    pub(crate) fn insert(&mut self, index: usize, entry: Entry<K>) {
        debug_assert!(self.is_leaf(), "entries are only inserted directly into leaves");
        self.entries.insert(index, entry);
    }

    /// Removes an entry from a leaf.
    pub(crate) fn remove(&mut self, index: usize) -> Entry<K> {
        debug_assert!(self.is_leaf(), "entries are only removed directly from leaves");
        self.entries.remove(index)
    }

    /// Swaps the entry at `index` for `entry`, returning the old one.
    pub(crate) fn replace(&mut self, index: usize, entry: Entry<K>) -> Entry<K> {
        core::mem::replace(&mut self.entries[index], entry)
    }

    /// Inserts a separator entry at `index` and its right-hand child at `index + 1`.
    pub(crate) fn insert_child(&mut self, index: usize, separator: Entry<K>, right: Handle) {
        self.entries.insert(index, separator);
        self.children.insert(index + 1, right);
    }

    /// Removes the separator at `index` together with the child to its right.
    pub(crate) fn remove_child(&mut self, index: usize) -> (Entry<K>, Handle) {
        let separator = self.entries.remove(index);
        let right = self.children.remove(index + 1);
        (separator, right)
    }

    /// Returns the children adjacent to `children[index]` (left, right). Either
    /// is `None` at the edges of this node.
    pub(crate) fn brothers(&self, index: usize) -> (Option<Handle>, Option<Handle>) {
        let left = index.checked_sub(1).map(|i| self.children[i]);
        let right = self.children.get(index + 1).copied();
        (left, right)
    }

    /// Takes the last entry and, for internal nodes, the last child.
    pub(crate) fn pop_back(&mut self) -> Option<(Entry<K>, Option<Handle>)> {
        let entry = self.entries.pop()?;
        let child = self.children.pop();
        Some((entry, child))
    }

    /// Takes the first entry and, for internal nodes, the first child.
    pub(crate) fn pop_front(&mut self) -> Option<(Entry<K>, Option<Handle>)> {
        if self.entries.is_empty() {
            return None;
        }
        let entry = self.entries.remove(0);
        let child = (!self.children.is_empty()).then(|| self.children.remove(0));
        Some((entry, child))
    }

    pub(crate) fn push_front(&mut self, entry: Entry<K>, child: Option<Handle>) {
        self.entries.insert(0, entry);
        if let Some(child) = child {
            self.children.insert(0, child);
        }
    }

    pub(crate) fn push_back(&mut self, entry: Entry<K>, child: Option<Handle>) {
        self.entries.push(entry);
        if let Some(child) = child {
            self.children.push(child);
        }
    }

    /// Splits an overfull node at its median.
    ///
    /// `self` keeps the entries (and children) left of the median; the returned
    /// node receives everything to its right. The median itself is returned
    /// for promotion into the parent.
    pub(crate) fn split(&mut self) -> (Entry<K>, Node<K>) {
        let mid = self.entries.len() / 2;
        let capacity = self.entries.capacity();

        let mut right_entries = Vec::with_capacity(capacity);
        right_entries.extend(self.entries.drain(mid + 1..));
        let mut right_children = Vec::new();
        if !self.children.is_empty() {
            right_children.reserve(capacity + 1);
            right_children.extend(self.children.drain(mid + 1..));
        }

        let Some(median) = self.entries.pop() else {
            unreachable!("split of a node with no entries");
        };

        let right = Node {
            entries: right_entries,
            children: right_children,
        };
        (median, right)
    }

    /// Absorbs `separator` followed by every entry and child of `right`.
    pub(crate) fn merge_with_right(&mut self, separator: Entry<K>, right: Node<K>) {
        debug_assert_eq!(self.is_leaf(), right.is_leaf(), "merging nodes from different levels");
        self.entries.push(separator);
        self.entries.extend(right.entries);
        self.children.extend(right.children);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec;
    use pretty_assertions::assert_eq;

    fn handle(index: usize) -> Handle {
        Handle::from_index(index)
    }

    fn leaf(keys: &[u32]) -> Node<u32> {
        let mut node = Node::with_capacity(8);
        for (i, &key) in keys.iter().enumerate() {
            node.insert(i, Entry::new(key, handle(key as usize)));
        }
        node
    }

    fn internal(keys: &[u32], children: &[usize]) -> Node<u32> {
        assert_eq!(keys.len() + 1, children.len());
        let mut node = Node::with_only_child(8, handle(children[0]));
        for (i, (&key, &child)) in keys.iter().zip(&children[1..]).enumerate() {
            node.insert_child(i, Entry::new(key, handle(key as usize)), handle(child));
        }
        node
    }

    fn keys(node: &Node<u32>) -> Vec<u32> {
        node.entries().iter().map(|e| e.key).collect()
    }

    fn child_indices(node: &Node<u32>) -> Vec<usize> {
        node.children().iter().map(|h| h.index()).collect()
    }

    #[test]
    fn search_reports_hits_and_insertion_points() {
        let node = leaf(&[10, 20, 30]);
        assert_eq!(node.search(&20), SearchResult::Found(1));
        assert_eq!(node.search(&5), SearchResult::NotFound(0));
        assert_eq!(node.search(&25), SearchResult::NotFound(2));
        assert_eq!(node.search(&99), SearchResult::NotFound(3));
    }

    #[test]
    fn split_leaf_promotes_median() {
        let mut left = leaf(&[1, 2, 3]);
        let (median, right) = left.split();
        assert_eq!(median.key, 2);
        assert_eq!(keys(&left), vec![1]);
        assert_eq!(keys(&right), vec![3]);
        assert!(right.is_leaf());
    }

    #[test]
    fn split_internal_divides_children() {
        let mut left = internal(&[10, 20, 30, 40], &[100, 101, 102, 103, 104]);
        let (median, right) = left.split();
        assert_eq!(median.key, 30);
        assert_eq!(keys(&left), vec![10, 20]);
        assert_eq!(child_indices(&left), vec![100, 101, 102]);
        assert_eq!(keys(&right), vec![40]);
        assert_eq!(child_indices(&right), vec![103, 104]);
    }

    #[test]
    fn merge_reverses_split() {
        let mut left = internal(&[10, 20, 30, 40], &[100, 101, 102, 103, 104]);
        let (median, right) = left.split();
        left.merge_with_right(median, right);
        assert_eq!(keys(&left), vec![10, 20, 30, 40]);
        assert_eq!(child_indices(&left), vec![100, 101, 102, 103, 104]);
    }

    #[test]
    fn brothers_at_edges() {
        let node = internal(&[10, 20], &[100, 101, 102]);
        assert_eq!(node.brothers(0), (None, Some(handle(101))));
        assert_eq!(node.brothers(1), (Some(handle(100)), Some(handle(102))));
        assert_eq!(node.brothers(2), (Some(handle(101)), None));
    }

    #[test]
    fn remove_child_drops_right_subtree() {
        let mut node = internal(&[10, 20], &[100, 101, 102]);
        let (separator, right) = node.remove_child(0);
        assert_eq!(separator.key, 10);
        assert_eq!(right, handle(101));
        assert_eq!(keys(&node), vec![20]);
        assert_eq!(child_indices(&node), vec![100, 102]);
    }

    #[test]
    fn pop_and_push_move_boundary_child() {
        let mut node = internal(&[10, 20], &[100, 101, 102]);
        let (entry, child) = node.pop_back().unwrap();
        assert_eq!((entry.key, child), (20, Some(handle(102))));
        let (entry, child) = node.pop_front().unwrap();
        assert_eq!((entry.key, child), (10, Some(handle(100))));
        assert_eq!(child_indices(&node), vec![101]);

        node.push_front(Entry::new(5, handle(5)), Some(handle(99)));
        node.push_back(Entry::new(25, handle(25)), Some(handle(103)));
        assert_eq!(keys(&node), vec![5, 25]);
        assert_eq!(child_indices(&node), vec![99, 101, 103]);
    }

    #[test]
    fn pop_from_leaf_has_no_child() {
        let mut node = leaf(&[1]);
        assert_eq!(node.pop_front().map(|(e, c)| (e.key, c)), Some((1, None)));
        assert!(node.pop_back().is_none());
        assert!(node.pop_front().is_none());
    }
}
