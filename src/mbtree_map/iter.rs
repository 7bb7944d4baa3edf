use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use crate::raw::{self, Arena, Handle, Node, Path, PathElement, RawMBTreeMap};

/// An iterator over the entries of a `MBTreeMap`.
///
/// This `struct` is created by the [`iter`] method on [`MBTreeMap`]. See its
/// documentation for more.
///
/// The iterator keeps a stack of `(node, index)` frames instead of recursing,
/// so each step costs O(1) amortized and O(height) in the worst case.
///
/// # Examples
///
/// ```
/// use mbtree::MBTreeMap;
///
/// let map = MBTreeMap::from([(2, "b"), (1, "a")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: super::MBTreeMap::iter
/// [`MBTreeMap`]: super::MBTreeMap
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    tree: &'a RawMBTreeMap<K, V>,
    stack: Path,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(tree: &'a RawMBTreeMap<K, V>) -> Self {
        let mut iter = Iter {
            tree,
            stack: Path::new(),
            remaining: tree.len(),
        };
        if !tree.is_empty() {
            iter.push_leftmost(tree.root());
        }
        iter
    }

    /// Pushes `(node, 0)` for `handle` and every leftmost descendant down to a leaf.
    fn push_leftmost(&mut self, mut handle: Handle) {
        loop {
            self.stack.push(PathElement { node: handle, index: 0 });
            let node = self.tree.node(handle);
            if node.is_leaf() {
                return;
            }
            handle = node.child(0);
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let PathElement { node: handle, index } = self.stack.pop()?;
        let tree = self.tree;
        let node = tree.node(handle);
        let entry = node.entry(index);

        if index + 1 < node.len() {
            self.stack.push(PathElement {
                node: handle,
                index: index + 1,
            });
        }
        if !node.is_leaf() {
            self.push_leftmost(node.child(index + 1));
        }

        self.remaining -= 1;
        Some((&entry.key, tree.value(entry.value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the keys of a `MBTreeMap`.
///
/// This `struct` is created by the [`keys`] method on [`MBTreeMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use mbtree::MBTreeMap;
///
/// let map = MBTreeMap::from([(2, "b"), (1, "a")]);
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, [1, 2]);
/// ```
///
/// [`keys`]: super::MBTreeMap::keys
/// [`MBTreeMap`]: super::MBTreeMap
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    pub(super) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the values of a `MBTreeMap`.
///
/// This `struct` is created by the [`values`] method on [`MBTreeMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use mbtree::MBTreeMap;
///
/// let map = MBTreeMap::from([(2, "b"), (1, "a")]);
/// let values: Vec<_> = map.values().copied().collect();
/// assert_eq!(values, ["a", "b"]);
/// ```
///
/// [`values`]: super::MBTreeMap::values
/// [`MBTreeMap`]: super::MBTreeMap
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    pub(super) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// One node of an owning traversal, already detached from the arena.
struct Frame<K> {
    entries: vec::IntoIter<raw::Entry<K>>,
    children: vec::IntoIter<Handle>,
}

/// An owning iterator over the entries of a `MBTreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`MBTreeMap`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// Nodes are moved out of the tree only when the traversal reaches them;
/// whatever is left unvisited is dropped with the iterator.
///
/// # Examples
///
/// ```
/// use mbtree::MBTreeMap;
///
/// let map = MBTreeMap::from([(2, "b"), (1, "a")]);
/// let mut iter = map.into_iter();
/// assert_eq!(iter.next(), Some((1, "a")));
/// assert_eq!(iter.next(), Some((2, "b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`into_iter`]: IntoIterator::into_iter
/// [`MBTreeMap`]: super::MBTreeMap
pub struct IntoIter<K, V> {
    nodes: Arena<Node<K>>,
    values: Arena<V>,
    stack: Vec<Frame<K>>,
    remaining: usize,
}

impl<K, V> IntoIter<K, V> {
    pub(super) fn new(tree: RawMBTreeMap<K, V>) -> Self {
        let (nodes, values, root, len) = tree.into_parts();
        let mut iter = IntoIter {
            nodes,
            values,
            stack: Vec::new(),
            remaining: len,
        };
        iter.take_leftmost(root);
        iter
    }

    /// Detaches `handle` and its leftmost descendants, pushing a frame for each.
    fn take_leftmost(&mut self, mut handle: Handle) {
        loop {
            let (entries, children) = self.nodes.remove(handle).into_parts();
            let mut children = children.into_iter();
            let first = children.next();
            self.stack.push(Frame {
                entries: entries.into_iter(),
                children,
            });
            match first {
                Some(child) => handle = child,
                None => return,
            }
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some(entry) = frame.entries.next() else {
                self.stack.pop();
                continue;
            };
            if let Some(child) = frame.children.next() {
                self.take_leftmost(child);
            }
            self.remaining -= 1;
            return Some((entry.key, self.values.remove(entry.value)));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("remaining", &self.remaining).finish()
    }
}

/// An owning iterator over the keys of a `MBTreeMap`.
///
/// This `struct` is created by the [`into_keys`] method on [`MBTreeMap`].
/// See its documentation for more.
///
/// [`into_keys`]: super::MBTreeMap::into_keys
/// [`MBTreeMap`]: super::MBTreeMap
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoKeys<K, V> {
    pub(super) inner: IntoIter<K, V>,
}

impl<K, V> Iterator for IntoKeys<K, V> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoKeys<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoKeys<K, V> {}

impl<K, V> fmt::Debug for IntoKeys<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoKeys").field("remaining", &self.inner.remaining).finish()
    }
}

/// An owning iterator over the values of a `MBTreeMap`.
///
/// This `struct` is created by the [`into_values`] method on [`MBTreeMap`].
/// See its documentation for more.
///
/// [`into_values`]: super::MBTreeMap::into_values
/// [`MBTreeMap`]: super::MBTreeMap
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoValues<K, V> {
    pub(super) inner: IntoIter<K, V>,
}

impl<K, V> Iterator for IntoValues<K, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoValues<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoValues<K, V> {}

impl<K, V> fmt::Debug for IntoValues<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoValues").field("remaining", &self.inner.remaining).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::Order;
    use alloc::rc::Rc;
    use core::cell::Cell;
    use pretty_assertions::assert_eq;

    fn tree(m: usize, keys: impl IntoIterator<Item = i32>) -> RawMBTreeMap<i32, i32> {
        let mut tree = RawMBTreeMap::new(Order::new(m).unwrap());
        for k in keys {
            tree.insert(k, -k);
        }
        tree
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let tree = tree(3, []);
        let mut iter = Iter::new(&tree);
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next(), None);
        assert_eq!(IntoIter::new(tree).next(), None);
    }

    #[test]
    fn stack_holds_at_most_one_frame_per_level() {
        let tree = tree(3, 0..500);
        let bound = tree.height();
        let mut iter = Iter::new(&tree);
        assert_eq!(iter.stack.len(), tree.height());
        let mut expected = 0;
        while let Some((&k, &v)) = iter.next() {
            assert!(iter.stack.len() <= bound);
            assert_eq!((k, v), (expected, -expected));
            expected += 1;
        }
        assert_eq!(expected, 500);
    }

    #[test]
    fn clone_resumes_independently() {
        let tree = tree(4, [5, 3, 9, 1, 7]);
        let mut iter = Iter::new(&tree);
        iter.next();
        let rest: Vec<i32> = iter.clone().map(|(k, _)| *k).collect();
        assert_eq!(rest, [3, 5, 7, 9]);
        assert_eq!(iter.len(), 4);
    }

    #[test]
    fn into_iter_detaches_nodes_lazily() {
        let tree = tree(3, 0..64);
        let total = tree.height();
        let mut iter = IntoIter::new(tree);
        // Only the leftmost spine has been taken so far.
        assert_eq!(iter.stack.len(), total);
        assert_eq!(iter.next(), Some((0, 0)));
        assert_eq!(iter.len(), 63);
        let keys: Vec<i32> = iter.map(|(k, _)| k).collect();
        assert_eq!(keys, (1..64).collect::<Vec<_>>());
    }

    #[derive(Clone)]
    struct DropCounter(Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn partially_consumed_into_iter_drops_the_rest() {
        let drops = Rc::new(Cell::new(0));
        let mut tree = RawMBTreeMap::new(Order::new(3).unwrap());
        for k in 0..40 {
            tree.insert(k, DropCounter(Rc::clone(&drops)));
        }
        let mut iter = IntoIter::new(tree);
        for _ in 0..10 {
            drop(iter.next());
        }
        assert_eq!(drops.get(), 10);
        drop(iter);
        assert_eq!(drops.get(), 40);
    }
}
