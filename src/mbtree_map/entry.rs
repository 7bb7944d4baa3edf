use core::fmt;
use core::mem;

use crate::raw::{Handle, Path, PathElement, RawMBTreeMap};

/// A view into a single entry in a map, which may either be vacant or occupied.
///
/// This `enum` is constructed from the [`entry`] method on [`crate::MBTreeMap`].
/// Both variants keep the path recorded by the lookup, so inserting through a
/// vacant entry or removing through an occupied one does not search again.
///
/// # Examples
///
/// ```
/// use mbtree::MBTreeMap;
/// use mbtree::mbtree_map::Entry;
///
/// let mut map = MBTreeMap::new();
///
/// match map.entry("oz") {
///     Entry::Vacant(v) => {
///         v.insert(1);
///     }
///     Entry::Occupied(mut o) => {
///         *o.get_mut() += 1;
///     }
/// }
/// assert_eq!(map["oz"], 1);
/// ```
///
/// [`entry`]: crate::MBTreeMap::entry
pub enum Entry<'a, K: 'a, V: 'a> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),

    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Vacant(v) => f.debug_tuple("Entry").field(v).finish(),
            Entry::Occupied(o) => f.debug_tuple("Entry").field(o).finish(),
        }
    }
}

/// A view into a vacant entry in a `MBTreeMap`.
/// It is part of the [`Entry`] enum.
pub struct VacantEntry<'a, K, V> {
    pub(super) key: K,
    pub(super) path: Path,
    pub(super) tree: &'a mut RawMBTreeMap<K, V>,
}

impl<K: fmt::Debug, V> fmt::Debug for VacantEntry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VacantEntry").field("key", &self.key).finish()
    }
}

/// A view into an occupied entry in a `MBTreeMap`.
/// It is part of the [`Entry`] enum.
pub struct OccupiedEntry<'a, K, V> {
    pub(super) path: Path,
    pub(super) tree: &'a mut RawMBTreeMap<K, V>,
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OccupiedEntry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupiedEntry").field("key", self.key()).field("value", self.get()).finish()
    }
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Ensures a value is in the entry by inserting the default if empty, and returns
    /// a mutable reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    ///
    /// let mut map: MBTreeMap<&str, usize> = MBTreeMap::new();
    /// map.entry("poneyland").or_insert(12);
    ///
    /// assert_eq!(map["poneyland"], 12);
    /// ```
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default),
        }
    }

    /// Ensures a value is in the entry by inserting the result of the default function if empty,
    /// and returns a mutable reference to the value in the entry.
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default()),
        }
    }

    /// Ensures a value is in the entry by inserting, if empty, the result of the default function.
    ///
    /// The default function receives a reference to the key that was moved
    /// into the `.entry(key)` call.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    ///
    /// let mut map: MBTreeMap<&str, usize> = MBTreeMap::new();
    ///
    /// map.entry("poneyland").or_insert_with_key(|key| key.chars().count());
    ///
    /// assert_eq!(map["poneyland"], 9);
    /// ```
    pub fn or_insert_with_key<F: FnOnce(&K) -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => {
                let value = default(&v.key);
                v.insert(value)
            }
        }
    }

    /// Returns a reference to this entry's key.
    #[allow(clippy::must_use_candidate)]
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(o) => o.key(),
            Entry::Vacant(v) => v.key(),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts into the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    ///
    /// let mut map: MBTreeMap<&str, usize> = MBTreeMap::new();
    ///
    /// map.entry("poneyland")
    ///    .and_modify(|e| { *e += 1 })
    ///    .or_insert(42);
    /// assert_eq!(map["poneyland"], 42);
    ///
    /// map.entry("poneyland")
    ///    .and_modify(|e| { *e += 1 })
    ///    .or_insert(42);
    /// assert_eq!(map["poneyland"], 43);
    /// ```
    #[allow(clippy::return_self_not_must_use)]
    pub fn and_modify<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        if let Entry::Occupied(ref mut o) = self {
            f(o.get_mut());
        }
        self
    }
}

impl<'a, K, V: Default> Entry<'a, K, V> {
    /// Ensures a value is in the entry by inserting the default value if empty,
    /// and returns a mutable reference to the value in the entry.
    #[allow(clippy::must_use_candidate)]
    pub fn or_default(self) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(V::default()),
        }
    }
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value
    /// through the `VacantEntry`.
    #[allow(clippy::must_use_candidate)]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    #[allow(clippy::must_use_candidate)]
    pub fn into_key(self) -> K {
        self.key
    }

    /// Sets the value of the entry with the `VacantEntry`'s key,
    /// and returns a mutable reference to it.
    ///
    /// The entry goes in at the insertion point found by the original lookup;
    /// any splits it causes are handled on the way back up that path.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    /// use mbtree::mbtree_map::Entry;
    ///
    /// let mut map: MBTreeMap<&str, u32> = MBTreeMap::new();
    ///
    /// if let Entry::Vacant(o) = map.entry("poneyland") {
    ///     o.insert(37);
    /// }
    /// assert_eq!(map["poneyland"], 37);
    /// ```
    pub fn insert(self, value: V) -> &'a mut V {
        let VacantEntry { key, path, tree } = self;
        let handle = tree.insert_at(&path, key, value);
        tree.value_mut(handle)
    }
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    fn value_handle(&self) -> Handle {
        self.tree.entry_at(self.target()).value
    }

    fn target(&self) -> PathElement {
        match self.path.last() {
            Some(&target) => target,
            None => unreachable!("lookup always records the root"),
        }
    }

    /// Gets a reference to the key stored in the map.
    #[must_use]
    pub fn key(&self) -> &K {
        &self.tree.entry_at(self.target()).key
    }

    /// Take ownership of the key and value from the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    /// use mbtree::mbtree_map::Entry;
    ///
    /// let mut map: MBTreeMap<&str, usize> = MBTreeMap::new();
    /// map.entry("poneyland").or_insert(12);
    ///
    /// if let Entry::Occupied(o) = map.entry("poneyland") {
    ///     assert_eq!(o.remove_entry(), ("poneyland", 12));
    /// }
    /// assert!(map.is_empty());
    /// ```
    #[allow(clippy::must_use_candidate)]
    pub fn remove_entry(self) -> (K, V) {
        self.tree.remove_at(self.path)
    }

    /// Gets a reference to the value in the entry.
    #[must_use]
    pub fn get(&self) -> &V {
        self.tree.value(self.value_handle())
    }

    /// Gets a mutable reference to the value in the entry.
    ///
    /// If you need a reference to the `OccupiedEntry` that may outlive the
    /// destruction of the `Entry` value, see [`into_mut`].
    ///
    /// [`into_mut`]: OccupiedEntry::into_mut
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    /// use mbtree::mbtree_map::Entry;
    ///
    /// let mut map: MBTreeMap<&str, usize> = MBTreeMap::new();
    /// map.entry("poneyland").or_insert(12);
    ///
    /// if let Entry::Occupied(mut o) = map.entry("poneyland") {
    ///     *o.get_mut() += 10;
    ///     assert_eq!(*o.get(), 22);
    ///     *o.get_mut() += 2;
    /// }
    /// assert_eq!(map["poneyland"], 24);
    /// ```
    pub fn get_mut(&mut self) -> &mut V {
        let handle = self.value_handle();
        self.tree.value_mut(handle)
    }

    /// Converts the entry into a mutable reference to its value.
    #[must_use = "`self` will be dropped if the result is not used"]
    pub fn into_mut(self) -> &'a mut V {
        let handle = self.value_handle();
        let tree = self.tree;
        tree.value_mut(handle)
    }

    /// Sets the value of the entry, and returns the entry's old value.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Takes the value of the entry out of the map, and returns it.
    #[allow(clippy::must_use_candidate)]
    pub fn remove(self) -> V {
        self.remove_entry().1
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::mbtree_map::Entry;
    use crate::{MBTreeMap, Order};
    use pretty_assertions::assert_eq;

    fn map(m: usize, keys: impl IntoIterator<Item = u32>) -> MBTreeMap<u32, u32> {
        let mut map = MBTreeMap::with_order(Order::new(m).unwrap());
        for k in keys {
            map.insert(k, k);
        }
        map
    }

    #[test]
    fn vacant_insert_splits_along_recorded_path() {
        let mut map = map(3, [10, 20]);
        assert_eq!(map.height(), 1);
        *map.entry(30).or_insert(0) += 5;
        map.raw.validate_invariants();
        assert_eq!(map.height(), 2);
        assert_eq!(map.get(&30), Some(&5));
    }

    #[test]
    fn occupied_remove_rebalances() {
        let mut map = map(3, 1..=7);
        assert_eq!(map.height(), 3);
        let Entry::Occupied(o) = map.entry(4) else {
            panic!("4 is present");
        };
        assert_eq!(o.key(), &4);
        assert_eq!(o.remove_entry(), (4, 4));
        map.raw.validate_invariants();
        assert_eq!(map.keys().copied().collect::<alloc::vec::Vec<_>>(), [1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn entry_counts_words() {
        let mut map: MBTreeMap<&str, usize> = MBTreeMap::with_order(Order::new(4).unwrap());
        for word in "a b c a b a d e f g a".split(' ') {
            *map.entry(word).or_default() += 1;
        }
        map.raw.validate_invariants();
        assert_eq!(map.len(), 7);
        assert_eq!(map["a"], 4);
        assert_eq!(map["b"], 2);
        assert_eq!(map["g"], 1);
    }

    #[test]
    fn occupied_insert_keeps_len() {
        let mut map = map(5, 0..20);
        if let Entry::Occupied(mut o) = map.entry(11) {
            assert_eq!(o.insert(99), 11);
        }
        assert_eq!(map.len(), 20);
        assert_eq!(map[&11], 99);
    }
}
