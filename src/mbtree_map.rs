use alloc::string::String;
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::Index;

use crate::raw::RawMBTreeMap;
use crate::{ConfigError, Order};

mod entry;
mod iter;
mod shape;

pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use iter::{IntoIter, IntoKeys, IntoValues, Iter, Keys, Values};
pub use shape::NodeRef;

/// An ordered map based on a [B-Tree] whose order is chosen at construction.
///
/// Given a key type with a [total order], an ordered map stores its entries in key order.
/// That means that keys must be of a type that implements the [`Ord`] trait,
/// such that two keys can always be compared to determine their [`Ordering`].
///
/// Every map has an [`Order`] `M`: internal nodes have at most `M` children,
/// every node holds at most `M - 1` entries, and every node other than the
/// root holds at least `ceil(M / 2) - 1`. All leaves sit at the same depth, so
/// lookups, inserts and removals visit O(log n) nodes and do O(M) work in each.
///
/// Inserting walks down to a leaf, adds the entry there and splits overfull
/// nodes on the way back up, growing a new root when the old one splits.
/// Removing an entry from an internal node first swaps in its in-order
/// successor (the smallest key of the right subtree); deficient nodes then
/// borrow from a sibling through the parent if one can spare an entry, and
/// merge with a sibling otherwise. A root left with no entries is replaced by
/// its only child.
///
/// Iterators obtained from functions such as [`MBTreeMap::iter`], [`MBTreeMap::into_iter`],
/// [`MBTreeMap::values`], or [`MBTreeMap::keys`] produce their items in key order, and take
/// worst-case logarithmic and amortized constant time per item returned.
///
/// It is a logic error for a key to be modified in such a way that the key's ordering relative to
/// any other key, as determined by the [`Ord`] trait, changes while it is in the map. The behavior
/// resulting from such a logic error is not specified, but will be encapsulated to the
/// `MBTreeMap` that observed the logic error and not result in undefined behavior.
///
/// `MBTreeMap` is not synchronized; share it across threads behind a lock.
///
/// # Examples
///
/// ```
/// use mbtree::{MBTreeMap, Order};
///
/// // type inference lets us omit an explicit type signature (which
/// // would be `MBTreeMap<&str, &str>` in this example).
/// let mut movie_reviews = MBTreeMap::with_order(Order::new(4).unwrap());
///
/// // review some movies.
/// movie_reviews.insert("Office Space",       "Deals with real issues in the workplace.");
/// movie_reviews.insert("Pulp Fiction",       "Masterpiece.");
/// movie_reviews.insert("The Godfather",      "Very enjoyable.");
/// movie_reviews.insert("The Blues Brothers", "Eye lyked it a lot.");
///
/// // check for a specific one.
/// if !movie_reviews.contains_key("Les Misérables") {
///     println!("We've got {} reviews, but Les Misérables ain't one.",
///              movie_reviews.len());
/// }
///
/// // oops, this review has a lot of spelling mistakes, let's delete it.
/// movie_reviews.remove("The Blues Brothers");
///
/// // look up the values associated with some keys.
/// let to_find = ["Up!", "Office Space"];
/// for movie in &to_find {
///     match movie_reviews.get(movie) {
///        Some(review) => println!("{movie}: {review}"),
///        None => println!("{movie} is unreviewed.")
///     }
/// }
///
/// // Look up the value for a key (will panic if the key is not found).
/// println!("Movie review: {}", movie_reviews["Office Space"]);
///
/// // iterate over everything.
/// for (movie, review) in &movie_reviews {
///     println!("{movie}: \"{review}\"");
/// }
/// ```
///
/// A `MBTreeMap` with a known list of items can be initialized from an array:
///
/// ```
/// use mbtree::MBTreeMap;
///
/// let solar_distance = MBTreeMap::from([
///     ("Mercury", 0.4),
///     ("Venus", 0.7),
///     ("Earth", 1.0),
///     ("Mars", 1.5),
/// ]);
/// ```
///
/// [B-Tree]: https://en.wikipedia.org/wiki/B-tree
/// [total order]: https://en.wikipedia.org/wiki/Total_order
pub struct MBTreeMap<K, V> {
    raw: RawMBTreeMap<K, V>,
}

impl<K, V> MBTreeMap<K, V> {
    /// Makes a new, empty `MBTreeMap` of order [`Order::DEFAULT`].
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::{MBTreeMap, Order};
    ///
    /// let mut map = MBTreeMap::new();
    /// assert_eq!(map.order(), Order::DEFAULT);
    ///
    /// // entries can now be inserted into the empty map
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub fn new() -> MBTreeMap<K, V> {
        MBTreeMap::with_order(Order::DEFAULT)
    }

    /// Makes a new, empty `MBTreeMap` of the given order.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::{MBTreeMap, Order};
    ///
    /// let map: MBTreeMap<u8, u8> = MBTreeMap::with_order(Order::new(3).unwrap());
    /// assert_eq!(map.order().max_entries(), 2);
    /// ```
    #[must_use]
    pub fn with_order(order: Order) -> MBTreeMap<K, V> {
        MBTreeMap {
            raw: RawMBTreeMap::new(order),
        }
    }

    /// Makes a new, empty `MBTreeMap`, validating `order` first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OrderTooSmall`] if `order` is 2 or less. No map is
    /// produced in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::{ConfigError, MBTreeMap};
    ///
    /// assert!(MBTreeMap::<u8, u8>::try_with_order(3).is_ok());
    /// assert_eq!(
    ///     MBTreeMap::<u8, u8>::try_with_order(2).unwrap_err(),
    ///     ConfigError::OrderTooSmall { order: 2 },
    /// );
    /// ```
    pub fn try_with_order(order: usize) -> Result<MBTreeMap<K, V>, ConfigError> {
        Ok(MBTreeMap::with_order(Order::new(order)?))
    }

    /// The order this map was built with.
    #[must_use]
    pub const fn order(&self) -> Order {
        self.raw.order()
    }

    /// Clears the map, removing all elements. The order is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    ///
    /// let mut a = MBTreeMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of elements in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    ///
    /// let mut a = MBTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Number of levels in the tree. A map whose root is a leaf, including an
    /// empty map, has height 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    ///
    /// let map = MBTreeMap::from_pairs(3, [(1, ()), (2, ()), (3, ())]).unwrap();
    /// assert_eq!(map.height(), 2);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[allow(clippy::must_use_candidate)]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first_key_value()
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    #[allow(clippy::must_use_candidate)]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last_key_value()
    }

    /// Removes and returns the first element in the map.
    /// The key of this element is the minimum key that was in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    ///
    /// let mut map = MBTreeMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// while let Some((key, _val)) = map.pop_first() {
    ///     assert!(map.iter().all(|(k, _v)| *k > key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.pop_first()
    }

    /// Removes and returns the last element in the map.
    /// The key of this element is the maximum key that was in the map.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.pop_last()
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    ///
    /// let mut map = MBTreeMap::new();
    /// map.insert(3, "c");
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.raw)
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Creates a consuming iterator visiting all the keys, in sorted order.
    /// The map cannot be used after calling this.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    ///
    /// let mut a = MBTreeMap::new();
    /// a.insert(2, "b");
    /// a.insert(1, "a");
    ///
    /// let keys: Vec<i32> = a.into_keys().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn into_keys(self) -> IntoKeys<K, V> {
        IntoKeys { inner: self.into_iter() }
    }

    /// Creates a consuming iterator visiting all the values, in order by key.
    /// The map cannot be used after calling this.
    pub fn into_values(self) -> IntoValues<K, V> {
        IntoValues { inner: self.into_iter() }
    }

    /// A view of the root node, for inspecting the shape of the tree.
    pub fn root(&self) -> NodeRef<'_, K, V> {
        NodeRef::new(&self.raw, self.raw.root())
    }

    /// Renders the tree shape as text, one node per line, children indented
    /// under their parent. Meant for debugging; the format may change.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    ///
    /// let map = MBTreeMap::from_pairs(3, [(1, ()), (2, ()), (3, ())]).unwrap();
    /// assert_eq!(map.render(), "[2]\n  [1]\n  [3]\n");
    /// ```
    #[must_use]
    pub fn render(&self) -> String
    where
        K: fmt::Debug,
    {
        shape::render(self.root())
    }
}

impl<K: Ord, V> MBTreeMap<K, V> {
    /// Builds a map of the given order by inserting `pairs` in sequence.
    /// Later duplicates overwrite earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OrderTooSmall`] if `order` is 2 or less.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    ///
    /// let map = MBTreeMap::from_pairs(3, [(2, 'x'), (1, 'a'), (2, 'b')]).unwrap();
    /// assert_eq!(map.order().get(), 3);
    /// assert_eq!(map.iter().collect::<Vec<_>>(), [(&1, &'a'), (&2, &'b')]);
    /// ```
    pub fn from_pairs<I>(order: usize, pairs: I) -> Result<MBTreeMap<K, V>, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = MBTreeMap::try_with_order(order)?;
        map.extend(pairs);
        Ok(map)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    ///
    /// let mut map = MBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    ///
    /// The supplied key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_key_value(key)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    ///
    /// let mut map = MBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.contains_key(&1), true);
    /// assert_eq!(map.contains_key(&2), false);
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains_key(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    ///
    /// let mut map = MBTreeMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned.
    ///
    /// If the map did have this key present, the value is updated in place, and
    /// the old value is returned. The key is not updated, though; this matters
    /// for types that can be `==` without being identical.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    ///
    /// let mut map = MBTreeMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.is_empty(), false);
    ///
    /// map.insert(37, "b");
    /// assert_eq!(map.insert(37, "c"), Some("b"));
    /// assert_eq!(map[&37], "c");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(key, value)
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    ///
    /// let mut map = MBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the key
    /// was previously in the map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove_entry(key)
    }

    /// Gets the given key's corresponding entry in the map for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbtree::MBTreeMap;
    ///
    /// let mut count: MBTreeMap<&str, usize> = MBTreeMap::new();
    ///
    /// // count the number of occurrences of letters in the vec
    /// for x in ["a", "b", "a", "c", "a", "b"] {
    ///     count.entry(x).and_modify(|curr| *curr += 1).or_insert(1);
    /// }
    ///
    /// assert_eq!(count["a"], 3);
    /// assert_eq!(count["b"], 2);
    /// assert_eq!(count["c"], 1);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let lookup = self.raw.lookup(&key);
        if lookup.found {
            Entry::Occupied(OccupiedEntry {
                path: lookup.path,
                tree: &mut self.raw,
            })
        } else {
            Entry::Vacant(VacantEntry {
                key,
                path: lookup.path,
                tree: &mut self.raw,
            })
        }
    }
}

impl<K: Clone, V: Clone> Clone for MBTreeMap<K, V> {
    fn clone(&self) -> Self {
        MBTreeMap { raw: self.raw.clone() }
    }
}

impl<K: Hash, V: Hash> Hash for MBTreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

/// Maps are equal when they hold the same entries, whatever their orders.
impl<K: PartialEq, V: PartialEq> PartialEq for MBTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq> Eq for MBTreeMap<K, V> {}

impl<K: PartialOrd, V: PartialOrd> PartialOrd for MBTreeMap<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord> Ord for MBTreeMap<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for MBTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for MBTreeMap<K, V> {
    fn default() -> Self {
        MBTreeMap::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for MBTreeMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = MBTreeMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for MBTreeMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Ord + Copy, V: Copy> Extend<(&'a K, &'a V)> for MBTreeMap<K, V> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a MBTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V> IntoIterator for MBTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
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
    /// ```
    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter::new(self.raw)
    }
}

impl<K, Q, V> Index<&Q> for MBTreeMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `MBTreeMap`.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for MBTreeMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}
