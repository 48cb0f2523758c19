use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Index;

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::raw::{Node, RawAvlTreeMap};

mod order_statistic;

pub use crate::Rank;

// Inline capacity of the iterator stacks. An AVL tree of height 32 holds millions of
// entries; deeper trees spill to the heap.
const STACK_DEPTH: usize = 32;

/// An ordered map based on an [AVL tree].
///
/// Given a key type with a [total order], an ordered map stores its entries in key order.
/// That means that keys must be of a type that implements the [`Ord`] trait,
/// such that two keys can always be compared to determine their [`Ordering`].
/// Two keys that compare [`Ordering::Equal`] are the same key, whatever else they hold.
///
/// Every node of the tree also records the size and height of the subtree below it.
/// Sizes make the order-statistic queries ([`select`](AvlTreeMap::select),
/// [`rank`](AvlTreeMap::rank), indexing by [`Rank`]) O(log n); heights drive the
/// rebalancing that keeps the tree within the AVL height bound of roughly
/// 1.44 · log<sub>2</sub>(n + 2) no matter the insertion order.
///
/// It is a logic error for a key to be modified in such a way that the key's ordering relative to
/// any other key, as determined by the [`Ord`] trait, changes while it is in the map. The behavior
/// resulting from such a logic error is not specified, but will be encapsulated to the
/// `AvlTreeMap` that observed the logic error and not result in undefined behavior.
///
/// # Height convention
///
/// [`height`](AvlTreeMap::height) reports 0 for both an empty map and a map with a single
/// entry: an empty subtree counts as height 0, the same as a leaf. Balance factors are
/// computed with the same convention.
///
/// # Examples
///
/// ```
/// use avl_ost::AvlTreeMap;
///
/// let mut movie_reviews = AvlTreeMap::new();
///
/// movie_reviews.insert("Office Space",       "Deals with real issues in the workplace.");
/// movie_reviews.insert("Pulp Fiction",       "Masterpiece.");
/// movie_reviews.insert("The Godfather",      "Very enjoyable.");
/// movie_reviews.insert("The Blues Brothers", "Eye lyked it a lot.");
///
/// if !movie_reviews.contains_key("Les Miserables") {
///     println!("We've got {} reviews, but Les Miserables ain't one.",
///              movie_reviews.len());
/// }
///
/// // oops, this review has a lot of spelling mistakes, let's delete it.
/// movie_reviews.remove("The Blues Brothers");
///
/// // the second review in title order
/// let (title, _) = movie_reviews.select(1).unwrap();
/// assert_eq!(*title, "Pulp Fiction");
///
/// // iterate over everything.
/// for (movie, review) in &movie_reviews {
///     println!("{movie}: \"{review}\"");
/// }
/// ```
///
/// [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree
/// [total order]: https://en.wikipedia.org/wiki/Total_order
pub struct AvlTreeMap<K, V> {
    raw: RawAvlTreeMap<K, V>,
}

/// An iterator over the entries of an `AvlTreeMap`.
///
/// This `struct` is created by the [`iter`] method on [`AvlTreeMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use avl_ost::AvlTreeMap;
///
/// let map = AvlTreeMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: AvlTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    // Ancestors whose entry has not been yielded yet, nearest on top.
    front: SmallVec<[&'a Node<K, V>; STACK_DEPTH]>,
    back: SmallVec<[&'a Node<K, V>; STACK_DEPTH]>,
    remaining: usize,
}

/// A mutable iterator over the entries of an `AvlTreeMap`.
///
/// This `struct` is created by the [`iter_mut`] method on [`AvlTreeMap`]. Unlike
/// [`Iter`] it only walks forward.
///
/// # Examples
///
/// ```
/// use avl_ost::AvlTreeMap;
///
/// let mut map = AvlTreeMap::from([(1, 10), (2, 20)]);
/// for (_, value) in map.iter_mut() {
///     *value += 1;
/// }
/// let values: Vec<_> = map.values().copied().collect();
/// assert_eq!(values, [11, 21]);
/// ```
///
/// [`iter_mut`]: AvlTreeMap::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, K, V> {
    stack: SmallVec<[PendingMut<'a, K, V>; STACK_DEPTH]>,
    remaining: usize,
}

// An entry waiting to be yielded, together with the right subtree to visit after it.
type PendingMut<'a, K, V> = (&'a K, &'a mut V, Option<&'a mut Node<K, V>>);

/// An owning iterator over the entries of an `AvlTreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`AvlTreeMap`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

/// An iterator over the keys of an `AvlTreeMap`.
///
/// This `struct` is created by the [`keys`] method on [`AvlTreeMap`].
///
/// [`keys`]: AvlTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of an `AvlTreeMap`.
///
/// This `struct` is created by the [`values`] method on [`AvlTreeMap`].
///
/// [`values`]: AvlTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// A mutable iterator over the values of an `AvlTreeMap`.
///
/// This `struct` is created by the [`values_mut`] method on [`AvlTreeMap`].
///
/// [`values_mut`]: AvlTreeMap::values_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

/// An owning iterator over the keys of an `AvlTreeMap`.
///
/// This `struct` is created by the [`into_keys`] method on [`AvlTreeMap`].
///
/// [`into_keys`]: AvlTreeMap::into_keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoKeys<K, V> {
    inner: IntoIter<K, V>,
}

/// An owning iterator over the values of an `AvlTreeMap`.
///
/// This `struct` is created by the [`into_values`] method on [`AvlTreeMap`].
///
/// [`into_values`]: AvlTreeMap::into_values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoValues<K, V> {
    inner: IntoIter<K, V>,
}

impl<K, V> AvlTreeMap<K, V> {
    /// Makes a new, empty `AvlTreeMap`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    ///
    /// // entries can now be inserted into the empty map
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub const fn new() -> AvlTreeMap<K, V> {
        AvlTreeMap {
            raw: RawAvlTreeMap::new(),
        }
    }

    /// Clears the map, removing all elements.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut a = AvlTreeMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns a reference to the value corresponding to the key, or `None` if the
    /// key is absent.
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
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    ///
    /// The returned key is the one stored in the map, which may differ from `k` in
    /// everything but ordering.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get_key_value(&1), Some((&1, &"a")));
    /// assert_eq!(map.get_key_value(&2), None);
    /// ```
    pub fn get_key_value<Q>(&self, k: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.get_key_value(k)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.contains_key(&1), true);
    /// assert_eq!(map.contains_key(&2), false);
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.contains_key(key)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned.
    ///
    /// If the map did have this key present, the value is updated in place and the old
    /// value is returned. The key is not updated, and the tree is not restructured.
    ///
    /// # Complexity
    ///
    /// O(log n), with at most one (single or double) rotation per ancestor.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.is_empty(), false);
    ///
    /// map.insert(37, "b");
    /// assert_eq!(map.insert(37, "c"), Some("b"));
    /// assert_eq!(map[&37], "c");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        K: Ord,
    {
        self.raw.insert(key, value)
    }

    /// Associates `value` with `key`, where a `None` value removes the key instead.
    ///
    /// `put(key, Some(value))` behaves like [`insert`](AvlTreeMap::insert);
    /// `put(key, None)` behaves like [`remove`](AvlTreeMap::remove) and is a no-op when
    /// the key is absent. Either way the previous value, if any, is returned.
    ///
    /// Prefer calling `insert` or `remove` directly. This form exists for callers that
    /// carry "absent" values through an `Option` and expect it to clear the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// assert_eq!(map.put("a", Some(1)), None);
    /// assert_eq!(map.put("a", Some(2)), Some(1));
    /// assert_eq!(map.put("a", None), Some(2));
    /// assert_eq!(map.put("a", None), None);
    /// assert!(map.is_empty());
    /// ```
    pub fn put(&mut self, key: K, value: Option<V>) -> Option<V>
    where
        K: Ord,
    {
        match value {
            Some(value) => self.raw.insert(key, value),
            None => self.raw.remove(&key),
        }
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// Removing an absent key is a no-op, so removing the same key twice is the same
    /// as removing it once.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove_entry(&1), Some((1, "a")));
    /// assert_eq!(map.remove_entry(&1), None);
    /// ```
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.remove_entry(key)
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first_key_value()
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.last_key_value(), Some((&2, &"a")));
    /// ```
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last_key_value()
    }

    /// Returns the smallest key in the map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchElement`] if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::{AvlTreeMap, Error};
    ///
    /// let mut map = AvlTreeMap::new();
    /// assert_eq!(map.min_key(), Err(Error::NoSuchElement));
    /// map.insert(3, "c");
    /// map.insert(1, "a");
    /// assert_eq!(map.min_key(), Ok(&1));
    /// ```
    pub fn min_key(&self) -> Result<&K> {
        self.raw.first_key_value().map(|(key, _)| key).ok_or(Error::NoSuchElement)
    }

    /// Returns the largest key in the map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchElement`] if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(3, "c"), (1, "a")]);
    /// assert_eq!(map.max_key(), Ok(&3));
    /// ```
    pub fn max_key(&self) -> Result<&K> {
        self.raw.last_key_value().map(|(key, _)| key).ok_or(Error::NoSuchElement)
    }

    /// Removes and returns the first element in the map.
    /// The key of this element is the minimum key that was in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
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
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.pop_last(), Some((2, "b")));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.pop_last()
    }

    /// Removes and returns the entry with the smallest key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchElement`] if the map is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::{AvlTreeMap, Error};
    ///
    /// let mut map = AvlTreeMap::from([(2, "b"), (1, "a")]);
    /// assert_eq!(map.delete_min(), Ok((1, "a")));
    /// assert_eq!(map.delete_min(), Ok((2, "b")));
    /// assert_eq!(map.delete_min(), Err(Error::NoSuchElement));
    /// ```
    pub fn delete_min(&mut self) -> Result<(K, V)> {
        self.raw.pop_first().ok_or(Error::NoSuchElement)
    }

    /// Removes and returns the entry with the largest key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchElement`] if the map is empty.
    pub fn delete_max(&mut self) -> Result<(K, V)> {
        self.raw.pop_last().ok_or(Error::NoSuchElement)
    }

    /// Returns the entry with the greatest key less than or equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(10, "a"), (20, "b")]);
    /// assert_eq!(map.floor(&15), Some((&10, &"a")));
    /// assert_eq!(map.floor(&20), Some((&20, &"b")));
    /// assert_eq!(map.floor(&5), None);
    /// ```
    pub fn floor<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.floor(key)
    }

    /// Returns the entry with the least key greater than or equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(10, "a"), (20, "b")]);
    /// assert_eq!(map.ceiling(&15), Some((&20, &"b")));
    /// assert_eq!(map.ceiling(&25), None);
    /// ```
    pub fn ceiling<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.ceiling(key)
    }

    /// Creates a consuming iterator visiting all the keys, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<i32> = map.into_keys().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn into_keys(self) -> IntoKeys<K, V> {
        IntoKeys {
            inner: self.into_iter(),
        }
    }

    /// Creates a consuming iterator visiting all the values, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(1, "hello"), (2, "goodbye")]);
    /// let values: Vec<&str> = map.into_values().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn into_values(self) -> IntoValues<K, V> {
        IntoValues {
            inner: self.into_iter(),
        }
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; each iteration step is O(1) amortized.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
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
        let mut iter = Iter {
            front: SmallVec::new(),
            back: SmallVec::new(),
            remaining: self.raw.len(),
        };
        iter.descend_left(self.raw.root());
        iter.descend_right(self.raw.root());
        iter
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::from([("a", 1), ("b", 2), ("c", 3)]);
    ///
    /// // add 10 to the value if the key isn't "a"
    /// for (key, value) in map.iter_mut() {
    ///     if key != &"a" {
    ///         *value += 10;
    ///     }
    /// }
    /// assert_eq!(map[&"c"], 13);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let remaining = self.raw.len();
        let mut iter = IterMut {
            stack: SmallVec::new(),
            remaining,
        };
        iter.descend_left(self.raw.root_mut());
        iter
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut a = AvlTreeMap::new();
    /// a.insert(2, "b");
    /// a.insert(1, "a");
    ///
    /// let keys: Vec<_> = a.keys().cloned().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.iter(),
        }
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.iter(),
        }
    }

    /// Gets a mutable iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut a = AvlTreeMap::new();
    /// a.insert(1, String::from("hello"));
    /// a.insert(2, String::from("goodbye"));
    ///
    /// for value in a.values_mut() {
    ///     value.push_str("!");
    /// }
    ///
    /// let values: Vec<String> = a.values().cloned().collect();
    /// assert_eq!(values, [String::from("hello!"),
    ///                     String::from("goodbye!")]);
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Returns the number of elements in the map.
    ///
    /// # Complexity
    ///
    /// O(1), read from the root's subtree size.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut a = AvlTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the height of the tree.
    ///
    /// An empty subtree counts as height 0, the same as a leaf, so both an empty map
    /// and a single-entry map report 0. Any other tree reports the number of edges on
    /// its longest root-to-leaf path.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// assert_eq!(map.height(), 0);
    /// map.insert(1, ());
    /// assert_eq!(map.height(), 0);
    /// map.insert(2, ());
    /// assert_eq!(map.height(), 1);
    ///
    /// // Sorted insertions stay logarithmic.
    /// let map: AvlTreeMap<u32, ()> = (0..1000).map(|k| (k, ())).collect();
    /// assert!(map.height() <= 15);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }
}

impl<K: Clone, V: Clone> Clone for AvlTreeMap<K, V> {
    fn clone(&self) -> Self {
        AvlTreeMap {
            raw: self.raw.clone(),
        }
    }
}

impl<K: Hash, V: Hash> Hash for AvlTreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for AvlTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq> Eq for AvlTreeMap<K, V> {}

impl<K: PartialOrd, V: PartialOrd> PartialOrd for AvlTreeMap<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord> Ord for AvlTreeMap<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for AvlTreeMap<K, V> {
    fn default() -> Self {
        AvlTreeMap::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTreeMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = AvlTreeMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlTreeMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Ord + Copy, V: Copy> Extend<(&'a K, &'a V)> for AvlTreeMap<K, V> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a AvlTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut AvlTreeMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for AvlTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(2, "b"), (1, "a")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((1, "a")));
    /// assert_eq!(iter.next_back(), Some((2, "b")));
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<K, Q, V> Index<&Q> for AvlTreeMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `AvlTreeMap`.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for AvlTreeMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K, V> Iter<'a, K, V> {
    fn descend_left(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(current) = node {
            self.front.push(current);
            node = current.left();
        }
    }

    fn descend_right(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(current) = node {
            self.back.push(current);
            node = current.right();
        }
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        // Both stacks walk the whole tree; `remaining` stops them from crossing.
        if self.remaining == 0 {
            return None;
        }

        let node = self.front.pop()?;
        self.descend_left(node.right());
        self.remaining -= 1;
        Some((node.key(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<'a, K: 'a, V: 'a> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.back.pop()?;
        self.descend_right(node.left());
        self.remaining -= 1;
        Some((node.key(), node.value()))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Default for Iter<'_, K, V> {
    /// Creates an empty `avl_map::Iter`.
    ///
    /// ```
    /// # use avl_ost::avl_map;
    /// let iter: avl_map::Iter<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            front: SmallVec::new(),
            back: SmallVec::new(),
            remaining: 0,
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> IterMut<'a, K, V> {
    fn descend_left(&mut self, mut node: Option<&'a mut Node<K, V>>) {
        while let Some(current) = node {
            let (key, value, left, right) = current.split_mut();
            self.stack.push((key, value, right));
            node = left;
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value, right) = self.stack.pop()?;
        self.descend_left(right);
        self.remaining -= 1;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K, V> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.remaining).finish()
    }
}

impl<K, V> Default for IterMut<'_, K, V> {
    fn default() -> Self {
        IterMut {
            stack: SmallVec::new(),
            remaining: 0,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("len", &self.inner.len()).finish()
    }
}

impl<K, V> Default for IntoIter<K, V> {
    fn default() -> Self {
        IntoIter {
            inner: alloc::vec::Vec::new().into_iter(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Default for Keys<'_, K, V> {
    fn default() -> Self {
        Keys {
            inner: Iter::default(),
        }
    }
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
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

impl<K, V> Default for Values<'_, K, V> {
    fn default() -> Self {
        Values {
            inner: Iter::default(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

impl<K, V> fmt::Debug for ValuesMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesMut").field("remaining", &self.inner.remaining).finish()
    }
}

impl<K, V> Iterator for IntoKeys<K, V> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for IntoKeys<K, V> {
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back().map(|(k, _)| k)
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
        f.debug_struct("IntoKeys").field("len", &self.inner.len()).finish()
    }
}

impl<K, V> Iterator for IntoValues<K, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for IntoValues<K, V> {
    fn next_back(&mut self) -> Option<V> {
        self.inner.next_back().map(|(_, v)| v)
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
        f.debug_struct("IntoValues").field("len", &self.inner.len()).finish()
    }
}
