use core::borrow::Borrow;
use core::ops::{Index, IndexMut};

use super::AvlTreeMap;
use crate::Rank;
use crate::error::{Error, Result};

impl<K, V> AvlTreeMap<K, V> {
    /// Returns the key-value pair at position `rank` in sorted order.
    ///
    /// The rank is zero-based: `select(0)` is the smallest key and
    /// `select(len - 1)` the largest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `rank >= self.len()`.
    ///
    /// # Complexity
    ///
    /// O(log n). Each step compares the remaining rank with the size of the left
    /// subtree.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::{AvlTreeMap, Error};
    ///
    /// let map = AvlTreeMap::from([(30, "c"), (10, "a"), (20, "b")]);
    /// assert_eq!(map.select(0), Ok((&10, &"a")));
    /// assert_eq!(map.select(2), Ok((&30, &"c")));
    /// assert_eq!(map.select(3), Err(Error::InvalidArgument { rank: 3, len: 3 }));
    /// ```
    pub fn select(&self, rank: usize) -> Result<(&K, &V)> {
        self.raw.get_by_rank(rank).ok_or(Error::InvalidArgument {
            rank,
            len: self.len(),
        })
    }

    /// Returns the key-value pair at position `rank` in sorted order.
    ///
    /// The rank is zero-based. Returns `None` if `rank` is out of bounds.
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
    /// map.insert("a", 10);
    /// map.insert("c", 30);
    /// map.insert("b", 20);
    ///
    /// let (key, value) = map.get_by_rank(1).unwrap();
    /// assert_eq!((key, value), (&"b", &20));
    /// assert!(map.get_by_rank(3).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<(&K, &V)> {
        self.raw.get_by_rank(rank)
    }

    /// Returns the key and a mutable reference to the value at position `rank`
    /// in sorted order.
    ///
    /// The key is returned as a shared reference because mutating it would
    /// violate the map's ordering invariants.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(10, "a");
    /// map.insert(5, "b");
    ///
    /// if let Some((key, value)) = map.get_by_rank_mut(0) {
    ///     assert_eq!(*key, 5);
    ///     *value = "updated";
    /// }
    ///
    /// assert_eq!(map.get(&5), Some(&"updated"));
    /// ```
    #[must_use]
    pub fn get_by_rank_mut(&mut self, rank: usize) -> Option<(&K, &mut V)> {
        self.raw.get_by_rank_mut(rank)
    }

    /// Returns the number of keys in the map that are strictly less than `key`.
    ///
    /// The key does not need to be present. For a present key this is its
    /// zero-based position, so `select(rank(k))` returns `k`.
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
    /// let map = AvlTreeMap::from([(10, ()), (20, ()), (30, ())]);
    /// assert_eq!(map.rank(&5), 0);
    /// assert_eq!(map.rank(&20), 1);
    /// assert_eq!(map.rank(&25), 2);
    /// assert_eq!(map.rank(&99), 3);
    /// ```
    #[must_use]
    pub fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.rank(key)
    }

    /// Returns the zero-based rank of `key` in sorted order, or `None` if the
    /// key is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(10, "a");
    /// map.insert(20, "b");
    ///
    /// assert_eq!(map.rank_of(&10), Some(0));
    /// assert_eq!(map.rank_of(&15), None);
    /// ```
    #[must_use]
    pub fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.rank_of(key)
    }
}

/// Indexes into the map by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use avl_ost::{AvlTreeMap, Rank};
///
/// let mut map = AvlTreeMap::new();
/// map.insert("a", 1);
/// map.insert("b", 2);
///
/// assert_eq!(map[Rank(0)], 1);
/// ```
impl<K, V> Index<Rank> for AvlTreeMap<K, V> {
    type Output = V;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.get_by_rank(rank.0).map(|(_, v)| v).expect("index out of bounds")
    }
}

/// Mutably indexes into the map by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use avl_ost::{AvlTreeMap, Rank};
///
/// let mut map = AvlTreeMap::from([("a", 1), ("b", 2)]);
/// map[Rank(1)] = 5;
///
/// assert_eq!(map.get(&"b"), Some(&5));
/// ```
impl<K, V> IndexMut<Rank> for AvlTreeMap<K, V> {
    fn index_mut(&mut self, rank: Rank) -> &mut Self::Output {
        self.get_by_rank_mut(rank.0).map(|(_, v)| v).expect("index out of bounds")
    }
}
