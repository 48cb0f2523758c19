/// A zero-based rank into the sorted order of a map.
///
/// Indexing an [`AvlTreeMap`](crate::AvlTreeMap) by `Rank` selects the entry at
/// that position in key order, as opposed to indexing by key.
///
/// # Examples
///
/// ```
/// use avl_ost::{AvlTreeMap, Rank};
///
/// let mut map = AvlTreeMap::new();
/// map.insert("b", 20);
/// map.insert("a", 10);
///
/// assert_eq!(map[Rank(0)], 10);
/// assert_eq!(map[Rank(1)], 20);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
