use core::borrow::Borrow;
use core::cmp::Ordering;
use core::mem;

use alloc::boxed::Box;
use alloc::vec::Vec;

use log::{debug, trace};

use super::node::{Link, Node};

/// The core AVL tree implementation backing `AvlTreeMap`.
///
/// Mutations descend recursively and repair on the way back up: every node on the
/// search path recomputes its size and height from its children and is then passed
/// through [`balance`] exactly once. Nothing off the search path is touched, which
/// keeps every mutation at O(log n).
#[derive(Clone)]
pub(crate) struct RawAvlTreeMap<K, V> {
    /// The root of the tree, if the tree is non-empty.
    root: Link<K, V>,
}

impl<K, V> RawAvlTreeMap<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self { root: None }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) fn len(&self) -> usize {
        Node::size_of(&self.root)
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the height of the tree. Empty and single-entry trees both have height 0.
    pub(crate) fn height(&self) -> usize {
        Node::height_of(&self.root)
    }

    /// Returns the root node, if any.
    pub(crate) fn root(&self) -> Option<&Node<K, V>> {
        self.root.as_deref()
    }

    /// Returns the root node mutably, if any.
    pub(crate) fn root_mut(&mut self) -> Option<&mut Node<K, V>> {
        self.root.as_deref_mut()
    }

    /// Clears all elements from the tree.
    pub(crate) fn clear(&mut self) {
        debug!("clearing AVL tree with {} entries", self.len());
        self.root = None;
    }

    /// Drains all key-value pairs in key order. O(n), with no rebalancing.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut entries = Vec::with_capacity(self.len());
        drain_into(self.root.take(), &mut entries);
        entries
    }

    /// Returns the first (smallest) key-value pair in the tree.
    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// Returns the last (largest) key-value pair in the tree.
    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some((&node.key, &node.value))
    }

    /// Removes and returns the first (smallest) key-value pair.
    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let (rest, min) = remove_min(self.root.take()?);
        self.root = rest;
        Some(min.into_entry())
    }

    /// Removes and returns the last (largest) key-value pair.
    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let (rest, max) = remove_max(self.root.take()?);
        self.root = rest;
        Some(max.into_entry())
    }

    /// Gets an element by its zero-based rank in key order.
    pub(crate) fn get_by_rank(&self, rank: usize) -> Option<(&K, &V)> {
        let mut current = self.root.as_deref();
        let mut remaining = rank;

        while let Some(node) = current {
            let left_size = Node::size_of(&node.left);
            match remaining.cmp(&left_size) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Equal => return Some((&node.key, &node.value)),
                Ordering::Greater => {
                    remaining -= left_size + 1;
                    current = node.right.as_deref();
                }
            }
        }

        None
    }

    /// Gets a mutable element by its zero-based rank in key order.
    pub(crate) fn get_by_rank_mut(&mut self, rank: usize) -> Option<(&K, &mut V)> {
        let mut current = self.root.as_deref_mut();
        let mut remaining = rank;

        while let Some(node) = current {
            let left_size = Node::size_of(&node.left);
            match remaining.cmp(&left_size) {
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Equal => return Some((&node.key, &mut node.value)),
                Ordering::Greater => {
                    remaining -= left_size + 1;
                    current = node.right.as_deref_mut();
                }
            }
        }

        None
    }
}

impl<K: Ord, V> RawAvlTreeMap<K, V> {
    /// Searches for the node holding `key`.
    fn search<Q>(&self, key: &Q) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root.as_deref();

        while let Some(node) = current {
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => return Some(node),
            }
        }

        None
    }

    /// Returns a reference to the value corresponding to the key.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root.as_deref_mut();

        while let Some(node) = current {
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Greater => current = node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.value),
            }
        }

        None
    }

    /// Returns the key-value pair corresponding to the key.
    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).map(|node| (&node.key, &node.value))
    }

    /// Returns true if the tree contains the specified key.
    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).is_some()
    }

    /// Inserts a key-value pair into the tree.
    /// Returns the old value if the key was already present; the stored key is kept.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (root, old_value) = insert_at(self.root.take(), key, value);
        self.root = Some(root);
        old_value
    }

    /// Removes a key from the tree, returning the stored key and value if present.
    /// Removing an absent key leaves the tree untouched.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let root = self.root.take()?;
        let (root, removed) = remove_at(root, key);
        self.root = root;
        removed
    }

    /// Removes a key from the tree, returning the value if present.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Returns the number of keys strictly less than `key`. The key need not be present.
    pub(crate) fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root.as_deref();
        let mut rank = 0;

        while let Some(node) = current {
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Equal => return rank + Node::size_of(&node.left),
                Ordering::Greater => {
                    rank += Node::size_of(&node.left) + 1;
                    current = node.right.as_deref();
                }
            }
        }

        rank
    }

    /// Returns the rank of `key`, or `None` if the key is not present.
    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root.as_deref();
        let mut rank = 0;

        while let Some(node) = current {
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Equal => return Some(rank + Node::size_of(&node.left)),
                Ordering::Greater => {
                    rank += Node::size_of(&node.left) + 1;
                    current = node.right.as_deref();
                }
            }
        }

        None
    }

    /// Returns the entry with the greatest key less than or equal to `key`.
    pub(crate) fn floor<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root.as_deref();
        let mut best = None;

        while let Some(node) = current {
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Equal => return Some((&node.key, &node.value)),
                Ordering::Greater => {
                    best = Some((&node.key, &node.value));
                    current = node.right.as_deref();
                }
            }
        }

        best
    }

    /// Returns the entry with the least key greater than or equal to `key`.
    pub(crate) fn ceiling<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root.as_deref();
        let mut best = None;

        while let Some(node) = current {
            match key.cmp(node.key.borrow()) {
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => return Some((&node.key, &node.value)),
                Ordering::Less => {
                    best = Some((&node.key, &node.value));
                    current = node.left.as_deref();
                }
            }
        }

        best
    }
}

/// Inserts into the subtree at `link`, returning the new subtree root and the replaced
/// value, if any.
fn insert_at<K: Ord, V>(link: Link<K, V>, key: K, value: V) -> (Box<Node<K, V>>, Option<V>) {
    let Some(mut node) = link else {
        return (Node::leaf(key, value), None);
    };

    let old_value = match key.cmp(&node.key) {
        Ordering::Less => {
            let (left, old_value) = insert_at(node.left.take(), key, value);
            node.left = Some(left);
            old_value
        }
        Ordering::Greater => {
            let (right, old_value) = insert_at(node.right.take(), key, value);
            node.right = Some(right);
            old_value
        }
        Ordering::Equal => {
            // Overwrite in place: the shape is unchanged, so there is nothing to repair.
            let old_value = mem::replace(&mut node.value, value);
            return (node, Some(old_value));
        }
    };

    node.fix();
    (balance(node), old_value)
}

/// Removes `key` from the subtree rooted at `node`, returning the new subtree and the
/// removed entry. When the key is absent the subtree is returned unchanged.
fn remove_at<K, V, Q>(mut node: Box<Node<K, V>>, key: &Q) -> (Link<K, V>, Option<(K, V)>)
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    let removed = match key.cmp(node.key.borrow()) {
        Ordering::Less => {
            let Some(left) = node.left.take() else {
                return (Some(node), None);
            };
            let (left, removed) = remove_at(left, key);
            node.left = left;
            removed
        }
        Ordering::Greater => {
            let Some(right) = node.right.take() else {
                return (Some(node), None);
            };
            let (right, removed) = remove_at(right, key);
            node.right = right;
            removed
        }
        Ordering::Equal => return unlink(node),
    };

    if removed.is_none() {
        return (Some(node), None);
    }

    node.fix();
    (Some(balance(node)), removed)
}

/// Detaches `node` from the tree, returning the subtree that replaces it and its entry.
///
/// A node with at most one child is replaced by that child. Otherwise its in-order
/// successor (the leftmost node of the right subtree) is lifted into its place.
fn unlink<K, V>(mut node: Box<Node<K, V>>) -> (Link<K, V>, Option<(K, V)>) {
    let replacement = match (node.left.take(), node.right.take()) {
        (None, child) | (child, None) => child,
        (Some(left), Some(right)) => {
            let (right, mut successor) = remove_min(right);
            successor.left = Some(left);
            successor.right = right;
            successor.fix();
            Some(balance(successor))
        }
    };

    (replacement, Some(node.into_entry()))
}

/// Removes the leftmost node under `node`. Returns the remaining subtree and the detached
/// node, whose children are both empty.
fn remove_min<K, V>(mut node: Box<Node<K, V>>) -> (Link<K, V>, Box<Node<K, V>>) {
    let Some(left) = node.left.take() else {
        let right = node.right.take();
        return (right, node);
    };

    let (left, min) = remove_min(left);
    node.left = left;
    node.fix();
    (Some(balance(node)), min)
}

/// Removes the rightmost node under `node`. Returns the remaining subtree and the
/// detached node, whose children are both empty.
fn remove_max<K, V>(mut node: Box<Node<K, V>>) -> (Link<K, V>, Box<Node<K, V>>) {
    let Some(right) = node.right.take() else {
        let left = node.left.take();
        return (left, node);
    };

    let (right, max) = remove_max(right);
    node.right = right;
    node.fix();
    (Some(balance(node)), max)
}

/// Restores the balance invariant at `node`, whose children are already balanced and
/// whose own bookkeeping is current. Performs at most two rotations and never recurses.
fn balance<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let factor = node.balance_factor();

    if factor < -1 {
        // Right-heavy. A left-leaning right child needs a double rotation.
        if let Some(right) = node.right.take() {
            node.right = Some(if right.balance_factor() > 0 {
                rotate_right(right)
            } else {
                right
            });
        }
        rotate_left(node)
    } else if factor > 1 {
        // Left-heavy. A right-leaning left child needs a double rotation.
        if let Some(left) = node.left.take() {
            node.left = Some(if left.balance_factor() < 0 {
                rotate_left(left)
            } else {
                left
            });
        }
        rotate_right(node)
    } else {
        node
    }
}

/// Promotes the right child of `node` into its place.
fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };

    node.right = pivot.left.take();
    node.fix();
    pivot.left = Some(node);
    pivot.fix();

    trace!("rotated left, subtree of {} entries now has height {}", pivot.size, pivot.height);
    pivot
}

/// Promotes the left child of `node` into its place.
fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };

    node.left = pivot.right.take();
    node.fix();
    pivot.right = Some(node);
    pivot.fix();

    trace!("rotated right, subtree of {} entries now has height {}", pivot.size, pivot.height);
    pivot
}

/// Moves every entry of `link` into `entries`, in key order.
fn drain_into<K, V>(link: Link<K, V>, entries: &mut Vec<(K, V)>) {
    if let Some(mut node) = link {
        drain_into(node.left.take(), entries);
        let right = node.right.take();
        entries.push(node.into_entry());
        drain_into(right, entries);
    }
}
