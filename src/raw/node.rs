use alloc::boxed::Box;

/// An owned, possibly empty subtree.
pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

// AVL node: one key/value pair plus bookkeeping for the subtree rooted here.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(super) key: K,
    pub(super) value: V,
    // Longest downward path in edges. Both a leaf and an empty subtree report 0, so
    // the balance factor treats a missing child like a leaf. Do not switch to the
    // -1-for-empty convention: it shifts which shapes trigger a rotation.
    pub(super) height: usize,
    // The number of key/value pairs in the subtree rooted at this node.
    pub(super) size: usize,
    pub(super) left: Link<K, V>,
    pub(super) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    /// Creates a new leaf.
    pub(crate) fn leaf(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            height: 0,
            size: 1,
            left: None,
            right: None,
        })
    }

    /// Returns the height of `link`, treating an empty subtree as height 0.
    #[inline]
    pub(crate) fn height_of(link: &Link<K, V>) -> usize {
        link.as_ref().map_or(0, |node| node.height)
    }

    /// Returns the number of entries in `link`.
    #[inline]
    pub(crate) fn size_of(link: &Link<K, V>) -> usize {
        link.as_ref().map_or(0, |node| node.size)
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    /// Splits the node into its key, its value, and both children, so a caller can
    /// keep all four borrows alive at once.
    pub(crate) fn split_mut(&mut self) -> (&K, &mut V, Option<&mut Self>, Option<&mut Self>) {
        (&self.key, &mut self.value, self.left.as_deref_mut(), self.right.as_deref_mut())
    }

    /// Consumes the node, returning its entry. Children are dropped.
    pub(crate) fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }

    /// Recomputes `size` and `height` from the children.
    #[inline]
    pub(crate) fn fix(&mut self) {
        self.size = 1 + Self::size_of(&self.left) + Self::size_of(&self.right);
        self.height = if self.left.is_none() && self.right.is_none() {
            0
        } else {
            1 + Self::height_of(&self.left).max(Self::height_of(&self.right))
        };
    }

    /// `height(left) - height(right)`. Greater than 1 means left-heavy, less than -1
    /// means right-heavy.
    #[inline]
    #[allow(clippy::cast_possible_wrap)]
    pub(crate) fn balance_factor(&self) -> isize {
        Self::height_of(&self.left) as isize - Self::height_of(&self.right) as isize
    }
}
