//! Order-statistic AVL tree map for Rust.
//!
//! This crate provides [`AvlTreeMap`], a sorted map with the familiar
//! `BTreeMap`-style API plus O(log n) order-statistic operations:
//!
//! - [`select`](AvlTreeMap::select) - Get the entry at a given sorted position
//! - [`rank`](AvlTreeMap::rank) - Count the keys smaller than a given key
//! - [`min_key`](AvlTreeMap::min_key), [`max_key`](AvlTreeMap::max_key),
//!   [`delete_min`](AvlTreeMap::delete_min) - Checked queries that report an
//!   [`Error`] on an empty map
//! - Indexing by [`Rank`] - e.g., `map[Rank(0)]` for the first element
//!
//! # Example
//!
//! ```
//! use avl_ost::{AvlTreeMap, Rank};
//!
//! let mut scores = AvlTreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Order-statistic operations (O(log n))
//! let (name, score) = scores.select(1).unwrap();
//! assert_eq!((*name, *score), ("Bob", 85)); // Keys are sorted alphabetically
//!
//! assert_eq!(scores.rank(&"Carol"), 2);
//! assert_eq!(scores[Rank(0)], 100);
//! assert_eq!(scores.min_key(), Ok(&"Alice"));
//! ```
//!
//! # Implementation
//!
//! The map is an AVL tree of individually boxed nodes. Each node owns its two
//! children and records the size and height of its subtree. Insertions and
//! removals descend recursively and, on the way back up, recompute each
//! ancestor's size and height before applying at most one single or double
//! rotation to it. The tree height therefore stays within the AVL bound of
//! about 1.44 · log<sub>2</sub>(n + 2) for any insertion order.
//!
//! An empty subtree and a leaf both have height 0; see
//! [`AvlTreeMap::height`].
//!
//! Rotations are reported at `trace` level through the [`log`] facade.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod order_statistic;
mod raw;

pub mod avl_map;

pub use avl_map::AvlTreeMap;
pub use error::{Error, Result};
pub use order_statistic::Rank;
