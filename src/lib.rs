//! A skiplist is a way of storing elements in such a way that elements can be
//! efficiently searched, inserted and removed, all in `$O(\log n)$` on
//! average.
//!
//! Conceptually, a skiplist resembles something like:
//!
//! ```text
//! <head> ----------> [2] --------------------------------------------------> [9] ---------->
//! <head> ----------> [2] ------------------------------------[7] ----------> [9] ---------->
//! <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] ->
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] ->
//! ```
//!
//! where each node `[x]` has references to nodes further down the list,
//! allowing the algorithm to effectively skip ahead. The lowest level holds
//! every key, and each level above it holds a random subset of the level
//! below. How many levels a node spans is decided once, when it is inserted,
//! by a [`LevelGenerator`].
//!
//! This crate provides [`SkipList`], which stores unique keys in ascending
//! order (in the manner of a sorted set):
//!
//! ```
//! use skipset::SkipList;
//!
//! let mut skiplist = SkipList::new();
//! skiplist.insert(3);
//! skiplist.insert(1);
//! skiplist.insert(2);
//! skiplist.insert(2);
//!
//! assert_eq!(skiplist.len(), 3);
//! assert_eq!(skiplist.search(&2), Some(&2));
//! assert_eq!(skiplist.delete(&1), Some(1));
//! assert!(skiplist.iter().eq([2, 3].iter()));
//! ```
//!
//! The list is not synchronised internally; sharing it between threads
//! requires external locking around each operation.

pub mod level_generator;
mod node;
pub mod skiplist;

pub use crate::{
    level_generator::LevelGenerator,
    skiplist::{SkipList, SkipListConfig, SkipListError},
};
