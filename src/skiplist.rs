//! A key-only skiplist which keeps its keys sorted and unique.

use std::{
    cmp::{self, Ordering},
    fmt,
    hash::{Hash, Hasher},
    iter, vec,
};

use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    level_generator::{DEFAULT_MAX_LEVEL, DEFAULT_P, Geometric, GeometricError, LevelGenerator},
    node::{Arena, HEAD, Node},
};

// ////////////////////////////////////////////////////////////////////////////
// Configuration
// ////////////////////////////////////////////////////////////////////////////

/// Construction parameters of a [`SkipList`].
///
/// # Examples
///
/// ```
/// use skipset::{SkipList, SkipListConfig};
///
/// let config = SkipListConfig {
///     max_level: 8,
///     ..SkipListConfig::default()
/// };
/// let skiplist: SkipList<u32> = SkipList::with_config(config).unwrap();
/// assert_eq!(skiplist.max_level(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkipListConfig {
    /// The highest level any node may reach. Must be at least 1.
    pub max_level: usize,
    /// The probability that a node present at some level is also present at
    /// the next level. Must lie strictly between 0 and 1.
    pub p: f64,
}

impl Default for SkipListConfig {
    #[inline]
    fn default() -> Self {
        SkipListConfig {
            max_level: DEFAULT_MAX_LEVEL,
            p: DEFAULT_P,
        }
    }
}

/// Errors that can occur when creating a [`SkipList`].
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum SkipListError {
    /// The configuration was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] GeometricError),
}

// ////////////////////////////////////////////////////////////////////////////
// SkipList
// ////////////////////////////////////////////////////////////////////////////

/// A skiplist storing unique keys in ascending order.
///
/// Searching, inserting and deleting a key all take `$O(\log n)$` time on
/// average. The height of each node is drawn from a [`LevelGenerator`], which
/// by default is a [`Geometric`] distribution with `$p = 1/2$` truncated at
/// level 16.
///
/// Inserting a key which is already present leaves the list untouched, and
/// deleting a key which is absent does nothing.
///
/// # Examples
///
/// ```
/// use skipset::SkipList;
///
/// let mut skiplist = SkipList::new();
/// for key in [3, 6, 7, 9, 12, 19, 17, 26, 21, 25] {
///     skiplist.insert(key);
/// }
///
/// assert_eq!(skiplist.search(&19), Some(&19));
/// assert_eq!(skiplist.search(&15), None);
///
/// assert_eq!(skiplist.delete(&17), Some(17));
/// assert!(!skiplist.contains(&17));
/// ```
#[derive(Clone)]
pub struct SkipList<K, G = Geometric> {
    /// Owner of every node, the header included.
    arena: Arena<K>,
    /// Highest level holding at least one key (0 when empty).
    level: usize,
    /// Number of keys.
    len: usize,
    level_generator: G,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<K> SkipList<K>
where
    K: Ord,
{
    /// Create a new skiplist with the default number of 16 levels and
    /// `$p = 1/2$`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipList;
    ///
    /// let skiplist: SkipList<i64> = SkipList::new();
    /// assert!(skiplist.is_empty());
    /// assert_eq!(skiplist.max_level(), 16);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_level_generator(Geometric::default())
    }

    /// Create a new skiplist from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SkipListError::InvalidConfiguration`] if `max_level` is zero
    /// or too large, or if `p` does not lie strictly between 0 and 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::{SkipList, SkipListConfig, SkipListError};
    ///
    /// let config = SkipListConfig { max_level: 4, p: 1.5 };
    /// assert!(matches!(
    ///     SkipList::<u8>::with_config(config),
    ///     Err(SkipListError::InvalidConfiguration(_))
    /// ));
    /// ```
    #[inline]
    pub fn with_config(config: SkipListConfig) -> Result<Self, SkipListError> {
        let generator = Geometric::new(config.max_level, config.p)?;
        debug!(
            max_level = config.max_level,
            p = config.p,
            "Configured geometric level generator"
        );
        Ok(Self::with_level_generator(generator))
    }
}

impl<K, G> SkipList<K, G>
where
    K: Ord,
    G: LevelGenerator,
{
    /// Create a new skiplist whose node heights are drawn from the given
    /// generator.
    ///
    /// The list spans levels `0..=generator.max_level()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::{SeedableRng, rngs::StdRng};
    /// use skipset::{SkipList, level_generator::Geometric};
    ///
    /// let generator = Geometric::with_rng(8, 0.25, StdRng::seed_from_u64(1)).unwrap();
    /// let mut skiplist = SkipList::with_level_generator(generator);
    /// skiplist.extend(0..100);
    /// assert_eq!(skiplist.len(), 100);
    /// ```
    #[inline]
    pub fn with_level_generator(level_generator: G) -> Self {
        let max_level = level_generator.max_level();
        debug!(max_level, "Creating skiplist");
        SkipList {
            arena: Arena::new(max_level),
            level: 0,
            len: 0,
            level_generator,
        }
    }

    /// Looks for the given key, returning a reference to the stored key if
    /// present.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// assert_eq!(skiplist.search(&"b"), None);
    /// skiplist.extend(["a", "b", "c"]);
    /// assert_eq!(skiplist.search(&"b"), Some(&"b"));
    /// ```
    pub fn search(&self, key: &K) -> Option<&K> {
        let current = (0..=self.level)
            .rev()
            .fold(HEAD, |current, level| self.advance_at_level(current, level, key));
        self.matching_successor(current, key)
            .and_then(|index| self.arena.get(index).key.as_key())
    }

    /// Returns `true` if the skiplist contains the given key.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipList;
    ///
    /// let skiplist: SkipList<_> = (0..10).collect();
    /// assert!(skiplist.contains(&4));
    /// assert!(!skiplist.contains(&15));
    /// ```
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Inserts a key into the skiplist.
    ///
    /// Returns `true` if the key was added, and `false` if it was already
    /// present, in which case the list is left unchanged and the existing key
    /// is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// assert!(skiplist.insert(5));
    /// assert!(!skiplist.insert(5));
    /// assert_eq!(skiplist.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        let update = self.update_path(&key);
        if self.matching_successor(update[0], &key).is_some() {
            trace!(len = self.len, "Key already present, insert is a no-op");
            return false;
        }

        // A misbehaving generator must not push a node past the header.
        let level = cmp::min(self.level_generator.level(), self.max_level());
        if level > self.level {
            debug!(from = self.level, to = level, "Raising list level");
            // Levels above the old top are only reachable from the header,
            // which the update path already points at.
            self.level = level;
        }

        let index = self.arena.alloc(Node::new(key, level));
        for (lvl, &prev) in update.iter().enumerate().take(level + 1) {
            let next = self.arena.next(prev, lvl);
            self.arena.get_mut(index).forward[lvl] = next;
            self.arena.get_mut(prev).forward[lvl] = Some(index);
        }
        self.len += 1;
        trace!(level, len = self.len, "Inserted key");
        true
    }

    /// Removes a key from the skiplist, returning it if it was present.
    ///
    /// Deleting a key which is absent is a no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipList;
    ///
    /// let mut skiplist: SkipList<_> = (0..10).collect();
    /// assert_eq!(skiplist.delete(&4), Some(4));
    /// assert_eq!(skiplist.delete(&4), None);
    /// assert_eq!(skiplist.len(), 9);
    /// ```
    pub fn delete(&mut self, key: &K) -> Option<K> {
        let update = self.update_path(key);
        let Some(target) = self.matching_successor(update[0], key) else {
            trace!(len = self.len, "Key absent, delete is a no-op");
            return None;
        };

        // The node occupies a contiguous run of levels starting at 0, so the
        // first level where the predecessor does not link to it ends the run.
        for (lvl, &prev) in update.iter().enumerate().take(self.level + 1) {
            if self.arena.next(prev, lvl) != Some(target) {
                break;
            }
            let next = self.arena.next(target, lvl);
            self.arena.get_mut(prev).forward[lvl] = next;
        }

        let node = self.arena.free(target);
        self.len -= 1;

        let old_level = self.level;
        while self.level > 0 && self.arena.next(HEAD, self.level).is_none() {
            self.level -= 1;
        }
        if self.level < old_level {
            debug!(from = old_level, to = self.level, "Lowered list level");
        }
        trace!(level = node.level(), len = self.len, "Deleted key");
        node.key.into_key()
    }

    /// Walks the list from the top level down to level 0, recording at each
    /// level the last node whose key is strictly less than `key`.
    ///
    /// The returned path has one entry per level of the header. Levels above
    /// the current top level are recorded as the header itself.
    fn update_path(&self, key: &K) -> Vec<usize> {
        let mut update = vec![HEAD; self.max_level() + 1];
        let mut current = HEAD;
        for level in (0..=self.level).rev() {
            current = self.advance_at_level(current, level, key);
            update[level] = current;
        }
        update
    }

    /// Moves along `level` from `current` for as long as the next key is
    /// strictly less than `key`.
    fn advance_at_level(&self, mut current: usize, level: usize, key: &K) -> usize {
        while let Some(next) = self.arena.next(current, level) {
            if self.arena.get(next).key.cmp_key(key) == Ordering::Less {
                current = next;
            } else {
                break;
            }
        }
        current
    }

    /// The level-0 successor of `prev`, if it holds `key`.
    fn matching_successor(&self, prev: usize, key: &K) -> Option<usize> {
        self.arena
            .next(prev, 0)
            .filter(|&next| self.arena.get(next).key.cmp_key(key) == Ordering::Equal)
    }
}

impl<K, G> SkipList<K, G> {
    /// Returns the number of keys in the skiplist.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// skiplist.extend(0..10);
    /// assert_eq!(skiplist.len(), 10);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the skiplist contains no keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// assert!(skiplist.is_empty());
    ///
    /// skiplist.insert(1);
    /// assert!(!skiplist.is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The highest level currently holding at least one key, or 0 if the list
    /// is empty.
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// The highest level any node may reach.
    #[inline]
    pub fn max_level(&self) -> usize {
        self.arena.head().level()
    }

    /// The generator used to draw node heights.
    #[inline]
    pub fn level_generator(&self) -> &G {
        &self.level_generator
    }

    /// Clears the skiplist, removing all keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// skiplist.extend(0..10);
    /// skiplist.clear();
    /// assert!(skiplist.is_empty());
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.arena.clear();
        self.level = 0;
        self.len = 0;
    }

    /// Provides a reference to the smallest key, or `None` if the skiplist is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// assert!(skiplist.first().is_none());
    ///
    /// skiplist.extend([2, 1]);
    /// assert_eq!(skiplist.first(), Some(&1));
    /// ```
    #[inline]
    pub fn first(&self) -> Option<&K> {
        self.arena
            .next(HEAD, 0)
            .and_then(|index| self.arena.get(index).key.as_key())
    }

    /// Provides a reference to the largest key, or `None` if the skiplist is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// assert!(skiplist.last().is_none());
    ///
    /// skiplist.extend([2, 1]);
    /// assert_eq!(skiplist.last(), Some(&2));
    /// ```
    pub fn last(&self) -> Option<&K> {
        let mut current = HEAD;
        for level in (0..=self.level).rev() {
            while let Some(next) = self.arena.next(current, level) {
                current = next;
            }
        }
        self.arena.get(current).key.as_key()
    }

    /// Creates an iterator over the keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipList;
    ///
    /// let skiplist: SkipList<_> = [3, 1, 2].into_iter().collect();
    /// assert!(skiplist.iter().eq([1, 2, 3].iter()));
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            arena: &self.arena,
            next: self.arena.next(HEAD, 0),
            remaining: self.len,
        }
    }

    /// The keys present at each level, from the current top level down to
    /// level 0.
    ///
    /// Level 0 always holds every key; each higher level holds a subset of the
    /// level below it.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipList;
    ///
    /// let skiplist: SkipList<_> = (0..10).collect();
    /// let levels = skiplist.levels();
    /// assert_eq!(levels.len(), skiplist.level() + 1);
    /// assert_eq!(levels.last().unwrap().len(), 10);
    /// ```
    pub fn levels(&self) -> Vec<Vec<&K>> {
        (0..=self.level)
            .rev()
            .map(|level| {
                iter::successors(self.arena.next(HEAD, level), |&index| {
                    self.arena.next(index, level)
                })
                .filter_map(|index| self.arena.get(index).key.as_key())
                .collect()
            })
            .collect()
    }
}

// ///////////////////////////////////////////////
// Internal methods
// ///////////////////////////////////////////////

#[cfg(test)]
impl<K, G> SkipList<K, G>
where
    K: Ord,
{
    /// Checks the integrity of the skiplist, panicking on the first violation.
    fn check(&self) {
        let max_level = self.max_level();
        assert!(self.level <= max_level, "level exceeds max_level");
        assert!(self.arena.head().is_head(), "header slot holds a key");
        assert_eq!(self.arena.live(), self.len, "arena holds stray nodes");

        let mut below: Option<Vec<usize>> = None;
        for level in 0..=max_level {
            let chain: Vec<usize> =
                iter::successors(self.arena.next(HEAD, level), |&index| {
                    self.arena.next(index, level)
                })
                .collect();

            for pair in chain.windows(2) {
                assert!(
                    self.arena.get(pair[0]).key < self.arena.get(pair[1]).key,
                    "keys out of order at level {level}"
                );
            }
            for &index in &chain {
                assert!(!self.arena.get(index).is_head(), "header linked at level {level}");
                assert!(
                    self.arena.get(index).level() >= level,
                    "node linked above its height at level {level}"
                );
            }
            if let Some(below) = &below {
                assert!(
                    chain.iter().all(|index| below.contains(index)),
                    "node at level {level} missing from level {}",
                    level - 1
                );
            }

            if level == 0 {
                assert_eq!(chain.len(), self.len, "level 0 does not hold every key");
            }
            if level > self.level {
                assert!(chain.is_empty(), "level {level} populated above the top");
            } else if level > 0 && level == self.level {
                assert!(!chain.is_empty(), "top level {level} is empty");
            }
            below = Some(chain);
        }
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<K> Default for SkipList<K>
where
    K: Ord,
{
    #[inline]
    fn default() -> SkipList<K> {
        SkipList::new()
    }
}

/// This implementation of `PartialEq` only checks that the keys are equal; it
/// does not check for equivalence of other features (such as the ordering
/// function or the node levels).
impl<K, G1, G2> PartialEq<SkipList<K, G2>> for SkipList<K, G1>
where
    K: PartialEq,
{
    #[inline]
    fn eq(&self, other: &SkipList<K, G2>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K, G> Eq for SkipList<K, G> where K: Eq {}

impl<K, G> Hash for SkipList<K, G>
where
    K: Hash,
{
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for key in self {
            key.hash(state);
        }
    }
}

impl<K, G> Extend<K> for SkipList<K, G>
where
    K: Ord,
    G: LevelGenerator,
{
    /// Inserts every key yielded by the iterator; duplicates are skipped.
    #[inline]
    fn extend<I: IntoIterator<Item = K>>(&mut self, iterable: I) {
        for key in iterable {
            self.insert(key);
        }
    }
}

impl<K> FromIterator<K> for SkipList<K>
where
    K: Ord,
{
    #[inline]
    fn from_iter<I>(iter: I) -> SkipList<K>
    where
        I: IntoIterator<Item = K>,
    {
        let mut skiplist = SkipList::new();
        skiplist.extend(iter);
        skiplist
    }
}

impl<K, G> fmt::Debug for SkipList<K, G>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Displays every level of the skiplist, from the top level down to level 0,
/// one per line:
///
/// ```text
/// Level 1: 6 -> 19 -> None
/// Level 0: 3 -> 6 -> 7 -> 19 -> None
/// ```
impl<K, G> fmt::Display for SkipList<K, G>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, keys) in self.levels().iter().enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            write!(f, "Level {}: ", self.level - row)?;
            for key in keys {
                write!(f, "{key} -> ")?;
            }
            write!(f, "None")?;
        }
        Ok(())
    }
}

impl<K, G> IntoIterator for SkipList<K, G> {
    type Item = K;
    type IntoIter = IntoIter<K>;

    fn into_iter(mut self) -> IntoIter<K> {
        IntoIter {
            inner: self.arena.drain_ordered().into_iter(),
        }
    }
}

impl<'a, K, G> IntoIterator for &'a SkipList<K, G> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

// ///////////////////////////////////////////////
// Iterators
// ///////////////////////////////////////////////

/// Iterator over the keys of a [`SkipList`] in ascending order.
pub struct Iter<'a, K> {
    /// The list's node storage.
    arena: &'a Arena<K>,
    /// Slot of the next node to yield.
    next: Option<usize>,
    /// Number of keys left to yield.
    remaining: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.get(self.next?);
        self.next = node.forward[0];
        self.remaining -= 1;
        node.key.as_key()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> iter::FusedIterator for Iter<'_, K> {}

/// Owning iterator over the keys of a [`SkipList`] in ascending order.
pub struct IntoIter<K> {
    /// The keys, already detached from the list.
    inner: vec::IntoIter<K>,
}

impl<K> Iterator for IntoIter<K> {
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<K> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> DoubleEndedIterator for IntoIter<K> {
    #[inline]
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back()
    }
}

impl<K> ExactSizeIterator for IntoIter<K> {}

impl<K> iter::FusedIterator for IntoIter<K> {}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////
