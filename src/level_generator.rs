//! Skiplists use a probabilistic distribution of nodes over the internal
//! levels, whereby the lowest level (level 0) contains all the nodes, and each
//! level `$n > 0$` will contain a random subset of the nodes on level `$n - 1$`.
//!
//! Most commonly, a geometric distribution is used whereby the chance that a
//! node occupies level `$n$` is `$p$` times the chance of occupying level
//! `$n-1$` (with `$0 < p < 1$`).
//!
//! The generator is a trait so that the source of randomness can be swapped
//! out. This is mostly useful in tests, where a fixed sequence of levels makes
//! the shape of the list reproducible.

pub mod geometric;

pub use geometric::{DEFAULT_MAX_LEVEL, DEFAULT_P, Geometric, GeometricError, MAX_LEVEL_LIMIT};

/// Upon the insertion of a new node in the list, the node is replicated to
/// higher levels with a certain probability as determined by a
/// [`LevelGenerator`].
pub trait LevelGenerator {
    /// The highest level a node may be assigned.
    ///
    /// A list driven by this generator therefore has `max_level() + 1` levels,
    /// numbered `0` through `max_level()` inclusive.
    #[must_use]
    fn max_level(&self) -> usize;

    /// Generate a level for a new node in the range `$[0, \text{max\_level}]$`.
    ///
    /// This function must _never_ return a level greater than
    /// [`max_level`][LevelGenerator::max_level].
    #[must_use]
    fn level(&mut self) -> usize;
}

impl<G> LevelGenerator for &mut G
where
    G: LevelGenerator + ?Sized,
{
    #[inline]
    fn max_level(&self) -> usize {
        (**self).max_level()
    }

    #[inline]
    fn level(&mut self) -> usize {
        (**self).level()
    }
}

impl<G> LevelGenerator for Box<G>
where
    G: LevelGenerator + ?Sized,
{
    #[inline]
    fn max_level(&self) -> usize {
        (**self).max_level()
    }

    #[inline]
    fn level(&mut self) -> usize {
        (**self).level()
    }
}
