//! Geometric level generator.

use rand::{Rng, RngCore, SeedableRng, rngs::SmallRng};
use thiserror::Error;

use crate::level_generator::LevelGenerator;

/// The largest `max_level` accepted by [`Geometric`].
///
/// With `$p = 1/2$`, reaching level 64 has probability `$2^{-64}$`; anything
/// beyond this is wasted header space.
pub const MAX_LEVEL_LIMIT: usize = 64;

/// The default highest level of a list.
pub const DEFAULT_MAX_LEVEL: usize = 16;

/// The default promotion probability.
pub const DEFAULT_P: f64 = 0.5;

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
/// Errors that can occur when creating a [`Geometric`] level generator.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum GeometricError {
    /// The maximum level must be non-zero.
    #[error("max_level must be non-zero.")]
    ZeroMaxLevel,
    /// The maximum level must not exceed [`MAX_LEVEL_LIMIT`].
    #[error("max_level must be at most 64.")]
    MaxLevelTooLarge,
    /// The probability `$p$` must be in the range `$(0, 1)$`.
    #[error("p must be in (0, 1).")]
    InvalidProbability,
}

/// A level generator using a geometric distribution.
///
/// Starting from level 0, a new node is promoted one level at a time for as
/// long as independent coin flips succeed (each with probability `$p$`), and
/// the promotion stops at `max_level`. The probability of a node reaching
/// level `$k$` is thus `$p^k$`, truncated at the maximum.
#[derive(Debug, Clone)]
pub struct Geometric<R = SmallRng> {
    /// The highest level which can be generated.
    max_level: usize,
    /// The probability that a node is present in the next level.
    p: f64,
    /// The random number generator.
    rng: R,
}

impl Geometric {
    /// Create a new geometric level generator producing levels in
    /// `$[0, \text{max\_level}]$`, with `p` as the probability that a given
    /// node is present in the next level.
    ///
    /// The generator is seeded from the thread-local random number generator.
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1, and `max_level` must be between
    /// 1 and [`MAX_LEVEL_LIMIT`].
    #[inline]
    pub fn new(max_level: usize, p: f64) -> Result<Self, GeometricError> {
        Self::with_rng(max_level, p, SmallRng::from_rng(&mut rand::rng()))
    }
}

impl Default for Geometric {
    /// A generator with [`DEFAULT_MAX_LEVEL`] levels and `$p = 1/2$`.
    #[inline]
    fn default() -> Self {
        Geometric {
            max_level: DEFAULT_MAX_LEVEL,
            p: DEFAULT_P,
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

impl<R> Geometric<R>
where
    R: RngCore,
{
    /// Create a new geometric level generator drawing from the given random
    /// number generator.
    ///
    /// This is the seam through which a deterministic source can be supplied:
    ///
    /// ```
    /// use rand::{SeedableRng, rngs::StdRng};
    /// use skipset::{LevelGenerator, level_generator::Geometric};
    ///
    /// let mut a = Geometric::with_rng(16, 0.5, StdRng::seed_from_u64(7)).unwrap();
    /// let mut b = Geometric::with_rng(16, 0.5, StdRng::seed_from_u64(7)).unwrap();
    /// for _ in 0..100 {
    ///     assert_eq!(a.level(), b.level());
    /// }
    /// ```
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1, and `max_level` must be between
    /// 1 and [`MAX_LEVEL_LIMIT`].
    #[inline]
    pub fn with_rng(max_level: usize, p: f64, rng: R) -> Result<Self, GeometricError> {
        if max_level == 0 {
            return Err(GeometricError::ZeroMaxLevel);
        }
        if max_level > MAX_LEVEL_LIMIT {
            return Err(GeometricError::MaxLevelTooLarge);
        }
        if !(0.0 < p && p < 1.0) {
            return Err(GeometricError::InvalidProbability);
        }
        Ok(Geometric { max_level, p, rng })
    }

    /// The promotion probability.
    #[inline]
    #[must_use]
    pub fn p(&self) -> f64 {
        self.p
    }
}

impl<R> LevelGenerator for Geometric<R>
where
    R: RngCore,
{
    #[inline]
    fn max_level(&self) -> usize {
        self.max_level
    }

    /// Flip coins until one fails or `max_level` is reached.
    #[inline]
    fn level(&mut self) -> usize {
        let mut level = 0;
        while self.rng.random::<f64>() < self.p && level < self.max_level {
            level += 1;
        }
        level
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, bail};
    use pretty_assertions::assert_eq;
    use rand::{SeedableRng, rngs::StdRng};
    use rstest::rstest;

    use super::{
        DEFAULT_MAX_LEVEL, DEFAULT_P, Geometric, GeometricError, LevelGenerator, MAX_LEVEL_LIMIT,
    };

    #[test]
    fn default() {
        let mut generator = Geometric::default();
        assert_eq!(generator.max_level(), DEFAULT_MAX_LEVEL);
        assert!((generator.p() - DEFAULT_P).abs() < f64::EPSILON);
        assert!(generator.level() <= DEFAULT_MAX_LEVEL);
    }

    #[test]
    fn invalid_max() {
        assert_eq!(
            Geometric::new(0, 0.5).err(),
            Some(GeometricError::ZeroMaxLevel)
        );
        assert_eq!(
            Geometric::new(MAX_LEVEL_LIMIT + 1, 0.5).err(),
            Some(GeometricError::MaxLevelTooLarge)
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(-0.5)]
    #[case(1.5)]
    #[case(f64::NAN)]
    fn invalid_p(#[case] p: f64) {
        assert_eq!(
            Geometric::new(1, p).err(),
            Some(GeometricError::InvalidProbability)
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            GeometricError::ZeroMaxLevel.to_string(),
            "max_level must be non-zero."
        );
        assert_eq!(
            GeometricError::MaxLevelTooLarge.to_string(),
            "max_level must be at most 64."
        );
        assert_eq!(
            GeometricError::InvalidProbability.to_string(),
            "p must be in (0, 1)."
        );
    }

    #[rstest]
    fn new(
        #[values(1, 2, 16, MAX_LEVEL_LIMIT)] max_level: usize,
        #[values(0.1, 0.5, 0.99)] p: f64,
    ) -> Result<()> {
        let mut generator = Geometric::with_rng(max_level, p, StdRng::seed_from_u64(0x1234_abcd))?;
        assert_eq!(generator.max_level(), max_level);
        assert!((generator.p() - p).abs() < f64::EPSILON);

        for _ in 0..100_000 {
            let level = generator.level();
            assert!((0..=max_level).contains(&level));
        }

        // Level 0 must be reachable for any p < 1.
        if !(0..100_000).any(|_| generator.level() == 0) {
            bail!("Failed to generate a level-0 node.");
        }
        Ok(())
    }

    #[test]
    fn reaches_max_level() -> Result<()> {
        let mut generator = Geometric::with_rng(4, 0.9, StdRng::seed_from_u64(42))?;
        if !(0..100_000).any(|_| generator.level() == 4) {
            bail!("Failed to generate a level-4 node.");
        }
        Ok(())
    }

    #[test]
    fn distribution() -> Result<()> {
        let samples = 200_000;
        let mut generator = Geometric::with_rng(16, 0.5, StdRng::seed_from_u64(0xdead_beef))?;
        let mut counts = [0_usize; 17];
        for _ in 0..samples {
            counts[generator.level()] += 1;
        }

        // P(level = k) = p^k (1 - p), so roughly half the nodes stay at level 0,
        // a quarter at level 1, and so on.
        #[expect(clippy::cast_precision_loss, reason = "counts are small")]
        let fraction = |k: usize| counts[k] as f64 / samples as f64;
        assert!((fraction(0) - 0.5).abs() < 0.01, "level 0: {}", fraction(0));
        assert!((fraction(1) - 0.25).abs() < 0.01, "level 1: {}", fraction(1));
        assert!((fraction(2) - 0.125).abs() < 0.01, "level 2: {}", fraction(2));
        Ok(())
    }

    #[test]
    fn seeded_is_reproducible() -> Result<()> {
        let mut a = Geometric::with_rng(16, 0.25, StdRng::seed_from_u64(7))?;
        let mut b = Geometric::with_rng(16, 0.25, StdRng::seed_from_u64(7))?;
        let a: Vec<usize> = (0..1000).map(|_| a.level()).collect();
        let b: Vec<usize> = (0..1000).map(|_| b.level()).collect();
        assert_eq!(a, b);
        Ok(())
    }
}
