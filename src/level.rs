use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::{Error, Height, Options};

/// Draws the tower height for newly inserted nodes.
///
/// Heights follow a geometric distribution: starting at `1`, each level is
/// kept with the configured probability until the first failure or the
/// configured cap. The cap is applied by bounding the loop, never by
/// redrawing, so the distribution below the cap is unbiased.
pub(crate) struct LevelGenerator {
  max_height: usize,
  /// Continuation chance expressed as a ratio over `u32::MAX`.
  numerator: u32,
  rng: SmallRng,
}

impl LevelGenerator {
  pub(crate) fn new(opts: &Options) -> Result<Self, Error> {
    let p = opts.probability();
    if !(p > 0.0 && p < 1.0) {
      return Err(Error::InvalidProbability(p));
    }

    let max_height = opts.max_height();
    if max_height < Height::MIN {
      return Err(Error::InvalidHeight(max_height));
    }

    Ok(Self {
      max_height: max_height.to_usize(),
      numerator: (p * u32::MAX as f64) as u32,
      rng: new_rng(),
    })
  }

  #[inline]
  pub(crate) fn max_height(&self) -> usize {
    self.max_height
  }

  /// Picks a random height in `1..=max_height`, independent of list state.
  pub(crate) fn random_height(&mut self) -> usize {
    let mut h = 1;
    while h < self.max_height && self.rng.random_ratio(self.numerator, u32::MAX) {
      h += 1;
    }
    h
  }
}

impl core::fmt::Debug for LevelGenerator {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("LevelGenerator")
      .field("max_height", &self.max_height)
      .field("numerator", &self.numerator)
      .finish()
  }
}

#[cfg(feature = "std")]
#[inline]
fn new_rng() -> SmallRng {
  SmallRng::from_rng(&mut rand::rng())
}

#[cfg(not(feature = "std"))]
#[inline]
fn new_rng() -> SmallRng {
  SmallRng::from_os_rng()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_degenerate_probabilities() {
    for p in [0.0, 1.0, -0.5, 2.0, f64::NAN] {
      let opts = Options::new().with_probability(p);
      assert!(matches!(
        LevelGenerator::new(&opts),
        Err(Error::InvalidProbability(_))
      ));
    }
  }

  #[test]
  fn rejects_zero_height() {
    let opts = Options::new().with_max_height(Height::from_u8_unchecked(0));
    assert!(matches!(
      LevelGenerator::new(&opts),
      Err(Error::InvalidHeight(_))
    ));
  }

  #[test]
  fn heights_are_within_bounds() {
    let opts = Options::new().with_max_height(Height::from_u8_unchecked(4));
    let mut levels = LevelGenerator::new(&opts).unwrap();
    for _ in 0..10_000 {
      let h = levels.random_height();
      assert!((1..=4).contains(&h));
    }
  }

  #[test]
  fn heights_follow_the_configured_probability() {
    // With p = 1/2 the expected height is 1 / (1 - p) = 2; over 100k
    // draws the sample mean lands well within (1.9, 2.1).
    let mut levels = LevelGenerator::new(&Options::new()).unwrap();
    let n = 100_000;
    let total: usize = (0..n).map(|_| levels.random_height()).sum();
    let mean = total as f64 / n as f64;
    assert!((1.9..2.1).contains(&mean), "sample mean {mean}");
  }
}
