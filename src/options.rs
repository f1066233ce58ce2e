use arbitrary_int::{u5, Number, TryNewError};

/// The tallest tower any configuration can request, `Height::MAX` as a
/// plain `usize`. Search state whose size depends on the height cap is
/// sized against this bound.
pub(crate) const MAX_TOWER: usize = 31;

/// Height which is used to configure the maximum tower height of a
/// skiplist, it is a 5-bit unsigned integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Height(u5);

impl Height {
  /// The maximum value of the `Height`.
  pub const MAX: Self = Self(u5::MAX);

  /// The minimum value of the `Height`.
  pub const MIN: Self = Self(u5::new(1));

  /// Creates a new `Height` with the default value of `16`.
  #[inline]
  pub const fn new() -> Self {
    Self(u5::new(16))
  }

  /// Try to create a `Height` from the given `u8`.
  #[inline]
  pub fn try_from_u8(val: u8) -> Result<Self, TryNewError> {
    u5::try_new(val).map(Self)
  }

  /// Creates a new `Height` from the given `u8`.
  ///
  /// # Panics
  /// - If the given value is greater than `31`.
  #[inline]
  pub const fn from_u8_unchecked(val: u8) -> Self {
    Self(u5::new(val))
  }

  /// Converts the `Height` to a `usize`.
  #[inline]
  pub const fn to_usize(self) -> usize {
    self.0.value() as usize
  }
}

impl Default for Height {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl core::fmt::Display for Height {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl TryFrom<u8> for Height {
  type Error = TryNewError;

  #[inline]
  fn try_from(val: u8) -> Result<Self, Self::Error> {
    u5::try_new(val).map(Self)
  }
}

impl TryFrom<usize> for Height {
  type Error = TryNewError;

  #[inline]
  fn try_from(val: usize) -> Result<Self, Self::Error> {
    u5::try_new(val.min(u8::MAX as usize) as u8).map(Self)
  }
}

impl From<Height> for u8 {
  #[inline]
  fn from(height: Height) -> Self {
    height.0.value()
  }
}

impl From<Height> for usize {
  #[inline]
  fn from(height: Height) -> Self {
    height.to_usize()
  }
}

/// Options for a [`SkipMap`](crate::SkipMap).
#[viewit::viewit(vis_all = "pub(crate)", getters(skip), setters(skip))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options {
  max_height: Height,
  probability: f64,
}

impl Default for Options {
  #[inline]
  fn default() -> Options {
    Options::new()
  }
}

impl Options {
  /// Creates a new set of options with the default values.
  #[inline]
  pub const fn new() -> Self {
    Self {
      max_height: Height::new(),
      probability: 0.5,
    }
  }

  /// Set the maximum tower height of the skiplist.
  ///
  /// No node is ever assigned more levels than this, which bounds both
  /// per-node memory and worst-case search cost. A good cap is roughly
  /// `log2(expected number of entries)`.
  ///
  /// The default is `16`.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipmap::{Height, Options};
  ///
  /// let opts = Options::new().with_max_height(Height::from_u8_unchecked(20));
  /// ```
  #[inline]
  pub const fn with_max_height(mut self, max_height: Height) -> Self {
    self.max_height = max_height;
    self
  }

  /// Set the probability that a node reaching level `i` also reaches
  /// level `i + 1`.
  ///
  /// Must lie strictly between `0` and `1`; anything else is rejected
  /// when the map is constructed. The default of `0.5` makes each level
  /// hold, in expectation, half the nodes of the level below.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipmap::Options;
  ///
  /// let opts = Options::new().with_probability(1.0 / core::f64::consts::E);
  /// ```
  #[inline]
  pub const fn with_probability(mut self, probability: f64) -> Self {
    self.probability = probability;
    self
  }

  /// Returns the maximum tower height of the skiplist.
  #[inline]
  pub const fn max_height(&self) -> Height {
    self.max_height
  }

  /// Returns the level continuation probability.
  #[inline]
  pub const fn probability(&self) -> f64 {
    self.probability
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn height_bounds() {
    assert_eq!(Height::MIN.to_usize(), 1);
    assert_eq!(Height::MAX.to_usize(), MAX_TOWER);
    assert_eq!(Height::new().to_usize(), 16);
    assert!(Height::try_from(31usize).is_ok());
    assert!(Height::try_from(32usize).is_err());
  }

  #[test]
  fn default_options() {
    let opts = Options::new();
    assert_eq!(opts.max_height(), Height::new());
    assert_eq!(opts.probability(), 0.5);
  }
}
