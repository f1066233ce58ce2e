use crate::Height;

/// Error type for the [`SkipMap`](crate::SkipMap).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
  /// Indicates that the configured level probability is outside the open
  /// interval `(0, 1)`.
  InvalidProbability(f64),

  /// Indicates that the configured maximum height is below the minimum
  /// of [`Height::MIN`](crate::Height::MIN).
  InvalidHeight(Height),
}

impl core::fmt::Display for Error {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Self::InvalidProbability(p) => {
        write!(f, "probability {p} is not within (0, 1)")
      }
      Self::InvalidHeight(h) => {
        write!(f, "max height {h} is less than {}", Height::MIN)
      }
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
