#![doc = include_str!("../README.md")]
#![cfg_attr(not(all(feature = "std", test)), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![allow(rustdoc::bare_urls)]

#[cfg(not(feature = "std"))]
extern crate alloc as std;

#[cfg(feature = "std")]
extern crate std;

mod comparator;
mod error;
mod level;
mod node;
mod options;

/// An ordered map implementation based on a skiplist.
pub mod map;

pub use comparator::{Ascend, Comparator, Descend};
pub use error::Error;
pub use map::{IntoIter, Iter, IterMut, Keys, SkipMap, Values, ValuesMut};
pub use options::{Height, Options};
