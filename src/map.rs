use core::{
  cmp::Ordering,
  fmt,
  marker::PhantomData,
  mem,
};

use std::boxed::Box;
use std::string::ToString;

use crate::{
  level::LevelGenerator,
  node::{Link, Node},
  options::MAX_TOWER,
  Ascend, Comparator, Error, Options,
};

mod iterator;
pub use iterator::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};


/// A map implementation based on a skiplist that keeps its entries sorted
/// by key and supports expected O(log n) insertion, lookup and removal.
///
/// Each node participates in a random number of levels. Level 0 links the
/// full ordered sequence; every higher level links a sparser subsequence
/// used to skip ahead during search. The ordering is defined by the `C`
/// type parameter, [`Ascend`] by default.
///
/// ## Example
///
/// ```rust
/// use skipmap::SkipMap;
///
/// let mut map = SkipMap::new();
/// map.insert(3, "three");
/// map.insert(1, "one");
/// map.insert(2, "two");
///
/// assert_eq!(map.get(&2), Some(&"two"));
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, [1, 2, 3]);
/// ```
pub struct SkipMap<K, V, C = Ascend> {
  /// Entry points per level: `front[i]` is the first node reaching level
  /// `i`. Doubles as the permanent search header, so lookups allocate
  /// nothing.
  front: Box<[Link<K, V>]>,
  /// Number of active levels. 0 when the map is empty, and always equal
  /// to the tallest live node's height otherwise.
  height: usize,
  len: usize,
  levels: LevelGenerator,
  cmp: C,
  _marker: PhantomData<Box<Node<K, V>>>,
}

// Safety: the raw links are only ever dereferenced through `&self` /
// `&mut self` methods, so the map is as thread-compatible as its parts.
unsafe impl<K: Send, V: Send, C: Send> Send for SkipMap<K, V, C> {}
unsafe impl<K: Sync, V: Sync, C: Sync> Sync for SkipMap<K, V, C> {}

impl<K, V> SkipMap<K, V> {
  /// Creates an empty map with the default [`Options`] and the [`Ascend`]
  /// comparator.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipmap::SkipMap;
  ///
  /// let map: SkipMap<u64, u64> = SkipMap::new();
  /// assert!(map.is_empty());
  /// ```
  #[inline]
  pub fn new() -> Self {
    Self::with_options_and_comparator(Options::new(), Ascend)
      .expect("default options are valid")
  }

  /// Creates an empty map with the given [`Options`] and the [`Ascend`]
  /// comparator.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipmap::{Height, Options, SkipMap};
  ///
  /// let opts = Options::new().with_max_height(Height::from_u8_unchecked(12));
  /// let map: SkipMap<u64, u64> = SkipMap::with_options(opts).unwrap();
  /// assert!(map.is_empty());
  /// ```
  #[inline]
  pub fn with_options(opts: Options) -> Result<Self, Error> {
    Self::with_options_and_comparator(opts, Ascend)
  }
}

impl<K, V, C> SkipMap<K, V, C> {
  /// Creates an empty map ordered by the given comparator, with the
  /// default [`Options`].
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipmap::{Descend, SkipMap};
  ///
  /// let mut map = SkipMap::with_comparator(Descend);
  /// map.insert(1, "one");
  /// map.insert(2, "two");
  /// assert_eq!(map.keys().next(), Some(&2));
  /// ```
  #[inline]
  pub fn with_comparator(cmp: C) -> Self {
    Self::with_options_and_comparator(Options::new(), cmp)
      .expect("default options are valid")
  }

  /// Creates an empty map with the given [`Options`], ordered by the
  /// given comparator.
  pub fn with_options_and_comparator(opts: Options, cmp: C) -> Result<Self, Error> {
    let levels = LevelGenerator::new(&opts)?;
    Ok(Self {
      front: core::iter::repeat(None).take(levels.max_height()).collect(),
      height: 0,
      len: 0,
      levels,
      cmp,
      _marker: PhantomData,
    })
  }

  /// Returns the number of entries in the map.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipmap::SkipMap;
  ///
  /// let mut map = SkipMap::new();
  /// map.insert("a", 1);
  /// assert_eq!(map.len(), 1);
  /// ```
  #[inline]
  pub fn len(&self) -> usize {
    self.len
  }

  /// Returns `true` if the map contains no entries.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Returns the number of currently active levels: the height of the
  /// tallest live node, or `0` when the map is empty.
  #[inline]
  pub fn height(&self) -> usize {
    self.height
  }

  /// Removes every entry from the map.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipmap::SkipMap;
  ///
  /// let mut map = SkipMap::new();
  /// map.insert("a", 1);
  /// map.clear();
  /// assert!(map.is_empty());
  /// assert_eq!(map.height(), 0);
  /// ```
  pub fn clear(&mut self) {
    let mut cur = self.front[0];
    while let Some(node) = cur {
      cur = unsafe { node.as_ref() }.forward[0];
      unsafe { Node::dealloc(node) };
    }
    for slot in self.front.iter_mut() {
      *slot = None;
    }
    self.height = 0;
    self.len = 0;
  }

  /// Returns a lazy iterator over all entries in key order.
  #[inline]
  pub fn iter(&self) -> Iter<'_, K, V> {
    Iter::new(self.front[0], self.len)
  }

  /// Returns a lazy iterator over all entries in key order, with mutable
  /// access to the values.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipmap::SkipMap;
  ///
  /// let mut map = SkipMap::new();
  /// map.insert("a", 1);
  /// map.insert("b", 2);
  /// for (_, v) in map.iter_mut() {
  ///   *v *= 10;
  /// }
  /// assert_eq!(map.get(&"b"), Some(&20));
  /// ```
  #[inline]
  pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
    IterMut::new(self.front[0], self.len)
  }

  /// Returns a lazy iterator over the keys in order.
  #[inline]
  pub fn keys(&self) -> Keys<'_, K, V> {
    Keys::new(self.iter())
  }

  /// Returns a lazy iterator over the values, in key order.
  #[inline]
  pub fn values(&self) -> Values<'_, K, V> {
    Values::new(self.iter())
  }

  /// Returns a lazy iterator over the values, in key order, with mutable
  /// access.
  #[inline]
  pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
    ValuesMut::new(self.iter_mut())
  }

  /// The node (or end of level) that follows `at` on `level`. `None` as
  /// `at` denotes the header position, whose successors are the front
  /// slots.
  #[inline]
  fn next(&self, at: Link<K, V>, level: usize) -> Link<K, V> {
    match at {
      Some(node) => unsafe { node.as_ref() }.forward[level],
      None => self.front[level],
    }
  }

  /// Relinks the `level` successor of `at`.
  #[inline]
  fn set_next(&mut self, at: Link<K, V>, level: usize, to: Link<K, V>) {
    match at {
      Some(mut node) => unsafe { node.as_mut() }.forward[level] = to,
      None => self.front[level] = to,
    }
  }
}

impl<K, V, C> SkipMap<K, V, C>
where
  C: Comparator<K>,
{
  /// Inserts a key-value pair, or replaces the value if the key is
  /// already present.
  ///
  /// Returns the previous value for the key, or `None` if the key was
  /// not in the map.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipmap::SkipMap;
  ///
  /// let mut map = SkipMap::new();
  /// assert_eq!(map.insert("x", 1), None);
  /// assert_eq!(map.insert("x", 2), Some(1));
  /// assert_eq!(map.len(), 1);
  /// ```
  pub fn insert(&mut self, key: K, value: V) -> Option<V> {
    let mut update = [None; MAX_TOWER];
    let candidate = self.find_splice(&key, &mut update);

    if let Some(mut node) = candidate {
      let node = unsafe { node.as_mut() };
      if self.cmp.compare(&node.key, &key) == Ordering::Equal {
        return Some(mem::replace(&mut node.value, value));
      }
    }

    let height = self.levels.random_height();
    let node = Node::alloc(key, value, height);
    for level in 0..height {
      // The successor is whatever followed the splice point; at levels
      // the list has not reached yet, update[level] is the header and
      // the front slot is empty.
      let next = self.next(update[level], level);
      unsafe { (*node.as_ptr()).forward[level] = next };
      self.set_next(update[level], level, Some(node));
    }

    if height > self.height {
      self.height = height;
      #[cfg(feature = "tracing")]
      tracing::trace!(height, "skipmap height increased");
    }
    self.len += 1;
    None
  }

  /// Returns a reference to the value associated with the key.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipmap::SkipMap;
  ///
  /// let mut map = SkipMap::new();
  /// map.insert("a", 1);
  /// assert_eq!(map.get(&"a"), Some(&1));
  /// assert_eq!(map.get(&"b"), None);
  /// ```
  #[inline]
  pub fn get(&self, key: &K) -> Option<&V> {
    self
      .find_node(key)
      .map(|node| &unsafe { node.as_ref() }.value)
  }

  /// Returns a mutable reference to the value associated with the key.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipmap::SkipMap;
  ///
  /// let mut map = SkipMap::new();
  /// map.insert("a", 1);
  /// if let Some(v) = map.get_mut(&"a") {
  ///   *v = 2;
  /// }
  /// assert_eq!(map.get(&"a"), Some(&2));
  /// ```
  #[inline]
  pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
    self
      .find_node(key)
      .map(|mut node| &mut unsafe { node.as_mut() }.value)
  }

  /// Returns `true` if the map contains the key.
  #[inline]
  pub fn contains_key(&self, key: &K) -> bool {
    self.find_node(key).is_some()
  }

  /// Removes a key from the map, returning its value if it was present.
  ///
  /// Removing an absent key is not an error; it simply returns `None`
  /// and leaves the map untouched.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipmap::SkipMap;
  ///
  /// let mut map = SkipMap::new();
  /// map.insert("a", 1);
  /// assert_eq!(map.remove(&"a"), Some(1));
  /// assert_eq!(map.remove(&"a"), None);
  /// ```
  pub fn remove(&mut self, key: &K) -> Option<V> {
    let mut update = [None; MAX_TOWER];
    let candidate = self.find_splice(key, &mut update)?;
    if self.cmp.compare(&unsafe { candidate.as_ref() }.key, key) != Ordering::Equal {
      return None;
    }

    // Unlink at every level the node reaches. Levels above its height
    // were never linked through it, so they stay as recorded.
    for level in 0..unsafe { candidate.as_ref() }.height() {
      if self.next(update[level], level) != Some(candidate) {
        break;
      }
      let next = unsafe { candidate.as_ref() }.forward[level];
      self.set_next(update[level], level, next);
    }

    #[cfg(feature = "tracing")]
    let prev_height = self.height;
    while self.height > 0 && self.front[self.height - 1].is_none() {
      self.height -= 1;
    }
    #[cfg(feature = "tracing")]
    if self.height < prev_height {
      tracing::trace!(height = self.height, "skipmap height decreased");
    }

    self.len -= 1;
    let (_, value) = unsafe { Node::dealloc(candidate) };
    Some(value)
  }

  /// Walks the staircase from the top active level down, recording in
  /// `update` the rightmost position strictly less than `key` at every
  /// level, and returns the sole candidate: the level-0 successor of the
  /// final cursor.
  fn find_splice(&self, key: &K, update: &mut [Link<K, V>; MAX_TOWER]) -> Link<K, V> {
    let mut cur: Link<K, V> = None;
    for level in (0..self.height).rev() {
      while let Some(next) = self.next(cur, level) {
        if self.cmp.compare(&unsafe { next.as_ref() }.key, key) == Ordering::Less {
          cur = Some(next);
        } else {
          break;
        }
      }
      update[level] = cur;
    }
    self.next(cur, 0)
  }

  /// Read-only leveled search: the node holding `key`, if any.
  fn find_node(&self, key: &K) -> Link<K, V> {
    let mut cur: Link<K, V> = None;
    for level in (0..self.height).rev() {
      while let Some(next) = self.next(cur, level) {
        if self.cmp.compare(&unsafe { next.as_ref() }.key, key) == Ordering::Less {
          cur = Some(next);
        } else {
          break;
        }
      }
    }
    match self.next(cur, 0) {
      Some(node) if self.cmp.compare(&unsafe { node.as_ref() }.key, key) == Ordering::Equal => {
        Some(node)
      }
      _ => None,
    }
  }
}

impl<K, V, C> SkipMap<K, V, C>
where
  K: fmt::Display,
{
  /// Writes a human-readable rendering of every level's connectivity.
  ///
  /// Each entry prints its key in a fixed-width field followed by `-*`
  /// for every level it participates in and ` |` for every active level
  /// it lacks. The surrounding `X` and `O` rows mark the front of each
  /// active level and the end of the list. For debugging and
  /// visualization only; the format is not a stable contract.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipmap::SkipMap;
  ///
  /// let mut map = SkipMap::new();
  /// map.insert("a", 1);
  ///
  /// let mut out = String::new();
  /// map.dump(&mut out).unwrap();
  /// assert!(out.contains('a'));
  /// ```
  pub fn dump<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
    const WIDTH: usize = 10;

    write!(w, "{:WIDTH$}", "")?;
    for _ in 0..self.height {
      w.write_str(" X")?;
    }
    w.write_str("\n")?;
    self.dump_links(w, WIDTH)?;

    let mut cur = self.front[0];
    while let Some(node) = cur {
      let node = unsafe { node.as_ref() };
      let key = node.key.to_string();
      if key.chars().count() <= WIDTH {
        write!(w, "{key:>WIDTH$}")?;
      } else {
        for c in key.chars().take(WIDTH) {
          w.write_char(c)?;
        }
      }
      for _ in 0..node.height() {
        w.write_str("-*")?;
      }
      for _ in node.height()..self.height {
        w.write_str(" |")?;
      }
      w.write_str("\n")?;
      self.dump_links(w, WIDTH)?;
      cur = node.forward[0];
    }

    write!(w, "{:WIDTH$}", "")?;
    for _ in 0..self.height {
      w.write_str(" O")?;
    }
    w.write_str("\n")
  }

  fn dump_links<W: fmt::Write>(&self, w: &mut W, width: usize) -> fmt::Result {
    write!(w, "{:width$}", "")?;
    for _ in 0..self.height {
      w.write_str(" |")?;
    }
    w.write_str("\n")
  }
}

impl<K, V> Default for SkipMap<K, V> {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl<K, V, C> Drop for SkipMap<K, V, C> {
  fn drop(&mut self) {
    self.clear();
  }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for SkipMap<K, V, C> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(self.iter()).finish()
  }
}

impl<K, V, C> Extend<(K, V)> for SkipMap<K, V, C>
where
  C: Comparator<K>,
{
  fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
    for (key, value) in iter {
      self.insert(key, value);
    }
  }
}

impl<K: Ord, V> FromIterator<(K, V)> for SkipMap<K, V> {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut map = Self::new();
    map.extend(iter);
    map
  }
}

impl<'a, K, V, C> IntoIterator for &'a SkipMap<K, V, C> {
  type Item = (&'a K, &'a V);
  type IntoIter = Iter<'a, K, V>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<'a, K, V, C> IntoIterator for &'a mut SkipMap<K, V, C> {
  type Item = (&'a K, &'a mut V);
  type IntoIter = IterMut<'a, K, V>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.iter_mut()
  }
}

impl<K, V, C> IntoIterator for SkipMap<K, V, C> {
  type Item = (K, V);
  type IntoIter = IntoIter<K, V>;

  /// Consumes the map into an iterator over its entries in key order.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipmap::SkipMap;
  ///
  /// let mut map = SkipMap::new();
  /// map.insert(2, "two");
  /// map.insert(1, "one");
  ///
  /// let entries: Vec<_> = map.into_iter().collect();
  /// assert_eq!(entries, [(1, "one"), (2, "two")]);
  /// ```
  fn into_iter(mut self) -> Self::IntoIter {
    let first = self.front[0].take();
    let len = self.len;
    // Detach every node so the map's Drop has nothing left to free; the
    // returned iterator owns them now.
    for slot in self.front.iter_mut() {
      *slot = None;
    }
    self.height = 0;
    self.len = 0;
    IntoIter::new(first, len)
  }
}
