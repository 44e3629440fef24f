use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::mem::take;

/// Capacity used by [`ProbeMap::new`] and the `Default` impl.
pub const DEFAULT_CAPACITY: usize = 16;

/// One position in the backing array.
///
/// A slot is occupied exactly when its value is non-empty; the empty string
/// doubles as the vacancy marker, so removal only has to reset the value.
#[derive(Clone, Default)]
struct Slot {
    key: u64,
    value: String,
}

impl Slot {
    #[inline]
    fn is_occupied(&self) -> bool {
        !self.value.is_empty()
    }

    #[inline]
    fn is_vacant(&self) -> bool {
        self.value.is_empty()
    }
}

/// Error returned by [`ProbeMap::with_capacity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateError {
    /// The requested capacity was zero. A zero-capacity table has no slot to
    /// probe and `key % capacity` is undefined.
    ZeroCapacity,
    /// The slot array could not be allocated.
    OutOfMemory,
}

impl core::fmt::Display for CreateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CreateError::ZeroCapacity => f.write_str("capacity must be greater than zero"),
            CreateError::OutOfMemory => f.write_str("failed to allocate the slot array"),
        }
    }
}

impl core::error::Error for CreateError {}

/// Error returned by [`ProbeMap::insert`] and [`ProbeMap::insert_or_assign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// The map already holds `capacity` entries.
    Full,
    /// The key is already present. Only [`ProbeMap::insert`] reports this;
    /// [`ProbeMap::insert_or_assign`] replaces the value instead.
    DuplicateKey,
    /// The value was empty. The empty string marks a vacant slot, so it is
    /// not a storable value.
    EmptyValue,
}

impl core::fmt::Display for InsertError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InsertError::Full => f.write_str("map is full"),
            InsertError::DuplicateKey => f.write_str("key is already present"),
            InsertError::EmptyValue => f.write_str("empty values cannot be stored"),
        }
    }
}

impl core::error::Error for InsertError {}

/// A fixed-capacity hash map from `u64` keys to owned string values.
///
/// Collisions are resolved by linear probing: an operation on `key` starts at
/// slot `key % capacity` and walks the array with wraparound. Every probe
/// visits the full cycle of `capacity` slots rather than stopping at the
/// first vacant one, which is what lets removal simply reset a slot to empty
/// without tombstones or chain repair. The trade is O(capacity) worst-case
/// operations, so this is meant for small, bounded tables.
///
/// Capacity is fixed at construction. Once `len() == capacity()` further
/// insertions fail with [`InsertError::Full`]; growth means building a larger
/// map and re-inserting.
///
/// # Examples
///
/// ```rust
/// use probe_map::ProbeMap;
///
/// let mut map = ProbeMap::with_capacity(4).unwrap();
/// map.insert(1, "alpha").unwrap();
/// map.insert(5, "bravo").unwrap(); // 5 % 4 == 1, probes into the next slot
///
/// assert_eq!(map.get(5), Some("bravo"));
/// assert_eq!(map.remove(1), Some("alpha".to_string()));
/// assert_eq!(map.get(5), Some("bravo"));
/// ```
#[derive(Clone)]
pub struct ProbeMap {
    slots: Box<[Slot]>,
    len: usize,
}

impl ProbeMap {
    /// Creates a map with capacity [`DEFAULT_CAPACITY`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_map::ProbeMap;
    ///
    /// let map = ProbeMap::new();
    /// assert_eq!(map.capacity(), 16);
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY).expect("failed to allocate default-capacity map")
    }

    /// Creates a map with exactly `capacity` slots, all vacant.
    ///
    /// Fails with [`CreateError::ZeroCapacity`] if `capacity` is zero and
    /// with [`CreateError::OutOfMemory`] if the slot array cannot be
    /// allocated; no partial allocation survives either failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_map::CreateError;
    /// use probe_map::ProbeMap;
    ///
    /// let map = ProbeMap::with_capacity(8).unwrap();
    /// assert_eq!(map.capacity(), 8);
    ///
    /// assert_eq!(ProbeMap::with_capacity(0).unwrap_err(), CreateError::ZeroCapacity);
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self, CreateError> {
        if capacity == 0 {
            return Err(CreateError::ZeroCapacity);
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| CreateError::OutOfMemory)?;
        slots.resize_with(capacity, Slot::default);

        Ok(Self {
            slots: slots.into_boxed_slice(),
            len: 0,
        })
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_map::ProbeMap;
    ///
    /// let mut map = ProbeMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the fixed number of slots.
    ///
    /// Unlike growable maps this never changes after construction; [`clear`]
    /// in particular leaves it untouched.
    ///
    /// [`clear`]: ProbeMap::clear
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns `len() / capacity()` as a float.
    ///
    /// Insertion is refused once this reaches `1.0`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_map::ProbeMap;
    ///
    /// let mut map = ProbeMap::with_capacity(4).unwrap();
    /// map.insert(1, "a").unwrap();
    /// map.insert(2, "b").unwrap();
    /// assert_eq!(map.load_factor(), 0.5);
    /// ```
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.slots.len() as f64
    }

    /// Home slot for a key. Sole indexing function; capacity is nonzero by
    /// construction.
    #[inline]
    fn hash_index(&self, key: u64) -> usize {
        (key % self.slots.len() as u64) as usize
    }

    /// Full probe cycle starting at `start`: every slot index exactly once,
    /// wrapping at the end of the array.
    #[inline]
    fn probe(&self, start: usize) -> impl Iterator<Item = usize> + use<> {
        let capacity = self.slots.len();
        (start..capacity).chain(0..start)
    }

    /// Index of the occupied slot holding `key`, if any.
    fn index_of(&self, key: u64) -> Option<usize> {
        self.probe(self.hash_index(key)).find(|&idx| {
            let slot = &self.slots[idx];
            slot.key == key && slot.is_occupied()
        })
    }

    /// Returns the value stored for `key`.
    ///
    /// The reference is valid until the next mutation of the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_map::ProbeMap;
    ///
    /// let mut map = ProbeMap::new();
    /// map.insert(1, "one").unwrap();
    /// assert_eq!(map.get(1), Some("one"));
    /// assert_eq!(map.get(2), None);
    /// ```
    pub fn get(&self, key: u64) -> Option<&str> {
        self.index_of(key)
            .map(|idx| self.slots[idx].value.as_str())
    }

    /// Returns a write-through reference to the value stored for `key`.
    ///
    /// The reference is a `&mut str`, so the text can be edited in place but
    /// not emptied or resized; a slot can only become vacant through
    /// [`remove`] or [`clear`]. Replacing a value wholesale goes through
    /// [`insert_or_assign`].
    ///
    /// [`remove`]: ProbeMap::remove
    /// [`clear`]: ProbeMap::clear
    /// [`insert_or_assign`]: ProbeMap::insert_or_assign
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_map::ProbeMap;
    ///
    /// let mut map = ProbeMap::new();
    /// map.insert(1, "one").unwrap();
    /// map.get_mut(1).unwrap().make_ascii_uppercase();
    /// assert_eq!(map.get(1), Some("ONE"));
    /// ```
    pub fn get_mut(&mut self, key: u64) -> Option<&mut str> {
        let idx = self.index_of(key)?;
        Some(self.slots[idx].value.as_mut_str())
    }

    /// Returns `true` if `key` has a stored value.
    pub fn contains_key(&self, key: u64) -> bool {
        self.index_of(key).is_some()
    }

    /// Inserts `key` with an owned copy of `value`.
    ///
    /// Fails with [`InsertError::EmptyValue`] for an empty value,
    /// [`InsertError::Full`] once the map holds `capacity` entries, and
    /// [`InsertError::DuplicateKey`] if the key is already present. Failure
    /// leaves the map unchanged.
    ///
    /// The stored copy is independent of the caller's buffer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_map::InsertError;
    /// use probe_map::ProbeMap;
    ///
    /// let mut map = ProbeMap::with_capacity(2).unwrap();
    /// assert_eq!(map.insert(1, "one"), Ok(()));
    /// assert_eq!(map.insert(1, "uno"), Err(InsertError::DuplicateKey));
    /// assert_eq!(map.get(1), Some("one"));
    ///
    /// map.insert(2, "two").unwrap();
    /// assert_eq!(map.insert(3, "three"), Err(InsertError::Full));
    /// ```
    pub fn insert(&mut self, key: u64, value: &str) -> Result<(), InsertError> {
        if value.is_empty() {
            return Err(InsertError::EmptyValue);
        }
        if self.load_factor() >= 1.0 {
            return Err(InsertError::Full);
        }

        // Scan the whole cycle before claiming anything: a vacant slot left
        // by a removal may sit in front of an occupied slot that already
        // holds this key.
        let mut vacant = None;
        for idx in self.probe(self.hash_index(key)) {
            let slot = &self.slots[idx];
            if slot.is_vacant() {
                if vacant.is_none() {
                    vacant = Some(idx);
                }
            } else if slot.key == key {
                return Err(InsertError::DuplicateKey);
            }
        }

        match vacant {
            Some(idx) => {
                let slot = &mut self.slots[idx];
                slot.key = key;
                slot.value = value.to_owned();
                self.len += 1;
                Ok(())
            }
            // Unreachable while the load-factor guard holds; kept as the
            // terminal case of the scan.
            None => Err(InsertError::Full),
        }
    }

    /// Inserts `key`, or replaces its value if the key is already present.
    ///
    /// Replacement drops the old value and stores a fresh owned copy without
    /// changing `len()`. For an absent key this behaves exactly like
    /// [`insert`], so it can still fail with [`InsertError::Full`]; an empty
    /// value is rejected either way.
    ///
    /// [`insert`]: ProbeMap::insert
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_map::ProbeMap;
    ///
    /// let mut map = ProbeMap::new();
    /// map.insert_or_assign(1, "one").unwrap();
    /// map.insert_or_assign(1, "uno").unwrap();
    /// assert_eq!(map.get(1), Some("uno"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert_or_assign(&mut self, key: u64, value: &str) -> Result<(), InsertError> {
        if value.is_empty() {
            return Err(InsertError::EmptyValue);
        }
        match self.index_of(key) {
            Some(idx) => {
                self.slots[idx].value = value.to_owned();
                Ok(())
            }
            None => self.insert(key, value),
        }
    }

    /// Removes `key` and returns its value.
    ///
    /// The slot is reset to vacant (key zeroed, value emptied); no tombstone
    /// is written, and later-inserted colliding keys stay reachable because
    /// probes always walk the full cycle. Returns `None` without mutating
    /// anything if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_map::ProbeMap;
    ///
    /// let mut map = ProbeMap::new();
    /// map.insert(1, "one").unwrap();
    /// assert_eq!(map.remove(1), Some("one".to_string()));
    /// assert_eq!(map.remove(1), None);
    /// ```
    pub fn remove(&mut self, key: u64) -> Option<String> {
        let idx = self.index_of(key)?;
        let slot = &mut self.slots[idx];
        slot.key = 0;
        let value = take(&mut slot.value);
        self.len -= 1;
        Some(value)
    }

    /// Removes every entry, releasing the owned values.
    ///
    /// Capacity is unchanged; only occupancy resets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_map::ProbeMap;
    ///
    /// let mut map = ProbeMap::with_capacity(4).unwrap();
    /// map.insert(1, "one").unwrap();
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 4);
    /// ```
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.key = 0;
            slot.value = String::new();
        }
        self.len = 0;
    }

    /// Returns the occupied slot with the lowest index, or `None` if the map
    /// is empty.
    ///
    /// "First" is table-index order, not insertion order and not key order:
    /// a colliding key that probed past the end of the array can sit at a
    /// lower index than its home slot.
    pub fn first_key_value(&self) -> Option<(u64, &str)> {
        self.slots
            .iter()
            .find(|slot| slot.is_occupied())
            .map(|slot| (slot.key, slot.value.as_str()))
    }

    /// Returns the occupied slot with the highest index, or `None` if the
    /// map is empty.
    pub fn last_key_value(&self) -> Option<(u64, &str)> {
        self.slots
            .iter()
            .rev()
            .find(|slot| slot.is_occupied())
            .map(|slot| (slot.key, slot.value.as_str()))
    }

    /// Returns the next occupied slot after the one holding `key`, scanning
    /// in index order with wraparound.
    ///
    /// The scan covers the `capacity - 1` slots after the starting one, so
    /// the starting slot itself is never re-returned: with a single entry
    /// this returns `None`, while with two or more the walk cycles — the
    /// successor of [`last_key_value`] is [`first_key_value`]. A terminating
    /// traversal either stops when the cycle returns to its starting key or
    /// uses [`iter`].
    ///
    /// Returns `None` if `key` is absent.
    ///
    /// [`last_key_value`]: ProbeMap::last_key_value
    /// [`first_key_value`]: ProbeMap::first_key_value
    /// [`iter`]: ProbeMap::iter
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_map::ProbeMap;
    ///
    /// let mut map = ProbeMap::with_capacity(8).unwrap();
    /// map.insert(2, "a").unwrap();
    /// map.insert(5, "b").unwrap();
    ///
    /// assert_eq!(map.next_key_value(2), Some((5, "b")));
    /// // Wraps around past the end of the array.
    /// assert_eq!(map.next_key_value(5), Some((2, "a")));
    /// ```
    pub fn next_key_value(&self, key: u64) -> Option<(u64, &str)> {
        let start = self.index_of(key)?;
        let capacity = self.slots.len();
        (start + 1..capacity)
            .chain(0..start)
            .map(|idx| &self.slots[idx])
            .find(|slot| slot.is_occupied())
            .map(|slot| (slot.key, slot.value.as_str()))
    }

    /// Iterates over `(key, value)` entries in table-index order.
    ///
    /// This is the terminating counterpart to the
    /// [`first_key_value`]/[`next_key_value`] cursor walk: each occupied slot
    /// is yielded exactly once, without wraparound.
    ///
    /// [`first_key_value`]: ProbeMap::first_key_value
    /// [`next_key_value`]: ProbeMap::next_key_value
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_map::ProbeMap;
    ///
    /// let mut map = ProbeMap::with_capacity(4).unwrap();
    /// map.insert(2, "two").unwrap();
    /// map.insert(1, "one").unwrap();
    ///
    /// let entries: Vec<_> = map.iter().collect();
    /// assert_eq!(entries, vec![(1, "one"), (2, "two")]);
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            slots: self.slots.iter(),
        }
    }

    /// Iterates over the keys in table-index order.
    pub fn keys(&self) -> Keys<'_> {
        Keys { inner: self.iter() }
    }

    /// Iterates over the values in table-index order.
    pub fn values(&self) -> Values<'_> {
        Values { inner: self.iter() }
    }
}

impl Default for ProbeMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for ProbeMap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a ProbeMap {
    type Item = (u64, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a map's entries in table-index order.
///
/// Created by [`ProbeMap::iter`].
pub struct Iter<'a> {
    slots: core::slice::Iter<'a, Slot>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (u64, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if slot.is_occupied() {
                return Some((slot.key, slot.value.as_str()));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.slots.len()))
    }
}

/// Iterator over a map's keys.
///
/// Created by [`ProbeMap::keys`].
pub struct Keys<'a> {
    inner: Iter<'a>,
}

impl Iterator for Keys<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Iterator over a map's values.
///
/// Created by [`ProbeMap::values`].
pub struct Values<'a> {
    inner: Iter<'a>,
}

impl<'a> Iterator for Values<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
