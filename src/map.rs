use crate::cell::{Cell, CellKind};
use crate::error::MapError;
use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;
use std::fmt::Debug;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An ordered map whose values are scalars, sequences or text
///
/// Every key holds exactly one [`Cell`]. The variant chosen when a key is
/// inserted is the only one its accessors will hand back: asking for a
/// different shape fails with [`MapError::WrongVariant`] instead of
/// converting. Only the `add_or_replace_*` family and removal can change
/// what a key holds.
///
/// Operations come in two families. Strict ones (`add_*`, `get_*`,
/// `get_or_add_*`, `remove`) return a [`MapError`] on a duplicate key,
/// missing key or variant mismatch. Lenient ones (`try_*`) fold the same
/// conditions into a `bool` or `Option`. A failed operation never changes
/// the map.
///
/// Borrowed views returned by the getters are tied to a shared borrow of the
/// map, so none of them can outlive a later remove or replace.
///
/// # Examples
///
/// ```
/// use sovran_cellmap::{MapError, TypedMap};
///
/// let mut map = TypedMap::<i32, i32>::new();
/// map.add_scalar(16, 222)?;
/// map.add_sequence(142, &[4, 5, 6, 7])?;
/// map.add_text(993, "123123")?;
///
/// assert_eq!(map.len(), 3);
/// assert_eq!(map.get_scalar(&16)?, 222);
/// assert_eq!(map.get_sequence(&142)?, &[4, 5, 6, 7]);
/// assert_eq!(map.get_text(&993)?, "123123");
///
/// assert!(matches!(map.get_text(&16), Err(MapError::WrongVariant { .. })));
/// # Ok::<(), MapError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(
        transparent,
        bound(
            serialize = "K: Serialize, V: Serialize",
            deserialize = "K: Ord + Deserialize<'de>, V: Deserialize<'de>"
        )
    )
)]
pub struct TypedMap<K, V> {
    entries: BTreeMap<K, Cell<V>>,
}

impl<K, V> TypedMap<K, V>
where
    K: Ord + Debug,
{
    /// Creates a new, empty map
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Returns the number of keys currently present
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the variant stored under `key`, if any
    pub fn kind(&self, key: &K) -> Option<CellKind> {
        self.entries.get(key).map(Cell::kind)
    }

    /// Returns the raw cell stored under `key`, whatever its variant
    pub fn get(&self, key: &K) -> Option<&Cell<V>> {
        self.entries.get(key)
    }

    /// Iterates over the keys in ascending order
    pub fn keys(&self) -> btree_map::Keys<'_, K, Cell<V>> {
        self.entries.keys()
    }

    /// Iterates over the entries in ascending key order
    pub fn iter(&self) -> btree_map::Iter<'_, K, Cell<V>> {
        self.entries.iter()
    }

    // ---- strict add ----

    /// Inserts a scalar under a new key
    ///
    /// # Errors
    ///
    /// Returns `MapError::DuplicateKey` if the key is already present. The
    /// existing entry is left untouched.
    pub fn add_scalar(&mut self, key: K, value: V) -> Result<(), MapError> {
        self.insert_new(key, || Cell::Scalar(value))
    }

    /// Inserts a copy of `values` under a new key
    ///
    /// # Errors
    ///
    /// Returns `MapError::DuplicateKey` if the key is already present.
    pub fn add_sequence(&mut self, key: K, values: &[V]) -> Result<(), MapError>
    where
        V: Clone,
    {
        self.insert_new(key, || Cell::sequence(values))
    }

    /// Inserts a copy of `text` under a new key
    ///
    /// # Errors
    ///
    /// Returns `MapError::DuplicateKey` if the key is already present.
    pub fn add_text(&mut self, key: K, text: &str) -> Result<(), MapError> {
        self.insert_new(key, || Cell::text(text))
    }

    // ---- lenient add ----

    /// Inserts a scalar if the key is absent. Returns `false` and changes
    /// nothing if the key is already present.
    pub fn try_add_scalar(&mut self, key: K, value: V) -> bool {
        self.insert_new(key, || Cell::Scalar(value)).is_ok()
    }

    pub fn try_add_sequence(&mut self, key: K, values: &[V]) -> bool
    where
        V: Clone,
    {
        self.insert_new(key, || Cell::sequence(values)).is_ok()
    }

    pub fn try_add_text(&mut self, key: K, text: &str) -> bool {
        self.insert_new(key, || Cell::text(text)).is_ok()
    }

    // ---- add or replace ----

    /// Inserts a scalar, dropping whatever the key held before
    ///
    /// The previous cell may be of any variant.
    pub fn add_or_replace_scalar(&mut self, key: K, value: V) {
        self.replace(key, Cell::Scalar(value));
    }

    pub fn add_or_replace_sequence(&mut self, key: K, values: &[V])
    where
        V: Clone,
    {
        self.replace(key, Cell::sequence(values));
    }

    pub fn add_or_replace_text(&mut self, key: K, text: &str) {
        self.replace(key, Cell::text(text));
    }

    // ---- strict get ----

    /// Returns a copy of the scalar stored under `key`
    ///
    /// # Errors
    ///
    /// - Returns `MapError::KeyNotFound` if the key doesn't exist
    /// - Returns `MapError::WrongVariant` if the key holds a sequence or text
    pub fn get_scalar(&self, key: &K) -> Result<V, MapError>
    where
        V: Clone,
    {
        self.lookup(key, CellKind::Scalar, Cell::as_scalar).cloned()
    }

    /// Returns the sequence stored under `key`
    ///
    /// The slice length is the stored element count.
    ///
    /// # Errors
    ///
    /// - Returns `MapError::KeyNotFound` if the key doesn't exist
    /// - Returns `MapError::WrongVariant` if the key holds a scalar or text
    pub fn get_sequence(&self, key: &K) -> Result<&[V], MapError> {
        self.lookup(key, CellKind::Sequence, Cell::as_sequence)
    }

    /// Returns the text stored under `key`
    ///
    /// # Errors
    ///
    /// - Returns `MapError::KeyNotFound` if the key doesn't exist
    /// - Returns `MapError::WrongVariant` if the key holds a scalar or sequence
    pub fn get_text(&self, key: &K) -> Result<&str, MapError> {
        self.lookup(key, CellKind::Text, Cell::as_text)
    }

    // ---- lenient get ----

    /// Returns the scalar under `key`, or `None` when the key is missing or
    /// holds another variant
    pub fn try_get_scalar(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.entries.get(key).and_then(Cell::as_scalar).cloned()
    }

    pub fn try_get_sequence(&self, key: &K) -> Option<&[V]> {
        self.entries.get(key).and_then(Cell::as_sequence)
    }

    pub fn try_get_text(&self, key: &K) -> Option<&str> {
        self.entries.get(key).and_then(Cell::as_text)
    }

    // ---- get or add ----

    /// Returns the scalar under `key`, inserting `default` first if the key
    /// is absent
    ///
    /// # Errors
    ///
    /// Returns `MapError::WrongVariant` if the key already holds a sequence
    /// or text. The existing entry is never replaced.
    pub fn get_or_add_scalar(&mut self, key: K, default: V) -> Result<V, MapError>
    where
        K: Clone,
        V: Clone,
    {
        self.get_or_insert_with(
            key,
            CellKind::Scalar,
            || Cell::Scalar(default),
            Cell::as_scalar,
        )
        .cloned()
    }

    /// Returns the sequence under `key`, inserting a copy of `default` first
    /// if the key is absent
    ///
    /// # Errors
    ///
    /// Returns `MapError::WrongVariant` if the key already holds a scalar or
    /// text.
    pub fn get_or_add_sequence(&mut self, key: K, default: &[V]) -> Result<&[V], MapError>
    where
        K: Clone,
        V: Clone,
    {
        self.get_or_insert_with(
            key,
            CellKind::Sequence,
            || Cell::sequence(default),
            Cell::as_sequence,
        )
    }

    /// Returns the text under `key`, inserting a copy of `default` first if
    /// the key is absent
    ///
    /// # Errors
    ///
    /// Returns `MapError::WrongVariant` if the key already holds a scalar or
    /// sequence.
    pub fn get_or_add_text(&mut self, key: K, default: &str) -> Result<&str, MapError>
    where
        K: Clone,
    {
        self.get_or_insert_with(key, CellKind::Text, || Cell::text(default), Cell::as_text)
    }

    // ---- removal ----

    /// Removes the entry under `key`, dropping its storage
    ///
    /// # Errors
    ///
    /// Returns `MapError::KeyNotFound` if the key doesn't exist.
    pub fn remove(&mut self, key: &K) -> Result<(), MapError> {
        self.take(key).map(drop)
    }

    /// Removes the entry under `key` and hands its cell to the caller
    ///
    /// # Errors
    ///
    /// Returns `MapError::KeyNotFound` if the key doesn't exist.
    pub fn take(&mut self, key: &K) -> Result<Cell<V>, MapError> {
        match self.entries.remove(key) {
            Some(cell) => {
                trace!(key = ?key, kind = %cell.kind(), "removed cell");
                Ok(cell)
            }
            None => Err(Self::missing(key)),
        }
    }

    /// Removes the entry under `key` if present. Returns whether anything
    /// was removed.
    pub fn try_remove(&mut self, key: &K) -> bool {
        match self.entries.remove(key) {
            Some(cell) => {
                trace!(key = ?key, kind = %cell.kind(), "removed cell");
                true
            }
            None => false,
        }
    }

    /// Drops every entry
    pub fn remove_all(&mut self) {
        trace!(count = self.entries.len(), "removing all cells");
        self.entries.clear();
    }

    // ---- internals ----

    fn insert_new<F>(&mut self, key: K, make: F) -> Result<(), MapError>
    where
        F: FnOnce() -> Cell<V>,
    {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                debug!(key = ?entry.key(), "rejected add on existing key");
                Err(MapError::DuplicateKey(format!("{:?}", entry.key())))
            }
            Entry::Vacant(entry) => {
                let cell = make();
                trace!(key = ?entry.key(), kind = %cell.kind(), "inserted cell");
                entry.insert(cell);
                Ok(())
            }
        }
    }

    fn replace(&mut self, key: K, cell: Cell<V>) {
        match self.entries.entry(key) {
            Entry::Occupied(mut entry) => {
                trace!(
                    key = ?entry.key(),
                    from = %entry.get().kind(),
                    to = %cell.kind(),
                    "replaced cell"
                );
                entry.insert(cell);
            }
            Entry::Vacant(entry) => {
                trace!(key = ?entry.key(), kind = %cell.kind(), "inserted cell");
                entry.insert(cell);
            }
        }
    }

    fn lookup<R, P>(&self, key: &K, expected: CellKind, project: P) -> Result<&R, MapError>
    where
        R: ?Sized,
        P: FnOnce(&Cell<V>) -> Option<&R>,
    {
        let cell = self.entries.get(key).ok_or_else(|| Self::missing(key))?;
        project(cell).ok_or_else(|| Self::wrong_variant(key, expected, cell.kind()))
    }

    fn get_or_insert_with<R, F, P>(
        &mut self,
        key: K,
        expected: CellKind,
        make: F,
        project: P,
    ) -> Result<&R, MapError>
    where
        K: Clone,
        R: ?Sized,
        F: FnOnce() -> Cell<V>,
        P: FnOnce(&Cell<V>) -> Option<&R>,
    {
        let cell: &Cell<V> = self.entries.entry(key.clone()).or_insert_with(|| {
            trace!(key = ?key, kind = %expected, "inserted default cell");
            make()
        });
        project(cell).ok_or_else(|| Self::wrong_variant(&key, expected, cell.kind()))
    }

    fn missing(key: &K) -> MapError {
        debug!(key = ?key, "key not found");
        MapError::KeyNotFound(format!("{:?}", key))
    }

    fn wrong_variant(key: &K, expected: CellKind, actual: CellKind) -> MapError {
        debug!(key = ?key, %expected, %actual, "wrong cell variant");
        MapError::WrongVariant {
            key: format!("{:?}", key),
            expected,
            actual,
        }
    }
}

impl<K, V> Default for TypedMap<K, V>
where
    K: Ord + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Extend<(K, Cell<V>)> for TypedMap<K, V>
where
    K: Ord + Debug,
{
    /// Later entries replace earlier ones, as `add_or_replace_*` does
    fn extend<I: IntoIterator<Item = (K, Cell<V>)>>(&mut self, iter: I) {
        for (key, cell) in iter {
            self.replace(key, cell);
        }
    }
}

impl<K, V> FromIterator<(K, Cell<V>)> for TypedMap<K, V>
where
    K: Ord + Debug,
{
    fn from_iter<I: IntoIterator<Item = (K, Cell<V>)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V> IntoIterator for &'a TypedMap<K, V> {
    type Item = (&'a K, &'a Cell<V>);
    type IntoIter = btree_map::Iter<'a, K, Cell<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K, V> IntoIterator for TypedMap<K, V> {
    type Item = (K, Cell<V>);
    type IntoIter = btree_map::IntoIter<K, Cell<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_add_does_not_build_cell() {
        let mut map = TypedMap::<i32, i32>::new();
        map.add_scalar(1, 10).unwrap();

        let mut built = false;
        let result = map.insert_new(1, || {
            built = true;
            Cell::Scalar(20)
        });

        assert_eq!(result, Err(MapError::DuplicateKey("1".to_string())));
        assert!(!built);
        assert_eq!(map.get_scalar(&1).unwrap(), 10);
    }

    #[test]
    fn test_replace_swaps_variant_in_place() {
        let mut map = TypedMap::<i32, i32>::new();
        map.replace(5, Cell::Scalar(1));
        map.replace(5, Cell::text("five"));

        assert_eq!(map.len(), 1);
        assert_eq!(map.kind(&5), Some(CellKind::Text));
    }

    #[test]
    fn test_lookup_reports_actual_variant() {
        let mut map = TypedMap::<&str, u8>::new();
        map.add_text("name", "cellmap").unwrap();

        let err = map.lookup(&"name", CellKind::Scalar, Cell::as_scalar).unwrap_err();
        assert_eq!(
            err,
            MapError::WrongVariant {
                key: "\"name\"".to_string(),
                expected: CellKind::Scalar,
                actual: CellKind::Text,
            }
        );
    }

    #[test]
    fn test_get_or_insert_with_keeps_existing() {
        let mut map = TypedMap::<i32, i32>::new();
        map.add_sequence(3, &[1, 2]).unwrap();

        let mut built = false;
        let values = map
            .get_or_insert_with(
                3,
                CellKind::Sequence,
                || {
                    built = true;
                    Cell::Sequence(vec![9])
                },
                Cell::as_sequence,
            )
            .unwrap();

        assert_eq!(values, &[1, 2]);
        assert!(!built);
    }

    #[test]
    fn test_iteration_is_key_ordered() {
        let map: TypedMap<i32, i32> = vec![
            (30, Cell::Scalar(3)),
            (10, Cell::text("ten")),
            (20, Cell::sequence(&[2, 2])),
        ]
        .into_iter()
        .collect();

        let keys: Vec<i32> = map.keys().copied().collect();
        assert_eq!(keys, vec![10, 20, 30]);

        let kinds: Vec<CellKind> = map.iter().map(|(_, cell)| cell.kind()).collect();
        assert_eq!(
            kinds,
            vec![CellKind::Text, CellKind::Sequence, CellKind::Scalar]
        );
    }
}
