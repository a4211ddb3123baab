use crate::cell::{Cell, CellKind};
use crate::error::MapError;
use crate::map::TypedMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

/// A lock-guarded, cloneable handle to a [`TypedMap`]
///
/// `TypedMap` itself is single-threaded. `SharedTypedMap` wraps one in an
/// `Arc<Mutex<_>>` so it can be handed to several threads or components;
/// every method takes the lock once for its whole duration, so each call is
/// atomic with respect to the others. Getters return owned copies because a
/// borrow cannot outlive the lock. Use [`with`](Self::with) for scoped
/// borrowed access.
///
/// # Examples
///
/// ```
/// use sovran_cellmap::{MapError, SharedTypedMap};
/// use std::thread;
///
/// let shared = SharedTypedMap::<u32, i64>::new();
///
/// let handles: Vec<_> = (0..4)
///     .map(|id| {
///         let shared = shared.clone();
///         thread::spawn(move || shared.add_scalar(id, id as i64 * 10))
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap()?;
/// }
///
/// assert_eq!(shared.len()?, 4);
/// assert_eq!(shared.get_scalar(&3)?, 30);
/// # Ok::<(), MapError>(())
/// ```
#[derive(Debug)]
pub struct SharedTypedMap<K, V> {
    inner: Arc<Mutex<TypedMap<K, V>>>,
}

impl<K, V> Clone for SharedTypedMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedTypedMap<K, V>
where
    K: Ord + Debug,
{
    /// Creates a new handle around an empty map
    pub fn new() -> Self {
        Self::from_map(TypedMap::new())
    }

    /// Wraps an existing map
    pub fn from_map(map: TypedMap<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(map)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, TypedMap<K, V>>, MapError> {
        self.inner.lock().map_err(|_| {
            warn!("typed map lock poisoned");
            MapError::LockError
        })
    }

    /// Runs a closure with read access to the underlying map
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_cellmap::{MapError, SharedTypedMap};
    ///
    /// let shared = SharedTypedMap::<&str, i32>::new();
    /// shared.add_sequence("primes", &[2, 3, 5, 7])?;
    ///
    /// // Sum without copying the sequence out
    /// let sum = shared.with(|map| map.get_sequence(&"primes").map(|v| v.iter().sum::<i32>()))??;
    /// assert_eq!(sum, 17);
    /// # Ok::<(), MapError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    pub fn with<F, R>(&self, f: F) -> Result<R, MapError>
    where
        F: FnOnce(&TypedMap<K, V>) -> R,
    {
        let map = self.lock()?;
        Ok(f(&map))
    }

    /// Runs a closure with write access to the underlying map
    ///
    /// Several operations inside one closure happen under a single lock.
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    pub fn with_mut<F, R>(&self, f: F) -> Result<R, MapError>
    where
        F: FnOnce(&mut TypedMap<K, V>) -> R,
    {
        let mut map = self.lock()?;
        Ok(f(&mut map))
    }

    /// Returns the number of entries
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    pub fn len(&self) -> Result<usize, MapError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, MapError> {
        Ok(self.lock()?.is_empty())
    }

    pub fn contains_key(&self, key: &K) -> Result<bool, MapError> {
        Ok(self.lock()?.contains_key(key))
    }

    pub fn kind(&self, key: &K) -> Result<Option<CellKind>, MapError> {
        Ok(self.lock()?.kind(key))
    }

    /// Returns the keys in ascending order
    pub fn keys(&self) -> Result<Vec<K>, MapError>
    where
        K: Clone,
    {
        Ok(self.lock()?.keys().cloned().collect())
    }

    /// Inserts a scalar under a new key
    ///
    /// # Errors
    ///
    /// - Returns `MapError::LockError` if the internal lock cannot be acquired
    /// - Returns `MapError::DuplicateKey` if the key is already present
    pub fn add_scalar(&self, key: K, value: V) -> Result<(), MapError> {
        self.lock()?.add_scalar(key, value)
    }

    pub fn add_sequence(&self, key: K, values: &[V]) -> Result<(), MapError>
    where
        V: Clone,
    {
        self.lock()?.add_sequence(key, values)
    }

    pub fn add_text(&self, key: K, text: &str) -> Result<(), MapError> {
        self.lock()?.add_text(key, text)
    }

    /// Inserts a scalar if the key is absent
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    /// An existing key yields `Ok(false)`.
    pub fn try_add_scalar(&self, key: K, value: V) -> Result<bool, MapError> {
        Ok(self.lock()?.try_add_scalar(key, value))
    }

    pub fn try_add_sequence(&self, key: K, values: &[V]) -> Result<bool, MapError>
    where
        V: Clone,
    {
        Ok(self.lock()?.try_add_sequence(key, values))
    }

    pub fn try_add_text(&self, key: K, text: &str) -> Result<bool, MapError> {
        Ok(self.lock()?.try_add_text(key, text))
    }

    pub fn add_or_replace_scalar(&self, key: K, value: V) -> Result<(), MapError> {
        self.lock()?.add_or_replace_scalar(key, value);
        Ok(())
    }

    pub fn add_or_replace_sequence(&self, key: K, values: &[V]) -> Result<(), MapError>
    where
        V: Clone,
    {
        self.lock()?.add_or_replace_sequence(key, values);
        Ok(())
    }

    pub fn add_or_replace_text(&self, key: K, text: &str) -> Result<(), MapError> {
        self.lock()?.add_or_replace_text(key, text);
        Ok(())
    }

    /// Returns a copy of the scalar stored under `key`
    ///
    /// # Errors
    ///
    /// - Returns `MapError::LockError` if the internal lock cannot be acquired
    /// - Returns `MapError::KeyNotFound` if the key doesn't exist
    /// - Returns `MapError::WrongVariant` if the key holds a sequence or text
    pub fn get_scalar(&self, key: &K) -> Result<V, MapError>
    where
        V: Clone,
    {
        self.lock()?.get_scalar(key)
    }

    /// Returns a copy of the sequence stored under `key`
    pub fn get_sequence(&self, key: &K) -> Result<Vec<V>, MapError>
    where
        V: Clone,
    {
        self.lock()?.get_sequence(key).map(<[V]>::to_vec)
    }

    /// Returns a copy of the text stored under `key`
    pub fn get_text(&self, key: &K) -> Result<String, MapError> {
        self.lock()?.get_text(key).map(str::to_owned)
    }

    pub fn try_get_scalar(&self, key: &K) -> Result<Option<V>, MapError>
    where
        V: Clone,
    {
        Ok(self.lock()?.try_get_scalar(key))
    }

    pub fn try_get_sequence(&self, key: &K) -> Result<Option<Vec<V>>, MapError>
    where
        V: Clone,
    {
        Ok(self.lock()?.try_get_sequence(key).map(<[V]>::to_vec))
    }

    pub fn try_get_text(&self, key: &K) -> Result<Option<String>, MapError> {
        Ok(self.lock()?.try_get_text(key).map(str::to_owned))
    }

    /// Returns the scalar under `key`, inserting `default` first if absent
    ///
    /// # Errors
    ///
    /// - Returns `MapError::LockError` if the internal lock cannot be acquired
    /// - Returns `MapError::WrongVariant` if the key holds a sequence or text
    pub fn get_or_add_scalar(&self, key: K, default: V) -> Result<V, MapError>
    where
        K: Clone,
        V: Clone,
    {
        self.lock()?.get_or_add_scalar(key, default)
    }

    pub fn get_or_add_sequence(&self, key: K, default: &[V]) -> Result<Vec<V>, MapError>
    where
        K: Clone,
        V: Clone,
    {
        self.lock()?
            .get_or_add_sequence(key, default)
            .map(<[V]>::to_vec)
    }

    pub fn get_or_add_text(&self, key: K, default: &str) -> Result<String, MapError>
    where
        K: Clone,
    {
        self.lock()?.get_or_add_text(key, default).map(str::to_owned)
    }

    /// Removes the entry under `key`
    ///
    /// # Errors
    ///
    /// - Returns `MapError::LockError` if the internal lock cannot be acquired
    /// - Returns `MapError::KeyNotFound` if the key doesn't exist
    pub fn remove(&self, key: &K) -> Result<(), MapError> {
        self.lock()?.remove(key)
    }

    pub fn take(&self, key: &K) -> Result<Cell<V>, MapError> {
        self.lock()?.take(key)
    }

    /// Removes the entry under `key` if present
    ///
    /// # Returns
    ///
    /// Returns `Ok(true)` if the key was present and removed, `Ok(false)` if not present.
    pub fn try_remove(&self, key: &K) -> Result<bool, MapError> {
        Ok(self.lock()?.try_remove(key))
    }

    pub fn remove_all(&self) -> Result<(), MapError> {
        self.lock()?.remove_all();
        Ok(())
    }
}

impl<K, V> Default for SharedTypedMap<K, V>
where
    K: Ord + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> From<TypedMap<K, V>> for SharedTypedMap<K, V>
where
    K: Ord + Debug,
{
    fn from(map: TypedMap<K, V>) -> Self {
        Self::from_map(map)
    }
}
