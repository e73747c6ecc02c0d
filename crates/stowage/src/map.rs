//! Typed collections over fixed-layout keys and values.
//!
//! [`TypedMap`] maps one `K` to one `V`; [`TypedArrayMap`] maps one `K` to a
//! contiguous run of `V`s. Both store the raw bytes of their keys and values
//! and hand values back as references into the memory map, so both `K` and `V`
//! must satisfy [`ValidLayout`]. The check is evaluated when a map is
//! constructed: naming a map over a type of the wrong size is a build error.

use std::marker::PhantomData;

use bytemuck::Pod;

use crate::collection::{BinaryCollection, CollectionOptions};
use crate::error::Result;
use crate::layout::ValidLayout;
use crate::txn::{ReadableTxn, WriteTxn};
use crate::view::View;

/// A collection mapping each `K` to exactly one `V`.
///
/// ```no_run
/// use stowage::{Environment, TypedMap};
///
/// # fn main() -> stowage::Result<()> {
/// let env = Environment::open_default("heights.mdb")?;
/// let heights = TypedMap::<u64, f64>::new("heights");
///
/// let mut txn = env.write_txn()?;
/// heights.put(&mut txn, &7, &1.82)?;
/// txn.commit()?;
///
/// let txn = env.read_txn()?;
/// assert_eq!(*heights.get(&txn, &7)?, 1.82);
/// # Ok(())
/// # }
/// ```
pub struct TypedMap<K, V> {
    collection: BinaryCollection,
    _types: PhantomData<fn() -> (K, V)>,
}

impl<K: Pod, V: Pod> TypedMap<K, V> {
    /// A map backed by the collection `name`, created on first write.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, CollectionOptions::default())
    }

    /// A map backed by the collection `name`, opened with `options`.
    pub fn with_options(name: impl Into<String>, options: CollectionOptions) -> Self {
        let () = <K as ValidLayout>::ASSERT_VALID;
        let () = <V as ValidLayout>::ASSERT_VALID;
        Self { collection: BinaryCollection::with_options(name, options), _types: PhantomData }
    }

    /// The name of the backing collection.
    #[must_use]
    pub fn name(&self) -> &str {
        self.collection.name()
    }

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`BinaryCollection::put`].
    pub fn put(&self, txn: &mut WriteTxn<'_>, key: &K, value: &V) -> Result<()> {
        self.collection.put(txn, bytemuck::bytes_of(key), bytemuck::bytes_of(value))
    }

    /// Returns a reference to the value stored under `key`, valid for as long
    /// as `txn` is borrowed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) when the key is absent.
    ///
    /// # Panics
    ///
    /// Panics if the stored value is not exactly `size_of::<V>()` bytes, which
    /// means it was written as some other type.
    pub fn get<'t, 'env: 't>(&self, txn: &'t impl ReadableTxn<'env>, key: &K) -> Result<&'t V> {
        let bytes = self.collection.get(txn, bytemuck::bytes_of(key))?;
        Ok(bytes.as_type::<V>())
    }

    /// Whether a value is stored under `key`.
    ///
    /// # Errors
    ///
    /// Propagates backend errors; absence is `Ok(false)`.
    pub fn exists<'env>(&self, txn: &impl ReadableTxn<'env>, key: &K) -> Result<bool> {
        self.collection.exists(txn, bytemuck::bytes_of(key))
    }
}

impl<K, V> std::fmt::Debug for TypedMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedMap").field("collection", &self.collection.name()).finish()
    }
}

/// A collection mapping each `K` to a run of `V`s.
///
/// The stored run may be empty; reading it back yields an empty (non-null)
/// view.
pub struct TypedArrayMap<K, V> {
    collection: BinaryCollection,
    _types: PhantomData<fn() -> (K, V)>,
}

impl<K: Pod, V: Pod> TypedArrayMap<K, V> {
    /// A map backed by the collection `name`, created on first write.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, CollectionOptions::default())
    }

    /// A map backed by the collection `name`, opened with `options`.
    pub fn with_options(name: impl Into<String>, options: CollectionOptions) -> Self {
        let () = <K as ValidLayout>::ASSERT_VALID;
        let () = <V as ValidLayout>::ASSERT_VALID;
        Self { collection: BinaryCollection::with_options(name, options), _types: PhantomData }
    }

    /// The name of the backing collection.
    #[must_use]
    pub fn name(&self) -> &str {
        self.collection.name()
    }

    /// Stores `values` under `key`, replacing any previous run.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`BinaryCollection::put_array`].
    pub fn put(&self, txn: &mut WriteTxn<'_>, key: &K, values: &[V]) -> Result<()> {
        self.collection.put_array(txn, bytemuck::bytes_of(key), values)
    }

    /// Returns a view of the run stored under `key`, valid for as long as `txn`
    /// is borrowed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) when the key is absent.
    ///
    /// # Panics
    ///
    /// Panics if the stored byte length is not a multiple of `size_of::<V>()`.
    pub fn get<'t, 'env: 't>(&self, txn: &'t impl ReadableTxn<'env>, key: &K) -> Result<View<'t, V>> {
        let bytes = self.collection.get(txn, bytemuck::bytes_of(key))?;
        Ok(bytes.cast::<V>())
    }

    /// Whether a run is stored under `key`.
    ///
    /// # Errors
    ///
    /// Propagates backend errors; absence is `Ok(false)`.
    pub fn exists<'env>(&self, txn: &impl ReadableTxn<'env>, key: &K) -> Result<bool> {
        self.collection.exists(txn, bytemuck::bytes_of(key))
    }
}

impl<K, V> std::fmt::Debug for TypedArrayMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedArrayMap").field("collection", &self.collection.name()).finish()
    }
}
