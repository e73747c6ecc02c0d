//! Typed maps that accept any small fixed-layout key and value.
//!
//! These wrap [`TypedMap`] and [`TypedArrayMap`] with [`PaddedValue`] on both
//! sides, so `K` and `V` only need to be [`Pod`] and no wider than `8 * KW` and
//! `8 * VW` bytes respectively. Padding is applied unconditionally; a type that
//! is already a multiple of 8 bytes simply gets no extra bytes.

use std::borrow::Borrow;

use bytemuck::Pod;

use crate::collection::CollectionOptions;
use crate::error::Result;
use crate::map::{TypedArrayMap, TypedMap};
use crate::padded::PaddedValue;
use crate::txn::{ReadableTxn, WriteTxn};
use crate::view::View;

/// A [`TypedMap`] over padded keys and values.
///
/// `KW` and `VW` are the word counts of the key and value envelopes. The
/// default of 1 covers payloads of up to 8 bytes; a wider payload must name
/// its word count explicitly, e.g. `AutoPaddedMap<u32, [u32; 3], 1, 2>`, or
/// the map fails to build.
///
/// ```no_run
/// use stowage::{AutoPaddedMap, Environment};
///
/// # fn main() -> stowage::Result<()> {
/// let env = Environment::open_default("grades.mdb")?;
/// let grades = AutoPaddedMap::<i32, u8>::new("grades");
///
/// let mut txn = env.write_txn()?;
/// grades.put(&mut txn, 123, b'a')?;
/// txn.commit()?;
///
/// let txn = env.read_txn()?;
/// assert_eq!(*grades.get(&txn, 123)?, b'a');
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AutoPaddedMap<K, V, const KW: usize = 1, const VW: usize = 1> {
    inner: TypedMap<PaddedValue<K, KW>, PaddedValue<V, VW>>,
}

impl<K: Pod, V: Pod, const KW: usize, const VW: usize> AutoPaddedMap<K, V, KW, VW> {
    /// A map backed by the collection `name`, created on first write.
    pub fn new(name: impl Into<String>) -> Self {
        Self { inner: TypedMap::new(name) }
    }

    /// A map backed by the collection `name`, opened with `options`.
    pub fn with_options(name: impl Into<String>, options: CollectionOptions) -> Self {
        Self { inner: TypedMap::with_options(name, options) }
    }

    /// The name of the backing collection.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`TypedMap::put`].
    pub fn put(&self, txn: &mut WriteTxn<'_>, key: K, value: V) -> Result<()> {
        self.inner.put(txn, &PaddedValue::new(key), &PaddedValue::new(value))
    }

    /// Returns a reference to the unwrapped value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) when the key is absent.
    pub fn get<'t, 'env: 't>(&self, txn: &'t impl ReadableTxn<'env>, key: K) -> Result<&'t V> {
        let padded = self.inner.get(txn, &PaddedValue::new(key))?;
        Ok(padded.get())
    }

    /// Whether a value is stored under `key`.
    ///
    /// # Errors
    ///
    /// Propagates backend errors; absence is `Ok(false)`.
    pub fn exists<'env>(&self, txn: &impl ReadableTxn<'env>, key: K) -> Result<bool> {
        self.inner.exists(txn, &PaddedValue::new(key))
    }
}

/// A [`TypedArrayMap`] over padded keys and padded elements.
///
/// [`get`](Self::get) returns the elements still wrapped; use
/// [`View::values`] or [`View::value`] to reach the payloads without copying.
///
/// As with [`AutoPaddedMap`], payloads wider than 8 bytes need an explicit
/// `KW` or `VW` word count.
#[derive(Debug)]
pub struct AutoPaddedArrayMap<K, V, const KW: usize = 1, const VW: usize = 1> {
    inner: TypedArrayMap<PaddedValue<K, KW>, PaddedValue<V, VW>>,
}

impl<K: Pod, V: Pod, const KW: usize, const VW: usize> AutoPaddedArrayMap<K, V, KW, VW> {
    /// A map backed by the collection `name`, created on first write.
    pub fn new(name: impl Into<String>) -> Self {
        Self { inner: TypedArrayMap::new(name) }
    }

    /// A map backed by the collection `name`, opened with `options`.
    pub fn with_options(name: impl Into<String>, options: CollectionOptions) -> Self {
        Self { inner: TypedArrayMap::with_options(name, options) }
    }

    /// The name of the backing collection.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Pads every element of `values` and stores the run under `key`.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`TypedArrayMap::put`].
    pub fn put<I>(&self, txn: &mut WriteTxn<'_>, key: K, values: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Borrow<V>,
    {
        let padded: Vec<PaddedValue<V, VW>> = values.into_iter().map(|v| PaddedValue::new(*v.borrow())).collect();
        self.inner.put(txn, &PaddedValue::new(key), &padded)
    }

    /// Returns a view of the padded run stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) when the key is absent.
    pub fn get<'t, 'env: 't>(&self, txn: &'t impl ReadableTxn<'env>, key: K) -> Result<View<'t, PaddedValue<V, VW>>> {
        self.inner.get(txn, &PaddedValue::new(key))
    }

    /// Whether a run is stored under `key`.
    ///
    /// # Errors
    ///
    /// Propagates backend errors; absence is `Ok(false)`.
    pub fn exists<'env>(&self, txn: &impl ReadableTxn<'env>, key: K) -> Result<bool> {
        self.inner.exists(txn, &PaddedValue::new(key))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use bytemuck::{Pod, Zeroable};

    use super::*;
    use crate::testing::open_env;

    #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Rgb {
        r: u8,
        g: u8,
        b: u8,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Triple {
        a: u32,
        b: u32,
        c: u32,
    }

    #[test]
    fn test_single_value_scenario() {
        let (_dir, env) = open_env();
        let map = AutoPaddedMap::<i32, u8>::new("mdb_p_p");

        let mut txn = env.write_txn().expect("begin write");
        map.put(&mut txn, 123, b'a').expect("put");
        txn.commit().expect("commit");

        let txn = env.read_txn().expect("begin read");
        assert_eq!(*map.get(&txn, 123).expect("get"), b'a');
        assert!(map.exists(&txn, 123).expect("exists"));
        assert!(!map.exists(&txn, 124).expect("exists"));
        assert!(map.get(&txn, 124).unwrap_err().is_not_found());
    }

    #[test]
    fn test_array_scenario() {
        let (_dir, env) = open_env();
        let map = AutoPaddedArrayMap::<i32, u8>::new("mdb_p_parr");

        let mut txn = env.write_txn().expect("begin write");
        map.put(&mut txn, 22, [b'a', b'b', b'c']).expect("put");
        txn.commit().expect("commit");

        let txn = env.read_txn().expect("begin read");
        let view = map.get(&txn, 22).expect("get");
        assert_eq!(view.len(), 3);
        assert_eq!(*view[1], b'b');
        assert_eq!(view.values().copied().collect::<Vec<_>>(), b"abc");
        assert_eq!(view.as_bytes().len(), 24);
    }

    #[test]
    fn test_stored_padding_is_zero() {
        let (_dir, env) = open_env();
        let map = AutoPaddedArrayMap::<u16, Rgb>::new("colours");

        let mut txn = env.write_txn().expect("begin write");
        let colours = vec![Rgb { r: 1, g: 2, b: 3 }, Rgb { r: 255, g: 254, b: 253 }];
        map.put(&mut txn, 7, &colours).expect("put");
        txn.commit().expect("commit");

        let txn = env.read_txn().expect("begin read");
        let view = map.get(&txn, 7).expect("get");
        assert_eq!(view.as_bytes(), &[1, 2, 3, 0, 0, 0, 0, 0, 255, 254, 253, 0, 0, 0, 0, 0]);
        assert_eq!(*view.value(1), Rgb { r: 255, g: 254, b: 253 });
    }

    #[test]
    fn test_multi_word_payload() {
        let (_dir, env) = open_env();
        let map = AutoPaddedMap::<u32, Triple, 1, 2>::new("triples");

        let mut txn = env.write_txn().expect("begin write");
        map.put(&mut txn, 1, Triple { a: 10, b: 20, c: 30 }).expect("put");
        txn.commit().expect("commit");

        let txn = env.read_txn().expect("begin read");
        assert_eq!(*map.get(&txn, 1).expect("get"), Triple { a: 10, b: 20, c: 30 });
    }

    #[test]
    fn test_already_aligned_types_pass_through() {
        let (_dir, env) = open_env();
        let map = AutoPaddedMap::<u64, f64>::new("plain");

        let mut txn = env.write_txn().expect("begin write");
        map.put(&mut txn, u64::MAX, 0.25).expect("put");
        txn.commit().expect("commit");

        let txn = env.read_txn().expect("begin read");
        assert_eq!(*map.get(&txn, u64::MAX).expect("get"), 0.25);
    }

    #[test]
    fn test_padded_keys_do_not_collide() {
        let (_dir, env) = open_env();
        let map = AutoPaddedMap::<u8, u8>::new("bytes");

        let mut txn = env.write_txn().expect("begin write");
        for key in 0..=u8::MAX {
            map.put(&mut txn, key, key.wrapping_mul(7)).expect("put");
        }
        txn.commit().expect("commit");

        let txn = env.read_txn().expect("begin read");
        for key in 0..=u8::MAX {
            assert_eq!(*map.get(&txn, key).expect("get"), key.wrapping_mul(7));
        }
    }

    #[test]
    fn test_view_rebuilt_from_pointer_range() {
        let (_dir, env) = open_env();
        let map = AutoPaddedArrayMap::<i32, u8>::new("ranges");

        let mut txn = env.write_txn().expect("begin write");
        map.put(&mut txn, 22, b"abc").expect("put");
        txn.commit().expect("commit");

        let txn = env.read_txn().expect("begin read");
        let original = map.get(&txn, 22).expect("get");
        let range = original.as_ptr_range();
        #[allow(unsafe_code)]
        // SAFETY: the range was taken from a live view over the same transaction.
        let rebuilt: View<'_, PaddedValue<u8>> = unsafe { View::from_ptr_range(range.start, range.end) };
        assert_eq!(rebuilt.len(), original.len());
        assert_eq!(rebuilt.as_ptr_range(), range);
    }

    #[test]
    fn test_names() {
        assert_eq!(AutoPaddedMap::<i32, u8>::new("single").name(), "single");
        assert_eq!(AutoPaddedArrayMap::<i32, u8>::new("array").name(), "array");
    }
}
