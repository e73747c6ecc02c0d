//! Untyped named collections.
//!
//! A [`BinaryCollection`] is one LMDB named database seen as raw byte keys and
//! raw byte values. It does not inspect or validate what it stores; layout
//! correctness is the job of the typed maps built on top of it.
//!
//! The database handle is opened inside every operation rather than once up
//! front: in a fresh environment the database does not exist yet, and a
//! read-only transaction cannot create it.

use bytemuck::Pod;
use heed::types::Bytes;
use heed::{Database, DatabaseFlags};
use snafu::{OptionExt, ResultExt};
use tracing::{debug, trace};

use crate::error::{CollectionMissingSnafu, CollectionSnafu, GetSnafu, NotFoundSnafu, PutSnafu, Result};
use crate::txn::{ReadableTxn, WriteTxn};
use crate::view::View;

type RawDatabase = Database<Bytes, Bytes>;

/// How a collection's database is opened.
#[derive(Debug, Clone, Copy)]
pub struct CollectionOptions {
    /// Create the database on first write if it does not exist.
    pub create: bool,
    /// Extra LMDB database flags.
    pub flags: DatabaseFlags,
}

impl CollectionOptions {
    /// Options for a collection that must already exist; writes never create it.
    #[must_use]
    pub fn existing() -> Self {
        Self { create: false, ..Self::default() }
    }

    /// Returns these options with `flags` added.
    #[must_use]
    pub fn with_flags(mut self, flags: DatabaseFlags) -> Self {
        self.flags |= flags;
        self
    }
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self { create: true, flags: DatabaseFlags::empty() }
    }
}

/// A named byte-key/byte-value collection.
#[derive(Debug, Clone)]
pub struct BinaryCollection {
    name: String,
    options: CollectionOptions,
}

impl BinaryCollection {
    /// A collection that is created on first write.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, CollectionOptions::default())
    }

    /// A collection opened with explicit options.
    pub fn with_options(name: impl Into<String>, options: CollectionOptions) -> Self {
        Self { name: name.into(), options }
    }

    /// The collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The options the collection is opened with.
    #[must_use]
    pub fn options(&self) -> &CollectionOptions {
        &self.options
    }

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CollectionMissing`](crate::Error::CollectionMissing) if
    /// the collection does not exist and may not be created, or a backend
    /// error from LMDB.
    pub fn put(&self, txn: &mut WriteTxn<'_>, key: &[u8], value: &[u8]) -> Result<()> {
        let db = self.open_for_write(txn)?;
        trace!(collection = %self.name, key_len = key.len(), value_len = value.len(), "put");
        db.put(txn.raw_mut(), key, value).context(PutSnafu { name: &self.name })
    }

    /// Stores the concatenated bytes of `elements` under `key`.
    ///
    /// Equivalent to [`put`](Self::put) with a flattened buffer, without
    /// building one.
    ///
    /// # Errors
    ///
    /// Same as [`put`](Self::put).
    pub fn put_array<E: Pod>(&self, txn: &mut WriteTxn<'_>, key: &[u8], elements: &[E]) -> Result<()> {
        self.put(txn, key, bytemuck::cast_slice(elements))
    }

    /// Returns a view of the bytes stored under `key`.
    ///
    /// A collection that has never been written to behaves as if it were empty,
    /// as long as the environment has a free collection slot; once
    /// `max_collections` handles are in use, looking it up fails with
    /// [`Error::Collection`](crate::Error::Collection).
    ///
    /// The returned bytes start on an 8-byte boundary only when the key length
    /// is a multiple of 8.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) when the key is
    /// absent, or a backend error from LMDB.
    pub fn get<'t, 'env: 't>(&self, txn: &'t impl ReadableTxn<'env>, key: &[u8]) -> Result<View<'t, u8>> {
        let Some(db) = self.open_for_read(txn)? else {
            return NotFoundSnafu { name: &self.name }.fail();
        };
        trace!(collection = %self.name, key_len = key.len(), "get");
        let value = db.get(txn.raw(), key).context(GetSnafu { name: &self.name })?;
        value.map(View::new).context(NotFoundSnafu { name: &self.name })
    }

    /// Whether a value is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a backend error from LMDB. Absence is `Ok(false)`, never an error.
    pub fn exists<'env>(&self, txn: &impl ReadableTxn<'env>, key: &[u8]) -> Result<bool> {
        let Some(db) = self.open_for_read(txn)? else {
            return Ok(false);
        };
        let value = db.get(txn.raw(), key).context(GetSnafu { name: &self.name })?;
        Ok(value.is_some())
    }

    fn open_for_read<'env>(&self, txn: &impl ReadableTxn<'env>) -> Result<Option<RawDatabase>> {
        let mut options = txn.env().database_options().types::<Bytes, Bytes>();
        options.name(&self.name).flags(self.options.flags);
        options.open(txn.raw()).context(CollectionSnafu { name: &self.name })
    }

    fn open_for_write(&self, txn: &mut WriteTxn<'_>) -> Result<RawDatabase> {
        if !self.options.create {
            return self.open_for_read(&*txn)?.context(CollectionMissingSnafu { name: &self.name });
        }
        if let Some(db) = self.open_for_read(&*txn)? {
            return Ok(db);
        }
        let mut options = txn.env().database_options().types::<Bytes, Bytes>();
        options.name(&self.name).flags(self.options.flags);
        let db = options.create(txn.raw_mut()).context(CollectionSnafu { name: &self.name })?;
        debug!(collection = %self.name, "Created collection");
        Ok(db)
    }
}
