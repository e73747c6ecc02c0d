//! Transaction handles.
//!
//! [`ReadTxn`] and [`WriteTxn`] wrap heed's transactions together with the
//! environment that issued them, which is what lets collections open their
//! database handles lazily inside each transaction.
//!
//! Every view or typed reference handed out by a collection borrows the
//! transaction it was read through. Committing or aborting consumes the
//! transaction, so the borrow checker rejects any use of such a reference after
//! the transaction has ended.

use heed::{Env, RoTxn, RwTxn};
use snafu::ResultExt;

use crate::error::{CommitSnafu, Result};

mod sealed {
    pub trait Sealed {}
}

/// A transaction that can serve reads: either a [`ReadTxn`] or a [`WriteTxn`].
///
/// Reads through a write transaction observe that transaction's own
/// uncommitted writes.
pub trait ReadableTxn<'env>: sealed::Sealed {
    /// The environment this transaction belongs to.
    fn env(&self) -> &'env Env;

    /// The underlying read transaction.
    fn raw(&self) -> &RoTxn<'env>;
}

/// A read-only snapshot of the environment.
///
/// Any number of read transactions may be live at once, alongside one writer.
/// Dropping the handle ends the snapshot.
pub struct ReadTxn<'env> {
    env: &'env Env,
    inner: RoTxn<'env>,
}

impl<'env> ReadTxn<'env> {
    pub(crate) fn new(env: &'env Env, inner: RoTxn<'env>) -> Self {
        Self { env, inner }
    }
}

impl sealed::Sealed for ReadTxn<'_> {}

impl<'env> ReadableTxn<'env> for ReadTxn<'env> {
    fn env(&self) -> &'env Env {
        self.env
    }

    fn raw(&self) -> &RoTxn<'env> {
        &self.inner
    }
}

/// A read-write transaction.
///
/// LMDB allows a single live writer per environment; beginning a second one
/// blocks until the first ends. Dropping the handle without calling
/// [`WriteTxn::commit`] aborts it.
pub struct WriteTxn<'env> {
    env: &'env Env,
    inner: RwTxn<'env>,
}

impl<'env> WriteTxn<'env> {
    pub(crate) fn new(env: &'env Env, inner: RwTxn<'env>) -> Self {
        Self { env, inner }
    }

    pub(crate) fn raw_mut(&mut self) -> &mut RwTxn<'env> {
        &mut self.inner
    }

    /// Commits every write made through this transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Commit`](crate::Error::Commit) if LMDB fails to commit
    /// (for example when the map is full).
    pub fn commit(self) -> Result<()> {
        self.inner.commit().context(CommitSnafu)
    }

    /// Discards every write made through this transaction.
    pub fn abort(self) {
        self.inner.abort();
    }
}

impl sealed::Sealed for WriteTxn<'_> {}

impl<'env> ReadableTxn<'env> for WriteTxn<'env> {
    fn env(&self) -> &'env Env {
        self.env
    }

    fn raw(&self) -> &RoTxn<'env> {
        &self.inner
    }
}
