//! The LMDB environment.
//!
//! An [`Environment`] is a single database file (no sub-directory) holding up
//! to `max_collections` named collections. Cloning the handle is cheap; the
//! file is closed when the last clone is dropped.

use std::path::{Path, PathBuf};

use heed::{Env, EnvFlags, EnvOpenOptions};
use snafu::ResultExt;
use tracing::debug;

use crate::config::EnvironmentConfig;
use crate::error::{ConfigSnafu, OpenSnafu, Result, TransactionSnafu};
use crate::txn::{ReadTxn, WriteTxn};

/// An open LMDB environment.
#[derive(Clone)]
pub struct Environment {
    env: Env,
    path: PathBuf,
    config: EnvironmentConfig,
}

impl Environment {
    /// Opens the environment stored in the file at `path`, creating it if it
    /// does not exist.
    ///
    /// The map size is rounded up to a multiple of
    /// [`PAGE_GRANULARITY`](crate::config::PAGE_GRANULARITY).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if `config` fails
    /// validation, or [`Error::Open`](crate::Error::Open) if LMDB cannot open
    /// the file.
    pub fn open(path: impl AsRef<Path>, config: EnvironmentConfig) -> Result<Self> {
        config.validate().context(ConfigSnafu)?;

        let path = anchored(path.as_ref());
        let map_size = config.rounded_map_size();

        let mut options = EnvOpenOptions::new();
        options.map_size(map_size).max_dbs(config.max_collections);

        // SAFETY: the environment file is owned by this handle for the life of
        // the process; nothing else maps or truncates it while it is open.
        #[allow(unsafe_code)]
        let env = unsafe {
            options.flags(EnvFlags::NO_SUB_DIR);
            options.open(&path)
        }
        .context(OpenSnafu { path: path.display().to_string() })?;

        debug!(
            path = %path.display(),
            map_size,
            max_collections = config.max_collections,
            "Opened environment"
        );

        Ok(Self { env, path, config })
    }

    /// Opens the environment at `path` with the default configuration.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open).
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(path, EnvironmentConfig::default())
    }

    /// The path of the environment file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The configuration the environment was opened with.
    #[must_use]
    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// Begins a read-only transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transaction`](crate::Error::Transaction) if LMDB cannot
    /// start the transaction (for example when the reader table is full).
    pub fn read_txn(&self) -> Result<ReadTxn<'_>> {
        let inner = self.env.read_txn().context(TransactionSnafu)?;
        Ok(ReadTxn::new(&self.env, inner))
    }

    /// Begins a read-write transaction, blocking while another writer is live.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transaction`](crate::Error::Transaction) if LMDB cannot
    /// start the transaction.
    pub fn write_txn(&self) -> Result<WriteTxn<'_>> {
        let inner = self.env.write_txn().context(TransactionSnafu)?;
        Ok(WriteTxn::new(&self.env, inner))
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment").field("path", &self.path).field("config", &self.config).finish()
    }
}

// A bare file name has an empty parent, which heed cannot resolve.
fn anchored(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new(".").join(path),
        _ => path.to_path_buf(),
    }
}
