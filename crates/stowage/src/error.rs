//! Error types for stowage operations.
//!
//! Every backend failure reported by LMDB is wrapped with the operation and,
//! where there is one, the collection it happened in, then propagated unchanged.
//! A missing key is its own variant so callers can tell it apart from real
//! failures (see [`Error::is_not_found`]).

use snafu::Snafu;

use crate::config::ConfigError;

/// Result type alias for stowage operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while opening an environment or accessing a collection.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// The environment configuration failed validation.
    #[snafu(display("Invalid environment configuration: {source}"))]
    Config {
        /// The validation failure.
        source: ConfigError,
    },

    /// The environment file could not be opened or created.
    #[snafu(display("Failed to open environment at {path}: {source}"))]
    Open {
        /// Path of the environment file.
        path: String,
        /// The underlying LMDB error.
        source: heed::Error,
    },

    /// A transaction could not be started.
    #[snafu(display("Failed to begin transaction: {source}"))]
    Transaction {
        /// The underlying LMDB error.
        source: heed::Error,
    },

    /// A write transaction could not be committed.
    #[snafu(display("Failed to commit transaction: {source}"))]
    Commit {
        /// The underlying LMDB error.
        source: heed::Error,
    },

    /// A collection handle could not be opened or created.
    #[snafu(display("Failed to open collection {name}: {source}"))]
    Collection {
        /// Collection name.
        name: String,
        /// The underlying LMDB error.
        source: heed::Error,
    },

    /// A write targeted a collection that does not exist and may not be created.
    #[snafu(display("Collection {name} does not exist"))]
    CollectionMissing {
        /// Collection name.
        name: String,
    },

    /// The requested key is absent from the collection.
    #[snafu(display("Key not found in collection {name}"))]
    NotFound {
        /// Collection name.
        name: String,
    },

    /// Writing a key/value pair failed.
    #[snafu(display("Put into collection {name} failed: {source}"))]
    Put {
        /// Collection name.
        name: String,
        /// The underlying LMDB error.
        source: heed::Error,
    },

    /// Looking up a key failed for a reason other than absence.
    #[snafu(display("Get from collection {name} failed: {source}"))]
    Get {
        /// Collection name.
        name: String,
        /// The underlying LMDB error.
        source: heed::Error,
    },
}

impl Error {
    /// Whether this error reports an absent key.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
