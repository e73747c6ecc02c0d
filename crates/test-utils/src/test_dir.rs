//! Temporary directory management for tests.
//!
//! [`TestDir`] wraps [`tempfile::TempDir`] with a cleaner API for common test patterns.

// Test utilities are expected to panic on failure - that's their purpose
#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A managed temporary directory for tests.
///
/// The directory is automatically cleaned up when this struct is dropped, so it
/// must outlive any environment opened inside it.
///
/// # Example
///
/// ```
/// use stowage_test_utils::TestDir;
///
/// let dir = TestDir::new();
/// let db_path = dir.db_path("test.mdb");
/// assert!(!db_path.exists());
/// ```
pub struct TestDir {
    inner: TempDir,
}

impl TestDir {
    /// Create a new temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let inner = TempDir::new().expect("failed to create temp directory");
        Self { inner }
    }

    /// Returns the path to the temporary directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Join a relative path to the temporary directory.
    #[must_use]
    pub fn join<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.inner.path().join(path)
    }

    /// Path for a single-file environment named `name`.
    ///
    /// Nothing is created; LMDB creates the data file and its `-lock` sibling
    /// when the environment is opened.
    #[must_use]
    pub fn db_path(&self, name: &str) -> PathBuf {
        self.join(name)
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}
