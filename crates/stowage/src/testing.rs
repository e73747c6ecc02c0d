//! Shared fixtures for unit tests.

use stowage_test_utils::TestDir;

use crate::config::EnvironmentConfig;
use crate::environment::Environment;

/// A small map keeps test environments cheap to create.
pub(crate) fn test_config() -> EnvironmentConfig {
    EnvironmentConfig { map_size: 16 * 1024 * 1024, max_collections: 8 }
}

/// Opens a fresh environment inside a temporary directory.
///
/// The directory must outlive the environment.
#[allow(clippy::expect_used)]
pub(crate) fn open_env() -> (TestDir, Environment) {
    let dir = TestDir::new();
    let env = Environment::open(dir.db_path("test.mdb"), test_config()).expect("open test environment");
    (dir, env)
}
