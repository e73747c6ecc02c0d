//! End-to-end self-test against a scratch environment.
//!
//! Used by the `stowage-selftest` binary to check a build on a real file
//! system. Each check writes into its own collection of the environment at the
//! given path.

use std::mem::size_of;
use std::path::Path;

use snafu::{ensure, ResultExt, Snafu};
use tracing::info;

use crate::config::EnvironmentConfig;
use crate::environment::Environment;
use crate::padded::PaddedValue;
use crate::padded_map::{AutoPaddedArrayMap, AutoPaddedMap};
use crate::view::View;

/// Self-test failures.
#[derive(Debug, Snafu)]
pub enum SelfTestError {
    /// A store operation failed.
    #[snafu(display("Store operation failed during {stage}: {source}"))]
    Store {
        /// The check that was running.
        stage: &'static str,
        /// The underlying error.
        source: crate::Error,
    },

    /// A check observed the wrong result.
    #[snafu(display("Check failed: {message}"))]
    Check {
        /// What was expected.
        message: String,
    },
}

/// Runs every check against a fresh environment at `path`.
///
/// # Errors
///
/// Returns the first failing check.
pub fn run(path: &Path, config: EnvironmentConfig) -> Result<(), SelfTestError> {
    check_padding()?;

    let env = Environment::open(path, config).context(StoreSnafu { stage: "open" })?;
    check_single_values(&env)?;
    check_arrays(&env)?;

    info!("Self-test completed successfully");
    Ok(())
}

fn check_padding() -> Result<(), SelfTestError> {
    let padded = PaddedValue::<u8>::new(b'c');
    ensure!(size_of::<PaddedValue<u8>>() == 8, CheckSnafu { message: "padded u8 must occupy 8 bytes" });
    ensure!(*padded == b'c', CheckSnafu { message: "padded u8 must read back its payload" });
    ensure!(
        padded.as_bytes()[1..].iter().all(|&b| b == 0),
        CheckSnafu { message: "padding bytes must be zero" }
    );
    info!("Padding checks passed");
    Ok(())
}

fn check_single_values(env: &Environment) -> Result<(), SelfTestError> {
    let map = AutoPaddedMap::<i32, u8>::new("mdb_p_p");

    let mut txn = env.write_txn().context(StoreSnafu { stage: "single put" })?;
    map.put(&mut txn, 123, b'a').context(StoreSnafu { stage: "single put" })?;
    txn.commit().context(StoreSnafu { stage: "single put" })?;

    let txn = env.read_txn().context(StoreSnafu { stage: "single get" })?;
    let value = *map.get(&txn, 123).context(StoreSnafu { stage: "single get" })?;
    ensure!(value == b'a', CheckSnafu { message: format!("key 123 should hold 'a', got {value:#04x}") });
    ensure!(
        map.exists(&txn, 123).context(StoreSnafu { stage: "single exists" })?,
        CheckSnafu { message: "key 123 should exist" }
    );

    match map.get(&txn, 124) {
        Err(err) if err.is_not_found() => {},
        Err(err) => return Err(err).context(StoreSnafu { stage: "single get" }),
        Ok(_) => return CheckSnafu { message: "key 124 should be absent" }.fail(),
    }
    ensure!(
        !map.exists(&txn, 124).context(StoreSnafu { stage: "single exists" })?,
        CheckSnafu { message: "key 124 should not exist" }
    );

    info!("Single value checks passed");
    Ok(())
}

fn check_arrays(env: &Environment) -> Result<(), SelfTestError> {
    let map = AutoPaddedArrayMap::<i32, u8>::new("mdb_p_parr");

    let mut txn = env.write_txn().context(StoreSnafu { stage: "array put" })?;
    map.put(&mut txn, 22, [b'a', b'b', b'c']).context(StoreSnafu { stage: "array put" })?;
    txn.commit().context(StoreSnafu { stage: "array put" })?;

    let txn = env.read_txn().context(StoreSnafu { stage: "array get" })?;
    let view = map.get(&txn, 22).context(StoreSnafu { stage: "array get" })?;
    ensure!(view.len() == 3, CheckSnafu { message: format!("key 22 should hold 3 elements, got {}", view.len()) });
    ensure!(*view.value(1) == b'b', CheckSnafu { message: "element 1 of key 22 should be 'b'" });

    let range = view.as_ptr_range();
    // SAFETY: the range comes from `view`, which is still borrowed from `txn`.
    #[allow(unsafe_code)]
    let rebuilt: View<'_, PaddedValue<u8>> = unsafe { View::from_ptr_range(range.start, range.end) };
    ensure!(rebuilt.len() == view.len(), CheckSnafu { message: "rebuilt view length differs" });
    ensure!(rebuilt.as_ptr_range() == range, CheckSnafu { message: "rebuilt view bounds differ" });

    info!("Array checks passed");
    Ok(())
}
