//! Shared test utilities for the stowage crates.
//!
//! - [`TestDir`] - Managed temporary directory with path helpers
//! - [`strategies`] - Proptest generators for fixed-layout records, keys and
//!   collection names

#![deny(unsafe_code)]

mod test_dir;
pub use test_dir::TestDir;

pub mod strategies;
pub use strategies::Sample;
