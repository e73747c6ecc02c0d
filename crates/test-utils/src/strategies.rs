//! Proptest strategies for stowage tests.
//!
//! Generators for fixed-layout records, keys, short byte payloads and
//! collection names.
//!
//! # Usage
//!
//! ```no_run
//! use proptest::prelude::*;
//! use stowage_test_utils::strategies;
//!
//! proptest! {
//!     #[test]
//!     fn my_property(samples in strategies::arb_samples()) {
//!         // test invariant with randomly generated records
//!     }
//! }
//! ```

use bytemuck::{Pod, Zeroable};
use proptest::prelude::*;

/// A 24-byte fixed-layout record with no implicit padding.
///
/// Stands in for the kind of telemetry row callers keep in typed maps.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Sample {
    /// Record identifier.
    pub id: u64,
    /// Measured value.
    pub reading: f64,
    /// Arbitrary flag bits.
    pub flags: u32,
    /// Source channel.
    pub channel: u16,
    /// Signal level.
    pub level: u8,
    /// Always zero.
    pub reserved: u8,
}

/// Generates an arbitrary [`Sample`] with a finite reading.
pub fn arb_sample() -> impl Strategy<Value = Sample> {
    (any::<u64>(), -1.0e9f64..1.0e9, any::<u32>(), any::<u16>(), any::<u8>()).prop_map(
        |(id, reading, flags, channel, level)| Sample { id, reading, flags, channel, level, reserved: 0 },
    )
}

/// Generates 0-31 samples.
pub fn arb_samples() -> impl Strategy<Value = Vec<Sample>> {
    proptest::collection::vec(arb_sample(), 0..32)
}

/// Generates 0-63 arbitrary bytes.
pub fn arb_small_bytes() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..64)
}

/// Generates 1-16 distinct `u64` keys.
pub fn arb_distinct_keys() -> impl Strategy<Value = Vec<u64>> {
    proptest::collection::btree_set(any::<u64>(), 1..16).prop_map(|keys| keys.into_iter().collect())
}

/// Generates a collection name of 1-16 characters matching `[a-z][a-z0-9_]{0,15}`.
pub fn arb_collection_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}
