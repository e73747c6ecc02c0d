//! Typed, zero-copy collections over LMDB.
//!
//! LMDB stores untyped byte strings and hands values back as slices into its
//! memory map. This crate layers fixed-layout keys and values on top of that
//! without copying them out of the map:
//!
//! - [`ValidLayout`]: the compile-time rule every stored type must satisfy
//!   ([`Pod`], a multiple of 8 bytes, alignment of at most 8).
//! - [`PaddedValue`]: a zero-filled 8-byte envelope that makes any small
//!   [`Pod`] type satisfy the rule.
//! - [`View`]: a borrowed window onto contiguous typed values, tied to the
//!   transaction it was read through.
//! - [`BinaryCollection`], [`TypedMap`], [`TypedArrayMap`],
//!   [`AutoPaddedMap`] and [`AutoPaddedArrayMap`]: named collections, from raw
//!   bytes up to fully padded typed maps.
//!
//! # Example
//!
//! ```no_run
//! use stowage::{AutoPaddedArrayMap, Environment};
//!
//! # fn main() -> stowage::Result<()> {
//! let env = Environment::open_default("letters.mdb")?;
//! let letters = AutoPaddedArrayMap::<i32, u8>::new("letters");
//!
//! let mut txn = env.write_txn()?;
//! letters.put(&mut txn, 22, b"abc")?;
//! txn.commit()?;
//!
//! let txn = env.read_txn()?;
//! let view = letters.get(&txn, 22)?;
//! assert_eq!(*view.value(1), b'b');
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod collection;
pub mod config;
mod environment;
mod error;
mod layout;
mod map;
mod padded;
mod padded_map;
pub mod selftest;
mod txn;
mod view;

#[cfg(test)]
mod testing;

pub use bytemuck::{Pod, Zeroable};
pub use collection::{BinaryCollection, CollectionOptions};
pub use config::{ConfigError, EnvironmentConfig};
pub use environment::Environment;
pub use error::{Error, Result};
pub use heed::DatabaseFlags;
pub use layout::{is_valid_layout, ValidLayout, LAYOUT_GRANULE};
pub use map::{TypedArrayMap, TypedMap};
pub use padded::PaddedValue;
pub use padded_map::{AutoPaddedArrayMap, AutoPaddedMap};
pub use txn::{ReadTxn, ReadableTxn, WriteTxn};
pub use view::View;
