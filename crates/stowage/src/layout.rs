//! Compile-time layout validation for stored keys and values.
//!
//! LMDB hands back value bytes at whatever offset they landed on inside a
//! page. A leaf node is an 8-byte header followed by the key and the value, and
//! nodes are packed downwards from the end of the page. When every key and every
//! value is a multiple of 8 bytes long, every node, and therefore every value,
//! starts on an 8-byte boundary. That is the property that lets [`View`] hand out
//! `&u64`-aligned references straight into the memory map.
//!
//! [`View`]: crate::view::View

use std::mem::{align_of, size_of};

use bytemuck::Pod;

/// Size granularity, in bytes, that every stored key and value must respect.
pub const LAYOUT_GRANULE: usize = 8;

/// Returns whether `T` may be stored directly as a key or value.
///
/// `T` is already known to be [`Pod`] (no padding, no pointers, every bit
/// pattern valid); the remaining requirements are the size granule and an
/// alignment the store can honour.
#[must_use]
pub const fn is_valid_layout<T: Pod>() -> bool {
    size_of::<T>() % LAYOUT_GRANULE == 0 && align_of::<T>() <= LAYOUT_GRANULE
}

/// Marker for types that can be blitted into a collection verbatim.
///
/// Implemented for every [`Pod`] type. The size rule is carried by
/// [`ValidLayout::ASSERT_VALID`]: typed collections evaluate it when they are
/// instantiated, so a type of the wrong size is rejected by the compiler rather
/// than at runtime.
///
/// Wrap smaller types in [`PaddedValue`](crate::padded::PaddedValue), or use the
/// auto-padded maps, to satisfy it.
pub trait ValidLayout: Pod {
    /// Evaluating this constant fails the build when `Self` is not a multiple of
    /// [`LAYOUT_GRANULE`] bytes or needs more than 8-byte alignment.
    const ASSERT_VALID: ();
}

impl<T: Pod> ValidLayout for T {
    const ASSERT_VALID: () = assert!(
        is_valid_layout::<T>(),
        "stored keys and values must be a multiple of 8 bytes with alignment of at most 8; wrap the type in PaddedValue"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::padded::PaddedValue;

    #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
    #[repr(C)]
    struct Triple {
        a: u32,
        b: u32,
        c: u32,
    }

    const _: () = assert!(!is_valid_layout::<u8>());
    const _: () = assert!(is_valid_layout::<f64>());
    const _: () = assert!(is_valid_layout::<PaddedValue<u8>>());

    #[test]
    fn test_primitive_layouts() {
        assert!(is_valid_layout::<u64>());
        assert!(is_valid_layout::<i64>());
        assert!(is_valid_layout::<[u8; 16]>());
        assert!(!is_valid_layout::<i32>());
        assert!(!is_valid_layout::<[u8; 7]>());
    }

    #[test]
    fn test_struct_layouts() {
        assert_eq!(size_of::<Triple>(), 12);
        assert!(!is_valid_layout::<Triple>());
        assert!(is_valid_layout::<PaddedValue<Triple, 2>>());
    }

    #[test]
    fn test_assert_valid_evaluates_for_valid_types() {
        let () = <u64 as ValidLayout>::ASSERT_VALID;
        let () = <[u32; 4] as ValidLayout>::ASSERT_VALID;
    }
}
