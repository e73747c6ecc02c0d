//! Eight-byte padding envelope for small fixed-layout values.
//!
//! [`PaddedValue`] lets a type that is not a multiple of 8 bytes (a `u8`, an
//! `i32`, a 12-byte record) be stored through the typed collections. The
//! payload lives in the low bytes of `W` 64-bit words; the remaining bytes are
//! zero, so the stored representation is byte-for-byte reproducible.

use std::fmt;
use std::marker::PhantomData;
use std::mem::{align_of, size_of};
use std::ops::{Deref, DerefMut};

use bytemuck::{Pod, Zeroable};

/// A `T` stored in the low bytes of `W` zero-filled 64-bit words.
///
/// The footprint is exactly `8 * W` bytes with 8-byte alignment. `W` must be the
/// smallest word count that fits `T`; the default of 1 covers every payload of up
/// to 8 bytes. Both rules, and `align_of::<T>() <= 8`, are checked at compile
/// time.
///
/// Unlike compiler-inserted struct padding, the unused bytes are real data and
/// stay zero through copies, so a `PaddedValue` can be hashed or compared as raw
/// bytes.
///
/// ```
/// use stowage::PaddedValue;
///
/// let padded = PaddedValue::<u8>::new(b'c');
/// assert_eq!(*padded, b'c');
/// assert_eq!(padded.as_bytes(), &[b'c', 0, 0, 0, 0, 0, 0, 0]);
/// ```
#[derive(Clone, Copy)]
#[repr(C, align(8))]
pub struct PaddedValue<T, const W: usize = 1> {
    words: [u64; W],
    _payload: PhantomData<T>,
}

// SAFETY: the only field with a size is `[u64; W]`, which is zeroable; the
// `PhantomData` is a ZST.
#[allow(unsafe_code)]
unsafe impl<T: Pod, const W: usize> Zeroable for PaddedValue<T, W> {}

// SAFETY: `repr(C)` over `[u64; W]` plus a ZST has no padding, every bit pattern
// is valid, and `T: Pod` makes the type `Copy + 'static`.
#[allow(unsafe_code)]
unsafe impl<T: Pod, const W: usize> Pod for PaddedValue<T, W> {}

impl<T: Pod, const W: usize> PaddedValue<T, W> {
    const LAYOUT_OK: () = {
        assert!(size_of::<T>() <= W * 8, "PaddedValue word count too small for the payload");
        assert!(W * 8 < size_of::<T>() + 8, "PaddedValue word count larger than the payload needs");
        assert!(align_of::<T>() <= 8, "PaddedValue payload alignment exceeds 8 bytes");
    };

    /// Wraps `value`, zero-filling every byte past the payload.
    #[must_use]
    pub fn new(value: T) -> Self {
        let mut padded = Self::zeroed();
        padded.payload_bytes_mut().copy_from_slice(bytemuck::bytes_of(&value));
        padded
    }

    /// An all-zero envelope.
    ///
    /// This is a placement value: it is well defined (the payload reads back as
    /// the all-zero `T`) but carries no meaning until a payload is written.
    #[must_use]
    pub fn zeroed() -> Self {
        let () = Self::LAYOUT_OK;
        Self { words: [0; W], _payload: PhantomData }
    }

    /// Returns the wrapped value.
    #[must_use]
    pub fn get(&self) -> &T {
        let () = Self::LAYOUT_OK;
        bytemuck::from_bytes(&self.as_bytes()[..size_of::<T>()])
    }

    /// Returns the wrapped value mutably. Padding bytes are not reachable.
    pub fn get_mut(&mut self) -> &mut T {
        bytemuck::from_bytes_mut(self.payload_bytes_mut())
    }

    /// Unwraps the value.
    #[must_use]
    pub fn into_inner(self) -> T {
        *self.get()
    }

    /// The full padded footprint, payload first.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    fn payload_bytes_mut(&mut self) -> &mut [u8] {
        let () = Self::LAYOUT_OK;
        &mut bytemuck::cast_slice_mut(&mut self.words)[..size_of::<T>()]
    }
}

impl<T: Pod, const W: usize> Default for PaddedValue<T, W> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<T: Pod, const W: usize> From<T> for PaddedValue<T, W> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Pod, const W: usize> Deref for PaddedValue<T, W> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T: Pod, const W: usize> DerefMut for PaddedValue<T, W> {
    fn deref_mut(&mut self) -> &mut T {
        self.get_mut()
    }
}

impl<T: Pod, const W: usize> PartialEq for PaddedValue<T, W> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<T: Pod, const W: usize> Eq for PaddedValue<T, W> {}

impl<T: Pod + fmt::Debug, const W: usize> fmt::Debug for PaddedValue<T, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PaddedValue").field(self.get()).finish()
    }
}
