//! Zero-copy typed views over store memory.
//!
//! A [`View`] is a read-only window onto `len()` contiguous `T`s that live in
//! memory the view does not own: usually an LMDB page, borrowed for as long as
//! the transaction that produced it. The lifetime parameter ties the two
//! together, so a view cannot outlive its transaction.
//!
//! Size and alignment mismatches found while reinterpreting bytes are defects
//! (the caller asked for a different type than the one that was stored) and
//! panic at the point of detection.

use std::any::type_name;
use std::fmt;
use std::mem::size_of;
use std::ops::{Index, Range};
use std::ptr;
use std::slice;

use bytemuck::Pod;

use crate::padded::PaddedValue;

/// A read-only, non-owning view of contiguous `T`s.
///
/// The null view ([`View::null`]) has no backing memory at all and reports a
/// length of zero, so absence and emptiness can be iterated the same way.
pub struct View<'a, T> {
    items: Option<&'a [T]>,
}

impl<'a, T> View<'a, T> {
    /// Creates a view over an existing slice.
    #[must_use]
    pub const fn new(items: &'a [T]) -> Self {
        Self { items: Some(items) }
    }

    /// The null view: no data, zero length.
    #[must_use]
    pub const fn null() -> Self {
        Self { items: None }
    }

    /// Creates a view from a pointer and an element count.
    ///
    /// A null `ptr` with `count == 0` yields the null view.
    ///
    /// # Safety
    ///
    /// Unless it is null, `ptr` must satisfy the requirements of
    /// [`slice::from_raw_parts`] for `count` elements and `'a`.
    ///
    /// # Panics
    ///
    /// Panics if `ptr` is null and `count` is not zero.
    #[allow(unsafe_code)]
    pub unsafe fn from_raw_parts(ptr: *const T, count: usize) -> Self {
        if ptr.is_null() {
            assert!(count == 0, "null view pointer with non-zero count {count}");
            return Self::null();
        }
        // SAFETY: upheld by the caller.
        Self::new(unsafe { slice::from_raw_parts(ptr, count) })
    }

    /// Creates a view from a `begin..end` pointer pair, `end` exclusive.
    ///
    /// # Safety
    ///
    /// Both pointers must belong to the same allocation and the range must
    /// satisfy [`View::from_raw_parts`]. `T` must not be zero-sized.
    ///
    /// # Panics
    ///
    /// Panics if `end` precedes `begin`.
    #[allow(unsafe_code)]
    pub unsafe fn from_ptr_range(begin: *const T, end: *const T) -> Self {
        assert!(end >= begin, "view end pointer precedes begin pointer");
        if begin.is_null() {
            return Self::null();
        }
        // SAFETY: same allocation, `end >= begin`; upheld by the caller.
        let count = unsafe { end.offset_from(begin) } as usize;
        // SAFETY: upheld by the caller.
        unsafe { Self::from_raw_parts(begin, count) }
    }

    /// Number of `T` elements (not bytes).
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether the view has no elements. True for the null view.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this is the null view.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.items.is_none()
    }

    /// The viewed elements.
    #[must_use]
    pub fn as_slice(&self) -> &'a [T] {
        self.items.unwrap_or(&[])
    }

    /// `begin..end` pointers of the viewed elements; `null..null` for the null view.
    #[must_use]
    pub fn as_ptr_range(&self) -> Range<*const T> {
        match self.items {
            Some(items) => items.as_ptr_range(),
            None => ptr::null()..ptr::null(),
        }
    }

    /// Element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    pub fn get(&self, index: usize) -> &'a T {
        let items = self.as_slice();
        assert!(index < items.len(), "view index {index} out of bounds (len {})", items.len());
        &items[index]
    }

    /// Element at `index`, or `None` when out of bounds.
    #[must_use]
    pub fn try_get(&self, index: usize) -> Option<&'a T> {
        self.as_slice().get(index)
    }

    /// A narrower view over `count` elements starting at `offset`, sharing the
    /// same memory.
    ///
    /// # Panics
    ///
    /// Panics if `offset + count` exceeds `self.len()`.
    #[must_use]
    pub fn sub_view(&self, offset: usize, count: usize) -> Self {
        let items = self.as_slice();
        let end = offset.checked_add(count).filter(|&end| end <= items.len());
        let Some(end) = end else {
            panic!("sub-view {offset}+{count} exceeds view length {}", items.len());
        };
        if self.is_null() {
            return Self::null();
        }
        Self::new(&items[offset..end])
    }

    /// Iterates the elements by reference.
    pub fn iter(&self) -> slice::Iter<'a, T> {
        self.as_slice().iter()
    }

    /// Copies the elements out of store memory.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.as_slice().to_vec()
    }
}

impl<'a, T: Pod> View<'a, T> {
    /// Reinterprets raw store bytes as a view of `T`.
    ///
    /// # Panics
    ///
    /// Panics if the length is not a multiple of `size_of::<T>()` or the bytes
    /// are not aligned for `T`.
    #[must_use]
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        match bytemuck::try_cast_slice(bytes) {
            Ok(items) => Self::new(items),
            Err(err) => panic!(
                "{} bytes at {:p} cannot be viewed as [{}]: {err:?}",
                bytes.len(),
                bytes.as_ptr(),
                type_name::<T>()
            ),
        }
    }

    /// The viewed elements as raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.as_slice())
    }

    /// Reinterprets the whole view as exactly one `U`.
    ///
    /// # Panics
    ///
    /// Panics unless `size_of::<U>() == size_of::<T>() * self.len()` and the
    /// data is aligned for `U`.
    #[must_use]
    pub fn as_type<U: Pod>(&self) -> &'a U {
        let bytes = self.as_bytes();
        assert!(
            bytes.len() == size_of::<U>(),
            "view of {} bytes cannot be read as {} ({} bytes)",
            bytes.len(),
            type_name::<U>(),
            size_of::<U>()
        );
        match bytemuck::try_from_bytes(bytes) {
            Ok(value) => value,
            Err(err) => panic!("view at {:p} cannot be read as {}: {err:?}", bytes.as_ptr(), type_name::<U>()),
        }
    }

    /// Reinterprets the view as elements of type `U` over the same bytes.
    ///
    /// The result has `self.len() * size_of::<T>() / size_of::<U>()` elements.
    /// The null view casts to the null view.
    ///
    /// # Panics
    ///
    /// Panics if the byte length is not a multiple of `size_of::<U>()` or the
    /// data is not aligned for `U`.
    #[must_use]
    pub fn cast<U: Pod>(&self) -> View<'a, U> {
        if self.is_null() {
            return View::null();
        }
        View::from_bytes(self.as_bytes())
    }
}

impl<'a, T: Pod, const W: usize> View<'a, PaddedValue<T, W>> {
    /// Iterates the unwrapped payloads without copying them out of store memory.
    pub fn values(&self) -> impl Iterator<Item = &'a T> + 'a {
        self.as_slice().iter().map(|padded| padded.get())
    }

    /// The unwrapped payload at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    pub fn value(&self, index: usize) -> &'a T {
        self.get(index).get()
    }
}

impl<T> Clone for View<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for View<'_, T> {}

impl<T> Default for View<'_, T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<'a, T> From<&'a [T]> for View<'a, T> {
    fn from(items: &'a [T]) -> Self {
        Self::new(items)
    }
}

impl<T> Index<usize> for View<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        self.get(index)
    }
}

impl<'a, T> IntoIterator for View<'a, T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &View<'a, T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for View<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.items {
            Some(items) => f.debug_list().entries(items).finish(),
            None => f.write_str("View(null)"),
        }
    }
}
