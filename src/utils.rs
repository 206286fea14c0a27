//! This module provides a set of shared, low-level utility functions used
//! throughout the transduce core.
//!
//! Its primary responsibilities include:
//! 1.  Viewing typed scalar slices as the raw bytes stream segments are made of.
//! 2.  Reading and writing single scalars out of unaligned byte payloads, so that
//!     `Value`s can point at arbitrary offsets of a stream segment.
//!
//! All of it is routed through `bytemuck`; the crate contains no `unsafe`.

use bytemuck::Pod;

use crate::error::TransduceError;

//==================================================================================
// 1. Slice Conversions
//==================================================================================

/// Reinterprets a typed slice as its underlying bytes. Zero-copy.
pub fn typed_slice_as_bytes<T: Pod>(data: &[T]) -> &[u8] {
    bytemuck::cast_slice(data)
}

//==================================================================================
// 2. Single-Scalar Access
//==================================================================================

/// Reads one `T` from a byte payload that may sit at any alignment.
pub fn read_scalar<T: Pod>(bytes: &[u8]) -> Result<T, TransduceError> {
    bytemuck::try_pod_read_unaligned(bytes).map_err(TransduceError::from)
}

/// Writes `value` into the front of `dest`.
///
/// # Errors
/// `BufferMismatch` if `dest` is not exactly `size_of::<T>()` bytes long.
pub fn write_scalar<T: Pod>(value: T, dest: &mut [u8]) -> Result<(), TransduceError> {
    let src = bytemuck::bytes_of(&value);
    if dest.len() != src.len() {
        return Err(TransduceError::BufferMismatch(src.len(), dest.len()));
    }
    dest.copy_from_slice(src);
    Ok(())
}
