//! The tagged, ownership-aware datum that flows through every pipeline.
//!
//! A `Value` is a closed sum type: one variant per `TypeTag`, each carrying a
//! `Payload` of exactly `element_size` bytes. The payload is either
//!
//! - **borrowed**: a view into a stream segment or caller data, never released
//!   by the holder, or
//! - **owned**: an `OwnedBlock` that remembers the allocator it came from and
//!   hands the block back exactly once, on `release()` or on drop.
//!
//! Borrowed payloads carry no allocator, so releasing one is inert. Because
//! `release` consumes the value, a double release does not compile.

use std::fmt;

use crate::error::TransduceError;
use crate::memory::{Allocator, Block};
use crate::types::{Scalar, TypeTag};
use crate::utils::{read_scalar, write_scalar};

//==================================================================================
// 1. Payload & Ownership
//==================================================================================

/// Payload memory allocated for a value; returned to `allocator` when dropped.
pub struct OwnedBlock<'a> {
    // Only `None` during drop.
    block: Option<Block>,
    allocator: &'a dyn Allocator,
}

impl<'a> OwnedBlock<'a> {
    fn new(block: Block, allocator: &'a dyn Allocator) -> Self {
        Self {
            block: Some(block),
            allocator,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        self.block.as_deref().unwrap_or_default()
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        self.block.as_deref_mut().unwrap_or_default()
    }
}

impl Drop for OwnedBlock<'_> {
    fn drop(&mut self) {
        if let Some(block) = self.block.take() {
            self.allocator.release(block);
        }
    }
}

impl fmt::Debug for OwnedBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OwnedBlock").field(&self.bytes()).finish()
    }
}

/// Where a value's bytes live.
#[derive(Debug)]
pub enum Payload<'a> {
    Borrowed(&'a [u8]),
    Owned(OwnedBlock<'a>),
}

impl Payload<'_> {
    pub fn bytes(&self) -> &[u8] {
        match self {
            Payload::Borrowed(bytes) => bytes,
            Payload::Owned(block) => block.bytes(),
        }
    }
}

//==================================================================================
// 2. Value
//==================================================================================

#[derive(Debug)]
pub enum Value<'a> {
    /// The absent value: no payload, no allocator.
    Null,
    Float(Payload<'a>),
    Double(Payload<'a>),
}

impl<'a> Value<'a> {
    /// The sentinel absent value, used as the "no result" marker.
    pub const fn null() -> Self {
        Value::Null
    }

    /// Allocates an `f32` payload through `allocator`; the result is owned.
    pub fn make_float(f: f32, allocator: &'a dyn Allocator) -> Result<Self, TransduceError> {
        Self::make_scalar(f, allocator)
    }

    /// Allocates a payload for any supported scalar; the result is owned.
    pub fn make_scalar<T: Scalar>(value: T, allocator: &'a dyn Allocator) -> Result<Self, TransduceError> {
        let block = allocator.alloc(T::TAG.element_size())?;
        // Wrap first so the block goes back to the allocator if the write fails.
        let mut owned = OwnedBlock::new(block, allocator);
        write_scalar(value, owned.bytes_mut())?;
        Ok(Self::with_payload(T::TAG, Payload::Owned(owned)))
    }

    /// A borrowed view over `bytes`, which must be exactly one `tag` element.
    pub fn borrowed(tag: TypeTag, bytes: &'a [u8]) -> Result<Self, TransduceError> {
        if bytes.len() != tag.element_size() {
            return Err(TransduceError::BufferMismatch(tag.element_size(), bytes.len()));
        }
        Ok(Self::with_payload(tag, Payload::Borrowed(bytes)))
    }

    pub(crate) fn with_payload(tag: TypeTag, payload: Payload<'a>) -> Self {
        match tag {
            TypeTag::Null => Value::Null,
            TypeTag::Float => Value::Float(payload),
            TypeTag::Double => Value::Double(payload),
        }
    }

    /// Makes an owned copy of this value through `allocator`. `Null` stays `Null`.
    pub fn duplicate(&self, allocator: &'a dyn Allocator) -> Result<Self, TransduceError> {
        let Some(payload) = self.payload() else {
            return Ok(Value::Null);
        };
        let src = payload.bytes();
        let mut owned = OwnedBlock::new(allocator.alloc(src.len())?, allocator);
        owned.bytes_mut().copy_from_slice(src);
        Ok(Self::with_payload(self.tag(), Payload::Owned(owned)))
    }

    /// Gives an owned payload back to its allocator. Inert for borrowed and
    /// `Null` values.
    pub fn release(self) {
        drop(self);
    }

    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Null => TypeTag::Null,
            Value::Float(_) => TypeTag::Float,
            Value::Double(_) => TypeTag::Double,
        }
    }

    pub fn element_size(&self) -> usize {
        self.tag().element_size()
    }

    pub fn payload(&self) -> Option<&Payload<'a>> {
        match self {
            Value::Null => None,
            Value::Float(payload) | Value::Double(payload) => Some(payload),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self.payload() {
            Some(payload) => payload.bytes(),
            None => &[],
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_owned(&self) -> bool {
        matches!(self.payload(), Some(Payload::Owned(_)))
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self.payload(), Some(Payload::Borrowed(_)))
    }

    /// The payload as `T`, or `None` if the tag is not `T::TAG`.
    pub fn scalar<T: Scalar>(&self) -> Option<T> {
        if self.tag() != T::TAG {
            return None;
        }
        read_scalar(self.bytes()).ok()
    }

    /// The payload as `T`, failing with `TypeMismatch` if the tag is wrong.
    pub fn expect_scalar<T: Scalar>(&self) -> Result<T, TransduceError> {
        if self.tag() != T::TAG {
            return Err(TransduceError::TypeMismatch {
                expected: T::TAG,
                found: self.tag(),
            });
        }
        read_scalar(self.bytes())
    }

    pub fn as_f32(&self) -> Option<f32> {
        self.scalar::<f32>()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.scalar::<f64>()
    }
}

impl Default for Value<'_> {
    fn default() -> Self {
        Value::Null
    }
}

/// Two values are equal when they carry the same tag and the same payload
/// bytes, regardless of who owns the bytes.
impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.tag() == other.tag() && self.bytes() == other.bytes()
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Float(_) => match self.as_f32() {
                Some(x) => write!(f, "{:.6}", x),
                None => write!(f, "?"),
            },
            Value::Double(_) => match self.as_f64() {
                Some(x) => write!(f, "{:.6}", x),
                None => write!(f, "?"),
            },
        }
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::TrackingAllocator;
    use crate::utils::typed_slice_as_bytes;

    #[test]
    fn test_make_float_is_owned_and_released_once() {
        let alloc = TrackingAllocator::new();
        let value = Value::make_float(1.5, &alloc).unwrap();

        assert!(value.is_owned());
        assert_eq!(value.tag(), TypeTag::Float);
        assert_eq!(value.element_size(), 4);
        assert_eq!(value.as_f32(), Some(1.5));
        assert_eq!(alloc.live_blocks(), 1);

        value.release();
        assert_eq!(alloc.live_blocks(), 0);
        assert_eq!(alloc.stats().total_releases, 1);
    }

    #[test]
    fn test_drop_releases_owned_payload() {
        let alloc = TrackingAllocator::new();
        {
            let _value = Value::make_scalar(2.0f64, &alloc).unwrap();
            assert_eq!(alloc.live_bytes(), 8);
        }
        assert_eq!(alloc.live_bytes(), 0);
    }

    #[test]
    fn test_release_of_borrowed_and_null_is_inert() {
        let alloc = TrackingAllocator::new();
        let data = [3.0f32];
        let borrowed = Value::borrowed(TypeTag::Float, typed_slice_as_bytes(&data)).unwrap();
        assert!(borrowed.is_borrowed());
        assert!(!borrowed.is_owned());

        borrowed.release();
        Value::null().release();

        assert_eq!(alloc.stats().total_releases, 0);
        assert_eq!(data[0], 3.0);
    }

    #[test]
    fn test_null_has_no_payload() {
        let null = Value::null();
        assert!(null.is_null());
        assert!(null.payload().is_none());
        assert!(null.bytes().is_empty());
        assert_eq!(null.element_size(), 0);
        assert!(!null.is_owned() && !null.is_borrowed());
    }

    #[test]
    fn test_borrowed_rejects_wrong_width() {
        let bytes = [0u8; 3];
        let result = Value::borrowed(TypeTag::Float, &bytes);
        assert!(matches!(result, Err(TransduceError::BufferMismatch(4, 3))));
    }

    #[test]
    fn test_expect_scalar_reports_type_mismatch() {
        let alloc = TrackingAllocator::new();
        let value = Value::make_float(1.0, &alloc).unwrap();

        assert_eq!(value.scalar::<f64>(), None);
        let err = value.expect_scalar::<f64>().unwrap_err();
        assert!(matches!(
            err,
            TransduceError::TypeMismatch {
                expected: TypeTag::Double,
                found: TypeTag::Float
            }
        ));
        assert!(matches!(
            Value::null().expect_scalar::<f32>(),
            Err(TransduceError::TypeMismatch { found: TypeTag::Null, .. })
        ));
    }

    #[test]
    fn test_duplicate_produces_independent_owned_copy() {
        let alloc = TrackingAllocator::new();
        let data = [7.25f32];
        let borrowed = Value::borrowed(TypeTag::Float, typed_slice_as_bytes(&data)).unwrap();

        let copy = borrowed.duplicate(&alloc).unwrap();
        assert!(copy.is_owned());
        assert_eq!(copy, borrowed);
        assert_eq!(alloc.live_blocks(), 1);

        drop(copy);
        assert_eq!(alloc.live_blocks(), 0);
        assert!(Value::null().duplicate(&alloc).unwrap().is_null());
        assert_eq!(alloc.stats().total_allocations, 1);
    }

    #[test]
    fn test_failed_allocation_surfaces_error() {
        let alloc = TrackingAllocator::with_budget(2);
        let result = Value::make_float(1.0, &alloc);
        assert!(matches!(result, Err(TransduceError::AllocationFailed { .. })));
        assert_eq!(alloc.live_blocks(), 0);
    }

    #[test]
    fn test_display_formats_scalars() {
        let alloc = TrackingAllocator::new();
        assert_eq!(Value::make_float(4.0, &alloc).unwrap().to_string(), "4.000000");
        assert_eq!(Value::null().to_string(), "null");
    }
}
