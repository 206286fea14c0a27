//! This module defines the canonical, closed set of element types that can flow
//! through a transducer pipeline.

use bytemuck::Pod;
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The discriminator carried by every `Value` and every stream segment.
///
/// The set is deliberately closed: adding a kind means adding a variant here,
/// a `Value` variant, and a `Scalar` impl. There is no open-ended extension.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeTag {
    /// The absent value. Has no payload.
    Null,
    /// IEEE-754 single precision (`f32`).
    Float,
    /// IEEE-754 double precision (`f64`).
    Double,
}

impl TypeTag {
    /// Byte width of one payload of this tag. `Null` has none.
    pub const fn element_size(&self) -> usize {
        match self {
            Self::Null => 0,
            Self::Float => std::mem::size_of::<f32>(),
            Self::Double => std::mem::size_of::<f64>(),
        }
    }
}

/// Provides the canonical string representation for a `TypeTag`.
impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A primitive that can be carried as a `Value` payload.
///
/// The payload is stored as raw bytes; `Pod` lets us move between bytes and the
/// typed scalar through `bytemuck` without `unsafe`.
pub trait Scalar: Pod + Float + fmt::Debug {
    /// The tag under which this scalar travels.
    const TAG: TypeTag;

    /// Bytes of `+0.0`, a process-wide immutable seed for accumulators.
    const ZERO_BYTES: &'static [u8];
}

impl Scalar for f32 {
    const TAG: TypeTag = TypeTag::Float;
    const ZERO_BYTES: &'static [u8] = &[0; 4];
}

impl Scalar for f64 {
    const TAG: TypeTag = TypeTag::Double;
    const ZERO_BYTES: &'static [u8] = &[0; 8];
}
